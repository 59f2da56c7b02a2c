//! Binding generation for the tidl compiler.
//!
//! Consumes the records computed by [`tidl_abi`] and produces source files:
//!
//! ```text
//!   Model
//!     ↓
//!   AnalysisManager     (ABI + C++ records, computed once per node)
//!     ↓
//!   AbiGenerator        include/*.abi.{0,1,2}.h, include/{pkg}.abi.h, src/{pkg}.abi.c
//!   CppImplGenerator    include/*.impl.hpp, author/{pkg}.impl.cpp
//!     ↓
//!   OutputManager       (path -> text, conflict checked)
//! ```
//!
//! Output is a pure function of the model: the same model always yields
//! byte-identical files.

pub mod abi;
pub mod cpp;
pub mod cpp_impl;
mod error;
mod generator;
pub mod output;
mod writer;

#[cfg(test)]
mod fixtures;

pub use abi::AbiGenerator;
pub use cpp::{GlobFuncCppInfo, IfaceCppInfo, IfaceMethodCppInfo, PackageCppInfo, TypeCppInfo};
pub use cpp_impl::CppImplGenerator;
pub use error::CodegenError;
pub use generator::{generate, generate_with, CodegenConfig};
pub use output::{FileKind, OutputFile, OutputManager};
