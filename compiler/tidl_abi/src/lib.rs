//! ABI analysis for the tidl binding generator.
//!
//! Turns a resolved [`Model`](tidl_ir::Model) into stable native symbols and
//! layouts:
//!
//! - [`mangle`]: injective, C-identifier-safe symbol names
//! - [`cache`]: memoizing per-node analysis records with cycle detection
//! - [`decl`]: per-declaration ABI records, including interface ancestor
//!   linearization
//! - [`ty`]: the per-type ABI dispatcher
//!
//! Every record is computed lazily through an [`AnalysisManager`], once per
//! node, and shared by every backend that asks for it.

pub mod cache;
pub mod decl;
mod error;
pub mod mangle;
pub mod ty;

pub use cache::{Analysis, AnalysisManager, CacheStats, NodeKey};
pub use decl::{
    AncestorEntry, AncestorInfo, EnumAbiInfo, GlobFuncAbiInfo, IfaceAbiInfo, IfaceMethodAbiInfo,
    PackageAbiInfo, StructAbiInfo, UnionAbiInfo,
};
pub use error::AbiError;
pub use mangle::{demangle, mangle, Demangled, MangleKind};
pub use ty::TypeAbiInfo;
