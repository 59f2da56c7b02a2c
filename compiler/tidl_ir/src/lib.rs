//! tidl IR - the resolved semantic model consumed by ABI analysis.
//!
//! This crate holds the data the binding generator works on:
//! - Interned identifiers ([`Name`], [`StringInterner`])
//! - Typed arena IDs for every declaration kind ([`PackageId`], [`IfaceId`], ...)
//! - The closed [`Type`] variant and its structural [`TypePool`]
//! - The [`Model`] arena that owns packages and declarations
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings become `Name(u32)`, types become `TypeId(u32)`
//! - **Flatten Everything**: declarations refer to each other by ID, never by pointer
//! - **Closed Variants**: [`Type`] and [`DeclRef`] are sealed enums so every
//!   consumer `match` is checked for exhaustiveness by the compiler
//!
//! The model arrives fully resolved: name resolution and cycle diagnostics
//! happen upstream. Analyses that walk it must still fail fast (not recurse
//! forever) if an inheritance cycle slips through.

mod decl;
mod ids;
mod interner;
mod model;
mod name;
mod ty;

pub use decl::{
    DeclRef, EnumDecl, EnumItem, GlobFuncDecl, IfaceDecl, IfaceMethodDecl, PackageDecl, Param,
    StructDecl, StructField, UnionDecl, UnionField,
};
pub use ids::{EnumId, FuncId, IfaceId, MethodId, PackageId, StructId, TypeId, UnionId};
pub use interner::StringInterner;
pub use model::{Model, Segments};
pub use name::Name;
pub use ty::{ScalarKind, Type, TypePool};
