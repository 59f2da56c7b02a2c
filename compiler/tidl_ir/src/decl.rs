//! Declaration records stored in the [`Model`](crate::Model) arena.
//!
//! Child lists (params, fields, parents, methods) keep declaration order;
//! several analyses depend on that order.

use std::fmt;

use smallvec::SmallVec;

use crate::{EnumId, FuncId, IfaceId, MethodId, Name, PackageId, StructId, TypeId, UnionId};

/// Reference to any declaration in the model.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DeclRef {
    Package(PackageId),
    Func(FuncId),
    Method(MethodId),
    Enum(EnumId),
    Struct(StructId),
    Union(UnionId),
    Iface(IfaceId),
}

impl DeclRef {
    /// Short label for the declaration kind, used in diagnostics.
    pub fn kind_str(self) -> &'static str {
        match self {
            DeclRef::Package(_) => "package",
            DeclRef::Func(_) => "function",
            DeclRef::Method(_) => "method",
            DeclRef::Enum(_) => "enum",
            DeclRef::Struct(_) => "struct",
            DeclRef::Union(_) => "union",
            DeclRef::Iface(_) => "interface",
        }
    }
}

impl fmt::Debug for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclRef::Package(id) => write!(f, "{id:?}"),
            DeclRef::Func(id) => write!(f, "{id:?}"),
            DeclRef::Method(id) => write!(f, "{id:?}"),
            DeclRef::Enum(id) => write!(f, "{id:?}"),
            DeclRef::Struct(id) => write!(f, "{id:?}"),
            DeclRef::Union(id) => write!(f, "{id:?}"),
            DeclRef::Iface(id) => write!(f, "{id:?}"),
        }
    }
}

macro_rules! impl_from_id {
    ($($id:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$id> for DeclRef {
                fn from(id: $id) -> Self {
                    DeclRef::$variant(id)
                }
            }
        )*
    };
}

impl_from_id!(
    PackageId => Package,
    FuncId => Func,
    MethodId => Method,
    EnumId => Enum,
    StructId => Struct,
    UnionId => Union,
    IfaceId => Iface,
);

/// A package: a dotted namespace owning top-level declarations.
#[derive(Clone, Debug)]
pub struct PackageDecl {
    /// Dotted name split into segments (`ohos.example` -> `[ohos, example]`).
    pub segments: SmallVec<[Name; 4]>,
    pub functions: Vec<FuncId>,
    pub enums: Vec<EnumId>,
    pub structs: Vec<StructId>,
    pub unions: Vec<UnionId>,
    pub interfaces: Vec<IfaceId>,
}

/// A function or method parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    pub ty: TypeId,
}

/// A package-level function.
#[derive(Clone, Debug)]
pub struct GlobFuncDecl {
    pub name: Name,
    pub package: PackageId,
    pub params: Vec<Param>,
    pub return_ty: Option<TypeId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnumItem {
    pub name: Name,
    pub value: i64,
}

#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub name: Name,
    pub package: PackageId,
    pub items: Vec<EnumItem>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: Name,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct StructDecl {
    pub name: Name,
    pub package: PackageId,
    pub fields: Vec<StructField>,
}

/// A union alternative. A field with no type is a bare tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnionField {
    pub name: Name,
    pub ty: Option<TypeId>,
}

#[derive(Clone, Debug)]
pub struct UnionDecl {
    pub name: Name,
    pub package: PackageId,
    pub fields: Vec<UnionField>,
}

/// An interface: ordered parents plus its own methods.
///
/// Parent order is the tie-break for ancestor linearization.
#[derive(Clone, Debug)]
pub struct IfaceDecl {
    pub name: Name,
    pub package: PackageId,
    pub parents: Vec<IfaceId>,
    pub methods: Vec<MethodId>,
}

#[derive(Clone, Debug)]
pub struct IfaceMethodDecl {
    pub name: Name,
    pub iface: IfaceId,
    pub params: Vec<Param>,
    pub return_ty: Option<TypeId>,
}
