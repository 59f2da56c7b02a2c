//! The closed type variant and its interning pool.
//!
//! Every field, parameter and return value carries a [`TypeId`] resolved to
//! exactly one of the thirteen [`Type`] variants. User-defined variants hold
//! non-owning arena IDs back into the [`Model`](crate::Model).

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{EnumId, IfaceId, StructId, TypeId, UnionId};

/// Fixed-width numeric and boolean scalar kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Every scalar kind, in declaration order.
    pub const ALL: [ScalarKind; 11] = [
        ScalarKind::Bool,
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::F32,
        ScalarKind::F64,
    ];

    /// IDL spelling of the scalar (`bool`, `i32`, `f64`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }

    /// Parse the IDL spelling of a scalar.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved type.
///
/// Adding a variant here is a compile error in every exhaustive consumer,
/// which is how the ABI dispatchers stay total.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Scalar(ScalarKind),
    String,
    /// Native handle passed through untouched.
    Opaque,
    Array(TypeId),
    Vector(TypeId),
    Map(TypeId, TypeId),
    Set(TypeId),
    Optional(TypeId),
    Callback {
        params: Vec<TypeId>,
        ret: Option<TypeId>,
    },
    Enum(EnumId),
    Struct(StructId),
    Union(UnionId),
    Iface(IfaceId),
}

/// Structural interning pool for [`Type`]s.
///
/// Identical shapes are stored once, so `TypeId` equality is type equality.
#[derive(Default)]
pub struct TypePool {
    types: Vec<Type>,
    lookup: FxHashMap<Type, TypeId>,
}

impl TypePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a type, returning the existing ID for a repeated shape.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.lookup.get(&ty) {
            return id;
        }
        let id = TypeId::next(self.types.len());
        self.types.push(ty.clone());
        self.lookup.insert(ty, id);
        id
    }

    /// Resolve an ID to its type.
    ///
    /// # Panics
    /// Panics if `id` did not come from this pool.
    #[inline]
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
