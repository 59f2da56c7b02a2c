//! Typed arena indices.
//!
//! Every declaration kind gets its own 32-bit index type so a `StructId`
//! can never be used to index the interface table.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an index from a raw u32 value.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw u32 value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Position in the owning arena vector.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub(crate) fn next(len: usize) -> Self {
                Self(u32::try_from(len).unwrap_or_else(|_| {
                    panic!(concat!(stringify!($name), " arena exceeded u32::MAX entries"))
                }))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Index of a package in the model.
    PackageId,
    "pkg#"
);
define_id!(
    /// Index of a global function.
    FuncId,
    "func#"
);
define_id!(
    /// Index of an interface method.
    MethodId,
    "method#"
);
define_id!(
    /// Index of an enum declaration.
    EnumId,
    "enum#"
);
define_id!(
    /// Index of a struct declaration.
    StructId,
    "struct#"
);
define_id!(
    /// Index of a union declaration.
    UnionId,
    "union#"
);
define_id!(
    /// Index of an interface declaration.
    IfaceId,
    "iface#"
);
define_id!(
    /// Index of an interned type in the [`TypePool`](crate::TypePool).
    ///
    /// Structurally identical types share one `TypeId`.
    TypeId,
    "ty#"
);
