//! Type ABI dispatcher.
//!
//! [`TypeAbiInfo`] gives the C spelling of every type in owner position
//! (fields, return values) and parameter position, plus the headers needed
//! to forward-declare and to define it. The dispatch is one exhaustive
//! `match` over [`Type`]; user-defined types republish their declaration
//! record.

use tidl_ir::{ScalarKind, Type, TypeId};

use crate::decl::COMMON_HEADER;
use crate::{
    AbiError, Analysis, AnalysisManager, EnumAbiInfo, IfaceAbiInfo, StructAbiInfo, UnionAbiInfo,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAbiInfo {
    pub as_owner: String,
    pub as_param: String,
    /// Headers needed to name the type.
    pub decl_headers: Vec<String>,
    /// Headers needed to use its layout.
    pub defn_headers: Vec<String>,
}

impl TypeAbiInfo {
    /// A runtime-provided type whose owner and param forms coincide.
    fn runtime(c_type: &str, header: &str) -> Self {
        Self {
            as_owner: c_type.to_string(),
            as_param: c_type.to_string(),
            decl_headers: vec![header.to_string()],
            defn_headers: vec![header.to_string()],
        }
    }
}

/// C type for a scalar.
pub fn scalar_c_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Bool => "bool",
        ScalarKind::I8 => "int8_t",
        ScalarKind::I16 => "int16_t",
        ScalarKind::I32 => "int32_t",
        ScalarKind::I64 => "int64_t",
        ScalarKind::U8 => "uint8_t",
        ScalarKind::U16 => "uint16_t",
        ScalarKind::U32 => "uint32_t",
        ScalarKind::U64 => "uint64_t",
        ScalarKind::F32 => "float",
        ScalarKind::F64 => "double",
    }
}

impl Analysis for TypeAbiInfo {
    type Key = TypeId;
    const NAME: &'static str = "TypeAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: TypeId) -> Result<Self, AbiError> {
        let info = match am.model().ty(key) {
            Type::Scalar(kind) => Self::runtime(scalar_c_type(*kind), COMMON_HEADER),
            Type::String => Self::runtime("struct TString", "taihe/string.abi.h"),
            Type::Opaque => Self::runtime("uintptr_t", COMMON_HEADER),
            Type::Array(_) => Self::runtime("struct TArray", "taihe/array.abi.h"),
            Type::Vector(_) => Self::runtime("struct TVector*", "taihe/vector.abi.h"),
            Type::Map(_, _) => Self::runtime("struct TMap*", "taihe/map.abi.h"),
            Type::Set(_) => Self::runtime("struct TSet*", "taihe/set.abi.h"),
            Type::Optional(_) => Self::runtime("struct TOptional", "taihe/optional.abi.h"),
            Type::Callback { .. } => Self::runtime("struct TCallback", "taihe/callback.abi.h"),
            Type::Enum(id) => {
                let decl = am.get::<EnumAbiInfo>(*id)?;
                Self {
                    as_owner: decl.abi_type.to_string(),
                    as_param: decl.abi_type.to_string(),
                    decl_headers: decl.headers.clone(),
                    defn_headers: decl.headers.clone(),
                }
            }
            Type::Struct(id) => {
                let decl = am.get::<StructAbiInfo>(*id)?;
                Self {
                    as_owner: decl.as_owner.clone(),
                    as_param: decl.as_param.clone(),
                    decl_headers: vec![decl.decl_header.clone()],
                    defn_headers: vec![decl.defn_header.clone()],
                }
            }
            Type::Union(id) => {
                let decl = am.get::<UnionAbiInfo>(*id)?;
                Self {
                    as_owner: decl.as_owner.clone(),
                    as_param: decl.as_param.clone(),
                    decl_headers: vec![decl.decl_header.clone()],
                    defn_headers: vec![decl.defn_header.clone()],
                }
            }
            Type::Iface(id) => {
                let decl = am.get::<IfaceAbiInfo>(*id)?;
                Self {
                    as_owner: decl.as_owner.clone(),
                    as_param: decl.as_param.clone(),
                    decl_headers: vec![decl.decl_header.clone()],
                    defn_headers: vec![decl.defn_header.clone()],
                }
            }
        };
        Ok(info)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
