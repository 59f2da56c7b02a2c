//! Per-declaration ABI records.
//!
//! Each record is an [`Analysis`] keyed by the declaration's ID. Mangled
//! names are computed once here and read by every consumer; nothing
//! re-derives a symbol from another record's mangled string.

mod iface;

pub use iface::{AncestorDict, AncestorEntry, AncestorInfo, IfaceAbiInfo};

use tidl_ir::{EnumId, FuncId, MethodId, Model, PackageId, StructId, UnionId};

use crate::{mangle, AbiError, Analysis, AnalysisManager, MangleKind};

/// Runtime header every generated ABI header depends on.
pub const COMMON_HEADER: &str = "taihe/common.h";

/// C type used for enum values and union tags.
pub const ENUM_ABI_TYPE: &str = "int32_t";

/// Header names of a named type, by level.
///
/// `{pkg}.{Name}.abi.0.h` forward-declares, `.abi.1.h` defines and
/// `.abi.2.h` holds inline operations. Only interfaces use level 2.
fn type_headers(model: &Model, package: PackageId, name: &str) -> [String; 3] {
    let pkg = model.qualified_name(package.into());
    [0, 1, 2].map(|level| format!("{pkg}.{name}.abi.{level}.h"))
}

/// ABI file names for a package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageAbiInfo {
    /// Dotted package name.
    pub name: String,
    /// `{pkg}.abi.h`
    pub header: String,
    /// `{pkg}.abi.c`
    pub source: String,
}

impl Analysis for PackageAbiInfo {
    type Key = PackageId;
    const NAME: &'static str = "PackageAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: PackageId) -> Result<Self, AbiError> {
        let name = am.model().qualified_name(key.into());
        Ok(Self {
            header: format!("{name}.abi.h"),
            source: format!("{name}.abi.c"),
            name,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobFuncAbiInfo {
    pub mangled_name: String,
}

impl Analysis for GlobFuncAbiInfo {
    type Key = FuncId;
    const NAME: &'static str = "GlobFuncAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: FuncId) -> Result<Self, AbiError> {
        let segments = am.model().segments(key.into());
        Ok(Self {
            mangled_name: mangle(&segments, MangleKind::Func)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfaceMethodAbiInfo {
    pub mangled_name: String,
    /// Field of the owning interface's ftable struct holding this method.
    pub ftbl_field: String,
}

impl Analysis for IfaceMethodAbiInfo {
    type Key = MethodId;
    const NAME: &'static str = "IfaceMethodAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: MethodId) -> Result<Self, AbiError> {
        let model = am.model();
        let segments = model.segments(key.into());
        Ok(Self {
            mangled_name: mangle(&segments, MangleKind::Method)?,
            ftbl_field: model.name_str(model.method(key).name).to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumAbiInfo {
    pub mangled_name: String,
    /// Owner and parameter form; enums travel as their integer value.
    pub abi_type: &'static str,
    pub headers: Vec<String>,
}

impl Analysis for EnumAbiInfo {
    type Key = EnumId;
    const NAME: &'static str = "EnumAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: EnumId) -> Result<Self, AbiError> {
        let segments = am.model().segments(key.into());
        Ok(Self {
            mangled_name: mangle(&segments, MangleKind::Type)?,
            abi_type: ENUM_ABI_TYPE,
            headers: vec![COMMON_HEADER.to_string()],
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructAbiInfo {
    pub mangled_name: String,
    pub decl_header: String,
    pub defn_header: String,
    /// `struct M`
    pub as_owner: String,
    /// `struct M const*`
    pub as_param: String,
}

impl Analysis for StructAbiInfo {
    type Key = StructId;
    const NAME: &'static str = "StructAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: StructId) -> Result<Self, AbiError> {
        let model = am.model();
        let decl = model.struct_decl(key);
        let mangled_name = mangle(&model.segments(key.into()), MangleKind::Type)?;
        let [decl_header, defn_header, _] =
            type_headers(model, decl.package, model.name_str(decl.name));
        Ok(Self {
            as_owner: format!("struct {mangled_name}"),
            as_param: format!("struct {mangled_name} const*"),
            mangled_name,
            decl_header,
            defn_header,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionAbiInfo {
    pub mangled_name: String,
    pub decl_header: String,
    pub defn_header: String,
    /// `struct M`
    pub as_owner: String,
    /// `struct M const*`
    pub as_param: String,
    /// Type of the active-field tag.
    pub tag_type: &'static str,
    /// Name of the inner C union holding the payload (`M_union`).
    pub union_name: String,
}

impl Analysis for UnionAbiInfo {
    type Key = UnionId;
    const NAME: &'static str = "UnionAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: UnionId) -> Result<Self, AbiError> {
        let model = am.model();
        let decl = model.union_decl(key);
        let mangled_name = mangle(&model.segments(key.into()), MangleKind::Type)?;
        let [decl_header, defn_header, _] =
            type_headers(model, decl.package, model.name_str(decl.name));
        Ok(Self {
            as_owner: format!("struct {mangled_name}"),
            as_param: format!("struct {mangled_name} const*"),
            tag_type: ENUM_ABI_TYPE,
            union_name: format!("{mangled_name}_union"),
            mangled_name,
            decl_header,
            defn_header,
        })
    }
}
