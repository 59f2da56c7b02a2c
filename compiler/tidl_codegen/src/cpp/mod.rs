//! C++ projection records.
//!
//! The C++ counterpart of the ABI records: namespaces, header names and
//! C++ spellings of every type. They are [`Analysis`] records cached in the
//! same [`AnalysisManager`] as the ABI records, so container element types
//! resolve recursively through the cache.

use tidl_abi::ty::scalar_c_type;
use tidl_abi::{AbiError, Analysis, AnalysisManager, IfaceAbiInfo};
use tidl_ir::{DeclRef, FuncId, IfaceId, MethodId, Model, PackageId, Type, TypeId};

/// Runtime header shared by every generated C++ file.
pub const COMMON_CPP_HEADER: &str = "taihe/common.hpp";

/// `::a::b` for package `a.b`.
fn namespace_of(model: &Model, package: PackageId) -> String {
    model
        .segments(DeclRef::Package(package))
        .iter()
        .map(|seg| format!("::{seg}"))
        .collect()
}

/// Projection header of a named user type: `{pkg}.{Name}.proj.1.hpp`.
fn proj_header(model: &Model, decl: DeclRef) -> String {
    format!("{}.proj.1.hpp", model.qualified_name(decl))
}

/// C++ file and namespace names for a package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageCppInfo {
    /// `::a::b`
    pub namespace: String,
    /// `::a::b::weak`
    pub weak_namespace: String,
    /// `{pkg}.impl.hpp`, the export macros.
    pub impl_header: String,
    /// `{pkg}.impl.cpp`, the author stub file.
    pub author_source: String,
}

impl Analysis for PackageCppInfo {
    type Key = PackageId;
    const NAME: &'static str = "PackageCppInfo";

    fn compute(am: &AnalysisManager<'_>, key: PackageId) -> Result<Self, AbiError> {
        let model = am.model();
        let dotted = model.qualified_name(key.into());
        let namespace = namespace_of(model, key);
        Ok(Self {
            weak_namespace: format!("{namespace}::weak"),
            namespace,
            impl_header: format!("{dotted}.impl.hpp"),
            author_source: format!("{dotted}.impl.cpp"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobFuncCppInfo {
    /// Name of the author's implementation function.
    pub call_name: String,
    /// `TH_EXPORT_CPP_API_{name}`
    pub export_macro: String,
}

impl Analysis for GlobFuncCppInfo {
    type Key = FuncId;
    const NAME: &'static str = "GlobFuncCppInfo";

    fn compute(am: &AnalysisManager<'_>, key: FuncId) -> Result<Self, AbiError> {
        let name = am.model().name_str(am.model().function(key).name);
        Ok(Self {
            call_name: name.to_string(),
            export_macro: format!("TH_EXPORT_CPP_API_{name}"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfaceMethodCppInfo {
    /// Member function name on the implementation class.
    pub call_name: String,
}

impl Analysis for IfaceMethodCppInfo {
    type Key = MethodId;
    const NAME: &'static str = "IfaceMethodCppInfo";

    fn compute(am: &AnalysisManager<'_>, key: MethodId) -> Result<Self, AbiError> {
        let name = am.model().name_str(am.model().method(key).name);
        Ok(Self {
            call_name: name.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfaceCppInfo {
    /// `::pkg::Name`, the owning handle.
    pub full_name: String,
    /// `::pkg::weak::Name`, the borrowed handle.
    pub weak_name: String,
    /// `NameImpl`, the author's implementation class.
    pub impl_class: String,
    pub proj_header: String,
    /// `{pkg}.{Name}.impl.hpp`, the ftable and vtable templates.
    pub impl_header: String,
    /// Template holding one ABI trampoline per own method.
    pub ftable_impl: String,
    /// Template variable of the filled ftable.
    pub ftable_of: String,
    /// Template variable of the filled vtable.
    pub vtable_of: String,
}

impl Analysis for IfaceCppInfo {
    type Key = IfaceId;
    const NAME: &'static str = "IfaceCppInfo";

    fn compute(am: &AnalysisManager<'_>, key: IfaceId) -> Result<Self, AbiError> {
        let model = am.model();
        let decl = model.iface(key);
        let abi = am.get::<IfaceAbiInfo>(key)?;
        let namespace = namespace_of(model, decl.package);
        let name = model.name_str(decl.name);
        Ok(Self {
            full_name: format!("{namespace}::{name}"),
            weak_name: format!("{namespace}::weak::{name}"),
            impl_class: format!("{name}Impl"),
            proj_header: proj_header(model, key.into()),
            impl_header: format!("{}.impl.hpp", model.qualified_name(key.into())),
            ftable_impl: format!("{}_impl", abi.ftable),
            ftable_of: format!("{}_of", abi.ftable),
            vtable_of: format!("{}_of", abi.vtable),
        })
    }
}

/// C++ spelling of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCppInfo {
    /// Owning form: fields, return values.
    pub as_owner: String,
    /// Borrowed form: parameters.
    pub as_param: String,
    /// Headers needed to use the type, element types included.
    pub headers: Vec<String>,
}

impl TypeCppInfo {
    fn runtime(owner: String, param: String, header: &str) -> Self {
        Self {
            as_owner: owner,
            as_param: param,
            headers: vec![header.to_string()],
        }
    }

    /// `template<args>` / `template_view<args>` over already-resolved args.
    fn generic(
        am: &AnalysisManager<'_>,
        template: &str,
        header: &str,
        args: &[TypeId],
    ) -> Result<Self, AbiError> {
        let mut headers = vec![header.to_string()];
        let mut owners = Vec::with_capacity(args.len());
        for &arg in args {
            let info = am.get::<TypeCppInfo>(arg)?;
            owners.push(info.as_owner.clone());
            headers.extend(info.headers.iter().cloned());
        }
        let args = owners.join(", ");
        Ok(Self {
            as_owner: format!("::taihe::{template}<{args}>"),
            as_param: format!("::taihe::{template}_view<{args}>"),
            headers,
        })
    }

    fn user(model: &Model, decl: DeclRef, by_ref: bool) -> Self {
        let package = model.package_of(decl);
        let name = format!(
            "{}::{}",
            namespace_of(model, package),
            model.segments(decl).last().copied().unwrap_or_default()
        );
        let param = if by_ref {
            format!("{name} const&")
        } else {
            name.clone()
        };
        Self {
            as_owner: name,
            as_param: param,
            headers: vec![proj_header(model, decl)],
        }
    }
}

impl Analysis for TypeCppInfo {
    type Key = TypeId;
    const NAME: &'static str = "TypeCppInfo";

    fn compute(am: &AnalysisManager<'_>, key: TypeId) -> Result<Self, AbiError> {
        let model = am.model();
        let info = match model.ty(key) {
            Type::Scalar(kind) => {
                let c = scalar_c_type(*kind).to_string();
                Self::runtime(c.clone(), c, COMMON_CPP_HEADER)
            }
            Type::String => Self::runtime(
                "::taihe::string".to_string(),
                "::taihe::string_view".to_string(),
                "taihe/string.hpp",
            ),
            Type::Opaque => Self::runtime(
                "uintptr_t".to_string(),
                "uintptr_t".to_string(),
                COMMON_CPP_HEADER,
            ),
            Type::Array(elem) => Self::generic(am, "array", "taihe/array.hpp", &[*elem])?,
            Type::Vector(elem) => Self::generic(am, "vector", "taihe/vector.hpp", &[*elem])?,
            Type::Map(k, v) => Self::generic(am, "map", "taihe/map.hpp", &[*k, *v])?,
            Type::Set(elem) => Self::generic(am, "set", "taihe/set.hpp", &[*elem])?,
            Type::Optional(inner) => {
                Self::generic(am, "optional", "taihe/optional.hpp", &[*inner])?
            }
            Type::Callback { params, ret } => {
                let mut headers = vec!["taihe/callback.hpp".to_string()];
                let ret = match ret {
                    Some(ret) => {
                        let info = am.get::<TypeCppInfo>(*ret)?;
                        headers.extend(info.headers.iter().cloned());
                        info.as_owner.clone()
                    }
                    None => "void".to_string(),
                };
                let mut args = Vec::with_capacity(params.len());
                for &param in params {
                    let info = am.get::<TypeCppInfo>(param)?;
                    headers.extend(info.headers.iter().cloned());
                    args.push(info.as_param.clone());
                }
                let sig = format!("{ret}({})", args.join(", "));
                Self {
                    as_owner: format!("::taihe::callback<{sig}>"),
                    as_param: format!("::taihe::callback_view<{sig}>"),
                    headers,
                }
            }
            Type::Enum(id) => Self::user(model, (*id).into(), false),
            Type::Struct(id) => Self::user(model, (*id).into(), true),
            Type::Union(id) => Self::user(model, (*id).into(), true),
            Type::Iface(id) => {
                let iface = am.get::<IfaceCppInfo>(*id)?;
                Self {
                    as_owner: iface.full_name.clone(),
                    as_param: iface.weak_name.clone(),
                    headers: vec![iface.proj_header.clone()],
                }
            }
        };
        Ok(info)
    }
}
