//! JSON model files.
//!
//! A model file lists packages and their declarations, with types written
//! as text:
//!
//! ```text
//! "i32" | "string" | "opaque"          builtins
//! "Point" | "demo.Point"                user types (package-local or qualified)
//! {"vector": T} {"array": T} {"set": T} {"optional": T}
//! {"map": [K, V]}
//! {"callback": {"params": [T, ...], "ret": T}}
//! ```
//!
//! Loading runs in two passes: every named type is declared first so
//! fields, parameters and parents may refer to types declared later or in
//! other packages.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use thiserror::Error;
use tidl_diagnostic::{Diagnostic, ErrorCode};
use tidl_ir::{EnumId, IfaceId, Model, PackageId, ScalarKind, StructId, TypeId, UnionId};
use tracing::debug;

#[derive(Debug, Error)]
pub enum ModelFileError {
    #[error("cannot read `{}`: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed model file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unresolved type `{name}` in {context}")]
    Unresolved { name: String, context: String },

    #[error("`{name}` in {context} is not an interface")]
    NotAnInterface { name: String, context: String },

    #[error("`{name}` is declared more than once")]
    Duplicate { name: String },
}

impl ModelFileError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ModelFileError::Unreadable { .. } => ErrorCode::E1003,
            ModelFileError::Malformed(_) => ErrorCode::E1001,
            ModelFileError::Unresolved { .. } | ModelFileError::NotAnInterface { .. } => {
                ErrorCode::E1002
            }
            ModelFileError::Duplicate { .. } => ErrorCode::E1004,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.error_code()).with_message(self.to_string());
        match self {
            ModelFileError::Unreadable { path, .. } => {
                diag.with_location(path.display().to_string())
            }
            ModelFileError::Malformed(err) => {
                diag.with_location(format!("line {}, column {}", err.line(), err.column()))
            }
            ModelFileError::Unresolved { .. } => diag
                .with_note("builtin types are bool, i8..i64, u8..u64, f32, f64, string, opaque")
                .with_suggestion("declare the type or qualify it with its package"),
            ModelFileError::NotAnInterface { .. } => {
                diag.with_note("only interfaces can be inherited")
            }
            ModelFileError::Duplicate { .. } => {
                diag.with_suggestion("rename one of the declarations")
            }
        }
    }
}

// -- Raw file shape --

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(default)]
    packages: Vec<RawPackage>,
}

#[derive(Debug, Deserialize)]
struct RawPackage {
    name: String,
    #[serde(default)]
    enums: Vec<RawEnum>,
    #[serde(default)]
    structs: Vec<RawStruct>,
    #[serde(default)]
    unions: Vec<RawUnion>,
    #[serde(default)]
    interfaces: Vec<RawInterface>,
    #[serde(default)]
    functions: Vec<RawFunction>,
}

#[derive(Debug, Deserialize)]
struct RawEnum {
    name: String,
    items: Vec<RawEnumItem>,
}

#[derive(Debug, Deserialize)]
struct RawEnumItem {
    name: String,
    /// Defaults to one past the previous item, starting at zero.
    #[serde(default)]
    value: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    ty: RawType,
}

#[derive(Debug, Deserialize)]
struct RawStruct {
    name: String,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawUnionField {
    name: String,
    /// Absent for a bare tag.
    #[serde(default, rename = "type")]
    ty: Option<RawType>,
}

#[derive(Debug, Deserialize)]
struct RawUnion {
    name: String,
    #[serde(default)]
    fields: Vec<RawUnionField>,
}

#[derive(Debug, Deserialize)]
struct RawInterface {
    name: String,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    methods: Vec<RawFunction>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    params: Vec<RawField>,
    #[serde(default)]
    returns: Option<RawType>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawType {
    Named(String),
    Compound(RawCompound),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawCompound {
    Array(Box<RawType>),
    Vector(Box<RawType>),
    Map(Box<RawType>, Box<RawType>),
    Set(Box<RawType>),
    Optional(Box<RawType>),
    Callback(RawCallback),
}

#[derive(Debug, Deserialize)]
struct RawCallback {
    #[serde(default)]
    params: Vec<RawType>,
    #[serde(default)]
    ret: Option<Box<RawType>>,
}

// -- Loading --

/// Reject a member name that repeats within one declaration.
fn ensure_unique<'r>(
    owner: &str,
    names: impl IntoIterator<Item = &'r str>,
) -> Result<(), ModelFileError> {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            return Err(ModelFileError::Duplicate {
                name: format!("{owner}.{name}"),
            });
        }
    }
    Ok(())
}

/// A named user type.
#[derive(Copy, Clone, Debug)]
enum UserDecl {
    Enum(EnumId),
    Struct(StructId),
    Union(UnionId),
    Iface(IfaceId),
}

/// Declarations created in the first pass, in file order.
struct Declared {
    id: PackageId,
    structs: Vec<StructId>,
    unions: Vec<UnionId>,
    ifaces: Vec<IfaceId>,
}

/// Read and load a model file.
pub fn load_model(path: &Path) -> Result<Model, ModelFileError> {
    let text = fs::read_to_string(path).map_err(|source| ModelFileError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_model(&text)
}

/// Load a model from JSON text.
pub fn parse_model(text: &str) -> Result<Model, ModelFileError> {
    let raw: RawModel = serde_json::from_str(text)?;
    Loader::default().load(&raw)
}

#[derive(Default)]
struct Loader {
    model: Model,
    /// Qualified name to declaration.
    decls: FxHashMap<String, UserDecl>,
    packages: FxHashSet<String>,
}

impl Loader {
    fn load(mut self, raw: &RawModel) -> Result<Model, ModelFileError> {
        let mut declared = Vec::with_capacity(raw.packages.len());
        for pkg in &raw.packages {
            declared.push(self.declare_package(pkg)?);
        }
        for (pkg, declared) in raw.packages.iter().zip(&declared) {
            self.define_package(pkg, declared)?;
        }
        debug!(
            packages = raw.packages.len(),
            decls = self.model.decl_count(),
            "loaded model"
        );
        Ok(self.model)
    }

    fn declare(&mut self, qualified: String, decl: UserDecl) -> Result<(), ModelFileError> {
        if self.decls.contains_key(&qualified) {
            return Err(ModelFileError::Duplicate { name: qualified });
        }
        self.decls.insert(qualified, decl);
        Ok(())
    }

    fn declare_package(&mut self, raw: &RawPackage) -> Result<Declared, ModelFileError> {
        if !self.packages.insert(raw.name.clone()) {
            return Err(ModelFileError::Duplicate {
                name: raw.name.clone(),
            });
        }
        let id = self.model.add_package(&raw.name);
        let qualify = |name: &str| format!("{}.{name}", raw.name);

        for e in &raw.enums {
            ensure_unique(&qualify(&e.name), e.items.iter().map(|i| i.name.as_str()))?;
            let mut next = 0;
            let items: Vec<(&str, i64)> = e
                .items
                .iter()
                .map(|item| {
                    let value = item.value.unwrap_or(next);
                    next = value.wrapping_add(1);
                    (item.name.as_str(), value)
                })
                .collect();
            let enum_id = self.model.add_enum(id, &e.name, &items);
            self.declare(qualify(&e.name), UserDecl::Enum(enum_id))?;
        }

        let mut structs = Vec::with_capacity(raw.structs.len());
        for s in &raw.structs {
            let struct_id = self.model.add_struct(id, &s.name);
            self.declare(qualify(&s.name), UserDecl::Struct(struct_id))?;
            structs.push(struct_id);
        }

        let mut unions = Vec::with_capacity(raw.unions.len());
        for u in &raw.unions {
            let union_id = self.model.add_union(id, &u.name);
            self.declare(qualify(&u.name), UserDecl::Union(union_id))?;
            unions.push(union_id);
        }

        let mut ifaces = Vec::with_capacity(raw.interfaces.len());
        for i in &raw.interfaces {
            let iface_id = self.model.add_interface(id, &i.name);
            self.declare(qualify(&i.name), UserDecl::Iface(iface_id))?;
            ifaces.push(iface_id);
        }

        Ok(Declared {
            id,
            structs,
            unions,
            ifaces,
        })
    }

    fn define_package(&mut self, raw: &RawPackage, declared: &Declared) -> Result<(), ModelFileError> {
        let pkg = raw.name.as_str();

        for (s, &id) in raw.structs.iter().zip(&declared.structs) {
            ensure_unique(
                &format!("{pkg}.{}", s.name),
                s.fields.iter().map(|f| f.name.as_str()),
            )?;
            for field in &s.fields {
                let context = format!("field `{}` of {pkg}.{}", field.name, s.name);
                let ty = self.resolve(pkg, &field.ty, &context)?;
                self.model.add_struct_field(id, &field.name, ty);
            }
        }

        for (u, &id) in raw.unions.iter().zip(&declared.unions) {
            ensure_unique(
                &format!("{pkg}.{}", u.name),
                u.fields.iter().map(|f| f.name.as_str()),
            )?;
            for field in &u.fields {
                let ty = match &field.ty {
                    Some(ty) => {
                        let context = format!("field `{}` of {pkg}.{}", field.name, u.name);
                        Some(self.resolve(pkg, ty, &context)?)
                    }
                    None => None,
                };
                self.model.add_union_field(id, &field.name, ty);
            }
        }

        for (i, &id) in raw.interfaces.iter().zip(&declared.ifaces) {
            let context = format!("parents of {pkg}.{}", i.name);
            for parent in &i.parents {
                match self.lookup(pkg, parent) {
                    Some(UserDecl::Iface(parent_id)) => self.model.add_parent(id, parent_id),
                    Some(_) => {
                        return Err(ModelFileError::NotAnInterface {
                            name: parent.clone(),
                            context,
                        })
                    }
                    None => {
                        return Err(ModelFileError::Unresolved {
                            name: parent.clone(),
                            context,
                        })
                    }
                }
            }
            ensure_unique(
                &format!("{pkg}.{}", i.name),
                i.methods.iter().map(|m| m.name.as_str()),
            )?;
            for m in &i.methods {
                let owner = format!("method {pkg}.{}.{}", i.name, m.name);
                let (params, ret) = self.signature(pkg, m, &owner)?;
                let params: Vec<(&str, TypeId)> =
                    params.iter().map(|(name, ty)| (name.as_str(), *ty)).collect();
                self.model.add_method(id, &m.name, &params, ret);
            }
        }

        ensure_unique(pkg, raw.functions.iter().map(|f| f.name.as_str()))?;
        for f in &raw.functions {
            let owner = format!("function {pkg}.{}", f.name);
            let (params, ret) = self.signature(pkg, f, &owner)?;
            let params: Vec<(&str, TypeId)> =
                params.iter().map(|(name, ty)| (name.as_str(), *ty)).collect();
            self.model.add_function(declared.id, &f.name, &params, ret);
        }
        Ok(())
    }

    fn signature(
        &mut self,
        pkg: &str,
        f: &RawFunction,
        owner: &str,
    ) -> Result<(Vec<(String, TypeId)>, Option<TypeId>), ModelFileError> {
        let mut params = Vec::with_capacity(f.params.len());
        for param in &f.params {
            let context = format!("parameter `{}` of {owner}", param.name);
            params.push((param.name.clone(), self.resolve(pkg, &param.ty, &context)?));
        }
        let ret = match &f.returns {
            Some(ty) => Some(self.resolve(pkg, ty, &format!("return type of {owner}"))?),
            None => None,
        };
        Ok((params, ret))
    }

    /// A user type by qualified name, or by name within `pkg`.
    fn lookup(&self, pkg: &str, name: &str) -> Option<UserDecl> {
        self.decls
            .get(name)
            .or_else(|| self.decls.get(&format!("{pkg}.{name}")))
            .copied()
    }

    fn resolve(&mut self, pkg: &str, ty: &RawType, context: &str) -> Result<TypeId, ModelFileError> {
        match ty {
            RawType::Named(name) => {
                if let Some(kind) = ScalarKind::from_name(name) {
                    return Ok(self.model.scalar(kind));
                }
                match name.as_str() {
                    "string" => return Ok(self.model.string()),
                    "opaque" => return Ok(self.model.opaque()),
                    _ => {}
                }
                let decl = self
                    .lookup(pkg, name)
                    .ok_or_else(|| ModelFileError::Unresolved {
                        name: name.clone(),
                        context: context.to_string(),
                    })?;
                Ok(match decl {
                    UserDecl::Enum(id) => self.model.enum_ty(id),
                    UserDecl::Struct(id) => self.model.struct_ty(id),
                    UserDecl::Union(id) => self.model.union_ty(id),
                    UserDecl::Iface(id) => self.model.iface_ty(id),
                })
            }
            RawType::Compound(compound) => match compound {
                RawCompound::Array(elem) => {
                    let elem = self.resolve(pkg, elem, context)?;
                    Ok(self.model.array(elem))
                }
                RawCompound::Vector(elem) => {
                    let elem = self.resolve(pkg, elem, context)?;
                    Ok(self.model.vector(elem))
                }
                RawCompound::Map(key, value) => {
                    let key = self.resolve(pkg, key, context)?;
                    let value = self.resolve(pkg, value, context)?;
                    Ok(self.model.map(key, value))
                }
                RawCompound::Set(elem) => {
                    let elem = self.resolve(pkg, elem, context)?;
                    Ok(self.model.set(elem))
                }
                RawCompound::Optional(inner) => {
                    let inner = self.resolve(pkg, inner, context)?;
                    Ok(self.model.optional(inner))
                }
                RawCompound::Callback(cb) => {
                    let mut params = Vec::with_capacity(cb.params.len());
                    for param in &cb.params {
                        params.push(self.resolve(pkg, param, context)?);
                    }
                    let ret = match &cb.ret {
                        Some(ret) => Some(self.resolve(pkg, ret, context)?),
                        None => None,
                    };
                    Ok(self.model.callback(&params, ret))
                }
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
