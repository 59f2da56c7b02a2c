//! C++ implementation glue and author stubs.
//!
//! Per package:
//! - `include/{pkg}.impl.hpp`: one `TH_EXPORT_CPP_API_{name}` macro per
//!   global function, defining the ABI symbol on top of the author's C++
//!   function, and an include of every interface's impl header
//! - `include/{pkg}.{Name}.impl.hpp` per interface: the ftable trampolines,
//!   the filled ftable and the filled vtable template. It includes only its
//!   parents' impl headers, so the include graph follows inheritance and
//!   stays acyclic across packages.
//! - `author/{pkg}.impl.cpp`: a starting point for the author, with one
//!   implementation class per interface and one stub per global function
//!
//! Implementation classes cover the unique ancestor surface
//! (`ancestor_dict`), so a diamond never yields two stubs for one method.
//! The vtable template reproduces the full `ancestor_list`, duplicates
//! included.

use tidl_abi::{
    AbiError, AnalysisManager, GlobFuncAbiInfo, IfaceAbiInfo, IfaceMethodAbiInfo, NodeKey,
    PackageAbiInfo, TypeAbiInfo,
};
use rustc_hash::FxHashSet;
use tidl_ir::{IfaceId, PackageId, Param, TypeId};
use tracing::debug;

use crate::cpp::{
    GlobFuncCppInfo, IfaceCppInfo, IfaceMethodCppInfo, PackageCppInfo, TypeCppInfo,
    COMMON_CPP_HEADER,
};
use crate::output::{FileKind, OutputManager};
use crate::writer::SourceWriter;
use crate::CodegenError;

/// Runtime header providing `TH_THROW`.
pub const RUNTIME_HEADER: &str = "taihe/runtime.hpp";

/// One parameter seen from both sides of the ABI.
struct BridgeParam {
    name: &'static str,
    abi: String,
    cpp: String,
}

/// A signature in ABI and C++ form.
struct Bridge {
    params: Vec<BridgeParam>,
    /// `(abi owner, cpp owner)` of the return type.
    ret: Option<(String, String)>,
    abi_headers: Vec<String>,
    cpp_headers: Vec<String>,
}

impl Bridge {
    fn abi_ret(&self) -> &str {
        self.ret.as_ref().map_or("void", |(abi, _)| abi.as_str())
    }

    fn cpp_ret(&self) -> &str {
        self.ret.as_ref().map_or("void", |(_, cpp)| cpp.as_str())
    }

    /// `type name, ...` in ABI form, after an optional receiver.
    fn abi_params(&self, receiver: Option<&str>) -> String {
        let params: Vec<String> = receiver
            .map(|r| format!("{r} tobj"))
            .into_iter()
            .chain(self.params.iter().map(|p| format!("{} {}", p.abi, p.name)))
            .collect();
        if params.is_empty() {
            "void".to_string()
        } else {
            params.join(", ")
        }
    }

    fn cpp_params(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("{} {}", p.cpp, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Arguments converted from ABI to C++ form.
    fn from_abi_args(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("::taihe::from_abi<{}>({})", p.cpp, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The statement running `call`, converting its result back to ABI form.
    fn return_stmt(&self, call: &str) -> String {
        match &self.ret {
            Some((_, cpp)) => format!("return ::taihe::into_abi<{cpp}>({call});"),
            None => format!("{call};"),
        }
    }
}

pub struct CppImplGenerator<'a, 'm> {
    am: &'a AnalysisManager<'m>,
    om: &'a mut OutputManager,
}

impl<'a, 'm> CppImplGenerator<'a, 'm> {
    pub fn new(am: &'a AnalysisManager<'m>, om: &'a mut OutputManager) -> Self {
        Self { am, om }
    }

    fn bridge(&self, params: &[Param], ret: Option<TypeId>) -> Result<Bridge, AbiError> {
        let model = self.am.model();
        let mut bridge = Bridge {
            params: Vec::with_capacity(params.len()),
            ret: None,
            abi_headers: Vec::new(),
            cpp_headers: Vec::new(),
        };
        for param in params {
            let abi = self.am.get::<TypeAbiInfo>(param.ty)?;
            let cpp = self.am.get::<TypeCppInfo>(param.ty)?;
            bridge.abi_headers.extend_from_slice(&abi.defn_headers);
            bridge.cpp_headers.extend_from_slice(&cpp.headers);
            bridge.params.push(BridgeParam {
                name: model.name_str(param.name),
                abi: abi.as_param.clone(),
                cpp: cpp.as_param.clone(),
            });
        }
        if let Some(ret) = ret {
            let abi = self.am.get::<TypeAbiInfo>(ret)?;
            let cpp = self.am.get::<TypeCppInfo>(ret)?;
            bridge.abi_headers.extend_from_slice(&abi.defn_headers);
            bridge.cpp_headers.extend_from_slice(&cpp.headers);
            bridge.ret = Some((abi.as_owner.clone(), cpp.as_owner.clone()));
        }
        Ok(bridge)
    }

    /// Emit `include/{pkg}.impl.hpp`.
    pub fn generate_impl_header(&mut self, pkg: PackageId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let abi_pkg = self.am.get::<PackageAbiInfo>(pkg)?;
        let cpp_pkg = self.am.get::<PackageCppInfo>(pkg)?;

        let mut w = SourceWriter::header();
        w.include(&abi_pkg.header);
        w.include(COMMON_CPP_HEADER);

        for &func in &model.package(pkg).functions {
            let decl = model.function(func);
            let abi = self.am.get::<GlobFuncAbiInfo>(func)?;
            let cpp = self.am.get::<GlobFuncCppInfo>(func)?;
            let bridge = self.bridge(&decl.params, decl.return_ty)?;
            w.include_all(&bridge.abi_headers);
            w.include_all(&bridge.cpp_headers);

            let call = format!("CPP_FUNC_IMPL({})", bridge.from_abi_args());
            w.separator();
            w.writeln(&format!("#define {}(CPP_FUNC_IMPL) \\", cpp.export_macro));
            w.indent();
            w.writeln(&format!(
                "{} {}({}) {{ \\",
                bridge.abi_ret(),
                abi.mangled_name,
                bridge.abi_params(None)
            ));
            w.indent();
            w.writeln(&format!("{} \\", bridge.return_stmt(&call)));
            w.dedent();
            w.writeln("}");
            w.dedent();
        }

        for iface in self.interfaces_parents_first(pkg)? {
            w.include(&self.am.get::<IfaceCppInfo>(iface)?.impl_header);
            self.generate_iface_impl_header(iface)?;
        }

        self.om.register(
            format!("include/{}", cpp_pkg.impl_header),
            FileKind::CppHeader,
            self.am.describe(NodeKey::from(pkg)),
            w.finish(),
        )
    }

    /// Interfaces of `pkg`, every same-package ancestor before its
    /// descendants, otherwise in declaration order.
    fn interfaces_parents_first(&self, pkg: PackageId) -> Result<Vec<IfaceId>, AbiError> {
        let model = self.am.model();
        let mut order = Vec::with_capacity(model.package(pkg).interfaces.len());
        let mut placed = FxHashSet::default();
        for &iface in &model.package(pkg).interfaces {
            let abi = self.am.get::<IfaceAbiInfo>(iface)?;
            // All ancestors of an entry follow its last occurrence.
            for entry in abi.ancestor_list.iter().rev() {
                if model.iface(entry.iface).package == pkg && placed.insert(entry.iface) {
                    order.push(entry.iface);
                }
            }
        }
        Ok(order)
    }

    /// Emit `include/{pkg}.{Name}.impl.hpp`: trampolines, filled ftable and
    /// filled vtable for one interface.
    fn generate_iface_impl_header(&mut self, id: IfaceId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let decl = model.iface(id);
        let abi = self.am.get::<IfaceAbiInfo>(id)?;
        let cpp = self.am.get::<IfaceCppInfo>(id)?;

        let mut w = SourceWriter::header();
        w.include(&abi.defn_header);
        w.include(COMMON_CPP_HEADER);
        for &parent in &decl.parents {
            w.include(&self.am.get::<IfaceCppInfo>(parent)?.impl_header);
        }

        let mut trampolines = Vec::with_capacity(decl.methods.len());
        for &method in &decl.methods {
            let m = model.method(method);
            let field = self.am.get::<IfaceMethodAbiInfo>(method)?;
            let name = self.am.get::<IfaceMethodCppInfo>(method)?;
            let bridge = self.bridge(&m.params, m.return_ty)?;
            w.include_all(&bridge.abi_headers);
            w.include_all(&bridge.cpp_headers);
            let call = format!(
                "::taihe::impl_cast<Impl>(tobj.data_ptr)->{}({})",
                name.call_name,
                bridge.from_abi_args()
            );
            trampolines.push((field.ftbl_field.clone(), bridge, call));
        }

        w.separator();
        w.writeln("template <typename Impl>");
        w.block(&format!("struct {} {{", cpp.ftable_impl), "};", |w| {
            for (field, bridge, call) in &trampolines {
                w.block(
                    &format!(
                        "static {} {field}({}) {{",
                        bridge.abi_ret(),
                        bridge.abi_params(Some(abi.as_param.as_str()))
                    ),
                    "}",
                    |w| w.writeln(&bridge.return_stmt(call)),
                );
            }
        });

        w.separator();
        w.writeln("template <typename Impl>");
        w.block(
            &format!("constexpr struct {} {} = {{", abi.ftable, cpp.ftable_of),
            "};",
            |w| {
                for (field, _, _) in &trampolines {
                    w.writeln(&format!(".{field} = &{}<Impl>::{field},", cpp.ftable_impl));
                }
            },
        );

        // Every slot, duplicates included, points at its ancestor's table.
        let mut slots = Vec::with_capacity(abi.ancestor_list.len());
        for entry in &abi.ancestor_list {
            let ancestor = self.am.get::<IfaceCppInfo>(entry.iface)?;
            slots.push(format!(".{} = &{}<Impl>,", entry.slot, ancestor.ftable_of));
        }
        w.separator();
        w.writeln("template <typename Impl>");
        w.block(
            &format!("constexpr struct {} {} = {{", abi.vtable, cpp.vtable_of),
            "};",
            |w| {
                for slot in &slots {
                    w.writeln(slot);
                }
            },
        );

        self.om.register(
            format!("include/{}", cpp.impl_header),
            FileKind::CppHeader,
            self.am.describe(NodeKey::from(id)),
            w.finish(),
        )
    }

    /// Emit `author/{pkg}.impl.cpp`.
    pub fn generate_stubs(&mut self, pkg: PackageId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let cpp_pkg = self.am.get::<PackageCppInfo>(pkg)?;

        let mut w = SourceWriter::source();
        w.include(&cpp_pkg.impl_header);
        w.include(RUNTIME_HEADER);
        w.writeln("namespace {");

        for &iface in &model.package(pkg).interfaces {
            w.separator();
            self.emit_impl_class(&mut w, iface)?;
        }

        let mut exports = Vec::new();
        for &func in &model.package(pkg).functions {
            let decl = model.function(func);
            let cpp = self.am.get::<GlobFuncCppInfo>(func)?;
            let bridge = self.bridge(&decl.params, decl.return_ty)?;
            w.include_all(&bridge.cpp_headers);
            w.separator();
            emit_stub(&mut w, &cpp.call_name, &bridge);
            exports.push(format!("{}({});", cpp.export_macro, cpp.call_name));
        }

        w.separator();
        w.writeln("}  // namespace");
        if !exports.is_empty() {
            w.separator();
            for export in &exports {
                w.writeln(export);
            }
        }

        debug!(
            package = %model.qualified_name(pkg.into()),
            functions = exports.len(),
            "generated author stubs"
        );
        self.om.register(
            format!("author/{}", cpp_pkg.author_source),
            FileKind::CppSource,
            self.am.describe(NodeKey::from(pkg)),
            w.finish(),
        )
    }

    /// `class XImpl` with one stub per method of each unique ancestor.
    fn emit_impl_class(&self, w: &mut SourceWriter, id: IfaceId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let abi = self.am.get::<IfaceAbiInfo>(id)?;
        let cpp = self.am.get::<IfaceCppInfo>(id)?;

        let mut stubs = Vec::new();
        for ancestor in abi.ancestor_dict.keys() {
            for &method in &model.iface(ancestor).methods {
                let m = model.method(method);
                let name = self.am.get::<IfaceMethodCppInfo>(method)?;
                let bridge = self.bridge(&m.params, m.return_ty)?;
                w.include_all(&bridge.cpp_headers);
                stubs.push((name.call_name.clone(), bridge));
            }
        }

        w.writeln(&format!("class {} {{", cpp.impl_class));
        w.writeln("public:");
        w.indent();
        for (i, (name, bridge)) in stubs.iter().enumerate() {
            if i > 0 {
                w.newline();
            }
            emit_stub(w, name, bridge);
        }
        w.dedent();
        w.writeln("};");
        Ok(())
    }
}

/// A function body that throws until the author fills it in.
fn emit_stub(w: &mut SourceWriter, name: &str, bridge: &Bridge) {
    w.block(
        &format!("{} {name}({}) {{", bridge.cpp_ret(), bridge.cpp_params()),
        "}",
        |w| w.writeln(&format!("TH_THROW(std::runtime_error, \"{name} not implemented\");")),
    );
}
