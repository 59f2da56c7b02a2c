//! C ABI header generation.
//!
//! Per package:
//! - `include/{pkg}.abi.h` declares every package-level function
//! - `src/{pkg}.abi.c` defines interface identity objects
//!
//! Per struct and union, `.abi.0.h` forward-declares the C struct and
//! `.abi.1.h` defines it. Interfaces get three levels so that two
//! interfaces may mention each other without an include cycle:
//! - `.abi.0.h`: forward declarations of the object, ftable and vtable structs
//! - `.abi.1.h`: layouts, which only need forward-declared types
//! - `.abi.2.h`: inline static casts and method dispatch, which need
//!   complete types

use tidl_abi::decl::COMMON_HEADER;
use tidl_abi::{
    AbiError, AnalysisManager, GlobFuncAbiInfo, IfaceAbiInfo, IfaceMethodAbiInfo, NodeKey,
    PackageAbiInfo, StructAbiInfo, TypeAbiInfo, UnionAbiInfo,
};
use tidl_ir::{IfaceId, PackageId, Param, StructId, TypeId, UnionId};
use tracing::debug;

use crate::output::{FileKind, OutputManager};
use crate::writer::SourceWriter;
use crate::CodegenError;

/// Runtime header declaring `struct DataBlockHead`.
pub const OBJECT_HEADER: &str = "taihe/object.abi.h";

/// Which header level a signature needs for its types.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum HeaderLevel {
    /// Naming a type is enough (prototypes, struct pointers).
    Decl,
    /// The layout must be complete (definitions, by-value use).
    Defn,
}

impl HeaderLevel {
    fn headers(self, info: &TypeAbiInfo) -> &[String] {
        match self {
            HeaderLevel::Decl => &info.decl_headers,
            HeaderLevel::Defn => &info.defn_headers,
        }
    }
}

/// A C function signature in ABI form.
struct Signature {
    ret: String,
    /// `type name` pairs, receiver first.
    params: Vec<String>,
    /// Argument names in call order, receiver first.
    args: Vec<String>,
    headers: Vec<String>,
}

impl Signature {
    fn param_list(&self) -> String {
        if self.params.is_empty() {
            "void".to_string()
        } else {
            self.params.join(", ")
        }
    }

    fn arg_list(&self) -> String {
        self.args.join(", ")
    }

    fn is_void(&self) -> bool {
        self.ret == "void"
    }
}

pub struct AbiGenerator<'a, 'm> {
    am: &'a AnalysisManager<'m>,
    om: &'a mut OutputManager,
}

impl<'a, 'm> AbiGenerator<'a, 'm> {
    pub fn new(am: &'a AnalysisManager<'m>, om: &'a mut OutputManager) -> Self {
        Self { am, om }
    }

    /// Emit every ABI file for one package.
    pub fn generate_package(&mut self, pkg: PackageId) -> Result<(), CodegenError> {
        let decl = self.am.model().package(pkg);
        self.emit_package_header(pkg)?;
        self.emit_package_source(pkg)?;
        for &id in &decl.structs {
            self.emit_struct(id)?;
        }
        for &id in &decl.unions {
            self.emit_union(id)?;
        }
        for &id in &decl.interfaces {
            self.emit_iface(id)?;
        }
        debug!(package = %self.am.model().qualified_name(pkg.into()), "generated ABI files");
        Ok(())
    }

    fn type_abi(&self, ty: TypeId) -> Result<std::rc::Rc<TypeAbiInfo>, AbiError> {
        self.am.get::<TypeAbiInfo>(ty)
    }

    fn signature(
        &self,
        receiver: Option<&str>,
        params: &[Param],
        ret: Option<TypeId>,
        level: HeaderLevel,
    ) -> Result<Signature, AbiError> {
        let model = self.am.model();
        let mut sig = Signature {
            ret: "void".to_string(),
            params: Vec::with_capacity(params.len() + 1),
            args: Vec::with_capacity(params.len() + 1),
            headers: Vec::new(),
        };
        if let Some(receiver) = receiver {
            sig.params.push(format!("{receiver} tobj"));
            sig.args.push("tobj".to_string());
        }
        for param in params {
            let info = self.type_abi(param.ty)?;
            let name = model.name_str(param.name);
            sig.params.push(format!("{} {name}", info.as_param));
            sig.args.push(name.to_string());
            sig.headers.extend_from_slice(level.headers(&info));
        }
        if let Some(ret) = ret {
            let info = self.type_abi(ret)?;
            sig.ret.clone_from(&info.as_owner);
            sig.headers.extend_from_slice(level.headers(&info));
        }
        Ok(sig)
    }

    fn emit_package_header(&mut self, pkg: PackageId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let info = self.am.get::<PackageAbiInfo>(pkg)?;

        let mut w = SourceWriter::header();
        w.include(COMMON_HEADER);
        for &func in &model.package(pkg).functions {
            let decl = model.function(func);
            let abi = self.am.get::<GlobFuncAbiInfo>(func)?;
            let sig = self.signature(None, &decl.params, decl.return_ty, HeaderLevel::Decl)?;
            w.include_all(&sig.headers);
            w.writeln(&format!(
                "TH_EXPORT {} {}({});",
                sig.ret,
                abi.mangled_name,
                sig.param_list()
            ));
        }

        self.om.register(
            format!("include/{}", info.header),
            FileKind::AbiHeader,
            self.am.describe(NodeKey::from(pkg)),
            w.finish(),
        )
    }

    fn emit_package_source(&mut self, pkg: PackageId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let info = self.am.get::<PackageAbiInfo>(pkg)?;

        let mut w = SourceWriter::source();
        w.include(&info.header);
        for &iface in &model.package(pkg).interfaces {
            let abi = self.am.get::<IfaceAbiInfo>(iface)?;
            w.include(&abi.defn_header);
            w.writeln(&format!("void const* const {0} = &{0};", abi.iid));
        }

        self.om.register(
            format!("src/{}", info.source),
            FileKind::AbiSource,
            self.am.describe(NodeKey::from(pkg)),
            w.finish(),
        )
    }

    fn register_header(
        &mut self,
        name: &str,
        producer: NodeKey,
        w: SourceWriter,
    ) -> Result<(), CodegenError> {
        self.om.register(
            format!("include/{name}"),
            FileKind::AbiHeader,
            self.am.describe(producer),
            w.finish(),
        )
    }

    fn emit_struct(&mut self, id: StructId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let abi = self.am.get::<StructAbiInfo>(id)?;

        let mut decl = SourceWriter::header();
        decl.include(COMMON_HEADER);
        decl.writeln(&format!("{};", abi.as_owner));
        self.register_header(&abi.decl_header, id.into(), decl)?;

        let mut defn = SourceWriter::header();
        defn.include(&abi.decl_header);
        let mut fields = Vec::new();
        for field in &model.struct_decl(id).fields {
            let info = self.type_abi(field.ty)?;
            defn.include_all(&info.defn_headers);
            fields.push(format!("{} {};", info.as_owner, model.name_str(field.name)));
        }
        defn.block(&format!("{} {{", abi.as_owner), "};", |w| {
            for field in &fields {
                w.writeln(field);
            }
        });
        self.register_header(&abi.defn_header, id.into(), defn)
    }

    fn emit_union(&mut self, id: UnionId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let abi = self.am.get::<UnionAbiInfo>(id)?;

        let mut decl = SourceWriter::header();
        decl.include(COMMON_HEADER);
        decl.writeln(&format!("{};", abi.as_owner));
        self.register_header(&abi.decl_header, id.into(), decl)?;

        let mut defn = SourceWriter::header();
        defn.include(&abi.decl_header);
        let mut payload = Vec::new();
        for field in &model.union_decl(id).fields {
            // Tag-only fields carry no payload.
            let Some(ty) = field.ty else { continue };
            let info = self.type_abi(ty)?;
            defn.include_all(&info.defn_headers);
            payload.push(format!("{} {};", info.as_owner, model.name_str(field.name)));
        }
        if !payload.is_empty() {
            defn.block(&format!("union {} {{", abi.union_name), "};", |w| {
                for field in &payload {
                    w.writeln(field);
                }
            });
        }
        defn.block(&format!("{} {{", abi.as_owner), "};", |w| {
            w.writeln(&format!("{} m_tag;", abi.tag_type));
            if !payload.is_empty() {
                w.writeln(&format!("union {} m_data;", abi.union_name));
            }
        });
        self.register_header(&abi.defn_header, id.into(), defn)
    }

    fn emit_iface(&mut self, id: IfaceId) -> Result<(), CodegenError> {
        let model = self.am.model();
        let abi = self.am.get::<IfaceAbiInfo>(id)?;

        let mut fwd = SourceWriter::header();
        fwd.include(OBJECT_HEADER);
        fwd.writeln(&format!("struct {};", abi.ftable));
        fwd.writeln(&format!("struct {};", abi.vtable));
        fwd.writeln(&format!("{};", abi.as_owner));
        self.register_header(&abi.decl_header, id.into(), fwd)?;

        // Level 1: layouts.
        let mut defn = SourceWriter::header();
        defn.include(&abi.decl_header);

        let methods = &model.iface(id).methods;
        let mut ftable_fields = Vec::with_capacity(methods.len());
        for &method in methods {
            let decl = model.method(method);
            let method_abi = self.am.get::<IfaceMethodAbiInfo>(method)?;
            let sig = self.signature(
                Some(&abi.as_param),
                &decl.params,
                decl.return_ty,
                HeaderLevel::Decl,
            )?;
            defn.include_all(&sig.headers);
            ftable_fields.push(format!(
                "{} (*{})({});",
                sig.ret,
                method_abi.ftbl_field,
                sig.param_list()
            ));
        }

        let mut slots = Vec::with_capacity(abi.ancestor_list.len());
        for entry in &abi.ancestor_list {
            let ancestor = self.am.get::<IfaceAbiInfo>(entry.iface)?;
            defn.include(&ancestor.decl_header);
            slots.push(format!("struct {} const* {};", ancestor.ftable, entry.slot));
        }

        defn.block(&format!("struct {} {{", abi.ftable), "};", |w| {
            for field in &ftable_fields {
                w.writeln(field);
            }
        });
        defn.block(&format!("struct {} {{", abi.vtable), "};", |w| {
            for slot in &slots {
                w.writeln(slot);
            }
        });
        defn.writeln(&format!("TH_EXPORT void const* const {};", abi.iid));
        defn.block(&format!("{} {{", abi.as_owner), "};", |w| {
            w.writeln(&format!("struct {} const* vtbl_ptr;", abi.vtable));
            w.writeln("struct DataBlockHead* data_ptr;");
        });
        defn.writeln(&format!(
            "TH_EXPORT {} {}(struct DataBlockHead* data_ptr);",
            abi.as_owner, abi.dynamic_cast
        ));
        self.register_header(&abi.defn_header, id.into(), defn)?;

        // Level 2: inline operations.
        let mut ops = SourceWriter::header();
        ops.include(&abi.defn_header);

        for (ancestor_id, entry) in abi.ancestor_dict.iter() {
            let ancestor = self.am.get::<IfaceAbiInfo>(ancestor_id)?;
            ops.include(&ancestor.defn_header);
            ops.block(
                &format!(
                    "TH_INLINE {} {}({} tobj) {{",
                    ancestor.as_owner, entry.static_cast, abi.as_param
                ),
                "}",
                |w| {
                    w.writeln(&format!("{} result;", ancestor.as_owner));
                    w.writeln(&format!(
                        "result.vtbl_ptr = (struct {} const*)((void const* const*)tobj.vtbl_ptr + {});",
                        ancestor.vtable, entry.offset
                    ));
                    w.writeln("result.data_ptr = tobj.data_ptr;");
                    w.writeln("return result;");
                },
            );
        }

        let self_slot = abi
            .ancestor_list
            .first()
            .map_or("ftbl_ptr_0", |entry| entry.slot.as_str());
        for &method in methods {
            let decl = model.method(method);
            let method_abi = self.am.get::<IfaceMethodAbiInfo>(method)?;
            let sig = self.signature(
                Some(&abi.as_param),
                &decl.params,
                decl.return_ty,
                HeaderLevel::Defn,
            )?;
            ops.include_all(&sig.headers);
            let call = format!(
                "tobj.vtbl_ptr->{self_slot}->{}({});",
                method_abi.ftbl_field,
                sig.arg_list()
            );
            ops.block(
                &format!(
                    "TH_INLINE {} {}({}) {{",
                    sig.ret,
                    method_abi.mangled_name,
                    sig.param_list()
                ),
                "}",
                |w| {
                    if sig.is_void() {
                        w.writeln(&call);
                    } else {
                        w.writeln(&format!("return {call}"));
                    }
                },
            );
        }
        self.register_header(&abi.ops_header, id.into(), ops)
    }
}
