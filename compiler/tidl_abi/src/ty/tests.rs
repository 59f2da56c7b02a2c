use pretty_assertions::assert_eq;

use tidl_ir::{Model, ScalarKind};

use super::*;

fn abi(am: &AnalysisManager<'_>, ty: TypeId) -> TypeAbiInfo {
    TypeAbiInfo::clone(&am.get::<TypeAbiInfo>(ty).unwrap())
}

#[test]
fn scalar_owner_and_param_forms_match() {
    let mut model = Model::new();
    let ids: Vec<_> = ScalarKind::ALL.iter().map(|&k| model.scalar(k)).collect();
    let am = AnalysisManager::new(&model);
    for (&kind, &ty) in ScalarKind::ALL.iter().zip(&ids) {
        let info = abi(&am, ty);
        assert_eq!(info.as_owner, info.as_param, "{kind}");
        assert_eq!(info.as_owner, scalar_c_type(kind));
        assert_eq!(info.decl_headers, vec![COMMON_HEADER.to_string()]);
    }
}

#[test]
fn scalar_c_spellings() {
    assert_eq!(scalar_c_type(ScalarKind::Bool), "bool");
    assert_eq!(scalar_c_type(ScalarKind::U16), "uint16_t");
    assert_eq!(scalar_c_type(ScalarKind::F64), "double");
}

#[test]
fn runtime_types() {
    let mut model = Model::new();
    let i8_ty = model.scalar(ScalarKind::I8);
    let s = model.string();
    let cases = [
        (s, "struct TString", "taihe/string.abi.h"),
        (model.opaque(), "uintptr_t", "taihe/common.h"),
        (model.array(i8_ty), "struct TArray", "taihe/array.abi.h"),
        (model.vector(i8_ty), "struct TVector*", "taihe/vector.abi.h"),
        (model.map(s, i8_ty), "struct TMap*", "taihe/map.abi.h"),
        (model.set(s), "struct TSet*", "taihe/set.abi.h"),
        (model.optional(s), "struct TOptional", "taihe/optional.abi.h"),
        (
            model.callback(&[s], Some(i8_ty)),
            "struct TCallback",
            "taihe/callback.abi.h",
        ),
    ];
    let am = AnalysisManager::new(&model);
    for (ty, c_type, header) in cases {
        let info = abi(&am, ty);
        assert_eq!(info.as_owner, c_type);
        assert_eq!(info.as_param, c_type);
        assert_eq!(info.decl_headers, vec![header.to_string()]);
        assert_eq!(info.defn_headers, info.decl_headers);
    }
}

#[test]
fn user_types_republish_declaration_records() {
    let mut model = Model::new();
    let pkg = model.add_package("geo");
    let st = model.add_struct(pkg, "Point");
    let un = model.add_union(pkg, "Shape");
    let en = model.add_enum(pkg, "Color", &[("RED", 0)]);
    let iface = model.add_interface(pkg, "Canvas");
    let st_ty = model.struct_ty(st);
    let un_ty = model.union_ty(un);
    let en_ty = model.enum_ty(en);
    let iface_ty = model.iface_ty(iface);

    let am = AnalysisManager::new(&model);

    let st_info = abi(&am, st_ty);
    let st_decl = am.get::<StructAbiInfo>(st).unwrap();
    assert_eq!(st_info.as_owner, st_decl.as_owner);
    assert_eq!(st_info.as_param, "struct tidlT3_geo5_Point const*");
    assert_eq!(st_info.decl_headers, vec!["geo.Point.abi.0.h".to_string()]);
    assert_eq!(st_info.defn_headers, vec!["geo.Point.abi.1.h".to_string()]);

    let un_info = abi(&am, un_ty);
    assert_eq!(un_info.as_owner, "struct tidlT3_geo5_Shape");

    let en_info = abi(&am, en_ty);
    assert_eq!(en_info.as_owner, "int32_t");
    assert_eq!(en_info.as_param, "int32_t");

    let iface_info = abi(&am, iface_ty);
    assert_eq!(iface_info.as_owner, "struct tidlT3_geo6_Canvas");
    assert_eq!(iface_info.as_param, iface_info.as_owner);
    assert_eq!(iface_info.defn_headers, vec!["geo.Canvas.abi.1.h".to_string()]);

    // The declaration record was reused, not rebuilt.
    assert_eq!(am.constructions_of::<StructAbiInfo>(st), 1);
}

#[test]
fn cyclic_interface_type_propagates_error() {
    let mut model = Model::new();
    let pkg = model.add_package("demo");
    let a = model.add_interface(pkg, "A");
    model.add_parent(a, a);
    let ty = model.iface_ty(a);

    let am = AnalysisManager::new(&model);
    assert!(matches!(
        am.get::<TypeAbiInfo>(ty),
        Err(AbiError::CyclicAnalysis { .. })
    ));
}
