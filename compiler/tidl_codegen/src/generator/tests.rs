use pretty_assertions::assert_eq;

use tidl_ir::ScalarKind;

use super::*;
use crate::fixtures::demo;
use crate::FileKind;

fn snapshot(om: &OutputManager) -> Vec<(String, String)> {
    om.iter()
        .map(|(path, file)| (path.to_string(), file.text.clone()))
        .collect()
}

#[test]
fn generation_is_idempotent() {
    let demo = demo();
    let config = CodegenConfig::default();
    let first = generate(&demo.model, &config).unwrap();
    let second = generate(&demo.model, &config).unwrap();
    assert_eq!(snapshot(&first), snapshot(&second));
}

#[test]
fn default_config_runs_every_backend() {
    let demo = demo();
    let om = generate(&demo.model, &CodegenConfig::default()).unwrap();
    for kind in [
        FileKind::AbiHeader,
        FileKind::AbiSource,
        FileKind::CppHeader,
        FileKind::CppSource,
    ] {
        assert!(om.iter().any(|(_, f)| f.kind == kind), "{kind:?}");
    }
    assert!(om.get("author/demo.impl.cpp").is_some());
}

#[test]
fn disabled_backends_emit_nothing() {
    let demo = demo();
    let config = CodegenConfig {
        emit_abi: false,
        emit_cpp_impl: false,
        emit_stubs: true,
    };
    let om = generate(&demo.model, &config).unwrap();
    let paths: Vec<&str> = om.paths().collect();
    assert_eq!(paths, vec!["author/demo.impl.cpp"]);
}

#[test]
fn shared_cache_computes_each_record_once() {
    let demo = demo();
    let am = AnalysisManager::new(&demo.model);
    generate_with(&am, &CodegenConfig::default()).unwrap();
    let computed = am.stats().computed;
    assert!(am.stats().hits > 0);

    // A second run is served entirely from the cache.
    generate_with(&am, &CodegenConfig::default()).unwrap();
    assert_eq!(am.stats().computed, computed);
    for iface in demo.ifaces {
        assert_eq!(am.constructions_of::<tidl_abi::IfaceAbiInfo>(iface), 1);
    }
}

#[test]
fn colliding_type_names_are_reported_with_both_producers() {
    let mut model = Model::new();
    let pkg = model.add_package("p");
    let f32_ty = model.scalar(ScalarKind::F32);
    let st = model.add_struct(pkg, "X");
    model.add_struct_field(st, "v", f32_ty);
    model.add_interface(pkg, "X");

    let err = generate(&model, &CodegenConfig::default()).unwrap_err();
    match err {
        CodegenError::RegistrationConflict {
            path,
            first,
            second,
        } => {
            assert_eq!(path, "include/p.X.abi.0.h");
            assert_eq!(first, "struct p.X");
            assert_eq!(second, "interface p.X");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cyclic_inheritance_surfaces_as_abi_error() {
    let mut model = Model::new();
    let pkg = model.add_package("p");
    let a = model.add_interface(pkg, "A");
    let b = model.add_interface(pkg, "B");
    model.add_parent(a, b);
    model.add_parent(b, a);

    let err = generate(&model, &CodegenConfig::default()).unwrap_err();
    assert!(matches!(err, CodegenError::Abi(_)), "{err}");
    assert_eq!(err.error_code(), tidl_diagnostic::ErrorCode::E9001);
}
