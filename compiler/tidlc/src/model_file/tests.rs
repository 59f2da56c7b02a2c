use pretty_assertions::assert_eq;

use tidl_ir::{DeclRef, Type};

use super::*;

const SHAPES: &str = r#"{
  "packages": [
    {
      "name": "demo",
      "enums": [{ "name": "Color", "items": [{ "name": "RED" }, { "name": "GREEN", "value": 5 }, { "name": "BLUE" }] }],
      "structs": [{ "name": "Point", "fields": [{ "name": "x", "type": "f64" }, { "name": "y", "type": "f64" }] }],
      "unions": [{ "name": "Value", "fields": [{ "name": "text", "type": "string" }, { "name": "empty" }] }],
      "interfaces": [
        { "name": "A", "methods": [{ "name": "name", "returns": "string" }] },
        { "name": "B", "parents": ["A"] },
        { "name": "C", "parents": ["demo.A"] },
        { "name": "D", "parents": ["B", "C"], "methods": [{ "name": "area", "params": [{ "name": "scale", "type": "f64" }], "returns": "f64" }] }
      ],
      "functions": [
        { "name": "center", "params": [{ "name": "p", "type": "Point" }], "returns": "demo.Point" },
        { "name": "lookup", "params": [{ "name": "t", "type": { "map": ["string", { "vector": "i32" }] } }], "returns": { "optional": "Color" } },
        { "name": "watch", "params": [{ "name": "cb", "type": { "callback": { "params": ["D"], "ret": "bool" } } }] }
      ]
    }
  ]
}"#;

/// The error from loading `json`.
fn parse_error(json: &str) -> ModelFileError {
    let Err(err) = parse_model(json) else {
        panic!("model loaded: {json}");
    };
    err
}

#[test]
fn loads_declarations_in_file_order() {
    let model = parse_model(SHAPES).unwrap();
    let pkg = model.package_ids().next().unwrap();
    let decl = model.package(pkg);
    assert_eq!(decl.interfaces.len(), 4);
    assert_eq!(decl.functions.len(), 3);

    let d = decl.interfaces[3];
    assert_eq!(model.qualified_name(DeclRef::Iface(d)), "demo.D");
    assert_eq!(model.iface(d).parents, vec![decl.interfaces[1], decl.interfaces[2]]);
    assert_eq!(model.iface(decl.interfaces[2]).parents, vec![decl.interfaces[0]]);
}

#[test]
fn enum_values_default_to_successor() {
    let model = parse_model(SHAPES).unwrap();
    let pkg = model.package_ids().next().unwrap();
    let color = model.package(pkg).enums[0];
    let values: Vec<i64> = model.enum_decl(color).items.iter().map(|i| i.value).collect();
    assert_eq!(values, vec![0, 5, 6]);
}

#[test]
fn resolves_compound_and_user_types() {
    let model = parse_model(SHAPES).unwrap();
    let pkg = model.package_ids().next().unwrap();
    let decl = model.package(pkg);

    let center = model.function(decl.functions[0]);
    assert_eq!(model.ty(center.params[0].ty), &Type::Struct(decl.structs[0]));
    assert_eq!(center.return_ty, Some(center.params[0].ty));

    let lookup = model.function(decl.functions[1]);
    let Type::Map(key, value) = model.ty(lookup.params[0].ty) else {
        panic!("expected a map");
    };
    assert_eq!(model.ty(*key), &Type::String);
    assert!(matches!(model.ty(*value), Type::Vector(_)));

    let watch = model.function(decl.functions[2]);
    assert_eq!(watch.return_ty, None);
    assert!(matches!(model.ty(watch.params[0].ty), Type::Callback { params, ret: Some(_) } if params.len() == 1));

    let value = model.union_decl(decl.unions[0]);
    assert_eq!(value.fields[1].ty, None);
}

#[test]
fn unknown_type_is_unresolved() {
    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "structs": [{ "name": "S", "fields": [{ "name": "f", "type": "Missing" }] }] }] }"#,
    );
    assert_eq!(err.error_code(), ErrorCode::E1002);
    assert_eq!(err.to_string(), "unresolved type `Missing` in field `f` of p.S");
}

#[test]
fn parent_must_be_an_interface() {
    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "structs": [{ "name": "S" }], "interfaces": [{ "name": "I", "parents": ["S"] }] }] }"#,
    );
    assert!(matches!(err, ModelFileError::NotAnInterface { .. }), "{err}");
}

#[test]
fn duplicate_names_are_rejected() {
    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "structs": [{ "name": "X" }], "interfaces": [{ "name": "X" }] }] }"#,
    );
    assert_eq!(err.error_code(), ErrorCode::E1004);
    assert_eq!(err.to_string(), "`p.X` is declared more than once");

    let err = parse_error(r#"{ "packages": [{ "name": "p" }, { "name": "p" }] }"#);
    assert!(matches!(err, ModelFileError::Duplicate { name } if name == "p"));
}

#[test]
fn duplicate_functions_and_methods_are_rejected() {
    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "functions": [
            { "name": "f" },
            { "name": "f", "params": [{ "name": "x", "type": "i32" }] }
        ] }] }"#,
    );
    assert_eq!(err.error_code(), ErrorCode::E1004);
    assert_eq!(err.to_string(), "`p.f` is declared more than once");

    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "interfaces": [
            { "name": "I", "methods": [{ "name": "m" }, { "name": "m" }] }
        ] }] }"#,
    );
    assert_eq!(err.to_string(), "`p.I.m` is declared more than once");
}

#[test]
fn duplicate_members_are_rejected() {
    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "structs": [
            { "name": "S", "fields": [{ "name": "x", "type": "i32" }, { "name": "x", "type": "f64" }] }
        ] }] }"#,
    );
    assert!(matches!(err, ModelFileError::Duplicate { name } if name == "p.S.x"));

    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "unions": [
            { "name": "U", "fields": [{ "name": "none" }, { "name": "none" }] }
        ] }] }"#,
    );
    assert!(matches!(err, ModelFileError::Duplicate { name } if name == "p.U.none"));

    let err = parse_error(
        r#"{ "packages": [{ "name": "p", "enums": [
            { "name": "E", "items": [{ "name": "A" }, { "name": "A", "value": 3 }] }
        ] }] }"#,
    );
    assert!(matches!(err, ModelFileError::Duplicate { name } if name == "p.E.A"));
}

#[test]
fn same_member_name_in_different_owners_is_fine() {
    let model = parse_model(
        r#"{ "packages": [
            { "name": "p", "functions": [{ "name": "f" }],
              "interfaces": [{ "name": "I", "methods": [{ "name": "f" }] }, { "name": "J", "methods": [{ "name": "f" }] }] },
            { "name": "q", "functions": [{ "name": "f" }] }
        ] }"#,
    )
    .unwrap();
    assert_eq!(model.iface_ids().count(), 2);
}

#[test]
fn malformed_json_reports_position() {
    let err = parse_error("{ \"packages\": [ }");
    assert_eq!(err.error_code(), ErrorCode::E1001);
    let diag = err.to_diagnostic();
    assert!(diag.location.unwrap().starts_with("line 1, column"));
}

#[test]
fn cross_package_references_resolve_in_any_order() {
    let model = parse_model(
        r#"{ "packages": [
            { "name": "app", "interfaces": [{ "name": "Leaf", "parents": ["base.Root"] }] },
            { "name": "base", "interfaces": [{ "name": "Root" }] }
        ] }"#,
    )
    .unwrap();
    let leaf = model.iface_ids().next().unwrap();
    let root = model.iface(leaf).parents[0];
    assert_eq!(model.qualified_name(root.into()), "base.Root");
}

#[test]
fn missing_file_is_unreadable() {
    let Err(err) = load_model(Path::new("/nonexistent/model.json")) else {
        panic!("nonexistent file loaded");
    };
    assert_eq!(err.error_code(), ErrorCode::E1003);
}
