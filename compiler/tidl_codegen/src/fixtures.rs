//! Shared test model.

use tidl_ir::{FuncId, IfaceId, Model, ScalarKind};

pub(crate) struct Demo {
    pub model: Model,
    pub ifaces: [IfaceId; 4],
    pub add: FuncId,
}

/// Package `demo` with a diamond of interfaces, a struct, a union, an
/// enum, and functions over most type shapes.
///
/// `A { name() -> string }`, `B: A { poke(x: i32) }`,
/// `C: A { ready() -> bool }`, `D: B, C { area(scale: f64) -> f64 }`.
pub(crate) fn demo() -> Demo {
    let mut model = Model::new();
    let pkg = model.add_package("demo");

    let i32_ty = model.scalar(ScalarKind::I32);
    let f64_ty = model.scalar(ScalarKind::F64);
    let bool_ty = model.scalar(ScalarKind::Bool);
    let string = model.string();

    let a = model.add_interface(pkg, "A");
    let b = model.add_interface(pkg, "B");
    let c = model.add_interface(pkg, "C");
    let d = model.add_interface(pkg, "D");
    model.add_parent(b, a);
    model.add_parent(c, a);
    model.add_parent(d, b);
    model.add_parent(d, c);
    model.add_method(a, "name", &[], Some(string));
    model.add_method(b, "poke", &[("x", i32_ty)], None);
    model.add_method(c, "ready", &[], Some(bool_ty));
    model.add_method(d, "area", &[("scale", f64_ty)], Some(f64_ty));

    let point = model.add_struct(pkg, "Point");
    model.add_struct_field(point, "x", f64_ty);
    model.add_struct_field(point, "y", f64_ty);
    let point_ty = model.struct_ty(point);

    let value = model.add_union(pkg, "Value");
    model.add_union_field(value, "text", Some(string));
    model.add_union_field(value, "empty", None);

    let color = model.add_enum(pkg, "Color", &[("RED", 0), ("GREEN", 1)]);
    let color_ty = model.enum_ty(color);
    let d_ty = model.iface_ty(d);
    let ints = model.vector(i32_ty);
    let table = model.map(string, ints);
    let maybe_color = model.optional(color_ty);

    let add = model.add_function(pkg, "add", &[("a", i32_ty), ("b", i32_ty)], Some(i32_ty));
    model.add_function(pkg, "greet", &[("who", string)], None);
    model.add_function(pkg, "center", &[("p", point_ty)], Some(point_ty));
    model.add_function(pkg, "lookup", &[("t", table)], Some(maybe_color));
    model.add_function(pkg, "make_shape", &[], Some(d_ty));

    Demo {
        model,
        ifaces: [a, b, c, d],
        add,
    }
}
