//! The declaration arena.
//!
//! `Model` is the sole owner of every package, declaration and type in one
//! compilation run. All cross references are arena IDs.

use smallvec::SmallVec;

use crate::{
    DeclRef, EnumDecl, EnumId, EnumItem, FuncId, GlobFuncDecl, IfaceDecl, IfaceId,
    IfaceMethodDecl, MethodId, Name, PackageDecl, PackageId, Param, ScalarKind, StringInterner,
    StructDecl, StructField, StructId, Type, TypeId, TypePool, UnionDecl, UnionField, UnionId,
};

/// Qualified name segments as resolved text.
pub type Segments = SmallVec<[&'static str; 4]>;

/// Resolved semantic model.
#[derive(Default)]
pub struct Model {
    interner: StringInterner,
    types: TypePool,
    packages: Vec<PackageDecl>,
    functions: Vec<GlobFuncDecl>,
    methods: Vec<IfaceMethodDecl>,
    enums: Vec<EnumDecl>,
    structs: Vec<StructDecl>,
    unions: Vec<UnionDecl>,
    ifaces: Vec<IfaceDecl>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Names --

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn params(&self, params: &[(&str, TypeId)]) -> Vec<Param> {
        params
            .iter()
            .map(|&(name, ty)| Param {
                name: self.intern(name),
                ty,
            })
            .collect()
    }

    // -- Types --

    pub fn types(&self) -> &TypePool {
        &self.types
    }

    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        self.types.get(id)
    }

    pub fn scalar(&mut self, kind: ScalarKind) -> TypeId {
        self.types.intern(Type::Scalar(kind))
    }

    pub fn string(&mut self) -> TypeId {
        self.types.intern(Type::String)
    }

    pub fn opaque(&mut self) -> TypeId {
        self.types.intern(Type::Opaque)
    }

    pub fn array(&mut self, elem: TypeId) -> TypeId {
        self.types.intern(Type::Array(elem))
    }

    pub fn vector(&mut self, elem: TypeId) -> TypeId {
        self.types.intern(Type::Vector(elem))
    }

    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.types.intern(Type::Map(key, value))
    }

    pub fn set(&mut self, elem: TypeId) -> TypeId {
        self.types.intern(Type::Set(elem))
    }

    pub fn optional(&mut self, inner: TypeId) -> TypeId {
        self.types.intern(Type::Optional(inner))
    }

    pub fn callback(&mut self, params: &[TypeId], ret: Option<TypeId>) -> TypeId {
        self.types.intern(Type::Callback {
            params: params.to_vec(),
            ret,
        })
    }

    pub fn enum_ty(&mut self, id: EnumId) -> TypeId {
        self.types.intern(Type::Enum(id))
    }

    pub fn struct_ty(&mut self, id: StructId) -> TypeId {
        self.types.intern(Type::Struct(id))
    }

    pub fn union_ty(&mut self, id: UnionId) -> TypeId {
        self.types.intern(Type::Union(id))
    }

    pub fn iface_ty(&mut self, id: IfaceId) -> TypeId {
        self.types.intern(Type::Iface(id))
    }

    // -- Declarations --

    /// Add a package from its dotted name (`ohos.example`).
    pub fn add_package(&mut self, dotted: &str) -> PackageId {
        let segments = dotted.split('.').map(|s| self.intern(s)).collect();
        let id = PackageId::next(self.packages.len());
        self.packages.push(PackageDecl {
            segments,
            functions: Vec::new(),
            enums: Vec::new(),
            structs: Vec::new(),
            unions: Vec::new(),
            interfaces: Vec::new(),
        });
        id
    }

    pub fn add_function(
        &mut self,
        package: PackageId,
        name: &str,
        params: &[(&str, TypeId)],
        return_ty: Option<TypeId>,
    ) -> FuncId {
        let id = FuncId::next(self.functions.len());
        let decl = GlobFuncDecl {
            name: self.intern(name),
            package,
            params: self.params(params),
            return_ty,
        };
        self.functions.push(decl);
        self.packages[package.index()].functions.push(id);
        id
    }

    pub fn add_enum(&mut self, package: PackageId, name: &str, items: &[(&str, i64)]) -> EnumId {
        let id = EnumId::next(self.enums.len());
        let items = items
            .iter()
            .map(|&(item, value)| EnumItem {
                name: self.intern(item),
                value,
            })
            .collect();
        let name = self.intern(name);
        self.enums.push(EnumDecl {
            name,
            package,
            items,
        });
        self.packages[package.index()].enums.push(id);
        id
    }

    /// Declare a struct; fields are added with [`add_struct_field`](Self::add_struct_field)
    /// so a field type may refer back to the struct.
    pub fn add_struct(&mut self, package: PackageId, name: &str) -> StructId {
        let id = StructId::next(self.structs.len());
        let name = self.intern(name);
        self.structs.push(StructDecl {
            name,
            package,
            fields: Vec::new(),
        });
        self.packages[package.index()].structs.push(id);
        id
    }

    pub fn add_struct_field(&mut self, id: StructId, name: &str, ty: TypeId) {
        let name = self.intern(name);
        self.structs[id.index()]
            .fields
            .push(StructField { name, ty });
    }

    pub fn add_union(&mut self, package: PackageId, name: &str) -> UnionId {
        let id = UnionId::next(self.unions.len());
        let name = self.intern(name);
        self.unions.push(UnionDecl {
            name,
            package,
            fields: Vec::new(),
        });
        self.packages[package.index()].unions.push(id);
        id
    }

    pub fn add_union_field(&mut self, id: UnionId, name: &str, ty: Option<TypeId>) {
        let name = self.intern(name);
        self.unions[id.index()].fields.push(UnionField { name, ty });
    }

    /// Declare an interface; parents and methods are attached afterwards.
    pub fn add_interface(&mut self, package: PackageId, name: &str) -> IfaceId {
        let id = IfaceId::next(self.ifaces.len());
        let name = self.intern(name);
        self.ifaces.push(IfaceDecl {
            name,
            package,
            parents: Vec::new(),
            methods: Vec::new(),
        });
        self.packages[package.index()].interfaces.push(id);
        id
    }

    /// Append a parent reference. Call order is declaration order.
    pub fn add_parent(&mut self, iface: IfaceId, parent: IfaceId) {
        self.ifaces[iface.index()].parents.push(parent);
    }

    pub fn add_method(
        &mut self,
        iface: IfaceId,
        name: &str,
        params: &[(&str, TypeId)],
        return_ty: Option<TypeId>,
    ) -> MethodId {
        let id = MethodId::next(self.methods.len());
        let decl = IfaceMethodDecl {
            name: self.intern(name),
            iface,
            params: self.params(params),
            return_ty,
        };
        self.methods.push(decl);
        self.ifaces[iface.index()].methods.push(id);
        id
    }

    // -- Lookup --

    pub fn package(&self, id: PackageId) -> &PackageDecl {
        &self.packages[id.index()]
    }

    pub fn function(&self, id: FuncId) -> &GlobFuncDecl {
        &self.functions[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &IfaceMethodDecl {
        &self.methods[id.index()]
    }

    pub fn enum_decl(&self, id: EnumId) -> &EnumDecl {
        &self.enums[id.index()]
    }

    pub fn struct_decl(&self, id: StructId) -> &StructDecl {
        &self.structs[id.index()]
    }

    pub fn union_decl(&self, id: UnionId) -> &UnionDecl {
        &self.unions[id.index()]
    }

    pub fn iface(&self, id: IfaceId) -> &IfaceDecl {
        &self.ifaces[id.index()]
    }

    /// All package IDs in declaration order.
    pub fn package_ids(&self) -> impl Iterator<Item = PackageId> {
        (0..self.packages.len()).map(PackageId::next)
    }

    /// All interface IDs in declaration order.
    pub fn iface_ids(&self) -> impl Iterator<Item = IfaceId> {
        (0..self.ifaces.len()).map(IfaceId::next)
    }

    /// Number of declarations of every kind, packages included.
    pub fn decl_count(&self) -> usize {
        self.packages.len()
            + self.functions.len()
            + self.methods.len()
            + self.enums.len()
            + self.structs.len()
            + self.unions.len()
            + self.ifaces.len()
    }

    // -- Qualified names --

    fn package_segments(&self, id: PackageId) -> Segments {
        self.package(id)
            .segments
            .iter()
            .map(|&name| self.name_str(name))
            .collect()
    }

    fn child_segments(&self, package: PackageId, name: Name) -> Segments {
        let mut segments = self.package_segments(package);
        segments.push(self.name_str(name));
        segments
    }

    /// Qualified name of a declaration as ordered segments.
    ///
    /// Methods are qualified through their interface:
    /// `[...package, Iface, method]`.
    pub fn segments(&self, decl: DeclRef) -> Segments {
        match decl {
            DeclRef::Package(id) => self.package_segments(id),
            DeclRef::Func(id) => {
                let f = self.function(id);
                self.child_segments(f.package, f.name)
            }
            DeclRef::Method(id) => {
                let m = self.method(id);
                let mut segments = self.segments(DeclRef::Iface(m.iface));
                segments.push(self.name_str(m.name));
                segments
            }
            DeclRef::Enum(id) => {
                let e = self.enum_decl(id);
                self.child_segments(e.package, e.name)
            }
            DeclRef::Struct(id) => {
                let s = self.struct_decl(id);
                self.child_segments(s.package, s.name)
            }
            DeclRef::Union(id) => {
                let u = self.union_decl(id);
                self.child_segments(u.package, u.name)
            }
            DeclRef::Iface(id) => {
                let i = self.iface(id);
                self.child_segments(i.package, i.name)
            }
        }
    }

    /// Dotted qualified name, for diagnostics and logs.
    pub fn qualified_name(&self, decl: DeclRef) -> String {
        self.segments(decl).join(".")
    }

    /// The package a declaration belongs to.
    pub fn package_of(&self, decl: DeclRef) -> PackageId {
        match decl {
            DeclRef::Package(id) => id,
            DeclRef::Func(id) => self.function(id).package,
            DeclRef::Method(id) => self.iface(self.method(id).iface).package,
            DeclRef::Enum(id) => self.enum_decl(id).package,
            DeclRef::Struct(id) => self.struct_decl(id).package,
            DeclRef::Union(id) => self.union_decl(id).package,
            DeclRef::Iface(id) => self.iface(id).package,
        }
    }
}
