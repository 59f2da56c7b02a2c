//! Interface ABI records and ancestor linearization.
//!
//! ```text
//! ancestors(D) = [D] ++ ancestors(P1) ++ ... ++ ancestors(Pn)
//! ```
//!
//! The list is not deduplicated: in a diamond (`B: A`, `C: A`, `D: B, C`)
//! it is `[D, B, A, C, A]`, one vtable slot per entry, the way a
//! non-virtual multiple-inheritance layout gives every base path its own
//! table pointer. [`AncestorDict`] keeps the first occurrence of each
//! interface and is what casts and method stubs enumerate.

use rustc_hash::FxHashMap;
use tracing::debug;

use tidl_ir::IfaceId;

use super::type_headers;
use crate::{mangle, AbiError, Analysis, AnalysisManager, MangleKind};

/// One vtable slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestorEntry {
    pub iface: IfaceId,
    /// `ftbl_ptr_{i}`
    pub slot: String,
}

/// Where the first occurrence of an ancestor lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestorInfo {
    /// Index into the ancestor list.
    pub offset: usize,
    /// Upcast function symbol.
    pub static_cast: String,
    pub slot: String,
}

/// Unique ancestors in first-occurrence order, with lookup by interface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AncestorDict {
    entries: Vec<(IfaceId, AncestorInfo)>,
    index: FxHashMap<IfaceId, usize>,
}

impl AncestorDict {
    /// Record the first occurrence of `iface`; later ones are ignored.
    fn insert_first(&mut self, iface: IfaceId, info: AncestorInfo) {
        if self.index.contains_key(&iface) {
            return;
        }
        self.index.insert(iface, self.entries.len());
        self.entries.push((iface, info));
    }

    pub fn get(&self, iface: IfaceId) -> Option<&AncestorInfo> {
        self.index.get(&iface).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, iface: IfaceId) -> bool {
        self.index.contains_key(&iface)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (IfaceId, &AncestorInfo)> {
        self.entries.iter().map(|(iface, info)| (*iface, info))
    }

    pub fn keys(&self) -> impl Iterator<Item = IfaceId> + '_ {
        self.entries.iter().map(|(iface, _)| *iface)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// ABI record for an interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfaceAbiInfo {
    pub mangled_name: String,
    /// Function table struct.
    pub ftable: String,
    /// Vtable struct.
    pub vtable: String,
    /// Identity object.
    pub iid: String,
    pub dynamic_cast: String,
    pub decl_header: String,
    pub defn_header: String,
    /// Inline casts and method dispatch; needs complete types.
    pub ops_header: String,
    /// `struct M`; also the parameter form.
    pub as_owner: String,
    pub as_param: String,
    /// Every slot, duplicates included. Entry 0 is the interface itself.
    pub ancestor_list: Vec<AncestorEntry>,
    pub ancestor_dict: AncestorDict,
}

impl Analysis for IfaceAbiInfo {
    type Key = IfaceId;
    const NAME: &'static str = "IfaceAbiInfo";

    fn compute(am: &AnalysisManager<'_>, key: IfaceId) -> Result<Self, AbiError> {
        let model = am.model();
        let decl = model.iface(key);
        let segments = model.segments(key.into());

        let mut order = vec![key];
        for &parent in &decl.parents {
            let parent_info = am.get::<IfaceAbiInfo>(parent)?;
            order.extend(parent_info.ancestor_list.iter().map(|entry| entry.iface));
        }

        let ancestor_list: Vec<AncestorEntry> = order
            .into_iter()
            .enumerate()
            .map(|(i, iface)| AncestorEntry {
                iface,
                slot: format!("ftbl_ptr_{i}"),
            })
            .collect();

        let mut ancestor_dict = AncestorDict::default();
        for (offset, entry) in ancestor_list.iter().enumerate() {
            if ancestor_dict.contains(entry.iface) {
                continue;
            }
            let index = offset.to_string();
            let cast_segments: Vec<&str> = segments
                .iter()
                .copied()
                .chain(std::iter::once(index.as_str()))
                .collect();
            let static_cast = mangle(&cast_segments, MangleKind::StaticCast)?;
            ancestor_dict.insert_first(
                entry.iface,
                AncestorInfo {
                    offset,
                    static_cast,
                    slot: entry.slot.clone(),
                },
            );
        }

        debug!(
            iface = %segments.join("."),
            slots = ancestor_list.len(),
            unique = ancestor_dict.len(),
            "linearized interface ancestors"
        );

        let mangled_name = mangle(&segments, MangleKind::Type)?;
        let [decl_header, defn_header, ops_header] =
            type_headers(model, decl.package, model.name_str(decl.name));
        Ok(Self {
            ftable: mangle(&segments, MangleKind::Ftable)?,
            vtable: mangle(&segments, MangleKind::Vtable)?,
            iid: mangle(&segments, MangleKind::Iid)?,
            dynamic_cast: mangle(&segments, MangleKind::DynamicCast)?,
            as_owner: format!("struct {mangled_name}"),
            as_param: format!("struct {mangled_name}"),
            mangled_name,
            decl_header,
            defn_header,
            ops_header,
            ancestor_list,
            ancestor_dict,
        })
    }
}
