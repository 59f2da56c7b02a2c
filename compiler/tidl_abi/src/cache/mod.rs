//! Memoizing analysis cache.
//!
//! Every ABI record type implements [`Analysis`] and is requested through
//! [`AnalysisManager::get`]. A record is computed at most once per node and
//! then shared (`Rc`) with every later caller. Computations may request other
//! records recursively.
//!
//! # Cycle Detection
//!
//! Before computing, the manager stores an in-progress marker for
//! `(record type, node)`. Re-entering a key whose marker is still present
//! returns [`AbiError::CyclicAnalysis`] instead of recursing forever. A
//! failed computation clears its marker so the error is reported the same
//! way on every request.
//!
//! # Interior Mutability
//!
//! Uses `RefCell` for the slot table so analyses can take `&AnalysisManager`
//! and recurse. No borrow is held while a record is being computed. The
//! manager is single-threaded (`!Sync`).

use std::any::{Any, TypeId as RecordTypeId};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::trace;

use tidl_ir::{
    DeclRef, EnumId, FuncId, IfaceId, MethodId, Model, PackageId, StructId, TypeId, UnionId,
};

use crate::AbiError;

/// Minimum stack space to keep available before computing a record.
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f` with enough stack for another level of record computation.
///
/// Deep (acyclic) inheritance chains nest one computation per level.
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// The node a record is computed for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKey {
    Decl(DeclRef),
    Type(TypeId),
}

impl From<DeclRef> for NodeKey {
    fn from(decl: DeclRef) -> Self {
        NodeKey::Decl(decl)
    }
}

impl From<TypeId> for NodeKey {
    fn from(ty: TypeId) -> Self {
        NodeKey::Type(ty)
    }
}

macro_rules! impl_node_key_from_decl_id {
    ($($id:ty),* $(,)?) => {
        $(
            impl From<$id> for NodeKey {
                fn from(id: $id) -> Self {
                    NodeKey::Decl(DeclRef::from(id))
                }
            }
        )*
    };
}

impl_node_key_from_decl_id!(PackageId, FuncId, MethodId, EnumId, StructId, UnionId, IfaceId);

/// A record computed once per node and cached by [`AnalysisManager`].
///
/// Implementations must be pure functions of the model: the same key always
/// yields an equal record.
pub trait Analysis: Sized + 'static {
    /// The node this record is keyed by.
    type Key: Copy + Into<NodeKey>;

    /// Record name used in diagnostics and logs.
    const NAME: &'static str;

    fn compute(am: &AnalysisManager<'_>, key: Self::Key) -> Result<Self, AbiError>;
}

#[derive(Clone)]
enum Slot {
    InProgress,
    Ready(Rc<dyn Any>),
}

type SlotKey = (RecordTypeId, NodeKey);

/// Cache counters.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct CacheStats {
    /// Records constructed.
    pub computed: usize,
    /// Requests served from the cache.
    pub hits: usize,
}

/// Owner of every ABI record computed during one run.
pub struct AnalysisManager<'m> {
    model: &'m Model,
    slots: RefCell<FxHashMap<SlotKey, Slot>>,
    constructions: RefCell<FxHashMap<SlotKey, u32>>,
    stats: Cell<CacheStats>,
}

impl<'m> AnalysisManager<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            slots: RefCell::new(FxHashMap::default()),
            constructions: RefCell::new(FxHashMap::default()),
            stats: Cell::new(CacheStats::default()),
        }
    }

    /// The model records are computed from.
    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// Get (computing on first request) the `R` record for `key`.
    ///
    /// Repeated requests return the same `Rc`.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::CyclicAnalysis`] if `R` for `key` is already being
    /// computed further up the call stack, or any error from `R::compute`.
    pub fn get<R: Analysis>(&self, key: R::Key) -> Result<Rc<R>, AbiError> {
        let node: NodeKey = key.into();
        let slot_key = (RecordTypeId::of::<R>(), node);

        let cached = self.slots.borrow().get(&slot_key).cloned();
        match cached {
            Some(Slot::Ready(any)) => {
                if let Ok(record) = any.downcast::<R>() {
                    self.bump(|s| s.hits += 1);
                    return Ok(record);
                }
            }
            Some(Slot::InProgress) => {
                return Err(AbiError::CyclicAnalysis {
                    record: R::NAME,
                    node: self.describe(node),
                });
            }
            None => {}
        }

        self.slots.borrow_mut().insert(slot_key, Slot::InProgress);
        let result = ensure_sufficient_stack(|| R::compute(self, key));

        match result {
            Ok(record) => {
                let record = Rc::new(record);
                let any: Rc<dyn Any> = record.clone();
                self.slots.borrow_mut().insert(slot_key, Slot::Ready(any));
                *self.constructions.borrow_mut().entry(slot_key).or_insert(0) += 1;
                self.bump(|s| s.computed += 1);
                trace!(record = R::NAME, ?node, "computed");
                Ok(record)
            }
            Err(err) => {
                self.slots.borrow_mut().remove(&slot_key);
                Err(err)
            }
        }
    }

    /// Cache counters so far.
    pub fn stats(&self) -> CacheStats {
        self.stats.get()
    }

    /// How many times `R` was constructed for `key`. Always 0 or 1.
    pub fn constructions_of<R: Analysis>(&self, key: R::Key) -> u32 {
        let slot_key = (RecordTypeId::of::<R>(), key.into());
        self.constructions
            .borrow()
            .get(&slot_key)
            .copied()
            .unwrap_or(0)
    }

    /// Human-readable name of a node for diagnostics.
    pub fn describe(&self, node: NodeKey) -> String {
        match node {
            NodeKey::Decl(decl) => {
                format!("{} {}", decl.kind_str(), self.model.qualified_name(decl))
            }
            NodeKey::Type(ty) => format!("{:?} ({:?})", ty, self.model.ty(ty)),
        }
    }

    fn bump(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}
