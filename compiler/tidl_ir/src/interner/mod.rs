//! String interner for identifier storage.
//!
//! Interned strings are leaked to obtain a `'static` lifetime, so lookups
//! hand out plain `&'static str` without holding the lock. A model is built
//! once per compilation run, which bounds the leaked set.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

impl InternTable {
    fn with_empty() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, Name::EMPTY);
        InternTable {
            map,
            strings: vec![empty],
        }
    }
}

/// Interner mapping identifier text to [`Name`]s.
///
/// # Thread Safety
/// Guarded by a `parking_lot::RwLock`, so a model (and its interner) can be
/// shared by reference across readers.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        StringInterner {
            table: RwLock::new(InternTable::with_empty()),
        }
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned
        if let Some(&name) = self.table.read().map.get(s) {
            return name;
        }

        let mut guard = self.table.write();
        // Double-check after acquiring the write lock
        if let Some(&name) = guard.map.get(s) {
            return name;
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let raw = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded {} strings", u32::MAX));
        let name = Name::from_raw(raw);
        guard.strings.push(leaked);
        guard.map.insert(leaked, name);
        name
    }

    /// Look up the text of an interned name.
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.read().strings[name.index()]
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always `false`: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
