//! The writable top-level namespace

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{ElResolver, Resolution};
use crate::context::ElContext;
use crate::model::{ElValue, ObjectMap, coerce};

/// Resolver for top-level identifiers backed by a mutable name map
///
/// Reads of unknown names pass to the next resolver in the chain; writes
/// of any top-level name are accepted and define the name.
#[derive(Default)]
pub struct RootResolver {
    entries: RwLock<FxHashMap<String, ElValue>>,
}

impl RootResolver {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry definition
    pub fn with_value(self, name: impl Into<String>, value: impl Into<ElValue>) -> Self {
        self.define(name, value);
        self
    }

    /// Seed the namespace from an object's entries
    pub fn from_object(map: ObjectMap) -> Self {
        let root = Self::new();
        for (name, value) in map {
            root.define(name, value);
        }
        root
    }

    /// Define or overwrite a top-level name
    pub fn define(&self, name: impl Into<String>, value: impl Into<ElValue>) {
        self.entries.write().insert(name.into(), value.into());
    }

    /// Current value of a top-level name
    pub fn lookup(&self, name: &str) -> Option<ElValue> {
        self.entries.read().get(name).cloned()
    }
}

impl ElResolver for RootResolver {
    fn get(&self, _ctx: &ElContext, base: Option<&ElValue>, property: &ElValue) -> Resolution {
        if base.is_some() {
            return Resolution::NotResolved;
        }
        match self.lookup(&coerce::to_str(property)) {
            Some(value) => Resolution::Resolved(value),
            None => Resolution::NotResolved,
        }
    }

    fn set(
        &self,
        _ctx: &ElContext,
        base: Option<&ElValue>,
        property: &ElValue,
        value: ElValue,
    ) -> Resolution<()> {
        if base.is_some() {
            return Resolution::NotResolved;
        }
        self.define(coerce::to_str(property), value);
        Resolution::Resolved(())
    }

    fn read_only(
        &self,
        _ctx: &ElContext,
        base: Option<&ElValue>,
        _property: &ElValue,
    ) -> Resolution<bool> {
        if base.is_some() {
            return Resolution::NotResolved;
        }
        Resolution::Resolved(false)
    }
}
