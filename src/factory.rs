//! The expression factory, the crate's front door

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::ElContext;
use crate::error::ElError;
use crate::expr::{MethodExpression, ValueExpression};
use crate::model::ExpectedType;
use crate::parser::ParserFeatures;
use crate::tree::{Builder, TreeStore};

/// Feature toggles for parsing, binding, and evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// Parse `base.name(args)` / `base[expr](args)` as method invocations
    pub methods: bool,
    /// Honor varargs function signatures at bind time
    pub varargs: bool,
    /// Resolve a null bracket property through the resolver chain
    /// instead of short-circuiting to null
    pub null_properties: bool,
    /// LRU tree cache capacity; zero disables caching
    pub cache_size: usize,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            methods: true,
            varargs: true,
            null_properties: false,
            cache_size: 256,
        }
    }
}

impl Features {
    fn parser(&self) -> ParserFeatures {
        ParserFeatures {
            methods: self.methods,
        }
    }
}

/// Builds bound expressions, caching parsed trees by source string
pub struct ExpressionFactory {
    features: Features,
    store: TreeStore,
}

impl Default for ExpressionFactory {
    fn default() -> Self {
        Self::new(Features::default())
    }
}

impl ExpressionFactory {
    /// Create a factory with the given features
    pub fn new(features: Features) -> Self {
        Self {
            features,
            store: TreeStore::new(Arc::new(Builder::new(features.parser())), features.cache_size),
        }
    }

    /// The factory's feature configuration
    pub fn features(&self) -> Features {
        self.features
    }

    /// Build a value expression bound against the context's function and
    /// variable mappers. The tree cache is shared; binding always runs
    /// against the supplied context.
    pub fn value_expression(
        &self,
        ctx: &ElContext,
        source: &str,
        expected: ExpectedType,
    ) -> Result<ValueExpression, ElError> {
        let tree = self.store.get(source)?;
        let bindings = tree.bind(ctx.functions(), ctx.variables(), self.features.varargs)?;
        Ok(ValueExpression::new(
            tree,
            bindings,
            source.to_string(),
            expected,
            self.features,
        ))
    }

    /// Build a method expression bound against the context's mappers
    pub fn method_expression(
        &self,
        ctx: &ElContext,
        source: &str,
    ) -> Result<MethodExpression, ElError> {
        let tree = self.store.get(source)?;
        let bindings = tree.bind(ctx.functions(), ctx.variables(), self.features.varargs)?;
        MethodExpression::new(tree, bindings, source.to_string(), self.features)
    }
}
