//! Pluggable value resolution
//!
//! Identifier, property, and method resolution go through an
//! [`ElResolver`] chain. A resolver either claims a resolution
//! ([`Resolution::Resolved`]), passes ([`Resolution::NotResolved`]) so the
//! next resolver in a [`CompositeResolver`] can try, or fails the whole
//! evaluation ([`Resolution::Failed`]).

mod data;
mod root;

pub use data::{ArrayResolver, ObjectResolver, StringResolver};
pub use root::RootResolver;

use std::sync::Arc;

use crate::context::ElContext;
use crate::error::EvalError;
use crate::model::ElValue;

/// Outcome of asking one resolver for a resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T = ElValue> {
    /// The resolver claimed and produced the resolution
    Resolved(T),
    /// The resolver does not handle this base/property
    NotResolved,
    /// The resolver claimed the resolution and it failed
    Failed(EvalError),
}

/// A participant in the resolution chain
pub trait ElResolver: Send + Sync {
    /// Resolve a property read. `base` is `None` for top-level
    /// identifiers.
    fn get(&self, ctx: &ElContext, base: Option<&ElValue>, property: &ElValue) -> Resolution;

    /// Resolve a property write
    fn set(
        &self,
        _ctx: &ElContext,
        _base: Option<&ElValue>,
        _property: &ElValue,
        _value: ElValue,
    ) -> Resolution<()> {
        Resolution::NotResolved
    }

    /// Resolve a method invocation on a base value
    fn invoke(
        &self,
        _ctx: &ElContext,
        _base: &ElValue,
        _method: &str,
        _args: &[ElValue],
    ) -> Resolution {
        Resolution::NotResolved
    }

    /// Report whether a property this resolver handles is read-only
    fn read_only(
        &self,
        _ctx: &ElContext,
        _base: Option<&ElValue>,
        _property: &ElValue,
    ) -> Resolution<bool> {
        Resolution::NotResolved
    }
}

/// First-match-wins chain of resolvers
#[derive(Clone, Default)]
pub struct CompositeResolver {
    resolvers: Vec<Arc<dyn ElResolver>>,
}

impl CompositeResolver {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual chain: the given root namespace followed by the bundled
    /// array, object, and string resolvers
    pub fn standard(root: Arc<RootResolver>) -> Self {
        Self::new()
            .with(root)
            .with(Arc::new(ArrayResolver))
            .with(Arc::new(ObjectResolver))
            .with(Arc::new(StringResolver))
    }

    /// Append a resolver to the chain
    pub fn with(mut self, resolver: Arc<dyn ElResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Append a resolver to the chain in place
    pub fn push(&mut self, resolver: Arc<dyn ElResolver>) {
        self.resolvers.push(resolver);
    }
}

impl ElResolver for CompositeResolver {
    fn get(&self, ctx: &ElContext, base: Option<&ElValue>, property: &ElValue) -> Resolution {
        for resolver in &self.resolvers {
            match resolver.get(ctx, base, property) {
                Resolution::NotResolved => continue,
                other => return other,
            }
        }
        Resolution::NotResolved
    }

    fn set(
        &self,
        ctx: &ElContext,
        base: Option<&ElValue>,
        property: &ElValue,
        value: ElValue,
    ) -> Resolution<()> {
        for resolver in &self.resolvers {
            match resolver.set(ctx, base, property, value.clone()) {
                Resolution::NotResolved => continue,
                other => return other,
            }
        }
        Resolution::NotResolved
    }

    fn invoke(&self, ctx: &ElContext, base: &ElValue, method: &str, args: &[ElValue]) -> Resolution {
        for resolver in &self.resolvers {
            match resolver.invoke(ctx, base, method, args) {
                Resolution::NotResolved => continue,
                other => return other,
            }
        }
        Resolution::NotResolved
    }

    fn read_only(
        &self,
        ctx: &ElContext,
        base: Option<&ElValue>,
        property: &ElValue,
    ) -> Resolution<bool> {
        for resolver in &self.resolvers {
            match resolver.read_only(ctx, base, property) {
                Resolution::NotResolved => continue,
                other => return other,
            }
        }
        Resolution::NotResolved
    }
}

/// Wrapper that rejects writes to everything its inner resolver resolves
pub struct ReadOnlyResolver {
    inner: Arc<dyn ElResolver>,
}

impl ReadOnlyResolver {
    /// Wrap a resolver
    pub fn new(inner: Arc<dyn ElResolver>) -> Self {
        Self { inner }
    }
}

impl ElResolver for ReadOnlyResolver {
    fn get(&self, ctx: &ElContext, base: Option<&ElValue>, property: &ElValue) -> Resolution {
        self.inner.get(ctx, base, property)
    }

    fn set(
        &self,
        ctx: &ElContext,
        base: Option<&ElValue>,
        property: &ElValue,
        _value: ElValue,
    ) -> Resolution<()> {
        match self.inner.get(ctx, base, property) {
            Resolution::Resolved(_) => Resolution::Failed(EvalError::NotWritable {
                expression: crate::model::coerce::to_str(property),
            }),
            Resolution::NotResolved => Resolution::NotResolved,
            Resolution::Failed(e) => Resolution::Failed(e),
        }
    }

    fn invoke(&self, ctx: &ElContext, base: &ElValue, method: &str, args: &[ElValue]) -> Resolution {
        self.inner.invoke(ctx, base, method, args)
    }

    fn read_only(
        &self,
        ctx: &ElContext,
        base: Option<&ElValue>,
        property: &ElValue,
    ) -> Resolution<bool> {
        match self.inner.get(ctx, base, property) {
            Resolution::Resolved(_) => Resolution::Resolved(true),
            Resolution::NotResolved => Resolution::NotResolved,
            Resolution::Failed(e) => Resolution::Failed(e),
        }
    }
}
