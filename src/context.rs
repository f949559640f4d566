//! Evaluation context: resolver chain, function mapper, variable mapper

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::expr::ValueExpression;
use crate::functions::FunctionRegistry;
use crate::resolver::ElResolver;

/// Everything an expression is bound and evaluated against
#[derive(Clone)]
pub struct ElContext {
    resolver: Arc<dyn ElResolver>,
    functions: FunctionRegistry,
    variables: FxHashMap<String, ValueExpression>,
}

impl ElContext {
    /// Create a context over a resolver chain, with the standard
    /// functions installed
    pub fn new(resolver: Arc<dyn ElResolver>) -> Self {
        Self {
            resolver,
            functions: FunctionRegistry::builtins(),
            variables: FxHashMap::default(),
        }
    }

    /// Replace the function mapper
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// The resolver chain
    pub fn resolver(&self) -> &Arc<dyn ElResolver> {
        &self.resolver
    }

    /// The function mapper
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Mutable access to the function mapper
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Map a variable name to an expression; identifiers bind to
    /// variables at bind time, before the resolver chain is consulted
    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        expression: ValueExpression,
    ) -> Option<ValueExpression> {
        self.variables.insert(name.into(), expression)
    }

    /// Look up a mapped variable
    pub fn variable(&self, name: &str) -> Option<&ValueExpression> {
        self.variables.get(name)
    }

    pub(crate) fn variables(&self) -> &FxHashMap<String, ValueExpression> {
        &self.variables
    }
}
