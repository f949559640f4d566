//! Trees, bindings, and the cached tree store
//!
//! A [`Tree`] is a parsed composite plus the tables of identifier and
//! function nodes collected from it. Binding a tree against a context's
//! mappers produces [`Bindings`]; the tree itself stays immutable and
//! shareable, so one cached tree can back many expressions with
//! different bindings.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ast::{Node, VisitorMut, walk_mut};
use crate::error::BindError;
use crate::expr::ValueExpression;
use crate::functions::{ElFunction, FunctionRegistry};
use crate::parser::{ParseResult, ParserFeatures};

/// An identifier node collected from a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRef {
    /// The identifier name
    pub name: String,
    /// The node's bindings slot
    pub slot: usize,
}

/// A function node collected from a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRef {
    /// Qualified function name
    pub name: String,
    /// The node's bindings slot
    pub slot: usize,
    /// Number of parsed arguments, checked against the bound function
    pub arg_count: usize,
}

struct SlotAssigner {
    identifiers: Vec<IdentifierRef>,
    functions: Vec<FunctionRef>,
}

impl VisitorMut for SlotAssigner {
    fn visit(&mut self, node: &mut Node) {
        match node {
            Node::Identifier { name, slot } => {
                *slot = self.identifiers.len();
                self.identifiers.push(IdentifierRef {
                    name: name.clone(),
                    slot: *slot,
                });
            }
            Node::Function { name, slot, args } => {
                *slot = self.functions.len();
                self.functions.push(FunctionRef {
                    name: name.clone(),
                    slot: *slot,
                    arg_count: args.len(),
                });
            }
            _ => {}
        }
    }
}

/// A parsed, slot-assigned expression tree
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
    identifiers: Vec<IdentifierRef>,
    functions: Vec<FunctionRef>,
    deferred: bool,
}

impl Tree {
    /// Build a tree from a parsed root, assigning bindings slots to its
    /// identifier and function nodes
    pub fn new(mut root: Node, deferred: bool) -> Self {
        let mut assigner = SlotAssigner {
            identifiers: Vec::new(),
            functions: Vec::new(),
        };
        walk_mut(&mut root, &mut assigner);
        Self {
            root,
            identifiers: assigner.identifiers,
            functions: assigner.functions,
            deferred,
        }
    }

    /// The root node
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Identifier nodes in slot order
    pub fn identifiers(&self) -> &[IdentifierRef] {
        &self.identifiers
    }

    /// Function nodes in slot order
    pub fn functions(&self) -> &[FunctionRef] {
        &self.functions
    }

    /// Whether the composite used `#{...}` delimiters
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Resolve every function node through the function mapper and every
    /// identifier node through the variable mapper. Unknown prefixed
    /// functions and arity mismatches fail here; an unknown unprefixed
    /// name stays unbound and may turn out to be a lambda-valued
    /// identifier at evaluation time.
    pub fn bind(
        &self,
        functions: &FunctionRegistry,
        variables: &FxHashMap<String, ValueExpression>,
        varargs: bool,
    ) -> Result<Bindings, BindError> {
        let mut bound_functions = Vec::with_capacity(self.functions.len());
        for fref in &self.functions {
            match functions.resolve(&fref.name) {
                Some(function) => {
                    function.check_arity(fref.arg_count, varargs)?;
                    bound_functions.push(Some(function));
                }
                None if fref.name.contains(':') => {
                    return Err(BindError::UnknownFunction {
                        name: fref.name.clone(),
                    });
                }
                None => bound_functions.push(None),
            }
        }
        let bound_variables = self
            .identifiers
            .iter()
            .map(|iref| variables.get(&iref.name).cloned())
            .collect();
        Ok(Bindings {
            functions: bound_functions,
            variables: bound_variables,
        })
    }
}

/// The parse-time resolution product carried by every built expression
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bindings {
    functions: Vec<Option<Arc<ElFunction>>>,
    variables: Vec<Option<ValueExpression>>,
}

impl Bindings {
    /// Empty bindings, for trees with no identifiers or functions
    pub fn empty() -> Self {
        Self::default()
    }

    /// The function bound at a slot, if the mapper resolved one
    pub fn function(&self, slot: usize) -> Option<&Arc<ElFunction>> {
        self.functions.get(slot).and_then(|f| f.as_ref())
    }

    /// The variable expression bound at an identifier slot, if the
    /// variable mapper had a mapping
    pub fn variable(&self, slot: usize) -> Option<&ValueExpression> {
        self.variables.get(slot).and_then(|v| v.as_ref())
    }
}

/// Source-to-tree builder
pub trait TreeBuilder: Send + Sync {
    /// Parse a composite expression source
    fn build(&self, source: &str) -> ParseResult<Tree>;
}

/// The default builder over the crate parser
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
    features: ParserFeatures,
}

impl Builder {
    /// Create a builder with the given parser features
    pub fn new(features: ParserFeatures) -> Self {
        Self { features }
    }
}

impl TreeBuilder for Builder {
    fn build(&self, source: &str) -> ParseResult<Tree> {
        crate::parser::parse(source, self.features)
    }
}

/// Builder plus LRU tree cache
pub struct TreeStore {
    builder: Arc<dyn TreeBuilder>,
    cache: Option<Mutex<LruCache<String, Arc<Tree>>>>,
}

impl TreeStore {
    /// Create a store; a zero cache size disables caching
    pub fn new(builder: Arc<dyn TreeBuilder>, cache_size: usize) -> Self {
        Self {
            builder,
            cache: NonZeroUsize::new(cache_size).map(|n| Mutex::new(LruCache::new(n))),
        }
    }

    /// Fetch the tree for a source string, building and caching it on
    /// first use
    pub fn get(&self, source: &str) -> ParseResult<Arc<Tree>> {
        if let Some(cache) = &self.cache {
            if let Some(tree) = cache.lock().get(source) {
                log::debug!("tree cache hit: {source:?}");
                return Ok(tree.clone());
            }
        }
        log::debug!("tree cache miss: {source:?}");
        let tree = Arc::new(self.builder.build(source)?);
        if let Some(cache) = &self.cache {
            cache.lock().put(source.to_string(), tree.clone());
        }
        Ok(tree)
    }
}
