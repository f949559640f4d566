//! Tree-walking evaluation
//!
//! The evaluator walks a bound tree against a context. Lambda parameters
//! live on a scope stack consulted before bound variables and the
//! resolver chain; `and`, `or` and `?:` evaluate their operands lazily.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::ast::{BinaryOp, Node, UnaryOp};
use crate::context::ElContext;
use crate::error::{EvalError, EvalResult};
use crate::model::{ElLambda, ElValue, ScopeFrame, coerce};
use crate::resolver::Resolution;
use crate::tree::Bindings;

type Args = SmallVec<[ElValue; 4]>;

/// Walks a bound tree
pub struct Evaluator<'a> {
    ctx: &'a ElContext,
    bindings: &'a Bindings,
    null_properties: bool,
    scopes: Vec<ScopeFrame>,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator for one tree walk
    pub fn new(ctx: &'a ElContext, bindings: &'a Bindings, null_properties: bool) -> Self {
        Self {
            ctx,
            bindings,
            null_properties,
            scopes: Vec::new(),
        }
    }

    /// Evaluate a node to a value
    pub fn eval(&mut self, node: &Node) -> EvalResult<ElValue> {
        match node {
            Node::Text(text) => Ok(ElValue::str(text)),
            Node::Composite(pieces) => {
                let mut out = String::new();
                for piece in pieces {
                    let value = self.eval(piece)?;
                    out.push_str(&coerce::to_str(&value));
                }
                Ok(ElValue::str(out))
            }
            Node::Eval { expr, .. } | Node::Nested(expr) => self.eval(expr),

            Node::Null => Ok(ElValue::Null),
            Node::Boolean(b) => Ok(ElValue::Bool(*b)),
            Node::Long(n) => Ok(ElValue::Long(*n)),
            Node::Double(d) => Ok(ElValue::Double(*d)),
            Node::Str(s) => Ok(ElValue::str(s)),

            Node::Identifier { name, slot } => self.eval_identifier(name, *slot),
            Node::Dot { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(ElValue::Null);
                }
                self.resolve_property(&base, &ElValue::str(property))
            }
            Node::Bracket { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(ElValue::Null);
                }
                let property = self.eval(property)?;
                if property.is_null() && !self.null_properties {
                    return Ok(ElValue::Null);
                }
                self.resolve_property(&base, &property)
            }
            Node::Method { target, args } => self.eval_method(target, args),
            Node::Function { name, slot, args } => {
                let bindings = self.bindings;
                let args = self.eval_args(args)?;
                match bindings.function(*slot) {
                    Some(function) => function.invoke(&args),
                    None => self.call_unbound_function(name, &args),
                }
            }
            Node::Lambda { params, body } => Ok(ElValue::Lambda(ElLambda {
                params: params.clone().into(),
                body: Arc::new((**body).clone()),
                captured: self.scopes.clone(),
            })),
            Node::Invoke { target, args } => {
                let target = self.eval(target)?;
                let args = self.eval_args(args)?;
                match target {
                    ElValue::Lambda(lambda) => self.call_lambda(&lambda, &args),
                    other => Err(EvalError::NotInvocable {
                        target: other.type_name(),
                    }),
                }
            }

            Node::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Node::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match op {
                    UnaryOp::Neg => coerce::neg(&value),
                    UnaryOp::Not => Ok(ElValue::Bool(!coerce::to_bool(&value)?)),
                    UnaryOp::Empty => Ok(ElValue::Bool(coerce::is_empty(&value))),
                }
            }
            Node::Choice { cond, yes, no } => {
                let cond = self.eval(cond)?;
                if coerce::to_bool(&cond)? {
                    self.eval(yes)
                } else {
                    self.eval(no)
                }
            }
        }
    }

    fn eval_identifier(&mut self, name: &str, slot: usize) -> EvalResult<ElValue> {
        for frame in self.scopes.iter().rev() {
            if let Some(value) = frame.get(name) {
                return Ok(value.clone());
            }
        }
        let bindings = self.bindings;
        if let Some(variable) = bindings.variable(slot) {
            return variable.value(self.ctx);
        }
        match self.ctx.resolver().get(self.ctx, None, &ElValue::str(name)) {
            Resolution::Resolved(value) => Ok(value),
            Resolution::NotResolved => Err(EvalError::UnresolvedIdentifier {
                name: name.to_string(),
            }),
            Resolution::Failed(e) => Err(e),
        }
    }

    fn resolve_property(&self, base: &ElValue, property: &ElValue) -> EvalResult<ElValue> {
        match self.ctx.resolver().get(self.ctx, Some(base), property) {
            Resolution::Resolved(value) => Ok(value),
            Resolution::NotResolved => Err(EvalError::UnresolvedProperty {
                property: coerce::to_str(property),
                base_type: base.type_name(),
            }),
            Resolution::Failed(e) => Err(e),
        }
    }

    fn eval_method(&mut self, target: &Node, args: &[Node]) -> EvalResult<ElValue> {
        match target {
            Node::Dot { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(ElValue::Null);
                }
                let args = self.eval_args(args)?;
                self.invoke_method(&base, property, &args)
            }
            Node::Bracket { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(ElValue::Null);
                }
                let method = self.eval(property)?;
                let method = coerce::to_str(&method);
                let args = self.eval_args(args)?;
                self.invoke_method(&base, &method, &args)
            }
            other => Err(EvalError::message(format!(
                "cannot invoke {} as a method",
                other.kind()
            ))),
        }
    }

    /// Resolver method dispatch; a property that holds a lambda is
    /// callable with method syntax
    fn invoke_method(&mut self, base: &ElValue, method: &str, args: &[ElValue]) -> EvalResult<ElValue> {
        match self.ctx.resolver().invoke(self.ctx, base, method, args) {
            Resolution::Resolved(value) => Ok(value),
            Resolution::Failed(e) => Err(e),
            Resolution::NotResolved => {
                if let Resolution::Resolved(ElValue::Lambda(lambda)) =
                    self.ctx
                        .resolver()
                        .get(self.ctx, Some(base), &ElValue::str(method))
                {
                    return self.call_lambda(&lambda, args);
                }
                Err(EvalError::UnresolvedMethod {
                    method: method.to_string(),
                    base_type: base.type_name(),
                })
            }
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Node, right: &Node) -> EvalResult<ElValue> {
        match op {
            BinaryOp::And => {
                if !coerce::to_bool(&self.eval(left)?)? {
                    return Ok(ElValue::Bool(false));
                }
                Ok(ElValue::Bool(coerce::to_bool(&self.eval(right)?)?))
            }
            BinaryOp::Or => {
                if coerce::to_bool(&self.eval(left)?)? {
                    return Ok(ElValue::Bool(true));
                }
                Ok(ElValue::Bool(coerce::to_bool(&self.eval(right)?)?))
            }
            _ => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                match op {
                    BinaryOp::Eq => Ok(ElValue::Bool(coerce::equals(&left, &right)?)),
                    BinaryOp::Ne => Ok(ElValue::Bool(!coerce::equals(&left, &right)?)),
                    BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                        Ok(ElValue::Bool(coerce::compare(op, &left, &right)?))
                    }
                    BinaryOp::Add => coerce::add(&left, &right),
                    BinaryOp::Sub => coerce::sub(&left, &right),
                    BinaryOp::Mul => coerce::mul(&left, &right),
                    BinaryOp::Div => coerce::div(&left, &right),
                    BinaryOp::Mod => coerce::rem(&left, &right),
                    BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
                }
            }
        }
    }

    /// A call through a name the function mapper did not resolve: the
    /// name may be a lambda-valued parameter, variable, or identifier
    fn call_unbound_function(&mut self, name: &str, args: &[ElValue]) -> EvalResult<ElValue> {
        let mut target: Option<ElValue> = None;
        for frame in self.scopes.iter().rev() {
            if let Some(value) = frame.get(name) {
                target = Some(value.clone());
                break;
            }
        }
        if target.is_none() {
            if let Some(variable) = self.ctx.variable(name) {
                target = Some(variable.value(self.ctx)?);
            }
        }
        if target.is_none() {
            if let Resolution::Resolved(value) =
                self.ctx.resolver().get(self.ctx, None, &ElValue::str(name))
            {
                target = Some(value);
            }
        }
        match target {
            Some(ElValue::Lambda(lambda)) => self.call_lambda(&lambda, args),
            Some(other) => Err(EvalError::NotInvocable {
                target: other.type_name(),
            }),
            None => Err(EvalError::Function {
                name: name.to_string(),
                message: "cannot be resolved to a function or lambda".to_string(),
            }),
        }
    }

    fn eval_args(&mut self, args: &[Node]) -> EvalResult<Args> {
        let mut out = Args::with_capacity(args.len());
        for arg in args {
            out.push(self.eval(arg)?);
        }
        Ok(out)
    }

    /// Bind parameters positionally and evaluate the body in the
    /// lambda's captured scope; missing arguments are null, extras are
    /// ignored
    pub fn call_lambda(&mut self, lambda: &ElLambda, args: &[ElValue]) -> EvalResult<ElValue> {
        let mut frame = ScopeFrame::default();
        for (i, param) in lambda.params.iter().enumerate() {
            frame.insert(
                param.clone(),
                args.get(i).cloned().unwrap_or(ElValue::Null),
            );
        }
        let mut scopes = lambda.captured.clone();
        scopes.push(frame);
        let saved = std::mem::replace(&mut self.scopes, scopes);
        let result = self.eval(&lambda.body);
        self.scopes = saved;
        result
    }

    /// Invoke a method-expression target with the given arguments.
    /// A parsed argument list wins; an argument-less property or
    /// identifier target uses the supplied arguments.
    pub fn invoke_target(&mut self, node: &Node, args: &[ElValue]) -> EvalResult<ElValue> {
        match node {
            Node::Eval { expr, .. } | Node::Nested(expr) => self.invoke_target(expr, args),
            Node::Method { .. } => self.eval(node),
            Node::Dot { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(ElValue::Null);
                }
                self.invoke_method(&base, property, args)
            }
            Node::Bracket { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(ElValue::Null);
                }
                let method = self.eval(property)?;
                self.invoke_method(&base, &coerce::to_str(&method), args)
            }
            other => {
                let value = self.eval(other)?;
                match value {
                    ElValue::Lambda(lambda) => self.call_lambda(&lambda, args),
                    not_lambda => Err(EvalError::NotInvocable {
                        target: not_lambda.type_name(),
                    }),
                }
            }
        }
    }

    /// Write a value through an assignable node
    pub fn set(&mut self, node: &Node, value: ElValue) -> EvalResult<()> {
        match node {
            Node::Eval { expr, .. } | Node::Nested(expr) => self.set(expr, value),
            Node::Identifier { name, slot } => {
                if self.scopes.iter().any(|frame| frame.contains_key(name)) {
                    return Err(EvalError::NotWritable {
                        expression: name.clone(),
                    });
                }
                let bindings = self.bindings;
                if let Some(variable) = bindings.variable(*slot) {
                    return variable.set_value(self.ctx, value);
                }
                match self
                    .ctx
                    .resolver()
                    .set(self.ctx, None, &ElValue::str(name), value)
                {
                    Resolution::Resolved(()) => Ok(()),
                    Resolution::NotResolved => Err(EvalError::NotWritable {
                        expression: name.clone(),
                    }),
                    Resolution::Failed(e) => Err(e),
                }
            }
            Node::Dot { base, property } => {
                let base_value = self.eval(base)?;
                if base_value.is_null() {
                    return Err(EvalError::NotWritable {
                        expression: node.to_string(),
                    });
                }
                self.set_property(node, &base_value, &ElValue::str(property), value)
            }
            Node::Bracket { base, property } => {
                let base_value = self.eval(base)?;
                if base_value.is_null() {
                    return Err(EvalError::NotWritable {
                        expression: node.to_string(),
                    });
                }
                let property = self.eval(property)?;
                self.set_property(node, &base_value, &property, value)
            }
            other => Err(EvalError::NotWritable {
                expression: other.to_string(),
            }),
        }
    }

    fn set_property(
        &self,
        node: &Node,
        base: &ElValue,
        property: &ElValue,
        value: ElValue,
    ) -> EvalResult<()> {
        match self
            .ctx
            .resolver()
            .set(self.ctx, Some(base), property, value)
        {
            Resolution::Resolved(()) => Ok(()),
            Resolution::NotResolved => Err(EvalError::NotWritable {
                expression: node.to_string(),
            }),
            Resolution::Failed(e) => Err(e),
        }
    }

    /// Whether a node rejects writes in the current context
    pub fn read_only(&mut self, node: &Node) -> EvalResult<bool> {
        match node {
            Node::Eval { expr, .. } | Node::Nested(expr) => self.read_only(expr),
            Node::Identifier { name, slot } => {
                if self.scopes.iter().any(|frame| frame.contains_key(name)) {
                    return Ok(true);
                }
                let bindings = self.bindings;
                if let Some(variable) = bindings.variable(*slot) {
                    return variable.is_read_only(self.ctx);
                }
                match self
                    .ctx
                    .resolver()
                    .read_only(self.ctx, None, &ElValue::str(name))
                {
                    Resolution::Resolved(read_only) => Ok(read_only),
                    Resolution::NotResolved => Ok(true),
                    Resolution::Failed(e) => Err(e),
                }
            }
            Node::Dot { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(true);
                }
                self.property_read_only(&base, &ElValue::str(property))
            }
            Node::Bracket { base, property } => {
                let base = self.eval(base)?;
                if base.is_null() {
                    return Ok(true);
                }
                let property = self.eval(property)?;
                self.property_read_only(&base, &property)
            }
            _ => Ok(true),
        }
    }

    fn property_read_only(&self, base: &ElValue, property: &ElValue) -> EvalResult<bool> {
        match self.ctx.resolver().read_only(self.ctx, Some(base), property) {
            Resolution::Resolved(read_only) => Ok(read_only),
            Resolution::NotResolved => Ok(true),
            Resolution::Failed(e) => Err(e),
        }
    }
}
