//! Contract representation and evaluation
//!
//! A [`Contract`] wraps a [`Term`] tree, the parsed composable form of a
//! contract expression. Checking walks the tree with a per-call
//! [`Context`] for size variables; every node either passes or produces a
//! [`ContractViolation`], and user predicate errors propagate unmodified.

use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::adapter::TypeTag;
use crate::context::Context;
use crate::errors::{ContractError, ContractResult, ContractViolation};
use crate::value::Value;

/// Comparison operators usable in contract expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        };
        write!(f, "{}", s)
    }
}

/// A numeric literal in a contract expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Declared length of a list contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSpec {
    /// `list[3]`
    Literal(usize),
    /// `list[N]`, bound to a concrete length on first observation
    Variable(char),
}

impl fmt::Display for LengthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthSpec::Literal(k) => write!(f, "{}", k),
            LengthSpec::Variable(v) => write!(f, "{}", v),
        }
    }
}

/// A named, arity-checked user predicate
///
/// The shape mirrors a native function: a name, a declared arity, and the
/// callable itself. Only arity-1 predicates are accepted by the adapter;
/// carrying the arity lets the adapter reject mismatches at registration
/// time instead of at check time.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    arity: usize,
    func: Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>,
}

impl Predicate {
    /// Wrap a raw callable with an explicitly declared arity
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Wrap an infallible boolean predicate over one value
    pub fn unary(
        name: impl Into<String>,
        func: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, 1, move |args| Ok(Value::Boolean(func(&args[0]))))
    }

    /// Wrap a fallible predicate over one value
    ///
    /// The returned value is interpreted with the usual outcome rules:
    /// `Boolean(false)` rejects, anything else passes, an error propagates.
    pub fn try_unary(
        name: impl Into<String>,
        func: impl Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, 1, move |args| func(&args[0]))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, value: &Value) -> anyhow::Result<Value> {
        (self.func)(std::slice::from_ref(value))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Predicate {
    /// Predicates are equal when they wrap the same callable
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// One node of a contract expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// `*` / `anything`
    Any,
    /// A built-in shape or a user type tag
    Type(TypeTag),
    /// `number`: integer or float
    Number,
    /// A registered user predicate
    Predicate(Predicate),
    /// `>=0` and friends
    Comparison { op: CmpOp, bound: Number },
    /// `list`, `list[K]`, `list[N]`, optionally with an element contract
    List {
        length: Option<LengthSpec>,
        element: Option<Box<Term>>,
    },
    /// `tuple(a, b, ...)`: positional element contracts
    Tuple(Vec<Term>),
    /// Comma conjunction: every child must hold
    All(Vec<Term>),
    /// A registered contract referenced by name
    ///
    /// The body is an independent copy taken at parse time. It is evaluated
    /// in a fresh binding scope, so size variables inside a named contract
    /// never leak between two expansions.
    Named { name: String, body: Box<Term> },
}

impl Term {
    pub(crate) fn check_in(&self, value: &Value, ctx: &mut Context) -> ContractResult<()> {
        trace!(term = %self, value = %value, "checking");
        match self {
            Term::Any => Ok(()),
            Term::Type(tag) => {
                if tag.matches(value) {
                    Ok(())
                } else {
                    Err(self.mismatch(value))
                }
            }
            Term::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(self.mismatch(value))
                }
            }
            Term::Predicate(pred) => match pred.call(value) {
                Err(source) => Err(ContractError::Predicate {
                    name: pred.name().to_string(),
                    source,
                }),
                Ok(Value::Boolean(false)) => Err(ContractViolation::Rejected {
                    name: pred.name().to_string(),
                    value: value.clone(),
                }
                .into()),
                Ok(Value::Boolean(true)) | Ok(Value::Nil) => Ok(()),
                Ok(other) => {
                    warn!(
                        predicate = pred.name(),
                        returned = %other,
                        "predicate returned a non-boolean value, treated as pass"
                    );
                    Ok(())
                }
            },
            Term::Comparison { op, bound } => match value.as_f64() {
                None => Err(ContractViolation::NotNumeric {
                    contract: self.to_string(),
                    value: value.clone(),
                }
                .into()),
                Some(lhs) if op.holds(lhs, bound.as_f64()) => Ok(()),
                Some(_) => Err(self.mismatch(value)),
            },
            Term::List { length, element } => {
                let Value::List(items) = value else {
                    return Err(self.mismatch(value));
                };
                match length {
                    Some(LengthSpec::Literal(expected)) => {
                        if items.len() != *expected {
                            return Err(ContractViolation::Length {
                                contract: self.to_string(),
                                expected: *expected,
                                actual: items.len(),
                            }
                            .into());
                        }
                    }
                    Some(LengthSpec::Variable(var)) => ctx.bind_size(*var, items.len())?,
                    None => {}
                }
                if let Some(element) = element {
                    Self::check_elements(element, items, ctx)?;
                }
                Ok(())
            }
            Term::Tuple(children) => {
                let Value::Tuple(items) = value else {
                    return Err(self.mismatch(value));
                };
                if items.len() != children.len() {
                    return Err(ContractViolation::Arity {
                        contract: self.to_string(),
                        expected: children.len(),
                        actual: items.len(),
                    }
                    .into());
                }
                for (index, (child, item)) in children.iter().zip(items).enumerate() {
                    Self::check_element(child, item, index, ctx)?;
                }
                Ok(())
            }
            Term::All(children) => {
                for child in children {
                    child.check_in(value, ctx)?;
                }
                Ok(())
            }
            // Fresh scope per expansion: size variables are local to the
            // named contract's body.
            Term::Named { body, .. } => body.check_in(value, &mut Context::new()),
        }
    }

    fn check_elements(element: &Term, items: &[Value], ctx: &mut Context) -> ContractResult<()> {
        for (index, item) in items.iter().enumerate() {
            Self::check_element(element, item, index, ctx)?;
        }
        Ok(())
    }

    fn check_element(
        element: &Term,
        item: &Value,
        index: usize,
        ctx: &mut Context,
    ) -> ContractResult<()> {
        element.check_in(item, ctx).map_err(|err| match err {
            ContractError::Violation(cause) => ContractViolation::Element {
                contract: element.to_string(),
                index,
                cause: Box::new(cause),
            }
            .into(),
            // Predicate errors propagate unwrapped
            other => other,
        })
    }

    fn mismatch(&self, value: &Value) -> ContractError {
        ContractViolation::Mismatch {
            contract: self.to_string(),
            value: value.clone(),
        }
        .into()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Any => write!(f, "*"),
            Term::Type(tag) => write!(f, "{}", tag),
            Term::Number => write!(f, "number"),
            Term::Predicate(pred) => write!(f, "{}", pred.name()),
            Term::Comparison { op, bound } => write!(f, "{}{}", op, bound),
            Term::List { length, element } => {
                write!(f, "list")?;
                if let Some(length) = length {
                    write!(f, "[{}]", length)?;
                }
                if let Some(element) = element {
                    write!(f, "({})", element)?;
                }
                Ok(())
            }
            Term::Tuple(children) => {
                write!(f, "tuple(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            Term::All(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            Term::Named { name, .. } => write!(f, "{}", name),
        }
    }
}

/// A compiled, checkable contract
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    term: Term,
}

impl Contract {
    /// The root of the expression tree
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Check `value` against this contract
    ///
    /// Allocates a fresh binding context for the duration of the call.
    /// Passes silently; a rejected value is `ContractError::Violation`, a
    /// user predicate's own error surfaces as `ContractError::Predicate`.
    pub fn check(&self, value: &Value) -> ContractResult<()> {
        let mut ctx = Context::new();
        self.term.check_in(value, &mut ctx)
    }

    /// Assert that `value` violates this contract
    ///
    /// Succeeds only if `check` produces a violation. An unexpected pass is
    /// `ContractError::UnexpectedPass`; predicate errors still propagate.
    pub fn fail(&self, value: &Value) -> ContractResult<()> {
        match self.check(value) {
            Err(ContractError::Violation(_)) => Ok(()),
            Err(other) => Err(other),
            Ok(()) => Err(ContractError::UnexpectedPass {
                contract: self.to_string(),
                value: value.clone(),
            }),
        }
    }
}

impl From<Term> for Contract {
    fn from(term: Term) -> Self {
        Self { term }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.term)
    }
}
