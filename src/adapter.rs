//! Normalization of heterogeneous contract sources
//!
//! Anything a caller can register as a contract arrives here as a
//! [`ContractSource`], a closed union: an expression string, a predicate, a
//! type tag, or an already-compiled contract. [`adapt`] turns a source into
//! a [`Contract`], rejecting invalid predicates at registration time so
//! check time never has to probe capabilities.

use std::fmt;

use tracing::debug;

use crate::contract::{Contract, Predicate, Term};
use crate::errors::{ContractError, ContractResult};
use crate::parser::Parser;
use crate::registry::Registry;
use crate::value::{Value, ValueKind};

/// A type used as a contract: a value either is that type or it is not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// One of the built-in value shapes (`int`, `str`, `list`, ...)
    Kind(ValueKind),
    /// A user-defined type, matched against `Value::Tagged` by tag name
    Tagged(String),
}

impl TypeTag {
    /// Structural is-instance relation
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            TypeTag::Kind(kind) => value.kind() == *kind,
            TypeTag::Tagged(name) => matches!(value, Value::Tagged { tag, .. } if tag == name),
        }
    }
}

impl From<ValueKind> for TypeTag {
    fn from(kind: ValueKind) -> Self {
        TypeTag::Kind(kind)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Kind(kind) => write!(f, "{}", kind.name()),
            TypeTag::Tagged(name) => write!(f, "{}", name),
        }
    }
}

/// The inputs accepted wherever a contract is expected
#[derive(Debug, Clone)]
pub enum ContractSource {
    /// An expression in contract syntax, parsed on adaptation
    Expression(String),
    /// A one-argument predicate over values
    Predicate(Predicate),
    /// A type tag: checks become is-instance tests
    Type(TypeTag),
    /// An already-compiled contract, used as-is
    Contract(Contract),
}

impl From<&str> for ContractSource {
    fn from(expr: &str) -> Self {
        ContractSource::Expression(expr.to_string())
    }
}

impl From<String> for ContractSource {
    fn from(expr: String) -> Self {
        ContractSource::Expression(expr)
    }
}

impl From<Predicate> for ContractSource {
    fn from(pred: Predicate) -> Self {
        ContractSource::Predicate(pred)
    }
}

impl From<TypeTag> for ContractSource {
    fn from(tag: TypeTag) -> Self {
        ContractSource::Type(tag)
    }
}

impl From<ValueKind> for ContractSource {
    fn from(kind: ValueKind) -> Self {
        ContractSource::Type(TypeTag::Kind(kind))
    }
}

impl From<Contract> for ContractSource {
    fn from(contract: Contract) -> Self {
        ContractSource::Contract(contract)
    }
}

/// Normalize a source into a compiled contract
///
/// Expressions are parsed against `registry` (named references resolve to
/// already-registered contracts). Predicates must declare exactly one
/// argument; anything else is `ContractError::InvalidSource` here, never a
/// deferred check-time failure.
pub fn adapt(registry: &Registry, source: ContractSource) -> ContractResult<Contract> {
    match source {
        ContractSource::Contract(contract) => Ok(contract),
        ContractSource::Expression(expr) => {
            debug!(expr = %expr, "adapting expression source");
            let term = Parser::new(registry, &expr).parse()?;
            Ok(Contract::from(term))
        }
        ContractSource::Type(tag) => {
            debug!(tag = %tag, "adapting type source");
            Ok(Contract::from(Term::Type(tag)))
        }
        ContractSource::Predicate(pred) => {
            if pred.arity() != 1 {
                return Err(ContractError::InvalidSource(format!(
                    "predicate '{}' must take exactly one argument, takes {}",
                    pred.name(),
                    pred.arity()
                )));
            }
            debug!(predicate = pred.name(), "adapting predicate source");
            Ok(Contract::from(Term::Predicate(pred)))
        }
    }
}

/// Whether the adapter would classify `source` as a type
pub fn can_be_used_as_a_type(source: &ContractSource) -> bool {
    matches!(source, ContractSource::Type(_))
}
