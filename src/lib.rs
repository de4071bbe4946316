//! Pactum Contract System
//!
//! This crate lets a caller declare validation rules ("contracts") as short
//! textual expressions, predicates, or type tags, register them under a
//! name, and check dynamic [`Value`]s against them at call time.
//!
//! ```
//! use pactum::{new_contract, check, Value, value::list_of};
//!
//! let color = new_contract("color", "list[3](number,>=0,<=1)").unwrap();
//! color.check(&list_of(&[0, 0, 1])).unwrap();
//! color.fail(&list_of(&[0, 0, 2])).unwrap();
//!
//! check("tuple(color, color)", &Value::Tuple(vec![
//!     list_of(&[0, 0, 0]),
//!     list_of(&[1, 1, 1]),
//! ])).unwrap();
//! ```
//!
//! Contracts compose: a registered name used inside another expression is
//! expanded inline as an independent copy, and size variables (`list[N]`)
//! are scoped to one expansion. Checking never mutates shared state; the
//! registry is written only by [`new_contract`] / [`register_predicate`].

pub mod adapter;
pub mod context;
pub mod contract;
pub mod docstring;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod value;

pub use adapter::{ContractSource, TypeTag};
pub use contract::{CmpOp, Contract, LengthSpec, Number, Predicate, Term};
pub use docstring::parse_docstring_types;
pub use errors::{ContractError, ContractResult, ContractViolation, ParseError, ParseErrorKind};
pub use registry::Registry;
pub use value::{Value, ValueKind};

/// Register `source` under `name` in the process-wide registry
///
/// Returns the compiled contract so it can be checked directly. See
/// [`Registry::register`] for the identifier and redefinition rules.
pub fn new_contract(
    name: &str,
    source: impl Into<ContractSource>,
) -> ContractResult<Contract> {
    Registry::global().register(name, source)
}

/// Register a predicate under its own name, returning it unchanged
pub fn register_predicate(pred: Predicate) -> ContractResult<Predicate> {
    Registry::global().register_predicate(pred)
}

/// Parse an expression against the process-wide registry without registering
pub fn parse(expression: &str) -> ContractResult<Contract> {
    Registry::global().parse(expression)
}

/// Check `value` against an expression or a registered contract name
pub fn check(expression: &str, value: &Value) -> ContractResult<()> {
    Registry::global().check(expression, value)
}

/// Whether the adapter would treat `source` as a type tag
pub fn can_be_used_as_a_type(source: &ContractSource) -> bool {
    adapter::can_be_used_as_a_type(source)
}

#[cfg(test)]
mod tests;
