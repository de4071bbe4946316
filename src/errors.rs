//! Contract-related error types

use thiserror::Error;

use crate::value::Value;

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;

/// Main contract error type
#[derive(Error, Debug)]
pub enum ContractError {
    /// A value failed a check
    #[error("contract violation: {0}")]
    Violation(#[from] ContractViolation),

    /// A name failed the contract identifier rules
    #[error("invalid contract name '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// Malformed expression or unresolved identifier
    #[error("contract parsing error: {0}")]
    Parse(#[from] ParseError),

    /// The adapter rejected a predicate or type source
    #[error("invalid contract source: {0}")]
    InvalidSource(String),

    /// Re-registration under a materially different definition
    #[error("contract '{0}' already defined differently")]
    AlreadyDefined(String),

    /// A user predicate returned an error of its own
    ///
    /// The original error is carried unmodified; callers can downcast it.
    /// This is deliberately distinct from [`ContractViolation`]: a predicate
    /// error signals a bug in the predicate, not a rejected value.
    #[error("predicate '{name}' raised an error while checking a value")]
    Predicate {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// `fail()` was called on a value the contract accepts
    #[error("contract '{contract}' unexpectedly accepted {value}")]
    UnexpectedPass { contract: String, value: Value },
}

impl ContractError {
    /// True when this error is a semantic rejection rather than a usage error
    pub fn is_violation(&self) -> bool {
        matches!(self, ContractError::Violation(_))
    }
}

/// A value failed a contract check
#[derive(Error, Debug, Clone)]
pub enum ContractViolation {
    /// The value does not have the required shape or type
    #[error("value {value} does not satisfy '{contract}'")]
    Mismatch { contract: String, value: Value },

    /// A comparison was applied to a non-numeric value
    #[error("value {value} is not a number, required by '{contract}'")]
    NotNumeric { contract: String, value: Value },

    /// A user predicate returned false
    #[error("predicate '{name}' rejected {value}")]
    Rejected { name: String, value: Value },

    /// Container length differs from the declared length
    #[error("length mismatch for '{contract}': expected {expected} elements, got {actual} ({})",
        if actual < expected { "too short" } else { "too long" }
    )]
    Length {
        contract: String,
        expected: usize,
        actual: usize,
    },

    /// Tuple arity differs from the declared arity
    #[error("expected a tuple of {expected} elements for '{contract}', got {actual}")]
    Arity {
        contract: String,
        expected: usize,
        actual: usize,
    },

    /// A size variable was re-observed with a different length in one scope
    #[error("size variable {variable} already bound to {bound}, got {actual}")]
    SizeConflict {
        variable: char,
        bound: usize,
        actual: usize,
    },

    /// An element of a container violates the element sub-contract
    #[error("element {index} violates '{contract}': {cause}")]
    Element {
        contract: String,
        index: usize,
        cause: Box<ContractViolation>,
    },
}

/// Expression parsing errors, carrying the position and offending text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected token at position {position}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("unexpected end of expression: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("unknown identifier '{name}' at position {position}")]
    UnknownIdentifier { name: String, position: usize },

    #[error("invalid character at position {position}: '{found}'")]
    UnexpectedCharacter { position: usize, found: String },

    #[error("invalid container length at position {position}: '{found}'")]
    InvalidLength { position: usize, found: String },

    #[error("trailing input at position {position}: '{found}'")]
    TrailingInput { position: usize, found: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken,
    UnexpectedEof,
    UnknownIdentifier,
    UnexpectedCharacter,
    InvalidLength,
    TrailingInput,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::UnexpectedToken { .. } => ParseErrorKind::UnexpectedToken,
            ParseError::UnexpectedEof { .. } => ParseErrorKind::UnexpectedEof,
            ParseError::UnknownIdentifier { .. } => ParseErrorKind::UnknownIdentifier,
            ParseError::UnexpectedCharacter { .. } => ParseErrorKind::UnexpectedCharacter,
            ParseError::InvalidLength { .. } => ParseErrorKind::InvalidLength,
            ParseError::TrailingInput { .. } => ParseErrorKind::TrailingInput,
        }
    }
}
