//! Named contract registry
//!
//! A [`Registry`] maps contract names to compiled contracts. Names obey the
//! contract identifier rules (at least two characters, identifier shape, not
//! a reserved keyword; single uppercase letters stay available as size
//! variables). Re-registering a name is a silent no-op when the new
//! definition equals the stored one and an error otherwise, so duplicate
//! imports are harmless but conflicting definitions never go unnoticed.
//!
//! Registries are plain values and can be created per test or per subsystem;
//! [`Registry::global`] is the process-wide instance the top-level functions
//! use. Registration is expected from one logical writer (module init or
//! test setup), though the interior lock makes concurrent use safe.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::adapter::{adapt, ContractSource};
use crate::contract::{Contract, Predicate};
use crate::errors::{ContractError, ContractResult};
use crate::parser::{is_reserved, Parser};
use crate::value::Value;

/// Process-wide name -> contract table
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<FxHashMap<String, Contract>>,
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::default);

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the top-level API
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Register `source` under `name`
    ///
    /// Validates the name, normalizes the source through the adapter, and
    /// stores the result. Registering an equal definition again succeeds and
    /// returns the stored contract; a different definition under the same
    /// name is [`ContractError::AlreadyDefined`]. Entries are never removed.
    pub fn register(
        &self,
        name: &str,
        source: impl Into<ContractSource>,
    ) -> ContractResult<Contract> {
        validate_identifier(name)?;
        let contract = adapt(self, source.into())?;

        let mut entries = self.entries.write();
        match entries.get(name) {
            Some(existing) if *existing == contract => {
                trace!(name, "re-registered with an equal definition");
                Ok(existing.clone())
            }
            Some(_) => Err(ContractError::AlreadyDefined(name.to_string())),
            None => {
                debug!(name, contract = %contract, "registered contract");
                entries.insert(name.to_string(), contract.clone());
                Ok(contract)
            }
        }
    }

    /// Register a predicate under its own name and hand it back unchanged
    ///
    /// The decorator-style form: the predicate stays usable as a plain
    /// function while `parse` starts resolving its name.
    pub fn register_predicate(&self, pred: Predicate) -> ContractResult<Predicate> {
        let name = pred.name().to_string();
        self.register(&name, pred.clone())?;
        Ok(pred)
    }

    /// Look up a registered contract by name
    ///
    /// Returns an independent copy; the parser maps a miss to
    /// `ParseError::UnknownIdentifier`.
    pub fn resolve(&self, name: &str) -> Option<Contract> {
        self.entries.read().get(name).cloned()
    }

    /// Parse an expression against this registry without registering it
    pub fn parse(&self, expression: &str) -> ContractResult<Contract> {
        let term = Parser::new(self, expression).parse()?;
        Ok(Contract::from(term))
    }

    /// Parse `expression` (or a bare registered name) and check `value`
    pub fn check(&self, expression: &str, value: &Value) -> ContractResult<()> {
        self.parse(expression)?.check(value)
    }
}

/// Validate a contract name, naming the violated rule on failure
pub(crate) fn validate_identifier(name: &str) -> ContractResult<()> {
    let invalid = |reason: &str| ContractError::InvalidIdentifier {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let first = match name.chars().next() {
        Some(c) => c,
        None => return Err(invalid("name is empty")),
    };
    if first.is_ascii_digit() {
        return Err(invalid("name may not start with a digit"));
    }
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(invalid("name must start with a letter or underscore"));
    }
    if let Some(bad) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(invalid(&format!("name contains invalid character '{}'", bad)));
    }
    if name.len() < 2 {
        return Err(invalid(
            "single-character names are reserved for size variables",
        ));
    }
    if is_reserved(name) {
        return Err(invalid("name is a reserved keyword"));
    }
    Ok(())
}
