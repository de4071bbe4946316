//! Per-check binding context for size variables
//!
//! A [`Context`] lives for exactly one top-level `check` call (or one named
//! contract expansion, which opens its own scope) and records the length each
//! size variable was first bound to.

use rustc_hash::FxHashMap;

use crate::errors::ContractViolation;

/// Scratch state for one binding scope
#[derive(Debug, Default)]
pub struct Context {
    sizes: FxHashMap<char, usize>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `variable` to `length`, or verify it against the earlier binding
    ///
    /// The first observation in a scope wins; a later observation with a
    /// different length is a [`ContractViolation::SizeConflict`].
    pub fn bind_size(&mut self, variable: char, length: usize) -> Result<(), ContractViolation> {
        match self.sizes.get(&variable) {
            Some(&bound) if bound != length => Err(ContractViolation::SizeConflict {
                variable,
                bound,
                actual: length,
            }),
            Some(_) => Ok(()),
            None => {
                self.sizes.insert(variable, length);
                Ok(())
            }
        }
    }

    /// The length `variable` is currently bound to, if any
    pub fn size_of(&self, variable: char) -> Option<usize> {
        self.sizes.get(&variable).copied()
    }
}
