//! Table alias allocation for one compiled statement.
//!
//! Aliases are handed out by value: every allocation returns the advanced
//! counter, and the caller threads that counter into the next allocation.
//! Sibling include branches therefore see allocations strictly in
//! declaration order and can never observe each other's state.

use core::fmt;

use crate::error::{NestqlError, Result};

/// A table alias, rendered as `_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alias(u32);

impl Alias {
    #[inline]
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}", self.0)
    }
}

/// The last alias handed out within a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasCounter(u32);

impl AliasCounter {
    /// A counter whose last allocated alias is `alias`.
    #[inline]
    pub const fn starting_at(alias: Alias) -> Self {
        Self(alias.0)
    }

    /// Allocates the next alias and returns it with the advanced counter.
    ///
    /// Fails once the `u32` alias space is used up, so a statement never
    /// reuses an alias.
    #[inline]
    pub fn next(self) -> Result<(Alias, AliasCounter)> {
        let n = self
            .0
            .checked_add(1)
            .ok_or_else(|| NestqlError::InvalidFilter("alias range exhausted".to_string()))?;
        Ok((Alias(n), AliasCounter(n)))
    }

    /// The most recently allocated alias.
    #[inline]
    pub const fn last(self) -> Alias {
        Alias(self.0)
    }
}
