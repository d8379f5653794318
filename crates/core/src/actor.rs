//! Actor identity: who performed a creation, mutation, or metadata edit.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identity attributed to domain changes (`created_by`, `last_updated_by`,
/// a log entry's `by`).
///
/// Actors are opaque display identities at this layer; mapping them to
/// authenticated principals, roles, or sessions is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(Cow<'static, str>);

impl Actor {
    /// Create an actor identity. Fails on empty/whitespace-only names.
    pub fn new(name: impl Into<Cow<'static, str>>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("actor cannot be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
