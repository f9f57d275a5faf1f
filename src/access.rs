//! Access-control oracle boundary
//!
//! The host gateway owns role/permission evaluation; adapters only ask
//! "is action A permitted on resource path P for the current caller".
//! This module defines that seam plus the permission-set type the
//! `as_access_components` listing consumes.

use crate::error::{AdapterError, Result};

/// Action requested against a resource path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// Set of actions granted on a resource path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessSet {
    mask: u8,
}

impl AccessSet {
    /// No access at all
    pub fn none() -> Self {
        Self { mask: 0 }
    }

    /// Every action granted
    pub fn full() -> Self {
        Self { mask: 0b1111 }
    }

    pub fn with(mut self, action: Action) -> Self {
        self.mask |= Self::bit(action);
        self
    }

    pub fn allows(&self, action: Action) -> bool {
        self.mask & Self::bit(action) != 0
    }

    /// True when no action is granted; such paths are omitted from
    /// access-component listings
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    fn bit(action: Action) -> u8 {
        match action {
            Action::Read => 0b0001,
            Action::Create => 0b0010,
            Action::Update => 0b0100,
            Action::Delete => 0b1000,
        }
    }
}

/// The external component answering permission questions for the caller
/// bound to the current request
pub trait AccessOracle: Send + Sync {
    /// Permission gate: returns `Forbidden` when the action is denied
    fn check_permission(&self, action: Action, resource: &str) -> Result<()>;

    /// Permission lookup: the set of actions granted on a resource path,
    /// possibly empty
    fn get_permissions(&self, resource: &str) -> AccessSet;
}

/// Oracle granting everything; used by trusted internal callers and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessOracle for AllowAll {
    fn check_permission(&self, _action: Action, _resource: &str) -> Result<()> {
        Ok(())
    }

    fn get_permissions(&self, _resource: &str) -> AccessSet {
        AccessSet::full()
    }
}

/// Helper for oracles built on permission sets: deny with a uniform message
pub fn deny(action: Action, resource: &str) -> AdapterError {
    AdapterError::Forbidden(format!("access denied for {action:?} on '{resource}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_set_membership() {
        let set = AccessSet::none().with(Action::Read).with(Action::Delete);
        assert!(set.allows(Action::Read));
        assert!(set.allows(Action::Delete));
        assert!(!set.allows(Action::Create));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_empty_and_full() {
        assert!(AccessSet::none().is_empty());
        let full = AccessSet::full();
        for action in [Action::Read, Action::Create, Action::Update, Action::Delete] {
            assert!(full.allows(action));
        }
    }

    #[test]
    fn test_allow_all_oracle() {
        let oracle = AllowAll;
        assert!(oracle.check_permission(Action::Delete, "table/users").is_ok());
        assert!(!oracle.get_permissions("schema/").is_empty());
    }
}
