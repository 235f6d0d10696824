//! Common types for the shared crate

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Permission type
///
/// Operator authority strings checked by the approval gate, e.g.
/// `orders:approve`, `orders:receive`, or the wildcard forms `orders:*`
/// and `*`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission(pub String);

impl Permission {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Check if this permission grants access to the given resource action
    pub fn grants(&self, action: &str) -> bool {
        if self.0 == "*" {
            return true;
        }
        if self.0.ends_with(":*") {
            let prefix = &self.0[..self.0.len() - 2];
            return action.starts_with(prefix);
        }
        self.0 == action
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Permission {
    fn from(s: &str) -> Self {
        Permission(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_permission_grants() {
        let p = Permission("orders:approve".into());
        assert!(p.grants("orders:approve"));
        assert!(!p.grants("orders:receive"));
    }

    #[test]
    fn test_wildcard_permission_grants_everything() {
        let p = Permission("*".into());
        assert!(p.grants("orders:approve"));
        assert!(p.grants("anything"));
    }

    #[test]
    fn test_prefix_wildcard() {
        let p = Permission("orders:*".into());
        assert!(p.grants("orders:approve"));
        assert!(p.grants("orders:receive"));
        assert!(!p.grants("inventory:adjust"));
    }
}
