//! Validated, indexed collection of role definitions
//!
//! Role definitions normally ship as static configuration. The catalog validates
//! them once at load time so that construction failures surface at startup, not on
//! a subject's first request.
//!
//! # Example
//!
//! ```rust
//! use subject_authz::RoleCatalog;
//!
//! let catalog = RoleCatalog::from_json(r#"[
//!     {
//!         "roleID": "own-auth",
//!         "policies": [{
//!             "effect": "Allow",
//!             "actions": ["auth:GetSubject"],
//!             "resources": ["auth:principals/{SUBJECT_ID}"]
//!         }]
//!     }
//! ]"#).unwrap();
//!
//! assert_eq!(catalog.len(), 1);
//! assert!(catalog.get("own-auth").is_some());
//! ```

use crate::error::{AuthzError, Result};
use crate::types::{RoleDefinition, RoleId};
use std::collections::HashMap;

/// Role definitions keyed by role ID, in definition order
#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    roles: Vec<RoleDefinition>,
    index: HashMap<RoleId, usize>,
}

impl RoleCatalog {
    /// Validate and index role definitions
    ///
    /// Fails on duplicate or empty role IDs and on policies without actions or
    /// resources.
    pub fn new(roles: Vec<RoleDefinition>) -> Result<Self> {
        let mut index = HashMap::with_capacity(roles.len());

        for (i, role) in roles.iter().enumerate() {
            role.validate()?;

            if index.insert(role.role_id.clone(), i).is_some() {
                return Err(AuthzError::DuplicateRole(role.role_id.clone()));
            }
        }

        Ok(Self { roles, index })
    }

    /// Parse a JSON array of role definitions
    pub fn from_json(json: &str) -> Result<Self> {
        let roles: Vec<RoleDefinition> = serde_json::from_str(json)?;
        Self::new(roles)
    }

    /// Look up a role by ID
    pub fn get(&self, role_id: &str) -> Option<&RoleDefinition> {
        self.index.get(role_id).map(|&i| &self.roles[i])
    }

    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
