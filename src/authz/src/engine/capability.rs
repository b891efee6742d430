//! Early capability check
//!
//! Answers "could this subject perform the action on anything under this resource
//! prefix?" before a concrete resource is known. Lets an API reject a request before
//! doing expensive lookups whose failures (bad request, not found) would leak
//! information to a subject with no access at all.
//!
//! This never replaces `is_allowed`: it only looks at allow policies and ignores
//! conditions entirely.

use super::PolicySet;
use crate::error::{AuthzError, Result};
use crate::pattern::{any_matches, Matches, Pattern, WILDCARD};
use tracing::trace;

/// Options for `has_policy_granting`
#[derive(Debug, Clone, Copy, Default)]
pub struct HasPolicyGrantingOpts<'a> {
    /// Resource prefix such as `budget:kazoo/*`
    ///
    /// Must end with a single `*` and contain no other wildcard. An empty string is
    /// the same as `None`.
    pub resource_prefix_pattern: Option<&'a str>,
}

impl<'a> HasPolicyGrantingOpts<'a> {
    pub fn with_resource_prefix(pattern: &'a str) -> Self {
        Self {
            resource_prefix_pattern: Some(pattern),
        }
    }
}

/// A validated resource prefix pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePrefix<'a> {
    pattern: &'a str,
    prefix: &'a str,
}

impl<'a> ResourcePrefix<'a> {
    /// Validate a prefix pattern
    pub fn parse(pattern: &'a str) -> Result<Self> {
        match pattern.strip_suffix(WILDCARD) {
            Some(prefix) if !prefix.contains(WILDCARD) => Ok(Self { pattern, prefix }),
            _ => Err(AuthzError::InvalidPrefixPattern(pattern.to_string())),
        }
    }

    /// The full pattern, trailing wildcard included
    pub fn pattern(&self) -> &'a str {
        self.pattern
    }

    /// The literal text before the trailing wildcard
    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    /// Whether a policy resource pattern overlaps this prefix
    ///
    /// Compatible when the policy pattern matches the literal prefix pattern text
    /// (a broad policy resource covers a narrower request) or when the policy
    /// pattern's text starts with the prefix (a broad request covers a narrower
    /// policy resource).
    pub fn is_compatible_with(&self, resource: &Pattern) -> bool {
        resource.matches(self.pattern) || resource.as_str().starts_with(self.prefix)
    }
}

impl PolicySet {
    /// Does any allow policy grant `action`, optionally within a resource prefix?
    ///
    /// Fails with [`AuthzError::InvalidPrefixPattern`] on a malformed prefix, whether
    /// or not any policy would have been checked against it.
    pub fn has_policy_granting(&self, action: &str, opts: &HasPolicyGrantingOpts<'_>) -> Result<bool> {
        let prefix = opts
            .resource_prefix_pattern
            .filter(|pattern| !pattern.is_empty())
            .map(ResourcePrefix::parse)
            .transpose()?;

        let granting = self.allow().iter().find(|policy| {
            any_matches(policy.actions(), action)
                && prefix.map_or(true, |prefix| {
                    policy
                        .resources()
                        .iter()
                        .any(|resource| prefix.is_compatible_with(resource))
                })
        });

        match granting {
            Some(policy) => {
                trace!(action, policy_id = %policy.policy_id(), "policy grants action");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
