//! Per-subject authorizer
//!
//! Built once from a subject's claims and the known role definitions, then queried
//! for the lifetime of a request (or longer). Construction either succeeds fully or
//! fails; no partially built authorizer is ever returned. After construction the
//! authorizer is immutable, so it is `Send + Sync` and needs no locking.

use crate::engine::{Decision, HasPolicyGrantingOpts, IsAllowedOpts, PolicySet};
use crate::error::{AuthzError, Result};
use crate::materialize::materialize;
use crate::types::{Claims, PolicyWithId, RoleClaim, RoleDefinition};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Options controlling how a subject authorizer is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerOptions {
    /// Fail construction when a claim names a role that is not defined
    ///
    /// When false (the default), such claims contribute no policies.
    #[serde(default)]
    pub throw_on_unknown_role: bool,
}

impl AuthorizerOptions {
    /// Options that reject claims to unknown roles
    pub fn strict() -> Self {
        Self {
            throw_on_unknown_role: true,
        }
    }
}

/// Answers authorization questions for a single subject
#[derive(Debug, Clone)]
pub struct SubjectAuthorizer {
    subject_id: String,
    policies: PolicySet,
}

impl SubjectAuthorizer {
    /// Build an authorizer from all known roles and the subject's claims
    ///
    /// Claims are processed in order; each role's policies keep their order.
    pub fn new(all_roles: &[RoleDefinition], claims: &Claims, options: AuthorizerOptions) -> Result<Self> {
        Self::build(claims, options, |claim| {
            all_roles.iter().find(|role| role.role_id == claim.role_id)
        })
    }

    /// Build an authorizer, resolving each claim's role with `lookup`
    pub(crate) fn build<'r, F>(claims: &Claims, options: AuthorizerOptions, lookup: F) -> Result<Self>
    where
        F: Fn(&RoleClaim) -> Option<&'r RoleDefinition>,
    {
        let mut policies = Vec::new();

        for claim in &claims.roles {
            match lookup(claim) {
                Some(role) => policies.extend(materialize(&claims.subject_id, claim, role)?),
                None if options.throw_on_unknown_role => {
                    return Err(AuthzError::UnknownRole {
                        subject_id: claims.subject_id.clone(),
                        role_id: claim.role_id.clone(),
                    });
                }
                None => {
                    warn!(
                        subject_id = %claims.subject_id,
                        role_id = %claim.role_id,
                        "ignoring claim to unknown role"
                    );
                }
            }
        }

        let policies = PolicySet::partition(policies);

        debug!(
            subject_id = %claims.subject_id,
            allow = policies.allow().len(),
            deny = policies.deny().len(),
            "subject authorizer built"
        );

        Ok(Self {
            subject_id: claims.subject_id.clone(),
            policies,
        })
    }

    /// The subject these policies were built for
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Allow policies, in claim order
    pub fn allow_policies(&self) -> &[PolicyWithId] {
        self.policies.allow()
    }

    /// Deny policies, in claim order
    pub fn deny_policies(&self) -> &[PolicyWithId] {
        self.policies.deny()
    }

    /// Is the subject allowed to perform `action` on `resource`?
    ///
    /// Any matching deny policy wins; otherwise a matching allow policy is required.
    pub fn is_allowed(&self, action: &str, resource: &str, opts: &IsAllowedOpts<'_>) -> bool {
        self.policies.is_allowed(action, resource, opts)
    }

    /// Like [`is_allowed`](Self::is_allowed), but reports the deciding policy
    pub fn evaluate(&self, action: &str, resource: &str, opts: &IsAllowedOpts<'_>) -> Decision {
        self.policies.evaluate(action, resource, opts)
    }

    /// Early check: does any allow policy grant `action` at all?
    ///
    /// Call before expensive request processing to bail out for subjects with no
    /// possible access. Still call [`is_allowed`](Self::is_allowed) once the concrete
    /// resource is known.
    pub fn has_policy_granting(&self, action: &str, opts: &HasPolicyGrantingOpts<'_>) -> Result<bool> {
        self.policies.has_policy_granting(action, opts)
    }
}
