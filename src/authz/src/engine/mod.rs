//! Deny-overrides-allow decision engine
//!
//! Operates on a subject's fixed, partitioned policy set. Evaluation is pure: no
//! state changes, so a [`PolicySet`] can be shared across threads freely.
//!
//! # Algorithm
//!
//! ```text
//! request ─▶ any deny policy matches? ──yes──▶ DENY (allow set never consulted)
//!                     │ no
//!                     ▼
//!            any allow policy matches? ──yes──▶ ALLOW
//!                     │ no
//!                     ▼
//!                   DENY (closed world)
//! ```
//!
//! A policy matches when one of its action patterns matches the action, one of its
//! resource patterns matches the resource, and its conditions hold (or are ignored).

pub mod capability;
pub mod decision;

pub use capability::{HasPolicyGrantingOpts, ResourcePrefix};
pub use decision::{Decision, DecisionReason, IsAllowedOpts};

use crate::condition;
use crate::pattern::any_matches;
use crate::types::{Effect, PolicyWithId, RequestContext};
use tracing::trace;

/// A subject's policies split by effect, in materialization order
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    deny: Vec<PolicyWithId>,
    allow: Vec<PolicyWithId>,
}

impl PolicySet {
    /// Partition policies by effect, keeping their relative order
    pub fn partition(policies: impl IntoIterator<Item = PolicyWithId>) -> Self {
        let (allow, deny): (Vec<_>, Vec<_>) = policies
            .into_iter()
            .partition(|p| p.effect() == Effect::Allow);

        Self { deny, allow }
    }

    pub fn deny(&self) -> &[PolicyWithId] {
        &self.deny
    }

    pub fn allow(&self) -> &[PolicyWithId] {
        &self.allow
    }

    pub fn len(&self) -> usize {
        self.deny.len() + self.allow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deny.is_empty() && self.allow.is_empty()
    }

    /// Decide a request and report which policy decided it
    pub fn evaluate(&self, action: &str, resource: &str, opts: &IsAllowedOpts<'_>) -> Decision {
        let empty = RequestContext::new();
        let context = opts.context.unwrap_or(&empty);
        let matching = |p: &&PolicyWithId| {
            policy_matches(p, action, resource, context, opts.ignore_conditions)
        };

        if let Some(policy) = self.deny.iter().find(matching) {
            trace!(action, resource, policy_id = %policy.policy_id(), "denied by policy");
            return Decision::explicit_deny(policy.policy_id());
        }

        if let Some(policy) = self.allow.iter().find(matching) {
            trace!(action, resource, policy_id = %policy.policy_id(), "allowed by policy");
            return Decision::allow(policy.policy_id());
        }

        trace!(action, resource, "no matching policy");
        Decision::default_deny()
    }

    /// Is the action on the resource allowed?
    pub fn is_allowed(&self, action: &str, resource: &str, opts: &IsAllowedOpts<'_>) -> bool {
        self.evaluate(action, resource, opts).allowed
    }
}

fn policy_matches(
    policy: &PolicyWithId,
    action: &str,
    resource: &str,
    context: &RequestContext,
    ignore_conditions: bool,
) -> bool {
    any_matches(policy.actions(), action)
        && any_matches(policy.resources(), resource)
        && (ignore_conditions || condition::all_satisfied(policy.conditions(), context))
}
