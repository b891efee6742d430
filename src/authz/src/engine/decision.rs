//! Decision request options and explained decisions

use crate::types::{PolicyId, RequestContext};
use serde::{Deserialize, Serialize};

/// Options for a single `is_allowed` / `evaluate` call
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAllowedOpts<'a> {
    /// Context read by policy conditions; `None` behaves like an empty context
    pub context: Option<&'a RequestContext>,

    /// Treat every policy condition as satisfied
    ///
    /// Useful before the runtime context exists, e.g. to decide whether to render a
    /// UI element for an action the subject could perform.
    pub ignore_conditions: bool,
}

impl<'a> IsAllowedOpts<'a> {
    /// Options carrying a request context
    pub fn with_context(context: &'a RequestContext) -> Self {
        Self {
            context: Some(context),
            ignore_conditions: false,
        }
    }

    /// Options that bypass condition evaluation
    pub fn ignoring_conditions() -> Self {
        Self {
            context: None,
            ignore_conditions: true,
        }
    }
}

/// Outcome of evaluating one request against a subject's policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the request is allowed
    pub allowed: bool,

    /// Policy that made the decision; `None` when nothing matched
    #[serde(rename = "policyID", skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<PolicyId>,

    /// Reason for the decision
    pub reason: DecisionReason,
}

impl Decision {
    /// A deny policy matched
    pub fn explicit_deny(policy_id: impl Into<PolicyId>) -> Self {
        Self {
            allowed: false,
            policy_id: Some(policy_id.into()),
            reason: DecisionReason::ExplicitDeny,
        }
    }

    /// An allow policy matched and no deny policy did
    pub fn allow(policy_id: impl Into<PolicyId>) -> Self {
        Self {
            allowed: true,
            policy_id: Some(policy_id.into()),
            reason: DecisionReason::Allowed,
        }
    }

    /// No policy matched
    pub fn default_deny() -> Self {
        Self {
            allowed: false,
            policy_id: None,
            reason: DecisionReason::NoMatchingPolicy,
        }
    }
}

/// Reason for authorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DecisionReason {
    /// A matching deny policy overrides everything
    ExplicitDeny,

    /// A matching allow policy, with no matching deny
    Allowed,

    /// Closed world: nothing matched
    NoMatchingPolicy,
}
