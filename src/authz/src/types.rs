//! Core authorization types
//!
//! Role definitions and claims are caller-owned inputs. Field names on the wire follow
//! the external JSON shape (`roleID`, `contextValue`, `allOf`, ...).

use crate::error::{AuthzError, Result};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique role identifier
pub type RoleId = String;

/// Subject identifier (user, service account, ...)
pub type SubjectId = String;

/// Policy identifier derived during materialization
pub type PolicyId = String;

/// Per-call request context read by policy conditions
///
/// An absent key is distinct from a key mapped to an empty string.
pub type RequestContext = HashMap<String, String>;

/// Policy effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Allow the action
    Allow,
    /// Deny the action
    Deny,
}

/// How a condition matcher compares its value to the context field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionMatchType {
    /// Field present and matching the pattern
    StringMatches,
    /// Field absent, or present and not matching the pattern
    StringDoesNotMatch,
    /// Field absent, or present and matching the pattern
    StringMatchesIfExists,
    /// Field absent, or present and not matching the pattern
    StringDoesNotMatchIfExists,
    /// Any tag this engine does not know; never satisfied
    #[serde(other)]
    Unrecognized,
}

/// Leaf test against one field of the request context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionMatcher<V = String> {
    #[serde(rename = "type")]
    pub match_type: ConditionMatchType,

    /// Context field to read
    pub field: String,

    /// Pattern the field value is compared against
    pub value: V,
}

impl ConditionMatcher {
    /// Create a matcher
    pub fn new(
        match_type: ConditionMatchType,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            match_type,
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Condition tree: a matcher or a conjunction of nested conditions
///
/// `V` is the type of matcher values: raw strings in role definitions, compiled
/// [`Pattern`]s once materialized for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition<V = String> {
    Matcher(ConditionMatcher<V>),
    AllOf {
        #[serde(rename = "allOf")]
        all_of: Vec<Condition<V>>,
    },
    AnyOf {
        #[serde(rename = "anyOf")]
        any_of: Vec<Condition<V>>,
    },
}

impl Condition {
    /// `StringMatches` leaf
    pub fn string_matches(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Matcher(ConditionMatcher::new(
            ConditionMatchType::StringMatches,
            field,
            value,
        ))
    }

    /// `StringDoesNotMatch` leaf
    pub fn string_does_not_match(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Matcher(ConditionMatcher::new(
            ConditionMatchType::StringDoesNotMatch,
            field,
            value,
        ))
    }

    /// `StringMatchesIfExists` leaf
    pub fn string_matches_if_exists(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Matcher(ConditionMatcher::new(
            ConditionMatchType::StringMatchesIfExists,
            field,
            value,
        ))
    }

    /// `StringDoesNotMatchIfExists` leaf
    pub fn string_does_not_match_if_exists(
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Matcher(ConditionMatcher::new(
            ConditionMatchType::StringDoesNotMatchIfExists,
            field,
            value,
        ))
    }
}

impl<V> Condition<V> {
    /// `allOf` conjunction
    pub fn all_of(conditions: Vec<Condition<V>>) -> Self {
        Self::AllOf { all_of: conditions }
    }

    /// `anyOf` conjunction
    pub fn any_of(conditions: Vec<Condition<V>>) -> Self {
        Self::AnyOf { any_of: conditions }
    }

    /// Nesting depth of this tree; a lone matcher has depth 1
    ///
    /// Walks the tree with an explicit stack, so arbitrarily deep trees built in code
    /// are measured without recursing.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];

        while let Some((condition, depth)) = stack.pop() {
            max = max.max(depth);
            if let Self::AllOf { all_of: children } | Self::AnyOf { any_of: children } = condition {
                stack.extend(children.iter().map(|child| (child, depth + 1)));
            }
        }

        max
    }

    /// Deep-copy the tree, converting every matcher value with `f`
    ///
    /// Conjunction structure is preserved; only leaves are touched.
    pub fn try_map<U, F>(&self, f: &mut F) -> Result<Condition<U>>
    where
        F: FnMut(&V) -> Result<U>,
    {
        Ok(match self {
            Self::Matcher(matcher) => Condition::Matcher(ConditionMatcher {
                match_type: matcher.match_type,
                field: matcher.field.clone(),
                value: f(&matcher.value)?,
            }),
            Self::AllOf { all_of } => Condition::AllOf {
                all_of: all_of
                    .iter()
                    .map(|c| c.try_map(f))
                    .collect::<Result<Vec<_>>>()?,
            },
            Self::AnyOf { any_of } => Condition::AnyOf {
                any_of: any_of
                    .iter()
                    .map(|c| c.try_map(f))
                    .collect::<Result<Vec<_>>>()?,
            },
        })
    }
}

/// Allow or deny rule over action and resource patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Does this policy allow or deny?
    pub effect: Effect,

    /// Action patterns (e.g., "auth:GetSubject", "money:*")
    pub actions: Vec<String>,

    /// Resource patterns (e.g., "auth:principals/{SUBJECT_ID}")
    pub resources: Vec<String>,

    /// Optional conditions, all of which must hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

impl Policy {
    /// Create an unconditional allow policy
    pub fn allow(actions: Vec<String>, resources: Vec<String>) -> Self {
        Self {
            effect: Effect::Allow,
            actions,
            resources,
            conditions: None,
        }
    }

    /// Create an unconditional deny policy
    pub fn deny(actions: Vec<String>, resources: Vec<String>) -> Self {
        Self {
            effect: Effect::Deny,
            actions,
            resources,
            conditions: None,
        }
    }

    /// Attach conditions to the policy
    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Validate the policy definition
    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(AuthzError::InvalidPolicy(
                "Policy must list at least one action".to_string(),
            ));
        }

        if self.resources.is_empty() {
            return Err(AuthzError::InvalidPolicy(
                "Policy must list at least one resource".to_string(),
            ));
        }

        Ok(())
    }
}

/// Policy customized for one subject
///
/// Only the materializer creates these; the fields are read-only from outside the
/// crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyWithId {
    #[serde(rename = "policyID")]
    pub(crate) policy_id: PolicyId,
    pub(crate) effect: Effect,
    pub(crate) actions: Vec<Pattern>,
    pub(crate) resources: Vec<Pattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) conditions: Option<Vec<Condition<Pattern>>>,
}

impl PolicyWithId {
    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn actions(&self) -> &[Pattern] {
        &self.actions
    }

    pub fn resources(&self) -> &[Pattern] {
        &self.resources
    }

    pub fn conditions(&self) -> Option<&[Condition<Pattern>]> {
        self.conditions.as_deref()
    }
}

/// Named bundle of policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Role identifier, unique within a catalog
    #[serde(rename = "roleID")]
    pub role_id: RoleId,

    /// Policies granted (or denied) by this role
    pub policies: Vec<Policy>,
}

impl RoleDefinition {
    /// Create a new role
    pub fn new(role_id: impl Into<String>, policies: Vec<Policy>) -> Self {
        Self {
            role_id: role_id.into(),
            policies,
        }
    }

    /// Validate the role definition
    pub fn validate(&self) -> Result<()> {
        if self.role_id.is_empty() {
            return Err(AuthzError::InvalidPolicy(
                "Role ID cannot be empty".to_string(),
            ));
        }

        for (i, policy) in self.policies.iter().enumerate() {
            policy.validate().map_err(|e| match e {
                AuthzError::InvalidPolicy(msg) => {
                    AuthzError::InvalidPolicy(format!("{}[{}]: {}", self.role_id, i, msg))
                }
                other => other,
            })?;
        }

        Ok(())
    }
}

/// Value attached to a role claim
///
/// A scalar fills `{CONTEXT_VALUE}`; a map fills `{CONTEXT_VALUE:key}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Scalar(String),
    Map(HashMap<String, String>),
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<HashMap<String, String>> for ContextValue {
    fn from(value: HashMap<String, String>) -> Self {
        Self::Map(value)
    }
}

/// Assertion that a subject holds a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClaim {
    #[serde(rename = "roleID")]
    pub role_id: RoleId,

    #[serde(
        rename = "contextValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub context_value: Option<ContextValue>,
}

impl RoleClaim {
    /// Claim a role without a context value
    pub fn new(role_id: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            context_value: None,
        }
    }

    /// Attach a context value to the claim
    pub fn with_context(mut self, value: impl Into<ContextValue>) -> Self {
        self.context_value = Some(value.into());
        self
    }
}

/// Everything a subject is allowed to do, as role claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "subjectID")]
    pub subject_id: SubjectId,

    pub roles: Vec<RoleClaim>,
}

impl Claims {
    /// Create claims for a subject
    pub fn new(subject_id: impl Into<String>, roles: Vec<RoleClaim>) -> Self {
        Self {
            subject_id: subject_id.into(),
            roles,
        }
    }
}
