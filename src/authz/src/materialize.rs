//! Turns a role claim plus its role definition into subject-specific policies

use crate::condition::MAX_CONDITION_DEPTH;
use crate::error::{AuthzError, Result};
use crate::pattern::Pattern;
use crate::substitute::TokenValues;
use crate::types::{Condition, ContextValue, PolicyId, PolicyWithId, RoleClaim, RoleDefinition};

/// Build the policies a role claim grants to a subject
///
/// Every action, resource, and condition value passes through token substitution and
/// is compiled into a [`Pattern`]. Fails if the claim is for a different role, if a
/// placeholder cannot be resolved, or if a condition tree is too deep.
pub fn materialize(
    subject_id: &str,
    claim: &RoleClaim,
    role: &RoleDefinition,
) -> Result<Vec<PolicyWithId>> {
    if claim.role_id != role.role_id {
        return Err(AuthzError::RoleMismatch {
            claim_role_id: claim.role_id.clone(),
            role_id: role.role_id.clone(),
        });
    }

    let tokens = TokenValues::new(subject_id, claim.context_value.as_ref(), &role.role_id);
    let mut compile = |raw: &String| -> Result<Pattern> { Pattern::new(tokens.substitute(raw)?) };

    role.policies
        .iter()
        .enumerate()
        .map(|(i, policy)| -> Result<PolicyWithId> {
            let conditions = match &policy.conditions {
                Some(conditions) => {
                    check_depth(&role.role_id, conditions)?;
                    Some(
                        conditions
                            .iter()
                            .map(|c| c.try_map(&mut compile))
                            .collect::<Result<Vec<_>>>()?,
                    )
                }
                None => None,
            };

            Ok(PolicyWithId {
                policy_id: make_policy_id(
                    subject_id,
                    &role.role_id,
                    i,
                    claim.context_value.as_ref(),
                ),
                effect: policy.effect,
                actions: policy
                    .actions
                    .iter()
                    .map(&mut compile)
                    .collect::<Result<Vec<_>>>()?,
                resources: policy
                    .resources
                    .iter()
                    .map(&mut compile)
                    .collect::<Result<Vec<_>>>()?,
                conditions,
            })
        })
        .collect()
}

/// `{role_id}[{index}]|{subject_id}`, plus `|{value}` for a non-empty scalar context
///
/// Map context values are not encoded into the ID.
pub fn make_policy_id(
    subject_id: &str,
    role_id: &str,
    policy_index: usize,
    context_value: Option<&ContextValue>,
) -> PolicyId {
    match context_value {
        Some(ContextValue::Scalar(value)) if !value.is_empty() => {
            format!("{}[{}]|{}|{}", role_id, policy_index, subject_id, value)
        }
        _ => format!("{}[{}]|{}", role_id, policy_index, subject_id),
    }
}

fn check_depth(role_id: &str, conditions: &[Condition]) -> Result<()> {
    if conditions.iter().any(|c| c.depth() > MAX_CONDITION_DEPTH) {
        return Err(AuthzError::ConditionTooDeep {
            role_id: role_id.to_string(),
            max_depth: MAX_CONDITION_DEPTH,
        });
    }
    Ok(())
}
