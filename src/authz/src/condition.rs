//! Condition evaluation against a request context
//!
//! Conditions are evaluated only after a policy's action and resource already match.
//! Evaluation fails closed: an unrecognized matcher type is never satisfied.

use crate::pattern::Matches;
use crate::types::{Condition, ConditionMatchType, ConditionMatcher, RequestContext};

/// Maximum nesting depth accepted when materializing conditions
///
/// Root list elements are depth 1. Materialization rejects deeper trees, which bounds
/// the recursion below.
pub const MAX_CONDITION_DEPTH: usize = 32;

/// Check a policy's root condition list
///
/// `None` is vacuously satisfied; otherwise every element must hold.
pub fn all_satisfied<V: Matches>(
    conditions: Option<&[Condition<V>]>,
    context: &RequestContext,
) -> bool {
    match conditions {
        None => true,
        Some(conditions) => conditions.iter().all(|c| is_satisfied(c, context)),
    }
}

/// Check a single condition tree
///
/// Empty `allOf` holds; empty `anyOf` does not.
pub fn is_satisfied<V: Matches>(condition: &Condition<V>, context: &RequestContext) -> bool {
    match condition {
        Condition::Matcher(matcher) => matcher_satisfied(matcher, context),
        Condition::AllOf { all_of } => all_of.iter().all(|c| is_satisfied(c, context)),
        Condition::AnyOf { any_of } => any_of.iter().any(|c| is_satisfied(c, context)),
    }
}

/// Check a leaf matcher
pub fn matcher_satisfied<V: Matches>(
    matcher: &ConditionMatcher<V>,
    context: &RequestContext,
) -> bool {
    let field = context.get(&matcher.field).map(String::as_str);
    let matches = |value: &str| matcher.value.matches(value);

    match (matcher.match_type, field) {
        (ConditionMatchType::StringMatches, Some(value)) => matches(value),
        (ConditionMatchType::StringMatches, None) => false,
        (ConditionMatchType::StringDoesNotMatch, Some(value)) => !matches(value),
        (ConditionMatchType::StringDoesNotMatch, None) => true,
        (ConditionMatchType::StringMatchesIfExists, Some(value)) => matches(value),
        (ConditionMatchType::StringMatchesIfExists, None) => true,
        (ConditionMatchType::StringDoesNotMatchIfExists, Some(value)) => !matches(value),
        (ConditionMatchType::StringDoesNotMatchIfExists, None) => true,
        (ConditionMatchType::Unrecognized, _) => false,
    }
}
