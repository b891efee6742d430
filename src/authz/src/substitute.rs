//! Placeholder substitution for role policies
//!
//! Role policies may reference the subject and the claim's context value:
//!
//! - `{SUBJECT_ID}` is replaced with the subject ID
//! - `{CONTEXT_VALUE}` is replaced with a scalar context value
//! - `{CONTEXT_VALUE:key}` is replaced with `key` looked up in a map context value
//!
//! Substitution is a single left-to-right pass. Substituted text is never scanned
//! again, so a subject ID or context value containing placeholder syntax stays
//! literal.

use crate::types::ContextValue;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Placeholder for the subject ID
pub const SUBJECT_ID_TOKEN: &str = "{SUBJECT_ID}";

/// Placeholder for a scalar context value
pub const CONTEXT_VALUE_TOKEN: &str = "{CONTEXT_VALUE}";

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{SUBJECT_ID\}|\{CONTEXT_VALUE(?::([^{}]*))?\}").unwrap()
});

/// Token substitution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    /// Policy uses a context placeholder but the claim has no context value
    #[error("Role \"{role_id}\" depends on a context value, but none was supplied")]
    MissingContextValue { role_id: String },

    /// Placeholder form does not fit the shape of the context value
    #[error("Role \"{role_id}\" uses {placeholder} but contextValue is not {expected}")]
    ContextTypeMismatch {
        role_id: String,
        placeholder: String,
        expected: &'static str,
    },

    /// Keyed placeholder names a key missing from the context map
    #[error("Role \"{role_id}\" references context key \"{key}\" but it was not provided")]
    MissingContextKey { role_id: String, key: String },
}

/// Values available to placeholders while materializing one role claim
#[derive(Debug, Clone, Copy)]
pub struct TokenValues<'a> {
    pub subject_id: &'a str,
    pub context_value: Option<&'a ContextValue>,
    pub role_id: &'a str,
}

impl<'a> TokenValues<'a> {
    pub fn new(
        subject_id: &'a str,
        context_value: Option<&'a ContextValue>,
        role_id: &'a str,
    ) -> Self {
        Self {
            subject_id,
            context_value,
            role_id,
        }
    }

    /// Replace every placeholder in `input`
    pub fn substitute(&self, input: &str) -> Result<String, SubstitutionError> {
        if !input.contains('{') {
            return Ok(input.to_string());
        }

        let mut output = String::with_capacity(input.len());
        let mut last = 0;

        for caps in TOKEN.captures_iter(input) {
            let Some(token) = caps.get(0) else {
                continue;
            };
            output.push_str(&input[last..token.start()]);
            output.push_str(self.resolve(&caps)?);
            last = token.end();
        }

        output.push_str(&input[last..]);
        Ok(output)
    }

    fn resolve(&self, caps: &Captures<'_>) -> Result<&'a str, SubstitutionError> {
        if &caps[0] == SUBJECT_ID_TOKEN {
            return Ok(self.subject_id);
        }

        // an empty scalar is treated as no context value at all
        let context_value = self
            .context_value
            .filter(|value| !matches!(value, ContextValue::Scalar(s) if s.is_empty()))
            .ok_or_else(|| SubstitutionError::MissingContextValue {
                role_id: self.role_id.to_string(),
            })?;

        match (caps.get(1), context_value) {
            (None, ContextValue::Scalar(value)) => Ok(value.as_str()),
            (None, ContextValue::Map(_)) => Err(SubstitutionError::ContextTypeMismatch {
                role_id: self.role_id.to_string(),
                placeholder: CONTEXT_VALUE_TOKEN.to_string(),
                expected: "a string",
            }),
            (Some(key), ContextValue::Map(map)) => map
                .get(key.as_str())
                .map(String::as_str)
                .ok_or_else(|| SubstitutionError::MissingContextKey {
                    role_id: self.role_id.to_string(),
                    key: key.as_str().to_string(),
                }),
            (Some(_), ContextValue::Scalar(_)) => Err(SubstitutionError::ContextTypeMismatch {
                role_id: self.role_id.to_string(),
                placeholder: caps[0].to_string(),
                expected: "a map",
            }),
        }
    }
}

/// Replace placeholders in `input` for one subject and role claim
pub fn substitute(
    subject_id: &str,
    context_value: Option<&ContextValue>,
    role_id: &str,
    input: &str,
) -> Result<String, SubstitutionError> {
    TokenValues::new(subject_id, context_value, role_id).substitute(input)
}
