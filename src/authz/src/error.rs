//! Error types for the authorization engine

use crate::substitute::SubstitutionError;
use thiserror::Error;

/// Authorization engine errors
///
/// Every variant describes a configuration or programmer mistake. A request that is
/// simply not permitted is never an error; decisions report that as `false`.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// A claim references a role missing from the catalog (strict construction only)
    #[error("Subject \"{subject_id}\" has claims to unknown role \"{role_id}\"")]
    UnknownRole { subject_id: String, role_id: String },

    /// A claim was materialized against the wrong role definition
    #[error("Claim is for role \"{claim_role_id}\" but role is \"{role_id}\"")]
    RoleMismatch {
        claim_role_id: String,
        role_id: String,
    },

    /// Placeholder substitution failed while materializing a role
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),

    /// Malformed resource prefix pattern passed to the early capability check
    #[error("Invalid resource prefix pattern \"{0}\": must end with a wildcard and cannot contain wildcards elsewhere")]
    InvalidPrefixPattern(String),

    /// A wildcard pattern could not be compiled
    #[error("Invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Condition tree nested past the supported depth
    #[error("Role \"{role_id}\" has conditions nested deeper than {max_depth} levels")]
    ConditionTooDeep { role_id: String, max_depth: usize },

    /// Invalid role or policy definition
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Two catalog entries share a role ID
    #[error("Duplicate role ID: {0}")]
    DuplicateRole(String),

    /// Role catalog could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse grouping of [`AuthzError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Building an authorizer or catalog failed
    Construction,
    /// Token substitution failed
    Substitution,
    /// A caller-supplied argument was malformed
    Validation,
}

impl AuthzError {
    /// Which part of the taxonomy this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Substitution(_) => ErrorKind::Substitution,
            Self::InvalidPrefixPattern(_) => ErrorKind::Validation,
            Self::UnknownRole { .. }
            | Self::RoleMismatch { .. }
            | Self::InvalidPattern { .. }
            | Self::ConditionTooDeep { .. }
            | Self::InvalidPolicy(_)
            | Self::DuplicateRole(_)
            | Self::Json(_) => ErrorKind::Construction,
        }
    }
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = AuthzError::UnknownRole {
            subject_id: "u1".to_string(),
            role_id: "ghost".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert_eq!(
            err.to_string(),
            "Subject \"u1\" has claims to unknown role \"ghost\""
        );

        let err = AuthzError::from(SubstitutionError::MissingContextValue {
            role_id: "r".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Substitution);

        let err = AuthzError::InvalidPrefixPattern("a*b".to_string());
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
