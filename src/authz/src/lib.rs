//! # Subject Authorization
//!
//! Role-claim based authorization for backend services.
//!
//! ## Features
//!
//! - **Role definitions** bundle allow/deny policies over action and resource patterns
//! - **Placeholders** (`{SUBJECT_ID}`, `{CONTEXT_VALUE}`, `{CONTEXT_VALUE:key}`) tailor
//!   a role to the subject and claim holding it
//! - **Wildcards**: `*` matches one or more characters
//! - **Conditions** over request context, nestable with `allOf` / `anyOf`
//! - **Deny overrides allow**; anything not explicitly allowed is denied
//! - **Early capability check** to reject requests before expensive work
//! - **Immutable authorizers**, safe to share across threads
//!
//! ## Example
//!
//! ```rust
//! use subject_authz::{
//!     AuthorizerOptions, Claims, Condition, IsAllowedOpts, Policy, RequestContext,
//!     RoleClaim, RoleDefinition, SubjectAuthorizer,
//! };
//!
//! let roles = vec![RoleDefinition::new(
//!     "administer-own-money",
//!     vec![Policy::allow(vec!["money:*".into()], vec!["money:accounts/*".into()])
//!         .with_conditions(vec![Condition::string_matches("account:owner", "{SUBJECT_ID}")])],
//! )];
//! let claims = Claims::new("alice", vec![RoleClaim::new("administer-own-money")]);
//!
//! let authz = SubjectAuthorizer::new(&roles, &claims, AuthorizerOptions::default())?;
//!
//! let mut context = RequestContext::new();
//! context.insert("account:owner".to_string(), "alice".to_string());
//!
//! assert!(authz.is_allowed(
//!     "money:GetBalance",
//!     "money:accounts/123",
//!     &IsAllowedOpts::with_context(&context),
//! ));
//! assert!(!authz.is_allowed("money:GetBalance", "money:accounts/123", &IsAllowedOpts::default()));
//! # Ok::<(), subject_authz::AuthzError>(())
//! ```

pub mod authorizer;
pub mod catalog;
pub mod condition;
pub mod engine;
pub mod error;
pub mod factory;
pub mod materialize;
pub mod pattern;
pub mod substitute;
pub mod types;

// Re-export commonly used types
pub use authorizer::{AuthorizerOptions, SubjectAuthorizer};
pub use catalog::RoleCatalog;
pub use engine::{Decision, DecisionReason, HasPolicyGrantingOpts, IsAllowedOpts, PolicySet};
pub use error::{AuthzError, ErrorKind, Result};
pub use factory::AuthorizerFactory;
pub use materialize::{make_policy_id, materialize};
pub use pattern::{Matches, Pattern, PatternMatcher};
pub use substitute::{substitute, SubstitutionError};
pub use types::{
    Claims, Condition, ConditionMatchType, ConditionMatcher, ContextValue, Effect, Policy,
    PolicyId, PolicyWithId, RequestContext, RoleClaim, RoleDefinition, RoleId, SubjectId,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
