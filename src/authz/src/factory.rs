//! Builds subject authorizers from a shared role catalog

use crate::authorizer::{AuthorizerOptions, SubjectAuthorizer};
use crate::catalog::RoleCatalog;
use crate::error::Result;
use crate::types::Claims;
use std::sync::Arc;

/// Creates a [`SubjectAuthorizer`] per subject from one role catalog
///
/// Cloning is cheap; clones share the catalog.
#[derive(Debug, Clone)]
pub struct AuthorizerFactory {
    catalog: Arc<RoleCatalog>,
    options: AuthorizerOptions,
}

impl AuthorizerFactory {
    /// Factory using default options
    pub fn new(catalog: impl Into<Arc<RoleCatalog>>) -> Self {
        Self::with_options(catalog, AuthorizerOptions::default())
    }

    /// Factory whose authorizers are built with `options` unless overridden
    pub fn with_options(catalog: impl Into<Arc<RoleCatalog>>, options: AuthorizerOptions) -> Self {
        Self {
            catalog: catalog.into(),
            options,
        }
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn options(&self) -> AuthorizerOptions {
        self.options
    }

    /// Build an authorizer for `claims` with the factory's options
    pub fn authorizer_for(&self, claims: &Claims) -> Result<SubjectAuthorizer> {
        self.authorizer_for_with(claims, self.options)
    }

    /// Build an authorizer for `claims` with explicit options
    pub fn authorizer_for_with(
        &self,
        claims: &Claims,
        options: AuthorizerOptions,
    ) -> Result<SubjectAuthorizer> {
        SubjectAuthorizer::build(claims, options, |claim| self.catalog.get(&claim.role_id))
    }
}
