//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use subject_authz::{Condition, Policy, RequestContext, RoleDefinition};

pub const SIMPLE_USER_ID: &str = "62e5ed76-458f-49d4-833e-d4787a06603b";
pub const POWER_USER_ID: &str = "ad8117c7-39a5-476b-9977-e21d6ac3b091";
pub const AUTH_ADMIN_ALL_OTHERS_USER_ID: &str = "eb805246-c574-44e4-9038-70f2542aaadb";
pub const AUTH_ADMIN_USER_ID: &str = "cc59093c-92f3-4371-8b80-5d3955bbe260";
pub const ROOT_ADMIN_USER_ID: &str = "02becf45-35a4-4b4c-8e17-69159a883fa4";
pub const ORG_ADMIN_CONJUNCTIVE_ID: &str = "8d536128-bb79-422c-9a19-bd9a5de5a314";
pub const ORG_ADMIN_ROOT_ARRAY_ID: &str = "f8713fc6-4288-432a-a77c-d5723de5b79b";

/// Install a test subscriber once; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ctx(pairs: &[(&str, &str)]) -> RequestContext {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    ctx(pairs)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

const AUTH_ACTIONS: &[&str] = &[
    "auth:GetSubject",
    "auth:GetSubjectActivityTrail",
    "auth:UpdatePassword",
];

pub fn administer_own_auth() -> RoleDefinition {
    RoleDefinition::new(
        "administer-own-auth",
        vec![Policy::allow(
            strings(AUTH_ACTIONS),
            strings(&["auth:principals/{SUBJECT_ID}"]),
        )],
    )
}

pub fn administer_own_money() -> RoleDefinition {
    RoleDefinition::new(
        "administer-own-money",
        vec![Policy::allow(
            strings(&["money:GetBalance", "money:CreateTransfer", "money:CreateWithdrawal"]),
            strings(&["money:accounts/*"]),
        )
        .with_conditions(vec![Condition::string_matches("account:owner", "{SUBJECT_ID}")])],
    )
}

pub fn administer_other_auth() -> RoleDefinition {
    RoleDefinition::new(
        "administer-other-auth",
        vec![Policy::allow(
            strings(AUTH_ACTIONS),
            strings(&["auth:principals/{CONTEXT_VALUE}"]),
        )],
    )
}

pub fn administer_all_auth() -> RoleDefinition {
    RoleDefinition::new(
        "administer-all-auth",
        vec![Policy::allow(strings(&["auth:*"]), strings(&["auth:*"]))],
    )
}

/// Everything, except moving money out of accounts the subject does not own
pub fn do_nearly_everything() -> RoleDefinition {
    RoleDefinition::new(
        "do-nearly-everything",
        vec![
            Policy::allow(strings(&["*"]), strings(&["*"])),
            Policy::deny(
                strings(&["money:CreateTransfer", "money:CreateWithdrawal"]),
                strings(&["*"]),
            )
            .with_conditions(vec![Condition::string_does_not_match(
                "account:owner",
                "{SUBJECT_ID}",
            )]),
        ],
    )
}

fn business_account_type() -> Condition {
    Condition::any_of(vec![
        Condition::string_matches("account:type", "business-checking"),
        Condition::string_matches("account:type", "business-savings"),
    ])
}

pub fn org_business_accounts_conjunctive() -> RoleDefinition {
    RoleDefinition::new(
        "administer-money-same-org-conjunctive",
        vec![Policy::allow(strings(&["money:*"]), strings(&["money:*"])).with_conditions(vec![
            Condition::all_of(vec![
                Condition::string_matches("account:owner:org", "{CONTEXT_VALUE}"),
                business_account_type(),
            ]),
        ])],
    )
}

pub fn org_business_accounts_root_array() -> RoleDefinition {
    RoleDefinition::new(
        "administer-money-same-org-root-array",
        vec![Policy::allow(strings(&["money:*"]), strings(&["money:*"])).with_conditions(vec![
            Condition::string_matches("account:owner:org", "{CONTEXT_VALUE}"),
            business_account_type(),
        ])],
    )
}

pub fn all_roles() -> Vec<RoleDefinition> {
    vec![
        administer_own_auth(),
        administer_other_auth(),
        administer_all_auth(),
        do_nearly_everything(),
        administer_own_money(),
        org_business_accounts_conjunctive(),
        org_business_accounts_root_array(),
    ]
}

/// Budgets are scoped by department and product line from a map context value
pub fn view_budget() -> RoleDefinition {
    RoleDefinition::new(
        "view-budget",
        vec![Policy::allow(strings(&["budget:View"]), strings(&["budget:*"])).with_conditions(
            vec![
                Condition::string_matches("budget:OwningDepartment", "{CONTEXT_VALUE:department}"),
                Condition::string_matches("budget:ProductLine", "{CONTEXT_VALUE:productLine}"),
            ],
        )],
    )
}

pub fn view_non_confidential_blueprints() -> RoleDefinition {
    RoleDefinition::new(
        "view-non-confidential-blueprints",
        vec![Policy::allow(strings(&["blueprints:View"]), strings(&["blueprints:*"]))
            .with_conditions(vec![
                Condition::string_matches("blueprints:OwningDepartment", "{CONTEXT_VALUE:department}"),
                Condition::string_does_not_match_if_exists("blueprints:Classification", "confidential"),
            ])],
    )
}

pub fn view_all_blueprints() -> RoleDefinition {
    RoleDefinition::new(
        "view-all-blueprints",
        vec![Policy::allow(strings(&["blueprints:View"]), strings(&["blueprints:*"]))
            .with_conditions(vec![Condition::string_matches(
                "blueprints:OwningDepartment",
                "{CONTEXT_VALUE:department}",
            )])],
    )
}
