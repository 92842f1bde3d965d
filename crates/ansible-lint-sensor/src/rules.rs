//! Reconciliation of linter rule identifiers with the active rule catalog.
//!
//! Legacy `ansible-lint` releases print rule ids with an `E` prefix
//! (`[E301]`) while newer ones print bare ids. The catalog may key a rule
//! either way, so lookups try the printed id first and its legacy variant
//! second.

use ansible_host::{ActiveRules, RuleKey};

/// Repository key of the Ansible rules in the host catalog.
pub const REPOSITORY_KEY: &str = "ansible";

/// Returns the candidate rule ids for `rule_id`, printed form first.
fn candidates(rule_id: &str) -> [String; 2] {
    let legacy = rule_id
        .strip_prefix('E')
        .filter(|rest| !rest.is_empty())
        .map_or_else(|| format!("E{rule_id}"), str::to_owned);
    [rule_id.to_owned(), legacy]
}

/// Resolves a printed rule id to an active rule key.
///
/// # Example
///
/// ```
/// use ansible_host::{ActiveRules, RuleKey};
/// use ansible_lint_sensor::rules::{REPOSITORY_KEY, resolve_rule_key};
///
/// let mut active = ActiveRules::new();
/// active.activate(RuleKey::new(REPOSITORY_KEY, "ANSIBLE1"));
///
/// let key = resolve_rule_key(&active, "EANSIBLE1").expect("legacy id resolves");
/// assert_eq!(key.rule(), "ANSIBLE1");
/// assert!(resolve_rule_key(&active, "EUNKNOWN").is_none());
/// ```
#[must_use]
pub fn resolve_rule_key(active_rules: &ActiveRules, rule_id: &str) -> Option<RuleKey> {
    candidates(rule_id)
        .into_iter()
        .map(|candidate| RuleKey::new(REPOSITORY_KEY, candidate))
        .find(|key| active_rules.is_active(key))
}
