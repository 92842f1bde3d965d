//! Rule keys and the catalog of rules active in the current profile.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Address of one rule in the host catalog.
///
/// # Example
///
/// ```
/// use ansible_host::RuleKey;
///
/// let key = RuleKey::new("ansible", "ANSIBLE0002");
/// assert_eq!(key.to_string(), "ansible:ANSIBLE0002");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RuleKey {
    repository: String,
    rule: String,
}

impl RuleKey {
    /// Creates a rule key.
    #[must_use]
    pub fn new(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }

    /// Returns the repository key.
    #[must_use]
    pub const fn repository(&self) -> &str {
        self.repository.as_str()
    }

    /// Returns the rule identifier within the repository.
    #[must_use]
    pub const fn rule(&self) -> &str {
        self.rule.as_str()
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

/// Rules enabled in the current analysis profile.
///
/// A catalog either lists its rules explicitly or, for hosts without a rule
/// profile, accepts every rule of some repositories.
#[derive(Debug, Clone, Default)]
pub struct ActiveRules {
    rules: HashSet<RuleKey>,
    open_repositories: HashSet<String>,
}

impl ActiveRules {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog that treats every rule of `repository` as active.
    #[must_use]
    pub fn all_of(repository: impl Into<String>) -> Self {
        let mut rules = Self::default();
        rules.open_repositories.insert(repository.into());
        rules
    }

    /// Activates a rule.
    pub fn activate(&mut self, key: RuleKey) -> &mut Self {
        self.rules.insert(key);
        self
    }

    /// Returns `true` when `key` is active.
    #[must_use]
    pub fn is_active(&self, key: &RuleKey) -> bool {
        self.rules.contains(key) || self.open_repositories.contains(key.repository())
    }

    /// Returns the explicitly activated rules.
    pub fn iter(&self) -> impl Iterator<Item = &RuleKey> {
        self.rules.iter()
    }
}
