//! Flat string settings store.

use std::collections::BTreeMap;

/// Key/value analysis settings, as provided by the host.
///
/// # Example
///
/// ```
/// use ansible_host::Settings;
///
/// let mut settings = Settings::new();
/// settings.set("sonar.ansible.ansible-lint.disable-warnings", "TRUE");
/// assert!(settings.get_bool("sonar.ansible.ansible-lint.disable-warnings"));
/// assert_eq!(settings.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Creates an empty settings store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns `true` only when `key` holds `true`, ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
