//! Settings consumed by the sensor.

use ansible_host::Settings;

/// Setting holding the path to the `ansible-lint` executable.
pub const ANSIBLE_LINT_PATH_KEY: &str = "sonar.ansible.ansible-lint.path";

/// Setting holding the path to an `ansible-lint` configuration file.
pub const ANSIBLE_LINT_CONF_PATH_KEY: &str = "sonar.ansible.ansible-lint.conf.path";

/// Setting that hides `WARNING` lines printed on the linter's stderr.
pub const ANSIBLE_LINT_DISABLE_WARNINGS_KEY: &str = "sonar.ansible.ansible-lint.disable-warnings";

/// Executable used when no path is configured.
pub const DEFAULT_ANSIBLE_LINT_PATH: &str = "ansible-lint";

/// Snapshot of the linter settings taken when the sensor starts.
///
/// # Example
///
/// ```
/// use ansible_host::Settings;
/// use ansible_lint_sensor::settings::{ANSIBLE_LINT_CONF_PATH_KEY, LintSettings};
///
/// let mut settings = Settings::new();
/// settings.set(ANSIBLE_LINT_CONF_PATH_KEY, "/etc/ansible-lint.yml");
///
/// let snapshot = LintSettings::from_settings(&settings);
/// assert_eq!(snapshot.lint_path(), "ansible-lint");
/// assert_eq!(snapshot.conf_path(), Some("/etc/ansible-lint.yml"));
/// assert!(!snapshot.disable_warnings());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSettings {
    lint_path: String,
    conf_path: Option<String>,
    disable_warnings: bool,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            lint_path: DEFAULT_ANSIBLE_LINT_PATH.to_owned(),
            conf_path: None,
            disable_warnings: false,
        }
    }
}

impl LintSettings {
    /// Reads the sensor settings from the host store.
    ///
    /// Blank paths count as unset.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let non_blank = |key: &str| {
            settings
                .get(key)
                .filter(|value| !value.trim().is_empty())
                .map(str::to_owned)
        };
        Self {
            lint_path: non_blank(ANSIBLE_LINT_PATH_KEY)
                .unwrap_or_else(|| DEFAULT_ANSIBLE_LINT_PATH.to_owned()),
            conf_path: non_blank(ANSIBLE_LINT_CONF_PATH_KEY),
            disable_warnings: settings.get_bool(ANSIBLE_LINT_DISABLE_WARNINGS_KEY),
        }
    }

    /// Returns the executable to run.
    #[must_use]
    pub const fn lint_path(&self) -> &str {
        self.lint_path.as_str()
    }

    /// Returns the configuration file passed with `-c`, if any.
    #[must_use]
    pub fn conf_path(&self) -> Option<&str> {
        self.conf_path.as_deref()
    }

    /// Returns `true` when `WARNING` lines on stderr are hidden.
    #[must_use]
    pub const fn disable_warnings(&self) -> bool {
        self.disable_warnings
    }
}
