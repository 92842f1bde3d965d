//! The analysis context a sensor runs against.

use crate::error::HostError;
use crate::fs::FileSystem;
use crate::issue::Issue;
use crate::rules::ActiveRules;
use crate::settings::Settings;

/// Host services available to a sensor during one execution.
pub trait SensorContext {
    /// Returns the file system view.
    fn file_system(&self) -> &FileSystem;

    /// Returns the analysis settings.
    fn settings(&self) -> &Settings;

    /// Returns the active rule catalog.
    fn active_rules(&self) -> &ActiveRules;

    /// Persists an issue.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] when the host rejects the issue.
    fn save_issue(&mut self, issue: Issue) -> Result<(), HostError>;
}

/// A [`SensorContext`] that keeps issues in memory.
///
/// Issues are stored in the order they were saved.
#[derive(Debug, Clone)]
pub struct InMemoryContext {
    file_system: FileSystem,
    settings: Settings,
    active_rules: ActiveRules,
    issues: Vec<Issue>,
}

impl InMemoryContext {
    /// Creates a context with no saved issues.
    #[must_use]
    pub const fn new(file_system: FileSystem, settings: Settings, active_rules: ActiveRules) -> Self {
        Self {
            file_system,
            settings,
            active_rules,
            issues: Vec::new(),
        }
    }

    /// Returns the saved issues.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns a mutable handle on the file system.
    pub const fn file_system_mut(&mut self) -> &mut FileSystem {
        &mut self.file_system
    }

    /// Returns a mutable handle on the settings.
    pub const fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Consumes the context, returning the saved issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl SensorContext for InMemoryContext {
    fn file_system(&self) -> &FileSystem {
        &self.file_system
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn active_rules(&self) -> &ActiveRules {
        &self.active_rules
    }

    fn save_issue(&mut self, issue: Issue) -> Result<(), HostError> {
        self.issues.push(issue);
        Ok(())
    }
}
