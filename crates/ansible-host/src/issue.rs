//! Issues raised against input files.

use serde::Serialize;
use url::Url;

use crate::error::HostError;
use crate::fs::InputFile;
use crate::rules::RuleKey;

/// Where an issue points: a file and the line its text range starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueLocation {
    component: String,
    uri: Url,
    line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IssueLocation {
    /// Returns the display key of the file.
    #[must_use]
    pub const fn component(&self) -> &str {
        self.component.as_str()
    }

    /// Returns the URI of the file.
    #[must_use]
    pub const fn uri(&self) -> &Url {
        &self.uri
    }

    /// Returns the 1-based start line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the human-readable message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// An issue ready to be persisted by the host.
///
/// # Example
///
/// ```
/// use ansible_host::{InputFile, Issue, RuleKey};
///
/// let file = InputFile::new("/project/site.yml", "yaml")
///     .expect("file")
///     .with_lines(10);
/// let issue = Issue::new(RuleKey::new("ansible", "ANSIBLE0002"), &file, 3)
///     .expect("line in range")
///     .with_message(Some("Trailing whitespace".into()));
/// assert_eq!(issue.location().line(), 3);
/// assert!(Issue::new(RuleKey::new("ansible", "ANSIBLE0002"), &file, 11).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    rule_key: RuleKey,
    location: IssueLocation,
}

impl Issue {
    /// Creates an issue on `line` of `file`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::LineOutOfRange`] when `line` is zero or beyond the
    /// file's known line count.
    pub fn new(rule_key: RuleKey, file: &InputFile, line: u32) -> Result<Self, HostError> {
        let beyond_end = file.lines().is_some_and(|lines| line > lines);
        if line == 0 || beyond_end {
            return Err(HostError::LineOutOfRange {
                file: file.key().to_owned(),
                line,
                lines: file.lines().unwrap_or(0),
            });
        }
        Ok(Self {
            rule_key,
            location: IssueLocation {
                component: file.key().to_owned(),
                uri: file.uri().clone(),
                line,
                message: None,
            },
        })
    }

    /// Attaches the primary location message.
    #[must_use]
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.location.message = message;
        self
    }

    /// Returns the rule key.
    #[must_use]
    pub const fn rule_key(&self) -> &RuleKey {
        &self.rule_key
    }

    /// Returns the primary location.
    #[must_use]
    pub const fn location(&self) -> &IssueLocation {
        &self.location
    }
}
