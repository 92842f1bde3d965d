//! Parsing of `ansible-lint` diagnostic lines.
//!
//! The linter's parseable output changed shape across releases. Three
//! grammars are recognised, tried in this order:
//!
//! 1. [`DiagnosticFlavour::Bracketed`]: `path:line: [Erule] message`
//! 2. [`DiagnosticFlavour::RulePrefix`]: `rule path:line`
//! 3. [`DiagnosticFlavour::SuffixColon`]: `path:line: rule`, where `rule` may
//!    also be the composite `yaml (yaml[detail])`
//!
//! Anything else (banners, summaries, progress text) is not a diagnostic and
//! yields `None`.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use ansible_host::{HostError, file_uri};
use regex::{Captures, Regex};
use url::Url;

#[expect(
    clippy::expect_used,
    reason = "grammar patterns are literals covered by the parser tests"
)]
fn grammar(pattern: &str) -> Regex {
    Regex::new(pattern).expect("diagnostic grammar compiles")
}

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| grammar(r"^(.+):(\d+): \[(E[A-Za-z0-9_]+)\] (.*)$"));

static RULE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| grammar(r"^([A-Za-z0-9_-]+) (.+):(\d+)$"));

static SUFFIX_COLON: LazyLock<Regex> = LazyLock::new(|| {
    grammar(r"^(.+):(\d+): (?:yaml \((yaml\[.+\])\)|([A-Za-z0-9_-]+))$")
});

/// The grammar a diagnostic line was recognised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticFlavour {
    /// Legacy `path:line: [Erule] message` output.
    Bracketed,
    /// `rule path:line` output, without message.
    RulePrefix,
    /// `path:line: rule` output, without message.
    SuffixColon,
}

impl DiagnosticFlavour {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bracketed => "bracketed",
            Self::RulePrefix => "rule_prefix",
            Self::SuffixColon => "suffix_colon",
        }
    }
}

impl fmt::Display for DiagnosticFlavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One issue reported by the linter against a file.
///
/// Equality covers the line, the rule and the message; an absent message is
/// distinct from an empty one.
///
/// # Example
///
/// ```
/// use ansible_lint_sensor::AnsibleLintIssue;
///
/// let bare = AnsibleLintIssue::new(3, "yaml");
/// let empty = AnsibleLintIssue::with_message(3, "yaml", "");
/// assert_ne!(bare, empty);
/// assert_eq!(bare.message(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnsibleLintIssue {
    line: u32,
    rule_id: String,
    message: Option<String>,
}

impl AnsibleLintIssue {
    /// Creates an issue without message.
    #[must_use]
    pub fn new(line: u32, rule_id: impl Into<String>) -> Self {
        Self {
            line,
            rule_id: rule_id.into(),
            message: None,
        }
    }

    /// Creates an issue carrying a message.
    #[must_use]
    pub fn with_message(line: u32, rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line,
            rule_id: rule_id.into(),
            message: Some(message.into()),
        }
    }

    /// Returns the 1-based line reported by the linter.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the rule identifier as printed by the linter.
    #[must_use]
    pub const fn rule_id(&self) -> &str {
        self.rule_id.as_str()
    }

    /// Returns the message, when the output flavour carries one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Consumes the issue, returning its message.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
    }
}

impl fmt::Display for AnsibleLintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.rule_id, self.line)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// A recognised diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDiagnostic {
    filename: String,
    issue: AnsibleLintIssue,
    flavour: DiagnosticFlavour,
}

impl ParsedDiagnostic {
    /// Returns the file name as printed by the linter.
    #[must_use]
    pub const fn filename(&self) -> &str {
        self.filename.as_str()
    }

    /// Returns the parsed issue.
    #[must_use]
    pub const fn issue(&self) -> &AnsibleLintIssue {
        &self.issue
    }

    /// Returns the grammar that matched.
    #[must_use]
    pub const fn flavour(&self) -> DiagnosticFlavour {
        self.flavour
    }

    /// Splits the diagnostic into file name and issue.
    #[must_use]
    pub fn into_parts(self) -> (String, AnsibleLintIssue) {
        (self.filename, self.issue)
    }
}

/// Parses one line of linter output.
///
/// # Example
///
/// ```
/// use ansible_lint_sensor::parser::{DiagnosticFlavour, parse_line};
///
/// let parsed = parse_line("site.yml:4: [E301] Commands should not change things")
///     .expect("bracketed diagnostic");
/// assert_eq!(parsed.filename(), "site.yml");
/// assert_eq!(parsed.issue().rule_id(), "E301");
/// assert_eq!(parsed.flavour(), DiagnosticFlavour::Bracketed);
///
/// assert!(parse_line("Loading rules from defaults").is_none());
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<ParsedDiagnostic> {
    parse_bracketed(line)
        .or_else(|| parse_rule_prefix(line))
        .or_else(|| parse_suffix_colon(line))
}

fn parse_bracketed(line: &str) -> Option<ParsedDiagnostic> {
    let caps = BRACKETED.captures(line)?;
    let issue = AnsibleLintIssue::with_message(
        line_number(&caps, 2)?,
        group(&caps, 3)?,
        group(&caps, 4)?,
    );
    Some(ParsedDiagnostic {
        filename: group(&caps, 1)?.to_owned(),
        issue,
        flavour: DiagnosticFlavour::Bracketed,
    })
}

fn parse_rule_prefix(line: &str) -> Option<ParsedDiagnostic> {
    let caps = RULE_PREFIX.captures(line)?;
    Some(ParsedDiagnostic {
        filename: group(&caps, 2)?.to_owned(),
        issue: AnsibleLintIssue::new(line_number(&caps, 3)?, group(&caps, 1)?),
        flavour: DiagnosticFlavour::RulePrefix,
    })
}

fn parse_suffix_colon(line: &str) -> Option<ParsedDiagnostic> {
    let caps = SUFFIX_COLON.captures(line)?;
    let rule_id = group(&caps, 3).or_else(|| group(&caps, 4))?;
    Some(ParsedDiagnostic {
        filename: group(&caps, 1)?.to_owned(),
        issue: AnsibleLintIssue::new(line_number(&caps, 2)?, rule_id),
        flavour: DiagnosticFlavour::SuffixColon,
    })
}

fn group<'h>(caps: &Captures<'h>, index: usize) -> Option<&'h str> {
    caps.get(index).map(|m| m.as_str())
}

/// Reads a line-number group; values beyond `u32` are not diagnostics.
fn line_number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    group(caps, index)?.parse().ok()
}

/// Resolves a file name printed by the linter to the URI of the file.
///
/// Relative names are resolved against `base_dir`; the result is normalised
/// so that it matches the URI of the host's input file.
///
/// # Errors
///
/// Returns [`HostError::InvalidPath`] when the resolved path has no URI form.
pub fn resolve_path(base_dir: &Path, filename: &str) -> Result<Url, HostError> {
    file_uri(&base_dir.join(filename))
}
