//! Accumulation of parsed issues for one sensor run.
//!
//! The [`IssueAggregator`] owns two pieces of state: the files whose analysis
//! was attempted, and the issues parsed from linter output grouped by file
//! URI. Both keep insertion order. Issues are deduplicated by value, so the
//! same finding printed twice, or printed by two output flavours, is kept
//! once.

use std::collections::{HashMap, HashSet};
use std::mem;
use std::path::{Path, PathBuf};

use ansible_host::InputFile;
use tracing::debug;
use url::Url;

use crate::parser::{AnsibleLintIssue, parse_line, resolve_path};

/// Tracing target for aggregation.
const AGGREGATOR_TARGET: &str = "ansible_lint_sensor::aggregator";

/// Insertion-ordered set of issues for one file.
#[derive(Debug, Default)]
struct IssueSet {
    ordered: Vec<AnsibleLintIssue>,
    seen: HashSet<AnsibleLintIssue>,
}

impl IssueSet {
    fn insert(&mut self, issue: AnsibleLintIssue) -> bool {
        if self.seen.contains(&issue) {
            return false;
        }
        self.seen.insert(issue.clone());
        self.ordered.push(issue);
        true
    }
}

/// Parsed issues and scanned files of one sensor run.
///
/// # Example
///
/// ```
/// use ansible_lint_sensor::IssueAggregator;
///
/// let mut aggregator = IssueAggregator::new("/project");
/// assert!(aggregator.register("site.yml:2: [E301] Commands should not change things"));
/// assert!(aggregator.register("site.yml:2: [E301] Commands should not change things"));
/// assert!(!aggregator.register("Examining site.yml of type playbook"));
/// assert_eq!(aggregator.issue_count(), 1);
/// ```
#[derive(Debug)]
pub struct IssueAggregator {
    base_dir: PathBuf,
    scanned: Vec<InputFile>,
    files: Vec<(Url, IssueSet)>,
    index: HashMap<Url, usize>,
}

impl IssueAggregator {
    /// Creates an empty aggregator resolving relative file names against
    /// `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            scanned: Vec::new(),
            files: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the directory relative file names are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Records that the analysis of `file` was attempted.
    pub fn note_scanned(&mut self, file: InputFile) {
        if !self.scanned.contains(&file) {
            self.scanned.push(file);
        }
    }

    /// Parses one line of linter output and stores the issue it describes.
    ///
    /// Returns `true` when the line is a diagnostic, including when the issue
    /// was already stored or reported on line `0` (which is not stored), and
    /// `false` for any other output.
    pub fn register(&mut self, line: &str) -> bool {
        let Some(diagnostic) = parse_line(line) else {
            return false;
        };
        let flavour = diagnostic.flavour();
        let (filename, issue) = diagnostic.into_parts();

        let uri = match resolve_path(&self.base_dir, &filename) {
            Ok(uri) => uri,
            Err(err) => {
                debug!(target: AGGREGATOR_TARGET, %filename, %err, "unresolvable file name");
                return false;
            }
        };

        if issue.line() == 0 {
            debug!(
                target: AGGREGATOR_TARGET,
                %uri,
                rule = issue.rule_id(),
                "issue reported on line 0 dropped"
            );
            return true;
        }

        let inserted = self.insert(uri, issue);
        debug!(target: AGGREGATOR_TARGET, %flavour, inserted, "diagnostic registered");
        true
    }

    fn insert(&mut self, uri: Url, issue: AnsibleLintIssue) -> bool {
        let position = match self.index.get(&uri) {
            Some(&position) => position,
            None => {
                let position = self.files.len();
                self.index.insert(uri.clone(), position);
                self.files.push((uri, IssueSet::default()));
                position
            }
        };
        self.files
            .get_mut(position)
            .is_some_and(|(_, set)| set.insert(issue))
    }

    /// Hands every stored issue to `emit`, file by file in first-seen order
    /// and in insertion order within a file, then forgets them.
    ///
    /// Scanned files are kept.
    pub fn drain(&mut self, mut emit: impl FnMut(&Url, AnsibleLintIssue)) {
        self.index.clear();
        for (uri, set) in mem::take(&mut self.files) {
            for issue in set.ordered {
                emit(&uri, issue);
            }
        }
    }

    /// Returns the files whose analysis was attempted, in order.
    #[must_use]
    pub fn scanned_files(&self) -> &[InputFile] {
        &self.scanned
    }

    /// Returns `true` when the analysis of `file` was attempted.
    #[must_use]
    pub fn is_scanned(&self, file: &InputFile) -> bool {
        self.scanned.contains(file)
    }

    /// Returns the issues stored for `uri`, in insertion order.
    #[must_use]
    pub fn issues_for(&self, uri: &Url) -> Option<&[AnsibleLintIssue]> {
        let position = *self.index.get(uri)?;
        self.files
            .get(position)
            .map(|(_, set)| set.ordered.as_slice())
    }

    /// Returns the number of stored issues across files.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|(_, set)| set.ordered.len()).sum()
    }

    /// Returns the number of files holding at least one issue.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests;
