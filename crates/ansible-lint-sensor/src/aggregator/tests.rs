//! Unit tests for the issue aggregator.

use std::path::PathBuf;

use ansible_host::{InputFile, file_uri};
use rstest::{fixture, rstest};

use super::*;

struct Workspace {
    _dir: tempfile::TempDir,
    base: PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().to_path_buf();
    Workspace { _dir: dir, base }
}

fn uri(path: &Path) -> Url {
    file_uri(path).expect("uri")
}

#[rstest]
#[case::bracketed("f.yml:2: [Exxx] there is a problem")]
#[case::rule_prefix("xxx f.yml:3")]
#[case::suffix_colon("f.yml:4: yyy")]
#[case::suffix_colon_yaml("f.yml:6: yaml (yaml[there is a problem])")]
fn diagnostic_lines_are_registered(workspace: Workspace, #[case] line: &str) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    assert!(aggregator.register(line));
    assert_eq!(aggregator.issue_count(), 1);
}

#[rstest]
#[case::no_space_around_bracket("f.yml:12:[xxx]invalid issue")]
#[case::unclosed_bracket("f.yml:12: [xxx invalid issue")]
#[case::prefix_with_message("xxx f.yml:12: invalid issue")]
#[case::free_text("invalid issue")]
fn garbage_lines_are_rejected(workspace: Workspace, #[case] line: &str) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    assert!(!aggregator.register(line));
    assert_eq!(aggregator.issue_count(), 0);
    assert_eq!(aggregator.file_count(), 0);
}

#[rstest]
fn duplicates_collapse_to_distinct_issues(workspace: Workspace) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    for line in [
        "f.yml:2: [Exxx] there is a problem",
        "xxx f.yml:3",
        "f.yml:4: yyy",
        "f.yml:6: yaml (yaml[there is a problem])",
        "f.yml:2: [Exxx] there is a problem",
    ] {
        assert!(aggregator.register(line), "'{line}' should register");
    }

    let issues = aggregator
        .issues_for(&uri(&workspace.base.join("f.yml")))
        .expect("issues for f.yml");
    assert_eq!(
        issues,
        &[
            AnsibleLintIssue::with_message(2, "Exxx", "there is a problem"),
            AnsibleLintIssue::new(3, "xxx"),
            AnsibleLintIssue::new(4, "yyy"),
            AnsibleLintIssue::new(6, "yaml[there is a problem]"),
        ]
    );
}

#[rstest]
fn flavours_reporting_the_same_issue_collapse(workspace: Workspace) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    assert!(aggregator.register("xxx f.yml:5"));
    assert!(aggregator.register("f.yml:5: xxx"));
    assert!(aggregator.register("f.yml:5: [Exxx] with a message"));
    assert_eq!(aggregator.issue_count(), 2);
}

#[rstest]
fn relative_and_absolute_names_share_a_uri(workspace: Workspace) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    let absolute = workspace.base.join("path/to/myfile.yml");
    assert!(aggregator.register(&format!("{}:2: [Exxx] there is a problem", absolute.display())));
    assert!(aggregator.register("xxx path/to/myfile.yml:3"));
    assert!(aggregator.register("xxx ./path/to/../to/myfile.yml:3"));

    assert_eq!(aggregator.file_count(), 1);
    assert_eq!(aggregator.issues_for(&uri(&absolute)).map(<[_]>::len), Some(2));
}

#[rstest]
fn line_zero_is_recognised_but_not_stored(workspace: Workspace) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    assert!(aggregator.register("f.yml:0: [E101] whole file"));
    assert_eq!(aggregator.issue_count(), 0);
    assert_eq!(aggregator.file_count(), 0);
}

#[rstest]
fn drain_follows_insertion_order(workspace: Workspace) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    for line in ["b.yml:9: zzz", "a.yml:1: aaa", "b.yml:3: yyy", "a.yml:1: aaa"] {
        aggregator.register(line);
    }

    let mut emitted = Vec::new();
    aggregator.drain(|uri, issue| emitted.push((uri.clone(), issue.line())));

    let b = uri(&workspace.base.join("b.yml"));
    let a = uri(&workspace.base.join("a.yml"));
    assert_eq!(emitted, vec![(b.clone(), 9), (b, 3), (a, 1)]);
    assert_eq!(aggregator.issue_count(), 0);
}

#[rstest]
fn drain_keeps_scanned_files(workspace: Workspace) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    let file = InputFile::new(workspace.base.join("site.yml"), "yaml").expect("file");
    aggregator.note_scanned(file.clone());
    aggregator.note_scanned(file.clone());
    aggregator.register("site.yml:1: yyy");

    aggregator.drain(|_, _| {});

    assert_eq!(aggregator.scanned_files(), &[file.clone()]);
    assert!(aggregator.is_scanned(&file));
    assert!(aggregator.issues_for(file.uri()).is_none());
}

#[rstest]
fn nothing_scanned_means_nothing_drained(workspace: Workspace) {
    let mut aggregator = IssueAggregator::new(&workspace.base);
    let mut count = 0;
    aggregator.drain(|_, _| count += 1);
    assert_eq!(count, 0);
    assert!(aggregator.scanned_files().is_empty());
}
