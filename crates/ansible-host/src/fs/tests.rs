//! Unit tests for input files and the file system view.

use std::path::Path;

use rstest::rstest;

use super::*;

#[rstest]
#[case::plain("/a/b/c.yml", "/a/b/c.yml")]
#[case::current_dir("/a/./b/c.yml", "/a/b/c.yml")]
#[case::parent_dir("/a/b/../c.yml", "/a/c.yml")]
#[case::parent_above_root("/../a.yml", "/a.yml")]
#[case::relative_parent("../a/../b.yml", "../b.yml")]
fn normalize_path_is_lexical(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_path(Path::new(input)), Path::new(expected));
}

#[cfg(unix)]
#[test]
fn file_uri_normalises_before_conversion() {
    let uri = file_uri(Path::new("/project/roles/../site.yml")).expect("uri");
    assert_eq!(uri.as_str(), "file:///project/site.yml");
}

#[test]
fn relative_paths_resolve_against_working_directory() {
    let cwd = std::env::current_dir().expect("cwd");
    let uri = file_uri(Path::new("site.yml")).expect("uri");
    let expected = file_uri(&cwd.join("site.yml")).expect("uri");
    assert_eq!(uri, expected);
}

#[cfg(unix)]
#[test]
fn input_files_compare_by_uri() {
    let first = InputFile::new("/project/site.yml", "yaml").expect("file");
    let second = InputFile::new("/project/./site.yml", "yaml")
        .expect("file")
        .with_key("other")
        .with_lines(12);
    assert_eq!(first, second);
    assert_eq!(second.lines(), Some(12));
    assert_eq!(second.to_string(), "other");
}

#[cfg(unix)]
#[test]
fn file_system_filters_by_language() {
    let mut fs = FileSystem::new("/project");
    fs.add_relative("site.yml", "yaml").expect("yaml file");
    fs.add_relative("README.md", "markdown").expect("markdown file");

    let yaml: Vec<&str> = fs.input_files("yaml").map(InputFile::key).collect();
    assert_eq!(yaml, vec!["site.yml"]);
    assert_eq!(fs.len(), 2);
}

#[cfg(unix)]
#[test]
fn adding_the_same_uri_replaces_the_file() {
    let mut fs = FileSystem::new("/project");
    fs.add(InputFile::new("/project/site.yml", "yaml").expect("file"))
        .add(
            InputFile::new("/project/site.yml", "yaml")
                .expect("file")
                .with_lines(3),
        );
    assert_eq!(fs.len(), 1);
    let uri = file_uri(Path::new("/project/site.yml")).expect("uri");
    assert_eq!(fs.input_file(&uri).and_then(InputFile::lines), Some(3));
}

#[test]
fn empty_file_system_reports_empty() {
    let fs = FileSystem::new(tempfile::tempdir().expect("tempdir").path());
    assert!(fs.is_empty());
    assert_eq!(fs.input_files("yaml").count(), 0);
}
