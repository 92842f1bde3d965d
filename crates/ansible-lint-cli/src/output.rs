//! JSON lines rendering of saved issues.

use std::io::Write;
use std::sync::Arc;

use ansible_host::Issue;
use serde::Serialize;

use crate::errors::CliError;

/// One issue as printed on stdout.
#[derive(Debug, Serialize)]
struct IssueRecord<'a> {
    rule: String,
    file: &'a str,
    line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl<'a> From<&'a Issue> for IssueRecord<'a> {
    fn from(issue: &'a Issue) -> Self {
        let location = issue.location();
        Self {
            rule: issue.rule_key().to_string(),
            file: location.component(),
            line: location.line(),
            message: location.message(),
        }
    }
}

/// Writes one JSON object per issue, each followed by a newline.
pub(crate) fn write_issues<W: Write>(out: &mut W, issues: &[Issue]) -> Result<(), CliError> {
    for issue in issues {
        serde_json::to_writer(&mut *out, &IssueRecord::from(issue))
            .map_err(|error| CliError::Serialise(Arc::new(error)))?;
        writeln!(out).map_err(|error| CliError::Write(Arc::new(error)))?;
    }
    out.flush().map_err(|error| CliError::Write(Arc::new(error)))
}

#[cfg(test)]
mod tests {
    use ansible_host::{InputFile, RuleKey};

    use super::*;

    #[test]
    fn issues_render_as_json_lines() {
        let file = InputFile::new("/project/site.yml", "yaml")
            .expect("file")
            .with_key("site.yml");
        let issues = vec![
            Issue::new(RuleKey::new("ansible", "ANSIBLE1"), &file, 2)
                .expect("issue")
                .with_message(Some("A first error".to_owned())),
            Issue::new(RuleKey::new("ansible", "EAnyCheck1"), &file, 4).expect("issue"),
        ];
        let mut out = Vec::new();

        write_issues(&mut out, &issues).expect("write");

        let text = String::from_utf8(out).expect("utf-8");
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(
            lines,
            vec![
                serde_json::json!({
                    "rule": "ansible:ANSIBLE1",
                    "file": "site.yml",
                    "line": 2,
                    "message": "A first error",
                }),
                serde_json::json!({
                    "rule": "ansible:EAnyCheck1",
                    "file": "site.yml",
                    "line": 4,
                }),
            ]
        );
    }
}
