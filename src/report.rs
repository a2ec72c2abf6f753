// src/report.rs
// =============================================================================
// Turns collected issues into output for a human or a machine.
//
// Two formats:
// - A table grouped by document, followed by a summary
// - A JSON array, one object per issue (for CI pipelines)
//
// Only issues at or above the chosen level are shown; the summary always
// counts every ERROR so the exit code and the text agree.
// =============================================================================

use crate::issues::{Issue, Level};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// One issue as it appears in the JSON report
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IssueRecord<'a> {
    pub level: Level,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<&'a str>,
}

impl<'a> From<&'a Issue> for IssueRecord<'a> {
    fn from(issue: &'a Issue) -> Self {
        Self {
            level: issue.level,
            message: &issue.message,
            document: issue.document().map(|d| d.path.as_str()),
            href: issue.href(),
        }
    }
}

/// Counts shown at the bottom of the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub documents: usize,
    pub links: usize,
}

pub fn render_json(issues: &[Issue], level: Level) -> serde_json::Result<String> {
    let records: Vec<IssueRecord<'_>> = issues
        .iter()
        .filter(|issue| issue.level >= level)
        .map(IssueRecord::from)
        .collect();
    serde_json::to_string_pretty(&records)
}

pub fn render_table(issues: &[Issue], level: Level, summary: Summary) -> String {
    let mut out = String::new();

    // Group by document; issues without one (shouldn't happen in practice)
    // are listed under an empty name
    let mut by_document: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    for issue in issues.iter().filter(|issue| issue.level >= level) {
        let document = issue.document().map(|d| d.path.as_str()).unwrap_or("");
        by_document.entry(document).or_default().push(issue);
    }

    for (document, issues) in &by_document {
        let _ = writeln!(out, "{}", document);
        for issue in issues {
            let href = issue.href().map(|h| format!(" --- {}", h)).unwrap_or_default();
            let _ = writeln!(out, "  {:<8} {}{}", issue.level, issue.message, href);
        }
        out.push('\n');
    }

    let errors = issues.iter().filter(|i| i.level == Level::Error).count();
    let _ = writeln!(out, "📊 Summary:");
    let _ = writeln!(out, "   📄 Documents: {}", summary.documents);
    let _ = writeln!(out, "   🔗 Links: {}", summary.links);
    if errors == 0 {
        let _ = writeln!(out, "   ✅ No errors");
    } else {
        let _ = writeln!(out, "   ❌ Errors: {}", errors);
    }
    out
}
