//! Report generation (text and JSON).

use std::fmt::Write;

use serde::Serialize;

use veil_core::VisibilityTag;
use veil_error::{Error, Result};

/// Output format for the visibility report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// One function-like declaration in a scanned file.
#[derive(Debug, Serialize)]
pub struct FunctionReport {
    pub name: Option<String>,
    pub kind: String,
    pub tag: String,
    pub line: u32,
    pub column: u32,
    /// What `stringify` would return for this function, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

/// All declarations and eval sites found in one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub functions: Vec<FunctionReport>,
    pub direct_eval_sites: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub files: usize,
    pub functions: usize,
    pub hidden: usize,
    pub sensitive: usize,
    pub direct_eval_sites: usize,
}

/// The whole scan: per-file breakdown plus totals.
#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

impl ProjectReport {
    pub fn new(mut files: Vec<FileReport>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut summary = Summary {
            files: files.len(),
            ..Summary::default()
        };
        for file in &files {
            summary.functions += file.functions.len();
            summary.direct_eval_sites += file.direct_eval_sites;
            for func in &file.functions {
                match func.tag.as_str() {
                    tag if tag == VisibilityTag::HideSource.as_str() => summary.hidden += 1,
                    tag if tag == VisibilityTag::Sensitive.as_str() => summary.sensitive += 1,
                    _ => {}
                }
            }
        }
        ProjectReport { files, summary }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::unexpected(format!("report serialization failed: {e}"))),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let _ = writeln!(out, "{}", file.path);
            for func in &file.functions {
                let name = func.name.as_deref().unwrap_or("<anonymous>");
                let _ = writeln!(
                    out,
                    "  {}:{}  {:<10} {:<17} {}",
                    func.line, func.column, func.tag, func.kind, name
                );
                if let Some(rendered) = &func.rendered {
                    let _ = writeln!(out, "    {rendered}");
                }
            }
            if file.direct_eval_sites > 0 {
                let _ = writeln!(out, "  direct eval sites: {}", file.direct_eval_sites);
            }
        }
        let _ = writeln!(
            out,
            "{} files, {} functions ({} hide-source, {} sensitive), {} direct eval sites",
            self.summary.files,
            self.summary.functions,
            self.summary.hidden,
            self.summary.sensitive,
            self.summary.direct_eval_sites
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProjectReport {
        ProjectReport::new(vec![FileReport {
            path: "a.js".to_string(),
            functions: vec![
                FunctionReport {
                    name: Some("secret".to_string()),
                    kind: "function".to_string(),
                    tag: "hide-source".to_string(),
                    line: 1,
                    column: 1,
                    rendered: None,
                },
                FunctionReport {
                    name: None,
                    kind: "arrow".to_string(),
                    tag: "normal".to_string(),
                    line: 4,
                    column: 13,
                    rendered: None,
                },
            ],
            direct_eval_sites: 2,
        }])
    }

    #[test]
    fn test_summary_counts() {
        let report = sample();
        assert_eq!(report.summary.files, 1);
        assert_eq!(report.summary.functions, 2);
        assert_eq!(report.summary.hidden, 1);
        assert_eq!(report.summary.sensitive, 0);
        assert_eq!(report.summary.direct_eval_sites, 2);
    }

    #[test]
    fn test_text_rendering_mentions_every_function() {
        let text = sample().render(ReportFormat::Text).unwrap();
        assert!(text.contains("a.js"));
        assert!(text.contains("secret"));
        assert!(text.contains("<anonymous>"));
        assert!(text.contains("direct eval sites: 2"));
    }

    #[test]
    fn test_json_rendering_is_valid() {
        let json = sample().render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["functions"], 2);
        assert_eq!(value["files"][0]["functions"][0]["name"], "secret");
    }
}
