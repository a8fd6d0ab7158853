//! veil command-line interface.
//!
pub mod discovery;
pub mod output;
pub mod pipeline;

use veil_error::Result;

pub use output::{FileReport, FunctionReport, ProjectReport, ReportFormat};
pub use pipeline::process_files;

/// Extensions the JavaScript front end accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

/// Options for running veil.
pub struct VeilOptions {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
    pub output: Option<String>,
    pub format: ReportFormat,
    pub show_source: bool,
}

/// Main entry point
pub fn run_main(opts: &VeilOptions) -> Result<Option<String>> {
    let extensions: std::collections::HashSet<&str> =
        SUPPORTED_EXTENSIONS.iter().copied().collect();

    let files = discovery::discover_files(opts, &extensions)?;

    if files.is_empty() {
        return Ok(None);
    }

    process_files(opts, &files).map(Some)
}
