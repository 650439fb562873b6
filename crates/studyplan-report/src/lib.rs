//! studyplan-report: Rendering of plans and run summaries.
//!
//! Plain text for the terminal, Markdown for sharing, and a JSON run report
//! that can be saved and analysed again later.

pub mod json;
pub mod markdown;
pub mod text;

pub use json::RunReport;
pub use markdown::{generate_markdown, write_markdown_report};
pub use text::{format_analysis, format_plan};
