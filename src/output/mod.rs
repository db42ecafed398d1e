//! Output formatting module
//!
//! Provides various output formats:
//! - Rich terminal output with colors and tables
//! - JSON export
//! - Markdown summaries

pub mod json;
pub mod markdown;
pub mod terminal;

pub use json::{print_json, to_json};
pub use markdown::{render_batch_markdown, render_check_markdown};
pub use terminal::{
    print_batch_summary, print_batch_table, print_certificate_info, print_check_result,
    print_error, print_header, print_success, print_warning,
};
