//! Progress indicators for CLI mode
//!
//! This module provides progress display using indicatif.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for batch checks
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(bar_style) =
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
    {
        pb.set_style(bar_style.progress_chars("█▓░"));
    }
    pb.set_message(message.to_string());
    pb
}
