//! Markdown summaries of check results

use crate::models::{BatchResult, CheckResult};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Summary of a single domain check
pub fn render_check_markdown(result: &CheckResult) -> String {
    let mut md = String::new();

    md.push_str("# SSL Certificate Check\n\n");
    md.push_str(&format!("**Domain:** {}\n", result.domain));
    md.push_str(&format!(
        "**Status:** {}\n",
        if result.is_healthy() {
            "✅ Valid"
        } else {
            "❌ Invalid"
        }
    ));

    match &result.certificate {
        Some(cert) => {
            md.push_str(&format!(
                "**Valid Until:** {}\n",
                cert.not_after.format(DATE_FORMAT)
            ));
            md.push_str(&format!("**Days Remaining:** {}\n\n", cert.days_until_expiry));

            md.push_str("## Certificate Details\n");
            md.push_str(&format!("- **Issuer:** {}\n", cert.issuer));
            md.push_str(&format!("- **Subject:** {}\n", cert.subject));
            md.push_str(&format!(
                "- **Valid From:** {}\n",
                cert.not_before.format(DATE_FORMAT)
            ));
            md.push_str(&format!("- **Key Size:** {} bits\n", cert.key_size));
            md.push_str(&format!(
                "- **Signature Algorithm:** {}\n",
                cert.signature_algorithm
            ));
            md.push_str(&format!("- **Serial:** {}\n", cert.serial_number));
            if !cert.san_list.is_empty() {
                md.push_str(&format!("- **SANs:** {}\n", cert.san_list.join(", ")));
            }
        }
        None => {
            md.push_str(&format!(
                "**Error:** {}\n",
                result.error.as_deref().unwrap_or("N/A")
            ));
        }
    }

    if !result.warnings.is_empty() {
        md.push_str("\n## Warnings\n");
        for warning in &result.warnings {
            md.push_str(&format!("- ⚠️ {}\n", warning));
        }
    }

    md
}

/// Summary of a batch, one bullet per domain in input order
pub fn render_batch_markdown(batch: &BatchResult) -> String {
    let summary = batch.summary();
    let mut md = String::new();

    md.push_str("# Multiple Domain SSL Check\n\n");
    md.push_str(&format!("**Total Domains:** {}\n", summary.total));
    md.push_str(&format!(
        "**Valid:** {} | **Invalid:** {} | **Errors:** {} | **Expiring Soon:** {}\n\n",
        summary.valid, summary.invalid, summary.errors, summary.expiring_soon
    ));

    md.push_str("## Results\n");
    for entry in &batch.results {
        md.push_str(&format!("- **{}**: {}", entry.domain, entry.status));
        if let Some(days) = entry.days_remaining {
            md.push_str(&format!(" ({} days)", days));
        }
        if let Some(error) = &entry.error {
            md.push_str(&format!(" - {}", error));
        }
        md.push('\n');
    }

    md
}
