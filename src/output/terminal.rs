//! Rich terminal output formatting

use crate::models::{BatchEntry, BatchResult, BatchStatus, Certificate, CheckResult};
use console::style;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style as TabledStyle},
    Table, Tabled,
};

/// Print section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(format!("━━━ {} ━━━", title)).cyan().bold());
    println!();
}

/// Print the outcome of a single check
pub fn print_check_result(result: &CheckResult, verbose: bool) {
    print_header(&format!("SSL Certificate: {}", result.domain));

    match &result.certificate {
        Some(cert) => {
            if cert.is_valid {
                print_success("Certificate is valid");
            } else {
                print_error("Certificate is not valid");
            }
            print_certificate_info(cert, verbose);
        }
        None => {
            let kind = result
                .error_kind
                .map(|k| k.to_string())
                .unwrap_or_default();
            print_error(&format!(
                "{} [{}]",
                result.error.as_deref().unwrap_or("Check failed"),
                kind
            ));
        }
    }

    if !result.warnings.is_empty() {
        println!();
        for warning in &result.warnings {
            print_warning(warning);
        }
    }
}

/// Print certificate information
pub fn print_certificate_info(cert: &Certificate, verbose: bool) {
    #[derive(Tabled)]
    struct CertRow {
        #[tabled(rename = "Field")]
        field: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let mut rows = vec![
        CertRow {
            field: "Subject".to_string(),
            value: cert.subject.clone(),
        },
        CertRow {
            field: "Issuer".to_string(),
            value: cert.issuer.clone(),
        },
        CertRow {
            field: "Valid From".to_string(),
            value: cert.not_before.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        },
        CertRow {
            field: "Valid Until".to_string(),
            value: cert.not_after.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        },
        CertRow {
            field: "Expires In".to_string(),
            value: format_expiry_days(cert.days_until_expiry),
        },
        CertRow {
            field: "Key Size".to_string(),
            value: format!("{} bits", cert.key_size),
        },
        CertRow {
            field: "Signature".to_string(),
            value: cert.signature_algorithm.clone(),
        },
    ];

    if verbose {
        rows.push(CertRow {
            field: "Serial".to_string(),
            value: cert.serial_number.clone(),
        });
        rows.push(CertRow {
            field: "SHA-256".to_string(),
            value: format_fingerprint(&cert.fingerprint_sha256),
        });
        rows.push(CertRow {
            field: "Lifetime".to_string(),
            value: format!("{} days", cert.validity_period_days()),
        });
    }

    if !cert.san_list.is_empty() {
        let shown: Vec<&str> = if verbose {
            cert.san_list.iter().map(String::as_str).collect()
        } else {
            cert.san_list.iter().take(5).map(String::as_str).collect()
        };
        let mut value = shown.join("\n");
        if shown.len() < cert.san_list.len() {
            value.push_str(&format!("\n... and {} more", cert.san_list.len() - shown.len()));
        }
        rows.push(CertRow {
            field: "SANs".to_string(),
            value,
        });
    }

    let table = Table::new(rows)
        .with(TabledStyle::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{}", table);
}

/// Print the per-domain batch table
pub fn print_batch_table(batch: &BatchResult, issues_only: bool) {
    #[derive(Tabled)]
    struct BatchRow {
        #[tabled(rename = "Domain")]
        domain: String,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Expires")]
        expires: String,
        #[tabled(rename = "Days Left")]
        days: String,
        #[tabled(rename = "Detail")]
        detail: String,
    }

    let entries: Vec<&BatchEntry> = if issues_only {
        batch.issues().collect()
    } else {
        batch.results.iter().collect()
    };

    print_header("Batch Results");

    if entries.is_empty() {
        print_success("No issues found");
        return;
    }

    let rows: Vec<BatchRow> = entries
        .into_iter()
        .map(|entry| BatchRow {
            domain: entry.domain.clone(),
            status: format_status(entry.status),
            expires: entry.expires.clone().unwrap_or_else(|| "-".to_string()),
            days: entry
                .days_remaining
                .map(format_expiry_days)
                .unwrap_or_else(|| "-".to_string()),
            detail: entry.error.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(rows).with(TabledStyle::rounded()).to_string();
    println!("{}", table);
}

/// Print batch check summary
pub fn print_batch_summary(batch: &BatchResult) {
    let summary = batch.summary();
    print_header("Batch Check Summary");

    println!("  Total domains checked: {}", style(summary.total).bold());
    println!("  Valid: {}", style(summary.valid).green());
    println!("  Invalid: {}", style(summary.invalid).red());
    println!("  Errors: {}", style(summary.errors).red());
    println!("  Expiring soon: {}", style(summary.expiring_soon).yellow());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

fn format_status(status: BatchStatus) -> String {
    match status {
        BatchStatus::Valid => style("✓ Valid").green().to_string(),
        BatchStatus::Invalid => style("✗ Invalid").red().to_string(),
        BatchStatus::Error => style("✗ Error").red().bold().to_string(),
    }
}

fn format_expiry_days(days: i64) -> String {
    if days < 0 {
        style(format!("Expired {} days ago", days.abs()))
            .red()
            .to_string()
    } else if days == 0 {
        style("Expires today!").red().bold().to_string()
    } else if days <= 7 {
        style(format!("{} days (critical)", days))
            .red()
            .bold()
            .to_string()
    } else if days <= 30 {
        style(format!("{} days (warning)", days))
            .yellow()
            .to_string()
    } else {
        style(format!("{} days", days)).green().to_string()
    }
}

fn format_fingerprint(fingerprint: &str) -> String {
    // Colon-separated byte pairs
    fingerprint
        .chars()
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
        .to_uppercase()
}
