//! Run summary - Human-readable statistics for an export
//!
//! Printed to stderr with `--stats` so it never mixes with an export written
//! to stdout.

use colored::Colorize;

use crate::core::model::{DiagnosticCode, RunSummary};
use crate::core::tokenizer::TokenModel;

/// Render the summary block
pub fn render_summary(summary: &RunSummary, model: TokenModel) -> String {
    let rule = "═══════════════════════════════════════";
    let mut lines = vec![
        format!("{}", "📊 Export Summary".bold()),
        rule.to_string(),
        format!("  Source:       {}", summary.source),
        format!("  Candidates:   {}", summary.candidates),
        format!("  Selected:     {}", summary.selected),
        format!("  Rendered:     {}", summary.rendered.to_string().green()),
    ];

    let skipped = summary.skipped.to_string();
    lines.push(format!(
        "  Skipped:      {}",
        if summary.skipped > 0 {
            skipped.yellow()
        } else {
            skipped.normal()
        }
    ));
    lines.push(format!("  Binary:       {}", summary.binary));
    lines.push(format!("  Truncated:    {}", summary.truncated));
    if summary.docstrings_stripped > 0 || summary.docstrings_unparsable > 0 {
        lines.push(format!(
            "  Docstrings:   {} stripped, {} unparsable",
            summary.docstrings_stripped, summary.docstrings_unparsable
        ));
    }
    lines.push(format!("  Characters:   {}", summary.total_chars));
    if let Some(tokens) = summary.estimated_tokens {
        lines.push(format!("  Est. Tokens:  {} ({})", tokens.to_string().cyan(), model));
    }
    lines.push(rule.to_string());

    let skips: Vec<_> = summary
        .diagnostics
        .iter()
        .filter(|d| {
            matches!(
                d.code,
                DiagnosticCode::FileSkippedUnreadable | DiagnosticCode::FileSkippedUndecodable
            )
        })
        .collect();
    if !skips.is_empty() {
        lines.push(format!("\n{}", "⚠️  Skipped files:".yellow()));
        for d in skips {
            lines.push(format!("  {:40} {} ({})", d.path, d.message, d.code.as_str()));
        }
    }

    lines.join("\n")
}

/// Print the summary to stderr
pub fn print_summary(summary: &RunSummary, model: TokenModel) {
    eprintln!("{}", render_summary(summary, model));
}
