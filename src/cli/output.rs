//! Output formatting utilities

use crate::application::{DiscoveryReport, NoteOutcome, PublishReport};
use std::path::Path;

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn push_list(output: &mut String, items: &[String]) {
    for item in items {
        output.push_str(&format!("  - {}\n", item));
    }
}

fn push_failures(output: &mut String, outcomes: &[NoteOutcome]) {
    for outcome in outcomes {
        if let NoteOutcome::Failed { source, error } = outcome {
            output.push_str(&format!("  ✗ {}: {}\n", file_label(source), error));
        }
    }
}

/// Format the discovery report for display
pub fn format_discovery_report(report: &DiscoveryReport) -> String {
    let mut output = String::new();

    if report.eligible.is_empty() {
        output.push_str("No publishable notes found\n");
    } else {
        output.push_str(&format!(
            "Eligible ({} of {}):\n",
            report.eligible.len(),
            report.total
        ));
        for note in &report.eligible {
            output.push_str(&format!("  {}\n", note.file_name()));
        }
    }

    if !report.skipped.is_empty() {
        output.push_str(&format!("Skipped ({}):\n", report.skipped.len()));
        for skipped in &report.skipped {
            output.push_str(&format!(
                "  {}: {}\n",
                file_label(&skipped.path),
                skipped.reason
            ));
        }
    }

    output
}

/// Format the end-of-run summary
pub fn format_publish_report(report: &PublishReport) -> String {
    let mut output = String::new();

    if report.eligible == 0 {
        output.push_str("No publishable notes found\n");
    }

    if report.dry_run {
        output.push_str("Dry run: nothing was written or deleted\n");
        output.push_str(&format!(
            "Discovered: {}\nEligible: {}\n",
            report.discovered, report.eligible
        ));
        if !report.planned.is_empty() {
            output.push_str("Would publish:\n");
            for planned in &report.planned {
                output.push_str(&format!(
                    "  {} -> {}\n",
                    file_label(&planned.source),
                    planned.slug
                ));
            }
        }
        if report.failed > 0 {
            output.push_str(&format!("Cannot publish: {}\n", report.failed));
            push_failures(&mut output, &report.outcomes);
        }
        if !report.removed_notes.is_empty() {
            output.push_str("Would remove notes:\n");
            push_list(&mut output, &report.removed_notes);
        }
        if !report.removed_media.is_empty() {
            output.push_str("Would remove media:\n");
            push_list(&mut output, &report.removed_media);
        }
        return output;
    }

    output.push_str(&format!(
        "Discovered: {}\nEligible: {}\nPublished: {}\nFailed: {}\n",
        report.discovered, report.eligible, report.published, report.failed
    ));

    push_failures(&mut output, &report.outcomes);

    if !report.missing_media.is_empty() {
        output.push_str(&format!("Missing media: {}\n", report.missing_media.len()));
        push_list(&mut output, &report.missing_media);
    }

    if report.removed_notes.is_empty() {
        output.push_str("No orphaned notes to clean\n");
    } else {
        output.push_str(&format!("Removed notes: {}\n", report.removed_notes.len()));
        push_list(&mut output, &report.removed_notes);
    }

    if report.removed_media.is_empty() {
        output.push_str("No orphaned media to clean\n");
    } else {
        output.push_str(&format!("Removed media: {}\n", report.removed_media.len()));
        push_list(&mut output, &report.removed_media);
    }

    output
}
