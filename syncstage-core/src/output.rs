use crate::report::{PlannedRename, RenameFailure, RunStats};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Result of a rename run over one or more roots
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameResult {
    pub roots: Vec<PathBuf>,
    pub dry_run: bool,
    pub renames: Vec<PlannedRename>,
    pub failures: Vec<RenameFailure>,
    pub stats: RunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_out: Option<PathBuf>,
    pub interrupted: bool,
}

/// Result of replaying a saved plan
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplayResult {
    pub plan: PathBuf,
    pub dry_run: bool,
    pub renames: Vec<PlannedRename>,
    pub failures: Vec<RenameFailure>,
    pub stats: RunStats,
    pub interrupted: bool,
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

fn write_totals(output: &mut String, dry_run: bool, stats: &RunStats) {
    let verb = if dry_run { "Would rename" } else { "Renamed" };
    writeln!(output, "✓ {} {} of {} items", verb, stats.renamed, stats.scanned).ok();
    if stats.already_named > 0 {
        writeln!(output, "  {} already named", stats.already_named).ok();
    }
    if stats.unchanged > 0 {
        writeln!(output, "  {} unchanged", stats.unchanged).ok();
    }
    if stats.missing > 0 {
        writeln!(output, "  {} missing", stats.missing).ok();
    }
    if stats.failed > 0 {
        writeln!(output, "✗ {} failed", stats.failed).ok();
    }
}

fn write_failures(output: &mut String, failures: &[RenameFailure]) {
    for failure in failures {
        writeln!(output, "  {}: {}", failure.path.display(), failure.error).ok();
    }
}

impl OutputFormatter for RenameResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "rename",
            "dry_run": self.dry_run,
            "roots": self.roots,
            "summary": self.stats,
            "renames": self.renames,
            "failures": self.failures,
            "plan_out": self.plan_out,
            "interrupted": self.interrupted,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        write_totals(&mut output, self.dry_run, &self.stats);
        write_failures(&mut output, &self.failures);

        if let Some(plan) = &self.plan_out {
            writeln!(output, "Plan written to {}", plan.display()).ok();
        }
        if self.interrupted {
            output.push_str("Interrupted; remaining items were not processed\n");
        } else if self.dry_run && self.stats.renamed > 0 {
            output.push_str("Dry run only. Re-run with --apply to rename\n");
        }

        output
    }
}

impl OutputFormatter for ReplayResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "replay",
            "plan": self.plan,
            "dry_run": self.dry_run,
            "summary": self.stats,
            "renames": self.renames,
            "failures": self.failures,
            "interrupted": self.interrupted,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = format!("Plan: {}\n", self.plan.display());
        write_totals(&mut output, self.dry_run, &self.stats);
        write_failures(&mut output, &self.failures);
        if self.interrupted {
            output.push_str("Interrupted; remaining entries were not processed\n");
        }
        output
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RenameKind;

    fn sample_rename(dry_run: bool) -> RenameResult {
        RenameResult {
            roots: vec![PathBuf::from("/data")],
            dry_run,
            renames: vec![PlannedRename {
                from: PathBuf::from("/data/a.txt"),
                to: PathBuf::from("/data/2024-03-05 A.txt"),
                kind: RenameKind::File,
            }],
            failures: vec![RenameFailure {
                path: PathBuf::from("/data/bad.txt"),
                error: "invalid date format '%Q' in template".to_string(),
            }],
            stats: RunStats {
                scanned: 3,
                renamed: 1,
                already_named: 1,
                failed: 1,
                ..RunStats::default()
            },
            plan_out: Some(PathBuf::from("plan.csv")),
            interrupted: false,
        }
    }

    #[test]
    fn test_rename_result_json_format() {
        let json = sample_rename(true).format(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["operation"], "rename");
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["summary"]["renamed"], 1);
        assert_eq!(value["renames"][0]["kind"], "file");
        assert_eq!(value["plan_out"], "plan.csv");
    }

    #[test]
    fn test_rename_result_summary_dry_run() {
        let summary = sample_rename(true).format(OutputFormat::Summary);
        assert!(summary.contains("Would rename 1 of 3 items"));
        assert!(summary.contains("1 already named"));
        assert!(summary.contains("/data/bad.txt"));
        assert!(summary.contains("Plan written to plan.csv"));
        assert!(summary.contains("--apply"));
    }

    #[test]
    fn test_rename_result_summary_applied() {
        let summary = sample_rename(false).format_summary();
        assert!(summary.contains("Renamed 1 of 3 items"));
        assert!(!summary.contains("--apply"));
    }

    #[test]
    fn test_replay_result_summary() {
        let result = ReplayResult {
            plan: PathBuf::from("plan.csv"),
            dry_run: false,
            renames: vec![],
            failures: vec![],
            stats: RunStats {
                scanned: 2,
                renamed: 1,
                missing: 1,
                ..RunStats::default()
            },
            interrupted: true,
        };
        let summary = result.format_summary();
        assert!(summary.contains("Plan: plan.csv"));
        assert!(summary.contains("1 missing"));
        assert!(summary.contains("Interrupted"));
        assert!(result.format_json().contains("\"operation\":\"replay\""));
    }

    #[test]
    fn test_version_result() {
        let result = VersionResult {
            name: "syncstage".to_string(),
            version: "0.1.0".to_string(),
        };
        assert_eq!(result.format_summary(), "syncstage 0.1.0");
        assert!(result.format_json().contains("\"version\":\"0.1.0\""));
    }
}
