use std::fmt::Write;

use ssai::AdNotification;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::replay::{ReplayReport, ReportEntry};

pub struct OutputManager {
    format: OutputFormat,
}

impl OutputManager {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &ReplayReport) -> Result<String> {
        match self.format {
            OutputFormat::Pretty => Ok(self.format_pretty(report)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(report)?),
        }
    }

    fn format_pretty(&self, report: &ReplayReport) -> String {
        let mut output = String::new();
        for entry in &report.entries {
            format_entry(&mut output, entry);
        }

        let stats = &report.stats;
        output.push_str("\nSummary:\n");
        let _ = writeln!(output, "  Final position:   {:.1}", report.final_position);
        if let Some(target) = report.snap_forward_target {
            let _ = writeln!(output, "  Pending target:   {target:.1}");
        }
        let _ = writeln!(output, "  Ad active:        {}", report.ad_active);
        let _ = writeln!(
            output,
            "  Ads:              {} started, {} completed, {} skipped, {} in flight",
            stats.started,
            stats.completed,
            stats.skipped,
            stats.in_flight()
        );
        let _ = writeln!(
            output,
            "  Snapback:         {} back, {} forward",
            stats.snapbacks, stats.snap_forwards
        );
        let _ = writeln!(
            output,
            "  Failures:         {} backup loads, {} unrecovered",
            stats.backup_loads, stats.unrecovered_errors
        );
        let played = report.cue_points.iter().filter(|cue| cue.played).count();
        let _ = writeln!(
            output,
            "  Cue points:       {played}/{} played",
            report.cue_points.len()
        );
        output
    }
}

fn format_entry(output: &mut String, entry: &ReportEntry) {
    let _ = writeln!(output, "[{:>3}] {}", entry.step, entry.input);
    for action in &entry.actions {
        let _ = writeln!(output, "      surface  {action}");
    }
    for notification in &entry.notifications {
        let _ = writeln!(output, "      notify   {}", describe(notification));
    }
    if let Some(detail) = &entry.detail {
        let _ = writeln!(output, "      info     {detail}");
    }
    for error in &entry.errors {
        let _ = writeln!(output, "      error    {error}");
    }
}

fn describe(notification: &AdNotification) -> String {
    match notification {
        AdNotification::AdStarted { ad } => {
            let mut text = format!("{} id={}", notification.event_type(), ad.id());
            if let Some(position) = ad.position_in_sequence() {
                let _ = write!(text, " ({position}/{})", ad.sequence_length().unwrap_or(0));
            }
            text
        }
        AdNotification::CuePointsChanged { cue_points } => {
            format!("{} count={}", notification.event_type(), cue_points.len())
        }
        AdNotification::StreamUnavailable { message } => format!(
            "{} {}",
            notification.event_type(),
            message.as_deref().unwrap_or("(no message)")
        ),
        _ => notification.event_type().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssai::{Ad, AdHandle, AdStatistics};

    fn report() -> ReplayReport {
        let mut entry = ReportEntry {
            step: 1,
            input: "event started".to_owned(),
            actions: Vec::new(),
            notifications: vec![AdNotification::AdStarted {
                ad: Ad::new(AdHandle::new("ad-1")),
            }],
            errors: Vec::new(),
            detail: None,
        };
        entry.errors.push("load rejected".to_owned());

        ReplayReport {
            entries: vec![entry],
            stats: AdStatistics {
                started: 2,
                completed: 1,
                ..AdStatistics::default()
            },
            final_position: 12.5,
            snap_forward_target: Some(120.0),
            ad_active: true,
            cue_points: Vec::new(),
        }
    }

    #[test]
    fn test_pretty_output() {
        let output = OutputManager::new(OutputFormat::Pretty)
            .format_report(&report())
            .unwrap();
        assert!(output.contains("[  1] event started"));
        assert!(output.contains("notify   ad_started id=ad-1"));
        assert!(output.contains("error    load rejected"));
        assert!(output.contains("Pending target:   120.0"));
        assert!(output.contains("2 started, 1 completed, 0 skipped, 1 in flight"));
    }

    #[test]
    fn test_json_output() {
        let output = OutputManager::new(OutputFormat::JsonCompact)
            .format_report(&report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["final_position"], 12.5);
        assert_eq!(value["entries"][0]["notifications"][0]["event"], "ad_started");
        assert!(value["entries"][0].get("actions").is_none());
    }
}
