//! Terminal presentation: notices and the results listing.

use std::io::{self, Write};

use client_core::{Notice, Notifier, Severity};
use shared::domain::KinematicEntry;

/// Prints notices; warnings and errors go to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let line = format_notice(&notice);
        match notice.severity {
            Severity::Warning | Severity::Error => eprintln!("{line}"),
            Severity::Success | Severity::Info => println!("{line}"),
        }
    }
}

pub fn format_notice(notice: &Notice) -> String {
    format!("[{}] {}: {}", notice.severity, notice.title, notice.text)
}

pub fn render_entries(out: &mut impl Write, entries: &[KinematicEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(
        out,
        "{:>6}  {:<16}  {:>5}  {:<10}  {:>6}  {:>6}",
        "id", "group", "servo", "direction", "min", "max"
    )?;
    for entry in entries {
        let id = entry
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:>6}  {:<16}  {:>5}  {:<10}  {:>6}  {:>6}",
            id, entry.group_id, entry.servo_id, entry.direction, entry.min_value, entry.max_value
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::EntryId;

    #[test]
    fn notice_line_includes_severity_and_title() {
        let notice = Notice::new(Severity::Info, "No results", "Nothing here.");
        assert_eq!(format_notice(&notice), "[info] No results: Nothing here.");
    }

    #[test]
    fn renders_header_and_one_line_per_entry() {
        let entries = vec![KinematicEntry {
            id: Some(EntryId(12)),
            group_id: "G1".into(),
            servo_id: 0,
            direction: "cw".into(),
            min_value: 0,
            max_value: 1023,
        }];
        let mut out = Vec::new();
        render_entries(&mut out, &entries).expect("render");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("direction"));
        assert!(lines[1].trim_start().starts_with("12"));
        assert!(lines[1].contains("1023"));
    }

    #[test]
    fn empty_results_render_nothing() {
        let mut out = Vec::new();
        render_entries(&mut out, &[]).expect("render");
        assert!(out.is_empty());
    }
}
