//! Plain-text output of the `list` subcommand.

use crate::models::{ProcessRecord, SortKey};
use crate::utils::truncate_str;

const NAME_WIDTH: usize = 30;
const RULE_WIDTH: usize = 55;

/// Title, header, rule and one row per record.
pub fn render_table(records: &[ProcessRecord], key: SortKey, count: usize) -> String {
    let mut lines = vec![
        format!("Top {} processes sorted by {}", count, key),
        String::new(),
        format!("{:>7} {:>7} {:>7} {:<w$}", "PID", "CPU%", "MEM%", "NAME", w = NAME_WIDTH),
        "─".repeat(RULE_WIDTH),
    ];
    lines.extend(records.iter().take(count).map(|p| {
        format!(
            "{:>7} {:>6.1}% {:>6.1}% {}",
            p.pid,
            p.cpu_percent,
            p.memory_percent,
            truncate_str(&p.name, NAME_WIDTH)
        )
    }));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
