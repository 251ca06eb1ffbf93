use std::fmt::Write;

use super::stats::PathStat;

/// Render statistics as a fixed-width table: `min avg max Count Path`.
pub fn render_table(stats: &[PathStat]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<10} {:<10} {:<10} {}",
        "min", "avg", "max", "Count", "Path"
    );
    for stat in stats {
        let _ = writeln!(
            out,
            "{:<10.2} {:<10.2} {:<10.2} {:<10} {}",
            stat.min, stat.avg, stat.max, stat.count, stat.path
        );
    }
    out
}
