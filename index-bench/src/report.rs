//! Report module: prints human-readable benchmark results per scenario.

use crate::config::TimingWindow;
use crate::harness::Timings;
use std::io::{self, Write};

/// Results from timing one query case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub label: String,
    pub table: String,
    pub timings: Timings,
    /// `EXPLAIN QUERY PLAN` detail lines captured before timing.
    pub plan: Vec<String>,
}

impl CaseResult {
    pub fn mean_ns(&self) -> f64 {
        self.timings.mean_ns()
    }

    pub fn mean_us(&self) -> f64 {
        self.timings.mean_us()
    }

    pub fn percentile_us(&self, pct: f64) -> f64 {
        self.timings.percentile_ns(pct) / 1_000.0
    }
}

/// Everything measured in one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario: String,
    pub description: String,
    pub row_count: u64,
    pub query_count: usize,
    pub timing_window: TimingWindow,
    pub cases: Vec<CaseResult>,
    /// Entry count of every index, read after timing.
    pub index_entries: Vec<(String, u64)>,
    pub notes: Vec<String>,
}

impl ScenarioReport {
    pub fn case(&self, label: &str) -> Option<&CaseResult> {
        self.cases.iter().find(|c| c.label == label)
    }

    pub fn fastest(&self) -> Option<&CaseResult> {
        self.cases
            .iter()
            .min_by(|a, b| a.mean_ns().total_cmp(&b.mean_ns()))
    }

    /// How many times slower `case` is than the fastest case.
    pub fn slowdown(&self, case: &CaseResult) -> f64 {
        match self.fastest().map(CaseResult::mean_ns) {
            Some(fastest) if fastest > 0.0 => case.mean_ns() / fastest,
            _ => 1.0,
        }
    }
}

/// Print a formatted report of all scenarios to stdout.
pub fn print_report(reports: &[ScenarioReport]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_report(&mut out, reports) {
        log::error!("failed to write report: {e}");
    }
}

pub fn write_report<W: Write>(out: &mut W, reports: &[ScenarioReport]) -> io::Result<()> {
    writeln!(out, "\n{}", "=".repeat(112))?;
    writeln!(out, "  SQLite Index Benchmark Report")?;
    writeln!(out, "{}", "=".repeat(112))?;

    for report in reports {
        writeln!(out, "\n  Scenario: {}", report.scenario)?;
        writeln!(out, "  {}", report.description)?;
        writeln!(
            out,
            "  Rows per table: {} | Queries per case: {} | Timed to: {}",
            report.row_count, report.query_count, report.timing_window
        )?;
        writeln!(out, "  {}", "-".repeat(108))?;
        writeln!(
            out,
            "  {:40} {:>11} {:>10} {:>9} {:>9} {:>9} {:>8} {:>7}",
            "Case", "Mean (ns)", "Mean (µs)", "p50 (µs)", "p95 (µs)", "p99 (µs)", "Rows/q", "x best"
        )?;

        for case in &report.cases {
            writeln!(
                out,
                "  {:40} {:>11.0} {:>10.2} {:>9.1} {:>9.1} {:>9.1} {:>8.1} {:>7.1}",
                case.label,
                case.mean_ns(),
                case.mean_us(),
                case.percentile_us(50.0),
                case.percentile_us(95.0),
                case.percentile_us(99.0),
                case.timings.rows_per_query(),
                report.slowdown(case),
            )?;
        }

        writeln!(out, "\n  Query plans:")?;
        for case in &report.cases {
            writeln!(out, "  {}", case.label)?;
            for line in &case.plan {
                writeln!(out, "      {line}")?;
            }
        }

        if !report.index_entries.is_empty() {
            writeln!(out, "\n  Index entries:")?;
            for (index, entries) in &report.index_entries {
                writeln!(out, "  {:44} {:>12}", index, entries)?;
            }
        }

        if !report.notes.is_empty() {
            writeln!(out)?;
            for note in &report.notes {
                writeln!(out, "  * {note}")?;
            }
        }
    }

    writeln!(out, "\n{}", "=".repeat(112))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(label: &str, samples: &[u64]) -> CaseResult {
        let mut timings = Timings::default();
        for &ns in samples {
            timings.push_sample(std::time::Duration::from_nanos(ns), 1);
        }
        CaseResult {
            label: label.to_string(),
            table: label.to_string(),
            timings,
            plan: vec![format!("SCAN {label}")],
        }
    }

    fn report() -> ScenarioReport {
        ScenarioReport {
            scenario: "demo".to_string(),
            description: "demo scenario".to_string(),
            row_count: 10,
            query_count: 2,
            timing_window: TimingWindow::FirstRow,
            cases: vec![case("slow", &[4_000, 6_000]), case("fast", &[1_000, 1_000])],
            index_entries: vec![("idx_demo".to_string(), 10)],
            notes: vec!["fast should win".to_string()],
        }
    }

    #[test]
    fn slowdown_is_relative_to_fastest_case() {
        let report = report();
        assert_eq!(report.fastest().map(|c| c.label.as_str()), Some("fast"));
        let slow = report.case("slow").unwrap();
        assert_eq!(report.slowdown(slow), 5.0);
        assert!(report.case("missing").is_none());
    }

    #[test]
    fn written_report_mentions_every_case_plan_and_index() {
        let mut out = Vec::new();
        write_report(&mut out, &[report()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Scenario: demo"));
        assert!(text.contains("Timed to: first-row"));
        assert!(text.contains("SCAN slow"));
        assert!(text.contains("SCAN fast"));
        assert!(text.contains("idx_demo"));
        assert!(text.contains("* fast should win"));
    }
}
