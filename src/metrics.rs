//! Prometheus text rendering of an audit report
//!
//! Layout is fixed: four gauge families, each preceded by its `# TYPE` line and
//! separated by a blank line. The failure family always opens with a zero-valued
//! `name="null"` sample so a healthy fleet is distinguishable from a missing scrape.

use crate::verdict::AuditReport;
use std::io::{self, Write};

pub const DEFAULT_METRIC_PREFIX: &str = "mydb_backup";

#[derive(Debug, Clone)]
pub struct MetricsFormatter {
	prefix: String,
}

impl MetricsFormatter {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into() }
	}

	pub fn render<W: Write>(&self, report: &AuditReport, out: &mut W) -> io::Result<()> {
		let p = &self.prefix;

		writeln!(out, "# TYPE {p}_report_date gauge")?;
		writeln!(
			out,
			"{p}_report_date{{name=\"reportdate\"}} {}",
			report.generated_at.timestamp()
		)?;
		writeln!(out)?;

		writeln!(out, "# TYPE {p}_failure gauge")?;
		writeln!(out, "{p}_failure{{name=\"null\"}} 0")?;
		for verdict in report.failures() {
			writeln!(out, "{p}_failure{{name=\"{}\"}} 1", escape_label(&verdict.name))?;
		}
		writeln!(out)?;

		writeln!(out, "# TYPE {p}_duration gauge")?;
		for verdict in report.successes() {
			writeln!(
				out,
				"{p}_duration{{name=\"{}\"}} {}",
				escape_label(&verdict.name),
				verdict.duration_secs
			)?;
		}
		writeln!(out)?;

		writeln!(out, "# TYPE {p}_start gauge")?;
		for verdict in report.successes() {
			writeln!(
				out,
				"{p}_start{{name=\"{}\"}} {}",
				escape_label(&verdict.name),
				verdict.start_epoch().unwrap_or_default()
			)?;
		}

		Ok(())
	}

	pub fn render_to_string(&self, report: &AuditReport) -> io::Result<String> {
		let mut buf = Vec::new();
		self.render(report, &mut buf)?;
		String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
	}
}

impl Default for MetricsFormatter {
	fn default() -> Self {
		Self::new(DEFAULT_METRIC_PREFIX)
	}
}

fn escape_label(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'\\' => escaped.push_str("\\\\"),
			'"' => escaped.push_str("\\\""),
			'\n' => escaped.push_str("\\n"),
			_ => escaped.push(c),
		}
	}
	escaped
}
