//! Report rendering.

use clap::ValueEnum;
use serde::Serialize;

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Box-drawn table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Two-column table of labelled values.
#[derive(Debug, Default)]
pub struct Table {
    title: String,
    rows: Vec<(String, String)>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    /// Appends one row per component of `values`, labelled `prefix[i]`.
    pub fn vector(mut self, prefix: &str, values: &[f64]) -> Self {
        for (i, v) in values.iter().enumerate() {
            self.rows.push((format!("{}[{}]", prefix, i), number(*v)));
        }
        self
    }

    /// Renders the table.
    pub fn render(&self) -> String {
        let label_width = self
            .rows
            .iter()
            .map(|(l, _)| l.chars().count())
            .max()
            .unwrap_or(0)
            .max(self.title.chars().count());
        let value_width = self
            .rows
            .iter()
            .map(|(_, v)| v.chars().count())
            .max()
            .unwrap_or(0);
        let total = label_width + value_width + 3;

        let mut out = String::new();
        out.push_str(&format!("┌{}┐\n", "─".repeat(total + 2)));
        out.push_str(&format!("│ {:<total$} │\n", self.title, total = total));
        out.push_str(&format!(
            "├{}┬{}┤\n",
            "─".repeat(label_width + 2),
            "─".repeat(value_width + 2)
        ));
        for (label, value) in &self.rows {
            out.push_str(&format!(
                "│ {:<lw$} │ {:>vw$} │\n",
                label,
                value,
                lw = label_width,
                vw = value_width
            ));
        }
        out.push_str(&format!(
            "└{}┴{}┘",
            "─".repeat(label_width + 2),
            "─".repeat(value_width + 2)
        ));
        out
    }
}

/// Formats a number for tables; NaN reads as "n/a".
pub fn number(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else if value != 0.0 && (value.abs() < 1e-3 || value.abs() >= 1e6) {
        format!("{:.6e}", value)
    } else {
        format!("{:.6}", value)
    }
}

/// Prints `report` as JSON or `table` as a box-drawn table.
pub fn emit<T: Serialize>(format: OutputFormat, report: &T, table: Table) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => println!("{}", table.render()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format() {
        assert_eq!(number(f64::NAN), "n/a");
        assert_eq!(number(0.0), "0.000000");
        assert_eq!(number(0.25), "0.250000");
        assert_eq!(number(1.5e-5), "1.500000e-5");
    }

    #[test]
    fn test_render_aligns_columns() {
        let rendered = Table::new("FORM")
            .row("beta", "3.000000")
            .vector("u", &[1.0, -2.0])
            .render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 7);
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
        assert!(lines[3].contains("beta"));
        assert!(lines[5].contains("u[1]"));
    }
}
