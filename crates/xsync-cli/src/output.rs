//! Report rendering

use xsync_core::{LagReport, Result, SyncError};

/// How the report is printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Three human-readable lines
    Text,
    /// One JSON object
    Json,
}

/// Render a report without a trailing newline
pub fn render(report: &LagReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "delta: {} samples\nsample rate: {} Hz\ndelta time: {} ms",
            report.delta_samples, report.sample_rate, report.delta_ms
        )),
        OutputFormat::Json => serde_json::to_string(report)
            .map_err(|e| SyncError::Unknown(format!("cannot serialize report: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_report() {
        let text = render(&LagReport::new(400, 8000), OutputFormat::Text).unwrap();
        assert_eq!(text, "delta: 400 samples\nsample rate: 8000 Hz\ndelta time: 50 ms");
    }

    #[test]
    fn test_negative_text_report() {
        let text = render(&LagReport::new(-2205, 44100), OutputFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "delta: -2205 samples");
        assert_eq!(lines[2], "delta time: -50 ms");
    }

    #[test]
    fn test_json_report() {
        let json = render(&LagReport::new(-400, 8000), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["delta_samples"], -400);
        assert_eq!(value["sample_rate"], 8000);
        assert_eq!(value["delta_ms"], -50);
    }
}
