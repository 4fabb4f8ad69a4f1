//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use binscope_core::ExploreResult;
use binscope_core::Identification;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct InspectionOutput<'a> {
    path: String,
    explorer: &'a str,
    token_estimate: usize,
    summary: &'a str,
}

#[derive(Serialize)]
struct IdentificationOutput {
    path: String,
    supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    explorer: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

impl<'a> InspectionOutput<'a> {
    fn new(path: &Path, result: &'a ExploreResult) -> Self {
        Self {
            path: path.display().to_string(),
            explorer: result.explorer,
            token_estimate: result.token_estimate,
            summary: &result.summary,
        }
    }
}

impl IdentificationOutput {
    fn new(path: &Path, id: Option<&Identification>) -> Self {
        Self {
            path: path.display().to_string(),
            supported: id.is_some(),
            explorer: id.map(Identification::explorer),
            format: id.map(Identification::format),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_inspection(&self, path: &Path, result: &ExploreResult) -> Result<()> {
        let output = JsonOutput::success("inspect", InspectionOutput::new(path, result));
        Self::output(&output)
    }

    fn format_identification(&self, path: &Path, id: Option<&Identification>) -> Result<()> {
        let output = JsonOutput::success("identify", IdentificationOutput::new(path, id));
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use binscope_core::identify;

    #[test]
    fn test_inspection_output_structure() {
        let result = ExploreResult::new("Format: zip\n".to_string(), "archive");
        let output = JsonOutput::success(
            "inspect",
            InspectionOutput::new(Path::new("a.zip"), &result),
        );
        let json: serde_json::Value = serde_json::to_value(&output).unwrap();
        assert_eq!(json["operation"], "inspect");
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["explorer"], "archive");
        assert_eq!(json["data"]["token_estimate"], 3);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_identification_output_unsupported() {
        let path = Path::new("notes.txt");
        let id = identify(path, b"hello");
        let json = serde_json::to_value(IdentificationOutput::new(path, id.as_ref())).unwrap();
        assert_eq!(json["supported"], false);
        assert!(json.get("explorer").is_none());
        assert!(json.get("format").is_none());
    }

    #[test]
    fn test_error_output_structure() {
        let output = JsonOutput::<()>::error("inspect", "boom");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }
}
