//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

use stevedore_domain::{ArtifactLocator, InspectionStatus};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a list of scan candidates as a table.
    pub fn artifact_table(&self, locators: &[ArtifactLocator]) -> String {
        if locators.is_empty() {
            return self.colorize("No artifacts due for scanning.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Repository", "Path"]);
        for locator in locators {
            builder.push_record([locator.repo_key(), locator.path()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format per-repository inspection statuses as a table.
    pub fn status_table(&self, rows: &[(String, Option<InspectionStatus>, u64)]) -> String {
        if rows.is_empty() {
            return self.colorize("No repositories configured for inspection.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Repository", "Status", "Artifacts"]);
        for (repo_key, status, artifacts) in rows {
            builder.push_record([
                repo_key.as_str(),
                &self.status_text(*status),
                &artifacts.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn status_text(&self, status: Option<InspectionStatus>) -> String {
        let Some(status) = status else {
            return self.colorize("-", "yellow");
        };
        let color = match status {
            InspectionStatus::Pending => "yellow",
            InspectionStatus::Success => "green",
            InspectionStatus::Failure => "red",
        };
        self.colorize(status.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_table() {
        let formatter = Formatter::new(false);
        let locators = vec![ArtifactLocator::new("npm-local", "left-pad-1.3.0.tgz")];
        let output = formatter.artifact_table(&locators);
        assert!(output.contains("npm-local"));
        assert!(output.contains("left-pad-1.3.0.tgz"));
    }

    #[test]
    fn test_empty_artifact_table() {
        let formatter = Formatter::new(false);
        assert!(formatter
            .artifact_table(&[])
            .contains("No artifacts due for scanning"));
    }

    #[test]
    fn test_status_table_shows_missing_status_as_dash() {
        let formatter = Formatter::new(false);
        let rows = vec![
            ("npm-local".to_string(), Some(InspectionStatus::Success), 12),
            ("libs-release".to_string(), None, 0),
        ];
        let output = formatter.status_table(&rows);
        assert!(output.contains("SUCCESS"));
        assert!(output.contains("12"));
        assert!(output.contains('-'));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("done"), "✓ done");
    }
}
