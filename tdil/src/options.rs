use chrono::Local;
use serde::Deserialize;

/// Timestamp layout of the `Generated on` header line.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Settings of a compilation that are not part of the scenario itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Version written into the file header.
    pub compiler_version: String,
    /// Fixed header timestamp. The current local time is used when unset.
    pub generated_on: Option<String>,
    /// Processes closed and killed after the scenario has run.
    pub teardown_processes: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            compiler_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_on: None,
            teardown_processes: vec!["AcroRd32".to_string()],
        }
    }
}

impl CompileOptions {
    pub fn generated_on(&self) -> String {
        self.generated_on
            .clone()
            .unwrap_or_else(|| Local::now().format(TIMESTAMP_FORMAT).to_string())
    }
}
