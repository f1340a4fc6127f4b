use serde::Deserialize;

/// A declared scenario parameter and its default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(default)]
    pub default: String,
}

impl ParameterDecl {
    pub fn new(name: &str, default: &str) -> Self {
        ParameterDecl {
            name: name.to_string(),
            default: default.to_string(),
        }
    }

    /// `name = default`, quoting the default unless it is quoted already.
    pub fn assignment(&self) -> String {
        let default = self.default.trim();
        if default.len() >= 2 && default.starts_with('"') && default.ends_with('"') {
            format!("{} = {}", self.name, default)
        } else {
            format!("{} = \"{}\"", self.name, default)
        }
    }
}

/// An already segmented scenario: the names of the unit to produce, an
/// optional precondition, the step sentences in order and the declared
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScenarioRecord {
    pub application: String,
    pub version: String,
    pub use_case: String,
    pub scenario: String,
    #[serde(default)]
    pub precondition: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
}

impl ScenarioRecord {
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }
}
