use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Characters a version may contain and the characters they encode to.
const VERSION_ENCODING: [(char, char); 3] = [('*', 's'), ('.', 'd'), ('-', 'u')];

/// Alphabet of an encoded version fragment.
static ENCODED_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9sdu]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("unit name fragment '{fragment}' is empty")]
    EmptyFragment { fragment: &'static str },
    #[error("unit name fragment '{fragment}' contains reserved character '{character}' in '{text}'")]
    ReservedCharacter {
        fragment: &'static str,
        character: char,
        text: String,
    },
    #[error("'{0}' is not a qualified unit name: expected four dot-separated segments")]
    SegmentCount(String),
    #[error("'{0}' is not a qualified unit name: application contains whitespace")]
    Application(String),
    #[error("'{0}' is not a qualified unit name: malformed version segment")]
    Version(String),
}

/// Replace every space with an underscore. Lossless for text without
/// underscores; [`UnitName`] collapses whitespace runs before encoding.
pub fn encode(fragment: &str) -> String {
    fragment.replace(' ', "_")
}

/// Reverse of [`encode`].
pub fn decode(fragment: &str) -> String {
    fragment.replace('_', " ")
}

pub fn encode_version(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            VERSION_ENCODING
                .iter()
                .find(|(plain, _)| *plain == c)
                .map_or(c, |(_, encoded)| *encoded)
        })
        .collect()
}

pub fn decode_version(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            VERSION_ENCODING
                .iter()
                .find(|(_, encoded)| *encoded == c)
                .map_or(c, |(plain, _)| *plain)
        })
        .collect()
}

/// The four-part name of a compiled unit.
///
/// Fragments are stored decoded. The qualified form encodes each of them and
/// joins them with `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitName {
    application: String,
    version: String,
    use_case: String,
    scenario: String,
}

impl UnitName {
    pub fn new(
        application: &str,
        version: &str,
        use_case: &str,
        scenario: &str,
    ) -> Result<Self, NameError> {
        let application = checked_fragment("application", application)?;
        let use_case = checked_fragment("use case", use_case)?;
        let scenario = checked_fragment("scenario", scenario)?;

        let version = version.trim();
        if version.is_empty() {
            return Err(NameError::EmptyFragment { fragment: "version" });
        }
        if let Some(character) = version
            .chars()
            .find(|c| !c.is_ascii_digit() && !VERSION_ENCODING.iter().any(|(plain, _)| plain == c))
        {
            return Err(NameError::ReservedCharacter {
                fragment: "version",
                character,
                text: version.to_string(),
            });
        }

        Ok(UnitName {
            application,
            version: version.to_string(),
            use_case,
            scenario,
        })
    }

    /// Parse a qualified name produced by [`UnitName::qualified`].
    pub fn parse(qualified: &str) -> Result<Self, NameError> {
        let segments: Vec<&str> = qualified.split('.').collect();
        let [application, version, use_case, scenario] = segments.as_slice() else {
            return Err(NameError::SegmentCount(qualified.to_string()));
        };
        if application.is_empty() || application.chars().any(char::is_whitespace) {
            return Err(NameError::Application(qualified.to_string()));
        }
        if !ENCODED_VERSION.is_match(version) {
            return Err(NameError::Version(qualified.to_string()));
        }
        UnitName::new(
            &decode(application),
            &decode_version(version),
            &decode(use_case),
            &decode(scenario),
        )
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn use_case(&self) -> &str {
        &self.use_case
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Same application and version, other use case and scenario.
    pub fn sibling(&self, use_case: &str, scenario: &str) -> Result<Self, NameError> {
        UnitName::new(&self.application, &self.version, use_case, scenario)
    }

    pub fn qualified(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            encode(&self.application),
            encode_version(&self.version),
            encode(&self.use_case),
            encode(&self.scenario)
        )
    }
}

/// Validate a non-version fragment and collapse its whitespace.
fn checked_fragment(fragment: &'static str, text: &str) -> Result<String, NameError> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(NameError::EmptyFragment { fragment });
    }
    if let Some(character) = normalized.chars().find(|c| matches!(c, '.' | '_')) {
        return Err(NameError::ReservedCharacter {
            fragment,
            character,
            text: text.to_string(),
        });
    }
    Ok(normalized)
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

impl FromStr for UnitName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitName::parse(s)
    }
}
