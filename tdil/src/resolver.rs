use std::path::{Path, PathBuf};

use buddy::UnitName;
use buddy::naming::{self, NameError};

/// File extension of generated units.
pub const UNIT_EXTENSION: &str = "tdil";

/// Maps unit references found in steps to unit names and files.
pub trait UnitResolver {
    /// Resolve `reference` as written in a step of the unit `current`.
    fn unit_name_for(&self, current: &UnitName, reference: &str) -> Result<UnitName, NameError>;

    /// Location of the generated file of `unit`.
    fn path_for(&self, unit: &UnitName) -> PathBuf;
}

/// Resolves references to units of the same application and version.
///
/// `UseCase/Scenario` names a unit of another use case, a bare `Scenario`
/// one of the current use case. Files live under `<root>/<application>/`.
#[derive(Debug, Clone, Default)]
pub struct SiblingResolver {
    root: PathBuf,
}

impl SiblingResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SiblingResolver { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl UnitResolver for SiblingResolver {
    fn unit_name_for(&self, current: &UnitName, reference: &str) -> Result<UnitName, NameError> {
        match reference.rsplit_once('/') {
            Some((use_case, scenario)) => {
                current.sibling(&naming::decode(use_case), &naming::decode(scenario))
            }
            None => current.sibling(current.use_case(), &naming::decode(reference)),
        }
    }

    fn path_for(&self, unit: &UnitName) -> PathBuf {
        self.root
            .join(naming::encode(unit.application()))
            .join(format!("{}.{}", unit.qualified(), UNIT_EXTENSION))
    }
}
