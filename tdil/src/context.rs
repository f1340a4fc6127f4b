use buddy::pattern::Reference;

use crate::evaluator::ParameterCache;

/// Aliases and unit references collected while compiling one unit.
///
/// Both lists keep first-seen order and hold each entry once. A context
/// belongs to exactly one compilation and is consumed when the unit is
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilingContext {
    aliases: Vec<String>,
    units: Vec<String>,
}

impl CompilingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_alias(&mut self, alias: &str) {
        push_unique(&mut self.aliases, alias);
    }

    pub fn add_unit(&mut self, unit: &str) {
        push_unique(&mut self.units, unit);
    }

    /// Record the references carried by the parameters of a successful match.
    pub fn record(&mut self, parameters: &ParameterCache) {
        for resolved in parameters.iter() {
            match &resolved.value.reference {
                Some(Reference::Alias(alias)) => self.add_alias(alias),
                Some(Reference::Unit(unit)) => self.add_unit(unit),
                None => {}
            }
        }
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.units.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, entry: &str) {
    if !list.iter().any(|existing| existing == entry) {
        list.push(entry.to_string());
    }
}
