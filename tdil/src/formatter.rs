//! Rendering of matched instructions into TDIL directives.

use buddy::InstructionPattern;
use buddy::pattern::{CombinedParameter, EvaluateError, ResolvedParameter};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

use crate::evaluator::ParameterCache;

/// Character that introduces a parameter reference in a template.
pub const MARKER: char = '~';

/// `~name`, `~name.Name`, `~name.Value` or a parenthesized group
/// `~(a|b)` / `~(a&b)`.
static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"~(?:\((?P<group>[^()]*)\)|(?P<name>[A-Za-z_][A-Za-z0-9_]*(?:\.(?:Name|Value))?))")
        .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("template of '{instruction}' references '{reference}' but no such parameter was resolved")]
    MissingParameter {
        instruction: String,
        reference: String,
    },
    #[error("template of '{instruction}' leaves an unresolved marker in '{fragment}'")]
    UnresolvedMarker {
        instruction: String,
        fragment: String,
    },
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
}

/// Split `name.Suffix` into the parameter name and its expression.
fn member(reference: &str) -> (&str, &str) {
    match reference.find('.') {
        Some(dot) => (&reference[..dot], &reference[dot..]),
        None => (reference, ""),
    }
}

/// Render the directive of `pattern` from its resolved parameters.
pub fn format(pattern: &InstructionPattern, parameters: &ParameterCache) -> Result<String, FormatError> {
    let template = pattern.template();
    let missing = |reference: &str| FormatError::MissingParameter {
        instruction: pattern.id().to_string(),
        reference: reference.to_string(),
    };

    let mut output = String::new();
    if let Some(reference) = pattern.reference_template() {
        output.push_str(&reference.replace('#', "1"));
        output.push_str(" = ");
    }

    let mut last = 0;
    for caps in REFERENCE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        push_literal(&mut output, &template[last..whole.start()], pattern)?;
        last = whole.end();

        let rendered = if let Some(name) = caps.name("name") {
            let (name, expression) = member(name.as_str());
            parameters
                .get(name)
                .ok_or_else(|| missing(name))?
                .evaluate(expression)?
        } else {
            render_group(&caps, parameters).map_err(|error| match error {
                GroupError::Missing(reference) => missing(&reference),
                GroupError::Evaluate(error) => FormatError::Evaluate(error),
            })?
        };
        output.push_str(&rendered);
    }
    push_literal(&mut output, &template[last..], pattern)?;

    debug!(instruction = pattern.id(), directive = %output, "formatted");
    Ok(output)
}

fn push_literal(output: &mut String, literal: &str, pattern: &InstructionPattern) -> Result<(), FormatError> {
    if literal.contains(MARKER) {
        return Err(FormatError::UnresolvedMarker {
            instruction: pattern.id().to_string(),
            fragment: literal.to_string(),
        });
    }
    output.push_str(literal);
    Ok(())
}

enum GroupError {
    Missing(String),
    Evaluate(EvaluateError),
}

/// Resolve `~(a|b|c)` to the first present member, or `~(a&b&c)` to all
/// present members combined.
fn render_group(caps: &Captures<'_>, parameters: &ParameterCache) -> Result<String, GroupError> {
    let group = caps.name("group").map_or("", |group| group.as_str());

    if group.contains('&') {
        let present: Vec<(&ResolvedParameter, &str)> = group
            .split('&')
            .map(|reference| member(reference.trim()))
            .filter_map(|(name, expression)| parameters.get(name).map(|p| (p, expression)))
            .collect();
        if present.is_empty() {
            return Err(GroupError::Missing(group.to_string()));
        }
        let expressions: Vec<&str> = present.iter().map(|(_, expression)| *expression).collect();
        let combined = CombinedParameter::new(present.iter().map(|(p, _)| *p).collect());
        return combined
            .evaluate(&expressions.join(","))
            .map_err(GroupError::Evaluate);
    }

    let (parameter, expression) = group
        .split('|')
        .map(|reference| member(reference.trim()))
        .find_map(|(name, expression)| parameters.get(name).map(|p| (p, expression)))
        .ok_or_else(|| GroupError::Missing(group.to_string()))?;
    parameter.evaluate(expression).map_err(GroupError::Evaluate)
}
