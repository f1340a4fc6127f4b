use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::function::{Adjustments, FunctionRegistry};
use crate::pattern::kinds;

/// Word offered to a pattern token once the sentence has run out of words.
pub const UNSET: &str = "<unset>";

/// The closed set of parameter kinds a pattern may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Alias,
    AliasKeyword,
    Condition,
    Frequence,
    Key,
    Keyword,
    Param,
    ParameterSet,
    String,
    UnitReference,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 10] = [
        ParameterKind::Alias,
        ParameterKind::AliasKeyword,
        ParameterKind::Condition,
        ParameterKind::Frequence,
        ParameterKind::Key,
        ParameterKind::Keyword,
        ParameterKind::Param,
        ParameterKind::ParameterSet,
        ParameterKind::String,
        ParameterKind::UnitReference,
    ];

    /// The name used for this kind in pattern definitions.
    pub fn name(self) -> &'static str {
        match self {
            ParameterKind::Alias => "alias",
            ParameterKind::AliasKeyword => "aliasKeyword",
            ParameterKind::Condition => "condition",
            ParameterKind::Frequence => "frequence",
            ParameterKind::Key => "key",
            ParameterKind::Keyword => "keyword",
            ParameterKind::Param => "param",
            ParameterKind::ParameterSet => "parameterSet",
            ParameterKind::String => "string",
            ParameterKind::UnitReference => "unitReference",
        }
    }

    fn handler(self) -> &'static dyn ParameterType {
        match self {
            ParameterKind::Alias => &kinds::Alias,
            ParameterKind::AliasKeyword => &kinds::AliasKeyword,
            ParameterKind::Condition => &kinds::Condition,
            ParameterKind::Frequence => &kinds::Frequence,
            ParameterKind::Key => &kinds::Key,
            ParameterKind::Keyword => &kinds::Keyword,
            ParameterKind::Param => &kinds::Param,
            ParameterKind::ParameterSet => &kinds::ParameterSet,
            ParameterKind::String => &kinds::StringLiteral,
            ParameterKind::UnitReference => &kinds::UnitReference,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// An identifier collected while converting a word, later declared in the
/// generated file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    Alias(String),
    Unit(String),
}

/// A converted parameter value: a semantic name and the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub name: String,
    pub text: String,
    pub reference: Option<Reference>,
}

impl Value {
    /// A value whose name and text are the same.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Value {
            name: text.clone(),
            text,
            reference: None,
        }
    }

    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Value {
            name: name.into(),
            text: text.into(),
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }
}

/// A word could not be represented by a parameter kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{word}' is not a valid {kind}: {reason}")]
pub struct ConversionError {
    pub kind: ParameterKind,
    pub word: String,
    pub reason: String,
}

impl ConversionError {
    pub fn new(kind: ParameterKind, word: &str, reason: impl Into<String>) -> Self {
        ConversionError {
            kind,
            word: word.to_string(),
            reason: reason.into(),
        }
    }
}

/// A template expression could not be applied to a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluateError {
    #[error("parameter '{parameter}' cannot evaluate expression '{expression}'")]
    UnknownExpression {
        parameter: String,
        expression: String,
    },
    #[error("{given} expressions given for a combination of {members} parameters")]
    ExpressionCount { given: usize, members: usize },
}

/// Collaborators available while converting words of one step.
#[derive(Debug, Clone, Copy)]
pub struct ConversionScope<'a> {
    pub functions: &'a FunctionRegistry,
    pub adjustments: &'a Adjustments,
}

impl<'a> ConversionScope<'a> {
    pub fn new(functions: &'a FunctionRegistry, adjustments: &'a Adjustments) -> Self {
        ConversionScope {
            functions,
            adjustments,
        }
    }
}

/// Behaviour shared by all parameter kinds.
pub(crate) trait ParameterType: Sync {
    fn convert(&self, word: &str, scope: &ConversionScope<'_>) -> Result<Value, ConversionError>;

    /// Render `value` for a template expression. Kinds override this only
    /// when their plain rendering differs from the value text.
    fn evaluate(
        &self,
        parameter: &str,
        value: &Value,
        expression: &str,
    ) -> Result<String, EvaluateError> {
        evaluate_default(parameter, value, expression)
    }
}

/// Default expression rules: empty renders the value text, `.Name` the
/// semantic name, `.Value` or `$parameter` the value text.
pub fn evaluate_default(
    parameter: &str,
    value: &Value,
    expression: &str,
) -> Result<String, EvaluateError> {
    let expression = expression.trim();
    if expression.is_empty() || expression == ".Value" {
        return Ok(value.text.clone());
    }
    if expression == ".Name" {
        return Ok(value.name.clone());
    }
    if expression.strip_prefix('$') == Some(parameter) {
        return Ok(value.text.clone());
    }
    Err(EvaluateError::UnknownExpression {
        parameter: parameter.to_string(),
        expression: expression.to_string(),
    })
}

/// A parameter token of an instruction pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternParameter {
    pub name: String,
    pub kind: ParameterKind,
    pub mandatory: bool,
}

impl PatternParameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind, mandatory: bool) -> Self {
        PatternParameter {
            name: name.into(),
            kind,
            mandatory,
        }
    }

    pub fn convert(&self, word: &str, scope: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        self.kind.handler().convert(word, scope)
    }

    pub fn evaluate(&self, value: &Value, expression: &str) -> Result<String, EvaluateError> {
        self.kind.handler().evaluate(&self.name, value, expression)
    }
}

/// A parameter together with the value it was resolved to by a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameter {
    pub parameter: PatternParameter,
    pub value: Value,
}

impl ResolvedParameter {
    pub fn name(&self) -> &str {
        &self.parameter.name
    }

    pub fn evaluate(&self, expression: &str) -> Result<String, EvaluateError> {
        self.parameter.evaluate(&self.value, expression)
    }
}

/// Several resolved parameters evaluated as one, for conjunction references.
#[derive(Debug, Clone)]
pub struct CombinedParameter<'a> {
    members: Vec<&'a ResolvedParameter>,
}

impl<'a> CombinedParameter<'a> {
    pub fn new(members: Vec<&'a ResolvedParameter>) -> Self {
        CombinedParameter { members }
    }

    /// Evaluate a comma-separated expression list, one segment per member in
    /// order. Members without a segment use the empty expression.
    pub fn evaluate(&self, expressions: &str) -> Result<String, EvaluateError> {
        let segments: Vec<&str> = expressions.split(',').collect();
        if segments.len() > self.members.len() {
            return Err(EvaluateError::ExpressionCount {
                given: segments.len(),
                members: self.members.len(),
            });
        }
        let rendered = self
            .members
            .iter()
            .enumerate()
            .map(|(i, member)| member.evaluate(segments.get(i).copied().unwrap_or("")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rendered.join(", "))
    }
}
