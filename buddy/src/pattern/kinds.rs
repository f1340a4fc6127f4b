//! Conversion rules of the individual parameter kinds.

use crate::pattern::parameter::{
    ConversionError, ConversionScope, EvaluateError, ParameterKind, ParameterType, Reference,
    UNSET, Value, evaluate_default,
};

/// Alias token the application keyword stands for.
pub const APPLICATION_ALIAS: &str = "_Application";
/// Alias token the window keyword stands for.
pub const WINDOW_ALIAS: &str = "_Window";

const APPLICATION_KEYWORDS: &[&str] = &["anwendung", "applikation"];
const WINDOW_KEYWORDS: &[&str] = &["fenster"];

/// Condition word → (property name, property value).
const CONDITIONS: &[(&str, &str, &str)] = &[
    ("sichtbar", "IsVisible", "True"),
    ("verschwunden", "IsVisible", "False"),
    ("geschlossen", "IsClosed", "True"),
    ("geöffnet", "IsClosed", "False"),
    ("enthält", "Contains", "True"),
    ("bereit", "IsReady", "True"),
    ("auswählbar", "IsSelectable", "True"),
    ("aktiviert", "IsEnabled", "True"),
    ("deaktiviert", "IsEnabled", "False"),
    ("ausgewählt", "IsSelected", "True"),
];

const SINGLE: &[&str] = &["einfach", "einmal", "einmalig"];
const DOUBLE: &[&str] = &["doppelt", "zweimal", "zweifach"];

const MODIFIERS: &[&str] = &["CTRL", "STRG", "ALT", "ALTGR", "SHIFT", "UMSCHALT", "WIN"];

fn is_quoted(word: &str) -> bool {
    word.len() >= 2 && word.starts_with('"') && word.ends_with('"')
}

fn is_bracket(word: &str) -> bool {
    matches!(word, "<" | ">" | "[" | "]" | "{" | "}")
}

/// Whether `word` can name a control. Used by both alias kinds and by the
/// word reordering of variant instructions.
pub fn is_alias_word(word: &str) -> bool {
    !word.trim().is_empty() && word != UNSET && !is_bracket(word)
}

fn in_list(word: &str, list: &[&str]) -> bool {
    let lower = word.to_lowercase();
    list.iter().any(|entry| *entry == lower)
}

pub(crate) struct Alias;

impl ParameterType for Alias {
    fn convert(&self, word: &str, _: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        if !is_alias_word(word) {
            return Err(ConversionError::new(ParameterKind::Alias, word, "not a control name"));
        }
        Ok(Value::plain(word).with_reference(Reference::Alias(word.to_string())))
    }
}

pub(crate) struct AliasKeyword;

impl ParameterType for AliasKeyword {
    fn convert(&self, word: &str, scope: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        if in_list(word, APPLICATION_KEYWORDS) {
            return Ok(Value::plain(APPLICATION_ALIAS));
        }
        Alias.convert(word, scope).map_err(|mut error| {
            error.kind = ParameterKind::AliasKeyword;
            error
        })
    }
}

pub(crate) struct Condition;

impl ParameterType for Condition {
    fn convert(&self, word: &str, _: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        let lower = word.to_lowercase();
        CONDITIONS
            .iter()
            .find(|(condition, _, _)| *condition == lower)
            .map(|(_, property, value)| Value::named(*property, *value))
            .ok_or_else(|| ConversionError::new(ParameterKind::Condition, word, "unknown condition"))
    }

    fn evaluate(
        &self,
        parameter: &str,
        value: &Value,
        expression: &str,
    ) -> Result<String, EvaluateError> {
        if expression.trim().is_empty() {
            return Ok(format!("{}, {}", value.name, value.text));
        }
        evaluate_default(parameter, value, expression)
    }
}

pub(crate) struct Frequence;

impl ParameterType for Frequence {
    fn convert(&self, word: &str, _: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        if word == UNSET || in_list(word, SINGLE) {
            Ok(Value::plain("Single"))
        } else if in_list(word, DOUBLE) {
            Ok(Value::plain("Double"))
        } else {
            Err(ConversionError::new(ParameterKind::Frequence, word, "unknown frequency"))
        }
    }
}

/// Key names are alphanumeric words, possibly joined by `_` or `-` (`PAGE_UP`).
fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

pub(crate) struct Key;

impl ParameterType for Key {
    fn convert(&self, word: &str, _: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        let key = word.to_uppercase();
        let segments: Vec<&str> = key.split('+').collect();
        if segments
            .iter()
            .any(|segment| segment.is_empty() || !segment.chars().all(is_key_char))
        {
            return Err(ConversionError::new(ParameterKind::Key, word, "malformed key"));
        }
        if let Some((_, modifiers)) = segments.split_last() {
            if let Some(invalid) = modifiers.iter().find(|m| !MODIFIERS.contains(*m)) {
                return Err(ConversionError::new(
                    ParameterKind::Key,
                    word,
                    format!("'{}' is not a modifier key", invalid),
                ));
            }
        }
        Ok(Value::plain(key))
    }
}

pub(crate) struct Keyword;

impl ParameterType for Keyword {
    fn convert(&self, word: &str, _: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        if in_list(word, APPLICATION_KEYWORDS) {
            Ok(Value::named(word, APPLICATION_ALIAS))
        } else if in_list(word, WINDOW_KEYWORDS) {
            Ok(Value::named(word, WINDOW_ALIAS))
        } else {
            Err(ConversionError::new(ParameterKind::Keyword, word, "unknown keyword"))
        }
    }
}

pub(crate) struct Param;

impl ParameterType for Param {
    fn convert(&self, word: &str, scope: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        let remainder = if let Some(variable) = word.strip_prefix('$') {
            if variable.is_empty() {
                return Err(ConversionError::new(ParameterKind::Param, word, "missing variable name"));
            }
            variable
        } else if is_quoted(word) {
            word
        } else {
            return Err(ConversionError::new(
                ParameterKind::Param,
                word,
                "expected a $variable or a quoted literal",
            ));
        };
        let rewritten = scope
            .functions
            .format_invocation(remainder, scope.adjustments);
        Ok(Value::plain(rewritten))
    }
}

pub(crate) struct ParameterSet;

impl ParameterType for ParameterSet {
    fn convert(&self, word: &str, scope: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        if word == UNSET {
            return Ok(Value::plain(""));
        }
        let Some(list) = word.strip_prefix('(').and_then(|w| w.strip_suffix(')')) else {
            return Err(ConversionError::new(
                ParameterKind::ParameterSet,
                word,
                "expected a parenthesized list",
            ));
        };
        let arguments: Vec<String> = split_arguments(list)
            .into_iter()
            .map(|argument| {
                if is_quoted(argument) {
                    scope.functions.format_invocation(argument, scope.adjustments)
                } else {
                    argument.trim_start_matches('$').to_string()
                }
            })
            .collect();
        Ok(Value::plain(arguments.join(", ")))
    }

    fn evaluate(
        &self,
        parameter: &str,
        value: &Value,
        expression: &str,
    ) -> Result<String, EvaluateError> {
        if expression.trim().is_empty() {
            if value.text.is_empty() {
                return Ok(String::new());
            }
            return Ok(format!("({})", value.text));
        }
        evaluate_default(parameter, value, expression)
    }
}

/// Split on commas that are not inside quotes or parentheses.
fn split_arguments(list: &str) -> Vec<&str> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                arguments.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = list[start..].trim();
    if !last.is_empty() || !arguments.is_empty() {
        arguments.push(last);
    }
    arguments
}

pub(crate) struct StringLiteral;

impl ParameterType for StringLiteral {
    fn convert(&self, word: &str, _: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        if is_quoted(word) {
            Ok(Value::plain(word))
        } else {
            Err(ConversionError::new(
                ParameterKind::String,
                word,
                "expected a quoted literal",
            ))
        }
    }
}

pub(crate) struct UnitReference;

impl ParameterType for UnitReference {
    fn convert(&self, word: &str, _: &ConversionScope<'_>) -> Result<Value, ConversionError> {
        if !is_alias_word(word) {
            return Err(ConversionError::new(
                ParameterKind::UnitReference,
                word,
                "not a unit name",
            ));
        }
        let reference = word.split_whitespace().collect::<Vec<_>>().join("_");
        let scenario = reference
            .rsplit('/')
            .next()
            .unwrap_or(&reference)
            .to_string();
        Ok(Value::named(scenario, reference.clone()).with_reference(Reference::Unit(reference)))
    }
}
