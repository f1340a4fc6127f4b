pub mod sequence;
pub mod variant;

use std::fmt;

use buddy::pattern::parameter::PatternParameter;
use buddy::pattern::{
    ConversionScope, InstructionPattern, PatternToken, ResolvedParameter, UNSET, Value,
};
use buddy::tokenizer::{self, TokenizeError};
use tracing::trace;

use crate::evaluator::sequence::ValueSequences;

/// Sentence terminators removed before matching. Only one is stripped.
const TERMINATORS: [char; 2] = ['.', '!'];

/// Parameters resolved by a match, in the order they were matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterCache {
    resolved: Vec<ResolvedParameter>,
}

impl ParameterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolved parameter, replacing an earlier one of the same name.
    pub fn insert(&mut self, parameter: PatternParameter, value: Value) {
        let resolved = ResolvedParameter { parameter, value };
        match self
            .resolved
            .iter_mut()
            .find(|existing| existing.name() == resolved.name())
        {
            Some(existing) => *existing = resolved,
            None => self.resolved.push(resolved),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedParameter> {
        self.resolved.iter().find(|resolved| resolved.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedParameter> {
        self.resolved.iter()
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn clear(&mut self) {
        self.resolved.clear();
    }
}

/// Why a sentence does not fit a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub instruction: String,
    pub pattern: String,
    /// 1-based position of the pattern token that failed.
    pub position: usize,
    pub message: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (pattern '{}')", self.message, self.pattern)
    }
}

/// Outcome of matching one sentence against one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationResult {
    Ok,
    Error(Mismatch),
}

impl EvaluationResult {
    pub fn is_error(&self) -> bool {
        matches!(self, EvaluationResult::Error(_))
    }
}

/// English ordinal of a 1-based position: 1st, 2nd, 3rd, 4th, 11th, 21st.
pub fn ordinal(position: usize) -> String {
    let suffix = match (position % 10, position % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", position, suffix)
}

/// Split a sentence into the words the matcher sees: value sequences
/// collapsed to placeholders, bracket groups expanded.
fn sentence_words(sentence: &str) -> Result<(Vec<String>, ValueSequences), TokenizeError> {
    let trimmed = sentence.trim_end();
    let trimmed = trimmed.strip_suffix(TERMINATORS).unwrap_or(trimmed);
    let (text, sequences) = ValueSequences::extract(trimmed);
    let words = tokenizer::word_texts(&text)?
        .iter()
        .flat_map(|word| tokenizer::expand(word))
        .collect();
    Ok((words, sequences))
}

/// Match a normalized sentence against `pattern`.
///
/// Pattern tokens are walked once, without backtracking. Resolved
/// parameters are stored in `parameters`. An empty sentence is an input
/// error, not a mismatch.
pub fn evaluate(
    sentence: &str,
    pattern: &InstructionPattern,
    scope: &ConversionScope<'_>,
    parameters: &mut ParameterCache,
) -> Result<EvaluationResult, TokenizeError> {
    let (mut words, sequences) = sentence_words(sentence)?;
    if words.is_empty() {
        return Err(TokenizeError::Empty);
    }
    if let Some(reorder) = pattern.reorder() {
        words = reorder(words);
    }

    let mut cursor = 0;
    for (index, token) in pattern.tokens().iter().enumerate() {
        let word = words.get(cursor).map(String::as_str).unwrap_or(UNSET);

        let outcome = match token {
            PatternToken::Word(expected) => {
                if word.to_lowercase() == expected.to_lowercase() {
                    Ok(())
                } else {
                    Err(None)
                }
            }
            PatternToken::Bracket(bracket) => {
                if word.chars().eq(std::iter::once(*bracket)) {
                    Ok(())
                } else {
                    Err(None)
                }
            }
            PatternToken::Parameter(parameter) => match parameter.convert(word, scope) {
                Ok(mut value) => {
                    if let Some(joined) = sequences.restore(&value.text) {
                        value = Value::plain(joined);
                    }
                    parameters.insert(parameter.clone(), value);
                    Ok(())
                }
                Err(error) => Err(Some(error)),
            },
        };

        match outcome {
            Ok(()) => cursor += 1,
            Err(_) if !token.is_mandatory() => {
                trace!(token = %token, word, "skipped optional token");
                // A skipped parameter still gets its unset value, if its kind has one.
                if let PatternToken::Parameter(parameter) = token {
                    if let Ok(value) = parameter.convert(UNSET, scope) {
                        parameters.insert(parameter.clone(), value);
                    }
                }
            }
            Err(reason) => {
                let mut message = format!(
                    "the {} token ({}) does not match '{}'",
                    ordinal(index + 1),
                    token,
                    word
                );
                if let Some(reason) = reason {
                    message.push_str(&format!(": {}", reason.reason));
                }
                return Ok(EvaluationResult::Error(Mismatch {
                    instruction: pattern.id().to_string(),
                    pattern: pattern.pattern().to_string(),
                    position: index + 1,
                    message,
                }));
            }
        }
    }

    Ok(EvaluationResult::Ok)
}
