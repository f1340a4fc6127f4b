pub mod kinds;
pub mod parameter;

use std::fmt;

use thiserror::Error;

use crate::pattern::parameter::{ParameterKind, PatternParameter};
use crate::tokenizer::{self, TokenizeError, closer_for};

pub use parameter::{
    CombinedParameter, ConversionError, ConversionScope, EvaluateError, Reference,
    ResolvedParameter, UNSET, Value,
};

/// Reorders the words of a sentence before it is matched.
pub type Reorder = fn(Vec<String>) -> Vec<String>;

/// Errors in an instruction pattern definition. These are programming
/// errors in the instruction table and surface when it is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{id}' is empty")]
    Empty { id: String },
    #[error("pattern '{id}' must start with a word, found '{found}'")]
    EmptyLeadingWord { id: String, found: String },
    #[error("pattern '{id}': bracket '{token}' has no matching closer")]
    MalformedBracket { id: String, token: String },
    #[error("pattern '{id}': malformed parameter block '{block}': {reason}")]
    MalformedParameter {
        id: String,
        block: String,
        reason: String,
    },
    #[error("pattern '{id}': unknown parameter type '{kind}'")]
    UnknownType { id: String, kind: String },
    #[error("pattern '{id}': {source}")]
    Tokenize {
        id: String,
        #[source]
        source: TokenizeError,
    },
}

/// One element of a compiled instruction pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    /// A literal word, matched case-insensitively.
    Word(String),
    /// A literal opening or closing bracket.
    Bracket(char),
    Parameter(PatternParameter),
}

impl PatternToken {
    pub fn is_mandatory(&self) -> bool {
        match self {
            PatternToken::Word(_) | PatternToken::Bracket(_) => true,
            PatternToken::Parameter(parameter) => parameter.mandatory,
        }
    }
}

impl fmt::Display for PatternToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternToken::Word(word) => write!(f, "word '{}'", word),
            PatternToken::Bracket(c) => write!(f, "bracket '{}'", c),
            PatternToken::Parameter(parameter) => {
                let optional = if parameter.mandatory { "" } else { "optional " };
                write!(
                    f,
                    "{}parameter '{}' of type {}",
                    optional, parameter.name, parameter.kind
                )
            }
        }
    }
}

/// A registered instruction: the sentence shape it accepts and the
/// directive it renders to.
#[derive(Debug, Clone)]
pub struct InstructionPattern {
    id: String,
    pattern: String,
    template: String,
    reference_template: Option<String>,
    reorder: Option<Reorder>,
    tokens: Vec<PatternToken>,
}

impl InstructionPattern {
    /// Compile `pattern` into its token sequence.
    pub fn new(id: &str, pattern: &str, template: &str) -> Result<Self, PatternError> {
        let tokens = compile(id, pattern)?;
        Ok(InstructionPattern {
            id: id.to_string(),
            pattern: pattern.to_string(),
            template: template.to_string(),
            reference_template: None,
            reorder: None,
            tokens,
        })
    }

    /// Make the directive's result referable. `#` in `reference` is the
    /// position of the reference number.
    pub fn referable(mut self, reference: &str) -> Self {
        self.reference_template = Some(reference.to_string());
        self
    }

    /// Mark this as a variant instruction whose words are reordered before
    /// matching.
    pub fn variant(mut self, reorder: Reorder) -> Self {
        self.reorder = Some(reorder);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn reference_template(&self) -> Option<&str> {
        self.reference_template.as_deref()
    }

    pub fn reorder(&self) -> Option<Reorder> {
        self.reorder
    }

    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    /// The literal word every matching sentence starts with.
    pub fn leading_word(&self) -> &str {
        match self.tokens.first() {
            Some(PatternToken::Word(word)) => word,
            _ => "",
        }
    }

    pub fn parameters(&self) -> impl Iterator<Item = &PatternParameter> {
        self.tokens.iter().filter_map(|token| match token {
            PatternToken::Parameter(parameter) => Some(parameter),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Pattern compilation
// ---------------------------------------------------------------------------

fn compile(id: &str, pattern: &str) -> Result<Vec<PatternToken>, PatternError> {
    let words = split_pattern(id, pattern)?;
    let Some((leading, rest)) = words.split_first() else {
        return Err(PatternError::Empty { id: id.to_string() });
    };
    if leading.starts_with(|c: char| closer_for(c).is_some()) {
        return Err(PatternError::EmptyLeadingWord {
            id: id.to_string(),
            found: leading.clone(),
        });
    }

    let mut tokens = vec![PatternToken::Word(leading.clone())];
    compile_tokens(id, rest, &mut tokens)?;
    Ok(tokens)
}

/// Split pattern text into words, reporting unclosed brackets and braces
/// as malformed definitions.
fn split_pattern(id: &str, text: &str) -> Result<Vec<String>, PatternError> {
    tokenizer::word_texts(text).map_err(|source| match source {
        TokenizeError::UnterminatedEscape {
            opener: '<' | '[',
            position,
            ..
        } => PatternError::MalformedBracket {
            id: id.to_string(),
            token: text[position..].to_string(),
        },
        TokenizeError::UnterminatedEscape {
            opener: '{',
            position,
            ..
        } => PatternError::MalformedParameter {
            id: id.to_string(),
            block: text[position..].to_string(),
            reason: "missing closing brace".to_string(),
        },
        source => PatternError::Tokenize {
            id: id.to_string(),
            source,
        },
    })
}

fn compile_tokens(
    id: &str,
    words: &[String],
    tokens: &mut Vec<PatternToken>,
) -> Result<(), PatternError> {
    for word in words {
        let Some(first) = word.chars().next() else {
            continue;
        };
        match first {
            '<' | '[' => {
                let closer = closer_for(first).unwrap_or(first);
                let inner = word
                    .strip_prefix(first)
                    .and_then(|w| w.strip_suffix(closer))
                    .ok_or_else(|| PatternError::MalformedBracket {
                        id: id.to_string(),
                        token: word.clone(),
                    })?;
                let inner_words = split_pattern(id, inner)?;
                tokens.push(PatternToken::Bracket(first));
                compile_tokens(id, &inner_words, tokens)?;
                tokens.push(PatternToken::Bracket(closer));
            }
            '{' => tokens.push(PatternToken::Parameter(parse_parameter(id, word)?)),
            _ => tokens.push(PatternToken::Word(word.clone())),
        }
    }
    Ok(())
}

/// Parse a `{name:…,type:…,mandatory:…}` block.
fn parse_parameter(id: &str, block: &str) -> Result<PatternParameter, PatternError> {
    let malformed = |reason: &str| PatternError::MalformedParameter {
        id: id.to_string(),
        block: block.to_string(),
        reason: reason.to_string(),
    };

    let body = block
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .ok_or_else(|| malformed("missing closing brace"))?;

    let mut name = None;
    let mut kind = None;
    let mut mandatory = true;

    for pair in body.split(',') {
        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| malformed("expected key:value pairs"))?;
        let value = value.trim();
        match key.trim() {
            "name" if !value.is_empty() => name = Some(value.to_string()),
            "type" => {
                kind = Some(value.parse::<ParameterKind>().map_err(|kind| {
                    PatternError::UnknownType {
                        id: id.to_string(),
                        kind,
                    }
                })?)
            }
            "mandatory" => {
                mandatory = value
                    .parse::<bool>()
                    .map_err(|_| malformed("mandatory must be true or false"))?
            }
            _ => return Err(malformed("unknown or empty key")),
        }
    }

    match (name, kind) {
        (Some(name), Some(kind)) => Ok(PatternParameter::new(name, kind, mandatory)),
        (None, _) => Err(malformed("missing name")),
        (_, None) => Err(malformed("missing type")),
    }
}
