pub mod vocabulary;

use std::collections::HashMap;

use tracing::trace;

use crate::tokenizer::{self, Rewrite, TokenizeError};
use crate::normalizer::vocabulary::{
    ARTICLES, AUXILIARY_VERBS, NOT_VISIBLE, PHRASES, PREPOSITIONS, PUNCTUATION, SUBSTANTIVES,
    SYNONYMS, SynonymSet,
};

/// Maps every synonym (lowercased) to the root word of its set.
#[derive(Debug, Clone)]
pub struct SynonymRegistry {
    roots: HashMap<String, &'static str>,
}

impl SynonymRegistry {
    pub fn new(sets: &[SynonymSet]) -> Self {
        let mut roots = HashMap::new();
        for set in sets {
            for synonym in set.synonyms {
                roots.insert(synonym.to_lowercase(), set.root);
            }
        }
        SynonymRegistry { roots }
    }

    /// The root word for `word`, if `word` is a known synonym.
    pub fn root_of(&self, word: &str) -> Option<&'static str> {
        self.roots.get(&word.to_lowercase()).copied()
    }
}

/// Reduces a step sentence to the vocabulary the instruction patterns are
/// written in.
#[derive(Debug, Clone)]
pub struct Normalizer {
    synonyms: SynonymRegistry,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer {
            synonyms: SynonymRegistry::new(SYNONYMS),
        }
    }

    /// Normalize one sentence. The steps run in a fixed order and each word
    /// list is applied in a single pass.
    pub fn normalize(&self, sentence: &str) -> Result<String, TokenizeError> {
        let text = tokenizer::strip_punctuation(sentence, PUNCTUATION)?;
        let text = strip_words(&text, ARTICLES)?;
        let text = strip_words(&text, PREPOSITIONS)?;
        let text = strip_words(&text, AUXILIARY_VERBS)?;
        let text = self.resolve_ambiguity(&text)?;
        let text = strip_words(&text, SUBSTANTIVES)?;
        trace!(sentence, normalized = %text, "normalized sentence");
        Ok(text)
    }

    /// Substitute root words for synonyms: the "not visible" rewrite first,
    /// then multi-word phrases, then single words.
    pub fn resolve_ambiguity(&self, text: &str) -> Result<String, TokenizeError> {
        let (phrase, root) = NOT_VISIBLE;
        let mut text = replace_phrase(text, phrase, root)?;
        for (phrase, root) in PHRASES {
            text = replace_phrase(&text, phrase, root)?;
        }
        tokenizer::rewrite(&text, |word| match self.synonyms.root_of(&word.text) {
            Some(root) => Rewrite::Replace(root.to_string()),
            None => Rewrite::Keep,
        })
    }
}

fn matches_ignoring_case(word: &str, candidate: &str) -> bool {
    word.to_lowercase() == candidate.to_lowercase()
}

/// Remove every word of `text` found in `list`.
pub fn strip_words(text: &str, list: &[&str]) -> Result<String, TokenizeError> {
    tokenizer::rewrite(text, |word| {
        if list.iter().any(|entry| matches_ignoring_case(&word.text, entry)) {
            Rewrite::Remove
        } else {
            Rewrite::Keep
        }
    })
}

/// Replace each run of consecutive words spelling `phrase` with `replacement`.
pub fn replace_phrase(
    text: &str,
    phrase: &[&str],
    replacement: &str,
) -> Result<String, TokenizeError> {
    let mut text = text.to_string();
    let mut cursor = 0;

    loop {
        let words = tokenizer::words(&text)?;
        let found = words
            .windows(phrase.len())
            .filter(|run| run[0].span.start >= cursor)
            .find(|run| {
                run.iter()
                    .zip(phrase)
                    .all(|(word, part)| matches_ignoring_case(&word.text, part))
            })
            .map(|run| run[0].span.start..run[run.len() - 1].span.end);

        let Some(span) = found else {
            return Ok(text);
        };
        text.replace_range(span.clone(), replacement);
        cursor = span.start + replacement.len();
    }
}
