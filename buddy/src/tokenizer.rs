use std::ops::Range;

use thiserror::Error;

/// Characters that end a word when they appear outside of an escape region.
const BOUNDARIES: [char; 4] = [' ', '.', ',', '\n'];

/// Errors raised while splitting instruction text into words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated escape: '{opener}' at byte {position} is never closed by '{closer}'")]
    UnterminatedEscape {
        opener: char,
        closer: char,
        position: usize,
    },
    #[error("instruction text is empty")]
    Empty,
}

/// A word of the text it was scanned from.
///
/// `span` always refers to the text buffer the word was produced from. After
/// an edit, spans of previously scanned words are stale; scanning resumes at
/// the cursor returned by the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub span: Range<usize>,
}

/// The outcome of editing one word: the rewritten text and the byte offset
/// from which scanning continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub cursor: usize,
}

/// What a rewrite callback wants done with a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    Keep,
    Replace(String),
    Remove,
}

/// The character closing an escape region opened by `c`, if `c` opens one.
pub fn closer_for(c: char) -> Option<char> {
    match c {
        '"' => Some('"'),
        '<' => Some('>'),
        '[' => Some(']'),
        '(' => Some(')'),
        '{' => Some('}'),
        _ => None,
    }
}

/// An open escape region.
///
/// A parenthesized region may hold quoted arguments, and a `)` inside such a
/// quote does not close it: `("Datum()")` is one region. All other
/// characters are copied without further nesting.
#[derive(Debug, Clone, Copy)]
struct Escape {
    opener: char,
    closer: char,
    position: usize,
    quoted: bool,
}

impl Escape {
    fn open(c: char, position: usize) -> Option<Escape> {
        closer_for(c).map(|closer| Escape {
            opener: c,
            closer,
            position,
            quoted: false,
        })
    }

    /// Feed one character of the region. Returns `true` once it is closed.
    fn closes_at(&mut self, c: char) -> bool {
        if self.opener == '(' && c == '"' {
            self.quoted = !self.quoted;
            return false;
        }
        !self.quoted && c == self.closer
    }

    fn unterminated(self) -> TokenizeError {
        TokenizeError::UnterminatedEscape {
            opener: self.opener,
            closer: self.closer,
            position: self.position,
        }
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Scan the next word of `text`, starting at byte offset `from`.
///
/// Escape regions do not nest: once an opener is seen every character up to
/// its closer is part of the word, delimiters of other kinds included.
/// Quoted arguments inside parentheses are the one exception.
/// Carriage returns are dropped wherever they occur.
pub fn next_word(text: &str, from: usize) -> Result<Option<Word>, TokenizeError> {
    let mut start = None;
    let mut word = String::new();
    let mut escape: Option<Escape> = None;

    for (offset, c) in text[from..].char_indices() {
        let position = from + offset;
        if c == '\r' {
            continue;
        }

        if let Some(region) = escape.as_mut() {
            word.push(c);
            if region.closes_at(c) {
                escape = None;
            }
            continue;
        }

        if BOUNDARIES.contains(&c) {
            if let Some(start) = start {
                return Ok(Some(Word {
                    text: word,
                    span: start..position,
                }));
            }
            continue;
        }

        if start.is_none() {
            start = Some(position);
        }
        escape = Escape::open(c, position);
        word.push(c);
    }

    if let Some(region) = escape {
        return Err(region.unterminated());
    }

    Ok(start.map(|start| Word {
        text: word,
        span: start..text.len(),
    }))
}

/// Split `text` into all of its words.
pub fn words(text: &str) -> Result<Vec<Word>, TokenizeError> {
    let mut words = Vec::new();
    let mut cursor = 0;
    while let Some(word) = next_word(text, cursor)? {
        cursor = word.span.end;
        words.push(word);
    }
    Ok(words)
}

/// Split `text` into the plain text of its words.
pub fn word_texts(text: &str) -> Result<Vec<String>, TokenizeError> {
    Ok(words(text)?.into_iter().map(|w| w.text).collect())
}

/// Split a bracket- or brace-escaped word into head, core and tail.
///
/// `<Button:OK>` becomes `<`, `Button:OK`, `>`. Quoted and parenthesized
/// words are returned unchanged, as are words whose escape does not span the
/// whole word.
pub fn expand(word: &str) -> Vec<String> {
    let mut chars = word.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return vec![word.to_string()];
    };
    match first {
        '<' | '[' | '{' if closer_for(first) == Some(last) => {
            let core = &word[first.len_utf8()..word.len() - last.len_utf8()];
            vec![first.to_string(), core.to_string(), last.to_string()]
        }
        _ => vec![word.to_string()],
    }
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

/// Substitute `replacement` for `word`. Scanning resumes right after the
/// inserted text.
pub fn replace(text: &str, word: &Word, replacement: &str) -> Edit {
    let mut edited = String::with_capacity(text.len() + replacement.len());
    edited.push_str(&text[..word.span.start]);
    edited.push_str(replacement);
    edited.push_str(&text[word.span.end..]);
    Edit {
        text: edited,
        cursor: word.span.start + replacement.len(),
    }
}

/// Delete `word` together with one adjacent space.
///
/// The trailing space is taken unless the word is directly followed by `.` or
/// `,`; then the preceding space goes instead, so no `word .` artifacts are
/// left behind.
pub fn remove(text: &str, word: &Word) -> Edit {
    let before = &text[..word.span.start];
    let after = &text[word.span.end..];

    let (start, end) = if after.starts_with(' ') {
        (word.span.start, word.span.end + 1)
    } else if before.ends_with(' ') {
        (word.span.start - 1, word.span.end)
    } else {
        (word.span.start, word.span.end)
    };

    let mut edited = String::with_capacity(text.len());
    edited.push_str(&text[..start]);
    edited.push_str(&text[end..]);
    Edit {
        text: edited,
        cursor: start,
    }
}

/// Walk all words of `text` once, letting `decide` keep, replace or remove
/// each of them. Every decision sees the text as edited so far.
pub fn rewrite<F>(text: &str, mut decide: F) -> Result<String, TokenizeError>
where
    F: FnMut(&Word) -> Rewrite,
{
    let mut text = text.to_string();
    let mut cursor = 0;
    while let Some(word) = next_word(&text, cursor)? {
        match decide(&word) {
            Rewrite::Keep => cursor = word.span.end,
            Rewrite::Replace(replacement) => {
                let edit = replace(&text, &word, &replacement);
                text = edit.text;
                cursor = edit.cursor;
            }
            Rewrite::Remove => {
                let edit = remove(&text, &word);
                text = edit.text;
                cursor = edit.cursor;
            }
        }
    }
    Ok(text)
}

/// Drop every occurrence of `marks` that lies outside an escape region.
pub fn strip_punctuation(text: &str, marks: &[char]) -> Result<String, TokenizeError> {
    let mut stripped = String::with_capacity(text.len());
    let mut escape: Option<Escape> = None;

    for (position, c) in text.char_indices() {
        match escape.as_mut() {
            Some(region) => {
                if region.closes_at(c) {
                    escape = None;
                }
            }
            None => {
                if marks.contains(&c) {
                    continue;
                }
                escape = Escape::open(c, position);
            }
        }
        stripped.push(c);
    }

    match escape {
        Some(region) => Err(region.unterminated()),
        None => Ok(stripped),
    }
}
