use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Two or more quoted literals separated by single spaces.
static VALUE_SEQUENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"(?: "[^"]*")+"#).unwrap());

static SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).unwrap());

/// Value sequences cut out of a sentence, indexed by placeholder number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSequences {
    joined: Vec<String>,
}

impl ValueSequences {
    /// Replace every value sequence in `sentence` with a placeholder word and
    /// remember its segments joined with `", "`.
    pub fn extract(sentence: &str) -> (String, ValueSequences) {
        let mut sequences = ValueSequences::default();
        let replaced = VALUE_SEQUENCE.replace_all(sentence, |caps: &Captures<'_>| {
            let segments: Vec<&str> = SEGMENT
                .find_iter(&caps[0])
                .map(|segment| segment.as_str())
                .collect();
            let placeholder = placeholder(sequences.joined.len());
            sequences.joined.push(segments.join(", "));
            placeholder
        });
        (replaced.into_owned(), sequences)
    }

    /// The joined sequence a placeholder stands for.
    pub fn restore(&self, text: &str) -> Option<&str> {
        self.joined
            .iter()
            .enumerate()
            .find(|(index, _)| placeholder(*index) == text)
            .map(|(_, joined)| joined.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }
}

fn placeholder(index: usize) -> String {
    format!("\"__sequence{}__\"", index)
}
