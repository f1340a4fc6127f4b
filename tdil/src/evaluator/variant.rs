use buddy::pattern::kinds::is_alias_word;

/// States of the value-before-target scan, each waiting for one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    LeadingWord,
    Value,
    OpenBracket,
    Alias(usize),
    CloseBracket(usize),
    Done,
}

fn is_value(word: &str) -> bool {
    word.starts_with('$') || (word.len() >= 2 && word.starts_with('"') && word.ends_with('"'))
}

fn first_unclaimed(
    words: &[String],
    claimed: &[bool],
    predicate: impl Fn(&str) -> bool,
) -> Option<usize> {
    words
        .iter()
        .enumerate()
        .find(|(i, word)| !claimed[*i] && predicate(word.as_str()))
        .map(|(i, _)| i)
}

/// Move the value word in front of the `<target>` group.
///
/// Collects, in this order, the leading word, the first value word, an
/// opening `<`, the alias directly after it and the `>` directly after that.
/// The collected words come first, the remaining words follow in their
/// original order. If any of them is missing the words are returned as they
/// were.
pub fn value_before_target(words: Vec<String>) -> Vec<String> {
    let mut claimed = vec![false; words.len()];
    let mut order = Vec::with_capacity(words.len());
    let mut state = Scan::LeadingWord;

    while state != Scan::Done {
        let next = match state {
            Scan::LeadingWord if !words.is_empty() => Some((0, Scan::Value)),
            Scan::Value => first_unclaimed(&words, &claimed, is_value).map(|i| (i, Scan::OpenBracket)),
            Scan::OpenBracket => {
                first_unclaimed(&words, &claimed, |word| word == "<").map(|i| (i, Scan::Alias(i + 1)))
            }
            Scan::Alias(i) => words
                .get(i)
                .filter(|word| !claimed[i] && is_alias_word(word.as_str()))
                .map(|_| (i, Scan::CloseBracket(i + 1))),
            Scan::CloseBracket(i) => words
                .get(i)
                .filter(|word| !claimed[i] && word.as_str() == ">")
                .map(|_| (i, Scan::Done)),
            _ => None,
        };

        let Some((index, following)) = next else {
            return words;
        };
        claimed[index] = true;
        order.push(index);
        state = following;
    }

    let mut reordered: Vec<String> = order.iter().map(|&i| words[i].clone()).collect();
    reordered.extend(
        words
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed[*i])
            .map(|(_, word)| word.clone()),
    );
    reordered
}
