use buddy::naming::{self, UnitName};
use buddy::{Normalizer, tokenizer};
use proptest::prelude::*;

fn fragment_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,8}( [A-Za-z0-9]{1,8}){0,2}"
}

fn version_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,3}([.*-][0-9]{1,3}){0,2}"
}

fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9:$]{1,8}",
        "\"[a-z .,]{0,10}\"",
        "<[A-Za-z .,:]{1,10}>",
        "\\[[A-Za-z ./]{1,10}\\]",
        "\\([a-z ,]{0,6}(\"[a-z ,()]{0,6}\")?\\)",
    ]
}

/// Words that the normalizer leaves alone.
fn clean_word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Klicke".to_string()),
        Just("Warte".to_string()),
        Just("Prüfe".to_string()),
        Just("sichtbar".to_string()),
        Just("verschwunden".to_string()),
        Just("doppelt".to_string()),
        Just("aus".to_string()),
        "<[A-Za-z:]{1,10}>",
        "\"[a-z ]{0,10}\"",
        "\\$[A-Z][a-z]{0,6}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unit_names_round_trip(
        application in "[A-Za-z][A-Za-z0-9]{0,8}",
        version in version_strategy(),
        use_case in fragment_strategy(),
        scenario in fragment_strategy(),
    ) {
        let name = UnitName::new(&application, &version, &use_case, &scenario).unwrap();
        prop_assert_eq!(UnitName::parse(&name.qualified()).unwrap(), name);
        prop_assert_eq!(naming::decode_version(&naming::encode_version(&version)), version);
    }

    #[test]
    fn fragments_round_trip(fragment in "[ A-Za-zäöü0-9]{0,16}") {
        prop_assert_eq!(naming::decode(&naming::encode(&fragment)), fragment);
    }

    #[test]
    fn words_never_split_escapes(list in prop::collection::vec(word_strategy(), 1..8)) {
        let text = list.join(" ");
        prop_assert_eq!(tokenizer::word_texts(&text).unwrap(), list);
    }

    #[test]
    fn edits_preserve_other_words(
        list in prop::collection::vec(word_strategy(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let text = list.join(" ");
        let words = tokenizer::words(&text).unwrap();
        let index = pick.index(words.len());

        let removed = tokenizer::remove(&text, &words[index]);
        let mut expected = list.clone();
        expected.remove(index);
        prop_assert_eq!(tokenizer::word_texts(&removed.text).unwrap(), expected);

        let replaced = tokenizer::replace(&text, &words[index], "X");
        let mut expected = list.clone();
        expected[index] = "X".to_string();
        prop_assert_eq!(tokenizer::word_texts(&replaced.text).unwrap(), expected);
    }

    #[test]
    fn normalizing_clean_sentences_is_a_no_op(
        list in prop::collection::vec(clean_word_strategy(), 1..6),
    ) {
        let sentence = list.join(" ");
        prop_assert_eq!(Normalizer::new().normalize(&sentence).unwrap(), sentence);
    }
}
