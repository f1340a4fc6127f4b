use buddy::Normalizer;
use buddy::normalizer::{replace_phrase, strip_words};
use pretty_assertions::assert_eq;

fn normalize(sentence: &str) -> String {
    Normalizer::new().normalize(sentence).expect("normalize failed")
}

#[test]
fn filler_words_are_removed() {
    assert_eq!(normalize("Klicke auf die Schaltfläche <OK>."), "Klicke <OK>.");
    assert_eq!(normalize("Warte bis <Dialog> sichtbar ist."), "Warte <Dialog> sichtbar.");
}

#[test]
fn synonyms_become_root_words() {
    assert_eq!(
        normalize("Gib \"x\" in das Feld <Name> ein."),
        "Schreibe \"x\" <Name>."
    );
    assert_eq!(normalize("Überprüfe ob <Status> aktiv ist"), "Prüfe <Status> aktiviert");
    assert_eq!(normalize("Klicke <Liste> zweimal"), "Klicke <Liste> doppelt");
}

#[test]
fn not_visible_is_rewritten() {
    assert_eq!(
        normalize("Warte bis <Fenster> nicht sichtbar ist."),
        "Warte <Fenster> verschwunden."
    );
    assert_eq!(
        normalize("Warte bis <Fenster> nicht mehr sichtbar ist."),
        "Warte <Fenster> verschwunden."
    );
    assert_eq!(normalize("Prüfe <Status> nicht aktiv"), "Prüfe <Status> deaktiviert");
}

#[test]
fn escaped_words_are_untouched() {
    assert_eq!(
        normalize("Schreibe \"die Daten, alle\" in <das Feld>"),
        "Schreibe \"die Daten, alle\" <das Feld>"
    );
}

#[test]
fn commas_are_dropped() {
    assert_eq!(normalize("Klicke, dann <OK>"), "Klicke dann <OK>");
}

#[test]
fn strip_words_ignores_case() {
    assert_eq!(strip_words("Der Knopf und DAS Feld", &["der", "das"]).unwrap(), "Knopf und Feld");
}

#[test]
fn replace_phrase_replaces_every_run() {
    assert_eq!(
        replace_phrase("zwei mal oder Zwei Mal", &["zwei", "mal"], "doppelt").unwrap(),
        "doppelt oder doppelt"
    );
    assert_eq!(replace_phrase("nicht hier", &["nicht", "da"], "x").unwrap(), "nicht hier");
}
