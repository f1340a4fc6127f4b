//! Fixed word lists used by the normalizer. All comparisons against these
//! lists are case-insensitive.

/// Punctuation removed outside of escape regions.
pub const PUNCTUATION: &[char] = &[','];

pub const ARTICLES: &[&str] = &[
    "der", "die", "das", "den", "dem", "des", "ein", "eine", "einen", "einem", "einer", "eines",
];

pub const PREPOSITIONS: &[&str] = &[
    "in", "im", "ins", "an", "am", "auf", "bis", "von", "vom", "zu", "zum", "zur", "mit", "bei",
    "für", "über", "unter", "nach", "ob",
];

pub const AUXILIARY_VERBS: &[&str] = &[
    "ist", "sind", "wird", "werden", "wurde", "wurden", "hat", "haben", "soll", "sollte", "muss",
    "müssen", "kann", "können",
];

/// Nouns that only describe the kind of control and carry no meaning for
/// the generated directive.
pub const SUBSTANTIVES: &[&str] = &[
    "Schaltfläche",
    "Knopf",
    "Button",
    "Feld",
    "Eingabefeld",
    "Element",
    "Taste",
    "Liste",
    "Listbox",
    "Eintrag",
    "Wert",
    "Text",
];

/// Rewritten before any other synonym handling.
pub const NOT_VISIBLE: (&[&str], &str) = (&["nicht", "sichtbar"], "verschwunden");

/// Multi-word phrases, substituted before single words.
pub const PHRASES: &[(&[&str], &str)] = &[
    (&["nicht", "mehr", "sichtbar"], "verschwunden"),
    (&["nicht", "aktiv"], "deaktiviert"),
    (&["nicht", "geöffnet"], "geschlossen"),
    (&["zwei", "mal"], "doppelt"),
];

/// A root word and the words that mean the same thing.
#[derive(Debug, Clone, Copy)]
pub struct SynonymSet {
    pub root: &'static str,
    pub synonyms: &'static [&'static str],
}

pub const SYNONYMS: &[SynonymSet] = &[
    SynonymSet { root: "Starte", synonyms: &["starten", "start", "öffne", "öffnen"] },
    SynonymSet {
        root: "Klicke",
        synonyms: &["klick", "klicken", "anklicken", "betätige", "betätigen"],
    },
    SynonymSet { root: "Doppelklicke", synonyms: &["doppelklick", "doppelklicken"] },
    SynonymSet { root: "Warte", synonyms: &["warten", "erwarte"] },
    SynonymSet {
        root: "Prüfe",
        synonyms: &["prüfen", "überprüfe", "kontrolliere", "verifiziere"],
    },
    SynonymSet { root: "Wähle", synonyms: &["wählen", "auswählen", "selektiere"] },
    SynonymSet { root: "Schreibe", synonyms: &["schreiben", "gib", "tippe", "trage"] },
    SynonymSet { root: "Drücke", synonyms: &["drücken"] },
    SynonymSet { root: "Ziehe", synonyms: &["ziehen", "verschiebe"] },
    SynonymSet { root: "Aktiviere", synonyms: &["aktivieren", "fokussiere"] },
    SynonymSet { root: "Schließe", synonyms: &["schließen"] },
    SynonymSet { root: "Beende", synonyms: &["beenden"] },
    SynonymSet { root: "Setze", synonyms: &["setzen", "belege"] },
    SynonymSet { root: "Führe", synonyms: &["führen"] },
    SynonymSet { root: "verschwunden", synonyms: &["unsichtbar", "ausgeblendet"] },
    SynonymSet { root: "sichtbar", synonyms: &["angezeigt", "eingeblendet"] },
    SynonymSet { root: "deaktiviert", synonyms: &["inaktiv", "gesperrt"] },
    SynonymSet { root: "aktiviert", synonyms: &["aktiv", "freigegeben"] },
    SynonymSet { root: "einfach", synonyms: &["einmal", "einmalig"] },
    SynonymSet { root: "doppelt", synonyms: &["zweimal", "zweifach"] },
    SynonymSet { root: "Anwendung", synonyms: &["applikation", "programm"] },
];
