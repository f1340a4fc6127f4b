use buddy::pattern::ConversionScope;
use buddy::{Adjustments, FunctionRegistry, InstructionPattern};
use pretty_assertions::assert_eq;
use tdil::{EvaluationResult, FormatError, InstructionSet, ParameterCache, evaluate, format};

fn matched(sentence: &str, pattern: &InstructionPattern) -> ParameterCache {
    let functions = FunctionRegistry::standard();
    let adjustments = Adjustments::new();
    let scope = ConversionScope::new(&functions, &adjustments);
    let mut parameters = ParameterCache::new();
    let result = evaluate(sentence, pattern, &scope, &mut parameters).unwrap();
    assert_eq!(result, EvaluationResult::Ok, "'{}' did not match", sentence);
    parameters
}

/// Format `sentence` with the first standard instruction that matches it.
fn directive(sentence: &str) -> String {
    let instructions = InstructionSet::standard().unwrap();
    let functions = FunctionRegistry::standard();
    let adjustments = Adjustments::new();
    let scope = ConversionScope::new(&functions, &adjustments);
    let first = sentence.split_whitespace().next().unwrap_or_default();
    for pattern in instructions.candidates(first) {
        let mut parameters = ParameterCache::new();
        if evaluate(sentence, pattern, &scope, &mut parameters).unwrap() == EvaluationResult::Ok {
            return format(pattern, &parameters).unwrap();
        }
    }
    panic!("no instruction matches '{}'", sentence);
}

#[test]
fn standard_instructions() {
    assert_eq!(directive("Klicke <Button:Anmelden> einfach"), "click(Button:Anmelden, , Single)");
    assert_eq!(directive("Doppelklicke <Eintrag>"), "click(Eintrag, , Double)");
    assert_eq!(
        directive("Warte <Fenster> verschwunden"),
        "wait(Fenster, IsVisible, False, 60000)"
    );
    assert_eq!(directive("Drücke strg+c"), "keyPress(STRG+C)");
    assert_eq!(directive("Aktiviere Fenster"), "activate(_Window)");
    assert_eq!(directive("Schließe Anwendung"), "close(_Application,, Default)");
    assert_eq!(directive("Schließe <Dialog>"), "close(Dialog,, Default)");
    assert_eq!(directive("Beende Anwendung"), "kill(_Application,, 3000)");
    assert_eq!(directive("Setze $Zähler \"5\""), "Zähler = \"5\"");
}

#[test]
fn referable_instruction_gets_a_handle() {
    assert_eq!(
        directive(r#"Starte "C:\EGUB\EGUB.exe""#),
        r#"processHandle1 = start(,, "C:\EGUB\EGUB.exe")"#
    );
}

#[test]
fn alternative_takes_first_present_parameter() {
    assert_eq!(
        directive("Prüfe <Status> enthält \"abc\""),
        "verify(Status, Contains, \"abc\")"
    );
    assert_eq!(directive("Prüfe <Status> sichtbar"), "verify(Status, IsVisible, True)");
}

#[test]
fn conjunction_combines_parameters() {
    assert_eq!(directive("Ziehe <Quelle> <Ziel>"), "dragDrop(Quelle, Ziel)");
}

#[test]
fn unit_calls() {
    assert_eq!(
        directive("Führe [Navigation/Menü öffnen] aus (\"x\", $y)"),
        "gosub Menü_öffnen:(\"x\", y)"
    );
    assert_eq!(directive("Führe [Abmelden] aus"), "gosub Abmelden:");
}

#[test]
fn missing_parameter() {
    let pattern = InstructionPattern::new("bad", "Klicke <{name:target,type:alias}>", "click(~other)")
        .unwrap();
    let parameters = matched("Klicke <OK>", &pattern);
    assert_eq!(
        format(&pattern, &parameters),
        Err(FormatError::MissingParameter {
            instruction: "bad".into(),
            reference: "other".into(),
        })
    );

    let pattern =
        InstructionPattern::new("bad", "Klicke <{name:target,type:alias}>", "click(~(a|b))")
            .unwrap();
    assert!(matches!(
        format(&pattern, &parameters),
        Err(FormatError::MissingParameter { reference, .. }) if reference == "a|b"
    ));
}

#[test]
fn leftover_marker() {
    let pattern =
        InstructionPattern::new("bad", "Klicke <{name:target,type:alias}>", "click(~target, ~)")
            .unwrap();
    let parameters = matched("Klicke <OK>", &pattern);
    assert!(matches!(
        format(&pattern, &parameters),
        Err(FormatError::UnresolvedMarker { .. })
    ));
}

#[test]
fn conjunction_members_keep_their_suffixes() {
    let pattern = InstructionPattern::new(
        "bad",
        "Klicke <{name:target,type:alias}>",
        "click(~(target&target))",
    )
    .unwrap();
    let parameters = matched("Klicke <OK>", &pattern);
    assert_eq!(format(&pattern, &parameters).unwrap(), "click(OK, OK)");

    let pattern = InstructionPattern::new(
        "bad",
        "Warte <{name:target,type:alias}> {name:condition,type:condition}",
        "wait(~(target.Name&condition.Name))",
    )
    .unwrap();
    let parameters = matched("Warte <OK> sichtbar", &pattern);
    assert_eq!(format(&pattern, &parameters).unwrap(), "wait(OK, IsVisible)");
}
