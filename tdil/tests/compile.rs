use std::path::PathBuf;

use buddy::UnitName;
use pretty_assertions::assert_eq;
use tdil::{
    CompileError, CompileOptions, Compiler, CompilingContext, ParameterDecl, ScenarioRecord,
    SiblingResolver, StepError, UnitResolver,
};

fn options() -> CompileOptions {
    CompileOptions {
        compiler_version: "1.2.3".into(),
        generated_on: Some("18.10.2026 12:00:00".into()),
        ..CompileOptions::default()
    }
}

fn compiler() -> Compiler {
    Compiler::new(options()).expect("instruction table is valid")
}

fn step(sentence: &str) -> Result<String, StepError> {
    compiler().compile_step(sentence, &mut CompilingContext::new())
}

fn record(scenario: &str, steps: &[&str]) -> ScenarioRecord {
    ScenarioRecord {
        application: "EGUB".into(),
        version: "1.0".into(),
        use_case: "Anmeldung".into(),
        scenario: scenario.into(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        ..ScenarioRecord::default()
    }
}

// ---------------------------------------------------------------------------
// Single steps
// ---------------------------------------------------------------------------

#[test]
fn click_once() {
    assert_eq!(
        step("Klicke <Button:Anmelden> einfach.").unwrap(),
        "click(Button:Anmelden, , Single)"
    );
}

#[test]
fn wait_until_gone() {
    assert_eq!(
        step("Warte <Fenster> verschwunden").unwrap(),
        "wait(Fenster, IsVisible, False, 60000)"
    );
    assert_eq!(
        step("Warte, bis das <Fenster> nicht sichtbar ist.").unwrap(),
        "wait(Fenster, IsVisible, False, 60000)"
    );
}

#[test]
fn start_is_referable() {
    assert_eq!(
        step(r#"Starte "C:\EGUB\EGUB.exe"."#).unwrap(),
        r#"processHandle1 = start(,, "C:\EGUB\EGUB.exe")"#
    );
}

#[test]
fn select_records_alias() {
    let compiler = compiler();
    let mut context = CompilingContext::new();
    let directive = compiler
        .compile_step("Wähle \"000\" in <ListboxPinr> aus.", &mut context)
        .unwrap();
    assert_eq!(directive, "select(ListboxPinr, Value, \"000\")");
    assert_eq!(context.aliases(), &["ListboxPinr".to_string()]);
    assert!(context.units().is_empty());
}

#[test]
fn close_without_target() {
    let Err(StepError::NoMatch(mismatch)) = step("Schließe ") else {
        panic!("expected a mismatch");
    };
    assert_eq!(mismatch.instruction, "close");
    assert_eq!(mismatch.position, 2);
    assert!(mismatch.message.contains("2nd token"), "{}", mismatch.message);
    assert!(mismatch.message.contains("'<unset>'"), "{}", mismatch.message);
}

#[test]
fn furthest_mismatch_is_reported() {
    let Err(StepError::NoMatch(mismatch)) = step("Schließe <>") else {
        panic!("expected a mismatch");
    };
    assert_eq!(mismatch.instruction, "closeControl");
    assert_eq!(mismatch.position, 3);
    assert!(mismatch.message.ends_with("not a control name"), "{}", mismatch.message);
}

#[test]
fn unterminated_escape_is_an_input_error() {
    assert!(matches!(step("Schließe <Dialog"), Err(StepError::Input(_))));
}

#[test]
fn synonyms_and_fillers() {
    assert_eq!(
        step("Gib \"geheim\" in das Feld <Passwort> ein.").unwrap(),
        "setText(Passwort, \"geheim\")"
    );
    assert_eq!(
        step("Überprüfe, ob <Status> nicht aktiv ist.").unwrap(),
        "verify(Status, IsEnabled, False)"
    );
    assert_eq!(step("Betätige die Schaltfläche <OK> zweimal.").unwrap(), "click(OK, , Double)");
}

#[test]
fn extension_functions_with_adjustments() {
    assert_eq!(
        step("Schreibe \"Datum(-1)\" {format=\"yyyy-MM-dd\"} in <Feld:Datum>.").unwrap(),
        "setText(Feld:Datum, getDate(\"yyyy-MM-dd\", -1))"
    );
    assert_eq!(
        step("Setze $Zahl \"Zufallszahl(1, 6)\".").unwrap(),
        "Zahl = random(1, 6)"
    );
}

#[test]
fn call_arguments_with_extension_functions() {
    assert_eq!(
        step("Führe [Login] aus (\"Datum()\").").unwrap(),
        "gosub Login:(getDate(\"dd.MM.yyyy\", 0))"
    );
    assert_eq!(
        step("Führe [Login] aus ($a, \"Zufallszahl(1, 6)\")").unwrap(),
        "gosub Login:(a, random(1, 6))"
    );
    assert_eq!(
        step("Führe [Login] aus (\"Datum(-2)\") {format=\"yyyy\"}").unwrap(),
        "gosub Login:(getDate(\"yyyy\", -2))"
    );
}

#[test]
fn adjustments_do_not_leak_between_steps() {
    let compiler = compiler();
    let mut context = CompilingContext::new();
    compiler
        .compile_step("Setze $Heute \"Datum()\" {format=\"yyyy\"}", &mut context)
        .unwrap();
    assert_eq!(
        compiler.compile_step("Setze $Heute \"Datum()\"", &mut context).unwrap(),
        "Heute = getDate(\"dd.MM.yyyy\", 0)"
    );
}

#[test]
fn unconvertible_optional_word_falls_back_to_unset() {
    assert_eq!(step("Klicke <OK> dreimal").unwrap(), "click(OK, , Single)");
}

#[test]
fn unknown_and_empty_steps() {
    assert_eq!(
        step("Tanze <Button>."),
        Err(StepError::UnknownInstruction("Tanze".into()))
    );
    assert!(matches!(step(" "), Err(StepError::Input(_))));
    assert!(matches!(step("die der das"), Err(StepError::Input(_))));
}

#[test]
fn failed_candidates_do_not_record_references() {
    let compiler = compiler();
    let mut context = CompilingContext::new();
    assert!(compiler.compile_step("Klicke OK", &mut context).is_err());
    assert!(context.is_empty());
}

// ---------------------------------------------------------------------------
// Whole units
// ---------------------------------------------------------------------------

#[test]
fn full_unit() {
    let mut record = record(
        "Login",
        &["Klicke <Button:Anmelden> einfach.", "Führe [Abmeldung] aus."],
    );
    record.parameters = vec![ParameterDecl::new("Benutzer", "tester")];

    let unit = compiler().compile(&record, &SiblingResolver::new("units")).unwrap();
    assert_eq!(
        unit,
        "// Compiler generated file
// Buddy Compiler version 1.2.3
// Generated on 18.10.2026 12:00:00

#alias \"Button:Anmelden\"
#include \"EGUB.1d0.Anmeldung.Abmeldung\"

Unit EGUB.1d0.Anmeldung.Login (Benutzer)

Main:
Benutzer = \"tester\"
start(,, \"{EGUB}\")
gosub Login:(Benutzer)
close(_Application,, Default)
kill(_Application,, 3000)
close(\"AcroRd32\",, Default)
kill(\"AcroRd32\",, 3000)
End

Login:(Benutzer)
click(Button:Anmelden, , Single)
gosub Abmeldung:
End

End
"
    );
}

#[test]
fn unit_without_declarations() {
    let mut record = record("Erster Start", &["Starte \"C:\\EGUB\\EGUB.exe\"."]);
    record.precondition = "Die Anwendung ist installiert.".into();
    let mut options = options();
    options.teardown_processes.clear();

    let unit = Compiler::new(options)
        .unwrap()
        .compile(&record, &SiblingResolver::default())
        .unwrap();
    assert_eq!(
        unit,
        "// Compiler generated file
// Buddy Compiler version 1.2.3
// Generated on 18.10.2026 12:00:00

Unit EGUB.1d0.Anmeldung.Erster_Start

Main:
start(,, \"{EGUB}\")
gosub Erster_Start:
close(_Application,, Default)
kill(_Application,, 3000)
End

Erster_Start:
// Vorbedingung: Die Anwendung ist installiert.
processHandle1 = start(,, \"C:\\EGUB\\EGUB.exe\")
End

End
"
    );
}

#[test]
fn declarations_are_distinct() {
    let record = record(
        "Doppelt",
        &[
            "Klicke <OK>.",
            "Klicke <OK> doppelt.",
            "Führe [Navigation/Menü] aus.",
            "Führe [Navigation/Menü] aus.",
            "Führe [Abmeldung] aus.",
        ],
    );
    let unit = compiler().compile(&record, &SiblingResolver::default()).unwrap();
    assert_eq!(unit.matches("#alias \"OK\"").count(), 1);
    assert_eq!(unit.matches("#include \"EGUB.1d0.Navigation.Menü\"").count(), 1);
    assert_eq!(unit.matches("#include \"EGUB.1d0.Anmeldung.Abmeldung\"").count(), 1);
    assert_eq!(unit.matches("\nMain:\n").count(), 1);
}

#[test]
fn step_errors_carry_their_index() {
    let record = record("Kaputt", &["Klicke <OK>.", "Klicke OK."]);
    let error = compiler().compile(&record, &SiblingResolver::default()).unwrap_err();
    assert_eq!(error.step(), Some(1));
    assert!(
        error.to_string().starts_with("step 2 'Klicke OK.': the 2nd token"),
        "{}",
        error
    );
}

#[test]
fn invalid_unit_name() {
    let mut record = record("Login", &["Klicke <OK>."]);
    record.version = "eins".into();
    let error = compiler().compile(&record, &SiblingResolver::default()).unwrap_err();
    assert!(matches!(error, CompileError::Name(_)));
}

// ---------------------------------------------------------------------------
// Resolution and configuration
// ---------------------------------------------------------------------------

#[test]
fn sibling_resolution() {
    let current = UnitName::new("EGUB", "1.0", "Anmeldung", "Login").unwrap();
    let resolver = SiblingResolver::new("units");

    let other = resolver.unit_name_for(&current, "Navigation/Menü_öffnen").unwrap();
    assert_eq!(other.use_case(), "Navigation");
    assert_eq!(other.scenario(), "Menü öffnen");

    let same = resolver.unit_name_for(&current, "Abmeldung").unwrap();
    assert_eq!(same.qualified(), "EGUB.1d0.Anmeldung.Abmeldung");

    assert_eq!(
        resolver.path_for(&same),
        PathBuf::from("units/EGUB/EGUB.1d0.Anmeldung.Abmeldung.tdil")
    );
}

#[test]
fn record_from_toml() {
    let record: ScenarioRecord = toml::from_str(
        r#"
application = "EGUB"
version = "2.1"
use_case = "Anmeldung"
scenario = "Login"
steps = ["Klicke <OK>."]

[[parameters]]
name = "Benutzer"

[[parameters]]
name = "Passwort"
default = '"geheim"'
"#,
    )
    .unwrap();
    assert_eq!(record.precondition, "");
    assert_eq!(record.parameter_names(), vec!["Benutzer", "Passwort"]);
    assert_eq!(record.parameters[0].assignment(), "Benutzer = \"\"");
    assert_eq!(record.parameters[1].assignment(), "Passwort = \"geheim\"");
}

#[test]
fn options_from_toml() {
    let options: CompileOptions = toml::from_str("compiler_version = \"9.9\"").unwrap();
    assert_eq!(options.compiler_version, "9.9");
    assert_eq!(options.teardown_processes, vec!["AcroRd32"]);
    assert_eq!(options.generated_on, None);

    let options: CompileOptions = toml::from_str("generated_on = \"heute\"").unwrap();
    assert_eq!(options.generated_on(), "heute");
}
