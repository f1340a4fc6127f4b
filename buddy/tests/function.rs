use buddy::function::ExtensionArgument;
use buddy::{Adjustments, FunctionRegistry};
use pretty_assertions::assert_eq;

fn rewrite(expression: &str) -> String {
    FunctionRegistry::standard().format_invocation(expression, &Adjustments::new())
}

#[test]
fn builtin_functions_use_defaults() {
    assert_eq!(rewrite("\"Datum()\""), "getDate(\"dd.MM.yyyy\", 0)");
    assert_eq!(rewrite("\"Datum(-3)\""), "getDate(\"dd.MM.yyyy\", -3)");
    assert_eq!(rewrite("\"Uhrzeit()\""), "getTime(\"HH:mm:ss\")");
    assert_eq!(rewrite("\"Zufallszahl()\""), "random(0, 100)");
    assert_eq!(rewrite("\"Zufallszahl(5, 10)\""), "random(5, 10)");
}

#[test]
fn text_without_invocation_is_unchanged() {
    assert_eq!(rewrite("\"Datum\""), "\"Datum\"");
    assert_eq!(rewrite("\"Heute\""), "\"Heute\"");
    assert_eq!(rewrite("Benutzer"), "Benutzer");
}

#[test]
fn invocation_is_spliced_into_surrounding_text() {
    assert_eq!(rewrite("\"Stand: Datum()\""), "Stand: getDate(\"dd.MM.yyyy\", 0)");
}

#[test]
fn adjustments_override_defaults() {
    let (adjustments, stripped) =
        Adjustments::collect("Schreibe \"Datum(1)\" {Format=\"yyyy-MM-dd\"} <Feld>");
    assert_eq!(stripped, "Schreibe \"Datum(1)\" <Feld>");
    assert_eq!(adjustments.get("format"), Some("\"yyyy-MM-dd\""));

    let rewritten = FunctionRegistry::standard().format_invocation("\"Datum(1)\"", &adjustments);
    assert_eq!(rewritten, "getDate(\"yyyy-MM-dd\", 1)");
}

#[test]
fn captured_arguments_win_over_adjustments() {
    let mut adjustments = Adjustments::new();
    adjustments.set("offset", "7");
    let rewritten = FunctionRegistry::standard().format_invocation("\"Datum(2)\"", &adjustments);
    assert_eq!(rewritten, "getDate(\"dd.MM.yyyy\", 2)");
}

#[test]
fn collect_without_blocks() {
    let (adjustments, stripped) = Adjustments::collect("Klicke <OK>");
    assert!(adjustments.is_empty());
    assert_eq!(stripped, "Klicke <OK>");
}

#[test]
fn registered_functions() {
    let mut registry = FunctionRegistry::new();
    registry
        .register(
            r"\bBenutzer\((?P<index>\d+)?\)",
            "user(~index, ~domain)",
            vec![
                ExtensionArgument::new("index", "1"),
                ExtensionArgument::new("domain", "\"intern\""),
            ],
        )
        .unwrap();
    assert_eq!(
        registry.format_invocation("\"Benutzer()\"", &Adjustments::new()),
        "user(1, \"intern\")"
    );
    assert_eq!(
        registry.format_invocation("\"Datum()\"", &Adjustments::new()),
        "\"Datum()\""
    );
    assert!(registry.register("(", "x", Vec::new()).is_err());
}
