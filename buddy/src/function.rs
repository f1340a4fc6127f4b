use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// An adjustment block inside a step: `{format="yyyy-MM-dd"}`.
static ADJUSTMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s*\{\s*(?P<name>[A-Za-z]+)\s*=\s*(?P<value>[^}]*?)\s*\}"#).unwrap()
});

/// A `~name` argument marker in a call template.
static ARGUMENT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~(?P<name>[A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Per-step overrides for function arguments, keyed by lowercased argument
/// name. One table lives for exactly one step conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustments {
    values: HashMap<String, String>,
}

impl Adjustments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-pass over a whole step: record every adjustment block and return
    /// the step with the blocks cut out.
    pub fn collect(instruction: &str) -> (Adjustments, String) {
        let mut adjustments = Adjustments::new();
        for caps in ADJUSTMENT.captures_iter(instruction) {
            adjustments.set(&caps["name"], &caps["value"]);
        }
        let stripped = ADJUSTMENT.replace_all(instruction, "").into_owned();
        (adjustments, stripped)
    }

    pub fn set(&mut self, argument: &str, value: &str) {
        self.values
            .insert(argument.to_lowercase(), value.to_string());
    }

    pub fn get(&self, argument: &str) -> Option<&str> {
        self.values.get(&argument.to_lowercase()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A named argument of an extension function. Used when the invocation
/// leaves the argument out and no adjustment supplies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionArgument {
    pub name: String,
    pub default: String,
}

impl ExtensionArgument {
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        ExtensionArgument {
            name: name.into(),
            default: default.into(),
        }
    }
}

/// A function call written in step notation together with the call it is
/// rewritten to.
#[derive(Debug, Clone)]
pub struct ExtensionFunction {
    pub expression: Regex,
    pub template: String,
    pub arguments: Vec<ExtensionArgument>,
}

impl ExtensionFunction {
    /// A function whose expression is known to be valid.
    fn builtin(expression: &str, template: &str, arguments: &[(&str, &str)]) -> Self {
        ExtensionFunction {
            expression: Regex::new(expression).unwrap(),
            template: template.to_string(),
            arguments: arguments
                .iter()
                .map(|(name, default)| ExtensionArgument::new(*name, *default))
                .collect(),
        }
    }

    fn render(&self, caps: &Captures<'_>, adjustments: &Adjustments) -> String {
        ARGUMENT_MARKER
            .replace_all(&self.template, |marker: &Captures<'_>| {
                let name = &marker["name"];
                if let Some(found) = caps.name(name) {
                    return found.as_str().to_string();
                }
                if let Some(adjusted) = adjustments.get(name) {
                    return adjusted.to_string();
                }
                self.arguments
                    .iter()
                    .find(|argument| argument.name == name)
                    .map(|argument| argument.default.clone())
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

/// Ordered registry of extension functions; the first matching entry wins.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: Vec<ExtensionFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The functions available to every step.
    pub fn standard() -> Self {
        FunctionRegistry {
            functions: vec![
                ExtensionFunction::builtin(
                    r"\bDatum\((?P<offset>[+-]?\d+)?\)",
                    "getDate(~format, ~offset)",
                    &[("offset", "0"), ("format", "\"dd.MM.yyyy\"")],
                ),
                ExtensionFunction::builtin(
                    r"\bUhrzeit\(\)",
                    "getTime(~format)",
                    &[("format", "\"HH:mm:ss\"")],
                ),
                ExtensionFunction::builtin(
                    r"\bZufallszahl\((?P<min>\d+)?(?:\s*,\s*(?P<max>\d+))?\)",
                    "random(~min, ~max)",
                    &[("min", "0"), ("max", "100")],
                ),
            ],
        }
    }

    pub fn register(
        &mut self,
        expression: &str,
        template: &str,
        arguments: Vec<ExtensionArgument>,
    ) -> Result<&mut Self, regex::Error> {
        self.functions.push(ExtensionFunction {
            expression: Regex::new(expression)?,
            template: template.to_string(),
            arguments,
        });
        Ok(self)
    }

    /// Rewrite the first registered invocation found in `expression` into
    /// its call syntax and drop the quotes around the result. Expressions
    /// without an invocation come back unchanged.
    pub fn format_invocation(&self, expression: &str, adjustments: &Adjustments) -> String {
        for function in &self.functions {
            let Some(caps) = function.expression.captures(expression) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let call = function.render(&caps, adjustments);
            let spliced = format!(
                "{}{}{}",
                &expression[..whole.start()],
                call,
                &expression[whole.end()..]
            );
            debug!(expression, call = %spliced, "rewrote extension function");
            return strip_quotes(&spliced).to_string();
        }
        expression.to_string()
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}
