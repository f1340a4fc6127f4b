//! The fixed instruction table.

use buddy::InstructionPattern;
use buddy::pattern::PatternError;

use crate::evaluator::variant::value_before_target;

/// All registered instruction patterns, in registration order.
#[derive(Debug, Clone, Default)]
pub struct InstructionSet {
    patterns: Vec<InstructionPattern>,
}

impl InstructionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The instructions understood by the compiler.
    pub fn standard() -> Result<Self, PatternError> {
        let mut set = InstructionSet::new();
        set.register(
            InstructionPattern::new("start", "Starte {name:path,type:param}", "start(,, ~path)")?
                .referable("processHandle#"),
        )
        .register(InstructionPattern::new(
            "click",
            "Klicke <{name:target,type:alias}> {name:frequence,type:frequence,mandatory:false}",
            "click(~target, , ~frequence)",
        )?)
        .register(InstructionPattern::new(
            "doubleClick",
            "Doppelklicke <{name:target,type:alias}>",
            "click(~target, , Double)",
        )?)
        .register(InstructionPattern::new(
            "wait",
            "Warte <{name:target,type:alias}> {name:condition,type:condition}",
            "wait(~target, ~condition.Name, ~condition.Value, 60000)",
        )?)
        .register(InstructionPattern::new(
            "verify",
            "Prüfe <{name:target,type:alias}> {name:condition,type:condition} \
             {name:expected,type:param,mandatory:false}",
            "verify(~target, ~condition.Name, ~(expected|condition.Value))",
        )?)
        .register(
            InstructionPattern::new(
                "select",
                "Wähle {name:value,type:param} <{name:target,type:alias}> aus",
                "select(~target, Value, ~value)",
            )?
            .variant(value_before_target),
        )
        .register(
            InstructionPattern::new(
                "type",
                "Schreibe {name:text,type:param} <{name:target,type:alias}>",
                "setText(~target, ~text)",
            )?
            .variant(value_before_target),
        )
        .register(InstructionPattern::new(
            "press",
            "Drücke {name:key,type:key}",
            "keyPress(~key)",
        )?)
        .register(InstructionPattern::new(
            "drag",
            "Ziehe <{name:source,type:alias}> <{name:destination,type:alias}>",
            "dragDrop(~(source&destination))",
        )?)
        .register(InstructionPattern::new(
            "activate",
            "Aktiviere {name:target,type:keyword}",
            "activate(~target)",
        )?)
        .register(InstructionPattern::new(
            "close",
            "Schließe {name:target,type:aliasKeyword}",
            "close(~target,, Default)",
        )?)
        .register(InstructionPattern::new(
            "closeControl",
            "Schließe <{name:target,type:alias}>",
            "close(~target,, Default)",
        )?)
        .register(InstructionPattern::new(
            "kill",
            "Beende {name:target,type:aliasKeyword}",
            "kill(~target,, 3000)",
        )?)
        .register(InstructionPattern::new(
            "assign",
            "Setze {name:variable,type:param} {name:value,type:param}",
            "~variable = ~value",
        )?)
        .register(InstructionPattern::new(
            "call",
            "Führe [{name:unit,type:unitReference}] aus \
             {name:arguments,type:parameterSet,mandatory:false}",
            "gosub ~unit.Name:~arguments",
        )?);
        Ok(set)
    }

    pub fn register(&mut self, pattern: InstructionPattern) -> &mut Self {
        self.patterns.push(pattern);
        self
    }

    /// Patterns whose leading word is `first_word`, in registration order.
    pub fn candidates<'a>(&'a self, first_word: &'a str) -> impl Iterator<Item = &'a InstructionPattern> {
        let first_word = first_word.to_lowercase();
        self.patterns
            .iter()
            .filter(move |pattern| pattern.leading_word().to_lowercase() == first_word)
    }

    pub fn get(&self, id: &str) -> Option<&InstructionPattern> {
        self.patterns.iter().find(|pattern| pattern.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstructionPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
