//! Compilation of a segmented scenario into one TDIL unit.

use buddy::naming::{self, NameError};
use buddy::pattern::ConversionScope;
use buddy::pattern::kinds::APPLICATION_ALIAS;
use buddy::tokenizer;
use buddy::{Adjustments, FunctionRegistry, Normalizer, TokenizeError, UnitName};
use tracing::debug;

use crate::context::CompilingContext;
use crate::error::{CompileError, StepError};
use crate::evaluator::{EvaluationResult, Mismatch, ParameterCache, evaluate};
use crate::formatter::format;
use crate::instructions::InstructionSet;
use crate::options::CompileOptions;
use crate::record::ScenarioRecord;
use crate::resolver::UnitResolver;
use crate::writer::Node;

/// Name of the entry section of every unit.
pub const MAIN_SECTION: &str = "Main";

/// The directives of a scenario and the references they made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledSteps {
    pub directives: Vec<String>,
    pub context: CompilingContext,
}

/// Compiles scenarios with a fixed instruction set.
#[derive(Debug, Clone)]
pub struct Compiler {
    instructions: InstructionSet,
    normalizer: Normalizer,
    functions: FunctionRegistry,
    options: CompileOptions,
}

impl Compiler {
    /// A compiler with the standard instructions and extension functions.
    pub fn new(options: CompileOptions) -> Result<Self, CompileError> {
        Ok(Compiler::with_parts(
            InstructionSet::standard()?,
            FunctionRegistry::standard(),
            options,
        ))
    }

    pub fn with_parts(
        instructions: InstructionSet,
        functions: FunctionRegistry,
        options: CompileOptions,
    ) -> Self {
        Compiler {
            instructions,
            normalizer: Normalizer::new(),
            functions,
            options,
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn instructions(&self) -> &InstructionSet {
        &self.instructions
    }

    /// Turn one step sentence into a directive.
    ///
    /// Every candidate pattern is tried in registration order and the first
    /// match is formatted. References of the matching parameters are added
    /// to `context`. If no candidate matches, the mismatch that got furthest
    /// into its pattern is reported.
    pub fn compile_step(
        &self,
        sentence: &str,
        context: &mut CompilingContext,
    ) -> Result<String, StepError> {
        let (adjustments, stripped) = Adjustments::collect(sentence);
        let normalized = self.normalizer.normalize(&stripped)?;
        let first = tokenizer::word_texts(&normalized)?
            .into_iter()
            .next()
            .ok_or(TokenizeError::Empty)?;

        let scope = ConversionScope::new(&self.functions, &adjustments);
        let mut best: Option<Mismatch> = None;
        for pattern in self.instructions.candidates(&first) {
            let mut parameters = ParameterCache::new();
            match evaluate(&normalized, pattern, &scope, &mut parameters)? {
                EvaluationResult::Ok => {
                    let directive = format(pattern, &parameters)?;
                    context.record(&parameters);
                    debug!(instruction = pattern.id(), sentence, %directive, "compiled step");
                    return Ok(directive);
                }
                EvaluationResult::Error(mismatch) => {
                    debug!(instruction = pattern.id(), %mismatch, "candidate rejected");
                    if best.as_ref().is_none_or(|b| mismatch.position > b.position) {
                        best = Some(mismatch);
                    }
                }
            }
        }

        match best {
            Some(mismatch) => Err(StepError::NoMatch(mismatch)),
            None => Err(StepError::UnknownInstruction(first)),
        }
    }

    /// Compile every step of `record`, stopping at the first failure.
    pub fn compile_steps(&self, record: &ScenarioRecord) -> Result<CompiledSteps, CompileError> {
        let mut context = CompilingContext::new();
        let mut directives = Vec::with_capacity(record.steps.len());
        for (step, sentence) in record.steps.iter().enumerate() {
            let directive =
                self.compile_step(sentence, &mut context)
                    .map_err(|source| CompileError::Step {
                        step,
                        sentence: sentence.clone(),
                        source,
                    })?;
            directives.push(directive);
        }
        Ok(CompiledSteps {
            directives,
            context,
        })
    }

    /// Compile `record` into the text of a complete TDIL file.
    pub fn compile(
        &self,
        record: &ScenarioRecord,
        resolver: &dyn UnitResolver,
    ) -> Result<String, CompileError> {
        let unit = unit_name(record)?;
        let CompiledSteps {
            directives,
            context,
        } = self.compile_steps(record)?;
        let includes = resolve_includes(&unit, &context, resolver)?;
        debug!(
            unit = %unit,
            steps = directives.len(),
            aliases = context.aliases().len(),
            includes = includes.len(),
            "writing unit"
        );

        let params = record.parameter_names();
        let section = naming::encode(unit.scenario());
        let arguments = if params.is_empty() {
            String::new()
        } else {
            format!("({})", params.join(", "))
        };

        let mut file = Node::file(&self.options.compiler_version, &self.options.generated_on());
        for alias in context.aliases() {
            file.append_line(&format!("#alias \"{}\"", alias))?;
        }
        for include in &includes {
            file.append_line(&format!("#include \"{}\"", include.qualified()))?;
        }
        if !context.is_empty() {
            file.append_line("")?;
        }

        let mut unit_node = file.unit(&unit.qualified(), &params)?;

        let mut main = unit_node.section(MAIN_SECTION, &[])?;
        for parameter in &record.parameters {
            main.append_line(&parameter.assignment())?;
        }
        main.append_line(&format!("start(,, \"{{{}}}\")", unit.application()))?;
        main.append_line(&format!("gosub {}:{}", section, arguments))?;
        for target in teardown_targets(&self.options) {
            main.append_line(&format!("close({},, Default)", target))?;
            main.append_line(&format!("kill({},, 3000)", target))?;
        }
        main.close();

        let mut scenario = unit_node.section(&section, &params)?;
        let precondition = record.precondition.trim();
        if !precondition.is_empty() {
            scenario.append_line(&format!("// Vorbedingung: {}", precondition))?;
        }
        for directive in &directives {
            scenario.append_line(directive)?;
        }
        scenario.close();
        unit_node.close();

        Ok(file.finalize().to_string())
    }
}

/// The unit `record` compiles to.
pub fn unit_name(record: &ScenarioRecord) -> Result<UnitName, NameError> {
    UnitName::new(
        &record.application,
        &record.version,
        &record.use_case,
        &record.scenario,
    )
}

/// Resolve the unit references of `context`, dropping references that
/// resolve to the same unit.
pub fn resolve_includes(
    unit: &UnitName,
    context: &CompilingContext,
    resolver: &dyn UnitResolver,
) -> Result<Vec<UnitName>, NameError> {
    let mut includes: Vec<UnitName> = Vec::new();
    for reference in context.units() {
        let include = resolver.unit_name_for(unit, reference)?;
        if !includes.contains(&include) {
            includes.push(include);
        }
    }
    Ok(includes)
}

/// Processes shut down after the scenario, the application first.
fn teardown_targets(options: &CompileOptions) -> Vec<String> {
    std::iter::once(APPLICATION_ALIAS.to_string())
        .chain(
            options
                .teardown_processes
                .iter()
                .map(|process| format!("\"{}\"", process)),
        )
        .collect()
}

/// Compile `record` with the standard instruction set.
pub fn compile(
    record: &ScenarioRecord,
    resolver: &dyn UnitResolver,
    options: CompileOptions,
) -> Result<String, CompileError> {
    Compiler::new(options)?.compile(record, resolver)
}
