pub mod compiler;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod formatter;
pub mod instructions;
pub mod options;
pub mod record;
pub mod resolver;
pub mod writer;

pub use compiler::{CompiledSteps, Compiler, compile, resolve_includes, unit_name};
pub use context::CompilingContext;
pub use error::{CompileError, StepError};
pub use evaluator::{EvaluationResult, Mismatch, ParameterCache, evaluate};
pub use formatter::{FormatError, format};
pub use instructions::InstructionSet;
pub use options::CompileOptions;
pub use record::{ParameterDecl, ScenarioRecord};
pub use resolver::{SiblingResolver, UnitResolver};
pub use writer::{Node, NodeKind, WriterError};
