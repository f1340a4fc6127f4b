pub mod function;
pub mod naming;
pub mod normalizer;
pub mod pattern;
pub mod tokenizer;

pub use function::{Adjustments, FunctionRegistry};
pub use naming::UnitName;
pub use normalizer::Normalizer;
pub use pattern::{InstructionPattern, PatternToken};
pub use tokenizer::{TokenizeError, Word};
