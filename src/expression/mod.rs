pub mod ast;
pub mod eval;
pub mod function;
pub mod numeric;
pub mod parse;

pub use ast::{Expression, operator::Operator};
pub use eval::{CompiledFunction, EvalError, evaluate};
pub use function::{Constant, Function};
pub use numeric::{NumericConstant, NumericConstantError};
pub use parse::ParseError;
