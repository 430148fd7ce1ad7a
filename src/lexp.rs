//! Factored-form logic expressions used as node functions

mod expr;
mod literal;
mod soplit;

pub use expr::LogExpr;
pub use literal::{Literal, VarId};
pub use soplit::SopLit;
