//! Query expressions and their SOQL rendering.

mod compiler;
mod expression;

pub use compiler::{compile, SoqlQuery};
pub use expression::{Literal, Operator, OrderBy, QueryExpression};
