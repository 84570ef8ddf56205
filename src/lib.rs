pub mod ast;
pub mod table;
pub mod typeck;

pub use ast::errors::*;
pub use table::Table;
pub use typeck::{check, TypeChecker, TypeContext};
