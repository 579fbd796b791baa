pub mod ast;
pub mod catalog;
pub mod eval;
pub mod subst;

pub use ast::{Identifier, Term, TermRef};
pub use eval::{normalize, reduce, reduce_once, trace, Strategy};
pub use subst::{free_variables, substitute};
