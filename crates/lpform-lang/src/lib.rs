//! Text notation for small linear programs.
//!
//! ```text
//! problem "Production Plan"
//! variables x1, x2
//! maximize 3 x1 + 2 x2
//! subject to {
//!     capacity: x1 + x2 <= 4
//!     x1 - x2 >= -2
//! }
//! ```
//!
//! [`compile`] turns source text into a validated [`lpform_solver::Model`].

pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod parser;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::*;
pub use compiler::{CompileError, Compiler, compile};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser};
