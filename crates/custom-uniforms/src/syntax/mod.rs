//! Input token tree.
//!
//! Produced upstream by the expression parser; this crate only consumes it.

pub mod token;

pub use token::Token;
