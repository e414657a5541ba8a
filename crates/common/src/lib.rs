//! Shared building blocks for the jsonparse grammar engine.
//!
//! This crate provides the leaf layer every other crate builds on:
//!
//! - [`ByteClass`]: immutable 256-bit sets of byte values
//! - [`Token`], [`TokenOp`], [`Cardinality`], [`Matcher`]: named matchers
//!   that consume input directly
//! - [`Span`]: half-open byte ranges into the parsed input
//! - [`GrammarError`]: errors from defining a malformed grammar
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod byte_class;
pub mod error;
pub mod span;
pub mod token;

pub use byte_class::ByteClass;
pub use error::GrammarError;
pub use span::Span;
pub use token::{Cardinality, Matcher, Token, TokenOp};
