//! JSON on the jsonparse grammar engine.
//!
//! JSON is defined as a data-driven grammar graph ([`JsonGrammar`]), parsed
//! by the generic engine, and queried through a [`Document`] that indexes
//! every object and array of the resulting tree.
//!
//! # Usage
//!
//! ```
//! use jsonparse::{init, parse, JsonType};
//!
//! let json = init();
//! let input = r#"{"name": "café", "tags": ["a", "b"], "n": 3}"#;
//! let doc = parse(json, input.as_bytes()).unwrap();
//!
//! assert_eq!(doc.find("name").unwrap().as_string().unwrap(), "caf\u{e9}");
//! assert_eq!(doc.find("n").unwrap().type_of(), JsonType::Integer);
//! assert_eq!(doc.find("tags").unwrap().elements().unwrap().len(), 2);
//! ```
//!
//! # Ownership
//!
//! The caller owns the input buffer; a [`Document`] borrows it along with
//! the grammar, and [`ValueHandle`]s borrow the document.

pub mod classes;
pub mod document;
pub mod error;
pub mod grammar;
pub mod value;

mod index;
mod unescape;
mod walk;

pub use document::{parse, parse_with, Document};
pub use error::{Error, QueryError};
pub use grammar::{init, JsonGrammar, TopLevel};
pub use jsonparse_engine::{ParseError, RunOptions};
pub use value::{JsonType, ValueHandle};
