//! CLI command implementations.

use std::fs;

use jsonparse::{Document, JsonGrammar, JsonType, ParseError, TopLevel, ValueHandle};
use tracing::debug;

/// Parse a file and report the tree size.
pub fn check(args: &[String]) -> Result<(), i32> {
    let (positional, any) = split_flags(args);
    let [file] = positional.as_slice() else {
        return usage("check requires an input file", "check <file> [--any]");
    };

    let bytes = read_input(file)?;
    with_document(file, &bytes, any, |doc| {
        println!("OK: {file} ({} nodes)", doc.ast().len());
        Ok(())
    })
}

/// Print the value at a path: strings decoded, everything else verbatim.
pub fn get(args: &[String]) -> Result<(), i32> {
    let (positional, any) = split_flags(args);
    let [file, path] = positional.as_slice() else {
        return usage("get requires an input file and a path", "get <file> <path> [--any]");
    };

    let bytes = read_input(file)?;
    with_document(file, &bytes, any, |doc| {
        let value = lookup(doc, Some(*path))?;
        match value.type_of() {
            JsonType::String => {
                let text = value.as_string().map_err(query_failed)?;
                println!("{text}");
            }
            _ => println!("{}", String::from_utf8_lossy(value.raw())),
        }
        Ok(())
    })
}

/// Print the type name of the value at a path.
pub fn type_of(args: &[String]) -> Result<(), i32> {
    let (positional, any) = split_flags(args);
    let [file, path] = positional.as_slice() else {
        return usage("type requires an input file and a path", "type <file> <path> [--any]");
    };

    let bytes = read_input(file)?;
    with_document(file, &bytes, any, |doc| {
        println!("{}", lookup(doc, Some(*path))?.type_of());
        Ok(())
    })
}

/// List an object's member keys in source order, one per line.
pub fn keys(args: &[String]) -> Result<(), i32> {
    let (positional, any) = split_flags(args);
    let (file, path) = match positional.as_slice() {
        [file] => (file, None),
        [file, path] => (file, Some(*path)),
        _ => return usage("keys requires an input file", "keys <file> [path] [--any]"),
    };

    let bytes = read_input(file)?;
    with_document(file, &bytes, any, |doc| {
        let members = lookup(doc, path)?.members().map_err(query_failed)?;
        for (key, _) in members {
            println!("{key}");
        }
        Ok(())
    })
}

// ---- Helpers ----

/// Separate `--any` from positional arguments.
fn split_flags(args: &[String]) -> (Vec<&String>, bool) {
    let any = args.iter().any(|a| a == "--any");
    let positional = args.iter().filter(|a| *a != "--any").collect();
    (positional, any)
}

fn usage(message: &str, synopsis: &str) -> Result<(), i32> {
    eprintln!("error: {message}");
    eprintln!("Usage: jsonparse {synopsis}");
    Err(1)
}

fn read_input(file: &str) -> Result<Vec<u8>, i32> {
    let bytes = fs::read(file).map_err(|e| {
        eprintln!("error: cannot read '{file}': {e}");
        1
    })?;
    debug!(file, len = bytes.len(), "read input");
    Ok(bytes)
}

/// Parse `bytes` with the requested top level and hand the document to `f`.
///
/// The grammar does not admit whitespace around the top-level value, so
/// leading and trailing ASCII whitespace is skipped. Error offsets still
/// count from the start of the file.
fn with_document<F>(file: &str, bytes: &[u8], any: bool, f: F) -> Result<(), i32>
where
    F: FnOnce(&Document<'_>) -> Result<(), i32>,
{
    let owned;
    let grammar = if any {
        owned = JsonGrammar::with_top_level(TopLevel::AnyValue).map_err(|e| {
            eprintln!("error: {e}");
            1
        })?;
        &owned
    } else {
        jsonparse::init()
    };

    let lead = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(lead, |i| i + 1);

    let doc = jsonparse::parse(grammar, &bytes[lead..end]).map_err(|e| {
        eprintln!("error: {file}: {}", in_file(e, lead));
        2
    })?;
    f(&doc)
}

/// Move a parse error's offset from the trimmed text back onto the file.
fn in_file(e: ParseError, lead: usize) -> ParseError {
    match e {
        ParseError::EmptyInput => ParseError::EmptyInput,
        ParseError::NoMatch { offset, expected } => ParseError::NoMatch {
            offset: offset + lead,
            expected,
        },
        ParseError::TrailingInput { offset } => ParseError::TrailingInput {
            offset: offset + lead,
        },
        ParseError::DepthLimitExceeded { depth, offset } => ParseError::DepthLimitExceeded {
            depth,
            offset: offset + lead,
        },
        ParseError::NodeLimitExceeded { limit, offset } => ParseError::NodeLimitExceeded {
            limit,
            offset: offset + lead,
        },
    }
}

/// Resolve an optional dotted path from the document root.
fn lookup<'d, 'a>(doc: &'d Document<'a>, path: Option<&String>) -> Result<ValueHandle<'d, 'a>, i32> {
    match path {
        Some(path) => doc.find(path).map_err(query_failed),
        None => Ok(doc.root()),
    }
}

fn query_failed(e: jsonparse::QueryError) -> i32 {
    eprintln!("error: {e}");
    3
}
