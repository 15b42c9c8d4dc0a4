//! Parsing of free-form model output into structured data.

pub mod response_parser;

pub use response_parser::{
    ExpectedKind, ParseError, parse_or_default, parse_response, require_fields,
};
