//! LZ77 layer: marker-escaped literals and variable-width back-references.

pub mod decode;

pub use decode::{decode, decode_into, parse_match, push_literal, Match};
