//! # splicemap
//!
//! This crate decodes, merges and re-encodes the `mappings` field of source maps.
//!
//! ## Getting Started
//!
//! ```
//! use splicemap::SourceMap;
//!
//! // `mappings` of a bundle made of one file, whose map has 1 source and 0 names
//! let mut sm = SourceMap::new("AAAA", 1, 0);
//!
//! // Append a second file, starting one line below, whose map also has 1 source
//! sm.add_mappings("CAAA", 1, 0, (1, 0)).unwrap();
//!
//! assert_eq!(sm.to_string().unwrap(), "AAAA;CCAA");
//! assert_eq!(sm.sources_count(), 2);
//! ```
//!
//! ## Overview
//!
//! ### `SourceMap`
//!
//! [SourceMap] keeps the supplied `mappings` string untouched until a change is requested,
//! so a source map passing through unmodified is written back without being decoded.
//!
//! ### `Mappings`
//!
//! [Mappings] is the decoded form: a sorted list of [Mapping] entries plus the number of
//! sources and names registered by every merged set.
//!
//! ### `Position`
//!
//! [Position] represents a 0-based line and 0-based column in a file.
//!
//! ### VLQ
//!
//! [decode_vlq] and [encode_vlq] expose the base64 VLQ codec used by the `mappings` field.
//!
//! ## Features
//!
//! - `serde`: derives `Serialize` and `Deserialize` for [Position], [OriginalLocation] and [Mapping].
//!

mod error;
mod finder;
mod mapping;
mod mappings;
mod sourcemap;
mod splitter;
mod vlq;

pub use error::*;
pub use finder::MappingFinder;
pub use mapping::*;
pub use mappings::Mappings;
pub use sourcemap::*;
pub use vlq::{decode_vlq, encode_vlq};
