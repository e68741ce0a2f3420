//! Parser for TablEdit's `.tef` tablature format.
//!
//! Decodes the v2 (ASCII-leading) and v3 (binary) dialects into an
//! in-memory [`file::ParsedFile`]. Heuristic components (instrument
//! detection, chord/section labels, the note stream) degrade to an empty
//! or partial result plus a [`file::Warning`] rather than failing the whole
//! parse; only a malformed header or a dereferenced pointer landing outside
//! the file is a hard [`error::TefError`].

pub mod component;
pub mod cursor;
pub mod error;
pub mod file;
pub mod header;
pub mod instrument;
pub mod reading_list;
pub mod strings;

pub use error::{Result, TefError};
pub use file::{parse, parse_file, ChordLabel, ParsedFile, SectionLabel, Warning};
pub use header::{Header, HeaderV2, HeaderV3};
pub use instrument::Instrument;
pub use component::{Articulation, Marker, NoteEvent};
pub use reading_list::ReadingListEntry;
