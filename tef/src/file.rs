//! The `ParsedFile` aggregate and non-fatal warnings sibling list.
//!
//! Modeled on `ubv::reader::UbvFile` — the teacher's top-level parse
//! result — and the file-vs-memory entry-point split in
//! `ubv::reader::open_ubv`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::component::{self, NoteEvent};
use crate::error::{Result, TefError};
use crate::header::{self, Header};
use crate::instrument::{self, Instrument};
use crate::reading_list::{self, ReadingListEntry};
use crate::strings::find_strings;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ChordLabel {
    pub name: String,
    pub file_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SectionLabel {
    pub name: String,
    pub file_offset: u32,
}

/// Non-fatal outcomes from the heuristic components (§7: these degrade
/// gracefully — empty or partial subsets — and never raise).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[non_exhaustive]
pub enum Warning {
    InstrumentRejected { name: String, offset: u32 },
    NoteStreamEndedOnInvalidMarkerRun { at_offset: u32 },
}

#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ParsedFile {
    pub path: Option<PathBuf>,
    pub header: Header,
    pub title: String,
    pub instruments: Vec<Instrument>,
    pub chords: Vec<ChordLabel>,
    pub sections: Vec<SectionLabel>,
    pub note_events: Vec<NoteEvent>,
    pub reading_list: Vec<ReadingListEntry>,
    pub warnings: Vec<Warning>,
}

impl ParsedFile {
    /// Notes matching spec.md §6's melody filter:
    /// `1 ≤ local_string ≤ 15 && 0 ≤ fret ≤ 24`.
    pub fn melody_notes(&self) -> impl Iterator<Item = &NoteEvent> {
        self.note_events.iter().filter(|e| e.is_melody())
    }

    /// Per-track string counts in the instrument table's file order — the
    /// order the component decoder used to attribute cumulative strings.
    pub fn track_string_counts(&self) -> Vec<u8> {
        self.instruments.iter().map(|i| i.num_strings).collect()
    }
}

/// Parse TEF bytes already in memory.
pub fn parse(data: &[u8]) -> Result<ParsedFile> {
    let header = header::decode_header(data)?;
    let mut warnings = Vec::new();
    let instruments = instrument::find_instruments(data, &mut warnings);
    let track_string_counts: Vec<u8> = instruments.iter().map(|i| i.num_strings).collect();

    let (title, strings, note_events, reading_list) = match &header {
        Header::V3(h) => {
            let strings = find_strings(data);
            let title = pick_title(&strings);
            let sections = find_sections(&strings);
            let chords = find_chords(&strings);
            let note_events = component::decode_v3(data, h, &track_string_counts, &mut warnings);
            let reading_list = reading_list::decode(data, h.reading_list_offset);
            (title, (sections, chords), note_events, reading_list)
        }
        Header::V2(h) => {
            let note_events = component::decode_v2(data, h, &track_string_counts);
            (h.title.clone(), (Vec::new(), Vec::new()), note_events, Vec::new())
        }
    };

    let (sections, chords) = strings;

    Ok(ParsedFile {
        path: None,
        header,
        title,
        instruments,
        chords,
        sections,
        note_events,
        reading_list,
        warnings,
    })
}

/// Read `path` once and parse it.
pub fn parse_file(path: &Path) -> Result<ParsedFile> {
    let data = fs::read(path).map_err(TefError::Io)?;
    let mut parsed = parse(&data)?;
    parsed.path = Some(path.to_path_buf());
    Ok(parsed)
}

fn pick_title(strings: &[crate::strings::Str]) -> String {
    let mut title = String::new();
    for s in strings {
        if s.offset < 0x200 && s.value.len() > title.len() && !s.value.contains("Part") && !s.value.starts_with('(') {
            title = s.value.clone();
        }
    }
    title
}

fn find_sections(strings: &[crate::strings::Str]) -> Vec<SectionLabel> {
    strings
        .iter()
        .filter(|s| s.value.contains("Part") || (s.value.starts_with('(') && s.value.ends_with(')')))
        .map(|s| SectionLabel {
            name: s.value.clone(),
            file_offset: s.offset as u32,
        })
        .collect()
}

const CHORD_ROOTS: &[char] = &['C', 'D', 'E', 'F', 'G', 'A', 'B'];
const CHORD_SUFFIXES: &[&str] = &["m", "7", "maj", "min", "dim", "aug", "#", "b", "sus"];

fn find_chords(strings: &[crate::strings::Str]) -> Vec<ChordLabel> {
    strings
        .iter()
        .filter(|s| {
            let Some(root) = s.value.chars().next() else {
                return false;
            };
            if !CHORD_ROOTS.contains(&root) || s.value.len() > 10 || s.value.contains(' ') {
                return false;
            }
            s.value.len() == 1 || CHORD_SUFFIXES.iter().any(|suf| s.value[1..].starts_with(suf))
        })
        .map(|s| ChordLabel {
            name: s.value.clone(),
            file_offset: s.offset as u32,
        })
        .collect()
}
