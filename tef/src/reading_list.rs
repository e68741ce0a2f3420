//! Reading-list decoder: the optional measure-range playback table pointed
//! to by the header's reading-list slot. Parsing only — expansion into an
//! unfolded playback order is a consumer concern (out of scope).

use crate::cursor::Cursor;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ReadingListEntry {
    pub index: u16,
    pub from_measure: u16,
    pub to_measure: u16,
    pub file_offset: u32,
}

const MAX_ENTRY_COUNT: u16 = 100;
const MIN_ENTRY_SIZE: u16 = 4;
const MAX_ENTRY_SIZE: u16 = 256;

/// `offset` is the header's reading-list pointer (0 = absent). Returns an
/// empty list for an absent pointer or any failed sanity check — this is a
/// heuristic region, never a hard error.
pub fn decode(data: &[u8], offset: u32) -> Vec<ReadingListEntry> {
    let mut entries = Vec::new();
    if offset == 0 || data.len() < 4 || offset as usize >= data.len() - 4 {
        return entries;
    }

    let c = Cursor::new(data);
    let offset = offset as usize;

    let entry_size = match c.read_u16_le(offset) {
        Ok(v) if (MIN_ENTRY_SIZE..=MAX_ENTRY_SIZE).contains(&v) => v,
        _ => return entries,
    };
    let entry_count = match c.read_u16_le(offset + 2) {
        Ok(v) if v <= MAX_ENTRY_COUNT => v,
        _ => return entries,
    };

    let data_start = offset + 4;
    for i in 0..entry_count {
        let entry_offset = data_start + i as usize * entry_size as usize;
        let (from_measure, to_measure) = match (
            c.read_u16_le(entry_offset),
            c.read_u16_le(entry_offset + 2),
        ) {
            (Ok(f), Ok(t)) => (f, t),
            _ => break,
        };
        if from_measure == 0 && to_measure == 0 {
            continue;
        }
        entries.push(ReadingListEntry {
            index: i + 1,
            from_measure,
            to_measure,
            file_offset: entry_offset as u32,
        });
    }

    entries
}
