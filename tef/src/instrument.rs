//! Instrument table decoder: locates instrument records by their name
//! anchor and extracts tuning bytes + string count.
//!
//! The name-plus-backward-scan heuristic is load-bearing (it's the only
//! way this format signals instrument boundaries) and is preserved exactly
//! as `original_source/src/tef_parser/reader.py:parse_instruments`
//! implements it. The name table itself is data-driven per spec.md §9's
//! redesign note, rather than hard-coded into the scan logic.

use crate::file::Warning;

/// `(name bytes, default string count)`. Data-driven so new instruments can
/// be added without touching the scan logic itself.
pub const KNOWN_NAMES: &[(&[u8], u8)] = &[
    (b"Mandolin", 4),
    (b"mandolin", 4),
    (b"Banjo open G", 5),
    (b"banjo open G", 5),
    (b"Banjo", 5),
    (b"banjo", 5),
    (b"Guitar Standard", 6),
    (b"guitar standard", 6),
    (b"Guitar", 6),
    (b"guitar", 6),
    (b"Bass", 4),
    (b"bass", 4),
    (b"Ukulele", 4),
    (b"ukulele", 4),
];

const MIN_SEPARATION: usize = 50;
const TUNING_BYTE_MIN: u8 = 0x10;
const TUNING_BYTE_MAX: u8 = 0x60;
const TUNING_NAME_SCAN_WINDOW: usize = 20;

#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Instrument {
    pub name: String,
    pub tuning_name: String,
    pub num_strings: u8,
    pub tuning: Vec<u8>,
    pub file_offset: u32,
}

/// Scan `data` for every known instrument-name anchor, validating each
/// occurrence per spec.md §4.D. Rejected occurrences are reported as
/// warnings, never errors — the heuristic is expected to see stray
/// name-like text in real-world files. Result is sorted by ascending
/// file offset; this order is load-bearing for cumulative-string mapping
/// in the component decoder.
pub fn find_instruments(data: &[u8], warnings: &mut Vec<Warning>) -> Vec<Instrument> {
    let mut found_offsets: Vec<usize> = Vec::new();
    let mut instruments = Vec::new();

    for &(name, default_strings) in KNOWN_NAMES {
        let mut idx = 0usize;
        while let Some(pos) = find_from(data, name, idx) {
            idx = pos + 1;

            if found_offsets.iter().any(|&off| off.abs_diff(pos) < MIN_SEPARATION) {
                continue;
            }

            match validate_occurrence(data, pos, name, default_strings) {
                Some(inst) => {
                    found_offsets.push(pos);
                    instruments.push(inst);
                }
                None => {
                    warnings.push(Warning::InstrumentRejected {
                        name: String::from_utf8_lossy(name).into_owned(),
                        offset: pos as u32,
                    });
                }
            }
        }
    }

    instruments.sort_by_key(|i| i.file_offset);
    instruments
}

fn find_from(data: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if start >= data.len() || needle.is_empty() {
        return None;
    }
    data[start..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + start)
}

fn validate_occurrence(data: &[u8], idx: usize, name: &[u8], default_strings: u8) -> Option<Instrument> {
    let name_end = idx + name.len();
    if name_end >= data.len() || data[name_end] != 0 {
        return None;
    }

    let tuning_name_start = name_end + 1;
    let mut tuning_name_end = tuning_name_start;
    while tuning_name_end < data.len() && tuning_name_end < tuning_name_start + TUNING_NAME_SCAN_WINDOW {
        if data[tuning_name_end] == 0 {
            break;
        }
        tuning_name_end += 1;
    }
    let tuning_name = if tuning_name_end > tuning_name_start {
        let raw = &data[tuning_name_start..tuning_name_end];
        if !raw.iter().all(|&b| (0x20..=0x7E).contains(&b)) {
            return None;
        }
        let s: String = raw.iter().map(|&b| b as char).collect();
        if s.len() > TUNING_NAME_SCAN_WINDOW || s.matches(' ').count() > 2 {
            return None;
        }
        s
    } else {
        String::new()
    };

    let num_strings = default_strings;
    let tuning = extract_tuning_backward(data, idx, num_strings);

    Some(Instrument {
        name: String::from_utf8_lossy(name).into_owned(),
        tuning_name,
        num_strings,
        tuning,
        file_offset: idx as u32,
    })
}

/// Walk backward from the name anchor through NUL padding, past an optional
/// velocity field (a run of >= 4 identical non-zero bytes), to locate
/// `num_strings` tuning bytes. Returns an empty vec if the bytes found
/// don't validate — absence is tolerated, not an error.
fn extract_tuning_backward(data: &[u8], name_idx: usize, num_strings: u8) -> Vec<u8> {
    if name_idx == 0 {
        return Vec::new();
    }
    let mut pos = name_idx - 1;

    while pos > 0 && data[pos] == 0 {
        pos -= 1;
    }

    if pos >= 3 {
        let uniform_val = data[pos];
        if uniform_val != 0 {
            let mut uniform_count = 0usize;
            let mut check_pos = pos;
            while check_pos > 0 && data[check_pos] == uniform_val {
                uniform_count += 1;
                check_pos -= 1;
            }
            if uniform_count >= 4 {
                pos = pos.saturating_sub(uniform_count);
            }
        }
    }

    // Only the 3 positions strictly above `stop` are inspected (pos, pos-1,
    // pos-2) — matching the original's `range(pos, max(pos-3, 0), -1)`, which
    // is exclusive of its stop bound.
    let mut null_pos = None;
    let stop = pos.saturating_sub(3);
    let mut check = pos;
    while check > stop {
        if data[check] == 0 {
            null_pos = Some(check);
            break;
        }
        check -= 1;
    }

    let tuning_end = null_pos.unwrap_or(pos + 1);
    let n = num_strings as usize;
    if tuning_end < n {
        return Vec::new();
    }
    let tuning_start = tuning_end - n;
    let tuning_bytes = &data[tuning_start..tuning_end];

    if tuning_bytes.iter().all(|&b| (TUNING_BYTE_MIN..=TUNING_BYTE_MAX).contains(&b)) {
        tuning_bytes.iter().map(|&b| 96 - b).collect()
    } else {
        Vec::new()
    }
}
