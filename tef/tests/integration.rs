//! End-to-end parses against synthetic in-memory `.tef` fixtures. No real
//! TablEdit binaries are checked into this repo, so each fixture is built
//! byte-by-byte from the same field layout the unit tests exercise
//! piecewise.

fn v3_fixture() -> Vec<u8> {
    let mut data = vec![0u8; 0x200];
    data[0] = 0x10;
    data[1] = 0x00;
    data[2] = 0x05; // minor
    data[3] = 0x03; // major

    let debt_at = 0x20;
    data[debt_at..debt_at + 4].copy_from_slice(b"debt");
    let component_offset = 0x200u32;
    data[debt_at + 4..debt_at + 8].copy_from_slice(&component_offset.to_le_bytes());

    // Title, length-prefixed.
    let title_at = 0x50;
    let title = b"Shuckin' The Corn";
    data[title_at..title_at + 2].copy_from_slice(&((title.len() + 1) as u16).to_le_bytes());
    data[title_at + 2..title_at + 2 + title.len()].copy_from_slice(title);

    // Section marker, length-prefixed.
    let section_at = 0x70;
    let section = b"(A Part)";
    data[section_at..section_at + 2].copy_from_slice(&((section.len() + 1) as u16).to_le_bytes());
    data[section_at + 2..section_at + 2 + section.len()].copy_from_slice(section);

    // Bass instrument record: 4 tuning bytes, name, tuning name.
    let bass_at = 0x90;
    let tuning: Vec<u8> = [55i16, 50, 45, 40].iter().map(|&p| (96 - p) as u8).collect();
    data[bass_at..bass_at + 4].copy_from_slice(&tuning);
    data[bass_at + 4..bass_at + 8].copy_from_slice(b"Bass");
    data[bass_at + 8] = 0;
    data[bass_at + 9..bass_at + 17].copy_from_slice(b"Standard");
    data[bass_at + 17] = 0;

    // One note record: string 0 of track 0, fret 2, initial marker.
    let value_per_position = 32 * 4u32;
    let location = 0u32; // cumulative_string 0, tick 0
    let mut rec = [0u8; 12];
    rec[0..4].copy_from_slice(&location.to_le_bytes());
    rec[4] = 0x03; // fret_raw = 3 -> fret = 2
    rec[5] = 0x49; // 'I' initial marker
    data.extend_from_slice(&rec);
    let _ = value_per_position;

    data
}

#[test]
fn parses_v3_fixture_end_to_end() {
    let data = v3_fixture();
    let parsed = tef::parse(&data).expect("well-formed synthetic v3 fixture");

    assert!(!parsed.header.is_v2());
    assert_eq!(parsed.header.version(), "3.05");
    assert_eq!(parsed.title, "Shuckin' The Corn");

    assert_eq!(parsed.instruments.len(), 1);
    assert_eq!(parsed.instruments[0].name, "Bass");
    assert_eq!(parsed.instruments[0].tuning, vec![55, 50, 45, 40]);

    assert_eq!(parsed.sections.len(), 1);
    assert_eq!(parsed.sections[0].name, "(A Part)");

    assert_eq!(parsed.note_events.len(), 1);
    let note = &parsed.note_events[0];
    assert_eq!(note.fret, 2);
    assert_eq!(note.track, 0);
    assert_eq!(note.string, 1);
    assert!(note.is_melody());

    assert!(parsed.reading_list.is_empty());
    assert!(parsed.warnings.is_empty());
}

fn v2_fixture() -> Vec<u8> {
    let mut data = vec![0u8; 264];
    data[0..24].copy_from_slice(b"Foggy Mountain Breakdown");
    data[200..202].copy_from_slice(&32u16.to_le_bytes()); // measures
    data[202] = 4; // time_num
    data[204] = 4; // time_denom
    data[220..222].copy_from_slice(&180u16.to_le_bytes()); // tempo
    data[240] = 4; // total_strings
    data[241] = 0; // track_count - 1
    data[256..258].copy_from_slice(&1u16.to_le_bytes()); // component_count

    // Component records start at the fixed v2 offset 258.
    let rec: [u8; 6] = [0, 0, 0x02, 0, 0, 0]; // location 0, fret_raw=2 -> fret=1
    data[258..264].copy_from_slice(&rec);
    data
}

#[test]
fn parses_v2_fixture_end_to_end() {
    let data = v2_fixture();
    let parsed = tef::parse(&data).expect("well-formed synthetic v2 fixture");

    assert!(parsed.header.is_v2());
    assert_eq!(parsed.title, "Foggy Mountain Breakdown");
    assert_eq!(parsed.note_events.len(), 1);
    assert_eq!(parsed.note_events[0].fret, 1);
    assert_eq!(parsed.note_events[0].measure, 1);
}

#[test]
fn truncated_file_is_a_hard_error() {
    let err = tef::parse(&[]).unwrap_err();
    assert!(matches!(err, tef::TefError::Truncated { .. }));
}

#[test]
fn serializes_to_json() {
    let data = v3_fixture();
    let parsed = tef::parse(&data).unwrap();
    let json = serde_json::to_string(&parsed).expect("ParsedFile serializes");
    assert!(json.contains("Bass"));
}
