use cellpack_model::wire::{read_matrix, read_varint_u32, write_matrix, write_varint_u32};
use cellpack_model::CellMatrix;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn varint_vectors_lock_in_encoding() {
    let vectors: &[(u32, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7F]),
        (128, &[0x80, 0x01]),
        (16_383, &[0xFF, 0x7F]),
        (16_384, &[0x80, 0x80, 0x01]),
        (2_097_151, &[0xFF, 0xFF, 0x7F]),
        (268_435_455, &[0xFF, 0xFF, 0xFF, 0x7F]),
        (2_147_483_647, &[0xFF, 0xFF, 0xFF, 0xFF, 0x07]),
        (u32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
    ];

    for (value, expected) in vectors {
        let mut encoded = Vec::new();
        write_varint_u32(&mut encoded, *value).expect("encode varint");
        assert_eq!(encoded, *expected, "encoding mismatch for {value}");

        let mut cursor = &encoded[..];
        let decoded = read_varint_u32(&mut cursor)
            .expect("decode varint")
            .expect("some value");
        assert_eq!(decoded, *value, "round-trip mismatch for {value}");
        assert!(cursor.is_empty(), "undrained bytes for {value}");
    }
}

/// Build a structurally valid matrix out of an arbitrary choice stream:
/// choice 0 is the empty cell, other choices either reuse an existing
/// identifier or mint the next one, so first-seen ordering holds by
/// construction.
fn matrix_from_choices(columns: usize, choices: &[u16]) -> CellMatrix {
    let mut contents: Vec<Vec<u8>> = vec![Vec::new()];
    let mut cells = Vec::with_capacity(choices.len());
    for &choice in choices {
        if choice == 0 {
            cells.push(0);
            continue;
        }
        let pick = choice as usize % (contents.len() + 1);
        if pick == 0 || pick == contents.len() {
            let id = contents.len() as u32;
            contents.push(format!("value-{id}").into_bytes());
            cells.push(id);
        } else {
            cells.push(pick as u32);
        }
    }
    while cells.len() % columns != 0 {
        cells.push(0);
    }
    CellMatrix {
        columns,
        cells,
        contents,
        ..CellMatrix::empty()
    }
}

#[test]
fn empty_matrix_round_trips() {
    let mut encoded = Vec::new();
    write_matrix(&mut encoded, &CellMatrix::empty()).unwrap();
    let decoded = read_matrix(&mut &encoded[..]).unwrap();
    assert_eq!(decoded, CellMatrix::empty());
}

#[test]
fn small_matrix_round_trips_byte_identically() {
    let matrix = matrix_from_choices(3, &[1, 2, 3, 1, 0, 2]);
    matrix.check_consistency().unwrap();

    let mut encoded = Vec::new();
    write_matrix(&mut encoded, &matrix).unwrap();
    let decoded = read_matrix(&mut &encoded[..]).unwrap();
    assert_eq!(decoded, matrix);

    let mut re_encoded = Vec::new();
    write_matrix(&mut re_encoded, &decoded).unwrap();
    assert_eq!(re_encoded, encoded);
}

#[test]
fn wide_matrix_is_rejected_by_the_writer() {
    let matrix = CellMatrix {
        columns: u16::MAX as usize + 1,
        ..CellMatrix::empty()
    };
    let err = write_matrix(&mut Vec::new(), &matrix).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn varints_round_trip(value in any::<u32>()) {
        let mut encoded = Vec::new();
        write_varint_u32(&mut encoded, value).unwrap();
        prop_assert!(encoded.len() <= 5);

        let mut cursor = &encoded[..];
        let decoded = read_varint_u32(&mut cursor).unwrap().unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert!(cursor.is_empty());
    }

    #[test]
    fn matrices_round_trip_byte_identically(
        columns in 1usize..6,
        choices in proptest::collection::vec(any::<u16>(), 0..80)
    ) {
        let matrix = matrix_from_choices(columns, &choices);
        matrix.check_consistency().unwrap();

        let mut encoded = Vec::new();
        write_matrix(&mut encoded, &matrix).unwrap();
        let decoded = read_matrix(&mut &encoded[..]).unwrap();
        prop_assert_eq!(&decoded, &matrix);

        let mut re_encoded = Vec::new();
        write_matrix(&mut re_encoded, &decoded).unwrap();
        prop_assert_eq!(re_encoded, encoded);
    }
}
