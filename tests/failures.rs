//! Malformed and unsupported input.
//!
//! Every failure must abort the parse with an error naming what went wrong and where.

use std::path::PathBuf;

use udlg::prelude::*;

fn sample(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name);
    std::fs::read(path).unwrap()
}

fn header() -> Vec<u8> {
    let mut bytes = vec![0x00];
    for value in [1i32, -1, 1, 0] {
        bytes.extend(value.to_le_bytes());
    }
    bytes
}

#[test]
fn every_truncation_fails() {
    let data = sample("dialog.dat");
    for len in 0..data.len() {
        assert!(
            Document::parse(&data[..len]).is_err(),
            "prefix of {len} bytes parsed"
        );
    }
}

#[test]
fn not_a_stream() {
    assert!(matches!(Document::parse(&[]), Err(Error::Empty)));
    assert!(matches!(
        Document::parse(b"UDLG"),
        Err(Error::NotBinaryStream { found: b'U' })
    ));
}

#[test]
fn unknown_record_type() {
    let mut data = header();
    data.push(0x14);

    assert!(matches!(
        Document::parse(&data),
        Err(Error::UnknownRecordType {
            tag: 0x14,
            offset: 17
        })
    ));
}

#[test]
fn unsupported_record_type() {
    let mut data = header();
    data.extend([0x04, 0x01, 0x00, 0x00, 0x00]);

    assert!(matches!(
        Document::parse(&data),
        Err(Error::UnsupportedVariant {
            record_type: RecordType::SystemClassWithMembersAndTypes,
            offset: 17
        })
    ));
}

#[test]
fn unsupported_primitive() {
    // ArraySinglePrimitive of Decimal
    let mut data = header();
    data.push(0x0F);
    data.extend(1i32.to_le_bytes());
    data.extend(1i32.to_le_bytes());
    data.push(0x05);
    data.push(0x0B);

    assert!(matches!(
        Document::parse(&data),
        Err(Error::UnsupportedPrimitive {
            primitive_type: PrimitiveType::Decimal,
            offset: 27
        })
    ));
}

#[test]
fn invalid_primitive_type_byte() {
    let mut data = header();
    data.push(0x0F);
    data.extend(1i32.to_le_bytes());
    data.extend(1i32.to_le_bytes());
    data.push(0x04);
    data.push(0x0B);

    let Err(Error::Malformed { message, .. }) = Document::parse(&data) else {
        panic!("expected a malformed type byte");
    };
    assert!(message.contains("at offset 26"), "{message}");
}

#[test]
fn malformed_string_length() {
    let mut data = header();
    data.push(0x06);
    data.extend(1i32.to_le_bytes());
    data.extend([0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);

    assert!(matches!(
        Document::parse(&data),
        Err(Error::MalformedVarint { offset: 22 })
    ));
}

#[test]
fn dangling_reference_in_strict_mode() {
    let mut data = header();
    data.push(0x09);
    data.extend(42i32.to_le_bytes());
    data.push(0x0B);

    assert!(Document::parse(&data).is_ok());
    assert!(matches!(
        Document::parse_with_config(&data, ParserConfig::strict()),
        Err(Error::UnresolvedReference { object_id: 42 })
    ));
}

#[test]
fn deep_nesting() {
    // Class "N" { Next: Object } whose value nests further instances of itself
    let mut data = header();
    data.push(0x05);
    data.extend(1i32.to_le_bytes());
    data.extend([1, b'N']);
    data.extend(1u32.to_le_bytes());
    data.extend([4, b'N', b'e', b'x', b't']);
    data.push(0x02);
    data.extend(0i32.to_le_bytes());
    for id in 2..200i32 {
        data.push(0x01);
        data.extend(id.to_le_bytes());
        data.extend(1i32.to_le_bytes());
    }
    data.push(0x0A);
    data.push(0x0B);

    assert!(matches!(
        Document::parse(&data),
        Err(Error::RecursionLimit(64))
    ));
    let document = Document::parse_with_config(&data, ParserConfig::lenient()).unwrap();
    assert_eq!(document.to_bytes().unwrap(), data);
}

#[test]
fn truncated_envelope() {
    let data = sample("dialog.udlg");
    assert!(matches!(
        Udlg::parse(&data[..0x20]),
        Err(Error::UnexpectedEof { .. })
    ));
    assert!(Udlg::parse(&data[..data.len() - 5]).is_err());
    // Dropping only the trailer leaves a valid file
    assert!(Udlg::parse(&data[..data.len() - 4]).is_ok());
}

#[test]
fn envelope_errors_report_file_offsets() {
    let mut data = sample("dialog.udlg");
    let start = Udlg::document_offset(&data).unwrap();
    assert_eq!(start, 88);

    // First record after the stream header
    data[start + 17] = 0x14;
    assert!(matches!(
        Udlg::parse(&data),
        Err(Error::UnknownRecordType {
            tag: 0x14,
            offset: 105
        })
    ));
}
