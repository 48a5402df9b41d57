//! Builders for crafted streams used across unit tests.

/// Length-prefixed string with a single byte length.
pub fn lps(value: &str) -> Vec<u8> {
    assert!(value.len() < 0x80, "use Writer for long strings");
    let mut bytes = vec![value.len() as u8];
    bytes.extend_from_slice(value.as_bytes());
    bytes
}

/// A `BinaryObjectString` record.
pub fn string_record(object_id: i32, value: &str) -> Vec<u8> {
    let mut bytes = vec![0x06];
    bytes.extend(object_id.to_le_bytes());
    bytes.extend(lps(value));
    bytes
}

/// A `MemberReference` record.
pub fn reference_record(id_ref: i32) -> Vec<u8> {
    let mut bytes = vec![0x09];
    bytes.extend(id_ref.to_le_bytes());
    bytes
}

/// A complete stream: header with root id 1, the given records and `MessageEnd`.
pub fn stream(records: &[&[u8]]) -> Vec<u8> {
    let mut bytes = vec![0x00];
    for value in [1i32, -1, 1, 0] {
        bytes.extend(value.to_le_bytes());
    }
    for record in records {
        bytes.extend_from_slice(record);
    }
    bytes.push(0x0B);
    bytes
}
