//! Synthetic database images for tests.
//!
//! Builds the smallest structurally valid city-style database: a one-node
//! search tree whose records both point at "no data", an empty data
//! section, and a complete metadata map. Every lookup against it is a miss,
//! which is exactly what the empty-result tests need.

/// Build epoch stamped into the synthetic database metadata.
pub const TEST_BUILD_EPOCH: u64 = 1_700_000_000;

const METADATA_MARKER: &[u8] = b"\xab\xcd\xefMaxMind.com";

fn push_string(buf: &mut Vec<u8>, s: &str) {
    assert!(s.len() < 29, "short-form string only");
    buf.push(0b010_00000 | s.len() as u8);
    buf.extend_from_slice(s.as_bytes());
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    let bytes: Vec<u8> = value.to_be_bytes().iter().copied().skip_while(|b| *b == 0).collect();
    buf.push(0b101_00000 | bytes.len() as u8);
    buf.extend_from_slice(&bytes);
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    let bytes: Vec<u8> = value.to_be_bytes().iter().copied().skip_while(|b| *b == 0).collect();
    buf.push(0b110_00000 | bytes.len() as u8);
    buf.extend_from_slice(&bytes);
}

fn push_u64(buf: &mut Vec<u8>, value: u64) {
    let bytes: Vec<u8> = value.to_be_bytes().iter().copied().skip_while(|b| *b == 0).collect();
    // Extended type: control byte carries the size, next byte the type (9 - 7)
    buf.push(bytes.len() as u8);
    buf.push(2);
    buf.extend_from_slice(&bytes);
}

/// Returns the bytes of a valid database containing no records.
pub fn empty_database_bytes() -> Vec<u8> {
    let mut buf = Vec::new();

    // Search tree: one node, record size 24. Both records hold the node
    // count, which the reader treats as "address not found".
    buf.extend_from_slice(&[0, 0, 1, 0, 0, 1]);

    // Data section separator.
    buf.extend_from_slice(&[0u8; 16]);

    // Data section: empty.

    // Metadata: marker followed by a map with the nine required fields.
    buf.extend_from_slice(METADATA_MARKER);
    buf.push(0b111_00000 | 9); // map, nine entries

    push_string(&mut buf, "binary_format_major_version");
    push_u16(&mut buf, 2);

    push_string(&mut buf, "binary_format_minor_version");
    push_u16(&mut buf, 0);

    push_string(&mut buf, "build_epoch");
    push_u64(&mut buf, TEST_BUILD_EPOCH);

    push_string(&mut buf, "database_type");
    push_string(&mut buf, "Test-City");

    push_string(&mut buf, "description");
    buf.push(0b111_00000); // empty map

    push_string(&mut buf, "ip_version");
    push_u16(&mut buf, 6);

    push_string(&mut buf, "languages");
    buf.push(0); // extended type: zero-length...
    buf.push(4); // ...array

    push_string(&mut buf, "node_count");
    push_u32(&mut buf, 1);

    push_string(&mut buf, "record_size");
    push_u16(&mut buf, 24);

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database_parses() {
        let reader = maxminddb::Reader::from_source(empty_database_bytes())
            .expect("synthetic database must parse");
        assert_eq!(reader.metadata.node_count, 1);
        assert_eq!(reader.metadata.record_size, 24);
        assert_eq!(reader.metadata.build_epoch, TEST_BUILD_EPOCH);
        assert_eq!(reader.metadata.ip_version, 6);
    }
}
