use super::*;

#[test]
fn test_vlq_known_encodings() {
    let mut out = String::new();
    base64_vlq_encode(&mut out, 0);
    assert_eq!(out, "A");

    let mut out = String::new();
    base64_vlq_encode(&mut out, 1);
    assert_eq!(out, "C");

    let mut out = String::new();
    base64_vlq_encode(&mut out, -1);
    assert_eq!(out, "D");

    let mut out = String::new();
    base64_vlq_encode(&mut out, 16);
    assert_eq!(out, "gB");
}

#[test]
fn test_vlq_round_trip() {
    let cases: Vec<i64> = vec![
        0,
        1,
        -1,
        15,
        16,
        -16,
        123_456,
        -123_456,
        1 << 30,
        -(1 << 30),
    ];
    let mut encoded = String::new();
    for &v in &cases {
        base64_vlq_encode(&mut encoded, v);
    }
    assert_eq!(base64_vlq_decode(&encoded), cases);
}

#[test]
fn test_zig_zag_sign_bit() {
    // Bit 0 of the zig-zag value encodes the sign.
    let mut pos = String::new();
    base64_vlq_encode(&mut pos, 7);
    let mut neg = String::new();
    base64_vlq_encode(&mut neg, -7);
    let pos_digit = BASE64_CHARS.iter().position(|&c| c == pos.as_bytes()[0]).unwrap();
    let neg_digit = BASE64_CHARS.iter().position(|&c| c == neg.as_bytes()[0]).unwrap();
    assert_eq!(pos_digit & 1, 0);
    assert_eq!(neg_digit & 1, 1);
}

#[test]
fn test_span_dedup_same_emitted_position() {
    let mut map = SourceMapWriter::new("a.js", "");
    map.add_source("a.ts");
    map.record_span(1, 1, 1, 1);
    // Same emitted position, source moved forward: dropped.
    map.record_span(1, 1, 1, 5);
    let data = map.finish("a.js.map".into(), "a.js.map".into());
    assert_eq!(data.map.mappings, "AAAA");
}

#[test]
fn test_span_source_moving_backwards_replaces() {
    let mut map = SourceMapWriter::new("a.js", "");
    map.add_source("a.ts");
    map.record_span(1, 1, 2, 1);
    // Same emitted position, earlier source position wins.
    map.record_span(1, 1, 1, 1);
    let data = map.finish("a.js.map".into(), "a.js.map".into());
    assert_eq!(data.map.mappings, "AAAA");
}

#[test]
fn test_line_transitions_emit_semicolons() {
    let mut map = SourceMapWriter::new("a.js", "");
    map.add_source("a.ts");
    map.record_span(1, 1, 1, 1);
    map.record_span(3, 1, 2, 1);
    let data = map.finish("a.js.map".into(), "a.js.map".into());
    assert_eq!(data.map.mappings, "AAAA;;AACA");
}

#[test]
fn test_emitted_positions_strictly_increase() {
    let mut map = SourceMapWriter::new("a.js", "");
    map.add_source("a.ts");
    map.record_span(1, 1, 1, 1);
    map.record_span(1, 5, 1, 3);
    map.record_span(2, 1, 2, 1);
    map.record_span(2, 9, 2, 5);
    let data = map.finish("a.js.map".into(), "a.js.map".into());

    // Decode and verify monotonicity of (line, column).
    let mut line = 0u32;
    let mut positions = Vec::new();
    for (line_offset, segment_line) in data.map.mappings.split(';').enumerate() {
        line = line_offset as u32;
        let mut column: i64 = 0;
        for segment in segment_line.split(',') {
            if segment.is_empty() {
                continue;
            }
            let fields = base64_vlq_decode(segment);
            column += fields[0];
            positions.push((line, column));
        }
    }
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(positions, sorted);
}

#[test]
fn test_source_index_delta_across_files() {
    let mut map = SourceMapWriter::new("bundle.js", "");
    map.add_source("a.ts");
    map.record_span(1, 1, 1, 1);
    map.add_source("b.ts");
    map.record_span(2, 1, 1, 1);
    let data = map.finish("bundle.js.map".into(), "bundle.js.map".into());
    assert_eq!(data.map.sources, vec!["a.ts", "b.ts"]);
    // Second segment's second field is the source index delta (+1).
    assert_eq!(data.map.mappings, "AAAA;ACAA");
}

#[test]
fn test_scope_names_are_interned_once() {
    let mut map = SourceMapWriter::new("a.js", "");
    map.add_source("a.ts");
    map.push_scope("f");
    map.record_span(1, 1, 1, 1);
    map.pop_scope();
    map.push_scope("f");
    map.record_span(2, 1, 2, 1);
    map.pop_scope();
    let data = map.finish("a.js.map".into(), "a.js.map".into());
    assert_eq!(data.map.names, vec!["f"]);
    // Both segments carry a name index (5 fields each).
    for part in data.map.mappings.split(';') {
        assert_eq!(base64_vlq_decode(part).len(), 5);
    }
}

#[test]
fn test_map_json_shape() {
    let mut map = SourceMapWriter::new("out/a.js", "src/");
    map.add_source("a.ts");
    map.record_span(1, 1, 1, 1);
    let data = map.finish("out/a.js.map".into(), "a.js.map".into());
    let json = serde_json::to_value(&data.map).unwrap();
    assert_eq!(json["version"], 3);
    assert_eq!(json["file"], "a.js");
    assert_eq!(json["sourceRoot"], "src/");
    assert_eq!(json["sources"][0], "a.ts");
    assert_eq!(json["mappings"], "AAAA");
}
