use splicemap::{decode_vlq, encode_vlq, Mapping, Mappings, SourceMap};

const BASE: &str = "AAAA,CAAC,EAAEA;GCAC";
const OTHER: &str = ";IAAI,KCAC;CACAA";

#[test]
fn test_unmodified_is_byte_identical() {
    for input in ["", "AAAA", "AAAAgA;;", ";;;;", "AAAA,,"] {
        let sm = SourceMap::new(input, 1, 1);
        assert_eq!(sm.to_vec().unwrap(), input.as_bytes());
    }
}

#[test]
fn test_merge_offsets_and_renumbers() {
    let mut sm = SourceMap::new(BASE, 2, 1);
    sm.add_mappings(OTHER, 2, 1, (5, 0)).unwrap();

    let merged = sm.decoded().unwrap();
    let other = Mappings::parse(OTHER, 2, 1).unwrap();
    assert_eq!(merged.len(), 4 + other.len());

    for (before, after) in other.iter().zip(&merged[4..]) {
        assert!(after.generated().line >= 5);
        assert_eq!(after.generated().line, before.generated().line + 5);
        assert_eq!(after.generated().column, before.generated().column);
        assert_eq!(after.source(), before.source().map(|s| s + 2));
        assert_eq!(after.name(), before.name().map(|n| n + 1));
    }
    assert_eq!(merged.validate(), Ok(()));

    insta::assert_snapshot!(sm.to_string().unwrap(), @"AAAA,CAAC,EAAEA;GCAC;;;;;ICAA,KCAC;CACAC");
}

#[test]
fn test_merge_example() {
    let mut sm = SourceMap::new("AAAA", 1, 0);
    sm.add_mappings("CAAA", 1, 0, (1, 0)).unwrap();
    assert_eq!(
        &sm.decoded().unwrap()[..],
        &[
            Mapping::new(0, 0).with_source(0, 0, 0),
            Mapping::new(1, 1).with_source(1, 0, 0),
        ]
    );
}

#[test]
fn test_non_canonical_input_is_equivalent_after_reencoding() {
    let mappings = Mappings::parse("AAAAgA;;", 1, 1).unwrap();
    let encoded = mappings.to_string().unwrap();
    assert_eq!(encoded, "AAAAA");
    assert_eq!(Mappings::parse(&encoded, 1, 1).unwrap(), mappings);
}

#[test]
fn test_reencoding_is_idempotent() {
    let mut sm = SourceMap::new(BASE, 2, 1);
    sm.add_mappings(OTHER, 2, 1, (5, 3)).unwrap();

    let first = sm.to_string().unwrap();
    let once = Mappings::parse(&first, 4, 2).unwrap();
    let second = once.to_string().unwrap();
    let twice = Mappings::parse(&second, 4, 2).unwrap();
    assert_eq!(first, second);
    assert_eq!(once, twice);
    assert_eq!(&once[..], &sm.decoded().unwrap()[..]);
}

#[test]
fn test_vlq_roundtrip() {
    let mut buf = Vec::new();
    let values = [0i64, 5, -5, 1023, -1024, i32::MAX as i64, i32::MIN as i64];
    for value in values {
        encode_vlq(value, &mut buf).unwrap();
    }
    let mut pos = 0;
    for value in values {
        let (decoded, next) = decode_vlq(&buf, pos).unwrap();
        assert_eq!(decoded, value);
        pos = next;
    }
    assert_eq!(pos, buf.len());
}

#[test]
fn test_finder_on_merged_map() {
    let mut sm = SourceMap::new(BASE, 2, 1);
    sm.add_mappings(OTHER, 2, 1, (5, 0)).unwrap();
    let mappings = sm.into_mappings().unwrap();

    let finder = mappings.finder();
    assert_eq!(finder.find_mapping((0, 2)), Some(mappings[1]));
    assert_eq!(finder.find_mapping((3, 0)), Some(mappings[3]));
    assert_eq!(finder.find_mapping((6, 5)), Some(mappings[4]));
    assert_eq!(finder.find_mapping((6, 100)), Some(mappings[5]));
    assert_eq!(finder.find_mapping((0, 0)), Some(mappings[0]));
}

#[cfg(feature = "serde")]
#[test]
fn test_serde() {
    let mapping = Mapping::new(1, 2).with_source(0, 3, 4).with_name(5);
    let json = serde_json::to_string(&mapping).unwrap();
    insta::assert_snapshot!(json, @r###"{"generated":{"line":1,"column":2},"original":{"source":0,"line":3,"column":4,"name":5}}"###);
    assert_eq!(serde_json::from_str::<Mapping>(&json).unwrap(), mapping);
}
