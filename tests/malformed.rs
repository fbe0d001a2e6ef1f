//! Corrupt input, authoring errors and resource limits.

mod common;

use std::sync::Arc;

use common::*;
use graphpack::prelude::*;
use graphpack::Kind;

fn raw_codec() -> Codec {
    init_tracing();
    Codec::with_options(registry(), CodecOptions::new().with_size_prefix(false))
}

/// Offset of the first child of an encoded `game.Stockpile` root.
const FIRST_CHILD: usize = 5 + 4 + "game.Stockpile".len() + 4;

#[test]
fn test_unknown_kind_byte() {
    let codec = raw_codec();
    let mut bytes = codec.encode_root(&stockpile()).expect("encode");
    assert_eq!(bytes[FIRST_CHILD], Kind::Int.as_u8());
    bytes[FIRST_CHILD] = 0x42;

    let err = codec.decode_root(&bytes).unwrap_err();
    assert!(
        matches!(err, Error::UnknownKind { kind: 0x42, offset: FIRST_CHILD }),
        "{err}"
    );
}

#[test]
fn test_inner_len_past_buffer() {
    let codec = raw_codec();
    let mut bytes = codec.encode_root(&stockpile()).expect("encode");
    let at = FIRST_CHILD - 4;
    bytes[at..FIRST_CHILD].copy_from_slice(&10_000i32.to_le_bytes());

    let err = codec.decode_root(&bytes).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}

#[test]
fn test_negative_length() {
    let codec = raw_codec();
    let mut bytes = codec.encode_root(&stockpile()).expect("encode");
    bytes[5..9].copy_from_slice(&(-1i32).to_le_bytes());

    let err = codec.decode_root(&bytes).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}

#[test]
fn test_truncated_buffers() {
    let codec = codec();
    let bytes = codec.encode_root(&chunk()).expect("encode");
    for cut in [0, 3, 4, 9, bytes.len() / 2, bytes.len() - 1] {
        assert!(
            codec.decode_root(&bytes[..cut]).is_err(),
            "decoding {cut} of {} bytes should fail",
            bytes.len()
        );
    }
}

#[test]
fn test_size_prefix_mismatch() {
    let codec = codec();
    let mut bytes = codec.encode_root(&stockpile()).expect("encode");
    bytes.extend_from_slice(&[0, 0]);

    let err = codec.decode_root(&bytes).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}

#[test]
fn test_trailing_bytes_after_value() {
    let codec = raw_codec();
    let mut bytes = codec.encode_root(&stockpile()).expect("encode");
    bytes.push(Kind::Bool.as_u8());

    let err = codec.decode_root(&bytes).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}

#[test]
fn test_mismatched_end_marker() {
    let codec = raw_codec();
    let mut bytes = codec.encode_root(&stockpile()).expect("encode");
    let end = bytes.len() - 5;
    assert_eq!(bytes[end], Kind::ClassEnd.as_u8());
    bytes[end] = Kind::ListEnd.as_u8();

    let err = codec.decode_root(&bytes).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}

#[test]
fn test_unmarked_type_fails_to_encode() {
    #[derive(Default)]
    struct Scratch {
        _cache: Vec<u8>,
    }

    persist! {
        Scratch = "game.Scratch" {}
    }

    let err = codec().encode_root(&Scratch::default()).unwrap_err();
    assert!(matches!(err, Error::NoFieldMarkers(ref name) if name == "game.Scratch"), "{err}");
}

#[test]
fn test_marker_must_fit_value() {
    #[derive(Default)]
    struct Crossed {
        items: Vec<i32>,
    }

    persist! {
        Crossed = "game.Crossed" {
            items: Dictionary,
        }
    }

    let err = codec().encode_root(&Crossed::default()).unwrap_err();
    assert!(
        matches!(err, Error::MarkerMismatch { field: "items", marker: "dictionary", .. }),
        "{err}"
    );
}

#[test]
fn test_depth_limit_on_encode() {
    let err = codec().encode_root(&nest(150)).unwrap_err();
    assert!(matches!(err, Error::DepthLimit(128)), "{err}");
}

#[test]
fn test_depth_limit_on_decode() {
    let deep = Codec::with_options(registry(), CodecOptions::new().with_max_depth(1_000));
    let bytes = deep.encode_root(&nest(150)).expect("encode with raised limit");

    let err = codec().decode_root(&bytes).unwrap_err();
    assert!(matches!(err, Error::DepthLimit(128)), "{err}");

    let restored: Nest = deep.decode_as(&bytes).expect("decode with raised limit");
    let mut levels = 1;
    let mut node = restored.child;
    while let Some(child) = node {
        let child = child.downcast::<Nest>().expect("nest");
        assert_eq!(child.level, levels);
        levels += 1;
        node = child.child;
    }
    assert_eq!(levels, 150);
}

fn outpost() -> Base {
    Base {
        name: "Outpost".to_string(),
        parts: vec![Box::new(Turret { host: None, ammo: 30 }) as Box<dyn Persist>],
        main: Some(Box::new(stockpile()) as Box<dyn Persist>),
    }
}

/// A reader that knows the base and stockpiles but not turrets.
fn reader_without_turrets(policy: UnknownTypePolicy) -> Codec {
    let registry = TypeRegistry::new();
    registry.register::<Base>().expect("register");
    registry.register::<Stockpile>().expect("register");
    Codec::with_options(Arc::new(registry), CodecOptions::new().with_unknown_types(policy))
}

#[test]
fn test_unresolved_type_fails_by_default() {
    let bytes = codec().encode_root(&outpost()).expect("encode");

    let err = reader_without_turrets(UnknownTypePolicy::Fail)
        .decode_root(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvedType(ref name) if name == "game.Turret"), "{err}");
}

#[test]
fn test_unresolved_type_skipped_by_policy() {
    let bytes = codec().encode_root(&outpost()).expect("encode");

    let base: Base = reader_without_turrets(UnknownTypePolicy::Skip)
        .decode_as(&bytes)
        .expect("decode with skip policy");
    assert_eq!(base.name, "Outpost");
    assert!(base.parts.is_empty());
    let main = base.main.as_ref().and_then(|m| m.downcast_ref::<Stockpile>());
    assert_eq!(main, Some(&stockpile()));
}

#[test]
fn test_unresolved_root_is_fatal_under_any_policy() {
    let bytes = codec().encode_root(&stockpile()).expect("encode");
    let codec = Codec::with_options(
        Arc::new(TypeRegistry::new()),
        CodecOptions::new().with_unknown_types(UnknownTypePolicy::Skip),
    );

    let err = codec.decode_root(&bytes).unwrap_err();
    assert!(matches!(err, Error::UnresolvedType(_)), "{err}");
}

#[test]
fn test_typed_decode_checks_name() {
    let codec = codec();
    let bytes = codec.encode_root(&stockpile()).expect("encode");

    let err = codec.decode_as::<Tile>(&bytes).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }), "{err}");
}

#[test]
fn test_array_dimension_overflow() {
    #[derive(Default)]
    struct Wide {
        cells: Grid<u8>,
    }

    persist! {
        Wide = "game.Wide" {
            cells: Sequence,
        }
    }

    let wide = Wide {
        cells: Grid::filled(Dimensions::d2(2, 300), 0).expect("grid"),
    };
    let err = codec().encode_root(&wide).unwrap_err();
    assert!(matches!(err, Error::DimensionOverflow { dim: 1, size: 300 }), "{err}");
}

/// Tagged values written by hand, for shapes the encoder never produces.
mod wire {
    use graphpack::format::name_hash;
    use graphpack::Kind;

    fn tag(kind: Kind, name: &str) -> Vec<u8> {
        let mut out = vec![kind.as_u8()];
        out.extend_from_slice(&name_hash(name).to_le_bytes());
        out
    }

    pub fn int(name: &str, value: i32) -> Vec<u8> {
        let mut out = tag(Kind::Int, name);
        out.extend_from_slice(&value.to_le_bytes());
        out
    }

    pub fn float(name: &str, value: f32) -> Vec<u8> {
        let mut out = tag(Kind::Float, name);
        out.extend_from_slice(&f64::from(value).to_le_bytes());
        out
    }

    pub fn string(name: &str, value: &str) -> Vec<u8> {
        let mut out = tag(Kind::String, name);
        out.extend_from_slice(&(value.len() as i32).to_le_bytes());
        out.extend_from_slice(value.as_bytes());
        out
    }

    pub fn compound(
        kind: Kind,
        name: &str,
        type_names: &[&str],
        dims: Option<&[u8]>,
        children: &[Vec<u8>],
    ) -> Vec<u8> {
        let mut out = tag(kind, name);
        for type_name in type_names {
            out.extend_from_slice(&(type_name.len() as i32).to_le_bytes());
            out.extend_from_slice(type_name.as_bytes());
        }
        if let Some(dims) = dims {
            out.push(dims.len() as u8);
            out.extend_from_slice(dims);
        }
        let body = children.concat();
        out.extend_from_slice(&(body.len() as i32).to_le_bytes());
        out.extend_from_slice(&body);
        out.extend(tag(kind.end_marker().expect("compound kind"), name));
        out
    }

    /// A `game.Chunk` root holding a single field.
    pub fn chunk_with(field: Vec<u8>) -> Vec<u8> {
        compound(Kind::ClassStart, "root", &["game.Chunk"], None, &[field])
    }

    pub fn heights(dims: &[u8], elements: &[(&str, i32)]) -> Vec<u8> {
        let children: Vec<Vec<u8>> = elements.iter().map(|&(label, v)| int(label, v)).collect();
        chunk_with(compound(Kind::ArrayStart, "heights", &["int"], Some(dims), &children))
    }
}

#[test]
fn test_hand_built_array_decodes() {
    let bytes = wire::heights(&[1, 2], &[("0,0", 4), ("0,1", 5)]);

    let chunk: Chunk = raw_codec().decode_as(&bytes).expect("decode");
    assert_eq!(chunk.heights.dims(), &Dimensions::d2(1, 2));
    assert_eq!(chunk.heights.data(), &[4, 5]);
}

#[test]
fn test_array_shape_overflowing_usize() {
    let bytes = wire::heights(&[255; 9], &[]);

    let err = raw_codec().decode_as::<Chunk>(&bytes).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }), "{err}");
}

#[test]
fn test_array_element_count_differs_from_shape() {
    let bytes = wire::heights(&[2, 2], &[("0,0", 1), ("0,1", 2), ("1,0", 3)]);

    let err = raw_codec().decode_as::<Chunk>(&bytes).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }), "{err}");
}

#[test]
fn test_rank_zero_array_header() {
    let bytes = wire::heights(&[], &[]);

    let err = raw_codec().decode_as::<Chunk>(&bytes).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { ref actual, .. } if actual == "scalar"), "{err}");
}

#[test]
fn test_array_elements_out_of_order() {
    let bytes = wire::heights(&[2], &[("1", 7), ("0", 6)]);

    let err = raw_codec().decode_as::<Chunk>(&bytes).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}

#[test]
fn test_fixed_array_rejects_other_shape() {
    let corners: Vec<Vec<u8>> = ["0,0", "0,1", "1,0", "1,1"]
        .iter()
        .map(|label| wire::float(label, 1.0))
        .collect();
    let bytes = wire::chunk_with(wire::compound(
        Kind::ArrayStart,
        "corners",
        &["float"],
        Some(&[2, 2]),
        &corners,
    ));

    let err = raw_codec().decode_as::<Chunk>(&bytes).unwrap_err();
    assert!(
        matches!(err, Error::ShapeMismatch { ref expected, ref actual } if expected == "[4]" && actual == "[2 x 2]"),
        "{err}"
    );
}

#[test]
fn test_unpaired_dictionary_entry() {
    let bytes = wire::chunk_with(wire::compound(
        Kind::DictStart,
        "owners",
        &["string", "int"],
        None,
        &[wire::string("k0", "ada"), wire::int("v0", 3), wire::string("k1", "bob")],
    ));

    let err = raw_codec().decode_as::<Chunk>(&bytes).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)), "{err}");
}

#[test]
fn test_deeply_nested_element_type() {
    let levels = 200_000;
    let element = format!("{}int{}", "list<".repeat(levels), ">".repeat(levels));
    let bytes = wire::chunk_with(wire::compound(Kind::ListStart, "tiles", &[element.as_str()], None, &[]));

    let err = raw_codec().decode_as::<Chunk>(&bytes).unwrap_err();
    assert!(matches!(err, Error::DepthLimit(128)), "{err}");
}
