//! Round-trip tests through the public `Codec` API.

mod common;

use std::collections::HashMap;

use common::*;
use graphpack::format::name_hash;
use graphpack::inspect::inspect;
use graphpack::prelude::*;
use graphpack::Kind;

#[test]
fn test_stockpile_scenario() {
    let codec = codec();
    let bytes = codec.encode_root(&stockpile()).expect("encode");

    let restored: Stockpile = codec.decode_as(&bytes).expect("decode");
    assert_eq!(restored.count, 3);
    assert_eq!(restored.label, "Ore");
    assert_eq!(restored.items, vec![1, 2, 3]);
}

#[test]
fn test_decode_root_is_polymorphic() {
    let codec = codec();
    let bytes = codec.encode_root(&stockpile()).expect("encode");

    let obj = codec.decode_root(&bytes).expect("decode");
    assert_eq!(obj.type_name(), "game.Stockpile");
    let restored = obj.downcast::<Stockpile>().expect("downcast");
    assert_eq!(*restored, stockpile());
}

#[test]
fn test_every_marker_kind() {
    let codec = codec();
    let original = chunk();
    let bytes = codec.encode_root(&original).expect("encode");

    let restored: Chunk = codec.decode_as(&bytes).expect("decode");
    assert!(restored.mesh_cache.is_empty(), "unmarked fields are never saved");
    assert_eq!(
        restored,
        Chunk {
            mesh_cache: Vec::new(),
            ..original
        }
    );
}

#[test]
fn test_null_fields_are_omitted() {
    let codec = codec();
    let original = Chunk {
        stockpile: None,
        ..chunk()
    };
    let bytes = codec.encode_root(&original).expect("encode");
    let with_stockpile = codec.encode_root(&chunk()).expect("encode");
    assert!(bytes.len() < with_stockpile.len());

    let restored: Chunk = codec.decode_as(&bytes).expect("decode");
    assert_eq!(restored.stockpile, None);
    assert_eq!(restored.tiles, original.tiles);
}

#[test]
fn test_dictionary_with_five_entries() {
    let codec = codec();
    let bytes = codec.encode_root(&chunk()).expect("encode");
    let restored: Chunk = codec.decode_as(&bytes).expect("decode");

    let expected: HashMap<String, i32> = chunk().owners;
    assert_eq!(restored.owners.len(), 5);
    assert_eq!(restored.owners, expected);
    assert_eq!(restored.climate.get(&-40), Some(&Biome::Tundra));
}

#[test]
fn test_array_shape_and_order() {
    let codec = Codec::with_options(registry(), CodecOptions::new().with_size_prefix(false));
    let original = chunk();
    let bytes = codec.encode_root(&original).expect("encode");

    let restored: Chunk = codec.decode_as(&bytes).expect("decode");
    assert_eq!(restored.heights.dims().sizes(), &[2, 3]);
    assert_eq!(restored.heights.data(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(restored.heights.get(&[1, 0]), Some(&4));

    // Elements are written row-major, each named by its multi-index.
    let root = inspect(&bytes, 0..bytes.len()).expect("inspect");
    let heights = root[0]
        .children
        .iter()
        .find(|n| n.name_hash == name_hash("heights"))
        .expect("heights node");
    assert_eq!(heights.kind, Kind::ArrayStart);
    assert_eq!(heights.dims, vec![2, 3]);
    let order: Vec<i32> = heights.children.iter().map(|n| n.name_hash).collect();
    let expected: Vec<i32> = ["0,0", "0,1", "0,2", "1,0", "1,1", "1,2"]
        .iter()
        .map(|label| name_hash(label))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn test_polymorphic_children() {
    let codec = codec();
    let base = Base {
        name: "Outpost".to_string(),
        parts: vec![
            Box::new(stockpile()) as Box<dyn Persist>,
            Box::new(Tile { height: 2.0, biome: Biome::Desert }) as Box<dyn Persist>,
            Box::new(Warehouse { slots: vec![4, 5], ..Warehouse::default() }) as Box<dyn Persist>,
        ],
        main: Some(Box::new(Inventory {
            owner: "Ada".to_string(),
            stacks: vec![("ore".to_string(), 12)],
        }) as Box<dyn Persist>),
    };
    let bytes = codec.encode_root(&base).expect("encode");

    let restored: Base = codec.decode_as(&bytes).expect("decode");
    assert_eq!(restored.name, "Outpost");
    let names: Vec<&str> = restored.parts.iter().map(|p| p.type_name()).collect();
    assert_eq!(names, vec!["game.Stockpile", "game.Tile", "game.Warehouse"]);
    assert_eq!(restored.parts[0].downcast_ref::<Stockpile>(), Some(&stockpile()));
    assert_eq!(
        restored.parts[2].downcast_ref::<Warehouse>().map(|w| w.total),
        Some(9)
    );
    let main = restored.main.as_ref().and_then(|m| m.downcast_ref::<Inventory>());
    assert_eq!(main.map(|i| i.stacks.len()), Some(1));
}

#[test]
fn test_state_wrapper_roundtrip() {
    let codec = codec();
    let inventory = Inventory {
        owner: "Ada".to_string(),
        stacks: vec![("ore".to_string(), 12), ("coal".to_string(), 0), (String::new(), u32::MAX)],
    };
    let bytes = codec.encode_root(&inventory).expect("encode");

    let restored: Inventory = codec.decode_as(&bytes).expect("decode");
    assert_eq!(restored, inventory);
}

#[test]
fn test_post_load_runs_once() {
    let codec = codec();
    let warehouse = Warehouse {
        slots: vec![10, 20, 12],
        total: -1,
        loads: 0,
    };
    let bytes = codec.encode_root(&warehouse).expect("encode");

    let restored: Warehouse = codec.decode_as(&bytes).expect("decode");
    assert_eq!(restored.slots, vec![10, 20, 12]);
    assert_eq!(restored.total, 42);
    assert_eq!(restored.loads, 1);
}

#[test]
fn test_size_of_matches_encode_root() {
    for size_prefix in [true, false] {
        let codec = Codec::with_options(registry(), CodecOptions::new().with_size_prefix(size_prefix));
        let chunk = chunk();
        let bytes = codec.encode_root(&chunk).expect("encode");
        assert_eq!(codec.size_of(&chunk).expect("size_of"), bytes.len());

        let empty = Stockpile::default();
        let bytes = codec.encode_root(&empty).expect("encode");
        assert_eq!(codec.size_of(&empty).expect("size_of"), bytes.len());
    }
}

#[test]
fn test_size_prefix_frames_root() {
    let codec = codec();
    let bytes = codec.encode_root(&stockpile()).expect("encode");
    let total = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(total as usize, bytes.len() - 4);
    assert_eq!(bytes[4], Kind::ClassStart.as_u8());
}

#[test]
fn test_named_value_roundtrip() {
    let codec = codec();
    let bytes = codec.encode(&stockpile(), "Slot3").expect("encode");
    assert_eq!(
        i32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]),
        name_hash("Slot3")
    );

    let obj = codec.decode_value(&bytes, 0..bytes.len()).expect("decode");
    assert_eq!(obj.downcast_ref::<Stockpile>(), Some(&stockpile()));
}

#[test]
fn test_load_into_populates_existing() {
    let codec = Codec::with_options(registry(), CodecOptions::new().with_size_prefix(false));
    let bytes = codec.encode_root(&stockpile()).expect("encode");

    let mut existing = Stockpile {
        count: 99,
        label: "old".to_string(),
        items: vec![7],
    };
    codec.load_into(&mut existing, &bytes, 0..bytes.len()).expect("load");
    assert_eq!(existing, stockpile());

    let mut wrong = Tile::default();
    let err = codec.load_into(&mut wrong, &bytes, 0..bytes.len()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }), "{err}");
}

#[test]
fn test_load_into_runs_post_load() {
    let codec = codec();
    let bytes = codec
        .encode_root(&Warehouse { slots: vec![1, 1], ..Warehouse::default() })
        .expect("encode");

    let mut existing = Warehouse::default();
    codec.load_into(&mut existing, &bytes, 4..bytes.len()).expect("load");
    assert_eq!(existing.total, 2);
    assert_eq!(existing.loads, 1);
}

#[test]
fn test_all_null_class_encodes_empty() {
    #[derive(Default)]
    struct Beacon {
        label: Option<String>,
        target: Option<Stockpile>,
    }

    persist! {
        Beacon = "game.Beacon" {
            label: Primitive,
            target: Class,
        }
    }

    let codec = Codec::with_options(registry(), CodecOptions::new().with_size_prefix(false));
    codec.registry().register::<Beacon>().expect("register");
    let bytes = codec.encode_root(&Beacon::default()).expect("encode");

    let root = inspect(&bytes, 0..bytes.len()).expect("inspect");
    assert_eq!(root[0].type_names, vec!["game.Beacon".to_string()]);
    assert!(root[0].children.is_empty());

    let restored: Beacon = codec.decode_as(&bytes).expect("decode");
    assert!(restored.label.is_none() && restored.target.is_none());
}

#[test]
fn test_null_list_element_rejected() {
    #[derive(Default)]
    struct Gaps {
        values: Vec<Option<i32>>,
    }

    persist! {
        Gaps = "game.Gaps" {
            values: Sequence,
        }
    }

    let codec = codec();
    let err = codec
        .encode_root(&Gaps { values: vec![Some(1), None] })
        .unwrap_err();
    assert!(matches!(err, Error::Other(_)), "{err}");
}
