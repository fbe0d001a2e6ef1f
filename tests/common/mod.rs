//! Shared test fixtures: a small game-like object model.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use graphpack::prelude::*;

/// Route `tracing` output through the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stockpile {
    pub count: i32,
    pub label: String,
    pub items: Vec<i32>,
}

persist! {
    Stockpile = "game.Stockpile" {
        count as "Count": Primitive,
        label as "Label": Primitive,
        items as "Items": Sequence,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Biome {
    #[default]
    Plains,
    Desert,
    Tundra,
}

persist_enum! {
    Biome = "game.Biome" { Plains = 0, Desert = 1, Tundra = 2 }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tile {
    pub height: f32,
    pub biome: Biome,
}

persist! {
    Tile = "game.Tile" {
        height: Primitive,
        biome: Primitive,
    }
}

/// One field of every marker kind, plus state that must never be saved.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Chunk {
    pub name: String,
    pub origin: Vec3,
    pub seed: u32,
    pub visible: bool,
    pub level: u8,
    pub scale: f64,
    pub template: TypeRef,
    pub biome: Biome,
    pub stockpile: Option<Stockpile>,
    pub tiles: Vec<Tile>,
    pub heights: Grid<i32>,
    pub corners: [f32; 4],
    pub owners: HashMap<String, i32>,
    pub climate: BTreeMap<i32, Biome>,
    pub mesh_cache: Vec<u8>,
}

persist! {
    Chunk = "game.Chunk" {
        name: Primitive,
        origin: Primitive,
        seed: Primitive,
        visible: Primitive,
        level: Primitive,
        scale: Primitive,
        template: Primitive,
        biome: Primitive,
        stockpile: Class,
        tiles: Sequence,
        heights: Sequence,
        corners: Sequence,
        owners: Dictionary,
        climate: Dictionary,
    }
}

/// A component that only exists attached to a host.
#[derive(Debug, Default)]
pub struct Turret {
    pub host: Option<Host>,
    pub ammo: i32,
}

persist! {
    Turret = "game.Turret" {
        ammo: Primitive,
    }
}

impl Hosted for Turret {
    fn with_host(host: Host) -> Self {
        Self { host: Some(host), ammo: 0 }
    }
}

/// An asset built by the "assets" factory.
#[derive(Debug, Default)]
pub struct Texture {
    pub path: String,
    pub from_factory: bool,
}

persist! {
    Texture = "game.Texture" {
        path: Primitive,
    }
}

pub fn load_asset(type_name: &str) -> Result<Box<dyn Persist>> {
    match type_name {
        "game.Texture" => Ok(Box::new(Texture {
            from_factory: true,
            ..Texture::default()
        })),
        other => Err(Error::UnresolvedType(other.to_string())),
    }
}

/// Holds polymorphic children.
#[derive(Default)]
pub struct Base {
    pub name: String,
    pub parts: Vec<Box<dyn Persist>>,
    pub main: Option<Box<dyn Persist>>,
}

persist! {
    Base = "game.Base" {
        name: Primitive,
        parts: Sequence,
        main: Class,
    }
}

/// Recomputes a derived total after loading.
#[derive(Debug, Default)]
pub struct Warehouse {
    pub slots: Vec<i32>,
    pub total: i32,
    pub loads: u32,
}

persist! {
    Warehouse = "game.Warehouse" {
        slots: Sequence,
    }
    hooks: [post_load]
}

impl PostLoad for Warehouse {
    fn on_loaded(&mut self) {
        self.total = self.slots.iter().sum();
        self.loads += 1;
    }
}

/// Keeps its stacks outside declared fields.
#[derive(Debug, Default, PartialEq)]
pub struct Inventory {
    pub owner: String,
    pub stacks: Vec<(String, u32)>,
}

persist! {
    Inventory = "game.Inventory" {
        owner: Primitive,
    }
    hooks: [state]
}

impl PersistState for Inventory {
    fn write_state(&self, state: &mut StateWriter<'_, '_>) -> Result<()> {
        state.write(&(self.stacks.len() as u32))?;
        for (item, amount) in &self.stacks {
            state.write(item)?;
            state.write(amount)?;
        }
        Ok(())
    }

    fn read_state(&mut self, state: &mut StateReader<'_, '_>) -> Result<()> {
        let len: u32 = state.read()?;
        self.stacks.clear();
        for _ in 0..len {
            let item: String = state.read()?;
            let amount: u32 = state.read()?;
            self.stacks.push((item, amount));
        }
        Ok(())
    }
}

/// Self-nesting type for depth tests.
#[derive(Default)]
pub struct Nest {
    pub level: i32,
    pub child: Option<Box<dyn Persist>>,
}

persist! {
    Nest = "game.Nest" {
        level: Primitive,
        child: Class,
    }
}

/// Build a chain of `levels` nested values.
pub fn nest(levels: i32) -> Nest {
    let mut node = Nest { level: levels - 1, child: None };
    for level in (0..levels - 1).rev() {
        node = Nest {
            level,
            child: Some(Box::new(node) as Box<dyn Persist>),
        };
    }
    node
}

/// Registry holding every fixture type.
pub fn registry() -> Arc<TypeRegistry> {
    let registry = TypeRegistry::new();
    registry.register::<Stockpile>().expect("register Stockpile");
    registry.register::<Tile>().expect("register Tile");
    registry.register::<Chunk>().expect("register Chunk");
    registry.register::<Base>().expect("register Base");
    registry.register::<Warehouse>().expect("register Warehouse");
    registry.register::<Inventory>().expect("register Inventory");
    registry.register::<Nest>().expect("register Nest");
    registry.register_enum::<Biome>().expect("register Biome");
    registry.register_hosted::<Turret>().expect("register Turret");
    registry.register_asset::<Texture>("assets").expect("register Texture");
    registry.register_factory("assets", load_asset);
    Arc::new(registry)
}

pub fn codec() -> Codec {
    init_tracing();
    Codec::new(registry())
}

pub fn stockpile() -> Stockpile {
    Stockpile {
        count: 3,
        label: "Ore".to_string(),
        items: vec![1, 2, 3],
    }
}

pub fn chunk() -> Chunk {
    Chunk {
        name: "Ridge ⛰".to_string(),
        origin: Vec3::new(16.0, -2.5, 48.0),
        seed: u32::MAX,
        visible: true,
        level: 7,
        scale: 0.125,
        template: TypeRef::new("game.Tile"),
        biome: Biome::Tundra,
        stockpile: Some(stockpile()),
        tiles: vec![
            Tile { height: 1.5, biome: Biome::Desert },
            Tile { height: -0.25, biome: Biome::Plains },
        ],
        heights: Grid::new(Dimensions::d2(2, 3), vec![1, 2, 3, 4, 5, 6]).expect("2x3 grid"),
        corners: [0.0, 1.0, -1.0, f32::MAX],
        owners: [("north", 1), ("south", 2), ("east", 3), ("west", 4), ("core", 5)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        climate: [(0, Biome::Plains), (-40, Biome::Tundra), (45, Biome::Desert)]
            .into_iter()
            .collect(),
        mesh_cache: vec![0xde, 0xad],
    }
}
