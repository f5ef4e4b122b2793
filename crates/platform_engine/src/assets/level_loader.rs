//! Tiled JSON level loader
//!
//! Reads maps exported by the Tiled editor. The tile layer becomes a
//! [`Grid`]; every object of a configured object layer becomes a
//! [`SpawnDescriptor`]. Objects are decoded one by one: a malformed object is
//! logged and skipped, the rest of the level still loads.
//!
//! Coordinates are returned as authored. Scaling to the logical view is left
//! to whoever spawns the descriptors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::foundation::collections::Grid;
use crate::foundation::math::{Rect, Vec2};

use super::LevelError;

/// Layer names the loader looks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayout {
    /// Static tile layer (required)
    pub tile_layer: String,
    /// Optional tile layer for grounds that change at runtime
    pub dynamic_layer: String,
    /// Object layers turned into spawn descriptors, in spawn order
    pub object_layers: Vec<String>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            tile_layer: "Blocks".to_string(),
            dynamic_layer: "DynamicGrounds".to_string(),
            object_layers: ["Grounds", "Triggers", "Levers", "Enemies", "Player"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Typed custom property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `bool` property
    Bool(bool),
    /// `int` property
    Int(i64),
    /// `float` property
    Float(f64),
    /// `string` property
    Text(String),
}

impl PropertyValue {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_i64().map(Self::Int).or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Boolean value; numbers count as true when non-zero
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Float(f) => Some(*f != 0.0),
            Self::Text(_) => None,
        }
    }

    /// Numeric value
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Int(i) => Some(*i as f32),
            Self::Float(f) => Some(*f as f32),
            _ => None,
        }
    }

    /// Integer value
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Id list: `"3,4,7"` or a single integer
    pub fn as_id_list(&self) -> Vec<i32> {
        match self {
            Self::Text(s) => parse_id_list(s),
            Self::Int(_) => self.as_i32().into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Parse a comma-separated id list, skipping malformed entries
pub fn parse_id_list(text: &str) -> Vec<i32> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("Skipping malformed id {entry:?} in list {text:?}");
                None
            }
        })
        .collect()
}

/// One object to spawn
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDescriptor {
    /// Object layer it came from
    pub layer: String,
    /// Object name, used as the type tag
    pub kind: String,
    /// Editor id
    pub level_id: Option<i32>,
    /// Top-left corner as authored
    pub position: Vec2,
    /// Width and height as authored (zero for point objects)
    pub size: Vec2,
    /// Custom properties by name
    pub properties: HashMap<String, PropertyValue>,
}

impl SpawnDescriptor {
    /// Center of the object rectangle
    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    /// Look up a property
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Boolean property, `false` when absent
    pub fn flag(&self, name: &str) -> bool {
        self.property(name).and_then(PropertyValue::as_bool).unwrap_or(false)
    }

    /// Numeric property
    pub fn number(&self, name: &str) -> Option<f32> {
        self.property(name).and_then(PropertyValue::as_f32)
    }

    /// Text property
    pub fn text(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(PropertyValue::as_str)
    }

    /// Id list property, empty when absent
    pub fn id_list(&self, name: &str) -> Vec<i32> {
        self.property(name).map(PropertyValue::as_id_list).unwrap_or_default()
    }
}

/// A loaded level
#[derive(Debug, Clone)]
pub struct LevelData {
    /// Size of one tile as authored
    pub tile_size: f32,
    /// Static tile indices (0 = empty)
    pub tiles: Grid<i32>,
    /// Tile indices of runtime grounds
    pub dynamic_tiles: Option<Grid<i32>>,
    /// Objects in layer order
    pub spawns: Vec<SpawnDescriptor>,
}

impl LevelData {
    /// Width in tiles
    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    /// Level rectangle in authored units
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.width() as f32 * self.tile_size,
            self.height() as f32 * self.tile_size,
        )
    }

    /// Descriptors from one object layer
    pub fn spawns_in<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a SpawnDescriptor> {
        self.spawns.iter().filter(move |spawn| spawn.layer == layer)
    }
}

/// Producer of level data
pub trait LevelSource {
    /// Load the level at `path`
    fn load_level(&mut self, path: &Path) -> Result<LevelData, LevelError>;
}

/// Loads Tiled JSON files from disk
#[derive(Debug, Clone)]
pub struct TiledLevelSource {
    root: PathBuf,
    layout: LevelLayout,
}

impl TiledLevelSource {
    /// Resolve relative level paths against `root`
    pub fn new(root: impl Into<PathBuf>, layout: LevelLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// Layer names in use
    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }
}

impl LevelSource for TiledLevelSource {
    fn load_level(&mut self, path: &Path) -> Result<LevelData, LevelError> {
        let full = self.root.join(path);
        let text = std::fs::read_to_string(&full).map_err(|source| LevelError::Io {
            path: full.clone(),
            source,
        })?;

        let level = parse_level(&text, &self.layout)?;
        log::debug!(
            "Loaded level {} ({}x{} tiles, {} objects)",
            full.display(),
            level.width(),
            level.height(),
            level.spawns.len()
        );
        Ok(level)
    }
}

#[derive(Deserialize)]
struct RawMap {
    width: usize,
    height: usize,
    tilewidth: f32,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Deserialize)]
struct RawLayer {
    name: String,
    #[serde(default)]
    data: Option<Vec<i32>>,
    #[serde(default)]
    objects: Vec<Value>,
}

#[derive(Deserialize)]
struct RawObject {
    id: i32,
    #[serde(default)]
    name: String,
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    value: Value,
}

/// Parse a Tiled JSON document
pub fn parse_level(text: &str, layout: &LevelLayout) -> Result<LevelData, LevelError> {
    let map: RawMap = serde_json::from_str(text)?;

    let tile_grid = |name: &str| -> Result<Option<Grid<i32>>, LevelError> {
        map.layers
            .iter()
            .find(|layer| layer.name == name)
            .and_then(|layer| layer.data.clone())
            .map(|data| Grid::from_flat(map.width, map.height, data))
            .transpose()
            .map_err(LevelError::from)
    };

    let tiles = tile_grid(&layout.tile_layer)?
        .ok_or_else(|| LevelError::MissingLayer(layout.tile_layer.clone()))?;
    let dynamic_tiles = tile_grid(&layout.dynamic_layer)?;

    let mut spawns = Vec::new();
    for layer_name in &layout.object_layers {
        for layer in map.layers.iter().filter(|layer| &layer.name == layer_name) {
            spawns.extend(layer.objects.iter().filter_map(|object| decode_object(layer_name, object)));
        }
    }

    Ok(LevelData {
        tile_size: map.tilewidth,
        tiles,
        dynamic_tiles,
        spawns,
    })
}

fn decode_object(layer: &str, object: &Value) -> Option<SpawnDescriptor> {
    let raw = match RawObject::deserialize(object) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("Skipping malformed object in layer {layer}: {err}");
            return None;
        }
    };

    let mut properties = HashMap::new();
    for property in raw.properties {
        match PropertyValue::from_json(&property.value) {
            Some(value) => {
                properties.insert(property.name, value);
            }
            None => log::warn!(
                "Object {} in layer {layer}: ignoring property {} with unsupported value",
                raw.id,
                property.name
            ),
        }
    }

    Some(SpawnDescriptor {
        layer: layer.to_string(),
        kind: raw.name,
        level_id: Some(raw.id),
        position: Vec2::new(raw.x, raw.y),
        size: Vec2::new(raw.width, raw.height),
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LEVEL: &str = r#"{
        "width": 3, "height": 2, "tilewidth": 32,
        "layers": [
            {"name": "Blocks", "type": "tilelayer", "data": [0, 1, 0, 2, 2, 2]},
            {"name": "Grounds", "type": "objectgroup", "objects": [
                {"id": 4, "name": "Ground", "x": 0, "y": 64, "width": 96, "height": 32,
                 "properties": [{"name": "Spike", "type": "bool", "value": true}]},
                {"id": 5, "name": "Ground", "x": "oops", "y": 0}
            ]},
            {"name": "Triggers", "type": "objectgroup", "objects": [
                {"id": 9, "name": "Trigger", "x": 10, "y": 10, "width": 20, "height": 20,
                 "properties": [
                    {"name": "Grounds", "type": "string", "value": "4, x, 6"},
                    {"name": "Odd", "type": "class", "value": {"nested": 1}}
                 ]}
            ]},
            {"name": "Notes", "type": "objectgroup", "objects": [
                {"id": 12, "name": "Ignored", "x": 0, "y": 0}
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_tiles_and_objects() {
        let level = parse_level(LEVEL, &LevelLayout::default()).unwrap();

        assert_eq!((level.width(), level.height()), (3, 2));
        assert_eq!(level.tiles.get(1, 0), Some(&2));
        assert!(level.dynamic_tiles.is_none());
        assert_eq!(level.bounds(), Rect::new(0.0, 0.0, 96.0, 64.0));

        // The malformed ground and the unlisted layer are skipped
        assert_eq!(level.spawns.len(), 2);
        let ground = &level.spawns[0];
        assert_eq!(ground.level_id, Some(4));
        assert!(ground.flag("Spike"));
        assert_relative_eq!(ground.center().x, 48.0);
        assert_relative_eq!(ground.center().y, 80.0);
    }

    #[test]
    fn test_trigger_id_list_skips_bad_entries() {
        let level = parse_level(LEVEL, &LevelLayout::default()).unwrap();
        let trigger = level.spawns_in("Triggers").next().unwrap();

        assert_eq!(trigger.id_list("Grounds"), vec![4, 6]);
        assert!(trigger.property("Odd").is_none());
        assert!(trigger.id_list("Enemies").is_empty());
    }

    #[test]
    fn test_missing_tile_layer_is_error() {
        let layout = LevelLayout {
            tile_layer: "Terrain".to_string(),
            ..LevelLayout::default()
        };
        assert!(matches!(parse_level(LEVEL, &layout), Err(LevelError::MissingLayer(name)) if name == "Terrain"));
    }

    #[test]
    fn test_tile_count_mismatch_is_error() {
        let text = r#"{"width": 4, "height": 4, "tilewidth": 16,
            "layers": [{"name": "Blocks", "data": [1, 2, 3]}]}"#;
        assert!(matches!(parse_level(text, &LevelLayout::default()), Err(LevelError::Grid(_))));
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1,2,3"), vec![1, 2, 3]);
        assert_eq!(parse_id_list(" 7 , ,8"), vec![7, 8]);
        assert!(parse_id_list("").is_empty());
        assert_eq!(PropertyValue::Int(5).as_id_list(), vec![5]);
    }

    #[test]
    fn test_source_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("forest.json"), LEVEL).unwrap();

        let mut source = TiledLevelSource::new(dir.path(), LevelLayout::default());
        let level = source.load_level(Path::new("forest.json")).unwrap();
        assert_eq!(level.spawns.len(), 2);

        let missing = source.load_level(Path::new("absent.json"));
        assert!(matches!(missing, Err(LevelError::Io { .. })));
    }
}
