//! # Persistence
//!
//! Saving and loading the world as JSON.
//!
//! ## Format
//!
//! ```json
//! {
//!   "player": {"x": "0.50", "y": "12.00", "z": "-3.25", "rx": "0.10", "ry": "1.57", "rz": "0.00"},
//!   "spawn": {"x": 0, "y": 12, "z": 0},
//!   "seed": 1234,
//!   "nodes": [{"x": 0, "y": 0, "z": 0, "t": 20}]
//! }
//! ```
//!
//! Player values are decimal strings with two fractional digits. Only the nodes of the 3×3
//! chunks around the player are stored; everything else regenerates from the seed.
//!
//! ## Loading
//!
//! Loading is staged: the document is parsed and fully validated into a [`LoadedWorld`]
//! before the world is touched, so a bad save leaves the running world as it was.

use std::{collections::HashMap, fmt};

use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::{
    camera_state::Player,
    voxels::{block::block_type::BlockType, world::World},
};

/// Largest save document accepted, in bytes
pub const MAX_SAVE_SIZE: usize = 16 * 1024 * 1024;

/// Errors raised while saving or loading a world.
#[derive(Debug)]
pub enum SaveError {
    /// The document is not valid JSON or misses required fields
    Json(serde_json::Error),
    /// Reading or writing a save file failed
    Io(std::io::Error),
    /// The document exceeds [`MAX_SAVE_SIZE`]
    TooLarge { size: usize, limit: usize },
    /// A node references a type id outside the catalog
    UnknownNodeType(u32),
    /// A player value is not a finite decimal number
    InvalidNumber { field: &'static str, value: String },
    /// No save with this name exists
    NotFound(String),
    /// The browser storage rejected the operation
    Storage(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Json(e) => write!(f, "malformed save data: {}", e),
            SaveError::Io(e) => write!(f, "could not access save file: {}", e),
            SaveError::TooLarge { size, limit } => {
                write!(f, "save data is {} bytes, the limit is {} bytes", size, limit)
            }
            SaveError::UnknownNodeType(id) => write!(f, "unknown node type id {}", id),
            SaveError::InvalidNumber { field, value } => {
                write!(f, "player field {} is not a number: {:?}", field, value)
            }
            SaveError::NotFound(name) => write!(f, "no saved world named {:?}", name),
            SaveError::Storage(message) => write!(f, "storage error: {}", message),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Json(e) => Some(e),
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

/// Player pose as stored in a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub x: String,
    pub y: String,
    pub z: String,
    /// Pitch
    pub rx: String,
    /// Yaw
    pub ry: String,
    /// Roll
    pub rz: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// One stored node; `t` is the type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub t: u32,
}

/// A save document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub player: PlayerRecord,
    pub spawn: SpawnRecord,
    pub seed: i32,
    pub nodes: Vec<NodeRecord>,
}

/// A validated save, ready to replace the running world.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedWorld {
    pub seed: i32,
    pub spawn: Point3<i32>,
    /// Feet position of the player
    pub position: Point3<f32>,
    /// `(pitch, yaw, roll)`
    pub rotation: Vector3<f32>,
    pub nodes: Vec<(Point3<i32>, BlockType)>,
}

fn format_decimal(value: f32) -> String {
    format!("{:.2}", value)
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f32, SaveError> {
    match value.trim().parse::<f32>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(SaveError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

impl SaveData {
    /// Captures the player and the nodes of the chunks around them.
    pub fn capture(world: &World, player: &Player) -> Self {
        let center = player.chunk();
        let mut nodes = Vec::new();
        for cx in center.x - 1..=center.x + 1 {
            for cz in center.y - 1..=center.y + 1 {
                let Some(chunk) = world.get_chunk_at(cgmath::Point2::new(cx, cz)) else {
                    continue;
                };
                nodes.extend(chunk.blocks().map(|block| NodeRecord {
                    x: block.position.x,
                    y: block.position.y,
                    z: block.position.z,
                    t: block.block_type.id() as u32,
                }));
            }
        }
        nodes.sort_unstable_by_key(|node| (node.x, node.z, node.y));

        let position = player.position();
        let rotation = player.rotation();
        let spawn = world.spawn();

        SaveData {
            player: PlayerRecord {
                x: format_decimal(position.x),
                y: format_decimal(position.y),
                z: format_decimal(position.z),
                rx: format_decimal(rotation.x),
                ry: format_decimal(rotation.y),
                rz: format_decimal(rotation.z),
            },
            spawn: SpawnRecord {
                x: spawn.x,
                y: spawn.y,
                z: spawn.z,
            },
            seed: world.seed(),
            nodes,
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and validates a save document without touching any world.
    pub fn parse(json: &str) -> Result<LoadedWorld, SaveError> {
        if json.len() > MAX_SAVE_SIZE {
            return Err(SaveError::TooLarge {
                size: json.len(),
                limit: MAX_SAVE_SIZE,
            });
        }

        let data: SaveData = serde_json::from_str(json)?;
        data.validate()
    }

    /// Converts the raw document into a [`LoadedWorld`], rejecting bad numbers and type ids.
    pub fn validate(&self) -> Result<LoadedWorld, SaveError> {
        let player = &self.player;
        let position = Point3::new(
            parse_decimal("x", &player.x)?,
            parse_decimal("y", &player.y)?,
            parse_decimal("z", &player.z)?,
        );
        let rotation = Vector3::new(
            parse_decimal("rx", &player.rx)?,
            parse_decimal("ry", &player.ry)?,
            parse_decimal("rz", &player.rz)?,
        );

        let nodes = self
            .nodes
            .iter()
            .map(|node| {
                BlockType::from_id(node.t)
                    .map(|block_type| (Point3::new(node.x, node.y, node.z), block_type))
                    .ok_or(SaveError::UnknownNodeType(node.t))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LoadedWorld {
            seed: self.seed,
            spawn: Point3::new(self.spawn.x, self.spawn.y, self.spawn.z),
            position,
            rotation,
            nodes,
        })
    }
}

impl LoadedWorld {
    /// Replaces the running world and the player's pose with the saved state.
    ///
    /// # Returns
    /// The number of nodes restored.
    pub fn apply(self, world: &mut World, player: &mut Player) -> usize {
        world.reset(self.seed);
        world.set_spawn(self.spawn);

        let mut restored = 0;
        for (position, block_type) in self.nodes {
            if world.add_block(position, block_type) {
                restored += 1;
            }
        }

        player.set_pose(self.position, self.rotation, world);
        restored
    }
}

/// Where save documents are kept.
pub trait SaveStorage {
    /// Stores `data` under `name`, replacing any previous save of that name.
    fn write(&mut self, name: &str, data: &str) -> Result<(), SaveError>;
    /// Reads the save stored under `name`.
    fn read(&self, name: &str) -> Result<String, SaveError>;
    /// Names of all stored saves, sorted.
    fn list(&self) -> Result<Vec<String>, SaveError>;
    /// Deletes the save stored under `name`.
    fn remove(&mut self, name: &str) -> Result<(), SaveError>;
}

/// Saves kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saves: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStorage for MemoryStorage {
    fn write(&mut self, name: &str, data: &str) -> Result<(), SaveError> {
        self.saves.insert(name.to_string(), data.to_string());
        Ok(())
    }

    fn read(&self, name: &str) -> Result<String, SaveError> {
        self.saves
            .get(name)
            .cloned()
            .ok_or_else(|| SaveError::NotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, SaveError> {
        let mut names: Vec<String> = self.saves.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn remove(&mut self, name: &str) -> Result<(), SaveError> {
        self.saves
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SaveError::NotFound(name.to_string()))
    }
}

/// One `<name>.json` file per save inside a directory.
#[cfg(not(target_family = "wasm"))]
pub struct FileStorage {
    directory: std::path::PathBuf,
}

#[cfg(not(target_family = "wasm"))]
impl FileStorage {
    pub fn new(directory: impl Into<std::path::PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_of(&self, name: &str) -> std::path::PathBuf {
        self.directory.join(format!("{}.json", name))
    }

    fn not_found_as(name: &str, e: std::io::Error) -> SaveError {
        if e.kind() == std::io::ErrorKind::NotFound {
            SaveError::NotFound(name.to_string())
        } else {
            SaveError::Io(e)
        }
    }
}

#[cfg(not(target_family = "wasm"))]
impl SaveStorage for FileStorage {
    fn write(&mut self, name: &str, data: &str) -> Result<(), SaveError> {
        std::fs::create_dir_all(&self.directory)?;
        std::fs::write(self.path_of(name), data)?;
        Ok(())
    }

    fn read(&self, name: &str) -> Result<String, SaveError> {
        let path = self.path_of(name);
        let size = std::fs::metadata(&path)
            .map_err(|e| Self::not_found_as(name, e))?
            .len() as usize;
        if size > MAX_SAVE_SIZE {
            return Err(SaveError::TooLarge {
                size,
                limit: MAX_SAVE_SIZE,
            });
        }
        std::fs::read_to_string(&path).map_err(|e| Self::not_found_as(name, e))
    }

    fn list(&self) -> Result<Vec<String>, SaveError> {
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|extension| extension == "json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&mut self, name: &str) -> Result<(), SaveError> {
        std::fs::remove_file(self.path_of(name)).map_err(|e| Self::not_found_as(name, e))
    }
}

/// Saves kept in `window.localStorage`, one key per save.
///
/// Only keys starting with `world` are listed as saves.
#[cfg(target_family = "wasm")]
pub struct LocalStorage;

#[cfg(target_family = "wasm")]
impl LocalStorage {
    const KEY_PREFIX: &'static str = "world";

    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .ok_or_else(|| SaveError::Storage(String::from("no window")))?
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| SaveError::Storage(String::from("local storage is unavailable")))
    }
}

#[cfg(target_family = "wasm")]
impl SaveStorage for LocalStorage {
    fn write(&mut self, name: &str, data: &str) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(name, data)
            .map_err(|e| {
                SaveError::Storage(format!("could not save world, not enough space? {:?}", e))
            })
    }

    fn read(&self, name: &str) -> Result<String, SaveError> {
        Self::storage()?
            .get_item(name)
            .map_err(|e| SaveError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| SaveError::NotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, SaveError> {
        let storage = Self::storage()?;
        let length = storage
            .length()
            .map_err(|e| SaveError::Storage(format!("{:?}", e)))?;
        let mut names = Vec::new();
        for index in 0..length {
            if let Ok(Some(key)) = storage.key(index) {
                if key.starts_with(Self::KEY_PREFIX) {
                    names.push(key);
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&mut self, name: &str) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(name)
            .map_err(|e| SaveError::Storage(format!("{:?}", e)))
    }
}

/// The storage backend for the current platform.
pub fn platform_storage(save_dir: &str) -> Box<dyn SaveStorage> {
    #[cfg(not(target_family = "wasm"))]
    {
        Box::new(FileStorage::new(save_dir))
    }

    #[cfg(target_family = "wasm")]
    {
        let _ = save_dir;
        Box::new(LocalStorage)
    }
}

/// Writes the current world under `name`.
///
/// # Returns
/// The number of nodes written.
pub fn save_world(
    storage: &mut dyn SaveStorage,
    name: &str,
    world: &World,
    player: &Player,
) -> Result<usize, SaveError> {
    let data = SaveData::capture(world, player);
    let json = data.to_json()?;
    if json.len() > MAX_SAVE_SIZE {
        return Err(SaveError::TooLarge {
            size: json.len(),
            limit: MAX_SAVE_SIZE,
        });
    }
    storage.write(name, &json)?;
    log::info!("Saved {} nodes to {:?} ({} bytes)", data.nodes.len(), name, json.len());
    Ok(data.nodes.len())
}

/// Replaces the current world with the save stored under `name`.
///
/// Nothing changes unless the whole save is valid.
///
/// # Returns
/// The number of nodes restored.
pub fn load_world(
    storage: &dyn SaveStorage,
    name: &str,
    world: &mut World,
    player: &mut Player,
) -> Result<usize, SaveError> {
    let json = storage.read(name)?;
    let loaded = SaveData::parse(&json)?;
    let restored = loaded.apply(world, player);
    log::info!("Loaded {} nodes from {:?}", restored, name);
    Ok(restored)
}

/// Shows a failure to the user.
///
/// Always logged; in the browser an alert is shown as well.
pub fn report_user_error(message: &str) {
    log::error!("{}", message);

    #[cfg(target_family = "wasm")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
