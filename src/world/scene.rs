use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use glam::{Quat, Vec3};
use tracing::info;

use crate::assets::blob::read_chunk;
use crate::assets::{AssetError, AssetResult, MeshData, MeshRef};
use super::transform::Transform;

/// One record from the scene blob, before classification.
#[derive(Debug, Clone)]
pub struct SceneEntry {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

#[derive(Debug)]
pub struct SceneData {
    pub entries: Vec<SceneEntry>,
}

const SCENE_RECORD_SIZE: usize = 48;

impl SceneData {
    /// Parse a scene blob: a "str0" string table followed by a "scn0" chunk
    /// of packed 48-byte records {name range, position, rotation, scale}.
    pub fn parse<R: Read>(reader: &mut R) -> AssetResult<Self> {
        let strings = read_chunk(reader, b"str0")?;
        let records = read_chunk(reader, b"scn0")?;

        if records.len() % SCENE_RECORD_SIZE != 0 {
            return Err(AssetError::AssetLoadFailure {
                reason: format!(
                    "scn0 chunk length {} is not a whole number of records",
                    records.len()
                ),
            });
        }

        let mut entries = Vec::with_capacity(records.len() / SCENE_RECORD_SIZE);
        let mut cursor = Cursor::new(&records);
        for _ in 0..records.len() / SCENE_RECORD_SIZE {
            let name_begin = cursor.read_u32::<LittleEndian>()? as usize;
            let name_end = cursor.read_u32::<LittleEndian>()? as usize;

            if !(name_begin <= name_end && name_end <= strings.len()) {
                return Err(AssetError::MalformedSceneData {
                    detail: format!(
                        "name range {}..{} outside string table of {} bytes",
                        name_begin,
                        name_end,
                        strings.len()
                    ),
                });
            }
            let name = std::str::from_utf8(&strings[name_begin..name_end])
                .map_err(|e| AssetError::MalformedSceneData {
                    detail: format!("object name is not UTF-8: {}", e),
                })?
                .to_string();

            let mut floats = [0.0f32; 10];
            for f in floats.iter_mut() {
                *f = cursor.read_f32::<LittleEndian>()?;
            }
            entries.push(SceneEntry {
                name,
                position: Vec3::new(floats[0], floats[1], floats[2]),
                rotation: Quat::from_xyzw(floats[3], floats[4], floats[5], floats[6]),
                scale: Vec3::new(floats[7], floats[8], floats[9]),
            });
        }

        Ok(Self { entries })
    }
}

/// Load and parse the scene blob from disk.
pub fn load_scene(path: &Path) -> AssetResult<SceneData> {
    let mut file = std::fs::File::open(path)?;
    let scene = SceneData::parse(&mut file)?;
    info!("Loaded {} scene entries from {:?}", scene.entries.len(), path);
    Ok(scene)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Dozer,
    Ball,
    Goal,
    Static,
}

/// Infer an object's category from its name. First substring match wins.
pub fn classify(name: &str) -> Category {
    if name.contains("Cylinder") {
        Category::Goal
    } else if name.contains("Ball") {
        Category::Ball
    } else if name.contains("Circle") {
        Category::Dozer
    } else {
        Category::Static
    }
}

#[derive(Debug)]
pub struct SimObject {
    pub name: String,
    pub category: Category,
    pub transform: Transform,
    pub mesh: MeshRef,
    /// Set when a ball scores; retired objects are no longer simulated
    /// or rendered.
    pub retired: bool,
}

/// All simulation objects plus the categorized index lists iterated every
/// frame. Built once at load time; objects are never destroyed, only
/// retired.
#[derive(Debug)]
pub struct World {
    pub objects: Vec<SimObject>,
    pub dozers: Vec<usize>,
    pub balls: Vec<usize>,
    pub goals: Vec<usize>,
    pub statics: Vec<usize>,
}

impl World {
    /// Build render-ready objects from the scene, resolving each entry's
    /// mesh by exact name.
    pub fn from_scene(scene: &SceneData, meshes: &MeshData) -> AssetResult<Self> {
        let mut world = World {
            objects: Vec::with_capacity(scene.entries.len()),
            dozers: Vec::new(),
            balls: Vec::new(),
            goals: Vec::new(),
            statics: Vec::new(),
        };

        for entry in &scene.entries {
            let mesh = meshes.get(&entry.name)?;
            let category = classify(&entry.name);
            let index = world.objects.len();
            match category {
                Category::Dozer => world.dozers.push(index),
                Category::Ball => world.balls.push(index),
                Category::Goal => world.goals.push(index),
                Category::Static => world.statics.push(index),
            }
            world.objects.push(SimObject {
                name: entry.name.clone(),
                category,
                transform: Transform::new(entry.position, entry.rotation, entry.scale),
                mesh,
                retired: false,
            });
        }

        info!(
            "Scene built: {} dozers, {} balls, {} goals, {} statics",
            world.dozers.len(),
            world.balls.len(),
            world.goals.len(),
            world.statics.len()
        );
        Ok(world)
    }

    /// Drop retired balls from the active list. Called between frames,
    /// never while a collision pass is iterating.
    pub fn sweep_retired(&mut self) {
        let objects = &self.objects;
        self.balls.retain(|&index| !objects[index].retired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(magic: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(magic);
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn scene_record(name_begin: u32, name_end: u32) -> Vec<u8> {
        let mut record = Vec::new();
        record.extend_from_slice(&name_begin.to_le_bytes());
        record.extend_from_slice(&name_end.to_le_bytes());
        let floats: [f32; 10] = [
            1.0, 2.0, 3.0, // position
            0.0, 0.0, 0.0, 1.0, // rotation
            1.0, 1.0, 1.0, // scale
        ];
        for f in floats {
            record.extend_from_slice(&f.to_le_bytes());
        }
        record
    }

    fn mesh_data_for(names: &[&str]) -> MeshData {
        let mut strings = Vec::new();
        let mut index = Vec::new();
        for name in names {
            let begin = strings.len() as u32;
            strings.extend_from_slice(name.as_bytes());
            let end = strings.len() as u32;
            for field in [begin, end, 0u32, 3u32] {
                index.extend_from_slice(&field.to_le_bytes());
            }
        }
        let mut vertices = Vec::new();
        for _ in 0..3 {
            for f in [0.0f32; 6] {
                vertices.extend_from_slice(&f.to_le_bytes());
            }
        }
        let mut blob = chunk(b"str0", &strings);
        blob.extend(chunk(b"msh0", &index));
        blob.extend(chunk(b"vtx0", &vertices));
        MeshData::parse(&mut std::io::Cursor::new(blob)).unwrap()
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(classify("GoalCylinder.001"), Category::Goal);
        assert_eq!(classify("Ball.002"), Category::Ball);
        assert_eq!(classify("Circle"), Category::Dozer);
        assert_eq!(classify("Floor"), Category::Static);
        // first match wins
        assert_eq!(classify("CylinderBall"), Category::Goal);
        assert_eq!(classify("BallCircle"), Category::Ball);
    }

    #[test]
    fn test_parse_scene() {
        let mut blob = chunk(b"str0", b"Ball");
        blob.extend(chunk(b"scn0", &scene_record(0, 4)));
        let scene = SceneData::parse(&mut std::io::Cursor::new(blob)).unwrap();
        assert_eq!(scene.entries.len(), 1);
        let entry = &scene.entries[0];
        assert_eq!(entry.name, "Ball");
        assert_eq!(entry.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(entry.rotation, Quat::IDENTITY);
        assert_eq!(entry.scale, Vec3::ONE);
    }

    #[test]
    fn test_name_range_out_of_bounds() {
        let mut blob = chunk(b"str0", b"Ball");
        blob.extend(chunk(b"scn0", &scene_record(0, 9)));
        let err = SceneData::parse(&mut std::io::Cursor::new(blob)).unwrap_err();
        assert!(matches!(err, AssetError::MalformedSceneData { .. }));
    }

    #[test]
    fn test_name_range_inverted() {
        let mut blob = chunk(b"str0", b"Ball");
        blob.extend(chunk(b"scn0", &scene_record(3, 1)));
        let err = SceneData::parse(&mut std::io::Cursor::new(blob)).unwrap_err();
        assert!(matches!(err, AssetError::MalformedSceneData { .. }));
    }

    #[test]
    fn test_world_from_scene() {
        let meshes = mesh_data_for(&["Ball", "Circle", "Cylinder", "Floor"]);
        let entries = ["Ball", "Circle", "Cylinder", "Floor"]
            .iter()
            .map(|name| SceneEntry {
                name: name.to_string(),
                position: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            })
            .collect();
        let world = World::from_scene(&SceneData { entries }, &meshes).unwrap();
        assert_eq!(world.objects.len(), 4);
        assert_eq!(world.balls, vec![0]);
        assert_eq!(world.dozers, vec![1]);
        assert_eq!(world.goals, vec![2]);
        assert_eq!(world.statics, vec![3]);
    }

    #[test]
    fn test_world_unknown_mesh() {
        let meshes = mesh_data_for(&["Ball"]);
        let entries = vec![SceneEntry {
            name: "Circle".to_string(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }];
        let err = World::from_scene(&SceneData { entries }, &meshes).unwrap_err();
        assert!(matches!(err, AssetError::UnknownMesh { name } if name == "Circle"));
    }

    #[test]
    fn test_sweep_retired() {
        let meshes = mesh_data_for(&["Ball", "Ball2Ball"]);
        let entries = ["Ball", "Ball2Ball"]
            .iter()
            .map(|name| SceneEntry {
                name: name.to_string(),
                position: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            })
            .collect();
        let mut world = World::from_scene(&SceneData { entries }, &meshes).unwrap();
        assert_eq!(world.balls.len(), 2);
        world.objects[0].retired = true;
        world.sweep_retired();
        assert_eq!(world.balls, vec![1]);
        // objects themselves are never destroyed
        assert_eq!(world.objects.len(), 2);
    }
}
