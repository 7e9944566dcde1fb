use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::info;
use wgpu::util::DeviceExt;
use wgpu::BufferUsages;

use super::blob::read_chunk;
use super::{AssetError, AssetResult};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;

        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A named range of vertices inside the shared vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRef {
    pub vertex_begin: u32,
    pub vertex_count: u32,
}

const INDEX_RECORD_SIZE: usize = 16;
const VERTEX_SIZE: usize = 24;

/// Parsed mesh library contents. Carries no GPU state so it can be built
/// and inspected without a device; upload happens once via [`MeshLibrary`].
#[derive(Debug)]
pub struct MeshData {
    vertices: Vec<Vertex>,
    ranges: HashMap<String, MeshRef>,
}

impl MeshData {
    /// Parse a mesh blob: a "str0" string table, a "msh0" index of
    /// {name_begin, name_end, vertex_begin, vertex_count} records, and a
    /// "vtx0" chunk of packed position+normal vertices.
    pub fn parse<R: Read>(reader: &mut R) -> AssetResult<Self> {
        let strings = read_chunk(reader, b"str0")?;
        let index = read_chunk(reader, b"msh0")?;
        let vertex_bytes = read_chunk(reader, b"vtx0")?;

        if index.len() % INDEX_RECORD_SIZE != 0 {
            return Err(AssetError::AssetLoadFailure {
                reason: format!("msh0 chunk length {} is not a whole number of records", index.len()),
            });
        }
        if vertex_bytes.len() % VERTEX_SIZE != 0 {
            return Err(AssetError::AssetLoadFailure {
                reason: format!("vtx0 chunk length {} is not a whole number of vertices", vertex_bytes.len()),
            });
        }

        let mut vertices = Vec::with_capacity(vertex_bytes.len() / VERTEX_SIZE);
        let mut cursor = Cursor::new(&vertex_bytes);
        for _ in 0..vertex_bytes.len() / VERTEX_SIZE {
            let mut position = [0.0f32; 3];
            let mut normal = [0.0f32; 3];
            for p in position.iter_mut() {
                *p = cursor.read_f32::<LittleEndian>()?;
            }
            for n in normal.iter_mut() {
                *n = cursor.read_f32::<LittleEndian>()?;
            }
            vertices.push(Vertex { position, normal });
        }

        let mut ranges = HashMap::new();
        let mut cursor = Cursor::new(&index);
        for _ in 0..index.len() / INDEX_RECORD_SIZE {
            let name_begin = cursor.read_u32::<LittleEndian>()? as usize;
            let name_end = cursor.read_u32::<LittleEndian>()? as usize;
            let vertex_begin = cursor.read_u32::<LittleEndian>()?;
            let vertex_count = cursor.read_u32::<LittleEndian>()?;

            if !(name_begin <= name_end && name_end <= strings.len()) {
                return Err(AssetError::AssetLoadFailure {
                    reason: format!(
                        "mesh name range {}..{} outside string table of {} bytes",
                        name_begin, name_end, strings.len()
                    ),
                });
            }
            let name = std::str::from_utf8(&strings[name_begin..name_end])
                .map_err(|e| AssetError::AssetLoadFailure {
                    reason: format!("mesh name is not UTF-8: {}", e),
                })?
                .to_string();

            let end = vertex_begin as usize + vertex_count as usize;
            if end > vertices.len() {
                return Err(AssetError::AssetLoadFailure {
                    reason: format!(
                        "mesh \"{}\" vertex range {}..{} exceeds {} vertices",
                        name, vertex_begin, end, vertices.len()
                    ),
                });
            }

            ranges.insert(name, MeshRef { vertex_begin, vertex_count });
        }

        Ok(Self { vertices, ranges })
    }

    pub fn get(&self, name: &str) -> AssetResult<MeshRef> {
        self.ranges
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::UnknownMesh { name: name.to_string() })
    }

    pub fn mesh_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Load and parse the mesh blob from disk.
pub fn load_mesh_data(path: &Path) -> AssetResult<MeshData> {
    let mut file = std::fs::File::open(path)?;
    let data = MeshData::parse(&mut file)?;
    info!(
        "Loaded {} meshes ({} vertices) from {:?}",
        data.mesh_count(),
        data.vertex_count(),
        path
    );
    Ok(data)
}

/// The mesh library after GPU upload: one shared vertex buffer plus the
/// name-to-range index.
pub struct MeshLibrary {
    data: MeshData,
    pub vertex_buffer: wgpu::Buffer,
}

impl MeshLibrary {
    pub fn upload(device: &wgpu::Device, data: MeshData) -> Self {
        info!("Uploading {} mesh vertices to the GPU", data.vertex_count());
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Library Vertex Buffer"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: BufferUsages::VERTEX,
        });
        Self { data, vertex_buffer }
    }

    pub fn get(&self, name: &str) -> AssetResult<MeshRef> {
        self.data.get(name)
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

    fn triangle_vertices() -> Vec<u8> {
        let mut payload = Vec::new();
        let verts: [[f32; 6]; 3] = [
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        ];
        for v in verts {
            for f in v {
                payload.extend_from_slice(&f.to_le_bytes());
            }
        }
        payload
    }

    fn index_record(name_begin: u32, name_end: u32, vertex_begin: u32, vertex_count: u32) -> Vec<u8> {
        let mut record = Vec::new();
        for field in [name_begin, name_end, vertex_begin, vertex_count] {
            record.extend_from_slice(&field.to_le_bytes());
        }
        record
    }

    fn mesh_blob() -> Vec<u8> {
        let mut blob = chunk(b"str0", b"Tri");
        blob.extend(chunk(b"msh0", &index_record(0, 3, 0, 3)));
        blob.extend(chunk(b"vtx0", &triangle_vertices()));
        blob
    }

    #[test]
    fn test_parse_and_lookup() {
        let mut reader = std::io::Cursor::new(mesh_blob());
        let data = MeshData::parse(&mut reader).unwrap();
        assert_eq!(data.mesh_count(), 1);
        assert_eq!(data.vertex_count(), 3);
        let mesh = data.get("Tri").unwrap();
        assert_eq!(mesh, MeshRef { vertex_begin: 0, vertex_count: 3 });
    }

    #[test]
    fn test_unknown_mesh() {
        let mut reader = std::io::Cursor::new(mesh_blob());
        let data = MeshData::parse(&mut reader).unwrap();
        let err = data.get("Cube").unwrap_err();
        assert!(matches!(err, AssetError::UnknownMesh { name } if name == "Cube"));
    }

    #[test]
    fn test_bad_name_range() {
        let mut blob = chunk(b"str0", b"Tri");
        blob.extend(chunk(b"msh0", &index_record(0, 99, 0, 3)));
        blob.extend(chunk(b"vtx0", &triangle_vertices()));
        let mut reader = std::io::Cursor::new(blob);
        let err = MeshData::parse(&mut reader).unwrap_err();
        assert!(matches!(err, AssetError::AssetLoadFailure { .. }));
    }

    #[test]
    fn test_vertex_range_out_of_bounds() {
        let mut blob = chunk(b"str0", b"Tri");
        blob.extend(chunk(b"msh0", &index_record(0, 3, 1, 3)));
        blob.extend(chunk(b"vtx0", &triangle_vertices()));
        let mut reader = std::io::Cursor::new(blob);
        let err = MeshData::parse(&mut reader).unwrap_err();
        assert!(matches!(err, AssetError::AssetLoadFailure { .. }));
    }

    #[test]
    fn test_missing_chunk() {
        let blob = chunk(b"str0", b"Tri");
        let mut reader = std::io::Cursor::new(blob);
        let err = MeshData::parse(&mut reader).unwrap_err();
        assert!(matches!(err, AssetError::AssetLoadFailure { .. }));
    }
}
