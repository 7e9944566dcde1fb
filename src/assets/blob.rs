//! Chunked binary container format shared by the mesh and scene assets.
//! A chunk is a 4-byte magic followed by a little-endian u32 payload length
//! and the payload bytes.

use std::io::Read;
use byteorder::{LittleEndian, ReadBytesExt};

use super::{AssetError, AssetResult};

/// Read one chunk, checking its magic, and return the payload.
pub fn read_chunk<R: Read>(reader: &mut R, magic: &[u8; 4]) -> AssetResult<Vec<u8>> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;
    if &header != magic {
        return Err(AssetError::AssetLoadFailure {
            reason: format!(
                "expected chunk \"{}\", found \"{}\"",
                String::from_utf8_lossy(magic),
                String::from_utf8_lossy(&header),
            ),
        });
    }

    let length = reader.read_u32::<LittleEndian>()? as usize;
    let mut payload = vec![0u8; length];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}
