// crates/smelter-core/src/icon/group.rs

use crate::error::{Result, SmeltError};

/// ICONDIR/GRPICONDIR type tag for icons (cursors use 2).
const RES_TYPE_ICON: u16 = 1;

/// One GRPICONDIRENTRY: the geometry a group directory advertises for an
/// image, plus the RT_ICON resource id that holds its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupIconEntry {
    pub width: u8,
    pub height: u8,
    pub color_count: u8,
    pub reserved: u8,
    pub planes: u16,
    pub bit_count: u16,
    pub bytes_in_res: u32,
    pub id: u16,
}

impl GroupIconEntry {
    /// Pixel width; the stored byte uses 0 to mean 256.
    pub fn pixel_width(&self) -> u32 {
        if self.width == 0 { 256 } else { self.width as u32 }
    }

    pub fn pixel_height(&self) -> u32 {
        if self.height == 0 { 256 } else { self.height as u32 }
    }
}

/// Parsed GRPICONDIR resource, the blob an RT_GROUP_ICON entry points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIconDir {
    pub entries: Vec<GroupIconEntry>,
}

/// Decode a GRPICONDIR blob.
/// Layout (little-endian):
/// reserved:u16 (0)
/// type:u16     (1 = icon)
/// count:u16
/// entries: repeated { width:u8 height:u8 color_count:u8 reserved:u8
///                     planes:u16 bit_count:u16 bytes_in_res:u32 id:u16 }
pub fn decode(bytes: &[u8]) -> Result<GroupIconDir> {
    let mut i = 0usize;
    let reserved = read_u16(bytes, &mut i)?;
    let res_type = read_u16(bytes, &mut i)?;
    if reserved != 0 || res_type != RES_TYPE_ICON {
        return Err(SmeltError::IconFormat(format!(
            "invalid group icon header (reserved={reserved}, type={res_type})"
        )));
    }

    let count = read_u16(bytes, &mut i)? as usize;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let width = read_u8(bytes, &mut i)?;
        let height = read_u8(bytes, &mut i)?;
        let color_count = read_u8(bytes, &mut i)?;
        let reserved = read_u8(bytes, &mut i)?;
        let planes = read_u16(bytes, &mut i)?;
        let bit_count = read_u16(bytes, &mut i)?;
        let bytes_in_res = read_u32(bytes, &mut i)?;
        let id = read_u16(bytes, &mut i)?;
        entries.push(GroupIconEntry {
            width,
            height,
            color_count,
            reserved,
            planes,
            bit_count,
            bytes_in_res,
            id,
        });
    }

    Ok(GroupIconDir { entries })
}

fn need(bytes: &[u8], i: usize, n: usize) -> Result<()> {
    if bytes.len() < i + n {
        return Err(SmeltError::IconFormat("unexpected eof in group icon directory".into()));
    }
    Ok(())
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8> {
    need(bytes, *i, 1)?;
    let v = bytes[*i];
    *i += 1;
    Ok(v)
}

fn read_u16(bytes: &[u8], i: &mut usize) -> Result<u16> {
    need(bytes, *i, 2)?;
    let v = u16::from_le_bytes(bytes[*i..*i + 2].try_into().unwrap());
    *i += 2;
    Ok(v)
}

fn read_u32(bytes: &[u8], i: &mut usize) -> Result<u32> {
    need(bytes, *i, 4)?;
    let v = u32::from_le_bytes(bytes[*i..*i + 4].try_into().unwrap());
    *i += 4;
    Ok(v)
}
