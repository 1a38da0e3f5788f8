pub mod image;
pub mod resources;

pub use image::{PeImage, SectionHeader};
pub use resources::{DataEntry, DirEntry, ResourceTable, RT_GROUP_ICON, RT_ICON};

use crate::error::{Result, SmeltError};

// Little-endian cursor reads shared by the header and resource walkers.

pub(crate) fn need(bytes: &[u8], i: usize, n: usize) -> Result<()> {
    if bytes.len() < i + n {
        return Err(SmeltError::PeFormat("unexpected eof".into()));
    }
    Ok(())
}

pub(crate) fn skip(bytes: &[u8], i: &mut usize, n: usize) -> Result<()> {
    need(bytes, *i, n)?;
    *i += n;
    Ok(())
}

pub(crate) fn read_u16(bytes: &[u8], i: &mut usize) -> Result<u16> {
    need(bytes, *i, 2)?;
    let v = u16::from_le_bytes(bytes[*i..*i + 2].try_into().unwrap());
    *i += 2;
    Ok(v)
}

pub(crate) fn read_u32(bytes: &[u8], i: &mut usize) -> Result<u32> {
    need(bytes, *i, 4)?;
    let v = u32::from_le_bytes(bytes[*i..*i + 4].try_into().unwrap());
    *i += 4;
    Ok(v)
}
