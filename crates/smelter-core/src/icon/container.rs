// crates/smelter-core/src/icon/container.rs

use crate::icon::group::GroupIconEntry;

const HEADER_SIZE: usize = 6;
const DIR_ENTRY_SIZE: usize = 16;

/// Assemble a standalone .ico byte stream from group entries and their raw
/// image blobs.
/// Layout (little-endian):
/// reserved:u16 (0)
/// type:u16     (1 = icon)
/// count:u16
/// entries: repeated { width:u8 height:u8 color_count:u8 reserved:u8
///                     planes:u16 bit_count:u16 size:u32 offset:u32 }
/// then the image blobs back to back, verbatim.
pub fn build(images: &[(GroupIconEntry, &[u8])]) -> Vec<u8> {
    let total: usize = images.iter().map(|(_, data)| data.len()).sum();
    let mut out = Vec::with_capacity(HEADER_SIZE + DIR_ENTRY_SIZE * images.len() + total);

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&(images.len() as u16).to_le_bytes());

    let mut offset = (HEADER_SIZE + DIR_ENTRY_SIZE * images.len()) as u32;
    for (entry, data) in images {
        out.push(entry.width);
        out.push(entry.height);
        out.push(entry.color_count);
        out.push(entry.reserved);
        out.extend_from_slice(&entry.planes.to_le_bytes());
        out.extend_from_slice(&entry.bit_count.to_le_bytes());
        // Size follows the stored blob; group directories occasionally carry
        // a stale bytes_in_res.
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        offset += data.len() as u32;
    }

    for (_, data) in images {
        out.extend_from_slice(data);
    }

    out
}
