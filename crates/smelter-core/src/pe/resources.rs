// crates/smelter-core/src/pe/resources.rs

use crate::error::{Result, SmeltError};
use crate::pe::{read_u16, read_u32, skip};

/// Resource type ids (winuser.h RT_* values) the icon path cares about.
pub const RT_ICON: u32 = 3;
pub const RT_GROUP_ICON: u32 = 14;

const SUBDIR_BIT: u32 = 0x8000_0000;

/// One IMAGE_RESOURCE_DIRECTORY_ENTRY, kept as the raw dwords. `name` is an
/// integer id unless its high bit is set (then it points at a UTF-16 name).
/// `offset` points at a subdirectory when its own high bit is set, at a data
/// entry otherwise. Offsets are relative to the resource section start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub name: u32,
    pub offset: u32,
}

impl DirEntry {
    pub fn is_subdirectory(&self) -> bool {
        self.offset & SUBDIR_BIT != 0
    }

    pub fn is_named(&self) -> bool {
        self.name & SUBDIR_BIT != 0
    }

    fn dir_offset(&self) -> u32 {
        self.offset & !SUBDIR_BIT
    }
}

/// Leaf IMAGE_RESOURCE_DATA_ENTRY: where the payload lives in RVA space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEntry {
    pub rva: u32,
    pub size: u32,
    pub code_page: u32,
}

/// Walker over the three-level resource tree (type / id / language) of one
/// image. Only the levels the icon path needs are ever descended.
pub struct ResourceTable<'a> {
    rsrc: &'a [u8],
    types: Vec<DirEntry>,
}

impl<'a> ResourceTable<'a> {
    pub fn parse(rsrc: &'a [u8]) -> Result<Self> {
        let types = dir_entries(rsrc, 0)?;
        Ok(ResourceTable { rsrc, types })
    }

    /// Entries of the root (type) directory.
    pub fn types(&self) -> &[DirEntry] {
        &self.types
    }

    /// Second-level entries (one per resource id) under the given type, or
    /// None when the image carries no resources of that type.
    pub fn id_entries(&self, type_id: u32) -> Result<Option<Vec<DirEntry>>> {
        let Some(entry) = self.types.iter().find(|e| !e.is_named() && e.name == type_id) else {
            return Ok(None);
        };
        if !entry.is_subdirectory() {
            return Err(SmeltError::PeFormat(format!(
                "resource type {type_id} entry is not a directory"
            )));
        }
        Ok(Some(dir_entries(self.rsrc, entry.dir_offset() as usize)?))
    }

    /// Resolve an id-level entry to its data entry. Language subdirectories
    /// are descended exactly one level, taking the first language present.
    pub fn data_entry(&self, entry: DirEntry) -> Result<DataEntry> {
        let leaf = if entry.is_subdirectory() {
            let langs = dir_entries(self.rsrc, entry.dir_offset() as usize)?;
            let first = langs
                .first()
                .ok_or_else(|| SmeltError::PeFormat("empty resource language directory".into()))?;
            if first.is_subdirectory() {
                return Err(SmeltError::PeFormat(
                    "resource tree nested deeper than three levels".into(),
                ));
            }
            *first
        } else {
            entry
        };

        let mut i = leaf.offset as usize;
        let rva = read_u32(self.rsrc, &mut i)?;
        let size = read_u32(self.rsrc, &mut i)?;
        let code_page = read_u32(self.rsrc, &mut i)?;
        Ok(DataEntry { rva, size, code_page })
    }
}

/// Decode one IMAGE_RESOURCE_DIRECTORY at `off`: 12 bytes of metadata we
/// skip, the named/id entry counts, then 8 bytes per entry.
fn dir_entries(rsrc: &[u8], off: usize) -> Result<Vec<DirEntry>> {
    let mut i = off;
    skip(rsrc, &mut i, 12)?;
    let named = read_u16(rsrc, &mut i)? as usize;
    let ids = read_u16(rsrc, &mut i)? as usize;

    let mut entries = Vec::with_capacity(named + ids);
    for _ in 0..named + ids {
        let name = read_u32(rsrc, &mut i)?;
        let offset = read_u32(rsrc, &mut i)?;
        entries.push(DirEntry { name, offset });
    }
    Ok(entries)
}
