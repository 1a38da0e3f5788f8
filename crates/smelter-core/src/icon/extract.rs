// crates/smelter-core/src/icon/extract.rs

use crate::error::{Result, SmeltError};
use crate::icon::container;
use crate::icon::group::{self, GroupIconDir, GroupIconEntry};
use crate::pe::{DirEntry, PeImage, ResourceTable, RT_GROUP_ICON, RT_ICON};

/// Icon extraction session over one PE image. Construction parses the header
/// chain and locates the icon resources; the accessors then work off borrowed
/// slices of the original bytes.
pub struct IconExtractor<'a> {
    image: PeImage<'a>,
    table: ResourceTable<'a>,
    groups: Vec<DirEntry>,
    icons: Vec<DirEntry>,
}

impl<'a> IconExtractor<'a> {
    /// Fails with `NoIcons` when the file has no resource section or no
    /// RT_GROUP_ICON type. Individual RT_ICON entries are only resolved when
    /// a group is actually exported.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let image = PeImage::parse(data)?;
        let table = ResourceTable::parse(image.resource_slice()?)?;
        let groups = table
            .id_entries(RT_GROUP_ICON)?
            .ok_or_else(|| SmeltError::NoIcons("file has no group icon resources".into()))?;
        let icons = table.id_entries(RT_ICON)?.unwrap_or_default();
        Ok(IconExtractor { image, table, groups, icons })
    }

    /// Group icon directory entries in resource-table order, raw dwords and
    /// all. These are the pairs the listing prints: `name` carries the group
    /// id, `offset` still carries the subdirectory bit.
    pub fn group_icons(&self) -> &[DirEntry] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn machine(&self) -> u16 {
        self.image.machine()
    }

    /// Reconstruct group `num` as a standalone .ico byte stream.
    pub fn get_icon(&self, num: usize) -> Result<Vec<u8>> {
        let images = self.image_entries(num)?;
        Ok(container::build(&images))
    }

    /// The directory entries of group `num`, each paired with its raw image
    /// blob from the matching RT_ICON resource.
    pub fn image_entries(&self, num: usize) -> Result<Vec<(GroupIconEntry, &'a [u8])>> {
        let dir = self.group_dir(num)?;
        let mut images = Vec::with_capacity(dir.entries.len());
        for entry in dir.entries {
            let data = self.icon_data(entry.id)?;
            images.push((entry, data));
        }
        Ok(images)
    }

    fn group_dir(&self, num: usize) -> Result<GroupIconDir> {
        let entry = self.groups.get(num).ok_or_else(|| {
            SmeltError::IconFormat(format!(
                "group icon index {num} out of range (have {})",
                self.groups.len()
            ))
        })?;
        let data = self.resource_bytes(*entry)?;
        group::decode(data)
    }

    fn icon_data(&self, id: u16) -> Result<&'a [u8]> {
        let entry = self
            .icons
            .iter()
            .find(|e| !e.is_named() && e.name == u32::from(id))
            .ok_or_else(|| {
                SmeltError::IconFormat(format!(
                    "icon resource {id} referenced by group but not present"
                ))
            })?;
        self.resource_bytes(*entry)
    }

    fn resource_bytes(&self, entry: DirEntry) -> Result<&'a [u8]> {
        let leaf = self.table.data_entry(entry)?;
        self.image.slice_at_rva(leaf.rva, leaf.size)
    }
}
