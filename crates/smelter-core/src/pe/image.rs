// crates/smelter-core/src/pe/image.rs

use crate::error::{Result, SmeltError};
use crate::pe::{need, read_u16, read_u32, skip};

const DOS_MAGIC: &[u8; 2] = b"MZ";
const PE_MAGIC: &[u8; 4] = b"PE\0\0";

const OPT_MAGIC_PE32: u16 = 0x010B;
const OPT_MAGIC_PE32_PLUS: u16 = 0x020B;

/// Index of the resource table in the optional header's data directory.
const DIR_ENTRY_RESOURCE: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct SectionHeader {
    pub name: [u8; 8],
    pub virtual_size: u32,
    pub virtual_address: u32,
    pub size_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
}

/// Parsed view over one PE image: just enough of the header chain to map
/// RVAs through the section table and locate the resource directory.
/// Layout walked (all little-endian):
/// DOS header: "MZ", e_lfanew:u32 at 0x3C
/// "PE\0\0" at e_lfanew
/// COFF: machine:u16 sections:u16 [12 skipped] opt_size:u16 characteristics:u16
/// optional header: magic:u16 (0x10B or 0x20B) decides where the data
/// directory sits; entry 2 is { resource_rva:u32, resource_size:u32 }
/// section table right after the optional header, 40 bytes per section
pub struct PeImage<'a> {
    data: &'a [u8],
    machine: u16,
    sections: Vec<SectionHeader>,
    resource_dir: Option<(u32, u32)>,
}

impl<'a> PeImage<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < 0x40 || &data[0..2] != DOS_MAGIC {
            return Err(SmeltError::PeFormat("missing MZ signature".into()));
        }
        let mut i = 0x3C;
        let e_lfanew = read_u32(data, &mut i)? as usize;
        need(data, e_lfanew, 4)?;
        if &data[e_lfanew..e_lfanew + 4] != PE_MAGIC {
            return Err(SmeltError::PeFormat("missing PE signature".into()));
        }

        let mut i = e_lfanew + 4;
        let machine = read_u16(data, &mut i)?;
        let num_sections = read_u16(data, &mut i)? as usize;
        skip(data, &mut i, 12)?; // timestamp, symbol table pointer, symbol count
        let opt_size = read_u16(data, &mut i)? as usize;
        skip(data, &mut i, 2)?; // characteristics

        let opt_start = i;
        let mut i = opt_start;
        let opt_magic = read_u16(data, &mut i)?;
        let (count_off, dirs_off) = match opt_magic {
            OPT_MAGIC_PE32 => (92usize, 96usize),
            OPT_MAGIC_PE32_PLUS => (108usize, 112usize),
            other => {
                return Err(SmeltError::PeFormat(format!(
                    "unknown optional header magic 0x{other:04x}"
                )))
            }
        };

        let mut resource_dir = None;
        if opt_size >= dirs_off + 8 * (DIR_ENTRY_RESOURCE + 1) {
            let mut i = opt_start + count_off;
            let dir_count = read_u32(data, &mut i)? as usize;
            if dir_count > DIR_ENTRY_RESOURCE {
                let mut i = opt_start + dirs_off + 8 * DIR_ENTRY_RESOURCE;
                let rva = read_u32(data, &mut i)?;
                let size = read_u32(data, &mut i)?;
                if rva != 0 && size != 0 {
                    resource_dir = Some((rva, size));
                }
            }
        }

        // Section table sits right after the optional header.
        let mut i = opt_start + opt_size;
        let mut sections = Vec::with_capacity(num_sections);
        for _ in 0..num_sections {
            need(data, i, 40)?;
            let mut name = [0u8; 8];
            name.copy_from_slice(&data[i..i + 8]);
            i += 8;
            let virtual_size = read_u32(data, &mut i)?;
            let virtual_address = read_u32(data, &mut i)?;
            let size_of_raw_data = read_u32(data, &mut i)?;
            let pointer_to_raw_data = read_u32(data, &mut i)?;
            skip(data, &mut i, 16)?; // relocations, line numbers, characteristics
            sections.push(SectionHeader {
                name,
                virtual_size,
                virtual_address,
                size_of_raw_data,
                pointer_to_raw_data,
            });
        }

        Ok(PeImage { data, machine, sections, resource_dir })
    }

    pub fn machine(&self) -> u16 {
        self.machine
    }

    pub fn sections(&self) -> &[SectionHeader] {
        &self.sections
    }

    /// Map an RVA to a file offset through the section table.
    pub fn rva_to_offset(&self, rva: u32) -> Result<usize> {
        for s in &self.sections {
            let span = s.virtual_size.max(s.size_of_raw_data);
            if rva >= s.virtual_address && rva - s.virtual_address < span {
                let delta = rva - s.virtual_address;
                if delta >= s.size_of_raw_data {
                    return Err(SmeltError::PeFormat(format!(
                        "rva 0x{rva:x} falls in a zero-fill region"
                    )));
                }
                let off = s.pointer_to_raw_data as usize + delta as usize;
                if off >= self.data.len() {
                    return Err(SmeltError::PeFormat(format!(
                        "rva 0x{rva:x} maps past end of file"
                    )));
                }
                return Ok(off);
            }
        }
        Err(SmeltError::PeFormat(format!("rva 0x{rva:x} not mapped by any section")))
    }

    /// Borrow `size` bytes of image data starting at `rva`.
    pub fn slice_at_rva(&self, rva: u32, size: u32) -> Result<&'a [u8]> {
        let off = self.rva_to_offset(rva)?;
        let end = off + size as usize;
        if end > self.data.len() {
            return Err(SmeltError::PeFormat(format!(
                "resource data at rva 0x{rva:x} truncated"
            )));
        }
        Ok(&self.data[off..end])
    }

    /// The raw resource section. Directory offsets inside the resource tree
    /// are relative to the start of this slice.
    pub fn resource_slice(&self) -> Result<&'a [u8]> {
        let (rva, size) = self
            .resource_dir
            .ok_or_else(|| SmeltError::NoIcons("file has no resource section".into()))?;
        let off = self.rva_to_offset(rva)?;
        let end = (off + size as usize).min(self.data.len());
        Ok(&self.data[off..end])
    }
}
