//! Synthetic PE images and image blobs shared by the unit and CLI tests.
//! Builders only; the layout arithmetic is written out by hand rather than
//! through the `pe` readers.

use crate::hash;
use crate::icon::info::PNG_SIGNATURE;
use crate::pe::{RT_GROUP_ICON, RT_ICON};

const SUBDIR: u32 = 0x8000_0000;
const RSRC_RVA: u32 = 0x1000;
const RSRC_FILE_OFF: usize = 0x200;

/// One image of a fixture icon group: the geometry the group directory will
/// advertise, the RT_ICON id, and the stored blob.
pub struct FixtureImage {
    pub id: u16,
    pub width: u8,
    pub height: u8,
    pub bit_count: u16,
    pub data: Vec<u8>,
}

/// Two icon groups: group 1 carries a PNG entry and a DIB entry, group 2 a
/// single larger DIB. Group ids are 1 and 2, image ids 1 through 3.
pub fn two_group_exe() -> Vec<u8> {
    build_exe(&two_groups())
}

/// The same two groups wrapped in a PE32+ (0x20B, x86-64) shell.
pub fn two_group_exe_pe32_plus() -> Vec<u8> {
    assemble(build_rsrc(&two_groups()), true, 0x020B)
}

fn two_groups() -> Vec<(u32, Vec<FixtureImage>)> {
    vec![
        (
            1,
            vec![
                FixtureImage { id: 1, width: 16, height: 16, bit_count: 32, data: tiny_png(16, 16) },
                FixtureImage { id: 2, width: 16, height: 16, bit_count: 32, data: tiny_dib(16, 16, 32) },
            ],
        ),
        (
            2,
            vec![FixtureImage { id: 3, width: 32, height: 32, bit_count: 32, data: tiny_dib(32, 32, 32) }],
        ),
    ]
}

/// Valid PE with the icon groups described by `groups`: one RT_GROUP_ICON
/// resource per `(group_id, images)` pair plus one RT_ICON resource per
/// image, all behind single-language directories.
pub fn build_exe(groups: &[(u32, Vec<FixtureImage>)]) -> Vec<u8> {
    assemble(build_rsrc(groups), true, 0x010B)
}

/// Valid PE whose data directory advertises no resource section at all.
pub fn no_resource_exe() -> Vec<u8> {
    assemble(Vec::new(), false, 0x010B)
}

/// Valid PE with a resource section whose root directory is empty.
pub fn no_icons_exe() -> Vec<u8> {
    assemble(vec![0u8; 16], true, 0x010B)
}

/// Minimal PNG stream: signature, IHDR (8-bit RGBA), a token IDAT, IEND.
/// The pixel payload is never decoded by anything in this workspace.
pub fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // color type: truecolor with alpha
    ihdr.push(0); // compression
    ihdr.push(0); // filter
    ihdr.push(0); // interlace
    push_chunk(&mut out, b"IHDR", &ihdr);

    push_chunk(&mut out, b"IDAT", &[0x78, 0x9C, 0x63, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01]);
    push_chunk(&mut out, b"IEND", &[]);
    out
}

/// Minimal icon DIB: a BITMAPINFOHEADER with the doubled height convention
/// and a few filler pixel bytes.
pub fn tiny_dib(width: u32, height: u32, bit_count: u16) -> Vec<u8> {
    let mut out = vec![0u8; 40];
    out[0..4].copy_from_slice(&40u32.to_le_bytes());
    out[4..8].copy_from_slice(&(width as i32).to_le_bytes());
    out[8..12].copy_from_slice(&((height * 2) as i32).to_le_bytes()); // XOR rows + AND mask rows
    out[12..14].copy_from_slice(&1u16.to_le_bytes());
    out[14..16].copy_from_slice(&bit_count.to_le_bytes());
    out.extend_from_slice(&[0xAB; 32]);
    out
}

fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    let mut covered = Vec::with_capacity(4 + data.len());
    covered.extend_from_slice(tag);
    covered.extend_from_slice(data);
    out.extend_from_slice(&hash::crc32(&covered).to_be_bytes());
}

/// Lay out a resource section. Emission order, offsets relative to the
/// section start:
/// root directory (RT_ICON, RT_GROUP_ICON)
/// icon id directory, group id directory
/// one language directory per image, then per group
/// one data entry per image, then per group
/// image blobs, then encoded GRPICONDIR blobs
fn build_rsrc(groups: &[(u32, Vec<FixtureImage>)]) -> Vec<u8> {
    let images: Vec<&FixtureImage> = groups.iter().flat_map(|(_, imgs)| imgs.iter()).collect();
    let n_img = images.len();
    let n_grp = groups.len();

    let group_blobs: Vec<Vec<u8>> = groups.iter().map(|(_, imgs)| encode_group_dir(imgs)).collect();

    let icon_dir_off = 16 + 2 * 8;
    let group_dir_off = icon_dir_off + 16 + 8 * n_img;
    let mut cursor = group_dir_off + 16 + 8 * n_grp;

    let img_lang_off: Vec<usize> = (0..n_img).map(|k| cursor + 24 * k).collect();
    cursor += 24 * n_img;
    let grp_lang_off: Vec<usize> = (0..n_grp).map(|k| cursor + 24 * k).collect();
    cursor += 24 * n_grp;
    let img_entry_off: Vec<usize> = (0..n_img).map(|k| cursor + 16 * k).collect();
    cursor += 16 * n_img;
    let grp_entry_off: Vec<usize> = (0..n_grp).map(|k| cursor + 16 * k).collect();
    cursor += 16 * n_grp;

    let mut img_blob_off = Vec::with_capacity(n_img);
    for img in &images {
        img_blob_off.push(cursor);
        cursor += img.data.len();
    }
    let mut grp_blob_off = Vec::with_capacity(n_grp);
    for blob in &group_blobs {
        grp_blob_off.push(cursor);
        cursor += blob.len();
    }

    let mut out = Vec::with_capacity(cursor);

    push_dir_header(&mut out, 2);
    push_dir_entry(&mut out, RT_ICON, icon_dir_off as u32 | SUBDIR);
    push_dir_entry(&mut out, RT_GROUP_ICON, group_dir_off as u32 | SUBDIR);

    debug_assert_eq!(out.len(), icon_dir_off);
    push_dir_header(&mut out, n_img as u16);
    for (k, img) in images.iter().enumerate() {
        push_dir_entry(&mut out, u32::from(img.id), img_lang_off[k] as u32 | SUBDIR);
    }

    debug_assert_eq!(out.len(), group_dir_off);
    push_dir_header(&mut out, n_grp as u16);
    for (k, (gid, _)) in groups.iter().enumerate() {
        push_dir_entry(&mut out, *gid, grp_lang_off[k] as u32 | SUBDIR);
    }

    // Language level: a single en-US entry pointing at the data entry.
    for k in 0..n_img {
        debug_assert_eq!(out.len(), img_lang_off[k]);
        push_dir_header(&mut out, 1);
        push_dir_entry(&mut out, 0x0409, img_entry_off[k] as u32);
    }
    for k in 0..n_grp {
        debug_assert_eq!(out.len(), grp_lang_off[k]);
        push_dir_header(&mut out, 1);
        push_dir_entry(&mut out, 0x0409, grp_entry_off[k] as u32);
    }

    for (k, img) in images.iter().enumerate() {
        debug_assert_eq!(out.len(), img_entry_off[k]);
        push_data_entry(&mut out, RSRC_RVA + img_blob_off[k] as u32, img.data.len() as u32);
    }
    for (k, blob) in group_blobs.iter().enumerate() {
        debug_assert_eq!(out.len(), grp_entry_off[k]);
        push_data_entry(&mut out, RSRC_RVA + grp_blob_off[k] as u32, blob.len() as u32);
    }

    for img in &images {
        out.extend_from_slice(&img.data);
    }
    for blob in &group_blobs {
        out.extend_from_slice(blob);
    }

    out
}

fn push_dir_header(out: &mut Vec<u8>, id_count: u16) {
    out.extend_from_slice(&[0u8; 12]); // characteristics, timestamp, versions
    out.extend_from_slice(&0u16.to_le_bytes()); // named entries
    out.extend_from_slice(&id_count.to_le_bytes());
}

fn push_dir_entry(out: &mut Vec<u8>, name: u32, offset: u32) {
    out.extend_from_slice(&name.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());
}

fn push_data_entry(out: &mut Vec<u8>, rva: u32, size: u32) {
    out.extend_from_slice(&rva.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // code page
    out.extend_from_slice(&0u32.to_le_bytes()); // reserved
}

fn encode_group_dir(imgs: &[FixtureImage]) -> Vec<u8> {
    let mut b = Vec::with_capacity(6 + 14 * imgs.len());
    b.extend_from_slice(&0u16.to_le_bytes());
    b.extend_from_slice(&1u16.to_le_bytes());
    b.extend_from_slice(&(imgs.len() as u16).to_le_bytes());
    for img in imgs {
        b.push(img.width);
        b.push(img.height);
        b.push(0); // color count
        b.push(0); // reserved
        b.extend_from_slice(&1u16.to_le_bytes()); // planes
        b.extend_from_slice(&img.bit_count.to_le_bytes());
        b.extend_from_slice(&(img.data.len() as u32).to_le_bytes());
        b.extend_from_slice(&img.id.to_le_bytes());
    }
    b
}

/// Wrap a resource section in a one-section PE image whose optional header
/// follows `magic` (0x010B PE32, 0x020B PE32+). Headers occupy the first
/// 0x200 bytes of the file; the section lands at RVA 0x1000.
fn assemble(rsrc: Vec<u8>, advertise: bool, magic: u16) -> Vec<u8> {
    let plus = magic == 0x020B;
    let (machine, opt_size): (u16, usize) = if plus { (0x8664, 240) } else { (0x014C, 224) };

    let mut out = vec![0u8; 0x40];
    out[0] = b'M';
    out[1] = b'Z';
    out[0x3C..0x40].copy_from_slice(&0x40u32.to_le_bytes());

    out.extend_from_slice(b"PE\0\0");

    // COFF file header: one section, optional header sized per the magic.
    out.extend_from_slice(&machine.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(&(opt_size as u16).to_le_bytes());
    out.extend_from_slice(&0x0102u16.to_le_bytes());

    let mut opt = vec![0u8; opt_size];
    opt[0..2].copy_from_slice(&magic.to_le_bytes());
    if plus {
        opt[24..32].copy_from_slice(&0x0001_4000_0000u64.to_le_bytes()); // image base
    } else {
        opt[28..32].copy_from_slice(&0x0040_0000u32.to_le_bytes()); // image base
    }
    opt[32..36].copy_from_slice(&0x1000u32.to_le_bytes()); // section alignment
    opt[36..40].copy_from_slice(&0x200u32.to_le_bytes()); // file alignment
    let size_of_image = 0x1000 + align_up(rsrc.len(), 0x1000);
    opt[56..60].copy_from_slice(&(size_of_image as u32).to_le_bytes());
    opt[60..64].copy_from_slice(&0x200u32.to_le_bytes()); // size of headers
    // Directory count dword, then entry 2 (resource) of the directory array.
    let count = if plus { 108 } else { 92 };
    opt[count..count + 4].copy_from_slice(&16u32.to_le_bytes());
    if advertise {
        let dir2 = count + 4 + 8 * 2;
        opt[dir2..dir2 + 4].copy_from_slice(&RSRC_RVA.to_le_bytes());
        opt[dir2 + 4..dir2 + 8].copy_from_slice(&(rsrc.len() as u32).to_le_bytes());
    }
    out.extend_from_slice(&opt);

    // .rsrc section header.
    let mut sect = [0u8; 40];
    sect[0..5].copy_from_slice(b".rsrc");
    sect[8..12].copy_from_slice(&(rsrc.len() as u32).to_le_bytes());
    sect[12..16].copy_from_slice(&RSRC_RVA.to_le_bytes());
    sect[16..20].copy_from_slice(&(align_up(rsrc.len(), 0x200) as u32).to_le_bytes());
    sect[20..24].copy_from_slice(&(RSRC_FILE_OFF as u32).to_le_bytes());
    sect[36..40].copy_from_slice(&0x4000_0040u32.to_le_bytes()); // initialized data, readable
    out.extend_from_slice(&sect);

    out.resize(RSRC_FILE_OFF, 0);
    out.extend_from_slice(&rsrc);
    let end = align_up(out.len(), 0x200);
    out.resize(end, 0);
    out
}

fn align_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}
