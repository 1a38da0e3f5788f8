// crates/smelter-core/src/icon/info.rs

use crate::error::{Result, SmeltError};
use crate::hash;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Storage format of one image blob inside an icon resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// PNG stream (Vista-style compressed entries).
    Png,
    /// Classic device-independent bitmap (BITMAPINFOHEADER + pixels + mask).
    Dib,
}

impl ImageKind {
    pub fn label(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Dib => "dib",
        }
    }
}

/// Probed facts about one image blob: enough for an inspect listing without
/// decoding any pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u16,
    pub bytes: usize,
    /// Truncated blake3 of the blob (hex). Identical blobs shared between
    /// groups get identical ids.
    pub content_id: String,
    /// PNG only: whether the IHDR chunk checksum verified. Always true for
    /// DIBs, which carry no checksum.
    pub checksum_ok: bool,
}

/// Probe an image blob. PNG streams are identified by signature and read
/// through IHDR; anything else is treated as a DIB.
pub fn probe(data: &[u8]) -> Result<ImageInfo> {
    let content_id = hash::hex16(&hash::blake3_16(data));

    if data.starts_with(&PNG_SIGNATURE) {
        let (width, height, bit_depth, checksum_ok) = png_header(data)?;
        return Ok(ImageInfo {
            kind: ImageKind::Png,
            width,
            height,
            bit_depth,
            bytes: data.len(),
            content_id,
            checksum_ok,
        });
    }

    let (width, height, bit_depth) = dib_header(data)?;
    Ok(ImageInfo {
        kind: ImageKind::Dib,
        width,
        height,
        bit_depth,
        bytes: data.len(),
        content_id,
        checksum_ok: true,
    })
}

/// IHDR is always the first chunk: length:u32be "IHDR" data[13] crc:u32be.
/// The crc covers the type tag and the data.
fn png_header(data: &[u8]) -> Result<(u32, u32, u16, bool)> {
    if data.len() < 33 {
        return Err(SmeltError::IconFormat("png stream truncated before IHDR".into()));
    }
    let len = read_u32_be(&data[8..12]);
    if len != 13 || &data[12..16] != b"IHDR" {
        return Err(SmeltError::IconFormat("png stream does not start with IHDR".into()));
    }
    let width = read_u32_be(&data[16..20]);
    let height = read_u32_be(&data[20..24]);
    let bit_depth = data[24] as u16;

    let expected = read_u32_be(&data[29..33]);
    let actual = hash::crc32(&data[12..29]);
    Ok((width, height, bit_depth, expected == actual))
}

/// BITMAPINFOHEADER with the icon convention of doubling the height to cover
/// the XOR and AND mask rows.
fn dib_header(data: &[u8]) -> Result<(u32, u32, u16)> {
    if data.len() < 16 {
        return Err(SmeltError::IconFormat("dib header truncated".into()));
    }
    let header_size = read_u32_le(&data[0..4]);
    if header_size < 40 {
        return Err(SmeltError::IconFormat(format!(
            "unsupported dib header size {header_size}"
        )));
    }
    let width = read_i32_le(&data[4..8]);
    let height = read_i32_le(&data[8..12]);
    let bit_count = read_u16_le(&data[14..16]);
    if width <= 0 || height <= 0 {
        return Err(SmeltError::IconFormat("dib reports non-positive dimensions".into()));
    }
    Ok((width as u32, (height / 2) as u32, bit_count))
}

fn read_u32_be(b: &[u8]) -> u32 {
    u32::from_be_bytes(b.try_into().unwrap())
}

fn read_u32_le(b: &[u8]) -> u32 {
    u32::from_le_bytes(b.try_into().unwrap())
}

fn read_i32_le(b: &[u8]) -> i32 {
    i32::from_le_bytes(b.try_into().unwrap())
}

fn read_u16_le(b: &[u8]) -> u16 {
    u16::from_le_bytes(b.try_into().unwrap())
}
