//! JP2 box structure and codestream header sniffing (ISO/IEC 15444-1 Annex I).
//!
//! Only enough of the format is read to report dimensions and color space;
//! decoding the codestream is left to the registered decoder.

use num_enum::TryFromPrimitive;

use crate::codec::JpxColorSpace;
use crate::constants::{BOX_HEADER_SIZE, BOX_XL_FIELD_SIZE, J2K_START_OF_CODESTREAM, JP2_SIGNATURE};
use crate::error::{FilterError, Result};

/// Container flavour of a JPX stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpxFormat {
    /// JP2 file format with boxes.
    Jp2,
    /// Bare JPEG 2000 codestream starting with SOC.
    Codestream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum BoxType {
    Signature = 0x6A50_2020,
    FileType = 0x6674_7970,
    Header = 0x6A70_3268,
    ImageHeader = 0x6968_6472,
    BitsPerComponent = 0x6270_6363,
    ColourSpecification = 0x636F_6C72,
    Codestream = 0x6A70_3263,
}

/// Enumerated color spaces of the `colr` box (Table I.10 and its T.801 extensions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum EnumeratedColorSpace {
    Cmyk = 12,
    Ycck = 13,
    CieLab = 14,
    Srgb = 16,
    Greyscale = 17,
    Sycc = 18,
    EsRgb = 20,
    RommRgb = 21,
    EsYcc = 24,
}

impl EnumeratedColorSpace {
    pub fn color_space(self) -> JpxColorSpace {
        match self {
            Self::Srgb | Self::Sycc | Self::EsRgb | Self::RommRgb | Self::EsYcc => JpxColorSpace::Rgb,
            Self::Greyscale => JpxColorSpace::Gray,
            Self::Cmyk | Self::Ycck => JpxColorSpace::Cmyk,
            Self::CieLab => JpxColorSpace::Other,
        }
    }
}

/// Contents of the first `colr` box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Jp2Color {
    Enumerated(EnumeratedColorSpace),
    /// Enumerated value this reader does not know.
    UnknownEnumerated(u32),
    /// Embedded ICC profile of the given length.
    Icc(usize),
}

/// Header information gathered from a JP2 file or raw codestream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpxHeader {
    pub format: JpxFormat,
    pub width: u32,
    pub height: u32,
    pub component_count: u16,
    /// Bits per component, `None` when components differ.
    pub bits_per_component: Option<u8>,
    pub color: Option<Jp2Color>,
}

impl JpxHeader {
    /// Color space announced by the header, falling back to the component count.
    pub fn color_space(&self) -> JpxColorSpace {
        match &self.color {
            Some(Jp2Color::Enumerated(cs)) => cs.color_space(),
            _ => JpxColorSpace::from_component_count(self.component_count as usize),
        }
    }
}

pub fn detect_format(data: &[u8]) -> Option<JpxFormat> {
    if data.starts_with(JP2_SIGNATURE) {
        Some(JpxFormat::Jp2)
    } else if data.starts_with(&J2K_START_OF_CODESTREAM) {
        Some(JpxFormat::Codestream)
    } else {
        None
    }
}

/// Reads the header of a JP2 file or raw codestream.
pub fn read_header(data: &[u8]) -> Result<JpxHeader> {
    match detect_format(data) {
        Some(JpxFormat::Jp2) => read_jp2_header(data),
        Some(JpxFormat::Codestream) => read_siz(data),
        None => Err(FilterError::MalformedInput(
            "neither a JP2 signature nor a codestream SOC marker".into(),
        )),
    }
}

pub struct Jp2Box {
    pub box_type: [u8; 4],
    pub data_range: std::ops::Range<usize>,
}

impl Jp2Box {
    pub fn kind(&self) -> Option<BoxType> {
        BoxType::try_from(u32::from_be_bytes(self.box_type)).ok()
    }
}

/// Iterates over the boxes of a byte range.
pub struct Jp2Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Jp2Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn read_box(&mut self) -> Result<Option<Jp2Box>> {
        if self.position + BOX_HEADER_SIZE > self.data.len() {
            return Ok(None);
        }

        let start_pos = self.position;
        let mut length = be_u32(self.data, start_pos)? as u64;
        let mut box_type = [0u8; 4];
        box_type.copy_from_slice(&self.data[start_pos + 4..start_pos + 8]);

        let mut header_size = BOX_HEADER_SIZE;
        if length == 1 {
            if start_pos + BOX_HEADER_SIZE + BOX_XL_FIELD_SIZE > self.data.len() {
                return Err(FilterError::MalformedInput("box missing extended length".into()));
            }
            let mut xl = [0u8; 8];
            xl.copy_from_slice(&self.data[start_pos + 8..start_pos + 16]);
            length = u64::from_be_bytes(xl);
            header_size += BOX_XL_FIELD_SIZE;
        } else if length == 0 {
            length = (self.data.len() - start_pos) as u64;
        }

        if length < header_size as u64 {
            return Err(FilterError::MalformedInput(format!(
                "box length {length} shorter than its header"
            )));
        }
        let data_end = usize::try_from(length)
            .ok()
            .and_then(|len| start_pos.checked_add(len))
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| FilterError::MalformedInput("box length exceeds stream".into()))?;

        self.position = data_end;

        Ok(Some(Jp2Box {
            box_type,
            data_range: start_pos + header_size..data_end,
        }))
    }
}

fn be_u32(data: &[u8], at: usize) -> Result<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| FilterError::MalformedInput(format!("truncated field at offset {at}")))
}

fn be_u16(data: &[u8], at: usize) -> Result<u16> {
    data.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| FilterError::MalformedInput(format!("truncated field at offset {at}")))
}

fn read_jp2_header(data: &[u8]) -> Result<JpxHeader> {
    let mut reader = Jp2Reader::new(data);
    while let Some(b) = reader.read_box()? {
        if b.kind() == Some(BoxType::Header) {
            return parse_header_box(&data[b.data_range]);
        }
    }
    Err(FilterError::MalformedInput("JP2 header box not found".into()))
}

fn parse_header_box(payload: &[u8]) -> Result<JpxHeader> {
    let mut header = None;
    let mut color = None;

    let mut reader = Jp2Reader::new(payload);
    while let Some(b) = reader.read_box()? {
        let body = &payload[b.data_range.clone()];
        match b.kind() {
            Some(BoxType::ImageHeader) => {
                if body.len() < 14 {
                    return Err(FilterError::MalformedInput("ihdr box too short".into()));
                }
                let height = be_u32(body, 0)?;
                let width = be_u32(body, 4)?;
                let component_count = be_u16(body, 8)?;
                // 0xFF means the depths live in a bpcc box.
                let bits_per_component = match body[10] {
                    0xFF => None,
                    bpc => Some((bpc & 0x7F) + 1),
                };
                header = Some((width, height, component_count, bits_per_component));
            }
            // Only the first colr box is authoritative.
            Some(BoxType::ColourSpecification) if color.is_none() => {
                color = parse_colr(body);
            }
            _ => {}
        }
    }

    let (width, height, component_count, bits_per_component) =
        header.ok_or_else(|| FilterError::MalformedInput("ihdr box not found".into()))?;
    Ok(JpxHeader {
        format: JpxFormat::Jp2,
        width,
        height,
        component_count,
        bits_per_component,
        color,
    })
}

fn parse_colr(body: &[u8]) -> Option<Jp2Color> {
    let method = *body.first()?;
    match method {
        1 => {
            let raw = be_u32(body, 3).ok()?;
            Some(match EnumeratedColorSpace::try_from(raw) {
                Ok(cs) => Jp2Color::Enumerated(cs),
                Err(_) => Jp2Color::UnknownEnumerated(raw),
            })
        }
        2 | 3 if body.len() > 3 => Some(Jp2Color::Icc(body.len() - 3)),
        _ => None,
    }
}

// SOC, then SIZ: FF51 Lsiz Rsiz Xsiz Ysiz XOsiz YOsiz XTsiz YTsiz XTOsiz YTOsiz Csiz {Ssiz XRsiz YRsiz}
fn read_siz(data: &[u8]) -> Result<JpxHeader> {
    if data.get(2..4) != Some(&[0xFF, 0x51][..]) {
        return Err(FilterError::MalformedInput("SIZ marker must follow SOC".into()));
    }
    let x_size = be_u32(data, 8)?;
    let y_size = be_u32(data, 12)?;
    let x_origin = be_u32(data, 16)?;
    let y_origin = be_u32(data, 20)?;
    let component_count = be_u16(data, 40)?;

    let mut depths = Vec::with_capacity(component_count as usize);
    for c in 0..component_count as usize {
        let ssiz = *data
            .get(42 + c * 3)
            .ok_or_else(|| FilterError::MalformedInput("truncated SIZ component list".into()))?;
        depths.push((ssiz & 0x7F) + 1);
    }
    let bits_per_component = match depths.split_first() {
        Some((first, rest)) if rest.iter().all(|d| d == first) => Some(*first),
        _ => None,
    };

    Ok(JpxHeader {
        format: JpxFormat::Codestream,
        width: x_size.saturating_sub(x_origin),
        height: y_size.saturating_sub(y_origin),
        component_count,
        bits_per_component,
        color: None,
    })
}
