// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

//! Packed catalog record layouts and their field decoders.
//!
//! Every layout is little-endian with no padding and starts with the same
//! two-byte header:
//!
//! | byte | bit 7        | bits 0..6                                  |
//! |------|--------------|--------------------------------------------|
//! | 0    | has name     | constellation code                         |
//! | 1    | has sub-id   | Bayer/Flamsteed code (stars) or object type (DSOs) |
//!
//! Quantized ("compact") layouts store RA, Dec and magnitude as scaled
//! integers; full layouts store RA/Dec as `f32` and magnitude in hundredths.

use std::fmt;

/// Magnitude reported when there is no selection or the magnitude is unknown.
pub const NO_MAGNITUDE: f64 = 99.9;
/// Separation reported outside double star catalogs.
pub const NO_SEPARATION: f64 = 999.9;
/// Constellation code reported when no catalog is selected.
pub const NO_CONSTELLATION: u8 = 89;
/// Raw Bayer/Flamsteed code meaning "no designation".
pub const NO_BAYER_FLAM: u8 = 24;
/// Reported for ids, codes, angles, periods and epochs that are absent.
pub const NO_VALUE: i32 = -1;
/// Object type code shared by all star catalogs.
pub const STAR_OBJECT_TYPE: u8 = 2;

// Quantized RA: 65536 counts per 24 hours.
const RA_COUNTS_PER_HOUR: f64 = 2730.6666666666666;
// Quantized Dec: 32767 counts per 90 degrees.
const DEC_COUNTS_PER_DEGREE: f64 = 364.07777777777777;
// Quantized magnitude value meaning "unknown".
const MAG_UNKNOWN: u8 = 255;
// Period value meaning "unknown".
const PERIOD_UNKNOWN: i16 = 32767;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogType {
    /// Registry terminator; never selectable.
    None,
    GenStar,
    GenStarCompact,
    DoubleStar,
    DoubleStarCompact,
    VariableStar,
    Dso,
    DsoCompact,
    DsoCompactQuantized,
}

impl CatalogType {
    /// Size in bytes of one record of this type. Zero for `None`.
    pub fn record_size(self) -> usize {
        match self {
            CatalogType::None => 0,
            CatalogType::GenStar => GenStarRecord::SIZE,
            CatalogType::GenStarCompact => GenStarCompactRecord::SIZE,
            CatalogType::DoubleStar => DoubleStarRecord::SIZE,
            CatalogType::DoubleStarCompact => DoubleStarCompactRecord::SIZE,
            CatalogType::VariableStar => VariableStarRecord::SIZE,
            CatalogType::Dso => DsoRecord::SIZE,
            CatalogType::DsoCompact => DsoCompactRecord::SIZE,
            CatalogType::DsoCompactQuantized => DsoCompactQuantizedRecord::SIZE,
        }
    }

    pub fn is_star(self) -> bool {
        matches!(self,
                 CatalogType::GenStar | CatalogType::GenStarCompact |
                 CatalogType::DoubleStar | CatalogType::DoubleStarCompact |
                 CatalogType::VariableStar)
    }

    pub fn is_double_star(self) -> bool {
        matches!(self, CatalogType::DoubleStar | CatalogType::DoubleStarCompact)
    }

    pub fn is_variable_star(self) -> bool {
        self == CatalogType::VariableStar
    }

    pub fn is_dso(self) -> bool {
        matches!(self,
                 CatalogType::Dso | CatalogType::DsoCompact |
                 CatalogType::DsoCompactQuantized)
    }
}

/// Traditional star designation carried by star records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Designation {
    /// Index of the Greek letter, 0 = alpha .. 23 = omega.
    Bayer(u8),
    /// Flamsteed number, starting at 1.
    Flamsteed(u8),
}

impl Designation {
    /// Interprets a raw record code. `NO_BAYER_FLAM` (24) yields None.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0..=23 => Some(Designation::Bayer(code)),
            NO_BAYER_FLAM => None,
            _ => Some(Designation::Flamsteed(code - NO_BAYER_FLAM)),
        }
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Designation::Bayer(n) | Designation::Flamsteed(n) => {
                write!(f, "{}", n)
            }
        }
    }
}

/// The two header bytes common to all layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordHeader {
    pub has_name: bool,
    pub has_sub_id: bool,
    pub constellation: u8,
    // Bayer/Flamsteed code for stars, object type for DSOs.
    pub code: u8,
}

impl RecordHeader {
    pub fn decode(bytes: &[u8]) -> Self {
        RecordHeader {
            has_name: bytes[0] & 0x80 != 0,
            constellation: bytes[0] & 0x7f,
            has_sub_id: bytes[1] & 0x80 != 0,
            code: bytes[1] & 0x7f,
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push((self.constellation & 0x7f) | if self.has_name { 0x80 } else { 0 });
        out.push((self.code & 0x7f) | if self.has_sub_id { 0x80 } else { 0 });
    }
}

/// Object fields decoded into physical units. Fields a layout does not carry
/// are None.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogObject {
    pub has_name: bool,
    pub has_sub_id: bool,
    pub constellation: u8,
    pub ra_hours: f64,
    pub dec: f64,
    pub magnitude: Option<f64>,
    pub magnitude2: Option<f64>,
    pub object_type: Option<u8>,
    pub primary_id: u32,
    pub bayer_flam: Option<u8>,
    pub position_angle: Option<u16>,
    // Arc-seconds.
    pub separation: Option<f64>,
    // Days.
    pub period: Option<f64>,
}

/// A fixed-size packed record layout.
pub trait CatalogRecord: Copy {
    const SIZE: usize;
    const CATALOG_TYPE: CatalogType;

    /// `bytes` must hold at least `SIZE` bytes.
    fn decode(bytes: &[u8]) -> Self;
    fn encode(&self, out: &mut Vec<u8>);

    fn header(&self) -> RecordHeader;

    /// Decodes all fields. `index` is the record's position in its table,
    /// which is the primary id for layouts that don't store one.
    fn to_object(&self, index: usize) -> CatalogObject;
}

fn quantized_ra_hours(raw: u16) -> f64 {
    raw as f64 / RA_COUNTS_PER_HOUR
}

fn quantized_dec(raw: i16) -> f64 {
    raw as f64 / DEC_COUNTS_PER_DEGREE
}

fn quantized_magnitude(raw: u8) -> Option<f64> {
    if raw == MAG_UNKNOWN {
        None
    } else {
        Some(raw as f64 / 10.0 - 2.5)
    }
}

fn full_magnitude(raw: i16) -> f64 {
    raw as f64 / 100.0
}

fn star_code(header: &RecordHeader) -> Option<u8> {
    if header.code == NO_BAYER_FLAM { None } else { Some(header.code) }
}

// Period 0.01 to 9.99 days is stored as 1..=999, 10.0 to 3186.6 days as
// 1000..=32766.
fn decode_period(raw: i16) -> Option<f64> {
    match raw {
        1..=999 => Some(raw as f64 / 100.0),
        1000..=32766 => Some((raw as f64 - 900.0) / 10.0),
        _ => None,
    }
}

// Little-endian field reader over one record.
struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        FieldReader { bytes, pos: 2 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        buf
    }

    fn u8(&mut self) -> u8 { self.take::<1>()[0] }
    fn u16(&mut self) -> u16 { u16::from_le_bytes(self.take()) }
    fn i16(&mut self) -> i16 { i16::from_le_bytes(self.take()) }
    fn f32(&mut self) -> f32 { f32::from_le_bytes(self.take()) }
}

/// Full precision general star.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenStarRecord {
    pub header: RecordHeader,
    pub obj_id: u16,
    pub mag: i16,
    pub ra: f32,
    pub dec: f32,
}

impl CatalogRecord for GenStarRecord {
    const SIZE: usize = 14;
    const CATALOG_TYPE: CatalogType = CatalogType::GenStar;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        GenStarRecord {
            header: RecordHeader::decode(bytes),
            obj_id: r.u16(),
            mag: r.i16(),
            ra: r.f32(),
            dec: r.f32(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.extend_from_slice(&self.obj_id.to_le_bytes());
        out.extend_from_slice(&self.mag.to_le_bytes());
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, _index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: self.ra as f64,
            dec: self.dec as f64,
            magnitude: Some(full_magnitude(self.mag)),
            magnitude2: None,
            object_type: Some(STAR_OBJECT_TYPE),
            primary_id: self.obj_id as u32,
            bayer_flam: star_code(&self.header),
            position_angle: None,
            separation: None,
            period: None,
        }
    }
}

/// Quantized general star. Has no stored id; the id is the 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenStarCompactRecord {
    pub header: RecordHeader,
    pub mag: u8,
    pub ra: u16,
    pub dec: i16,
}

impl CatalogRecord for GenStarCompactRecord {
    const SIZE: usize = 7;
    const CATALOG_TYPE: CatalogType = CatalogType::GenStarCompact;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        GenStarCompactRecord {
            header: RecordHeader::decode(bytes),
            mag: r.u8(),
            ra: r.u16(),
            dec: r.i16(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.push(self.mag);
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: quantized_ra_hours(self.ra),
            dec: quantized_dec(self.dec),
            magnitude: quantized_magnitude(self.mag),
            magnitude2: None,
            object_type: Some(STAR_OBJECT_TYPE),
            primary_id: index as u32 + 1,
            bayer_flam: star_code(&self.header),
            position_angle: None,
            separation: None,
            period: None,
        }
    }
}

/// Full precision double star.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleStarRecord {
    pub header: RecordHeader,
    pub obj_id: u16,
    // Tenths of an arc-second.
    pub sep: u16,
    // Degrees.
    pub pa: u16,
    pub mag: i16,
    pub mag2: i16,
    pub ra: f32,
    pub dec: f32,
}

impl CatalogRecord for DoubleStarRecord {
    const SIZE: usize = 20;
    const CATALOG_TYPE: CatalogType = CatalogType::DoubleStar;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        DoubleStarRecord {
            header: RecordHeader::decode(bytes),
            obj_id: r.u16(),
            sep: r.u16(),
            pa: r.u16(),
            mag: r.i16(),
            mag2: r.i16(),
            ra: r.f32(),
            dec: r.f32(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.extend_from_slice(&self.obj_id.to_le_bytes());
        out.extend_from_slice(&self.sep.to_le_bytes());
        out.extend_from_slice(&self.pa.to_le_bytes());
        out.extend_from_slice(&self.mag.to_le_bytes());
        out.extend_from_slice(&self.mag2.to_le_bytes());
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, _index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: self.ra as f64,
            dec: self.dec as f64,
            magnitude: Some(full_magnitude(self.mag)),
            magnitude2: Some(full_magnitude(self.mag2)),
            object_type: Some(STAR_OBJECT_TYPE),
            primary_id: self.obj_id as u32,
            bayer_flam: star_code(&self.header),
            position_angle: Some(self.pa),
            separation: Some(self.sep as f64 / 10.0),
            period: None,
        }
    }
}

/// Quantized double star.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoubleStarCompactRecord {
    pub header: RecordHeader,
    pub obj_id: u16,
    pub sep: u16,
    pub pa: u16,
    pub mag: u8,
    pub mag2: u8,
    pub ra: u16,
    pub dec: i16,
}

impl CatalogRecord for DoubleStarCompactRecord {
    const SIZE: usize = 14;
    const CATALOG_TYPE: CatalogType = CatalogType::DoubleStarCompact;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        DoubleStarCompactRecord {
            header: RecordHeader::decode(bytes),
            obj_id: r.u16(),
            sep: r.u16(),
            pa: r.u16(),
            mag: r.u8(),
            mag2: r.u8(),
            ra: r.u16(),
            dec: r.i16(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.extend_from_slice(&self.obj_id.to_le_bytes());
        out.extend_from_slice(&self.sep.to_le_bytes());
        out.extend_from_slice(&self.pa.to_le_bytes());
        out.push(self.mag);
        out.push(self.mag2);
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, _index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: quantized_ra_hours(self.ra),
            dec: quantized_dec(self.dec),
            magnitude: quantized_magnitude(self.mag),
            magnitude2: quantized_magnitude(self.mag2),
            object_type: Some(STAR_OBJECT_TYPE),
            primary_id: self.obj_id as u32,
            bayer_flam: star_code(&self.header),
            position_angle: Some(self.pa),
            separation: Some(self.sep as f64 / 10.0),
            period: None,
        }
    }
}

/// Variable star. `mag2` is the minimum brightness.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VariableStarRecord {
    pub header: RecordHeader,
    pub obj_id: u16,
    pub period: i16,
    pub mag: i16,
    pub mag2: i16,
    pub ra: f32,
    pub dec: f32,
}

impl VariableStarRecord {
    pub const PERIOD_UNKNOWN: i16 = PERIOD_UNKNOWN;
}

impl CatalogRecord for VariableStarRecord {
    const SIZE: usize = 18;
    const CATALOG_TYPE: CatalogType = CatalogType::VariableStar;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        VariableStarRecord {
            header: RecordHeader::decode(bytes),
            obj_id: r.u16(),
            period: r.i16(),
            mag: r.i16(),
            mag2: r.i16(),
            ra: r.f32(),
            dec: r.f32(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.extend_from_slice(&self.obj_id.to_le_bytes());
        out.extend_from_slice(&self.period.to_le_bytes());
        out.extend_from_slice(&self.mag.to_le_bytes());
        out.extend_from_slice(&self.mag2.to_le_bytes());
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, _index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: self.ra as f64,
            dec: self.dec as f64,
            magnitude: Some(full_magnitude(self.mag)),
            magnitude2: Some(full_magnitude(self.mag2)),
            // The hand controller never assigned variable stars a type.
            object_type: None,
            primary_id: self.obj_id as u32,
            bayer_flam: star_code(&self.header),
            position_angle: None,
            separation: None,
            period: decode_period(self.period),
        }
    }
}

/// Full precision deep sky object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DsoRecord {
    pub header: RecordHeader,
    pub obj_id: u16,
    pub mag: i16,
    pub ra: f32,
    pub dec: f32,
}

impl CatalogRecord for DsoRecord {
    const SIZE: usize = 14;
    const CATALOG_TYPE: CatalogType = CatalogType::Dso;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        DsoRecord {
            header: RecordHeader::decode(bytes),
            obj_id: r.u16(),
            mag: r.i16(),
            ra: r.f32(),
            dec: r.f32(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.extend_from_slice(&self.obj_id.to_le_bytes());
        out.extend_from_slice(&self.mag.to_le_bytes());
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, _index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: self.ra as f64,
            dec: self.dec as f64,
            magnitude: Some(full_magnitude(self.mag)),
            magnitude2: None,
            object_type: Some(self.header.code),
            primary_id: self.obj_id as u32,
            bayer_flam: None,
            position_angle: None,
            separation: None,
            period: None,
        }
    }
}

/// Quantized deep sky object with stored id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DsoCompactRecord {
    pub header: RecordHeader,
    pub obj_id: u16,
    pub mag: u8,
    pub ra: u16,
    pub dec: i16,
}

impl CatalogRecord for DsoCompactRecord {
    const SIZE: usize = 9;
    const CATALOG_TYPE: CatalogType = CatalogType::DsoCompact;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        DsoCompactRecord {
            header: RecordHeader::decode(bytes),
            obj_id: r.u16(),
            mag: r.u8(),
            ra: r.u16(),
            dec: r.i16(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.extend_from_slice(&self.obj_id.to_le_bytes());
        out.push(self.mag);
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, _index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: quantized_ra_hours(self.ra),
            dec: quantized_dec(self.dec),
            magnitude: quantized_magnitude(self.mag),
            magnitude2: None,
            object_type: Some(self.header.code),
            primary_id: self.obj_id as u32,
            bayer_flam: None,
            position_angle: None,
            separation: None,
            period: None,
        }
    }
}

/// Quantized deep sky object without stored id (id is the 1-based index).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DsoCompactQuantizedRecord {
    pub header: RecordHeader,
    pub mag: u8,
    pub ra: u16,
    pub dec: i16,
}

impl CatalogRecord for DsoCompactQuantizedRecord {
    const SIZE: usize = 7;
    const CATALOG_TYPE: CatalogType = CatalogType::DsoCompactQuantized;

    fn decode(bytes: &[u8]) -> Self {
        let mut r = FieldReader::new(bytes);
        DsoCompactQuantizedRecord {
            header: RecordHeader::decode(bytes),
            mag: r.u8(),
            ra: r.u16(),
            dec: r.i16(),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        out.push(self.mag);
        out.extend_from_slice(&self.ra.to_le_bytes());
        out.extend_from_slice(&self.dec.to_le_bytes());
    }

    fn header(&self) -> RecordHeader { self.header }

    fn to_object(&self, index: usize) -> CatalogObject {
        CatalogObject {
            has_name: self.header.has_name,
            has_sub_id: self.header.has_sub_id,
            constellation: self.header.constellation,
            ra_hours: quantized_ra_hours(self.ra),
            dec: quantized_dec(self.dec),
            magnitude: quantized_magnitude(self.mag),
            magnitude2: None,
            object_type: Some(self.header.code),
            primary_id: index as u32 + 1,
            bayer_flam: None,
            position_angle: None,
            separation: None,
            period: None,
        }
    }
}

/// Quantizes RA hours for the compact layouts.
pub fn quantize_ra_hours(ra_hours: f64) -> u16 {
    (ra_hours * RA_COUNTS_PER_HOUR).round().clamp(0.0, u16::MAX as f64) as u16
}

/// Quantizes declination degrees for the compact layouts.
pub fn quantize_dec(dec: f64) -> i16 {
    (dec * DEC_COUNTS_PER_DEGREE).round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Quantizes a magnitude for the compact layouts; None becomes "unknown".
pub fn quantize_magnitude(mag: Option<f64>) -> u8 {
    match mag {
        Some(m) => ((m + 2.5) * 10.0).round().clamp(0.0, 254.0) as u8,
        None => MAG_UNKNOWN,
    }
}

// mod tests.
