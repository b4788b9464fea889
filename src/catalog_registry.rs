// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use std::marker::PhantomData;

use canonical_error::{CanonicalError, invalid_argument_error};
use log::debug;

use crate::catalog_types::{
    CatalogObject, CatalogRecord, CatalogType, DoubleStarCompactRecord,
    DoubleStarRecord, DsoCompactQuantizedRecord, DsoCompactRecord, DsoRecord,
    GenStarCompactRecord, GenStarRecord, RecordHeader, VariableStarRecord};

/// Upper bound on the number of catalogs a registry exposes.
pub const MAX_CATALOGS: usize = 32;

/// Read-only typed view over a packed record table.
#[derive(Debug)]
pub struct RecordTable<'a, R: CatalogRecord> {
    bytes: &'a [u8],
    _record: PhantomData<R>,
}

// Derive would require R: Clone.
impl<'a, R: CatalogRecord> Clone for RecordTable<'a, R> {
    fn clone(&self) -> Self { *self }
}
impl<'a, R: CatalogRecord> Copy for RecordTable<'a, R> {}

impl<'a, R: CatalogRecord> RecordTable<'a, R> {
    /// `bytes.len()` must be a multiple of `R::SIZE`.
    fn new(bytes: &'a [u8]) -> Self {
        RecordTable { bytes, _record: PhantomData }
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / R::SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, index: usize) -> &'a [u8] {
        &self.bytes[index * R::SIZE..(index + 1) * R::SIZE]
    }

    pub fn get(&self, index: usize) -> R {
        R::decode(self.slot(index))
    }

    /// Only the two header bytes are read.
    pub fn header(&self, index: usize) -> RecordHeader {
        RecordHeader::decode(self.slot(index))
    }
}

/// The selected catalog's record table, bound to its layout. Exactly one
/// variant is live per selection so field reads never re-check the type.
#[derive(Debug, Clone, Copy)]
pub enum CatalogView<'a> {
    GenStar(RecordTable<'a, GenStarRecord>),
    GenStarCompact(RecordTable<'a, GenStarCompactRecord>),
    DoubleStar(RecordTable<'a, DoubleStarRecord>),
    DoubleStarCompact(RecordTable<'a, DoubleStarCompactRecord>),
    VariableStar(RecordTable<'a, VariableStarRecord>),
    Dso(RecordTable<'a, DsoRecord>),
    DsoCompact(RecordTable<'a, DsoCompactRecord>),
    DsoCompactQuantized(RecordTable<'a, DsoCompactQuantizedRecord>),
}

macro_rules! with_table {
    ($view:expr, $table:ident => $body:expr) => {
        match $view {
            CatalogView::GenStar($table) => $body,
            CatalogView::GenStarCompact($table) => $body,
            CatalogView::DoubleStar($table) => $body,
            CatalogView::DoubleStarCompact($table) => $body,
            CatalogView::VariableStar($table) => $body,
            CatalogView::Dso($table) => $body,
            CatalogView::DsoCompact($table) => $body,
            CatalogView::DsoCompactQuantized($table) => $body,
        }
    };
}

impl<'a> CatalogView<'a> {
    /// Binds `bytes` to the layout named by `catalog_type`. None for
    /// `CatalogType::None`.
    pub fn bind(catalog_type: CatalogType, bytes: &'a [u8]) -> Option<Self> {
        Some(match catalog_type {
            CatalogType::None => return None,
            CatalogType::GenStar =>
                CatalogView::GenStar(RecordTable::new(bytes)),
            CatalogType::GenStarCompact =>
                CatalogView::GenStarCompact(RecordTable::new(bytes)),
            CatalogType::DoubleStar =>
                CatalogView::DoubleStar(RecordTable::new(bytes)),
            CatalogType::DoubleStarCompact =>
                CatalogView::DoubleStarCompact(RecordTable::new(bytes)),
            CatalogType::VariableStar =>
                CatalogView::VariableStar(RecordTable::new(bytes)),
            CatalogType::Dso =>
                CatalogView::Dso(RecordTable::new(bytes)),
            CatalogType::DsoCompact =>
                CatalogView::DsoCompact(RecordTable::new(bytes)),
            CatalogType::DsoCompactQuantized =>
                CatalogView::DsoCompactQuantized(RecordTable::new(bytes)),
        })
    }

    pub fn catalog_type(&self) -> CatalogType {
        fn type_of<R: CatalogRecord>(_: &RecordTable<'_, R>) -> CatalogType {
            R::CATALOG_TYPE
        }
        with_table!(self, t => type_of(t))
    }

    pub fn len(&self) -> usize {
        with_table!(self, t => t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn header(&self, index: usize) -> RecordHeader {
        with_table!(self, t => t.header(index))
    }

    pub fn object(&self, index: usize) -> CatalogObject {
        with_table!(self, t => t.get(index).to_object(index))
    }

    /// Number of records in `0..=index` whose header satisfies `flag`.
    pub fn count_flagged(&self, index: usize,
                         flag: impl Fn(&RecordHeader) -> bool) -> usize {
        (0..=index).filter(|&i| flag(&self.header(i))).count()
    }
}

/// Static description of one catalog.
#[derive(Debug, Clone)]
pub struct CatalogDescriptor<'a> {
    pub title: &'a str,
    /// Prepended to the primary id for display, e.g. "M" or "NGC".
    pub prefix: &'a str,
    pub catalog_type: CatalogType,
    records: &'a [u8],
    num_records: usize,
    /// Semicolon-delimited names, one per record with the has-name flag.
    pub names: &'a str,
    /// Semicolon-delimited sub-ids, one per record with the has-sub-id flag.
    pub sub_ids: &'a str,
    /// Reference epoch (year) of the catalog coordinates.
    pub epoch: i32,
}

impl<'a> CatalogDescriptor<'a> {
    pub fn new(title: &'a str,
               prefix: &'a str,
               catalog_type: CatalogType,
               records: &'a [u8],
               names: &'a str,
               sub_ids: &'a str,
               epoch: i32) -> Result<Self, CanonicalError> {
        let size = catalog_type.record_size();
        if size == 0 {
            return Err(invalid_argument_error(
                format!("catalog '{}' has no record layout", title).as_str()));
        }
        if records.len() % size != 0 {
            return Err(invalid_argument_error(
                format!("catalog '{}': {} bytes is not a multiple of the {:?} \
                         record size {}",
                        title, records.len(), catalog_type, size).as_str()));
        }
        Ok(CatalogDescriptor {
            title, prefix, catalog_type, records,
            num_records: records.len() / size,
            names, sub_ids, epoch,
        })
    }

    /// Registry terminator.
    pub fn sentinel() -> Self {
        CatalogDescriptor {
            title: "", prefix: "", catalog_type: CatalogType::None,
            records: &[], num_records: 0, names: "", sub_ids: "", epoch: 0,
        }
    }

    pub fn num_records(&self) -> usize {
        self.num_records
    }

    pub fn is_sentinel(&self) -> bool {
        self.num_records == 0 || self.catalog_type == CatalogType::None
    }

    pub fn view(&self) -> Option<CatalogView<'a>> {
        CatalogView::bind(self.catalog_type, self.records)
    }
}

/// Code-to-name tables supplied by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameTables<'a> {
    pub constellations: &'a [&'a str],
    pub object_types: &'a [&'a str],
}

/// Ordered catalogs. Only the entries before the first sentinel are live.
#[derive(Debug, Clone)]
pub struct CatalogRegistry<'a> {
    catalogs: Vec<CatalogDescriptor<'a>>,
    num_catalogs: usize,
    pub name_tables: NameTables<'a>,
}

impl<'a> CatalogRegistry<'a> {
    pub fn new(catalogs: Vec<CatalogDescriptor<'a>>,
               name_tables: NameTables<'a>) -> Self {
        let num_catalogs = catalogs.iter()
            .take(MAX_CATALOGS)
            .position(|c| c.is_sentinel())
            .unwrap_or(catalogs.len().min(MAX_CATALOGS));
        debug!("Registry has {} catalogs", num_catalogs);
        CatalogRegistry { catalogs, num_catalogs, name_tables }
    }

    pub fn num_catalogs(&self) -> usize {
        self.num_catalogs
    }

    pub fn get(&self, n: usize) -> Option<&CatalogDescriptor<'a>> {
        if n < self.num_catalogs { self.catalogs.get(n) } else { None }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogDescriptor<'a>> {
        self.catalogs[..self.num_catalogs].iter()
    }

    pub fn has_double_star_catalog(&self) -> bool {
        self.iter().any(|c| c.catalog_type.is_double_star())
    }

    pub fn has_variable_star_catalog(&self) -> bool {
        self.iter().any(|c| c.catalog_type.is_variable_star())
    }

    pub fn constellation_code_to_str(&self, code: usize) -> &'a str {
        self.name_tables.constellations.get(code).copied().unwrap_or("")
    }

    pub fn object_type_code_to_str(&self, code: usize) -> &'a str {
        self.name_tables.object_types.get(code).copied().unwrap_or("")
    }
}

/// Returns the `element`th (0-based) entry of a semicolon-delimited string,
/// or "" if there are not that many entries.
pub fn element_from_string(data: &str, element: usize) -> &str {
    data.split(';').nth(element).unwrap_or("")
}

// mod tests.
