// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use crate::catalog_types::CatalogType;

// Filter mode bits.
pub const FM_NONE: u16 = 0;
pub const FM_ABOVE_HORIZON: u16 = 1 << 0;
pub const FM_CONSTELLATION: u16 = 1 << 1;
pub const FM_BY_MAG: u16 = 1 << 2;
pub const FM_NEARBY: u16 = 1 << 3;
pub const FM_DBL_MIN_SEP: u16 = 1 << 4;
pub const FM_DBL_MAX_SEP: u16 = 1 << 5;
pub const FM_VAR_MAX_PER: u16 = 1 << 6;
pub const FM_OBJ_TYPE: u16 = 1 << 7;
pub const FM_ALIGN_ALL_SKY: u16 = 1 << 8;

// Preset tables offered by the hand controller menus. An index past the end
// selects the trailing "any" value.
const MAG_LIMIT_PRESETS: [f64; 7] = [10.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
const MAG_LIMIT_ANY: f64 = 100.0;
const NEARBY_PRESETS: [f64; 4] = [1.0, 5.0, 10.0, 15.0];
const NEARBY_ANY: f64 = 9999.0;
const DBL_MIN_SEP_PRESETS: [f64; 10] =
    [0.2, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0, 20.0, 50.0];
const DBL_MAX_SEP_PRESETS: [f64; 10] =
    [0.5, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0, 20.0, 50.0, 100.0];
const VAR_MAX_PER_PRESETS: [f64; 8] =
    [0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0];
const SEP_PER_ANY: f64 = 0.0;

// Alignment stars must be at least this high and this far from the pole.
const ALIGN_MIN_ALT: f64 = 10.0;
const ALIGN_MAX_ABS_DEC: f64 = 85.0;

/// One filter criterion. Values are in display units: magnitudes,
/// degrees for the nearby distance, arc-seconds for separations, days for
/// periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterCriterion {
    AboveHorizon,
    AlignAllSky,
    Constellation(u8),
    ObjectType(u8),
    /// Objects at or fainter than this are excluded.
    MagnitudeLimit(f64),
    /// Objects at or beyond this distance from the telescope are excluded.
    Nearby(f64),
    DoubleMinSeparation(f64),
    DoubleMaxSeparation(f64),
    VariableMaxPeriod(f64),
}

/// Criteria that take a menu preset index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Constellation,
    ObjectType,
    MagnitudeLimit,
    Nearby,
    DoubleMinSeparation,
    DoubleMaxSeparation,
    VariableMaxPeriod,
}

fn preset(table: &[f64], param: usize, any: f64) -> f64 {
    table.get(param).copied().unwrap_or(any)
}

impl FilterCriterion {
    /// Maps a menu selection to a criterion. For constellation and object type
    /// `param` is the code itself.
    pub fn from_preset(kind: PresetKind, param: usize) -> Self {
        match kind {
            PresetKind::Constellation =>
                FilterCriterion::Constellation(param as u8),
            PresetKind::ObjectType =>
                FilterCriterion::ObjectType(param as u8),
            PresetKind::MagnitudeLimit => FilterCriterion::MagnitudeLimit(
                preset(&MAG_LIMIT_PRESETS, param, MAG_LIMIT_ANY)),
            PresetKind::Nearby => FilterCriterion::Nearby(
                preset(&NEARBY_PRESETS, param, NEARBY_ANY)),
            PresetKind::DoubleMinSeparation =>
                FilterCriterion::DoubleMinSeparation(
                    preset(&DBL_MIN_SEP_PRESETS, param, SEP_PER_ANY)),
            PresetKind::DoubleMaxSeparation =>
                FilterCriterion::DoubleMaxSeparation(
                    preset(&DBL_MAX_SEP_PRESETS, param, SEP_PER_ANY)),
            PresetKind::VariableMaxPeriod =>
                FilterCriterion::VariableMaxPeriod(
                    preset(&VAR_MAX_PER_PRESETS, param, SEP_PER_ANY)),
        }
    }

    fn mode(&self) -> u16 {
        match self {
            FilterCriterion::AboveHorizon => FM_ABOVE_HORIZON,
            FilterCriterion::AlignAllSky => FM_ALIGN_ALL_SKY,
            FilterCriterion::Constellation(_) => FM_CONSTELLATION,
            FilterCriterion::ObjectType(_) => FM_OBJ_TYPE,
            FilterCriterion::MagnitudeLimit(_) => FM_BY_MAG,
            FilterCriterion::Nearby(_) => FM_NEARBY,
            FilterCriterion::DoubleMinSeparation(_) => FM_DBL_MIN_SEP,
            FilterCriterion::DoubleMaxSeparation(_) => FM_DBL_MAX_SEP,
            FilterCriterion::VariableMaxPeriod(_) => FM_VAR_MAX_PER,
        }
    }
}

/// The object under evaluation. Values are read lazily, in evaluation order,
/// so that e.g. altitude is only computed when a horizon criterion is on.
/// Absent values are reported with their display sentinels.
pub trait FilterSubject {
    fn catalog_type(&self) -> CatalogType;
    /// Degrees.
    fn altitude(&self) -> f64;
    /// Degrees.
    fn declination(&self) -> f64;
    fn constellation_code(&self) -> u8;
    fn object_type_code(&self) -> Option<u8>;
    /// 99.9 when unknown.
    fn magnitude_value(&self) -> f64;
    /// Degrees from the last telescope pointing.
    fn distance_from_telescope(&self) -> f64;
    /// Arc-seconds.
    fn separation_value(&self) -> f64;
    /// Days, -1 when unknown.
    fn period_value(&self) -> f64;
}

/// Active filter modes plus one parameter per mode.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    mode: u16,
    constellation: u8,
    object_type: u8,
    mag_limit: f64,
    nearby_dist: f64,
    dbl_min: f64,
    dbl_max: f64,
    var_max: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            mode: FM_NONE,
            constellation: 0,
            object_type: 0,
            mag_limit: MAG_LIMIT_ANY,
            nearby_dist: NEARBY_ANY,
            dbl_min: SEP_PER_ANY,
            dbl_max: SEP_PER_ANY,
            var_max: SEP_PER_ANY,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables all criteria. Parameters are kept.
    pub fn clear(&mut self) {
        self.mode = FM_NONE;
    }

    pub fn add(&mut self, criterion: FilterCriterion) {
        self.mode |= criterion.mode();
        match criterion {
            FilterCriterion::AboveHorizon | FilterCriterion::AlignAllSky => {}
            FilterCriterion::Constellation(c) => self.constellation = c,
            FilterCriterion::ObjectType(t) => self.object_type = t,
            FilterCriterion::MagnitudeLimit(m) => self.mag_limit = m,
            FilterCriterion::Nearby(d) => self.nearby_dist = d,
            FilterCriterion::DoubleMinSeparation(s) => self.dbl_min = s,
            FilterCriterion::DoubleMaxSeparation(s) => self.dbl_max = s,
            FilterCriterion::VariableMaxPeriod(p) => self.var_max = p,
        }
    }

    pub fn mode(&self) -> u16 {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.mode == FM_NONE
    }

    fn enabled(&self, bit: u16) -> bool {
        self.mode & bit != 0
    }

    /// Returns true if `subject` fails any enabled criterion. Criteria are
    /// checked in a fixed order and evaluation stops at the first failure.
    /// Criteria that don't apply to the subject's catalog type are skipped.
    pub fn excludes<S: FilterSubject + ?Sized>(&self, subject: &S) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.enabled(FM_ABOVE_HORIZON) && subject.altitude() < 0.0 {
            return true;
        }
        if self.enabled(FM_ALIGN_ALL_SKY) {
            if subject.altitude() < ALIGN_MIN_ALT {
                return true;
            }
            if subject.declination().abs() > ALIGN_MAX_ABS_DEC {
                return true;
            }
        }
        if self.enabled(FM_CONSTELLATION)
            && subject.constellation_code() != self.constellation {
            return true;
        }
        if self.enabled(FM_OBJ_TYPE) && subject.catalog_type().is_dso()
            && subject.object_type_code() != Some(self.object_type) {
            return true;
        }
        if self.enabled(FM_BY_MAG) && subject.magnitude_value() >= self.mag_limit {
            return true;
        }
        if self.enabled(FM_NEARBY)
            && subject.distance_from_telescope() >= self.nearby_dist {
            return true;
        }
        let catalog_type = subject.catalog_type();
        if self.enabled(FM_DBL_MAX_SEP) && catalog_type.is_double_star()
            && subject.separation_value() > self.dbl_max {
            return true;
        }
        if self.enabled(FM_DBL_MIN_SEP) && catalog_type.is_double_star()
            && subject.separation_value() < self.dbl_min {
            return true;
        }
        if self.enabled(FM_VAR_MAX_PER) && catalog_type.is_variable_star()
            && subject.period_value() > self.var_max {
            return true;
        }
        false
    }
}

// mod tests.
