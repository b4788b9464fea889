// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use std::time::SystemTime;

use log::{debug, warn};

use crate::astro_util::{angular_separation_deg, dms_from_degrees, equ_to_hor,
                        hms_from_hours, hor_to_equ, hour_angle,
                        true_refraction, Atmosphere, Dms, Hms};
use crate::catalog_filter::{FilterCriterion, FilterState, FilterSubject};
use crate::catalog_registry::{element_from_string, CatalogDescriptor,
                              CatalogRegistry, CatalogView, MAX_CATALOGS};
use crate::catalog_types::{CatalogObject, CatalogType, Designation,
                           NO_CONSTELLATION, NO_MAGNITUDE, NO_SEPARATION,
                           NO_VALUE};
use crate::observer::ObserverState;
use crate::tick_trait::TickSource;

/// Navigation and per-object access over the catalogs of a registry.
///
/// At most one catalog is selected at a time; its records are bound to a
/// typed view on selection. Each catalog keeps its own cursor, so returning
/// to a catalog resumes where the user left off. Navigation skips records
/// excluded by the active filter; filtering only takes effect once the
/// observer's latitude and sidereal time are known.
///
/// Accessors return None when there is no selection or when the selected
/// catalog's layout doesn't carry the field. The `*_or_sentinel` variants
/// give the legacy display values instead.
pub struct CatalogManager<'a, T: TickSource> {
    registry: &'a CatalogRegistry<'a>,
    ticks: T,

    selected: Option<usize>,
    view: Option<CatalogView<'a>>,
    cursors: [usize; MAX_CATALOGS],

    observer: ObserverState,
    filter: FilterState,
    atmosphere: Atmosphere,
}

impl<'a, T: TickSource> CatalogManager<'a, T> {
    pub fn new(registry: &'a CatalogRegistry<'a>, ticks: T) -> Self {
        CatalogManager {
            registry,
            ticks,
            selected: None,
            view: None,
            cursors: [0; MAX_CATALOGS],
            observer: ObserverState::new(),
            filter: FilterState::new(),
            atmosphere: Atmosphere::default(),
        }
    }

    pub fn registry(&self) -> &'a CatalogRegistry<'a> {
        self.registry
    }

    // Observer.

    pub fn observer(&self) -> &ObserverState {
        &self.observer
    }

    /// lat: degrees; 9999 or more means unknown.
    pub fn set_latitude(&mut self, lat: f64) {
        self.observer.set_latitude(lat);
    }

    /// Seeds local sidereal time (hours) as of now.
    pub fn set_lst(&mut self, lst_hours: f64) {
        let now = self.ticks.millis();
        self.observer.set_lst(lst_hours, now);
    }

    /// Seeds local sidereal time from wall-clock time.
    /// longitude: degrees, positive east.
    pub fn set_lst_from_time(&mut self, time: &SystemTime, longitude: f64) {
        let now = self.ticks.millis();
        self.observer.set_lst_from_time(time, longitude, now);
    }

    /// ra: hours. dec: degrees.
    pub fn set_last_tele_equ(&mut self, ra: f64, dec: f64) {
        self.observer.set_last_tele_equ(ra, dec);
    }

    pub fn set_atmosphere(&mut self, atmosphere: Atmosphere) {
        self.atmosphere = atmosphere;
    }

    pub fn is_initialized(&self) -> bool {
        self.observer.is_initialized()
    }

    pub fn lst_hours(&self) -> f64 {
        self.observer.lst_hours(self.ticks.millis())
    }

    pub fn lst_degrees(&self) -> f64 {
        self.observer.lst_degrees(self.ticks.millis())
    }

    // Catalog selection.

    pub fn num_catalogs(&self) -> usize {
        self.registry.num_catalogs()
    }

    pub fn has_double_star_catalog(&self) -> bool {
        self.registry.has_double_star_catalog()
    }

    pub fn has_variable_star_catalog(&self) -> bool {
        self.registry.has_variable_star_catalog()
    }

    /// Selects catalog `number` (0-based). Out of range clears the selection.
    pub fn select(&mut self, number: i32) {
        self.selected = None;
        self.view = None;
        if number < 0 || number as usize >= self.num_catalogs() {
            warn!("Catalog {} out of range; {} catalogs available",
                  number, self.num_catalogs());
            return;
        }
        let n = number as usize;
        let Some(view) = self.registry.get(n).and_then(|d| d.view()) else {
            warn!("Catalog {} has no record layout", n);
            return;
        };
        debug!("Selected catalog {} ({:?}, {} records)",
               n, view.catalog_type(), view.len());
        self.selected = Some(n);
        self.view = Some(view);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn descriptor(&self) -> Option<&'a CatalogDescriptor<'a>> {
        let registry: &'a CatalogRegistry<'a> = self.registry;
        registry.get(self.selected?)
    }

    /// `CatalogType::None` when nothing is selected.
    pub fn catalog_type(&self) -> CatalogType {
        self.view.map_or(CatalogType::None, |v| v.catalog_type())
    }

    pub fn is_star_catalog(&self) -> bool {
        self.catalog_type().is_star()
    }

    pub fn is_double_star_catalog(&self) -> bool {
        self.catalog_type().is_double_star()
    }

    pub fn is_variable_star_catalog(&self) -> bool {
        self.catalog_type().is_variable_star()
    }

    pub fn is_dso_catalog(&self) -> bool {
        self.catalog_type().is_dso()
    }

    pub fn catalog_title(&self) -> &'a str {
        self.descriptor().map_or("", |d| d.title)
    }

    pub fn catalog_prefix(&self) -> &'a str {
        self.descriptor().map_or("", |d| d.prefix)
    }

    pub fn epoch(&self) -> Option<i32> {
        self.descriptor().map(|d| d.epoch)
    }

    pub fn epoch_or_sentinel(&self) -> i32 {
        self.epoch().unwrap_or(NO_VALUE)
    }

    // Filtering.

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filters_clear(&mut self) {
        debug!("Filters cleared");
        self.filter.clear();
    }

    pub fn filter_add(&mut self, criterion: FilterCriterion) {
        debug!("Filter added: {:?}", criterion);
        self.filter.add(criterion);
    }

    /// True if the object under the cursor is excluded by the active filter.
    /// Never true before the observer is initialized.
    pub fn is_filtered(&self) -> bool {
        if self.view.is_none() || !self.observer.is_initialized() {
            return false;
        }
        self.filter.excludes(self)
    }

    // Navigation.

    pub fn index(&self) -> Option<usize> {
        self.selected.map(|n| self.cursors[n])
    }

    pub fn max_index(&self) -> Option<usize> {
        self.view.map(|v| v.len().saturating_sub(1))
    }

    /// Moves the cursor to `index`, or to the next unfiltered record after
    /// it. Returns false if no record passes the filter.
    pub fn set_index(&mut self, index: usize) -> bool {
        let (Some(n), Some(max)) = (self.selected, self.max_index()) else {
            return false;
        };
        let index = if index > max {
            warn!("Index {} past end of catalog, using {}", index, max);
            max
        } else {
            index
        };
        self.cursors[n] = index;
        // Back up to the previous match so the forward step lands on `index`
        // itself when it passes.
        self.decrement_index();
        self.increment_index()
    }

    pub fn increment_index(&mut self) -> bool {
        self.step(true)
    }

    pub fn decrement_index(&mut self) -> bool {
        self.step(false)
    }

    // Steps with wraparound until an unfiltered record is found, trying each
    // record at most once.
    fn step(&mut self, forward: bool) -> bool {
        let (Some(n), Some(view)) = (self.selected, self.view) else {
            return false;
        };
        let len = view.len();
        if len == 0 {
            return false;
        }
        let mut remaining = len;
        loop {
            let i = self.cursors[n];
            self.cursors[n] = if forward {
                if i + 1 >= len { 0 } else { i + 1 }
            } else if i == 0 {
                len - 1
            } else {
                i - 1
            };
            remaining -= 1;
            if remaining == 0 || !self.is_filtered() {
                break;
            }
        }
        if self.is_filtered() {
            warn!("No record of catalog {} passes the filter", n);
            return false;
        }
        true
    }

    // Object fields.

    fn cursor(&self) -> Option<(CatalogView<'a>, usize)> {
        Some((self.view?, self.cursors[self.selected?]))
    }

    /// All fields of the object under the cursor.
    pub fn current_object(&self) -> Option<CatalogObject> {
        let (view, i) = self.cursor()?;
        Some(view.object(i))
    }

    /// Degrees.
    pub fn ra(&self) -> Option<f64> {
        self.ra_hours().map(|h| h * 15.0)
    }

    pub fn ra_hours(&self) -> Option<f64> {
        self.current_object().map(|o| o.ra_hours)
    }

    pub fn ra_hms(&self) -> Option<Hms> {
        self.ra_hours().map(hms_from_hours)
    }

    /// Degrees.
    pub fn dec(&self) -> Option<f64> {
        self.current_object().map(|o| o.dec)
    }

    pub fn dec_dms(&self) -> Option<Dms> {
        self.dec().map(dms_from_degrees)
    }

    /// Hour angle in degrees, -180..180. Needs an initialized observer.
    pub fn ha(&self) -> Option<f64> {
        let frame = self.observer.frame(self.ticks.millis())?;
        Some(hour_angle(self.ra()?, frame.lst_degrees))
    }

    fn horizon(&self) -> Option<(f64, f64)> {
        let frame = self.observer.frame(self.ticks.millis())?;
        let obj = self.current_object()?;
        Some(equ_to_hor(obj.ra_hours * 15.0, obj.dec, &frame))
    }

    /// Degrees above the horizon. Needs an initialized observer.
    pub fn alt(&self) -> Option<f64> {
        self.horizon().map(|(alt, _)| alt)
    }

    pub fn alt_dms(&self) -> Option<Dms> {
        self.alt().map(dms_from_degrees)
    }

    /// Degrees clockwise from north. Needs an initialized observer.
    pub fn azm(&self) -> Option<f64> {
        self.horizon().map(|(_, azm)| azm)
    }

    pub fn azm_dms(&self) -> Option<Dms> {
        self.azm().map(dms_from_degrees)
    }

    /// Degrees between the object under the cursor and (ra, dec), degrees.
    pub fn distance_from(&self, ra: f64, dec: f64) -> Option<f64> {
        let obj = self.current_object()?;
        Some(angular_separation_deg(obj.ra_hours * 15.0, obj.dec, ra, dec))
    }

    pub fn magnitude(&self) -> Option<f64> {
        self.current_object()?.magnitude
    }

    pub fn magnitude_or_sentinel(&self) -> f64 {
        self.magnitude().unwrap_or(NO_MAGNITUDE)
    }

    /// Secondary magnitude: the companion of a double star, or the minimum
    /// brightness of a variable.
    pub fn magnitude2(&self) -> Option<f64> {
        self.current_object()?.magnitude2
    }

    pub fn constellation(&self) -> Option<u8> {
        self.current_object().map(|o| o.constellation)
    }

    pub fn constellation_or_sentinel(&self) -> u8 {
        self.constellation().unwrap_or(NO_CONSTELLATION)
    }

    pub fn constellation_str(&self) -> &'a str {
        self.constellation()
            .map_or("", |c| self.constellation_code_to_str(c as i32))
    }

    pub fn constellation_code_to_str(&self, code: i32) -> &'a str {
        if code < 0 { "" } else {
            self.registry.constellation_code_to_str(code as usize)
        }
    }

    pub fn object_type(&self) -> Option<u8> {
        self.current_object()?.object_type
    }

    pub fn object_type_str(&self) -> &'a str {
        self.object_type()
            .map_or("", |t| self.object_type_code_to_str(t as i32))
    }

    pub fn object_type_code_to_str(&self, code: i32) -> &'a str {
        if code < 0 { "" } else {
            self.registry.object_type_code_to_str(code as usize)
        }
    }

    /// Catalog number, e.g. 31 for M31.
    pub fn primary_id(&self) -> Option<u32> {
        self.current_object().map(|o| o.primary_id)
    }

    pub fn primary_id_or_sentinel(&self) -> i64 {
        self.primary_id().map_or(NO_VALUE as i64, i64::from)
    }

    /// Position of this object's name in the catalog name table. This scans
    /// from the start of the catalog; cache the result if calling repeatedly.
    pub fn object_name(&self) -> Option<usize> {
        let (view, i) = self.cursor()?;
        if !view.header(i).has_name {
            return None;
        }
        Some(view.count_flagged(i, |h| h.has_name) - 1)
    }

    pub fn object_name_str(&self) -> &'a str {
        match (self.descriptor(), self.object_name()) {
            (Some(d), Some(n)) => element_from_string(d.names, n),
            _ => "",
        }
    }

    /// Position of this object's sub-id in the catalog sub-id table. Same
    /// cost as `object_name()`.
    pub fn sub_id(&self) -> Option<usize> {
        let (view, i) = self.cursor()?;
        if !view.header(i).has_sub_id {
            return None;
        }
        Some(view.count_flagged(i, |h| h.has_sub_id) - 1)
    }

    pub fn sub_id_str(&self) -> &'a str {
        match (self.descriptor(), self.sub_id()) {
            (Some(d), Some(n)) => element_from_string(d.sub_ids, n),
            _ => "",
        }
    }

    /// Raw Bayer/Flamsteed code: 0..23 Greek letter, 25+ Flamsteed + 24.
    pub fn bayer_flam(&self) -> Option<u8> {
        self.current_object()?.bayer_flam
    }

    pub fn bayer_flam_or_sentinel(&self) -> i32 {
        self.bayer_flam().map_or(NO_VALUE, i32::from)
    }

    pub fn designation(&self) -> Option<Designation> {
        self.bayer_flam().and_then(Designation::from_code)
    }

    /// Greek letter index or Flamsteed number as text; "" if none.
    pub fn bayer_flam_str(&self) -> String {
        self.designation().map(|d| d.to_string()).unwrap_or_default()
    }

    /// Degrees. Double stars only.
    pub fn position_angle(&self) -> Option<u16> {
        self.current_object()?.position_angle
    }

    pub fn position_angle_or_sentinel(&self) -> i32 {
        self.position_angle().map_or(NO_VALUE, i32::from)
    }

    /// Arc-seconds. Double stars only.
    pub fn separation(&self) -> Option<f64> {
        self.current_object()?.separation
    }

    pub fn separation_or_sentinel(&self) -> f64 {
        self.separation().unwrap_or(NO_SEPARATION)
    }

    /// Days. Variable stars only.
    pub fn period(&self) -> Option<f64> {
        self.current_object()?.period
    }

    pub fn period_or_sentinel(&self) -> f64 {
        self.period().unwrap_or(NO_VALUE as f64)
    }

    /// Converts a catalog position to the observed place by applying
    /// atmospheric refraction. ra: hours, dec: degrees. Returns the input
    /// unchanged until the observer is initialized.
    pub fn topocentric_to_observed_place(&self, ra: f64, dec: f64)
                                         -> (f64, f64) {
        let Some(frame) = self.observer.frame(self.ticks.millis()) else {
            return (ra, dec);
        };
        let (alt, azm) = equ_to_hor(ra * 15.0, dec, &frame);
        let alt = alt + true_refraction(alt, &self.atmosphere) / 60.0;
        let (ra, dec) = hor_to_equ(alt, azm, &frame);
        (ra / 15.0, dec)
    }
}

impl<'a, T: TickSource> FilterSubject for CatalogManager<'a, T> {
    fn catalog_type(&self) -> CatalogType {
        CatalogManager::catalog_type(self)
    }
    fn altitude(&self) -> f64 {
        self.alt().unwrap_or(0.0)
    }
    fn declination(&self) -> f64 {
        self.dec().unwrap_or(0.0)
    }
    fn constellation_code(&self) -> u8 {
        self.constellation_or_sentinel()
    }
    fn object_type_code(&self) -> Option<u8> {
        self.object_type()
    }
    fn magnitude_value(&self) -> f64 {
        self.magnitude_or_sentinel()
    }
    fn distance_from_telescope(&self) -> f64 {
        let (ra, dec) = self.observer.last_tele_equ();
        self.distance_from(ra, dec).unwrap_or(f64::MAX)
    }
    fn separation_value(&self) -> f64 {
        self.separation_or_sentinel()
    }
    fn period_value(&self) -> f64 {
        self.period_or_sentinel()
    }
}

#[cfg(test)]
mod tests {
    extern crate approx;
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::catalog_filter::PresetKind;
    use crate::catalog_registry::NameTables;
    use crate::catalog_types::{quantize_dec, quantize_magnitude,
                               quantize_ra_hours, CatalogRecord,
                               DoubleStarRecord, GenStarCompactRecord,
                               RecordHeader, VariableStarRecord, NO_BAYER_FLAM};
    use crate::tick_trait::ManualTicks;

    const CONSTELLATIONS: [&str; 4] = ["And", "Lyr", "UMi", "Ori"];

    // Seven stars; records 2 and 5 are named.
    fn star_table() -> Vec<u8> {
        let mut bytes = Vec::new();
        let stars = [
            // (ra h, dec, mag, con, has_name, bayer)
            (0.0, 10.0, 4.0, 0, false, NO_BAYER_FLAM),
            (3.0, 20.0, 6.5, 0, false, 25),
            (18.6156, 38.7836, 0.0, 1, true, 0),
            (6.0, -5.0, 2.0, 3, false, 1),
            (9.0, -80.0, 5.5, 3, false, NO_BAYER_FLAM),
            (2.53, 89.26, 2.0, 2, true, 0),
            (12.0, 0.0, 7.0, 3, false, 30),
        ];
        for (ra, dec, mag, con, has_name, bf) in stars {
            GenStarCompactRecord {
                header: RecordHeader {
                    has_name, has_sub_id: false, constellation: con, code: bf,
                },
                mag: quantize_magnitude(Some(mag)),
                ra: quantize_ra_hours(ra),
                dec: quantize_dec(dec),
            }.encode(&mut bytes);
        }
        bytes
    }

    fn double_table() -> Vec<u8> {
        let mut bytes = Vec::new();
        for (i, sep) in [5u16, 25, 120].iter().enumerate() {
            DoubleStarRecord {
                header: RecordHeader {
                    has_name: false, has_sub_id: i == 1, constellation: 1,
                    code: NO_BAYER_FLAM,
                },
                obj_id: 100 + i as u16,
                sep: *sep,
                pa: 90 * i as u16,
                mag: 500,
                mag2: 800,
                ra: 18.0 + i as f32,
                dec: 35.0,
            }.encode(&mut bytes);
        }
        bytes
    }

    fn variable_table() -> Vec<u8> {
        let mut bytes = Vec::new();
        // 313.3 days, 1.5 days, unknown.
        let periods = [4033, 150, VariableStarRecord::PERIOD_UNKNOWN];
        for (i, period) in periods.into_iter().enumerate() {
            VariableStarRecord {
                header: RecordHeader::default(),
                obj_id: 1 + i as u16, period, mag: 300, mag2: 1010,
                ra: 2.3225 + i as f32, dec: -2.9776,
            }.encode(&mut bytes);
        }
        bytes
    }

    struct Fixture {
        stars: Vec<u8>,
        doubles: Vec<u8>,
        variables: Vec<u8>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture { stars: star_table(), doubles: double_table(),
                      variables: variable_table() }
        }

        fn registry(&self) -> CatalogRegistry<'_> {
            CatalogRegistry::new(
                vec![
                    CatalogDescriptor::new(
                        "Stars", "Star ", CatalogType::GenStarCompact,
                        &self.stars, "Vega;Polaris", "", 2000).unwrap(),
                    CatalogDescriptor::new(
                        "Doubles", "STF", CatalogType::DoubleStar,
                        &self.doubles, "", "AB", 2000).unwrap(),
                    CatalogDescriptor::new(
                        "Variables", "GCVS", CatalogType::VariableStar,
                        &self.variables, "", "", 1950).unwrap(),
                    CatalogDescriptor::sentinel(),
                ],
                NameTables { constellations: &CONSTELLATIONS,
                             object_types: &[] })
        }
    }

    #[test]
    fn test_select_binds_matching_view() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        assert_eq!(mgr.num_catalogs(), 3);
        for n in 0..3 {
            mgr.select(n);
            assert_eq!(mgr.selected(), Some(n as usize));
            assert_eq!(mgr.catalog_type(),
                       registry.get(n as usize).unwrap().catalog_type);
        }
        assert_eq!(mgr.catalog_title(), "Variables");
        assert_eq!(mgr.epoch(), Some(1950));
        assert!(mgr.is_variable_star_catalog());
        assert!(mgr.is_star_catalog());
        assert!(mgr.has_double_star_catalog());
        assert!(mgr.has_variable_star_catalog());
    }

    #[test]
    fn test_invalid_selection() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.select(1);
        for n in [-1, 3, 100] {
            mgr.select(n);
            assert_eq!(mgr.selected(), None);
            assert_eq!(mgr.catalog_type(), CatalogType::None);
            assert_eq!(mgr.catalog_title(), "");
            assert_eq!(mgr.catalog_prefix(), "");
            assert_eq!(mgr.epoch(), None);
            assert_eq!(mgr.ra(), None);
            assert_eq!(mgr.magnitude_or_sentinel(), 99.9);
            assert_eq!(mgr.separation_or_sentinel(), 999.9);
            assert_eq!(mgr.constellation_or_sentinel(), 89);
            assert_eq!(mgr.position_angle(), None);
            assert_eq!(mgr.object_name_str(), "");
            assert_eq!(mgr.bayer_flam_str(), "");
            assert_eq!(mgr.index(), None);
            assert!(!mgr.set_index(0));
            assert!(!mgr.increment_index());
        }
    }

    #[test]
    fn test_wraparound_navigation() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.select(0);
        assert_eq!(mgr.max_index(), Some(6));
        for start in 0..=6 {
            assert!(mgr.set_index(start));
            assert_eq!(mgr.index(), Some(start));
            assert!(mgr.increment_index());
            assert!(mgr.decrement_index());
            assert_eq!(mgr.index(), Some(start));
        }
        mgr.set_index(6);
        mgr.increment_index();
        assert_eq!(mgr.index(), Some(0));
        mgr.decrement_index();
        assert_eq!(mgr.index(), Some(6));
        // Clamped.
        mgr.set_index(60);
        assert_eq!(mgr.index(), Some(6));
    }

    #[test]
    fn test_cursor_per_catalog() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.select(0);
        mgr.set_index(4);
        mgr.select(1);
        assert_eq!(mgr.index(), Some(0));
        mgr.select(0);
        assert_eq!(mgr.index(), Some(4));
    }

    #[test]
    fn test_name_lookup() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.select(0);
        let names: Vec<&str> = (0..7).map(|i| {
            mgr.set_index(i);
            mgr.object_name_str()
        }).collect();
        assert_eq!(names, ["", "", "Vega", "", "", "Polaris", ""]);
        mgr.set_index(5);
        assert_eq!(mgr.object_name(), Some(1));
        assert_eq!(mgr.sub_id(), None);
        assert_eq!(mgr.sub_id_str(), "");
    }

    #[test]
    fn test_star_fields() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.select(0);
        mgr.set_index(2);
        assert_eq!(mgr.primary_id(), Some(3));
        assert_eq!(mgr.constellation_str(), "Lyr");
        assert_eq!(mgr.object_type(), Some(2));
        assert_eq!(mgr.designation(), Some(Designation::Bayer(0)));
        assert_eq!(mgr.bayer_flam_str(), "0");
        assert_eq!(mgr.ra_hms(), Some(Hms { hours: 18, minutes: 36,
                                            seconds: 56 }));
        let dec = mgr.dec_dms().unwrap();
        assert!(!dec.negative);
        assert_eq!((dec.degrees, dec.minutes), (38, 46));
        assert_eq!(mgr.position_angle(), None);
        assert_eq!(mgr.separation(), None);
        assert_eq!(mgr.period(), None);
        assert_eq!(mgr.magnitude2(), None);

        mgr.set_index(1);
        assert_eq!(mgr.designation(), Some(Designation::Flamsteed(1)));
        mgr.set_index(0);
        assert_eq!(mgr.bayer_flam(), None);
        mgr.set_index(3);
        assert!(mgr.dec_dms().unwrap().negative);
        assert_abs_diff_eq!(mgr.dec().unwrap(), -5.0, epsilon = 0.01);
    }

    #[test]
    fn test_double_and_variable_fields() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.select(1);
        mgr.set_index(1);
        assert_eq!(mgr.primary_id(), Some(101));
        assert_eq!(mgr.position_angle(), Some(90));
        assert_abs_diff_eq!(mgr.separation().unwrap(), 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(mgr.magnitude2().unwrap(), 8.0, epsilon = 1e-9);
        assert_eq!(mgr.sub_id_str(), "AB");
        assert_eq!(mgr.catalog_prefix(), "STF");

        mgr.select(2);
        assert_abs_diff_eq!(mgr.period().unwrap(), 313.3, epsilon = 1e-9);
        assert_eq!(mgr.position_angle(), None);
        assert_eq!(mgr.separation_or_sentinel(), NO_SEPARATION);
        assert_eq!(mgr.object_type(), None);
        assert_eq!(mgr.object_type_str(), "");
    }

    #[test]
    fn test_filter_ignored_until_initialized() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.select(0);
        mgr.filter_add(FilterCriterion::MagnitudeLimit(1.0));
        assert!(!mgr.is_filtered());
        assert!(mgr.set_index(1));
        assert_eq!(mgr.index(), Some(1));
        assert_eq!(mgr.alt(), None);
        assert_eq!(mgr.ha(), None);
    }

    #[test]
    fn test_magnitude_filter_navigation() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.set_latitude(40.0);
        mgr.set_lst(6.0);
        mgr.select(0);
        mgr.filter_add(FilterCriterion::MagnitudeLimit(2.5));
        // Index 1 (mag 6.5) snaps forward to index 2 (mag 0.0).
        assert!(mgr.set_index(1));
        assert_eq!(mgr.index(), Some(2));
        let mut visited = Vec::new();
        for _ in 0..4 {
            assert!(mgr.increment_index());
            assert!(mgr.magnitude().unwrap() < 2.5);
            visited.push(mgr.index().unwrap());
        }
        assert_eq!(visited, [3, 5, 2, 3]);
        assert!(mgr.decrement_index());
        assert_eq!(mgr.index(), Some(2));

        // Nothing passes: navigation gives up after one pass.
        mgr.filters_clear();
        mgr.filter_add(FilterCriterion::from_preset(PresetKind::MagnitudeLimit,
                                                    0));
        mgr.filter_add(FilterCriterion::MagnitudeLimit(-5.0));
        assert!(!mgr.increment_index());
        assert!(!mgr.decrement_index());
        assert!(mgr.index().unwrap() <= 6);
    }

    #[test]
    fn test_constellation_filter() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.set_latitude(40.0);
        mgr.set_lst(6.0);
        mgr.select(0);
        mgr.filter_add(FilterCriterion::Constellation(3));
        assert!(mgr.set_index(0));
        assert_eq!(mgr.index(), Some(3));
        assert!(mgr.increment_index());
        assert_eq!(mgr.index(), Some(4));
        assert!(mgr.increment_index());
        assert_eq!(mgr.index(), Some(6));
        assert!(mgr.increment_index());
        assert_eq!(mgr.index(), Some(3));
    }

    #[test]
    fn test_above_horizon_filter() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        // From latitude +40, dec -80 never rises and Polaris never sets.
        mgr.set_latitude(40.0);
        mgr.set_lst(9.0);
        mgr.select(0);
        mgr.filter_add(FilterCriterion::AboveHorizon);
        for _ in 0..10 {
            assert!(mgr.increment_index());
            assert_ne!(mgr.index(), Some(4));
            assert!(mgr.alt().unwrap() >= 0.0);
        }
        mgr.set_index(5);
        assert_eq!(mgr.index(), Some(5));
    }

    #[test]
    fn test_nearby_filter() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.set_latitude(40.0);
        mgr.set_lst(6.0);
        mgr.set_last_tele_equ(18.5, 38.0);
        mgr.select(0);
        mgr.filter_add(FilterCriterion::from_preset(PresetKind::Nearby, 1));
        assert!(mgr.set_index(0));
        assert_eq!(mgr.index(), Some(2));
        assert!(mgr.distance_from(18.5 * 15.0, 38.0).unwrap() < 5.0);
        assert!(mgr.increment_index());
        assert_eq!(mgr.index(), Some(2));
    }

    #[test]
    fn test_double_separation_filter() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.set_latitude(40.0);
        mgr.set_lst(6.0);
        mgr.select(1);
        mgr.filter_add(FilterCriterion::DoubleMinSeparation(1.0));
        mgr.filter_add(FilterCriterion::DoubleMaxSeparation(10.0));
        assert!(mgr.set_index(0));
        assert_eq!(mgr.index(), Some(1));
        assert!(mgr.increment_index());
        assert_eq!(mgr.index(), Some(1));
    }

    #[test]
    fn test_alt_azm_follow_sidereal_time() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let ticks = ManualTicks::new(0);
        let mut mgr = CatalogManager::new(&registry, &ticks);
        mgr.set_latitude(40.0);
        // Star 6 is at ra 12h, dec 0: on the meridian at LST 12h.
        mgr.set_lst(12.0);
        mgr.select(0);
        mgr.set_index(6);
        assert_abs_diff_eq!(mgr.alt().unwrap(), 50.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mgr.azm().unwrap(), 180.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mgr.ha().unwrap(), 0.0, epsilon = 1e-6);
        assert!(!mgr.alt_dms().unwrap().negative);

        // Two hours later the star is west of the meridian.
        ticks.advance(2 * 3_600_000);
        assert!(mgr.ha().unwrap() > 30.0);
        assert!(mgr.alt().unwrap() < 50.0);
        assert!(mgr.azm().unwrap() > 180.0);
    }

    #[test]
    fn test_topocentric_to_observed_place() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        assert_eq!(mgr.topocentric_to_observed_place(5.0, 20.0), (5.0, 20.0));

        mgr.set_latitude(40.0);
        mgr.set_lst(12.0);
        // On the meridian, refraction only raises the object (increases dec
        // toward the zenith).
        let (ra, dec) = mgr.topocentric_to_observed_place(12.0, 0.0);
        assert_abs_diff_eq!(ra, 12.0, epsilon = 1e-6);
        assert!(dec > 0.0);
        assert!(dec < 0.05);

        // Near the horizon the shift is about half a degree.
        let (_, dec) = mgr.topocentric_to_observed_place(12.0, -49.5);
        assert!(dec - -49.5 > 0.3);

        // Cold, dense air bends light more.
        mgr.set_atmosphere(Atmosphere { pressure_mb: 1040.0,
                                        temperature_c: -20.0 });
        let (_, cold_dec) = mgr.topocentric_to_observed_place(12.0, -49.5);
        assert!(cold_dec > dec);
        // Thin, warm air bends it less.
        mgr.set_atmosphere(Atmosphere { pressure_mb: 700.0,
                                        temperature_c: 30.0 });
        let (_, thin_dec) = mgr.topocentric_to_observed_place(12.0, -49.5);
        assert!(thin_dec < dec);
        assert!(thin_dec > -49.5);
    }

    #[test]
    fn test_variable_period_filter() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        mgr.set_latitude(40.0);
        mgr.set_lst(6.0);
        mgr.select(2);
        mgr.filter_add(FilterCriterion::VariableMaxPeriod(5.0));
        // The 313 day star is skipped; the unknown period always passes.
        assert!(mgr.set_index(0));
        assert_eq!(mgr.index(), Some(1));
        assert_abs_diff_eq!(mgr.period().unwrap(), 1.5, epsilon = 1e-9);
        let mut visited = Vec::new();
        for _ in 0..4 {
            assert!(mgr.increment_index());
            visited.push((mgr.index().unwrap(), mgr.period()));
        }
        assert_eq!(visited, [(2, None), (1, Some(1.5)),
                             (2, None), (1, Some(1.5))]);
        assert!(mgr.increment_index());
        assert_eq!(mgr.period_or_sentinel(), -1.0);

        // The period ceiling leaves other catalog types alone.
        mgr.select(0);
        assert!(mgr.set_index(0));
        assert_eq!(mgr.index(), Some(0));
    }

    #[test]
    fn test_absent_value_sentinels() {
        let fixture = Fixture::new();
        let registry = fixture.registry();
        let mut mgr = CatalogManager::new(&registry, ManualTicks::new(0));
        assert_eq!(mgr.primary_id_or_sentinel(), -1);
        assert_eq!(mgr.position_angle_or_sentinel(), -1);
        assert_eq!(mgr.period_or_sentinel(), -1.0);
        assert_eq!(mgr.bayer_flam_or_sentinel(), -1);
        assert_eq!(mgr.epoch_or_sentinel(), -1);

        mgr.select(0);
        mgr.set_index(0);
        assert_eq!(mgr.primary_id_or_sentinel(), 1);
        assert_eq!(mgr.bayer_flam_or_sentinel(), -1);
        assert_eq!(mgr.position_angle_or_sentinel(), -1);
        assert_eq!(mgr.epoch_or_sentinel(), 2000);
        mgr.set_index(2);
        assert_eq!(mgr.bayer_flam_or_sentinel(), 0);

        mgr.select(1);
        mgr.set_index(2);
        assert_eq!(mgr.position_angle_or_sentinel(), 180);
        assert_eq!(mgr.period_or_sentinel(), -1.0);
    }
}  // mod tests.
