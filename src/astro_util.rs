// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use std::time::SystemTime;

use astro::angle::anglr_sepr;
use astro::time::{julian_day, mn_sidr, CalType, Date};
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Degrees per radian.
pub const RAD: f64 = 57.29577951308232;

/// Sidereal seconds elapsed per solar second.
pub const SIDEREAL_RATE: f64 = 1.00277778;

/// Observer-dependent quantities needed to move between the equatorial and
/// horizon frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub sin_lat: f64,
    pub cos_lat: f64,
    /// Local sidereal time, degrees.
    pub lst_degrees: f64,
}

impl LocalFrame {
    /// lat: observer latitude in degrees.
    pub fn new(lat: f64, lst_degrees: f64) -> Self {
        LocalFrame {
            sin_lat: (lat / RAD).sin(),
            cos_lat: (lat / RAD).cos(),
            lst_degrees,
        }
    }
}

/// Atmospheric conditions used for the refraction estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub pressure_mb: f64,
    pub temperature_c: f64,
}

impl Default for Atmosphere {
    fn default() -> Self {
        Atmosphere { pressure_mb: 1010.0, temperature_c: 10.0 }
    }
}

/// Reduces degrees into [0, 360).
pub fn wrap_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs.
    if a >= 360.0 { 0.0 } else { a }
}

/// Hour angle (degrees, -180..180] of an object at `ra` (degrees).
pub fn hour_angle(ra: f64, lst_degrees: f64) -> f64 {
    let h = wrap_degrees(lst_degrees - ra);
    if h > 180.0 { h - 360.0 } else { h }
}

/// Returns (alt, azm) in degrees. Azimuth is clockwise from north, 0..360.
/// ra, dec: degrees.
pub fn equ_to_hor(ra: f64, dec: f64, frame: &LocalFrame) -> (f64, f64) {
    let ha = wrap_degrees(frame.lst_degrees - ra) / RAD;
    let dec = dec / RAD;
    let sin_alt = dec.sin() * frame.sin_lat + dec.cos() * frame.cos_lat * ha.cos();
    let alt = sin_alt.clamp(-1.0, 1.0).asin();

    // Meeus' azimuth is measured from south; shift to north.
    let t1 = ha.sin();
    let t2 = ha.cos() * frame.sin_lat - dec.tan() * frame.cos_lat;
    let azm = wrap_degrees(t1.atan2(t2) * RAD + 180.0);

    (alt * RAD, azm)
}

/// Returns (ra, dec) in degrees, ra 0..360.
/// alt, azm: degrees, azimuth clockwise from north.
pub fn hor_to_equ(alt: f64, azm: f64, frame: &LocalFrame) -> (f64, f64) {
    let azm = wrap_degrees(azm) / RAD;
    let alt = alt / RAD;
    let sin_dec = alt.sin() * frame.sin_lat + alt.cos() * frame.cos_lat * azm.cos();
    let dec = sin_dec.clamp(-1.0, 1.0).asin();

    let t1 = azm.sin();
    let t2 = azm.cos() * frame.sin_lat - alt.tan() * frame.cos_lat;
    let ha = wrap_degrees(t1.atan2(t2) * RAD + 180.0);

    (wrap_degrees(frame.lst_degrees - ha), dec * RAD)
}

fn cot(x: f64) -> f64 {
    1.0 / x.tan()
}

// Below this true altitude (degrees) the refraction formula diverges.
const MIN_REFRACTION_ALT: f64 = -5.0;

/// Returns the refraction, in arc-minutes, at the given true altitude
/// (degrees). Never negative; zero for altitudes below -5 degrees.
pub fn true_refraction(alt: f64, atmosphere: &Atmosphere) -> f64 {
    if alt < MIN_REFRACTION_ALT {
        return 0.0;
    }
    let tpc = (atmosphere.pressure_mb / 1010.0)
        * (283.0 / (273.0 + atmosphere.temperature_c));
    let r = 1.02 * cot((alt + 10.3 / (alt + 5.11)) / RAD) * tpc;
    r.max(0.0)
}

/// Returns the separation, in degrees, between the given celestial
/// coordinates (in degrees).
pub fn angular_separation_deg(p0_ra: f64, p0_dec: f64,
                              p1_ra: f64, p1_dec: f64) -> f64 {
    anglr_sepr(p0_ra / RAD, p0_dec / RAD, p1_ra / RAD, p1_dec / RAD) * RAD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// Sign is kept apart so that e.g. -0d30m is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
    pub negative: bool,
    pub degrees: u16,
    pub minutes: u8,
    pub seconds: u8,
}

/// Truncating decomposition of non-negative hours.
pub fn hms_from_hours(hours: f64) -> Hms {
    let h = hours.floor();
    let m = (hours - h) * 60.0;
    let s = (m - m.floor()) * 60.0;
    Hms { hours: h as u8, minutes: m as u8, seconds: s as u8 }
}

/// Truncating decomposition of signed degrees.
pub fn dms_from_degrees(degrees: f64) -> Dms {
    let negative = degrees < 0.0;
    let f = degrees.abs();
    let d = f.floor();
    let m = (f - d) * 60.0;
    let s = (m - m.floor()) * 60.0;
    Dms { negative, degrees: d as u16, minutes: m as u8, seconds: s as u8 }
}

/// Returns Greenwich mean sidereal time in radians, 0..2pi.
pub fn greenwich_mean_sidereal_time_from_system_time(time: &SystemTime) -> f64 {
    let dt_utc = DateTime::<Utc>::from(*time);
    let date = Date {
        year: dt_utc.date_naive().year() as i16,
        month: dt_utc.date_naive().month() as u8,
        decimal_day: dt_utc.date_naive().day() as f64,
        cal_type: CalType::Gregorian,
    };
    let jd = julian_day(&date);

    let utc_hours = dt_utc.time().num_seconds_from_midnight() as f64 / 3600.0;
    let gmst_hours =
        mn_sidr(jd).to_degrees() / 15.0 + utc_hours * 1.00273790935;

    wrap_degrees(gmst_hours * 15.0) / RAD
}

/// Local mean sidereal time in hours, 0..24.
/// longitude: degrees, positive east.
pub fn local_sidereal_time_hours(time: &SystemTime, longitude: f64) -> f64 {
    let gmst = greenwich_mean_sidereal_time_from_system_time(time) * RAD;
    wrap_degrees(gmst + longitude) / 15.0
}

#[cfg(test)]
mod tests {
    extern crate approx;
    use std::time::Duration;

    use approx::assert_abs_diff_eq;
    use astro::angle::{deg_frm_dms, deg_frm_hms};
    use chrono::{FixedOffset, TimeZone};

    use super::*;

    fn mizar_time() -> SystemTime {
        let dt = FixedOffset::west_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 7, 23, 56, 0)
            .unwrap();
        SystemTime::UNIX_EPOCH
            .checked_add(Duration::from_secs_f64(
                dt.timestamp_millis() as f64 / 1000.0,
            ))
            .unwrap()
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_abs_diff_eq!(wrap_degrees(-90.0), 270.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_degrees(725.0), 5.0, epsilon = 1e-12);
        assert!(wrap_degrees(-1e-15) < 360.0);
    }

    #[test]
    fn test_hour_angle() {
        assert_abs_diff_eq!(hour_angle(10.0, 40.0), 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hour_angle(350.0, 10.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hour_angle(40.0, 10.0), -30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hour_angle(0.0, 180.0), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alt_az_equatorial_conversion() {
        let mizar_ra = deg_frm_hms(13, 23, 55.5);
        let mizar_dec = deg_frm_dms(54, 55, 31.3);

        let lst = local_sidereal_time_hours(&mizar_time(), -122.0);
        let frame = LocalFrame::new(37.0, lst * 15.0);
        let (alt, azm) = equ_to_hor(mizar_ra, mizar_dec, &frame);

        // Expected values obtained from SkySafari.
        assert_abs_diff_eq!(alt, deg_frm_dms(58, 52, 14.3), epsilon = 0.5);
        assert_abs_diff_eq!(azm, deg_frm_dms(42, 59, 36.7), epsilon = 0.5);
        assert_abs_diff_eq!(hour_angle(mizar_ra, frame.lst_degrees),
                            -deg_frm_hms(2, 29, 50.9), epsilon = 0.5);

        // Now go the other way.
        let (ra, dec) = hor_to_equ(alt, azm, &frame);
        assert_abs_diff_eq!(ra, mizar_ra, epsilon = 1e-6);
        assert_abs_diff_eq!(dec, mizar_dec, epsilon = 1e-6);
    }

    #[test]
    fn test_round_trip_across_sky() {
        for lat in [-60.0, -12.5, 0.0, 37.0, 80.0] {
            let frame = LocalFrame::new(lat, 123.4);
            for (ra, dec) in [(0.0, 0.0), (45.0, 30.0), (200.0, -40.0),
                              (359.5, 70.0), (123.4, -5.0)] {
                let (alt, azm) = equ_to_hor(ra, dec, &frame);
                assert!((0.0..360.0).contains(&azm));
                let (ra2, dec2) = hor_to_equ(alt, azm, &frame);
                assert_abs_diff_eq!(dec2, dec, epsilon = 1e-6);
                let dra = hour_angle(ra2, ra);
                assert_abs_diff_eq!(dra, 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_meridian_transit() {
        // An object on the meridian culminates at 90 - |lat - dec|, due south
        // for dec < lat.
        let frame = LocalFrame::new(40.0, 100.0);
        let (alt, azm) = equ_to_hor(100.0, 10.0, &frame);
        assert_abs_diff_eq!(alt, 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(azm, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_true_refraction() {
        let atm = Atmosphere::default();
        assert_abs_diff_eq!(true_refraction(0.0, &atm), 28.98, epsilon = 0.05);
        let high = true_refraction(89.0, &atm);
        assert!(high >= 0.0);
        assert!(high < 0.05);
        assert_eq!(true_refraction(90.0, &atm), 0.0);
        // Colder, denser air refracts more.
        let cold = Atmosphere { pressure_mb: 1030.0, temperature_c: -10.0 };
        assert!(true_refraction(5.0, &cold) > true_refraction(5.0, &atm));
    }

    #[test]
    fn test_true_refraction_below_horizon() {
        let atm = Atmosphere::default();
        // Finite and modest down to the cutoff.
        let at_cutoff = true_refraction(-5.0, &atm);
        assert!(at_cutoff >= 0.0);
        assert!(at_cutoff < 5.0);
        // The formula's pole near -5.11 degrees is never reached.
        assert_eq!(true_refraction(-5.05, &atm), 0.0);
        assert_eq!(true_refraction(-5.1099, &atm), 0.0);
        assert_eq!(true_refraction(-30.0, &atm), 0.0);
        assert_eq!(true_refraction(-90.0, &atm), 0.0);
    }

    #[test]
    fn test_angular_separation_deg() {
        assert_abs_diff_eq!(angular_separation_deg(10.0, 0.0, 20.0, 0.0),
                            10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angular_separation_deg(0.0, 89.0, 180.0, 89.0),
                            2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sexagesimal() {
        assert_eq!(hms_from_hours(13.5),
                   Hms { hours: 13, minutes: 30, seconds: 0 });
        assert_eq!(hms_from_hours(deg_frm_hms(5, 55, 10.3) / 15.0),
                   Hms { hours: 5, minutes: 55, seconds: 10 });
        assert_eq!(dms_from_degrees(-0.5),
                   Dms { negative: true, degrees: 0, minutes: 30, seconds: 0 });
        assert_eq!(dms_from_degrees(deg_frm_dms(54, 55, 31.3)),
                   Dms { negative: false, degrees: 54, minutes: 55,
                         seconds: 31 });
    }
}  // mod tests.
