// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use std::time::SystemTime;

use log::debug;

use crate::astro_util::{local_sidereal_time_hours, wrap_degrees, LocalFrame,
                        SIDEREAL_RATE};

/// Latitudes at or beyond this value mean "unset".
pub const LATITUDE_UNSET: f64 = 9999.0;

/// Where and when the observer is. Everything is pushed in by the host; LST
/// is extrapolated from the tick count at which it was seeded.
#[derive(Debug, Clone, Default)]
pub struct ObserverState {
    // Degrees, with cached sin/cos.
    latitude: Option<f64>,
    sin_lat: f64,
    cos_lat: f64,

    // Hours. Zero means not seeded.
    lst_t0: f64,
    lst_ticks_t0: u32,

    // Most recent telescope pointing, degrees.
    last_tele_ra: f64,
    last_tele_dec: f64,
}

impl ObserverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// lat: degrees. Values >= LATITUDE_UNSET clear the latitude.
    pub fn set_latitude(&mut self, lat: f64) {
        if lat >= LATITUDE_UNSET {
            self.latitude = None;
            return;
        }
        self.latitude = Some(lat);
        self.sin_lat = lat.to_radians().sin();
        self.cos_lat = lat.to_radians().cos();
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// Seeds local sidereal time (hours) as of tick `now_ticks`.
    pub fn set_lst(&mut self, lst_hours: f64, now_ticks: u32) {
        debug!("LST seeded to {:.5}h at tick {}", lst_hours, now_ticks);
        self.lst_t0 = lst_hours;
        self.lst_ticks_t0 = now_ticks;
    }

    /// Seeds local sidereal time from wall-clock time.
    /// longitude: degrees, positive east.
    pub fn set_lst_from_time(&mut self, time: &SystemTime, longitude: f64,
                             now_ticks: u32) {
        self.set_lst(local_sidereal_time_hours(time, longitude), now_ticks);
    }

    /// ra: hours. dec: degrees.
    pub fn set_last_tele_equ(&mut self, ra: f64, dec: f64) {
        self.last_tele_ra = ra * 15.0;
        self.last_tele_dec = dec;
    }

    /// Last telescope pointing as (ra, dec), both degrees.
    pub fn last_tele_equ(&self) -> (f64, f64) {
        (self.last_tele_ra, self.last_tele_dec)
    }

    pub fn is_initialized(&self) -> bool {
        self.latitude.is_some() && self.lst_t0 != 0.0
    }

    /// Local sidereal time in hours at tick `now_ticks`. Not wrapped.
    pub fn lst_hours(&self, now_ticks: u32) -> f64 {
        let ms_since_t0 = now_ticks.wrapping_sub(self.lst_ticks_t0) as f64;
        let sidereal_seconds = (ms_since_t0 / 1000.0) * SIDEREAL_RATE;
        self.lst_t0 + sidereal_seconds / 3600.0
    }

    /// Local sidereal time in degrees, 0..360.
    pub fn lst_degrees(&self, now_ticks: u32) -> f64 {
        wrap_degrees(self.lst_hours(now_ticks) * 15.0)
    }

    /// None until both latitude and LST are set.
    pub fn frame(&self, now_ticks: u32) -> Option<LocalFrame> {
        if !self.is_initialized() {
            return None;
        }
        Some(LocalFrame {
            sin_lat: self.sin_lat,
            cos_lat: self.cos_lat,
            lst_degrees: self.lst_degrees(now_ticks),
        })
    }
}

// mod tests.
