// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use std::time::SystemTime;

use canonical_error::CanonicalError;
use env_logger;
use log::{info, warn};
use pico_args::Arguments;

use cedar_catalog::catalog_filter::{FilterCriterion, PresetKind};
use cedar_catalog::catalog_manager::CatalogManager;
use cedar_catalog::catalog_registry::{CatalogDescriptor, CatalogRegistry,
                                      NameTables};
use cedar_catalog::catalog_types::{quantize_dec, quantize_magnitude,
                                   quantize_ra_hours, CatalogRecord,
                                   CatalogType, DsoCompactRecord,
                                   GenStarCompactRecord, RecordHeader,
                                   NO_CONSTELLATION};
use cedar_catalog::tick_trait::SystemTicks;

const CONSTELLATIONS: [&str; 88] = [
    "And", "Ant", "Aps", "Aql", "Aqr", "Ara", "Ari", "Aur", "Boo", "CMa",
    "CMi", "CVn", "Cae", "Cam", "Cap", "Car", "Cas", "Cen", "Cep", "Cet",
    "Cha", "Cir", "Cnc", "Col", "Com", "CrA", "CrB", "Crt", "Cru", "Crv",
    "Cyg", "Del", "Dor", "Dra", "Equ", "Eri", "For", "Gem", "Gru", "Her",
    "Hor", "Hya", "Hyi", "Ind", "LMi", "Lac", "Leo", "Lep", "Lib", "Lup",
    "Lyn", "Lyr", "Men", "Mic", "Mon", "Mus", "Nor", "Oct", "Oph", "Ori",
    "Pav", "Peg", "Per", "Phe", "Pic", "PsA", "Psc", "Pup", "Pyx", "Ret",
    "Scl", "Sco", "Sct", "Ser", "Sex", "Sge", "Sgr", "Tau", "Tel", "TrA",
    "Tri", "Tuc", "UMa", "UMi", "Vel", "Vir", "Vol", "Vul",
];

const OBJECT_TYPES: [&str; 17] = [
    "Galaxy", "Open Cluster", "Star", "Double Star", "Other", "Galaxy Pair",
    "Galaxy Triplet", "Galaxy Group", "Globular Cluster", "Planetary Nebula",
    "Nebula", "Hii Region", "Cluster + Nebula", "Asterism",
    "Reflection Nebula", "SN Remnant", "Dark Nebula",
];

fn con(abbrev: &str) -> u8 {
    CONSTELLATIONS.iter().position(|c| *c == abbrev)
        .map_or(NO_CONSTELLATION, |p| p as u8)
}

// (ra h, dec, mag, constellation, Bayer/Flamsteed code, name)
const STARS: [(f64, f64, f64, &str, u8, &str); 8] = [
    (2.5303, 89.2641, 2.0, "UMi", 0, "Polaris"),
    (5.2423, -8.2016, 0.1, "Ori", 1, "Rigel"),
    (5.9195, 7.4071, 0.5, "Ori", 0, "Betelgeuse"),
    (6.7525, -16.7161, -1.5, "CMa", 0, "Sirius"),
    (13.3988, 54.9254, 2.2, "UMa", 29, ""),
    (14.2610, 19.1824, -0.1, "Boo", 0, "Arcturus"),
    (18.6156, 38.7837, 0.0, "Lyr", 0, "Vega"),
    (20.6905, 45.2803, 1.3, "Cyg", 0, "Deneb"),
];

// (id, ra h, dec, mag, constellation, object type, name)
const MESSIER: [(u16, f64, f64, f64, &str, u8, &str); 7] = [
    (31, 0.7123, 41.2689, 3.4, "And", 0, "Andromeda Galaxy"),
    (45, 3.7833, 24.1167, 1.6, "Tau", 1, "Pleiades"),
    (1, 5.5756, 22.0145, 8.4, "Tau", 15, "Crab Nebula"),
    (42, 5.5881, -5.3911, 4.0, "Ori", 10, "Orion Nebula"),
    (81, 9.9259, 69.0653, 6.9, "UMa", 0, "Bode's Galaxy"),
    (13, 16.6949, 36.4613, 5.8, "Her", 8, ""),
    (57, 18.8930, 33.0292, 8.8, "Lyr", 9, "Ring Nebula"),
];

fn name_string(names: impl Iterator<Item = &'static str>) -> String {
    names.filter(|n| !n.is_empty()).collect::<Vec<_>>().join(";")
}

fn star_records() -> Vec<u8> {
    let mut bytes = Vec::new();
    for (ra, dec, mag, c, bf, name) in STARS {
        GenStarCompactRecord {
            header: RecordHeader {
                has_name: !name.is_empty(),
                has_sub_id: false,
                constellation: con(c),
                code: bf,
            },
            mag: quantize_magnitude(Some(mag)),
            ra: quantize_ra_hours(ra),
            dec: quantize_dec(dec),
        }.encode(&mut bytes);
    }
    bytes
}

fn messier_records() -> Vec<u8> {
    let mut bytes = Vec::new();
    for (id, ra, dec, mag, c, obj_type, name) in MESSIER {
        DsoCompactRecord {
            header: RecordHeader {
                has_name: !name.is_empty(),
                has_sub_id: false,
                constellation: con(c),
                code: obj_type,
            },
            obj_id: id,
            mag: quantize_magnitude(Some(mag)),
            ra: quantize_ra_hours(ra),
            dec: quantize_dec(dec),
        }.encode(&mut bytes);
    }
    bytes
}

fn main() -> Result<(), CanonicalError> {
    const HELP: &str = "\
    USAGE:
      catalog-walk [OPTIONS]

    OPTIONS:
      -h, --help                     Prints help information
      --lat NUMBER                   Observer latitude, degrees [40.0]
      --lon NUMBER                   Observer longitude, degrees east [-74.0]
      --mag NUMBER                   Magnitude limit preset index
      --above_horizon                Skip objects below the horizon
    ";

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        println!("{}", HELP);
        std::process::exit(0);
    }
    let lat: f64 = pargs.value_from_str("--lat").unwrap_or(40.0);
    let lon: f64 = pargs.value_from_str("--lon").unwrap_or(-74.0);
    let mag_preset: Option<usize> =
        pargs.opt_value_from_str("--mag").unwrap_or(None);
    let above_horizon = pargs.contains("--above_horizon");

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")).init();

    let stars = star_records();
    let star_names = name_string(STARS.iter().map(|s| s.5));
    let messier = messier_records();
    let messier_names = name_string(MESSIER.iter().map(|m| m.6));

    let registry = CatalogRegistry::new(
        vec![
            CatalogDescriptor::new("Stars", "Star ", CatalogType::GenStarCompact,
                                   &stars, &star_names, "", 2000)?,
            CatalogDescriptor::new("Messier", "M", CatalogType::DsoCompact,
                                   &messier, &messier_names, "", 2000)?,
            CatalogDescriptor::sentinel(),
        ],
        NameTables { constellations: &CONSTELLATIONS,
                     object_types: &OBJECT_TYPES });

    let mut mgr = CatalogManager::new(&registry, SystemTicks::new());
    mgr.set_latitude(lat);
    mgr.set_lst_from_time(&SystemTime::now(), lon);
    info!("LST {:.4}h at latitude {:.2}", mgr.lst_hours(), lat);
    if let Some(p) = mag_preset {
        mgr.filter_add(FilterCriterion::from_preset(PresetKind::MagnitudeLimit,
                                                    p));
    }
    if above_horizon {
        mgr.filter_add(FilterCriterion::AboveHorizon);
    }

    for n in 0..mgr.num_catalogs() as i32 {
        mgr.select(n);
        info!("{} ({} objects)", mgr.catalog_title(),
              mgr.max_index().map_or(0, |m| m + 1));
        if !mgr.set_index(0) {
            warn!("Nothing in {} passes the filter", mgr.catalog_title());
            continue;
        }
        let first = mgr.index();
        loop {
            let (Some(ra), Some(dec), Some(alt), Some(azm)) =
                (mgr.ra_hms(), mgr.dec_dms(), mgr.alt(), mgr.azm()) else {
                break;
            };
            info!("{}{} {} {} {}  {:02}h{:02}m{:02}s {}{:02}d{:02}m  \
                   mag {:.1}  alt {:.1} azm {:.1}",
                  mgr.catalog_prefix(), mgr.primary_id().unwrap_or(0),
                  mgr.object_name_str(), mgr.constellation_str(),
                  mgr.object_type_str(),
                  ra.hours, ra.minutes, ra.seconds,
                  if dec.negative { "-" } else { "+" },
                  dec.degrees, dec.minutes,
                  mgr.magnitude_or_sentinel(), alt, azm);
            if !mgr.increment_index() || mgr.index() == first {
                break;
            }
        }
    }
    Ok(())
}
