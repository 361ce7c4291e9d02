//! Chinese lunisolar calendar arithmetic.
//!
//! Julian-day conversion, a truncated new-moon ephemeris and an apparent
//! solar-longitude series, combined to locate lunar month 11 (the month
//! containing the winter solstice) and any leap month. All day numbers are
//! local to UTC+8.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// China Standard Time offset in hours
pub const CHINA_TIME_ZONE: f64 = 8.0;

/// Years for which the ephemeris approximation is trusted
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2100;

const SYNODIC_MONTH: f64 = 29.530588853;
/// Julian day of the first new moon of 1900, the k = 0 epoch
const NEW_MOON_EPOCH: f64 = 2415021.076998695;
/// Last Julian day of the Julian calendar (1582-10-04)
const GREGORIAN_CUTOVER: i64 = 2299160;

/// A date in the Chinese lunar calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub leap: bool,
}

impl LunarDate {
    /// First day of the first (non-leap) month
    pub fn new_year(year: i32) -> Self {
        Self { day: 1, month: 1, year, leap: false }
    }
}

/// Julian day number of a Gregorian (or, before 1582-10-15, Julian) date
pub fn jd_from_date(day: i64, month: i64, year: i64) -> i64 {
    let a = (14 - month).div_euclid(12);
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jd = day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045;
    if jd < GREGORIAN_CUTOVER + 1 {
        day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4) - 32083
    } else {
        jd
    }
}

/// Gregorian date of a Julian day number
pub fn jd_to_date(jd: i64) -> Result<NaiveDate> {
    let (b, c) = if jd > GREGORIAN_CUTOVER {
        let a = jd + 32044;
        let b = (4 * a + 3).div_euclid(146097);
        (b, a - (146097 * b).div_euclid(4))
    } else {
        (0, jd + 32082)
    };
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2).div_euclid(153);
    let day = e - (153 * m + 2).div_euclid(5) + 1;
    let month = m + 3 - 12 * m.div_euclid(10);
    let year = b * 100 + d - 4800 + m.div_euclid(10);

    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .ok_or_else(|| Error::InvalidDate(format!("julian day {} -> {}-{}-{}", jd, year, month, day)))
}

/// Julian day (fractional, UT) of the k-th new moon after the 1900 epoch
pub fn new_moon(k: f64) -> f64 {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let dr = PI / 180.0;

    let mut jd1 = 2415020.75933 + 29.53058868 * k + 0.0001178 * t2 - 0.000000155 * t3;
    jd1 += 0.00033 * ((166.56 + 132.87 * t - 0.009173 * t2) * dr).sin();

    // Sun's mean anomaly, moon's mean anomaly, moon's argument of latitude
    let m = 359.2242 + 29.10535608 * k - 0.0000333 * t2 - 0.00000347 * t3;
    let mpr = 306.0253 + 385.81691806 * k + 0.0107306 * t2 + 0.00001236 * t3;
    let f = 21.2964 + 390.67050646 * k - 0.0016528 * t2 - 0.00000239 * t3;

    let c1 = (0.1734 - 0.000393 * t) * (m * dr).sin() + 0.0021 * (2.0 * m * dr).sin()
        - 0.4068 * (mpr * dr).sin()
        + 0.0161 * (2.0 * mpr * dr).sin()
        - 0.0004 * (3.0 * mpr * dr).sin()
        + 0.0104 * (2.0 * f * dr).sin()
        - 0.0051 * ((m + mpr) * dr).sin()
        - 0.0074 * ((m - mpr) * dr).sin()
        + 0.0004 * ((2.0 * f + m) * dr).sin()
        - 0.0004 * ((2.0 * f - m) * dr).sin()
        - 0.0006 * ((2.0 * f + mpr) * dr).sin()
        + 0.0010 * ((2.0 * f - mpr) * dr).sin()
        + 0.0005 * ((2.0 * mpr + m) * dr).sin();

    let delta_t = if t < -11.0 {
        0.001 + 0.000839 * t + 0.0002261 * t2 - 0.00000845 * t3 - 0.000000081 * t * t3
    } else {
        -0.000278 + 0.000265 * t + 0.000262 * t2
    };

    jd1 + c1 - delta_t
}

/// Apparent solar longitude in radians, normalized to [0, 2π)
pub fn sun_longitude(jdn: f64) -> f64 {
    let t = (jdn - 2451545.0) / 36525.0;
    let t2 = t * t;
    let dr = PI / 180.0;

    let m = 357.52910 + 35999.05030 * t - 0.0001559 * t2 - 0.00000048 * t * t2;
    let l0 = 280.46645 + 36000.76983 * t + 0.0003032 * t2;
    let dl = (1.914600 - 0.004817 * t - 0.000014 * t2) * (m * dr).sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m * dr).sin()
        + 0.000290 * (3.0 * m * dr).sin();

    let l = (l0 + dl) * dr;
    l - 2.0 * PI * (l / (2.0 * PI)).floor()
}

/// Local day number on which the k-th new moon falls
pub fn new_moon_day(k: i64, time_zone: f64) -> i64 {
    (new_moon(k as f64) + 0.5 + time_zone / 24.0).floor() as i64
}

/// Solar term sector (0..=11, 30° each) at the start of a local day
pub fn sun_longitude_sector(day_number: i64, time_zone: f64) -> i64 {
    (sun_longitude(day_number as f64 - 0.5 - time_zone / 24.0) / (PI / 6.0)).floor() as i64
}

/// Day number of the start of lunar month 11 in the given Gregorian year
pub fn lunar_month_11(year: i32, time_zone: f64) -> i64 {
    let off = jd_from_date(31, 12, year as i64) - 2415021;
    let k = (off as f64 / SYNODIC_MONTH).floor() as i64;
    let nm = new_moon_day(k, time_zone);
    if sun_longitude_sector(nm, time_zone) >= 9 {
        new_moon_day(k - 1, time_zone)
    } else {
        nm
    }
}

fn lunation_index(day_number: i64) -> i64 {
    (0.5 + (day_number as f64 - NEW_MOON_EPOCH) / SYNODIC_MONTH).floor() as i64
}

/// Offset (in months after month 11) of the leap month following `a11`
pub fn leap_month_offset(a11: i64, time_zone: f64) -> i64 {
    let k = lunation_index(a11);
    let mut last = 0;
    let mut i = 1;
    let mut arc = sun_longitude_sector(new_moon_day(k + i, time_zone), time_zone);
    while arc != last && i < 14 {
        last = arc;
        i += 1;
        arc = sun_longitude_sector(new_moon_day(k + i, time_zone), time_zone);
    }
    i - 1
}

/// Convert a lunar date to its Gregorian date.
///
/// Fails with [`Error::InvalidLeapMonth`] when `leap` is set on a month
/// that is not the leap month of that lunar year.
pub fn lunar_to_solar(date: LunarDate, time_zone: f64) -> Result<NaiveDate> {
    let (a11, b11) = if date.month < 11 {
        (
            lunar_month_11(date.year - 1, time_zone),
            lunar_month_11(date.year, time_zone),
        )
    } else {
        (
            lunar_month_11(date.year, time_zone),
            lunar_month_11(date.year + 1, time_zone),
        )
    };

    let k = lunation_index(a11);
    let mut off = date.month as i64 - 11;
    if off < 0 {
        off += 12;
    }

    if b11 - a11 > 365 {
        let leap_off = leap_month_offset(a11, time_zone);
        let mut leap_month = leap_off - 2;
        if leap_month < 0 {
            leap_month += 12;
        }
        if date.leap && date.month as i64 != leap_month {
            return Err(Error::InvalidLeapMonth {
                month: date.month,
                year: date.year,
            });
        }
        if date.leap || off >= leap_off {
            off += 1;
        }
    } else if date.leap {
        return Err(Error::InvalidLeapMonth {
            month: date.month,
            year: date.year,
        });
    }

    let month_start = new_moon_day(k + off, time_zone);
    jd_to_date(month_start + date.day as i64 - 1)
}

/// Gregorian date of Chinese New Year, or `None` outside [`SUPPORTED_YEARS`]
pub fn chinese_new_year_date(year: i32) -> Result<Option<NaiveDate>> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Ok(None);
    }
    lunar_to_solar(LunarDate::new_year(year), CHINA_TIME_ZONE).map(Some)
}
