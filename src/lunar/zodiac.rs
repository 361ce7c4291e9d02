//! Western and Chinese zodiac classification

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::chinese_new_year_date;
use crate::error::{Error, Result};

/// Western sun sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WesternZodiac {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl WesternZodiac {
    pub const ALL: [WesternZodiac; 12] = [
        WesternZodiac::Aries,
        WesternZodiac::Taurus,
        WesternZodiac::Gemini,
        WesternZodiac::Cancer,
        WesternZodiac::Leo,
        WesternZodiac::Virgo,
        WesternZodiac::Libra,
        WesternZodiac::Scorpio,
        WesternZodiac::Sagittarius,
        WesternZodiac::Capricorn,
        WesternZodiac::Aquarius,
        WesternZodiac::Pisces,
    ];

    /// Sign for a month/day pair; both boundary days are inclusive.
    ///
    /// Anything that matches no range (including out-of-range input)
    /// falls through to Pisces.
    pub fn from_month_day(month: u32, day: u32) -> Self {
        let md = (month, day);
        let within = |start: (u32, u32), end: (u32, u32)| md >= start && md <= end;

        if within((3, 21), (4, 19)) {
            WesternZodiac::Aries
        } else if within((4, 20), (5, 20)) {
            WesternZodiac::Taurus
        } else if within((5, 21), (6, 20)) {
            WesternZodiac::Gemini
        } else if within((6, 21), (7, 22)) {
            WesternZodiac::Cancer
        } else if within((7, 23), (8, 22)) {
            WesternZodiac::Leo
        } else if within((8, 23), (9, 22)) {
            WesternZodiac::Virgo
        } else if within((9, 23), (10, 22)) {
            WesternZodiac::Libra
        } else if within((10, 23), (11, 21)) {
            WesternZodiac::Scorpio
        } else if within((11, 22), (12, 21)) {
            WesternZodiac::Sagittarius
        } else if (month == 12 && day >= 22) || within((1, 1), (1, 19)) {
            WesternZodiac::Capricorn
        } else if within((1, 20), (2, 18)) {
            WesternZodiac::Aquarius
        } else {
            WesternZodiac::Pisces
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::from_month_day(date.month(), date.day())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WesternZodiac::Aries => "Aries",
            WesternZodiac::Taurus => "Taurus",
            WesternZodiac::Gemini => "Gemini",
            WesternZodiac::Cancer => "Cancer",
            WesternZodiac::Leo => "Leo",
            WesternZodiac::Virgo => "Virgo",
            WesternZodiac::Libra => "Libra",
            WesternZodiac::Scorpio => "Scorpio",
            WesternZodiac::Sagittarius => "Sagittarius",
            WesternZodiac::Capricorn => "Capricorn",
            WesternZodiac::Aquarius => "Aquarius",
            WesternZodiac::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for WesternZodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WesternZodiac {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|sign| sign.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_profile("western_zodiac", format!("unknown sign '{}'", s)))
    }
}

const ELEMENTS: [&str; 10] = [
    "Wood", "Wood", "Fire", "Fire", "Earth", "Earth", "Metal", "Metal", "Water", "Water",
];

const ANIMALS: [&str; 12] = [
    "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake", "Horse", "Goat", "Monkey", "Rooster",
    "Dog", "Pig",
];

/// Start of the current sexagenary cycle (Wood Rat)
const CYCLE_EPOCH: i32 = 1984;

/// One of the 60 (element, animal) combinations, or unknown
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChineseZodiac {
    Sign {
        element: &'static str,
        animal: &'static str,
    },
    Unknown,
}

impl ChineseZodiac {
    /// Sign of a zodiac (lunar) year
    pub fn for_year(year: i32) -> Self {
        let offset = (year - CYCLE_EPOCH).rem_euclid(60) as usize;
        ChineseZodiac::Sign {
            element: ELEMENTS[offset % 10],
            animal: ANIMALS[offset % 12],
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ChineseZodiac::Sign { .. })
    }

    pub fn animal(&self) -> Option<&'static str> {
        match self {
            ChineseZodiac::Sign { animal, .. } => Some(animal),
            ChineseZodiac::Unknown => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ChineseZodiac::Sign { element, animal } => format!("{} {}", element, animal),
            ChineseZodiac::Unknown => "Unknown".to_string(),
        }
    }
}

impl Serialize for ChineseZodiac {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl fmt::Display for ChineseZodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Manual answer to "were you born before Chinese New Year?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryAnswer {
    Yes,
    No,
}

impl FromStr for BoundaryAnswer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(BoundaryAnswer::Yes),
            "no" | "n" => Ok(BoundaryAnswer::No),
            other => Err(Error::invalid_profile(
                "boundary",
                format!("expected 'yes' or 'no', got '{}'", other),
            )),
        }
    }
}

/// Chinese zodiac of a birth date.
///
/// Inside the supported range the lunar boundary is computed. Outside it the
/// caller must supply `boundary`; without one the result is
/// [`ChineseZodiac::Unknown`].
pub fn chinese_zodiac(date: NaiveDate, boundary: Option<BoundaryAnswer>) -> Result<ChineseZodiac> {
    let year = date.year();
    let zodiac_year = match chinese_new_year_date(year)? {
        Some(new_year) if date < new_year => year - 1,
        Some(_) => year,
        None => match boundary {
            Some(BoundaryAnswer::Yes) => year - 1,
            Some(BoundaryAnswer::No) => year,
            None => return Ok(ChineseZodiac::Unknown),
        },
    };
    Ok(ChineseZodiac::for_year(zodiac_year))
}
