//! Lunar calendar and zodiac engine
//!
//! Pure date arithmetic: no I/O, no randomness.

pub mod calendar;
pub mod zodiac;

pub use calendar::{chinese_new_year_date, lunar_to_solar, LunarDate, CHINA_TIME_ZONE, SUPPORTED_YEARS};
pub use zodiac::{chinese_zodiac, BoundaryAnswer, ChineseZodiac, WesternZodiac};
