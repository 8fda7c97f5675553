//! Date field formats: option lists and sub-field values per calendar variant.
//!
//! A date field is edited as three sub-fields (day, month, year). The active
//! [`DateFormat`] decides how each is spelled:
//!
//! | Format       | Day      | Month            | Year                 |
//! |--------------|----------|------------------|----------------------|
//! | `EU`         | `01`-`31`| `01`-`12`        | `2024`               |
//! | `US`         | `01`-`31`| `01`-`12`        | `2024`               |
//! | `EUs`        | `01`-`31`| `01`-`12`        | `24`                 |
//! | `THsBC`      | `1`-`31` | `ม.ค.`           | `2024`               |
//! | `THsBB`      | `1`-`31` | `ม.ค.`           | `2567` (+543)        |
//! | `THBC`       | `1`-`31` | `มกราคม`         | `2024`               |
//! | `THBB`       | `1`-`31` | `มกราคม`         | `2567` (+543)        |
//! | `THBCnumber` | `๑`-`๓๑` | `มกราคม`         | `๒๐๒๔`               |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pdf_field_mapper::dates::{format_date, DateFormat};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
//! let parts = format_date(date, DateFormat::ThaiFullMonthBuddhist);
//! assert_eq!(parts.day, "7");
//! assert_eq!(parts.month, "มีนาคม");
//! assert_eq!(parts.year, "2567");
//! ```

pub mod state;

pub use state::{DateElements, DateEvent, DateFieldState, DateMode, DatePart};

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Offset from the Christian era to the Buddhist era.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Full Thai month names, January first.
pub const THAI_MONTHS_FULL: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

/// Abbreviated Thai month names, January first.
pub const THAI_MONTHS_SHORT: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

const THAI_DIGITS: [char; 10] = ['๐', '๑', '๒', '๓', '๔', '๕', '๖', '๗', '๘', '๙'];

/// The eight date presentations a field can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateFormat {
    /// `EU`: DD/MM/YYYY
    #[default]
    #[serde(rename = "EU")]
    DayMonthYear,
    /// `US`: MM/DD/YYYY
    #[serde(rename = "US")]
    MonthDayYear,
    /// `EUs`: DD/MM/YY
    #[serde(rename = "EUs")]
    DayMonthShortYear,
    /// `THsBC`: day, short Thai month, Christian-era year
    #[serde(rename = "THsBC")]
    ThaiShortMonthChristian,
    /// `THsBB`: day, short Thai month, Buddhist-era year
    #[serde(rename = "THsBB")]
    ThaiShortMonthBuddhist,
    /// `THBC`: day, full Thai month, Christian-era year
    #[serde(rename = "THBC")]
    ThaiFullMonthChristian,
    /// `THBB`: day, full Thai month, Buddhist-era year
    #[serde(rename = "THBB")]
    ThaiFullMonthBuddhist,
    /// `THBCnumber`: full Thai month, day and Christian-era year in Thai digits
    #[serde(rename = "THBCnumber")]
    ThaiNumerals,
}

/// How a format spells the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStyle {
    /// `01`-`12`
    Numeric,
    /// `ม.ค.`
    ThaiShort,
    /// `มกราคม`
    ThaiFull,
}

impl DateFormat {
    /// Every format, in catalogue order.
    pub const ALL: [DateFormat; 8] = [
        DateFormat::DayMonthYear,
        DateFormat::MonthDayYear,
        DateFormat::DayMonthShortYear,
        DateFormat::ThaiShortMonthChristian,
        DateFormat::ThaiShortMonthBuddhist,
        DateFormat::ThaiFullMonthChristian,
        DateFormat::ThaiFullMonthBuddhist,
        DateFormat::ThaiNumerals,
    ];

    /// Catalogue string (`"EU"`, `"THBCnumber"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayMonthYear => "EU",
            Self::MonthDayYear => "US",
            Self::DayMonthShortYear => "EUs",
            Self::ThaiShortMonthChristian => "THsBC",
            Self::ThaiShortMonthBuddhist => "THsBB",
            Self::ThaiFullMonthChristian => "THBC",
            Self::ThaiFullMonthBuddhist => "THBB",
            Self::ThaiNumerals => "THBCnumber",
        }
    }

    /// Thai presentations use unpadded days and month names.
    pub fn is_thai(&self) -> bool {
        !matches!(
            self,
            Self::DayMonthYear | Self::MonthDayYear | Self::DayMonthShortYear
        )
    }

    /// Years are shown in the Buddhist era.
    pub fn is_buddhist_era(&self) -> bool {
        matches!(self, Self::ThaiShortMonthBuddhist | Self::ThaiFullMonthBuddhist)
    }

    /// Day and year are written with Thai digits.
    pub fn uses_thai_digits(&self) -> bool {
        matches!(self, Self::ThaiNumerals)
    }

    /// Month spelling.
    pub fn month_style(&self) -> MonthStyle {
        match self {
            Self::DayMonthYear | Self::MonthDayYear | Self::DayMonthShortYear => MonthStyle::Numeric,
            Self::ThaiShortMonthChristian | Self::ThaiShortMonthBuddhist => MonthStyle::ThaiShort,
            Self::ThaiFullMonthChristian | Self::ThaiFullMonthBuddhist | Self::ThaiNumerals => {
                MonthStyle::ThaiFull
            },
        }
    }

    fn day_label(&self, day: u32) -> String {
        if self.uses_thai_digits() {
            to_thai_digits(&day.to_string())
        } else if self.is_thai() {
            day.to_string()
        } else {
            format!("{:02}", day)
        }
    }

    fn month_label(&self, month: u32) -> String {
        let index = month.saturating_sub(1) as usize;
        match self.month_style() {
            MonthStyle::Numeric => format!("{:02}", month),
            MonthStyle::ThaiShort => THAI_MONTHS_SHORT[index % 12].to_string(),
            MonthStyle::ThaiFull => THAI_MONTHS_FULL[index % 12].to_string(),
        }
    }

    fn year_label(&self, year: i32) -> String {
        match self {
            Self::DayMonthShortYear => format!("{:02}", year.rem_euclid(100)),
            Self::ThaiNumerals => to_thai_digits(&year.to_string()),
            f if f.is_buddhist_era() => (year + BUDDHIST_ERA_OFFSET).to_string(),
            _ => year.to_string(),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s.trim())
            .ok_or_else(|| Error::Unsupported(format!("date format '{}'", s)))
    }
}

/// The three sub-field values of one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    /// Day sub-field
    pub day: String,
    /// Month sub-field
    pub month: String,
    /// Year sub-field
    pub year: String,
}

/// Replace ASCII digits with Thai digits.
pub fn to_thai_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => THAI_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// Day options, 1 to 31.
pub fn day_options(format: DateFormat) -> Vec<String> {
    (1..=31).map(|d| format.day_label(d)).collect()
}

/// Month options, January first.
pub fn month_options(format: DateFormat) -> Vec<String> {
    (1..=12).map(|m| format.month_label(m)).collect()
}

/// Year options: `current_year - span ..= current_year + span`, ascending.
///
/// `current_year` is a Christian-era year; the format converts it.
pub fn year_options(format: DateFormat, current_year: i32, span: i32) -> Vec<String> {
    let span = span.max(0);
    ((current_year - span)..=(current_year + span))
        .map(|y| format.year_label(y))
        .collect()
}

/// Sub-field values for `date` under `format`.
pub fn format_date(date: NaiveDate, format: DateFormat) -> DateParts {
    DateParts {
        day: format.day_label(date.day()),
        month: format.month_label(date.month()),
        year: format.year_label(date.year()),
    }
}

/// Join sub-field values into the display string for `format`.
///
/// Empty parts are left out.
pub fn render(format: DateFormat, day: &str, month: &str, year: &str) -> String {
    let ordered = match format {
        DateFormat::MonthDayYear => [month, day, year],
        _ => [day, month, year],
    };
    let separator = if format.is_thai() { " " } else { "/" };
    ordered
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(separator)
}
