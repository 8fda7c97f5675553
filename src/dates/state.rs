//! Editor state of one date field.
//!
//! The state is a two-mode machine:
//!
//! - [`DateMode::Manual`]: the user picks each sub-field. Switching format
//!   clears all three values, since they were spelled for the old format.
//! - [`DateMode::CurrentDateLocked`]: the values track today's date in the
//!   active format and direct edits are ignored.
//!
//! All changes go through [`DateFieldState::apply`] so that several requests
//! in a row are processed strictly in order.

use super::{day_options, format_date, month_options, render, year_options, DateFormat};
use crate::config::DateConfig;
use bitflags::bitflags;
use chrono::{Datelike, NaiveDate};

bitflags! {
    /// Sub-fields still present on the canvas.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DateElements: u8 {
        /// Day sub-field
        const DAY = 0b001;
        /// Month sub-field
        const MONTH = 0b010;
        /// Year sub-field
        const YEAR = 0b100;
    }
}

impl Default for DateElements {
    fn default() -> Self {
        Self::all()
    }
}

/// One of the three sub-fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    /// Day
    Day,
    /// Month
    Month,
    /// Year
    Year,
}

impl DatePart {
    /// The availability flag for this part.
    pub fn element(&self) -> DateElements {
        match self {
            Self::Day => DateElements::DAY,
            Self::Month => DateElements::MONTH,
            Self::Year => DateElements::YEAR,
        }
    }
}

/// Editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateMode {
    /// Values picked by hand
    #[default]
    Manual,
    /// Values pinned to today
    CurrentDateLocked,
}

/// A requested change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateEvent {
    /// Select a different format
    FormatChanged(DateFormat),
    /// Turn "use current date" on or off
    ToggleCurrentDate(bool),
    /// Set one sub-field by hand
    SubFieldEdited(DatePart, String),
    /// A sub-element was deleted from the canvas
    ElementRemoved(DatePart),
    /// A deleted sub-element was put back
    ElementRestored(DatePart),
}

/// State of a date field's editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFieldState {
    days: String,
    months: String,
    years: String,
    format: DateFormat,
    mode: DateMode,
    available: DateElements,
    year_span: i32,
}

impl Default for DateFieldState {
    fn default() -> Self {
        Self::new(DateFormat::default(), &DateConfig::default())
    }
}

impl DateFieldState {
    /// Empty manual state in `format`.
    pub fn new(format: DateFormat, config: &DateConfig) -> Self {
        Self {
            days: String::new(),
            months: String::new(),
            years: String::new(),
            format,
            mode: DateMode::Manual,
            available: DateElements::all(),
            year_span: config.year_span.max(0),
        }
    }

    /// Day value.
    pub fn days(&self) -> &str {
        &self.days
    }

    /// Month value.
    pub fn months(&self) -> &str {
        &self.months
    }

    /// Year value.
    pub fn years(&self) -> &str {
        &self.years
    }

    /// Active format.
    pub fn format(&self) -> DateFormat {
        self.format
    }

    /// Current mode.
    pub fn mode(&self) -> DateMode {
        self.mode
    }

    /// Whether values track today's date.
    pub fn use_current_date(&self) -> bool {
        self.mode == DateMode::CurrentDateLocked
    }

    /// Sub-fields still on the canvas.
    pub fn available_elements(&self) -> DateElements {
        self.available
    }

    /// Whether a sub-field can be edited.
    pub fn is_editable(&self, part: DatePart) -> bool {
        self.mode == DateMode::Manual && self.available.contains(part.element())
    }

    /// Value of one sub-field.
    pub fn value(&self, part: DatePart) -> &str {
        match part {
            DatePart::Day => &self.days,
            DatePart::Month => &self.months,
            DatePart::Year => &self.years,
        }
    }

    /// Apply an event using the local clock. Returns whether anything changed.
    pub fn apply(&mut self, event: DateEvent) -> bool {
        self.apply_at(event, today())
    }

    /// Apply an event with `today` as the current date.
    pub fn apply_at(&mut self, event: DateEvent, today: NaiveDate) -> bool {
        match event {
            DateEvent::FormatChanged(format) => {
                if format == self.format {
                    return false;
                }
                self.format = format;
                match self.mode {
                    DateMode::Manual => self.clear(),
                    DateMode::CurrentDateLocked => self.populate(today),
                }
                true
            },
            DateEvent::ToggleCurrentDate(on) => {
                let target = if on {
                    DateMode::CurrentDateLocked
                } else {
                    DateMode::Manual
                };
                if target == self.mode {
                    return false;
                }
                self.mode = target;
                match target {
                    DateMode::CurrentDateLocked => self.populate(today),
                    DateMode::Manual => self.clear(),
                }
                true
            },
            DateEvent::SubFieldEdited(part, value) => {
                if !self.is_editable(part) {
                    log::debug!("Ignoring edit of {:?} (mode {:?})", part, self.mode);
                    return false;
                }
                let slot = match part {
                    DatePart::Day => &mut self.days,
                    DatePart::Month => &mut self.months,
                    DatePart::Year => &mut self.years,
                };
                if *slot == value {
                    return false;
                }
                *slot = value;
                true
            },
            DateEvent::ElementRemoved(part) => {
                let was = self.available.contains(part.element());
                self.available.remove(part.element());
                was
            },
            DateEvent::ElementRestored(part) => {
                let was = self.available.contains(part.element());
                self.available.insert(part.element());
                !was
            },
        }
    }

    /// Display string from the available, non-empty sub-fields.
    pub fn render(&self) -> String {
        let pick = |part: DatePart| {
            if self.available.contains(part.element()) {
                self.value(part)
            } else {
                ""
            }
        };
        render(
            self.format,
            pick(DatePart::Day),
            pick(DatePart::Month),
            pick(DatePart::Year),
        )
    }

    /// Every available sub-field holds a value from its option list.
    pub fn is_complete(&self) -> bool {
        self.is_complete_at(today())
    }

    /// [`is_complete`](Self::is_complete) with `today` fixing the year window.
    pub fn is_complete_at(&self, today: NaiveDate) -> bool {
        let check = |part: DatePart, options: Vec<String>| {
            !self.available.contains(part.element()) || options.iter().any(|o| o == self.value(part))
        };
        check(DatePart::Day, day_options(self.format))
            && check(DatePart::Month, month_options(self.format))
            && check(
                DatePart::Year,
                year_options(self.format, today.year(), self.year_span),
            )
    }

    fn populate(&mut self, today: NaiveDate) {
        let parts = format_date(today, self.format);
        self.days = parts.day;
        self.months = parts.month;
        self.years = parts.year;
    }

    fn clear(&mut self) {
        self.days.clear();
        self.months.clear();
        self.years.clear();
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
