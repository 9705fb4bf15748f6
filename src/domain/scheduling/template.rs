//! Recurring activity templates.
//!
//! A template captures "we play every Tuesday at 21:00 on 2 courts";
//! concrete scheduled events are spawned from it.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{TemplateId, Timestamp, ValidationError};

/// Maximum courts a single template may reserve.
pub const MAX_COURTS: u8 = 8;

/// Day of week a recurring activity happens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// All days, Monday first. Used to build selection options.
    pub fn all() -> [Weekday; 7] {
        use Weekday::*;
        [Mon, Tue, Wed, Thu, Fri, Sat, Sun]
    }

    /// Canonical short form used as a selection value, e.g. "tue".
    pub fn short(&self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    /// Full name for display, e.g. "Tuesday".
    pub fn full_name(&self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    /// Accepts short and full forms, case-insensitive ("tue", "Tuesday").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Weekday::all()
            .into_iter()
            .find(|day| {
                normalized == day.short() || normalized == day.full_name().to_ascii_lowercase()
            })
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "weekday",
                    format!("'{}' is not a day of the week", s.trim()),
                )
            })
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => chrono::Weekday::Mon,
            Weekday::Tue => chrono::Weekday::Tue,
            Weekday::Wed => chrono::Weekday::Wed,
            Weekday::Thu => chrono::Weekday::Thu,
            Weekday::Fri => chrono::Weekday::Fri,
            Weekday::Sat => chrono::Weekday::Sat,
            Weekday::Sun => chrono::Weekday::Sun,
        }
    }
}

/// Parses a 24h "HH:MM" clock time, returning (hour, minute).
pub fn parse_start_time(raw: &str) -> Result<(u8, u8), ValidationError> {
    let invalid =
        || ValidationError::invalid_format("start_time", "expected HH:MM, e.g. 21:00");

    let (hours, minutes) = raw.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u8 = hours.parse().map_err(|_| invalid())?;
    let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok((hours, minutes))
}

/// A recurring activity template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTemplate {
    id: TemplateId,
    name: String,
    weekday: Weekday,
    start_time: String,
    courts: u8,
    active: bool,
}

impl ActivityTemplate {
    /// Creates a template, validating name, start time, and court count.
    pub fn new(
        name: impl Into<String>,
        weekday: Weekday,
        start_time: impl Into<String>,
        courts: u8,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let start_time = start_time.into();
        parse_start_time(&start_time)?;
        if courts == 0 || courts > MAX_COURTS {
            return Err(ValidationError::out_of_range(
                "courts",
                1,
                MAX_COURTS as i64,
                courts as i64,
            ));
        }
        Ok(Self {
            id: TemplateId::new(),
            name: name.trim().to_string(),
            weekday,
            start_time,
            courts,
            active: true,
        })
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Start time in "HH:MM" form, validated at construction.
    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn courts(&self) -> u8 {
        self.courts
    }

    /// Whether new events may be spawned from this template.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stops new events being spawned from this template.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// The next occurrence of this template strictly after `after`.
    ///
    /// Same-day occurrences count only if the start time has not yet passed.
    pub fn next_occurrence_after(&self, after: Timestamp) -> Timestamp {
        // Constructor validated the stored string, so this cannot fail.
        let (hours, minutes) = parse_start_time(&self.start_time).unwrap_or((0, 0));
        let time = NaiveTime::from_hms_opt(hours as u32, minutes as u32, 0)
            .unwrap_or(NaiveTime::MIN);

        let reference = *after.as_datetime();
        let target: chrono::Weekday = self.weekday.into();
        let mut days_ahead = (target.num_days_from_monday() + 7
            - reference.weekday().num_days_from_monday())
            % 7;
        if days_ahead == 0 && reference.time() >= time {
            days_ahead = 7;
        }

        let date = reference.date_naive() + Duration::days(days_ahead as i64);
        let starts_at = DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(time), Utc);
        Timestamp::from_datetime(starts_at)
    }
}
