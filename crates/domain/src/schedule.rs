//! Schedule: daily open/close windows derived from solar position.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::time::Timestamp;

/// Seconds of solar time per degree of longitude (86 400 s / 360°).
const SECONDS_PER_DEGREE: f64 = 240.0;

/// A fixed geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Calendar day at this coordinate for the given instant, in local mean
    /// solar time.
    ///
    /// Using the UTC date would roll over mid-afternoon on the American
    /// west coast and select tomorrow's sunset.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn solar_date(&self, at: Timestamp) -> NaiveDate {
        let shift = TimeDelta::seconds((self.longitude * SECONDS_PER_DEGREE).round() as i64);
        (at + shift).date_naive()
    }
}

/// Raw sunrise and sunset instants for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: Timestamp,
    pub sunset: Timestamp,
}

/// Instants between which the door should be open on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub open_at: Timestamp,
    pub close_at: Timestamp,
}

impl ScheduleWindow {
    /// Whether `now` lies in `[open_at, close_at)`.
    #[must_use]
    pub fn contains(&self, now: Timestamp) -> bool {
        self.open_at <= now && now < self.close_at
    }

    /// Schedule-derived action at `now`.
    #[must_use]
    pub fn action_at(&self, now: Timestamp) -> Action {
        if self.contains(now) {
            Action::Open
        } else {
            Action::Close
        }
    }

    /// Target action: the override when one is set, otherwise the schedule.
    #[must_use]
    pub fn target(&self, forced: Option<Action>, now: Timestamp) -> Action {
        forced.unwrap_or_else(|| self.action_at(now))
    }
}
