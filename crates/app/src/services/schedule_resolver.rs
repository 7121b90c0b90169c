//! Schedule resolver: today's open/close window at a fixed coordinate.

use chrono::TimeDelta;

use coop_domain::error::ScheduleError;
use coop_domain::schedule::{Coordinates, ScheduleWindow};
use coop_domain::time::Timestamp;

use crate::ports::SolarPort;

/// The door opens this long after sunrise, once it is fully light.
const OPEN_DELAY_MINUTES: i64 = 60;

/// Turns solar times into the daily door window.
///
/// Nothing is cached: the window is recomputed on every call so a
/// long-running process follows the date as it rolls over.
pub struct ScheduleResolver<S> {
    solar: S,
    coordinates: Coordinates,
}

impl<S: SolarPort> ScheduleResolver<S> {
    /// Create a resolver for the coop at `coordinates`.
    pub fn new(solar: S, coordinates: Coordinates) -> Self {
        Self { solar, coordinates }
    }

    /// The coordinate this resolver was configured for.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Window for the day containing `now` at the configured coordinate.
    ///
    /// # Errors
    ///
    /// See [`resolve_at`](Self::resolve_at).
    pub fn resolve(&self, now: Timestamp) -> Result<ScheduleWindow, ScheduleError> {
        self.resolve_at(now, self.coordinates)
    }

    /// Window for the day containing `now` at `coordinates`: open one hour
    /// after sunrise, close at sunset.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NoSolarEvents`] when the sun does not rise
    /// or set, and [`ScheduleError::InvertedWindow`] when the delayed open
    /// would not precede sunset.
    pub fn resolve_at(
        &self,
        now: Timestamp,
        coordinates: Coordinates,
    ) -> Result<ScheduleWindow, ScheduleError> {
        let date = coordinates.solar_date(now);
        let sun = self.solar.sun_times(date, coordinates)?;
        let window = ScheduleWindow {
            open_at: sun.sunrise + TimeDelta::minutes(OPEN_DELAY_MINUTES),
            close_at: sun.sunset,
        };
        if window.open_at >= window.close_at {
            return Err(ScheduleError::InvertedWindow { date });
        }
        Ok(window)
    }
}
