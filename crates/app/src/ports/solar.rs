//! Solar port: sunrise and sunset for a day and a place.

use chrono::NaiveDate;

use coop_domain::error::ScheduleError;
use coop_domain::schedule::{Coordinates, SunTimes};

/// Pure solar-time provider.
pub trait SolarPort: Send + Sync {
    /// Sunrise and sunset instants on `date` at `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::NoSolarEvents`] when the sun does not rise
    /// or set that day (polar day or night).
    fn sun_times(&self, date: NaiveDate, coordinates: Coordinates)
    -> Result<SunTimes, ScheduleError>;
}

impl<T: SolarPort> SolarPort for std::sync::Arc<T> {
    fn sun_times(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<SunTimes, ScheduleError> {
        (**self).sun_times(date, coordinates)
    }
}
