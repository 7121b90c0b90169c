//! # coop-adapter-solar
//!
//! [`SolarPort`] implementation on top of the
//! [`sunrise`](https://docs.rs/sunrise) crate.
//!
//! The crate returns Unix timestamps and degrades to meaningless values when
//! the sun does not cross the horizon, so results are checked before being
//! handed to the schedule.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `coop-app` and `coop-domain`.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta};

use coop_app::ports::SolarPort;
use coop_domain::error::ScheduleError;
use coop_domain::schedule::{Coordinates, SunTimes};
use coop_domain::time::Timestamp;

/// How far from UTC noon of the requested date a solar event may fall.
const MAX_DISTANCE_FROM_NOON_HOURS: i64 = 36;

/// Solar times computed locally, no network involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SunriseProvider;

impl SolarPort for SunriseProvider {
    fn sun_times(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<SunTimes, ScheduleError> {
        let no_events = || ScheduleError::NoSolarEvents {
            date,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        };

        #[allow(deprecated)]
        let (rise, set) = sunrise::sunrise_sunset(
            coordinates.latitude,
            coordinates.longitude,
            date.year(),
            date.month(),
            date.day(),
        );

        let sunrise = DateTime::from_timestamp(rise, 0).ok_or_else(no_events)?;
        let sunset = DateTime::from_timestamp(set, 0).ok_or_else(no_events)?;
        if sunrise >= sunset || !near(date, sunrise) || !near(date, sunset) {
            tracing::debug!(%date, rise, set, "sun does not cross the horizon");
            return Err(no_events());
        }

        Ok(SunTimes { sunrise, sunset })
    }
}

fn near(date: NaiveDate, instant: Timestamp) -> bool {
    let Some(noon) = date.and_hms_opt(12, 0, 0) else {
        return false;
    };
    let distance = instant.naive_utc() - noon;
    distance.abs() <= TimeDelta::hours(MAX_DISTANCE_FROM_NOON_HOURS)
}
