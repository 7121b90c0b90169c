//! In-memory fakes of the ports, shared by the unit tests of this crate.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};

use coop_domain::error::{LineError, ScheduleError};
use coop_domain::line::{Direction, LineId, LineValue};
use coop_domain::schedule::{Coordinates, SunTimes};

use crate::ports::{GpioPort, SolarPort};

#[derive(Debug, Clone, Copy)]
struct FakeLine {
    direction: Direction,
    value: LineValue,
}

#[derive(Default)]
struct Inner {
    lines: HashMap<LineId, FakeLine>,
    exports: HashMap<LineId, usize>,
    writes: HashMap<LineId, usize>,
    value_reads: HashMap<LineId, usize>,
    broken: HashSet<LineId>,
    write_broken: HashSet<LineId>,
}

/// GPIO fake: lines start unexported, exported lines start as `in` / `1`.
#[derive(Default)]
pub struct FakeGpio {
    inner: Mutex<Inner>,
}

impl FakeGpio {
    /// Pretend `line` is already exported and configured with `value`.
    pub fn with_output(self, line: LineId, value: LineValue) -> Self {
        self.inner.lock().unwrap().lines.insert(
            line,
            FakeLine {
                direction: Direction::Out,
                value,
            },
        );
        self
    }

    /// Make every value read and write on `line` fail with an I/O error.
    pub fn break_line(&self, line: LineId) {
        self.inner.lock().unwrap().broken.insert(line);
    }

    /// Make only value writes on `line` fail; reads keep working.
    pub fn break_writes(&self, line: LineId) {
        self.inner.lock().unwrap().write_broken.insert(line);
    }

    pub fn repair_line(&self, line: LineId) {
        self.inner.lock().unwrap().broken.remove(&line);
    }

    pub fn exports(&self, line: LineId) -> usize {
        self.count(|inner| &inner.exports, line)
    }

    pub fn writes(&self, line: LineId) -> usize {
        self.count(|inner| &inner.writes, line)
    }

    pub fn value_reads(&self, line: LineId) -> usize {
        self.count(|inner| &inner.value_reads, line)
    }

    pub fn value(&self, line: LineId) -> Option<LineValue> {
        self.inner.lock().unwrap().lines.get(&line).map(|l| l.value)
    }

    pub fn direction_of(&self, line: LineId) -> Option<Direction> {
        self.inner.lock().unwrap().lines.get(&line).map(|l| l.direction)
    }

    fn count(&self, pick: impl Fn(&Inner) -> &HashMap<LineId, usize>, line: LineId) -> usize {
        let inner = self.inner.lock().unwrap();
        pick(&inner).get(&line).copied().unwrap_or(0)
    }
}

fn io_fault(line: LineId) -> LineError {
    LineError::Io {
        line,
        source: std::io::Error::other("injected fault"),
    }
}

impl GpioPort for FakeGpio {
    fn export(&self, line: LineId) -> impl Future<Output = Result<(), LineError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        *inner.exports.entry(line).or_default() += 1;
        inner.lines.entry(line).or_insert(FakeLine {
            direction: Direction::In,
            value: LineValue::High,
        });
        async { Ok(()) }
    }

    fn direction(
        &self,
        line: LineId,
    ) -> impl Future<Output = Result<Direction, LineError>> + Send {
        let inner = self.inner.lock().unwrap();
        let r = inner
            .lines
            .get(&line)
            .map(|l| l.direction)
            .ok_or(LineError::NotProvisioned { line });
        async { r }
    }

    fn set_direction(
        &self,
        line: LineId,
        direction: Direction,
    ) -> impl Future<Output = Result<(), LineError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        let r = match inner.lines.get_mut(&line) {
            Some(l) => {
                l.direction = direction;
                Ok(())
            }
            None => Err(LineError::NotProvisioned { line }),
        };
        async { r }
    }

    fn read_value(
        &self,
        line: LineId,
    ) -> impl Future<Output = Result<LineValue, LineError>> + Send {
        let mut inner = self.inner.lock().unwrap();
        *inner.value_reads.entry(line).or_default() += 1;
        let r = if inner.broken.contains(&line) {
            Err(io_fault(line))
        } else {
            inner
                .lines
                .get(&line)
                .map(|l| l.value)
                .ok_or(LineError::NotProvisioned { line })
        };
        async { r }
    }

    fn write_value(
        &self,
        line: LineId,
        value: LineValue,
    ) -> impl Future<Output = Result<(), LineError>> + Send {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        let r = if inner.broken.contains(&line) || inner.write_broken.contains(&line) {
            Err(io_fault(line))
        } else if let Some(l) = inner.lines.get_mut(&line) {
            l.value = value;
            *inner.writes.entry(line).or_default() += 1;
            Ok(())
        } else {
            Err(LineError::NotProvisioned { line })
        };
        async { r }
    }
}

/// Solar fake: sunrise 06:00 UTC and sunset 20:00 UTC every day.
pub struct FixedSolar;

impl SolarPort for FixedSolar {
    fn sun_times(
        &self,
        date: NaiveDate,
        _coordinates: Coordinates,
    ) -> Result<SunTimes, ScheduleError> {
        let midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap());
        Ok(SunTimes {
            sunrise: midnight + TimeDelta::hours(6),
            sunset: midnight + TimeDelta::hours(20),
        })
    }
}

/// Solar fake for a polar night.
pub struct NoSun;

impl SolarPort for NoSun {
    fn sun_times(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<SunTimes, ScheduleError> {
        Err(ScheduleError::NoSolarEvents {
            date,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        })
    }
}
