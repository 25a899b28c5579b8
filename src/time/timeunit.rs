use crate::time::error::Error;
use core::str::FromStr;
use lazy_static::*;
use regex::Regex;
use std::time::Duration;

lazy_static! {
    static ref DURATION_REGEX: Regex =
        Regex::new(r"^\s*(?P<value>\d+)\s*(?P<unit>[a-z]+)\s*$").expect("Regex compilation error");
}

/// Amount of some time unit, written like `20s` or `500ms`.
#[derive(Debug, PartialEq)]
pub struct DurationUnit {
    value: u64,
    unit: TimeUnit,
}

#[derive(Debug, PartialEq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

pub fn parse_duration(s: &str) -> Result<Duration, Error> {
    s.parse::<DurationUnit>().map(Duration::from)
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DURATION_REGEX
            .captures(s)
            .ok_or_else(|| Error::Syntax(format!("'{}' is not an amount followed by a unit", s)))?;
        let value: u64 = caps["value"]
            .parse()
            .map_err(|_| Error::Syntax(format!("'{}' is too large", &caps["value"])))?;
        let unit = caps["unit"].parse::<TimeUnit>()?;
        if value.checked_mul(unit.scale()).is_none() {
            return Err(Error::Syntax(format!("'{}' is too large", s.trim())));
        }
        Ok(Self { value, unit })
    }
}

impl TimeUnit {
    /// Milliseconds or seconds per unit, depending on the unit's base.
    fn scale(&self) -> u64 {
        match self {
            TimeUnit::Millisecond | TimeUnit::Second => 1,
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 60 * 60,
        }
    }
}

impl From<DurationUnit> for Duration {
    // `from_str` has already checked that the scaled value fits in a u64.
    fn from(duration: DurationUnit) -> Self {
        let value = duration.value * duration.unit.scale();
        match duration.unit {
            TimeUnit::Millisecond => Duration::from_millis(value),
            _ => Duration::from_secs(value),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millis" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "secs" | "seconds" => Ok(TimeUnit::Second),
            "m" | "mins" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hours" => Ok(TimeUnit::Hour),
            _ => Err(Error::UnitNotSupported(s.to_owned())),
        }
    }
}
