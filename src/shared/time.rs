use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Half width of the time window around the selected minute.
pub const WINDOW_RADIUS: u16 = 60;

/// Number of minutes covered by an active time filter.
pub const WINDOW_WIDTH: u16 = WINDOW_RADIUS * 2 + 1;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Minute {0} is outside of a day (0..=1439)")]
    OutOfRange(i32),
}

/// A minute of the day, always in `0..1440`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Minute(u16);

impl Minute {
    pub const MIDNIGHT: Self = Self(0);
    pub const LAST: Self = Self(MINUTES_PER_DAY - 1);

    pub const fn new(minute: u16) -> Option<Self> {
        if minute < MINUTES_PER_DAY {
            Some(Self(minute))
        } else {
            None
        }
    }

    /// `hour * 60 + minute`, or None when that lands outside of the day.
    pub const fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        let value = hour as u64 * 60 + minute as u64;
        if value < MINUTES_PER_DAY as u64 {
            Some(Self(value as u16))
        } else {
            None
        }
    }

    /// Minute of the day of a wall-clock time. Seconds are truncated.
    pub fn of<T: Timelike>(time: &T) -> Option<Self> {
        Self::from_hm(time.hour(), time.minute())
    }

    pub const fn as_minutes(&self) -> u16 {
        self.0
    }

    pub const fn as_index(&self) -> usize {
        self.0 as usize
    }

    /// Moves around the clock face, wrapping at midnight in both directions.
    pub fn wrapping_offset(self, offset: i32) -> Self {
        let value = (self.0 as i32 + offset).rem_euclid(MINUTES_PER_DAY as i32);
        Self(value as u16)
    }

    /// 12 hour clock label, `8:05 AM`.
    pub fn to_clock_string(&self) -> String {
        let h = self.0 / 60;
        let m = self.0 % 60;
        let suffix = if h < 12 { "AM" } else { "PM" };
        let h12 = if h % 12 == 0 { 12 } else { h % 12 };
        format!("{h12}:{m:02} {suffix}")
    }
}

impl Display for Minute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_clock_string())
    }
}

impl TryFrom<i32> for Minute {
    type Error = self::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(Error::OutOfRange(value))
    }
}

/// Which part of the day the traffic is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeFilter {
    /// The whole day.
    #[default]
    Any,
    /// `WINDOW_RADIUS` minutes on each side of the minute, wrapping at midnight.
    Around(Minute),
}

impl TimeFilter {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Around(_))
    }

    /// The minutes covered by the filter.
    /// `Any` yields every minute ascending, `Around` yields them by offset
    /// from `-WINDOW_RADIUS` to `+WINDOW_RADIUS`.
    pub fn minutes(&self) -> impl Iterator<Item = Minute> + use<> {
        let (start, len) = match *self {
            Self::Any => (Minute::MIDNIGHT, MINUTES_PER_DAY),
            Self::Around(center) => (center.wrapping_offset(-(WINDOW_RADIUS as i32)), WINDOW_WIDTH),
        };
        (0..len as i32).map(move |i| start.wrapping_offset(i))
    }
}

impl Display for TimeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("(any time)"),
            Self::Around(minute) => minute.fmt(f),
        }
    }
}

/// Slider values: any negative value means no filter.
impl TryFrom<i32> for TimeFilter {
    type Error = self::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value < 0 {
            Ok(Self::Any)
        } else {
            Minute::try_from(value).map(Self::Around)
        }
    }
}

/// Parses a trip timestamp into its wall-clock date time.
/// Offsets are not applied, the clock time is kept as written.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|time| time.naive_local())
        })
}

#[test]
fn parse_timestamp_space_separated() {
    let time = parse_timestamp("2024-03-01 08:05:12").unwrap();
    assert_eq!(Minute::of(&time), Minute::new(485));
}

#[test]
fn parse_timestamp_fractional_seconds() {
    let time = parse_timestamp("2024-03-01 23:59:59.999").unwrap();
    assert_eq!(Minute::of(&time), Some(Minute::LAST));
}

#[test]
fn parse_timestamp_keeps_wall_clock() {
    let time = parse_timestamp("2024-03-01T08:05:00-05:00").unwrap();
    assert_eq!(Minute::of(&time), Minute::new(485));
}

#[test]
fn parse_timestamp_invalid() {
    assert!(parse_timestamp("").is_none());
    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("2024-03-01 25:00:00").is_none());
}

#[test]
fn clock_string() {
    assert_eq!(Minute::MIDNIGHT.to_clock_string(), "12:00 AM");
    assert_eq!(Minute::new(485).unwrap().to_clock_string(), "8:05 AM");
    assert_eq!(Minute::new(720).unwrap().to_clock_string(), "12:00 PM");
    assert_eq!(Minute::LAST.to_clock_string(), "11:59 PM");
}

#[test]
fn from_hm_out_of_day() {
    assert_eq!(Minute::from_hm(23, 59), Some(Minute::LAST));
    assert_eq!(Minute::from_hm(24, 0), None);
}

#[test]
fn wrapping_offset() {
    assert_eq!(Minute::MIDNIGHT.wrapping_offset(-1), Minute::LAST);
    assert_eq!(Minute::LAST.wrapping_offset(1), Minute::MIDNIGHT);
    assert_eq!(Minute::MIDNIGHT.wrapping_offset(-1441), Minute::LAST);
}

#[test]
fn filter_from_slider() {
    assert_eq!(TimeFilter::try_from(-1), Ok(TimeFilter::Any));
    assert_eq!(
        TimeFilter::try_from(480),
        Ok(TimeFilter::Around(Minute::new(480).unwrap()))
    );
    assert_eq!(TimeFilter::try_from(1440), Err(Error::OutOfRange(1440)));
    assert_eq!(TimeFilter::Any.to_string(), "(any time)");
}

#[test]
fn filter_minutes() {
    assert_eq!(TimeFilter::Any.minutes().count(), MINUTES_PER_DAY as usize);
    let window: Vec<_> = TimeFilter::Around(Minute::MIDNIGHT).minutes().collect();
    assert_eq!(window.len(), WINDOW_WIDTH as usize);
    assert_eq!(window.first(), Minute::new(1380).as_ref());
    assert_eq!(window.last(), Minute::new(60).as_ref());
    assert!(window.contains(&Minute::LAST));
}
