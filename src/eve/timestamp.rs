use crate::errors::Error;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;

/// Format suricata writes event timestamps with, e.g. `2017-12-18T10:48:14.627130-0700`.
pub const FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%.f%z";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &[FORMAT, "%Y-%m-%d %H:%M:%S%.f%z"];

lazy_static! {
    pub static ref DEFAULT_TIMESTAMP_10M_AGO: DateTime<Utc> = Utc::now() - Duration::minutes(10);
    pub static ref DEFAULT_TIMESTAMP_10Y_AGO: DateTime<Utc> =
        Utc::now() - Duration::days(365 * 10);
}

/// Anything that can be normalized into a UTC instant.
///
/// Naive values are stamped as UTC without shifting their wall clock, aware values
/// are converted.
pub trait AsUtc {
    fn as_utc(&self) -> DateTime<Utc>;
}

impl AsUtc for NaiveDateTime {
    fn as_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(self)
    }
}

impl<Tz: TimeZone> AsUtc for DateTime<Tz> {
    fn as_utc(&self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

pub fn to_utc<T: AsUtc + ?Sized>(candidate: &T) -> DateTime<Utc> {
    candidate.as_utc()
}

/// Candidates accepted by [`parse_timestamp`]: strings as found in eve logs, or an
/// already built instant.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Result<DateTime<Utc>, Error>;
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<DateTime<Utc>, Error> {
        parse_date_time(self)
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Result<DateTime<Utc>, Error> {
        parse_date_time(self.as_str())
    }
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Result<DateTime<Utc>, Error> {
        Ok(to_utc(&self))
    }
}

impl<Tz: TimeZone> IntoTimestamp for DateTime<Tz> {
    fn into_timestamp(self) -> Result<DateTime<Utc>, Error> {
        Ok(to_utc(&self))
    }
}

/// Values usable as a filter cutoff. Unlike [`IntoTimestamp`], a cutoff without
/// offset information is refused with [`Error::NaiveCutoff`].
pub trait IntoCutoff {
    fn into_cutoff(self) -> Result<DateTime<Utc>, Error>;
}

impl IntoCutoff for &str {
    fn into_cutoff(self) -> Result<DateTime<Utc>, Error> {
        parse_cutoff(self)
    }
}

impl IntoCutoff for NaiveDateTime {
    fn into_cutoff(self) -> Result<DateTime<Utc>, Error> {
        Err(Error::NaiveCutoff {
            value: self.to_string(),
        })
    }
}

impl<Tz: TimeZone> IntoCutoff for DateTime<Tz> {
    fn into_cutoff(self) -> Result<DateTime<Utc>, Error> {
        Ok(to_utc(&self))
    }
}

pub fn parse_timestamp<T: IntoTimestamp>(candidate: T) -> Result<DateTime<Utc>, Error> {
    candidate.into_timestamp()
}

/// Parses something like `2022-02-08T16:32:14.900292+0000`.
///
/// Everything from the first `+` on is dropped and the rest is read as a naive
/// date-time in UTC. Timestamps with a negative offset or a `Z` suffix have no `+`
/// to cut at, those are parsed with their offset and converted.
pub fn parse_date_time(s: &str) -> Result<DateTime<Utc>, Error> {
    let candidate = s.splitn(2, '+').next().unwrap_or(s).trim();
    if let Some(naive) = parse_naive(candidate) {
        return Ok(to_utc(&naive));
    }
    parse_with_offset(candidate).ok_or_else(|| Error::invalid_timestamp(s))
}

/// Parses a cutoff that must carry its own offset.
pub fn parse_cutoff(s: &str) -> Result<DateTime<Utc>, Error> {
    let candidate = s.trim();
    if let Some(aware) = parse_with_offset(candidate) {
        return Ok(aware);
    }
    if parse_naive(candidate).is_some() {
        return Err(Error::NaiveCutoff {
            value: s.to_owned(),
        });
    }
    Err(Error::invalid_timestamp(s))
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_with_offset(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        })
        .map(|dt| to_utc(&dt))
}
