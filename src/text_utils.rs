use std::ops::Index;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses `2017-09-10`, `2017-09-10 10:42`, `2017-09-10 10:42:32.123` and the same with a `T`
/// separator. Offsets are handled by [`parse_rfc3339`].
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(
            r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})(?:[ T]([0-9]{1,2}):([0-9]{1,2})(?::([0-9]{1,2})(\.[0-9]{1,9})?)?)?$"
        ).unwrap();
    }

    let buf = buf.trim();
    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);
    let opt_u32 = |idx: usize| caps.get(idx).map_or(Ok(0), |m| to_u32(m.as_str()));

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = opt_u32(4)?;
    let mn: u32 = opt_u32(5)?;
    let s: u32 = opt_u32(6)?;

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Invalid calendar date {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Invalid time of day {}", buf))?;

    let date_time = match caps.get(7) {
        Some(frac) => {
            let nanos = fraction_to_nanos(&frac.as_str()[1..]);
            let time = time.with_nanosecond(nanos)
                .ok_or_else(|| format!("Invalid fraction of second {}", buf))?;
            NaiveDateTime::new(date, time)
        }
        None => NaiveDateTime::new(date, time),
    };

    Ok(date_time)
}

/// RFC 3339 timestamps carrying an offset, normalized to UTC.
pub fn parse_rfc3339(buf: &str) -> Result<NaiveDateTime, String> {
    match DateTime::parse_from_rfc3339(buf.trim()) {
        Ok(dt) => Ok(dt.naive_utc()),
        Err(e) => Err(format!("Unable to parse date time {}: {}", buf, e)),
    }
}

/// Accepts any textual date the front-matter may carry.
pub fn coerce_date_str(buf: &str) -> Result<NaiveDateTime, String> {
    parse_date_time(buf).or_else(|_| parse_rfc3339(buf))
}

pub fn from_epoch_millis(millis: i64) -> Result<NaiveDateTime, String> {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => Ok(dt.naive_utc()),
        None => Err(format!("Timestamp {} is out of range", millis)),
    }
}

pub fn format_date_time(date_time: &NaiveDateTime) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

fn fraction_to_nanos(digits: &str) -> u32 {
    let mut nanos: u32 = 0;
    for i in 0..9 {
        let digit = digits.as_bytes().get(i).map_or(0, |b| (b - b'0') as u32);
        nanos = nanos * 10 + digit;
    }
    nanos
}
