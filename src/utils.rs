use iso8601::{Date, DateTime, Time};
use xml::escape::escape_str_pcdata;

use std::borrow::Cow;

/// Escape a string for use as XML characters.
///
/// The resulting string is *not* suitable for use in XML attributes, but XML-RPC doesn't use those.
pub fn escape_xml(s: &str) -> Cow<str> {
    escape_str_pcdata(s)
}

/// Formats a date/time the way `<dateTime.iso8601>` expects it (`19980717T14:08:55`).
///
/// Milliseconds and the timezone offset are only written when they are non-zero.
pub fn format_datetime(date_time: &DateTime) -> String {
    let Time {
        hour,
        minute,
        second,
        millisecond,
        tz_offset_hours,
        tz_offset_minutes,
    } = date_time.time;

    let mut out = match date_time.date {
        Date::YMD { year, month, day } => format!(
            "{:04}{:02}{:02}T{:02}:{:02}:{:02}",
            year, month, day, hour, minute, second
        ),
        Date::Week { year, ww, d } => format!(
            "{:04}-W{:02}-{}T{:02}:{:02}:{:02}",
            year, ww, d, hour, minute, second
        ),
        Date::Ordinal { year, ddd } => format!(
            "{:04}-{:03}T{:02}:{:02}:{:02}",
            year, ddd, hour, minute, second
        ),
    };

    if millisecond != 0 {
        out.push_str(&format!(".{:03}", millisecond));
    }
    if tz_offset_hours != 0 || tz_offset_minutes != 0 {
        let sign = if tz_offset_hours < 0 || tz_offset_minutes < 0 { '-' } else { '+' };
        out.push_str(&format!(
            "{}{:02}:{:02}",
            sign,
            tz_offset_hours.abs(),
            tz_offset_minutes.abs()
        ));
    }

    out
}
