//! TLE parsing utilities

use chrono::{DateTime, Utc};

use crate::tle::types::ElementSet;

/// Parse TLE epoch from line 1 to UTC DateTime
pub fn parse_tle_epoch_to_utc(line1: &str) -> Option<DateTime<Utc>> {
    // TLE line1 epoch fields (columns 19–32, 1-based; 18..32 0-based)
    let s = line1.get(18..32)?;
    let mut parts = s.trim().split('.');
    let yyddd = parts.next()?;
    let frac = parts.next().unwrap_or("0");
    if yyddd.len() < 3 {
        return None;
    }
    let (yy_str, ddd_str) = yyddd.split_at(2);
    let yy: i32 = yy_str.parse().ok()?;
    let ddd: i64 = ddd_str.parse().ok()?;
    let year = if yy >= 57 { 1900 + yy } else { 2000 + yy };
    let jan1 = chrono::NaiveDate::from_ymd_opt(year, 1, 1)?;
    let date = jan1.checked_add_signed(chrono::Duration::days(ddd - 1))?;
    let frac_sec = format!("0.{}", frac).parse::<f64>().ok()? * 86400.0;
    let nanos = (frac_sec * 1e9).round() as i64;
    let ndt = date.and_hms_opt(0, 0, 0)? + chrono::Duration::nanoseconds(nanos);
    Some(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
}

/// Split a TLE text body into element sets.
///
/// Accepts both 3-line (name + two lines) and bare 2-line blocks. A line-1 that
/// is not followed by a line-2 is dropped; validation of the lines themselves is
/// left to the propagator.
pub fn parse_element_sets(body: &str) -> Vec<ElementSet> {
    let lines: Vec<&str> = body
        .lines()
        .map(|raw| raw.trim_matches(|c| c == '\u{feff}' || c == '\r' || c == '\n' || c == ' '))
        .filter(|line| !line.is_empty())
        .collect();

    let mut sets = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if i + 1 < lines.len() && is_line1(lines[i]) && is_line2(lines[i + 1]) {
            let line1 = lines[i];
            let line2 = lines[i + 1];

            // Name line immediately before line 1, if it is not itself a TLE line
            let name = if i > 0 && !is_line1(lines[i - 1]) && !is_line2(lines[i - 1]) {
                strip_name_prefix(lines[i - 1]).to_string()
            } else {
                let norad = line1.get(2..7).map(str::trim).unwrap_or("?");
                format!("NORAD {}", norad)
            };

            sets.push(ElementSet {
                name,
                line1: line1.to_string(),
                line2: line2.to_string(),
            });
            i += 2;
        } else {
            i += 1;
        }
    }
    sets
}

fn is_line1(line: &str) -> bool {
    line.starts_with("1 ")
}

fn is_line2(line: &str) -> bool {
    line.starts_with("2 ")
}

// Some feeds prefix the name line with "0 "
fn strip_name_prefix(line: &str) -> &str {
    line.strip_prefix("0 ").unwrap_or(line).trim()
}
