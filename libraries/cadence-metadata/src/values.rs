//! Parsing of tag value strings into typed fields

/// Leading unsigned integer of a string, ignoring surrounding whitespace
pub(crate) fn parse_u32(value: &str) -> Option<u32> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Parse "N", "N/M" or "N of M" into a number and optional total
pub(crate) fn parse_number_pair(value: &str) -> (Option<u32>, Option<u32>) {
    let value = value.trim();

    let split = value
        .split_once('/')
        .or_else(|| value.split_once(" of "))
        .or_else(|| value.split_once(" OF "));

    match split {
        Some((number, total)) => (parse_u32(number), parse_u32(total)),
        None => (parse_u32(value), None),
    }
}

/// Year from the first run of four digits, e.g. "2004-05-12" or "May 2004"
pub(crate) fn parse_year(value: &str) -> Option<i32> {
    let bytes = value.as_bytes();
    let mut run_start = None;

    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let start = *run_start.get_or_insert(i);
            if i + 1 - start == 4 && bytes.get(i + 1).map_or(true, |n| !n.is_ascii_digit()) {
                return value[start..=i].parse().ok();
            }
        } else {
            run_start = None;
        }
    }

    None
}

/// Gain in dB from values like "-3.45 dB" or "+1.2"
pub(crate) fn parse_gain(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value
        .strip_suffix("dB")
        .or_else(|| value.strip_suffix("db"))
        .or_else(|| value.strip_suffix("DB"))
        .unwrap_or(value)
        .trim();

    number
        .strip_prefix('+')
        .unwrap_or(number)
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite())
}

/// Linear peak amplitude
pub(crate) fn parse_peak(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Beats per minute, rounded to the nearest whole beat
pub(crate) fn parse_bpm(value: &str) -> Option<u32> {
    let bpm = value.trim().replace(',', ".").parse::<f64>().ok()?;
    (bpm.is_finite() && bpm > 0.0).then(|| bpm.round() as u32)
}

/// Truthy or falsy flag values
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Trim a string; empty becomes absent
pub(crate) fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_pairs() {
        assert_eq!(parse_number_pair("5"), (Some(5), None));
        assert_eq!(parse_number_pair("5/12"), (Some(5), Some(12)));
        assert_eq!(parse_number_pair(" 3 of 9 "), (Some(3), Some(9)));
        assert_eq!(parse_number_pair("/12"), (None, Some(12)));
        assert_eq!(parse_number_pair("A1"), (None, None));
        assert_eq!(parse_number_pair("07"), (Some(7), None));
    }

    #[test]
    fn years_from_dates() {
        assert_eq!(parse_year("2004"), Some(2004));
        assert_eq!(parse_year("2004-05-12"), Some(2004));
        assert_eq!(parse_year("12 May 1999"), Some(1999));
        assert_eq!(parse_year("20040512"), None);
        assert_eq!(parse_year("'99"), None);
    }

    #[test]
    fn gains_and_peaks() {
        assert_eq!(parse_gain("-3.45 dB"), Some(-3.45));
        assert_eq!(parse_gain("+1.5 dB"), Some(1.5));
        assert_eq!(parse_gain("2"), Some(2.0));
        assert_eq!(parse_gain("loud"), None);
        assert_eq!(parse_peak("0.988"), Some(0.988));
        assert_eq!(parse_peak("-1"), None);
    }

    #[test]
    fn bpm_and_flags() {
        assert_eq!(parse_bpm("120"), Some(120));
        assert_eq!(parse_bpm("127,6"), Some(128));
        assert_eq!(parse_bpm("0"), None);
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn cleaning_trims_and_drops_empty() {
        assert_eq!(clean("  Abbey Road \n"), Some("Abbey Road".to_string()));
        assert_eq!(clean(" \t "), None);
    }
}
