/// Play-position readouts as the editor displays them: `M:SS.f`,
/// optionally with an hours field (`H:MM:SS.f`).
use crate::{Seconds, TimelineError};

pub fn parse_readout_time(s: &str) -> Result<Seconds, TimelineError> {
    let invalid = || TimelineError::InvalidReadout(s.to_string());
    let parts: Vec<&str> = s.trim().split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, sec] => ("0", *m, *sec),
        [h, m, sec] => (*h, *m, *sec),
        _ => return Err(invalid()),
    };

    let hours = hours.parse::<u32>().map_err(|_| invalid())?;
    let minutes = minutes.parse::<u32>().map_err(|_| invalid())?;
    let seconds = seconds.parse::<f64>().map_err(|_| invalid())?;

    if !seconds.is_finite() || seconds < 0.0 || seconds >= 60.0 {
        return Err(invalid());
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Inverse of [`parse_readout_time`] with one decimal, e.g. `1:04.5`.
pub fn format_readout_time(secs: Seconds) -> String {
    let tenths = (secs.max(0.0) * 10.0).round() as u64;
    let minutes = tenths / 600;
    let rest = tenths % 600;
    format!("{}:{:02}.{}", minutes, rest / 10, rest % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes_seconds() {
        assert_eq!(parse_readout_time("0:04.5").unwrap(), 4.5);
        assert_eq!(parse_readout_time("1:02.3").unwrap(), 62.3);
        assert_eq!(parse_readout_time(" 0:00.0 ").unwrap(), 0.0);
        assert_eq!(parse_readout_time("1:00:01.0").unwrap(), 3601.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "4.5", "a:04.5", "0:xx", "0:75.0", "1:2:3:4"] {
            assert!(
                matches!(parse_readout_time(bad), Err(TimelineError::InvalidReadout(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format_readout_time(4.5), "0:04.5");
        assert_eq!(format_readout_time(62.34), "1:02.3");
        assert_eq!(format_readout_time(-1.0), "0:00.0");
    }
}
