//! Time parsing and game-clock formatting utilities

use crate::error::{RinkError, RinkResult};

/// Time parser for operator-entered timestamps
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeParser;

impl TimeParser {
    /// Create a new time parser
    pub fn new() -> Self {
        Self
    }

    /// Parse `SS(.s)`, `MM:SS(.s)` or `HH:MM:SS(.s)` into seconds
    pub fn parse_time(&self, time_str: &str) -> RinkResult<f64> {
        let time_str = time_str.trim();
        let invalid = || RinkError::InvalidTimeFormat {
            time: time_str.to_string(),
        };

        let parts: Vec<&str> = time_str.split(':').collect();
        let seconds = match parts.as_slice() {
            [secs] => secs.parse::<f64>().map_err(|_| invalid())?,
            [mins, secs] => {
                let minutes = mins.parse::<u32>().map_err(|_| invalid())?;
                let seconds = self.parse_seconds_field(secs).ok_or_else(invalid)?;
                minutes as f64 * 60.0 + seconds
            }
            [hours, mins, secs] => {
                let hours = hours.parse::<u32>().map_err(|_| invalid())?;
                let minutes = mins.parse::<u32>().map_err(|_| invalid())?;
                if minutes >= 60 {
                    return Err(invalid());
                }
                let seconds = self.parse_seconds_field(secs).ok_or_else(invalid)?;
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds
            }
            _ => return Err(invalid()),
        };

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(invalid());
        }
        Ok(seconds)
    }

    fn parse_seconds_field(&self, field: &str) -> Option<f64> {
        let seconds = field.parse::<f64>().ok()?;
        (0.0..60.0).contains(&seconds).then_some(seconds)
    }

    /// Format seconds as a game clock `MM:SS.s`; minutes are not wrapped at 60
    pub fn format_clock(&self, seconds: f64) -> String {
        let tenths = (seconds.max(0.0) * 10.0).round() as u64;
        let minutes = tenths / 600;
        let secs = (tenths % 600) / 10;
        let fraction = tenths % 10;
        format!("{:02}:{:02}.{}", minutes, secs, fraction)
    }
}

/// Round to one decimal place, the precision of the official clock.
/// Exact halves go to the even tenth.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_seconds() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("315.8").unwrap(), 315.8);
        assert_eq!(parser.parse_time(" 42 ").unwrap(), 42.0);
    }

    #[test]
    fn test_parse_clock_forms() {
        let parser = TimeParser::new();
        assert_eq!(parser.parse_time("05:15.5").unwrap(), 315.5);
        assert_eq!(parser.parse_time("1:02:03").unwrap(), 3723.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let parser = TimeParser::new();
        assert!(parser.parse_time("abc").is_err());
        assert!(parser.parse_time("-5").is_err());
        assert!(parser.parse_time("01:75").is_err());
        assert!(parser.parse_time("1:60:00").is_err());
        assert!(parser.parse_time("1:2:3:4").is_err());
    }

    #[test]
    fn test_format_clock() {
        let parser = TimeParser::new();
        assert_eq!(parser.format_clock(0.0), "00:00.0");
        assert_eq!(parser.format_clock(315.8), "05:15.8");
        assert_eq!(parser.format_clock(1200.0), "20:00.0");
        assert_eq!(parser.format_clock(3725.04), "62:05.0");
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(315.789), 315.8);
        assert_eq!(round_tenth(1200.0), 1200.0);
        assert_eq!(round_tenth(0.25), 0.2);
        assert_eq!(round_tenth(0.75), 0.8);
    }
}
