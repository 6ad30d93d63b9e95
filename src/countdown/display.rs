//! Display values derived from the remaining countdown time

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hours, minutes and seconds decomposition of a number of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DisplayTime {
    pub fn from_seconds(secs: u64) -> Self {
        Self {
            hours: secs / 3600,
            minutes: (secs % 3600) / 60,
            seconds: (secs % 3600) % 60,
        }
    }
}

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Fraction of the run still remaining, `None` for a zero-length run
pub fn progress_fraction(remaining: u64, duration: u64) -> Option<f32> {
    if duration == 0 {
        return None;
    }
    Some((remaining as f32 / duration as f32).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_seconds_into_clock_fields() {
        let time = DisplayTime::from_seconds(3 * 3600 + 25 * 60 + 7);
        assert_eq!(time, DisplayTime { hours: 3, minutes: 25, seconds: 7 });
        assert_eq!(time.to_string(), "03:25:07");
    }

    #[test]
    fn formats_zero_and_long_runs() {
        assert_eq!(DisplayTime::from_seconds(0).to_string(), "00:00:00");
        assert_eq!(DisplayTime::from_seconds(59).to_string(), "00:00:59");
        assert_eq!(DisplayTime::from_seconds(86_399).to_string(), "23:59:59");
        assert_eq!(DisplayTime::from_seconds(100 * 3600).to_string(), "100:00:00");
    }

    #[test]
    fn progress_is_undefined_for_zero_duration() {
        assert_eq!(progress_fraction(0, 0), None);
    }

    #[test]
    fn progress_is_remaining_over_duration() {
        assert_eq!(progress_fraction(3, 3), Some(1.0));
        assert_eq!(progress_fraction(0, 3), Some(0.0));
        let third = progress_fraction(1, 3).unwrap();
        assert!((third - 0.333).abs() < 0.001);
    }
}
