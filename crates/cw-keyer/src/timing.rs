//! Keying speed and element timing
//!
//! Speed follows the PARIS standard: one dit lasts `1200 / wpm` milliseconds.

use std::time::Duration;

/// Slowest supported speed
pub const MIN_WPM: u8 = 5;

/// Fastest supported speed
pub const MAX_WPM: u8 = 50;

/// Speed used when the configured one is out of range
pub const DEFAULT_WPM: u8 = 20;

/// Milliseconds of one dit at 1 WPM
const PARIS_MS: u32 = 1200;

/// Dit length in milliseconds
///
/// Speeds below [`MIN_WPM`] are clamped first, so this never divides by zero.
pub fn dit_duration_ms(wpm: u8) -> u32 {
    PARIS_MS / u32::from(wpm.max(MIN_WPM))
}

/// One timing unit as a [`Duration`]
pub fn unit(wpm: u8) -> Duration {
    Duration::from_millis(u64::from(dit_duration_ms(wpm)))
}

/// Return `wpm` if it is within [`MIN_WPM`]..=[`MAX_WPM`], otherwise [`DEFAULT_WPM`]
pub fn validate_wpm(wpm: u8) -> u8 {
    if (MIN_WPM..=MAX_WPM).contains(&wpm) {
        wpm
    } else {
        DEFAULT_WPM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_speeds() {
        assert_eq!(dit_duration_ms(20), 60);
        assert_eq!(dit_duration_ms(5), 240);
        assert_eq!(dit_duration_ms(50), 24);
        assert_eq!(unit(20), Duration::from_millis(60));
    }

    #[test]
    fn test_zero_wpm_does_not_divide_by_zero() {
        assert_eq!(dit_duration_ms(0), 240);
        assert_eq!(dit_duration_ms(1), 240);
    }

    #[test]
    fn test_validate_wpm() {
        assert_eq!(validate_wpm(5), 5);
        assert_eq!(validate_wpm(50), 50);
        assert_eq!(validate_wpm(4), 20);
        assert_eq!(validate_wpm(51), 20);
        assert_eq!(validate_wpm(0), 20);
    }

    proptest! {
        #[test]
        fn dit_duration_never_increases(wpm in 0u8..u8::MAX) {
            prop_assert!(dit_duration_ms(wpm + 1) <= dit_duration_ms(wpm));
        }

        #[test]
        fn validated_wpm_is_in_range(wpm in any::<u8>()) {
            let v = validate_wpm(wpm);
            prop_assert!((MIN_WPM..=MAX_WPM).contains(&v));
        }
    }
}
