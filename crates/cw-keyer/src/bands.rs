//! Amateur band edges
//!
//! The tuner only keys a carrier strictly inside one of these bands; the
//! edges themselves count as outside.

/// One amateur allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HamBand {
    /// Common name, e.g. "40m"
    pub name: &'static str,
    /// Lower edge in Hz (exclusive)
    pub lower_hz: u32,
    /// Upper edge in Hz (exclusive)
    pub upper_hz: u32,
}

impl HamBand {
    const fn new(name: &'static str, lower_hz: u32, upper_hz: u32) -> Self {
        Self {
            name,
            lower_hz,
            upper_hz,
        }
    }

    /// True if `hz` lies strictly between the band edges
    pub fn contains(&self, hz: u32) -> bool {
        hz > self.lower_hz && hz < self.upper_hz
    }
}

/// Bands the tuner may transmit in
pub const HAM_BANDS: &[HamBand] = &[
    HamBand::new("160m", 1_800_000, 2_000_000),
    HamBand::new("80m", 3_500_000, 4_000_000),
    HamBand::new("40m", 7_000_000, 7_300_000),
    HamBand::new("30m", 10_100_000, 10_150_000),
    HamBand::new("20m", 14_000_000, 14_350_000),
    HamBand::new("17m", 18_068_000, 18_168_000),
    HamBand::new("15m", 21_000_000, 21_450_000),
    HamBand::new("12m", 24_890_000, 24_990_000),
    HamBand::new("10m", 28_000_000, 29_700_000),
    HamBand::new("6m", 50_000_000, 54_000_000),
    HamBand::new("2m", 144_000_000, 148_000_000),
    HamBand::new("70cm", 420_000_000, 450_000_000),
];

/// The band containing `hz`, if any
pub fn band_for(hz: u32) -> Option<&'static HamBand> {
    HAM_BANDS.iter().find(|band| band.contains(hz))
}

/// True if `hz` is inside some amateur band
pub fn is_inband(hz: u32) -> bool {
    band_for(hz).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inband() {
        assert!(is_inband(7_150_000));
        assert!(is_inband(14_074_000));
        assert!(is_inband(432_100_000));
        assert!(!is_inband(7_310_000));
        assert!(!is_inband(0));
    }

    #[test]
    fn test_edges_are_exclusive() {
        assert!(!is_inband(7_000_000));
        assert!(!is_inband(7_300_000));
        assert!(is_inband(7_000_001));
        assert!(is_inband(7_299_999));
    }

    #[test]
    fn test_band_for() {
        assert_eq!(band_for(10_120_000).map(|b| b.name), Some("30m"));
        assert_eq!(band_for(100_000_000), None);
    }

    proptest! {
        #[test]
        fn band_interior_is_inband(idx in 0..HAM_BANDS.len(), per_mille in 1u64..1000) {
            let band = HAM_BANDS[idx];
            let width = u64::from(band.upper_hz - band.lower_hz);
            let hz = band.lower_hz + (width * per_mille / 1000) as u32;
            prop_assert!(is_inband(hz));
        }

        #[test]
        fn band_edges_are_outside(idx in 0..HAM_BANDS.len()) {
            let band = HAM_BANDS[idx];
            prop_assert!(!band.contains(band.lower_hz));
            prop_assert!(!band.contains(band.upper_hz));
        }
    }
}
