//! Per-radio mode name tables
//!
//! Every radio family numbers its operating modes differently, so the
//! name/opcode mapping is a fixed table owned by each protocol module.
//! Lookups never fail: unknown names map to [`MODE_UNKNOWN`] and unknown
//! codes to [`UNKNOWN_MODE_NAME`], and callers check for the sentinel.

/// Sentinel opcode for a mode name the radio does not know
pub const MODE_UNKNOWN: u8 = 0xFF;

/// Sentinel name for a mode opcode the radio does not know
pub const UNKNOWN_MODE_NAME: &str = "UNKNOWN";

/// Bidirectional mode name <-> opcode table
#[derive(Debug, Clone, Copy)]
pub struct ModeTable {
    entries: &'static [(&'static str, u8)],
}

impl ModeTable {
    /// Create a table from `(name, opcode)` pairs
    pub const fn new(entries: &'static [(&'static str, u8)]) -> Self {
        Self { entries }
    }

    /// Look up the opcode for a mode name
    pub fn code(&self, name: &str) -> u8 {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, code)| *code)
            .unwrap_or(MODE_UNKNOWN)
    }

    /// Look up the name for a mode opcode
    pub fn name(&self, code: u8) -> &'static str {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(name, _)| *name)
            .unwrap_or(UNKNOWN_MODE_NAME)
    }

    /// All mode names in table order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}
