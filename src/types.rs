//! Shared types used across the library
//!
//! Small state types shared by the animation and waveform routines.

/// Direction of a stepping sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    /// Levels grow on each step
    #[default]
    Ascending,
    /// Levels shrink on each step
    Descending,
}

impl Direction {
    /// Reverse the direction
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Check if ascending
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Ascending => defmt::write!(f, "UP"),
            Self::Descending => defmt::write!(f, "DOWN"),
        }
    }
}
