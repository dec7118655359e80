//! Effect speed and its per-family dwell mappings.

use std::time::Duration;

/// How fast a blinking effect alternates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speed {
    #[default]
    Slow,
    Medium,
    Fast,
}

impl Speed {
    /// Dwell per frame when the engine synthesises the effect.
    pub fn dwell(self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(500),
            Speed::Medium => Duration::from_millis(250),
            Speed::Fast => Duration::from_millis(100),
        }
    }

    /// Dwell expressed in the Kuando firmware's tenths of a second.
    pub fn tenths(self) -> u8 {
        (self.dwell().as_millis() / 100).max(1) as u8
    }
}

impl std::str::FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(Speed::Slow),
            "medium" => Ok(Speed::Medium),
            "fast" => Ok(Speed::Fast),
            other => Err(format!("unknown speed {other:?}")),
        }
    }
}
