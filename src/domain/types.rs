use std::collections::BTreeSet;

pub const DEFAULT_THRESHOLD: u8 = 50;

/// Rounded classifier output for one URL. `Unknown` stands in for a failed
/// or not-yet-performed query and is persisted as -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Unknown,
    Percent(u8),
}

impl Score {
    pub fn percent(self) -> Option<u8> {
        match self {
            Score::Percent(value) => Some(value),
            Score::Unknown => None,
        }
    }

    pub fn as_persisted(self) -> i64 {
        match self {
            Score::Percent(value) => i64::from(value),
            Score::Unknown => -1,
        }
    }

    pub fn from_persisted(raw: i64) -> Self {
        if (0..=100).contains(&raw) {
            Score::Percent(raw as u8)
        } else {
            Score::Unknown
        }
    }
}

/// One classifier answer. Immutable once created; replaced wholesale by the
/// next successful query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    pub url: String,
    pub score: Score,
}

/// User-owned settings, persisted across sessions and read by every surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub threshold: u8,
    pub safe_domains: BTreeSet<String>,
}

impl Preferences {
    pub fn is_safe(&self, hostname: &str) -> bool {
        self.safe_domains.contains(hostname)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            safe_domains: BTreeSet::new(),
        }
    }
}
