//! Decision engine: pure mapping from an assessment plus preferences to
//! what the badge shows and whether a notification fires. Invoked
//! identically from the background watcher and the popup; evaluating the
//! same inputs twice yields the same verdict.

use url::Url;

use crate::domain::{Preferences, RiskAssessment, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Red,
    Orange,
    Yellow,
    Green,
    Gray,
}

impl BadgeColor {
    pub fn as_hex(self) -> &'static str {
        match self {
            BadgeColor::Red => "#f87171",
            BadgeColor::Orange => "#fb923c",
            BadgeColor::Yellow => "#facc15",
            BadgeColor::Green => "#34d399",
            BadgeColor::Gray => "#e5e7eb",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeState {
    /// Safe-listed domain: badge text removed entirely.
    Cleared,
    /// No valid score available.
    Unknown,
    Score { percent: u8, color: BadgeColor },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSpec {
    pub url: String,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub badge: BadgeState,
    pub notification: Option<NotificationSpec>,
}

/// Badge bands are closed-open on the lower bound, inclusive of 100. The
/// popup message bands use strict lower bounds and are one unit narrower;
/// the two tables are intentionally separate.
pub fn badge_color(percent: u8) -> BadgeColor {
    match percent {
        75..=100 => BadgeColor::Red,
        50..=74 => BadgeColor::Orange,
        25..=49 => BadgeColor::Yellow,
        _ => BadgeColor::Green,
    }
}

pub fn evaluate(assessment: &RiskAssessment, prefs: &Preferences) -> Verdict {
    let Score::Percent(percent) = assessment.score else {
        return Verdict {
            badge: BadgeState::Unknown,
            notification: None,
        };
    };

    // The allow-list check runs after scoring, not instead of it, so the
    // percent stays cached for the popup's informational display.
    if hostname(&assessment.url).is_some_and(|host| prefs.is_safe(&host)) {
        return Verdict {
            badge: BadgeState::Cleared,
            notification: None,
        };
    }

    // No de-duplication or cooldown: every qualifying navigation re-notifies.
    let notification = (percent >= prefs.threshold).then(|| NotificationSpec {
        url: assessment.url.clone(),
        percent,
    });

    Verdict {
        badge: BadgeState::Score {
            percent,
            color: badge_color(percent),
        },
        notification,
    }
}

pub fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(str::to_string)
}
