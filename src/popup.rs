//! Popup presenter: a second, user-invoked entry point. Reuses the cached
//! assessment when it matches the active tab, otherwise queries the
//! classifier itself, independent of whatever the background watcher did
//! for the same tab.

use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::{
    classifier::RiskQuery,
    domain::{Preferences, Score},
    filter,
    store::{AssessmentCache, PreferenceStore},
};

const GAUGE_VIEWBOX: f64 = 80.0;
const GAUGE_STROKE_WIDTH: f64 = 8.0;
const GAUGE_RADIUS: f64 = (GAUGE_VIEWBOX - GAUGE_STROKE_WIDTH) / 2.0;
const INDETERMINATE_DASHES: &str = "4 6";

const NOT_CHECKED_MESSAGE: &str =
    "You are visiting an internal page, so no phishing check is needed.";

/// Circular progress geometry: the sweep covers `percent` of the ring,
/// leaving a dash offset of `circumference * (1 - percent/100)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub stroke_dasharray: String,
    pub stroke_dashoffset: f64,
}

pub fn gauge(score: Score) -> Gauge {
    let circumference = 2.0 * std::f64::consts::PI * GAUGE_RADIUS;
    match score {
        Score::Unknown => Gauge {
            stroke_dasharray: INDETERMINATE_DASHES.to_string(),
            stroke_dashoffset: 0.0,
        },
        Score::Percent(percent) => {
            let offset = if percent > 0 {
                circumference * (1.0 - f64::from(percent) / 100.0)
            } else {
                0.0
            };
            Gauge {
                stroke_dasharray: format!("{circumference} {circumference}"),
                stroke_dashoffset: offset,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskMessage {
    HighRisk,
    LikelyPhishing,
    LikelySafe,
    Safe,
    Unknown,
}

impl RiskMessage {
    pub fn text(self) -> &'static str {
        match self {
            RiskMessage::HighRisk => "High risk of phishing.",
            RiskMessage::LikelyPhishing => "Possibly a phishing site.",
            RiskMessage::LikelySafe => "Likely safe.",
            RiskMessage::Safe => "High level of safety.",
            RiskMessage::Unknown => "Unable to determine.",
        }
    }
}

/// Strict greater-than bands, one unit narrower than the badge's
/// closed-open bands. The discrepancy is kept as-is.
pub fn risk_message(score: Score) -> RiskMessage {
    match score {
        Score::Unknown => RiskMessage::Unknown,
        Score::Percent(percent) if percent > 75 => RiskMessage::HighRisk,
        Score::Percent(percent) if percent > 50 => RiskMessage::LikelyPhishing,
        Score::Percent(percent) if percent > 25 => RiskMessage::LikelySafe,
        Score::Percent(_) => RiskMessage::Safe,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PopupReport {
    /// Local or intranet page; scoring is skipped entirely.
    NotChecked { message: String },
    Checked {
        percent_text: String,
        gauge: Gauge,
        message: String,
        threshold: u8,
        safe_domain: bool,
    },
}

pub struct PopupPresenter<Q> {
    client: Arc<Q>,
    prefs: PreferenceStore,
    cache: AssessmentCache,
}

impl<Q: RiskQuery> PopupPresenter<Q> {
    pub fn new(client: Arc<Q>, prefs: PreferenceStore, cache: AssessmentCache) -> Self {
        Self {
            client,
            prefs,
            cache,
        }
    }

    pub async fn report(&self, active_url: &str) -> PopupReport {
        let parsed = Url::parse(active_url).ok();
        let scorable = parsed.as_ref().map(filter::is_scorable_host).unwrap_or(false);
        if !scorable {
            return PopupReport::NotChecked {
                message: NOT_CHECKED_MESSAGE.to_string(),
            };
        }

        let prefs = match self.prefs.load().await {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(target: "popup", error = %err, "preference load failed; using defaults");
                Preferences::default()
            }
        };

        let score = self.resolve_score(active_url).await;
        let safe_domain = parsed
            .as_ref()
            .and_then(|url| url.host_str())
            .map(|host| prefs.is_safe(host))
            .unwrap_or(false);

        PopupReport::Checked {
            percent_text: match score {
                Score::Percent(percent) => format!("{percent}%"),
                Score::Unknown => "N/A".to_string(),
            },
            gauge: gauge(score),
            message: risk_message(score).text().to_string(),
            threshold: prefs.threshold,
            safe_domain,
        }
    }

    async fn resolve_score(&self, url: &str) -> Score {
        match self.cache.lookup(url).await {
            Ok(Some(cached)) => {
                tracing::debug!(
                    target: "popup",
                    url = %url,
                    cached_at = %cached.updated_at,
                    "reusing cached assessment"
                );
                return cached.score;
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(target: "popup", error = %err, "cache lookup failed");
            }
        }

        match self.client.assess(url).await {
            Ok(assessment) => {
                if let Err(err) = self.cache.commit(&assessment).await {
                    tracing::warn!(target: "popup", error = %err, "failed to commit assessment");
                }
                assessment.score
            }
            Err(err) => {
                // Failures are shown as N/A and never committed to the cache.
                tracing::warn!(target: "popup", error = %err, url = %url, "classification query failed");
                Score::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * GAUGE_RADIUS;

    #[test]
    fn gauge_offset_follows_percent() {
        let gauge = gauge(Score::Percent(90));
        assert_eq!(
            gauge.stroke_dasharray,
            format!("{CIRCUMFERENCE} {CIRCUMFERENCE}")
        );
        assert!((gauge.stroke_dashoffset - CIRCUMFERENCE * 0.1).abs() < 1e-9);
    }

    #[test]
    fn zero_percent_renders_full_ring() {
        assert_eq!(gauge(Score::Percent(0)).stroke_dashoffset, 0.0);
    }

    #[test]
    fn unknown_renders_fixed_indeterminate_dashes() {
        let gauge = gauge(Score::Unknown);
        assert_eq!(gauge.stroke_dasharray, INDETERMINATE_DASHES);
        assert_eq!(gauge.stroke_dashoffset, 0.0);
    }

    #[test]
    fn message_bands_use_strict_lower_bounds() {
        assert_eq!(risk_message(Score::Percent(76)), RiskMessage::HighRisk);
        assert_eq!(risk_message(Score::Percent(75)), RiskMessage::LikelyPhishing);
        assert_eq!(risk_message(Score::Percent(51)), RiskMessage::LikelyPhishing);
        assert_eq!(risk_message(Score::Percent(50)), RiskMessage::LikelySafe);
        assert_eq!(risk_message(Score::Percent(26)), RiskMessage::LikelySafe);
        assert_eq!(risk_message(Score::Percent(25)), RiskMessage::Safe);
        assert_eq!(risk_message(Score::Percent(0)), RiskMessage::Safe);
        assert_eq!(risk_message(Score::Unknown), RiskMessage::Unknown);
    }

    #[test]
    fn message_bands_are_narrower_than_badge_bands_at_boundaries() {
        use crate::engine::{badge_color, BadgeColor};
        // 75 is red on the badge but only "possibly phishing" in the popup.
        assert_eq!(badge_color(75), BadgeColor::Red);
        assert_eq!(risk_message(Score::Percent(75)), RiskMessage::LikelyPhishing);
        assert_eq!(badge_color(50), BadgeColor::Orange);
        assert_eq!(risk_message(Score::Percent(50)), RiskMessage::LikelySafe);
        assert_eq!(badge_color(25), BadgeColor::Yellow);
        assert_eq!(risk_message(Score::Percent(25)), RiskMessage::Safe);
    }
}
