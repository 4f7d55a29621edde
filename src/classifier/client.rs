use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::ClassifierConfig,
    domain::{RiskAssessment, Score},
};

/// The only error kind on the hot path. Always recovered locally by the
/// caller; never propagated as a crash. No retries, no client-side timeout.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("classifier returned probability {0} outside [0, 1]")]
    OutOfRange(f64),
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    phishing_probability: f64,
}

/// Transport seam shared by the background watcher, the popup presenter and
/// the tests.
pub trait RiskQuery: Send + Sync {
    fn assess(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<RiskAssessment, QueryError>> + Send;
}

#[derive(Clone)]
pub struct RiskClient {
    http: Client,
    predict_url: String,
}

impl RiskClient {
    pub fn new(http: Client, config: ClassifierConfig) -> Self {
        let predict_url = format!("{}/predict", config.base_url.trim_end_matches('/'));
        Self { http, predict_url }
    }
}

impl RiskQuery for RiskClient {
    async fn assess(&self, url: &str) -> Result<RiskAssessment, QueryError> {
        let response: PredictionResponse = self
            .http
            .post(&self.predict_url)
            .json(&PredictionRequest { url })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let percent = percent_from_probability(response.phishing_probability)
            .ok_or(QueryError::OutOfRange(response.phishing_probability))?;

        Ok(RiskAssessment {
            url: url.to_string(),
            score: Score::Percent(percent),
        })
    }
}

/// `round(probability * 100)`, defined only on [0, 1].
pub fn percent_from_probability(probability: f64) -> Option<u8> {
    if (0.0..=1.0).contains(&probability) {
        Some((probability * 100.0).round() as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_rounds_to_percent() {
        assert_eq!(percent_from_probability(0.9), Some(90));
        assert_eq!(percent_from_probability(0.0), Some(0));
        assert_eq!(percent_from_probability(1.0), Some(100));
        assert_eq!(percent_from_probability(0.004), Some(0));
        assert_eq!(percent_from_probability(0.455), Some(46));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        assert_eq!(percent_from_probability(-0.1), None);
        assert_eq!(percent_from_probability(1.5), None);
        assert_eq!(percent_from_probability(f64::NAN), None);
    }

    #[test]
    fn response_body_requires_probability_field() {
        let ok: PredictionResponse =
            serde_json::from_str(r#"{"phishing_probability": 0.42}"#).expect("valid body");
        assert!((ok.phishing_probability - 0.42).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<PredictionResponse>(r#"{"score": 42}"#).is_err());
    }
}
