mod client;

pub use client::{percent_from_probability, QueryError, RiskClient, RiskQuery};
