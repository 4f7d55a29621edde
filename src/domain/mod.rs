pub mod navigation;
pub mod types;

pub use navigation::{LifecycleStatus, NavigationEvent};
pub use types::{Preferences, RiskAssessment, Score, DEFAULT_THRESHOLD};
