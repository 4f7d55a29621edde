//! Background listener: one call per completed navigation. Callers spawn
//! each handler so a slow classifier response never blocks other tabs; a
//! response arriving after the user navigated away still lands in the
//! shared cache and badge (last write wins, no per-tab isolation).

use std::sync::Arc;

use crate::{
    classifier::RiskQuery,
    domain::{NavigationEvent, Preferences},
    engine, filter,
    store::{AssessmentCache, PreferenceStore},
    surfaces::{BadgeRenderer, NotificationTrigger},
};

pub struct NavigationWatcher<Q> {
    client: Arc<Q>,
    prefs: PreferenceStore,
    cache: AssessmentCache,
    badge: BadgeRenderer,
    notifier: NotificationTrigger,
}

impl<Q: RiskQuery> NavigationWatcher<Q> {
    pub fn new(
        client: Arc<Q>,
        prefs: PreferenceStore,
        cache: AssessmentCache,
        badge: BadgeRenderer,
        notifier: NotificationTrigger,
    ) -> Self {
        Self {
            client,
            prefs,
            cache,
            badge,
            notifier,
        }
    }

    pub async fn handle(&self, event: NavigationEvent) {
        if !filter::should_score(&event) {
            tracing::trace!(
                target: "watcher",
                tab_id = event.tab_id,
                url = %event.url,
                "navigation not eligible for scoring"
            );
            return;
        }

        // The background path always queries fresh; only the popup consults
        // the cache before querying.
        let assessment = match self.client.assess(&event.url).await {
            Ok(assessment) => assessment,
            Err(err) => {
                // Badge and notification stay untouched on failure.
                tracing::warn!(
                    target: "watcher",
                    error = %err,
                    url = %event.url,
                    "classification query failed"
                );
                return;
            }
        };

        if let Err(err) = self.cache.commit(&assessment).await {
            tracing::warn!(target: "watcher", error = %err, "failed to commit assessment");
        }

        let prefs = match self.prefs.load().await {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(
                    target: "watcher",
                    error = %err,
                    "preference load failed; using defaults"
                );
                Preferences::default()
            }
        };

        let verdict = engine::evaluate(&assessment, &prefs);
        self.badge.render(&verdict.badge);
        if let Some(spec) = &verdict.notification {
            tracing::info!(
                target: "watcher",
                tab_id = event.tab_id,
                url = %spec.url,
                percent = spec.percent,
                "phishing warning raised"
            );
            self.notifier.fire(spec);
        }
    }
}
