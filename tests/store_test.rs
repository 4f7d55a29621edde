use phishguard::{
    domain::{RiskAssessment, Score, DEFAULT_THRESHOLD},
    store::{self, AssessmentCache, PreferenceStore},
};
use tempfile::TempDir;

async fn open_store() -> (TempDir, PreferenceStore, AssessmentCache) {
    let dir = TempDir::new().expect("temp dir");
    let pool = store::init_pool(&dir.path().join("phishguard.db"))
        .await
        .expect("pool");
    (
        dir,
        PreferenceStore::new(pool.clone()),
        AssessmentCache::new(pool),
    )
}

#[tokio::test]
async fn fresh_store_loads_defaults() {
    let (_dir, prefs, cache) = open_store().await;
    let loaded = prefs.load().await.expect("load");
    assert_eq!(loaded.threshold, DEFAULT_THRESHOLD);
    assert!(loaded.safe_domains.is_empty());
    assert!(cache.current().await.expect("current").is_none());
}

#[tokio::test]
async fn threshold_is_clamped_and_persisted() {
    let (_dir, prefs, _cache) = open_store().await;
    assert_eq!(prefs.set_threshold(150).await.expect("set"), 100);
    assert_eq!(prefs.load().await.expect("load").threshold, 100);
    assert_eq!(prefs.set_threshold(-5).await.expect("set"), 0);
    // A stored zero reads back as the default, like the original popup's
    // `threshold || 50` fallback.
    assert_eq!(prefs.load().await.expect("load").threshold, DEFAULT_THRESHOLD);
}

#[tokio::test]
async fn stepper_adjusts_relative_to_effective_threshold() {
    let (_dir, prefs, _cache) = open_store().await;
    assert_eq!(prefs.adjust_threshold(1).await.expect("up"), 51);
    assert_eq!(prefs.adjust_threshold(-1).await.expect("down"), 50);
    prefs.set_threshold(100).await.expect("set");
    assert_eq!(prefs.adjust_threshold(1).await.expect("up"), 100);
}

#[tokio::test]
async fn safe_domain_toggle_adds_and_removes() {
    let (_dir, prefs, _cache) = open_store().await;
    prefs
        .set_domain_safe("example.com", true)
        .await
        .expect("add");
    prefs
        .set_domain_safe("other.example", true)
        .await
        .expect("add");
    let loaded = prefs.load().await.expect("load");
    assert!(loaded.is_safe("example.com"));
    assert!(loaded.is_safe("other.example"));

    prefs
        .set_domain_safe("example.com", false)
        .await
        .expect("remove");
    let loaded = prefs.load().await.expect("load");
    assert!(!loaded.is_safe("example.com"));
    assert!(loaded.is_safe("other.example"));
}

#[tokio::test]
async fn toggling_safe_domain_preserves_threshold() {
    let (_dir, prefs, _cache) = open_store().await;
    prefs.set_threshold(80).await.expect("set");
    prefs
        .set_domain_safe("example.com", true)
        .await
        .expect("add");
    assert_eq!(prefs.load().await.expect("load").threshold, 80);
}

#[tokio::test]
async fn cache_lookup_requires_exact_url_match() {
    let (_dir, _prefs, cache) = open_store().await;
    cache
        .commit(&RiskAssessment {
            url: "https://a.example/".to_string(),
            score: Score::Percent(90),
        })
        .await
        .expect("commit");

    let hit = cache
        .lookup("https://a.example/")
        .await
        .expect("lookup")
        .expect("hit");
    assert_eq!(hit.score, Score::Percent(90));
    assert!(cache
        .lookup("https://b.example/")
        .await
        .expect("lookup")
        .is_none());
    // The slot itself still holds the other tab's assessment.
    assert!(cache.current().await.expect("current").is_some());
}

#[tokio::test]
async fn cache_slot_is_shared_and_last_write_wins() {
    let (_dir, _prefs, cache) = open_store().await;
    // Tab A's result lands first, tab B's later response overwrites it.
    cache
        .commit(&RiskAssessment {
            url: "https://tab-a.example/".to_string(),
            score: Score::Percent(10),
        })
        .await
        .expect("commit a");
    cache
        .commit(&RiskAssessment {
            url: "https://tab-b.example/".to_string(),
            score: Score::Percent(95),
        })
        .await
        .expect("commit b");

    let current = cache.current().await.expect("current").expect("slot");
    assert_eq!(current.url, "https://tab-b.example/");
    assert_eq!(current.score, Score::Percent(95));
    assert!(cache
        .lookup("https://tab-a.example/")
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn unknown_score_round_trips_as_sentinel() {
    let (_dir, _prefs, cache) = open_store().await;
    cache
        .commit(&RiskAssessment {
            url: "https://a.example/".to_string(),
            score: Score::Unknown,
        })
        .await
        .expect("commit");
    let current = cache.current().await.expect("current").expect("slot");
    assert_eq!(current.score, Score::Unknown);
}
