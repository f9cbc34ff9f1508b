//! End-to-end cache-aside behavior of the design model.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use design_cache::{Cache, CacheBackend, CacheEntry, CacheError, Lookup, ManualClock, MemoryBackend, SlotKey};
use design_content::{Design, DesignConfig, DesignError, FileType, RenderContext};
use design_db::{DbError, QueryResult, ScriptedStorage, Value};

const GROUP: &str = "db/design/static";
const TWO_DAYS: u64 = 172_800;

fn cache_at(now: u64) -> (Cache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(now));
    let cache = Cache::from_parts(Arc::new(MemoryBackend::new()), clock.clone());
    (cache, clock)
}

fn ad_row(id: i64, width: i64, height: i64) -> QueryResult {
    QueryResult::from_values(
        &["adsId", "name", "code", "width", "height", "active"],
        vec![vec![
            Value::Integer(id),
            Value::from("Summer"),
            Value::from("<a href=\"%site_url%summer\">Summer</a>"),
            Value::Integer(width),
            Value::Integer(height),
            Value::from("1"),
        ]],
    )
}

/// Backend holding one slot as raw JSON bytes, decoded on every load.
struct RawBackend {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl RawBackend {
    fn holding(bytes: &[u8]) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.to_vec())),
        }
    }
}

impl CacheBackend for RawBackend {
    fn load(&self, _slot: &SlotKey) -> Result<Option<CacheEntry>, CacheError> {
        match self.bytes.lock().unwrap().as_deref() {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    fn store(&self, _slot: &SlotKey, entry: CacheEntry) -> Result<(), CacheError> {
        *self.bytes.lock().unwrap() = Some(serde_json::to_vec(&entry)?);
        Ok(())
    }

    fn remove(&self, _slot: &SlotKey) -> Result<(), CacheError> {
        *self.bytes.lock().unwrap() = None;
        Ok(())
    }

    fn purge_expired(&self, _now: u64) -> Result<u64, CacheError> {
        Ok(0)
    }

    fn clear(&self) -> Result<(), CacheError> {
        *self.bytes.lock().unwrap() = None;
        Ok(())
    }
}

fn public() -> RenderContext {
    RenderContext::new("user", "en_US")
}

fn admin() -> RenderContext {
    RenderContext::new(DesignConfig::default().site.admin_module, "en_US")
}

// === Slot contract ===

#[test]
fn test_empty_sentinel_slot_round_trip() {
    let (cache, _) = cache_at(0);
    let slot = cache.start(GROUP, "ads1601000", Duration::from_secs(TWO_DAYS));
    slot.put(&None::<String>).unwrap();
    assert_eq!(slot.get::<Option<String>>().unwrap(), Lookup::Hit(None));
}

#[test]
fn test_empty_ad_is_cached_and_renders_nothing() {
    let (cache, _) = cache_at(0);
    let design = Design::new(ScriptedStorage::new(), cache.clone(), DesignConfig::default());

    assert_eq!(design.render_ad(&public(), 160, 1000, true).unwrap(), None);
    assert_eq!(design.render_ad(&public(), 160, 1000, true).unwrap(), None);
    assert_eq!(design.storage().calls_matching("FROM ph7_Ads"), 1);

    let key = Design::<ScriptedStorage>::ad_key(160, 1000, true);
    let slot = cache.start(GROUP, &key, Duration::from_secs(TWO_DAYS));
    assert_eq!(slot.get::<Option<String>>().unwrap(), Lookup::Hit(None));
}

#[test]
fn test_analytics_served_from_cache_within_ttl() {
    let (cache, clock) = cache_at(1_000);
    let storage = ScriptedStorage::new().respond(
        "FROM ph7_AnalyticsApi",
        QueryResult::from_values(&["code"], vec![vec![Value::from("<script>X</script>")]]),
    );
    let design = Design::new(storage, cache.clone(), DesignConfig::default());

    assert_eq!(design.analytics_api(true).unwrap().as_deref(), Some("<script>X</script>"));

    clock.advance(TWO_DAYS - 1);
    assert_eq!(design.analytics_api(true).unwrap().as_deref(), Some("<script>X</script>"));
    assert_eq!(design.storage().calls().len(), 1);

    let slot = cache.start(GROUP, "analyticsApitrue", Duration::from_secs(TWO_DAYS));
    assert!(slot.get::<Option<String>>().unwrap().is_hit());
}

#[test]
fn test_admin_context_warms_cache_without_markup() {
    let (cache, _) = cache_at(0);
    let storage = ScriptedStorage::new().respond("FROM ph7_Ads", ad_row(3, 728, 90));
    let design = Design::new(storage, cache, DesignConfig::default());

    assert_eq!(design.render_ad(&admin(), 728, 90, true).unwrap(), None);
    assert_eq!(design.storage().calls().len(), 1);

    let html = design.render_ad(&public(), 728, 90, true).unwrap().unwrap();
    assert!(html.contains("id=\"ad_3\""));
    assert!(html.contains("<a href=\"http://localhost/summer\">Summer</a>"));
    assert_eq!(design.storage().calls().len(), 1);
}

// === Expiry ===

#[test]
fn test_expired_entry_is_refetched() {
    let (cache, clock) = cache_at(0);
    let storage = ScriptedStorage::new().respond(
        "FROM ph7_CustomCode",
        QueryResult::from_values(&["code"], vec![vec![Value::from("body{color:red}")]]),
    );
    let design = Design::new(storage, cache, DesignConfig::default());

    design.custom_code(FileType::Css).unwrap();
    clock.advance(TWO_DAYS);
    assert_eq!(
        design.custom_code(FileType::Css).unwrap().as_deref(),
        Some("body{color:red}")
    );
    assert_eq!(design.storage().calls().len(), 2);
}

#[test]
fn test_short_ttl_from_config() {
    let (cache, clock) = cache_at(0);
    let mut config = DesignConfig::default();
    config.cache.ttl_secs = 60;
    let design = Design::new(ScriptedStorage::new(), cache, config);

    design.languages().unwrap();
    clock.advance(30);
    design.languages().unwrap();
    clock.advance(30);
    design.languages().unwrap();
    assert_eq!(design.storage().calls().len(), 2);
}

// === Failures ===

#[test]
fn test_storage_failure_propagates_and_caches_nothing() {
    let (cache, _) = cache_at(0);
    let storage = ScriptedStorage::new().fail("FROM ph7_StaticFiles", "no such table");
    let design = Design::new(storage, cache.clone(), DesignConfig::default());

    let err = design.files(FileType::Js, true).unwrap_err();
    assert!(matches!(err, DesignError::Storage(DbError::QueryError(_))));

    let slot = cache.start(GROUP, "filesjstrue", Duration::from_secs(TWO_DAYS));
    assert_eq!(slot.get::<Vec<String>>().unwrap(), Lookup::Miss);
}

#[test]
fn test_failure_is_not_retried() {
    let (cache, _) = cache_at(0);
    let storage = ScriptedStorage::new().fail("FROM ph7_Ads", "connection reset");
    let design = Design::new(storage, cache, DesignConfig::default());

    assert!(design.ad(160, 600, true).is_err());
    assert_eq!(design.storage().calls().len(), 1);
}

#[test]
fn test_slow_query_times_out() {
    let (cache, _) = cache_at(0);
    let mut config = DesignConfig::default();
    config.storage.query_timeout_ms = 1;
    let storage = ScriptedStorage::new()
        .respond(
            "FROM ph7_AnalyticsApi",
            QueryResult::from_values(&["code"], vec![vec![Value::from("<script>late</script>")]]),
        )
        .with_latency(Duration::from_millis(25));
    let design = Design::new(storage, cache.clone(), config);

    let err = design.analytics_api(true).unwrap_err();
    assert!(err.is_timeout());

    let slot = cache.start(GROUP, "analyticsApitrue", Duration::from_secs(TWO_DAYS));
    assert_eq!(slot.get::<Option<String>>().unwrap(), Lookup::Miss);
}

#[test]
fn test_undecodable_cache_entry_falls_back_to_storage() {
    let cache = Cache::from_parts(
        Arc::new(RawBackend::holding(br#"{"payload":1}"#)),
        Arc::new(ManualClock::new(0)),
    );
    let storage = ScriptedStorage::new().respond(
        "FROM ph7_AnalyticsApi",
        QueryResult::from_values(&["code"], vec![vec![Value::from("<script>X</script>")]]),
    );
    let design = Design::new(storage, cache, DesignConfig::default());

    for _ in 0..3 {
        assert_eq!(design.analytics_api(true).unwrap().as_deref(), Some("<script>X</script>"));
    }
    assert_eq!(design.storage().calls().len(), 1);
}

// === Rendering ===

#[test]
fn test_render_files_with_sysvars() {
    let (cache, _) = cache_at(0);
    let storage = ScriptedStorage::new().respond(
        "FROM ph7_StaticFiles",
        QueryResult::from_values(
            &["file"],
            vec![
                vec![Value::from("%url_static%css/common.css")],
                vec![Value::from("https://fonts.example/f.css")],
            ],
        ),
    );
    let design = Design::new(storage, cache, DesignConfig::default());

    let html = design.render_files(FileType::Css, true).unwrap();
    assert_eq!(
        html,
        "<link rel=\"stylesheet\" href=\"http://localhost/static/css/common.css\" />\n\
         <link rel=\"stylesheet\" href=\"https://fonts.example/f.css\" />"
    );
}

#[test]
fn test_lang_list() {
    let (cache, _) = cache_at(0);
    let storage = ScriptedStorage::new().respond(
        "FROM ph7_LanguagesInfo",
        QueryResult::from_values(
            &["langId"],
            vec![vec![Value::from("en_US")], vec![Value::from("fr_FR")]],
        ),
    );
    let design = Design::new(storage, cache, DesignConfig::default());

    let ctx = public().with_lang_switch_url("/search?l=");
    let html = design.render_lang_list(&ctx).unwrap();
    assert_eq!(
        html,
        "<a href=\"/search?l=fr_FR\" hreflang=\"fr\"><img src=\"http://localhost/static/img/flag/s/fr.gif\" alt=\"fr\" title=\"fr\" /></a>&nbsp;"
    );
}

// === Sharing ===

#[test]
fn test_designs_share_one_cache() {
    let (cache, _) = cache_at(0);
    let first = Design::new(
        ScriptedStorage::new().respond("FROM ph7_Ads", ad_row(8, 300, 250)),
        cache.clone(),
        DesignConfig::default(),
    );
    let second = Design::new(ScriptedStorage::new(), cache, DesignConfig::default());

    first.ad(300, 250, true).unwrap();
    let ad = second.ad(300, 250, true).unwrap().unwrap();
    assert_eq!(ad.ads_id, 8);
    assert!(second.storage().calls().is_empty());
}

#[test]
fn test_concurrent_misses_last_writer_wins() {
    let (cache, _) = cache_at(0);
    let storage = Arc::new(ScriptedStorage::new().respond(
        "FROM ph7_StaticFiles",
        QueryResult::from_values(&["file"], vec![vec![Value::from("a.js")]]),
    ));

    std::thread::scope(|s| {
        for _ in 0..4 {
            let design = Design::new(storage.clone(), cache.clone(), DesignConfig::default());
            s.spawn(move || {
                assert_eq!(design.files(FileType::Js, true).unwrap(), vec!["a.js"]);
            });
        }
    });

    let calls = storage.calls_matching("FROM ph7_StaticFiles");
    assert!((1..=4).contains(&calls));

    let slot = cache.start(GROUP, "filesjstrue", Duration::from_secs(TWO_DAYS));
    assert_eq!(slot.get::<Vec<String>>().unwrap(), Lookup::Hit(vec!["a.js".to_string()]));
}
