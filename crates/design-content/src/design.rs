//! The design model: cache-aside lookups for every content kind.

use design_cache::{cache_key, Cache, CacheStatus, Lookup};
use design_db::{params, QueryTimeout, Storage, TimedStorage};

use crate::config::DesignConfig;
use crate::context::RenderContext;
use crate::error::DesignError;
use crate::kind::{ContentKind, FileType};
use crate::records::{Ad, Payload};
use crate::render;
use crate::sysvar::SysVars;

/// Result type for design operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Fetches site design content through the cache, falling back to storage.
///
/// Every lookup follows the same path: derive a key for the content kind,
/// `start` the slot, return a hit, otherwise run one parameterized read,
/// cache the normalized payload and return it. Storage errors are returned
/// as-is and nothing is cached for that call.
///
/// # Example
///
/// ```rust,ignore
/// let design = Design::new(Db::open_default()?, design_cache::global().clone(), config);
///
/// let ctx = RenderContext::new("user", "en_US");
/// if let Some(html) = design.render_ad(&ctx, 728, 90, true)? {
///     page.push_str(&html);
/// }
/// page.push_str(&design.render_files(FileType::Css, true)?);
/// ```
pub struct Design<S: Storage> {
    storage: TimedStorage<S>,
    cache: Cache,
    config: DesignConfig,
    vars: SysVars,
}

impl<S: Storage> Design<S> {
    /// Create a design model over a storage backend and a cache.
    pub fn new(storage: S, cache: Cache, config: DesignConfig) -> Self {
        let timeout = QueryTimeout::from_millis(config.storage.query_timeout_ms);
        Self {
            storage: TimedStorage::new(storage, timeout),
            cache,
            vars: SysVars::new(&config.site),
            config,
        }
    }

    /// Create a design model on the process-wide cache.
    pub fn with_global_cache(storage: S, config: DesignConfig) -> Self {
        Self::new(storage, design_cache::global().clone(), config)
    }

    /// The active configuration.
    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        self.storage.inner()
    }

    /// Run one cache-aside lookup.
    fn cached<T, F>(&self, kind: ContentKind, key: &str, load: F) -> DesignResult<T>
    where
        T: Payload,
        F: FnOnce() -> DesignResult<T>,
    {
        let cache = &self.config.cache;
        let slot = self.cache.start(&cache.group, key, cache.ttl());

        if cache.cache_empty {
            let (payload, status) = slot.get_or_load(load)?;
            tracing::debug!(%kind, key, %status, "design content");
            return Ok(payload);
        }

        let status = match slot.get::<T>()? {
            Lookup::Hit(payload) => {
                tracing::debug!(%kind, key, status = %CacheStatus::Hit, "design content");
                return Ok(payload);
            }
            other => other.status(),
        };

        let payload = load()?;
        if payload.is_empty_payload() {
            tracing::debug!(%kind, key, %status, "empty result not cached");
        } else {
            slot.put(&payload)?;
            tracing::debug!(%kind, key, %status, "design content");
        }
        Ok(payload)
    }

    fn table(&self, kind: ContentKind) -> String {
        self.config.storage.table(kind.table())
    }

    // === Ads ===

    /// Cache key of an ad slot.
    pub fn ad_key(width: u32, height: u32, only_active: bool) -> String {
        cache_key!(ContentKind::Ad.key_prefix(), width, height, only_active)
    }

    /// A random ad of the given size, or `None` if there is none or ads are
    /// disabled.
    ///
    /// The pick is cached for the slot, so one banner is served until the
    /// entry expires.
    pub fn ad(&self, width: u32, height: u32, only_active: bool) -> DesignResult<Option<Ad>> {
        if !self.config.ads.enabled {
            return Ok(None);
        }

        let key = Self::ad_key(width, height, only_active);
        self.cached(ContentKind::Ad, &key, || {
            let active = if only_active { " AND (active='1')" } else { "" };
            let sql = format!(
                "SELECT * FROM {} WHERE (width=?) AND (height=?){} ORDER BY RANDOM() LIMIT 1",
                self.table(ContentKind::Ad),
                active
            );
            Ok(self.storage.query_optional(&sql, params![width, height])?)
        })
    }

    /// Banner markup for an ad slot.
    ///
    /// Inside the administrative area nothing is rendered, but the slot is
    /// still looked up so the cache is warm for public pages.
    pub fn render_ad(
        &self,
        ctx: &RenderContext,
        width: u32,
        height: u32,
        only_active: bool,
    ) -> DesignResult<Option<String>> {
        let ad = self.ad(width, height, only_active)?;

        if ctx.is_admin(&self.config.site) {
            return Ok(None);
        }

        let vars = self.vars.clone().with_lang(&ctx.lang);
        Ok(ad.map(|ad| render::render_ad(&ad, &self.config.site, &self.config.ads, &vars)))
    }

    // === Analytics ===

    /// Cache key of the analytics snippet.
    pub fn analytics_key(only_active: bool) -> String {
        cache_key!(ContentKind::Analytics.key_prefix(), only_active)
    }

    /// The analytics tracking code, emitted verbatim by callers.
    pub fn analytics_api(&self, only_active: bool) -> DesignResult<Option<String>> {
        let key = Self::analytics_key(only_active);
        self.cached(ContentKind::Analytics, &key, || {
            let filter = if only_active { " WHERE active='1'" } else { "" };
            let sql = format!(
                "SELECT code FROM {}{} LIMIT 1",
                self.table(ContentKind::Analytics),
                filter
            );
            Ok(self.storage.query_text(&sql, &[], "code")?)
        })
    }

    // === Custom code ===

    /// Cache key of custom code.
    pub fn custom_code_key(file_type: FileType) -> String {
        cache_key!(ContentKind::CustomCode.key_prefix(), file_type)
    }

    /// Site-wide custom CSS or JS. Empty code, or a bare `0`, counts as none.
    pub fn custom_code(&self, file_type: FileType) -> DesignResult<Option<String>> {
        let key = Self::custom_code_key(file_type);
        self.cached(ContentKind::CustomCode, &key, || {
            let sql = format!(
                "SELECT code FROM {} WHERE codeType = ? LIMIT 1",
                self.table(ContentKind::CustomCode)
            );
            let code = self.storage.query_text(&sql, params![file_type.as_str()], "code")?;
            Ok(code.filter(|c| !c.is_empty() && c != "0"))
        })
    }

    // === Static files ===

    /// Cache key of a static file list.
    pub fn files_key(file_type: FileType, only_active: bool) -> String {
        cache_key!(ContentKind::StaticFiles.key_prefix(), file_type, only_active)
    }

    /// Paths of the static files of one type, as stored.
    pub fn files(&self, file_type: FileType, only_active: bool) -> DesignResult<Vec<String>> {
        let key = Self::files_key(file_type, only_active);
        self.cached(ContentKind::StaticFiles, &key, || {
            let active = if only_active { " AND active='1'" } else { "" };
            let sql = format!(
                "SELECT file FROM {} WHERE fileType = ?{}",
                self.table(ContentKind::StaticFiles),
                active
            );
            Ok(self.storage.query_texts(&sql, params![file_type.as_str()], "file")?)
        })
    }

    /// `<link>` or `<script>` tags for the static files of one type.
    pub fn render_files(&self, file_type: FileType, only_active: bool) -> DesignResult<String> {
        let files = self.files(file_type, only_active)?;
        Ok(render::render_files(file_type, &files, &self.vars))
    }

    // === Languages ===

    /// Ids of the active languages, e.g. `en_US`.
    pub fn languages(&self) -> DesignResult<Vec<String>> {
        let key = ContentKind::Languages.key_prefix();
        self.cached(ContentKind::Languages, key, || {
            let sql = format!(
                "SELECT langId FROM {} WHERE active='1'",
                self.table(ContentKind::Languages)
            );
            Ok(self.storage.query_texts(&sql, &[], "langId")?)
        })
    }

    /// Flag links switching to every language but the request's own.
    pub fn render_lang_list(&self, ctx: &RenderContext) -> DesignResult<String> {
        let languages = self.languages()?;
        Ok(render::render_lang_list(
            &languages,
            &ctx.lang,
            &ctx.lang_switch_url,
            &self.config.site,
        ))
    }
}
