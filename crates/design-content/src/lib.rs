//! Cache-aside fetching and rendering of site design content.
//!
//! Pages pull a handful of admin-managed pieces on every request: ad banners,
//! the analytics snippet, custom CSS/JS, the static file list and the
//! language switcher. [`Design`] serves each from the cache, reads storage
//! only on a miss, and renders the result as an HTML fragment.
//!
//! # Example
//!
//! ```rust,ignore
//! use design_content::prelude::*;
//!
//! let config = DesignConfig::load("design.toml")?;
//! let design = Design::with_global_cache(Db::open_default()?, config);
//!
//! let ctx = RenderContext::new("user", "en_US");
//! let css = design.render_files(FileType::Css, true)?;
//! let banner = design.render_ad(&ctx, 160, 600, true)?;
//! let analytics = design.analytics_api(true)?;
//! ```

mod config;
mod context;
mod design;
mod error;
mod kind;
mod records;
mod render;
mod sysvar;

pub use config::{AdsConfig, CacheConfig, DesignConfig, SiteConfig, StorageConfig};
pub use context::RenderContext;
pub use design::{Design, DesignResult};
pub use error::DesignError;
pub use kind::{ContentKind, FileType, UnknownFileType};
pub use records::{Ad, Payload};
pub use render::{file_renderer, render_css_link, render_js_script, FileRenderer};
pub use sysvar::SysVars;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ContentKind, Design, DesignConfig, DesignError, DesignResult, FileType, RenderContext};
    pub use design_cache::Cache;
    pub use design_db::{Db, Storage};
}
