//! HTML fragments for fetched content.

use crate::config::{AdsConfig, SiteConfig};
use crate::kind::FileType;
use crate::records::Ad;
use crate::sysvar::SysVars;

/// Renders one static file reference.
pub type FileRenderer = fn(&str) -> String;

/// Renderer for each file type.
const FILE_RENDERERS: [(FileType, FileRenderer); 2] = [
    (FileType::Css, render_css_link),
    (FileType::Js, render_js_script),
];

/// Look up the renderer for a file type.
pub fn file_renderer(file_type: FileType) -> FileRenderer {
    FILE_RENDERERS
        .iter()
        .find(|(ft, _)| *ft == file_type)
        .map(|(_, render)| *render)
        .unwrap_or(render_css_link)
}

/// `<link>` tag for a stylesheet.
pub fn render_css_link(href: &str) -> String {
    format!(
        r#"<link rel="stylesheet" href="{}" />"#,
        html_escape(href)
    )
}

/// `<script>` tag for a script file.
pub fn render_js_script(src: &str) -> String {
    format!(r#"<script src="{}"></script>"#, html_escape(src))
}

/// Render every file of one type, expanding system variables in the paths.
pub fn render_files(file_type: FileType, files: &[String], vars: &SysVars) -> String {
    let render = file_renderer(file_type);
    files
        .iter()
        .map(|file| render(&vars.expand(file)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an ad banner.
///
/// Clicking the banner points a hidden pixel at the click-tracking URL. The
/// banner code is trusted admin-entered markup and is not escaped.
pub fn render_ad(ad: &Ad, site: &SiteConfig, ads: &AdsConfig, vars: &SysVars) -> String {
    let id = ad.ads_id;
    format!(
        concat!(
            r#"<div class="inline" onclick="$('#ad_{id}').attr('src','{root}?{param}={id}');return true;">"#,
            "{code}",
            r#"<img src="{static_url}img/useful/blank.gif" style="border:0;width:0px;height:0px;" alt="" id="ad_{id}" /></div>"#,
        ),
        id = id,
        root = html_escape(&site.url),
        param = html_escape(&ads.click_param),
        code = vars.expand(&ad.code),
        static_url = html_escape(&site.static_url),
    )
}

/// Render flag links to every language except the current one.
pub fn render_lang_list(languages: &[String], current: &str, switch_url: &str, site: &SiteConfig) -> String {
    languages
        .iter()
        .filter(|lang| lang.as_str() != current)
        .map(|lang| {
            let abbr: String = lang.chars().take(2).collect();
            format!(
                r#"<a href="{url}{lang}" hreflang="{abbr}"><img src="{static_url}img/flag/s/{abbr}.gif" alt="{abbr}" title="{abbr}" /></a>&nbsp;"#,
                url = html_escape(switch_url),
                lang = html_escape(lang),
                abbr = html_escape(&abbr),
                static_url = html_escape(&site.static_url),
            )
        })
        .collect()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
