//! System variable expansion.

use crate::config::SiteConfig;

/// Expands `%name%` placeholders stored in file paths and ad code.
///
/// Known variables: `%site_url%`, `%url_static%`, `%site_name%`, `%lang%`.
/// Unknown placeholders are left untouched.
#[derive(Debug, Clone)]
pub struct SysVars {
    vars: Vec<(&'static str, String)>,
}

impl SysVars {
    /// Variables for a site, with its default language.
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            vars: vec![
                ("%site_url%", site.url.clone()),
                ("%url_static%", site.static_url.clone()),
                ("%site_name%", site.name.clone()),
                ("%lang%", site.default_lang.clone()),
            ],
        }
    }

    /// Override the language of the current request.
    pub fn with_lang(mut self, lang: &str) -> Self {
        if let Some((_, value)) = self.vars.iter_mut().find(|(name, _)| *name == "%lang%") {
            *value = lang.to_string();
        }
        self
    }

    /// Expand every known variable in `input`.
    pub fn expand(&self, input: &str) -> String {
        if !input.contains('%') {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find('%') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match self.vars.iter().find(|(name, _)| tail.starts_with(name)) {
                Some((name, value)) => {
                    out.push_str(value);
                    rest = &tail[name.len()..];
                }
                None => {
                    out.push('%');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            url: "https://love.example/".into(),
            static_url: "https://cdn.love.example/".into(),
            name: "Love".into(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_expand_known_vars() {
        let vars = SysVars::new(&site());
        assert_eq!(
            vars.expand("%url_static%js/app.js"),
            "https://cdn.love.example/js/app.js"
        );
        assert_eq!(vars.expand("%site_name% @ %site_url%"), "Love @ https://love.example/");
    }

    #[test]
    fn test_unknown_vars_untouched() {
        let vars = SysVars::new(&site());
        assert_eq!(vars.expand("100% %unknown%"), "100% %unknown%");
    }

    #[test]
    fn test_values_are_not_expanded_again() {
        let site = SiteConfig {
            name: "Site %lang% %site_url%".into(),
            ..site()
        };
        let vars = SysVars::new(&site).with_lang("fr_FR");
        assert_eq!(vars.expand("[%site_name%] %lang%"), "[Site %lang% %site_url%] fr_FR");
    }

    #[test]
    fn test_adjacent_and_stray_percent() {
        let vars = SysVars::new(&site());
        assert_eq!(vars.expand("50%%lang%%"), "50%en_US%");
    }

    #[test]
    fn test_with_lang() {
        let vars = SysVars::new(&site());
        assert_eq!(vars.expand("/%lang%/"), "/en_US/");
        assert_eq!(vars.with_lang("fr_FR").expand("/%lang%/"), "/fr_FR/");
    }
}
