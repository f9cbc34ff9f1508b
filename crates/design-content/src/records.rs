//! Records read from storage and cached as payloads.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// An ad banner row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ad {
    /// Primary key.
    #[serde(rename = "adsId")]
    pub ads_id: i64,
    /// Admin-facing label.
    #[serde(default)]
    pub name: Option<String>,
    /// Banner markup, may contain system variables.
    pub code: String,
    /// Slot width in pixels.
    pub width: u32,
    /// Slot height in pixels.
    pub height: u32,
}

/// A value that can be cached by the fetcher.
///
/// `is_empty_payload` identifies the "storage had nothing" sentinel, which is
/// only cached when the configuration allows it.
pub trait Payload: Serialize + DeserializeOwned {
    /// Check if this payload records an empty storage result.
    fn is_empty_payload(&self) -> bool;
}

impl<T: Serialize + DeserializeOwned> Payload for Option<T> {
    fn is_empty_payload(&self) -> bool {
        self.is_none()
    }
}

impl<T: Serialize + DeserializeOwned> Payload for Vec<T> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_db::{QueryResult, Value};

    #[test]
    fn test_ad_from_row() {
        let result = QueryResult::from_values(
            &["adsId", "name", "code", "width", "height", "active"],
            vec![vec![
                Value::Integer(4),
                Value::Null,
                Value::from("<a href=\"%site_url%\">x</a>"),
                Value::Integer(160),
                Value::Integer(600),
                Value::from("1"),
            ]],
        );

        let ad: Ad = result.first().unwrap().deserialize().unwrap();
        assert_eq!(ad.ads_id, 4);
        assert_eq!(ad.name, None);
        assert_eq!((ad.width, ad.height), (160, 600));
    }

    #[test]
    fn test_empty_payloads() {
        assert!(None::<Ad>.is_empty_payload());
        assert!(Vec::<String>::new().is_empty_payload());
        assert!(!Some("x".to_string()).is_empty_payload());
        assert!(!vec!["a.css".to_string()].is_empty_payload());
    }
}
