use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 短链接记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    #[serde(rename = "shortCode")]
    pub code: String,
    pub original_url: String,
    #[serde(default)]
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

/// Location derived from the client address. Every field is optional because
/// lookups frequently resolve only a country.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeoLocation {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl GeoLocation {
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.region.is_none() && self.country.is_none()
    }
}

/// 单次跳转产生的点击记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub short_code: String,
    pub ip: Option<String>,
    pub location: Option<GeoLocation>,
    pub clicked_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_link_wire_names() {
        let link = ShortLink {
            code: "aB3_x-".to_string(),
            original_url: "https://example.com".to_string(),
            clicks: 2,
            created_at: "2025-06-01T12:00:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value["shortCode"], "aB3_x-");
        assert_eq!(value["originalUrl"], "https://example.com");
        assert_eq!(value["clicks"], 2);
        assert!(value["createdAt"].is_string());
        assert!(value.get("code").is_none());
    }

    #[test]
    fn test_click_event_without_location_serializes_null() {
        let event = ClickEvent {
            short_code: "abc123".to_string(),
            ip: None,
            location: None,
            clicked_at: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["shortCode"], "abc123");
        assert_eq!(value["ip"], serde_json::Value::Null);
        assert_eq!(value["location"], serde_json::Value::Null);
    }

    #[test]
    fn test_click_event_location_keeps_null_fields() {
        let event = ClickEvent {
            short_code: "abc123".to_string(),
            ip: Some("8.8.8.8".to_string()),
            location: Some(GeoLocation {
                city: None,
                region: None,
                country: Some("US".to_string()),
            }),
            clicked_at: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value["location"],
            json!({ "city": null, "region": null, "country": "US" })
        );
    }

    #[test]
    fn test_geo_location_is_empty() {
        assert!(GeoLocation::default().is_empty());
        assert!(
            !GeoLocation {
                country: Some("DE".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
