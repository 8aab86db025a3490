use chrono::{DateTime, Utc};

use crate::storage::{ClickEvent, GeoLocation, ShortLink};
use migration::entities::{click_log, short_link};

/// 将 Sea-ORM Model 转换为 ShortLink
pub fn model_to_shortlink(model: short_link::Model) -> ShortLink {
    ShortLink {
        code: model.short_code,
        original_url: model.original_url,
        clicks: model.clicks.max(0) as u64,
        created_at: model.created_at,
    }
}

/// New rows always start with zero clicks.
pub fn new_shortlink_active_model(
    code: &str,
    original_url: &str,
    created_at: DateTime<Utc>,
) -> short_link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_link::ActiveModel {
        short_code: Set(code.to_string()),
        original_url: Set(original_url.to_string()),
        clicks: Set(0),
        created_at: Set(created_at),
    }
}

/// 将 click_logs 行转换为 ClickEvent；三个地理字段全空时 location 为 None
pub fn model_to_click_event(model: click_log::Model) -> ClickEvent {
    let location = GeoLocation {
        city: model.city,
        region: model.region,
        country: model.country,
    };

    ClickEvent {
        short_code: model.short_code,
        ip: model.ip,
        location: (!location.is_empty()).then_some(location),
        clicked_at: model.clicked_at,
    }
}

pub fn click_event_to_active_model(event: &ClickEvent) -> click_log::ActiveModel {
    use sea_orm::ActiveValue::{NotSet, Set};

    let location = event.location.clone().unwrap_or_default();

    click_log::ActiveModel {
        id: NotSet,
        short_code: Set(event.short_code.clone()),
        ip: Set(event.ip.clone()),
        city: Set(location.city),
        region: Set(location.region),
        country: Set(location.country),
        clicked_at: Set(event.clicked_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn test_model_to_shortlink() {
        let now = Utc::now();
        let link = model_to_shortlink(short_link::Model {
            short_code: "abc123".to_string(),
            original_url: "https://example.com/a/b".to_string(),
            clicks: 42,
            created_at: now,
        });

        assert_eq!(link.code, "abc123");
        assert_eq!(link.original_url, "https://example.com/a/b");
        assert_eq!(link.clicks, 42);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_model_to_shortlink_clamps_negative_clicks() {
        let link = model_to_shortlink(short_link::Model {
            short_code: "neg".to_string(),
            original_url: "https://example.com".to_string(),
            clicks: -3,
            created_at: Utc::now(),
        });
        assert_eq!(link.clicks, 0);
    }

    #[test]
    fn test_new_shortlink_active_model_starts_at_zero() {
        let model = new_shortlink_active_model("xyz789", "https://target.com", Utc::now());
        assert_eq!(model.short_code, ActiveValue::Set("xyz789".to_string()));
        assert_eq!(model.clicks, ActiveValue::Set(0));
    }

    #[test]
    fn test_click_model_without_geo_has_no_location() {
        let event = model_to_click_event(click_log::Model {
            id: 1,
            short_code: "abc123".to_string(),
            ip: Some("10.0.0.1".to_string()),
            city: None,
            region: None,
            country: None,
            clicked_at: Utc::now(),
        });
        assert!(event.location.is_none());
        assert_eq!(event.ip.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_click_model_with_partial_geo() {
        let event = model_to_click_event(click_log::Model {
            id: 2,
            short_code: "abc123".to_string(),
            ip: Some("8.8.8.8".to_string()),
            city: None,
            region: None,
            country: Some("US".to_string()),
            clicked_at: Utc::now(),
        });
        let location = event.location.unwrap();
        assert_eq!(location.country.as_deref(), Some("US"));
        assert!(location.city.is_none());
    }

    #[test]
    fn test_click_event_to_active_model_flattens_location() {
        let event = ClickEvent {
            short_code: "abc123".to_string(),
            ip: None,
            location: Some(GeoLocation {
                city: Some("Berlin".to_string()),
                region: Some("Land Berlin".to_string()),
                country: Some("DE".to_string()),
            }),
            clicked_at: Utc::now(),
        };
        let model = click_event_to_active_model(&event);
        assert!(matches!(model.id, ActiveValue::NotSet));
        assert_eq!(model.city, ActiveValue::Set(Some("Berlin".to_string())));
        assert_eq!(model.country, ActiveValue::Set(Some("DE".to_string())));
        assert_eq!(model.ip, ActiveValue::Set(None));
    }
}
