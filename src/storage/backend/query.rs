//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::{model_to_click_event, model_to_shortlink};
use crate::errors::{LinkpingError, Result};
use crate::storage::{ClickEvent, ShortLink};

use migration::entities::{click_log, short_link};

impl SeaOrmStorage {
    pub async fn get(&self, code: &str) -> Result<Option<ShortLink>> {
        let model = short_link::Entity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| {
                LinkpingError::database_operation(format!(
                    "Failed to query short link '{}': {}",
                    code, e
                ))
            })?;

        Ok(model.map(model_to_shortlink))
    }

    /// 全部短链接，按创建时间倒序
    pub async fn load_all_newest_first(&self) -> Result<Vec<ShortLink>> {
        let models = short_link::Entity::find()
            .order_by_desc(short_link::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                LinkpingError::database_operation(format!("Failed to load short links: {}", e))
            })?;

        debug!("Loaded {} short links", models.len());
        Ok(models.into_iter().map(model_to_shortlink).collect())
    }

    /// Click history for one code, newest first. Rows sharing a timestamp
    /// fall back to insertion order via the autoincrement id.
    pub async fn clicks_for(&self, code: &str) -> Result<Vec<ClickEvent>> {
        let models = click_log::Entity::find()
            .filter(click_log::Column::ShortCode.eq(code))
            .order_by_desc(click_log::Column::ClickedAt)
            .order_by_desc(click_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                LinkpingError::database_operation(format!(
                    "Failed to load click logs for '{}': {}",
                    code, e
                ))
            })?;

        Ok(models.into_iter().map(model_to_click_event).collect())
    }
}
