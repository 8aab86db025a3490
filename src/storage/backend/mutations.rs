//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, ExprTrait, QueryFilter, sea_query::Expr};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{click_event_to_active_model, new_shortlink_active_model};
use crate::errors::{LinkpingError, Result};
use crate::storage::{ClickEvent, ShortLink};

use migration::entities::{click_log, short_link};

impl SeaOrmStorage {
    /// Plain INSERT. A duplicate code violates the primary key and surfaces
    /// as a database error; there is no existence check beforehand.
    pub async fn insert_link(&self, code: &str, original_url: &str) -> Result<ShortLink> {
        let created_at = Utc::now();
        let model = new_shortlink_active_model(code, original_url, created_at);

        short_link::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                LinkpingError::database_operation(format!(
                    "Failed to insert short link '{}': {}",
                    code, e
                ))
            })?;

        info!("Short link created: {}", code);
        Ok(ShortLink {
            code: code.to_string(),
            original_url: original_url.to_string(),
            clicks: 0,
            created_at,
        })
    }

    /// 单条 UPDATE clicks = clicks + 1，依赖数据库的原子性
    ///
    /// Returns `false` when no row matched.
    pub async fn increment_clicks(&self, code: &str) -> Result<bool> {
        let result = short_link::Entity::update_many()
            .col_expr(
                short_link::Column::Clicks,
                Expr::col(short_link::Column::Clicks).add(1),
            )
            .filter(short_link::Column::ShortCode.eq(code))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkpingError::database_operation(format!(
                    "Failed to increment clicks for '{}': {}",
                    code, e
                ))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn insert_click(&self, event: &ClickEvent) -> Result<()> {
        click_log::Entity::insert(click_event_to_active_model(event))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                LinkpingError::database_operation(format!(
                    "Failed to insert click log for '{}': {}",
                    event.short_code, e
                ))
            })?;

        debug!("Click log recorded for {}", event.short_code);
        Ok(())
    }
}
