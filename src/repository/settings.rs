//! Settings repository (key/value JSON rows in app_settings)

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::types::Json;

use super::{PgStore, SettingsStore};
use crate::error::AppResult;

const WEEKLY_SETTINGS_KEY: &str = "attendance_calendar_settings";

#[async_trait]
impl SettingsStore for PgStore {
    async fn load_weekly_settings(&self) -> AppResult<BTreeMap<String, String>> {
        let stored: Option<Json<serde_json::Value>> =
            sqlx::query_scalar("SELECT value FROM app_settings WHERE key = $1")
                .bind(WEEKLY_SETTINGS_KEY)
                .fetch_optional(&self.pool)
                .await?;

        // Non-string values are dropped so the caller falls back to defaults
        let values = match stored {
            Some(Json(serde_json::Value::Object(map))) => map
                .into_iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                .collect(),
            Some(_) => {
                tracing::warn!("Stored weekly settings are not a JSON object, using defaults");
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        };
        Ok(values)
    }

    async fn save_weekly_settings(&self, values: &BTreeMap<String, String>) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO app_settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(WEEKLY_SETTINGS_KEY)
        .bind(Json(values))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
