//! Weekly calendar settings endpoints

use std::collections::BTreeMap;

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::settings::WeeklySettings,
    services::settings::SettingsSaved,
};

/// Get weekly settings
#[utoipa::path(
    get,
    path = "/calendar/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Default day type per weekday", body = WeeklySettings)
    )
)]
pub async fn get_settings(State(state): State<crate::AppState>) -> AppResult<Json<WeeklySettings>> {
    let settings = state.services.settings.get_settings().await?;
    Ok(Json(settings))
}

/// Replace weekly settings and regenerate the current and next year
#[utoipa::path(
    put,
    path = "/calendar/settings",
    tag = "settings",
    request_body(
        content = BTreeMap<String, String>,
        description = "Weekday name (sunday..saturday) to day type; omitted days take defaults"
    ),
    responses(
        (status = 200, description = "Settings saved", body = SettingsSaved),
        (status = 400, description = "Invalid weekday or day type", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<crate::AppState>,
    Json(update): Json<BTreeMap<String, String>>,
) -> AppResult<Json<SettingsSaved>> {
    let saved = state
        .services
        .settings
        .set_settings(&update, state.today())
        .await?;
    Ok(Json(saved))
}
