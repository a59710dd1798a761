use serde::Serialize;
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;
use tracing::{info, warn};

use crate::api::PortalClient;

use super::{read_preference, ApiState};

#[tauri::command]
pub fn get_preference(app: AppHandle, key: &str) -> Result<Option<String>, String> {
    info!("Getting preference: {}", key);
    let store = app.store("preferences.json").map_err(|e| {
        warn!("Failed to open store: {}", e);
        e.to_string()
    })?;
    let value = store.get(key).and_then(|v| v.as_str().map(|s| s.to_string()));
    Ok(value)
}

#[tauri::command]
pub fn set_preference(app: AppHandle, key: &str, value: &str) -> Result<(), String> {
    info!("Setting preference: {}", key);
    let store = app.store("preferences.json").map_err(|e| {
        warn!("Failed to open store: {}", e);
        e.to_string()
    })?;
    store.set(key, serde_json::json!(value));
    store.save().map_err(|e| {
        warn!("Failed to save store: {}", e);
        e.to_string()
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSettings {
    pub backend_url: String,
    pub anon_key: String,
}

/// The stored connection settings, erroring when either is missing.
pub(crate) fn connection_settings(app: &AppHandle) -> Result<(String, String), String> {
    let backend_url = read_preference(app, "backend_url")?
        .ok_or_else(|| "Backend URL is not configured. Set it in Settings.".to_string())?;
    let anon_key = read_preference(app, "anon_key")?
        .ok_or_else(|| "Backend anon key is not configured. Set it in Settings.".to_string())?;
    Ok((backend_url, anon_key))
}

#[tauri::command]
pub fn get_connection(app: AppHandle) -> Result<Option<ConnectionSettings>, String> {
    let backend_url = read_preference(&app, "backend_url")?;
    let anon_key = read_preference(&app, "anon_key")?;
    Ok(match (backend_url, anon_key) {
        (Some(backend_url), Some(anon_key)) => Some(ConnectionSettings { backend_url, anon_key }),
        _ => None,
    })
}

/// Validate and persist new connection settings, dropping the cached client
/// so the next request is built against the new backend.
#[tauri::command]
pub fn set_connection(
    app: AppHandle,
    state: tauri::State<'_, ApiState>,
    backend_url: String,
    anon_key: String,
) -> Result<(), String> {
    info!("Updating connection settings for {}", backend_url);
    PortalClient::new(&backend_url, anon_key.clone())?;

    set_preference(app.clone(), "backend_url", &backend_url)?;
    set_preference(app, "anon_key", &anon_key)?;
    state.invalidate_client();
    Ok(())
}
