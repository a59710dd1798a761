pub mod auth;
pub mod config;
pub mod jobs;

use std::sync::{Arc, Mutex};

use tauri_plugin_store::StoreExt;
use tracing::info;

use crate::api::{PortalClient, Session};

/// Managed state for the hosted-backend connection.
///
/// The client is built from the stored connection settings on first use and
/// kept for the life of the process; changing the settings invalidates it so
/// the next command rebuilds against the new backend. The session mirrors
/// what the keychain holds so commands don't hit the keychain on every call.
pub struct ApiState {
    client: Mutex<Option<Arc<PortalClient>>>,
    session: Mutex<Option<Session>>,
}

impl ApiState {
    pub fn new() -> Self {
        Self {
            client: Mutex::new(None),
            session: Mutex::new(None),
        }
    }

    /// The portal client, constructing it from preferences if needed.
    pub fn client(&self, app: &tauri::AppHandle) -> Result<Arc<PortalClient>, String> {
        let mut guard = self.client.lock().unwrap();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        let (backend_url, anon_key) = config::connection_settings(app)?;
        info!("Building portal client for {}", backend_url);
        let client = Arc::new(PortalClient::new(&backend_url, anon_key)?);
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Drop the cached client; called when connection settings change.
    pub fn invalidate_client(&self) {
        *self.client.lock().unwrap() = None;
    }

    pub fn session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().unwrap() = session;
    }
}

impl Default for ApiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a string preference from the store, None when unset or empty.
pub(crate) fn read_preference(app: &tauri::AppHandle, key: &str) -> Result<Option<String>, String> {
    let store = app.store("preferences.json").map_err(|e| e.to_string())?;
    Ok(store
        .get(key)
        .and_then(|v| v.as_str().map(|s| s.to_string()))
        .filter(|s| !s.is_empty()))
}
