use keyring::Entry;
use tauri::AppHandle;
use tracing::{info, warn};

use crate::api::Session;

use super::{config, read_preference, ApiState};

const KEYRING_SERVICE: &str = "jobscope-session";
const KEYRING_USER: &str = "jobscope";

fn session_entry() -> Result<Entry, String> {
    Entry::new(KEYRING_SERVICE, KEYRING_USER).map_err(|e| {
        warn!("Failed to create keyring entry: {}", e);
        e.to_string()
    })
}

/// Sign in against the hosted backend. The access token goes into the OS
/// keychain, the email into preferences, so the session survives restarts.
#[tauri::command]
pub async fn sign_in(
    app: AppHandle,
    state: tauri::State<'_, ApiState>,
    email: String,
    password: String,
) -> Result<Session, String> {
    info!("Sign-in requested for {}", email);
    let client = state.client(&app)?;
    let session = client.sign_in(&email, &password).await?;

    session_entry()?.set_password(&session.access_token).map_err(|e| {
        warn!("Failed to store session token: {}", e);
        e.to_string()
    })?;
    config::set_preference(app, "session_email", &session.email)?;

    state.set_session(Some(session.clone()));
    Ok(session)
}

/// The current session, restored from the keychain on first call after
/// startup. None when signed out.
#[tauri::command]
pub fn current_session(
    app: AppHandle,
    state: tauri::State<'_, ApiState>,
) -> Result<Option<Session>, String> {
    if let Some(session) = state.session() {
        return Ok(Some(session));
    }

    let token = match session_entry()?.get_password() {
        Ok(token) => token,
        Err(keyring::Error::NoEntry) => return Ok(None),
        Err(e) => {
            warn!("Failed to read session token: {}", e);
            return Err(e.to_string());
        }
    };
    let Some(email) = read_preference(&app, "session_email")? else {
        return Ok(None);
    };

    let session = Session {
        access_token: token,
        email,
    };
    state.set_session(Some(session.clone()));
    info!("Restored session for {}", session.email);
    Ok(Some(session))
}

#[tauri::command]
pub fn sign_out(app: AppHandle, state: tauri::State<'_, ApiState>) -> Result<(), String> {
    info!("Signing out");
    match session_entry()?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => {}
        Err(e) => {
            warn!("Failed to delete session token: {}", e);
            return Err(e.to_string());
        }
    }
    config::set_preference(app, "session_email", "")?;
    state.set_session(None);
    Ok(())
}
