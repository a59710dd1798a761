pub mod api;
mod commands;
mod error;
pub mod jobs;

pub use api::{JobRecord, JobsResponse, NewJob, Session};
pub use error::JobScopeError;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(commands::ApiState::new())
        .invoke_handler(tauri::generate_handler![
            commands::jobs::fetch_jobs,
            commands::jobs::fetch_job_count,
            commands::jobs::create_job,
            commands::auth::sign_in,
            commands::auth::current_session,
            commands::auth::sign_out,
            commands::config::get_preference,
            commands::config::set_preference,
            commands::config::get_connection,
            commands::config::set_connection,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
