use std::path::PathBuf;

use chrono::Utc;
use tauri::{AppHandle, Manager};
use tracing::{info, warn};

use crate::api::{JobRecord, JobsResponse, NewJob};
use crate::jobs::SnapshotStore;

use super::ApiState;

fn snapshot_path(app: &AppHandle) -> Result<PathBuf, String> {
    let data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| format!("Failed to resolve app data directory: {}", e))?;
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| format!("Failed to create app data directory: {}", e))?;
    Ok(data_dir.join("jobs_snapshot.db"))
}

/// Fetch the full job list, ordered by id descending. On success the list
/// is snapshotted locally; on failure the last snapshot (if any) is served
/// with `stale: true` so the dashboard can aggregate offline.
#[tauri::command]
pub async fn fetch_jobs(
    app: AppHandle,
    state: tauri::State<'_, ApiState>,
) -> Result<JobsResponse, String> {
    info!("fetch_jobs called");
    let client = state.client(&app)?;
    let token = state.session().map(|s| s.access_token);

    match client.fetch_jobs(token.as_deref()).await {
        Ok(records) => {
            let path = snapshot_path(&app)?;
            let to_save = records.clone();
            let saved = tokio::task::spawn_blocking(move || {
                SnapshotStore::new(&path)?.save(&to_save)
            })
            .await
            .map_err(|e| e.to_string());
            match saved {
                Ok(Ok(())) => {}
                Ok(Err(e)) | Err(e) => warn!("Failed to snapshot jobs: {}", e),
            }

            Ok(JobsResponse {
                records,
                stale: false,
                fetched_at: Utc::now().to_rfc3339(),
            })
        }
        Err(fetch_err) => {
            warn!("Jobs fetch failed, trying snapshot: {}", fetch_err);
            let path = snapshot_path(&app)?;
            let loaded = tokio::task::spawn_blocking(move || SnapshotStore::new(&path)?.load())
                .await
                .map_err(|e| e.to_string())??;

            match loaded {
                Some((records, fetched_at)) => {
                    info!("Serving stale snapshot from {}", fetched_at);
                    Ok(JobsResponse {
                        records,
                        stale: true,
                        fetched_at: fetched_at.to_rfc3339(),
                    })
                }
                None => Err(fetch_err.into()),
            }
        }
    }
}

/// Exact total row count, for the dashboard's total-jobs tile only.
#[tauri::command]
pub async fn fetch_job_count(
    app: AppHandle,
    state: tauri::State<'_, ApiState>,
) -> Result<u64, String> {
    let client = state.client(&app)?;
    let token = state.session().map(|s| s.access_token);
    Ok(client.fetch_job_count(token.as_deref()).await?)
}

/// Create a listing. Requires a signed-in session.
#[tauri::command]
pub async fn create_job(
    app: AppHandle,
    state: tauri::State<'_, ApiState>,
    job: NewJob,
) -> Result<JobRecord, String> {
    info!("create_job called for '{}'", job.job_title);
    let session = state
        .session()
        .ok_or_else(|| "You must be signed in to post a job".to_string())?;
    let client = state.client(&app)?;
    Ok(client.create_job(&session.access_token, &job).await?)
}
