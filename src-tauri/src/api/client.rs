use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use tracing::{info, warn};
use url::Url;

use crate::error::JobScopeError;

use super::types::{JobRecord, NewJob, Session, TokenResponse};

/// Client for the hosted job-portal backend (a PostgREST-style REST API
/// with a token auth endpoint).
///
/// Built explicitly from the connection settings once and held in managed
/// state; it is only reconstructed when those settings change. All reads of
/// the `jobs` table go through here.
pub struct PortalClient {
    client: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

impl PortalClient {
    /// Build a client for the given backend URL and anon key.
    /// - 30 second request timeout
    /// - User-Agent: JobScope/1.0
    pub fn new(base_url: &str, anon_key: String) -> Result<Self, JobScopeError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| JobScopeError::Config(format!("Invalid backend URL '{}': {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .user_agent("JobScope/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| JobScopeError::Api(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            anon_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, JobScopeError> {
        self.base_url
            .join(path)
            .map_err(|e| JobScopeError::Api(format!("Invalid endpoint path '{}': {}", path, e)))
    }

    fn auth_headers(&self, token: Option<&str>) -> Result<HeaderMap, JobScopeError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", token.unwrap_or(&self.anon_key));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key)
                .map_err(|e| JobScopeError::Config(format!("Invalid anon key: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|e| JobScopeError::Config(format!("Invalid access token: {}", e)))?,
        );
        Ok(headers)
    }

    /// Fetch the full job list in one response, ordered by `id` descending.
    /// No pagination: the dashboard works over the complete set in memory.
    pub async fn fetch_jobs(&self, token: Option<&str>) -> Result<Vec<JobRecord>, JobScopeError> {
        let mut url = self.endpoint("rest/v1/jobs")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "id.desc");

        let response = self
            .client
            .get(url)
            .headers(self.auth_headers(token)?)
            .send()
            .await
            .map_err(|e| JobScopeError::Api(format!("Failed to fetch jobs: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Jobs fetch returned {}: {}", status, body);
            return Err(JobScopeError::Api(format!("Jobs fetch returned {}", status)));
        }

        let records: Vec<JobRecord> = response
            .json()
            .await
            .map_err(|e| JobScopeError::Api(format!("Failed to parse jobs response: {}", e)))?;
        info!("Fetched {} job records", records.len());
        Ok(records)
    }

    /// Exact row count of the jobs table, used only by the dashboard's
    /// total-jobs tile. The count comes back in the Content-Range header.
    pub async fn fetch_job_count(&self, token: Option<&str>) -> Result<u64, JobScopeError> {
        let mut url = self.endpoint("rest/v1/jobs")?;
        url.query_pairs_mut().append_pair("select", "id");

        let mut headers = self.auth_headers(token)?;
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));
        headers.insert("Range", HeaderValue::from_static("0-0"));

        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| JobScopeError::Api(format!("Failed to fetch job count: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobScopeError::Api(format!("Count query returned {}", status)));
        }

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| JobScopeError::Api("Count response missing Content-Range".to_string()))?;
        parse_total_count(range)
    }

    /// Insert a new listing. Requires an authenticated session token.
    pub async fn create_job(&self, token: &str, job: &NewJob) -> Result<JobRecord, JobScopeError> {
        let url = self.endpoint("rest/v1/jobs")?;

        let mut headers = self.auth_headers(Some(token))?;
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(job)
            .send()
            .await
            .map_err(|e| JobScopeError::Api(format!("Failed to create job: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Job insert returned {}: {}", status, body);
            return Err(JobScopeError::Api(format!("Job insert returned {}", status)));
        }

        let mut created: Vec<JobRecord> = response
            .json()
            .await
            .map_err(|e| JobScopeError::Api(format!("Failed to parse insert response: {}", e)))?;
        created
            .pop()
            .ok_or_else(|| JobScopeError::Api("Insert returned no rows".to_string()))
    }

    /// Exchange email/password for an access token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, JobScopeError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .post(url)
            .headers(self.auth_headers(None)?)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| JobScopeError::Auth(format!("Sign-in request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Sign-in for {} returned {}", email, status);
            return Err(JobScopeError::Auth(
                "Invalid email or password, or the backend rejected the request".to_string(),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| JobScopeError::Auth(format!("Failed to parse token response: {}", e)))?;
        info!("Signed in as {}", token.user.email);
        Ok(Session {
            access_token: token.access_token,
            email: token.user.email,
        })
    }
}

/// Parse the total from a `Content-Range` value such as `0-0/57` or `*/57`.
fn parse_total_count(range: &str) -> Result<u64, JobScopeError> {
    range
        .rsplit('/')
        .next()
        .and_then(|total| total.parse::<u64>().ok())
        .ok_or_else(|| JobScopeError::Api(format!("Unparseable Content-Range '{}'", range)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_total_count() {
        assert_eq!(parse_total_count("0-0/57").unwrap(), 57);
        assert_eq!(parse_total_count("*/0").unwrap(), 0);
        assert!(parse_total_count("garbage").is_err());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(PortalClient::new("not a url", "key".to_string()).is_err());
    }

    #[test]
    fn test_endpoint_joins_against_base() {
        let client = PortalClient::new("https://example.supabase.co/", "key".to_string()).unwrap();
        let url = client.endpoint("rest/v1/jobs").unwrap();
        assert_eq!(url.as_str(), "https://example.supabase.co/rest/v1/jobs");
    }
}
