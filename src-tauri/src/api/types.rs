use serde::{Deserialize, Serialize};

/// One row of the hosted `jobs` table. Everything except `id` is nullable;
/// the frontend substitutes "Unknown ..." labels during aggregation rather
/// than dropping sparse rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: i64,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
}

/// Insert payload for a new listing. The backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub job_title: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
}

/// Full job list handed to the frontend. `stale` marks a snapshot served
/// from the local cache after a failed fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsResponse {
    pub records: Vec<JobRecord>,
    pub stale: bool,
    pub fetched_at: String,
}

/// An authenticated session with the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub email: String,
}

/// Shape of the hosted auth endpoint's token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: TokenUser,
}

#[derive(Debug, Deserialize)]
pub struct TokenUser {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_row_deserializes_with_defaults() {
        let row: JobRecord = serde_json::from_str(r#"{"id": 7}"#).expect("Failed to parse row");
        assert_eq!(row.id, 7);
        assert!(row.job_title.is_none());
        assert!(row.salary.is_none());
        assert!(row.required_skills.is_none());
    }

    #[test]
    fn test_new_job_omits_absent_fields() {
        let job = NewJob {
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            location: None,
            job_type: Some("Remote".to_string()),
            experience: None,
            role: None,
            salary: None,
            required_skills: None,
        };
        let json = serde_json::to_value(&job).expect("Failed to serialize");
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("job_type"));
        assert!(!obj.contains_key("location"));
        assert!(!obj.contains_key("salary"));
    }

    #[test]
    fn test_token_response_parses() {
        let body = r#"{"access_token": "abc", "token_type": "bearer", "user": {"email": "a@b.co"}}"#;
        let token: TokenResponse = serde_json::from_str(body).expect("Failed to parse token");
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.user.email, "a@b.co");
    }
}
