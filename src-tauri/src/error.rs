use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobScopeError {
    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl From<JobScopeError> for String {
    fn from(err: JobScopeError) -> Self {
        err.to_string()
    }
}
