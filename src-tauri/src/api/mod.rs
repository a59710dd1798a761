pub mod client;
pub mod types;

pub use client::PortalClient;
pub use types::{JobRecord, JobsResponse, NewJob, Session};
