use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum TenantError {
    #[error("No tenant is configured for host {host:?}")]
    NotFound { host: Option<String> },
    #[error("Default tenant {alias} is not configured")]
    UnknownDefault { alias: String },
}

#[derive(Debug, ThisError)]
pub enum MetadataError {
    #[error("No metadata is registered for {key}")]
    NotRegistered { key: String },
}
