use super::{HostedServiceProvider, TenantError};
use axum::http::request::Parts;
use std::future::Future;

/// Find the hosted service provider serving a request.
pub trait TenantResolver: Send + Sync {
    fn resolve(&self, request: &Parts) -> impl Future<Output = Result<HostedServiceProvider, TenantError>> + Send;
}
