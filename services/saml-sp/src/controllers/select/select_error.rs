use crate::{repositories::tenant::TenantError, services::RenderError};
use shine_infra::web::Problem;
use thiserror::Error as ThisError;

const TENANT_NOT_FOUND: &str = "tenant-not-found";
const RENDER_FAILED: &str = "select-page-render-failed";

#[derive(Debug, ThisError)]
pub enum SelectError {
    #[error("Unresolved tenant")]
    UnresolvedTenant(#[from] TenantError),
    #[error("Failed to render the provider selection page")]
    Render(#[from] RenderError),
}

impl From<SelectError> for Problem {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::UnresolvedTenant(err) => Problem::not_found_ty(TENANT_NOT_FOUND)
                .with_detail(&err)
                .with_sensitive_dbg(err),
            err @ SelectError::Render(_) => Problem::internal_error_ty(RENDER_FAILED)
                .with_detail(&err)
                .with_sensitive_dbg(err),
        }
    }
}
