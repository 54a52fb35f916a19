mod tenant_error;
pub use self::tenant_error::*;
mod hosted_service_provider;
pub use self::hosted_service_provider::*;
mod tenant_resolver;
pub use self::tenant_resolver::*;
mod static_tenant_resolver;
pub use self::static_tenant_resolver::*;
