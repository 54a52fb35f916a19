use super::{HostedServiceProvider, TenantError, TenantResolver};
use crate::app_config::{AppConfig, HostedServiceProviderConfig};
use axum::http::{header, request::Parts, uri::Authority};
use futures::future;
use std::{future::Future, sync::Arc};
use url::Url;

/// A lowercase host with an optional port. The trailing dot of a fully qualified name is dropped.
#[derive(Debug, PartialEq, Eq)]
struct HostPort {
    host: String,
    port: Option<u16>,
}

impl HostPort {
    fn parse(value: &str) -> Option<Self> {
        let authority = value.parse::<Authority>().ok()?;
        Some(Self::new(authority.host(), authority.port_u16()))
    }

    fn new(host: &str, port: Option<u16>) -> Self {
        Self {
            host: host.trim_end_matches('.').to_lowercase(),
            port,
        }
    }
}

/// The host a tenant is served on. A missing port stands for the default port of the tenant's scheme.
#[derive(Debug)]
struct TenantHost {
    host: HostPort,
    default_port: Option<u16>,
}

impl TenantHost {
    fn matches(&self, request: &HostPort) -> bool {
        self.host.host == request.host
            && self.host.port.or(self.default_port) == request.port.or(self.default_port)
    }
}

/// Resolve tenants from the static configuration using the host of the request.
pub struct StaticTenantResolver {
    tenants: Vec<(Option<TenantHost>, HostedServiceProvider)>,
    default_tenant: Option<HostedServiceProvider>,
}

impl StaticTenantResolver {
    pub fn new(config: &AppConfig) -> Result<Self, TenantError> {
        let remote_providers = Arc::new(config.remote_providers.clone());

        let tenants: Vec<_> = config
            .tenants
            .iter()
            .map(|tenant| {
                let host = tenant_host(tenant);
                if host.is_none() {
                    log::warn!("Tenant {} has no host, it can be used only as the default", tenant.alias);
                }
                let provider = HostedServiceProvider::new(Arc::new(tenant.clone()), remote_providers.clone());
                (host, provider)
            })
            .collect();

        let default_tenant = match &config.default_tenant {
            Some(alias) => {
                let (_, tenant) = tenants
                    .iter()
                    .find(|(_, tenant)| tenant.alias() == alias.as_str())
                    .ok_or_else(|| TenantError::UnknownDefault { alias: alias.clone() })?;
                Some(tenant.clone())
            }
            None => None,
        };

        Ok(Self { tenants, default_tenant })
    }

    pub fn find(&self, host: Option<&str>) -> Result<HostedServiceProvider, TenantError> {
        let by_host = host.and_then(HostPort::parse).and_then(|request| {
            self.tenants
                .iter()
                .find(|(tenant_host, _)| tenant_host.as_ref().is_some_and(|t| t.matches(&request)))
                .map(|(_, tenant)| tenant)
        });

        by_host
            .or(self.default_tenant.as_ref())
            .cloned()
            .ok_or_else(|| TenantError::NotFound {
                host: host.map(|host| host.to_lowercase()),
            })
    }
}

impl TenantResolver for StaticTenantResolver {
    fn resolve(&self, request: &Parts) -> impl Future<Output = Result<HostedServiceProvider, TenantError>> + Send {
        future::ready(self.find(request_host(request)))
    }
}

fn scheme_default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

/// The explicit `host` of a tenant, or the host of its base path.
fn tenant_host(tenant: &HostedServiceProviderConfig) -> Option<TenantHost> {
    let base_url = match Url::parse(&tenant.base_path) {
        Ok(url) => Some(url),
        Err(err) => {
            log::warn!("Tenant {} has an invalid base path: {err}", tenant.alias);
            None
        }
    };
    let default_port = base_url.as_ref().and_then(|url| scheme_default_port(url.scheme()));

    let host = match (&tenant.host, &base_url) {
        (Some(host), _) => match HostPort::parse(host) {
            Some(host) => host,
            None => {
                log::warn!("Tenant {} has an invalid host: {host}", tenant.alias);
                return None;
            }
        },
        (None, Some(url)) => HostPort::new(url.host_str()?, url.port()),
        (None, None) => return None,
    };

    Some(TenantHost { host, default_port })
}

fn request_host(request: &Parts) -> Option<&str> {
    request
        .headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .or_else(|| request.uri.authority().map(|authority| authority.as_str()))
}
