use super::MetadataError;
use crate::app_config::{ExternalProviderConfig, HostedServiceProviderConfig, IdentityProviderMetadata, MetadataSource};
use std::{collections::HashMap, sync::Arc};

pub type RemoteProviders = HashMap<String, IdentityProviderMetadata>;

/// A resolved tenant: its configuration and the metadata of the remote providers.
#[derive(Clone, Debug)]
pub struct HostedServiceProvider {
    config: Arc<HostedServiceProviderConfig>,
    remote_providers: Arc<RemoteProviders>,
}

impl HostedServiceProvider {
    pub fn new(config: Arc<HostedServiceProviderConfig>, remote_providers: Arc<RemoteProviders>) -> Self {
        Self {
            config,
            remote_providers,
        }
    }

    pub fn alias(&self) -> &str {
        &self.config.alias
    }

    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    pub fn providers(&self) -> &[ExternalProviderConfig] {
        &self.config.providers
    }

    pub fn lookup_metadata(&self, provider: &ExternalProviderConfig) -> Result<IdentityProviderMetadata, MetadataError> {
        match &provider.metadata {
            MetadataSource::Registry { key } => self
                .remote_providers
                .get(key)
                .cloned()
                .ok_or_else(|| MetadataError::NotRegistered { key: key.clone() }),
            MetadataSource::Inline { entity_id } => Ok(IdentityProviderMetadata {
                entity_id: entity_id.clone(),
            }),
        }
    }
}
