use crate::{
    app_config::ExternalProviderConfig,
    repositories::tenant::{HostedServiceProvider, MetadataError},
    services::{build_discovery_redirect, DiscoveryRedirectError},
};
use serde::Serialize;
use thiserror::Error as ThisError;

pub const SELECT_PAGE_TITLE: &str = "Select an Identity Provider";

#[derive(Debug, ThisError)]
pub enum ProviderBuildError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    DiscoveryRedirect(#[from] DiscoveryRedirectError),
}

/// An entry of the selection page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectableProvider {
    pub link_text: String,
    pub redirect: String,
}

/// A provider that could not be presented on the selection page.
#[derive(Debug)]
pub struct ProviderFailure {
    pub alias: String,
    pub error: ProviderBuildError,
}

/// The outcome of building the entries of the selection page for a tenant.
#[derive(Debug, Default)]
pub struct ProviderSelection {
    /// The successfully built entries in the configuration order.
    pub providers: Vec<SelectableProvider>,
    pub failures: Vec<ProviderFailure>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectPageModel {
    pub title: &'static str,
    pub providers: Vec<SelectableProvider>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SelectDecision {
    /// Skip the selection, continue with the discovery of the given url.
    Redirect(String),
    Render(SelectPageModel),
}

pub struct ProviderSelectionService {
    redirect_on_single_provider: bool,
}

impl ProviderSelectionService {
    pub fn new(redirect_on_single_provider: bool) -> Self {
        Self {
            redirect_on_single_provider,
        }
    }

    pub fn build_provider(
        &self,
        tenant: &HostedServiceProvider,
        provider: &ExternalProviderConfig,
    ) -> Result<SelectableProvider, ProviderBuildError> {
        let metadata = tenant.lookup_metadata(provider)?;
        let redirect = build_discovery_redirect(tenant.base_path(), &metadata.entity_id)?;
        Ok(SelectableProvider {
            link_text: provider.link_text.clone(),
            redirect: redirect.into(),
        })
    }

    /// Build the entries for all the providers of the tenant. A failing provider is not presented, but
    /// it does not prevent the others.
    pub fn collect_providers(&self, tenant: &HostedServiceProvider) -> ProviderSelection {
        let mut selection = ProviderSelection::default();
        for provider in tenant.providers() {
            match self.build_provider(tenant, provider) {
                Ok(entry) => selection.providers.push(entry),
                Err(error) => selection.failures.push(ProviderFailure {
                    alias: provider.alias.clone(),
                    error,
                }),
            }
        }
        selection
    }

    pub fn decide(&self, mut providers: Vec<SelectableProvider>) -> SelectDecision {
        if self.redirect_on_single_provider && providers.len() == 1 {
            if let Some(provider) = providers.pop() {
                return SelectDecision::Redirect(provider.redirect);
            }
        }

        SelectDecision::Render(SelectPageModel {
            title: SELECT_PAGE_TITLE,
            providers,
        })
    }
}

#[cfg(test)]
#[path = "./provider_selection_service_test.rs"]
mod provider_selection_service_test;
