use serde::{Deserialize, Serialize};
use shine_infra::web::FeatureConfig;
use std::collections::HashMap;

pub const SERVICE_NAME: &str = "saml-sp";

pub const DEFAULT_REQUEST_MATCHER: &str = "/saml/sp/select/**";
pub const DEFAULT_SELECT_TEMPLATE: &str = "select-provider.html";

/// Configuration of the identity provider selection page.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectConfig {
    /// Ant style path pattern of the requests handled by the selection page.
    #[serde(default = "SelectConfig::default_request_matcher")]
    pub request_matcher: String,
    /// Name of the tera template rendering the selection page.
    #[serde(default = "SelectConfig::default_select_template")]
    pub select_template: String,
    /// Skip the selection page and redirect to the discovery if there is only a single usable provider.
    #[serde(default = "SelectConfig::default_redirect_on_single_provider")]
    pub redirect_on_single_provider: bool,
}

impl SelectConfig {
    fn default_request_matcher() -> String {
        DEFAULT_REQUEST_MATCHER.to_owned()
    }

    fn default_select_template() -> String {
        DEFAULT_SELECT_TEMPLATE.to_owned()
    }

    fn default_redirect_on_single_provider() -> bool {
        true
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            request_matcher: Self::default_request_matcher(),
            select_template: Self::default_select_template(),
            redirect_on_single_provider: Self::default_redirect_on_single_provider(),
        }
    }
}

/// Resolved metadata of a remote identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderMetadata {
    pub entity_id: String,
}

/// Where the metadata of an external provider comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "type")]
pub enum MetadataSource {
    /// Entry of the deployment wide remote provider registry.
    #[serde(rename_all = "camelCase")]
    Registry { key: String },

    #[serde(rename_all = "camelCase")]
    Inline { entity_id: String },
}

/// An identity provider trusted by a hosted service provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProviderConfig {
    pub alias: String,
    pub link_text: String,
    pub metadata: MetadataSource,
}

/// A tenant, a service provider hosted by this deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedServiceProviderConfig {
    pub alias: String,
    /// The host (with optional port) the tenant is served on. If not given, the host of the `base_path` is used.
    pub host: Option<String>,
    /// The absolute URL prefix of the tenant's SAML endpoints.
    pub base_path: String,
    /// The trusted identity providers in the order of presentation.
    #[serde(default)]
    pub providers: Vec<ExternalProviderConfig>,
}

/// The application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub select: SelectConfig,
    /// Alias of the tenant serving the requests not matching the host of any tenant.
    pub default_tenant: Option<String>,
    #[serde(default)]
    pub tenants: Vec<HostedServiceProviderConfig>,
    #[serde(default)]
    pub remote_providers: HashMap<String, IdentityProviderMetadata>,
}

impl FeatureConfig for AppConfig {
    const NAME: &'static str = "saml";
}
