use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error as ThisError;
use url::Url;

/// Path of the discovery endpoint relative to the base path of the tenant.
pub const DISCOVERY_PATH: [&str; 3] = ["saml", "sp", "discovery"];
/// Query parameter carrying the entity id of the selected identity provider.
pub const IDP_QUERY_PARAM: &str = "idp";

/// Everything but the unreserved characters of RFC-3986 is encoded.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

#[derive(Debug, ThisError)]
pub enum DiscoveryRedirectError {
    #[error("Invalid base path {base_path:?}: {reason}")]
    MalformedBasePath { base_path: String, reason: String },
}

/// Build the url starting the SSO with a given identity provider:
/// `<base_path>/saml/sp/discovery?idp=<entity_id>`.
pub fn build_discovery_redirect(base_path: &str, entity_id: &str) -> Result<Url, DiscoveryRedirectError> {
    let malformed = |reason: String| DiscoveryRedirectError::MalformedBasePath {
        base_path: base_path.to_owned(),
        reason,
    };

    let mut url = Url::parse(base_path).map_err(|err| malformed(err.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| malformed("not a hierarchical url".to_owned()))?
        .pop_if_empty()
        .extend(DISCOVERY_PATH);

    let idp = utf8_percent_encode(entity_id, QUERY_COMPONENT);
    let query = match url.query() {
        Some(query) if !query.is_empty() => format!("{query}&{IDP_QUERY_PARAM}={idp}"),
        _ => format!("{IDP_QUERY_PARAM}={idp}"),
    };
    url.set_query(Some(&query));

    Ok(url)
}
