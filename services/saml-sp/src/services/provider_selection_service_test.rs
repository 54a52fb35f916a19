use crate::{
    app_config::{ExternalProviderConfig, HostedServiceProviderConfig, IdentityProviderMetadata, MetadataSource},
    repositories::tenant::{HostedServiceProvider, MetadataError, RemoteProviders},
    services::{
        build_discovery_redirect, ProviderBuildError, ProviderSelectionService, SelectDecision, SelectPageModel,
        SelectableProvider, SELECT_PAGE_TITLE,
    },
};
use shine_test::test;
use std::sync::Arc;

const BASE_PATH: &str = "https://sp.example";

fn registered(alias: &str, link_text: &str) -> ExternalProviderConfig {
    ExternalProviderConfig {
        alias: alias.to_owned(),
        link_text: link_text.to_owned(),
        metadata: MetadataSource::Registry { key: alias.to_owned() },
    }
}

fn entity_id(alias: &str) -> String {
    format!("https://{alias}.example/sso")
}

/// Create a tenant where the metadata is registered for the given aliases only.
fn create_tenant(base_path: &str, providers: Vec<ExternalProviderConfig>, known: &[&str]) -> HostedServiceProvider {
    let remote_providers: RemoteProviders = known
        .iter()
        .map(|alias| {
            (
                alias.to_string(),
                IdentityProviderMetadata {
                    entity_id: entity_id(alias),
                },
            )
        })
        .collect();
    let config = HostedServiceProviderConfig {
        alias: "tenant".into(),
        host: None,
        base_path: base_path.into(),
        providers,
    };
    HostedServiceProvider::new(Arc::new(config), Arc::new(remote_providers))
}

fn expected_entry(alias: &str, link_text: &str) -> SelectableProvider {
    SelectableProvider {
        link_text: link_text.to_owned(),
        redirect: build_discovery_redirect(BASE_PATH, &entity_id(alias)).unwrap().into(),
    }
}

#[test]
fn all_providers_in_configuration_order() {
    let aliases = ["zeta", "alpha", "mid", "beta"];
    let providers = aliases.iter().map(|a| registered(a, &a.to_uppercase())).collect();
    let tenant = create_tenant(BASE_PATH, providers, &aliases);

    let selection = ProviderSelectionService::new(true).collect_providers(&tenant);
    assert!(selection.failures.is_empty());
    let expected: Vec<_> = aliases.iter().map(|a| expected_entry(a, &a.to_uppercase())).collect();
    assert_eq!(selection.providers, expected);
}

#[test]
fn failing_providers_are_skipped() {
    let aliases = ["a", "b", "c", "d", "e"];
    let providers = aliases.iter().map(|a| registered(a, a)).collect();
    let tenant = create_tenant(BASE_PATH, providers, &["a", "c", "e"]);

    let selection = ProviderSelectionService::new(true).collect_providers(&tenant);
    assert_eq!(
        selection.providers,
        vec![expected_entry("a", "a"), expected_entry("c", "c"), expected_entry("e", "e")]
    );

    let failed: Vec<_> = selection.failures.iter().map(|f| f.alias.as_str()).collect();
    assert_eq!(failed, vec!["b", "d"]);
    for failure in &selection.failures {
        assert!(matches!(
            &failure.error,
            ProviderBuildError::Metadata(MetadataError::NotRegistered { key }) if *key == failure.alias
        ));
    }
}

#[test]
fn inline_metadata() {
    let provider = ExternalProviderConfig {
        alias: "inline".into(),
        link_text: "Inline IdP".into(),
        metadata: MetadataSource::Inline {
            entity_id: "urn:inline:idp".into(),
        },
    };
    let tenant = create_tenant(BASE_PATH, vec![provider], &[]);

    let selection = ProviderSelectionService::new(true).collect_providers(&tenant);
    assert_eq!(
        selection.providers,
        vec![SelectableProvider {
            link_text: "Inline IdP".into(),
            redirect: "https://sp.example/saml/sp/discovery?idp=urn%3Ainline%3Aidp".into(),
        }]
    );
}

#[test]
fn malformed_base_path_fails_every_provider() {
    let tenant = create_tenant("no-scheme/base", vec![registered("a", "A"), registered("b", "B")], &["a", "b"]);

    let selection = ProviderSelectionService::new(true).collect_providers(&tenant);
    assert!(selection.providers.is_empty());
    assert_eq!(selection.failures.len(), 2);
    assert!(selection
        .failures
        .iter()
        .all(|f| matches!(f.error, ProviderBuildError::DiscoveryRedirect(_))));
}

#[test]
fn redirect_only_for_a_single_provider() {
    let service = ProviderSelectionService::new(true);

    let single = vec![expected_entry("acme", "Acme IdP")];
    assert_eq!(
        service.decide(single.clone()),
        SelectDecision::Redirect(single[0].redirect.clone())
    );

    assert_eq!(
        service.decide(vec![]),
        SelectDecision::Render(SelectPageModel {
            title: SELECT_PAGE_TITLE,
            providers: vec![],
        })
    );

    let many = vec![expected_entry("a", "A"), expected_entry("b", "B")];
    assert_eq!(
        service.decide(many.clone()),
        SelectDecision::Render(SelectPageModel {
            title: SELECT_PAGE_TITLE,
            providers: many,
        })
    );
}

#[test]
fn render_single_provider_when_redirect_is_disabled() {
    let service = ProviderSelectionService::new(false);

    let single = vec![expected_entry("acme", "Acme IdP")];
    assert_eq!(
        service.decide(single.clone()),
        SelectDecision::Render(SelectPageModel {
            title: SELECT_PAGE_TITLE,
            providers: single,
        })
    );
}

#[test]
fn failures_only_change_the_count() {
    // two configured, one usable: the single remaining provider is redirected to
    let tenant = create_tenant(BASE_PATH, vec![registered("a", "A"), registered("b", "B")], &["b"]);
    let service = ProviderSelectionService::new(true);
    let selection = service.collect_providers(&tenant);
    assert_eq!(selection.failures.len(), 1);
    assert_eq!(
        service.decide(selection.providers),
        SelectDecision::Redirect(expected_entry("b", "B").redirect)
    );

    // three configured, two usable: the page is rendered
    let tenant = create_tenant(
        BASE_PATH,
        vec![registered("a", "A"), registered("b", "B"), registered("c", "C")],
        &["a", "c"],
    );
    let selection = service.collect_providers(&tenant);
    assert_eq!(
        service.decide(selection.providers),
        SelectDecision::Render(SelectPageModel {
            title: SELECT_PAGE_TITLE,
            providers: vec![expected_entry("a", "A"), expected_entry("c", "C")],
        })
    );
}

#[test]
fn page_model_serialization() {
    let model = SelectPageModel {
        title: SELECT_PAGE_TITLE,
        providers: vec![expected_entry("acme", "Acme IdP")],
    };
    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "title": "Select an Identity Provider",
            "providers": [{
                "linkText": "Acme IdP",
                "redirect": "https://sp.example/saml/sp/discovery?idp=https%3A%2F%2Facme.example%2Fsso"
            }]
        })
    );
}
