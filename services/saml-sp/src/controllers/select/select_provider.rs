use crate::{
    app_config::SelectConfig,
    controllers::select::{RequestMatcher, RequestMatcherError, SelectError},
    repositories::tenant::TenantResolver,
    services::{ProviderSelectionService, SelectDecision, ViewRenderer},
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};
use futures::future::BoxFuture;
use shine_infra::web::{IntoProblemResponse, Problem, ProblemConfig};
use std::{
    fmt, mem,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Response extension listing the aliases of the providers left out of the selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedProviders(pub Vec<String>);

impl fmt::Display for SkippedProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

struct Inner<R, V> {
    request_matcher: RequestMatcher,
    select_template: String,
    selection: ProviderSelectionService,
    tenant_resolver: R,
    renderer: V,
    problem_config: ProblemConfig,
}

impl<R, V> Inner<R, V>
where
    R: TenantResolver,
    V: ViewRenderer,
{
    async fn select(&self, request: Request<Body>) -> Result<Response, SelectError> {
        let (parts, _) = request.into_parts();
        let tenant = self.tenant_resolver.resolve(&parts).await?;

        let selection = self.selection.collect_providers(&tenant);
        let mut skipped = Vec::with_capacity(selection.failures.len());
        for failure in selection.failures {
            log::warn!(
                "Unable to select provider {} of tenant {}: {}",
                failure.alias,
                tenant.alias(),
                failure.error
            );
            skipped.push(failure.alias);
        }

        let mut response = match self.selection.decide(selection.providers) {
            SelectDecision::Redirect(redirect) => {
                log::debug!("Single provider for tenant {}, redirecting to {redirect}", tenant.alias());
                (StatusCode::FOUND, [(header::LOCATION, redirect)]).into_response()
            }
            SelectDecision::Render(model) => {
                let html = self.renderer.render(&self.select_template, &model)?;
                Html(html).into_response()
            }
        };

        if !skipped.is_empty() {
            let skipped = SkippedProviders(skipped);
            log::debug!("Skipped providers of tenant {}: {skipped}", tenant.alias());
            response.extensions_mut().insert(skipped);
        }
        Ok(response)
    }
}

/// Layer serving the identity provider selection page. Requests not matching the configured path pattern
/// are forwarded to the inner service unchanged.
pub struct SelectProvider<R, V> {
    inner: Arc<Inner<R, V>>,
}

impl<R, V> Clone for SelectProvider<R, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R, V> SelectProvider<R, V>
where
    R: TenantResolver,
    V: ViewRenderer,
{
    pub fn new(
        config: &SelectConfig,
        tenant_resolver: R,
        renderer: V,
        problem_config: ProblemConfig,
    ) -> Result<Self, RequestMatcherError> {
        let request_matcher = RequestMatcher::new(config.request_matcher.as_str())?;
        log::info!(
            "Serving provider selection on {} (redirect on single provider: {})",
            request_matcher.pattern(),
            config.redirect_on_single_provider
        );

        Ok(Self {
            inner: Arc::new(Inner {
                request_matcher,
                select_template: config.select_template.clone(),
                selection: ProviderSelectionService::new(config.redirect_on_single_provider),
                tenant_resolver,
                renderer,
                problem_config,
            }),
        })
    }
}

impl<S, R, V> Layer<S> for SelectProvider<R, V> {
    type Service = SelectProviderMiddleware<S, R, V>;

    fn layer(&self, inner: S) -> Self::Service {
        SelectProviderMiddleware {
            inner,
            layer: self.clone(),
        }
    }
}

#[must_use]
pub struct SelectProviderMiddleware<S, R, V> {
    inner: S,
    layer: SelectProvider<R, V>,
}

impl<S, R, V> Clone for SelectProviderMiddleware<S, R, V>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            layer: self.layer.clone(),
        }
    }
}

impl<S, R, V> Service<Request<Body>> for SelectProviderMiddleware<S, R, V>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    R: TenantResolver + 'static,
    V: ViewRenderer + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        if !self.layer.inner.request_matcher.matches(request.uri().path()) {
            // keep the service polled ready for the call
            let clone = self.inner.clone();
            let mut inner = mem::replace(&mut self.inner, clone);
            return Box::pin(inner.call(request));
        }

        let layer = self.layer.inner.clone();
        let path = request.uri().path().to_owned();
        Box::pin(async move {
            let response = match layer.select(request).await {
                Ok(response) => response,
                Err(err) => Problem::from(err)
                    .with_instance(path)
                    .into_problem_response(&layer.problem_config)
                    .into_response(),
            };
            Ok(response)
        })
    }
}

#[cfg(test)]
#[path = "./select_provider_test.rs"]
mod select_provider_test;
