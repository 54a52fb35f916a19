use axum::http::{header::InvalidHeaderValue, HeaderValue, Request, Response};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::{Layer, Service};

const POWERED_BY_HEADER: &str = "x-powered-by";

/// Add the `x-powered-by: service@version` header to every response.
#[derive(Clone)]
pub struct PoweredBy {
    value: HeaderValue,
}

impl PoweredBy {
    pub fn from_service_info<S1: AsRef<str>, S2: AsRef<str>>(
        service: S1,
        version: S2,
    ) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            value: HeaderValue::from_str(&format!("{}@{}", service.as_ref(), version.as_ref()))?,
        })
    }
}

impl<S> Layer<S> for PoweredBy {
    type Service = PoweredByMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PoweredByMiddleware {
            inner,
            value: self.value.clone(),
        }
    }
}

#[derive(Clone)]
#[must_use]
pub struct PoweredByMiddleware<S> {
    inner: S,
    value: HeaderValue,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for PoweredByMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let value = self.value.clone();
        let future = self.inner.call(request);
        Box::pin(async move {
            let mut response = future.await?;
            response.headers_mut().insert(POWERED_BY_HEADER, value);
            Ok(response)
        })
    }
}
