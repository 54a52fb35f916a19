use axum::{http::Uri, Extension};
use shine_infra::web::{IntoProblemResponse, Problem, ProblemConfig, ProblemResponse};

/// Handle the requests not served by any controller.
pub async fn not_found(Extension(problem_config): Extension<ProblemConfig>, uri: Uri) -> ProblemResponse {
    Problem::not_found()
        .with_detail(format!("No resource at {}", uri.path()))
        .with_instance(uri.path())
        .into_problem_response(&problem_config)
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::Value as JsonValue;
    use shine_test::test;
    use tower::ServiceExt;

    #[test]
    async fn unknown_path_is_a_problem() {
        let app = Router::new()
            .fallback(not_found)
            .layer(Extension(ProblemConfig::new(false)));

        let response = app
            .oneshot(Request::get("/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let problem: JsonValue = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem["type"], "not-found");
        assert_eq!(problem["detail"], "No resource at /unknown");
        assert_eq!(problem["instance"], "/unknown");
    }
}
