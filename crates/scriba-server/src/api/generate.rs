//! POST /generate - the generation gateway wire contract.
//!
//! Request: `{ "prompt": string, "type": "title"|"concept"|"proposal" }`.
//! Success: a JSON object with exactly one of `title`/`concept`/`proposal`
//! set to the generated string. Error: `{ "error": string }` with 400 for
//! missing or invalid input and 500 for provider/configuration failures.
//!
//! Both fields are validated before any processing; an unknown `type` tag
//! is rejected outright rather than falling back to a generic response
//! key.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scriba_core::error::ScribaError;
use scriba_core::generation::{GenerationRequest, GenerationResponse};
use scriba_core::stage::StageType;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::AppState;

/// Wire shape of a generation request.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(rename = "type")]
    pub stage: StageType,
}

/// Wire shape of a successful generation: exactly one stage key.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GenerateBody {
    Title { title: String },
    Concept { concept: String },
    Proposal { proposal: String },
}

impl From<GenerationResponse> for GenerateBody {
    fn from(response: GenerationResponse) -> Self {
        match response.stage {
            StageType::Title => Self::Title {
                title: response.text,
            },
            StageType::Concept => Self::Concept {
                concept: response.text,
            },
            StageType::Proposal => Self::Proposal {
                proposal: response.text,
            },
        }
    }
}

/// Error reply carrying the `{ "error": message }` body.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ScribaError> for ApiError {
    fn from(err: ScribaError) -> Self {
        let status = match &err {
            ScribaError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// POST /generate
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<GenerateBody>, ApiError> {
    let request: GenerateRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::bad_request("prompt and type are required"))?;

    let response = state
        .gateway
        .generate(GenerationRequest::new(request.prompt, request.stage))
        .await
        .inspect_err(|err| tracing::error!("generation failed: {err}"))?;

    Ok(Json(GenerateBody::from(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use axum::body::Body;
    use axum::http::Request;
    use scriba_core::error::Result;
    use scriba_core::generation::GenerationGateway;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubGateway {
        reply: std::result::Result<String, ScribaError>,
    }

    #[async_trait::async_trait]
    impl GenerationGateway for StubGateway {
        async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
            if request.prompt.trim().is_empty() {
                return Err(ScribaError::validation("prompt and type are required"));
            }
            self.reply.clone().map(|text| GenerationResponse {
                stage: request.stage,
                text,
            })
        }
    }

    fn app(reply: std::result::Result<String, ScribaError>) -> axum::Router {
        build_router(AppState::new(Arc::new(StubGateway { reply })))
    }

    async fn post_generate(app: axum::Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn success_body_carries_exactly_the_stage_key() {
        let (status, body) = post_generate(
            app(Ok("Concept text".into())),
            r#"{"prompt":"write a concept","type":"concept"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "concept": "Concept text" }));
    }

    #[tokio::test]
    async fn title_and_proposal_map_to_their_own_keys() {
        let (_, body) = post_generate(
            app(Ok("text".into())),
            r#"{"prompt":"p","type":"title"}"#,
        )
        .await;
        assert_eq!(body, json!({ "title": "text" }));

        let (_, body) = post_generate(
            app(Ok("text".into())),
            r#"{"prompt":"p","type":"proposal"}"#,
        )
        .await;
        assert_eq!(body, json!({ "proposal": "text" }));
    }

    #[tokio::test]
    async fn missing_fields_are_a_400() {
        let (status, body) =
            post_generate(app(Ok("unused".into())), r#"{"prompt":"p"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "prompt and type are required" }));

        let (status, _) = post_generate(app(Ok("unused".into())), r#"{"type":"title"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_type_tag_is_a_400() {
        let (status, body) = post_generate(
            app(Ok("unused".into())),
            r#"{"prompt":"p","type":"summary"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "prompt and type are required" }));
    }

    #[tokio::test]
    async fn empty_prompt_is_a_400() {
        let (status, body) = post_generate(
            app(Ok("unused".into())),
            r#"{"prompt":"","type":"title"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "prompt and type are required" }));
    }

    #[tokio::test]
    async fn provider_failures_are_a_500_with_an_error_body() {
        let (status, body) = post_generate(
            app(Err(ScribaError::provider("completion returned no content"))),
            r#"{"prompt":"p","type":"title"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Provider error: completion returned no content" })
        );
    }

    #[tokio::test]
    async fn configuration_failures_are_a_500() {
        let (status, _) = post_generate(
            app(Err(ScribaError::configuration("no API token found"))),
            r#"{"prompt":"p","type":"title"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let response = app(Ok("unused".into()))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
