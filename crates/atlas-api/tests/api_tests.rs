//! API Integration Tests
//!
//! Author: hephaex@gmail.com

use atlas_api::{create_router, create_router_for_testing, state::AppState};
use atlas_core::{
    AppConfig, AtlasError, CrewOutcome, CrewRunner, IndexReport, KnowledgeBase, RagAnswer,
    StructuredGenerator, StructuredOutput,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create a test request
fn create_json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(create_json_request("POST", uri, Some(payload)))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

// =============================================================================
// Failing Services
// =============================================================================

struct FailingKnowledgeBase(fn() -> AtlasError);

#[async_trait::async_trait]
impl KnowledgeBase for FailingKnowledgeBase {
    async fn query(&self, _question: &str) -> atlas_core::Result<RagAnswer> {
        Err((self.0)())
    }

    async fn load_and_index(&self) -> atlas_core::Result<IndexReport> {
        Err((self.0)())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct FailingCrew(fn() -> AtlasError);

#[async_trait::async_trait]
impl CrewRunner for FailingCrew {
    async fn run(
        &self,
        _topic: &str,
        _parameters: &Map<String, Value>,
    ) -> atlas_core::Result<CrewOutcome> {
        Err((self.0)())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

struct FailingGenerator(fn() -> AtlasError);

#[async_trait::async_trait]
impl StructuredGenerator for FailingGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _spec_name: &str,
        _num_reasks: u32,
    ) -> atlas_core::Result<StructuredOutput> {
        Err((self.0)())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn instant_state() -> AppState {
    let mut config = AppConfig::default();
    config.services.simulate_latency = false;
    AppState::new(config)
}

fn internal_failure() -> AtlasError {
    AtlasError::Other(anyhow::anyhow!("database password is hunter2"))
}

fn vector_store_not_ready() -> AtlasError {
    AtlasError::VectorStoreNotReady("Base de vetores indisponível.".to_string())
}

fn invalid_crew_input() -> AtlasError {
    AtlasError::InvalidCrewInput("Tópico não suportado.".to_string())
}

fn guardrails_validation() -> AtlasError {
    AtlasError::GuardrailsValidation("Campo 'X' está faltando.".to_string())
}

fn spec_not_found() -> AtlasError {
    AtlasError::SpecNotFound("Especificação 'Nope' não encontrada.".to_string())
}

/// Assert a 500 carrying only the endpoint's generic message
fn assert_generic_failure(status: StatusCode, json: &Value, message: &str) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["message"], message);
    assert!(json.get("details").is_none());
}

// =============================================================================
// Liveness Tests
// =============================================================================

#[tokio::test]
async fn test_root() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "API de IA está operacional!"})
    );
}

#[tokio::test]
async fn test_ping() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/ping")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "AI router está respondendo!"})
    );
}

#[tokio::test]
async fn test_ping_requires_prefix() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// RAG Tests
// =============================================================================

#[tokio::test]
async fn test_rag_query_supabase() {
    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/rag-query",
        json!({"question": "O que é Supabase?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["answer"],
        "Supabase é um Backend como Serviço (BaaS) incrível!"
    );
    assert_eq!(
        json["sources"],
        json!([{"source": "docs/supabase_intro.md", "score": 0.9}])
    );
}

#[tokio::test]
async fn test_rag_query_teste() {
    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/rag-query",
        json!({"question": "Só um TESTE", "session_id": "abc-123"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["answer"], "Este é um teste do serviço RAG placeholder.");
    assert_eq!(json["sources"], json!([]));
}

#[tokio::test]
async fn test_rag_query_fallback() {
    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/rag-query",
        json!({"question": "Qual o status do projeto X?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["answer"],
        "Desculpe, não encontrei informações sobre isso no meu conhecimento atual (placeholder)."
    );
    assert_eq!(json["sources"], json!([]));
}

#[tokio::test]
async fn test_rag_query_invalid_input() {
    for payload in [
        json!({"wrong_field": "abc"}),
        json!({}),
        json!({"question": 123}),
        json!({"question": "ok", "session_id": 5}),
    ] {
        let (status, json) =
            post_json(create_router_for_testing(), "/api/v1/rag-query", payload).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_rag_query_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/rag-query")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"question\": "))
        .unwrap();

    let response = create_router_for_testing().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_rag_query_vector_store_not_ready() {
    let state = instant_state().with_knowledge_base(Arc::new(FailingKnowledgeBase(
        vector_store_not_ready,
    )));
    let app = create_router(Arc::new(state));

    let (status, json) =
        post_json(app, "/api/v1/rag-query", json!({"question": "supabase"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(json["message"], "Base de vetores indisponível.");
}

#[tokio::test]
async fn test_rag_query_unexpected_error_is_generic() {
    let state = instant_state().with_knowledge_base(Arc::new(FailingKnowledgeBase(internal_failure)));
    let app = create_router(Arc::new(state));

    let (status, json) =
        post_json(app, "/api/v1/rag-query", json!({"question": "supabase"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Erro ao processar consulta RAG.");
    assert!(!json.to_string().contains("hunter2"));
}

#[tokio::test]
async fn test_rag_query_other_domain_errors_are_generic() {
    for failure in [invalid_crew_input, guardrails_validation, spec_not_found] {
        let state = instant_state().with_knowledge_base(Arc::new(FailingKnowledgeBase(failure)));
        let app = create_router(Arc::new(state));

        let (status, json) =
            post_json(app, "/api/v1/rag-query", json!({"question": "supabase"})).await;

        assert_generic_failure(status, &json, "Erro ao processar consulta RAG.");
    }
}

// =============================================================================
// Crew Tests
// =============================================================================

#[tokio::test]
async fn test_run_crew() {
    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/run-crew",
        json!({"topic": "Análise de mercado"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["result"]["summary"],
        "Resultado placeholder para a análise do tópico 'Análise de mercado'."
    );
    assert_eq!(json["result"]["confidence"], 0.5);
    assert_eq!(json["logs"].as_array().unwrap().len(), 4);
    assert_eq!(json["logs"][0], "INFO: Crew para 'Análise de mercado' iniciada.");
}

#[tokio::test]
async fn test_run_crew_with_parameters() {
    for parameters in [json!({"depth": 2, "lang": "pt"}), Value::Null] {
        let (status, json) = post_json(
            create_router_for_testing(),
            "/api/v1/run-crew",
            json!({"topic": "cloud", "parameters": parameters}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["result"]["summary"],
            "Resultado placeholder para a análise do tópico 'cloud'."
        );
    }
}

#[tokio::test]
async fn test_run_crew_invalid_input() {
    for payload in [
        json!({}),
        json!({"topic": 42}),
        json!({"topic": "ok", "parameters": "not a map"}),
    ] {
        let (status, _) =
            post_json(create_router_for_testing(), "/api/v1/run-crew", payload).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_run_crew_invalid_topic() {
    let state = instant_state().with_crew(Arc::new(FailingCrew(invalid_crew_input)));
    let app = create_router(Arc::new(state));

    let (status, json) = post_json(app, "/api/v1/run-crew", json!({"topic": "x"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Tópico não suportado.");
}

#[tokio::test]
async fn test_run_crew_unexpected_error_is_generic() {
    let state = instant_state().with_crew(Arc::new(FailingCrew(internal_failure)));
    let app = create_router(Arc::new(state));

    let (status, json) = post_json(app, "/api/v1/run-crew", json!({"topic": "x"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Erro ao executar a Crew AI.");
}

#[tokio::test]
async fn test_run_crew_other_domain_errors_are_generic() {
    for failure in [vector_store_not_ready, guardrails_validation, spec_not_found] {
        let state = instant_state().with_crew(Arc::new(FailingCrew(failure)));
        let app = create_router(Arc::new(state));

        let (status, json) = post_json(app, "/api/v1/run-crew", json!({"topic": "x"})).await;

        assert_generic_failure(status, &json, "Erro ao executar a Crew AI.");
    }
}

// =============================================================================
// Guardrails Tests
// =============================================================================

#[tokio::test]
async fn test_generate_structured_user_profile() {
    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/generate-structured",
        json!({"prompt": "Extraia dados do usuário", "spec_name": "UserProfileSpec"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "validated_data": {"name": "Placeholder User", "age": 30, "interests": ["AI", "Cloud"]},
            "error": null
        })
    );
}

#[tokio::test]
async fn test_generate_structured_validation_failure_is_ok() {
    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/generate-structured",
        json!({"prompt": "p", "spec_name": "InvalidSpecExample", "num_reasks": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["validated_data"].is_null());
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_structured_rail_and_other_specs() {
    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/generate-structured",
        json!({"prompt": "p", "spec_name": "invoice.rail"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["validated_data"],
        "Resultado placeholder validado para spec RAIL 'invoice.rail'."
    );
    assert!(json["error"].is_null());

    let (status, json) = post_json(
        create_router_for_testing(),
        "/api/v1/generate-structured",
        json!({"prompt": "p", "spec_name": "InvoiceModel"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["validated_data"],
        "Resultado placeholder validado para spec 'InvoiceModel'."
    );
}

#[tokio::test]
async fn test_generate_structured_invalid_input() {
    for payload in [
        json!({"prompt": "p"}),
        json!({"spec_name": "UserProfileSpec"}),
        json!({"prompt": 1, "spec_name": "UserProfileSpec"}),
        json!({"prompt": "p", "spec_name": "UserProfileSpec", "num_reasks": -1}),
        json!({"prompt": "p", "spec_name": "UserProfileSpec", "num_reasks": "two"}),
    ] {
        let (status, _) = post_json(
            create_router_for_testing(),
            "/api/v1/generate-structured",
            payload,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_generate_structured_spec_not_found() {
    let state = instant_state().with_generator(Arc::new(FailingGenerator(spec_not_found)));
    let app = create_router(Arc::new(state));

    let (status, json) = post_json(
        app,
        "/api/v1/generate-structured",
        json!({"prompt": "p", "spec_name": "Nope"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_generate_structured_unexpected_error_is_generic() {
    let state = instant_state().with_generator(Arc::new(FailingGenerator(internal_failure)));
    let app = create_router(Arc::new(state));

    let (status, json) = post_json(
        app,
        "/api/v1/generate-structured",
        json!({"prompt": "p", "spec_name": "UserProfileSpec"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Erro na geração estruturada.");
}

#[tokio::test]
async fn test_generate_structured_other_domain_errors_are_generic() {
    for failure in [vector_store_not_ready, invalid_crew_input] {
        let state = instant_state().with_generator(Arc::new(FailingGenerator(failure)));
        let app = create_router(Arc::new(state));

        let (status, json) = post_json(
            app,
            "/api/v1/generate-structured",
            json!({"prompt": "p", "spec_name": "UserProfileSpec"}),
        )
        .await;

        assert_generic_failure(status, &json, "Erro na geração estruturada.");
    }
}

#[tokio::test]
async fn test_generate_structured_validation_error_from_service() {
    let state = instant_state().with_generator(Arc::new(FailingGenerator(guardrails_validation)));
    let app = create_router(Arc::new(state));

    let (status, json) = post_json(
        app,
        "/api/v1/generate-structured",
        json!({"prompt": "p", "spec_name": "UserProfileSpec"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"validated_data": null, "error": "Campo 'X' está faltando."})
    );
}

// =============================================================================
// Idempotence
// =============================================================================

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let app = create_router_for_testing();
    let cases = [
        ("/api/v1/rag-query", json!({"question": "O que é Supabase?"})),
        (
            "/api/v1/run-crew",
            json!({"topic": "Análise de mercado", "parameters": {"k": 1}}),
        ),
        (
            "/api/v1/generate-structured",
            json!({"prompt": "p", "spec_name": "UserProfileSpec", "num_reasks": 2}),
        ),
        (
            "/api/v1/generate-structured",
            json!({"prompt": "p", "spec_name": "InvalidSpecExample"}),
        ),
    ];

    for (uri, payload) in cases {
        let responses = futures::future::join_all(
            (0..5).map(|_| post_json(app.clone(), uri, payload.clone())),
        )
        .await;

        let (first_status, first_body) = &responses[0];
        assert_eq!(*first_status, StatusCode::OK, "{uri}");
        for (status, body) in &responses[1..] {
            assert_eq!(status, first_status, "{uri}");
            assert_eq!(body, first_body, "{uri}");
        }
    }
}

// =============================================================================
// OpenAPI/Swagger Tests
// =============================================================================

#[tokio::test]
async fn test_swagger_ui_available() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Swagger UI should redirect or return HTML
    assert!(
        response.status() == StatusCode::OK || response.status() == StatusCode::MOVED_PERMANENTLY
    );
}

#[tokio::test]
async fn test_openapi_spec_available() {
    let app = create_router_for_testing();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["openapi"].is_string());
    assert!(json["paths"]["/api/v1/rag-query"]["post"].is_object());
    assert!(json["paths"]["/api/v1/run-crew"]["post"].is_object());
    assert!(json["paths"]["/api/v1/generate-structured"]["post"].is_object());
}

#[tokio::test]
async fn test_openapi_follows_configured_prefix() {
    let mut config = AppConfig::default();
    config.services.simulate_latency = false;
    config.server.api_prefix = "/ai/".to_string();
    let app = create_router(Arc::new(AppState::new(config)));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;

    assert!(json["paths"]["/ai/rag-query"]["post"].is_object());
    assert!(json["paths"]["/ai/ping"]["get"].is_object());
    assert!(json["paths"]["/"]["get"].is_object());
    assert!(json["paths"].get("/api/v1/rag-query").is_none());

    let (status, _) = post_json(app, "/ai/rag-query", json!({"question": "teste"})).await;
    assert_eq!(status, StatusCode::OK);
}
