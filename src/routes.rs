// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{self, exams, news, pages, previous_years, topics},
    state::AppState,
};

/// Assembles the main application router.
///
/// * JSON API under `/api`, server-rendered pages at the root.
/// * Unknown paths and unsupported methods answer in the JSON error shape.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let exam_routes = Router::new()
        .route("/", get(exams::list_exams))
        .route("/{exam}", get(exams::get_exam))
        .route("/{exam}/subjects", get(exams::list_subjects))
        .route("/{exam}/{subject}/chapters", get(exams::list_chapters));

    let api_routes = Router::new()
        .nest("/exams", exam_routes)
        .route(
            "/previousyears/{exam}/{subject}",
            get(previous_years::list_previous_years),
        )
        .route("/topic/{topic}", get(topics::get_topic))
        .route("/topics/trending", get(topics::trending_topics))
        .route("/news", get(news::list_news));

    let page_routes = Router::new()
        .route("/exam/{exam}", get(pages::exam_page))
        .route("/exam/{exam}/{subject}/chapters", get(pages::chapters_page))
        .route(
            "/exam/{exam}/{subject}/previous-year",
            get(pages::previous_years_page),
        )
        .route("/exam/{exam}/{subject}/info", get(pages::subject_info_page))
        .route("/topic/{topic}", get(pages::topic_page))
        .route("/news", get(pages::news_page));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::Config, news::StaticNewsSource, resolver::Resolver, store::MemoryStore,
    };

    fn app() -> Router {
        create_router(AppState {
            resolver: Resolver::new(Arc::new(MemoryStore::new())),
            news: Arc::new(StaticNewsSource::default()),
            config: Config::default(),
        })
    }

    #[tokio::test]
    async fn empty_exam_list() {
        let response = app()
            .oneshot(Request::get("/api/exams").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "exams": [] }));
    }

    #[tokio::test]
    async fn delete_is_not_allowed() {
        let response = app()
            .oneshot(
                Request::delete("/api/topics/trending")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn configured_origin_is_allowed() {
        let response = app()
            .oneshot(
                Request::get("/api/news")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }
}
