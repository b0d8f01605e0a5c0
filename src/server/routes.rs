//! JSON API route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::{ApiError, ApiJson};
use super::state::AppState;
use crate::catalog::{AudioFeatures, TrackSummary};
use crate::discovery::{self, DiscoveryError, PlaylistPreview, PopularTracks};
use crate::settings::{self, StoredTrackSettings, TrackSettings};
use crate::transition::{self, SuggestionResult, pipeline::validate_seed_ids};

/// Results returned by the track search route
const SEARCH_LIMIT: u32 = 10;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    catalog_available: bool,
    uptime_secs: u64,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

#[derive(Deserialize)]
struct TrackIdsBody {
    #[serde(default)]
    track_ids: Vec<String>,
}

#[derive(Deserialize)]
struct SaveSettingsBody {
    #[serde(default)]
    track_id: Option<String>,
    #[serde(default)]
    settings: TrackSettings,
}

#[derive(Serialize)]
struct SettingsResponse<T> {
    settings: T,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        catalog_available: state.catalog.is_some(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn search_tracks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    if params.query.is_empty() {
        return Ok((StatusCode::BAD_REQUEST, Json(Vec::<TrackSummary>::new())).into_response());
    }
    let catalog = state.catalog()?;

    let tracks = catalog
        .search_tracks(&params.query, SEARCH_LIMIT)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(tracks).into_response())
}

async fn popular_tracks(State(state): State<AppState>) -> Result<Json<PopularTracks>, ApiError> {
    let catalog = state.catalog()?;
    Ok(Json(discovery::discover_popular_tracks(catalog).await))
}

async fn track_features(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> Result<Json<AudioFeatures>, ApiError> {
    let catalog = state.catalog()?;
    Ok(Json(discovery::track_features(catalog, &track_id).await))
}

async fn basic_recommendations(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TrackIdsBody>,
) -> Result<Json<SuggestionResult>, ApiError> {
    validate_seed_ids(&body.track_ids)?;
    let catalog = state.catalog()?;
    let result = transition::compute_basic_transition(catalog, &body.track_ids).await?;
    Ok(Json(result))
}

async fn smart_recommendations(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TrackIdsBody>,
) -> Result<Json<SuggestionResult>, ApiError> {
    validate_seed_ids(&body.track_ids)?;
    let catalog = state.catalog()?;
    let result = transition::compute_smart_transition(catalog, &body.track_ids).await?;
    Ok(Json(result))
}

async fn playlist_preview(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TrackIdsBody>,
) -> Result<Json<PlaylistPreview>, ApiError> {
    if body.track_ids.is_empty() {
        return Err(DiscoveryError::NoTrackIds.into());
    }
    let catalog = state.catalog()?;
    let preview = discovery::build_playlist_preview(catalog, &body.track_ids).await?;
    Ok(Json(preview))
}

async fn save_settings(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SaveSettingsBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let track_id = body.track_id.unwrap_or_default();
    settings::save_track_settings(&state.db, &track_id, &body.settings).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Settings saved successfully",
    })))
}

async fn get_settings(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> Result<Json<SettingsResponse<TrackSettings>>, ApiError> {
    let settings = settings::get_track_settings(&state.db, &track_id)
        .await?
        .map(TrackSettings::from)
        .unwrap_or_else(TrackSettings::unsaved);
    Ok(Json(SettingsResponse { settings }))
}

async fn list_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse<Vec<StoredTrackSettings>>>, ApiError> {
    let settings = settings::get_all_settings(&state.db).await?;
    Ok(Json(SettingsResponse { settings }))
}

/// Build the application router
pub fn make_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/search_tracks", get(search_tracks))
        .route("/api/popular_tracks", get(popular_tracks))
        .route("/api/track_features/{track_id}", get(track_features))
        .route("/api/basic_recommendations", post(basic_recommendations))
        .route("/api/smart_recommendations", post(smart_recommendations))
        .route("/api/playlist_preview", post(playlist_preview))
        .route("/api/save_settings", post(save_settings))
        .route("/api/get_settings/{track_id}", get(get_settings))
        .route("/api/settings", get(list_settings))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::traits::mocks::MockCatalog;
    use crate::test_utils::{seed_track, temp_db, track, track_with_preview};

    async fn app_with(catalog: Option<MockCatalog>) -> (Router, Arc<MockCatalog>, TempDir) {
        let (pool, dir) = temp_db().await;
        let mock = Arc::new(catalog.unwrap_or_default());
        let catalog = catalog_handle(&mock);
        let state = AppState::new(catalog, pool);
        (make_app(state), mock, dir)
    }

    fn catalog_handle(mock: &Arc<MockCatalog>) -> Option<Arc<dyn crate::catalog::CatalogApi>> {
        Some(mock.clone())
    }

    async fn app_without_catalog() -> (Router, TempDir) {
        let (pool, dir) = temp_db().await;
        (make_app(AppState::new(None, pool)), dir)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn seeded_catalog() -> MockCatalog {
        MockCatalog::new()
            .with_track(seed_track("s1", "Seed One", "artist-1", "album-1"))
            .with_track(seed_track("s2", "Seed Two", "artist-2", "album-2"))
            .with_album_tracks("album-1", vec![track_with_preview("a1", "Album Cut")])
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app_without_catalog().await;

        let (status, body) = send(&app, get_request("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["catalog_available"], false);
    }

    #[tokio::test]
    async fn test_catalog_routes_require_authentication() {
        let (app, _dir) = app_without_catalog().await;

        let requests = vec![
            get_request("/api/search_tracks?query=daft"),
            get_request("/api/popular_tracks"),
            get_request("/api/track_features/t1"),
            post_json("/api/smart_recommendations", json!({"track_ids": ["a", "b"]})),
            post_json("/api/basic_recommendations", json!({"track_ids": ["a", "b"]})),
            post_json("/api/playlist_preview", json!({"track_ids": ["a"]})),
        ];

        for request in requests {
            let uri = request.uri().to_string();
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "route {}", uri);
            assert_eq!(body["error"], "authentication_failed");
        }
    }

    #[tokio::test]
    async fn test_search_empty_query_is_bad_request() {
        let (app, mock, _dir) = app_with(None).await;

        let (status, body) = send(&app, get_request("/api/search_tracks?query=")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!([]));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_returns_tracks() {
        let catalog = MockCatalog::new().with_search("daft punk", vec![track("t1", "Da Funk")]);
        let (app, mock, _dir) = app_with(Some(catalog)).await;

        let (status, body) = send(&app, get_request("/api/search_tracks?query=daft%20punk")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "t1");
        assert_eq!(body[0]["name"], "Da Funk");
        assert_eq!(mock.calls(), vec!["search_tracks:daft punk"]);
    }

    #[tokio::test]
    async fn test_search_failure_is_server_error() {
        let catalog = MockCatalog::new().failing("search_tracks");
        let (app, _mock, _dir) = app_with(Some(catalog)).await;

        let (status, body) = send(&app, get_request("/api/search_tracks?query=x")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("mock failure"));
    }

    #[tokio::test]
    async fn test_smart_recommendations() {
        let (app, _mock, _dir) = app_with(Some(seeded_catalog())).await;

        let (status, body) = send(
            &app,
            post_json("/api/smart_recommendations", json!({"track_ids": ["s1", "s2"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"][0]["id"], "a1");
        assert_eq!(body["suggestions"][0]["strategy"], "Same Album");
        assert_eq!(body["strategies_used"], json!(["Album Exploration"]));
        assert_eq!(body["total_found"], 1);
        assert_eq!(body["preview_count"], 1);
    }

    #[tokio::test]
    async fn test_recommendations_reject_wrong_seed_count() {
        let (app, mock, _dir) = app_with(Some(seeded_catalog())).await;

        for uri in ["/api/smart_recommendations", "/api/basic_recommendations"] {
            let (status, body) = send(&app, post_json(uri, json!({"track_ids": ["s1"]}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Please provide exactly 2 track IDs");
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_seed_is_server_error() {
        let (app, _mock, _dir) = app_with(Some(seeded_catalog())).await;

        let (status, body) = send(
            &app,
            post_json("/api/basic_recommendations", json!({"track_ids": ["s1", "nope"]})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Could not fetch track details");
    }

    #[tokio::test]
    async fn test_basic_recommendations_have_no_strategy_labels() {
        let catalog = seeded_catalog().with_search("pop", vec![track("p1", "Pop Song")]);
        let (app, _mock, _dir) = app_with(Some(catalog)).await;

        let (status, body) = send(
            &app,
            post_json("/api/basic_recommendations", json!({"track_ids": ["s1", "s2"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"][0]["id"], "p1");
        assert!(body["suggestions"][0].get("strategy").is_none());
    }

    #[tokio::test]
    async fn test_playlist_preview() {
        let (app, _mock, _dir) = app_with(Some(seeded_catalog())).await;

        let (status, body) = send(
            &app,
            post_json("/api/playlist_preview", json!({"track_ids": ["s1", "s2"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_tracks"], 2);
        assert_eq!(body["simulation_mode"], true);

        let (status, body) =
            send(&app, post_json("/api/playlist_preview", json!({"track_ids": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Track IDs are required");
    }

    #[tokio::test]
    async fn test_track_features_default_when_missing() {
        let (app, _mock, _dir) = app_with(None).await;

        let (status, body) = send(&app, get_request("/api/track_features/unknown")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tempo"], 120.0);
        assert_eq!(body["energy"], 0.5);
    }

    #[tokio::test]
    async fn test_popular_tracks_shape() {
        let (app, _mock, _dir) = app_with(None).await;

        let (status, body) = send(&app, get_request("/api/popular_tracks")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tracks"], json!([]));
        assert_eq!(body["strategies_used"], json!(["Basic Search"]));
    }

    #[tokio::test]
    async fn test_settings_roundtrip() {
        let (app, _dir) = app_without_catalog().await;

        let (status, body) = send(&app, get_request("/api/get_settings/t1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["settings"]["energy"], 0.5);
        assert_eq!(body["settings"]["speed"], 1.0);
        assert_eq!(body["settings"]["notes"], "");

        let (status, body) = send(
            &app,
            post_json(
                "/api/save_settings",
                json!({"track_id": "t1", "settings": {"custom_bpm": 126.0, "notes": "cue at 0:32"}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = send(&app, get_request("/api/get_settings/t1")).await;
        assert_eq!(body["settings"]["custom_bpm"], 126.0);
        assert_eq!(body["settings"]["speed"], 1.0);
        assert_eq!(body["settings"]["notes"], "cue at 0:32");

        let (_, body) = send(&app, get_request("/api/settings")).await;
        assert_eq!(body["settings"][0]["track_id"], "t1");
    }

    #[tokio::test]
    async fn test_save_settings_requires_track_id() {
        let (app, _dir) = app_without_catalog().await;

        let (status, body) = send(
            &app,
            post_json("/api/save_settings", json!({"settings": {"speed": 1.2}})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Track ID is required");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (app, mock, _dir) = app_with(Some(seeded_catalog())).await;

        let (status, body) = send(
            &app,
            post_json("/api/smart_recommendations", json!({"track_ids": "s1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("track_ids"));

        let not_json = Request::builder()
            .method("POST")
            .uri("/api/playlist_preview")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{track_ids"))
            .unwrap();
        let (status, body) = send(&app, not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let (app, _dir) = app_without_catalog().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/save_settings")
            .body(Body::from(r#"{"track_id": "t1"}"#))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_save_settings_null_speed_defaults() {
        let (app, _dir) = app_without_catalog().await;

        let (status, _) = send(
            &app,
            post_json(
                "/api/save_settings",
                json!({"track_id": "t1", "settings": {"speed": null, "tempo": 118.0}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get_request("/api/get_settings/t1")).await;
        assert_eq!(body["settings"]["speed"], 1.0);
        assert_eq!(body["settings"]["tempo"], 118.0);
    }
}
