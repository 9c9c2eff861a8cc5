///! HTTP surface of the tracking engine
///!
///! Handlers prefer a `success: false` envelope with an error message over a
///! server error. Only an unknown id on the detail route maps to 404.
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use orbitrack_common::{
    CategoriesResponse, CategoryMap, DetailResponse, MessageResponse, OrbitResponse,
    PassesResponse, SatellitesResponse, iso_timestamp,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::module::propagation::Observer;
use crate::module::tracking::{CatalogId, DEFAULT_ORBIT_HOURS, DEFAULT_PASS_DAYS, TrackingEngine};

#[derive(Clone)]
struct AppState {
    engine: Arc<TrackingEngine>,
}

#[derive(Debug, Default, Deserialize)]
struct OrbitQuery {
    hours: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PassQuery {
    lat: Option<f64>,
    lon: Option<f64>,
    alt: Option<f64>,
    days: Option<f64>,
}

pub fn router(engine: Arc<TrackingEngine>, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/satellites", get(list_satellites))
        .route("/api/satellite/{norad_id}", get(satellite_details))
        .route("/api/satellite/{norad_id}/orbit", get(orbit_path))
        .route("/api/satellite/{norad_id}/passes", get(passes))
        .route("/api/categories", get(categories))
        .route("/api/refresh", get(refresh))
        .with_state(AppState { engine });

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn list_satellites(State(state): State<AppState>) -> Json<SatellitesResponse> {
    let result = state.engine.list_positions().await;
    let timestamp = iso_timestamp(state.engine.now());

    Json(match result {
        Ok(satellites) => SatellitesResponse {
            success: true,
            error: None,
            satellites,
            timestamp,
        },
        Err(e) => {
            tracing::error!("Failed to list satellites: {}", e);
            SatellitesResponse {
                success: false,
                error: Some(e.to_string()),
                satellites: Vec::new(),
                timestamp,
            }
        }
    })
}

async fn satellite_details(
    State(state): State<AppState>,
    Path(norad_id): Path<CatalogId>,
) -> (StatusCode, Json<DetailResponse>) {
    match state.engine.satellite_details(norad_id).await {
        Ok(satellite) => (
            StatusCode::OK,
            Json(DetailResponse {
                success: true,
                satellite: Some(satellite),
                error: None,
            }),
        ),
        Err(e) if e.is_not_found() => (
            StatusCode::NOT_FOUND,
            Json(DetailResponse {
                success: false,
                satellite: None,
                error: Some("not found".to_string()),
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to get details for {}: {}", norad_id, e);
            (
                StatusCode::OK,
                Json(DetailResponse {
                    success: false,
                    satellite: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn orbit_path(
    State(state): State<AppState>,
    Path(norad_id): Path<CatalogId>,
    Query(query): Query<OrbitQuery>,
) -> Json<OrbitResponse> {
    let hours = query.hours.unwrap_or(DEFAULT_ORBIT_HOURS);

    Json(match state.engine.orbit_path(norad_id, hours).await {
        Ok(orbit) => OrbitResponse {
            success: true,
            orbit,
            error: None,
        },
        Err(e) if e.is_not_found() => OrbitResponse {
            success: true,
            orbit: Vec::new(),
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to compute orbit for {}: {}", norad_id, e);
            OrbitResponse {
                success: false,
                orbit: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    })
}

async fn passes(
    State(state): State<AppState>,
    Path(norad_id): Path<CatalogId>,
    Query(query): Query<PassQuery>,
) -> Json<PassesResponse> {
    let observer = Observer::new(
        query.lat.unwrap_or(0.0),
        query.lon.unwrap_or(0.0),
        query.alt.unwrap_or(0.0),
    );
    let days = query.days.unwrap_or(DEFAULT_PASS_DAYS);

    Json(match state.engine.passes(norad_id, observer, days).await {
        Ok(passes) => PassesResponse {
            success: true,
            passes,
            error: None,
        },
        Err(e) if e.is_not_found() => PassesResponse {
            success: true,
            passes: Vec::new(),
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to predict passes for {}: {}", norad_id, e);
            PassesResponse {
                success: false,
                passes: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    })
}

async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(match state.engine.category_summary().await {
        Ok(categories) => CategoriesResponse {
            success: true,
            categories,
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to summarize categories: {}", e);
            CategoriesResponse {
                success: false,
                categories: CategoryMap::default(),
                error: Some(e.to_string()),
            }
        }
    })
}

async fn refresh(State(state): State<AppState>) -> Json<MessageResponse> {
    Json(match state.engine.force_refresh().await {
        Ok(count) => MessageResponse {
            success: true,
            message: Some(format!("Refreshed {} satellites", count)),
            error: None,
        },
        Err(e) => {
            tracing::error!("Manual refresh failed: {}", e);
            MessageResponse {
                success: false,
                message: None,
                error: Some(e.to_string()),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Duration;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::module::tracking::testing::*;
    use crate::module::tracking::{CatalogStore, FixedClock, Ingestor, SourceGroup};

    const URL: &str = "http://one/a";

    fn app_with(source: FakeSource, factory: FakeFactory) -> Router {
        let clock = Arc::new(FixedClock::new(test_time()));
        let ingestor = Ingestor::new(
            Arc::new(source),
            Arc::new(factory),
            vec![SourceGroup::new("one", vec![URL.to_string()])],
            clock.clone(),
        );
        let store = CatalogStore::new(ingestor, clock.clone());
        router(TrackingEngine::new(store, clock, Duration::seconds(86_400)), true)
    }

    fn app() -> Router {
        app_with(
            FakeSource::new().body(
                URL,
                [
                    triplet("ISS (ZARYA)", ISS_LINE1, ISS_LINE2),
                    triplet("STARLINK-1007", STARLINK_LINE1, STARLINK_LINE2),
                ]
                .concat(),
            ),
            FakeFactory::default(),
        )
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_list_satellites() {
        let (status, body) = get_json(app(), "/api/satellites").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["satellites"].as_array().unwrap().len(), 2);
        assert_eq!(body["timestamp"], "2024-01-05T00:00:00.000000Z");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_list_satellites_without_catalog() {
        let app = app_with(FakeSource::new(), FakeFactory::failing(&[25544]));
        let (status, body) = get_json(app, "/api/satellites").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert!(body["satellites"].as_array().unwrap().is_empty());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_details() {
        let (status, body) = get_json(app(), "/api/satellite/25544").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["satellite"]["norad_id"], 25544);
        assert_eq!(body["satellite"]["category"], "ISS");
        assert_eq!(body["satellite"]["tle_data"]["line1"], ISS_LINE1);
    }

    #[tokio::test]
    async fn test_unknown_satellite_is_404() {
        let (status, body) = get_json(app(), "/api/satellite/12345").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "not found");
    }

    #[tokio::test]
    async fn test_orbit_path() {
        let (_, body) = get_json(app(), "/api/satellite/44713/orbit").await;
        assert_eq!(body["success"], true);
        assert_eq!(body["orbit"].as_array().unwrap().len(), 100);

        let (_, body) = get_json(app(), "/api/satellite/12345/orbit").await;
        assert_eq!(body["success"], true);
        assert!(body["orbit"].as_array().unwrap().is_empty());

        let (_, body) = get_json(app(), "/api/satellite/44713/orbit?hours=-1").await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());

        let (status, body) = get_json(app(), "/api/satellite/44713/orbit?hours=1e15").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["orbit"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_passes_default_observer() {
        let (status, body) = get_json(app(), "/api/satellite/25544/passes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["passes"].as_array().unwrap().is_empty());

        let (_, body) = get_json(app(), "/api/satellite/25544/passes?lat=45.5&lon=-73.6&alt=30").await;
        assert_eq!(body["success"], true);

        let (_, body) = get_json(app(), "/api/satellite/25544/passes?days=100000").await;
        assert_eq!(body["success"], false);
        assert!(body["passes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categories() {
        let (_, body) = get_json(app(), "/api/categories").await;
        assert_eq!(body["success"], true);
        assert_eq!(body["categories"]["ISS"]["count"], 1);
        assert_eq!(body["categories"]["Starlink"]["satellites"][0], 44713);
        assert_eq!(body["categories"]["Weather"]["count"], 0);
    }

    #[tokio::test]
    async fn test_refresh() {
        let (_, body) = get_json(app(), "/api/refresh").await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Refreshed 2 satellites");
    }
}
