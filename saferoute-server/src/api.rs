//! HTTP API handlers

use std::time::Duration;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Query, State},
    routing::{get, post},
};
use geojson::FeatureCollection;
use saferoute_core::{
    Meters, NodeId, RouteQuery, RouteReport, plan_route,
    model::HazardKind,
    parking::ParkingRisk,
    routing::{Criterion, RouteMode, seconds_to_minutes},
};
use serde::{Deserialize, Serialize};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{error::ApiError, state::AppState};

const MAX_PLACES: usize = 20;

/// Limits applied to every request
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub timeout: Duration,
    pub concurrency: usize,
}

/// Build the Axum router
pub fn build_router(state: AppState, limits: RequestLimits) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/health", get(health))
        .route("/route", post(route))
        .route("/route/geojson", post(route_geojson))
        .route("/nearest-node", post(nearest_node))
        .route("/places", get(places))
        .route("/hazards", get(hazards));

    with_limits(routes, limits)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Timeout, load shedding and a concurrency limit. `Router::layer` clones
/// the stack into every route, so the limit uses one semaphore shared by all
/// clones and bounds the whole router.
fn with_limits<S>(router: Router<S>, limits: RequestLimits) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .load_shed()
            .layer(GlobalConcurrencyLimitLayer::new(limits.concurrency))
            .timeout(limits.timeout),
    )
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else if err.is::<tower::load_shed::error::Overloaded>() {
        ApiError::Overloaded
    } else {
        error!("Unhandled middleware error: {err}");
        ApiError::Internal
    }
}

/// Runs a CPU-bound computation off the async executor. A panic inside
/// `task` becomes an internal error for this request only.
async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, saferoute_core::Error> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| {
            error!("Routing task failed: {err}");
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

// ============ Health ============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub nodes: usize,
    pub hazards: usize,
    pub parking: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        nodes: state.model.nodes().len(),
        hazards: state.model.hazards().len(),
        parking: state.model.parking().len(),
    })
}

// ============ Route ============

#[derive(Debug, Serialize)]
pub struct EndpointResponse {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub node: NodeId,
    pub snap_distance_m: Meters,
}

#[derive(Debug, Serialize)]
pub struct SegmentResponse {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: Meters,
    pub time: f64,
    pub flood_height: f64,
    pub flooded: bool,
}

#[derive(Debug, Serialize)]
pub struct ParkingResponse {
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
    pub is_underground: bool,
    pub distance_m: Meters,
    pub risk: ParkingRisk,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub origin: EndpointResponse,
    pub destination: EndpointResponse,
    pub criterion: Criterion,
    pub mode: RouteMode,
    pub path: Vec<NodeId>,
    pub total_distance: Meters,
    /// Seconds
    pub total_time: f64,
    pub total_time_minutes: f64,
    pub risky_edge_count: usize,
    pub risky_node_count: usize,
    pub penalized_edges: usize,
    pub subgraph_nodes: usize,
    pub subgraph_edges: usize,
    pub radius_m: Meters,
    pub segments: Vec<SegmentResponse>,
    pub nearest_parking: Option<ParkingResponse>,
}

impl From<RouteReport> for RouteResponse {
    fn from(report: RouteReport) -> Self {
        let endpoint = |resolved: &saferoute_core::ResolvedEndpoint| EndpointResponse {
            label: resolved.location.display_label(),
            lat: resolved.location.lat,
            lon: resolved.location.lon,
            node: resolved.node,
            snap_distance_m: resolved.snap_distance,
        };
        let route = report.route;

        Self {
            origin: endpoint(&report.origin),
            destination: endpoint(&report.destination),
            criterion: route.criterion,
            mode: route.mode,
            total_distance: route.total_distance,
            total_time: route.total_time,
            total_time_minutes: seconds_to_minutes(route.total_time),
            risky_edge_count: route.risky_edge_count,
            risky_node_count: route.risky_node_count,
            penalized_edges: report.penalized_edges,
            subgraph_nodes: report.subgraph_nodes,
            subgraph_edges: report.subgraph_edges,
            radius_m: report.radius,
            segments: route
                .segments
                .iter()
                .map(|segment| SegmentResponse {
                    from: segment.from,
                    to: segment.to,
                    distance: segment.distance,
                    time: segment.time,
                    flood_height: segment.flood_height,
                    flooded: segment.is_flooded(),
                })
                .collect(),
            path: route.path,
            nearest_parking: report.parking.map(|advice| ParkingResponse {
                lat: advice.facility.lat(),
                lon: advice.facility.lon(),
                name: advice.facility.name,
                is_underground: advice.facility.is_underground,
                distance_m: advice.distance_m,
                risk: advice.risk,
                message: advice.risk.message(),
            }),
        }
    }
}

async fn route(
    State(state): State<AppState>,
    Json(query): Json<RouteQuery>,
) -> Result<Json<RouteResponse>, ApiError> {
    let model = state.model.clone();
    let report = run_blocking(move || plan_route(&model, &query)).await?;
    info!(
        "Served route {} -> {} ({} nodes)",
        report.origin.node,
        report.destination.node,
        report.route.path.len()
    );
    Ok(Json(report.into()))
}

async fn route_geojson(
    State(state): State<AppState>,
    Json(query): Json<RouteQuery>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let model = state.model.clone();
    let collection =
        run_blocking(move || plan_route(&model, &query).and_then(|report| report.route.to_geojson()))
            .await?;
    Ok(Json(collection))
}

// ============ Nearest node ============

#[derive(Debug, Deserialize)]
pub struct NearestNodeRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct NearestNodeResponse {
    pub node: NodeId,
    pub lat: f64,
    pub lon: f64,
    pub distance_m: Meters,
}

async fn nearest_node(
    State(state): State<AppState>,
    Json(req): Json<NearestNodeRequest>,
) -> Result<Json<NearestNodeResponse>, ApiError> {
    let location = saferoute_core::model::Location::new(req.lat, req.lon);
    if !location.is_valid() {
        return Err(ApiError::BadRequest(format!(
            "coordinates out of range: {}, {}",
            req.lat, req.lon
        )));
    }

    let (id, distance_m) = state.model.resolve(req.lat, req.lon)?;
    let node = state.model.node(id)?;
    Ok(Json(NearestNodeResponse {
        node: id,
        lat: node.lat(),
        lon: node.lon(),
        distance_m,
    }))
}

// ============ Places ============

#[derive(Debug, Deserialize)]
pub struct PlacesQuery {
    #[serde(default)]
    pub q: String,
}

async fn places(
    State(state): State<AppState>,
    Query(query): Query<PlacesQuery>,
) -> Json<Vec<saferoute_core::model::Location>> {
    Json(state.search_places(&query.q, MAX_PLACES))
}

// ============ Hazards ============

#[derive(Debug, Serialize)]
pub struct HazardResponse {
    pub kind: HazardKind,
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

async fn hazards(State(state): State<AppState>) -> Json<Vec<HazardResponse>> {
    Json(
        state
            .model
            .hazards()
            .iter()
            .map(|hazard| HazardResponse {
                kind: hazard.kind,
                label: hazard.label.clone(),
                lat: hazard.lat(),
                lon: hazard.lon(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use saferoute_core::{
        RoutingConfig, RoutingModel,
        loading::{EdgeSource, NodeStore},
        model::{Edge, HazardPoint, Location, Node, ParkingFacility},
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let nodes = NodeStore::from_nodes([
            Node::new(1, 0.0, 0.0),
            Node::new(2, 0.0, 0.001),
            Node::new(3, 0.0, 0.002),
            Node::new(4, 1.0, 1.0),
        ]);
        let edges = EdgeSource::from_edges(vec![
            Edge::new(1, 2, 100.0, 10.0, 1.0, 0.0),
            Edge::new(2, 3, 100.0, 10.0, 1.0, 0.5),
        ]);
        let hazards = vec![HazardPoint::new(0.0005, 0.001, HazardKind::Incident, "Incident (alto)")];
        let parking = vec![ParkingFacility::new(0.0001, 0.002, false)];
        let model =
            RoutingModel::new(nodes, edges, hazards, parking, RoutingConfig::default()).unwrap();
        let places = vec![
            Location::labelled("Estación del Norte, Valencia", 39.4667, -0.3775),
            Location::labelled("Puerto de Valencia", 39.4489, -0.3233),
        ];
        build_router(
            AppState::new(model, places),
            RequestLimits {
                timeout: Duration::from_secs(5),
                concurrency: 4,
            },
        )
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn route_reports_penalized_totals() {
        let (status, body) = send(post(
            "/route",
            json!({
                "origin": {"label": "Casa", "lat": 0.0, "lon": 0.0},
                "destination": {"lat": 0.0, "lon": 0.002},
                "criterion": "distancia"
            }),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], json!([1, 2, 3]));
        assert_eq!(body["total_distance"], json!(300.0));
        assert_eq!(body["risky_edge_count"], json!(1));
        assert_eq!(body["mode"], json!("directed_weighted"));
        assert_eq!(body["origin"]["label"], json!("Casa"));
        assert_eq!(body["destination"]["label"], json!("0.00000, 0.00200"));
        assert_eq!(body["nearest_parking"]["risk"], json!("surface"));
    }

    #[tokio::test]
    async fn disconnected_route_is_not_found() {
        let (status, body) = send(post(
            "/route",
            json!({
                "origin": {"lat": 0.0, "lon": 0.0},
                "destination": {"lat": 1.0, "lon": 1.0}
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("No route found between the selected points"));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_bad_requests() {
        let (status, _) = send(post("/nearest-node", json!({"lat": 120.0, "lon": 0.0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(post(
            "/route",
            json!({
                "origin": {"lat": 0.0, "lon": 200.0},
                "destination": {"lat": 0.0, "lon": 0.0}
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn nearest_node_snaps_to_graph() {
        let (status, body) = send(post("/nearest-node", json!({"lat": 0.0, "lon": 0.0011}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["node"], json!(2));
        assert!(body["distance_m"].as_f64().unwrap() < 20.0);
    }

    #[tokio::test]
    async fn geojson_route_has_flagged_segments() {
        let (status, body) = send(post(
            "/route/geojson",
            json!({
                "origin": {"lat": 0.0, "lon": 0.0},
                "destination": {"lat": 0.0, "lon": 0.002}
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], json!("FeatureCollection"));
        let features = body["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[1]["properties"]["flooded"], json!(true));
    }

    #[tokio::test]
    async fn places_are_searched_case_insensitively() {
        let (status, body) = send(get("/places?q=valencia")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(get("/places?q=PUERTO")).await;
        assert_eq!(body[0]["label"], json!("Puerto de Valencia"));

        let (_, body) = send(get("/places?q=madrid")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn concurrency_limit_spans_all_routes() {
        let (entered_tx, entered_rx) = tokio::sync::oneshot::channel::<()>();
        let entered_tx = Arc::new(Mutex::new(Some(entered_tx)));
        let release = Arc::new(Notify::new());

        let slow = {
            let release = release.clone();
            move || {
                let release = release.clone();
                let entered_tx = entered_tx.clone();
                async move {
                    if let Some(tx) = entered_tx.lock().unwrap().take() {
                        let _ = tx.send(());
                    }
                    release.notified().await;
                    "slow"
                }
            }
        };
        let app = with_limits(
            Router::new()
                .route("/slow", axum::routing::get(slow))
                .route("/fast", axum::routing::get(|| async { "fast" })),
            RequestLimits {
                timeout: Duration::from_secs(5),
                concurrency: 1,
            },
        );

        let first = tokio::spawn(app.clone().oneshot(get("/slow")));
        entered_rx.await.unwrap();

        // the only permit is held by /slow
        let response = app.clone().oneshot(get("/fast")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        release.notify_one();
        assert_eq!(first.await.unwrap().unwrap().status(), StatusCode::OK);

        let response = app.oneshot(get("/fast")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn hazards_and_health() {
        let (status, body) = send(get("/hazards")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["kind"], json!("incident"));

        let (_, body) = send(get("/health")).await;
        assert_eq!(body["nodes"], json!(4));
        assert_eq!(body["status"], json!("ok"));
    }
}
