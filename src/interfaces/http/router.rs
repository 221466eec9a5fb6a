//! API router with Swagger UI

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{Http, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, require_admin, AuthState};
use crate::interfaces::http::modules::{
    admin, auth, health, metrics, places, request_id, reservations,
};
use crate::interfaces::http::state::AppState;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        metrics::prometheus_metrics,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Smoking places
        places::list_places,
        places::get_place,
        // Reservations
        reservations::reserve,
        reservations::list_upcoming,
        reservations::list_mine,
        reservations::get_mine,
        reservations::replace_mine,
        reservations::delete_mine,
        // Admin: addresses and places
        admin::addresses::list_addresses,
        admin::addresses::create_address,
        admin::addresses::get_address,
        admin::addresses::put_address,
        admin::addresses::delete_address,
        admin::addresses::list_places,
        admin::addresses::create_place,
        admin::addresses::get_place,
        admin::addresses::put_place,
        admin::addresses::delete_place,
        // Admin: users
        admin::users::list_users,
        admin::users::get_user,
        admin::users::set_role,
        admin::users::delete_user,
        // Admin: reservations
        admin::reservations::list_reservations,
        admin::reservations::get_reservation,
        admin::reservations::put_reservation,
        admin::reservations::delete_reservation,
    ),
    components(
        schemas(
            ApiResponse<String>,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserDto,
            places::PlaceDto,
            reservations::ReservationRequest,
            reservations::ReplaceReservationRequest,
            reservations::AdminReservationRequest,
            reservations::ReservationDto,
            admin::AddressRequest,
            admin::AddressDto,
            admin::PlaceRequest,
            admin::AdminPlaceDto,
            admin::RoleRequest,
            health::HealthResponse,
            health::ComponentHealth,
            health::SchemaHealth,
            health::HealthStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database ping"),
        (name = "Authentication", description = "Registration, JWT login, current user"),
        (name = "Smoking Places", description = "Places with their current occupancy"),
        (name = "Reservations", description = "Booking and managing one's own reservations"),
        (name = "Admin: Addresses", description = "Address management"),
        (name = "Admin: Smoking Places", description = "Places on an address"),
        (name = "Admin: Users", description = "User listing, roles and deletion"),
        (name = "Admin: Reservations", description = "Reservations of every user"),
    ),
    info(
        title = "Smoking Places Reservation API",
        version = "1.0.0",
        description = "Short time-slot bookings of shared smoking places",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the full application router.
///
/// `metrics_handle` is the Prometheus handle from the installed recorder; without
/// it `/metrics` is not mounted.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_layer =
        middleware::from_fn_with_state(AuthState::from_ref(&state), auth_middleware);

    // Public
    let public_routes = Router::new()
        .route("/registration", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Any authenticated user
    let user_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/smoking-places", get(places::list_places))
        .route("/smoking-places/{sp_id}", get(places::get_place))
        .route(
            "/smoking-places/{sp_id}/reservation",
            post(reservations::reserve),
        )
        .route("/reservations", get(reservations::list_upcoming))
        .route(
            "/reservations/my-reservations",
            get(reservations::list_mine),
        )
        .route(
            "/reservations/my-reservations/{res_id}",
            get(reservations::get_mine)
                .put(reservations::replace_mine)
                .delete(reservations::delete_mine),
        )
        .route_layer(auth_layer.clone());

    // Admin only; auth runs first, then the role gate
    let admin_routes = Router::new()
        .route("/addresses", get(admin::addresses::list_addresses))
        .route(
            "/addresses/new-address",
            post(admin::addresses::create_address),
        )
        .route(
            "/addresses/{address_id}",
            get(admin::addresses::get_address)
                .put(admin::addresses::put_address)
                .delete(admin::addresses::delete_address),
        )
        .route(
            "/addresses/{address_id}/smoking-places",
            get(admin::addresses::list_places),
        )
        .route(
            "/addresses/{address_id}/smoking-places/new-smoking-place",
            post(admin::addresses::create_place),
        )
        .route(
            "/addresses/{address_id}/smoking-places/{sp_id}",
            get(admin::addresses::get_place)
                .put(admin::addresses::put_place)
                .delete(admin::addresses::delete_place),
        )
        .route("/users", get(admin::users::list_users))
        .route(
            "/users/{user_id}",
            get(admin::users::get_user)
                .patch(admin::users::set_role)
                .delete(admin::users::delete_user),
        )
        .route(
            "/reservations",
            get(admin::reservations::list_reservations),
        )
        .route(
            "/reservations/{res_id}",
            get(admin::reservations::get_reservation)
                .put(admin::reservations::put_reservation)
                .delete(admin::reservations::delete_reservation),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(auth_layer);

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .nest("/admin", admin_routes);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    // The request span is the innermost one, so the auth middleware can
    // record user_id on it.
    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
