//! End-to-end tests of the router against an in-memory database

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::AUTHENTICATE_REALM;
use super::{create_router, AppState};
use crate::application::testing::{at, seed_place, TestEnv};
use crate::application::{CatalogService, NewUser, ReservationService, UserService};
use crate::domain::{Clock, UserRole};
use crate::infrastructure::crypto::jwt::JwtConfig;

const PASSWORD: &str = "password1";

struct TestApp {
    env: TestEnv,
    users: Arc<UserService>,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let env = TestEnv::new(at(9, 0)).await;
        let clock: Arc<dyn Clock> = env.clock.clone();
        let users = Arc::new(UserService::new(
            env.repos.clone(),
            JwtConfig::new("test-secret", 1),
            4,
        ));
        let state = AppState {
            catalog: Arc::new(CatalogService::new(env.repos.clone(), clock.clone())),
            reservations: Arc::new(ReservationService::new(env.repos.clone(), clock)),
            users: users.clone(),
            db: env.db.clone(),
            started_at: Arc::new(Instant::now()),
        };
        Self {
            router: create_router(state, None),
            env,
            users,
        }
    }

    async fn user(&self, username: &str) -> i32 {
        self.users
            .register(NewUser {
                username: username.to_string(),
                password: PASSWORD.to_string(),
                name: username.to_string(),
                email: format!("{}@example.com", username),
            })
            .await
            .unwrap()
            .id
    }

    async fn admin(&self, username: &str) -> i32 {
        let id = self.user(username).await;
        self.users.set_role(id, UserRole::Admin).await.unwrap();
        id
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<String>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

fn basic(username: &str) -> Option<String> {
    Some(format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, PASSWORD))
    ))
}

fn slot_body(start: &str, end: &str) -> Value {
    json!({ "start": start, "end": end })
}

// ── Authentication ──────────────────────────────────────────────

#[tokio::test]
async fn missing_credentials_get_basic_challenge() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/api/v1/smoking-places")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        AUTHENTICATE_REALM
    );
}

#[tokio::test]
async fn wrong_password_is_401() {
    let app = TestApp::new().await;
    app.user("alice").await;

    let auth = Some(format!("Basic {}", STANDARD.encode("alice:nope")));
    let (status, body) = app.send(Method::GET, "/api/v1/auth/me", auth, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "You are not authorized");
}

#[tokio::test]
async fn registered_user_can_use_basic_auth() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/registration",
            None,
            Some(json!({
                "username": "bob",
                "password": PASSWORD,
                "name": "Bob",
                "email": "bob@example.com"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "user");

    let (status, body) = app
        .send(Method::GET, "/api/v1/auth/me", basic("bob"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "bob");
}

#[tokio::test]
async fn short_password_is_rejected_on_its_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/registration",
            None,
            Some(json!({
                "username": "bob",
                "password": "short",
                "name": "Bob",
                "email": "bob@example.com"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "password");
}

#[tokio::test]
async fn duplicate_username_is_409() {
    let app = TestApp::new().await;
    app.user("bob").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/registration",
            None,
            Some(json!({
                "username": "bob",
                "password": PASSWORD,
                "name": "Other Bob",
                "email": "bob2@example.com"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_token_authenticates_as_bearer() {
    let app = TestApp::new().await;
    app.user("carol").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "carol", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let (status, body) = app
        .send(
            Method::GET,
            "/api/v1/auth/me",
            Some(format!("Bearer {}", token)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "carol");
}

// ── Reservations ────────────────────────────────────────────────

#[tokio::test]
async fn reservation_is_created_and_occupies_the_place() {
    let app = TestApp::new().await;
    app.user("alice").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/smoking-places/{}/reservation", place),
            basic("alice"),
            Some(slot_body("2030-05-01T10:00:00", "2030-05-01T10:30:00")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["sp_number"], 1);
    assert_eq!(body["data"]["street"], "Tverskaya");
    assert!(body["data"]["reservation_id"].is_i64());

    app.env.clock.set(at(10, 15));
    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/smoking-places/{}", place),
            basic("alice"),
            None,
        )
        .await;
    assert_eq!(body["data"]["status"], "occupied until 2030-05-01 10:30:00");

    app.env.clock.set(at(10, 31));
    let (_, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/smoking-places/{}", place),
            basic("alice"),
            None,
        )
        .await;
    assert_eq!(body["data"]["status"], "free");
}

#[tokio::test]
async fn past_start_is_rejected_on_start_field() {
    let app = TestApp::new().await;
    app.user("alice").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/smoking-places/{}/reservation", place),
            basic("alice"),
            Some(slot_body("2030-05-01T08:00:00", "2030-05-01T08:20:00")),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "start");
    assert_eq!(
        body["error"],
        "The entered time must be greater than the current one"
    );
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = TestApp::new().await;
    app.user("alice").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/v1/smoking-places/{}/reservation", place))
        .header(header::AUTHORIZATION, basic("alice").unwrap())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"start\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overlapping_reservation_is_a_conflict() {
    let app = TestApp::new().await;
    app.user("alice").await;
    app.user("bob").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;
    let uri = format!("/api/v1/smoking-places/{}/reservation", place);

    let (status, _) = app
        .send(
            Method::POST,
            &uri,
            basic("alice"),
            Some(slot_body("2030-05-01T10:00:00", "2030-05-01T10:30:00")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            Method::POST,
            &uri,
            basic("bob"),
            Some(slot_body("2030-05-01T10:15:00", "2030-05-01T10:45:00")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "The reservation for the entered time already exists"
    );
    assert!(body.get("field").is_none());
}

#[tokio::test]
async fn reserving_unknown_place_is_404() {
    let app = TestApp::new().await;
    app.user("alice").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/smoking-places/999/reservation",
            basic("alice"),
            Some(slot_body("2030-05-01T10:00:00", "2030-05-01T10:30:00")),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn foreign_reservation_cannot_be_deleted() {
    let app = TestApp::new().await;
    app.user("alice").await;
    app.user("bob").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;

    let (_, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/smoking-places/{}/reservation", place),
            basic("alice"),
            Some(slot_body("2030-05-01T10:00:00", "2030-05-01T10:30:00")),
        )
        .await;
    let id = body["data"]["reservation_id"].as_i64().unwrap();
    let uri = format!("/api/v1/reservations/my-reservations/{}", id);

    let (status, _) = app.send(Method::DELETE, &uri, basic("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::GET, &uri, basic("alice"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::DELETE, &uri, basic("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn own_reservation_is_replaced_by_location() {
    let app = TestApp::new().await;
    app.user("alice").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;
    seed_place(&app.env, "Tverskaya", 2).await;

    let (_, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/smoking-places/{}/reservation", place),
            basic("alice"),
            Some(slot_body("2030-05-01T10:00:00", "2030-05-01T10:30:00")),
        )
        .await;
    let id = body["data"]["reservation_id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/reservations/my-reservations/{}", id),
            basic("alice"),
            Some(json!({
                "sp_number": 2,
                "city": "Moscow",
                "street": "Tverskaya",
                "start": "2030-05-01T10:10:00",
                "end": "2030-05-01T10:40:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sp_number"], 2);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/v1/reservations/my-reservations/{}", id),
            basic("alice"),
            Some(json!({
                "sp_number": 7,
                "city": "Moscow",
                "street": "Tverskaya",
                "start": "2030-05-01T10:10:00",
                "end": "2030-05-01T10:40:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You entered the wrong address");
}

#[tokio::test]
async fn listings_show_owner_only_across_users() {
    let app = TestApp::new().await;
    app.user("alice").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;

    app.send(
        Method::POST,
        &format!("/api/v1/smoking-places/{}/reservation", place),
        basic("alice"),
        Some(slot_body("2030-05-01T10:00:00", "2030-05-01T10:30:00")),
    )
    .await;

    let (_, all) = app
        .send(Method::GET, "/api/v1/reservations", basic("alice"), None)
        .await;
    assert_eq!(all["data"][0]["username"], "alice");

    let (_, mine) = app
        .send(
            Method::GET,
            "/api/v1/reservations/my-reservations",
            basic("alice"),
            None,
        )
        .await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
    assert!(mine["data"][0].get("username").is_none());
}

// ── Admin ───────────────────────────────────────────────────────

#[tokio::test]
async fn admin_routes_are_forbidden_for_users() {
    let app = TestApp::new().await;
    app.user("alice").await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/admin/users", basic("alice"), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");
}

#[tokio::test]
async fn admin_manages_addresses_and_places() {
    let app = TestApp::new().await;
    app.admin("root").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/admin/addresses/new-address",
            basic("root"),
            Some(json!({ "city": "Moscow", "street": "Arbat" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let address_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/admin/addresses/new-address",
            basic("root"),
            Some(json!({ "city": "Moscow", "street": "Arbat" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let places_uri = format!("/api/v1/admin/addresses/{}/smoking-places", address_id);
    let (status, _) = app
        .send(
            Method::POST,
            &format!("{}/new-smoking-place", places_uri),
            basic("root"),
            Some(json!({ "number": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("{}/40", places_uri),
            basic("root"),
            Some(json!({ "number": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 40);

    let (_, body) = app
        .send(Method::GET, "/api/v1/admin/addresses", basic("root"), None)
        .await;
    assert_eq!(body["data"][0]["sp_amount"], 2);

    let (_, body) = app.send(Method::GET, &places_uri, basic("root"), None).await;
    assert_eq!(body["data"][0]["status"], "free");

    let address_uri = format!("/api/v1/admin/addresses/{}", address_id);
    let (status, _) = app
        .send(Method::DELETE, &address_uri, basic("root"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &address_uri, basic("root"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_put_reservation_creates_then_replaces() {
    let app = TestApp::new().await;
    app.admin("root").await;
    let alice = app.user("alice").await;
    let place = seed_place(&app.env, "Tverskaya", 1).await;

    let body = json!({
        "smoking_place_id": place,
        "user_id": alice,
        "start": "2030-05-01T10:00:00",
        "end": "2030-05-01T10:30:00"
    });

    let (status, created) = app
        .send(
            Method::PUT,
            "/api/v1/admin/reservations/50",
            basic("root"),
            Some(body.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["reservation_id"], 50);
    assert_eq!(created["data"]["username"], "alice");

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/v1/admin/reservations/50",
            basic("root"),
            Some(body),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_role_change_validates_role() {
    let app = TestApp::new().await;
    app.admin("root").await;
    let alice = app.user("alice").await;
    let uri = format!("/api/v1/admin/users/{}", alice);

    let (status, body) = app
        .send(
            Method::PATCH,
            &uri,
            basic("root"),
            Some(json!({ "role": "superuser" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "role");

    let (status, body) = app
        .send(
            Method::PATCH,
            &uri,
            basic("root"),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn admin_cannot_delete_admins() {
    let app = TestApp::new().await;
    let root = app.admin("root").await;

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/admin/users/{}", root),
            basic("root"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ── Ambient routes ──────────────────────────────────────────────

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::GET, "/api-docs/openapi.json", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]
        .get("/api/v1/smoking-places/{sp_id}/reservation")
        .is_some());
}
