//! API routes

use crate::api::handlers::{
    create_user, delete_user, ean13, health_check, list_users, preview_label, AppState,
};
use crate::auth::handlers::{login, logout, me};
use crate::auth::middleware::{authenticate, require_admin};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/health", get(health_check));

    // Admin-only routes; `require_admin` reads the user `authenticate` attached
    let admin_routes = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/:id", delete(delete_user))
        .route_layer(middleware::from_fn(require_admin));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/barcodes/ean13", post(ean13))
        .route("/api/labels/preview", post(preview_label))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public_routes.merge(protected_routes).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::SpanUserId;
    use crate::auth::bootstrap::ensure_default_admin;
    use crate::auth::password::{hash_password, MIN_BCRYPT_COST};
    use crate::auth::session::AuthSettings;
    use crate::db::models::{NewUser, Role};
    use crate::db::repository::{Repository, UserRepository};
    use crate::db::DatabaseManager;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    struct TestApp {
        router: Router,
        repo: Arc<UserRepository>,
        _dir: TempDir,
    }

    async fn setup() -> TestApp {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(
            DatabaseManager::new(&dir.path().join("test.db"), 2, Duration::from_millis(1000)).unwrap(),
        );
        let repo = Arc::new(UserRepository::new(db));
        ensure_default_admin(&repo, MIN_BCRYPT_COST).await.unwrap();

        let state = AppState {
            user_repo: repo.clone(),
            auth: Arc::new(AuthSettings::new(
                "route-test-secret",
                chrono::Duration::days(7),
                false,
                MIN_BCRYPT_COST,
            )),
        };

        TestApp {
            router: build_api_routes(state),
            repo,
            _dir: dir,
        }
    }

    async fn send(app: &TestApp, request: Request<Body>) -> Response {
        app.router.clone().oneshot(request).await.unwrap()
    }

    fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Log in and return the `session=...` pair for the Cookie header
    async fn login_as(app: &TestApp, login: &str, password: &str) -> String {
        let response = send(
            app,
            json_request("POST", "/api/auth/login", None, json!({ "login": login, "password": password })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn create_plain_user(app: &TestApp, login: &str) -> i64 {
        app.repo
            .create(&NewUser {
                login: login.to_string(),
                password_hash: hash_password("pw", MIN_BCRYPT_COST).unwrap(),
                role: Role::User,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_returns_sanitized_user() {
        let app = setup().await;

        let response = send(
            &app,
            json_request("POST", "/api/auth/login", None, json!({ "login": "admin", "password": "123456" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.starts_with("session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));

        let body = body_json(response).await;
        assert_eq!(body["user"]["login"], "admin");
        assert_eq!(body["user"]["role"], "admin");
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_login_look_the_same() {
        let app = setup().await;

        for (login, password) in [("admin", "nope"), ("ghost", "123456")] {
            let response = send(
                &app,
                json_request("POST", "/api/auth/login", None, json!({ "login": login, "password": password })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert!(response.headers().get(header::SET_COOKIE).is_none());
            assert_eq!(body_json(response).await, json!({ "error": "INVALID_CREDENTIALS" }));
        }
    }

    #[tokio::test]
    async fn test_login_rejects_bad_input() {
        let app = setup().await;

        let response = send(&app, json_request("POST", "/api/auth/login", None, json!({ "login": "admin" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "INVALID_INPUT" }));

        let malformed = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = send(&app, malformed).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "INVALID_INPUT" }));
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let app = setup().await;

        let response = send(&app, empty_request("GET", "/api/auth/me", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "UNAUTHORIZED" }));

        let response = send(&app, empty_request("GET", "/api/auth/me", Some("session=garbage"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let cookie = login_as(&app, "admin", "123456").await;
        let response = send(&app, empty_request("GET", "/api/auth/me", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["user"]["login"], "admin");
    }

    #[tokio::test]
    async fn test_authenticated_response_carries_user_id() {
        let app = setup().await;
        let admin = app.repo.find_by_login("admin").await.unwrap().unwrap();
        let cookie = login_as(&app, "admin", "123456").await;

        let response = send(&app, empty_request("GET", "/api/auth/me", Some(&cookie))).await;
        assert_eq!(response.extensions().get::<SpanUserId>(), Some(&SpanUserId(admin.id)));

        let response = send(&app, empty_request("GET", "/api/health", None)).await;
        assert!(response.extensions().get::<SpanUserId>().is_none());
    }

    #[tokio::test]
    async fn test_login_trims_surrounding_whitespace() {
        let app = setup().await;
        let cookie = login_as(&app, "  admin ", "123456").await;

        let response = send(&app, empty_request("GET", "/api/auth/me", Some(&cookie))).await;
        assert_eq!(body_json(response).await["user"]["login"], "admin");
    }

    #[tokio::test]
    async fn test_unknown_login_pays_bcrypt_cost() {
        let dir = TempDir::new().unwrap();
        let db = Arc::new(
            DatabaseManager::new(&dir.path().join("timing.db"), 2, Duration::from_millis(1000)).unwrap(),
        );
        let state = AppState {
            user_repo: Arc::new(UserRepository::new(db)),
            auth: Arc::new(AuthSettings::new("timing-secret", chrono::Duration::days(7), false, 10)),
        };
        let router = build_api_routes(state);

        let started = std::time::Instant::now();
        let response = router
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({ "login": "ghost", "password": "123456" }),
            ))
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "INVALID_CREDENTIALS" }));
        // A cost-10 bcrypt verify takes tens of milliseconds, a bare lookup well under one
        assert!(elapsed >= Duration::from_millis(10), "unknown login took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_bearer_token_is_accepted() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;
        let token = cookie.trim_start_matches("session=");

        let request = Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, request).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_of_deleted_user_is_rejected() {
        let app = setup().await;
        let id = create_plain_user(&app, "temp").await;
        let cookie = login_as(&app, "temp", "pw").await;

        assert!(app.repo.delete(id).await.unwrap());

        let response = send(&app, empty_request("GET", "/api/auth/me", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = setup().await;

        let response = send(&app, empty_request("POST", "/api/auth/logout", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.contains("Max-Age=0"));
        assert_eq!(body_json(response).await, json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_user_management_requires_admin() {
        let app = setup().await;
        create_plain_user(&app, "bob").await;
        let cookie = login_as(&app, "bob", "pw").await;

        let response = send(&app, empty_request("GET", "/api/users", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await, json!({ "error": "FORBIDDEN" }));

        let response = send(&app, empty_request("GET", "/api/users", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_creates_and_lists_users() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;

        let response = send(
            &app,
            json_request("POST", "/api/users", Some(&cookie), json!({ "login": "carol", "password": "pw" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["user"]["login"], "carol");
        assert_eq!(created["user"]["role"], "user");

        let response = send(&app, empty_request("GET", "/api/users", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let logins: Vec<&str> = body["users"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["login"].as_str().unwrap())
            .collect();
        assert_eq!(logins, vec!["admin", "carol"]);
        assert!(body["users"][0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_login_conflicts_without_new_row() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;

        let response = send(
            &app,
            json_request("POST", "/api/users", Some(&cookie), json!({ "login": "admin", "password": "x", "role": "admin" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await, json!({ "error": "LOGIN_ALREADY_EXISTS" }));
        assert_eq!(app.repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;

        let response = send(
            &app,
            json_request("POST", "/api/users", Some(&cookie), json!({ "login": "  ", "password": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "INVALID_INPUT" }));
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;
        let admin = app.repo.find_by_login("admin").await.unwrap().unwrap();

        let response = send(
            &app,
            empty_request("DELETE", &format!("/api/users/{}", admin.id), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "CANNOT_DELETE_SELF" }));
        assert!(app.repo.find_by_id(admin.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_admin_deletes_other_user() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;
        let id = create_plain_user(&app, "dave").await;

        let uri = format!("/api/users/{}", id);
        let response = send(&app, empty_request("DELETE", &uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));

        let response = send(&app, empty_request("DELETE", &uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "NOT_FOUND" }));

        let response = send(&app, empty_request("DELETE", "/api/users/abc", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = setup().await;

        let response = send(&app, empty_request("GET", "/api/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_ean13_endpoint() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;

        let response = send(
            &app,
            json_request("POST", "/api/barcodes/ean13", Some(&cookie), json!({ "value": "4006-3813-3393" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "ean13": "4006381333931", "check_digit": 1, "passthrough": false, "valid": true })
        );

        let response = send(
            &app,
            json_request("POST", "/api/barcodes/ean13", None, json!({ "value": "1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_label_preview_endpoint() {
        let app = setup().await;
        let cookie = login_as(&app, "admin", "123456").await;

        let document = json!({
            "canvas": { "width": 10, "height": 200 },
            "elements": [
                { "type": "text", "id": "t", "text": "{{name}} {{ price }}", "rotation": 450 },
                { "type": "barcode", "id": "b", "value": "{{sku}}" }
            ]
        });
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/labels/preview",
                Some(&cookie),
                json!({ "document": document, "values": { "name": "Tea", "sku": "590123412345" } }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["placeholders"], json!(["name", "price", "sku"]));
        assert_eq!(body["unresolved"], json!(["price"]));
        assert_eq!(body["document"]["canvas"]["width"], 50.0);
        assert_eq!(body["document"]["elements"][0]["text"], "Tea {{ price }}");
        assert_eq!(body["document"]["elements"][0]["rotation"], 90.0);
        assert_eq!(body["document"]["elements"][1]["value"], "5901234123457");

        let response = send(
            &app,
            json_request(
                "POST",
                "/api/labels/preview",
                Some(&cookie),
                json!({ "document": { "elements": [{ "type": "ellipse" }] } }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "INVALID_INPUT" }));
    }
}
