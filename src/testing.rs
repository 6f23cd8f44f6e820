//! Fixtures shared by the unit and router tests.
//!
//! Every test gets its own SQLite file with two users and one movie:
//! `test`/`test` (user 1, not admin), `other`/`other` (user 2, admin) and
//! movie 1 added by `test`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;

use crate::{
    app::build_app,
    auth::{
        password::hash_password,
        session::{Session, SessionKeys, SESSION_COOKIE},
    },
    config::AppConfig,
    db,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";

pub struct TestDb {
    pub db: SqlitePool,
    pub dir: TempDir,
}

pub async fn seeded_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = db::connect(&dir.path().join("test.sqlite"))
        .await
        .expect("open test database");
    db::init_schema(&db).await.expect("init schema");

    for (username, email, password, is_admin) in [
        ("test", "test@example.com", "test", false),
        ("other", "other@imdb.com", "other", true),
    ] {
        sqlx::query("INSERT INTO user (username, email, password, is_admin) VALUES (?, ?, ?, ?)")
            .bind(username)
            .bind(email)
            .bind(hash_password(password).unwrap())
            .bind(is_admin)
            .execute(&db)
            .await
            .unwrap();
    }
    sqlx::query(
        "INSERT INTO movie (movie_title, plot, created, added_by) \
         VALUES ('test title', 'test plot', '2018-01-01 00:00:00', 1)",
    )
    .execute(&db)
    .await
    .unwrap();

    TestDb { db, dir }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// Drives the full router and carries the session cookie between requests
/// the way a browser would.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    cookie: Option<String>,
    _db: TestDb,
}

impl TestApp {
    pub async fn new() -> Self {
        let test_db = seeded_db().await;
        let config = AppConfig::with_database(test_db.dir.path().join("test.sqlite"), TEST_SECRET);
        let state = AppState::from_parts(test_db.db.clone(), Arc::new(config));
        Self {
            router: build_app(state.clone()),
            state,
            cookie: None,
            _db: test_db,
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, Body::empty()).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.send(Method::POST, path, Body::from(body)).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/auth/login", &[("username", username), ("password", password)])
            .await
    }

    pub async fn logout(&mut self) -> TestResponse {
        self.get("/auth/logout").await
    }

    /// The session the client currently holds.
    pub fn session(&self) -> Session {
        let keys = SessionKeys::new(&self.state.config.session);
        match &self.cookie {
            Some(token) => keys.verify(token).expect("client holds a valid session"),
            None => Session::default(),
        }
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(&self.state.db).await.unwrap()
    }

    async fn send(&mut self, method: Method, path: &str, body: Body) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = &self.cookie {
            req = req.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        let req = req
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .unwrap();

        let res = self.router.clone().oneshot(req).await.unwrap();

        for set_cookie in res.headers().get_all(header::SET_COOKIE) {
            let raw = set_cookie.to_str().unwrap();
            let pair = raw.split(';').next().unwrap_or_default();
            if let Some(value) = pair.strip_prefix(&format!("{SESSION_COOKIE}=")) {
                self.cookie = (!value.is_empty()).then(|| value.to_string());
            }
        }

        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
