//! In-process fake of the institute backend for integration tests

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put, MethodRouter};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use institute_admin::config::ApiConfig;

pub const COURSES: &str = "courses";
pub const BLOGS: &str = "blogs";
pub const NEWS: &str = "news";
pub const USERS: &str = "users";

#[derive(Default)]
struct FakeDb {
    collections: Mutex<HashMap<&'static str, Vec<Value>>>,
    next_id: AtomicU64,
    failing: AtomicBool,
    list_queries: Mutex<Vec<HashMap<String, String>>>,
}

type Db = Arc<FakeDb>;

impl FakeDb {
    fn failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }

    fn with<T>(&self, collection: &'static str, f: impl FnOnce(&mut Vec<Value>) -> T) -> T {
        let mut collections = self.collections.lock().unwrap();
        f(collections.entry(collection).or_default())
    }
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "Internal Server Error" })))
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response()
}

fn list_route(collection: &'static str, field: &'static str) -> MethodRouter<Db> {
    get(
        move |State(db): State<Db>, Query(query): Query<HashMap<String, String>>| async move {
            if db.failing() {
                return server_error();
            }
            db.list_queries.lock().unwrap().push(query.clone());

            let records = db.with(collection, |records| records.clone());
            let page = query.get("page").and_then(|p| p.parse::<usize>().ok());
            let limit = query.get("limit").and_then(|l| l.parse::<usize>().ok());
            let records: Vec<Value> = match (page, limit) {
                (Some(page), Some(limit)) => records
                    .into_iter()
                    .skip(page.saturating_sub(1) * limit)
                    .take(limit)
                    .collect(),
                _ => records,
            };

            let mut body = Map::new();
            body.insert("message".to_string(), json!("ok"));
            body.insert(field.to_string(), Value::Array(records));
            Json(Value::Object(body)).into_response()
        },
    )
}

/// `wrap` decides whether the created record is sent under `data` or bare
fn create_route(collection: &'static str, wrap: bool) -> MethodRouter<Db> {
    post(move |State(db): State<Db>, Json(mut body): Json<Value>| async move {
        if db.failing() {
            return server_error();
        }
        let id = format!("{}{}", &collection[..1], db.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        body["_id"] = json!(id);
        body["createdAt"] = json!("2025-01-15T09:00:00.000Z");
        db.with(collection, |records| records.push(body.clone()));

        let response = if wrap {
            json!({ "message": "created", "data": body })
        } else {
            body
        };
        (StatusCode::CREATED, Json(response)).into_response()
    })
}

fn update_route(collection: &'static str) -> MethodRouter<Db> {
    put(
        move |State(db): State<Db>, Path(id): Path<String>, Json(body): Json<Value>| async move {
            if db.failing() {
                return server_error();
            }
            let updated = db.with(collection, |records| {
                let record = records.iter_mut().find(|r| r["_id"] == json!(id))?;
                if let (Some(target), Some(fields)) = (record.as_object_mut(), body.as_object()) {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
                Some(record.clone())
            });
            match updated {
                Some(record) => Json(json!({ "message": "updated", "data": record })).into_response(),
                None => not_found(),
            }
        },
    )
}

fn delete_route(collection: &'static str) -> MethodRouter<Db> {
    delete(move |State(db): State<Db>, Path(id): Path<String>| async move {
        if db.failing() {
            return server_error();
        }
        let removed = db.with(collection, |records| {
            let before = records.len();
            records.retain(|r| r["_id"] != json!(id));
            records.len() != before
        });
        if removed {
            Json(json!({ "message": "deleted" })).into_response()
        } else {
            not_found()
        }
    })
}

fn count_route(collection: &'static str) -> MethodRouter<Db> {
    get(move |State(db): State<Db>| async move {
        if db.failing() {
            return server_error();
        }
        let count = db.with(collection, |records| records.len());
        Json(json!({ "count": count })).into_response()
    })
}

fn is_active(record: &Value) -> bool {
    record["activeStatus"].as_bool().unwrap_or(true)
}

async fn course_status_count(State(db): State<Db>) -> Response {
    if db.failing() {
        return server_error();
    }
    let (active, inactive) = db.with(COURSES, |records| {
        let active = records.iter().filter(|r| is_active(r)).count();
        (active, records.len() - active)
    });
    Json(json!({ "data": { "activeCourses": active, "inactiveCourses": inactive } })).into_response()
}

async fn toggle_course(State(db): State<Db>, Path(id): Path<String>) -> Response {
    if db.failing() {
        return server_error();
    }
    let toggled = db.with(COURSES, |records| {
        let record = records.iter_mut().find(|r| r["_id"] == json!(id))?;
        let next = !is_active(record);
        record["activeStatus"] = json!(next);
        Some(next)
    });
    match toggled {
        Some(active) => Json(json!({ "message": "toggled", "activeStatus": active })).into_response(),
        None => not_found(),
    }
}

fn router(db: Db) -> Router {
    Router::new()
        .route("/courseapi/courses", list_route(COURSES, "courseData"))
        .route("/courseapi/course", create_route(COURSES, true))
        .route("/courseapi/update/course/{id}", update_route(COURSES))
        .route("/courseapi/delete/course/{id}", delete_route(COURSES))
        .route("/courseapi/course-status-count", get(course_status_count))
        .route("/courseapi/toggle-status/{id}", patch(toggle_course))
        .route("/blogapi/blogs", list_route(BLOGS, "blogData"))
        .route("/blogapi/blogs/count", count_route(BLOGS))
        .route("/blogapi/blog", create_route(BLOGS, true))
        .route("/blogapi/update/blog/{id}", update_route(BLOGS))
        .route("/blogapi/blog/{id}", delete_route(BLOGS))
        .route("/newsapi/news/all", list_route(NEWS, "newsData"))
        .route("/newsapi/news/count", count_route(NEWS))
        .route("/newsapi/news", create_route(NEWS, false))
        .route("/newsapi/update/news/{id}", update_route(NEWS))
        .route("/newsapi/delete/news/{id}", delete_route(NEWS))
        .route("/api/users", list_route(USERS, "userData"))
        .route("/api/users/count", count_route(USERS))
        .with_state(db)
}

/// A running fake backend bound to an ephemeral local port
pub struct FakeBackend {
    pub base_url: String,
    db: Db,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let db = Db::default();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(db.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            db,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
            ..ApiConfig::default()
        }
    }

    pub fn seed(&self, collection: &'static str, records: Vec<Value>) {
        self.db.with(collection, |existing| existing.extend(records));
    }

    pub fn records(&self, collection: &'static str) -> Vec<Value> {
        self.db.with(collection, |records| records.clone())
    }

    pub fn set_failing(&self, failing: bool) {
        self.db.failing.store(failing, Ordering::SeqCst);
    }

    /// Query strings received by list endpoints, oldest first
    pub fn list_queries(&self) -> Vec<HashMap<String, String>> {
        self.db.list_queries.lock().unwrap().clone()
    }
}

/// `count` blog documents titled "Post 1".."Post N"
pub fn blog_docs(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "_id": format!("seed-b{}", i),
                "title": format!("Post {}", i),
                "author": "Staff",
                "category": "education",
                "tags": ["campus"],
                "createdAt": "2024-03-09T10:15:00.000Z"
            })
        })
        .collect()
}
