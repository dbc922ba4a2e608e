//! HTTP implementation of the resource client using reqwest

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::routes::{CountShape, Routed, WriteRouted, COURSE_TOGGLE};
use super::{ClientError, CourseStatusApi, CrudApi, FailureCause, ListApi, Page};
use crate::config::{ApiConfig, RouteConfig};
use crate::models::{Course, CourseStatusCount, Entity, EntityKind};

/// Resource client for the institute backend
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    routes: RouteConfig,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            routes: config.routes.clone(),
        })
    }

    fn url(&self, kind: EntityKind, path: &str) -> String {
        let prefix = self.routes.prefix(kind).trim_end_matches('/');
        format!("{}{}{}", self.base_url, prefix, path)
    }

    fn item_url(&self, kind: EntityKind, path: &str, id: &str) -> String {
        self.url(kind, &format!("{}{}", path, urlencoding::encode(id)))
    }

    /// Send a request and fail on transport errors or non-2xx statuses.
    async fn send(
        &self,
        method: Method,
        url: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ClientError> {
        tracing::debug!(%method, %url, "sending request");

        let response = build(self.http.request(method.clone(), url))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%method, %url, error = %e, "request failed");
                ClientError::request_failed(method.clone(), url, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%method, %url, %status, "request rejected");
            return Err(ClientError::request_failed(method, url, FailureCause::Status(status)));
        }

        Ok(response)
    }

    async fn send_json(
        &self,
        method: Method,
        url: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Value, ClientError> {
        let response = self.send(method.clone(), url, build).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::request_failed(method, url, e))
    }
}

fn payload_error(method: Method, url: &str, message: impl Into<String>) -> ClientError {
    ClientError::request_failed(method, url, FailureCause::Payload(message.into()))
}

fn decode<T: DeserializeOwned>(method: Method, url: &str, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| payload_error(method, url, e.to_string()))
}

/// Unwrap the list field; a missing or null field is an empty collection.
/// Records that cannot be decoded are skipped.
fn unwrap_list<E: Entity>(method: Method, url: &str, mut body: Value, field: &str) -> Result<Vec<E>, ClientError> {
    let items = match body.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(payload_error(
                method,
                url,
                format!("expected '{}' to be a list, got {}", field, other),
            ))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<E>(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(kind = %E::KIND, error = %e, "skipping undecodable record"),
        }
    }
    Ok(records)
}

/// Unwrap `data`, or decode the whole body when the backend sent the record bare.
fn unwrap_record<E: Entity>(method: Method, url: &str, mut body: Value) -> Result<E, ClientError> {
    let record = match body.get_mut("data").map(Value::take) {
        Some(data) if data.is_object() => data,
        _ => body,
    };
    decode(method, url, record)
}

fn unwrap_count(method: Method, url: &str, body: Value, shape: CountShape) -> Result<u64, ClientError> {
    match shape {
        CountShape::Count => body
            .get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| payload_error(method, url, "missing 'count'")),
        CountShape::StatusTotals => {
            let counts: CourseStatusCount = decode(
                method.clone(),
                url,
                body.get("data").cloned().unwrap_or(Value::Null),
            )?;
            Ok(counts.total())
        }
    }
}

#[async_trait]
impl<E: Routed> ListApi<E> for RestClient {
    async fn list(&self, page: Option<Page>) -> Result<Vec<E>, ClientError> {
        let url = self.url(E::KIND, E::LIST);
        let body = self
            .send_json(Method::GET, &url, |req| match page {
                Some(page) => req.query(&[("page", page.number), ("limit", page.limit)]),
                None => req,
            })
            .await?;
        let records = unwrap_list::<E>(Method::GET, &url, body, E::LIST_FIELD)?;
        tracing::debug!(kind = %E::KIND, count = records.len(), "list fetched");
        Ok(records)
    }

    async fn count(&self) -> Result<u64, ClientError> {
        let url = self.url(E::KIND, E::COUNT);
        let body = self.send_json(Method::GET, &url, |req| req).await?;
        unwrap_count(Method::GET, &url, body, E::COUNT_SHAPE)
    }
}

#[async_trait]
impl<E: WriteRouted> CrudApi<E> for RestClient {
    async fn create(&self, draft: &E::Draft) -> Result<E, ClientError> {
        let url = self.url(E::KIND, E::CREATE);
        let body = self.send_json(Method::POST, &url, |req| req.json(draft)).await?;
        let record = unwrap_record::<E>(Method::POST, &url, body)?;
        tracing::info!(kind = %E::KIND, id = record.id(), "record created");
        Ok(record)
    }

    async fn update(&self, id: &str, draft: &E::Draft) -> Result<E, ClientError> {
        let url = self.item_url(E::KIND, E::UPDATE, id);
        let body = self.send_json(Method::PUT, &url, |req| req.json(draft)).await?;
        let record = unwrap_record::<E>(Method::PUT, &url, body)?;
        tracing::info!(kind = %E::KIND, id, "record updated");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let url = self.item_url(E::KIND, E::DELETE, id);
        self.send(Method::DELETE, &url, |req| req).await?;
        tracing::info!(kind = %E::KIND, id, "record deleted");
        Ok(())
    }
}

#[async_trait]
impl CourseStatusApi for RestClient {
    async fn toggle_active(&self, id: &str) -> Result<bool, ClientError> {
        let url = self.item_url(Course::KIND, COURSE_TOGGLE, id);
        let body = self.send_json(Method::PATCH, &url, |req| req).await?;
        let active = body
            .get("activeStatus")
            .or_else(|| body.get("data").and_then(|d| d.get("activeStatus")))
            .and_then(Value::as_bool)
            .ok_or_else(|| payload_error(Method::PATCH, &url, "missing 'activeStatus'"))?;
        tracing::info!(id, active, "course status toggled");
        Ok(active)
    }

    async fn status_count(&self) -> Result<CourseStatusCount, ClientError> {
        let url = self.url(Course::KIND, <Course as Routed>::COUNT);
        let body = self.send_json(Method::GET, &url, |req| req).await?;
        decode(Method::GET, &url, body.get("data").cloned().unwrap_or(Value::Null))
    }
}
