//! In-memory resource client for component tests

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::{ClientError, CourseStatusApi, CrudApi, FailureCause, ListApi, Page};
use crate::models::{Course, CourseStatusCount, Editable, Entity};

pub(crate) struct MockApi<E: Entity> {
    records: Mutex<Vec<E>>,
    calls: Mutex<Vec<String>>,
    submitted: Mutex<Vec<serde_json::Value>>,
    next_id: AtomicU64,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// When set, toggles wait for a permit before answering
    pub toggle_gate: Option<Arc<Semaphore>>,
    active: Mutex<HashMap<String, bool>>,
}

fn failure(method: Method, what: &str) -> ClientError {
    ClientError::request_failed(
        method,
        format!("mock://{}", what),
        FailureCause::Status(StatusCode::INTERNAL_SERVER_ERROR),
    )
}

impl<E: Entity> MockApi<E> {
    pub fn new(records: Vec<E>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            toggle_gate: None,
            active: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_toggle_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.toggle_gate = Some(gate);
        self
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == name).count()
    }

    /// Payloads sent with create/update, as JSON
    pub fn submitted(&self) -> Vec<serde_json::Value> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<E> {
        self.records.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn materialize<D: serde::Serialize>(&self, id: &str, draft: &D) -> E {
        let mut value = serde_json::to_value(draft).unwrap();
        value["_id"] = serde_json::Value::String(id.to_string());
        serde_json::from_value(value).unwrap()
    }
}

#[async_trait]
impl<E: Entity> ListApi<E> for MockApi<E> {
    async fn list(&self, page: Option<Page>) -> Result<Vec<E>, ClientError> {
        self.record("list");
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(failure(Method::GET, "list"));
        }
        let records = self.records.lock().unwrap().clone();
        Ok(match page {
            Some(page) => records
                .into_iter()
                .skip(((page.number.max(1) - 1) * page.limit) as usize)
                .take(page.limit as usize)
                .collect(),
            None => records,
        })
    }

    async fn count(&self) -> Result<u64, ClientError> {
        self.record("count");
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(failure(Method::GET, "count"));
        }
        Ok(self.records.lock().unwrap().len() as u64)
    }
}

#[async_trait]
impl<E: Editable> CrudApi<E> for MockApi<E> {
    async fn create(&self, draft: &E::Draft) -> Result<E, ClientError> {
        self.record("create");
        self.submitted.lock().unwrap().push(serde_json::to_value(draft).unwrap());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(failure(Method::POST, "create"));
        }
        let id = format!("m{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = self.materialize(&id, draft);
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, draft: &E::Draft) -> Result<E, ClientError> {
        self.record("update");
        self.submitted.lock().unwrap().push(serde_json::to_value(draft).unwrap());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(failure(Method::PUT, "update"));
        }
        let record = self.materialize(id, draft);
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id() == id) {
            Some(existing) => *existing = record.clone(),
            None => return Err(failure(Method::PUT, "update")),
        }
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.record("delete");
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(failure(Method::DELETE, "delete"));
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(failure(Method::DELETE, "delete"));
        }
        Ok(())
    }
}

#[async_trait]
impl CourseStatusApi for MockApi<Course> {
    async fn toggle_active(&self, id: &str) -> Result<bool, ClientError> {
        self.record("toggle");
        if let Some(gate) = &self.toggle_gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(failure(Method::PATCH, "toggle"));
        }
        let current = {
            let records = self.records.lock().unwrap();
            records.iter().find(|c| c.id == id).map(|c| c.active_status)
        };
        let mut active = self.active.lock().unwrap();
        let state = active.entry(id.to_string()).or_insert(current.unwrap_or(true));
        *state = !*state;
        Ok(*state)
    }

    async fn status_count(&self) -> Result<CourseStatusCount, ClientError> {
        self.record("status_count");
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(failure(Method::GET, "status_count"));
        }
        let records = self.records.lock().unwrap();
        let active = records.iter().filter(|c| c.active_status).count() as u64;
        Ok(CourseStatusCount {
            active_courses: active,
            inactive_courses: records.len() as u64 - active,
        })
    }
}
