//! Roster service coordinating validation, store access, and metrics.

use crate::{
    config::Config,
    metrics::{MetricsSnapshot, Operation, RosterMetrics},
    roster::{
        patch::{PatchOperation, apply_patch},
        store::StudentStore,
        types::{RosterError, Student, StudentView},
        validate::{
            require_deletable_id, require_name, require_payload, require_positive_id,
            validate_view,
        },
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Abstraction over the roster operations used by the HTTP surface.
#[async_trait]
pub trait RosterApi: Send + Sync {
    /// Every student in insertion order.
    async fn list_students(&self) -> Vec<StudentView>;

    /// Look up a student by identifier.
    async fn get_student_by_id(&self, id: i64) -> Result<StudentView, RosterError>;

    /// Look up a student by exact name.
    async fn get_student_by_name(&self, name: &str) -> Result<StudentView, RosterError>;

    /// Create a student from `payload`, returning the stored view with its new id.
    async fn create_student(
        &self,
        payload: Option<StudentView>,
    ) -> Result<StudentView, RosterError>;

    /// Overwrite name, email, and address of the student identified by `payload.id`.
    async fn update_student(&self, payload: Option<StudentView>) -> Result<(), RosterError>;

    /// Apply patch operations to a copy of the student, validate, then persist.
    async fn update_student_partial(
        &self,
        id: i64,
        patch: Option<Vec<PatchOperation>>,
    ) -> Result<(), RosterError>;

    /// Remove a student, returning `true` on success.
    async fn delete_student(&self, id: i64) -> Result<bool, RosterError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    async fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Owns the record store and serializes access to it.
///
/// Reads share a lock and mutations take it exclusively, so each operation is atomic with
/// respect to concurrent requests. Construct once near process start and share through an `Arc`.
pub struct RosterService {
    store: RwLock<StudentStore>,
    metrics: Arc<RosterMetrics>,
}

impl RosterService {
    /// Wrap an existing store.
    pub fn new(store: StudentStore) -> Self {
        Self {
            store: RwLock::new(store),
            metrics: Arc::new(RosterMetrics::new()),
        }
    }

    /// Build the service described by the runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = if config.seed_students {
            StudentStore::seeded()
        } else {
            StudentStore::new()
        };
        tracing::info!(
            students = store.len(),
            seeded = config.seed_students,
            "Student store initialized"
        );
        Self::new(store)
    }

    fn track<T>(
        &self,
        operation: Operation,
        result: Result<T, RosterError>,
    ) -> Result<T, RosterError> {
        match &result {
            Ok(_) => self.metrics.record(operation),
            Err(RosterError::NotFound(message)) => {
                self.metrics.record_rejection();
                tracing::error!(?operation, reason = %message, "Student not found");
            }
            Err(err) => {
                self.metrics.record_rejection();
                tracing::warn!(?operation, error = %err, "Bad request");
            }
        }
        result
    }
}

impl Default for RosterService {
    fn default() -> Self {
        Self::new(StudentStore::seeded())
    }
}

#[async_trait]
impl RosterApi for RosterService {
    async fn list_students(&self) -> Vec<StudentView> {
        tracing::info!("Listing students");
        let store = self.store.read().await;
        let views: Vec<StudentView> = store.list().iter().map(StudentView::from).collect();
        self.metrics.record(Operation::List);
        views
    }

    async fn get_student_by_id(&self, id: i64) -> Result<StudentView, RosterError> {
        let result: Result<_, RosterError> = async {
            let id = require_positive_id(id)?;
            let store = self.store.read().await;
            store
                .find_by_id(id)
                .map(StudentView::from)
                .ok_or_else(|| RosterError::id_not_found(id))
        }
        .await;
        self.track(Operation::Fetch, result)
    }

    async fn get_student_by_name(&self, name: &str) -> Result<StudentView, RosterError> {
        let result: Result<_, RosterError> = async {
            let name = require_name(name)?;
            let store = self.store.read().await;
            store
                .find_by_name(name)
                .map(StudentView::from)
                .ok_or_else(|| RosterError::name_not_found(name))
        }
        .await;
        self.track(Operation::Fetch, result)
    }

    async fn create_student(
        &self,
        payload: Option<StudentView>,
    ) -> Result<StudentView, RosterError> {
        let result: Result<_, RosterError> = async {
            let view = require_payload(payload)?;
            let mut store = self.store.write().await;
            let id = store.next_id();
            let student = Student::from_view(id, view);
            let created = StudentView::from(&student);
            store.append(student);
            tracing::info!(id, name = %created.student_name, "Student created");
            Ok(created)
        }
        .await;
        self.track(Operation::Create, result)
    }

    async fn update_student(&self, payload: Option<StudentView>) -> Result<(), RosterError> {
        let result: Result<_, RosterError> = async {
            let view = require_payload(payload)?;
            let id = require_positive_id(view.id)?;
            let mut store = self.store.write().await;
            let existing = store
                .find_by_id_mut(id)
                .ok_or_else(|| RosterError::id_not_found(id))?;
            existing.apply_view(&view);
            tracing::info!(id, "Student updated");
            Ok(())
        }
        .await;
        self.track(Operation::Update, result)
    }

    async fn update_student_partial(
        &self,
        id: i64,
        patch: Option<Vec<PatchOperation>>,
    ) -> Result<(), RosterError> {
        let result: Result<_, RosterError> = async {
            let operations = require_payload(patch)?;
            let id = require_positive_id(id)?;
            let mut store = self.store.write().await;
            let existing = store
                .find_by_id_mut(id)
                .ok_or_else(|| RosterError::id_not_found(id))?;

            let mut draft = StudentView::from(&*existing);
            apply_patch(&mut draft, &operations)
                .map_err(|field| RosterError::Validation(vec![field]))?;
            validate_view(&draft)?;

            existing.apply_view(&draft);
            tracing::info!(id, operations = operations.len(), "Student patched");
            Ok(())
        }
        .await;
        self.track(Operation::Patch, result)
    }

    async fn delete_student(&self, id: i64) -> Result<bool, RosterError> {
        let result: Result<_, RosterError> = async {
            let id = require_deletable_id(id)?;
            let mut store = self.store.write().await;
            let student = store
                .find_by_id(id)
                .cloned()
                .ok_or_else(|| RosterError::id_not_found(id))?;
            let removed = store.remove(&student);
            tracing::info!(id, "Student deleted");
            Ok(removed)
        }
        .await;
        self.track(Operation::Delete, result)
    }

    async fn metrics_snapshot(&self) -> MetricsSnapshot {
        let students = self.store.read().await.len();
        self.metrics.snapshot(students)
    }
}
