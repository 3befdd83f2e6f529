//! File-backed employee collection.
//!
//! The whole collection lives in one JSON-array file. Every operation loads
//! the entire file, works on the in-memory list, and rewrites the file
//! wholesale on mutation. Mutating operations are serialized behind a
//! process-wide lock so two read-modify-write cycles cannot interleave and
//! drop each other's writes.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use entity::{Employee, EmployeeDraft};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee file not found at {}", .path.display())]
    FileMissing { path: PathBuf },
    #[error("no employee found with id {id}")]
    UnknownEmployee { id: Uuid },
    #[error("employee file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed employee file: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to the backing file. Cheap to clone; all clones share the same
/// write lock.
#[derive(Clone, Debug)]
pub struct EmployeeStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl EmployeeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Return every record in the collection, in stored order.
    pub async fn list(&self) -> StoreResult<Vec<Employee>> {
        self.load().await
    }

    /// Append a record built from `draft` under a freshly generated id.
    ///
    /// Creates the backing file (and its parent directories) as an empty
    /// array if it does not exist yet. Returns the created record and the
    /// new total count.
    pub async fn add(&self, draft: EmployeeDraft) -> StoreResult<(Employee, usize)> {
        let _guard = self.inner.write_lock.lock().await;
        self.ensure_file().await?;

        let mut employees = self.load().await?;
        let record = Employee::create(draft);
        employees.push(record.clone());
        self.persist(&employees).await?;

        Ok((record, employees.len()))
    }

    /// Overwrite every mutable field of the record with the given id.
    ///
    /// Only the first record matching `id` is touched; its id is preserved.
    /// Returns the updated record and the total count.
    pub async fn update(&self, id: Uuid, draft: EmployeeDraft) -> StoreResult<(Employee, usize)> {
        let _guard = self.inner.write_lock.lock().await;

        let mut employees = self.load().await?;
        let position = employees
            .iter()
            .position(|employee| employee.id == id)
            .ok_or(StoreError::UnknownEmployee { id })?;
        employees[position].overwrite(draft);
        self.persist(&employees).await?;

        Ok((employees[position].clone(), employees.len()))
    }

    /// Remove every record matching `id` (exactly one, ids being unique).
    ///
    /// Returns the removed record and the remaining count.
    pub async fn remove(&self, id: Uuid) -> StoreResult<(Employee, usize)> {
        let _guard = self.inner.write_lock.lock().await;

        let mut employees = self.load().await?;
        let removed = employees
            .iter()
            .find(|employee| employee.id == id)
            .cloned()
            .ok_or(StoreError::UnknownEmployee { id })?;
        employees.retain(|employee| employee.id != id);
        self.persist(&employees).await?;

        Ok((removed, employees.len()))
    }

    async fn ensure_file(&self) -> StoreResult<()> {
        if fs::try_exists(&self.inner.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.inner.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.inner.path, b"[]").await?;
        Ok(())
    }

    async fn load(&self) -> StoreResult<Vec<Employee>> {
        let bytes = fs::read(&self.inner.path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::FileMissing {
                    path: self.inner.path.clone(),
                }
            } else {
                StoreError::Io(err)
            }
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn persist(&self, employees: &[Employee]) -> StoreResult<()> {
        let bytes = serde_json::to_vec(employees)?;
        fs::write(&self.inner.path, bytes).await?;
        Ok(())
    }
}
