//! To-do list use-case service.
//!
//! # Responsibility
//! - Create, complete, reopen, delete and list task records.
//!
//! # Invariants
//! - Task text is never blank and is stored trimmed.
//! - New tasks start with `completed = false`.
//! - Task ids follow the backing collection's id policy; under renumbering a
//!   delete shifts the ids of later tasks down by one.

use super::is_blank;
use crate::model::record::{Record, RecordId};
use crate::model::value::{fields, FieldValue};
use crate::repo::collection::{RecordRepository, RepoError};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TASK_FIELD: &str = "task";
pub const COMPLETED_FIELD: &str = "completed";

/// Service error for to-do use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoServiceError {
    EmptyTask,
    TaskNotFound(RecordId),
    /// Stored record lacks the task shape (e.g. a foreign document was loaded).
    MalformedTask(RecordId),
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTask => write!(f, "task text cannot be empty"),
            Self::TaskNotFound(id) => write!(f, "task {id} not found"),
            Self::MalformedTask(id) => write!(f, "record {id} is not a task"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Read model for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: RecordId,
    pub task: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TaskView {
    fn from_record(record: &Record) -> Result<Self, TodoServiceError> {
        let task = record
            .text(TASK_FIELD)
            .ok_or(TodoServiceError::MalformedTask(record.id))?;
        Ok(Self {
            id: record.id,
            task: task.to_string(),
            completed: record.flag(COMPLETED_FIELD).unwrap_or(false),
            created_at: record.created_at,
        })
    }
}

impl Display for TaskView {
    /// Renders as `[✓] 1. Learn Rust` or `[ ] 2. Build a project`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = if self.completed { "✓" } else { " " };
        write!(f, "[{status}] {}. {}", self.id, self.task)
    }
}

/// To-do list facade over a record repository.
pub struct TodoService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Adds an open task and returns its id.
    pub fn add_task(&mut self, text: &str) -> Result<RecordId, TodoServiceError> {
        if is_blank(text) {
            return Err(TodoServiceError::EmptyTask);
        }
        let id = self.repo.add(fields([
            (TASK_FIELD, FieldValue::from(text.trim())),
            (COMPLETED_FIELD, FieldValue::Bool(false)),
        ]))?;
        Ok(id)
    }

    /// Marks a task as completed. Completing twice is a no-op.
    pub fn complete_task(&mut self, id: RecordId) -> Result<TaskView, TodoServiceError> {
        self.set_completed(id, true)
    }

    pub fn reopen_task(&mut self, id: RecordId) -> Result<TaskView, TodoServiceError> {
        self.set_completed(id, false)
    }

    /// Removes a task and returns what was removed.
    pub fn delete_task(&mut self, id: RecordId) -> Result<TaskView, TodoServiceError> {
        let removed = self.repo.delete(id)?;
        TaskView::from_record(&removed)
    }

    pub fn get_task(&self, id: RecordId) -> Result<Option<TaskView>, TodoServiceError> {
        self.repo.get(id).map(TaskView::from_record).transpose()
    }

    /// Lists tasks in insertion order.
    pub fn list_tasks(&self) -> Result<Vec<TaskView>, TodoServiceError> {
        self.repo.list().map(TaskView::from_record).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.repo
            .list()
            .filter(|record| !record.flag(COMPLETED_FIELD).unwrap_or(false))
            .count()
    }

    fn set_completed(
        &mut self,
        id: RecordId,
        completed: bool,
    ) -> Result<TaskView, TodoServiceError> {
        let record = self.repo.get(id).ok_or(TodoServiceError::TaskNotFound(id))?;
        TaskView::from_record(record)?;
        self.repo.set_flag(id, COMPLETED_FIELD, completed)?;
        self.get_task(id)?.ok_or(TodoServiceError::TaskNotFound(id))
    }
}
