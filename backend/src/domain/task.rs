//! Task data model.
//!
//! Tasks belong to exactly one user. Mutators take the current time so the
//! entity stays free of ambient clocks; `updated_at` is clamped so it never
//! precedes `created_at`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum task text length in characters.
pub const TASK_TEXT_MAX: usize = 255;

/// Validation errors returned by [`Task`] constructors and mutators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    InvalidId,
    EmptyText,
    TextTooLong { max: usize },
    NegativeOrder,
    OrderOutOfRange,
    NilOwner,
    InvalidTimestamps,
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::InvalidId => write!(f, "task id must be a valid UUID"),
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::TextTooLong { max } => {
                write!(f, "task text must be at most {max} characters")
            }
            Self::NegativeOrder => write!(f, "task order must not be negative"),
            Self::OrderOutOfRange => write!(f, "task order is too large"),
            Self::NilOwner => write!(f, "task owner must be a registered user"),
            Self::InvalidTimestamps => {
                write!(f, "updated timestamp must not precede the creation timestamp")
            }
        }
    }
}

impl std::error::Error for TaskValidationError {}

/// Stable task identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(Uuid);

impl TaskId {
    /// Validate and construct a [`TaskId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TaskValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(TaskValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| TaskValidationError::InvalidId)
    }

    /// Generate a new random [`TaskId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Task description, 1 to [`TASK_TEXT_MAX`] characters and not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskText(String);

impl TaskText {
    /// Validate and construct task text.
    pub fn new(text: impl Into<String>) -> Result<Self, TaskValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        if text.chars().count() > TASK_TEXT_MAX {
            return Err(TaskValidationError::TextTooLong { max: TASK_TEXT_MAX });
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for TaskText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TaskText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Client display position. Non-negative; defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskOrder(i32);

impl TaskOrder {
    /// Validate a raw order value.
    pub fn new(order: i64) -> Result<Self, TaskValidationError> {
        if order < 0 {
            return Err(TaskValidationError::NegativeOrder);
        }
        i32::try_from(order)
            .map(Self)
            .map_err(|_| TaskValidationError::OrderOutOfRange)
    }

    /// The validated order value.
    pub fn value(self) -> i32 {
        self.0
    }
}

/// Raw task fields read back from storage, validated by [`Task::from_persisted`].
#[derive(Debug, Clone)]
pub struct PersistedTask {
    pub id: TaskId,
    pub text: String,
    pub order: i64,
    pub completed: bool,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's to-do item.
///
/// ## Invariants
/// - `text` is never blank and at most [`TASK_TEXT_MAX`] characters.
/// - `owner` is never the nil UUID.
/// - `updated_at >= created_at`; `created_at` never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    text: TaskText,
    order: TaskOrder,
    completed: bool,
    owner: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create an incomplete task owned by `owner`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use todo_backend::domain::{Task, UserId};
    ///
    /// let task = Task::new("buy milk", None, UserId::random(), Utc::now()).expect("valid task");
    /// assert!(!task.is_completed());
    /// assert_eq!(task.order().value(), 0);
    /// ```
    pub fn new(
        text: &str,
        order: Option<i64>,
        owner: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let text = TaskText::new(text)?;
        let order = order.map(TaskOrder::new).transpose()?.unwrap_or_default();
        if owner.is_nil() {
            return Err(TaskValidationError::NilOwner);
        }

        Ok(Self {
            id: TaskId::random(),
            text,
            order,
            completed: false,
            owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a stored record, re-checking every invariant.
    pub fn from_persisted(record: PersistedTask) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: record.id,
            text: TaskText::new(record.text)?,
            order: TaskOrder::new(record.order)?,
            completed: record.completed,
            owner: record.owner,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Re-check field invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        TaskText::new(self.text.as_ref())?;
        if self.owner.is_nil() {
            return Err(TaskValidationError::NilOwner);
        }
        if self.updated_at < self.created_at {
            return Err(TaskValidationError::InvalidTimestamps);
        }
        Ok(())
    }

    /// Replace the text. Leaves the task untouched on validation failure.
    pub fn set_text(&mut self, text: &str, now: DateTime<Utc>) -> Result<(), TaskValidationError> {
        self.text = TaskText::new(text)?;
        self.touch(now);
        Ok(())
    }

    /// Replace the display order. Leaves the task untouched on validation failure.
    pub fn set_order(&mut self, order: i64, now: DateTime<Utc>) -> Result<(), TaskValidationError> {
        self.order = TaskOrder::new(order)?;
        self.touch(now);
        Ok(())
    }

    /// Flag the task as done.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.completed = true;
        self.touch(now);
    }

    /// Flag the task as not done.
    pub fn mark_not_completed(&mut self, now: DateTime<Utc>) {
        self.completed = false;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Whether `user` owns this task.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn text(&self) -> &TaskText {
        &self.text
    }

    pub fn order(&self) -> TaskOrder {
        self.order
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests;
