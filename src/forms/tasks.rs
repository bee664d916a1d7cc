use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::task::NewTask;
use crate::forms::{optional_text, sanitize_inline_text};

const TITLE_MAX_LEN: u64 = 256;
const DESCRIPTION_MAX_LEN: u64 = 4096;

pub type TaskFormResult<T> = Result<T, TaskFormError>;

#[derive(Debug, Error)]
pub enum TaskFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("task title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewTaskForm {
    #[validate(range(min = 1))]
    pub customer_id: i32,
    /// Defaults to the creating user.
    pub assigned_to: Option<i32>,
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl NewTaskForm {
    pub fn into_new_task(self, created_by: i32) -> TaskFormResult<NewTask> {
        self.validate()?;

        let title = sanitize_inline_text(&self.title);
        if title.is_empty() {
            return Err(TaskFormError::EmptyTitle);
        }

        Ok(NewTask {
            customer_id: self.customer_id,
            assigned_to: self.assigned_to.unwrap_or(created_by),
            created_by,
            title,
            description: optional_text(self.description),
            due_date: self.due_date,
        })
    }
}

/// `?customer_id=` filter of the completed task listing.
#[derive(Debug, Default, Deserialize)]
pub struct CompletedTasksQuery {
    pub customer_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignee_defaults_to_creator() {
        let form: NewTaskForm = serde_json::from_str(
            r#"{"customer_id":3,"title":"Call back","due_date":"2024-05-01"}"#,
        )
        .expect("payload");

        let task = form.into_new_task(7).expect("valid");
        assert_eq!(task.assigned_to, 7);
        assert_eq!(task.created_by, 7);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn explicit_assignee_is_kept() {
        let form = NewTaskForm {
            customer_id: 3,
            assigned_to: Some(9),
            title: "Send samples".into(),
            description: Some("  ".into()),
            due_date: None,
        };
        let task = form.into_new_task(7).expect("valid");
        assert_eq!(task.assigned_to, 9);
        assert_eq!(task.description, None);
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let form = NewTaskForm {
            customer_id: 3,
            assigned_to: None,
            title: " \t ".into(),
            description: None,
            due_date: None,
        };
        assert!(matches!(
            form.into_new_task(1),
            Err(TaskFormError::EmptyTitle)
        ));
    }
}
