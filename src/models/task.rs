use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::task::{NewTask as DomainNewTask, Task as DomainTask, TaskStatus};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customer_tasks)]
pub struct Task {
    pub id: i32,
    pub customer_id: i32,
    pub assigned_to: i32,
    pub created_by: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customer_tasks)]
pub struct NewTask<'a> {
    pub customer_id: i32,
    pub assigned_to: i32,
    pub created_by: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub due_date: Option<NaiveDate>,
}

impl TryFrom<Task> for DomainTask {
    type Error = RepositoryError;

    fn try_from(value: Task) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<TaskStatus>()
            .map_err(|err| RepositoryError::InvalidData(format!("task {}: {err}", value.id)))?;

        Ok(Self {
            id: value.id,
            customer_id: value.customer_id,
            assigned_to: value.assigned_to,
            created_by: value.created_by,
            title: value.title,
            description: value.description,
            due_date: value.due_date,
            status,
            completed_at: value.completed_at,
            created_at: value.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewTask> for NewTask<'a> {
    fn from(value: &'a DomainNewTask) -> Self {
        Self {
            customer_id: value.customer_id,
            assigned_to: value.assigned_to,
            created_by: value.created_by,
            title: value.title.as_str(),
            description: value.description.as_deref(),
            due_date: value.due_date,
        }
    }
}
