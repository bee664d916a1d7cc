use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Two-state lifecycle of a customer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(TaskStatus::Open),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i32,
    pub customer_id: i32,
    pub assigned_to: i32,
    pub created_by: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    /// Set while the task is completed, cleared when it is reopened.
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Task {
    pub fn involves(&self, user_id: i32) -> bool {
        self.assigned_to == user_id || self.created_by == user_id
    }
}

/// Task row joined with the display names the task lists need.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub customer_name: String,
    pub assigned_to_name: String,
    pub created_by_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub customer_id: i32,
    pub assigned_to: i32,
    pub created_by: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Which tasks a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskScope {
    #[default]
    All,
    /// Tasks assigned to the user.
    AssignedTo(i32),
    /// Tasks assigned to the user or belonging to a customer assigned to them.
    AssignedOrCustomerOf(i32),
    /// Tasks the user is assigned to or created.
    Participant(i32),
}

/// Sort order of a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskOrder {
    /// Soonest due date first, undated tasks last.
    #[default]
    DueDate,
    /// Rep name, then customer name, then soonest due date.
    RepThenCustomer,
    /// Rep name, then latest due date first.
    RepThenLatestDue,
}

/// Filters applied when listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    pub scope: TaskScope,
    pub status: Option<TaskStatus>,
    pub customer_id: Option<i32>,
    /// Only tasks completed at or after this instant.
    pub completed_since: Option<NaiveDateTime>,
    pub order: TaskOrder,
}

impl TaskListQuery {
    pub fn new(scope: TaskScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn completed_since(mut self, since: NaiveDateTime) -> Self {
        self.completed_since = Some(since);
        self
    }

    pub fn order(mut self, order: TaskOrder) -> Self {
        self.order = order;
        self
    }
}

/// Open tasks of one customer within a rep group.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerTaskGroup {
    pub customer_id: i32,
    pub customer_name: String,
    pub tasks: Vec<TaskView>,
}

/// Open tasks of one rep, split per customer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RepTaskGroup {
    pub rep_id: i32,
    pub rep_name: String,
    pub customers: Vec<CustomerTaskGroup>,
}

/// Completed tasks of one rep.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompletedTaskGroup {
    pub rep_name: String,
    pub tasks: Vec<TaskView>,
}

/// Fold an ordered task list into rep → customer → tasks.
///
/// Groups appear in the order their first task appears, and tasks keep their
/// relative order inside a group.
pub fn group_by_rep_and_customer<I>(rows: I) -> Vec<RepTaskGroup>
where
    I: IntoIterator<Item = TaskView>,
{
    rows.into_iter().fold(Vec::new(), |mut groups, row| {
        let rep_index = match groups
            .iter()
            .position(|group: &RepTaskGroup| group.rep_id == row.task.assigned_to)
        {
            Some(index) => index,
            None => {
                groups.push(RepTaskGroup {
                    rep_id: row.task.assigned_to,
                    rep_name: row.assigned_to_name.clone(),
                    customers: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let customers = &mut groups[rep_index].customers;
        match customers
            .iter_mut()
            .find(|group| group.customer_id == row.task.customer_id)
        {
            Some(group) => group.tasks.push(row),
            None => customers.push(CustomerTaskGroup {
                customer_id: row.task.customer_id,
                customer_name: row.customer_name.clone(),
                tasks: vec![row],
            }),
        }

        groups
    })
}

/// Fold an ordered task list into rep name → tasks.
pub fn group_by_rep_name<I>(rows: I) -> Vec<CompletedTaskGroup>
where
    I: IntoIterator<Item = TaskView>,
{
    rows.into_iter().fold(Vec::new(), |mut groups, row| {
        match groups
            .iter_mut()
            .find(|group: &&mut CompletedTaskGroup| group.rep_name == row.assigned_to_name)
        {
            Some(group) => group.tasks.push(row),
            None => groups.push(CompletedTaskGroup {
                rep_name: row.assigned_to_name.clone(),
                tasks: vec![row],
            }),
        }
        groups
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: i32, rep: (i32, &str), customer: (i32, &str)) -> TaskView {
        TaskView {
            task: Task {
                id,
                customer_id: customer.0,
                assigned_to: rep.0,
                created_by: rep.0,
                title: format!("task {id}"),
                description: None,
                due_date: None,
                status: TaskStatus::Open,
                completed_at: None,
                created_at: NaiveDateTime::default(),
            },
            customer_name: customer.1.to_string(),
            assigned_to_name: rep.1.to_string(),
            created_by_name: rep.1.to_string(),
        }
    }

    #[test]
    fn groups_open_tasks_by_rep_then_customer() {
        let rows = vec![
            view(1, (10, "Ann"), (100, "Acme")),
            view(2, (10, "Ann"), (100, "Acme")),
            view(3, (10, "Ann"), (200, "Globex")),
            view(4, (20, "Bob"), (100, "Acme")),
        ];

        let groups = group_by_rep_and_customer(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].rep_id, 10);
        assert_eq!(groups[0].rep_name, "Ann");
        assert_eq!(groups[0].customers.len(), 2);
        assert_eq!(groups[0].customers[0].customer_name, "Acme");
        let ids: Vec<i32> = groups[0].customers[0]
            .tasks
            .iter()
            .map(|row| row.task.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(groups[0].customers[1].tasks[0].task.id, 3);
        assert_eq!(groups[1].rep_name, "Bob");
        assert_eq!(groups[1].customers[0].tasks[0].task.id, 4);
    }

    #[test]
    fn non_contiguous_rows_join_their_existing_group() {
        let rows = vec![
            view(1, (10, "Ann"), (100, "Acme")),
            view(2, (20, "Bob"), (100, "Acme")),
            view(3, (10, "Ann"), (100, "Acme")),
        ];

        let groups = group_by_rep_and_customer(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].customers.len(), 1);
        assert_eq!(groups[0].customers[0].tasks.len(), 2);
    }

    #[test]
    fn groups_completed_tasks_by_rep_name() {
        let rows = vec![
            view(1, (10, "Ann"), (100, "Acme")),
            view(2, (20, "Bob"), (200, "Globex")),
            view(3, (10, "Ann"), (200, "Globex")),
        ];

        let groups = group_by_rep_name(rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].rep_name, "Ann");
        assert_eq!(groups[0].tasks.len(), 2);
        assert_eq!(groups[1].rep_name, "Bob");
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_rep_and_customer(Vec::new()).is_empty());
        assert!(group_by_rep_name(Vec::new()).is_empty());
    }
}
