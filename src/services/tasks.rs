//! Customer follow-up tasks.

use chrono::{Months, NaiveDateTime};

use crate::access::{Action, Resource, authorize, require};
use crate::domain::{
    auth::AuthenticatedUser,
    task::{
        CompletedTaskGroup, RepTaskGroup, Task, TaskListQuery, TaskOrder, TaskScope, TaskStatus,
        TaskView, group_by_rep_and_customer, group_by_rep_name,
    },
};
use crate::forms::tasks::{CompletedTasksQuery, NewTaskForm};
use crate::repository::{CustomerReader, TaskReader, TaskWriter};
use crate::services::customers::load_customer;
use crate::services::{ServiceError, ServiceResult};

/// How far back the completed task listing reaches.
const COMPLETED_WINDOW_MONTHS: u32 = 3;

pub fn create_task<R>(repo: &R, user: &AuthenticatedUser, form: NewTaskForm) -> ServiceResult<Task>
where
    R: CustomerReader + TaskWriter + ?Sized,
{
    let new_task = form.into_new_task(user.id).map_err(ServiceError::invalid)?;
    load_customer(repo, user, Action::CreateTask, new_task.customer_id)?;

    let task = repo.create_task(&new_task)?;
    log::info!(
        "User {} created task {} for customer {}",
        user.id,
        task.id,
        task.customer_id
    );
    Ok(task)
}

/// Open tasks assigned to the user, or all open tasks for super_admin.
pub fn list_open_tasks<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<TaskView>>
where
    R: TaskReader + ?Sized,
{
    require(user, Action::ReadTasks)?;

    let scope = if user.is_super_admin() {
        TaskScope::All
    } else {
        TaskScope::AssignedTo(user.id)
    };
    let query = TaskListQuery::new(scope).status(TaskStatus::Open);
    Ok(repo.list_tasks(query)?)
}

pub fn list_customer_open_tasks<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Vec<TaskView>>
where
    R: CustomerReader + TaskReader + ?Sized,
{
    load_customer(repo, user, Action::ReadTasks, customer_id)?;

    let query = TaskListQuery::new(TaskScope::All)
        .customer_id(customer_id)
        .status(TaskStatus::Open);
    Ok(repo.list_tasks(query)?)
}

/// Open tasks folded into rep → customer → tasks.
///
/// Non-admins see tasks assigned to them plus every task on a customer
/// assigned to them.
pub fn grouped_open_tasks<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<RepTaskGroup>>
where
    R: TaskReader + ?Sized,
{
    require(user, Action::ReadTasks)?;

    let scope = if user.is_super_admin() {
        TaskScope::All
    } else {
        TaskScope::AssignedOrCustomerOf(user.id)
    };
    let query = TaskListQuery::new(scope)
        .status(TaskStatus::Open)
        .order(TaskOrder::RepThenCustomer);

    Ok(group_by_rep_and_customer(repo.list_tasks(query)?))
}

/// Tasks completed in the trailing window, grouped by rep name.
pub fn completed_tasks<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: CompletedTasksQuery,
) -> ServiceResult<Vec<CompletedTaskGroup>>
where
    R: TaskReader + ?Sized,
{
    require(user, Action::ReadTasks)?;

    let scope = if user.is_super_admin() {
        TaskScope::All
    } else {
        TaskScope::Participant(user.id)
    };
    let since = completed_window_start(chrono::Local::now().naive_utc());
    let mut query = TaskListQuery::new(scope)
        .status(TaskStatus::Completed)
        .completed_since(since)
        .order(TaskOrder::RepThenLatestDue);
    if let Some(customer_id) = filter.customer_id {
        query = query.customer_id(customer_id);
    }

    Ok(group_by_rep_name(repo.list_tasks(query)?))
}

fn completed_window_start(now: NaiveDateTime) -> NaiveDateTime {
    now.checked_sub_months(Months::new(COMPLETED_WINDOW_MONTHS))
        .unwrap_or(NaiveDateTime::MIN)
}

pub fn complete_task<R>(repo: &R, user: &AuthenticatedUser, task_id: i32) -> ServiceResult<Task>
where
    R: TaskReader + TaskWriter + ?Sized,
{
    let now = chrono::Local::now().naive_utc();
    change_status(repo, user, task_id, TaskStatus::Completed, Some(now))
}

/// Put a completed task back to open and clear its completion time.
pub fn reopen_task<R>(repo: &R, user: &AuthenticatedUser, task_id: i32) -> ServiceResult<Task>
where
    R: TaskReader + TaskWriter + ?Sized,
{
    change_status(repo, user, task_id, TaskStatus::Open, None)
}

fn change_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    task_id: i32,
    status: TaskStatus,
    completed_at: Option<NaiveDateTime>,
) -> ServiceResult<Task>
where
    R: TaskReader + TaskWriter + ?Sized,
{
    require(user, Action::UpdateTaskStatus)?;
    let task = repo
        .get_task_by_id(task_id)?
        .ok_or_else(|| ServiceError::not_found("task"))?;
    authorize(user, Action::UpdateTaskStatus, Resource::Task(&task))?;

    let updated = repo.set_task_status(task_id, status, completed_at)?;
    log::info!("User {} set task {task_id} to {status}", user.id);
    Ok(updated)
}
