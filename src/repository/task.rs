use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::{
    domain::task::{
        NewTask as DomainNewTask, Task as DomainTask, TaskListQuery, TaskOrder, TaskScope,
        TaskStatus, TaskView,
    },
    models::task::{NewTask as DbNewTask, Task as DbTask},
    repository::{DieselRepository, RepositoryError, RepositoryResult, TaskReader, TaskWriter},
};

impl TaskReader for DieselRepository {
    fn get_task_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTask>> {
        use crate::schema::customer_tasks;

        let mut conn = self.conn()?;
        let task = customer_tasks::table
            .filter(customer_tasks::id.eq(id))
            .first::<DbTask>(&mut conn)
            .optional()?;

        task.map(TryInto::try_into).transpose()
    }

    fn list_tasks(&self, query: TaskListQuery) -> RepositoryResult<Vec<TaskView>> {
        use crate::schema::{customer_assignments, customer_tasks, customers, users};

        let mut conn = self.conn()?;

        let mut items = customer_tasks::table
            .inner_join(customers::table)
            .select((DbTask::as_select(), customers::name))
            .into_boxed::<diesel::sqlite::Sqlite>();

        match query.scope {
            TaskScope::All => {}
            TaskScope::AssignedTo(user_id) => {
                items = items.filter(customer_tasks::assigned_to.eq(user_id));
            }
            TaskScope::AssignedOrCustomerOf(user_id) => {
                items = items.filter(
                    customer_tasks::assigned_to.eq(user_id).or(customer_tasks::customer_id
                        .eq_any(
                            customer_assignments::table
                                .filter(customer_assignments::user_id.eq(user_id))
                                .select(customer_assignments::customer_id),
                        )),
                );
            }
            TaskScope::Participant(user_id) => {
                items = items.filter(
                    customer_tasks::assigned_to
                        .eq(user_id)
                        .or(customer_tasks::created_by.eq(user_id)),
                );
            }
        }

        if let Some(status) = query.status {
            items = items.filter(customer_tasks::status.eq(status.as_str()));
        }
        if let Some(customer_id) = query.customer_id {
            items = items.filter(customer_tasks::customer_id.eq(customer_id));
        }
        if let Some(since) = query.completed_since {
            items = items.filter(customer_tasks::completed_at.ge(since));
        }

        let rows = items
            .order(customer_tasks::id.asc())
            .load::<(DbTask, String)>(&mut conn)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut user_ids: Vec<i32> = rows
            .iter()
            .flat_map(|(task, _)| [task.assigned_to, task.created_by])
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let names: HashMap<i32, String> = users::table
            .filter(users::id.eq_any(&user_ids))
            .select((users::id, users::name))
            .load::<(i32, String)>(&mut conn)?
            .into_iter()
            .collect();

        let mut views = rows
            .into_iter()
            .map(|(task, customer_name)| {
                let assigned_to_name = names.get(&task.assigned_to).cloned().unwrap_or_default();
                let created_by_name = names.get(&task.created_by).cloned().unwrap_or_default();
                Ok(TaskView {
                    task: task.try_into()?,
                    customer_name,
                    assigned_to_name,
                    created_by_name,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        sort_views(&mut views, query.order);
        Ok(views)
    }
}

impl TaskWriter for DieselRepository {
    fn create_task(&self, new_task: &DomainNewTask) -> RepositoryResult<DomainTask> {
        use crate::schema::customer_tasks;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(customer_tasks::table)
            .values(&DbNewTask::from(new_task))
            .get_result::<DbTask>(&mut conn)?;

        created.try_into()
    }

    fn set_task_status(
        &self,
        task_id: i32,
        status: TaskStatus,
        completed_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<DomainTask> {
        use crate::schema::customer_tasks;

        let mut conn = self.conn()?;
        let updated = diesel::update(customer_tasks::table.filter(customer_tasks::id.eq(task_id)))
            .set((
                customer_tasks::status.eq(status.as_str()),
                customer_tasks::completed_at.eq(completed_at),
            ))
            .get_result::<DbTask>(&mut conn)?;

        updated.try_into()
    }
}

/// Stable sort so rows that tie keep their id order.
fn sort_views(views: &mut [TaskView], order: TaskOrder) {
    match order {
        TaskOrder::DueDate => views.sort_by_key(|view| due_last(view)),
        TaskOrder::RepThenCustomer => views.sort_by(|a, b| {
            a.assigned_to_name
                .cmp(&b.assigned_to_name)
                .then_with(|| a.customer_name.cmp(&b.customer_name))
                .then_with(|| due_last(a).cmp(&due_last(b)))
        }),
        TaskOrder::RepThenLatestDue => views.sort_by(|a, b| {
            a.assigned_to_name
                .cmp(&b.assigned_to_name)
                .then_with(|| b.task.due_date.cmp(&a.task.due_date))
        }),
    }
}

fn due_last(view: &TaskView) -> (bool, Option<chrono::NaiveDate>) {
    (view.task.due_date.is_none(), view.task.due_date)
}
