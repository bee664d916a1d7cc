use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::{
        audit::{AuditAction, NewAuditEntry},
        customer::{
            Assignee, Customer as DomainCustomer, CustomerDetails, CustomerListQuery,
            CustomerMatch, NewCustomer as DomainNewCustomer, UpdateCustomer as DomainUpdateCustomer,
        },
    },
    models::{
        crm::NewCrmLog,
        customer::{
            Customer as DbCustomer, NewAssignment, NewCustomer as DbNewCustomer,
            UpdateCustomer as DbUpdateCustomer,
        },
    },
    repository::{
        CustomerReader, CustomerWriter, DieselRepository, RepositoryError, RepositoryResult,
    },
};

/// Customers shown by the search box at most.
const SEARCH_LIMIT: i64 = 10;

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<CustomerDetails>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::id.eq(id))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        let Some(customer) = customer else {
            return Ok(None);
        };

        Ok(load_details(&mut conn, vec![customer])?.pop())
    }

    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<CustomerDetails>> {
        use crate::schema::{customer_assignments, customers};

        let mut conn = self.conn()?;

        let mut items = customers::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(user_id) = query.assigned_to {
            items = items.filter(
                customers::id.eq_any(
                    customer_assignments::table
                        .filter(customer_assignments::user_id.eq(user_id))
                        .select(customer_assignments::customer_id),
                ),
            );
        }

        if let Some(term) = query.search.as_ref() {
            items = items.filter(customers::name.like(contains_pattern(term)).escape('\\'));
        }

        items = items.order((customers::created_at.desc(), customers::id.desc()));

        if let Some(limit) = query.limit {
            items = items.limit(limit);
        }

        let db_customers = items.load::<DbCustomer>(&mut conn)?;
        load_details(&mut conn, db_customers)
    }

    fn search_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<CustomerMatch>> {
        use crate::schema::{customer_assignments, customers};

        let mut conn = self.conn()?;

        let pattern = contains_pattern(query.search.as_deref().unwrap_or_default());
        let mut items = customers::table
            .filter(customers::name.like(pattern).escape('\\'))
            .select((customers::id, customers::name))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(user_id) = query.assigned_to {
            items = items.filter(
                customers::id.eq_any(
                    customer_assignments::table
                        .filter(customer_assignments::user_id.eq(user_id))
                        .select(customer_assignments::customer_id),
                ),
            );
        }

        let rows = items
            .order((customers::name.asc(), customers::id.asc()))
            .limit(query.limit.unwrap_or(SEARCH_LIMIT))
            .load::<(i32, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CustomerMatch { id, name })
            .collect())
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<CustomerDetails> {
        use crate::schema::{crm_logs, customer_assignments, customers};

        self.write_transaction(|conn| {
            let created = diesel::insert_into(customers::table)
                .values(&DbNewCustomer::from(new_customer))
                .get_result::<DbCustomer>(conn)?;

            diesel::insert_into(customer_assignments::table)
                .values(&NewAssignment {
                    customer_id: created.id,
                    user_id: new_customer.created_by,
                })
                .execute(conn)?;

            let entry = NewAuditEntry::new(
                created.id,
                new_customer.created_by,
                AuditAction::CreatedCustomer,
            )
            .details(format!("Created customer '{}'", created.name));
            diesel::insert_into(crm_logs::table)
                .values(&NewCrmLog::from(&entry))
                .execute(conn)?;

            load_details(conn, vec![created])?
                .pop()
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn update_customer(
        &self,
        customer_id: i32,
        updates: &DomainUpdateCustomer,
        actor_id: i32,
    ) -> RepositoryResult<DomainCustomer> {
        use crate::schema::{crm_logs, customers};

        self.write_transaction(|conn| {
            let updated = diesel::update(customers::table.filter(customers::id.eq(customer_id)))
                .set(&DbUpdateCustomer::from(updates))
                .get_result::<DbCustomer>(conn)?;

            let entry = NewAuditEntry::new(customer_id, actor_id, AuditAction::UpdatedCustomer)
                .details(format!("Updated customer '{}'", updated.name));
            diesel::insert_into(crm_logs::table)
                .values(&NewCrmLog::from(&entry))
                .execute(conn)?;

            Ok(updated.into())
        })
    }

    fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()> {
        use crate::schema::{
            crm_logs, customer_assignments, customer_logs, customer_tasks, customers,
            sales_pipeline,
        };

        self.write_transaction(|conn| {
            diesel::delete(customer_tasks::table.filter(customer_tasks::customer_id.eq(customer_id)))
                .execute(conn)?;
            diesel::delete(customer_logs::table.filter(customer_logs::customer_id.eq(customer_id)))
                .execute(conn)?;
            diesel::delete(
                customer_assignments::table
                    .filter(customer_assignments::customer_id.eq(customer_id)),
            )
            .execute(conn)?;
            diesel::delete(sales_pipeline::table.filter(sales_pipeline::customer_id.eq(customer_id)))
                .execute(conn)?;
            diesel::delete(crm_logs::table.filter(crm_logs::customer_id.eq(customer_id)))
                .execute(conn)?;

            let deleted = diesel::delete(customers::table.filter(customers::id.eq(customer_id)))
                .execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }

    fn assign_customer(
        &self,
        customer_id: i32,
        user_ids: &[i32],
        actor_id: i32,
    ) -> RepositoryResult<Vec<Assignee>> {
        use crate::schema::{crm_logs, customer_assignments, customers};

        self.write_transaction(|conn| {
            customers::table
                .filter(customers::id.eq(customer_id))
                .select(customers::id)
                .first::<i32>(conn)?;

            diesel::delete(
                customer_assignments::table
                    .filter(customer_assignments::customer_id.eq(customer_id)),
            )
            .execute(conn)?;

            let rows: Vec<NewAssignment> = user_ids
                .iter()
                .map(|&user_id| NewAssignment {
                    customer_id,
                    user_id,
                })
                .collect();
            if !rows.is_empty() {
                diesel::insert_into(customer_assignments::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            let listed = user_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let entry = NewAuditEntry::new(customer_id, actor_id, AuditAction::UpdatedAssignments)
                .details(format!("Assigned users: {listed}"));
            diesel::insert_into(crm_logs::table)
                .values(&NewCrmLog::from(&entry))
                .execute(conn)?;

            let mut assignees = load_assignees(conn, &[customer_id])?;
            Ok(assignees.remove(&customer_id).unwrap_or_default())
        })
    }

    fn unassign_customer(
        &self,
        customer_id: i32,
        user_id: i32,
        actor_id: i32,
    ) -> RepositoryResult<()> {
        use crate::schema::{crm_logs, customer_assignments};

        self.write_transaction(|conn| {
            let removed = diesel::delete(
                customer_assignments::table
                    .filter(customer_assignments::customer_id.eq(customer_id))
                    .filter(customer_assignments::user_id.eq(user_id)),
            )
            .execute(conn)?;
            if removed == 0 {
                return Err(RepositoryError::NotFound);
            }

            let entry = NewAuditEntry::new(customer_id, actor_id, AuditAction::UnassignedCustomer)
                .details(format!("Unassigned user ID {user_id}"));
            diesel::insert_into(crm_logs::table)
                .values(&NewCrmLog::from(&entry))
                .execute(conn)?;

            Ok(())
        })
    }
}

/// `LIKE` pattern matching `term` anywhere, with `\` as the escape character.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Attach assignees and the current pipeline stage to each customer,
/// keeping the input order.
fn load_details(
    conn: &mut SqliteConnection,
    db_customers: Vec<DbCustomer>,
) -> RepositoryResult<Vec<CustomerDetails>> {
    use crate::schema::sales_pipeline;

    if db_customers.is_empty() {
        return Ok(Vec::new());
    }

    let customer_ids: Vec<i32> = db_customers.iter().map(|customer| customer.id).collect();
    let mut assignees = load_assignees(conn, &customer_ids)?;

    let stage_rows = sales_pipeline::table
        .filter(sales_pipeline::customer_id.eq_any(&customer_ids))
        .order((
            sales_pipeline::customer_id.asc(),
            sales_pipeline::created_at.desc(),
            sales_pipeline::id.desc(),
        ))
        .select((sales_pipeline::customer_id, sales_pipeline::stage))
        .load::<(i32, String)>(conn)?;

    let mut stages: HashMap<i32, String> = HashMap::new();
    for (customer_id, stage) in stage_rows {
        stages.entry(customer_id).or_insert(stage);
    }

    Ok(db_customers
        .into_iter()
        .map(|customer| {
            let id = customer.id;
            CustomerDetails {
                customer: customer.into(),
                current_stage: stages.remove(&id),
                assignees: assignees.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

fn load_assignees(
    conn: &mut SqliteConnection,
    customer_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<Assignee>>> {
    use crate::schema::{customer_assignments, users};

    let rows = customer_assignments::table
        .inner_join(users::table)
        .filter(customer_assignments::customer_id.eq_any(customer_ids))
        .order((users::name.asc(), users::id.asc()))
        .select((customer_assignments::customer_id, users::id, users::name))
        .load::<(i32, i32, String)>(conn)?;

    let mut by_customer: HashMap<i32, Vec<Assignee>> = HashMap::new();
    for (customer_id, user_id, name) in rows {
        by_customer
            .entry(customer_id)
            .or_default()
            .push(Assignee { user_id, name });
    }

    Ok(by_customer)
}
