use crate::access::{Action, Resource, authorize, require};
use crate::domain::{
    audit::AuditEntry,
    auth::AuthenticatedUser,
    customer::{Assignee, Customer, CustomerDetails, CustomerListQuery, CustomerMatch},
    interaction::Interaction,
};
use crate::forms::customers::{
    AssignForm, CustomerForm, InteractionForm, SearchQuery, UnassignForm,
};
use crate::repository::{CrmLogReader, CrmLogWriter, CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult};

/// Maximum number of matches returned by the search box.
pub const SEARCH_LIMIT: i64 = 10;

/// Load a customer and check `action` against it.
///
/// A missing customer is reported before any ownership failure.
pub(crate) fn load_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    action: Action,
    customer_id: i32,
) -> ServiceResult<CustomerDetails>
where
    R: CustomerReader + ?Sized,
{
    require(user, action)?;
    let customer = repo
        .get_customer_by_id(customer_id)?
        .ok_or_else(|| ServiceError::not_found("customer"))?;
    authorize(user, action, Resource::Customer(&customer))?;
    Ok(customer)
}

/// Customers visible to the user: everything for super_admin, otherwise the
/// customers assigned to them.
pub fn list_customers<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<CustomerDetails>>
where
    R: CustomerReader + ?Sized,
{
    require(user, Action::ReadCustomer)?;
    Ok(repo.list_customers(visible_to(user))?)
}

pub fn search_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SearchQuery,
) -> ServiceResult<Vec<CustomerMatch>>
where
    R: CustomerReader + ?Sized,
{
    require(user, Action::ReadCustomer)?;
    let term = query.into_term().map_err(ServiceError::invalid)?;
    let query = visible_to(user).search(term).limit(SEARCH_LIMIT);
    Ok(repo.search_customers(query)?)
}

fn visible_to(user: &AuthenticatedUser) -> CustomerListQuery {
    let query = CustomerListQuery::new();
    if user.is_super_admin() {
        query
    } else {
        query.assigned_to(user.id)
    }
}

/// Create a customer owned by, and assigned to, the acting user.
pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CustomerForm,
) -> ServiceResult<CustomerDetails>
where
    R: CustomerWriter + ?Sized,
{
    require(user, Action::CreateCustomer)?;

    let new_customer = form
        .into_new_customer(user.id)
        .map_err(ServiceError::invalid)?;
    let created = repo.create_customer(&new_customer)?;
    log::info!("User {} created customer {}", user.id, created.customer.id);
    Ok(created)
}

pub fn get_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<CustomerDetails>
where
    R: CustomerReader + ?Sized,
{
    load_customer(repo, user, Action::ReadCustomer, customer_id)
}

pub fn update_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    load_customer(repo, user, Action::UpdateCustomer, customer_id)?;

    let updates = form.into_update_customer().map_err(ServiceError::invalid)?;
    Ok(repo.update_customer(customer_id, &updates, user.id)?)
}

/// Delete a customer and all of its CRM history. Customers still referenced
/// by quotes or orders are kept and reported as a conflict.
pub fn delete_customer<R>(repo: &R, user: &AuthenticatedUser, customer_id: i32) -> ServiceResult<()>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    load_customer(repo, user, Action::DeleteCustomer, customer_id)?;

    repo.delete_customer(customer_id)?;
    log::info!("User {} deleted customer {customer_id}", user.id);
    Ok(())
}

/// Replace the assignee set of a customer.
pub fn assign_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: AssignForm,
) -> ServiceResult<Vec<Assignee>>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    load_customer(repo, user, Action::AssignCustomer, customer_id)?;

    let user_ids = form.into_user_ids();
    let assignees = repo.assign_customer(customer_id, &user_ids, user.id)?;
    log::info!(
        "User {} assigned customer {customer_id} to {user_ids:?}",
        user.id
    );
    Ok(assignees)
}

pub fn unassign_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: UnassignForm,
) -> ServiceResult<()>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    load_customer(repo, user, Action::AssignCustomer, customer_id)?;

    repo.unassign_customer(customer_id, form.user_id, user.id)
        .map_err(ServiceError::missing("assignment"))?;
    log::info!(
        "User {} unassigned user {} from customer {customer_id}",
        user.id,
        form.user_id
    );
    Ok(())
}

/// System audit trail of a customer, newest first.
pub fn list_audit_log<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Vec<AuditEntry>>
where
    R: CustomerReader + CrmLogReader + ?Sized,
{
    load_customer(repo, user, Action::ReadAuditLog, customer_id)?;
    Ok(repo.list_audit_entries(customer_id)?)
}

pub fn list_interactions<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Vec<Interaction>>
where
    R: CustomerReader + CrmLogReader + ?Sized,
{
    load_customer(repo, user, Action::ReadInteractions, customer_id)?;
    Ok(repo.list_interactions(customer_id)?)
}

/// Record a contact with the customer; also refreshes its last contact time.
pub fn add_interaction<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: InteractionForm,
) -> ServiceResult<Interaction>
where
    R: CustomerReader + CrmLogWriter + ?Sized,
{
    load_customer(repo, user, Action::AddInteraction, customer_id)?;

    let interaction = form
        .into_new_interaction(customer_id, user.id)
        .map_err(ServiceError::invalid)?;
    Ok(repo.add_interaction(&interaction)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::repository::RepositoryError;
    use crate::repository::mock::MockRepository;
    use chrono::NaiveDateTime;

    pub(crate) fn actor(id: i32, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
            role,
        }
    }

    pub(crate) fn customer(id: i32, assignees: &[i32]) -> CustomerDetails {
        CustomerDetails {
            customer: Customer {
                id,
                name: format!("Customer {id}"),
                company: None,
                email: Some(format!("buyer{id}@example.com")),
                phone: None,
                status: "lead".into(),
                notes: None,
                created_by: 1,
                last_contacted_at: None,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            },
            current_stage: None,
            assignees: assignees
                .iter()
                .map(|user_id| Assignee {
                    user_id: *user_id,
                    name: format!("user {user_id}"),
                })
                .collect(),
        }
    }

    fn form() -> CustomerForm {
        CustomerForm {
            name: "Acme".into(),
            company: None,
            email: None,
            phone: None,
            status: Some("active".into()),
            notes: None,
        }
    }

    #[test]
    fn reps_only_list_their_assigned_customers() {
        let mut repo = MockRepository::new();
        repo.expect_list_customers()
            .withf(|query| query.assigned_to == Some(7))
            .returning(|_| Ok(vec![customer(1, &[7])]));

        let customers = list_customers(&repo, &actor(7, Role::SalesRep)).expect("list");
        assert_eq!(customers.len(), 1);
    }

    #[test]
    fn super_admin_lists_every_customer() {
        let mut repo = MockRepository::new();
        repo.expect_list_customers()
            .withf(|query| query.assigned_to.is_none())
            .returning(|_| Ok(vec![customer(1, &[]), customer(2, &[3])]));

        let customers = list_customers(&repo, &actor(1, Role::SuperAdmin)).expect("list");
        assert_eq!(customers.len(), 2);
    }

    #[test]
    fn search_is_limited_and_scoped() {
        let mut repo = MockRepository::new();
        repo.expect_search_customers()
            .withf(|query| {
                query.limit == Some(SEARCH_LIMIT)
                    && query.assigned_to == Some(4)
                    && query.search.as_deref() == Some("acme")
            })
            .returning(|_| {
                Ok(vec![CustomerMatch {
                    id: 1,
                    name: "Acme".into(),
                }])
            });

        let matches = search_customers(
            &repo,
            &actor(4, Role::Csr),
            SearchQuery {
                search: Some(" acme ".into()),
            },
        )
        .expect("search");
        assert_eq!(matches[0].name, "Acme");
    }

    #[test]
    fn unassigned_rep_cannot_update_customer() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[2]))));
        repo.expect_update_customer().never();

        let result = update_customer(&repo, &actor(9, Role::SalesRep), 5, form());
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn unassigning_an_absent_assignment_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[2]))));
        repo.expect_unassign_customer()
            .withf(|customer_id, user_id, actor_id| {
                *customer_id == 5 && *user_id == 8 && *actor_id == 1
            })
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let result = unassign_customer(
            &repo,
            &actor(1, Role::SuperAdmin),
            5,
            UnassignForm { user_id: 8 },
        );
        assert!(matches!(result, Err(ServiceError::NotFound(what)) if what.contains("assignment")));
    }

    #[test]
    fn assigned_rep_updates_customer() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[9]))));
        repo.expect_update_customer()
            .withf(|id, updates, actor_id| *id == 5 && updates.status == "active" && *actor_id == 9)
            .returning(|id, _, _| Ok(customer(id, &[9]).customer));

        let updated = update_customer(&repo, &actor(9, Role::SalesRep), 5, form()).expect("updated");
        assert_eq!(updated.id, 5);
    }

    #[test]
    fn super_admin_bypasses_ownership() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[]))));

        let found = get_customer(&repo, &actor(1, Role::SuperAdmin), 5).expect("found");
        assert_eq!(found.customer.id, 5);
    }

    #[test]
    fn missing_customer_is_not_found_before_forbidden() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id().returning(|_| Ok(None));

        let result = get_customer(&repo, &actor(9, Role::SalesRep), 5);
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn only_super_admin_deletes() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id().never();
        repo.expect_delete_customer().never();

        let result = delete_customer(&repo, &actor(9, Role::SalesRep), 5);
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn delete_blocked_by_quotes_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[]))));
        repo.expect_delete_customer()
            .returning(|_| Err(RepositoryError::Conflict("customer is referenced".into())));

        let result = delete_customer(&repo, &actor(1, Role::SuperAdmin), 5);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn assignment_passes_deduplicated_ids() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[]))));
        repo.expect_assign_customer()
            .withf(|id, user_ids, actor_id| *id == 5 && user_ids == [3, 4] && *actor_id == 1)
            .returning(|id, _, _| Ok(customer(id, &[3, 4]).assignees));

        let form = AssignForm {
            user_ids: vec![Some(3), None, Some(4), Some(3)],
        };
        let assignees =
            assign_customer(&repo, &actor(1, Role::SuperAdmin), 5, form).expect("assigned");
        assert_eq!(assignees.len(), 2);
    }

    #[test]
    fn audit_log_is_super_admin_only() {
        let mut repo = MockRepository::new();
        repo.expect_list_audit_entries().never();

        let result = list_audit_log(&repo, &actor(3, Role::Accountant), 5);
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }
}
