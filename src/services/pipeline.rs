use crate::access::Action;
use crate::domain::{auth::AuthenticatedUser, pipeline::PipelineEntry};
use crate::forms::customers::PipelineForm;
use crate::repository::{CrmLogReader, CrmLogWriter, CustomerReader};
use crate::services::customers::load_customer;
use crate::services::{ServiceError, ServiceResult};

/// Stage history of a customer, newest first.
pub fn list_pipeline<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Vec<PipelineEntry>>
where
    R: CustomerReader + CrmLogReader + ?Sized,
{
    load_customer(repo, user, Action::ReadPipeline, customer_id)?;
    Ok(repo.list_pipeline(customer_id)?)
}

/// Move the customer to a new stage. The latest entry is the current stage.
pub fn add_stage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: PipelineForm,
) -> ServiceResult<PipelineEntry>
where
    R: CustomerReader + CrmLogWriter + ?Sized,
{
    load_customer(repo, user, Action::AddPipelineStage, customer_id)?;

    let entry = form
        .into_new_entry(customer_id, user.id)
        .map_err(ServiceError::invalid)?;
    let created = repo.add_pipeline_entry(&entry)?;
    log::info!(
        "User {} moved customer {customer_id} to stage {}",
        user.id,
        created.stage
    );
    Ok(created)
}
