use diesel::prelude::*;

use crate::{
    domain::{
        audit::{AuditEntry, NewAuditEntry},
        interaction::{Interaction, NewInteraction},
        pipeline::{NewPipelineEntry, PipelineEntry},
    },
    models::crm::{
        CrmLog, CustomerLog, NewCrmLog, NewCustomerLog, NewPipelineRow, PipelineRow,
    },
    repository::{CrmLogReader, CrmLogWriter, DieselRepository, RepositoryResult},
};

impl CrmLogReader for DieselRepository {
    fn list_audit_entries(&self, customer_id: i32) -> RepositoryResult<Vec<AuditEntry>> {
        use crate::schema::{crm_logs, users};

        let mut conn = self.conn()?;
        let rows = crm_logs::table
            .inner_join(users::table.on(users::id.eq(crm_logs::user_id)))
            .filter(crm_logs::customer_id.eq(customer_id))
            .order((crm_logs::created_at.desc(), crm_logs::id.desc()))
            .select((CrmLog::as_select(), users::name))
            .load::<(CrmLog, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(log, user_name)| log.into_domain(user_name))
            .collect())
    }

    fn list_interactions(&self, customer_id: i32) -> RepositoryResult<Vec<Interaction>> {
        use crate::schema::{customer_logs, users};

        let mut conn = self.conn()?;
        let rows = customer_logs::table
            .inner_join(users::table.on(users::id.eq(customer_logs::user_id)))
            .filter(customer_logs::customer_id.eq(customer_id))
            .order((customer_logs::created_at.desc(), customer_logs::id.desc()))
            .select((CustomerLog::as_select(), users::name))
            .load::<(CustomerLog, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(log, user_name)| log.into_domain(user_name))
            .collect())
    }

    fn list_pipeline(&self, customer_id: i32) -> RepositoryResult<Vec<PipelineEntry>> {
        use crate::schema::{sales_pipeline, users};

        let mut conn = self.conn()?;
        let rows = sales_pipeline::table
            .inner_join(users::table.on(users::id.eq(sales_pipeline::moved_by)))
            .filter(sales_pipeline::customer_id.eq(customer_id))
            .order((sales_pipeline::created_at.desc(), sales_pipeline::id.desc()))
            .select((PipelineRow::as_select(), users::name))
            .load::<(PipelineRow, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(row, moved_by_name)| row.into_domain(moved_by_name))
            .collect())
    }
}

impl CrmLogWriter for DieselRepository {
    fn append_audit_entry(&self, entry: &NewAuditEntry) -> RepositoryResult<()> {
        use crate::schema::crm_logs;

        let mut conn = self.conn()?;
        diesel::insert_into(crm_logs::table)
            .values(&NewCrmLog::from(entry))
            .execute(&mut conn)?;

        Ok(())
    }

    fn add_interaction(&self, interaction: &NewInteraction) -> RepositoryResult<Interaction> {
        use crate::schema::{customer_logs, customers, users};

        self.write_transaction(|conn| {
            let created = diesel::insert_into(customer_logs::table)
                .values(&NewCustomerLog::from(interaction))
                .get_result::<CustomerLog>(conn)?;

            diesel::update(customers::table.filter(customers::id.eq(interaction.customer_id)))
                .set(customers::last_contacted_at.eq(Some(created.created_at)))
                .execute(conn)?;

            let user_name = users::table
                .filter(users::id.eq(created.user_id))
                .select(users::name)
                .first::<String>(conn)?;

            Ok(created.into_domain(user_name))
        })
    }

    fn add_pipeline_entry(&self, entry: &NewPipelineEntry) -> RepositoryResult<PipelineEntry> {
        use crate::schema::{sales_pipeline, users};

        let mut conn = self.conn()?;
        let created = diesel::insert_into(sales_pipeline::table)
            .values(&NewPipelineRow::from(entry))
            .get_result::<PipelineRow>(&mut conn)?;

        let moved_by_name = users::table
            .filter(users::id.eq(created.moved_by))
            .select(users::name)
            .first::<String>(&mut conn)?;

        Ok(created.into_domain(moved_by_name))
    }
}
