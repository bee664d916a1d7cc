use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: i32,
    pub last_contacted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub name: &'a str,
    pub company: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub created_by: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCustomer<'a> {
    pub name: &'a str,
    pub company: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customer_assignments)]
pub struct NewAssignment {
    pub customer_id: i32,
    pub user_id: i32,
}

impl From<Customer> for DomainCustomer {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            name: value.name,
            company: value.company,
            email: value.email,
            phone: value.phone,
            status: value.status,
            notes: value.notes,
            created_by: value.created_by,
            last_contacted_at: value.last_contacted_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            name: value.name.as_str(),
            company: value.company.as_deref(),
            email: value.email.as_deref(),
            phone: value.phone.as_deref(),
            status: value.status.as_str(),
            notes: value.notes.as_deref(),
            created_by: value.created_by,
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(value: &'a DomainUpdateCustomer) -> Self {
        Self {
            name: value.name.as_str(),
            company: value.company.as_deref(),
            email: value.email.as_deref(),
            phone: value.phone.as_deref(),
            status: value.status.as_str(),
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
