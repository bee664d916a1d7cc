pub mod attachment;
pub mod crm;
pub mod customer;
pub mod inventory;
pub mod order;
pub mod product;
pub mod quote;
pub mod task;
pub mod user;
