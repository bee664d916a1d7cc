pub mod attachment;
pub mod audit;
pub mod auth;
pub mod customer;
pub mod interaction;
pub mod inventory;
pub mod money;
pub mod order;
pub mod pipeline;
pub mod product;
pub mod quote;
pub mod task;
pub mod user;
