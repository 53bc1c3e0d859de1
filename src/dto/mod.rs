pub mod assignments;
pub mod auth;
pub mod orders;
pub mod splitting;
pub mod vendors;
