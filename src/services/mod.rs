pub mod assignment_service;
pub mod auth_service;
pub mod order_service;
pub mod splitting_service;
pub mod vendor_service;
