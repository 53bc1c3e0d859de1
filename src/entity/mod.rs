pub mod order_item_assignments;
pub mod order_items;
pub mod orders;
pub mod users;
pub mod vendor_assignments;
pub mod vendors;

pub use order_item_assignments::Entity as OrderItemAssignments;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
pub use vendor_assignments::Entity as VendorAssignments;
pub use vendors::Entity as Vendors;
