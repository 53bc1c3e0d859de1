use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem, VendorAssignment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestOrderRequest {
    pub platform: String,
    pub external_order_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub order_date: Option<DateTime<Utc>>,
    pub items: Vec<IngestItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestItemRequest {
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub vendor_assignments: Vec<VendorAssignment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
