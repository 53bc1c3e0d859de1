use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, VendorAssignment};

/// One item assignment row enriched with product and vendor context.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemAssignmentDetail {
    pub id: Uuid,
    pub vendor_assignment_id: Uuid,
    pub order_item_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_company_name: String,
    pub assignment_status: String,
    pub quantity: i32,
    pub assigned_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemSummary {
    pub order_item_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub assigned_quantity: i32,
    pub remaining_quantity: i32,
    pub is_fully_assigned: bool,
    pub assignments: Vec<ItemAssignmentDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSplitting {
    pub order: Order,
    pub items: Vec<OrderItemSummary>,
    pub vendor_assignments: Vec<VendorAssignment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDistribution {
    pub vendor_id: Uuid,
    pub company_name: String,
    pub assignments_count: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SplittingAnalytics {
    pub split_orders: i64,
    pub vendors_involved: i64,
    pub total_split_amount: Decimal,
    pub avg_split_quantity: Decimal,
    pub vendor_distribution: Vec<VendorDistribution>,
}
