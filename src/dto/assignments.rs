use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{OrderItemAssignment, VendorAssignment};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignItemRequest {
    pub order_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePartialAssignmentRequest {
    pub vendor_id: Uuid,
    pub items: Vec<AssignItemRequest>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFullAssignmentRequest {
    pub vendor_id: Uuid,
    pub items: Option<Vec<AssignItemRequest>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAssignmentStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentWithItems {
    pub assignment: VendorAssignment,
    pub items: Vec<OrderItemAssignment>,
    pub total_amount: Decimal,
}
