use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Vendor;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVendorRequest {
    pub company_name: String,
    pub contact_email: String,
    pub commission_rate: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVendorRequest {
    pub contact_email: Option<String>,
    pub commission_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVendorStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VendorList {
    pub items: Vec<Vendor>,
}
