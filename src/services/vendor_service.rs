use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::vendors::{
        CreateVendorRequest, UpdateVendorRequest, UpdateVendorStatusRequest, VendorList,
    },
    entity::vendors::{
        ActiveModel as VendorActive, Column as VendorCol, Entity as Vendors, Model as VendorModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::Vendor,
    response::{ApiResponse, Meta},
    routes::params::VendorListQuery,
    state::AppState,
};

pub async fn create_vendor(
    state: &AppState,
    user: &AuthUser,
    payload: CreateVendorRequest,
) -> AppResult<ApiResponse<Vendor>> {
    ensure_staff(user)?;
    validate_commission_rate(payload.commission_rate)?;

    let exists = Vendors::find()
        .filter(VendorCol::CompanyName.eq(payload.company_name.clone()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict(format!(
            "Vendor {} is already registered",
            payload.company_name
        )));
    }

    let vendor = VendorActive {
        id: Set(Uuid::new_v4()),
        company_name: Set(payload.company_name),
        contact_email: Set(payload.contact_email),
        commission_rate: Set(payload.commission_rate),
        status: Set("pending".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "vendor_created",
        Some("vendors"),
        Some(serde_json::json!({ "vendor_id": vendor.id, "company_name": vendor.company_name })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Vendor created",
        vendor_from_entity(vendor),
        Some(Meta::empty()),
    ))
}

pub async fn list_vendors(
    state: &AppState,
    user: &AuthUser,
    query: VendorListQuery,
) -> AppResult<ApiResponse<VendorList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(VendorCol::Status.eq(status.clone()));
    }

    let finder = Vendors::find()
        .filter(condition)
        .order_by_asc(VendorCol::CompanyName);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(vendor_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Vendors", VendorList { items }, Some(meta)))
}

pub async fn get_vendor(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Vendor>> {
    ensure_staff(user)?;
    let vendor = Vendors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor not found".into()))?;
    Ok(ApiResponse::success(
        "Vendor",
        vendor_from_entity(vendor),
        Some(Meta::empty()),
    ))
}

pub async fn update_vendor(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateVendorRequest,
) -> AppResult<ApiResponse<Vendor>> {
    ensure_admin(user)?;
    if let Some(rate) = payload.commission_rate {
        validate_commission_rate(rate)?;
    }

    let vendor = Vendors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor not found".into()))?;

    let mut active: VendorActive = vendor.into();
    if let Some(email) = payload.contact_email {
        active.contact_email = Set(email);
    }
    if let Some(rate) = payload.commission_rate {
        active.commission_rate = Set(rate);
    }
    active.updated_at = Set(Utc::now().into());
    let vendor = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Vendor updated",
        vendor_from_entity(vendor),
        Some(Meta::empty()),
    ))
}

pub async fn update_vendor_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateVendorStatusRequest,
) -> AppResult<ApiResponse<Vendor>> {
    ensure_admin(user)?;

    let vendor = Vendors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor not found".into()))?;

    validate_status_transition(&vendor.status, &payload.status)?;

    let mut active: VendorActive = vendor.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let vendor = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "vendor_status_update",
        Some("vendors"),
        Some(serde_json::json!({ "vendor_id": vendor.id, "status": vendor.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Vendor updated",
        vendor_from_entity(vendor),
        Some(Meta::empty()),
    ))
}

fn validate_commission_rate(rate: Decimal) -> Result<(), AppError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(AppError::Validation(
            "commission_rate must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

fn validate_status_transition(from: &str, to: &str) -> Result<(), AppError> {
    let allowed = match from {
        "pending" => to == "approved",
        "approved" => to == "suspended",
        "suspended" => to == "approved",
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Cannot change vendor status from {from} to {to}"
        )))
    }
}

fn vendor_from_entity(model: VendorModel) -> Vendor {
    Vendor {
        id: model.id,
        company_name: model.company_name,
        contact_email: model.contact_email,
        commission_rate: model.commission_rate,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn commission_rate_bounds() {
        assert!(validate_commission_rate(dec!(0)).is_ok());
        assert!(validate_commission_rate(dec!(12.5)).is_ok());
        assert!(validate_commission_rate(dec!(100)).is_ok());
        assert!(validate_commission_rate(dec!(-0.01)).is_err());
        assert!(validate_commission_rate(dec!(100.01)).is_err());
    }

    #[test]
    fn vendor_lifecycle_transitions() {
        assert!(validate_status_transition("pending", "approved").is_ok());
        assert!(validate_status_transition("approved", "suspended").is_ok());
        assert!(validate_status_transition("suspended", "approved").is_ok());
        assert!(validate_status_transition("pending", "suspended").is_err());
        assert!(validate_status_transition("approved", "pending").is_err());
    }
}
