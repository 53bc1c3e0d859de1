use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::assignments::{
        AssignItemRequest, AssignmentWithItems, CreateFullAssignmentRequest,
        CreatePartialAssignmentRequest, UpdateAssignmentStatusRequest,
    },
    entity::{
        order_item_assignments::{
            ActiveModel as ItemAssignmentActive, Column as ItemAssignmentCol,
            Entity as OrderItemAssignments, Model as ItemAssignmentModel,
        },
        order_items::{Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::Entity as Orders,
        vendor_assignments::{
            ActiveModel as AssignmentActive, Entity as VendorAssignments,
            Model as AssignmentModel,
        },
        vendors::{Entity as Vendors, Model as VendorModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{OrderItemAssignment, VendorAssignment},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Commission payable on an assigned amount, given a vendor's rate in percent.
pub fn commission_for(total_amount: Decimal, commission_rate: Decimal) -> Decimal {
    (total_amount * commission_rate / Decimal::ONE_HUNDRED).round_dp(2)
}

struct ValidatedItem {
    order_item: OrderItemModel,
    quantity: i32,
    assigned_amount: Decimal,
}

pub async fn create_partial_assignment(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: CreatePartialAssignmentRequest,
) -> AppResult<ApiResponse<AssignmentWithItems>> {
    ensure_staff(user)?;
    create_assignment(
        state,
        user,
        order_id,
        payload.vendor_id,
        "partial",
        &payload.items,
        payload.notes,
    )
    .await
}

pub async fn create_full_assignment(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: CreateFullAssignmentRequest,
) -> AppResult<ApiResponse<AssignmentWithItems>> {
    ensure_staff(user)?;

    if let Some(items) = payload.items.as_ref() {
        return create_assignment(
            state,
            user,
            order_id,
            payload.vendor_id,
            "full",
            items,
            payload.notes,
        )
        .await;
    }

    // Whole-order path: the assignment covers the order without per-item
    // breakdown rows; commission is taken over the order's item totals.
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let vendor = find_approved_vendor(&txn, payload.vendor_id).await?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&txn)
        .await?;

    let total_amount: Decimal = items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum();
    let commission_amount = commission_for(total_amount, vendor.commission_rate);

    let assignment = AssignmentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        vendor_id: Set(vendor.id),
        assigned_by: Set(user.user_id),
        assignment_type: Set("full".into()),
        commission_amount: Set(commission_amount),
        notes: Set(payload.notes),
        status: Set("assigned".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    audit_assignment_created(state, user, &assignment, &vendor, 0, total_amount).await;

    Ok(ApiResponse::success(
        "Vendor assigned to order",
        AssignmentWithItems {
            assignment: assignment_from_entity(assignment),
            items: Vec::new(),
            total_amount,
        },
        Some(Meta::empty()),
    ))
}

async fn create_assignment(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    vendor_id: Uuid,
    assignment_type: &str,
    items: &[AssignItemRequest],
    notes: Option<String>,
) -> AppResult<ApiResponse<AssignmentWithItems>> {
    if items.is_empty() {
        return Err(AppError::Validation("items must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::Validation(
                "quantity must be greater than 0".into(),
            ));
        }
        if !seen.insert(item.order_item_id) {
            return Err(AppError::Validation(
                "duplicate order item in request".into(),
            ));
        }
    }

    let txn = state.orm.begin().await?;

    Orders::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let vendor = find_approved_vendor(&txn, vendor_id).await?;

    let mut validated: Vec<ValidatedItem> = Vec::with_capacity(items.len());
    let mut total_amount = Decimal::ZERO;

    for item in items {
        let order_item = OrderItems::find()
            .filter(
                Condition::all()
                    .add(OrderItemCol::Id.eq(item.order_item_id))
                    .add(OrderItemCol::OrderId.eq(order_id)),
            )
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order item not found in this order".into()))?;

        if item.quantity > order_item.quantity {
            return Err(AppError::Validation(format!(
                "Quantity exceeds available quantity for item {}",
                order_item.sku
            )));
        }

        // Strict allocation check: units already claimed by other assignments
        // are no longer available.
        let already_assigned = assigned_quantity_for_item(&txn, order_item.id).await?;
        let remaining = order_item.quantity - already_assigned;
        if item.quantity > remaining {
            return Err(AppError::Conflict(format!(
                "Item {} has only {} unassigned unit(s) left",
                order_item.sku, remaining
            )));
        }

        let assigned_amount = order_item.unit_price * Decimal::from(item.quantity);
        total_amount += assigned_amount;
        validated.push(ValidatedItem {
            order_item,
            quantity: item.quantity,
            assigned_amount,
        });
    }

    let commission_amount = commission_for(total_amount, vendor.commission_rate);

    let assignment = AssignmentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        vendor_id: Set(vendor.id),
        assigned_by: Set(user.user_id),
        assignment_type: Set(assignment_type.into()),
        commission_amount: Set(commission_amount),
        notes: Set(notes),
        status: Set("assigned".into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut rows: Vec<OrderItemAssignment> = Vec::with_capacity(validated.len());
    for item in &validated {
        let row = ItemAssignmentActive {
            id: Set(Uuid::new_v4()),
            vendor_assignment_id: Set(assignment.id),
            order_item_id: Set(item.order_item.id),
            quantity: Set(item.quantity),
            assigned_amount: Set(item.assigned_amount),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        rows.push(item_assignment_from_entity(row));
    }

    txn.commit().await?;

    audit_assignment_created(state, user, &assignment, &vendor, rows.len(), total_amount).await;

    Ok(ApiResponse::success(
        "Vendor assigned to order items",
        AssignmentWithItems {
            assignment: assignment_from_entity(assignment),
            items: rows,
            total_amount,
        },
        Some(Meta::empty()),
    ))
}

pub async fn remove_item_assignment(
    state: &AppState,
    user: &AuthUser,
    item_assignment_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;

    let row = OrderItemAssignments::find_by_id(item_assignment_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Item assignment not found".into()))?;

    let parent = VendorAssignments::find_by_id(row.vendor_assignment_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("item assignment without parent assignment"))
        })?;

    OrderItemAssignments::delete_by_id(row.id).exec(&txn).await?;

    let remaining = OrderItemAssignments::find()
        .filter(ItemAssignmentCol::VendorAssignmentId.eq(parent.id))
        .all(&txn)
        .await?;

    let parent_deleted = remaining.is_empty();
    if parent_deleted {
        // Last breakdown row gone: the assignment no longer claims anything.
        VendorAssignments::delete_by_id(parent.id).exec(&txn).await?;
    } else {
        let new_total: Decimal = remaining.iter().map(|r| r.assigned_amount).sum();
        let vendor = Vendors::find_by_id(parent.vendor_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Vendor not found".into()))?;

        let mut active: AssignmentActive = parent.clone().into();
        active.commission_amount = Set(commission_for(new_total, vendor.commission_rate));
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_assignment_removed",
        Some("order_item_assignments"),
        Some(serde_json::json!({
            "item_assignment_id": row.id,
            "vendor_assignment_id": parent.id,
            "quantity": row.quantity,
            "parent_deleted": parent_deleted,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item assignment removed",
        serde_json::json!({
            "vendor_assignment_id": parent.id,
            "parent_deleted": parent_deleted,
        }),
        Some(Meta::empty()),
    ))
}

pub async fn update_assignment_status(
    state: &AppState,
    user: &AuthUser,
    assignment_id: Uuid,
    payload: UpdateAssignmentStatusRequest,
) -> AppResult<ApiResponse<VendorAssignment>> {
    ensure_staff(user)?;

    let assignment = VendorAssignments::find_by_id(assignment_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".into()))?;

    validate_status_transition(&assignment.status, &payload.status)?;

    let mut active: AssignmentActive = assignment.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let assignment = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "assignment_status_update",
        Some("vendor_assignments"),
        Some(serde_json::json!({
            "assignment_id": assignment.id,
            "status": assignment.status,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Assignment updated",
        assignment_from_entity(assignment),
        Some(Meta::empty()),
    ))
}

async fn find_approved_vendor<C: sea_orm::ConnectionTrait>(
    conn: &C,
    vendor_id: Uuid,
) -> AppResult<VendorModel> {
    let vendor = Vendors::find_by_id(vendor_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor not found".into()))?;
    if vendor.status != "approved" {
        return Err(AppError::Validation(format!(
            "Vendor {} is not approved",
            vendor.company_name
        )));
    }
    Ok(vendor)
}

async fn assigned_quantity_for_item<C: sea_orm::ConnectionTrait>(
    conn: &C,
    order_item_id: Uuid,
) -> AppResult<i32> {
    let rows = OrderItemAssignments::find()
        .filter(ItemAssignmentCol::OrderItemId.eq(order_item_id))
        .all(conn)
        .await?;
    Ok(rows.iter().map(|r| r.quantity).sum())
}

fn validate_status_transition(from: &str, to: &str) -> Result<(), AppError> {
    let allowed = match from {
        "assigned" => matches!(to, "accepted" | "rejected"),
        "accepted" => matches!(to, "in_progress" | "rejected"),
        "in_progress" => to == "completed",
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Cannot change assignment status from {from} to {to}"
        )))
    }
}

async fn audit_assignment_created(
    state: &AppState,
    user: &AuthUser,
    assignment: &AssignmentModel,
    vendor: &VendorModel,
    item_count: usize,
    total_amount: Decimal,
) {
    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "assignment_created",
        Some("vendor_assignments"),
        Some(serde_json::json!({
            "assignment_id": assignment.id,
            "vendor": vendor.company_name,
            "assignment_type": assignment.assignment_type,
            "item_count": item_count,
            "total_amount": total_amount,
            "commission_amount": assignment.commission_amount,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
}

pub(crate) fn assignment_from_entity(model: AssignmentModel) -> VendorAssignment {
    VendorAssignment {
        id: model.id,
        order_id: model.order_id,
        vendor_id: model.vendor_id,
        assigned_by: model.assigned_by,
        assignment_type: model.assignment_type,
        commission_amount: model.commission_amount,
        notes: model.notes,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn item_assignment_from_entity(model: ItemAssignmentModel) -> OrderItemAssignment {
    OrderItemAssignment {
        id: model.id,
        vendor_assignment_id: model.vendor_assignment_id,
        order_item_id: model.order_item_id,
        quantity: model.quantity,
        assigned_amount: model.assigned_amount,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
