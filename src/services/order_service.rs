use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{IngestOrderRequest, OrderDetails, OrderList, OrderWithItems},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        vendor_assignments::{Column as AssignmentCol, Entity as VendorAssignments},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::assignment_service::assignment_from_entity,
    state::AppState,
};

const PLATFORMS: [&str; 3] = ["shopify", "bigcommerce", "woocommerce"];

pub async fn ingest_order(
    state: &AppState,
    user: &AuthUser,
    payload: IngestOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;

    if !PLATFORMS.contains(&payload.platform.as_str()) {
        return Err(AppError::Validation(format!(
            "Unknown platform {}",
            payload.platform
        )));
    }
    if payload.items.is_empty() {
        return Err(AppError::Validation("items must not be empty".into()));
    }
    for item in &payload.items {
        if item.quantity <= 0 {
            return Err(AppError::Validation(
                "quantity must be greater than 0".into(),
            ));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(AppError::Validation(
                "unit_price must not be negative".into(),
            ));
        }
    }

    let txn = state.orm.begin().await?;

    let duplicate = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Platform.eq(payload.platform.clone()))
                .add(OrderCol::ExternalOrderId.eq(payload.external_order_id.clone())),
        )
        .one(&txn)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(format!(
            "Order {} already ingested from {}",
            payload.external_order_id, payload.platform
        )));
    }

    let total_amount: Decimal = payload
        .items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum();

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        platform: Set(payload.platform.clone()),
        external_order_id: Set(payload.external_order_id.clone()),
        customer_name: Set(payload.customer_name),
        customer_email: Set(payload.customer_email),
        total_amount: Set(total_amount),
        status: Set("received".into()),
        order_date: Set(payload.order_date.unwrap_or_else(Utc::now).into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(payload.items.len());
    for item in payload.items {
        let row = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_name: Set(item.product_name),
            sku: Set(item.sku),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(row));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_ingested",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "platform": order.platform,
            "external_order_id": order.external_order_id,
            "item_count": items.len(),
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order ingested",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(platform) = query.platform.as_ref().filter(|p| !p.is_empty()) {
        condition = condition.add(OrderCol::Platform.eq(platform.clone()));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::OrderDate),
        SortOrder::Desc => finder.order_by_desc(OrderCol::OrderDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetails>> {
    ensure_staff(user)?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    let vendor_assignments = VendorAssignments::find()
        .filter(AssignmentCol::OrderId.eq(order.id))
        .order_by_asc(AssignmentCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(assignment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Order found",
        OrderDetails {
            order: order_from_entity(order),
            items,
            vendor_assignments,
        },
        Some(Meta::empty()),
    ))
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        platform: model.platform,
        external_order_id: model.external_order_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        total_amount: model.total_amount,
        status: model.status,
        order_date: model.order_date.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_name: model.product_name,
        sku: model.sku,
        quantity: model.quantity,
        unit_price: model.unit_price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
