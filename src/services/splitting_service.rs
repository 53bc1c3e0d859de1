use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::splitting::{
        ItemAssignmentDetail, OrderItemSummary, OrderSplitting, SplittingAnalytics,
        VendorDistribution,
    },
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::Entity as Orders,
        vendor_assignments::{Column as AssignmentCol, Entity as VendorAssignments},
    },
    error::{AppError, AppResult},
    models::OrderItem,
    response::{ApiResponse, Meta},
    routes::params::AnalyticsQuery,
    services::assignment_service::assignment_from_entity,
    state::AppState,
};

#[derive(FromRow)]
struct ItemAssignmentRow {
    id: Uuid,
    vendor_assignment_id: Uuid,
    order_item_id: Uuid,
    quantity: i32,
    assigned_amount: Decimal,
    vendor_id: Uuid,
    vendor_company_name: String,
    assignment_status: String,
}

pub async fn get_order_splitting(
    state: &AppState,
    order_id: Uuid,
) -> AppResult<ApiResponse<OrderSplitting>> {
    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let items: Vec<OrderItem> = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    let assignments = VendorAssignments::find()
        .filter(AssignmentCol::OrderId.eq(order.id))
        .order_by_asc(AssignmentCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(assignment_from_entity)
        .collect();

    let rows = sqlx::query_as::<_, ItemAssignmentRow>(
        r#"
        SELECT oia.id, oia.vendor_assignment_id, oia.order_item_id,
               oia.quantity, oia.assigned_amount,
               va.vendor_id, va.status AS assignment_status,
               v.company_name AS vendor_company_name
        FROM order_item_assignments oia
        JOIN vendor_assignments va ON va.id = oia.vendor_assignment_id
        JOIN vendors v ON v.id = va.vendor_id
        JOIN order_items oi ON oi.id = oia.order_item_id
        WHERE oi.order_id = $1
        ORDER BY oia.created_at
        "#,
    )
    .bind(order.id)
    .fetch_all(&state.pool)
    .await?;

    let details: Vec<ItemAssignmentDetail> = rows
        .into_iter()
        .map(|row| ItemAssignmentDetail {
            id: row.id,
            vendor_assignment_id: row.vendor_assignment_id,
            order_item_id: row.order_item_id,
            vendor_id: row.vendor_id,
            vendor_company_name: row.vendor_company_name,
            assignment_status: row.assignment_status,
            quantity: row.quantity,
            assigned_amount: row.assigned_amount,
        })
        .collect();

    let summaries = build_item_summaries(&items, details);

    let data = OrderSplitting {
        order: crate::services::order_service::order_from_entity(order),
        items: summaries,
        vendor_assignments: assignments,
    };

    Ok(ApiResponse::success(
        "Order splitting",
        data,
        Some(Meta::empty()),
    ))
}

/// Fold enriched item-assignment rows into per-item summaries.
fn build_item_summaries(
    items: &[OrderItem],
    details: Vec<ItemAssignmentDetail>,
) -> Vec<OrderItemSummary> {
    items
        .iter()
        .map(|item| {
            let assignments: Vec<ItemAssignmentDetail> = details
                .iter()
                .filter(|d| d.order_item_id == item.id)
                .cloned()
                .collect();
            let assigned_quantity: i32 = assignments.iter().map(|a| a.quantity).sum();
            let remaining_quantity = item.quantity - assigned_quantity;
            OrderItemSummary {
                order_item_id: item.id,
                product_name: item.product_name.clone(),
                sku: item.sku.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                assigned_quantity,
                remaining_quantity,
                is_fully_assigned: remaining_quantity == 0,
                assignments,
            }
        })
        .collect()
}

#[derive(FromRow)]
struct AnalyticsTotalsRow {
    split_orders: i64,
    vendors_involved: i64,
    total_split_amount: Decimal,
    avg_split_quantity: Decimal,
}

#[derive(FromRow)]
struct VendorDistributionRow {
    vendor_id: Uuid,
    company_name: String,
    assignments_count: i64,
    total_amount: Decimal,
}

pub async fn get_splitting_analytics(
    state: &AppState,
    query: AnalyticsQuery,
) -> AppResult<ApiResponse<SplittingAnalytics>> {
    let date_from: Option<DateTime<Utc>> = query.date_from;
    let date_to: Option<DateTime<Utc>> = query.date_to;

    let totals = sqlx::query_as::<_, AnalyticsTotalsRow>(
        r#"
        SELECT COUNT(DISTINCT o.id) AS split_orders,
               COUNT(DISTINCT va.vendor_id) AS vendors_involved,
               COALESCE(SUM(oia.assigned_amount), 0) AS total_split_amount,
               COALESCE(AVG(oia.quantity), 0) AS avg_split_quantity
        FROM order_item_assignments oia
        JOIN vendor_assignments va ON va.id = oia.vendor_assignment_id
        JOIN orders o ON o.id = va.order_id
        WHERE ($1::timestamptz IS NULL OR o.order_date >= $1)
          AND ($2::timestamptz IS NULL OR o.order_date <= $2)
        "#,
    )
    .bind(date_from)
    .bind(date_to)
    .fetch_one(&state.pool)
    .await?;

    let distribution = sqlx::query_as::<_, VendorDistributionRow>(
        r#"
        SELECT va.vendor_id, v.company_name,
               COUNT(oia.id) AS assignments_count,
               COALESCE(SUM(oia.assigned_amount), 0) AS total_amount
        FROM order_item_assignments oia
        JOIN vendor_assignments va ON va.id = oia.vendor_assignment_id
        JOIN vendors v ON v.id = va.vendor_id
        JOIN orders o ON o.id = va.order_id
        WHERE ($1::timestamptz IS NULL OR o.order_date >= $1)
          AND ($2::timestamptz IS NULL OR o.order_date <= $2)
        GROUP BY va.vendor_id, v.company_name
        ORDER BY assignments_count DESC
        "#,
    )
    .bind(date_from)
    .bind(date_to)
    .fetch_all(&state.pool)
    .await?;

    let data = SplittingAnalytics {
        split_orders: totals.split_orders,
        vendors_involved: totals.vendors_involved,
        total_split_amount: totals.total_split_amount,
        avg_split_quantity: totals.avg_split_quantity.round_dp(2),
        vendor_distribution: distribution
            .into_iter()
            .map(|row| VendorDistribution {
                vendor_id: row.vendor_id,
                company_name: row.company_name,
                assignments_count: row.assignments_count,
                total_amount: row.total_amount,
            })
            .collect(),
    };

    Ok(ApiResponse::success(
        "Splitting analytics",
        data,
        Some(Meta::empty()),
    ))
}

fn order_item_from_entity(model: crate::entity::order_items::Model) -> OrderItem {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: Uuid, quantity: i32, unit_price: Decimal) -> OrderItem {
        OrderItem {
            id,
            order_id: Uuid::new_v4(),
            product_name: "Widget".into(),
            sku: "SKU-1".into(),
            quantity,
            unit_price,
            created_at: Utc::now(),
        }
    }

    fn detail(order_item_id: Uuid, quantity: i32, assigned_amount: Decimal) -> ItemAssignmentDetail {
        ItemAssignmentDetail {
            id: Uuid::new_v4(),
            vendor_assignment_id: Uuid::new_v4(),
            order_item_id,
            vendor_id: Uuid::new_v4(),
            vendor_company_name: "Acme Prints".into(),
            assignment_status: "assigned".into(),
            quantity,
            assigned_amount,
        }
    }

    #[test]
    fn summary_derives_assigned_and_remaining() {
        let item_id = Uuid::new_v4();
        let items = vec![item(item_id, 10, dec!(5.00))];
        let details = vec![detail(item_id, 4, dec!(20.00))];

        let summaries = build_item_summaries(&items, details);
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.assigned_quantity, 4);
        assert_eq!(summary.remaining_quantity, 6);
        assert!(!summary.is_fully_assigned);
        assert_eq!(summary.assignments.len(), 1);
    }

    #[test]
    fn summary_marks_fully_assigned_item() {
        let item_id = Uuid::new_v4();
        let items = vec![item(item_id, 6, dec!(2.50))];
        let details = vec![detail(item_id, 2, dec!(5.00)), detail(item_id, 4, dec!(10.00))];

        let summaries = build_item_summaries(&items, details);
        assert_eq!(summaries[0].assigned_quantity, 6);
        assert_eq!(summaries[0].remaining_quantity, 0);
        assert!(summaries[0].is_fully_assigned);
    }

    #[test]
    fn summary_for_unassigned_item_is_empty() {
        let items = vec![item(Uuid::new_v4(), 3, dec!(1.00))];
        let summaries = build_item_summaries(&items, Vec::new());
        assert_eq!(summaries[0].assigned_quantity, 0);
        assert_eq!(summaries[0].remaining_quantity, 3);
        assert!(summaries[0].assignments.is_empty());
    }
}
