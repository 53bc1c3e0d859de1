use marketplace_backoffice_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::assignments::{AssignItemRequest, CreatePartialAssignmentRequest},
    entity::{
        order_items::ActiveModel as OrderItemActive, orders::ActiveModel as OrderActive,
        users::ActiveModel as UserActive, vendors::ActiveModel as VendorActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{assignment_service, splitting_service},
    state::AppState,
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: partial assignment with commission, over-assignment
// rejection, cross-vendor conflict, and removal with cascade cleanup.
#[tokio::test]
async fn partial_assignment_and_removal_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let staff_id = create_user(&state, "staff", "staff@example.com").await?;
    let staff = AuthUser {
        user_id: staff_id,
        role: "staff".into(),
    };

    let vendor_a = create_vendor(&state, "Acme Prints", dec!(10), "approved").await?;
    let vendor_b = create_vendor(&state, "Stitch & Co", dec!(12.5), "approved").await?;

    let order_id = create_order(&state, "shopify", "EXT-1").await?;
    // Item A: qty 10 at 5.00, item B: qty 2 at 7.50
    let item_a = create_order_item(&state, order_id, "Custom Mug", "MUG-01", 10, dec!(5.00)).await?;
    let item_b = create_order_item(&state, order_id, "Tote Bag", "TOTE-02", 2, dec!(7.50)).await?;

    // Assign qty 4 of item A plus both units of item B to vendor A.
    let resp = assignment_service::create_partial_assignment(
        &state,
        &staff,
        order_id,
        CreatePartialAssignmentRequest {
            vendor_id: vendor_a,
            items: vec![
                AssignItemRequest {
                    order_item_id: item_a,
                    quantity: 4,
                },
                AssignItemRequest {
                    order_item_id: item_b,
                    quantity: 2,
                },
            ],
            notes: Some("rush job".into()),
        },
    )
    .await?;
    let created = resp.data.unwrap();
    // 4 * 5.00 + 2 * 7.50 = 35.00; commission at 10% = 3.50
    assert_eq!(created.total_amount, dec!(35.00));
    assert_eq!(created.assignment.commission_amount, dec!(3.50));
    assert_eq!(created.assignment.assignment_type, "partial");
    assert_eq!(created.items.len(), 2);
    let row_a = created
        .items
        .iter()
        .find(|r| r.order_item_id == item_a)
        .unwrap();
    assert_eq!(row_a.assigned_amount, dec!(20.00));

    // Splitting report reflects the allocation, and is idempotent.
    let first = splitting_service::get_order_splitting(&state, order_id)
        .await?
        .data
        .unwrap();
    let summary_a = first
        .items
        .iter()
        .find(|s| s.order_item_id == item_a)
        .unwrap();
    assert_eq!(summary_a.assigned_quantity, 4);
    assert_eq!(summary_a.remaining_quantity, 6);
    assert!(!summary_a.is_fully_assigned);
    let summary_b = first
        .items
        .iter()
        .find(|s| s.order_item_id == item_b)
        .unwrap();
    assert!(summary_b.is_fully_assigned);

    let second = splitting_service::get_order_splitting(&state, order_id)
        .await?
        .data
        .unwrap();
    for (lhs, rhs) in first.items.iter().zip(second.items.iter()) {
        assert_eq!(lhs.assigned_quantity, rhs.assigned_quantity);
        assert_eq!(lhs.remaining_quantity, rhs.remaining_quantity);
    }

    // Quantity above the item's own total is a validation failure.
    let err = assignment_service::create_partial_assignment(
        &state,
        &staff,
        order_id,
        CreatePartialAssignmentRequest {
            vendor_id: vendor_b,
            items: vec![AssignItemRequest {
                order_item_id: item_a,
                quantity: 11,
            }],
            notes: None,
        },
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("exceeds available quantity")),
        other => panic!("expected validation error, got {other:?}"),
    }

    // Quantity above what is left after vendor A's claim is a conflict.
    let err = assignment_service::create_partial_assignment(
        &state,
        &staff,
        order_id,
        CreatePartialAssignmentRequest {
            vendor_id: vendor_b,
            items: vec![AssignItemRequest {
                order_item_id: item_a,
                quantity: 7,
            }],
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Removing a non-last row keeps the parent with a recomputed commission.
    let removed = assignment_service::remove_item_assignment(&state, &staff, row_a.id).await?;
    let removed = removed.data.unwrap();
    assert_eq!(removed["parent_deleted"], serde_json::json!(false));

    let report = splitting_service::get_order_splitting(&state, order_id)
        .await?
        .data
        .unwrap();
    let parent = report
        .vendor_assignments
        .iter()
        .find(|a| a.id == created.assignment.id)
        .unwrap();
    // Remaining amount 15.00 at 10% = 1.50
    assert_eq!(parent.commission_amount, dec!(1.50));
    let summary_a = report
        .items
        .iter()
        .find(|s| s.order_item_id == item_a)
        .unwrap();
    assert_eq!(summary_a.assigned_quantity, 0);
    assert_eq!(summary_a.remaining_quantity, 10);

    // Removing the last row cascades to the parent assignment.
    let row_b = report
        .items
        .iter()
        .find(|s| s.order_item_id == item_b)
        .unwrap()
        .assignments[0]
        .clone();
    let removed = assignment_service::remove_item_assignment(&state, &staff, row_b.id).await?;
    assert_eq!(removed.data.unwrap()["parent_deleted"], serde_json::json!(true));

    let report = splitting_service::get_order_splitting(&state, order_id)
        .await?
        .data
        .unwrap();
    assert!(report.vendor_assignments.is_empty());

    // The removed item assignment is gone too.
    let err = assignment_service::remove_item_assignment(&state, &staff, row_b.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_item_assignments, vendor_assignments, order_items, orders, vendors, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_vendor(
    state: &AppState,
    name: &str,
    rate: Decimal,
    status: &str,
) -> anyhow::Result<Uuid> {
    let vendor = VendorActive {
        id: Set(Uuid::new_v4()),
        company_name: Set(name.into()),
        contact_email: Set(format!("{}@example.com", name.to_lowercase().replace(' ', "-"))),
        commission_rate: Set(rate),
        status: Set(status.into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(vendor.id)
}

async fn create_order(state: &AppState, platform: &str, external_id: &str) -> anyhow::Result<Uuid> {
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        platform: Set(platform.into()),
        external_order_id: Set(external_id.into()),
        customer_name: Set("Test Customer".into()),
        customer_email: Set("customer@example.com".into()),
        total_amount: Set(Decimal::ZERO),
        status: Set("received".into()),
        order_date: Set(Utc::now().into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(order.id)
}

async fn create_order_item(
    state: &AppState,
    order_id: Uuid,
    name: &str,
    sku: &str,
    quantity: i32,
    unit_price: Decimal,
) -> anyhow::Result<Uuid> {
    let item = OrderItemActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        product_name: Set(name.into()),
        sku: Set(sku.into()),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(item.id)
}
