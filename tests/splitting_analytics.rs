use marketplace_backoffice_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::assignments::{AssignItemRequest, CreateFullAssignmentRequest, CreatePartialAssignmentRequest},
    entity::{
        order_items::ActiveModel as OrderItemActive, orders::ActiveModel as OrderActive,
        users::ActiveModel as UserActive, vendors::ActiveModel as VendorActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::AnalyticsQuery,
    services::{assignment_service, splitting_service},
    state::AppState,
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Analytics over two orders split to the same vendor, plus the
// whole-order assignment path without breakdown rows.
#[tokio::test]
async fn analytics_aggregate_across_orders() -> anyhow::Result<()> {
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

    let vendor = create_vendor(&state, "Acme Prints", dec!(10), "approved").await?;

    // Order 1: one item worth 20.00 assigned in full.
    let order_1 = create_order(&state, "shopify", "EXT-10").await?;
    let item_1 = create_order_item(&state, order_1, "Custom Mug", "MUG-01", 4, dec!(5.00)).await?;
    assignment_service::create_partial_assignment(
        &state,
        &staff,
        order_1,
        CreatePartialAssignmentRequest {
            vendor_id: vendor,
            items: vec![AssignItemRequest {
                order_item_id: item_1,
                quantity: 4,
            }],
            notes: None,
        },
    )
    .await?;

    // Order 2: one item worth 30.00 assigned in full.
    let order_2 = create_order(&state, "bigcommerce", "EXT-11").await?;
    let item_2 = create_order_item(&state, order_2, "Tote Bag", "TOTE-02", 2, dec!(15.00)).await?;
    assignment_service::create_partial_assignment(
        &state,
        &staff,
        order_2,
        CreatePartialAssignmentRequest {
            vendor_id: vendor,
            items: vec![AssignItemRequest {
                order_item_id: item_2,
                quantity: 2,
            }],
            notes: None,
        },
    )
    .await?;

    let analytics = splitting_service::get_splitting_analytics(
        &state,
        AnalyticsQuery {
            date_from: None,
            date_to: None,
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(analytics.split_orders, 2);
    assert_eq!(analytics.vendors_involved, 1);
    assert_eq!(analytics.total_split_amount, dec!(50.00));
    // Quantities 4 and 2 average to 3.
    assert_eq!(analytics.avg_split_quantity, dec!(3.00));

    assert_eq!(analytics.vendor_distribution.len(), 1);
    let dist = &analytics.vendor_distribution[0];
    assert_eq!(dist.vendor_id, vendor);
    assert_eq!(dist.assignments_count, 2);
    assert_eq!(dist.total_amount, dec!(50.00));

    // A date window excluding both orders yields an empty report.
    let past = splitting_service::get_splitting_analytics(
        &state,
        AnalyticsQuery {
            date_from: None,
            date_to: Some(Utc::now() - chrono::Duration::days(30)),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(past.split_orders, 0);
    assert_eq!(past.total_split_amount, dec!(0));
    assert!(past.vendor_distribution.is_empty());

    // Whole-order assignment without items writes no breakdown rows and
    // takes commission over the order's item totals.
    let order_3 = create_order(&state, "woocommerce", "EXT-12").await?;
    create_order_item(&state, order_3, "Poster", "POST-03", 3, dec!(8.00)).await?;
    let resp = assignment_service::create_full_assignment(
        &state,
        &staff,
        order_3,
        CreateFullAssignmentRequest {
            vendor_id: vendor,
            items: None,
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resp.assignment.assignment_type, "full");
    assert_eq!(resp.total_amount, dec!(24.00));
    assert_eq!(resp.assignment.commission_amount, dec!(2.40));
    assert!(resp.items.is_empty());

    // Full assignment with explicit items behaves like the partial path
    // but keeps the full type, including the allocation checks.
    let order_4 = create_order(&state, "shopify", "EXT-13").await?;
    let item_4 = create_order_item(&state, order_4, "Sticker Sheet", "STK-04", 5, dec!(4.00)).await?;
    let resp = assignment_service::create_full_assignment(
        &state,
        &staff,
        order_4,
        CreateFullAssignmentRequest {
            vendor_id: vendor,
            items: Some(vec![AssignItemRequest {
                order_item_id: item_4,
                quantity: 2,
            }]),
            notes: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resp.assignment.assignment_type, "full");
    assert_eq!(resp.items.len(), 1);
    assert_eq!(resp.items[0].assigned_amount, dec!(8.00));
    assert_eq!(resp.assignment.commission_amount, dec!(0.80));

    // Only 3 units of item 4 are left; claiming 4 more is a conflict.
    let err = assignment_service::create_full_assignment(
        &state,
        &staff,
        order_4,
        CreateFullAssignmentRequest {
            vendor_id: vendor,
            items: Some(vec![AssignItemRequest {
                order_item_id: item_4,
                quantity: 4,
            }]),
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Analytics count only item-level splits; orders 3 and 4 both carry
    // full assignments, but only order 4 wrote breakdown rows.
    let analytics = splitting_service::get_splitting_analytics(
        &state,
        AnalyticsQuery {
            date_from: None,
            date_to: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(analytics.split_orders, 3);
    assert_eq!(analytics.total_split_amount, dec!(58.00));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

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
