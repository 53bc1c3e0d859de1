use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use marketplace_backoffice_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "admin").await?;
    let staff_id = ensure_user(&pool, "staff@example.com", "staff123", "staff").await?;
    seed_vendors(&pool).await?;
    seed_demo_order(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Staff ID: {staff_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_vendors(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let vendors = vec![
        ("Acme Prints", "orders@acmeprints.example", "10.00", "approved"),
        ("Stitch & Co", "hello@stitchco.example", "12.50", "approved"),
        ("Laser Lab", "ops@laserlab.example", "8.00", "pending"),
    ];

    for (name, email, rate, status) in vendors {
        sqlx::query(
            r#"
            INSERT INTO vendors (id, company_name, contact_email, commission_rate, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (company_name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(rate.parse::<Decimal>()?)
        .bind(status)
        .execute(pool)
        .await?;
    }

    println!("Seeded vendors");
    Ok(())
}

async fn seed_demo_order(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let order_id = Uuid::new_v4();
    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO orders (id, platform, external_order_id, customer_name, customer_email,
                            total_amount, status, order_date)
        VALUES ($1, 'shopify', 'DEMO-1001', 'Demo Customer', 'customer@example.com',
                $2, 'received', now())
        ON CONFLICT (platform, external_order_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(order_id)
    .bind("95.00".parse::<Decimal>()?)
    .fetch_optional(pool)
    .await?;

    let Some((order_id,)) = inserted else {
        println!("Demo order already present");
        return Ok(());
    };

    let items = vec![
        ("Custom Mug", "MUG-01", 10, "5.00"),
        ("Tote Bag", "TOTE-02", 5, "9.00"),
    ];
    for (name, sku, quantity, price) in items {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, product_name, sku, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(name)
        .bind(sku)
        .bind(quantity)
        .bind(price.parse::<Decimal>()?)
        .execute(pool)
        .await?;
    }

    println!("Seeded demo order");
    Ok(())
}
