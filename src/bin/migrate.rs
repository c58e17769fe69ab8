use bubulizer_orders::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let database_url = config
        .backend
        .database_url()
        .ok_or_else(|| anyhow::anyhow!("ORDER_BACKEND is not sqlite; nothing to migrate"))?;

    let pool = create_pool(database_url).await?;
    run_migrations(&orm_from_pool(pool)).await?;
    println!("Order tables ready at {database_url}");
    Ok(())
}
