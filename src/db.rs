#[derive(Clone)]
pub struct Database {
    pub pool: sqlx::PgPool,
}

impl Database {
    pub async fn connect(pg_url: &str) -> anyhow::Result<Self> {
        let pool = sqlx::PgPool::connect(pg_url).await?;

        Ok(Database { pool })
    }

    /// Runs the idempotent schema DDL. Safe to call on every startup.
    pub async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(crate::schema::SCHEMA)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
