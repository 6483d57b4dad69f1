//! PostgreSQL catalog store.
//!
//! Purchases are expressed as conditional updates (`... WHERE quantity >=
//! $amount`) so the database itself enforces non-negative stock; no
//! application-level lock is needed and multiple server nodes can share
//! one database.
//!
//! Queries use the sqlx runtime API; migrations are embedded from
//! `crates/server/migrations/` and run at startup.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use sweet_shop_core::SweetId;

use super::{CatalogError, CatalogStore, SweetFilter};
use crate::models::{NewSweet, Sweet, SweetPatch};

const COLUMNS: &str =
    "id, name, description, category, price, quantity, image_url, created_at, updated_at";

/// Catalog store backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

/// Raw row as stored; converted into [`Sweet`] with invariant checks.
#[derive(sqlx::FromRow)]
struct SweetRow {
    id: Uuid,
    name: String,
    description: String,
    category: String,
    price: Decimal,
    quantity: i64,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SweetRow> for Sweet {
    type Error = CatalogError;

    fn try_from(row: SweetRow) -> Result<Self, CatalogError> {
        let category = row
            .category
            .parse()
            .map_err(|e: String| CatalogError::Corrupt(format!("category in database: {e}")))?;

        Ok(Self {
            id: SweetId::from(row.id),
            name: row.name,
            description: row.description,
            category,
            price: row.price,
            quantity: row.quantity,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PgCatalog {
    /// Connect to the database with sensible pool defaults.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection cannot be established.
    pub async fn connect(database_url: &secrecy::SecretString) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;

        Ok(Self { pool })
    }

    /// Run embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError` if a migration fails.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Build from an existing pool (tests).
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters so a name filter matches literally.
fn like_pattern(name: &str) -> String {
    let escaped = name
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn get(&self, id: SweetId) -> Result<Option<Sweet>, CatalogError> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {COLUMNS} FROM sweet WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Sweet::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Sweet>, CatalogError> {
        let rows = sqlx::query_as::<_, SweetRow>(&format!(
            "SELECT {COLUMNS} FROM sweet ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Sweet::try_from).collect()
    }

    async fn search(&self, filter: &SweetFilter) -> Result<Vec<Sweet>, CatalogError> {
        let rows = sqlx::query_as::<_, SweetRow>(&format!(
            r"
            SELECT {COLUMNS} FROM sweet
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::numeric IS NULL OR price >= $3)
              AND ($4::numeric IS NULL OR price <= $4)
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(filter.name.as_deref().map(like_pattern))
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Sweet::try_from).collect()
    }

    async fn insert(&self, new: NewSweet) -> Result<Sweet, CatalogError> {
        let sweet = Sweet::from_new(new);

        sqlx::query(
            r"
            INSERT INTO sweet (id, name, description, category, price, quantity,
                               image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(sweet.id.as_uuid())
        .bind(&sweet.name)
        .bind(&sweet.description)
        .bind(sweet.category.as_str())
        .bind(sweet.price)
        .bind(sweet.quantity)
        .bind(&sweet.image_url)
        .bind(sweet.created_at)
        .bind(sweet.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(sweet)
    }

    async fn update(&self, id: SweetId, patch: SweetPatch) -> Result<Sweet, CatalogError> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            r"
            UPDATE sweet SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                category    = COALESCE($4, category),
                price       = COALESCE($5, price),
                quantity    = COALESCE($6, quantity),
                image_url   = COALESCE($7, image_url),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.price)
        .bind(patch.quantity)
        .bind(patch.image_url)
        .fetch_optional(&self.pool)
        .await?;

        row.map_or(Err(CatalogError::NotFound), Sweet::try_from)
    }

    async fn delete(&self, id: SweetId) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM sweet WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }
        Ok(())
    }

    async fn purchase(&self, id: SweetId, amount: i64) -> Result<Sweet, CatalogError> {
        // Conditional decrement: succeeds only when enough stock exists,
        // so two concurrent purchases can never both win borderline stock.
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            r"
            UPDATE sweet
            SET quantity = quantity - $2, updated_at = NOW()
            WHERE id = $1 AND quantity >= $2
            RETURNING {COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Sweet::try_from(row);
        }

        // Disambiguate: missing item vs. not enough stock.
        let available: Option<(i64,)> =
            sqlx::query_as("SELECT quantity FROM sweet WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        match available {
            Some((available,)) => Err(CatalogError::InsufficientStock { available }),
            None => Err(CatalogError::NotFound),
        }
    }

    async fn restock(&self, id: SweetId, amount: i64) -> Result<Sweet, CatalogError> {
        let row = sqlx::query_as::<_, SweetRow>(&format!(
            r"
            UPDATE sweet
            SET quantity = quantity + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id.as_uuid())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        row.map_or(Err(CatalogError::NotFound), Sweet::try_from)
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
