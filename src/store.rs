use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// One persisted day of exchange rates. `rate_date` is the unique key of
/// the series; reruns for the same date overwrite every other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyRate {
    pub rate_date: NaiveDate,
    pub sell_rate: Decimal,
    pub buy_rate: Decimal,
    pub sell_rate_raw: Decimal,
    pub buy_rate_raw: Decimal,
    pub currency_id: Uuid,
}

#[async_trait]
pub trait RateStore: Send + Sync {
    /// Looks up a registered currency by its ISO code.
    async fn currency_id(&self, code: &str) -> Result<Option<Uuid>>;

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyRate>>;

    async fn latest(&self) -> Result<Option<DailyRate>>;

    /// Inserts the day's rates, or overwrites every field of the existing
    /// row for that date. A single statement, so overlapping runs can't
    /// duplicate a date or lose an update.
    async fn upsert(&self, rate: &DailyRate) -> Result<()>;
}

pub struct PgRateStore {
    pool: PgPool,
}

impl PgRateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RATE_COLUMNS: &str =
    "rate_date, sell_rate, buy_rate, sell_rate_raw, buy_rate_raw, currency_id";

#[async_trait]
impl RateStore for PgRateStore {
    async fn currency_id(&self, code: &str) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM currencies WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyRate>> {
        let rate = sqlx::query_as::<_, DailyRate>(&format!(
            "SELECT {RATE_COLUMNS} FROM daily_rates WHERE rate_date = $1"
        ))
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rate)
    }

    async fn latest(&self) -> Result<Option<DailyRate>> {
        let rate = sqlx::query_as::<_, DailyRate>(&format!(
            "SELECT {RATE_COLUMNS} FROM daily_rates ORDER BY rate_date DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(rate)
    }

    async fn upsert(&self, rate: &DailyRate) -> Result<()> {
        sqlx::query(
            "INSERT INTO daily_rates \
                 (rate_date, sell_rate, buy_rate, sell_rate_raw, buy_rate_raw, currency_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (rate_date) DO UPDATE SET \
                 sell_rate = EXCLUDED.sell_rate, \
                 buy_rate = EXCLUDED.buy_rate, \
                 sell_rate_raw = EXCLUDED.sell_rate_raw, \
                 buy_rate_raw = EXCLUDED.buy_rate_raw, \
                 currency_id = EXCLUDED.currency_id",
        )
        .bind(rate.rate_date)
        .bind(rate.sell_rate)
        .bind(rate.buy_rate)
        .bind(rate.sell_rate_raw)
        .bind(rate.buy_rate_raw)
        .bind(rate.currency_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
