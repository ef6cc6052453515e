use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::bccr::{Indicator, QuoteSource};
use crate::error::{Error, Result};
use crate::rates::{self, QuotePair, RateMode};
use crate::store::{DailyRate, RateStore};

/// What a single scheduled run did.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Updated(DailyRate),
    /// Neither indicator had an observation for the date; nothing written.
    NoData,
}

/// Fetch the day's selling and buying quotes, normalize them for the
/// ledger and upsert the daily record. One invocation per trigger.
///
/// The target date is an explicit input; only the scheduler consults the
/// wall clock. Fetch and database failures propagate as errors, while a
/// day with no publication at all is a deliberate [`JobOutcome::NoData`]
/// skip.
pub async fn update_daily_rate(
    source: &dyn QuoteSource,
    store: &dyn RateStore,
    currency: &str,
    date: NaiveDate,
    mode: RateMode,
) -> Result<JobOutcome> {
    let sell = source.indicator_value(Indicator::Sell, date).await?;
    let buy = source.indicator_value(Indicator::Buy, date).await?;

    if sell.is_none() && buy.is_none() {
        log::info!("no {currency} quotes published for {date}, skipping");
        return Ok(JobOutcome::NoData);
    }

    // A side the service left out is recorded as zero, raw and normalized.
    let quotes = QuotePair {
        sell: sell.unwrap_or(Decimal::ZERO),
        buy: buy.unwrap_or(Decimal::ZERO),
    };
    let normalized = rates::normalize(quotes, mode);

    let currency_id = store
        .currency_id(currency)
        .await?
        .ok_or_else(|| Error::UnknownCurrency(currency.to_string()))?;

    let rate = DailyRate {
        rate_date: date,
        sell_rate: normalized.sell,
        buy_rate: normalized.buy,
        sell_rate_raw: normalized.sell_raw,
        buy_rate_raw: normalized.buy_raw,
        currency_id,
    };
    store.upsert(&rate).await?;
    log::info!(
        "stored {currency} rates for {date}: sell {} (raw {}), buy {} (raw {})",
        rate.sell_rate,
        rate.sell_rate_raw,
        rate.buy_rate,
        rate.buy_rate_raw
    );
    Ok(JobOutcome::Updated(rate))
}
