use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};

use crate::bccr::QuoteSource;
use crate::job::{self, JobOutcome};
use crate::rates::RateMode;
use crate::store::RateStore;

/// One daily trigger: run the update in `mode` every day at `at` (UTC).
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub mode: RateMode,
    pub at: NaiveTime,
}

/// Runs a trigger forever. The target date is taken at the trigger
/// instant; a failed run is logged and the loop keeps going.
pub async fn run_trigger(
    trigger: Trigger,
    source: Arc<dyn QuoteSource>,
    store: Arc<dyn RateStore>,
    currency: String,
) {
    loop {
        let wait = until_next(Utc::now(), trigger.at);
        log::info!(
            "next {:?} rate update in {}s (daily at {} UTC)",
            trigger.mode,
            wait.as_secs(),
            trigger.at.format("%H:%M"),
        );
        tokio::time::sleep(wait).await;

        let today = Utc::now().date_naive();
        match job::update_daily_rate(
            source.as_ref(),
            store.as_ref(),
            &currency,
            today,
            trigger.mode,
        )
        .await
        {
            Ok(JobOutcome::Updated(_)) | Ok(JobOutcome::NoData) => {}
            Err(err) => log::error!("{:?} rate update for {today} failed: {err}", trigger.mode),
        }
    }
}

/// Time left until the next daily occurrence of `at`.
fn until_next(now: DateTime<Utc>, at: NaiveTime) -> Duration {
    let today = now.date_naive().and_time(at).and_utc();
    let next = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn waits_until_later_today_when_the_trigger_is_ahead() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 5, 0, 0).unwrap();
        assert_eq!(until_next(now, at(6, 30)), Duration::from_secs(90 * 60));
    }

    #[test]
    fn rolls_over_to_tomorrow_when_the_trigger_already_passed() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 7, 0, 0).unwrap();
        assert_eq!(
            until_next(now, at(6, 30)),
            Duration::from_secs((23 * 60 + 30) * 60)
        );
    }

    #[test]
    fn an_exact_hit_schedules_the_next_day() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 6, 30, 0).unwrap();
        assert_eq!(until_next(now, at(6, 30)), Duration::from_secs(24 * 60 * 60));
    }
}
