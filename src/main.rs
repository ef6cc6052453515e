use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Result;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;

use crate::bccr::{BccrClient, QuoteSource};
use crate::config::Config;
use crate::rates::RateMode;
use crate::scheduler::Trigger;
use crate::store::{PgRateStore, RateStore};

mod api;
mod bccr;
mod config;
mod error;
mod indicador;
mod job;
mod rates;
mod scheduler;
mod store;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let source: Arc<dyn QuoteSource> = Arc::new(BccrClient::new(
        config.bccr_endpoint.clone(),
        config.requester.clone(),
        config.http_timeout,
    )?);
    let store: Arc<dyn RateStore> = Arc::new(PgRateStore::new(pool));

    if let Some(mode) = config.run_once {
        let today = Utc::now().date_naive();
        let outcome =
            job::update_daily_rate(source.as_ref(), store.as_ref(), &config.currency, today, mode)
                .await?;
        log::info!("run-once {mode:?} update finished: {outcome:?}");
        return Ok(());
    }

    let triggers = [
        (RateMode::Inverted, config.schedule_inverted),
        (RateMode::Direct, config.schedule_direct),
    ];
    for (mode, at) in triggers {
        if let Some(at) = at {
            tokio::spawn(scheduler::run_trigger(
                Trigger { mode, at },
                source.clone(),
                store.clone(),
                config.currency.clone(),
            ));
        }
    }

    let state = web::Data::new(api::ApiState { store });
    log::info!("listening on {}", config.bind_address);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind(&config.bind_address)?
        .run()
        .await?;

    Ok(())
}
