use std::sync::Arc;

use actix_web::{HttpResponse, Responder, get, web};
use chrono::NaiveDate;

use crate::store::RateStore;

pub struct ApiState {
    pub store: Arc<dyn RateStore>,
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[get("/rates/latest")]
async fn latest_rate(state: web::Data<ApiState>) -> impl Responder {
    match state.store.latest().await {
        Ok(Some(rate)) => HttpResponse::Ok().json(rate),
        Ok(None) => HttpResponse::NotFound().body("no rates stored yet"),
        Err(err) => {
            log::error!("latest rate lookup failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/rates/{date}")]
async fn rate_by_date(state: web::Data<ApiState>, date: web::Path<NaiveDate>) -> impl Responder {
    let date = date.into_inner();
    match state.store.find_by_date(date).await {
        Ok(Some(rate)) => HttpResponse::Ok().json(rate),
        Ok(None) => HttpResponse::NotFound().body(format!("no rate stored for {date}")),
        Err(err) => {
            log::error!("rate lookup for {date} failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // latest_rate before rate_by_date so "latest" isn't parsed as a date
    cfg.service(health).service(latest_rate).service(rate_by_date);
}
