//! Currency conversion back-end. Rates are quoted against USD.

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

const RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 149.50),
    ("CAD", 1.35),
    ("AUD", 1.52),
    ("CHF", 0.88),
    ("CNY", 7.24),
    ("INR", 83.12),
    ("MAD", 9.95),
    ("AED", 3.67),
    ("MXN", 17.05),
    ("BRL", 4.92),
    ("ZAR", 18.45),
    ("SEK", 10.35),
    ("NOK", 10.72),
    ("DKK", 6.87),
    ("SGD", 1.34),
    ("HKD", 7.82),
    ("KRW", 1305.50),
    ("TRY", 32.15),
    ("RUB", 92.50),
    ("PLN", 3.95),
    ("THB", 34.85),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRequest {
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyResponse {
    pub original_amount: f64,
    pub original_currency: String,
    pub converted_amount: f64,
    pub converted_currency: String,
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedCurrencies {
    pub currencies: Vec<String>,
    pub count: usize,
}

/// Rate of `code` against USD. Unknown codes are treated as USD.
pub fn rate(code: &str) -> f64 {
    RATES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, r)| *r)
        .unwrap_or(1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

pub fn convert(request: &CurrencyRequest) -> CurrencyResponse {
    let from = request.from_currency.trim().to_uppercase();
    let to = request.to_currency.trim().to_uppercase();
    let from_rate = rate(&from);
    let to_rate = rate(&to);

    let converted = request.amount / from_rate * to_rate;

    CurrencyResponse {
        original_amount: request.amount,
        original_currency: from,
        converted_amount: round_to(converted, 2),
        converted_currency: to,
        exchange_rate: round_to(to_rate / from_rate, 4),
    }
}

pub fn supported() -> SupportedCurrencies {
    let currencies: Vec<String> = RATES.iter().map(|(c, _)| c.to_string()).collect();
    SupportedCurrencies {
        count: currencies.len(),
        currencies,
    }
}

async fn convert_currency(Json(request): Json<CurrencyRequest>) -> Json<CurrencyResponse> {
    tracing::debug!(
        amount = request.amount,
        from = %request.from_currency,
        to = %request.to_currency,
        "Converting currency"
    );
    Json(convert(&request))
}

async fn supported_currencies() -> Json<SupportedCurrencies> {
    Json(supported())
}

pub fn router() -> Router {
    Router::new()
        .route("/tools/convert_currency", post(convert_currency))
        .route("/tools/supported_currencies", get(supported_currencies))
        .merge(super::common_routes(
            "currency-tools",
            &[
                "/tools/convert_currency",
                "/tools/supported_currencies",
                "/health",
            ],
        ))
}
