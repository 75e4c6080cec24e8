//! Translation between raw command-line text and the exchange desk.
//!
//! Everything that arrives as text is parsed here; the desk only ever sees
//! typed ids and amounts.

use cambio_common::CurrencyId;
use cambio_engine::{desk::validate_amount, ExchangeDesk, ExchangeError};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Outcome class of a request, mirroring the HTTP statuses of a web front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    Conflict,
    Internal,
}

impl Status {
    /// Process exit code for this status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Internal => 1,
            Status::NotFound => 2,
            Status::Conflict => 3,
        }
    }
}

/// A status plus the JSON body to print.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub body: Value,
}

impl Response {
    /// Successful response carrying `value`.
    pub fn ok<T: Serialize>(value: &T) -> anyhow::Result<Self> {
        Ok(Self {
            status: Status::Ok,
            body: serde_json::to_value(value)?,
        })
    }

    /// Map an engine error to a response.
    pub fn from_error(err: &ExchangeError) -> Self {
        let status = match err {
            e if e.is_not_found() => Status::NotFound,
            ExchangeError::InvalidInput(_) => Status::Conflict,
            _ => Status::Internal,
        };
        let ids: Vec<u32> = err.missing_ids().iter().map(|id| id.get()).collect();

        Self {
            status,
            body: json!({
                "code": err.error_code(),
                "message": err.to_string(),
                "ids": ids,
            }),
        }
    }

    /// An id that could not even be parsed can never match a currency.
    fn unknown_id(raw: &str) -> Self {
        Self {
            status: Status::NotFound,
            body: json!({
                "code": "CURRENCY_NOT_FOUND",
                "message": format!("Currency not found: {raw}"),
                "ids": [],
            }),
        }
    }
}

/// Parse a currency id, `None` for anything that is not a positive integer.
pub fn parse_id(raw: &str) -> Option<CurrencyId> {
    raw.parse().ok()
}

/// Parse an amount. Empty or unparseable text counts as missing.
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(value = raw, "Amount is not a number");
            None
        }
    }
}

/// List currencies, leaving out `exclude` when it names one.
pub fn list(desk: &ExchangeDesk, exclude: Option<&str>) -> anyhow::Result<Response> {
    let exclude = exclude.and_then(|raw| {
        let parsed = parse_id(raw);
        if parsed.is_none() {
            warn!(exclude = raw, "Ignoring unparseable exclude id");
        }
        parsed
    });
    Response::ok(&desk.list_currencies(exclude))
}

/// Find one currency.
pub fn get(desk: &ExchangeDesk, raw_id: &str) -> anyhow::Result<Response> {
    let Some(id) = parse_id(raw_id) else {
        return Ok(Response::unknown_id(raw_id));
    };
    match desk.get_currency(id) {
        Ok(currency) => Response::ok(&currency),
        Err(e) => Ok(Response::from_error(&e)),
    }
}

/// List the default pair.
pub fn defaults(desk: &ExchangeDesk, order: Option<&str>) -> anyhow::Result<Response> {
    Response::ok(&desk.get_default_pair(order))
}

/// Run an exchange calculation.
pub fn calculate(
    desk: &ExchangeDesk,
    raw_from: &str,
    raw_to: &str,
    raw_value: Option<&str>,
) -> anyhow::Result<Response> {
    let amount = parse_amount(raw_value);

    // The amount is checked before the ids so a missing value always wins.
    if let Err(e) = validate_amount(amount) {
        return Ok(Response::from_error(&e));
    }

    let from = match parse_id(raw_from) {
        Some(id) => id,
        None => return Ok(Response::unknown_id(raw_from)),
    };
    let to = match parse_id(raw_to) {
        Some(id) => id,
        None => return Ok(Response::unknown_id(raw_to)),
    };

    match desk.exchange_calculate(from, to, amount) {
        Ok(result) => Response::ok(&result),
        Err(e) => Ok(Response::from_error(&e)),
    }
}
