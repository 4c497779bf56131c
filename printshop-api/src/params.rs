use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Parse an optional list filter. Missing, blank and `all` mean no filter.
pub fn filter_value<T: DeserializeOwned>(name: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => serde_json::from_value(serde_json::Value::String(value.to_string()))
            .map(Some)
            .map_err(|_| AppError::ValidationError(format!("Invalid {} filter: {}", name, value))),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Name recorded on timeline events when the request carries none
pub fn acting_user(user: Option<&str>) -> String {
    match user.map(str::trim) {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => "Sistema".to_string(),
    }
}
