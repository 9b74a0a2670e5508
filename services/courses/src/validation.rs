//! Request body validation
//!
//! Bodies are checked field by field before a handler runs. Every rule is
//! evaluated so that a client sees all violations at once; any violation
//! rejects the request with `400 {errors: [...]}`.

use axum::{
    Json,
    async_trait,
    extract::{FromRequest, Request},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::ApiError,
    models::{CourseInput, LoginRequest},
};

/// A single rule violation reported to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Types that can be built from a JSON object body after validation
pub trait Validate: Sized {
    fn validate(body: &Map<String, Value>) -> Result<Self, Vec<FieldError>>;
}

/// Collects rule results over one JSON object
pub struct FieldRules<'a> {
    body: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldRules<'a> {
    pub fn new(body: &'a Map<String, Value>) -> Self {
        Self {
            body,
            errors: Vec::new(),
        }
    }

    /// The field must be a string with at least one character
    pub fn non_empty_string(&mut self, field: &str, message: &str) -> String {
        match self.body.get(field) {
            Some(Value::String(value)) if !value.is_empty() => value.clone(),
            _ => {
                self.errors.push(FieldError::new(field, message));
                String::new()
            }
        }
    }

    /// The field must be a JSON number or a string holding a decimal number
    pub fn numeric(&mut self, field: &str, message: &str) -> f64 {
        let parsed = match self.body.get(field) {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => parse_numeric(text),
            _ => None,
        };

        parsed.unwrap_or_else(|| {
            self.errors.push(FieldError::new(field, message));
            0.0
        })
    }

    /// Yield `value` when no rule failed
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// Accepts `[+-]digits[.digits]` and `[+-].digits`; nothing else
fn parse_numeric(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let well_formed = match fraction {
        Some(fraction) => !fraction.is_empty() && digits(fraction) && digits(whole),
        None => !whole.is_empty() && digits(whole),
    };

    if !well_formed {
        return None;
    }

    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl Validate for CourseInput {
    fn validate(body: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut rules = FieldRules::new(body);
        let title = rules.non_empty_string("title", "Title is required.");
        let description = rules.non_empty_string("description", "Description is required.");
        let duration = rules.numeric("duration", "Duration must be a number.");
        let instructor = rules.non_empty_string("instructor", "Instructor is required.");

        rules.finish(CourseInput {
            title,
            description,
            duration,
            instructor,
        })
    }
}

impl Validate for LoginRequest {
    fn validate(body: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut rules = FieldRules::new(body);
        let username = rules.non_empty_string("username", "Username is required.");
        let password = rules.non_empty_string("password", "Password is required.");

        rules.finish(LoginRequest { username, password })
    }
}

/// Extractor that parses a JSON object body and runs its [`Validate`] rules
#[derive(Debug)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Validated<T>
where
    T: Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
            })?;

        let Value::Object(fields) = body else {
            return Err(ApiError::Validation(vec![FieldError::new(
                "body",
                "Request body must be a JSON object.",
            )]));
        };

        T::validate(&fields).map(Validated).map_err(ApiError::Validation)
    }
}
