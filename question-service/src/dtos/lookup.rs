use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use std::fmt;

/// Form used when the caller names none; maps to `questions.csv`.
pub const DEFAULT_FORM_ID: &str = "questions";

/// A scalar request parameter. Query strings only ever produce `Text`; JSON
/// bodies may also send numbers or booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl ParamValue {
    fn is_blank(&self) -> bool {
        match self {
            ParamValue::Text(s) => s.is_empty(),
            ParamValue::Number(n) => n.as_f64() == Some(0.0),
            ParamValue::Flag(b) => !b,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Number(n) => write_number(f, n),
            ParamValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Largest integer an f64 holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integral floats print without a fractional part, so `2.0` and `1e2`
/// match the CSV keys `2` and `100`.
fn write_number(f: &mut fmt::Formatter<'_>, n: &serde_json::Number) -> fmt::Result {
    match n.as_f64() {
        Some(x) if n.is_f64() && x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER => {
            write!(f, "{}", x as i64)
        }
        _ => write!(f, "{}", n),
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Text(s) => Value::String(s),
            ParamValue::Number(n) => Value::Number(n),
            ParamValue::Flag(b) => Value::Bool(b),
        }
    }
}

/// Query string of `GET /get_question`. A repeated key keeps its first value.
#[derive(Debug, Default)]
pub struct LookupParams {
    pub form_id: Option<String>,
    pub question_number: Option<String>,
}

impl FromIterator<(String, String)> for LookupParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "form_id" => &mut params.form_id,
                "question_number" => &mut params.question_number,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// JSON body of `POST /get_question`. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct LookupBody {
    #[serde(default)]
    pub form_id: Option<ParamValue>,
    #[serde(default)]
    pub question_number: Option<ParamValue>,
}

impl LookupBody {
    /// Accepts either a JSON object or a JSON string that itself encodes the
    /// object. An empty body, or any other non-null JSON value, carries no
    /// parameters and is treated as `{}`.
    pub fn parse(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value =
            serde_json::from_slice(bytes).context("request body is not valid JSON")?;
        let value = match value {
            Value::String(raw) => {
                serde_json::from_str(&raw).context("request body string is not valid JSON")?
            }
            other => other,
        };

        match value {
            Value::Object(_) => {
                serde_json::from_value(value).context("request body is not a lookup object")
            }
            Value::Null => Err(anyhow::anyhow!("request body is null")),
            _ => Ok(Self::default()),
        }
    }
}

/// A validated lookup: the form is defaulted and the question number present.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub form_id: String,
    pub question_number: ParamValue,
}

impl LookupRequest {
    pub fn new(
        form_id: Option<ParamValue>,
        question_number: Option<ParamValue>,
    ) -> Result<Self, AppError> {
        let form_id = match form_id {
            Some(id) if !id.is_blank() => id.to_string(),
            _ => DEFAULT_FORM_ID.to_string(),
        };

        let question_number = question_number.ok_or_else(|| {
            AppError::BadRequest("Missing required parameter: question_number".to_string())
        })?;

        Ok(Self {
            form_id,
            question_number,
        })
    }
}

impl TryFrom<LookupParams> for LookupRequest {
    type Error = AppError;

    fn try_from(params: LookupParams) -> Result<Self, Self::Error> {
        Self::new(
            params.form_id.map(ParamValue::Text),
            params.question_number.map(ParamValue::Text),
        )
    }
}

impl TryFrom<LookupBody> for LookupRequest {
    type Error = AppError;

    fn try_from(body: LookupBody) -> Result<Self, Self::Error> {
        Self::new(body.form_id, body.question_number)
    }
}
