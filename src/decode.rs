use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ApixResult;
use crate::error::{ApiError, Error};
use crate::response::Response;

/// Value a successful call resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    /// The response carried no value. Observers also use it as an explicit
    /// "no value" substitute result.
    Empty,
    Json(Value),
    /// Body of a non-JSON response, unparsed.
    Raw(Bytes),
}

impl Decoded {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Self::Raw(body) => Some(body),
            _ => None,
        }
    }

    /// Deserializes a JSON result into `T`. `Empty` reads as JSON `null`.
    pub fn deserialize<T>(self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        match self {
            Self::Empty => serde_json::from_value(Value::Null),
            Self::Json(value) => serde_json::from_value(value),
            Self::Raw(body) => serde_json::from_slice(&body),
        }
    }
}

impl From<Value> for Decoded {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Decodes a body by its content type. `None` means decoding produced
/// nothing: an empty or unparsable JSON body.
pub(crate) fn decode_body(response: &Response) -> Option<Decoded> {
    let body = response.body();
    if !response.is_json() {
        return Some(Decoded::Raw(body.clone()));
    }
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice::<Value>(body).ok().map(Decoded::Json)
}

/// Turns a decoded response into the call result or a classified error.
///
/// A JSON `null` counts as nothing decoded; only a body that is exactly
/// `null` is accepted, and it yields [`Decoded::Empty`].
pub(crate) fn classify(response: &Response, decoded: Option<Decoded>) -> ApixResult<Decoded> {
    let body = response.body();
    let decoded = decoded.filter(|value| !matches!(value, Decoded::Json(Value::Null)));
    let empty_ok = response.status() == http::StatusCode::OK && body.is_empty();
    let undecodable = decoded.is_none() && !body.is_empty() && body.as_ref() != b"null";
    if empty_ok || undecodable {
        return Err(Error::Api(ApiError::bad_response(
            body,
            response.status(),
            response.status_message(),
        )));
    }

    if response.is_success() {
        return Ok(decoded.unwrap_or(Decoded::Empty));
    }

    let payload = match decoded {
        Some(Decoded::Json(Value::Object(payload))) => payload,
        _ => Map::new(),
    };
    Err(Error::Api(ApiError::application(
        payload,
        response.status(),
        response.status_message(),
    )))
}
