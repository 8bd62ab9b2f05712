//! Response decoding. Every body is parsed to a `serde_json::Value` and its
//! shape checked before it is turned into a typed model.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::TrackerError;
use crate::models::requirement::SuggestedRequirement;
use crate::models::screening::ScreeningResult;
use crate::models::TrackerRecord;

const MAX_BODY_IN_ERROR: usize = 512;

/// Acknowledgement of an accepted write. Says nothing about what a later read returns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ack {
    pub message: Option<String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub(crate) fn bad_response(status: u16, reason: impl Into<String>, body: &str) -> TrackerError {
    let mut body = body.to_string();
    if body.len() > MAX_BODY_IN_ERROR {
        let mut cut = MAX_BODY_IN_ERROR;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    TrackerError::BadResponse {
        status,
        reason: reason.into(),
        body,
    }
}

/// Pulls a reason out of `{"error": "..."}` or `{"error": {"message": "..."}}`.
fn error_field(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => Some(
            obj.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(obj.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}

fn parse_json(status: u16, body: &str) -> Result<Value, TrackerError> {
    serde_json::from_str(body)
        .map_err(|e| bad_response(status, format!("body is not JSON: {e}"), body))
}

fn typed<T: DeserializeOwned>(status: u16, value: Value, body: &str) -> Result<T, TrackerError> {
    serde_json::from_value(value).map_err(|e| bad_response(status, e.to_string(), body))
}

/// `GET /api/candidate-tracker/{id}`: a JSON array of `{requirement, stages}` objects.
pub fn decode_tracker(status: u16, body: &str) -> Result<Vec<TrackerRecord>, TrackerError> {
    if !is_success(status) {
        let reason = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(error_field)
            .unwrap_or_else(|| "non-success status".to_string());
        return Err(bad_response(status, reason, body));
    }

    let value = parse_json(status, body)?;
    let Value::Array(items) = value else {
        return Err(bad_response(status, "body is not a JSON array", body));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Some(obj) = item.as_object() else {
            return Err(bad_response(status, format!("element {index} is not an object"), body));
        };
        for field in ["requirement", "stages"] {
            if !obj.contains_key(field) {
                return Err(bad_response(
                    status,
                    format!("element {index} has no '{field}' field"),
                    body,
                ));
            }
        }

        let record: TrackerRecord = typed(status, item, body)?;
        if let Some(declared) = record.requirement.no_of_rounds {
            if record.stages.len() != declared as usize {
                return Err(bad_response(
                    status,
                    format!(
                        "requirement {} declares {declared} rounds but has {} stages",
                        record.requirement.id,
                        record.stages.len()
                    ),
                    body,
                ));
            }
        }
        let mut seen = HashSet::with_capacity(record.stages.len());
        if let Some(dup) = record.stages.iter().find(|s| !seen.insert(&s.stage_id)) {
            return Err(bad_response(
                status,
                format!(
                    "requirement {} repeats stage id {}",
                    record.requirement.id, dup.stage_id
                ),
                body,
            ));
        }
        records.push(record);
    }

    Ok(records)
}

/// `POST /api/update-stage-status`. An `error` field wins over the status code.
pub fn decode_ack(status: u16, body: &str) -> Result<Ack, TrackerError> {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(v) => v,
        Err(_) if !is_success(status) => {
            return Err(bad_response(status, "non-success status", body));
        }
        Err(e) => return Err(bad_response(status, format!("body is not JSON: {e}"), body)),
    };

    if let Some(reason) = error_field(&value) {
        return Err(TrackerError::Rejected(reason));
    }
    if !is_success(status) {
        return Err(bad_response(status, "non-success status", body));
    }
    if !value.is_object() {
        return Err(bad_response(status, "acknowledgement is not a JSON object", body));
    }
    match value.get("success").and_then(Value::as_bool) {
        Some(true) => {}
        Some(false) => {
            let reason = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("update was not accepted");
            return Err(TrackerError::Rejected(reason.to_string()));
        }
        None => {
            return Err(bad_response(
                status,
                "acknowledgement has no success indicator",
                body,
            ));
        }
    }

    Ok(Ack {
        message: value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Decodes an object response that may carry an `error` field, unwrapping
/// `key` when the payload is nested under it.
fn decode_object<T: DeserializeOwned>(
    status: u16,
    body: &str,
    key: &str,
) -> Result<T, TrackerError> {
    let value = parse_json(status, body)?;
    if let Some(reason) = error_field(&value) {
        return Err(TrackerError::Rejected(reason));
    }
    if !is_success(status) {
        return Err(bad_response(status, "non-success status", body));
    }
    let payload = match value.get(key).filter(|v| v.is_object()).cloned() {
        Some(inner) => inner,
        None => value,
    };
    if !payload.is_object() {
        return Err(bad_response(status, "response is not a JSON object", body));
    }
    typed(status, payload, body)
}

/// `POST /api/screen-candidate`: `{result: {...}}` or the result object itself.
pub fn decode_screening(status: u16, body: &str) -> Result<ScreeningResult, TrackerError> {
    decode_object(status, body, "result")
}

/// `POST /api/ai/jd-to-requirement`: `{suggested_requirement: {...}}`.
pub fn decode_suggestion(status: u16, body: &str) -> Result<SuggestedRequirement, TrackerError> {
    let value = parse_json(status, body)?;
    if is_success(status)
        && value.get("error").is_none()
        && value.get("suggested_requirement").is_none()
    {
        return Err(bad_response(status, "no 'suggested_requirement' field", body));
    }
    decode_object(status, body, "suggested_requirement")
}
