//! Request bodies and response envelopes of the prediction service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{InputSnapshot, Scenario, ScenarioPair};
use crate::errors::ServiceError;

/// Body of the paired-comparison call: each side is the merged snapshot.
#[derive(Debug, Serialize)]
pub struct ComparePayload {
    pub a: InputSnapshot,
    pub b: InputSnapshot,
}

impl From<&ScenarioPair> for ComparePayload {
    fn from(pair: &ScenarioPair) -> Self {
        Self {
            a: pair.merged(Scenario::A),
            b: pair.merged(Scenario::B),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    prediction: Option<Value>,
    #[serde(default)]
    a: Option<Value>,
    #[serde(default)]
    b: Option<Value>,
}

/// Parses a `/api/predict` response.
pub fn parse_single(status: u16, body: &str) -> Result<f64, ServiceError> {
    let envelope = open_envelope(status, body)?;
    prediction_value("prediction", envelope.prediction.as_ref())
}

/// Parses a `/api/compare` response into `(a, b)`.
pub fn parse_pair(status: u16, body: &str) -> Result<(f64, f64), ServiceError> {
    let envelope = open_envelope(status, body)?;
    let a = prediction_value("a", envelope.a.as_ref())?;
    let b = prediction_value("b", envelope.b.as_ref())?;
    Ok((a, b))
}

fn open_envelope(status: u16, body: &str) -> Result<Envelope, ServiceError> {
    let ok_status = (200..300).contains(&status);

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(e) => e,
        Err(_) if !ok_status => {
            return Err(ServiceError::Status {
                status,
                message: abbreviate(body),
            });
        }
        Err(e) => return Err(ServiceError::Malformed(e.to_string())),
    };

    if !envelope.success {
        // The service explains itself; pass that through untouched
        return Err(match envelope.error {
            Some(msg) => ServiceError::Rejected(msg),
            None if !ok_status => ServiceError::Status {
                status,
                message: "request failed".to_string(),
            },
            None => ServiceError::Malformed("success=false without an error message".to_string()),
        });
    }

    if !ok_status {
        return Err(ServiceError::Status {
            status,
            message: abbreviate(body),
        });
    }

    Ok(envelope)
}

fn prediction_value(key: &str, raw: Option<&Value>) -> Result<f64, ServiceError> {
    let raw = raw.ok_or_else(|| ServiceError::Malformed(format!("missing '{}'", key)))?;
    let value = raw
        .as_f64()
        .ok_or_else(|| ServiceError::Malformed(format!("'{}' is not a number: {}", key, raw)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ServiceError::Malformed(format!(
            "'{}' is not a non-negative amount: {}",
            key, value
        )));
    }
    Ok(value)
}

fn abbreviate(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_success() {
        let v = parse_single(200, r#"{"success": true, "prediction": 2345.67}"#).unwrap();
        assert_eq!(v, 2345.67);
    }

    #[test]
    fn single_rejected_is_verbatim_even_with_error_status() {
        let err = parse_single(400, r#"{"success": false, "error": "Missing value for Outlet_Size"}"#)
            .unwrap_err();
        assert_eq!(err, ServiceError::Rejected("Missing value for Outlet_Size".into()));
    }

    #[test]
    fn non_json_error_page() {
        let err = parse_single(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(
            err,
            ServiceError::Status {
                status: 502,
                message: "<html>Bad Gateway</html>".into()
            }
        );
    }

    #[test]
    fn malformed_payloads() {
        for body in [
            "not json",
            r#"{"success": true}"#,
            r#"{"success": true, "prediction": "lots"}"#,
            r#"{"success": true, "prediction": -3.0}"#,
        ] {
            let err = parse_single(200, body).unwrap_err();
            assert!(matches!(err, ServiceError::Malformed(_)), "{body}: {err:?}");
        }
    }

    #[test]
    fn pair_success_and_partial() {
        assert_eq!(
            parse_pair(200, r#"{"success": true, "a": 3000, "b": 1500.5}"#).unwrap(),
            (3000.0, 1500.5)
        );
        let err = parse_pair(200, r#"{"success": true, "a": 3000}"#).unwrap_err();
        assert_eq!(err, ServiceError::Malformed("missing 'b'".into()));
    }

    #[test]
    fn compare_payload_merges_shared_fields() {
        let pair = ScenarioPair::new(
            InputSnapshot::new().with("Item_MRP", 150.0),
            InputSnapshot::new().with("Outlet_Type", "Supermarket Type3"),
            InputSnapshot::new().with("Outlet_Type", "Grocery Store"),
        );
        let json = serde_json::to_value(ComparePayload::from(&pair)).unwrap();
        assert_eq!(json["a"]["Item_MRP"], 150.0);
        assert_eq!(json["b"]["Item_MRP"], 150.0);
        assert_eq!(json["b"]["Outlet_Type"], "Grocery Store");
    }
}
