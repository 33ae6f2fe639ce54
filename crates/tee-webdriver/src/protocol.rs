//! JSON shapes of the W3C WebDriver wire protocol.
use serde_json::{Value, json};
use tee_core::browser::{ElementHandle, Locator};

use crate::WebDriverError;

/// Key under which the protocol returns a web element reference.
pub(crate) const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4ce8f2b7d8a4";

/// Extract `value` from a response body, turning error objects into [`WebDriverError::Protocol`].
pub(crate) fn into_value(mut body: Value) -> Result<Value, WebDriverError> {
    let value = body
        .get_mut("value")
        .map(Value::take)
        .ok_or_else(|| WebDriverError::Malformed(format!("no value in {body}")))?;

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(WebDriverError::Protocol {
            error: error.to_string(),
            message,
        });
    }
    Ok(value)
}

pub(crate) fn session_id(value: &Value) -> Result<String, WebDriverError> {
    value
        .get("sessionId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WebDriverError::Malformed(format!("no session id in {value}")))
}

pub(crate) fn element(value: &Value) -> Result<ElementHandle, WebDriverError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(ElementHandle::new)
        .ok_or_else(|| WebDriverError::Malformed(format!("not an element reference: {value}")))
}

pub(crate) fn elements(value: &Value) -> Result<Vec<ElementHandle>, WebDriverError> {
    value
        .as_array()
        .ok_or_else(|| WebDriverError::Malformed(format!("not an element list: {value}")))?
        .iter()
        .map(element)
        .collect()
}

pub(crate) fn string(value: &Value) -> Result<String, WebDriverError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| WebDriverError::Malformed(format!("expected a string, got {value}")))
}

/// Property values may be any JSON type; `null` means "not set".
pub(crate) fn optional_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn locate(by: &Locator) -> Value {
    json!({ "using": "css selector", "value": by.to_css() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_object_becomes_protocol_error() {
        let body = json!({
            "value": {
                "error": "no such element",
                "message": "Unable to locate element: .btn-success",
                "stacktrace": ""
            }
        });
        match into_value(body) {
            Err(WebDriverError::Protocol { error, message }) => {
                assert_eq!(error, "no such element");
                assert!(message.contains(".btn-success"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_value_is_malformed() {
        assert!(matches!(into_value(json!({"status": 0})), Err(WebDriverError::Malformed(_))));
        assert_eq!(into_value(json!({"value": null})).unwrap(), Value::Null);
    }

    #[test]
    fn new_session_response() {
        let value = into_value(json!({
            "value": { "sessionId": "abc123", "capabilities": { "browserName": "chrome" } }
        }))
        .unwrap();
        assert_eq!(session_id(&value).unwrap(), "abc123");
    }

    #[test]
    fn element_references() {
        let one = json!({ ELEMENT_KEY: "e-1" });
        assert_eq!(element(&one).unwrap().id(), "e-1");

        let many = json!([{ ELEMENT_KEY: "e-1" }, { ELEMENT_KEY: "e-2" }]);
        let ids: Vec<String> = elements(&many).unwrap().iter().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, ["e-1", "e-2"]);

        assert!(elements(&json!([])).unwrap().is_empty());
        assert!(element(&json!({"id": "e-1"})).is_err());
    }

    #[test]
    fn property_values() {
        assert_eq!(optional_string(&Value::Null), None);
        assert_eq!(optional_string(&json!("10/19/2026")).as_deref(), Some("10/19/2026"));
        assert_eq!(optional_string(&json!(4)).as_deref(), Some("4"));
    }

    #[test]
    fn css_locator_body() {
        let body = locate(&Locator::name("email"));
        assert_eq!(body, json!({ "using": "css selector", "value": "[name=\"email\"]" }));
    }
}
