use crate::core::error::{BotError, Result};
use crate::core::models::{HomeworkStatus, StatusUpdate};
use serde_json::Value;

/// Returns the `homeworks` sequence of an API response as-is.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let object = response.as_object().ok_or_else(|| {
        BotError::Shape(format!("response is {}, not an object", type_name(response)))
    })?;

    let homeworks = object
        .get("homeworks")
        .ok_or(BotError::MissingField { field: "homeworks" })?;

    homeworks.as_array().map(Vec::as_slice).ok_or_else(|| {
        BotError::Shape(format!("`homeworks` is {}, not a list", type_name(homeworks)))
    })
}

pub fn parse_status(homework: &Value) -> Result<StatusUpdate> {
    if !homework.is_object() {
        return Err(BotError::Shape(format!(
            "homework record is {}, not an object",
            type_name(homework)
        )));
    }

    let homework_name = required_text(homework, "homework_name")?;
    let code = required_text(homework, "status")?;

    let status = HomeworkStatus::from_code(code).ok_or_else(|| BotError::UnknownStatus {
        status: code.to_string(),
    })?;

    Ok(StatusUpdate {
        homework_name: homework_name.to_string(),
        status,
    })
}

fn required_text<'a>(record: &'a Value, field: &'static str) -> Result<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or(BotError::MissingField { field })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_response_returns_sequence() {
        let response = json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        });
        let homeworks = check_response(&response).unwrap();
        assert_eq!(homeworks.len(), 1);
        assert!(std::ptr::eq(
            homeworks.as_ptr(),
            response["homeworks"].as_array().unwrap().as_ptr()
        ));
    }

    #[test]
    fn test_check_response_empty_sequence() {
        let response = json!({"homeworks": []});
        assert!(check_response(&response).unwrap().is_empty());
    }

    #[test]
    fn test_check_response_missing_homeworks() {
        let err = check_response(&json!({"current_date": 5})).unwrap_err();
        assert!(matches!(err, BotError::MissingField { field: "homeworks" }));
    }

    #[test]
    fn test_check_response_wrong_types() {
        assert!(matches!(
            check_response(&json!([1, 2])).unwrap_err(),
            BotError::Shape(_)
        ));
        assert!(matches!(
            check_response(&json!({"homeworks": {"homework_name": "hw1"}})).unwrap_err(),
            BotError::Shape(_)
        ));
        assert!(matches!(
            check_response(&json!({"homeworks": null})).unwrap_err(),
            BotError::Shape(_)
        ));
    }

    #[test]
    fn test_parse_status_known_statuses() {
        for status in HomeworkStatus::ALL {
            let record = json!({"homework_name": "hw", "status": status.code()});
            let update = parse_status(&record).unwrap();
            assert_eq!(update.status, status);
            assert!(update.message().ends_with(status.verdict()));
        }
    }

    #[test]
    fn test_parse_status_missing_fields() {
        let cases = [
            (json!({"status": "approved"}), "homework_name"),
            (json!({"homework_name": "", "status": "approved"}), "homework_name"),
            (json!({"homework_name": null, "status": "approved"}), "homework_name"),
            (json!({"homework_name": "hw1"}), "status"),
            (json!({"homework_name": "hw1", "status": ""}), "status"),
            (json!({"homework_name": "hw1", "status": 3}), "status"),
        ];

        for (record, expected) in cases {
            match parse_status(&record) {
                Err(BotError::MissingField { field }) => assert_eq!(field, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_status_unknown_status() {
        let err = parse_status(&json!({"homework_name": "hw1", "status": "lost"})).unwrap_err();
        match err {
            BotError::UnknownStatus { status } => assert_eq!(status, "lost"),
            other => panic!("expected unknown status, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_status_non_object() {
        assert!(matches!(
            parse_status(&json!("hw1")).unwrap_err(),
            BotError::Shape(_)
        ));
    }
}
