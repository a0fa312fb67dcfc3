use serde_json::Value;

use crate::error::{FormatError, ShapeError};
use crate::models::{AssignmentRecord, ReviewStatus};

/// Checks the top-level shape of a review API answer and hands back the
/// homework list as-is. An empty list is a valid answer.
pub fn check_response(response: &Value) -> Result<&[Value], ShapeError> {
    let map = response.as_object().ok_or(ShapeError::NotAMapping)?;
    let homeworks = map.get("homeworks").ok_or(ShapeError::MissingHomeworks)?;
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ShapeError::HomeworksNotAList)
}

/// Server-side timestamp to use as the next `from_date`, if the answer has one.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

pub fn parse_record(homework: &Value) -> Result<AssignmentRecord, FormatError> {
    let name = homework
        .get("homework_name")
        .ok_or(FormatError::MalformedRecord("missing name"))?;
    let status = homework
        .get("status")
        .ok_or(FormatError::MalformedRecord("missing status"))?;

    let name = match name {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };
    let status = match status {
        Value::String(code) => {
            ReviewStatus::from_code(code).ok_or_else(|| FormatError::UnknownStatus(code.clone()))?
        }
        other => return Err(FormatError::UnknownStatus(other.to_string())),
    };

    Ok(AssignmentRecord { name, status })
}

pub fn render(record: &AssignmentRecord) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        record.name,
        record.status.verdict()
    )
}

/// Turns one raw homework entry into the chat message announcing its status.
pub fn parse_status(homework: &Value) -> Result<String, FormatError> {
    parse_record(homework).map(|record| render(&record))
}
