//! サービスレスポンスのパーサー
//!
//! 識別・保存・履歴の各エンドポイントが返すJSONを型に変換する。
//! 形式が合わない場合は `Error::Parse` を返す。

use crate::error::{Error, Result};
use crate::types::{DetectionResult, HistoryRecord, SaveResponse};
use serde::de::DeserializeOwned;

fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse(format!("{}: レスポンスが空です", what)));
    }
    serde_json::from_str(trimmed).map_err(|e| Error::Parse(format!("{}: {}", what, e)))
}

/// `POST /detect` のレスポンスをパース
///
/// # Examples
/// ```
/// use meal_scan_common::parse_detection_response;
///
/// let body = r#"{"annotated_image": "uploads/annotated_a.jpg", "detected_objects": []}"#;
/// let result = parse_detection_response(body).unwrap();
/// assert!(result.detected_objects.is_empty());
/// ```
pub fn parse_detection_response(body: &str) -> Result<DetectionResult> {
    parse_body(body, "識別レスポンス")
}

/// `POST /save_record` のレスポンスをパース
pub fn parse_save_response(body: &str) -> Result<SaveResponse> {
    parse_body(body, "保存レスポンス")
}

/// `GET /get_records` のレスポンスをパース
pub fn parse_history_response(body: &str) -> Result<Vec<HistoryRecord>> {
    parse_body(body, "履歴レスポンス")
}

/// エラーレスポンス `{"error": "..."}` からメッセージを取り出す
pub fn service_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detection_response() {
        let body = r#"{
            "detected_objects": [
                {
                    "class_name": "pizza",
                    "confidence": 0.83,
                    "box": [5, 5, 200, 180],
                    "nutrition": {"food_name": "pizza", "calories": 285, "protein": 12, "carbs": 36, "fat": 10}
                }
            ],
            "annotated_image": "uploads/annotated_pizza.jpg"
        }"#;

        let result = parse_detection_response(body).expect("パース失敗");
        assert_eq!(result.annotated_image, "uploads/annotated_pizza.jpg");
        assert_eq!(result.detected_objects[0].nutrition.food_name, "pizza");
        assert_eq!(result.detected_objects[0].nutrition.calories, 285.0);
    }

    #[test]
    fn test_parse_detection_response_error_body() {
        // 400 のボディは識別結果として扱えない
        let err = parse_detection_response(r#"{"error": "No file part"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_detection_response_empty() {
        let err = parse_detection_response("  ").unwrap_err();
        assert!(matches!(err, Error::Parse(ref m) if m.contains("空")));
    }

    #[test]
    fn test_parse_detection_response_html() {
        let err = parse_detection_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_save_response() {
        let ok = parse_save_response(r#"{"success": true, "message": "Diet record saved successfully"}"#).unwrap();
        assert!(ok.success);

        let ng = parse_save_response(r#"{"success": false, "message": "disk full"}"#).unwrap();
        assert!(!ng.success);
        assert_eq!(ng.message.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_parse_history_response() {
        let records = parse_history_response("[]").unwrap();
        assert!(records.is_empty());

        let body = r#"[
            {"id": 2, "food_name": "组合餐食", "calories": 500.0, "protein": 20.0, "carbs": 60.0, "fat": 15.0, "date": "2026-10-16", "meal_type": "lunch"},
            {"id": 1, "food_name": "apple", "calories": 52.0, "date": "2026-10-16", "meal_type": "snack"}
        ]"#;
        let records = parse_history_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, Some(2));
        assert_eq!(records[0].protein, Some(20.0));
        assert_eq!(records[1].meal_type, "snack");
    }

    #[test]
    fn test_parse_history_response_not_array() {
        assert!(parse_history_response(r#"{"records": []}"#).is_err());
    }

    #[test]
    fn test_service_error_message() {
        assert_eq!(
            service_error_message(r#"{"error": "No selected file"}"#).as_deref(),
            Some("No selected file")
        );
        assert_eq!(
            service_error_message(r#"{"success": false, "message": "locked"}"#).as_deref(),
            Some("locked")
        );
        assert_eq!(service_error_message("Internal Server Error"), None);
        assert_eq!(service_error_message(r#"{"error": 500}"#), None);
    }
}
