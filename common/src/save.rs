//! 食事記録の保存ワークフロー
//!
//! Closed → Open → Submitting → (Closed | Open + エラー)
//!
//! 合計値は送信時点の識別結果から計算する（ダイアログを開いた時点の値は使わない）。

use crate::detection::DetectionWorkflow;
use crate::error::{Error, Result};
use crate::nutrition::aggregate;
use crate::types::{MealRecord, MealType, SaveResponse};
use std::fmt::Display;

/// 保存成功時の通知
pub const SAVE_SUCCESS_NOTICE: &str = "食事記録を保存しました";

/// 通信エラー時の通知
pub const SAVE_RETRY_NOTICE: &str = "もう一度お試しください";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone)]
pub struct SaveWorkflow {
    phase: SavePhase,
    last_error: Option<String>,
}

impl Default for SaveWorkflow {
    fn default() -> Self {
        Self {
            phase: SavePhase::Closed,
            last_error: None,
        }
    }
}

impl SaveWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存ダイアログを開く（識別結果があるときのみ）
    pub fn open(&mut self, detection: &DetectionWorkflow) -> Result<()> {
        if self.phase == SavePhase::Submitting {
            return Err(Error::SaveBusy);
        }
        if detection.result().is_none() {
            return Err(Error::NoResultToSave);
        }

        self.phase = SavePhase::Open;
        self.last_error = None;
        Ok(())
    }

    /// ダイアログを閉じる（副作用なし）
    pub fn close(&mut self) -> Result<()> {
        if self.phase == SavePhase::Submitting {
            return Err(Error::SaveBusy);
        }

        self.phase = SavePhase::Closed;
        self.last_error = None;
        Ok(())
    }

    /// 保存を開始して送信するレコードを返す
    pub fn begin(&mut self, meal_type: &str, detection: &DetectionWorkflow) -> Result<MealRecord> {
        match self.phase {
            SavePhase::Submitting => return Err(Error::SaveBusy),
            SavePhase::Closed => return Err(Error::SaveDialogClosed),
            SavePhase::Open => {}
        }

        let meal_type: MealType = meal_type.parse()?;
        let result = detection.result().ok_or(Error::NoResultToSave)?;
        let totals = aggregate(&result.detected_objects);

        self.phase = SavePhase::Submitting;
        self.last_error = None;
        Ok(MealRecord::combined(&totals, meal_type))
    }

    /// 応答を反映する
    ///
    /// 成功時はダイアログを閉じて通知文を返す。呼び出し側は続けて履歴を再取得する。
    pub fn complete<E: Display>(
        &mut self,
        outcome: std::result::Result<SaveResponse, E>,
    ) -> Result<String> {
        if self.phase != SavePhase::Submitting {
            return Err(Error::NoPendingRequest);
        }

        let message = match outcome {
            Ok(response) if response.success => {
                self.phase = SavePhase::Closed;
                self.last_error = None;
                return Ok(SAVE_SUCCESS_NOTICE.to_string());
            }
            Ok(response) => response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| SAVE_RETRY_NOTICE.to_string()),
            Err(_) => SAVE_RETRY_NOTICE.to_string(),
        };

        self.phase = SavePhase::Open;
        self.last_error = Some(message.clone());
        Err(Error::SaveFailed(message))
    }

    pub fn phase(&self) -> SavePhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != SavePhase::Closed
    }

    pub fn busy(&self) -> bool {
        self.phase == SavePhase::Submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionState;
    use crate::types::{DetectedObject, DetectionResult, ImageFile, NutritionInfo, COMBINED_MEAL_NAME};

    fn item(calories: f64, protein: f64, carbs: f64, fat: f64) -> DetectedObject {
        DetectedObject {
            confidence: 0.9,
            nutrition: NutritionInfo {
                food_name: "food".to_string(),
                calories,
                protein,
                carbs,
                fat,
            },
            ..Default::default()
        }
    }

    fn detected(objects: Vec<DetectedObject>) -> DetectionWorkflow {
        let mut selection = SelectionState::new();
        selection
            .select_file(ImageFile::new("a.jpg", "image/jpeg", vec![1]))
            .unwrap();

        let mut detection = DetectionWorkflow::new();
        detection.begin(&selection).unwrap();
        detection
            .complete::<String>(Ok(DetectionResult {
                annotated_image: "uploads/annotated_a.jpg".to_string(),
                detected_objects: objects,
            }))
            .unwrap();
        detection
    }

    #[test]
    fn test_open_requires_result() {
        let mut save = SaveWorkflow::new();
        let err = save.open(&DetectionWorkflow::new()).unwrap_err();
        assert!(matches!(err, Error::NoResultToSave));
        assert_eq!(save.phase(), SavePhase::Closed);
    }

    #[test]
    fn test_open_and_close() {
        let mut save = SaveWorkflow::new();
        save.open(&detected(vec![item(100.0, 1.0, 1.0, 1.0)])).unwrap();
        assert_eq!(save.phase(), SavePhase::Open);

        save.close().unwrap();
        assert_eq!(save.phase(), SavePhase::Closed);
        assert!(!save.is_open());
    }

    #[test]
    fn test_begin_builds_lunch_record() {
        let detection = detected(vec![
            item(200.0, 8.0, 25.0, 5.0),
            item(300.0, 12.0, 35.0, 10.0),
        ]);
        let mut save = SaveWorkflow::new();
        save.open(&detection).unwrap();

        let record = save.begin("lunch", &detection).expect("開始失敗");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "food_data": {
                    "food_name": COMBINED_MEAL_NAME,
                    "calories": 500.0,
                    "protein": 20.0,
                    "carbs": 60.0,
                    "fat": 15.0
                },
                "meal_type": "lunch"
            })
        );
        assert!(save.busy());
    }

    #[test]
    fn test_begin_uses_latest_result() {
        let mut save = SaveWorkflow::new();
        save.open(&detected(vec![item(100.0, 0.0, 0.0, 0.0)])).unwrap();

        // ダイアログを開いた後に識別結果が更新された
        let latest = detected(vec![item(250.0, 0.0, 0.0, 0.0)]);
        let record = save.begin("dinner", &latest).unwrap();
        assert_eq!(record.food_data.calories, 250.0);
        assert_eq!(record.meal_type, MealType::Dinner);
    }

    #[test]
    fn test_begin_invalid_meal_type_keeps_dialog_open() {
        let detection = detected(vec![item(100.0, 0.0, 0.0, 0.0)]);
        let mut save = SaveWorkflow::new();
        save.open(&detection).unwrap();

        let err = save.begin("brunch", &detection).unwrap_err();
        assert!(matches!(err, Error::InvalidMealType(_)));
        assert_eq!(save.phase(), SavePhase::Open);
    }

    #[test]
    fn test_begin_requires_open_dialog() {
        let detection = detected(vec![item(100.0, 0.0, 0.0, 0.0)]);
        let mut save = SaveWorkflow::new();
        assert!(matches!(save.begin("lunch", &detection), Err(Error::SaveDialogClosed)));
    }

    #[test]
    fn test_second_begin_rejected_while_submitting() {
        let detection = detected(vec![item(100.0, 0.0, 0.0, 0.0)]);
        let mut save = SaveWorkflow::new();
        save.open(&detection).unwrap();
        save.begin("snack", &detection).unwrap();

        assert!(matches!(save.begin("snack", &detection), Err(Error::SaveBusy)));
        assert!(matches!(save.close(), Err(Error::SaveBusy)));
    }

    #[test]
    fn test_complete_success_closes_dialog() {
        let detection = detected(vec![item(100.0, 0.0, 0.0, 0.0)]);
        let mut save = SaveWorkflow::new();
        save.open(&detection).unwrap();
        save.begin("breakfast", &detection).unwrap();

        let notice = save
            .complete::<String>(Ok(SaveResponse { success: true, message: None }))
            .expect("保存失敗");
        assert_eq!(notice, SAVE_SUCCESS_NOTICE);
        assert_eq!(save.phase(), SavePhase::Closed);
    }

    #[test]
    fn test_complete_server_failure_keeps_dialog_open() {
        let detection = detected(vec![item(100.0, 0.0, 0.0, 0.0)]);
        let mut save = SaveWorkflow::new();
        save.open(&detection).unwrap();
        save.begin("lunch", &detection).unwrap();

        let err = save
            .complete::<String>(Ok(SaveResponse {
                success: false,
                message: Some("database is locked".to_string()),
            }))
            .unwrap_err();

        assert!(matches!(err, Error::SaveFailed(ref m) if m == "database is locked"));
        assert_eq!(save.phase(), SavePhase::Open);
        assert_eq!(save.last_error(), Some("database is locked"));
    }

    #[test]
    fn test_complete_transport_failure_generic_notice() {
        let detection = detected(vec![item(100.0, 0.0, 0.0, 0.0)]);
        let mut save = SaveWorkflow::new();
        save.open(&detection).unwrap();
        save.begin("lunch", &detection).unwrap();

        let err = save.complete::<&str>(Err("connection reset")).unwrap_err();
        assert!(matches!(err, Error::SaveFailed(ref m) if m == SAVE_RETRY_NOTICE));
        assert_eq!(save.phase(), SavePhase::Open);

        // ダイアログが開いたままなので再送信できる
        assert!(save.begin("lunch", &detection).is_ok());
    }

    #[test]
    fn test_complete_without_pending_request() {
        let mut save = SaveWorkflow::new();
        let err = save
            .complete::<String>(Ok(SaveResponse { success: true, message: None }))
            .unwrap_err();
        assert!(matches!(err, Error::NoPendingRequest));
    }
}
