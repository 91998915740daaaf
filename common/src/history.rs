//! 食事履歴ワークフロー
//!
//! 取得のたびに表示を丸ごと置き換える。並び順はサービスが返した順のまま。

use crate::error::{Error, Result};
use crate::types::{meal_type_label, HistoryRecord};
use std::fmt::Display;

pub const HISTORY_EMPTY_NOTICE: &str = "食事記録はまだありません";
pub const HISTORY_FAILED_NOTICE: &str = "食事記録の読み込みに失敗しました";

/// 履歴1件の表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItemView {
    pub food_name: String,
    pub date: String,
    pub meal_label: String,
    pub calories: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// 未取得
    NotLoaded,
    Empty,
    Failed,
    Records(Vec<HistoryItemView>),
}

impl HistoryView {
    /// 表示する通知文（一覧表示時は None）
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            HistoryView::Empty => Some(HISTORY_EMPTY_NOTICE),
            HistoryView::Failed => Some(HISTORY_FAILED_NOTICE),
            HistoryView::NotLoaded | HistoryView::Records(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryWorkflow {
    pending: bool,
    view: HistoryView,
}

impl Default for HistoryWorkflow {
    fn default() -> Self {
        Self {
            pending: false,
            view: HistoryView::NotLoaded,
        }
    }
}

impl HistoryWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得を開始
    pub fn begin(&mut self) -> Result<()> {
        if self.pending {
            return Err(Error::HistoryBusy);
        }
        self.pending = true;
        Ok(())
    }

    /// 応答を反映して表示を置き換える
    pub fn complete<E: Display>(
        &mut self,
        outcome: std::result::Result<Vec<HistoryRecord>, E>,
    ) -> Result<&HistoryView> {
        if !self.pending {
            return Err(Error::NoPendingRequest);
        }
        self.pending = false;

        match outcome {
            Ok(records) if records.is_empty() => {
                self.view = HistoryView::Empty;
                Ok(&self.view)
            }
            Ok(records) => {
                self.view = HistoryView::Records(records.iter().map(item_view).collect());
                Ok(&self.view)
            }
            Err(e) => {
                self.view = HistoryView::Failed;
                Err(Error::HistoryLoadFailed(e.to_string()))
            }
        }
    }

    pub fn busy(&self) -> bool {
        self.pending
    }

    pub fn view(&self) -> &HistoryView {
        &self.view
    }
}

fn item_view(record: &HistoryRecord) -> HistoryItemView {
    HistoryItemView {
        food_name: record.food_name.clone(),
        date: record.date.clone(),
        meal_label: meal_type_label(&record.meal_type),
        calories: record.calories.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(food_name: &str, meal_type: &str, calories: f64) -> HistoryRecord {
        HistoryRecord {
            food_name: food_name.to_string(),
            date: "2026-10-16".to_string(),
            meal_type: meal_type.to_string(),
            calories,
            ..Default::default()
        }
    }

    fn refresh(
        workflow: &mut HistoryWorkflow,
        outcome: std::result::Result<Vec<HistoryRecord>, String>,
    ) -> Result<HistoryView> {
        workflow.begin()?;
        workflow.complete(outcome).cloned()
    }

    #[test]
    fn test_initial_view() {
        let workflow = HistoryWorkflow::new();
        assert_eq!(workflow.view(), &HistoryView::NotLoaded);
        assert!(!workflow.busy());
    }

    #[test]
    fn test_empty_response_shows_notice() {
        let mut workflow = HistoryWorkflow::new();
        let view = refresh(&mut workflow, Ok(vec![])).unwrap();

        assert_eq!(view, HistoryView::Empty);
        assert_eq!(view.notice(), Some(HISTORY_EMPTY_NOTICE));
    }

    #[test]
    fn test_records_in_server_order() {
        let mut workflow = HistoryWorkflow::new();
        let view = refresh(
            &mut workflow,
            Ok(vec![
                record("组合餐食", "dinner", 820.0),
                record("apple", "breakfast", 52.0),
                record("cake", "snack", 257.5),
            ]),
        )
        .unwrap();

        let HistoryView::Records(items) = view else {
            panic!("一覧表示になっていない");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].meal_label, "夕食");
        assert_eq!(items[1].food_name, "apple");
        assert_eq!(items[1].meal_label, "朝食");
        assert_eq!(items[2].calories, "257.5");
    }

    #[test]
    fn test_unknown_meal_type_passes_through() {
        let mut workflow = HistoryWorkflow::new();
        let view = refresh(&mut workflow, Ok(vec![record("pancake", "brunch", 300.0)])).unwrap();

        let HistoryView::Records(items) = view else {
            panic!("一覧表示になっていない");
        };
        assert_eq!(items[0].meal_label, "brunch");
    }

    #[test]
    fn test_refresh_replaces_previous_list() {
        let mut workflow = HistoryWorkflow::new();
        refresh(&mut workflow, Ok(vec![record("a", "lunch", 1.0), record("b", "lunch", 2.0)])).unwrap();
        let view = refresh(&mut workflow, Ok(vec![record("c", "lunch", 3.0)])).unwrap();

        let HistoryView::Records(items) = view else {
            panic!("一覧表示になっていない");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].food_name, "c");
    }

    #[test]
    fn test_failure_shows_error_notice() {
        let mut workflow = HistoryWorkflow::new();
        refresh(&mut workflow, Ok(vec![record("a", "lunch", 1.0)])).unwrap();

        let err = refresh(&mut workflow, Err("500 Internal Server Error".to_string())).unwrap_err();
        assert!(matches!(err, Error::HistoryLoadFailed(_)));
        assert_eq!(workflow.view(), &HistoryView::Failed);
        assert_eq!(workflow.view().notice(), Some(HISTORY_FAILED_NOTICE));
        assert!(!workflow.busy());
    }

    #[test]
    fn test_single_request_in_flight() {
        let mut workflow = HistoryWorkflow::new();
        workflow.begin().unwrap();
        assert!(matches!(workflow.begin(), Err(Error::HistoryBusy)));
    }
}
