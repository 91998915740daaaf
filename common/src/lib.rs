//! Meal Scan Common Library
//!
//! 食事画像の識別クライアントの中核。通信を持たない状態機械と集計処理。

pub mod types;
pub mod error;
pub mod nutrition;
pub mod selection;
pub mod detection;
pub mod presenter;
pub mod save;
pub mod history;
pub mod parser;

pub use types::{
    AggregatedNutrition, DetectedObject, DetectionResult, FoodData, HistoryRecord, ImageFile,
    MealRecord, MealType, NutritionInfo, SaveResponse, COMBINED_MEAL_NAME, meal_type_label,
};
pub use error::{Error, Result};
pub use nutrition::aggregate;
pub use selection::{ImageSelection, SelectionState, ViewMode};
pub use detection::{DetectionPhase, DetectionRequest, DetectionWorkflow};
pub use presenter::{ItemView, NutrientView, ResultsPresenter, ResultsView, TotalsView};
pub use save::{SavePhase, SaveWorkflow};
pub use history::{HistoryItemView, HistoryView, HistoryWorkflow};
pub use parser::{
    parse_detection_response, parse_history_response, parse_save_response, service_error_message,
};
