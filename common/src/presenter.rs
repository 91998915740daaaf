//! 識別結果の表示モデル
//!
//! 同じ識別結果からは常に同じ表示を生成する。再描画は前回の表示を
//! 丸ごと置き換える（追記しない）。

use crate::nutrition::aggregate;
use crate::types::{DetectedObject, DetectionResult};

/// 栄養素1項目の表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutrientView {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// 検出食品1件の表示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub food_name: String,
    /// 例: "87%"
    pub confidence: String,
    pub nutrients: [NutrientView; 4],
}

/// 合計値の表示（小数1桁）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsView {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub annotated_image: String,
    pub items: Vec<ItemView>,
    pub totals: TotalsView,
}

#[derive(Debug, Clone, Default)]
pub struct ResultsPresenter {
    view: Option<ResultsView>,
}

impl ResultsPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 識別結果を描画（前回の表示は破棄）
    pub fn render(&mut self, result: &DetectionResult) -> &ResultsView {
        &*self.view.insert(build_view(result))
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    pub fn view(&self) -> Option<&ResultsView> {
        self.view.as_ref()
    }
}

/// 識別結果から表示モデルを作る
pub fn build_view(result: &DetectionResult) -> ResultsView {
    let totals = aggregate(&result.detected_objects);

    ResultsView {
        annotated_image: result.annotated_image.clone(),
        items: result.detected_objects.iter().map(item_view).collect(),
        totals: TotalsView {
            calories: format_total(totals.calories),
            protein: format_total(totals.protein),
            carbs: format_total(totals.carbs),
            fat: format_total(totals.fat),
        },
    }
}

fn item_view(obj: &DetectedObject) -> ItemView {
    let n = &obj.nutrition;
    ItemView {
        food_name: n.food_name.clone(),
        confidence: format_confidence(obj.confidence),
        nutrients: [
            NutrientView { label: "カロリー", value: n.calories.to_string(), unit: "kcal" },
            NutrientView { label: "たんぱく質", value: n.protein.to_string(), unit: "g" },
            NutrientView { label: "炭水化物", value: n.carbs.to_string(), unit: "g" },
            NutrientView { label: "脂質", value: n.fat.to_string(), unit: "g" },
        ],
    }
}

/// 信頼度を整数パーセントに丸める（0.5 は切り上げ）
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", (confidence * 100.0).round())
}

/// 合計値を小数1桁に丸める（表示専用、0.05 は切り上げ）
///
/// `{:.1}` だけだと 0.25 が "0.2" になるため先に丸める
pub fn format_total(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}
