//! データモデル
//!
//! 識別サービス・保存サービスとやり取りする型:
//! - DetectionResult: `POST /detect` のレスポンス
//! - MealRecord: `POST /save_record` のリクエストボディ
//! - HistoryRecord: `GET /get_records` のレスポンス要素

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 組み合わせ食として保存するときの料理名（Web版クライアントと同じ値を使う）
pub const COMBINED_MEAL_NAME: &str = "组合餐食";

/// 選択された画像ファイル（バイト列は読み込み済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    /// MIMEタイプ（例: "image/jpeg"）
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// 画像として扱えるMIMEタイプか
    pub fn is_image(&self) -> bool {
        self.media_type.trim().to_ascii_lowercase().starts_with("image/")
    }
}

/// 食品1件分の栄養情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub food_name: String,
    pub calories: f64,  // kcal
    pub protein: f64,   // g
    pub carbs: f64,     // g
    pub fat: f64,       // g
}

/// 識別された食品
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// 検出クラス名（例: "apple"）
    #[serde(default)]
    pub class_name: String,

    /// 信頼度（0.0-1.0）
    pub confidence: f64,

    /// バウンディングボックス [x1, y1, x2, y2]
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<[i64; 4]>,

    pub nutrition: NutritionInfo,
}

/// 識別結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// 注釈付き画像の参照（サービスの静的ディレクトリからの相対パス）
    pub annotated_image: String,

    #[serde(default)]
    pub detected_objects: Vec<DetectedObject>,
}

/// 栄養の合計値（保存しない、常に再計算する）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedNutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// 食事区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// サービスとやり取りするコード
    pub fn code(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "朝食",
            MealType::Lunch => "昼食",
            MealType::Dinner => "夕食",
            MealType::Snack => "間食",
        }
    }
}

impl FromStr for MealType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MealType::ALL
            .into_iter()
            .find(|m| m.code() == s.trim())
            .ok_or_else(|| Error::InvalidMealType(s.to_string()))
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 食事区分コードを表示ラベルへ変換
///
/// 未知のコードはそのままラベルとして返す（エラーにはしない）
pub fn meal_type_label(code: &str) -> String {
    code.parse::<MealType>()
        .map(|m| m.label().to_string())
        .unwrap_or_else(|_| code.to_string())
}

/// 保存する料理データ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodData {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// 保存リクエスト（`POST /save_record` のボディそのもの）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub food_data: FoodData,
    pub meal_type: MealType,
}

impl MealRecord {
    /// 合計値から組み合わせ食のレコードを作成
    pub fn combined(totals: &AggregatedNutrition, meal_type: MealType) -> Self {
        Self {
            food_data: FoodData {
                food_name: COMBINED_MEAL_NAME.to_string(),
                calories: totals.calories,
                protein: totals.protein,
                carbs: totals.carbs,
                fat: totals.fat,
            },
            meal_type,
        }
    }
}

/// 保存レスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,

    /// サービスからのメッセージ（4xxでは `error` キーで返る）
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 食事履歴の1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub food_name: String,

    #[serde(default)]
    pub date: String,

    /// 食事区分コード（未知のコードもそのまま保持）
    #[serde(default)]
    pub meal_type: String,

    #[serde(default)]
    pub calories: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
}
