//! 栄養値の集計
//!
//! 合計は丸めずに保持する。表示用の丸めは presenter 側で行う。

use crate::types::{AggregatedNutrition, DetectedObject, NutritionInfo};
use std::ops::Add;

impl Add for AggregatedNutrition {
    type Output = AggregatedNutrition;

    fn add(self, rhs: Self) -> Self {
        AggregatedNutrition {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl From<&NutritionInfo> for AggregatedNutrition {
    fn from(n: &NutritionInfo) -> Self {
        AggregatedNutrition {
            calories: n.calories,
            protein: n.protein,
            carbs: n.carbs,
            fat: n.fat,
        }
    }
}

/// 検出された食品の栄養値を合計
///
/// 空の場合はすべて0を返す
pub fn aggregate(objects: &[DetectedObject]) -> AggregatedNutrition {
    objects
        .iter()
        .map(|obj| AggregatedNutrition::from(&obj.nutrition))
        .fold(AggregatedNutrition::default(), |acc, n| acc + n)
}
