//! 端末向けの表示
//!
//! 表示モデル（ResultsView / HistoryView）を文字列に整形する。

use meal_scan_common::{HistoryView, ImageSelection, ResultsView};
use std::fmt::Write;

/// プレビューに表示する Data URL の最大文字数
const PREVIEW_MAX_CHARS: usize = 48;

pub fn format_selection(selection: &ImageSelection) -> String {
    let uri = &selection.preview_data_uri;
    let preview = if uri.chars().count() > PREVIEW_MAX_CHARS {
        let head: String = uri.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{}… ({}文字)", head, uri.len())
    } else {
        uri.clone()
    };

    format!(
        "📷 {} ({}, {:.1} KB)\n   プレビュー: {}",
        selection.file.file_name,
        selection.file.media_type,
        selection.file.bytes.len() as f64 / 1024.0,
        preview
    )
}

/// 識別結果を整形
///
/// `annotated_url` は注釈付き画像の解決済みURL
pub fn format_results(view: &ResultsView, annotated_url: Option<&str>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "🍽  識別結果");
    let _ = writeln!(out, "注釈付き画像: {}", annotated_url.unwrap_or(&view.annotated_image));
    let _ = writeln!(out, "---");

    for item in &view.items {
        let _ = writeln!(out, "{}  [{} 信頼度]", item.food_name, item.confidence);
        let nutrients = item
            .nutrients
            .iter()
            .map(|n| format!("{}: {} {}", n.label, n.value, n.unit))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "  {}", nutrients);
    }

    let _ = writeln!(out, "---");
    let _ = write!(
        out,
        "合計  カロリー: {} kcal  たんぱく質: {} g  炭水化物: {} g  脂質: {} g",
        view.totals.calories, view.totals.protein, view.totals.carbs, view.totals.fat
    );
    out
}

/// 食事履歴を整形
pub fn format_history(view: &HistoryView) -> String {
    match view {
        HistoryView::NotLoaded => "（食事履歴は未取得です）".to_string(),
        HistoryView::Records(items) => items
            .iter()
            .map(|item| {
                format!(
                    "{}  {} - {}  {} kcal",
                    item.food_name, item.date, item.meal_label, item.calories
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        HistoryView::Empty | HistoryView::Failed => view.notice().unwrap_or_default().to_string(),
    }
}
