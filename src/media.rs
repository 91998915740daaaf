//! 画像ファイルの読み込み
//!
//! MIMEタイプはファイル内容から判定し、判定できなければ拡張子から推定する。

use crate::error::{MealScanError, Result};
use image::ImageFormat;
use meal_scan_common::ImageFile;
use std::path::Path;

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// ファイルを読み込んで ImageFile を作る
///
/// 画像かどうかの判定は SelectionState::select_file が行う
pub async fn load_image_file(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(MealScanError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| MealScanError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let media_type = detect_media_type(path, &bytes);

    tracing::debug!(file = %file_name, media_type = %media_type, size = bytes.len(), "画像を読み込みました");

    Ok(ImageFile::new(file_name, media_type, bytes))
}

/// 内容 → 拡張子の順でMIMEタイプを判定
pub fn detect_media_type(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .ok()
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| UNKNOWN_MEDIA_TYPE.to_string())
}
