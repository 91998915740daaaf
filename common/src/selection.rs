//! 画像選択の状態
//!
//! Empty ⇄ Selected。識別中かどうかは DetectionWorkflow 側が持つ。

use crate::error::{Error, Result};
use crate::types::ImageFile;
use base64::{engine::general_purpose, Engine as _};

/// 表示中の領域（アップロード案内 / プレビュー）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Upload,
    Preview,
}

/// 選択中の画像とプレビュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelection {
    pub file: ImageFile,
    /// "data:image/jpeg;base64,..." 形式
    pub preview_data_uri: String,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Option<ImageSelection>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像を選択（既存の選択は置き換える）
    ///
    /// 画像以外は `InvalidFileType` で拒否し、状態は変更しない
    pub fn select_file(&mut self, file: ImageFile) -> Result<&ImageSelection> {
        if !file.is_image() {
            return Err(Error::InvalidFileType(file.media_type));
        }

        let preview_data_uri = to_data_uri(&file.media_type, &file.bytes);
        Ok(&*self.current.insert(ImageSelection {
            file,
            preview_data_uri,
        }))
    }

    /// 選択を取り消す（Selected のときのみ有効）
    pub fn cancel(&mut self) -> Result<()> {
        match self.current.take() {
            Some(_) => Ok(()),
            None => Err(Error::NoFileSelected),
        }
    }

    /// どの状態からでも Empty に戻す
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn has_file(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&ImageSelection> {
        self.current.as_ref()
    }

    pub fn mode(&self) -> ViewMode {
        if self.has_file() {
            ViewMode::Preview
        } else {
            ViewMode::Upload
        }
    }
}

/// バイト列を Data URL に変換
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type,
        general_purpose::STANDARD.encode(bytes)
    )
}
