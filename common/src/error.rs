//! エラー型定義
//!
//! ワークフローの各操作で発生しうるエラー。すべてユーザーへ通知され、
//! 同じ操作をやり直せば回復できる。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("画像ファイルを選択してください（{0} は画像ではありません）")]
    InvalidFileType(String),

    #[error("画像が選択されていません")]
    NoFileSelected,

    #[error("識別処理中です。完了までお待ちください")]
    DetectionBusy,

    #[error("識別に失敗しました。もう一度お試しください: {0}")]
    DetectionFailed(String),

    #[error("処理中のリクエストがありません")]
    NoPendingRequest,

    #[error("保存できる識別結果がありません")]
    NoResultToSave,

    #[error("保存ダイアログが開いていません")]
    SaveDialogClosed,

    #[error("不明な食事区分です: {0}（breakfast/lunch/dinner/snack）")]
    InvalidMealType(String),

    #[error("保存処理中です。完了までお待ちください")]
    SaveBusy,

    #[error("保存に失敗しました: {0}")]
    SaveFailed(String),

    #[error("食事履歴を読み込み中です")]
    HistoryBusy,

    #[error("食事履歴の読み込みに失敗しました: {0}")]
    HistoryLoadFailed(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
