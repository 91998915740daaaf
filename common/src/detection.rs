//! 識別ワークフロー
//!
//! Idle → Submitting → (Displaying | Failed)
//!
//! 通信そのものは呼び出し側が行う。`begin` でリクエストを受け取り、
//! 応答を `complete` に渡す。未完了のリクエストは常に1件まで。

use crate::error::{Error, Result};
use crate::selection::SelectionState;
use crate::types::DetectionResult;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPhase {
    Idle,
    Submitting,
    Displaying,
    Failed,
}

/// `POST /detect` に送るマルチパートの中身（フィールド名 `file`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRequest {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DetectionWorkflow {
    phase: DetectionPhase,
    result: Option<DetectionResult>,
    last_error: Option<String>,
}

impl Default for DetectionWorkflow {
    fn default() -> Self {
        Self {
            phase: DetectionPhase::Idle,
            result: None,
            last_error: None,
        }
    }
}

impl DetectionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 識別を開始してリクエストを返す
    ///
    /// 処理中の場合と画像未選択の場合は拒否する（リクエストは作られない）
    pub fn begin(&mut self, selection: &SelectionState) -> Result<DetectionRequest> {
        if self.busy() {
            return Err(Error::DetectionBusy);
        }
        let current = selection.current().ok_or(Error::NoFileSelected)?;

        self.phase = DetectionPhase::Submitting;
        self.last_error = None;

        Ok(DetectionRequest {
            file_name: current.file.file_name.clone(),
            media_type: current.file.media_type.clone(),
            bytes: current.file.bytes.clone(),
        })
    }

    /// 応答を反映する
    ///
    /// 失敗時は Failed に遷移し、前回の識別結果には手を付けない
    pub fn complete<E: Display>(
        &mut self,
        outcome: std::result::Result<DetectionResult, E>,
    ) -> Result<&DetectionResult> {
        if !self.busy() {
            return Err(Error::NoPendingRequest);
        }

        match outcome {
            Ok(result) => {
                self.phase = DetectionPhase::Displaying;
                Ok(&*self.result.insert(result))
            }
            Err(e) => {
                let message = e.to_string();
                self.phase = DetectionPhase::Failed;
                self.last_error = Some(message.clone());
                Err(Error::DetectionFailed(message))
            }
        }
    }

    /// 新しい識別のために結果と選択をクリア
    pub fn reset(&mut self, selection: &mut SelectionState) -> Result<()> {
        if self.busy() {
            return Err(Error::DetectionBusy);
        }

        self.phase = DetectionPhase::Idle;
        self.result = None;
        self.last_error = None;
        selection.reset();
        Ok(())
    }

    /// 処理中フラグ（ボタン無効化・ビジー表示用）
    pub fn busy(&self) -> bool {
        self.phase == DetectionPhase::Submitting
    }

    pub fn phase(&self) -> DetectionPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
