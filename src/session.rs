//! セッション（画面1枚分の状態）
//!
//! ユーザー操作は `Command` として受け取り、それぞれ1つのワークフロー操作に対応させる。
//! 各ワークフローの未完了リクエストは常に1件まで。

use crate::client::FoodService;
use crate::error::Result;
use crate::media;
use meal_scan_common::{
    DetectionWorkflow, HistoryView, HistoryWorkflow, ImageFile, ImageSelection, ResultsPresenter,
    ResultsView, SaveWorkflow, SelectionState,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// ユーザー操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 画像を選択（クリック選択・ドロップ）
    SelectFile(PathBuf),
    /// 選択を取り消す
    Cancel,
    /// 識別する
    Detect,
    /// 新しい識別（結果と選択をクリア）
    NewDetection,
    /// 保存ダイアログを開く
    OpenSave,
    /// 保存ダイアログを閉じる
    CloseSave,
    /// 食事区分を指定して保存
    SubmitSave(String),
    /// 食事履歴を再取得
    RefreshHistory,
}

pub struct Session<S: FoodService> {
    service: S,
    selection: SelectionState,
    detection: DetectionWorkflow,
    presenter: ResultsPresenter,
    save: SaveWorkflow,
    history: HistoryWorkflow,
    history_date: Option<String>,
}

impl<S: FoodService> Session<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            selection: SelectionState::new(),
            detection: DetectionWorkflow::new(),
            presenter: ResultsPresenter::new(),
            save: SaveWorkflow::new(),
            history: HistoryWorkflow::new(),
            history_date: None,
        }
    }

    /// 履歴を取得する日付（"YYYY-MM-DD"）
    pub fn with_history_date(mut self, date: Option<String>) -> Self {
        self.history_date = date;
        self
    }

    /// 操作を実行し、ユーザーへの通知文を返す
    pub async fn dispatch(&mut self, command: Command) -> Result<Option<String>> {
        match command {
            Command::SelectFile(path) => {
                let selection = self.select_file(&path).await?;
                Ok(Some(format!("{} を選択しました", selection.file.file_name)))
            }
            Command::Cancel => {
                self.cancel()?;
                Ok(None)
            }
            Command::Detect => {
                let view = self.detect().await?;
                Ok(Some(format!("{}件の食品を識別しました", view.items.len())))
            }
            Command::NewDetection => {
                self.new_detection()?;
                Ok(None)
            }
            Command::OpenSave => {
                self.open_save()?;
                Ok(None)
            }
            Command::CloseSave => {
                self.close_save()?;
                Ok(None)
            }
            Command::SubmitSave(meal_type) => self.submit_save(&meal_type).await.map(Some),
            Command::RefreshHistory => {
                self.refresh_history().await?;
                Ok(None)
            }
        }
    }

    /// ファイルを読み込んで選択
    pub async fn select_file(&mut self, path: &Path) -> Result<&ImageSelection> {
        let file = media::load_image_file(path).await?;
        self.select_image(file)
    }

    pub fn select_image(&mut self, file: ImageFile) -> Result<&ImageSelection> {
        match self.selection.select_file(file) {
            Ok(selection) => Ok(selection),
            Err(e) => {
                warn!(error = %e, "画像以外のファイルが選択されました");
                Err(e.into())
            }
        }
    }

    pub fn cancel(&mut self) -> Result<()> {
        Ok(self.selection.cancel()?)
    }

    /// 選択中の画像を識別して結果を描画
    pub async fn detect(&mut self) -> Result<&ResultsView> {
        let request = self.detection.begin(&self.selection)?;
        info!(file = %request.file_name, "識別を開始");

        let outcome = self.service.detect(request).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "識別に失敗しました");
        }

        let result = self.detection.complete(outcome)?;
        Ok(self.presenter.render(result))
    }

    /// 新しい識別: 結果・選択・保存ダイアログをクリア
    pub fn new_detection(&mut self) -> Result<()> {
        self.save.close()?;
        self.detection.reset(&mut self.selection)?;
        self.presenter.clear();
        Ok(())
    }

    pub fn open_save(&mut self) -> Result<()> {
        Ok(self.save.open(&self.detection)?)
    }

    pub fn close_save(&mut self) -> Result<()> {
        Ok(self.save.close()?)
    }

    /// 保存して、成功したら履歴を再取得
    pub async fn submit_save(&mut self, meal_type: &str) -> Result<String> {
        let record = self.save.begin(meal_type, &self.detection)?;

        let outcome = self.service.save_record(&record).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "食事記録の送信に失敗しました");
        }
        let notice = self.save.complete(outcome)?;
        info!(meal_type, "食事記録を保存しました");

        // 履歴の取得失敗は履歴側の表示で通知する
        if let Err(e) = self.refresh_history().await {
            warn!(error = %e, "保存後の履歴取得に失敗しました");
        }
        Ok(notice)
    }

    pub async fn refresh_history(&mut self) -> Result<&HistoryView> {
        self.history.begin()?;

        let outcome = self.service.get_records(self.history_date.as_deref()).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "食事履歴の取得に失敗しました");
        }
        Ok(self.history.complete(outcome)?)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn detection(&self) -> &DetectionWorkflow {
        &self.detection
    }

    pub fn save(&self) -> &SaveWorkflow {
        &self.save
    }

    pub fn results_view(&self) -> Option<&ResultsView> {
        self.presenter.view()
    }

    pub fn history_view(&self) -> &HistoryView {
        self.history.view()
    }

    /// 識別中（識別ボタン無効）
    pub fn busy(&self) -> bool {
        self.detection.busy()
    }
}
