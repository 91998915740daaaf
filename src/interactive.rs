//! 対話モード
//!
//! 画面のボタン操作をメニュー選択に置き換えたもの。選択された操作は
//! `Command` として Session に渡す。

use crate::client::{annotated_image_url, FoodService};
use crate::error::Result;
use crate::progress;
use crate::render;
use crate::session::{Command, Session};
use dialoguer::{Input, Select};
use meal_scan_common::{MealType, SavePhase};
use std::path::PathBuf;

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SelectFile,
    Cancel,
    Detect,
    Save,
    NewDetection,
    RefreshHistory,
    Quit,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::SelectFile => "画像を選択",
            MenuAction::Cancel => "選択を取り消す",
            MenuAction::Detect => "食品を識別",
            MenuAction::Save => "食事記録を保存",
            MenuAction::NewDetection => "新しい識別",
            MenuAction::RefreshHistory => "食事履歴を更新",
            MenuAction::Quit => "終了",
        }
    }
}

/// 現在の状態で選べる操作
pub fn available_actions<S: FoodService>(session: &Session<S>) -> Vec<MenuAction> {
    let mut actions = vec![MenuAction::SelectFile];

    if session.selection().has_file() {
        actions.push(MenuAction::Cancel);
        if !session.busy() {
            actions.push(MenuAction::Detect);
        }
    }
    if session.results_view().is_some() {
        actions.push(MenuAction::Save);
        actions.push(MenuAction::NewDetection);
    }
    actions.push(MenuAction::RefreshHistory);
    actions.push(MenuAction::Quit);
    actions
}

/// 対話モードを実行
///
/// 起動時に食事履歴を読み込む。各操作のエラーは表示して続行する。
pub async fn run<S: FoodService>(
    session: &mut Session<S>,
    base_url: &str,
    default_meal: MealType,
) -> Result<()> {
    println!("🍱 meal-scan - 対話モード\n");

    run_command(session, Command::RefreshHistory, base_url).await;

    loop {
        let actions = available_actions(session);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();

        let index = Select::new()
            .with_prompt("操作を選択")
            .items(&labels)
            .default(0)
            .interact()?;

        let command = match actions[index] {
            MenuAction::SelectFile => {
                let path: String = Input::new()
                    .with_prompt("画像ファイルのパス")
                    .interact_text()?;
                Command::SelectFile(PathBuf::from(path.trim()))
            }
            MenuAction::Cancel => Command::Cancel,
            MenuAction::Detect => Command::Detect,
            MenuAction::NewDetection => Command::NewDetection,
            MenuAction::RefreshHistory => Command::RefreshHistory,
            MenuAction::Save => {
                run_save_dialog(session, base_url, default_meal).await?;
                continue;
            }
            MenuAction::Quit => break,
        };

        run_command(session, command, base_url).await;
    }

    println!("\n👋 終了します");
    Ok(())
}

/// 保存ダイアログ: 失敗した場合は開いたまま再選択できる
async fn run_save_dialog<S: FoodService>(
    session: &mut Session<S>,
    base_url: &str,
    default_meal: MealType,
) -> Result<()> {
    if !run_command(session, Command::OpenSave, base_url).await {
        return Ok(());
    }

    let mut labels: Vec<String> = MealType::ALL
        .iter()
        .map(|m| format!("{} ({})", m.label(), m.code()))
        .collect();
    labels.push("閉じる".to_string());
    let default_index = MealType::ALL
        .iter()
        .position(|m| *m == default_meal)
        .unwrap_or(0);

    while session.save().phase() == SavePhase::Open {
        let index = Select::new()
            .with_prompt("食事区分")
            .items(&labels)
            .default(default_index)
            .interact()?;

        let command = match MealType::ALL.get(index) {
            Some(meal) => Command::SubmitSave(meal.code().to_string()),
            None => Command::CloseSave,
        };
        run_command(session, command, base_url).await;
    }
    Ok(())
}

/// 操作のあとに食事履歴を表示するか
///
/// 保存に失敗した場合は履歴を再取得していないので表示しない
fn history_visible_after(command: &Command, succeeded: bool) -> bool {
    match command {
        Command::RefreshHistory => true,
        Command::SubmitSave(_) => succeeded,
        _ => false,
    }
}

/// 操作を実行して結果を表示（成功なら true）
async fn run_command<S: FoodService>(
    session: &mut Session<S>,
    command: Command,
    base_url: &str,
) -> bool {
    let busy_message = match &command {
        Command::Detect => Some("識別中..."),
        Command::SubmitSave(_) => Some("保存中..."),
        Command::RefreshHistory => Some("食事履歴を読み込み中..."),
        _ => None,
    };
    let pb = busy_message.map(progress::spinner);
    let issued = command.clone();
    let shows_results = matches!(command, Command::Detect);

    let outcome = session.dispatch(command).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let ok = match outcome {
        Ok(notice) => {
            if let Some(notice) = notice {
                println!("✔ {}", notice);
            }
            if let (true, Some(view)) = (shows_results, session.results_view()) {
                let url = annotated_image_url(base_url, &view.annotated_image);
                println!("{}\n", render::format_results(view, Some(&url)));
            }
            true
        }
        Err(e) => {
            println!("✖ {}", e);
            false
        }
    };

    let shows_history = history_visible_after(&issued, ok);
    if shows_history {
        println!("📅 食事履歴\n{}\n", render::format_history(session.history_view()));
    }
    if let Some(selection) = session.selection().current() {
        if ok && !shows_history && !shows_results {
            println!("{}", render::format_selection(selection));
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_hidden_after_failed_save() {
        let save = Command::SubmitSave("lunch".to_string());
        assert!(history_visible_after(&save, true));
        assert!(!history_visible_after(&save, false));
    }

    #[test]
    fn test_history_shown_after_refresh() {
        // 取得失敗でも失敗の通知を履歴欄に出す
        assert!(history_visible_after(&Command::RefreshHistory, true));
        assert!(history_visible_after(&Command::RefreshHistory, false));
        assert!(!history_visible_after(&Command::Detect, true));
        assert!(!history_visible_after(&Command::OpenSave, true));
    }
}
