use clap::{Parser, Subcommand};
use chrono::NaiveDate;
use meal_scan_common::MealType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meal-scan")]
#[command(about = "食事画像の識別・栄養集計・食事記録ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// サービスのURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を識別して栄養を集計
    Detect {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 食事区分を指定して記録を保存 (breakfast/lunch/dinner/snack)
        #[arg(short, long)]
        meal: Option<MealType>,

        /// 注釈付き画像の保存先
        #[arg(short, long)]
        annotated_out: Option<PathBuf>,
    },

    /// 食事履歴を表示
    History {
        /// 日付 (YYYY-MM-DD、デフォルト: 当日)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// 対話モード
    Session,

    /// 設定
    Config {
        /// サービスのURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// 保存時の食事区分の初期値を設定
        #[arg(long)]
        set_default_meal: Option<MealType>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
