use anyhow::Context;
use clap::Parser;
use meal_scan::{cli, client, config, interactive, logging, progress, render, session};
use chrono::Local;
use cli::{Cli, Commands};
use client::HttpFoodService;
use config::Config;
use session::Session;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    if let Some(server) = &cli.server {
        config.set_server_url(server)?;
    }

    match cli.command {
        Commands::Detect { image, meal, annotated_out } => {
            println!("🍱 meal-scan - 食品識別\n");

            let service = HttpFoodService::from_config(&config)?;
            let mut session = Session::new(service);

            // 1. 画像選択
            println!("[1/2] 画像を読み込み中...");
            let selection = session.select_file(&image).await?;
            println!("{}\n", render::format_selection(selection));

            // 2. 識別
            let pb = progress::spinner("[2/2] 識別中...");
            let outcome = session
                .detect()
                .await
                .map(|view| view.annotated_image.clone());
            pb.finish_and_clear();
            let annotated_image = outcome?;

            let url = session.service().annotated_image_url(&annotated_image);
            if let Some(view) = session.results_view() {
                println!("{}\n", render::format_results(view, Some(&url)));
            }

            if let Some(out) = annotated_out {
                save_annotated_image(session.service(), &annotated_image, &out).await?;
            }

            // 食事区分の指定があれば保存まで行う
            if let Some(meal) = meal {
                session.open_save()?;
                let pb = progress::spinner("保存中...");
                let outcome = session.submit_save(meal.code()).await;
                pb.finish_and_clear();
                println!("✔ {}", outcome?);

                println!("\n📅 食事履歴\n{}", render::format_history(session.history_view()));
            }

            println!("\n✅ 完了");
        }

        Commands::History { date } => {
            let service = HttpFoodService::from_config(&config)?;
            let date_label = date.unwrap_or_else(|| Local::now().date_naive());
            let mut session =
                Session::new(service).with_history_date(date.map(|d| d.format("%Y-%m-%d").to_string()));

            println!("📅 食事履歴 ({})\n", date_label.format("%Y-%m-%d"));
            let pb = progress::spinner("読み込み中...");
            let outcome = session.refresh_history().await.map(|_| ());
            pb.finish_and_clear();

            // 失敗時も通知を表示してからエラーを返す
            println!("{}", render::format_history(session.history_view()));
            outcome?;
        }

        Commands::Session => {
            let service = HttpFoodService::from_config(&config)?;
            let base_url = service.base_url().to_string();
            let mut session = Session::new(service);
            interactive::run(&mut session, &base_url, config.default_meal_type).await?;
        }

        Commands::Config { set_server, set_default_meal, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_server {
                config.set_server_url(&url)?;
                println!("✔ サービスのURLを設定しました: {}", config.server_url);
                changed = true;
            }

            if let Some(meal) = set_default_meal {
                config.default_meal_type = meal;
                println!("✔ 食事区分の初期値を設定しました: {}", meal.label());
                changed = true;
            }

            if changed {
                config.save().context("設定ファイルの保存に失敗しました")?;
            }

            if show || !changed {
                println!("設定:");
                println!("  サービスURL: {}", config.server_url);
                println!(
                    "  食事区分の初期値: {} ({})",
                    config.default_meal_type.label(),
                    config.default_meal_type.code()
                );
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

async fn save_annotated_image(
    service: &HttpFoodService,
    annotated_image: &str,
    out: &Path,
) -> anyhow::Result<()> {
    let pb = progress::spinner("注釈付き画像を取得中...");
    let outcome = service.fetch_annotated_image(annotated_image).await;
    pb.finish_and_clear();

    let bytes = outcome?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("書き込みに失敗しました: {}", out.display()))?;
    println!("✔ 注釈付き画像を保存: {}", out.display());
    Ok(())
}
