//! 識別・保存サービスとの通信
//!
//! - `POST /detect`: マルチパート（フィールド `file`）で画像を送信
//! - `POST /save_record`: 食事記録をJSONで送信
//! - `GET /get_records`: 食事履歴を取得
//!
//! 再試行はしない。失敗はそのまま呼び出し側へ返す。

use crate::config::Config;
use crate::error::{MealScanError, Result};
use async_trait::async_trait;
use meal_scan_common::{
    parse_detection_response, parse_history_response, parse_save_response, service_error_message,
    DetectionRequest, DetectionResult, HistoryRecord, MealRecord, SaveResponse,
};
use reqwest::{multipart, Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 識別・保存サービス
#[async_trait]
pub trait FoodService: Send + Sync {
    async fn detect(&self, request: DetectionRequest) -> Result<DetectionResult>;

    async fn save_record(&self, record: &MealRecord) -> Result<SaveResponse>;

    /// `date` は "YYYY-MM-DD"。None ならサービス側の既定（当日）
    async fn get_records(&self, date: Option<&str>) -> Result<Vec<HistoryRecord>>;
}

/// HTTP実装
pub struct HttpFoodService {
    client: Client,
    base_url: String,
}

impl HttpFoodService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(&config.server_url, config.timeout_seconds)
    }

    fn with_timeout(base_url: &str, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 注釈付き画像のURL（サービスは static/ 配下の相対パスを返す）
    pub fn annotated_image_url(&self, annotated_image: &str) -> String {
        annotated_image_url(&self.base_url, annotated_image)
    }

    /// 注釈付き画像をダウンロード
    pub async fn fetch_annotated_image(&self, annotated_image: &str) -> Result<Vec<u8>> {
        let url = self.annotated_image_url(annotated_image);
        info!(url = %url, "注釈付き画像を取得します");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MealScanError::ApiCall(format!("{} ({})", url, status)));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// 注釈付き画像の参照を絶対URLに解決
pub fn annotated_image_url(base_url: &str, annotated_image: &str) -> String {
    let path = annotated_image.replace('\\', "/");
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:") {
        return path;
    }

    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.starts_with("static/") {
        format!("{}/{}", base, path)
    } else {
        format!("{}/static/{}", base, path)
    }
}

/// ステータスを確認してボディを取り出す
async fn read_body(response: Response, endpoint: &str) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let detail = service_error_message(&body).unwrap_or_else(|| status.to_string());
        warn!(endpoint, %status, "サービスがエラーを返しました");
        return Err(MealScanError::ApiCall(format!("{} ({}): {}", endpoint, status, detail)));
    }

    debug!(endpoint, bytes = body.len(), "レスポンス受信");
    Ok(body)
}

#[async_trait]
impl FoodService for HttpFoodService {
    async fn detect(&self, request: DetectionRequest) -> Result<DetectionResult> {
        let url = self.endpoint("detect");
        info!(file = %request.file_name, size = request.bytes.len(), "識別リクエスト送信");

        let part = multipart::Part::bytes(request.bytes)
            .file_name(request.file_name)
            .mime_str(&request.media_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let body = read_body(response, "/detect").await?;
        Ok(parse_detection_response(&body)?)
    }

    async fn save_record(&self, record: &MealRecord) -> Result<SaveResponse> {
        let url = self.endpoint("save_record");
        info!(meal_type = %record.meal_type, calories = record.food_data.calories, "食事記録を送信");

        let response = self.client.post(&url).json(record).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(parse_save_response(&body)?);
        }

        // 4xxでも {"error": ...} があればサービスの失敗として扱う
        match service_error_message(&body) {
            Some(message) => Ok(SaveResponse {
                success: false,
                message: Some(message),
            }),
            None => {
                warn!(%status, "保存リクエストが失敗しました");
                Err(MealScanError::ApiCall(format!("/save_record ({})", status)))
            }
        }
    }

    async fn get_records(&self, date: Option<&str>) -> Result<Vec<HistoryRecord>> {
        let url = self.endpoint("get_records");
        let mut request = self.client.get(&url);
        if let Some(date) = date {
            request = request.query(&[("date", date)]);
        }

        let response = request.send().await?;
        let body = read_body(response, "/get_records").await?;
        Ok(parse_history_response(&body)?)
    }
}
