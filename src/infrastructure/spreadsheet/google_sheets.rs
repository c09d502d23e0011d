use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::auth::TokenProvider;
use crate::application::config::SpreadsheetConfig;
use crate::domain::entities::host::HostIdentity;
use crate::domain::entities::sample::Sample;
use crate::domain::ports::spreadsheet::{SpreadsheetError, SpreadsheetSink};

/// First row of every host tab.
pub const HEADER_ROW: [&str; 4] = [
    "Timestamp",
    "CPU Usage (%)",
    "Memory Usage (%)",
    "Disk Usage (%)",
];

const HEADER_CELLS: &str = "A1:D1";
const DATA_CELLS: &str = "A2:D";
const COLUMN_COUNT: i64 = 4;

/// A1 notation for `cells` on the tab `title`; quotes are doubled inside the name.
#[must_use]
pub fn a1_range(title: &str, cells: &str) -> String {
    format!("'{}'!{cells}", title.replace('\'', "''"))
}

/// Row cells for `sample`: local timestamp, then CPU, memory and disk (-1 when unavailable).
#[must_use]
pub fn sample_row(sample: &Sample) -> Vec<Value> {
    vec![
        json!(sample.local_timestamp()),
        json!(sample.cpu_percent),
        json!(sample.memory_percent),
        json!(sample.disk_value()),
    ]
}

#[derive(Debug, Default, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

/// `sheetId` is omitted by the API when it is 0.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<BatchReply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchReply {
    add_sheet: Option<SheetEntry>,
}

fn find_sheet_id(meta: &SpreadsheetMeta, title: &str) -> Option<i64> {
    meta.sheets
        .iter()
        .find(|s| s.properties.title == title)
        .map(|s| s.properties.sheet_id)
}

/// Maps a non-2xx response to `SpreadsheetError::Api` for `step`.
async fn check(step: &'static str, resp: Response) -> Result<Response, SpreadsheetError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SpreadsheetError::Api {
        step,
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

fn request_error(e: &reqwest::Error) -> SpreadsheetError {
    SpreadsheetError::Request(e.to_string())
}

/// Mirrors samples into a Google spreadsheet through the Sheets v4 REST API,
/// one tab per host.
///
/// Each append ensures the tab exists, rewrites the header row, appends the
/// sample row and center-aligns the data columns. A failed alignment is only
/// logged.
pub struct GoogleSheetsClient {
    spreadsheet_id: String,
    api_base: Url,
    client: reqwest::Client,
    tokens: TokenProvider,
}

impl GoogleSheetsClient {
    /// # Errors
    ///
    /// Returns `SpreadsheetError::Request` if the API base URL is invalid or
    /// the HTTP client cannot be initialized.
    pub fn new(spreadsheet_id: &str, config: &SpreadsheetConfig) -> Result<Self, SpreadsheetError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpreadsheetError::Request(format!("cannot build HTTP client: {e}")))?;
        Self::with_client(spreadsheet_id, config, client)
    }

    fn with_client(
        spreadsheet_id: &str,
        config: &SpreadsheetConfig,
        client: reqwest::Client,
    ) -> Result<Self, SpreadsheetError> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| SpreadsheetError::Request(format!("invalid API base {}: {e}", config.api_base)))?;
        if api_base.cannot_be_a_base() {
            return Err(SpreadsheetError::Request(format!(
                "invalid API base {}",
                config.api_base
            )));
        }
        let credentials = shellexpand::tilde(&config.credentials_path);
        let tokens = TokenProvider::new(credentials.as_ref().into(), client.clone());
        Ok(Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            api_base,
            client,
            tokens,
        })
    }

    /// `<api_base>/<segments...>`, each segment percent-encoded as a path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn spreadsheet_url(&self) -> Url {
        self.endpoint(&[&self.spreadsheet_id])
    }

    fn batch_update_url(&self) -> Url {
        self.endpoint(&[&format!("{}:batchUpdate", self.spreadsheet_id)])
    }

    fn values_url(&self, range: &str) -> Url {
        self.endpoint(&[&self.spreadsheet_id, "values", range])
    }

    async fn sheet_id(&self, token: &str, title: &str) -> Result<Option<i64>, SpreadsheetError> {
        let mut url = self.spreadsheet_url();
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_error(&e))?;
        let meta: SpreadsheetMeta = check("read spreadsheet", resp)
            .await?
            .json()
            .await
            .map_err(|e| request_error(&e))?;
        Ok(find_sheet_id(&meta, title))
    }

    async fn add_sheet(&self, token: &str, title: &str) -> Result<i64, SpreadsheetError> {
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });
        let resp = self
            .client
            .post(self.batch_update_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(&e))?;
        let reply: BatchUpdateResponse = check("add sheet", resp)
            .await?
            .json()
            .await
            .map_err(|e| request_error(&e))?;
        let sheet_id = reply
            .replies
            .into_iter()
            .find_map(|r| r.add_sheet)
            .map_or(0, |s| s.properties.sheet_id);
        info!("created sheet tab {title} (id {sheet_id})");
        Ok(sheet_id)
    }

    async fn write_header(&self, token: &str, title: &str) -> Result<(), SpreadsheetError> {
        let range = a1_range(title, HEADER_CELLS);
        let mut url = self.values_url(&range);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let resp = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&json!({ "range": range, "values": [HEADER_ROW] }))
            .send()
            .await
            .map_err(|e| request_error(&e))?;
        check("write header", resp).await.map(drop)
    }

    async fn append_values(
        &self,
        token: &str,
        title: &str,
        sample: &Sample,
    ) -> Result<(), SpreadsheetError> {
        let range = a1_range(title, DATA_CELLS);
        let mut url = self.values_url(&format!("{range}:append"));
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let resp = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [sample_row(sample)] }))
            .send()
            .await
            .map_err(|e| request_error(&e))?;
        check("append row", resp).await.map(drop)
    }

    async fn center_columns(&self, token: &str, sheet_id: i64) -> Result<(), SpreadsheetError> {
        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startColumnIndex": 0,
                        "endColumnIndex": COLUMN_COUNT
                    },
                    "cell": { "userEnteredFormat": { "horizontalAlignment": "CENTER" } },
                    "fields": "userEnteredFormat.horizontalAlignment"
                }
            }]
        });
        let resp = self
            .client
            .post(self.batch_update_url())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(&e))?;
        check("format columns", resp).await.map(drop)
    }
}

#[async_trait]
impl SpreadsheetSink for GoogleSheetsClient {
    async fn append_row(&self, host: &HostIdentity, sample: &Sample) -> Result<(), SpreadsheetError> {
        let token = self.tokens.access_token().await?;
        let title = host.as_str();

        let sheet_id = match self.sheet_id(&token, title).await? {
            Some(id) => id,
            None => self.add_sheet(&token, title).await?,
        };

        self.write_header(&token, title).await?;
        self.append_values(&token, title, sample).await?;

        if let Err(e) = self.center_columns(&token, sheet_id).await {
            warn!("unable to center-align sheet {title}: {e}");
        }
        debug!("appended row to sheet {title}");
        Ok(())
    }
}
