//! Google Sheets v4 REST client.

use std::path::Path;
use std::time::Duration;

use enquete_map::WorksheetSelection;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::auth::TokenProvider;
use super::credentials::ServiceAccountKey;
use crate::error::{Result, SheetError};
use crate::source::{SheetSource, resolve_title};
use crate::values::SheetValues;

/// Sheets API base URL.
const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads spreadsheets as a service account.
pub struct GoogleSheetsClient {
    client: Client,
    auth: TokenProvider,
    base_url: Url,
}

impl GoogleSheetsClient {
    pub fn new(key: ServiceAccountKey) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = Url::parse(SHEETS_API_URL).map_err(|err| SheetError::Url(err.to_string()))?;
        Ok(Self {
            client,
            auth: TokenProvider::new(key),
            base_url,
        })
    }

    /// Client authenticated with the service-account key at `path`.
    pub fn from_credentials_file(path: &Path) -> Result<Self> {
        let key = ServiceAccountKey::from_file(path)?;
        info!(client_email = %key.client_email, "using service account");
        Self::new(key)
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url).map_err(|err| SheetError::Url(err.to_string()))?;
        Ok(self)
    }

    fn spreadsheet_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SheetError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn metadata_url(&self, spreadsheet_id: &str) -> Result<Url> {
        let mut url = self.spreadsheet_url(&[spreadsheet_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(title,index)");
        Ok(url)
    }

    fn values_url(&self, spreadsheet_id: &str, title: &str) -> Result<Url> {
        let range = a1_sheet_range(title);
        let mut url = self.spreadsheet_url(&[spreadsheet_id, "values", &range])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let token = self.auth.access_token(&self.client)?;
        debug!(url = %url, "sheets API request");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/json")
            .header(
                USER_AGENT,
                format!("enquete-import/{}", env!("CARGO_PKG_VERSION")),
            )
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SheetError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json()?)
    }
}

impl SheetSource for GoogleSheetsClient {
    fn worksheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        let spreadsheet: Spreadsheet = self.get_json(self.metadata_url(spreadsheet_id)?)?;
        let mut sheets: Vec<SheetProperties> = spreadsheet
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .collect();
        sheets.sort_by_key(|sheet| sheet.index);
        Ok(sheets.into_iter().map(|sheet| sheet.title).collect())
    }

    fn read_values(
        &self,
        spreadsheet_id: &str,
        selection: &WorksheetSelection,
    ) -> Result<SheetValues> {
        let titles = self.worksheet_titles(spreadsheet_id)?;
        let title = resolve_title(spreadsheet_id, &titles, selection)?;
        let range: ValueRange = self.get_json(self.values_url(spreadsheet_id, &title)?)?;
        let grid: Vec<Vec<String>> = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        debug!(spreadsheet = spreadsheet_id, worksheet = %title, rows = grid.len(), "worksheet read");
        SheetValues::from_grid(title.as_str(), grid).ok_or_else(|| SheetError::EmptyWorksheet {
            spreadsheet: spreadsheet_id.to_string(),
            worksheet: title,
        })
    }
}

/// A1 range covering a whole worksheet.
fn a1_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleSheetsClient {
        GoogleSheetsClient::new(ServiceAccountKey {
            client_email: "importer@example.com".to_string(),
            private_key: String::new(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            project_id: None,
        })
        .unwrap()
    }

    #[test]
    fn test_a1_range_quotes_title() {
        assert_eq!(a1_sheet_range("回答"), "'回答'");
        assert_eq!(a1_sheet_range("Bob's"), "'Bob''s'");
    }

    #[test]
    fn test_values_url() {
        let url = client().values_url("abc123", "Form 1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/'Form%201'?majorDimension=ROWS&valueRenderOption=FORMATTED_VALUE"
        );
    }

    #[test]
    fn test_metadata_url() {
        let url = client().metadata_url("abc123").unwrap();
        assert_eq!(url.path(), "/v4/spreadsheets/abc123");
        assert_eq!(url.query(), Some("fields=sheets.properties%28title%2Cindex%29"));
    }

    #[test]
    fn test_base_url_override() {
        let client = client().with_base_url("http://127.0.0.1:8080/v4/spreadsheets/").unwrap();
        let url = client.metadata_url("abc123").unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/v4/spreadsheets/abc123");

        assert!(matches!(
            self::client().with_base_url("not a url"),
            Err(SheetError::Url(_))
        ));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(serde_json::json!("山田")), "山田");
        assert_eq!(cell_text(serde_json::json!(30)), "30");
        assert_eq!(cell_text(serde_json::Value::Null), "");
    }
}
