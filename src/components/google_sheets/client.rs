use super::models::{serial_to_datetime, CellValue, Grid};
use crate::components::google_calendar::token::TokenManager;
use crate::components::SheetSource;
use crate::error::{google_sheets_error, BotResult, Error};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const GRID_FIELDS: &str =
    "sheets.data.rowData.values(effectiveValue,effectiveFormat.numberFormat.type)";

/// Reads cells from one spreadsheet through the Sheets v4 API
#[derive(Clone)]
pub struct GoogleSheetsClient {
    spreadsheet_id: String,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleSheetsClient {
    pub fn new(spreadsheet_id: impl Into<String>, token_manager: TokenManager) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            token_manager,
            client: Client::new(),
        }
    }

    /// Fetch the cells of a range (sheet name, A1 notation or named range)
    async fn fetch_grid(&self, range: &str) -> BotResult<Grid> {
        let access_token = self.token_manager.access_token().await?;

        let mut url = Url::parse(&format!("{}/{}", SHEETS_API, self.spreadsheet_id))
            .map_err(|e| google_sheets_error(&format!("Failed to parse URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("ranges", range)
            .append_pair("includeGridData", "true")
            .append_pair("fields", GRID_FIELDS);

        debug!("Fetching range '{}' from spreadsheet {}", range, self.spreadsheet_id);

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| google_sheets_error(&format!("Failed to fetch range {}: {}", range, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            // The API answers an unknown range with 400 "Unable to parse range"
            if status == StatusCode::BAD_REQUEST && error_body.contains("Unable to parse range") {
                return Err(Error::NamedRangeNotFound(range.to_string()));
            }
            return Err(google_sheets_error(&format!(
                "Failed to fetch range {}: HTTP {} - {}",
                range, status, error_body
            )));
        }

        let spreadsheet: SpreadsheetResponse = response.json().await.map_err(|e| {
            google_sheets_error(&format!("Failed to parse spreadsheet response: {}", e))
        })?;

        Ok(spreadsheet.into_grid())
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn resolve_named_range(&self, name: &str) -> BotResult<CellValue> {
        let grid = self.fetch_grid(name).await?;
        let value = grid
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default();
        debug!("Named range {} = {:?}", name, value);
        Ok(value)
    }

    async fn read_sheet(&self, name: &str) -> BotResult<Grid> {
        self.fetch_grid(name).await
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SpreadsheetResponse {
    sheets: Vec<SheetData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SheetData {
    data: Vec<GridData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GridData {
    row_data: Vec<RowData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RowData {
    values: Vec<CellData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CellData {
    effective_value: Option<ExtendedValue>,
    effective_format: Option<CellFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExtendedValue {
    number_value: Option<f64>,
    string_value: Option<String>,
    bool_value: Option<bool>,
    error_value: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CellFormat {
    number_format: Option<NumberFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NumberFormat {
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl SpreadsheetResponse {
    fn into_grid(self) -> Grid {
        self.sheets
            .into_iter()
            .next()
            .and_then(|sheet| sheet.data.into_iter().next())
            .map(|data| {
                data.row_data
                    .into_iter()
                    .map(|row| row.values.into_iter().map(CellData::into_cell_value).collect())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl CellData {
    fn is_date_formatted(&self) -> bool {
        matches!(
            self.effective_format
                .as_ref()
                .and_then(|f| f.number_format.as_ref())
                .and_then(|n| n.kind.as_deref()),
            Some("DATE" | "TIME" | "DATE_TIME")
        )
    }

    fn into_cell_value(self) -> CellValue {
        let is_date = self.is_date_formatted();
        let Some(value) = self.effective_value else {
            return CellValue::Empty;
        };

        if let Some(n) = value.number_value {
            if is_date {
                return match serial_to_datetime(n) {
                    Some(dt) => CellValue::DateTime(dt),
                    None => CellValue::Number(n),
                };
            }
            return CellValue::Number(n);
        }
        if let Some(text) = value.string_value {
            return CellValue::Text(text);
        }
        if let Some(b) = value.bool_value {
            return CellValue::Bool(b);
        }
        if let Some(err) = value.error_value {
            warn!("Reading error cell as empty: {}", err);
        }
        CellValue::Empty
    }
}
