// src/cloud_handler.rs
use google_sheets4::api::Spreadsheet;
use google_sheets4::{hyper, hyper_rustls, Sheets};
use serde_json::Value;
use std::future::Future;
use tracing::debug;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use crate::error::LoadError;
use crate::secrets::{SecretStore, SERVICE_ACCOUNT_ENTRY};

type SheetsHub = Sheets<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

/// Anything that can hand back the full contents of one worksheet as a
/// row-major grid of strings.
pub trait SheetSource {
    fn fetch_grid(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, LoadError>> + Send;
}

/// Google Sheets API transport authenticated with a service account.
pub struct CloudHandler {
    secrets: SecretStore,
}

impl CloudHandler {
    pub fn new(secrets: SecretStore) -> Self {
        CloudHandler { secrets }
    }

    async fn authenticate(&self) -> Result<SheetsHub, LoadError> {
        // The payload shape is only checked here, never by the secret store.
        let payload = self.secrets.entry(SERVICE_ACCOUNT_ENTRY)?;
        let key: ServiceAccountKey = serde_json::from_value(payload).map_err(|e| {
            LoadError::Auth(format!(
                "`{}` is not a valid service account key: {}",
                SERVICE_ACCOUNT_ENTRY, e
            ))
        })?;
        debug!(
            client_email = %key.client_email,
            secrets = %self.secrets.path().display(),
            "authenticating service account"
        );

        let auth = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| LoadError::Auth(format!("service account rejected: {}", e)))?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_only()
            .enable_http1()
            .build();

        Ok(Sheets::new(hyper::Client::builder().build(connector), auth))
    }
}

impl SheetSource for CloudHandler {
    async fn fetch_grid(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> Result<Vec<Vec<String>>, LoadError> {
        let hub = self.authenticate().await?;
        let subject = format!("spreadsheet `{}`", spreadsheet_id);

        // Only sheet titles are needed to resolve the worksheet.
        let (_, spreadsheet) = hub
            .spreadsheets()
            .get(spreadsheet_id)
            .param("fields", "sheets.properties.title")
            .doit()
            .await
            .map_err(|e| classify_api_error(e, &subject))?;
        find_worksheet(&spreadsheet, worksheet)?;

        let range = sheet_range(worksheet);
        let (_, value_range) = hub
            .spreadsheets()
            .values_get(spreadsheet_id, &range)
            .doit()
            .await
            .map_err(|e| classify_api_error(e, &format!("worksheet `{}`", worksheet)))?;

        let grid: Vec<Vec<String>> = value_range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        debug!(rows = grid.len(), %range, "fetched worksheet values");

        Ok(grid)
    }
}

/// A1 range covering a whole worksheet. Titles are always quoted so spaces
/// and accents survive; embedded quotes are doubled.
fn sheet_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn find_worksheet(spreadsheet: &Spreadsheet, worksheet: &str) -> Result<(), LoadError> {
    let titles: Vec<&str> = spreadsheet
        .sheets
        .iter()
        .flatten()
        .filter_map(|sheet| sheet.properties.as_ref())
        .filter_map(|properties| properties.title.as_deref())
        .collect();

    if titles.iter().any(|title| *title == worksheet) {
        return Ok(());
    }

    Err(LoadError::NotFound(format!(
        "worksheet `{}` not found (available: {})",
        worksheet,
        titles.join(", ")
    )))
}

fn classify_api_error(err: google_sheets4::Error, subject: &str) -> LoadError {
    match err {
        google_sheets4::Error::MissingToken(e) => {
            LoadError::Auth(format!("could not obtain an access token: {}", e))
        }
        google_sheets4::Error::BadRequest(body) => classify_error_body(&body, subject),
        other => LoadError::Transport(format!("request for {} failed: {}", subject, other)),
    }
}

/// Maps a Google API error payload (`{"error": {"code": .., "message": ..}}`)
/// onto the load error kinds.
fn classify_error_body(body: &Value, subject: &str) -> LoadError {
    let code = body["error"]["code"].as_i64().unwrap_or_default();
    let message = body["error"]["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());

    match code {
        404 => LoadError::NotFound(format!("{} not found: {}", subject, message)),
        401 | 403 => LoadError::Auth(format!("access to {} denied: {}", subject, message)),
        _ => LoadError::Transport(format!(
            "request for {} failed ({}): {}",
            subject, code, message
        )),
    }
}
