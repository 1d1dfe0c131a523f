use serde::Deserialize;
use url::Url;

use crate::ReportsError;

#[derive(Debug, Default, Deserialize)]
struct ReportListing {
    #[serde(default)]
    files: Option<Vec<String>>,
}

/// Fetches the names of previously generated reports.
pub async fn fetch_report_names(
    client: &reqwest::Client,
    url: &Url,
) -> Result<Vec<String>, ReportsError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(ReportsError::Request)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReportsError::HttpStatus(status.as_u16()));
    }

    let text = response.text().await.map_err(ReportsError::Request)?;
    let listing: ReportListing = serde_json::from_str(&text)?;
    Ok(listing.files.unwrap_or_default())
}
