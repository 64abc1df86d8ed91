//! Sheet stores: the Google Sheets API, and stdout for dry runs

use anyhow::{anyhow, Context};
use serde::Serialize;
use sigsheet::{ChartUpdate, SheetStore, WriteOperation};
use std::cell::RefCell;
use std::io::Write;
use tracing::debug;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValuesBatchUpdate<'a> {
    value_input_option: &'static str,
    data: &'a [WriteOperation],
}

impl<'a> ValuesBatchUpdate<'a> {
    /// Values are parsed as if typed by a user, so formulas get evaluated
    fn user_entered(data: &'a [WriteOperation]) -> Self {
        Self {
            value_input_option: "USER_ENTERED",
            data,
        }
    }
}

#[derive(Debug, Serialize)]
struct SpreadsheetBatchUpdate<'a> {
    requests: &'a [ChartUpdate],
}

/// Writes into one spreadsheet through the Sheets v4 REST API
pub struct GoogleSheetsStore {
    client: reqwest::blocking::Client,
    spreadsheet_id: String,
    token: String,
}

impl GoogleSheetsStore {
    pub fn new(client: reqwest::blocking::Client, spreadsheet_id: String, token: String) -> Self {
        Self {
            client,
            spreadsheet_id,
            token,
        }
    }

    fn post<B: Serialize>(&self, url: &str, body: &B) -> anyhow::Result<()> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .with_context(|| format!("Sending request to {}", url))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Unexpected status {} from {}: {}", status, url, body));
        }
        debug!(%status, url, "sheets request applied");
        Ok(())
    }
}

impl SheetStore for GoogleSheetsStore {
    fn write_values(&self, writes: &[WriteOperation]) -> sigsheet::Result<()> {
        let url = format!("{}/{}/values:batchUpdate", SHEETS_API, self.spreadsheet_id);
        self.post(&url, &ValuesBatchUpdate::user_entered(writes))
            .map_err(sigsheet::Error::store)
    }

    fn update_charts(&self, charts: &[ChartUpdate]) -> sigsheet::Result<()> {
        let url = format!("{}/{}:batchUpdate", SHEETS_API, self.spreadsheet_id);
        self.post(&url, &SpreadsheetBatchUpdate { requests: charts })
            .map_err(sigsheet::Error::store)
    }
}

/// Prints request bodies instead of sending them
pub struct JsonStore<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> JsonStore<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn print<B: Serialize>(&self, body: &B) -> anyhow::Result<()> {
        let mut out = self.out.borrow_mut();
        serde_json::to_writer_pretty(&mut *out, body)?;
        writeln!(out)?;
        Ok(())
    }
}

impl<W: Write> SheetStore for JsonStore<W> {
    fn write_values(&self, writes: &[WriteOperation]) -> sigsheet::Result<()> {
        self.print(&ValuesBatchUpdate::user_entered(writes))
            .map_err(sigsheet::Error::store)
    }

    fn update_charts(&self, charts: &[ChartUpdate]) -> sigsheet::Result<()> {
        self.print(&SpreadsheetBatchUpdate { requests: charts })
            .map_err(sigsheet::Error::store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sigsheet::{ChartType, FormulaCell, RangeDescriptor};

    #[test]
    fn test_json_store_output() {
        let store = JsonStore::new(Vec::new());
        let range = RangeDescriptor::parse("Daily!B26").unwrap();
        store
            .write_values(&[WriteOperation::row(range, vec![FormulaCell::Number(42)])])
            .unwrap();
        store
            .update_charts(&[
                ChartUpdate::from_row_boundary(5, 6, ChartType::Line, 0, &[1], 26).unwrap(),
            ])
            .unwrap();

        let text = String::from_utf8(store.into_inner()).unwrap();
        let bodies: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&text)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(bodies.len(), 2);
        assert_eq!(
            bodies[0],
            serde_json::json!({
                "valueInputOption": "USER_ENTERED",
                "data": [{"range": "Daily!B26", "majorDimension": "ROWS", "values": [[42]]}],
            })
        );
        assert_eq!(bodies[1]["requests"][0]["updateChartSpec"]["chartId"], 5);
    }
}
