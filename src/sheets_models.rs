use serde::{Deserialize, Serialize};

/// Google Sheets `values.get` response.
/// Documentation: https://developers.google.com/sheets/api/reference/rest/v4/spreadsheets.values
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// A1 range actually returned (e.g. "Leads!A1:Z300")
    #[serde(default)]
    pub range: Option<String>,

    /// "ROWS" unless requested otherwise
    #[serde(default)]
    pub major_dimension: Option<String>,

    /// Cell grid; the first row is the header. Omitted by the API for empty sheets.
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

impl ValueRange {
    /// Builds a grid from a header and data rows.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut values = Vec::with_capacity(rows.len() + 1);
        values.push(header);
        values.extend(rows);

        Self {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values,
        }
    }

    /// Header row, if the sheet has one.
    pub fn header(&self) -> Option<&[String]> {
        self.values.first().map(Vec::as_slice)
    }

    /// Data rows paired with their grid index (header is index 0).
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.values
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| (index, row.as_slice()))
    }
}
