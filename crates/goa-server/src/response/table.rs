//! Paged table view of a wrapped response
//!
//! Column definitions come from the row model's field metadata; rows are the
//! typed cell values per record. Flat identifier/URL lists have no tabular
//! shape and decline.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::response::payload::{RecordResponse, ResponseData};
use crate::response::records::{CellType, FieldSpec, RowModel};

/// One column definition in a table view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub id: String,
    pub header: String,
    pub description: String,
    #[serde(rename = "type")]
    pub cell_type: CellType,
}

impl From<&FieldSpec> for TableColumn {
    fn from(field: &FieldSpec) -> Self {
        Self {
            id: field.id.to_string(),
            header: field.header.to_string(),
            description: field.description.to_string(),
            cell_type: field.cell_type,
        }
    }
}

/// Table-shaped rendering of a response page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub data: Vec<Vec<Value>>,
}

impl TableView {
    /// Build a table view from a wrapped response
    ///
    /// # Errors
    ///
    /// `NotImplemented` when the payload has no tabular shape (identifier
    /// and URL lists).
    pub fn from_response(
        response: &RecordResponse,
        id: Option<String>,
        title: Option<String>,
    ) -> Result<Self, AppError> {
        let (columns, data) = match &response.data {
            ResponseData::Tracks(v) => tabulate(v),
            ResponseData::Intervals(v) => tabulate(v),
            ResponseData::Variants(v) => tabulate(v),
            ResponseData::Associations(v) => tabulate(v),
            ResponseData::Counts(m) => (
                vec![
                    TableColumn {
                        id: "category".to_string(),
                        header: "Category".to_string(),
                        description: "Count category".to_string(),
                        cell_type: CellType::Text,
                    },
                    TableColumn {
                        id: "count".to_string(),
                        header: "Count".to_string(),
                        description: "Number of matching records".to_string(),
                        cell_type: CellType::Integer,
                    },
                ],
                m.iter().map(|(k, v)| vec![json!(k), json!(v)]).collect(),
            ),
            other => {
                return Err(AppError::NotImplemented(format!(
                    "table view is not available for {} responses",
                    other.kind()
                )))
            },
        };

        Ok(Self {
            id,
            title,
            columns,
            data,
        })
    }
}

fn tabulate<T: RowModel>(records: &[T]) -> (Vec<TableColumn>, Vec<Vec<Value>>) {
    let columns = T::fields().iter().map(TableColumn::from).collect();
    let data = records.iter().map(RowModel::cells).collect();
    (columns, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::payload::RequestEcho;
    use crate::response::records::TrackRecord;
    use serde_json::Map;

    fn response(data: ResponseData) -> RecordResponse {
        RecordResponse::new(
            data,
            RequestEcho {
                request_id: "req-1".to_string(),
                endpoint: "/metadata/tracks".to_string(),
                parameters: Map::new(),
            },
        )
    }

    #[test]
    fn test_table_columns_from_field_metadata() {
        let record = TrackRecord {
            track_id: "NGEN01".to_string(),
            name: "Track".to_string(),
            description: None,
            genome_build: "GRCh38".to_string(),
            feature_type: None,
            data_source: None,
            data_category: None,
            url: None,
        };
        let table = TableView::from_response(
            &response(ResponseData::Tracks(vec![record])),
            Some("tracks".to_string()),
            Some("Track Metadata".to_string()),
        )
        .unwrap();

        assert_eq!(table.columns.len(), 8);
        assert_eq!(table.columns[0].id, "track_id");
        assert_eq!(table.columns[0].header, "Track ID");
        assert_eq!(table.data.len(), 1);
        assert_eq!(table.data[0][0], json!("NGEN01"));
        // missing optional fields come through as explicit nulls
        assert_eq!(table.data[0][2], Value::Null);
    }

    #[test]
    fn test_table_declines_for_id_lists() {
        let err = TableView::from_response(
            &response(ResponseData::Ids(vec!["NGEN01".to_string()])),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotImplemented(_)));
    }

    #[test]
    fn test_counts_table() {
        let mut counts = std::collections::BTreeMap::new();
        counts.insert("enhancer".to_string(), 7u64);
        let table =
            TableView::from_response(&response(ResponseData::Counts(counts)), None, None).unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.data, vec![vec![json!("enhancer"), json!(7)]]);
    }

    #[test]
    fn test_table_serialization_shape() {
        let table = TableView {
            id: Some("t1".to_string()),
            title: None,
            columns: vec![],
            data: vec![],
        };
        let value = serde_json::to_value(&table).unwrap();
        assert!(value.get("columns").is_some());
        assert!(value.get("title").is_none());
    }
}
