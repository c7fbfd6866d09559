//! Litter Index Blocks CSV input.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use litter_core::{BlockId, Error, Result};

/// One row of the blocks CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LitterBlock {
    /// Value of the id column.
    pub block_id: BlockId,
    /// Value of the address column, e.g. `"1200 MARKET ST"`.
    pub hundred_block: String,
    /// Every field of the row, in header order.
    pub record: Vec<String>,
}

/// The blocks CSV: headers plus rows, with every column preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTable {
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// Rows in file order.
    pub rows: Vec<LitterBlock>,
}

fn column_index(headers: &[String], column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| Error::MissingColumn {
            column: column.to_string(),
        })
}

impl BlockTable {
    /// Reads the blocks CSV at `path`.
    pub fn read(path: &Path, id_column: &str, address_column: &str) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("cannot open {}: {e}", path.display()),
            ))
        })?;
        let table = Self::from_reader(file, id_column, address_column)?;
        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "Read blocks CSV"
        );
        Ok(table)
    }

    /// Reads a blocks CSV from any reader.
    ///
    /// Block ids name the image folders, so a repeated id is an error.
    pub fn from_reader<R: io::Read>(reader: R, id_column: &str, address_column: &str) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let id_index = column_index(&headers, id_column)?;
        let address_index = column_index(&headers, address_column)?;

        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let record: Vec<String> = record.iter().map(str::to_string).collect();
            // Header is line 1.
            let line = index + 2;

            let raw_id = record.get(id_index).map(String::as_str).unwrap_or_default();
            let block_id = BlockId::parse(raw_id).map_err(|e| {
                Error::validation_field(id_column, format!("line {line}: {e}"))
            })?;
            if !seen.insert(block_id.clone()) {
                return Err(Error::validation_field(
                    id_column,
                    format!("line {line}: duplicate block id {block_id}"),
                ));
            }
            let hundred_block = record
                .get(address_index)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();

            rows.push(LitterBlock {
                block_id,
                hundred_block,
                record,
            });
        }

        Ok(Self { headers, rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only the first `limit` rows.
    pub fn truncate(&mut self, limit: Option<usize>) {
        if let Some(limit) = limit {
            self.rows.truncate(limit);
        }
    }

    /// Drops rows whose address (case-insensitive) appeared earlier.
    ///
    /// Returns the number of rows removed.
    pub fn dedupe_addresses(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::new();
        self.rows
            .retain(|block| seen.insert(block.hundred_block.to_uppercase()));
        before - self.rows.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CSV: &str = "\
OBJECTID,LR_HUNDRED_BLOCK,LITTER_SCORE
1,1200 MARKET ST,2.5
2, 100 S BROAD ST ,1.0
3,1200 market st,3.0
";

    fn table() -> BlockTable {
        BlockTable::from_reader(CSV.as_bytes(), "OBJECTID", "LR_HUNDRED_BLOCK").unwrap()
    }

    #[test]
    fn test_reads_all_columns() {
        let table = table();
        assert_eq!(table.headers, vec!["OBJECTID", "LR_HUNDRED_BLOCK", "LITTER_SCORE"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].block_id.as_str(), "1");
        assert_eq!(table.rows[0].record[2], "2.5");
    }

    #[test]
    fn test_address_is_trimmed_but_record_is_not() {
        let table = table();
        assert_eq!(table.rows[1].hundred_block, "100 S BROAD ST");
        assert_eq!(table.rows[1].record[1], " 100 S BROAD ST ");
    }

    #[test]
    fn test_missing_column() {
        let err = BlockTable::from_reader(CSV.as_bytes(), "ID", "LR_HUNDRED_BLOCK").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column } if column == "ID"));
    }

    #[test]
    fn test_invalid_block_id_reports_line() {
        let csv = "OBJECTID,LR_HUNDRED_BLOCK\n1,A ST\n,B ST\n";
        let err = BlockTable::from_reader(csv.as_bytes(), "OBJECTID", "LR_HUNDRED_BLOCK")
            .unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_duplicate_block_id_is_rejected() {
        let csv = "OBJECTID,LR_HUNDRED_BLOCK\n1,A ST\n2,B ST\n1,C ST\n";
        let err = BlockTable::from_reader(csv.as_bytes(), "OBJECTID", "LR_HUNDRED_BLOCK")
            .unwrap_err();
        let Error::Validation { field, message } = err else {
            unreachable!("Expected Validation error");
        };
        assert_eq!(field.as_deref(), Some("OBJECTID"));
        assert!(message.contains("line 4"));
        assert!(message.contains("duplicate block id 1"));
    }

    #[test]
    fn test_truncate() {
        let mut table = table();
        table.truncate(Some(2));
        assert_eq!(table.len(), 2);
        table.truncate(None);
        assert_eq!(table.len(), 2);
        table.truncate(Some(0));
        assert!(table.is_empty());
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let mut table = table();
        assert_eq!(table.dedupe_addresses(), 1);
        let ids: Vec<&str> = table.rows.iter().map(|b| b.block_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_headers_only() {
        let table =
            BlockTable::from_reader("OBJECTID,LR_HUNDRED_BLOCK\n".as_bytes(), "OBJECTID", "LR_HUNDRED_BLOCK")
                .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let err = BlockTable::read(Path::new("/nonexistent/blocks.csv"), "OBJECTID", "LR_HUNDRED_BLOCK")
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/blocks.csv"));
    }
}
