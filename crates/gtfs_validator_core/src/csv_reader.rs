//! Low-level CSV row streaming shared by the typed table loader and the raw
//! field-format validator. Header is row 1, first data row is row 2; a BOM
//! is stripped once from the first header cell; header cells are trimmed,
//! value cells are not.

use std::rc::Rc;

use csv::{ReaderBuilder, Trim};

#[derive(Debug, Clone)]
pub struct CsvParseError {
    pub file: String,
    pub message: String,
    pub line_index: Option<u64>,
    pub column_index: Option<u64>,
    pub char_index: Option<u64>,
    pub parsed_content: Option<String>,
}

/// One data row, aligned positionally to the shared header list. A cell
/// that the row did not have (a short, ragged row) is `None`; a cell the
/// row had but left blank is `Some("")`.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub headers: Rc<Vec<String>>,
    pub values: Vec<Option<String>>,
    pub row_number: u64,
}

impl CsvRow {
    pub fn get(&self, field_name: &str) -> Option<&str> {
        let index = self
            .headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(field_name))?;
        self.values.get(index).and_then(|value| value.as_deref())
    }
}

/// Streams `data` as a GTFS CSV table. Malformed rows are skipped and
/// reported as a `CsvParseError` rather than aborting the whole table.
pub fn read_rows(file_name: &str, data: &[u8]) -> (Vec<String>, Vec<CsvRow>, Vec<CsvParseError>) {
    let data = strip_utf8_bom(data);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(data);

    let headers: Vec<String> = match reader.headers() {
        Ok(record) => record.iter().map(|cell| cell.trim().to_string()).collect(),
        Err(_) => return (Vec::new(), Vec::new(), Vec::new()),
    };
    let headers_rc = Rc::new(headers.clone());

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let row_number = record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(rows.len() as u64 + 2);
                let values = (0..headers.len())
                    .map(|index| record.get(index).map(str::to_string))
                    .collect();
                rows.push(CsvRow {
                    headers: headers_rc.clone(),
                    values,
                    row_number,
                });
            }
            Err(error) => {
                errors.push(CsvParseError {
                    file: file_name.to_string(),
                    message: error.to_string(),
                    line_index: error.position().map(|position| position.line()),
                    column_index: None,
                    char_index: error.position().map(|position| position.byte()),
                    parsed_content: None,
                });
            }
        }
    }

    (headers, rows, errors)
}

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_row_yields_none_not_empty_string() {
        let data = b"a,b,c\n1,2\n";
        let (headers, rows, errors) = read_rows("t.txt", data);
        assert_eq!(headers, vec!["a", "b", "c"]);
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values, vec![Some("1".to_string()), Some("2".to_string()), None]);
    }

    #[test]
    fn strips_bom_from_header_only() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(b"a,b\n1,2\n");
        let (headers, _, _) = read_rows("t.txt", &data);
        assert_eq!(headers, vec!["a", "b"]);
    }

    #[test]
    fn blank_cell_is_present_but_empty() {
        let data = b"a,b\n1,\n";
        let (_, rows, _) = read_rows("t.txt", data);
        assert_eq!(rows[0].values[1], Some(String::new()));
    }

    #[test]
    fn row_numbers_start_at_two() {
        let data = b"a\n1\n2\n3\n";
        let (_, rows, _) = read_rows("t.txt", data);
        let numbers: Vec<u64> = rows.iter().map(|row| row.row_number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
    }
}
