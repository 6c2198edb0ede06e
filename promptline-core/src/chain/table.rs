use super::ChainError;
use std::fmt;
use std::fs;
use std::path::Path;

/// Cells wider than this are cut and end in `...`
const MAX_CELL_WIDTH: usize = 50;

/// The first rows of a comma-separated table, rendered as an aligned text
/// table with a row index column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    total_rows: usize,
}

impl TableSnapshot {
    /// Rows kept by [`head`](Self::head)
    pub const HEAD_ROWS: usize = 5;

    /// The first [`HEAD_ROWS`](Self::HEAD_ROWS) rows of `content`
    pub fn head(content: &str) -> Result<Self, ChainError> {
        Self::from_csv_str(content, Self::HEAD_ROWS)
    }

    /// Read a CSV file with a header row, keeping the first `rows` rows
    pub fn from_csv_path(path: impl AsRef<Path>, rows: usize) -> Result<Self, ChainError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ChainError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_str(&content, rows)
    }

    /// Parse CSV text with a header row, keeping the first `rows` rows.
    /// Every row is checked even when it is not kept.
    pub fn from_csv_str(content: &str, rows: usize) -> Result<Self, ChainError> {
        let mut lines = records(content).into_iter();

        let Some((_, header_line)) = lines.next() else {
            return Err(ChainError::EmptyTable);
        };
        let headers = split_record(&header_line);

        let mut kept = Vec::with_capacity(rows);
        let mut total_rows = 0;
        for (idx, line) in lines {
            let values = split_record(&line);
            if values.len() != headers.len() {
                return Err(ChainError::MalformedTable {
                    line: idx,
                    expected: headers.len(),
                    found: values.len(),
                });
            }
            if kept.len() < rows {
                kept.push(values);
            }
            total_rows += 1;
        }

        Ok(Self {
            headers,
            rows: kept,
            total_rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows kept in the snapshot
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Data rows in the source, kept or not
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }
}

impl fmt::Display for TableSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.rows.len().saturating_sub(1).to_string().len();

        let header_cells: Vec<String> = self.headers.iter().map(|h| clip(h)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| clip(cell)).collect())
            .collect();

        let widths: Vec<usize> = header_cells
            .iter()
            .enumerate()
            .map(|(col, header)| {
                body.iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:>index_width$}", "")?;
        for (header, width) in header_cells.iter().zip(&widths) {
            write!(f, "  {:>width$}", header, width = *width)?;
        }

        for (idx, row) in body.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", idx)?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {:>width$}", cell, width = *width)?;
            }
        }
        Ok(())
    }
}

fn clip(cell: &str) -> String {
    let cell = cell.replace('\n', "\\n");
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell;
    }
    let kept: String = cell.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{}...", kept)
}

/// Group physical lines into CSV records, each tagged with the 1-based line
/// it starts on. A line break inside a double-quoted field continues the
/// record. Blank lines between records are skipped.
fn records(content: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, line) in content.lines().enumerate() {
        let (start, record) = match pending.take() {
            Some((start, mut record)) => {
                record.push('\n');
                record.push_str(line);
                (start, record)
            }
            None if line.trim().is_empty() => continue,
            None => (idx + 1, line.to_string()),
        };
        // `""` escapes keep the count even, so an odd count means an open quote
        if record.matches('"').count() % 2 == 1 {
            pending = Some((start, record));
        } else {
            records.push((start, record));
        }
    }
    records.extend(pending);
    records
}

/// Split one CSV record. Double-quoted fields may contain commas, line
/// breaks and `""` escapes; unquoted fields are trimmed.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                quoted = true;
                was_quoted = true;
            }
            ',' if !quoted => {
                fields.push(finish_field(&mut field, was_quoted));
                was_quoted = false;
            }
            other => field.push(other),
        }
    }
    fields.push(finish_field(&mut field, was_quoted));
    fields
}

fn finish_field(field: &mut String, was_quoted: bool) -> String {
    let value = std::mem::take(field);
    if was_quoted {
        value.trim_end().to_string()
    } else {
        value.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTS: &str = "Product,Review
Queen Size Sheet Set,\"I ordered a king size set, and got a queen.\"
Waterproof Phone Pouch,I loved the waterproof sac
Luxury Air Mattress,This mattress had a small hole in the top
Pillows Insert,This is the best throw pillow fillers on Amazon
Milk Frother Handheld,I loved this product
L'Or Espresso Café,Je trouve le goût médiocre
";

    #[test]
    fn test_head_keeps_five_rows() {
        let table = TableSnapshot::head(PRODUCTS).unwrap();
        assert_eq!(table.headers(), ["Product", "Review"]);
        assert_eq!(table.rows().len(), 5);
        assert_eq!(table.total_rows(), 6);
        assert_eq!(table.rows()[0][1], "I ordered a king size set, and got a queen.");
    }

    #[test]
    fn test_render_aligns_columns_with_index() {
        let table = TableSnapshot::from_csv_str("name,qty\napple,3\nkiwi,12\n", 5).unwrap();
        assert_eq!(table.to_string(), "    name  qty\n0  apple    3\n1   kiwi   12");
    }

    #[test]
    fn test_long_cells_are_clipped() {
        let long = "x".repeat(80);
        let table = TableSnapshot::from_csv_str(&format!("col\n{}\n", long), 5).unwrap();
        let rendered = table.to_string();
        assert!(rendered.contains(&format!("{}...", "x".repeat(47))));
        assert!(!rendered.contains(&long));
    }

    #[test]
    fn test_quoted_fields_and_escapes() {
        assert_eq!(
            split_record(r#"a, "b, c" ,"say ""hi""""#),
            vec!["a", "b, c", r#"say "hi""#]
        );
        assert_eq!(split_record("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let csv = "Product,Review\n\nMug,\"Great mug.\n\nWould buy \"\"again\"\".\"\nKiwi,fine\nBad\n";
        match TableSnapshot::head(csv) {
            Err(ChainError::MalformedTable { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected MalformedTable, got {other:?}"),
        }

        let table = TableSnapshot::head("Product,Review\nMug,\"Great mug.\nWould buy again.\"\nKiwi,fine\n").unwrap();
        assert_eq!(table.total_rows(), 2);
        assert_eq!(table.rows()[0][1], "Great mug.\nWould buy again.");
        assert_eq!(table.rows()[1], ["Kiwi", "fine"]);
        assert!(table.to_string().contains("Great mug.\\nWould buy again."));
    }

    #[test]
    fn test_empty_and_ragged_tables() {
        assert!(matches!(TableSnapshot::head("\n\n"), Err(ChainError::EmptyTable)));
        assert!(matches!(
            TableSnapshot::head("a,b\n1,2\n3\n"),
            Err(ChainError::MalformedTable { line: 3, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TableSnapshot::from_csv_path(dir.path().join("missing.csv"), 5).unwrap_err();
        assert!(matches!(err, ChainError::Io { .. }));
    }
}
