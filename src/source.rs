//! Where raw codes come from: spreadsheet cells or typed lines.

use std::fmt;
use std::io::BufRead;
use std::ops::RangeInclusive;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::config::SheetConfig;
use crate::error::{Error, Result};

/// Where a row came from, for log lines and the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowId {
    /// 1-based spreadsheet row.
    Sheet(u32),
    /// 1-based input line.
    Line(usize),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Sheet(r) => write!(f, "row {r}"),
            RowId::Line(n) => write!(f, "line {n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub id: RowId,
    pub code: String,
    pub label: String,
}

/// 0-based index of a column letter: `A` is 0, `Z` 25, `AA` 26.
pub fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut n = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        n = n * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Some(n - 1)
}

/// Cell text of a worksheet, indexed from row 1 / column 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Open a workbook sheet, or a CSV file (the sheet name is then ignored).
    pub fn open(path: &Path, sheet: &str) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::source_unavailable(path, "file not found"));
        }
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            Self::open_csv(path)
        } else {
            Self::open_workbook(path, sheet)
        }
    }

    fn open_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::source_unavailable(path, e))?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::source_unavailable(path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    fn open_workbook(path: &Path, sheet: &str) -> Result<Self> {
        let mut workbook = open_workbook_auto(path).map_err(|e| Error::source_unavailable(path, e))?;
        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| Error::source_unavailable(path, format!("sheet {sheet:?}: {e}")))?;

        // the used range may not start at A1
        let (row0, col0) = range.start().unwrap_or((0, 0));
        let mut rows = vec![Vec::new(); row0 as usize];
        for cells in range.rows() {
            let mut row = vec![String::new(); col0 as usize];
            row.extend(cells.iter().map(cell_text));
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn cell(&self, column: usize, row: u32) -> &str {
        row.checked_sub(1)
            .and_then(|r| self.rows.get(r as usize))
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

// Whole-number floats are how spreadsheets hand back long numeric codes.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Resolved column indices of a [`SheetConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetColumns {
    pub code: usize,
    pub fallback: Vec<usize>,
    pub label: usize,
}

impl SheetColumns {
    pub fn from_config(config: &SheetConfig) -> Result<Self> {
        let index = |letters: &str| {
            column_index(letters).ok_or_else(|| Error::config(format!("{letters:?} is not a column letter")))
        };
        Ok(Self {
            code: index(&config.code_column)?,
            fallback: config
                .fallback_columns
                .iter()
                .map(|c| index(c))
                .collect::<Result<_>>()?,
            label: index(&config.label_column)?,
        })
    }
}

/// Rows of a spreadsheet within an inclusive row range.
///
/// The code is the primary column, or the fallback columns joined when the
/// primary one is blank. Rows without any code are left out.
pub struct SheetSource {
    grid: Grid,
    columns: SheetColumns,
    rows: RangeInclusive<u32>,
}

impl SheetSource {
    pub fn new(grid: Grid, columns: SheetColumns, rows: RangeInclusive<u32>) -> Self {
        Self { grid, columns, rows }
    }

    pub fn open(config: &SheetConfig) -> Result<Self> {
        let grid = Grid::open(&config.path, &config.sheet)?;
        let columns = SheetColumns::from_config(config)?;
        tracing::debug!(
            "opened {} sheet {:?}, rows {}..={}",
            config.path.display(),
            config.sheet,
            config.start_row,
            config.end_row
        );
        Ok(Self::new(grid, columns, config.start_row..=config.end_row))
    }

    fn row(&self, r: u32) -> SourceRow {
        let primary = self.grid.cell(self.columns.code, r).trim();
        let code = if primary.is_empty() {
            self.columns
                .fallback
                .iter()
                .map(|&c| self.grid.cell(c, r).trim())
                .collect::<String>()
        } else {
            primary.to_string()
        };
        let label = self.grid.cell(self.columns.label, r).trim().to_string();
        SourceRow { id: RowId::Sheet(r), code, label }
    }
}

impl Iterator for SheetSource {
    type Item = Result<SourceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(r) = self.rows.next() {
            let row = self.row(r);
            if row.code.is_empty() {
                tracing::debug!("{}: no code, skipped", row.id);
                continue;
            }
            return Some(Ok(row));
        }
        None
    }
}

/// Splits one typed line into `(code, label)`.
pub trait RowParser {
    fn parse(&self, line: &str) -> (String, String);
}

/// Code and label separated by a tab, or else by the first run of two or
/// more spaces. A line without a separator is all code.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedLineParser;

impl RowParser for DelimitedLineParser {
    fn parse(&self, line: &str) -> (String, String) {
        let line = line.trim();
        let split = if line.contains('\t') {
            line.split_once('\t')
        } else {
            line.split_once("  ")
        };
        match split {
            Some((code, label)) => (code.trim().to_string(), label.trim().to_string()),
            None => (line.to_string(), String::new()),
        }
    }
}

/// Rows typed or pasted line by line. Ends at EOF or the first blank line.
pub struct LineSource<R, P> {
    reader: R,
    parser: P,
    line_no: usize,
    done: bool,
}

impl<R: BufRead, P: RowParser> LineSource<R, P> {
    pub fn new(reader: R, parser: P) -> Self {
        Self { reader, parser, line_no: 0, done: false }
    }
}

impl<R: BufRead, P: RowParser> Iterator for LineSource<R, P> {
    type Item = Result<SourceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        // bytes, not `read_line`: one badly encoded line must not end the batch
        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf);
        let line = String::from_utf8_lossy(&buf);
        match read {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) if line.trim().is_empty() => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                let (code, label) = self.parser.parse(&line);
                Some(Ok(SourceRow { id: RowId::Line(self.line_no), code, label }))
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::source_unavailable("<stdin>", e)))
            }
        }
    }
}
