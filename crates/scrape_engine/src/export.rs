use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use scrape_logging::scrape_debug;
use serde_json::{Map, Value};

use crate::table::DataTable;

/// Serialization target for a normalized table. Orthogonal to the
/// extraction mode; any table can be exported in any format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Json,
    Pdf,
}

impl ExportFormat {
    /// Download artifact name for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "data.csv",
            ExportFormat::Excel => "data.xlsx",
            ExportFormat::Json => "data.json",
            ExportFormat::Pdf => "data.pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialization failed: {0}")]
    SerializationFailure(String),
    #[error("pdf renderer unavailable: {0}")]
    RendererUnavailable(String),
}

/// Converts a rendered HTML document into PDF bytes. The production
/// implementation invokes an external renderer; tests substitute a stub.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, html: &str) -> Result<Vec<u8>, ExportError>;
}

/// Shells out to `wkhtmltopdf`, streaming HTML on stdin and reading the
/// PDF from stdout. A missing binary or a hung render surfaces as
/// `RendererUnavailable` so callers can distinguish it from bad data.
pub struct WkhtmltopdfRenderer {
    binary: PathBuf,
    timeout: Duration,
}

impl WkhtmltopdfRenderer {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("wkhtmltopdf"),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::new()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for WkhtmltopdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfRenderer for WkhtmltopdfRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let mut child = Command::new(&self.binary)
            .args(["--quiet", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    ExportError::RendererUnavailable(format!(
                        "{} not found",
                        self.binary.display()
                    ))
                } else {
                    ExportError::RendererUnavailable(err.to_string())
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .map_err(|err| ExportError::RendererUnavailable(err.to_string()))?;
        }

        // Drain stdout on a separate thread so a large PDF cannot
        // deadlock against the exit poll below.
        let stdout = child.stdout.take();
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout {
                let _ = out.read_to_end(&mut buf);
            }
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ExportError::RendererUnavailable(
                            "renderer timed out".to_string(),
                        ));
                    }
                    thread::sleep(Duration::from_millis(25));
                }
                Err(err) => {
                    return Err(ExportError::RendererUnavailable(err.to_string()));
                }
            }
        };

        let bytes = reader.join().unwrap_or_default();
        if !status.success() {
            return Err(ExportError::RendererUnavailable(format!(
                "renderer exited with {status}"
            )));
        }
        Ok(bytes)
    }
}

/// Serializes a `DataTable` into export byte streams.
pub struct Exporter {
    pdf_renderer: Box<dyn PdfRenderer>,
}

impl Exporter {
    pub fn new() -> Self {
        Self {
            pdf_renderer: Box::new(WkhtmltopdfRenderer::new()),
        }
    }

    pub fn with_pdf_renderer(pdf_renderer: Box<dyn PdfRenderer>) -> Self {
        Self { pdf_renderer }
    }

    /// Serialize `table` into `format`. Deterministic for an unchanged
    /// table: the same input yields byte-identical output.
    pub fn export(&self, table: &DataTable, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        scrape_debug!(
            "export format={} columns={} rows={}",
            format,
            table.column_count(),
            table.row_count()
        );
        match format {
            ExportFormat::Csv => to_csv(table),
            ExportFormat::Excel => to_xlsx(table),
            ExportFormat::Json => to_json(table),
            ExportFormat::Pdf => self.pdf_renderer.render(&render_html_table(table)),
        }
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

/// RFC-4180-style CSV: header row, `\n` terminator, no index column.
fn to_csv(table: &DataTable) -> Result<Vec<u8>, ExportError> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .map_err(|err| ExportError::SerializationFailure(err.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|err| ExportError::SerializationFailure(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::SerializationFailure(err.to_string()))
}

/// Array of objects, keys in column order, all values strings.
fn to_json(table: &DataTable) -> Result<Vec<u8>, ExportError> {
    let records: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for (column, cell) in table.columns.iter().zip(row) {
                object.insert(column.clone(), Value::String(cell.clone()));
            }
            Value::Object(object)
        })
        .collect();
    serde_json::to_vec(&records)
        .map_err(|err| ExportError::SerializationFailure(err.to_string()))
}

/// Single-sheet workbook: header row then data rows, no index column.
fn to_xlsx(table: &DataTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_string(0, sheet_col(col)?, name.as_str())
            .map_err(|err| ExportError::SerializationFailure(err.to_string()))?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let sheet_row = sheet_row(row_idx)?;
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string(sheet_row, sheet_col(col)?, cell.as_str())
                .map_err(|err| ExportError::SerializationFailure(err.to_string()))?;
        }
    }
    workbook
        .save_to_buffer()
        .map_err(|err| ExportError::SerializationFailure(err.to_string()))
}

// Sheet indices are narrower than usize; an out-of-range table must
// fail instead of wrapping onto earlier cells.
fn sheet_col(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| {
        ExportError::SerializationFailure(format!("column {index} is out of sheet range"))
    })
}

fn sheet_row(index: usize) -> Result<u32, ExportError> {
    u32::try_from(index)
        .ok()
        .and_then(|row| row.checked_add(1))
        .ok_or_else(|| ExportError::SerializationFailure(format!("row {index} is out of sheet range")))
}

/// Render the table as a minimal standalone HTML document, the input to
/// the PDF renderer.
pub fn render_html_table(table: &DataTable) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n<table border=\"1\">\n",
    );
    html.push_str("<thead><tr>");
    for column in &table.columns {
        html.push_str("<th>");
        html.push_str(&escape_html(column));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape_html(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
