use pretty_assertions::assert_eq;
use scrape_engine::{
    DataTable, ExportError, ExportFormat, Exporter, PdfRenderer, WkhtmltopdfRenderer,
};

fn sample_table() -> DataTable {
    DataTable {
        columns: vec!["A".to_string(), "B".to_string()],
        rows: vec![
            vec!["1".to_string(), "2".to_string()],
            vec!["3".to_string(), "4".to_string()],
        ],
    }
}

#[test]
fn csv_export_matches_expected_layout() {
    let table = DataTable::from_strings(vec!["Hello".to_string(), "World".to_string()]);
    let bytes = Exporter::new().export(&table, ExportFormat::Csv).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "Data\nHello\nWorld\n");
}

#[test]
fn csv_round_trips_back_into_an_equivalent_table() {
    let table = sample_table();
    let bytes = Exporter::new().export(&table, ExportFormat::Csv).unwrap();

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let columns: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|record| record.unwrap().iter().map(|c| c.to_string()).collect())
        .collect();

    assert_eq!(DataTable { columns, rows }, table);
}

#[test]
fn csv_quotes_cells_containing_delimiters() {
    let table = DataTable {
        columns: vec!["Data".to_string()],
        rows: vec![vec!["a,b".to_string()]],
    };
    let bytes = Exporter::new().export(&table, ExportFormat::Csv).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "Data\n\"a,b\"\n");
}

#[test]
fn json_export_is_an_array_of_objects_in_column_order() {
    let table = sample_table();
    let bytes = Exporter::new().export(&table, ExportFormat::Json).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"[{"A":"1","B":"2"},{"A":"3","B":"4"}]"#
    );
}

#[test]
fn json_round_trips_cell_values() {
    let table = sample_table();
    let bytes = Exporter::new().export(&table, ExportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed[1]["B"], "4");
}

#[test]
fn export_is_idempotent_for_unchanged_table() {
    let table = sample_table();
    let exporter = Exporter::new();
    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let first = exporter.export(&table, format).unwrap();
        let second = exporter.export(&table, format).unwrap();
        assert_eq!(first, second, "{format} export should be deterministic");
    }
}

#[test]
fn empty_table_exports_header_only_csv() {
    let table = DataTable::from_strings(Vec::new());
    let bytes = Exporter::new().export(&table, ExportFormat::Csv).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "Data\n");
}

#[test]
fn empty_table_without_columns_exports_empty_artifacts() {
    let table = DataTable::from_grids(Vec::new());
    let exporter = Exporter::new();
    assert!(exporter.export(&table, ExportFormat::Csv).unwrap().is_empty());
    let json = exporter.export(&table, ExportFormat::Json).unwrap();
    assert_eq!(String::from_utf8(json).unwrap(), "[]");
}

#[test]
fn xlsx_export_produces_a_workbook() {
    let table = sample_table();
    let bytes = Exporter::new().export(&table, ExportFormat::Excel).unwrap();
    // XLSX is a zip container; check the magic instead of unpacking.
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn xlsx_export_rejects_a_table_wider_than_the_sheet() {
    // Past u16::MAX columns a cast would wrap onto earlier cells.
    let columns: Vec<String> = (0..70_000).map(|i| format!("C{i}")).collect();
    let table = DataTable {
        columns,
        rows: Vec::new(),
    };
    let err = Exporter::new()
        .export(&table, ExportFormat::Excel)
        .unwrap_err();
    assert!(matches!(err, ExportError::SerializationFailure(_)));
}

struct StubRenderer;

impl PdfRenderer for StubRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        Ok(html.as_bytes().to_vec())
    }
}

#[test]
fn pdf_export_feeds_rendered_table_html_to_the_renderer() {
    let table = sample_table();
    let exporter = Exporter::with_pdf_renderer(Box::new(StubRenderer));
    let bytes = exporter.export(&table, ExportFormat::Pdf).unwrap();
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("<th>A</th>"));
    assert!(html.contains("<td>4</td>"));
}

#[test]
fn missing_renderer_binary_is_a_distinct_error() {
    let renderer = WkhtmltopdfRenderer::with_binary("/definitely/not/wkhtmltopdf");
    let exporter = Exporter::with_pdf_renderer(Box::new(renderer));
    let err = exporter
        .export(&sample_table(), ExportFormat::Pdf)
        .unwrap_err();
    assert!(matches!(err, ExportError::RendererUnavailable(_)));
}
