use scraper::{ElementRef, Html, Selector};

/// Which class of content a scrape pulls out of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    Text,
    Images,
    Links,
    Tables,
}

/// One HTML table lifted to rows of cell strings. Rows may be ragged;
/// normalization pads them later.
pub type Grid = Vec<Vec<String>>;

/// Mode-homogeneous extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(Vec<String>),
    Images(Vec<String>),
    Links(Vec<String>),
    Tables(Vec<Grid>),
}

impl Extraction {
    pub fn mode(&self) -> ExtractionMode {
        match self {
            Extraction::Text(_) => ExtractionMode::Text,
            Extraction::Images(_) => ExtractionMode::Images,
            Extraction::Links(_) => ExtractionMode::Links,
            Extraction::Tables(_) => ExtractionMode::Tables,
        }
    }

    /// Number of extracted records.
    pub fn len(&self) -> usize {
        match self {
            Extraction::Text(items) | Extraction::Images(items) | Extraction::Links(items) => {
                items.len()
            }
            Extraction::Tables(grids) => grids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("could not parse document as html: {0}")]
    ParseFailure(String),
}

/// Run the extraction algorithm for `mode` over `html`.
///
/// Absence of matching elements is not an error; the result is simply
/// empty. Document order is preserved throughout.
pub fn extract(html: &str, mode: ExtractionMode) -> Result<Extraction, ExtractError> {
    let doc = Html::parse_document(html);
    match mode {
        ExtractionMode::Text => Ok(Extraction::Text(extract_paragraphs(&doc)?)),
        ExtractionMode::Images => Ok(Extraction::Images(extract_attr(&doc, "img", "src")?)),
        ExtractionMode::Links => Ok(Extraction::Links(extract_attr(&doc, "a", "href")?)),
        ExtractionMode::Tables => Ok(Extraction::Tables(extract_tables(&doc)?)),
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|err| ExtractError::ParseFailure(err.to_string()))
}

/// Text content of every paragraph, trimmed. Empty paragraphs are kept
/// as empty strings, matching pass-through behavior for round-trips.
fn extract_paragraphs(doc: &Html) -> Result<Vec<String>, ExtractError> {
    let sel = selector("p")?;
    Ok(doc.select(&sel).map(element_text).collect())
}

/// Collect `attr` from every `tag` element that declares it; elements
/// lacking the attribute are skipped, not nulled.
fn extract_attr(doc: &Html, tag: &str, attr: &str) -> Result<Vec<String>, ExtractError> {
    let sel = selector(tag)?;
    Ok(doc
        .select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(|value| value.to_string())
        .collect())
}

/// Lift every `<table>` into a `Grid`: row per `<tr>`, cell per
/// `<td>`/`<th>`, in document order. Header-only and ragged tables
/// still yield a grid.
fn extract_tables(doc: &Html) -> Result<Vec<Grid>, ExtractError> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td, th")?;

    let mut grids = Vec::new();
    for table in doc.select(&table_sel) {
        let mut grid: Grid = Vec::new();
        for row in table.select(&row_sel) {
            // Rows of a nested table belong to that table, not this one.
            if nearest_ancestor(row, "table").map(|t| t.id()) != Some(table.id()) {
                continue;
            }
            let cells: Vec<String> = row
                .select(&cell_sel)
                .filter(|cell| nearest_ancestor(*cell, "tr").map(|r| r.id()) == Some(row.id()))
                .map(element_text)
                .collect();
            grid.push(cells);
        }
        grids.push(grid);
    }
    Ok(grids)
}

fn nearest_ancestor<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == name)
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
