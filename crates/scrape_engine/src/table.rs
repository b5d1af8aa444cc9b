use crate::extract::{Extraction, Grid};

/// Canonical tabular form shared by display and every export format.
///
/// Invariant: every row has exactly `columns.len()` cells. Ragged source
/// data is padded with empty strings during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Wrap each string as a single-cell row in a one-column table named
    /// `Data`, preserving order. This covers text, link and image-url
    /// extractions.
    pub fn from_strings(values: Vec<String>) -> Self {
        Self {
            columns: vec!["Data".to_string()],
            rows: values.into_iter().map(|value| vec![value]).collect(),
        }
    }

    /// Stack extracted grids into one table.
    ///
    /// Each grid's first row is its header; data rows wider than the header
    /// get generated `Column N` names. Columns are unioned by name across
    /// grids in first-seen order and missing cells are empty-filled. Rows
    /// keep grid order, then within-grid order. Empty input yields an empty
    /// table with no columns.
    pub fn from_grids(grids: Vec<Grid>) -> Self {
        let mut union_columns: Vec<String> = Vec::new();
        // Per grid: local column index -> union column index.
        let mut mappings: Vec<Vec<usize>> = Vec::new();

        for grid in &grids {
            let header = grid_header(grid);
            let mut mapping = Vec::with_capacity(header.len());
            for (local_idx, name) in header.iter().enumerate() {
                // Duplicate names within one grid map to distinct union
                // slots, matched by occurrence count.
                let occurrence = header[..local_idx].iter().filter(|n| *n == name).count();
                let union_idx = union_columns
                    .iter()
                    .enumerate()
                    .filter(|(_, existing)| *existing == name)
                    .map(|(idx, _)| idx)
                    .nth(occurrence);
                let union_idx = match union_idx {
                    Some(idx) => idx,
                    None => {
                        union_columns.push(name.clone());
                        union_columns.len() - 1
                    }
                };
                mapping.push(union_idx);
            }
            mappings.push(mapping);
        }

        let mut rows = Vec::new();
        for (grid, mapping) in grids.iter().zip(&mappings) {
            for source_row in grid.iter().skip(1) {
                let mut row = vec![String::new(); union_columns.len()];
                for (local_idx, cell) in source_row.iter().enumerate() {
                    if let Some(&union_idx) = mapping.get(local_idx) {
                        row[union_idx] = cell.clone();
                    }
                }
                rows.push(row);
            }
        }

        Self {
            columns: union_columns,
            rows,
        }
    }

    /// Normalize any extraction into the canonical table.
    pub fn from_extraction(extraction: &Extraction) -> Self {
        match extraction {
            Extraction::Text(items) | Extraction::Images(items) | Extraction::Links(items) => {
                Self::from_strings(items.clone())
            }
            Extraction::Tables(grids) => Self::from_grids(grids.clone()),
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A grid's header is its first row, padded with generated names out to
/// the widest row so extra cells keep a column.
fn grid_header(grid: &Grid) -> Vec<String> {
    let width = grid.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut header: Vec<String> = grid.first().cloned().unwrap_or_default();
    let mut idx = header.len();
    while idx < width {
        header.push(format!("Column {}", idx + 1));
        idx += 1;
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_become_single_data_column() {
        let table = DataTable::from_strings(vec!["Hello".into(), "World".into()]);
        assert_eq!(table.columns, vec!["Data"]);
        assert_eq!(table.rows, vec![vec!["Hello"], vec!["World"]]);
    }

    #[test]
    fn empty_strings_yield_zero_row_table() {
        let table = DataTable::from_strings(Vec::new());
        assert_eq!(table.columns, vec!["Data"]);
        assert!(table.is_empty());
    }

    #[test]
    fn empty_grids_yield_empty_table_without_columns() {
        let table = DataTable::from_grids(Vec::new());
        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn ragged_rows_are_padded() {
        let grid: Grid = vec![
            vec!["A".into(), "B".into()],
            vec!["1".into()],
            vec!["2".into(), "3".into(), "4".into()],
        ];
        let table = DataTable::from_grids(vec![grid]);
        assert_eq!(table.columns, vec!["A", "B", "Column 3"]);
        assert_eq!(
            table.rows,
            vec![vec!["1", "", ""], vec!["2", "3", "4"]]
        );
    }

    #[test]
    fn overlapping_headers_union_across_grids() {
        let first: Grid = vec![
            vec!["A".into(), "B".into()],
            vec!["1".into(), "2".into()],
        ];
        let second: Grid = vec![
            vec!["B".into(), "C".into()],
            vec!["3".into(), "4".into()],
        ];
        let table = DataTable::from_grids(vec![first, second]);
        assert_eq!(table.columns, vec!["A", "B", "C"]);
        assert_eq!(
            table.rows,
            vec![vec!["1", "2", ""], vec!["", "3", "4"]]
        );
    }

    #[test]
    fn duplicate_header_names_keep_distinct_columns() {
        let grid: Grid = vec![
            vec!["A".into(), "A".into()],
            vec!["1".into(), "2".into()],
        ];
        let table = DataTable::from_grids(vec![grid]);
        assert_eq!(table.columns, vec!["A", "A"]);
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn header_only_grid_contributes_columns_but_no_rows() {
        let grid: Grid = vec![vec!["A".into(), "B".into()]];
        let table = DataTable::from_grids(vec![grid]);
        assert_eq!(table.columns, vec!["A", "B"]);
        assert!(table.is_empty());
    }
}
