use super::Column;
use crate::model::TextItem;

/// Greedy single-pass clustering of items into columns by x.
///
/// Items are visited left to right; each joins the first column whose running
/// center lies within `tolerance` (inclusive), otherwise it opens a new column.
/// A lone marginal item (page number, footnote mark) ends up as its own column.
pub fn cluster_columns(items: &[TextItem], tolerance: f64) -> Vec<Column> {
    let mut sorted: Vec<&TextItem> = items.iter().collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut columns: Vec<Column> = Vec::new();
    for item in sorted {
        match columns
            .iter_mut()
            .find(|c| (item.x - c.center_x).abs() <= tolerance)
        {
            Some(column) => {
                column.items.push(item.clone());
                let n = column.items.len() as f64;
                column.center_x = (column.center_x * (n - 1.0) + item.x) / n;
            }
            None => columns.push(Column {
                index: 0,
                center_x: item.x,
                items: vec![item.clone()],
            }),
        }
    }

    columns.sort_by(|a, b| a.center_x.total_cmp(&b.center_x));
    for (i, column) in columns.iter_mut().enumerate() {
        column.index = i;
    }
    columns
}
