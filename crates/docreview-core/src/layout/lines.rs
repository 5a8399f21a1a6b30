use super::{upper_median, Line};
use crate::config::IndexConfig;
use crate::model::TextItem;

/// Group the items of one column into lines.
///
/// Items are walked by descending y. A line starts at its first item's y;
/// following items join while they stay within `line_tolerance` of that
/// reference (inclusive). Lines come out in walk order, largest y first;
/// the page builder re-sorts them top to bottom.
pub fn group_lines(items: &[TextItem], column_index: usize, config: &IndexConfig) -> Vec<Line> {
    let mut sorted: Vec<&TextItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut groups: Vec<Vec<&TextItem>> = Vec::new();
    let mut current: Vec<&TextItem> = Vec::new();
    let mut reference_y: Option<f64> = None;

    for item in sorted {
        match reference_y {
            Some(y) if (item.y - y).abs() > config.line_tolerance => {
                groups.push(std::mem::take(&mut current));
                current.push(item);
                reference_y = Some(item.y);
            }
            Some(_) => current.push(item),
            None => {
                current.push(item);
                reference_y = Some(item.y);
            }
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(i, members)| summarize(i, &members, column_index, config.fallback_line_height))
        .collect()
}

fn summarize(index: usize, members: &[&TextItem], column_index: usize, fallback: f64) -> Line {
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for item in members {
        y_min = y_min.min(item.y);
        y_max = y_max.max(item.y);
        x_min = x_min.min(item.x);
        x_max = x_max.max(item.x);
    }

    // Median rather than mean: superscripts and oversized runs stay outliers.
    let heights: Vec<f64> = members.iter().map(|i| i.height).collect();
    let height = upper_median(&heights)
        .filter(|h| *h > 0.0)
        .unwrap_or(fallback);

    Line {
        index: Some(index),
        y_min,
        y_max,
        x_min,
        x_max,
        height,
        column_index,
        is_virtual: false,
        line_no: 0,
        items: members.iter().map(|i| (*i).clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(x: f64, y: f64, height: f64) -> TextItem {
        TextItem::new(x, y, 10.0, height, "w")
    }

    #[test]
    fn items_within_tolerance_share_a_line() {
        let items = vec![item(10.0, 100.0, 10.0), item(40.0, 101.5, 10.0), item(10.0, 120.0, 10.0)];
        let lines = group_lines(&items, 0, &IndexConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].items.len(), 2);
        assert_eq!(lines[1].y_min, 100.0);
        assert_eq!(lines[1].y_max, 101.5);
        assert_eq!(lines[1].x_max, 40.0);
    }

    #[test]
    fn boundary_is_inclusive() {
        let items = vec![item(10.0, 100.0, 10.0), item(20.0, 102.0, 10.0)];
        let lines = group_lines(&items, 0, &IndexConfig::default());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn just_past_boundary_starts_new_line() {
        let items = vec![item(10.0, 100.0, 10.0), item(20.0, 102.01, 10.0)];
        let lines = group_lines(&items, 0, &IndexConfig::default());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn reference_is_first_item_not_last() {
        // 101.5 joins 103; 100 is 3 away from the reference even though it is
        // 1.5 away from the previous item.
        let items = vec![item(10.0, 100.0, 10.0), item(20.0, 101.5, 10.0), item(30.0, 103.0, 10.0)];
        let lines = group_lines(&items, 0, &IndexConfig::default());
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].y_min, lines[0].y_max), (101.5, 103.0));
        assert_eq!(lines[0].items.len(), 2);
        assert_eq!((lines[1].y_min, lines[1].y_max), (100.0, 100.0));
    }

    #[test]
    fn height_is_median_not_mean() {
        let items = vec![
            item(10.0, 50.0, 10.0),
            item(30.0, 50.0, 10.0),
            item(50.0, 50.0, 40.0),
        ];
        let lines = group_lines(&items, 2, &IndexConfig::default());
        assert_eq!(lines[0].height, 10.0);
        assert_eq!(lines[0].column_index, 2);
    }

    #[test]
    fn zero_height_falls_back() {
        let lines = group_lines(&[item(10.0, 50.0, 0.0)], 0, &IndexConfig::default());
        assert_eq!(lines[0].height, 12.0);
    }

    #[test]
    fn lines_follow_descending_y() {
        let items = vec![item(10.0, 300.0, 10.0), item(10.0, 100.0, 10.0), item(10.0, 200.0, 10.0)];
        let lines = group_lines(&items, 0, &IndexConfig::default());
        let tops: Vec<f64> = lines.iter().map(|l| l.y_min).collect();
        assert_eq!(tops, vec![300.0, 200.0, 100.0]);
        assert_eq!(lines[2].index, Some(2));
    }

    #[test]
    fn empty_column_has_no_lines() {
        assert!(group_lines(&[], 0, &IndexConfig::default()).is_empty());
    }
}
