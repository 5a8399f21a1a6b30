use super::{upper_median, Line};
use crate::config::IndexConfig;

/// Pad abnormally large gaps with virtual lines and number every line.
///
/// The baseline spacing is the median of the gaps between consecutive line
/// centers. Gaps within `line_tolerance` join lines of the same row in
/// different columns and do not count toward the baseline. A gap above
/// `gap_threshold` times the baseline receives `round(gap / median) - 1`
/// virtual lines (at least one, at most `max_virtual_per_gap`), placed at
/// multiples of the median from the previous line toward the next one.
pub fn insert_virtual_lines(lines: Vec<Line>, config: &IndexConfig) -> Vec<Line> {
    if lines.len() < 2 {
        return number_lines(lines);
    }

    let centers: Vec<f64> = lines.iter().map(Line::center_y).collect();
    let gaps: Vec<f64> = centers.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let row_gaps: Vec<f64> = gaps
        .iter()
        .copied()
        .filter(|gap| *gap > config.line_tolerance)
        .collect();
    let median = upper_median(&row_gaps).unwrap_or(0.0);

    let mut out: Vec<Line> = Vec::with_capacity(lines.len());
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            let count = virtual_count(gaps[i - 1], median, config);
            if count > 0 {
                let prev_center = centers[i - 1];
                let direction = if centers[i] >= prev_center { 1.0 } else { -1.0 };
                let (height, column_index) = out
                    .last()
                    .map(|prev| (prev.height, prev.column_index))
                    .unwrap_or((line.height, line.column_index));
                for k in 1..=count {
                    let center = prev_center + direction * median * k as f64;
                    out.push(Line::virtual_at(center, height, column_index));
                }
            }
        }
        out.push(line);
    }

    number_lines(out)
}

/// Number of virtual lines to place in a gap, 0 when the gap is ordinary.
pub fn virtual_count(gap: f64, median: f64, config: &IndexConfig) -> usize {
    if median > 0.0 && gap > config.gap_threshold * median {
        let steps = ((gap / median).round() - 1.0).max(1.0);
        steps.min(config.max_virtual_per_gap as f64) as usize
    } else {
        0
    }
}

fn number_lines(mut lines: Vec<Line>) -> Vec<Line> {
    for (i, line) in lines.iter_mut().enumerate() {
        line.line_no = i as u32 + 1;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real_line(center: f64) -> Line {
        Line {
            index: None,
            y_min: center,
            y_max: center,
            x_min: 10.0,
            x_max: 200.0,
            height: 9.0,
            column_index: 0,
            is_virtual: false,
            line_no: 0,
            items: Vec::new(),
        }
    }

    fn centers(lines: &[Line]) -> Vec<f64> {
        lines.iter().map(Line::center_y).collect()
    }

    #[test]
    fn large_gap_in_descending_flow_gets_four_virtual_lines() {
        let lines = [100.0, 90.0, 40.0, 30.0].map(real_line).to_vec();
        let out = insert_virtual_lines(lines, &IndexConfig::default());
        assert_eq!(out.len(), 8);
        assert_eq!(
            centers(&out),
            vec![100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0]
        );
        let flags: Vec<bool> = out.iter().map(|l| l.is_virtual).collect();
        assert_eq!(
            flags,
            vec![false, false, true, true, true, true, false, false]
        );
    }

    #[test]
    fn virtual_lines_inherit_height_and_span_the_page() {
        let lines = [10.0, 20.0, 30.0, 70.0].map(real_line).to_vec();
        let out = insert_virtual_lines(lines, &IndexConfig::default());
        let virtual_line = out.iter().find(|l| l.is_virtual).unwrap();
        assert_eq!(virtual_line.height, 9.0);
        assert_eq!(virtual_line.y_max - virtual_line.y_min, 9.0);
        assert_eq!(virtual_line.x_min, 0.0);
        assert_eq!(virtual_line.x_max, 99999.0);
        assert!(virtual_line.items.is_empty());
        assert_eq!(virtual_line.index, None);
    }

    #[test]
    fn line_numbers_cover_real_and_virtual() {
        let lines = [10.0, 20.0, 30.0, 70.0].map(real_line).to_vec();
        let out = insert_virtual_lines(lines, &IndexConfig::default());
        let numbers: Vec<u32> = out.iter().map(|l| l.line_no).collect();
        assert_eq!(numbers, (1..=out.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn fewer_than_two_lines_are_just_numbered() {
        let out = insert_virtual_lines(vec![real_line(50.0)], &IndexConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].line_no, 1);
        assert!(insert_virtual_lines(Vec::new(), &IndexConfig::default()).is_empty());
    }

    #[test]
    fn zero_median_inserts_nothing() {
        // Every line on the same baseline: no row spacing to measure.
        let lines = [50.0, 50.0, 50.0].map(real_line).to_vec();
        let out = insert_virtual_lines(lines, &IndexConfig::default());
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|l| !l.is_virtual));
    }

    #[test]
    fn same_row_gaps_do_not_shrink_the_baseline() {
        // Two columns whose baselines differ by 0.001: the tiny gaps between
        // columns must not become the line spacing.
        let centers = [100.0, 100.001, 112.0, 112.001, 124.0, 124.001, 136.0, 136.001];
        let out = insert_virtual_lines(centers.map(real_line).to_vec(), &IndexConfig::default());
        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|l| !l.is_virtual));
    }

    #[test]
    fn jittered_columns_with_a_blank_region_stay_proportional() {
        let centers = [100.0, 100.001, 112.0, 112.001, 124.0, 124.001, 184.0, 184.001];
        let out = insert_virtual_lines(centers.map(real_line).to_vec(), &IndexConfig::default());
        // Row spacing 11.999, gap 59.999 -> round(5.0) - 1 = 4 virtual lines.
        assert_eq!(out.iter().filter(|l| l.is_virtual).count(), 4);
        assert_eq!(out.len(), 12);
    }

    #[test]
    fn count_is_capped_per_gap() {
        let defaults = IndexConfig::default();
        assert_eq!(
            virtual_count(1.0e9, 12.0, &defaults),
            defaults.max_virtual_per_gap
        );
        let capped = IndexConfig {
            max_virtual_per_gap: 2,
            ..IndexConfig::default()
        };
        assert_eq!(virtual_count(50.0, 10.0, &capped), 2);
        let lines = [10.0, 20.0, 30.0, 400.0].map(real_line).to_vec();
        let out = insert_virtual_lines(lines, &capped);
        assert_eq!(out.iter().filter(|l| l.is_virtual).count(), 2);
    }

    #[test]
    fn count_has_a_floor_of_one() {
        let defaults = IndexConfig::default();
        // 17 / 10 = 1.7 -> rounds to 2 -> 1 virtual line
        assert_eq!(virtual_count(17.0, 10.0, &defaults), 1);
        assert_eq!(virtual_count(16.0, 10.0, &defaults), 0);
        assert_eq!(virtual_count(50.0, 10.0, &defaults), 4);
        assert_eq!(virtual_count(50.0, 0.0, &defaults), 0);
    }

    #[test]
    fn threshold_is_configurable() {
        let lines = [0.0, 10.0, 20.0, 45.0].map(real_line).to_vec();
        assert_eq!(insert_virtual_lines(lines.clone(), &IndexConfig::default()).len(), 6);
        let strict = IndexConfig {
            gap_threshold: 3.0,
            ..IndexConfig::default()
        };
        assert_eq!(insert_virtual_lines(lines, &strict).len(), 4);
    }
}
