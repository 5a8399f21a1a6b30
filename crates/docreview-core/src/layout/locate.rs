use super::Line;

/// The line whose vertical center is closest to `y`, if within `radius`.
///
/// Only a strictly smaller distance replaces the current best, so the first
/// line seen wins a tie.
pub fn nearest_line(lines: &[Line], y: f64, radius: f64) -> Option<&Line> {
    let mut best: Option<(&Line, f64)> = None;
    for line in lines {
        let distance = (y - line.center_y()).abs();
        if distance > radius {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((line, distance)),
        }
    }
    best.map(|(line, _)| line)
}
