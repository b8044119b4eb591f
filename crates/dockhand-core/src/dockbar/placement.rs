//! Pure rectangle arithmetic for dock bar negotiation.

use crate::Rect;

use super::Edge;

/// Builds the rectangle first proposed to the OS: a strip of
/// `thickness` pixels along `edge`, spanning the whole monitor.
pub fn candidate(edge: Edge, thickness: i32, bounds: Rect) -> Rect {
    match edge {
        Edge::Left => Rect::new(bounds.x, bounds.y, thickness, bounds.height),
        Edge::Right => Rect::new(bounds.right() - thickness, bounds.y, thickness, bounds.height),
        Edge::Top => Rect::new(bounds.x, bounds.y, bounds.width, thickness),
        Edge::Bottom => Rect::new(bounds.x, bounds.bottom() - thickness, bounds.width, thickness),
    }
}

/// Re-derives the coordinate opposite `edge` after an OS query.
///
/// The query only moves the edge-facing side out of other bars' way,
/// so the far side has to be recomputed from the requested thickness.
pub fn restore_thickness(edge: Edge, queried: Rect, thickness: i32) -> Rect {
    match edge {
        Edge::Left => Rect::new(queried.x, queried.y, thickness, queried.height),
        Edge::Right => Rect::new(queried.right() - thickness, queried.y, thickness, queried.height),
        Edge::Top => Rect::new(queried.x, queried.y, queried.width, thickness),
        Edge::Bottom => Rect::new(queried.x, queried.bottom() - thickness, queried.width, thickness),
    }
}

/// Measures a bar rectangle perpendicular to its edge.
pub fn thickness(edge: Edge, rect: Rect) -> i32 {
    if edge.is_horizontal() {
        rect.height
    } else {
        rect.width
    }
}

/// Converts a logical thickness to physical pixels.
pub fn to_physical(logical: i32, dpi_scale: f64) -> i32 {
    (f64::from(logical) * dpi_scale).round() as i32
}

/// Computes a monitor's usable area given the bars that qualify.
///
/// Only top and bottom bars are subtracted; the horizontal range stays
/// the full monitor width. Thicknesses are logical and scaled by
/// `dpi_scale`.
pub fn work_area(bounds: Rect, dpi_scale: f64, bars: impl IntoIterator<Item = (Edge, i32)>) -> Rect {
    let mut top = 0;
    let mut bottom = 0;
    for (edge, logical) in bars {
        match edge {
            Edge::Top => top += logical,
            Edge::Bottom => bottom += logical,
            Edge::Left | Edge::Right => {}
        }
    }
    Rect::from_edges(
        bounds.x,
        bounds.y + to_physical(top, dpi_scale),
        bounds.right(),
        bounds.bottom() - to_physical(bottom, dpi_scale),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    #[test]
    fn candidate_hugs_each_edge() {
        assert_eq!(candidate(Edge::Top, 40, SCREEN), Rect::new(0, 0, 1920, 40));
        assert_eq!(candidate(Edge::Bottom, 30, SCREEN), Rect::new(0, 1050, 1920, 30));
        assert_eq!(candidate(Edge::Left, 60, SCREEN), Rect::new(0, 0, 60, 1080));
        assert_eq!(candidate(Edge::Right, 60, SCREEN), Rect::new(1860, 0, 60, 1080));
    }

    #[test]
    fn candidate_respects_monitor_origin() {
        let second = Rect::new(1920, -200, 2560, 1440);

        assert_eq!(candidate(Edge::Bottom, 48, second), Rect::new(1920, 1192, 2560, 48));
    }

    #[test]
    fn restore_thickness_keeps_adjusted_edge() {
        // The OS pushed the top of a top bar down to 40 but left its
        // bottom at 40 too, collapsing it.
        let queried = Rect::from_edges(0, 40, 1920, 40);

        assert_eq!(
            restore_thickness(Edge::Top, queried, 30),
            Rect::new(0, 40, 1920, 30)
        );
    }

    #[test]
    fn restore_thickness_for_bottom_bar_grows_upwards() {
        let queried = Rect::from_edges(0, 1050, 1920, 1050);

        assert_eq!(
            restore_thickness(Edge::Bottom, queried, 30),
            Rect::new(0, 1020, 1920, 30)
        );
    }

    #[test]
    fn work_area_subtracts_top_and_bottom_bars() {
        let area = work_area(SCREEN, 1.0, [(Edge::Top, 40), (Edge::Bottom, 30)]);

        assert_eq!(area.y, 40);
        assert_eq!(area.bottom(), 1050);
        assert_eq!(area.x, 0);
        assert_eq!(area.width, 1920);
    }

    #[test]
    fn work_area_ignores_side_bars_and_scales() {
        let area = work_area(SCREEN, 1.5, [(Edge::Left, 100), (Edge::Top, 20)]);

        assert_eq!(area, Rect::new(0, 30, 1920, 1050));
    }
}
