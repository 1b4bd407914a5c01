use crate::braille::BrailleCanvas;
use glam::IVec2;

/// Segments longer than this many canvas perimeters are dropped rather than
/// walked pixel by pixel (they come from vertices right next to the camera).
const MAX_SEGMENT_SPAN: i32 = 4;

/// Rough bounding box check against the canvas
pub fn segment_might_be_visible(canvas: &BrailleCanvas, a: IVec2, b: IVec2) -> bool {
    let min = a.min(b);
    let max = a.max(b);
    max.x >= 0
        && min.x < canvas.pixel_width() as i32
        && max.y >= 0
        && min.y < canvas.pixel_height() as i32
}

/// Draw a segment using Bresenham's algorithm, skipping off-canvas and
/// degenerate-length segments.
pub fn draw_segment(canvas: &mut BrailleCanvas, a: IVec2, b: IVec2) {
    if !segment_might_be_visible(canvas, a, b) {
        return;
    }
    let span = (b - a).abs();
    let limit = MAX_SEGMENT_SPAN * (canvas.pixel_width() + canvas.pixel_height()) as i32;
    if span.x + span.y > limit {
        return;
    }

    let dx = span.x;
    let dy = -span.y;
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut p = a;

    loop {
        canvas.set_pixel_signed(p.x, p.y);
        if p == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
}

/// Draw an open polyline. `None` entries break the line.
pub fn draw_polyline(canvas: &mut BrailleCanvas, points: impl IntoIterator<Item = Option<IVec2>>) {
    let mut prev: Option<IVec2> = None;
    for point in points {
        if let (Some(a), Some(b)) = (prev, point) {
            draw_segment(canvas, a, b);
        }
        prev = point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_segment(&mut canvas, IVec2::new(0, 0), IVec2::new(9, 0));
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_segment(&mut canvas, IVec2::new(0, 0), IVec2::new(0, 7));
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_offscreen_segment_skipped() {
        let mut canvas = BrailleCanvas::new(4, 4);
        draw_segment(&mut canvas, IVec2::new(-50, -5), IVec2::new(-10, -1));
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_huge_segment_skipped() {
        let mut canvas = BrailleCanvas::new(4, 4);
        draw_segment(&mut canvas, IVec2::new(0, 0), IVec2::new(1_000_000, 3));
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_polyline_breaks_on_none() {
        let mut joined = BrailleCanvas::new(5, 1);
        draw_polyline(
            &mut joined,
            [Some(IVec2::new(0, 0)), Some(IVec2::new(4, 0)), Some(IVec2::new(9, 0))],
        );
        let mut broken = BrailleCanvas::new(5, 1);
        draw_polyline(
            &mut broken,
            [Some(IVec2::new(0, 0)), Some(IVec2::new(4, 0)), None, Some(IVec2::new(9, 0))],
        );
        assert_eq!(joined.to_string(), "⠉⠉⠉⠉⠉");
        assert_eq!(broken.to_string(), "⠉⠉⠁⠀⠀");
    }
}
