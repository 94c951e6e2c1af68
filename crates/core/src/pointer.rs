//! Pointer-driven decoration offsets.

use folio_protocol::{Point, Rect};

/// Pixels of pointer travel per pixel of parallax shift in the hero.
const PARALLAX_DAMPING: f64 = 50.0;
/// Hero text drifts up at this fraction of the scroll speed.
const HERO_SCROLL_RATE: f64 = 0.1;

/// Parallax shift of the hero backdrop: distance of the pointer from the
/// hero's centre, damped. Empty heroes report no shift.
pub fn parallax_offset(pointer: Point, hero: Rect) -> Point {
    if hero.is_empty() {
        return Point::default();
    }
    let center = hero.center();
    Point::new(
        (pointer.x - center.x) / PARALLAX_DAMPING,
        (pointer.y - center.y) / PARALLAX_DAMPING,
    )
}

/// Vertical shift of the hero text in px for a page scrolled to `scroll_y`.
pub fn hero_scroll_shift(scroll_y: f64) -> f64 {
    -scroll_y * HERO_SCROLL_RATE
}

/// Pointer position as fractions of `area` (`0.0..=1.0` inside it). Empty
/// areas report the origin.
pub fn spotlight_position(pointer: Point, area: Rect) -> Point {
    if area.is_empty() {
        return Point::default();
    }
    Point::new((pointer.x - area.x) / area.w, (pointer.y - area.y) / area.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallax_is_zero_at_center() {
        let hero = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(parallax_offset(Point::new(500.0, 400.0), hero), Point::default());
    }

    #[test]
    fn parallax_scales_distance_from_center() {
        let hero = Rect::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(
            parallax_offset(Point::new(1000.0, 0.0), hero),
            Point::new(10.0, -8.0)
        );
    }

    #[test]
    fn parallax_ignores_empty_hero() {
        assert_eq!(
            parallax_offset(Point::new(10.0, 10.0), Rect::default()),
            Point::default()
        );
    }

    #[test]
    fn hero_drifts_up_with_scroll() {
        assert_eq!(hero_scroll_shift(0.0), 0.0);
        assert_eq!(hero_scroll_shift(300.0), -30.0);
    }

    #[test]
    fn spotlight_handles_empty_area() {
        assert_eq!(
            spotlight_position(Point::new(10.0, 10.0), Rect::default()),
            Point::default()
        );
    }
}
