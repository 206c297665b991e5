//! Integer pixel geometry and the fence-post rectangle division every layout step is built on.
//!
//! Boxes use inclusive pixel coordinates: a canvas of `w x h` pixels spans `(0, 0)-(w-1, h-1)`.

/// Pixel space of the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel;

pub type PixelPoint = euclid::Point2D<i32, Pixel>;
pub type PixelBox = euclid::Box2D<i32, Pixel>;

pub fn point(x: i32, y: i32) -> PixelPoint {
    euclid::point2(x, y)
}

pub fn pixel_box(x0: i32, y0: i32, x1: i32, y1: i32) -> PixelBox {
    PixelBox::new(point(x0, y0), point(x1, y1))
}

/// Direction slices are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Slices side by side, left to right.
    Horizontal,
    /// Slices stacked, top to bottom.
    Vertical,
}

/// Swaps the roles of x and y.
pub fn transpose(b: PixelBox) -> PixelBox {
    pixel_box(b.min.y, b.min.x, b.max.y, b.max.x)
}

/// Splits `rect` into `count` equal slices along `axis`.
///
/// Every slice is inset by `margin` on all sides and neighbours are `margin` pixels apart. The
/// slice extent is `floor((extent - margin) / count)`, so the division never spills over the far
/// edge. With a zero margin and a single slice the result is `rect` itself. Vertical division is
/// horizontal division of the transposed box.
///
/// Slices can come out empty (`max <= min`) when the margins eat the whole extent; callers decide
/// what to do with those.
pub fn divide_rect(rect: PixelBox, count: usize, margin: i32, axis: Axis) -> Vec<PixelBox> {
    match axis {
        Axis::Horizontal => divide_horizontal(rect, count, margin),
        Axis::Vertical => divide_horizontal(transpose(rect), count, margin)
            .into_iter()
            .map(transpose)
            .collect(),
    }
}

fn divide_horizontal(rect: PixelBox, count: usize, margin: i32) -> Vec<PixelBox> {
    if count == 0 {
        return Vec::new();
    }
    let n = i32::try_from(count).unwrap_or(i32::MAX);
    let dx = (rect.max.x - rect.min.x - margin).div_euclid(n);
    let x0 = rect.min.x + margin;
    let y0 = rect.min.y + margin;
    let y1 = rect.max.y - margin;

    let slices = (0..n)
        .map(|i| pixel_box(x0 + dx * i, y0, x0 + dx * (i + 1) - margin, y1))
        .collect::<Vec<_>>();
    tracing::trace!(?rect, count, margin, "divided rectangle");
    slices
}

/// Inclusive-coordinate containment: every pixel of `inner` is a pixel of `outer`.
pub fn contains(outer: &PixelBox, inner: &PixelBox) -> bool {
    outer.min.x <= inner.min.x
        && outer.min.y <= inner.min.y
        && inner.max.x <= outer.max.x
        && inner.max.y <= outer.max.y
}

/// Inclusive-coordinate overlap: the boxes share at least one pixel.
pub fn overlaps(a: &PixelBox, b: &PixelBox) -> bool {
    a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_reproduces_fence_post_slices() {
        let slices = divide_rect(pixel_box(0, 0, 799, 799), 3, 20, Axis::Horizontal);
        assert_eq!(
            slices,
            vec![
                pixel_box(20, 20, 259, 779),
                pixel_box(279, 20, 518, 779),
                pixel_box(538, 20, 777, 779),
            ]
        );
    }

    #[test]
    fn divide_without_margin_single_slice_is_identity() {
        for rect in [pixel_box(0, 0, 799, 599), pixel_box(13, 7, 14, 900)] {
            assert_eq!(divide_rect(rect, 1, 0, Axis::Horizontal), vec![rect]);
            assert_eq!(divide_rect(rect, 1, 0, Axis::Vertical), vec![rect]);
        }
    }

    #[test]
    fn divide_zero_count_is_empty() {
        assert!(divide_rect(pixel_box(0, 0, 100, 100), 0, 20, Axis::Vertical).is_empty());
    }

    #[test]
    fn vertical_division_is_transposed_horizontal_division() {
        let rect = pixel_box(10, 40, 310, 640);
        let vertical = divide_rect(rect, 4, 12, Axis::Vertical);
        let expected = divide_rect(transpose(rect), 4, 12, Axis::Horizontal)
            .into_iter()
            .map(transpose)
            .collect::<Vec<_>>();
        assert_eq!(vertical, expected);
        assert_eq!(vertical[0], pixel_box(22, 52, 298, 187));
        assert!(vertical.windows(2).all(|w| w[0].max.y < w[1].min.y));
    }

    #[test]
    fn slices_are_ordered_disjoint_and_contained() {
        let rects = [
            pixel_box(0, 0, 799, 799),
            pixel_box(40, 299, 759, 757),
            pixel_box(5, 5, 1000, 60),
        ];
        for rect in rects {
            for count in 1..=9 {
                for margin in [0, 1, 20] {
                    for axis in [Axis::Horizontal, Axis::Vertical] {
                        let slices = divide_rect(rect, count, margin, axis);
                        assert_eq!(slices.len(), count);
                        for (i, a) in slices.iter().enumerate() {
                            assert!(contains(&rect, a), "{a:?} escapes {rect:?}");
                            for b in &slices[i + 1..] {
                                if margin > 0 {
                                    assert!(!overlaps(a, b), "{a:?} overlaps {b:?}");
                                }
                                match axis {
                                    Axis::Horizontal => assert!(a.min.x < b.min.x),
                                    Axis::Vertical => assert!(a.min.y < b.min.y),
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn tight_rectangles_yield_empty_slices() {
        let slices = divide_rect(pixel_box(0, 0, 30, 30), 2, 20, Axis::Horizontal);
        assert!(slices.iter().all(|s| s.is_empty()));
    }
}
