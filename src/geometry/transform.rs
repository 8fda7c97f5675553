//! Scale-aware mapping between canvas pixels and normalized PDF rectangles.
//!
//! These run inside pointer-move handlers, so they are pure and allocation-free.
//! Degenerate input (zero or negative sizes, rectangles hanging off the page) is
//! converted as-is; [`validate`] is how callers find out.

use super::{PageDimensions, PdfRect, UiRect};

/// Convert a UI rectangle at `scale` into a normalized PDF rectangle.
///
/// # Examples
///
/// ```
/// use pdf_field_mapper::geometry::{to_pdf_rect, PageDimensions, UiRect};
///
/// // Top-left quarter of a Letter page, viewed at 200%.
/// let ui = UiRect::new(0.0, 0.0, 612.0, 792.0);
/// let rect = to_pdf_rect(&ui, &PageDimensions::LETTER, 2.0);
/// assert_eq!((rect.llx, rect.lly, rect.urx, rect.ury), (0.0, 0.5, 0.5, 1.0));
/// ```
#[inline]
pub fn to_pdf_rect(ui: &UiRect, page: &PageDimensions, scale: f64) -> PdfRect {
    let x = ui.left / scale;
    let y = ui.top / scale;
    let width = ui.width / scale;
    let height = ui.height / scale;

    // Corners in top-left-origin pixels at scale 1.0
    let (bottom_left_x, bottom_left_y) = (x, y + height);
    let (top_right_x, top_right_y) = (x + width, y);

    let bottom_from_bottom = page.height - bottom_left_y;
    let top_from_bottom = page.height - top_right_y;

    PdfRect {
        llx: bottom_left_x / page.width,
        lly: bottom_from_bottom / page.height,
        urx: top_right_x / page.width,
        ury: top_from_bottom / page.height,
    }
}

/// Convert a normalized PDF rectangle back into a UI rectangle at `scale`.
///
/// This is the algebraic inverse of [`to_pdf_rect`].
///
/// # Examples
///
/// ```
/// use pdf_field_mapper::geometry::{to_ui_rect, PageDimensions, PdfRect};
///
/// let rect = PdfRect::new(0.0, 0.5, 0.5, 1.0);
/// let ui = to_ui_rect(&rect, &PageDimensions::LETTER, 1.0);
/// assert_eq!((ui.left, ui.top, ui.width, ui.height), (0.0, 0.0, 306.0, 396.0));
/// ```
#[inline]
pub fn to_ui_rect(rect: &PdfRect, page: &PageDimensions, scale: f64) -> UiRect {
    let left = rect.llx * page.width;
    let right = rect.urx * page.width;
    let top = page.height - rect.ury * page.height;
    let bottom = page.height - rect.lly * page.height;

    UiRect {
        left: left * scale,
        top: top * scale,
        width: (right - left) * scale,
        height: (bottom - top) * scale,
    }
}

/// True iff every coordinate is in `[0, 1]`, `llx < urx` and `lly < ury`.
#[inline]
pub fn validate(rect: &PdfRect) -> bool {
    rect.is_valid()
}

/// [`to_pdf_rect`] taking loose numbers, for callers without the structs at hand.
#[inline]
pub fn to_pdf_rect_parts(
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    page_width: f64,
    page_height: f64,
    scale: f64,
) -> PdfRect {
    to_pdf_rect(
        &UiRect::new(left, top, width, height),
        &PageDimensions::new(page_width, page_height),
        scale,
    )
}

/// [`to_ui_rect`] taking loose numbers.
#[inline]
pub fn to_ui_rect_parts(
    llx: f64,
    lly: f64,
    urx: f64,
    ury: f64,
    page_width: f64,
    page_height: f64,
    scale: f64,
) -> UiRect {
    to_ui_rect(
        &PdfRect::new(llx, lly, urx, ury),
        &PageDimensions::new(page_width, page_height),
        scale,
    )
}

/// [`to_pdf_rect`] with the page fixed to [`PageDimensions::A4`].
#[inline]
pub fn to_pdf_rect_a4(left: f64, top: f64, width: f64, height: f64, scale: f64) -> PdfRect {
    to_pdf_rect(&UiRect::new(left, top, width, height), &PageDimensions::A4, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "{} != {}", a, b);
    }

    #[test]
    fn test_full_page_maps_to_unit_rect() {
        let page = PageDimensions::A4;
        let rect = to_pdf_rect(&UiRect::new(0.0, 0.0, 595.0, 841.0), &page, 1.0);
        assert_eq!(rect, PdfRect::new(0.0, 0.0, 1.0, 1.0));
        assert!(validate(&rect));
    }

    #[test]
    fn test_y_axis_is_flipped() {
        // A box hugging the top edge lands at the top of PDF space.
        let page = PageDimensions::new(100.0, 200.0);
        let rect = to_pdf_rect(&UiRect::new(10.0, 0.0, 20.0, 50.0), &page, 1.0);
        assert_close(rect.llx, 0.1);
        assert_close(rect.urx, 0.3);
        assert_close(rect.ury, 1.0);
        assert_close(rect.lly, 0.75);
    }

    #[test]
    fn test_scale_divides_pixels() {
        let page = PageDimensions::new(100.0, 100.0);
        let at_half = to_pdf_rect(&UiRect::new(5.0, 5.0, 10.0, 10.0), &page, 0.5);
        let at_one = to_pdf_rect(&UiRect::new(10.0, 10.0, 20.0, 20.0), &page, 1.0);
        assert_eq!(at_half, at_one);
    }

    #[test]
    fn test_inverse_restores_rect() {
        let page = PageDimensions::LEGAL;
        let ui = UiRect::new(123.5, 456.25, 80.0, 24.0);
        let back = to_ui_rect(&to_pdf_rect(&ui, &page, 1.5), &page, 1.5);
        assert_close(back.left, ui.left);
        assert_close(back.top, ui.top);
        assert_close(back.width, ui.width);
        assert_close(back.height, ui.height);
    }

    #[test]
    fn test_rect_off_page_is_flagged_not_rejected() {
        let page = PageDimensions::A4;
        let rect = to_pdf_rect(&UiRect::new(500.0, 800.0, 200.0, 100.0), &page, 1.0);
        assert!(rect.urx > 1.0);
        assert!(rect.lly < 0.0);
        assert!(!validate(&rect));
    }

    #[test]
    fn test_zero_size_is_degenerate() {
        let rect = to_pdf_rect_a4(100.0, 100.0, 0.0, 0.0, 1.0);
        assert_eq!(rect.llx, rect.urx);
        assert!(!validate(&rect));
    }

    #[test]
    fn test_negative_size_is_degenerate() {
        let rect = to_pdf_rect_a4(100.0, 100.0, -20.0, 10.0, 1.0);
        assert!(rect.urx < rect.llx);
        assert!(!validate(&rect));
    }

    #[test]
    fn test_parts_wrappers_match_struct_forms() {
        let by_parts = to_pdf_rect_parts(30.0, 40.0, 50.0, 60.0, 612.0, 792.0, 1.25);
        let by_struct = to_pdf_rect(
            &UiRect::new(30.0, 40.0, 50.0, 60.0),
            &PageDimensions::LETTER,
            1.25,
        );
        assert_eq!(by_parts, by_struct);

        let ui = to_ui_rect_parts(by_parts.llx, by_parts.lly, by_parts.urx, by_parts.ury, 612.0, 792.0, 1.25);
        assert_close(ui.left, 30.0);
        assert_close(ui.height, 60.0);
    }

    #[test]
    fn test_a4_variant_uses_catalogued_size() {
        let rect = to_pdf_rect_a4(0.0, 0.0, 297.5, 420.5, 1.0);
        assert_close(rect.urx, 0.5);
        assert_close(rect.lly, 0.5);
    }
}
