//! Geometric primitives shared by the canvas and PDF sides of a field.
//!
//! Two coordinate spaces meet here:
//!
//! - **UI space**: pixels, top-left origin, multiplied by the viewer's current
//!   zoom level ([`UiRect`]).
//! - **PDF space**: fractions of the page size, bottom-left origin, independent
//!   of zoom ([`PdfRect`]).
//!
//! The conversions live in [`transform`].

pub mod transform;

pub use transform::{to_pdf_rect, to_pdf_rect_a4, to_pdf_rect_parts, to_ui_rect, to_ui_rect_parts, validate};

use serde::{Deserialize, Serialize};

/// Pixel size of a page rendered at scale 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    /// Page width in pixels at scale 1.0
    pub width: f64,
    /// Page height in pixels at scale 1.0
    pub height: f64,
}

impl PageDimensions {
    /// ISO A4 as catalogued by the editor.
    pub const A4: PageDimensions = PageDimensions {
        width: 595.0,
        height: 841.0,
    };

    /// US Letter (8.5" x 11").
    pub const LETTER: PageDimensions = PageDimensions {
        width: 612.0,
        height: 792.0,
    };

    /// US Legal (8.5" x 14").
    pub const LEGAL: PageDimensions = PageDimensions {
        width: 612.0,
        height: 1008.0,
    };

    /// Create page dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_field_mapper::geometry::PageDimensions;
    ///
    /// let page = PageDimensions::new(612.0, 792.0);
    /// assert_eq!(page, PageDimensions::LETTER);
    /// ```
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build dimensions from a PDF `/MediaBox` (`[x0 y0 x1 y1]` in points).
    ///
    /// Corner order in the box is not trusted; width and height are absolute.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_field_mapper::geometry::PageDimensions;
    ///
    /// let page = PageDimensions::from_media_box([0.0, 0.0, 595.0, 841.0]);
    /// assert_eq!(page, PageDimensions::A4);
    /// ```
    pub fn from_media_box(media_box: [f64; 4]) -> Self {
        Self {
            width: (media_box[2] - media_box[0]).abs(),
            height: (media_box[3] - media_box[1]).abs(),
        }
    }
}

/// Top-left pixel position of a field on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the page's left edge
    pub x: i64,
    /// Vertical offset from the page's top edge
    pub y: i64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// On-screen rectangle at the viewer's current scale, top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UiRect {
    /// X coordinate of the left edge
    pub left: f64,
    /// Y coordinate of the top edge
    pub top: f64,
    /// Width in display pixels
    pub width: f64,
    /// Height in display pixels
    pub height: f64,
}

impl UiRect {
    /// Create a new UI rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_field_mapper::geometry::UiRect;
    ///
    /// let rect = UiRect::new(10.0, 20.0, 100.0, 50.0);
    /// assert_eq!(rect.right(), 110.0);
    /// assert_eq!(rect.bottom(), 70.0);
    /// ```
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Integer top-left corner, truncated toward zero.
    pub fn position(&self) -> Position {
        Position::new(self.left as i64, self.top as i64)
    }
}

/// Normalized rectangle in PDF space, bottom-left origin.
///
/// A valid rectangle satisfies `0 <= llx < urx <= 1` and `0 <= lly < ury <= 1`.
/// [`PdfRect::ZERO`] marks a field that has not been placed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfRect {
    /// Lower-left x
    pub llx: f64,
    /// Lower-left y
    pub lly: f64,
    /// Upper-right x
    pub urx: f64,
    /// Upper-right y
    pub ury: f64,
}

impl PdfRect {
    /// The "not yet placed" sentinel.
    pub const ZERO: PdfRect = PdfRect {
        llx: 0.0,
        lly: 0.0,
        urx: 0.0,
        ury: 0.0,
    };

    /// Create a new normalized rectangle.
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self { llx, lly, urx, ury }
    }

    /// Check the normalized-range and ordering invariant.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_field_mapper::geometry::PdfRect;
    ///
    /// assert!(PdfRect::new(0.1, 0.2, 0.3, 0.4).is_valid());
    /// assert!(!PdfRect::new(0.3, 0.2, 0.1, 0.4).is_valid());
    /// assert!(!PdfRect::ZERO.is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        in_unit(self.llx)
            && in_unit(self.lly)
            && in_unit(self.urx)
            && in_unit(self.ury)
            && self.llx < self.urx
            && self.lly < self.ury
    }

    /// False for the zero-rect sentinel.
    pub fn is_placed(&self) -> bool {
        *self != Self::ZERO
    }

    /// Normalized width.
    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    /// Normalized height.
    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Denormalize to absolute PDF points `[llx, lly, urx, ury]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_field_mapper::geometry::{PageDimensions, PdfRect};
    ///
    /// let rect = PdfRect::new(0.0, 0.5, 0.5, 1.0);
    /// assert_eq!(rect.to_points(&PageDimensions::LETTER), [0.0, 396.0, 306.0, 792.0]);
    /// ```
    pub fn to_points(&self, page: &PageDimensions) -> [f64; 4] {
        [
            self.llx * page.width,
            self.lly * page.height,
            self.urx * page.width,
            self.ury * page.height,
        ]
    }
}
