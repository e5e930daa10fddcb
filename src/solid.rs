//! Solid-color detection.

use imgref::ImgRef;
use rgb::Rgba;

use crate::color::Color;

/// Outcome of a solid-color scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolidResult {
    /// Every pixel equals this color.
    Uniform(Color),
    /// At least two pixels differ. Carries no color.
    Varied,
    /// The scanned region had no pixels. Counts as solid, with no color.
    Empty,
}

impl SolidResult {
    /// True for [`Uniform`](Self::Uniform) and [`Empty`](Self::Empty).
    pub fn is_solid(&self) -> bool {
        !matches!(self, SolidResult::Varied)
    }

    /// The shared color, only for [`Uniform`](Self::Uniform).
    pub fn color(&self) -> Option<Color> {
        match self {
            SolidResult::Uniform(color) => Some(*color),
            SolidResult::Varied | SolidResult::Empty => None,
        }
    }
}

/// Compare every pixel against the first one, in row-major order,
/// stopping at the first mismatch.
pub fn scan_solid(img: ImgRef<'_, Rgba<u8>>) -> SolidResult {
    if img.width() == 0 || img.height() == 0 {
        return SolidResult::Empty;
    }
    let mut rows = img.rows();
    let Some(first_row) = rows.next() else {
        return SolidResult::Empty;
    };
    let Some(&first) = first_row.first() else {
        return SolidResult::Empty;
    };
    let differs = |row: &[Rgba<u8>]| row.iter().any(|p| *p != first);
    let result = if differs(&first_row[1..]) || rows.any(differs) {
        SolidResult::Varied
    } else {
        SolidResult::Uniform(first.into())
    };
    log::trace!(
        target: "imgview::solid",
        "scanned {}x{}: {result:?}",
        img.width(),
        img.height()
    );
    result
}
