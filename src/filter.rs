//! Scanline filtering
//!
//! Only filter type 0 is written: every row is prefixed by its filter byte and the
//! samples follow unchanged.
use crate::PixelBuffer;

/// The byte in front of each scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterType {
    NoFilter = 0,
}

impl Default for FilterType {
    fn default() -> Self {
        FilterType::NoFilter
    }
}

/// Appends the filtered scanlines of `data` to `out`.
///
/// `data` holds rows of `row_bytes` samples each.
pub(crate) fn filter_rows(data: &[u8], row_bytes: usize, out: &mut Vec<u8>) {
    if row_bytes == 0 {
        return;
    }
    out.reserve(data.len() + data.len() / row_bytes);
    for row in data.chunks(row_bytes) {
        out.push(FilterType::NoFilter as u8);
        out.extend_from_slice(row);
    }
}

/// Returns the scanline stream of `image`: one filter byte followed by `width * 3`
/// samples for every row, top to bottom.
pub fn filter_scanlines(image: &PixelBuffer) -> Vec<u8> {
    let mut out = Vec::new();
    filter_rows(image.as_bytes(), image.info().row_bytes(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_every_row() {
        let image = PixelBuffer::from_vec(2, 2, (1..=12).collect()).unwrap();
        let lines = filter_scanlines(&image);
        assert_eq!(
            lines,
            [0, 1, 2, 3, 4, 5, 6, 0, 7, 8, 9, 10, 11, 12]
        );
        assert_eq!(Some(lines.len()), image.info().raw_bytes());
    }

    #[test]
    fn single_pixel() {
        let image = PixelBuffer::from_vec(1, 1, vec![10, 20, 30]).unwrap();
        assert_eq!(filter_scanlines(&image), [0, 10, 20, 30]);
    }
}
