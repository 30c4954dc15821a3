//! Tile-sheet restacking.
//!
//! Fonts and tile sets are easier to draw as a grid, but a CPC renderer wants
//! each cell's rows back to back. Restacking cuts the sheet into cells in
//! reading order and piles them into one column, `cell_width` wide.

use crate::{ConvertError, IndexedImage};

/// Cut `sheet` into `cell_width` x `cell_height` cells and stack them
/// vertically. The palette is carried over unchanged.
pub fn stack_cells(
    sheet: &IndexedImage,
    cell_width: usize,
    cell_height: usize,
) -> Result<IndexedImage, ConvertError> {
    let (width, height) = (sheet.width(), sheet.height());
    if cell_width == 0 || cell_height == 0 {
        return Err(ConvertError::dimensions(width, height, "cell size must be non-zero"));
    }
    if width == 0 || height == 0 || width % cell_width != 0 || height % cell_height != 0 {
        return Err(ConvertError::dimensions(
            width,
            height,
            format!("not a whole number of {cell_width}x{cell_height} cells"),
        ));
    }

    let columns = width / cell_width;
    let rows = height / cell_height;
    let mut pixels = Vec::with_capacity(width * height);

    for cell in 0..columns * rows {
        let x0 = (cell % columns) * cell_width;
        let y0 = (cell / columns) * cell_height;
        for y in y0..y0 + cell_height {
            pixels.extend_from_slice(&sheet.row(y)[x0..x0 + cell_width]);
        }
    }

    IndexedImage::new(cell_width, columns * rows * cell_height, pixels, sheet.palette().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_stack_in_reading_order() {
        let sheet = IndexedImage::from_rows(
            &[
                [0, 0, 1, 1, 2, 2],
                [0, 0, 1, 1, 2, 2],
                [3, 3, 4, 4, 5, 5],
                [3, 3, 4, 4, 5, 5],
            ],
            vec![[0, 0, 0]],
        )
        .expect("valid");

        let column = stack_cells(&sheet, 2, 2).expect("stacks");
        assert_eq!((column.width(), column.height()), (2, 12));
        let firsts: Vec<u8> = column.rows().step_by(2).map(|r| r[0]).collect();
        assert_eq!(firsts, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(column.palette(), sheet.palette());
    }

    #[test]
    fn keeps_pixel_order_inside_a_cell() {
        let sheet = IndexedImage::from_rows(&[[1, 2, 5, 6], [3, 4, 7, 8]], Vec::new()).expect("valid");
        let column = stack_cells(&sheet, 2, 2).expect("stacks");
        assert_eq!(column.pixels(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn rejects_partial_cells() {
        let sheet = IndexedImage::from_rows(&[[0, 0, 0], [0, 0, 0]], Vec::new()).expect("valid");
        assert!(stack_cells(&sheet, 2, 2).is_err());
        assert!(stack_cells(&sheet, 0, 2).is_err());
        assert!(stack_cells(&sheet, 3, 2).is_ok());
    }
}
