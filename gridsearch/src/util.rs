use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::grid::{Grid, Point};

/// Build a grid from an image, one cell per pixel. Dark pixels (red channel below 128)
/// become barriers, everything else is passable.
pub fn parse_img(img: &DynamicImage) -> Result<Grid, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut grid = Grid::new(height, width)?;

    for row in 0..height {
        for col in 0..width {
            let p = img.get_pixel(col as u32, row as u32);

            if p.0[0] < 128 {
                grid.set_passable(Point { row, col }, false);
            }
        }
    }

    Ok(grid)
}

/// Load a grid from disk: anything the `image` crate recognises by extension is decoded
/// with [`parse_img`], every other file is read as ASCII text (see `Grid`'s `FromStr`).
pub fn load_grid(path: &Path) -> Result<Grid, anyhow::Error> {
    if ImageFormat::from_path(path).is_ok() {
        let img =
            image::open(path).with_context(|| format!("Could not open {}", path.display()))?;
        return parse_img(&img);
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    text.parse()
        .with_context(|| format!("Could not parse grid {}", path.display()))
}
