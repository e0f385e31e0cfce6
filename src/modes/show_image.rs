use crate::geometry::bounding_box;
use crate::lights::LightStore;
use crate::{Color, Coord, Error, Result};
use image::RgbImage;

/// Shows a sequence of frames over a region, one frame per tick.
///
/// Frames are expected to be decoded and scaled to the region's bounding
/// box before the mode is built (see [`crate::media::load_frames`]). Pixel
/// `(x, y)` of a frame lands on the target `(origin.row + y, origin.col + x)`,
/// where `origin` is the bounding box's top-left corner.
pub struct ShowImage {
    coords: Vec<Coord>,
    origin: Coord,
    frames: Vec<RgbImage>,
    cursor: usize,
}

impl ShowImage {
    pub fn new(coords: Vec<Coord>, frames: Vec<RgbImage>) -> Self {
        let origin = bounding_box(&coords).map_or(Coord::new(0, 0), |(origin, _)| origin);
        Self {
            coords,
            origin,
            frames,
            cursor: 0,
        }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the frame the next tick will show.
    pub fn current_frame(&self) -> usize {
        self.cursor
    }

    pub(super) fn update(&mut self, lights: &mut LightStore) -> Result<()> {
        let Some(frame) = self.frames.get(self.cursor) else {
            return Err(Error::ModeUpdate {
                mode: "ShowImage",
                reason: "there are no frames to show".to_string(),
            });
        };

        for &coord in &self.coords {
            let x = (coord.col - self.origin.col) as u32;
            let y = (coord.row - self.origin.row) as u32;
            let pixel = frame.get_pixel_checked(x, y).ok_or_else(|| Error::ModeUpdate {
                mode: "ShowImage",
                reason: format!(
                    "{coord} maps to pixel ({x}, {y}) outside the {}x{} frame",
                    frame.width(),
                    frame.height()
                ),
            })?;
            lights.set_color(coord, Color::new(pixel[0], pixel[1], pixel[2]), Some(true))?;
        }

        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BLUE, GREEN, GridSize, RED, WHITE};
    use image::Rgb;
    use pretty_assertions::assert_eq;

    fn solid(width: u32, height: u32, color: Color) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([color.r, color.g, color.b]))
    }

    #[test]
    fn frames_advance_and_wrap() {
        let mut lights = LightStore::new(GridSize::new(2, 2));
        let coords = lights.size().all_coords();
        let mut mode = ShowImage::new(coords, vec![solid(2, 2, RED), solid(2, 2, GREEN)]);

        for expected in [RED, GREEN, RED, GREEN] {
            mode.update(&mut lights).unwrap();
            assert!(lights.iter().all(|(_, light)| light.shown_color() == expected));
        }
        assert_eq!(mode.current_frame(), 0);
    }

    #[test]
    fn single_frame_is_a_static_image() {
        let mut lights = LightStore::new(GridSize::new(2, 2));
        let mut mode = ShowImage::new(lights.size().all_coords(), vec![solid(2, 2, BLUE)]);
        for _ in 0..5 {
            mode.update(&mut lights).unwrap();
            assert_eq!(lights.shown_color(Coord::new(1, 1)).unwrap(), BLUE);
        }
    }

    #[test]
    fn pixels_map_column_to_x_and_row_to_y() {
        let mut lights = LightStore::new(GridSize::new(4, 4));
        let mut frame = solid(3, 2, WHITE);
        frame.put_pixel(2, 0, Rgb([255, 0, 0]));
        frame.put_pixel(0, 1, Rgb([0, 0, 255]));
        let coords = lights
            .size()
            .box_coords(Coord::new(1, 1), GridSize::new(2, 3))
            .unwrap();
        let mut mode = ShowImage::new(coords, vec![frame]);

        mode.update(&mut lights).unwrap();
        assert_eq!(lights.shown_color(Coord::new(1, 3)).unwrap(), RED);
        assert_eq!(lights.shown_color(Coord::new(2, 1)).unwrap(), BLUE);
        assert_eq!(lights.shown_color(Coord::new(1, 1)).unwrap(), WHITE);
        assert!(!lights.get(Coord::new(0, 0)).unwrap().on);
    }

    #[test]
    fn no_frames_is_an_update_error() {
        let mut lights = LightStore::new(GridSize::new(2, 2));
        let mut mode = ShowImage::new(lights.size().all_coords(), Vec::new());
        let err = mode.update(&mut lights).unwrap_err();
        assert!(matches!(err, Error::ModeUpdate { mode: "ShowImage", .. }));
    }

    #[test]
    fn frame_smaller_than_the_region_is_an_update_error() {
        let mut lights = LightStore::new(GridSize::new(4, 4));
        let mut mode = ShowImage::new(lights.size().all_coords(), vec![solid(2, 2, RED)]);
        assert!(mode.update(&mut lights).is_err());
    }
}
