use std::sync::OnceLock;

use image::{GrayImage, RgbImage};
use ndarray::Array2;
use statrs::statistics::Statistics;

use crate::image_utils::{centered_magnitude_spectrum, gray_to_array, laplacian, rgb_to_gray};

/// Read-only views derived from one decoded image. The grayscale raster is
/// built eagerly; the Laplacian variance and the magnitude spectrum are
/// computed on first use and cached, so extractors running on different
/// threads share a single computation.
pub struct DerivedViews<'a> {
    rgb: &'a RgbImage,
    gray: GrayImage,
    laplacian_variance: OnceLock<f64>,
    spectrum: OnceLock<Array2<f64>>,
}

impl<'a> DerivedViews<'a> {
    pub fn new(rgb: &'a RgbImage) -> Self {
        Self {
            rgb,
            gray: rgb_to_gray(rgb),
            laplacian_variance: OnceLock::new(),
            spectrum: OnceLock::new(),
        }
    }

    pub fn rgb(&self) -> &RgbImage {
        self.rgb
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// Population variance of the Laplacian response over every pixel.
    pub fn laplacian_variance(&self) -> f64 {
        *self.laplacian_variance.get_or_init(|| {
            let response = laplacian(&self.gray);
            if response.is_empty() {
                0.0
            } else {
                response.iter().population_variance()
            }
        })
    }

    pub fn spectrum(&self) -> &Array2<f64> {
        self.spectrum
            .get_or_init(|| centered_magnitude_spectrum(&gray_to_array(&self.gray)))
    }
}
