use image::{GrayImage, Luma, RgbImage};
use ndarray::Array2;
use num_complex::Complex;
use rayon::{iter::ParallelIterator, slice::ParallelSliceMut};
use rustfft::FftPlanner;

/// Luminance reduction with the fixed-point BT.601 weights used by most
/// imaging libraries (`0.299 R + 0.587 G + 0.114 B`, rounded).
pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let lum = (pixel[0] as u32 * 4899 + pixel[1] as u32 * 9617 + pixel[2] as u32 * 1868 + 8192)
            >> 14;
        gray.put_pixel(x, y, Luma([lum.min(255) as u8]));
    }

    gray
}

pub fn gray_to_array(image: &GrayImage) -> Array2<f64> {
    let (width, height) = image.dimensions();
    let mut arr = Array2::zeros((height as usize, width as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        arr[[y as usize, x as usize]] = pixel[0] as f64;
    }

    arr
}

fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }

    let last = len as isize - 1;
    let mut i = index.abs();
    if i > last {
        i = 2 * last - i;
    }

    i as usize
}

/// 4-neighbour discrete Laplacian. Borders mirror without repeating the edge
/// pixel (`dcb|abcd|cba`).
pub fn laplacian(gray: &GrayImage) -> Array2<f64> {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);

    let px = |x: isize, y: isize| -> f64 {
        gray.get_pixel(reflect_101(x, w) as u32, reflect_101(y, h) as u32)[0] as f64
    };

    Array2::from_shape_fn((h, w), |(y, x)| {
        let (x, y) = (x as isize, y as isize);
        px(x - 1, y) + px(x + 1, y) + px(x, y - 1) + px(x, y + 1) - 4.0 * px(x, y)
    })
}

pub fn channel_histogram(image: &RgbImage, channel: usize) -> [u32; 256] {
    let mut histogram = [0u32; 256];

    for pixel in image.pixels() {
        histogram[pixel[channel] as usize] += 1;
    }

    histogram
}

/// Summed-area tables of intensity and squared intensity. Window statistics
/// are exact integer arithmetic until the final division.
pub struct IntegralImage {
    stride: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    pub fn new(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        let (w, h) = (width as usize, height as usize);
        let stride = w + 1;

        let mut sum = vec![0u64; stride * (h + 1)];
        let mut sum_sq = vec![0u64; stride * (h + 1)];

        for y in 0..h {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;

            for x in 0..w {
                let v = gray.get_pixel(x as u32, y as u32)[0] as u64;
                row_sum += v;
                row_sq += v * v;

                sum[(y + 1) * stride + x + 1] = sum[y * stride + x + 1] + row_sum;
                sum_sq[(y + 1) * stride + x + 1] = sum_sq[y * stride + x + 1] + row_sq;
            }
        }

        Self { stride, sum, sum_sq }
    }

    fn rect(&self, table: &[u64], x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let s = self.stride;
        table[y1 * s + x1] + table[y0 * s + x0] - table[y0 * s + x1] - table[y1 * s + x0]
    }

    /// Population variance over `[x0, x1) x [y0, y1)`.
    pub fn window_variance(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        let n = ((x1 - x0) * (y1 - y0)) as u64;
        if n == 0 {
            return 0.0;
        }

        let s = self.rect(&self.sum, x0, y0, x1, y1);
        let sq = self.rect(&self.sum_sq, x0, y0, x1, y1);

        (n * sq - s * s) as f64 / (n * n) as f64
    }
}

/// Magnitude of the 2-D DFT with the zero-frequency bin moved to
/// `(height / 2, width / 2)`.
pub fn centered_magnitude_spectrum(intensity: &Array2<f64>) -> Array2<f64> {
    let (h, w) = intensity.dim();
    if h == 0 || w == 0 {
        return Array2::zeros((h, w));
    }

    let mut planner = FftPlanner::<f64>::new();
    let row_fft = planner.plan_fft_forward(w);
    let col_fft = planner.plan_fft_forward(h);

    let mut data = intensity
        .iter()
        .map(|&v| Complex::new(v, 0.0))
        .collect::<Vec<_>>();

    data.par_chunks_exact_mut(w)
        .for_each(|row| row_fft.process(row));

    let mut column = vec![Complex::new(0.0, 0.0); h];
    for x in 0..w {
        for y in 0..h {
            column[y] = data[y * w + x];
        }
        col_fft.process(&mut column);
        for y in 0..h {
            data[y * w + x] = column[y];
        }
    }

    let mut spectrum = Array2::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            spectrum[[(y + h / 2) % h, (x + w / 2) % w]] = data[y * w + x].norm();
        }
    }

    spectrum
}

pub fn extract_block(image: &GrayImage, x: u32, y: u32, size: u32) -> Vec<u8> {
    let mut block = Vec::with_capacity((size * size) as usize);

    for dy in 0..size {
        for dx in 0..size {
            if x + dx < image.width() && y + dy < image.height() {
                block.push(image.get_pixel(x + dx, y + dy)[0]);
            }
        }
    }

    block
}

/// Non-overlapping `size x size` blocks in row-major order, at most `limit`
/// of them. Partial blocks at the right and bottom edges are skipped.
pub fn partition_blocks(image: &GrayImage, size: u32, limit: usize) -> Vec<Vec<u8>> {
    let (width, height) = image.dimensions();
    let (cols, rows) = (width / size, height / size);

    (0..rows)
        .flat_map(|by| (0..cols).map(move |bx| (bx * size, by * size)))
        .take(limit)
        .map(|(x, y)| extract_block(image, x, y, size))
        .collect()
}

pub fn block_mean(block: &[u8]) -> f64 {
    if block.is_empty() {
        return 0.0;
    }
    block.iter().map(|&v| v as f64).sum::<f64>() / block.len() as f64
}

/// Pearson correlation coefficient, `None` when either block is flat.
pub fn pearson_correlation(a: &[u8], b: &[u8]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mean_a = block_mean(a);
    let mean_b = block_mean(b);

    let mut numerator = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        let da = va as f64 - mean_a;
        let db = vb as f64 - mean_b;
        numerator += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    let denom = (denom_a * denom_b).sqrt();
    if denom == 0.0 {
        return None;
    }

    let r = numerator / denom;
    (!r.is_nan()).then_some(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_gray_weights() {
        let image = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([255, 255, 255]),
        });
        let gray = rgb_to_gray(&image);

        assert_eq!(gray.get_pixel(0, 0)[0], 76);
        assert_eq!(gray.get_pixel(1, 0)[0], 150);
        assert_eq!(gray.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn test_laplacian_flat_is_zero() {
        let gray = GrayImage::from_pixel(8, 8, Luma([77]));
        assert!(laplacian(&gray).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_laplacian_reflects_border() {
        // single bright column at x = 0 mirrors onto x = -1 as column 1
        let gray = GrayImage::from_fn(4, 3, |x, _| Luma([if x == 0 { 10 } else { 0 }]));
        let lap = laplacian(&gray);

        assert_eq!(lap[[1, 0]], -20.0);
        assert_eq!(lap[[1, 1]], 10.0);
        assert_eq!(lap[[1, 2]], 0.0);
    }

    #[test]
    fn test_window_variance_matches_direct() {
        let gray = GrayImage::from_fn(10, 10, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let integral = IntegralImage::new(&gray);

        let block = extract_block(&gray, 2, 3, 4);
        let mean = block_mean(&block);
        let direct = block.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / block.len() as f64;

        assert!((integral.window_variance(2, 3, 6, 7) - direct).abs() < 1e-9);
    }

    #[test]
    fn test_spectrum_of_constant_is_centered_dc() {
        let intensity = Array2::from_elem((8, 6), 2.0);
        let spectrum = centered_magnitude_spectrum(&intensity);

        assert!((spectrum[[4, 3]] - 96.0).abs() < 1e-9);
        let rest = spectrum.sum() - spectrum[[4, 3]];
        assert!(rest.abs() < 1e-9);
    }

    #[test]
    fn test_partition_drops_partial_blocks() {
        let gray = GrayImage::new(70, 40);
        let blocks = partition_blocks(&gray, 32, usize::MAX);

        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.len() == 32 * 32));
    }

    #[test]
    fn test_pearson() {
        let a = [1u8, 2, 3, 4];
        let b = [2u8, 4, 6, 8];
        let flat = [5u8, 5, 5, 5];

        assert!((pearson_correlation(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(pearson_correlation(&a, &flat), None);
    }
}
