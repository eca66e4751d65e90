//! Gaussian and Laplacian pyramids.
//!
//! Reduce and expand use the 5-tap binomial kernel `[1 4 6 4 1] / 16` with
//! replicated borders. Expand is exact zero-insertion followed by the same
//! kernel scaled by 4, so a Laplacian pyramid collapses back to its source
//! bit-for-bit up to float rounding.
//!
//! # Complexity
//! - Reduce / expand: O(N) per level
//! - Full pyramid: O(4/3 × N)

/// Binomial kernel taps.
const KERNEL: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// A dense grid of `N`-channel samples, row-major.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Grid<const N: usize> {
    pub width: usize,
    pub height: usize,
    pub data: Vec<[f32; N]>,
}

impl<const N: usize> Grid<N> {
    pub fn new(width: usize, height: usize, data: Vec<[f32; N]>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { width, height, data }
    }

    fn at(&self, x: usize, y: usize) -> [f32; N] {
        self.data[y * self.width + x]
    }

    /// Elementwise `self - other`. Shapes must match.
    pub fn sub(&self, other: &Self) -> Self {
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| std::array::from_fn(|c| a[c] - b[c]))
            .collect();
        Self::new(self.width, self.height, data)
    }

    /// Elementwise `self + other`. Shapes must match.
    pub fn add(&self, other: &Self) -> Self {
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| std::array::from_fn(|c| a[c] + b[c]))
            .collect();
        Self::new(self.width, self.height, data)
    }

    /// Separable 5-tap binomial blur.
    pub fn blur(&self) -> Self {
        let horizontal = self.convolve_rows();
        horizontal.transpose().convolve_rows().transpose()
    }

    /// Blur then keep every second pixel. Output is `ceil(w / 2) × ceil(h / 2)`.
    pub fn reduce(&self) -> Self {
        let blurred = self.blur();
        let width = self.width.div_ceil(2);
        let height = self.height.div_ceil(2);
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(blurred.at(x * 2, y * 2));
            }
        }
        Self::new(width, height, data)
    }

    /// Upsample to `width × height` (at most twice the current size per axis).
    pub fn expand(&self, width: usize, height: usize) -> Self {
        self.expand_rows(width).transpose().expand_rows(height).transpose()
    }

    fn convolve_rows(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        let last = self.width.saturating_sub(1) as isize;
        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = [0.0_f32; N];
                for (k, tap) in KERNEL.iter().enumerate() {
                    let sx = (x as isize + k as isize - 2).clamp(0, last) as usize;
                    let px = self.at(sx, y);
                    for c in 0..N {
                        acc[c] += tap * px[c];
                    }
                }
                data.push(acc);
            }
        }
        Self::new(self.width, self.height, data)
    }

    /// Zero-insertion upsampling along x, filtered with `2 × KERNEL`.
    ///
    /// Even outputs sit on a source sample: `(s[i-1] + 6 s[i] + s[i+1]) / 8`.
    /// Odd outputs sit between two: `(s[i] + s[i+1]) / 2`.
    fn expand_rows(&self, width: usize) -> Self {
        let mut data = Vec::with_capacity(width * self.height);
        let last = self.width.saturating_sub(1);
        for y in 0..self.height {
            for x in 0..width {
                let i = (x / 2).min(last);
                let px = if x % 2 == 0 {
                    let left = self.at(i.saturating_sub(1), y);
                    let mid = self.at(i, y);
                    let right = self.at((i + 1).min(last), y);
                    std::array::from_fn(|c| (left[c] + 6.0 * mid[c] + right[c]) / 8.0)
                } else {
                    let left = self.at(i, y);
                    let right = self.at((i + 1).min(last), y);
                    std::array::from_fn(|c| (left[c] + right[c]) / 2.0)
                };
                data.push(px);
            }
        }
        Self::new(width, self.height, data)
    }

    fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.width {
            for y in 0..self.height {
                data.push(self.at(x, y));
            }
        }
        Self::new(self.height, self.width, data)
    }
}

/// Largest usable depth for an image of `width × height`.
///
/// Every reduce halves (rounding up), so a depth of `floor(log2(min)) + 1`
/// keeps the coarsest level at least one pixel wide. Always at least 1.
pub(crate) fn max_levels(width: usize, height: usize, requested: u32) -> usize {
    let min_side = width.min(height).max(1);
    let cap = min_side.ilog2() as usize + 1;
    (requested.max(1) as usize).min(cap)
}

/// Gaussian pyramid, finest level first.
pub(crate) fn gaussian_pyramid<const N: usize>(base: &Grid<N>, levels: usize) -> Vec<Grid<N>> {
    let mut pyramid = Vec::with_capacity(levels);
    pyramid.push(base.clone());
    for _ in 1..levels {
        let next = pyramid[pyramid.len() - 1].reduce();
        pyramid.push(next);
    }
    pyramid
}

/// Laplacian pyramid, finest level first. The last level is the coarsest
/// Gaussian level itself.
pub(crate) fn laplacian_pyramid<const N: usize>(base: &Grid<N>, levels: usize) -> Vec<Grid<N>> {
    let gaussian = gaussian_pyramid(base, levels);
    let mut pyramid = Vec::with_capacity(levels);
    for l in 0..gaussian.len() - 1 {
        let fine = &gaussian[l];
        let expanded = gaussian[l + 1].expand(fine.width, fine.height);
        pyramid.push(fine.sub(&expanded));
    }
    pyramid.push(gaussian[gaussian.len() - 1].clone());
    pyramid
}

/// Rebuild an image from its Laplacian pyramid.
pub(crate) fn collapse<const N: usize>(pyramid: &[Grid<N>]) -> Option<Grid<N>> {
    let (coarsest, rest) = pyramid.split_last()?;
    let mut acc = coarsest.clone();
    for level in rest.iter().rev() {
        acc = level.add(&acc.expand(level.width, level.height));
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn ramp(width: usize, height: usize) -> Grid<1> {
        let data = (0..width * height)
            .map(|i| [((i % width) as f32 * 0.37 + (i / width) as f32 * 0.11).sin()])
            .collect();
        Grid::new(width, height, data)
    }

    #[test]
    fn test_reduce_halves_rounding_up() {
        let g = ramp(9, 6).reduce();
        assert_eq!((g.width, g.height), (5, 3));
    }

    #[test]
    fn test_blur_keeps_constant() {
        let g = Grid::new(4, 3, vec![[0.7, 0.2]; 12]).blur();
        for px in &g.data {
            assert!((px[0] - 0.7).abs() < EPSILON);
            assert!((px[1] - 0.2).abs() < EPSILON);
        }
    }

    #[test]
    fn test_expand_keeps_constant() {
        let g = Grid::new(3, 2, vec![[0.4]; 6]).expand(5, 4);
        assert_eq!((g.width, g.height), (5, 4));
        assert!(g.data.iter().all(|px| (px[0] - 0.4).abs() < EPSILON));
    }

    #[test]
    fn test_laplacian_pyramid_collapses_to_source() {
        let base = ramp(13, 10);
        let levels = max_levels(13, 10, 6);
        let pyramid = laplacian_pyramid(&base, levels);
        assert_eq!(pyramid.len(), levels);
        let rebuilt = collapse(&pyramid).expect("non-empty pyramid");
        for (a, b) in rebuilt.data.iter().zip(&base.data) {
            assert!((a[0] - b[0]).abs() < EPSILON);
        }
    }

    #[test]
    fn test_max_levels_caps_by_size() {
        assert_eq!(max_levels(1, 1, 5), 1);
        assert_eq!(max_levels(8, 20, 10), 4);
        assert_eq!(max_levels(640, 480, 5), 5);
        assert_eq!(max_levels(640, 480, 0), 1);
    }

    #[test]
    fn test_collapse_empty_pyramid() {
        let empty: Vec<Grid<3>> = Vec::new();
        assert!(collapse(&empty).is_none());
    }
}
