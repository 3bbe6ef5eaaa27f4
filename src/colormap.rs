//! Diverging colormap and the symmetric scale shared by every frame.

use image::Rgb;

/// Number of entries in a sampled colormap lookup table.
const LUT_SIZE: usize = 256;

/// ColorBrewer RdBu, red end first.
const RDBU: [[u8; 3]; 11] = [
    [103, 0, 31],
    [178, 24, 43],
    [214, 96, 77],
    [244, 165, 130],
    [253, 219, 199],
    [247, 247, 247],
    [209, 229, 240],
    [146, 197, 222],
    [67, 147, 195],
    [33, 102, 172],
    [5, 48, 97],
];

/// A colormap sampled into a fixed lookup table over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    lut: Vec<[f64; 3]>,
}

impl Colormap {
    /// Builds a lookup table by linear interpolation between evenly spaced stops.
    pub fn from_stops(stops: &[[u8; 3]]) -> Self {
        let segments = stops.len().saturating_sub(1).max(1) as f64;
        let lut = (0..LUT_SIZE)
            .map(|i| {
                let x = i as f64 / (LUT_SIZE - 1) as f64 * segments;
                let lower = (x.floor() as usize).min(stops.len() - 1);
                let upper = (lower + 1).min(stops.len() - 1);
                let t = x - lower as f64;
                let (a, b) = (stops[lower], stops[upper]);
                [0, 1, 2].map(|c| (a[c] as f64 + t * (b[c] as f64 - a[c] as f64)) / 255.0)
            })
            .collect();

        Colormap { lut }
    }

    /// Blue for negative, red for positive.
    pub fn rdbu_r() -> Self {
        let mut stops = RDBU;
        stops.reverse();
        Self::from_stops(&stops)
    }

    /// Colour for a normalised value; values outside [0, 1] clamp to the ends.
    pub fn lookup(&self, x: f64) -> Rgb<u8> {
        let index = if x.is_nan() || x < 0.0 {
            0
        } else {
            ((x * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1)
        };
        let [r, g, b] = self.lut[index].map(|c| (c * 255.0).round() as u8);
        Rgb([r, g, b])
    }
}

/// Normalisation of anomalies over [-max_abs, +max_abs] onto a colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    max_abs: f64,
    colormap: Colormap,
}

impl ColorScale {
    pub fn symmetric(max_abs: f64, colormap: Colormap) -> Self {
        ColorScale {
            max_abs: max_abs.abs(),
            colormap,
        }
    }

    pub fn vmin(&self) -> f64 {
        -self.max_abs
    }

    pub fn vmax(&self) -> f64 {
        self.max_abs
    }

    /// Maps an anomaly onto [0, 1]. A degenerate scale puts everything at the
    /// neutral centre.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max_abs == 0.0 {
            return 0.5;
        }
        (value - self.vmin()) / (self.vmax() - self.vmin())
    }

    pub fn color(&self, value: f64) -> Rgb<u8> {
        self.colormap.lookup(self.normalize(value))
    }
}

// -- Tests -------------------------------------------------------------------
