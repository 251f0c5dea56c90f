//! Linear and stepped colormaps for summit points.

use serde::Serialize;

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl Rgb {
    /// `magenta` (`#ff00ff`).
    pub const MAGENTA: Self = Self::from_u8(0xff, 0x00, 0xff);
    /// `orange` (`#ffa500`).
    pub const ORANGE: Self = Self::from_u8(0xff, 0xa5, 0x00);
    /// `red` (`#ff0000`).
    pub const RED: Self = Self::from_u8(0xff, 0x00, 0x00);

    /// Builds a color from 8-bit components.
    #[must_use]
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    fn lerp(self, other: Self, p: f64) -> Self {
        Self {
            r: (other.r - self.r).mul_add(p, self.r),
            g: (other.g - self.g).mul_add(p, self.g),
            b: (other.b - self.b).mul_add(p, self.b),
        }
    }

    /// Formats as `#rrggbb`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hex(self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.9999) as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Colors interpolated linearly between anchor values.
///
/// Anchors are sorted by value and there are at least two of them.
#[derive(Debug, Clone, PartialEq)]
struct LinearColormap {
    stops: Vec<(f64, Rgb)>,
}

impl LinearColormap {
    fn vmin(&self) -> f64 {
        self.stops[0].0
    }

    fn vmax(&self) -> f64 {
        self.stops[self.stops.len() - 1].0
    }

    /// Interpolated color at `x`; values outside the range clamp to the ends.
    fn color_at(&self, x: f64) -> Rgb {
        let last = self.stops.len() - 1;
        if x <= self.stops[0].0 {
            return self.stops[0].1;
        }
        if x >= self.stops[last].0 {
            return self.stops[last].1;
        }

        let i = self.stops.iter().take_while(|(v, _)| *v <= x).count();
        let (lo, lo_color) = self.stops[i - 1];
        let (hi, hi_color) = self.stops[i];
        let p = if lo < hi { (x - lo) / (hi - lo) } else { 1.0 };
        lo_color.lerp(hi_color, p)
    }

    /// Splits the range into `n` equal bins, each with one solid color.
    ///
    /// Bin `i` takes the linear color at a point sliding from its lower
    /// edge (first bin) to its upper edge (last bin), so both end colors
    /// appear in the result.
    #[allow(clippy::cast_precision_loss)]
    fn to_step(&self, n: usize) -> StepColormap {
        let n = n.max(2);
        let (vmin, vmax) = (self.vmin(), self.vmax());
        let edges: Vec<f64> = (0..=n)
            .map(|i| (vmax - vmin).mul_add(i as f64 / n as f64, vmin))
            .collect();

        let colors = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                self.color_at(edges[i].mul_add(1.0 - t, edges[i + 1] * t))
            })
            .collect();

        StepColormap { edges, colors }
    }
}

/// Piecewise-constant colormap over `n` bins.
#[derive(Debug, Clone, PartialEq)]
pub struct StepColormap {
    edges: Vec<f64>,
    colors: Vec<Rgb>,
}

/// One legend row: a bin range and its color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendStep {
    /// Lower bin edge.
    pub lower: f64,
    /// Upper bin edge.
    pub upper: f64,
    /// `#rrggbb` color.
    pub color: String,
}

impl StepColormap {
    /// Color of the bin containing `x`; values outside the range clamp.
    #[must_use]
    pub fn color_at(&self, x: f64) -> Rgb {
        let last = self.colors.len() - 1;
        if x <= self.edges[0] {
            return self.colors[0];
        }
        if x >= self.edges[self.edges.len() - 1] {
            return self.colors[last];
        }
        let i = self.edges.iter().take_while(|e| **e <= x).count();
        self.colors[i - 1]
    }

    /// `#rrggbb` color for `x`.
    #[must_use]
    pub fn hex_at(&self, x: f64) -> String {
        self.color_at(x).to_hex()
    }

    /// Bins with their colors, lowest first.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendStep> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, color)| LegendStep {
                lower: self.edges[i],
                upper: self.edges[i + 1],
                color: color.to_hex(),
            })
            .collect()
    }
}

/// Summit points colormap: magenta at 1, orange at 5, red at 10, in 10 steps.
#[must_use]
pub fn points_colormap() -> StepColormap {
    LinearColormap {
        stops: vec![(1.0, Rgb::MAGENTA), (5.0, Rgb::ORANGE), (10.0, Rgb::RED)],
    }
    .to_step(10)
}
