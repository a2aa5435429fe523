use serde::{Deserialize, Serialize};

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// A fixed table of `PALETTE_SIZE` opaque RGBA colors.
///
/// Escape counts are mapped to an index in `0..PALETTE_SIZE` by the color
/// mapper; the palette itself knows nothing about iterations.
#[derive(Clone)]
pub struct Palette {
    pub name: &'static str,
    colors: [[u8; 4]; PALETTE_SIZE],
}

impl Palette {
    /// Build a palette by sampling `f` at `t = i / 255` for every entry.
    ///
    /// Channel values returned by `f` are in `0.0..=1.0` and are truncated to
    /// bytes after scaling by 255.
    pub fn from_fn(name: &'static str, f: impl Fn(f64) -> [f64; 3]) -> Self {
        let mut colors = [[0, 0, 0, 255]; PALETTE_SIZE];
        for (i, color) in colors.iter_mut().enumerate() {
            let t = i as f64 / (PALETTE_SIZE - 1) as f64;
            let [r, g, b] = f(t);
            *color = [channel(r), channel(g), channel(b), 255];
        }
        Self { name, colors }
    }

    /// Color at `index`, clamped to the last entry.
    #[inline]
    pub fn color(&self, index: usize) -> [u8; 4] {
        self.colors[index.min(PALETTE_SIZE - 1)]
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        ColorScheme::default().palette()
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette").field("name", &self.name).finish()
    }
}

#[inline]
fn channel(v: f64) -> u8 {
    (v * 255.0).clamp(0.0, 255.0) as u8
}

// ---------------------------------------------------------------------------
// Builtin schemes
// ---------------------------------------------------------------------------

/// The palettes reachable from the UI, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    HotCold,
    Grayscale,
    Rainbow,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [Self::HotCold, Self::Grayscale, Self::Rainbow];

    pub fn next(self) -> Self {
        match self {
            Self::HotCold => Self::Grayscale,
            Self::Grayscale => Self::Rainbow,
            Self::Rainbow => Self::HotCold,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::HotCold => Palette::from_fn("Hot/Cold", hot_cold),
            Self::Grayscale => Palette::from_fn("Grayscale", |t| [t, t, t]),
            Self::Rainbow => Palette::from_fn("Rainbow", rainbow),
        }
    }
}

/// Bernstein-polynomial gradient: dark blue through green to red.
fn hot_cold(t: f64) -> [f64; 3] {
    let u = 1.0 - t;
    [
        9.0 * u * t * t * t,
        15.0 * u * u * t * t,
        8.5 * u * u * u * t,
    ]
}

/// Fully saturated hue sweep, red back to red.
fn rainbow(t: f64) -> [f64; 3] {
    let hp = t * 6.0;
    let x = 1.0 - (hp % 2.0 - 1.0).abs();
    match hp as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_palettes_have_correct_size() {
        for scheme in ColorScheme::ALL {
            let pal = scheme.palette();
            assert_eq!(pal.colors().len(), PALETTE_SIZE);
            assert!(pal.colors().iter().all(|c| c[3] == 255));
        }
    }

    #[test]
    fn hot_cold_endpoints_are_black() {
        let p = ColorScheme::HotCold.palette();
        assert_eq!(p.color(0), [0, 0, 0, 255]);
        assert_eq!(p.color(255), [0, 0, 0, 255]);
    }

    #[test]
    fn hot_cold_matches_polynomials() {
        let p = ColorScheme::HotCold.palette();
        // t = 128/255
        let t = 128.0 / 255.0;
        let u = 1.0 - t;
        let expected = [
            (9.0 * u * t * t * t * 255.0) as u8,
            (15.0 * u * u * t * t * 255.0) as u8,
            (8.5 * u * u * u * t * 255.0) as u8,
            255,
        ];
        assert_eq!(p.color(128), expected);
    }

    #[test]
    fn grayscale_is_monotonic_ramp() {
        let p = ColorScheme::Grayscale.palette();
        assert_eq!(p.color(0), [0, 0, 0, 255]);
        assert_eq!(p.color(255), [255, 255, 255, 255]);
        for w in p.colors().windows(2) {
            assert!(w[1][0] >= w[0][0]);
            assert_eq!(w[1][0], w[1][1]);
            assert_eq!(w[1][1], w[1][2]);
        }
    }

    #[test]
    fn rainbow_starts_red() {
        let p = ColorScheme::Rainbow.palette();
        assert_eq!(p.color(0), [255, 0, 0, 255]);
    }

    #[test]
    fn index_is_clamped() {
        let p = ColorScheme::Grayscale.palette();
        assert_eq!(p.color(10_000), p.color(255));
    }

    #[test]
    fn schemes_cycle_through_all() {
        let mut s = ColorScheme::HotCold;
        s = s.next();
        assert_eq!(s, ColorScheme::Grayscale);
        s = s.next();
        assert_eq!(s, ColorScheme::Rainbow);
        assert_eq!(s.next(), ColorScheme::HotCold);
    }

    #[test]
    fn custom_palette_from_fn() {
        let p = Palette::from_fn("Red", |_| [1.0, 0.0, 0.0]);
        assert!(p.colors().iter().all(|&c| c == [255, 0, 0, 255]));
    }

    /// Hue in sextants (0..6) of a fully saturated color.
    fn hue(c: [f64; 3]) -> f64 {
        let [r, g, b] = c;
        let max = r.max(g).max(b);
        let d = max - r.min(g).min(b);
        if d == 0.0 {
            0.0
        } else if max == r {
            ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        }
    }

    #[test]
    fn rainbow_hue_rises_with_position() {
        let mut previous = 0.0;
        for i in 0..1000 {
            let t = i as f64 / 1000.0;
            let h = hue(rainbow(t));
            assert!((h - t * 6.0).abs() < 1e-9, "hue {h} at t = {t}");
            assert!(h + 1e-9 >= previous, "hue fell at t = {t}");
            previous = h;
        }
    }

    #[test]
    fn hot_cold_moves_from_blue_through_green_to_red() {
        // Dominant channel index: 2 (blue), 1 (green), 0 (red).
        let dominant = |c: [f64; 3]| {
            if c[0] > c[1] && c[0] > c[2] {
                0
            } else if c[1] > c[2] {
                1
            } else {
                2
            }
        };
        let mut previous = 2;
        for i in 1..1000 {
            let d = dominant(hot_cold(i as f64 / 1000.0));
            assert!(d <= previous, "dominant channel went back at step {i}");
            previous = d;
        }
        assert_eq!(previous, 0);
    }
}
