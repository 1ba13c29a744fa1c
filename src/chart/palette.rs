use serde::{Deserialize, Serialize};

use crate::render::Color;

/// X11/CSS named colors used by the report.
pub mod named {
    use crate::render::Color;

    pub const SKYBLUE: Color = Color::rgb8(135, 206, 235);
    pub const LIGHTCORAL: Color = Color::rgb8(240, 128, 128);
    pub const DARKBLUE: Color = Color::rgb8(0, 0, 139);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
}

const DEEP: [Color; 10] = [
    Color::rgb8(0x4C, 0x72, 0xB0),
    Color::rgb8(0xDD, 0x84, 0x52),
    Color::rgb8(0x55, 0xA8, 0x68),
    Color::rgb8(0xC4, 0x4E, 0x52),
    Color::rgb8(0x81, 0x72, 0xB3),
    Color::rgb8(0x93, 0x78, 0x60),
    Color::rgb8(0xDA, 0x8B, 0xC3),
    Color::rgb8(0x8C, 0x8C, 0x8C),
    Color::rgb8(0xCC, 0xB9, 0x74),
    Color::rgb8(0x64, 0xB5, 0xCD),
];

const PASTEL: [Color; 10] = [
    Color::rgb8(0xA1, 0xC9, 0xF4),
    Color::rgb8(0xFF, 0xB4, 0x82),
    Color::rgb8(0x8D, 0xE5, 0xA1),
    Color::rgb8(0xFF, 0x9F, 0x9B),
    Color::rgb8(0xD0, 0xBB, 0xFF),
    Color::rgb8(0xDE, 0xBB, 0x9B),
    Color::rgb8(0xFA, 0xB0, 0xE4),
    Color::rgb8(0xCF, 0xCF, 0xCF),
    Color::rgb8(0xFF, 0xFE, 0xA3),
    Color::rgb8(0xB9, 0xF2, 0xF0),
];

/// Continuous color map defined by evenly spaced anchor colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colormap {
    Viridis,
    Rocket,
    Crest,
    Coolwarm,
}

impl Colormap {
    fn anchors(self) -> &'static [Color] {
        const VIRIDIS: [Color; 5] = [
            Color::rgb8(0x44, 0x01, 0x54),
            Color::rgb8(0x3B, 0x52, 0x8B),
            Color::rgb8(0x21, 0x91, 0x8C),
            Color::rgb8(0x5E, 0xC9, 0x62),
            Color::rgb8(0xFD, 0xE7, 0x25),
        ];
        const ROCKET: [Color; 5] = [
            Color::rgb8(0x03, 0x05, 0x1A),
            Color::rgb8(0x4C, 0x1D, 0x4B),
            Color::rgb8(0xA1, 0x1A, 0x5B),
            Color::rgb8(0xE8, 0x3F, 0x3F),
            Color::rgb8(0xFA, 0xEB, 0xDD),
        ];
        const CREST: [Color; 5] = [
            Color::rgb8(0xA5, 0xCD, 0x90),
            Color::rgb8(0x4F, 0xA5, 0x8F),
            Color::rgb8(0x25, 0x7D, 0x8B),
            Color::rgb8(0x2C, 0x4E, 0x86),
            Color::rgb8(0x2C, 0x1E, 0x3D),
        ];
        const COOLWARM: [Color; 5] = [
            Color::rgb8(0x3B, 0x4C, 0xC0),
            Color::rgb8(0x8D, 0xB0, 0xFE),
            Color::rgb8(0xDD, 0xDD, 0xDD),
            Color::rgb8(0xF4, 0x9A, 0x7B),
            Color::rgb8(0xB4, 0x04, 0x26),
        ];
        match self {
            Self::Viridis => &VIRIDIS,
            Self::Rocket => &ROCKET,
            Self::Crest => &CREST,
            Self::Coolwarm => &COOLWARM,
        }
    }

    /// Color at position `t` in `[0, 1]`; out-of-range values clamp.
    #[must_use]
    pub fn sample(self, t: f64) -> Color {
        let anchors = self.anchors();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (anchors.len() - 1) as f64;
        let index = (scaled.floor() as usize).min(anchors.len() - 2);
        anchors[index].lerp(anchors[index + 1], scaled - index as f64)
    }

    /// `n` colors that skip both extremes of the map.
    #[must_use]
    pub fn discrete(self, n: usize) -> Vec<Color> {
        (1..=n)
            .map(|index| self.sample(index as f64 / (n + 1) as f64))
            .collect()
    }
}

/// Named color palettes for categorical hue mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    Deep,
    Pastel,
    Viridis,
    Rocket,
    Crest,
}

impl Palette {
    #[must_use]
    pub fn colors(self, n: usize) -> Vec<Color> {
        let cycle = |colors: &[Color]| colors.iter().copied().cycle().take(n).collect();
        match self {
            Self::Deep => cycle(&DEEP),
            Self::Pastel => cycle(&PASTEL),
            Self::Viridis => Colormap::Viridis.discrete(n),
            Self::Rocket => Colormap::Rocket.discrete(n),
            Self::Crest => Colormap::Crest.discrete(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Colormap, Palette};

    #[test]
    fn qualitative_palettes_cycle() {
        let colors = Palette::Deep.colors(12);
        assert_eq!(colors.len(), 12);
        assert_eq!(colors[0], colors[10]);
    }

    #[test]
    fn continuous_palettes_skip_extremes() {
        let colors = Palette::Viridis.colors(2);
        assert_eq!(colors.len(), 2);
        assert_ne!(colors[0], Colormap::Viridis.sample(0.0));
        assert_ne!(colors[1], Colormap::Viridis.sample(1.0));
    }

    #[test]
    fn colormap_sample_hits_anchors() {
        assert_eq!(
            Colormap::Coolwarm.sample(0.5),
            crate::render::Color::rgb8(0xDD, 0xDD, 0xDD)
        );
        let low = Colormap::Coolwarm.sample(-3.0);
        assert_eq!(low, Colormap::Coolwarm.sample(0.0));
        low.validate().expect("valid color");
    }
}
