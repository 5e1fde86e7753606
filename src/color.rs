//! Neon palette and hue cycling

use crate::util::hsv_to_rgb;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Linear RGB in 0.0-1.0 (may exceed 1.0 after brightness scaling)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Quantize to 8-bit channels, saturating
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

/// Configured color: one of eight fixed neon tones, or hue cycling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ColorKind {
    Green,
    Yellow,
    Red,
    Blue,
    Cyan,
    Pink,
    Orange,
    Purple,
    Random,
}

impl ColorKind {
    pub const ALL: [ColorKind; 9] = [
        ColorKind::Green,
        ColorKind::Yellow,
        ColorKind::Red,
        ColorKind::Blue,
        ColorKind::Cyan,
        ColorKind::Pink,
        ColorKind::Orange,
        ColorKind::Purple,
        ColorKind::Random,
    ];

    /// Configuration token
    pub fn name(&self) -> &'static str {
        match self {
            ColorKind::Green => "GREEN",
            ColorKind::Yellow => "YELLOW",
            ColorKind::Red => "RED",
            ColorKind::Blue => "BLUE",
            ColorKind::Cyan => "CYAN",
            ColorKind::Pink => "PINK",
            ColorKind::Orange => "ORANGE",
            ColorKind::Purple => "PURPLE",
            ColorKind::Random => "RANDOM",
        }
    }

    /// Fixed neon tone; `Random` has none and maps to white
    pub fn palette(&self) -> Rgb {
        match self {
            ColorKind::Green => Rgb::new(0.1, 1.0, 0.4),
            ColorKind::Yellow => Rgb::new(1.0, 0.95, 0.2),
            ColorKind::Red => Rgb::new(1.0, 0.15, 0.15),
            ColorKind::Blue => Rgb::new(0.2, 0.6, 1.0),
            ColorKind::Cyan => Rgb::new(0.2, 1.0, 1.0),
            ColorKind::Pink => Rgb::new(1.0, 0.3, 0.8),
            ColorKind::Orange => Rgb::new(1.0, 0.55, 0.15),
            ColorKind::Purple => Rgb::new(0.75, 0.3, 1.0),
            ColorKind::Random => Rgb::new(1.0, 1.0, 1.0),
        }
    }
}

impl FromStr for ColorKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Draw color for a shape: palette tone, or the animated hue at full
/// saturation and value for `Random`
pub fn shape_color(kind: ColorKind, hue: f32) -> Rgb {
    match kind {
        ColorKind::Random => {
            let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
            Rgb::new(r, g, b)
        },
        fixed => fixed.palette(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(ColorKind::Green.palette(), Rgb::new(0.1, 1.0, 0.4));
        assert_eq!(ColorKind::Purple.palette(), Rgb::new(0.75, 0.3, 1.0));
        assert_eq!(shape_color(ColorKind::Red, 0.7), ColorKind::Red.palette());
    }

    #[test]
    fn test_random_follows_hue() {
        let red = shape_color(ColorKind::Random, 0.0);
        assert_eq!(red.to_rgb8(), (255, 0, 0));
        let green = shape_color(ColorKind::Random, 1.0 / 3.0);
        assert_eq!(green.to_rgb8(), (0, 255, 0));
        let blue = shape_color(ColorKind::Random, 2.0 / 3.0);
        assert_eq!(blue.to_rgb8(), (0, 0, 255));
    }

    #[test]
    fn test_brightness_saturates() {
        let c = ColorKind::Yellow.palette().scale(3.0);
        assert_eq!(c.to_rgb8(), (255, 255, 153));
    }

    #[test]
    fn test_color_names_parse() {
        for kind in ColorKind::ALL {
            assert_eq!(kind.name().to_lowercase().parse(), Ok(kind));
        }
        assert!("MAGENTA".parse::<ColorKind>().is_err());
    }
}
