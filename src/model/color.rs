use std::fmt;

/// Panel background used when the desktop prefers a dark appearance.
pub const DARK_FALLBACK: Rgb = Rgb::new(0x13, 0x13, 0x13);
/// Panel background used for every other appearance.
pub const LIGHT_FALLBACK: Rgb = Rgb::new(0xFA, 0xFA, 0xFA);

/// Backgrounds brighter than this get dark text.
pub const LIGHT_THRESHOLD: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Rec. 709 luma over the raw 0-255 channels.
    pub fn luminance(self) -> f64 {
        0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b)
    }

    pub fn is_light(self) -> bool { self.luminance() > LIGHT_THRESHOLD }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// A color as reported by the pixel sampler, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl NormalizedColor {
    pub fn new(red: f64, green: f64, blue: f64) -> Self { Self { red, green, blue } }

    pub fn to_rgb(self) -> Rgb {
        let channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(self.red), channel(self.green), channel(self.blue))
    }
}

/// Picks the sample with the middle luminance, so a single probe landing on a
/// button or icon does not decide the color.
pub fn median_by_luminance(samples: &[Rgb]) -> Option<Rgb> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));
    Some(sorted[sorted.len() / 2])
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ColorScheme {
    #[default]
    Default,
    PreferDark,
    PreferLight,
}

impl ColorScheme {
    pub fn is_dark(self) -> bool { matches!(self, ColorScheme::PreferDark) }

    pub fn fallback_color(self) -> Rgb {
        if self.is_dark() { DARK_FALLBACK } else { LIGHT_FALLBACK }
    }
}
