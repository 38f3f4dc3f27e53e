use std::{fmt, ops::Add, str::FromStr, time::Duration};

use crate::foundation::error::{RevealError, RevealResult};

pub use kurbo::{BezPath, Point, Vec2};

/// Virtual time since the page's event loop started.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Timestamp(pub Duration);

impl Timestamp {
    /// Page start.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Timestamp `ms` milliseconds after page start.
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Milliseconds since page start, fractional.
    pub fn as_millis_f64(self) -> f64 {
        self.0.as_nanos() as f64 / 1_000_000.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

/// Straight-alpha sRGB colour as written into SVG paint attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32, // 0..=1
}

impl Color {
    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Colour with alpha in `[0, 1]`.
    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` or `rgba(r,g,b,a)`.
    pub fn parse(s: &str) -> RevealResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body);
        }
        Err(RevealError::validation(format!(
            "unsupported colour \"{s}\" (expected #hex or rgba())"
        )))
    }

    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }

    /// CSS/SVG paint string: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.alpha)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Color {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex(hex: &str) -> RevealResult<Color> {
    fn byte(pair: &str) -> RevealResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| RevealError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    if !hex.is_ascii() {
        return Err(RevealError::validation("hex colour must be ASCII"));
    }
    match hex.len() {
        3 => {
            let expand = |i: usize| byte(&hex[i..i + 1].repeat(2));
            Ok(Color::rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Ok(Color::rgb(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Ok(Color::rgba(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            f32::from(byte(&hex[6..8])?) / 255.0,
        )),
        _ => Err(RevealError::validation(
            "hex colour must be #RGB, #RRGGBB or #RRGGBBAA",
        )),
    }
}

fn parse_functional(body: &str) -> RevealResult<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(RevealError::validation(
            "rgba() colour must have 3 or 4 components",
        ));
    }

    let channel = |p: &str| {
        p.parse::<u8>()
            .map_err(|_| RevealError::validation(format!("invalid colour channel \"{p}\"")))
    };
    let alpha = match parts.get(3) {
        Some(a) => {
            let a: f32 = a
                .parse()
                .map_err(|_| RevealError::validation(format!("invalid alpha \"{a}\"")))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(RevealError::validation("alpha must be in [0, 1]"));
            }
            a
        }
        None => 1.0,
    };

    Ok(Color::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
