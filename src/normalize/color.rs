//! Lexicon's fixed colour palette and the mapping from arbitrary colour input
//! onto it.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvalidValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    RedDark,
    Red,
    RedLight,
    RedOrange,
    Orange,
    Beige,
    YellowDark,
    Yellow,
    Lime,
    GreenLight,
    Green,
    GreenDark,
    Teal,
    Aqua,
    AquaDark,
    BlueLight,
    Blue,
    BlueDark,
    BlueViolet,
    Violet,
    VioletLight,
    Magenta,
    MagentaDark,
    MagentaRed,
    GreyLight,
    GreyDark,
    Black,
    White,
}

/// Palette entries with their reference RGB values.
pub const PALETTE: [(Color, &str, [u8; 3]); 28] = [
    (Color::RedDark, "red_dark", [158, 15, 7]),
    (Color::Red, "red", [230, 15, 13]),
    (Color::RedLight, "red_light", [242, 102, 92]),
    (Color::RedOrange, "red_orange", [239, 89, 15]),
    (Color::Orange, "orange", [232, 137, 20]),
    (Color::Beige, "beige", [255, 225, 148]),
    (Color::YellowDark, "yellow_dark", [245, 208, 1]),
    (Color::Yellow, "yellow", [245, 245, 10]),
    (Color::Lime, "lime", [186, 232, 22]),
    (Color::GreenLight, "green_light", [174, 245, 95]),
    (Color::Green, "green", [127, 231, 16]),
    (Color::GreenDark, "green_dark", [75, 140, 8]),
    (Color::Teal, "teal", [20, 222, 120]),
    (Color::Aqua, "aqua", [20, 222, 202]),
    (Color::AquaDark, "aqua_dark", [7, 148, 134]),
    (Color::BlueLight, "blue_light", [47, 168, 237]),
    (Color::Blue, "blue", [14, 88, 222]),
    (Color::BlueDark, "blue_dark", [0, 40, 171]),
    (Color::BlueViolet, "blue_violet", [132, 0, 255]),
    (Color::Violet, "violet", [170, 59, 255]),
    (Color::VioletLight, "violet_light", [198, 140, 243]),
    (Color::Magenta, "magenta", [230, 15, 222]),
    (Color::MagentaDark, "magenta_dark", [170, 0, 188]),
    (Color::MagentaRed, "magenta_red", [222, 17, 92]),
    (Color::GreyLight, "grey_light", [173, 173, 173]),
    (Color::GreyDark, "grey_dark", [92, 92, 92]),
    (Color::Black, "black", [48, 48, 48]),
    (Color::White, "white", [255, 255, 255]),
];

static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*#?([0-9a-f]{3}|[0-9a-f]{4}|[0-9a-f]{6}|[0-9a-f]{8})\s*$")
        .expect("valid regex")
});

impl Color {
    pub fn name(self) -> &'static str {
        PALETTE
            .iter()
            .find(|(color, _, _)| *color == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("white")
    }

    pub fn from_name(name: &str) -> Option<Color> {
        PALETTE
            .iter()
            .find(|(_, candidate, _)| *candidate == name)
            .map(|(color, _, _)| *color)
    }

    /// The palette entry closest to `rgb` by squared distance. Ties go to the
    /// earlier entry.
    pub fn nearest(rgb: [u8; 3]) -> Color {
        let distance = |reference: &[u8; 3]| -> i32 {
            (0..3)
                .map(|i| {
                    let d = i32::from(rgb[i]) - i32::from(reference[i]);
                    d * d
                })
                .sum()
        };
        PALETTE
            .iter()
            .min_by_key(|(_, _, reference)| distance(reference))
            .map(|(color, _, _)| *color)
            .unwrap_or(Color::White)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps colour input to a palette colour. `Ok(None)` means "no colour".
///
/// Accepts `null`/`"none"`, palette names, hex strings with optional alpha,
/// packed `0xRRGGBB` integers (higher bits masked off) and 3/4-element RGB(A)
/// arrays. Array channels `<= 1` are read as fractions of 255.
pub fn normalize_color(value: &Value) -> Result<Option<Color>, InvalidValue> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            if s.trim().eq_ignore_ascii_case("none") {
                return Ok(None);
            }
            if let Some(color) = Color::from_name(s) {
                return Ok(Some(color));
            }
            let caps = HEX_RE
                .captures(s)
                .ok_or_else(|| InvalidValue::new(format!("Unsupported string input {s:?}")))?;
            let mut hex: String = caps[1].to_string();
            if hex.len() <= 4 {
                hex = hex.chars().flat_map(|ch| [ch, ch]).collect();
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            match (channel(0), channel(2), channel(4)) {
                (Ok(r), Ok(g), Ok(b)) => Ok(Some(Color::nearest([r, g, b]))),
                _ => Err(InvalidValue::new(format!("Unsupported string input {s:?}"))),
            }
        }
        Value::Number(n) => {
            let packed = n
                .as_i64()
                .ok_or_else(|| InvalidValue::new(format!("Unsupported input type float: {n}")))?;
            if packed < 0 {
                return Err(InvalidValue::new(format!("Negative packed int {packed}")));
            }
            let packed = packed & 0xFF_FFFF;
            Ok(Some(Color::nearest([
                ((packed >> 16) & 0xFF) as u8,
                ((packed >> 8) & 0xFF) as u8,
                (packed & 0xFF) as u8,
            ])))
        }
        Value::Array(items) if items.len() == 3 || items.len() == 4 => {
            let mut rgb = [0u8; 3];
            for (slot, item) in rgb.iter_mut().zip(items) {
                let mut channel = item.as_f64().ok_or_else(|| {
                    InvalidValue::new(format!("Invalid RGB tuple values {value}"))
                })?;
                if channel <= 1.0 {
                    channel *= 255.0;
                }
                *slot = channel.round().clamp(0.0, 255.0) as u8;
            }
            Ok(Some(Color::nearest(rgb)))
        }
        _ => Err(InvalidValue::new(format!("Unsupported color input {value}"))),
    }
}
