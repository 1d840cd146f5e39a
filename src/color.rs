//! RGB colors and their textual forms.
//!
//! Colors reach the library as strings inside color sets: HTML color names
//! (case-insensitive, `"springGreen"`), hex strings with three or six digits
//! (`"#0f0"`, `"#00ff00"`) or comma separated channels (`"0, 255, 0"`). All of
//! them canonicalize to an [`Rgb`] triple, which is what gets emitted as a
//! 24-bit SGR sequence.
//!
//! ```rust
//! use pbar::color::Rgb;
//!
//! let lime: Rgb = "lime".parse().unwrap();
//! assert_eq!(lime, Rgb::new(0, 255, 0));
//! assert_eq!(Rgb::from_hex("#0F0").unwrap().to_hex(), "#00ff00");
//! ```

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn from_u32(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Parses a `#rgb` or `#rrggbb` hex string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] when the string does not start with `#`,
    /// has a length other than 3 or 6 digits, or contains non-hex digits.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(hex.to_string());
        let digits = hex.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        u32::from_str_radix(&expanded, 16)
            .map(Self::from_u32)
            .map_err(|_| invalid())
    }

    /// Formats the color as a lower-case `#rrggbb` string.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses any accepted color form: a color name, a hex string or
    /// comma separated channels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] when the value matches none of them.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if let Some(rgb) = NAMED_COLORS.get(trimmed.to_ascii_lowercase().as_str()) {
            return Ok(*rgb);
        }
        if trimmed.starts_with('#') {
            return Self::from_hex(trimmed);
        }
        if trimmed.contains(',') {
            return Self::from_channels(trimmed);
        }
        Err(Error::InvalidColor(value.to_string()))
    }

    fn from_channels(value: &str) -> Result<Self> {
        let channels = value
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidColor(value.to_string()))?;

        match channels.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(Error::InvalidColor(value.to_string())),
        }
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

// HTML color names
static NAMED_COLORS: Lazy<HashMap<&'static str, Rgb>> = Lazy::new(|| {
    COLOR_TABLE
        .iter()
        .map(|(name, value)| (*name, Rgb::from_u32(*value)))
        .collect()
});

const COLOR_TABLE: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgrey", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370d8),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xd87093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_canonicalizes() {
        assert_eq!(Rgb::from_hex("#0F0").unwrap().to_hex(), "#00ff00");
        assert_eq!(Rgb::from_hex("#abc").unwrap().to_hex(), "#aabbcc");
        assert_eq!(Rgb::from_hex("#15F28D").unwrap().to_hex(), "#15f28d");
        assert_eq!(Rgb::from_hex("#ff4d4d").unwrap().to_hex(), "#ff4d4d");
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        for bad in ["", "#", "#12", "#1234", "#gggggg", "00ff00", "#00ff00ff"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(Error::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_names_are_case_insensitive() {
        assert_eq!(Rgb::parse("springGreen").unwrap(), Rgb::new(0, 255, 127));
        assert_eq!(Rgb::parse("WHITE").unwrap(), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::parse(" darkred ").unwrap(), Rgb::new(139, 0, 0));
    }

    #[test]
    fn test_parse_channels() {
        assert_eq!(Rgb::parse("255, 100, 0").unwrap(), Rgb::new(255, 100, 0));
        assert!(Rgb::parse("255,100").is_err());
        assert!(Rgb::parse("256,0,0").is_err());
    }

    #[test]
    fn test_parse_unknown_name() {
        assert!(matches!(
            "notacolor".parse::<Rgb>(),
            Err(Error::InvalidColor(value)) if value == "notacolor"
        ));
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "#010203");
    }
}
