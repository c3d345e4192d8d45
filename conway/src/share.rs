// share.rs - Compact text form of the rule table and palette
//
// Rules are nine base-4 digits, entry 0 first. Colors are four RRGGBB hex
// triples in young/old/trail/dead order. Both travel together in a
// query-string style share code: `rules=001300000&colors=ff0000...`.

use std::fmt;
use std::str::FromStr;

use crate::color::{Palette, Rgba};
use crate::error::ConfigError;
use crate::rules::{Outcome, RULE_ENTRIES, RuleTable};

/// Hex digits of one color triple.
pub const COLOR_HEX_LEN: usize = 6;
/// Hex digits of a whole palette.
pub const PALETTE_HEX_LEN: usize = COLOR_HEX_LEN * 4;

pub fn encode_rules(rules: &RuleTable) -> String {
    rules
        .outcomes()
        .iter()
        .map(|outcome| char::from(b'0' + outcome.digit()))
        .collect()
}

pub fn decode_rules(text: &str) -> Result<RuleTable, ConfigError> {
    let text = text.trim();
    let found = text.chars().count();

    if found == RULE_ENTRIES * 2 && text.chars().all(|c| c == '0' || c == '1') {
        return Err(ConfigError::LegacyRuleFormat);
    }
    if found != RULE_ENTRIES {
        return Err(ConfigError::RuleLength { expected: RULE_ENTRIES, found });
    }

    let mut outcomes = [Outcome::Die; RULE_ENTRIES];
    for (index, (slot, c)) in outcomes.iter_mut().zip(text.chars()).enumerate() {
        *slot = c
            .to_digit(4)
            .and_then(|digit| Outcome::from_digit(digit as u8))
            .ok_or(ConfigError::RuleDigit { index, found: c })?;
    }
    Ok(RuleTable::new(outcomes))
}

pub fn encode_color(color: Rgba) -> String {
    format!("{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Parses one `RRGGBB` triple (an optional leading `#` is accepted).
/// Alpha is always opaque.
pub fn decode_color(text: &str) -> Result<Rgba, ConfigError> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != COLOR_HEX_LEN {
        return Err(ConfigError::ColorLength { expected: COLOR_HEX_LEN, found: hex.len() });
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::ColorHex(text.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| ConfigError::ColorHex(text.to_string()))
    };
    Ok(Rgba::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn encode_palette(palette: &Palette) -> String {
    palette.colors().into_iter().map(encode_color).collect()
}

pub fn decode_palette(text: &str) -> Result<Palette, ConfigError> {
    let text = text.trim();
    if text.len() != PALETTE_HEX_LEN || !text.is_ascii() {
        return Err(ConfigError::ColorLength { expected: PALETTE_HEX_LEN, found: text.chars().count() });
    }

    let mut colors = [Rgba::BLACK; 4];
    for (slot, start) in colors.iter_mut().zip((0..PALETTE_HEX_LEN).step_by(COLOR_HEX_LEN)) {
        *slot = decode_color(&text[start..start + COLOR_HEX_LEN])?;
    }
    Ok(Palette::from_colors(colors))
}

/// Rule table and/or palette as carried in a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShareCode {
    pub rules: Option<RuleTable>,
    pub palette: Option<Palette>,
}

impl ShareCode {
    pub fn new(rules: RuleTable, palette: Palette) -> Self {
        Self { rules: Some(rules), palette: Some(palette) }
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        if let Some(rules) = &self.rules {
            write!(f, "rules={}", encode_rules(rules))?;
            separator = "&";
        }
        if let Some(palette) = &self.palette {
            write!(f, "{separator}colors={}", encode_palette(palette))?;
        }
        Ok(())
    }
}

impl FromStr for ShareCode {
    type Err = ConfigError;

    /// Parses `rules=...&colors=...`. Keys may come in any order, either may
    /// be missing and a leading `?` is ignored. Nothing is returned unless
    /// every present segment is valid.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut code = ShareCode::default();
        let query = text.trim().trim_start_matches('?');

        for segment in query.split('&').filter(|segment| !segment.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConfigError::ShareSegment(segment.to_string()))?;
            match key {
                "rules" => code.rules = Some(decode_rules(value)?),
                "colors" => code.palette = Some(decode_palette(value)?),
                other => return Err(ConfigError::ShareKey(other.to_string())),
            }
        }
        Ok(code)
    }
}

impl FromStr for RuleTable {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        decode_rules(text)
    }
}

impl TryFrom<String> for RuleTable {
    type Error = ConfigError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        decode_rules(&text)
    }
}

impl From<RuleTable> for String {
    fn from(rules: RuleTable) -> Self {
        encode_rules(&rules)
    }
}
