//! Coordinate text rendering
//!
//! This module turns angle values into human-readable text under a set of
//! immutable [`FormatRules`]. Four styles are supported:
//! - `Decimal`: signed decimal degrees, e.g. `-122.3321`
//! - `DecimalDegree`: unsigned decimal degrees with a hemisphere label
//! - `DegreeDecimalMinute`: whole degrees plus a decimal minute
//! - `DegreeMinuteSecond`: whole degrees, whole minutes and decimal seconds

use crate::core::constants::{DEFAULT_DECIMAL_ROUNDING, DEFAULT_SEXAGESIMAL_ROUNDING};
use crate::core::AngleValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default degree glyph; see [`FormatRules::with_degree_glyph`]
pub const DEGREE_GLYPH: char = 'º';
/// Minute glyph emitted by the renderer
pub const MINUTE_GLYPH: char = '\'';
/// Second glyph emitted by the renderer
pub const SECOND_GLYPH: char = '"';

/// Target text style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FormatStyle {
    Decimal,
    DecimalDegree,
    DegreeDecimalMinute,
    #[default]
    DegreeMinuteSecond,
}

impl FormatStyle {
    /// Rounding applied when the rules leave it unset
    pub fn default_rounding(self) -> u8 {
        match self {
            FormatStyle::Decimal | FormatStyle::DecimalDegree => DEFAULT_DECIMAL_ROUNDING,
            FormatStyle::DegreeDecimalMinute | FormatStyle::DegreeMinuteSecond => {
                DEFAULT_SEXAGESIMAL_ROUNDING
            }
        }
    }
}

impl fmt::Display for FormatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatStyle::Decimal => "decimal",
            FormatStyle::DecimalDegree => "decimal-degree",
            FormatStyle::DegreeDecimalMinute => "degree-decimal-minute",
            FormatStyle::DegreeMinuteSecond => "degree-minute-second",
        };
        write!(f, "{}", name)
    }
}

/// Immutable description of how angle values render to text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatRules {
    /// Target style
    pub style: FormatStyle,
    /// Fractional digits; `None` uses the style default
    pub rounding: Option<u8>,
    /// Zero-pad degrees (2 digits latitude, 3 longitude) and minutes/seconds (2)
    pub leading_zeros: bool,
    /// Keep fractional zeros up to the rounding precision
    pub trailing_zeros: bool,
    /// Master switch for the degree, minute and second glyphs
    pub symbols: bool,
    pub degree_symbol: bool,
    /// Character written when the degree symbol is on
    pub degree_glyph: char,
    pub minute_symbol: bool,
    pub second_symbol: bool,
    /// Join numeric components with `-` instead of a space
    pub hyphens: bool,
    /// Put the hemisphere label before the value
    ///
    /// Ignored by the decimal style, which renders a signed value without a
    /// label.
    pub position_first: bool,
}

impl Default for FormatRules {
    fn default() -> Self {
        Self {
            style: FormatStyle::DegreeMinuteSecond,
            rounding: None,
            leading_zeros: false,
            trailing_zeros: false,
            symbols: true,
            degree_symbol: true,
            degree_glyph: DEGREE_GLYPH,
            minute_symbol: true,
            second_symbol: true,
            hyphens: false,
            position_first: true,
        }
    }
}

impl FormatRules {
    /// Default rules for the given style
    pub fn new(style: FormatStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn with_rounding(mut self, rounding: u8) -> Self {
        self.rounding = Some(rounding);
        self
    }

    pub fn with_leading_zeros(mut self, enabled: bool) -> Self {
        self.leading_zeros = enabled;
        self
    }

    pub fn with_trailing_zeros(mut self, enabled: bool) -> Self {
        self.trailing_zeros = enabled;
        self
    }

    pub fn with_symbols(mut self, enabled: bool) -> Self {
        self.symbols = enabled;
        self
    }

    /// Toggles the degree, minute and second glyphs individually
    pub fn with_unit_symbols(mut self, degree: bool, minute: bool, second: bool) -> Self {
        self.degree_symbol = degree;
        self.minute_symbol = minute;
        self.second_symbol = second;
        self
    }

    /// Swaps the degree character, e.g. `'°'` (U+00B0) for the default `'º'`
    pub fn with_degree_glyph(mut self, glyph: char) -> Self {
        self.degree_glyph = glyph;
        self
    }

    pub fn with_hyphens(mut self, enabled: bool) -> Self {
        self.hyphens = enabled;
        self
    }

    pub fn with_position_first(mut self, enabled: bool) -> Self {
        self.position_first = enabled;
        self
    }

    /// Rounding in effect for the configured style
    pub fn effective_rounding(&self) -> u8 {
        self.rounding.unwrap_or_else(|| self.style.default_rounding())
    }

    fn glyph(&self, enabled: bool, glyph: char) -> Option<char> {
        (self.symbols && enabled).then_some(glyph)
    }

    fn separator(&self) -> &'static str {
        if self.hyphens {
            "-"
        } else {
            " "
        }
    }
}

/// Renders one angle value
pub fn render_angle(angle: &AngleValue, rules: &FormatRules) -> String {
    match rules.style {
        FormatStyle::Decimal => render_decimal(angle, rules),
        FormatStyle::DecimalDegree => render_decimal_degree(angle, rules),
        FormatStyle::DegreeDecimalMinute => render_degree_decimal_minute(angle, rules),
        FormatStyle::DegreeMinuteSecond => render_degree_minute_second(angle, rules),
    }
}

/// Renders a latitude/longitude pair as one string
///
/// The decimal style separates the two values with `", "`, every other style
/// with a single space.
pub fn render_pair(latitude: &AngleValue, longitude: &AngleValue, rules: &FormatRules) -> String {
    let joiner = match rules.style {
        FormatStyle::Decimal => ", ",
        _ => " ",
    };
    format!(
        "{}{}{}",
        render_angle(latitude, rules),
        joiner,
        render_angle(longitude, rules)
    )
}

fn render_decimal(angle: &AngleValue, rules: &FormatRules) -> String {
    let digits = rules.effective_rounding();
    let value = round_to(angle.decimal_degree(), digits);
    let width = degree_width(angle, rules);
    let magnitude = format_number(value.abs(), digits, rules.trailing_zeros, 0, width);
    if value < 0.0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

fn render_decimal_degree(angle: &AngleValue, rules: &FormatRules) -> String {
    let digits = rules.effective_rounding();
    let value = round_to(angle.magnitude(), digits);
    let mut body = format_number(value, digits, rules.trailing_zeros, 0, degree_width(angle, rules));
    push_glyph(&mut body, rules.glyph(rules.degree_symbol, rules.degree_glyph));
    label(angle, body, rules)
}

fn render_degree_decimal_minute(angle: &AngleValue, rules: &FormatRules) -> String {
    let digits = rules.effective_rounding();
    let mut degrees = angle.degrees();
    let mut minute = round_to(angle.decimal_minute(), digits);
    if minute >= 60.0 && can_carry(angle, degrees) {
        degrees += 1;
        minute = 0.0;
    }

    let mut degree_text = pad_integer(degrees, degree_width(angle, rules));
    push_glyph(&mut degree_text, rules.glyph(rules.degree_symbol, rules.degree_glyph));

    let mut minute_text = format_number(minute, digits, rules.trailing_zeros, 1, minute_width(rules));
    push_glyph(&mut minute_text, rules.glyph(rules.minute_symbol, MINUTE_GLYPH));

    let body = [degree_text, minute_text].join(rules.separator());
    label(angle, body, rules)
}

fn render_degree_minute_second(angle: &AngleValue, rules: &FormatRules) -> String {
    let digits = rules.effective_rounding();
    let mut degrees = angle.degrees();
    let mut minutes = angle.minutes();
    let mut seconds = round_to(angle.seconds(), digits);
    if seconds >= 60.0 {
        seconds = 0.0;
        minutes += 1;
    }
    if minutes >= 60 && can_carry(angle, degrees) {
        minutes = 0;
        degrees += 1;
    }

    let mut degree_text = pad_integer(degrees, degree_width(angle, rules));
    push_glyph(&mut degree_text, rules.glyph(rules.degree_symbol, rules.degree_glyph));

    let mut minute_text = pad_integer(minutes, minute_width(rules));
    push_glyph(&mut minute_text, rules.glyph(rules.minute_symbol, MINUTE_GLYPH));

    let mut second_text = format_number(seconds, digits, rules.trailing_zeros, 0, minute_width(rules));
    push_glyph(&mut second_text, rules.glyph(rules.second_symbol, SECOND_GLYPH));

    let body = [degree_text, minute_text, second_text].join(rules.separator());
    label(angle, body, rules)
}

/// A rendered degree may only be bumped while it stays inside the axis range
fn can_carry(angle: &AngleValue, degrees: u32) -> bool {
    (degrees + 1) as f64 <= angle.axis().bound()
}

fn label(angle: &AngleValue, body: String, rules: &FormatRules) -> String {
    if rules.position_first {
        format!("{} {}", angle.hemisphere(), body)
    } else {
        format!("{} {}", body, angle.hemisphere())
    }
}

fn degree_width(angle: &AngleValue, rules: &FormatRules) -> usize {
    if rules.leading_zeros {
        angle.axis().degree_width()
    } else {
        1
    }
}

fn minute_width(rules: &FormatRules) -> usize {
    if rules.leading_zeros {
        2
    } else {
        1
    }
}

fn push_glyph(text: &mut String, glyph: Option<char>) {
    if let Some(glyph) = glyph {
        text.push(glyph);
    }
}

fn pad_integer(value: u32, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

/// Rounds half away from zero to `digits` fractional digits
pub(crate) fn round_to(value: f64, digits: u8) -> f64 {
    let factor = 10_f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats a non-negative number
///
/// Without trailing zeros the fraction is trimmed, but never below
/// `min_fraction` digits. The integer part is zero-padded to `int_width`.
fn format_number(
    value: f64,
    digits: u8,
    trailing_zeros: bool,
    min_fraction: usize,
    int_width: usize,
) -> String {
    let mut text = format!("{:.*}", digits as usize, value);
    if !trailing_zeros {
        if let Some(dot) = text.find('.') {
            let keep = dot + 1 + min_fraction;
            while text.len() > keep && text.ends_with('0') {
                text.pop();
            }
            if text.ends_with('.') {
                text.pop();
            }
        }
    }
    if min_fraction > 0 && !text.contains('.') {
        text.push('.');
        text.push_str(&"0".repeat(min_fraction));
    }

    let int_len = text.find('.').unwrap_or(text.len());
    if int_len < int_width {
        text.insert_str(0, &"0".repeat(int_width - int_len));
    }
    text
}
