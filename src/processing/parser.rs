//! Coordinate text parsing
//!
//! Accepts decimal, degree-decimal-minute and degree-minute-second text with
//! the hemisphere label before or after each value, a leading sign in place of
//! a label, optional unit glyphs and optional comma or hyphen separators. No
//! format hint is needed; the layout is inferred from the tokens.

use crate::core::{AngleValue, Axis, Hemisphere};
use crate::validation::{CoordinateError, CoordinateResult};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Degree,
    Minute,
    Second,
}

const UNIT_ORDER: [Unit; 3] = [Unit::Degree, Unit::Minute, Unit::Second];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Element {
    Number {
        value: f64,
        sign: Option<f64>,
        unit: Option<Unit>,
    },
    Hemisphere(Hemisphere),
    Comma,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?P<number>\d+(?:\.\d*)?|\.\d+)|(?P<sign>[+\-])|(?P<hemisphere>[NSEWnsew])|(?P<second>''|["″“”])|(?P<minute>['′’‘])|(?P<degree>[°º˚])|(?P<comma>,)|(?P<space>\s+)|(?P<other>.)"#,
        )
        .expect("coordinate token pattern is valid")
    })
}

/// Parses a latitude/longitude pair
pub fn parse(text: &str) -> CoordinateResult<(AngleValue, AngleValue)> {
    let elements = tokenize(text)?;
    let (mut first, mut second) = split_pair(text, &elements)?;

    let first_axis = group_hemisphere(first).map(Hemisphere::axis);
    let second_axis = group_hemisphere(second).map(Hemisphere::axis);
    if first_axis == Some(Axis::Longitude) && second_axis != Some(Axis::Longitude) {
        std::mem::swap(&mut first, &mut second);
    }

    let latitude = build_angle(text, first, Axis::Latitude)?;
    let longitude = build_angle(text, second, Axis::Longitude)?;
    Ok((latitude, longitude))
}

/// Like [`parse`], reporting failure as `None`
pub fn try_parse(text: &str) -> Option<(AngleValue, AngleValue)> {
    match parse(text) {
        Ok(pair) => Some(pair),
        Err(err) => {
            debug!(input = text, error = %err, "coordinate text rejected");
            None
        }
    }
}

/// Parses a single value for the given axis
///
/// A hemisphere label from the other axis is rejected.
pub fn parse_axis(text: &str, axis: Axis) -> CoordinateResult<AngleValue> {
    let elements = tokenize(text)?;
    if elements.is_empty() {
        return Err(CoordinateError::format(text, "no coordinate value found"));
    }
    build_angle(text, &elements, axis)
}

/// Like [`parse_axis`], reporting failure as `None`
pub fn try_parse_axis(text: &str, axis: Axis) -> Option<AngleValue> {
    parse_axis(text, axis).ok()
}

fn tokenize(text: &str) -> CoordinateResult<Vec<Element>> {
    let mut elements = Vec::new();
    let mut pending_sign: Option<f64> = None;
    // A '-' touching the previous number or glyph is a separator, not a sign
    let mut attached = false;

    for caps in token_pattern().captures_iter(text) {
        if caps.name("space").is_some() {
            attached = false;
            continue;
        }

        if let Some(number) = caps.name("number") {
            let value: f64 = number.as_str().parse().map_err(|_| {
                CoordinateError::format(text, format!("invalid number '{}'", number.as_str()))
            })?;
            elements.push(Element::Number {
                value,
                sign: pending_sign.take(),
                unit: None,
            });
            attached = true;
            continue;
        }

        if let Some(sign) = caps.name("sign") {
            let negative = sign.as_str() == "-";
            if negative && attached {
                attached = false;
                continue;
            }
            if pending_sign.is_some() {
                return Err(CoordinateError::format(text, "repeated sign"));
            }
            pending_sign = Some(if negative { -1.0 } else { 1.0 });
            attached = false;
            continue;
        }

        if pending_sign.is_some() {
            return Err(CoordinateError::format(text, "a sign must precede a number"));
        }

        if let Some(letter) = caps.name("hemisphere") {
            let hemisphere = letter
                .as_str()
                .chars()
                .next()
                .and_then(Hemisphere::from_letter)
                .ok_or_else(|| CoordinateError::format(text, "invalid hemisphere letter"))?;
            elements.push(Element::Hemisphere(hemisphere));
            attached = false;
        } else if caps.name("comma").is_some() {
            elements.push(Element::Comma);
            attached = false;
        } else if let Some(glyph) = glyph_unit(&caps) {
            match elements.last_mut() {
                Some(Element::Number { unit, .. }) => {
                    if unit.is_some() {
                        return Err(CoordinateError::format(text, "repeated unit glyph"));
                    }
                    *unit = Some(glyph);
                }
                _ => {
                    return Err(CoordinateError::format(
                        text,
                        "unit glyph without a preceding number",
                    ))
                }
            }
            attached = true;
        } else if let Some(other) = caps.name("other") {
            return Err(CoordinateError::format(
                text,
                format!("unexpected character '{}'", other.as_str()),
            ));
        }
    }

    if pending_sign.is_some() {
        return Err(CoordinateError::format(text, "trailing sign"));
    }
    Ok(elements)
}

fn glyph_unit(caps: &regex::Captures<'_>) -> Option<Unit> {
    if caps.name("degree").is_some() {
        Some(Unit::Degree)
    } else if caps.name("minute").is_some() {
        Some(Unit::Minute)
    } else if caps.name("second").is_some() {
        Some(Unit::Second)
    } else {
        None
    }
}

/// Splits the token stream into the two values of a pair
fn split_pair<'a>(
    text: &str,
    elements: &'a [Element],
) -> CoordinateResult<(&'a [Element], &'a [Element])> {
    if elements.is_empty() {
        return Err(CoordinateError::format(text, "no coordinate value found"));
    }

    let commas: Vec<usize> = positions(elements, |e| matches!(e, Element::Comma));
    let split = match commas.len() {
        0 => split_without_comma(text, elements)?,
        1 => {
            let at = commas[0];
            return non_empty(text, &elements[..at], &elements[at + 1..]);
        }
        _ => return Err(CoordinateError::format(text, "too many separators")),
    };
    non_empty(text, &elements[..split], &elements[split..])
}

fn split_without_comma(text: &str, elements: &[Element]) -> CoordinateResult<usize> {
    let hemispheres = positions(elements, |e| matches!(e, Element::Hemisphere(_)));
    match hemispheres.len() {
        // leading on one value and trailing on the other
        2 if hemispheres[0] == 0 && hemispheres[1] == elements.len() - 1 => Err(
            CoordinateError::format(text, "mixed hemisphere label placement"),
        ),
        2 if hemispheres[0] == 0 => Ok(hemispheres[1]),
        2 if hemispheres[1] == elements.len() - 1 => Ok(hemispheres[0] + 1),
        2 => Err(CoordinateError::format(text, "hemisphere labels in unexpected places")),
        0 => split_unlabelled(text, elements),
        _ => Err(CoordinateError::format(
            text,
            "expected a hemisphere label on both values or on neither",
        )),
    }
}

/// Splits text with no labels at the second degree glyph, or evenly by count
fn split_unlabelled(text: &str, elements: &[Element]) -> CoordinateResult<usize> {
    let degrees = positions(elements, |e| {
        matches!(
            e,
            Element::Number {
                unit: Some(Unit::Degree),
                ..
            }
        )
    });
    if degrees.len() == 2 && degrees[0] == 0 {
        return Ok(degrees[1]);
    }

    let count = elements.len();
    if count % 2 == 0 && (2..=6).contains(&count) {
        Ok(count / 2)
    } else {
        Err(CoordinateError::format(
            text,
            format!("cannot split {} numbers into latitude and longitude", count),
        ))
    }
}

fn non_empty<'a>(
    text: &str,
    first: &'a [Element],
    second: &'a [Element],
) -> CoordinateResult<(&'a [Element], &'a [Element])> {
    if first.is_empty() || second.is_empty() {
        return Err(CoordinateError::format(text, "expected two coordinate values"));
    }
    Ok((first, second))
}

fn positions(elements: &[Element], predicate: impl Fn(&Element) -> bool) -> Vec<usize> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, element)| predicate(element))
        .map(|(index, _)| index)
        .collect()
}

fn group_hemisphere(group: &[Element]) -> Option<Hemisphere> {
    group.iter().find_map(|element| match element {
        Element::Hemisphere(hemisphere) => Some(*hemisphere),
        _ => None,
    })
}

/// Builds one angle value from a single group of tokens
fn build_angle(text: &str, group: &[Element], axis: Axis) -> CoordinateResult<AngleValue> {
    let labels = positions(group, |e| matches!(e, Element::Hemisphere(_)));
    let label = match labels.as_slice() {
        [] => None,
        [index] if *index == 0 || *index == group.len() - 1 => group_hemisphere(group),
        [_] => return Err(CoordinateError::format(text, "hemisphere label inside a value")),
        _ => return Err(CoordinateError::format(text, "more than one hemisphere label")),
    };

    let mut numbers = Vec::with_capacity(3);
    for element in group {
        match *element {
            Element::Number { value, sign, unit } => numbers.push((value, sign, unit)),
            Element::Comma => return Err(CoordinateError::format(text, "unexpected separator")),
            Element::Hemisphere(_) => {}
        }
    }
    if numbers.is_empty() || numbers.len() > 3 {
        return Err(CoordinateError::format(
            text,
            format!("expected 1 to 3 numbers per value, found {}", numbers.len()),
        ));
    }
    if numbers.iter().skip(1).any(|(_, sign, _)| sign.is_some()) {
        return Err(CoordinateError::format(text, "a sign may only lead a value"));
    }
    for (index, (_, _, unit)) in numbers.iter().enumerate() {
        if let Some(unit) = unit {
            if *unit != UNIT_ORDER[index] {
                return Err(CoordinateError::format(text, "unit glyphs out of order"));
            }
        }
    }

    let sign = numbers[0].1;
    let hemisphere = match (label, sign) {
        (Some(hemisphere), _) if hemisphere.axis() != axis => {
            return Err(CoordinateError::HemisphereMismatch { axis, hemisphere })
        }
        (Some(hemisphere), Some(sign)) if (sign < 0.0) != hemisphere.is_negative() => {
            return Err(CoordinateError::format(
                text,
                format!("sign conflicts with hemisphere {}", hemisphere),
            ))
        }
        (Some(hemisphere), _) => hemisphere,
        (None, Some(sign)) if sign < 0.0 => axis.negative(),
        (None, _) => axis.positive(),
    };

    match numbers.as_slice() {
        [(value, _, _)] => AngleValue::from_decimal(hemisphere.sign() * value, axis),
        [(degrees, _, _), (decimal_minute, _, _)] => {
            let degrees = whole(text, "degrees", *degrees, axis.bound())?;
            AngleValue::from_degree_decimal_minute(degrees, *decimal_minute, hemisphere)
        }
        [(degrees, _, _), (minutes, _, _), (seconds, _, _)] => {
            let degrees = whole(text, "degrees", *degrees, axis.bound())?;
            let minutes = whole(text, "minutes", *minutes, 60.0)?;
            AngleValue::from_dms(degrees, minutes, *seconds, hemisphere)
        }
        _ => Err(CoordinateError::format(text, "expected 1 to 3 numbers per value")),
    }
}

fn whole(text: &str, field: &str, value: f64, limit: f64) -> CoordinateResult<u32> {
    if value.fract() != 0.0 {
        return Err(CoordinateError::format(
            text,
            format!("{} must be a whole number when smaller units follow", field),
        ));
    }
    if value > limit {
        return Err(CoordinateError::range(field, value, format!("must not exceed {}", limit)));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{render_pair, FormatRules};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_dms_hemisphere_first() {
        let (lat, lon) = parse("N 47º 36' 22.32\" W 122º 19' 55.56\"").unwrap();
        assert_eq!(lat.degrees(), 47);
        assert_eq!(lat.minutes(), 36);
        assert_eq!(lat.seconds(), 22.32);
        assert_eq!(lat.hemisphere(), Hemisphere::North);
        assert_eq!(lon.degrees(), 122);
        assert_eq!(lon.minutes(), 19);
        assert_eq!(lon.seconds(), 55.56);
        assert_eq!(lon.hemisphere(), Hemisphere::West);
    }

    #[test]
    fn test_parse_dms_hemisphere_last_with_unicode_glyphs() {
        let (lat, lon) = parse("47°36′22.32″N 122°19′55.56″W").unwrap();
        assert_eq!(lat.minutes(), 36);
        assert_eq!(lon.hemisphere(), Hemisphere::West);
        assert_abs_diff_eq!(lon.decimal_degree(), -122.3321, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_signed_decimal_pair() {
        let (lat, lon) = parse("47.6062, -122.3321").unwrap();
        assert_eq!(lat.decimal_degree(), 47.6062);
        assert_eq!(lon.decimal_degree(), -122.3321);
        assert_eq!(lat.hemisphere(), Hemisphere::North);
        assert_eq!(lon.hemisphere(), Hemisphere::West);

        let (_, lon) = parse("47.6062,-122.3321").unwrap();
        assert_eq!(lon.decimal_degree(), -122.3321);
        let (_, lon) = parse("+47.6062 -122.3321").unwrap();
        assert_eq!(lon.decimal_degree(), -122.3321);
    }

    #[test]
    fn test_parse_degree_decimal_minute() {
        let (lat, lon) = parse("N 47º 36.372' W 122º 19.926'").unwrap();
        assert_eq!(lat.degrees(), 47);
        assert_abs_diff_eq!(lat.decimal_minute(), 36.372, epsilon = 1e-12);
        assert_abs_diff_eq!(lon.decimal_degree(), -122.3321, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_hyphen_separated() {
        let (lat, lon) = parse("N 47º-36'-22.32\" W 122º-19'-55.56\"").unwrap();
        assert_eq!(lat.seconds(), 22.32);
        assert_eq!(lon.minutes(), 19);

        let (lat, _) = parse("47-36-22.32 N 122-19-55.56 W").unwrap();
        assert_eq!(lat.minutes(), 36);
    }

    #[test]
    fn test_parse_unlabelled_numbers_in_source_order() {
        let (lat, lon) = parse("47 36 22.32 122 19 55.56").unwrap();
        assert_eq!(lat.axis(), Axis::Latitude);
        assert_eq!(lat.hemisphere(), Hemisphere::North);
        assert_eq!(lon.hemisphere(), Hemisphere::East);
        assert_eq!(lon.degrees(), 122);

        let (lat, lon) = parse("10 30.5 20 15.25").unwrap();
        assert_abs_diff_eq!(lat.decimal_minute(), 30.5);
        assert_abs_diff_eq!(lon.decimal_minute(), 15.25);

        let (lat, lon) = parse("12º 30' 100º 15'").unwrap();
        assert_eq!(lat.minutes(), 30);
        assert_eq!(lon.degrees(), 100);
    }

    #[test]
    fn test_parse_longitude_first_is_reordered() {
        let (lat, lon) = parse("W 122.3321 N 47.6062").unwrap();
        assert_eq!(lat.decimal_degree(), 47.6062);
        assert_eq!(lon.decimal_degree(), -122.3321);
    }

    #[test]
    fn test_parse_lowercase_hemispheres() {
        let (lat, lon) = parse("s 33.5 e 151.25").unwrap();
        assert_eq!(lat.decimal_degree(), -33.5);
        assert_eq!(lon.decimal_degree(), 151.25);
    }

    #[test]
    fn test_parse_rejects_sign_conflict() {
        assert!(parse("-47.5 N, 122 E").is_err());
        assert!(parse("N 47.5 E +-122").is_err());
        let (lat, _) = parse("-47.5 S, 122 E").unwrap();
        assert_eq!(lat.decimal_degree(), -47.5);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(parse("91, 0"), Err(CoordinateError::Range { .. })));
        assert!(parse("N 47 60 0 E 122 0 0").is_err());
        assert!(parse("N 47 10 60 E 122 0 0").is_err());
        assert!(parse("0, 180.5").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse("hello"), Err(CoordinateError::Format { .. })));
        assert!(parse("").is_err());
        assert!(parse("47.5").is_err());
        assert!(parse("N 47 122").is_err());
        assert!(parse("1, 2, 3").is_err());
        assert!(parse("47.5 36 22 122.5 19 55").is_err());
        assert!(try_parse("not a coordinate").is_none());
    }

    #[test]
    fn test_parse_rejects_same_axis_twice() {
        assert!(parse("N 10 S 20").is_err());
    }

    #[test]
    fn test_parse_rejects_mixed_label_placement() {
        let err = parse("N 47.5 122.3 E").unwrap_err();
        assert!(matches!(err, CoordinateError::Format { .. }));
        assert!(try_parse("N 47º 30' 122º 18' E").is_none());

        let (lat, lon) = parse("N 47.5 E 122.3").unwrap();
        assert_eq!(lat.decimal_degree(), 47.5);
        assert_eq!(lon.decimal_degree(), 122.3);
        let (lat, lon) = parse("47.5 N 122.3 E").unwrap();
        assert_eq!(lat.decimal_degree(), 47.5);
        assert_eq!(lon.decimal_degree(), 122.3);
    }

    #[test]
    fn test_parse_axis() {
        let lat = parse_axis("S 33º 52' 4\"", Axis::Latitude).unwrap();
        assert_eq!(lat.hemisphere(), Hemisphere::South);
        assert_eq!(lat.seconds(), 4.0);

        let lon = parse_axis("-71.5", Axis::Longitude).unwrap();
        assert_eq!(lon.hemisphere(), Hemisphere::West);

        let err = parse_axis("E 10", Axis::Latitude).unwrap_err();
        assert!(err.is_type_mismatch());
        assert!(try_parse_axis("1 2 3 4", Axis::Latitude).is_none());
    }

    #[test]
    fn test_parse_then_render_reproduces_text() {
        let samples = [
            "N 47º 36' 22.32\" W 122º 19' 55.56\"",
            "S 33º 52' 4.5\" E 151º 12' 36\"",
            "N 0º 0' 0\" E 0º 0' 0\"",
        ];
        let rules = FormatRules::default();
        for sample in samples {
            let (lat, lon) = parse(sample).unwrap();
            assert_eq!(render_pair(&lat, &lon, &rules), sample);
        }
    }
}
