//! Color string parsing.
//!
//! Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
//! with alpha in `[0, 1]`, and a handful of named colors common in furniture
//! palettes.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{alpha1, char, multispace0, u8 as byte},
    combinator::{all_consuming, map, map_opt},
    sequence::{delimited, preceded, tuple},
    number::complete::double,
    IResult,
};

use crate::errors::ConfigError;
use crate::types::Color;

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("ivory", (255, 255, 240)),
    ("beige", (245, 245, 220)),
    ("wheat", (245, 222, 179)),
    ("tan", (210, 180, 140)),
    ("burlywood", (222, 184, 135)),
    ("goldenrod", (218, 165, 32)),
    ("peru", (205, 133, 63)),
    ("chocolate", (210, 105, 30)),
    ("sienna", (160, 82, 45)),
    ("saddlebrown", (139, 69, 19)),
    ("maroon", (128, 0, 0)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("slategray", (112, 128, 144)),
    ("navy", (0, 0, 128)),
    ("darkgreen", (0, 100, 0)),
];

/// Parse a color string.
pub fn parse_color(input: &str) -> Result<Color, ConfigError> {
    all_consuming(alt((hex_color, rgba_function, rgb_function, named_color)))(input.trim())
        .map(|(_, color)| color)
        .map_err(|_| ConfigError::InvalidColor {
            value: input.to_string(),
        })
}

fn hex_color(input: &str) -> IResult<&str, Color> {
    map_opt(
        preceded(char('#'), take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit())),
        expand_hex,
    )(input)
}

fn expand_hex(digits: &str) -> Option<Color> {
    match digits.len() {
        3 => {
            let doubled: String = digits.chars().flat_map(|c| [c, c]).collect();
            Color::from_hex(&doubled)
        }
        6 | 8 => Color::from_hex(digits),
        _ => None,
    }
}

fn channel(input: &str) -> IResult<&str, u8> {
    delimited(multispace0, byte, multispace0)(input)
}

fn rgb_function(input: &str) -> IResult<&str, Color> {
    map(
        preceded(
            tag_no_case("rgb"),
            delimited(
                char('('),
                tuple((
                    channel,
                    preceded(char(','), channel),
                    preceded(char(','), channel),
                )),
                char(')'),
            ),
        ),
        |(r, g, b)| Color::from_rgb8(r, g, b),
    )(input)
}

fn alpha(input: &str) -> IResult<&str, f32> {
    map_opt(delimited(multispace0, double, multispace0), |a: f64| {
        (0.0..=1.0).contains(&a).then_some(a as f32)
    })(input)
}

fn rgba_function(input: &str) -> IResult<&str, Color> {
    map(
        preceded(
            tag_no_case("rgba"),
            delimited(
                char('('),
                tuple((
                    channel,
                    preceded(char(','), channel),
                    preceded(char(','), channel),
                    preceded(char(','), alpha),
                )),
                char(')'),
            ),
        ),
        |(r, g, b, a)| Color::from_rgb8(r, g, b).with_alpha(a),
    )(input)
}

fn named_color(input: &str) -> IResult<&str, Color> {
    map_opt(alpha1, |name: &str| {
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|&(_, (r, g, b))| Color::from_rgb8(r, g, b))
    })(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let color = parse_color("#daa520").unwrap();
        assert_eq!(color.to_rgba8(), (218, 165, 32, 255));
    }

    #[test]
    fn test_parse_short_hex() {
        let color = parse_color("#fa0").unwrap();
        assert_eq!(color.to_rgba8(), (255, 170, 0, 255));
    }

    #[test]
    fn test_parse_rgb_function() {
        let color = parse_color("rgb( 139, 69 ,19)").unwrap();
        assert_eq!(color.to_rgba8(), (139, 69, 19, 255));
    }

    #[test]
    fn test_parse_rgba_function() {
        let color = parse_color("rgba(218, 165, 32, 0.5)").unwrap();
        assert_eq!(color.to_rgba8(), (218, 165, 32, 128));
        assert_eq!(parse_color("RGBA(0,0,0,1)").unwrap(), Color::BLACK);
        assert!(parse_color("rgba(0, 0, 0, 1.5)").is_err());
        assert!(parse_color("rgba(0, 0, 0)").is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_color("Goldenrod").unwrap(), parse_color("#daa520").unwrap());
        assert_eq!(parse_color("  white ").unwrap(), Color::WHITE);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("rgb(300, 0, 0)").is_err());
        assert!(parse_color("mahogany").is_err());
        assert!(parse_color("#daa520 trailing").is_err());
    }
}
