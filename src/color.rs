use serde::{Deserialize, Serialize};

/// Highlight color as stored in settings: a hex color plus opacity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_color() -> String {
    "#FFFF00".to_string()
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            opacity: default_opacity(),
        }
    }
}

impl ColorConfig {
    pub fn to_rgba(&self) -> String {
        hex_to_rgba(&self.color, self.opacity)
    }
}

/// Convert `#RGB` or `#RRGGBB` (case-insensitive, `#` optional) to a
/// CSS `rgba(...)` string. Unparsable input falls back to yellow, and
/// opacity is clamped into `[0, 1]`.
pub fn hex_to_rgba(hex: &str, opacity: f64) -> String {
    let opacity = if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        default_opacity()
    };
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let (r, g, b) = parse_hex(digits).unwrap_or((255, 255, 0));
    format!("rgba({r}, {g}, {b}, {opacity})")
}

fn parse_hex(digits: &str) -> Option<(u8, u8, u8)> {
    if !digits.is_ascii() {
        return None;
    }
    match digits.len() {
        3 => {
            let channel = |i: usize| {
                digits[i..i + 1]
                    .chars()
                    .next()
                    .and_then(|c| c.to_digit(16))
                    .map(|v| (v * 16 + v) as u8)
            };
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// Resolved wrap tags for one highlight session.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightStyle {
    open_tag: String,
}

impl HighlightStyle {
    pub fn from_config(config: &ColorConfig) -> Self {
        Self {
            open_tag: format!(
                r#"<span style="background-color: {};">"#,
                config.to_rgba()
            ),
        }
    }

    pub fn open_tag(&self) -> &str {
        &self.open_tag
    }

    pub fn close_tag(&self) -> &'static str {
        "</span>"
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::from_config(&ColorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_hex() {
        assert_eq!(hex_to_rgba("#FF8800", 1.0), "rgba(255, 136, 0, 1)");
    }

    #[test]
    fn three_digit_hex_expands() {
        assert_eq!(hex_to_rgba("#f80", 1.0), "rgba(255, 136, 0, 1)");
    }

    #[test]
    fn hash_is_optional() {
        assert_eq!(hex_to_rgba("00ff00", 0.5), "rgba(0, 255, 0, 0.5)");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(hex_to_rgba("#AbCdEf", 1.0), hex_to_rgba("#abcdef", 1.0));
    }

    #[test]
    fn invalid_input_falls_back_to_yellow() {
        assert_eq!(hex_to_rgba("notacolor", 1.0), "rgba(255, 255, 0, 1)");
        assert_eq!(hex_to_rgba("", 1.0), "rgba(255, 255, 0, 1)");
        assert_eq!(hex_to_rgba("#12345", 1.0), "rgba(255, 255, 0, 1)");
        assert_eq!(hex_to_rgba("#gggggg", 1.0), "rgba(255, 255, 0, 1)");
        assert_eq!(hex_to_rgba("#ffÿ", 1.0), "rgba(255, 255, 0, 1)");
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(hex_to_rgba("#000000", 2.0), "rgba(0, 0, 0, 1)");
        assert_eq!(hex_to_rgba("#000000", -0.5), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn non_finite_opacity_falls_back() {
        assert_eq!(hex_to_rgba("#000000", f64::NAN), "rgba(0, 0, 0, 1)");
        assert_eq!(hex_to_rgba("#000000", f64::INFINITY), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn whole_opacity_prints_without_decimals() {
        assert!(hex_to_rgba("#ffffff", 1.0).ends_with(", 1)"));
        assert!(hex_to_rgba("#ffffff", 0.25).ends_with(", 0.25)"));
    }

    #[test]
    fn default_config_is_opaque_yellow() {
        assert_eq!(ColorConfig::default().to_rgba(), "rgba(255, 255, 0, 1)");
    }

    #[test]
    fn style_builds_wrap_tags() {
        let style = HighlightStyle::from_config(&ColorConfig {
            color: "#336699".to_string(),
            opacity: 0.8,
        });
        assert_eq!(
            style.open_tag(),
            r#"<span style="background-color: rgba(51, 102, 153, 0.8);">"#
        );
        assert_eq!(style.close_tag(), "</span>");
    }
}
