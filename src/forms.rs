//! Coercion of submitted form text into typed record fields.
//!
//! Dates and numbers are lenient: anything unparsable becomes `None` or the
//! field default. Required text and closed choices are strict and fail with
//! [`Error::Validation`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const INITIALS_MAX: usize = 6;

static MONTH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("valid month pattern"));

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn parse_month(value: &str) -> Option<String> {
    let value = value.trim();
    MONTH_REGEX.is_match(value).then(|| value.to_string())
}

pub fn parse_int(value: &str, default: i32) -> i32 {
    value.trim().parse().unwrap_or(default)
}

pub fn parse_float(value: &str, default: f64) -> f64 {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .unwrap_or(default)
}

pub fn checkbox(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

pub fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

pub fn required(value: String, code: &'static str) -> Result<String> {
    optional(value).ok_or(Error::Validation(code))
}

pub fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn normalize_initials(value: &str) -> String {
    value
        .trim()
        .to_uppercase()
        .chars()
        .take(INITIALS_MAX)
        .collect()
}

/// A closed set of labelled values, such as a record status.
pub trait Choice: Copy + PartialEq + Default + 'static {
    const ALL: &'static [Self];
    const INVALID: &'static str;

    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.label() == label)
    }
}

pub fn parse_choice<C: Choice>(value: &str) -> Result<C> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(C::default());
    }
    C::from_label(value).ok_or(Error::Validation(C::INVALID))
}

pub fn parse_optional_choice<C: Choice>(value: &str) -> Result<Option<C>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    C::from_label(value)
        .map(Some)
        .ok_or(Error::Validation(C::INVALID))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Options for a `<select>`, with the current value (or the default when the
/// current value is empty) marked as selected.
pub fn choice_options<C: Choice>(current: &str) -> Vec<SelectOption> {
    let current = match current.trim() {
        "" => C::default().label(),
        other => other,
    };
    C::ALL
        .iter()
        .map(|choice| SelectOption {
            value: choice.label().to_string(),
            label: choice.label().to_string(),
            selected: choice.label() == current,
        })
        .collect()
}

/// Like [`choice_options`] but with a leading blank entry for optional fields.
pub fn optional_choice_options<C: Choice>(current: &str) -> Vec<SelectOption> {
    let current = current.trim();
    let mut options = vec![SelectOption {
        value: String::new(),
        label: "—".to_string(),
        selected: current.is_empty(),
    }];
    options.extend(C::ALL.iter().map(|choice| SelectOption {
        value: choice.label().to_string(),
        label: choice.label().to_string(),
        selected: choice.label() == current,
    }));
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Light {
        #[default]
        Green,
        Red,
    }

    impl Choice for Light {
        const ALL: &'static [Self] = &[Light::Green, Light::Red];
        const INVALID: &'static str = "INVALID_LIGHT";

        fn label(&self) -> &'static str {
            match self {
                Light::Green => "Vert",
                Light::Red => "Rouge",
            }
        }
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_date(" 2024-01-15 "),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn bad_dates_become_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("15/01/2024"), None);
    }

    #[test]
    fn formats_dates_for_inputs() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 5)), "2024-01-05");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn months_must_be_year_dash_month() {
        assert_eq!(parse_month("2024-03"), Some("2024-03".to_string()));
        assert_eq!(parse_month("2024-13"), None);
        assert_eq!(parse_month("03/2024"), None);
        assert_eq!(parse_month(""), None);
    }

    #[test]
    fn numbers_fall_back_to_defaults() {
        assert_eq!(parse_int("4", 1), 4);
        assert_eq!(parse_int("", 1), 1);
        assert_eq!(parse_int("high", 1), 1);
        assert_eq!(parse_float("5,5", 0.0), 5.5);
        assert_eq!(parse_float("12.25", 0.0), 12.25);
        assert_eq!(parse_float("", 0.0), 0.0);
        assert_eq!(parse_float("NaN", 0.0), 0.0);
        assert_eq!(parse_float("lots", 0.0), 0.0);
    }

    #[test]
    fn checkbox_is_on_only() {
        assert!(checkbox(&Some("on".to_string())));
        assert!(!checkbox(&Some("off".to_string())));
        assert!(!checkbox(&None));
    }

    #[test]
    fn optional_and_required_text() {
        assert_eq!(optional("  ".to_string()), None);
        assert_eq!(optional(" Atelier ".to_string()), Some("Atelier".to_string()));
        assert_eq!(required("Titre".to_string(), "MISSING").unwrap(), "Titre");
        assert!(matches!(
            required(String::new(), "MISSING"),
            Err(Error::Validation("MISSING"))
        ));
    }

    #[test]
    fn initials_are_trimmed_uppercased_and_capped() {
        assert_eq!(normalize_initials("  mz "), "MZ");
        assert_eq!(normalize_initials("abcdefgh"), "ABCDEF");
        assert_eq!(normalize_initials(""), "");
    }

    #[test]
    fn choices_are_closed() {
        assert_eq!(parse_choice::<Light>("Rouge").unwrap(), Light::Red);
        assert_eq!(parse_choice::<Light>("").unwrap(), Light::Green);
        assert!(matches!(
            parse_choice::<Light>("Bleu"),
            Err(Error::Validation("INVALID_LIGHT"))
        ));
        assert_eq!(parse_optional_choice::<Light>("").unwrap(), None);
        assert_eq!(
            parse_optional_choice::<Light>("Vert").unwrap(),
            Some(Light::Green)
        );
    }

    #[test]
    fn options_mark_current_or_default() {
        let options = choice_options::<Light>("Rouge");
        assert_eq!(options.len(), 2);
        assert!(options[1].selected && !options[0].selected);

        let options = choice_options::<Light>("");
        assert!(options[0].selected);

        let options = optional_choice_options::<Light>("");
        assert_eq!(options.len(), 3);
        assert!(options[0].selected);
    }
}
