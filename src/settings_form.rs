//! The reading-speed form shown in the settings panel.
//!
//! The field reacts to every edit the way a host text field's change callback
//! does: each new value is validated and, when valid, written through to the
//! settings immediately.

use thiserror::Error;

use crate::settings::Settings;

pub const FIELD_NAME: &str = "Reading Speed";
pub const FIELD_DESC: &[&str] = &["Words per minute (wpm)", "Slow: 100", "Average: 130", "Fast: 160"];
pub const FIELD_PLACEHOLDER: &str = "Words per minute";

/// Rejection reasons, worded for the notice shown to the user
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum WpmInputError {
    #[error("Please enter a number")]
    NotANumber,
    #[error("Please enter a positive number")]
    Negative,
    #[error("Please enter a smaller number")]
    TooLarge,
}

/// Parse the leading integer of `input`, ignoring anything after it.
///
/// `"150wpm"` and `"12.5"` parse as 150 and 12; `"abc"` has no number at all.
/// A `0x` prefix switches to hexadecimal, so `"0x10"` is 16.
pub fn parse_wpm(input: &str) -> Result<u32, WpmInputError> {
    let s = input.trim_start();
    let (negative, rest) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    let (radix, rest) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };

    let end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return Err(WpmInputError::NotANumber);
    }

    let magnitude = digits.trim_start_matches('0');
    if magnitude.is_empty() {
        // "-0" is still zero
        return Ok(0);
    }
    if negative {
        return Err(WpmInputError::Negative);
    }
    u32::from_str_radix(magnitude, radix).map_err(|_| WpmInputError::TooLarge)
}

/// Text field state for the wpm setting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    value: String,
}

impl SettingsForm {
    pub fn new(settings: &Settings) -> Self {
        let mut form = Self::default();
        form.display(settings);
        form
    }

    /// Re-render the field from the stored settings
    pub fn display(&mut self, settings: &Settings) {
        self.value = settings.wpm.to_string();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) -> &str {
        if !c.is_control() {
            self.value.push(c);
        }
        &self.value
    }

    pub fn pop(&mut self) -> &str {
        self.value.pop();
        &self.value
    }

    pub fn clear(&mut self) -> &str {
        self.value.clear();
        &self.value
    }
}
