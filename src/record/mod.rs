//! Organization records.
//!
//! Records come straight from the source document and every field is
//! optional and untyped, so a record is kept as a JSON object and the
//! accessors below decide what "present" means for each field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Field names as they appear in the source document.
pub mod fields {
    pub const NAME: &str = "Name";
    pub const ABBREVIATION: &str = "Abbreviation";
    pub const OPERATIONAL_DOMAIN: &str = "Operational Domain";
    pub const SCOPE: &str = "Scope";
    pub const REGION: &str = "Region";
    pub const COUNTRY: &str = "Country";
    pub const LOCATIONS: &str = "Locations/Countries";
    pub const FOCUS: &str = "Focus";
    pub const OVERVIEW: &str = "Overview";
    pub const KEY_ACTIVITIES: &str = "Key Activities";
    pub const WEBSITE: &str = "Website";
    pub const FLAGGED: &str = "Flagged for Review";
    pub const FLAG_REASON: &str = "Flag Reason";
    pub const ADDRESS_LINE_1: &str = "Address Line 1";
    pub const ADDRESS_LINE_2: &str = "Address Line 2";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State/Province";
    pub const POSTAL_CODE: &str = "Postal Code";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
}

/// Loose truthiness used for every "is this field set" check: null, false,
/// zero, NaN and the empty string are unset; arrays and objects are set even
/// when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a scalar-ish value, the way a template would interpolate it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Organization {
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for Organization {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl Organization {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// Non-empty string value.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// String value with at least one non-whitespace character. The
    /// untrimmed string is returned.
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    /// Text form of any set value (numbers included).
    pub fn display(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| is_truthy(v)).map(display_value)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(fields::NAME)
    }

    /// Key the directory is ordered by.
    pub fn sort_key(&self) -> NameKey {
        NameKey::new(self.name().unwrap_or_default())
    }

    pub fn abbreviation(&self) -> Option<&str> {
        self.non_blank(fields::ABBREVIATION)
    }

    /// Display name with the abbreviation appended in parentheses.
    pub fn title(&self) -> String {
        let name = self.name().unwrap_or("Unnamed Organization");
        match self.abbreviation() {
            Some(abbr) => format!("{name} ({abbr})"),
            None => name.to_string(),
        }
    }

    pub fn operational_domain(&self) -> Option<&str> {
        self.text(fields::OPERATIONAL_DOMAIN)
    }

    /// Domain shown to the user; older records only carry `Scope`.
    pub fn display_domain(&self) -> Option<&str> {
        self.operational_domain().or_else(|| self.text(fields::SCOPE))
    }

    pub fn has_region(&self) -> bool {
        self.is_present(fields::REGION)
    }

    /// Region strings, whether the field holds a single string or a list.
    pub fn regions(&self) -> Vec<&str> {
        match self.get(fields::REGION) {
            Some(Value::String(s)) if !s.is_empty() => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn region_is_list(&self) -> bool {
        matches!(self.get(fields::REGION), Some(Value::Array(_)))
    }

    pub fn country(&self) -> Option<&str> {
        self.non_blank(fields::COUNTRY)
    }

    pub fn locations(&self) -> Option<String> {
        self.display(fields::LOCATIONS)
    }

    /// Focus tags; only a list-valued field counts.
    pub fn focus(&self) -> Vec<&str> {
        match self.get(fields::FOCUS) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn overview(&self) -> Option<&str> {
        self.text(fields::OVERVIEW)
    }

    pub fn key_activities(&self) -> Option<&str> {
        self.text(fields::KEY_ACTIVITIES)
    }

    pub fn website(&self) -> Option<&str> {
        self.non_blank(fields::WEBSITE)
    }

    /// Flagged records are hidden unless the user opts in. Only boolean
    /// `true` and the exact string `"true"` count.
    pub fn is_flagged(&self) -> bool {
        match self.get(fields::FLAGGED) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }

    pub fn flag_reason(&self) -> Option<&str> {
        self.non_blank(fields::FLAG_REASON)
    }

    /// Postal address as display lines; `None` when no address part is set.
    pub fn address_lines(&self) -> Option<Vec<String>> {
        let mut lines = Vec::new();
        if let Some(line) = self.display(fields::ADDRESS_LINE_1) {
            lines.push(line);
        }
        if let Some(line) = self.display(fields::ADDRESS_LINE_2) {
            lines.push(line);
        }

        let city = self.display(fields::CITY);
        let state = self.display(fields::STATE);
        let postal = self.display(fields::POSTAL_CODE);
        if city.is_some() || state.is_some() || postal.is_some() {
            let mut locality = city.unwrap_or_default();
            if let Some(state) = state {
                locality.push_str(", ");
                locality.push_str(&state);
            }
            if let Some(postal) = postal {
                locality.push(' ');
                locality.push_str(&postal);
            }
            lines.push(locality);
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines)
        }
    }

    /// Latitude and longitude, only when both are set.
    pub fn coordinates(&self) -> Option<(String, String)> {
        let lat = self.display(fields::LATITUDE)?;
        let lon = self.display(fields::LONGITUDE)?;
        Some((lat, lon))
    }
}

/// Collation key for names. Base letters compare first with case and
/// accents ignored, then accents (unaccented first), then case (lowercase
/// first). Spaces and punctuation sort before digits, digits before letters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NameKey {
    base: Vec<(u8, char)>,
    accents: Vec<char>,
    case: Vec<bool>,
}

impl NameKey {
    pub fn new(name: &str) -> Self {
        let mut base = Vec::new();
        let mut accents = Vec::new();
        let mut case = Vec::new();
        for c in name.nfd() {
            accents.extend(c.to_lowercase());
            if is_combining_mark(c) {
                continue;
            }
            case.push(c.is_uppercase());
            for lower in c.to_lowercase() {
                base.push((char_class(lower), lower));
            }
        }
        Self {
            base,
            accents,
            case,
        }
    }
}

fn char_class(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}
