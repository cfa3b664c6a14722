//! Validation engine
//!
//! Raw field maps (form input, CSV cells) go through an explicit coercion step
//! that produces either a typed, validated draft or the complete list of field
//! errors. Required-ness is reported first, in declaration order; format checks
//! follow, again in declaration order, and only for values that are present.
//!
//! Nothing here touches the store.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::entity::EntityKind;
use crate::entities::{NewInvoice, NewInvoiceItem, NewPartner, NewProduct};

/// ISO calendar date format used for invoice dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern to compile")
});

/// A raw field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl FieldValue {
    /// Blank means empty text after trimming; numbers are never blank
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Real(f) => f.to_string(),
        }
    }

    fn as_real(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Real(f) => *f,
        };
        value.is_finite().then_some(value)
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Text(s) => s.trim().parse::<i64>().ok(),
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Real(f)
                if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f) =>
            {
                Some(*f as i64)
            }
            FieldValue::Real(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Integer(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Real(f)
    }
}

/// Field name to raw value mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    values: HashMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Present and not blank
    pub fn present(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).filter(|v| !v.is_blank())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay every value of `other` onto this map
    pub fn merge(&mut self, other: FieldMap) {
        self.values.extend(other.values);
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// What is wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    InvalidEmail,
    NotANumber,
    NotAnInteger,
    Negative,
    NotPositive,
    InvalidDate,
}

/// A single field-level rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.field),
            FieldErrorKind::InvalidEmail => write!(f, "{} format is invalid", self.field),
            FieldErrorKind::NotANumber => write!(f, "{} must be a valid number", self.field),
            FieldErrorKind::NotAnInteger => write!(f, "{} must be a valid integer", self.field),
            FieldErrorKind::Negative => write!(f, "{} must be zero or greater", self.field),
            FieldErrorKind::NotPositive => write!(f, "{} must be a positive integer", self.field),
            FieldErrorKind::InvalidDate => write!(f, "{} must be YYYY-MM-DD format", self.field),
        }
    }
}

/// The complete list of violations for one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

/// Coercion from a raw field map into a typed draft
pub trait Validate: Sized {
    const KIND: EntityKind;

    fn from_fields(fields: &FieldMap) -> Result<Self, ValidationErrors>;
}

/// Check a raw field map for the given kind; empty means valid
pub fn validate(kind: EntityKind, fields: &FieldMap) -> Vec<String> {
    let outcome = match kind {
        EntityKind::Partner => NewPartner::from_fields(fields).map(|_| ()),
        EntityKind::Product => NewProduct::from_fields(fields).map(|_| ()),
        EntityKind::Invoice => NewInvoice::from_fields(fields).map(|_| ()),
        EntityKind::InvoiceItem => NewInvoiceItem::from_fields(fields).map(|_| ()),
    };
    match outcome {
        Ok(()) => Vec::new(),
        Err(errors) => errors.messages(),
    }
}

/// Accumulates violations while coercing a field map
///
/// Call [`Checker::require`] first, then the format checks in declaration
/// order. Format checks skip absent or blank values.
pub struct Checker<'a> {
    fields: &'a FieldMap,
    errors: Vec<FieldError>,
}

impl<'a> Checker<'a> {
    pub fn new(fields: &'a FieldMap) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.errors.push(FieldError { field, kind });
    }

    /// Record a `Required` error for every listed field that is missing or blank
    pub fn require(&mut self, names: &[&'static str]) {
        for &name in names {
            if self.fields.present(name).is_none() {
                self.push(name, FieldErrorKind::Required);
            }
        }
    }

    /// Trimmed text, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.present(name).map(FieldValue::as_text)
    }

    pub fn email(&mut self, name: &'static str) -> Option<String> {
        let value = self.text(name)?;
        if EMAIL_RE.is_match(&value) {
            Some(value)
        } else {
            self.push(name, FieldErrorKind::InvalidEmail);
            None
        }
    }

    /// Finite, non-negative number
    pub fn amount(&mut self, name: &'static str) -> Option<f64> {
        let value = self.fields.present(name)?;
        match value.as_real() {
            Some(v) if v < 0.0 => {
                self.push(name, FieldErrorKind::Negative);
                None
            }
            Some(v) => Some(v),
            None => {
                self.push(name, FieldErrorKind::NotANumber);
                None
            }
        }
    }

    /// Integer accepting integer-like text
    pub fn integer(&mut self, name: &'static str) -> Option<i64> {
        let value = self.fields.present(name)?;
        match value.as_integer() {
            Some(v) => Some(v),
            None => {
                self.push(name, FieldErrorKind::NotAnInteger);
                None
            }
        }
    }

    pub fn count(&mut self, name: &'static str) -> Option<i64> {
        match self.integer(name) {
            Some(v) if v < 0 => {
                self.push(name, FieldErrorKind::Negative);
                None
            }
            other => other,
        }
    }

    /// True integer value only; text that merely looks numeric is rejected
    pub fn strict_integer(&mut self, name: &'static str) -> Option<i64> {
        match self.fields.present(name)? {
            FieldValue::Integer(v) => Some(*v),
            _ => {
                self.push(name, FieldErrorKind::NotAnInteger);
                None
            }
        }
    }

    pub fn positive(&mut self, name: &'static str) -> Option<i64> {
        match self.strict_integer(name) {
            Some(v) if v <= 0 => {
                self.push(name, FieldErrorKind::NotPositive);
                None
            }
            other => other,
        }
    }

    pub fn date(&mut self, name: &'static str) -> Option<NaiveDate> {
        let value = self.text(name)?;
        match NaiveDate::parse_from_str(&value, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(name, FieldErrorKind::InvalidDate);
                None
            }
        }
    }

    /// Optional price: non-numeric is treated as absent, negative is an error
    pub fn optional_amount(&mut self, name: &'static str) -> Option<f64> {
        let value = self.fields.present(name)?.as_real()?;
        if value < 0.0 {
            self.push(name, FieldErrorKind::Negative);
            return None;
        }
        Some(value)
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}
