//! Local form validation, run before any network call.
//!
//! Inputs are the raw strings a user typed. Each field reports only its first
//! failing rule; all failing fields are collected into one
//! [`ValidationError`]. Messages are user-facing and kept stable.

use validator::{ValidateEmail, ValidateUrl};

use crate::error::{FieldError, ValidationError};
use crate::types::{ItemPatch, NewItem};

const MIN_PASSWORD_LEN: usize = 6;

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

fn required<'a>(raw: &'a str, label: &str) -> Result<&'a str, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(trimmed)
}

fn number(raw: &str, label: &str) -> Result<f64, String> {
    let value = required(raw, label)?;
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(format!("{label} must be a number")),
    }
}

fn positive(raw: &str, label: &str) -> Result<f64, String> {
    let n = number(raw, label)?;
    if n <= 0.0 {
        return Err(format!("{label} must be positive"));
    }
    Ok(n)
}

fn weight(raw: &str) -> Result<f64, String> {
    let n = positive(raw, "Weight")?;
    if n.fract() != 0.0 {
        return Err("Weight must be an integer".to_string());
    }
    Ok(n)
}

fn rating(raw: &str) -> Result<f64, String> {
    let n = number(raw, "Rating")?;
    if !(0.0..=5.0).contains(&n) {
        return Err("Rating must be between 0 and 5".to_string());
    }
    Ok(n)
}

fn image_url(raw: &str) -> Result<String, String> {
    let value = required(raw, "Image URL")?.to_string();
    if !value.validate_url() {
        return Err("Must be a valid URL".to_string());
    }
    Ok(value)
}

fn email(raw: &str) -> Result<String, String> {
    let value = required(raw, "Email")?.to_string();
    if !value.validate_email() {
        return Err("Invalid email".to_string());
    }
    Ok(value)
}

fn password(raw: &str) -> Result<(), String> {
    if raw.is_empty() {
        return Err("Password is required".to_string());
    }
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

/// Accumulates field failures in form order.
#[derive(Default)]
struct Collector {
    fields: Vec<FieldError>,
}

impl Collector {
    fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(message) => {
                self.fields.push(FieldError { field, message });
                None
            }
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(v) if self.fields.is_empty() => Ok(v),
            _ => Err(ValidationError {
                fields: self.fields,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// The create-item form, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub name: String,
    pub weight: String,
    pub rating: String,
    pub price: String,
    pub image: String,
    pub color: String,
    pub bonus: String,
    pub origin: String,
    pub category: String,
    pub is_top_of_the_week: bool,
    pub status: bool,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: String::new(),
            rating: String::new(),
            price: String::new(),
            image: String::new(),
            color: String::new(),
            bonus: String::new(),
            origin: String::new(),
            category: String::new(),
            is_top_of_the_week: false,
            status: true,
        }
    }
}

impl CreateForm {
    /// Validate every field and build the create request body.
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        let mut c = Collector::default();
        let name = c.check("name", required(&self.name, "Name").map(str::to_string));
        let weight = c.check("weight", weight(&self.weight));
        let rating = c.check("rating", rating(&self.rating));
        let price = c.check("price", positive(&self.price, "Price"));
        let image = c.check("image", image_url(&self.image));
        let color = c.check("color", required(&self.color, "Color").map(str::to_string));
        let bonus = c.check("bonus", required(&self.bonus, "Bonus").map(str::to_string));
        let origin = c.check("origin", required(&self.origin, "Origin").map(str::to_string));
        let category = c.check(
            "category",
            required(&self.category, "Category").map(str::to_string),
        );

        let item = (|| {
            Some(NewItem {
                name: name?,
                weight: weight?,
                rating: rating?,
                price: price?,
                image: image?,
                color: color?,
                bonus: bonus?,
                origin: origin?,
                category: category?,
                is_top_of_the_week: self.is_top_of_the_week,
                status: self.status,
            })
        })();
        c.finish(item)
    }
}

/// The edit form: only supplied fields are validated and sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditForm {
    pub name: Option<String>,
    pub weight: Option<String>,
    pub rating: Option<String>,
    pub origin: Option<String>,
}

impl EditForm {
    pub fn validate(&self) -> Result<ItemPatch, ValidationError> {
        let mut c = Collector::default();
        let mut patch = ItemPatch::default();

        if let Some(raw) = &self.name {
            patch.name = c.check("name", required(raw, "Name").map(str::to_string));
        }
        if let Some(raw) = &self.weight {
            patch.weight = c.check("weight", weight(raw));
        }
        if let Some(raw) = &self.rating {
            patch.rating = c.check("rating", rating(raw));
        }
        if let Some(raw) = &self.origin {
            patch.origin = c.check("origin", required(raw, "Origin").map(str::to_string));
        }
        if c.fields.is_empty() && patch.is_empty() {
            c.fields.push(FieldError {
                field: "form",
                message: "Nothing to update".to_string(),
            });
        }
        c.finish(Some(patch))
    }
}

/// Sign-in credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Returns the trimmed email on success.
    pub fn validate(&self) -> Result<String, ValidationError> {
        let mut c = Collector::default();
        let email = c.check("email", email(&self.email));
        c.check("password", password(&self.password));
        c.finish(email)
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        let mut c = Collector::default();
        let email = c.check("email", email(&self.email));
        c.check("password", password(&self.password));
        let confirm = if self.confirm_password.is_empty() {
            Err("Confirm Password is required".to_string())
        } else if self.confirm_password != self.password {
            Err("Passwords must match".to_string())
        } else {
            Ok(())
        };
        c.check("confirm_password", confirm);
        c.finish(email)
    }
}
