use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::StoreError;
use crate::model::{BootcampInput, Career};

const NAME_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 500;
const PHONE_MAX: usize = 20;

fn website_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)")
            .expect("must be valid regex")
    })
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("must be valid regex"))
}

/// Schema-checked bootcamp fields
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBootcamp {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub careers: Vec<Career>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
}

/// Check every schema constraint, collecting all violations in field order
///
/// # Errors
///
/// Returns [`StoreError::Validation`] carrying one message per violated field
pub fn validate(input: BootcampInput) -> Result<ValidBootcamp, StoreError> {
    let mut errors = IndexMap::new();

    let name = trimmed(input.name);
    match name.as_deref() {
        None => {
            errors.insert("name".to_owned(), "Please add a name".to_owned());
        }
        Some(n) if n.chars().count() > NAME_MAX => {
            errors.insert("name".to_owned(), "Name can't be more than 50 characters".to_owned());
        }
        Some(_) => {}
    }

    let description = trimmed(input.description);
    match description.as_deref() {
        None => {
            errors.insert("description".to_owned(), "Please add a description".to_owned());
        }
        Some(d) if d.chars().count() > DESCRIPTION_MAX => {
            errors.insert(
                "description".to_owned(),
                "Description can't be more than 500 characters".to_owned(),
            );
        }
        Some(_) => {}
    }

    if let Some(ref website) = input.website
        && !website_pattern().is_match(website)
    {
        errors.insert("website".to_owned(), "Please use a valid URL with HTTP or HTTPS".to_owned());
    }

    if let Some(ref phone) = input.phone
        && phone.chars().count() > PHONE_MAX
    {
        errors.insert("phone".to_owned(), "Phone number can't be more than 20 characters".to_owned());
    }

    if let Some(ref email) = input.email
        && !email_pattern().is_match(email)
    {
        errors.insert("email".to_owned(), "Please add a valid email".to_owned());
    }

    let address = trimmed(input.address);
    if address.is_none() {
        errors.insert("address".to_owned(), "Please add an address".to_owned());
    }

    let careers = match input.careers {
        None => {
            errors.insert("careers".to_owned(), "Please add at least one career".to_owned());
            Vec::new()
        }
        Some(raw) if raw.is_empty() => {
            errors.insert("careers".to_owned(), "Please add at least one career".to_owned());
            Vec::new()
        }
        Some(raw) => {
            let mut careers = Vec::with_capacity(raw.len());
            for value in raw {
                match value.parse::<Career>() {
                    Ok(career) => careers.push(career),
                    Err(_) => {
                        errors.insert(
                            "careers".to_owned(),
                            format!("`{value}` is not a valid enum value for path `careers`"),
                        );
                        break;
                    }
                }
            }
            careers
        }
    };

    if let Some(rating) = input.average_rating {
        if rating < 1.0 {
            errors.insert("averageRating".to_owned(), "Rating must be at least 1".to_owned());
        } else if rating > 10.0 {
            errors.insert("averageRating".to_owned(), "Rating must be at most 10".to_owned());
        }
    }

    if !errors.is_empty() {
        return Err(StoreError::Validation { errors });
    }

    // All required fields were checked above.
    let (Some(name), Some(description), Some(address)) = (name, description, address) else {
        return Err(StoreError::Validation { errors });
    };

    Ok(ValidBootcamp {
        name,
        description,
        website: input.website,
        phone: input.phone,
        email: input.email,
        address,
        careers,
        average_rating: input.average_rating,
        average_cost: input.average_cost,
        housing: input.housing.unwrap_or(false),
        job_assistance: input.job_assistance.unwrap_or(false),
        job_guarantee: input.job_guarantee.unwrap_or(false),
        accept_gi: input.accept_gi.unwrap_or(false),
    })
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
