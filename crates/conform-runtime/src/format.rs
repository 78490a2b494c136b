//! String formats understood by [`StringSchema::format`](crate::StringSchema::format).

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use url::Url;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static HOSTNAME_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
        .expect("hostname label pattern is valid")
});

// Relative references are resolved against this base before parsing.
static REFERENCE_BASE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("http://reference.invalid/").expect("reference base is a valid url")
});

/// A JSON Schema `format` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    DateTime,
    Date,
    Time,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    Uri,
    UriReference,
    Uuid,
    /// Any other format name; accepted without checking.
    Custom(String),
}

impl StringFormat {
    /// Parse a `format` keyword value.
    pub fn parse(format: &str) -> Self {
        match format {
            "date-time" => StringFormat::DateTime,
            "date" => StringFormat::Date,
            "time" => StringFormat::Time,
            "email" => StringFormat::Email,
            "hostname" => StringFormat::Hostname,
            "ipv4" => StringFormat::Ipv4,
            "ipv6" => StringFormat::Ipv6,
            "uri" => StringFormat::Uri,
            "uri-reference" => StringFormat::UriReference,
            "uuid" => StringFormat::Uuid,
            other => StringFormat::Custom(other.to_string()),
        }
    }

    /// The keyword spelling of this format.
    pub fn as_str(&self) -> &str {
        match self {
            StringFormat::DateTime => "date-time",
            StringFormat::Date => "date",
            StringFormat::Time => "time",
            StringFormat::Email => "email",
            StringFormat::Hostname => "hostname",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::Uri => "uri",
            StringFormat::UriReference => "uri-reference",
            StringFormat::Uuid => "uuid",
            StringFormat::Custom(name) => name,
        }
    }

    /// Whether this format is actually checked.
    pub fn is_known(&self) -> bool {
        !matches!(self, StringFormat::Custom(_))
    }

    /// Check a string against the format.
    pub fn is_valid(&self, value: &str) -> bool {
        match self {
            StringFormat::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
            StringFormat::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            // RFC 3339 full-time: reuse the date-time parser on a fixed date
            StringFormat::Time => {
                DateTime::parse_from_rfc3339(&format!("1970-01-01T{}", value)).is_ok()
            }
            StringFormat::Email => EMAIL.is_match(value),
            StringFormat::Hostname => is_hostname(value),
            StringFormat::Ipv4 => value.parse::<Ipv4Addr>().is_ok(),
            StringFormat::Ipv6 => value.parse::<Ipv6Addr>().is_ok(),
            StringFormat::Uri => Url::parse(value).is_ok(),
            StringFormat::UriReference => is_uri_reference(value),
            StringFormat::Uuid => uuid::Uuid::try_parse(value).is_ok(),
            StringFormat::Custom(_) => true,
        }
    }
}

fn is_hostname(value: &str) -> bool {
    let trimmed = value.strip_suffix('.').unwrap_or(value);
    !trimmed.is_empty()
        && trimmed.len() <= 253
        && trimmed.split('.').all(|label| HOSTNAME_LABEL.is_match(label))
}

fn is_uri_reference(value: &str) -> bool {
    !value.chars().any(char::is_whitespace)
        && Url::options()
            .base_url(Some(&*REFERENCE_BASE))
            .parse(value)
            .is_ok()
}
