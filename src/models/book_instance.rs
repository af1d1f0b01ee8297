//! Book instance (physical copy) model, form input and sanitization

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::book::Book;

/// Path of the copy list page
pub const LIST_URL: &str = "/catalog/bookinstances";

/// Canonical path of a copy detail page
pub fn canonical_url(id: Uuid) -> String {
    format!("/catalog/bookinstance/{}", id)
}

/// Copy availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookInstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.as_str() == s).ok_or(())
    }
}

/// Stored copy, referencing its book by id
#[derive(Debug, Clone, PartialEq, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    #[sqlx(rename = "book_id")]
    pub book: Uuid,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

/// Copy with its book populated
#[derive(Debug, Clone, PartialEq, ToSchema)]
pub struct BookInstanceDetail {
    pub id: Uuid,
    pub book: Book,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

/// Serialized shape of a copy: stored fields plus the derived ones views use
#[derive(Serialize)]
struct BookInstanceOut<'a, B> {
    id: Uuid,
    book: &'a B,
    imprint: &'a str,
    status: &'a str,
    due_back: Option<NaiveDate>,
    due_back_formatted: Option<String>,
    url: String,
}

impl<'a, B> BookInstanceOut<'a, B> {
    fn new(id: Uuid, book: &'a B, imprint: &'a str, status: &'a str, due_back: Option<NaiveDate>) -> Self {
        Self {
            id,
            book,
            imprint,
            status,
            due_back,
            due_back_formatted: due_back.map(format_due_back),
            url: canonical_url(id),
        }
    }
}

impl BookInstance {
    pub fn url(&self) -> String {
        canonical_url(self.id)
    }
}

impl Serialize for BookInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BookInstanceOut::new(self.id, &self.book, &self.imprint, &self.status, self.due_back)
            .serialize(serializer)
    }
}

impl Serialize for BookInstanceDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BookInstanceOut::new(self.id, &self.book, &self.imprint, &self.status, self.due_back)
            .serialize(serializer)
    }
}

/// Medium date form, e.g. `Jun 6, 2024`
pub fn format_due_back(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Raw create/update form body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    #[serde(default)]
    pub status: String,
    /// ISO-8601 date; empty means not on loan
    #[serde(default)]
    pub due_back: String,
}

/// Delete confirmation form body
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DeleteBookInstanceForm {
    #[serde(default)]
    pub instanceid: String,
}

/// Sanitized, validated copy fields ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookInstance {
    pub book: Uuid,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
}

impl NewBookInstance {
    pub fn into_instance(self, id: Uuid) -> BookInstance {
        BookInstance {
            id,
            book: self.book,
            imprint: self.imprint,
            status: self.status,
            due_back: self.due_back,
        }
    }
}

/// Sanitized submitted values, echoed back to the form on rejection
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookInstanceValues {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

/// A single field validation failure
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    pub param: String,
    pub msg: String,
    pub value: String,
}

/// Submission that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSubmission {
    pub values: BookInstanceValues,
    pub errors: Vec<FieldError>,
}

/// Order in which field errors are reported
const FIELD_ORDER: [&str; 4] = ["book", "imprint", "status", "due_back"];

#[derive(Debug, Validate)]
struct TrimmedForm {
    #[validate(
        length(min = 1, message = "Book must not be empty."),
        custom(function = "validate_book_id")
    )]
    book: String,
    #[validate(length(min = 1, message = "Imprint must not be empty."))]
    imprint: String,
    #[validate(
        length(min = 1, message = "Status must not be empty."),
        custom(function = "validate_status")
    )]
    status: String,
    #[validate(custom(function = "validate_due_back"))]
    due_back: String,
}

impl TrimmedForm {
    fn value_of(&self, field: &str) -> &str {
        match field {
            "book" => &self.book,
            "imprint" => &self.imprint,
            "status" => &self.status,
            _ => &self.due_back,
        }
    }
}

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_book_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Uuid::parse_str(value).is_ok() {
        return Ok(());
    }
    Err(with_message("book_id", "Book must be a valid book identifier."))
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<BookInstanceStatus>().is_ok() {
        return Ok(());
    }
    Err(with_message(
        "status",
        "Status must be one of: Available, Maintenance, Loaned, Reserved.",
    ))
}

fn validate_due_back(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_iso_date(value).is_some() {
        return Ok(());
    }
    Err(with_message("iso8601", "Due back must be a valid ISO-8601 date."))
}

/// Calendar date (extended or basic) with an optional time and UTC offset
static ISO_8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}|[0-9]{8})(?:T([0-9]{2}):([0-9]{2})(?::([0-9]{2})(?:\.[0-9]+)?)?(Z|[+-]([0-9]{2})(?::?([0-9]{2}))?)?)?$",
    )
    .expect("ISO-8601 pattern compiles")
});

/// Parse an ISO-8601 calendar date or date-time, keeping the date part
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let caps = ISO_8601.captures(value)?;

    let digits: String = caps[1].chars().filter(|c| *c != '-').collect();
    let date = NaiveDate::from_ymd_opt(
        digits[0..4].parse().ok()?,
        digits[4..6].parse().ok()?,
        digits[6..8].parse().ok()?,
    )?;

    if let Some(hour) = caps.get(2) {
        let second = caps.get(4).map_or("00", |m| m.as_str());
        NaiveTime::from_hms_opt(
            hour.as_str().parse().ok()?,
            caps[3].parse().ok()?,
            second.parse().ok()?,
        )?;
    }

    if let Some(offset_hours) = caps.get(6) {
        let hours: u32 = offset_hours.as_str().parse().ok()?;
        let minutes: u32 = caps.get(7).map_or("00", |m| m.as_str()).parse().ok()?;
        if hours > 23 || minutes > 59 {
            return None;
        }
    }

    Some(date)
}

/// HTML-escape a value for safe re-display
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

fn ordered_errors(errors: &ValidationErrors, form: &TrimmedForm) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    let mut ordered = Vec::new();
    for field in FIELD_ORDER {
        let Some(field_errors) = by_field.get(field) else {
            continue;
        };
        for error in field_errors.iter() {
            ordered.push(FieldError {
                param: field.to_string(),
                msg: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
                value: escape(form.value_of(field)),
            });
        }
    }
    ordered
}

impl BookInstanceForm {
    /// Trim, validate and escape the submitted fields.
    ///
    /// `imprint` and `status` must be non-empty after trimming, `book` must be
    /// a book id, and a non-empty `due_back` must be an ISO-8601 date.
    pub fn sanitize(self) -> Result<NewBookInstance, InvalidSubmission> {
        let trimmed = TrimmedForm {
            book: self.book.trim().to_string(),
            imprint: self.imprint.trim().to_string(),
            status: self.status.trim().to_string(),
            due_back: self.due_back,
        };

        let values = BookInstanceValues {
            book: escape(&trimmed.book),
            imprint: escape(&trimmed.imprint),
            status: escape(&trimmed.status),
            due_back: escape(&trimmed.due_back),
        };

        if let Err(errors) = trimmed.validate() {
            return Err(InvalidSubmission {
                errors: ordered_errors(&errors, &trimmed),
                values,
            });
        }

        // validate_book_id accepted it
        let book = Uuid::parse_str(&trimmed.book).expect("book id already validated");

        Ok(NewBookInstance {
            book,
            imprint: values.imprint,
            status: values.status,
            due_back: parse_iso_date(&trimmed.due_back),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    fn form(book: &str, imprint: &str, status: &str, due_back: &str) -> BookInstanceForm {
        BookInstanceForm {
            book: book.to_string(),
            imprint: imprint.to_string(),
            status: status.to_string(),
            due_back: due_back.to_string(),
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed_and_escaped() {
        let new = form(BOOK_ID, "  First Edition, 2001  ", " Available ", "")
            .sanitize()
            .unwrap();
        assert_eq!(new.book.to_string(), BOOK_ID);
        assert_eq!(new.imprint, "First Edition, 2001");
        assert_eq!(new.status, "Available");
        assert_eq!(new.due_back, None);
    }

    #[test]
    fn test_imprint_is_escaped() {
        let new = form(BOOK_ID, "Gollancz <London/2011>", "Loaned", "2024-06-06")
            .sanitize()
            .unwrap();
        assert_eq!(new.imprint, "Gollancz &lt;London&#x2F;2011&gt;");
        assert_eq!(new.due_back, NaiveDate::from_ymd_opt(2024, 6, 6));
    }

    #[test]
    fn test_empty_imprint_is_rejected() {
        let rejected = form(BOOK_ID, "", "Available", "").sanitize().unwrap_err();
        assert_eq!(rejected.errors.len(), 1);
        assert_eq!(rejected.errors[0].param, "imprint");
        assert_eq!(rejected.errors[0].msg, "Imprint must not be empty.");
        assert_eq!(rejected.values.status, "Available");
    }

    #[test]
    fn test_whitespace_only_fields_are_empty() {
        let rejected = form(BOOK_ID, "   ", "  ", "").sanitize().unwrap_err();
        let messages: Vec<_> = rejected.errors.iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Imprint must not be empty.", "Status must not be empty."]
        );
    }

    #[test]
    fn test_errors_follow_field_order() {
        let rejected = form("", "", "Lost", "yesterday").sanitize().unwrap_err();
        let params: Vec<_> = rejected.errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["book", "imprint", "status", "due_back"]);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let rejected = form(BOOK_ID, "Penguin", "Lost", "").sanitize().unwrap_err();
        assert_eq!(
            rejected.errors[0].msg,
            "Status must be one of: Available, Maintenance, Loaned, Reserved."
        );
    }

    #[test]
    fn test_malformed_book_id_is_rejected() {
        let rejected = form("not-a-book", "Penguin", "Available", "")
            .sanitize()
            .unwrap_err();
        assert_eq!(rejected.errors[0].param, "book");
        assert_eq!(rejected.errors[0].msg, "Book must be a valid book identifier.");
    }

    #[test]
    fn test_invalid_due_back() {
        let rejected = form(BOOK_ID, "Penguin", "Loaned", "2024-02-30")
            .sanitize()
            .unwrap_err();
        assert_eq!(rejected.errors[0].msg, "Due back must be a valid ISO-8601 date.");
    }

    #[test]
    fn test_parse_iso_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 6);
        for accepted in [
            "2024-06-06",
            "20240606",
            "2024-06-06T10:30",
            "2024-06-06T10:30:00",
            "2024-06-06T10:30:00.250",
            "2024-06-06T10:30:00Z",
            "2024-06-06T10:30:00+05:30",
            "2024-06-06T10:30:00+0530",
            "2024-06-06T10:30-08",
        ] {
            assert_eq!(parse_iso_date(accepted), expected, "{}", accepted);
        }
    }

    #[test]
    fn test_parse_iso_date_rejects_non_iso() {
        for rejected in [
            "2024-6-6",
            "+2024-06-06",
            " 2024-06-06",
            "2024-06-06 ",
            "06/06/2024",
            "2024-0606",
            "2024-02-30",
            "2024-06-06T25:00",
            "2024-06-06T10:30:00+24:00",
            "2024-06-06Z",
            "٢٠٢٤-٠٦-٠٦",
        ] {
            assert_eq!(parse_iso_date(rejected), None, "{}", rejected);
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a&b"c'd`e\"#), "a&amp;b&quot;c&#x27;d&#96;e&#x5C;");
    }

    #[test]
    fn test_status_round_trip() {
        for status in BookInstanceStatus::ALL {
            assert_eq!(status.as_str().parse::<BookInstanceStatus>(), Ok(status));
        }
        assert!("available".parse::<BookInstanceStatus>().is_err());
    }

    #[test]
    fn test_serialized_instance_carries_derived_fields() {
        let id = Uuid::new_v4();
        let instance = BookInstance {
            id,
            book: Uuid::parse_str(BOOK_ID).unwrap(),
            imprint: "Penguin".to_string(),
            status: "Loaned".to_string(),
            due_back: NaiveDate::from_ymd_opt(2024, 6, 6),
        };
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["url"], format!("/catalog/bookinstance/{}", id));
        assert_eq!(json["due_back_formatted"], "Jun 6, 2024");
        assert_eq!(json["book"], BOOK_ID);
    }
}
