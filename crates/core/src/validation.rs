//! Input validation for venue, event and ticket type submissions.
//!
//! Raw drafts deserialize leniently (missing fields fall back to empty
//! values) so that every problem is reported as a field violation instead of
//! a parse error. Validation collects *all* violations, sorted by field name,
//! and on success returns a normalized record ready for persistence.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{EntityId, Timestamp};

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every violation found in one draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .violations.len())]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    /// Whether any violation is attached to `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Human-readable summary, one `field: message` per violation.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ---------------------------------------------------------------------------
// Venue
// ---------------------------------------------------------------------------

/// Venue form input as submitted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct VenueDraft {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 5, message = "Please enter a valid address"))]
    pub address: String,
    #[validate(length(min = 2, message = "City must be at least 2 characters"))]
    pub city: String,
    #[validate(length(min = 5, message = "Please enter a valid ZIP code"))]
    pub zip_code: String,
    pub description: Vec<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1 person"))]
    pub capacity: i32,
    #[validate(range(min = 0.0, message = "Rate must be a positive number"))]
    pub rental_rate_per_hour: f64,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(url(message = "Please enter a valid URL"))]
    pub website: Option<String>,
}

/// A validated, normalized venue ready to insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVenue {
    pub name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub description: Vec<String>,
    pub capacity: i32,
    pub rental_rate_per_hour: f64,
    pub is_active: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl VenueDraft {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            description: normalize_tags(self.description),
            capacity: self.capacity,
            rental_rate_per_hour: self.rental_rate_per_hour,
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            website: non_blank(self.website),
        }
    }
}

/// Validate a venue draft, returning the normalized record or every violation.
pub fn validate_venue(draft: VenueDraft) -> Result<NewVenue, ValidationFailure> {
    let draft = draft.normalized();
    let mut violations = collect_violations(draft.validate());

    if !draft.rental_rate_per_hour.is_finite() {
        violations.push(FieldViolation::new(
            "rental_rate_per_hour",
            "Rate must be a number",
        ));
    }

    finish(violations, || NewVenue {
        name: draft.name,
        address: draft.address,
        city: draft.city,
        zip_code: draft.zip_code,
        description: draft.description,
        capacity: draft.capacity,
        rental_rate_per_hour: draft.rental_rate_per_hour,
        is_active: true,
        email: draft.email,
        phone: draft.phone,
        website: draft.website,
    })
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Event form input as submitted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct EventDraft {
    #[validate(length(min = 2, message = "Event name must be at least 2 characters."))]
    pub name: String,
    /// The venue id as text; it must reference an existing venue.
    #[validate(length(min = 2, message = "Event venue must be at least 2 characters."))]
    pub venue_id: String,
    #[validate(required(message = "Start date and time is required."))]
    pub start_date: Option<Timestamp>,
    #[validate(required(message = "End date and time is required."))]
    pub end_date: Option<Timestamp>,
    #[validate(range(min = 1, message = "Number of tickets must be at least 1."))]
    pub number_of_tickets: i32,
    #[validate(range(min = 0.0, message = "Price per ticket must be 0 or greater."))]
    pub price_per_ticket: f64,
    #[validate(length(min = 10, message = "Event description must be at least 10 characters."))]
    pub description: String,
}

/// A validated, normalized event ready to insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub venue_id: EntityId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub number_of_tickets: i32,
    pub price_per_ticket: f64,
}

/// Validate an event draft, returning the normalized record or every violation.
pub fn validate_event(draft: EventDraft) -> Result<NewEvent, ValidationFailure> {
    let draft = EventDraft {
        name: draft.name.trim().to_string(),
        venue_id: draft.venue_id.trim().to_string(),
        description: draft.description.trim().to_string(),
        ..draft
    };
    let mut violations = collect_violations(draft.validate());

    let venue_id = match EntityId::parse_str(&draft.venue_id) {
        Ok(id) => Some(id),
        Err(_) => {
            // Too-short ids already carry a violation from the length rule.
            if draft.venue_id.chars().count() >= 2 {
                violations.push(FieldViolation::new(
                    "venue_id",
                    "Event venue must reference an existing venue id.",
                ));
            }
            None
        }
    };

    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if end < start {
            violations.push(FieldViolation::new(
                "end_date",
                "End date and time must not be before the start.",
            ));
        }
    }

    if !draft.price_per_ticket.is_finite() {
        violations.push(FieldViolation::new(
            "price_per_ticket",
            "Price per ticket must be a number.",
        ));
    }

    match (venue_id, draft.start_date, draft.end_date) {
        (Some(venue_id), Some(start_date), Some(end_date)) if violations.is_empty() => {
            Ok(NewEvent {
                name: draft.name,
                description: draft.description,
                venue_id,
                start_date,
                end_date,
                number_of_tickets: draft.number_of_tickets,
                price_per_ticket: draft.price_per_ticket,
            })
        }
        _ => Err(sorted_failure(violations)),
    }
}

// ---------------------------------------------------------------------------
// Ticket type
// ---------------------------------------------------------------------------

/// Ticket type input as submitted for an existing event.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TicketTypeDraft {
    #[validate(length(min = 2, message = "Ticket type name must be at least 2 characters."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be 0 or greater."))]
    pub price: f64,
    #[validate(range(min = 1, message = "Quantity must be at least 1 when set."))]
    pub quantity_available: Option<i32>,
    pub start_sales_date: Option<Timestamp>,
    pub end_sales_date: Option<Timestamp>,
}

/// A validated ticket type for `event_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTicketType {
    pub event_id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity_available: Option<i32>,
    pub start_sales_date: Option<Timestamp>,
    pub end_sales_date: Option<Timestamp>,
}

pub fn validate_ticket_type(
    event_id: EntityId,
    draft: TicketTypeDraft,
) -> Result<NewTicketType, ValidationFailure> {
    let draft = TicketTypeDraft {
        name: draft.name.trim().to_string(),
        description: non_blank(draft.description),
        ..draft
    };
    let mut violations = collect_violations(draft.validate());

    if let (Some(start), Some(end)) = (draft.start_sales_date, draft.end_sales_date) {
        if start > end {
            violations.push(FieldViolation::new(
                "end_sales_date",
                "Sales window must end after it starts.",
            ));
        }
    }

    finish(violations, || NewTicketType {
        event_id,
        name: draft.name,
        description: draft.description,
        price: draft.price,
        quantity_available: draft.quantity_available,
        start_sales_date: draft.start_sales_date,
        end_sales_date: draft.end_sales_date,
    })
}

// ---------------------------------------------------------------------------
// Add-on
// ---------------------------------------------------------------------------

/// Catalogue add-on input (parking, merchandise, ...).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AddOnDraft {
    #[validate(length(min = 2, message = "Add-on name must be at least 2 characters."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be 0 or greater."))]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAddOn {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

pub fn validate_add_on(draft: AddOnDraft) -> Result<NewAddOn, ValidationFailure> {
    let draft = AddOnDraft {
        name: draft.name.trim().to_string(),
        description: non_blank(draft.description),
        ..draft
    };
    let mut violations = collect_violations(draft.validate());
    if !draft.price.is_finite() {
        violations.push(FieldViolation::new("price", "Price must be a number"));
    }

    finish(violations, || NewAddOn {
        name: draft.name,
        description: draft.description,
        price: draft.price,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn collect_violations(result: Result<(), validator::ValidationErrors>) -> Vec<FieldViolation> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            violations.push(FieldViolation::new(field.to_string(), message));
        }
    }
    violations
}

fn sorted_failure(mut violations: Vec<FieldViolation>) -> ValidationFailure {
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    ValidationFailure { violations }
}

fn finish<T>(
    violations: Vec<FieldViolation>,
    build: impl FnOnce() -> T,
) -> Result<T, ValidationFailure> {
    if violations.is_empty() {
        Ok(build())
    } else {
        Err(sorted_failure(violations))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn main_hall() -> VenueDraft {
        VenueDraft {
            name: "Main Hall".into(),
            address: "123 Elm St".into(),
            city: "Springfield".into(),
            zip_code: "62704".into(),
            capacity: 100,
            rental_rate_per_hour: 50.0,
            ..Default::default()
        }
    }

    fn concert(venue_id: &str) -> EventDraft {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 19, 0, 0).unwrap();
        EventDraft {
            name: "Summer Concert".into(),
            venue_id: venue_id.into(),
            start_date: Some(start),
            end_date: Some(start + Duration::hours(3)),
            number_of_tickets: 200,
            price_per_ticket: 25.0,
            description: "An evening of live music.".into(),
        }
    }

    #[test]
    fn valid_venue_is_normalized() {
        let draft = VenueDraft {
            name: "  Main Hall ".into(),
            description: vec![" cozy ".into(), "".into(), "stage".into()],
            email: Some("   ".into()),
            website: Some("https://mainhall.example".into()),
            ..main_hall()
        };
        let venue = validate_venue(draft).unwrap();
        assert_eq!(venue.name, "Main Hall");
        assert_eq!(venue.description, vec!["cozy", "stage"]);
        assert_eq!(venue.email, None);
        assert_eq!(venue.website.as_deref(), Some("https://mainhall.example"));
        assert!(venue.is_active);
    }

    #[test]
    fn short_name_is_reported_on_name() {
        let draft: VenueDraft = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        let failure = validate_venue(draft).unwrap_err();
        assert!(failure.has_field("name"));
    }

    #[test]
    fn all_venue_violations_are_collected_in_field_order() {
        let draft = VenueDraft {
            name: "A".into(),
            address: "1".into(),
            city: "X".into(),
            zip_code: "12".into(),
            capacity: 0,
            rental_rate_per_hour: -1.0,
            email: Some("not-an-email".into()),
            website: Some("nope".into()),
            ..Default::default()
        };
        let failure = validate_venue(draft).unwrap_err();
        let fields: Vec<_> = failure.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "address",
                "capacity",
                "city",
                "email",
                "name",
                "rental_rate_per_hour",
                "website",
                "zip_code",
            ]
        );
    }

    #[test]
    fn whitespace_padding_does_not_satisfy_length_rules() {
        let draft = VenueDraft {
            name: "  A  ".into(),
            ..main_hall()
        };
        assert!(validate_venue(draft).unwrap_err().has_field("name"));
    }

    #[test]
    fn valid_event_passes() {
        let venue_id = EntityId::new_v4();
        let event = validate_event(concert(&venue_id.to_string())).unwrap();
        assert_eq!(event.venue_id, venue_id);
        assert_eq!(event.number_of_tickets, 200);
    }

    #[test]
    fn event_end_before_start_is_rejected() {
        let mut draft = concert(&EntityId::new_v4().to_string());
        draft.end_date = draft.start_date.map(|s| s - Duration::minutes(1));
        let failure = validate_event(draft).unwrap_err();
        assert_eq!(failure.violations.len(), 1);
        assert_eq!(failure.violations[0].field, "end_date");
    }

    #[test]
    fn event_equal_start_and_end_is_allowed() {
        let mut draft = concert(&EntityId::new_v4().to_string());
        draft.end_date = draft.start_date;
        assert!(validate_event(draft).is_ok());
    }

    #[test]
    fn event_missing_fields_are_all_reported() {
        let failure = validate_event(EventDraft::default()).unwrap_err();
        for field in [
            "description",
            "end_date",
            "name",
            "number_of_tickets",
            "start_date",
            "venue_id",
        ] {
            assert!(failure.has_field(field), "missing violation for {field}");
        }
        // Short venue id is reported once, not twice.
        let venue_violations = failure
            .violations
            .iter()
            .filter(|v| v.field == "venue_id")
            .count();
        assert_eq!(venue_violations, 1);
    }

    #[test]
    fn event_venue_must_be_an_id() {
        let failure = validate_event(concert("Main Hall")).unwrap_err();
        assert!(failure.has_field("venue_id"));
    }

    #[test]
    fn ticket_type_sales_window_must_be_ordered() {
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let draft = TicketTypeDraft {
            name: "VIP".into(),
            price: 80.0,
            start_sales_date: Some(start),
            end_sales_date: Some(start - Duration::days(1)),
            ..Default::default()
        };
        let failure = validate_ticket_type(EntityId::new_v4(), draft).unwrap_err();
        assert!(failure.has_field("end_sales_date"));
    }

    #[test]
    fn ticket_type_zero_quantity_is_rejected() {
        let draft = TicketTypeDraft {
            name: "VIP".into(),
            quantity_available: Some(0),
            ..Default::default()
        };
        assert_matches!(
            validate_ticket_type(EntityId::new_v4(), draft),
            Err(f) if f.has_field("quantity_available")
        );
    }

    #[test]
    fn summary_lists_each_violation() {
        let failure = ValidationFailure {
            violations: vec![
                FieldViolation::new("name", "too short"),
                FieldViolation::new("city", "missing"),
            ],
        };
        assert_eq!(failure.summary(), "name: too short; city: missing");
        assert_eq!(failure.to_string(), "2 field(s) failed validation");
    }

    #[test]
    fn add_on_requires_name_and_non_negative_price() {
        let failure = validate_add_on(AddOnDraft {
            name: " P ".into(),
            description: None,
            price: -1.0,
        })
        .unwrap_err();
        assert!(failure.has_field("name"));
        assert!(failure.has_field("price"));

        let ok = validate_add_on(AddOnDraft {
            name: "  Parking ".into(),
            description: Some("   ".into()),
            price: 8.5,
        })
        .unwrap();
        assert_eq!(ok.name, "Parking");
        assert_eq!(ok.description, None);
    }
}
