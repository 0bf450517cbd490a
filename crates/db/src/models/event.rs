//! Event entity model and its relation-expanded read shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchgrass_core::types::{EntityId, Timestamp};

use crate::models::add_on::{AddOn, EventAddOn, EventAddOnDetail};
use crate::models::ticket_type::TicketType;
use crate::models::venue::Venue;

/// An event row from the `events` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub venue_id: EntityId,
    pub media_urls: Vec<String>,
    pub created_at: Timestamp,
}

/// An event with its venue, ticket types and add-ons expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWithRelations {
    #[serde(flatten)]
    pub event: Event,
    pub venue: Venue,
    pub ticket_types: Vec<TicketType>,
    pub event_add_ons: Vec<EventAddOnDetail>,
}

impl EventWithRelations {
    /// Join flat rows into expanded events, keeping the order of `events`.
    ///
    /// Events whose venue is missing from `venues` are dropped; links whose
    /// add-on is missing are skipped. Both indicate rows deleted between the
    /// individual selects.
    pub fn assemble(
        events: Vec<Event>,
        venues: Vec<Venue>,
        ticket_types: Vec<TicketType>,
        links: Vec<EventAddOn>,
        add_ons: Vec<AddOn>,
    ) -> Vec<EventWithRelations> {
        let venues: HashMap<EntityId, Venue> = venues.into_iter().map(|v| (v.id, v)).collect();
        let add_ons: HashMap<EntityId, AddOn> = add_ons.into_iter().map(|a| (a.id, a)).collect();

        let mut types_by_event: HashMap<EntityId, Vec<TicketType>> = HashMap::new();
        for tt in ticket_types {
            types_by_event.entry(tt.event_id).or_default().push(tt);
        }

        let mut links_by_event: HashMap<EntityId, Vec<EventAddOnDetail>> = HashMap::new();
        for link in links {
            let Some(add_on) = add_ons.get(&link.add_on_id) else {
                tracing::warn!(
                    event_id = %link.event_id,
                    add_on_id = %link.add_on_id,
                    "Skipping event add-on with missing add-on row"
                );
                continue;
            };
            links_by_event
                .entry(link.event_id)
                .or_default()
                .push(EventAddOnDetail {
                    add_ons: add_on.clone(),
                    link,
                });
        }

        events
            .into_iter()
            .filter_map(|event| {
                let Some(venue) = venues.get(&event.venue_id).cloned() else {
                    tracing::warn!(
                        event_id = %event.id,
                        venue_id = %event.venue_id,
                        "Skipping event with missing venue row"
                    );
                    return None;
                };
                Some(EventWithRelations {
                    ticket_types: types_by_event.remove(&event.id).unwrap_or_default(),
                    event_add_ons: links_by_event.remove(&event.id).unwrap_or_default(),
                    venue,
                    event,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn venue(name: &str) -> Venue {
        Venue {
            id: EntityId::new_v4(),
            name: name.into(),
            address: "123 Elm St".into(),
            city: "Springfield".into(),
            zip_code: "62704".into(),
            description: vec![],
            capacity: 100,
            rental_rate_per_hour: 50.0,
            is_active: true,
            email: None,
            phone: None,
            website: None,
            media_urls: vec![],
            created_at: Utc::now(),
        }
    }

    fn event(venue_id: EntityId, hours_from_now: i64) -> Event {
        let start = Utc::now() + Duration::hours(hours_from_now);
        Event {
            id: EntityId::new_v4(),
            name: "Gig".into(),
            description: None,
            start_date: start,
            end_date: start + Duration::hours(2),
            venue_id,
            media_urls: vec![],
            created_at: Utc::now(),
        }
    }

    fn ticket_type(event_id: EntityId, name: &str) -> TicketType {
        TicketType {
            id: EntityId::new_v4(),
            event_id,
            name: name.into(),
            description: None,
            price: 10.0,
            quantity_available: Some(50),
            start_sales_date: None,
            end_sales_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn relations_are_attached_to_their_event() {
        let hall = venue("Main Hall");
        let first = event(hall.id, 1);
        let second = event(hall.id, 2);
        let parking = AddOn {
            id: EntityId::new_v4(),
            name: "Parking".into(),
            description: None,
            price: 5.0,
            created_at: Utc::now(),
        };
        let link = EventAddOn {
            id: EntityId::new_v4(),
            event_id: second.id,
            add_on_id: parking.id,
            price: Some(3.0),
            created_at: Utc::now(),
        };

        let expanded = EventWithRelations::assemble(
            vec![first.clone(), second.clone()],
            vec![hall.clone()],
            vec![ticket_type(first.id, "GA"), ticket_type(second.id, "VIP")],
            vec![link],
            vec![parking],
        );

        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].event.id, first.id);
        assert_eq!(expanded[0].venue.id, hall.id);
        assert_eq!(expanded[0].ticket_types[0].name, "GA");
        assert!(expanded[0].event_add_ons.is_empty());
        assert_eq!(expanded[1].ticket_types[0].name, "VIP");
        assert_eq!(expanded[1].event_add_ons[0].effective_price(), 3.0);
    }

    #[test]
    fn events_without_venue_rows_are_dropped() {
        let orphan = event(EntityId::new_v4(), 1);
        let expanded = EventWithRelations::assemble(vec![orphan], vec![], vec![], vec![], vec![]);
        assert!(expanded.is_empty());
    }

    #[test]
    fn serializes_with_flattened_event_fields() {
        let hall = venue("Main Hall");
        let gig = event(hall.id, 1);
        let expanded = EventWithRelations::assemble(vec![gig.clone()], vec![hall], vec![], vec![], vec![]);
        let json = serde_json::to_value(&expanded[0]).unwrap();
        assert_eq!(json["id"], gig.id.to_string());
        assert_eq!(json["venue"]["name"], "Main Hall");
        assert!(json["ticket_types"].as_array().unwrap().is_empty());
    }
}
