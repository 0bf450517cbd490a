use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use touchgrass_core::ticket_status::TicketStatus;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::{NewAddOn, NewEvent, NewTicketType, NewVenue};
use touchgrass_db::models::add_on::{AddOn, AttachAddOn, EventAddOn};
use touchgrass_db::models::event::{Event, EventWithRelations};
use touchgrass_db::models::ticket::{CreateTicket, Ticket};
use touchgrass_db::models::ticket_type::{TicketType, DEFAULT_TICKET_TYPE_NAME};
use touchgrass_db::models::venue::Venue;
use uuid::Uuid;

use super::EntityStore;
use crate::error::PersistenceError;

#[derive(Debug, Default)]
struct Tables {
    venues: Vec<Venue>,
    events: Vec<Event>,
    ticket_types: Vec<TicketType>,
    add_ons: Vec<AddOn>,
    event_add_ons: Vec<EventAddOn>,
    tickets: Vec<Ticket>,
    user_roles: HashMap<EntityId, String>,
}

impl Tables {
    fn has_venue(&self, id: EntityId) -> bool {
        self.venues.iter().any(|v| v.id == id)
    }

    fn has_event(&self, id: EntityId) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    fn expand(&self, events: Vec<Event>) -> Vec<EventWithRelations> {
        let ids: Vec<EntityId> = events.iter().map(|e| e.id).collect();
        EventWithRelations::assemble(
            events,
            self.venues.clone(),
            self.ticket_types
                .iter()
                .filter(|tt| ids.contains(&tt.event_id))
                .cloned()
                .collect(),
            self.event_add_ons
                .iter()
                .filter(|link| ids.contains(&link.event_id))
                .cloned()
                .collect(),
            self.add_ons.clone(),
        )
    }
}

/// In-process [`EntityStore`] with the same ordering and referential rules
/// as the Postgres schema.
///
/// Every trait call is counted so callers can assert that a code path never
/// reached the store.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    tables: RwLock<Tables>,
    calls: AtomicUsize,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of [`EntityStore`] calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Grant `role` to `user_id`, replacing any previous role.
    pub async fn assign_role(&self, user_id: EntityId, role: &str) {
        self.tables
            .write()
            .await
            .user_roles
            .insert(user_id, role.to_string());
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn create_venue(&self, input: &NewVenue) -> Result<Venue, PersistenceError> {
        self.touch();
        let venue = Venue {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            address: input.address.clone(),
            city: input.city.clone(),
            zip_code: input.zip_code.clone(),
            description: input.description.clone(),
            capacity: input.capacity,
            rental_rate_per_hour: input.rental_rate_per_hour,
            is_active: input.is_active,
            email: input.email.clone(),
            phone: input.phone.clone(),
            website: input.website.clone(),
            media_urls: Vec::new(),
            created_at: Utc::now(),
        };
        self.tables.write().await.venues.push(venue.clone());
        Ok(venue)
    }

    async fn create_event(&self, input: &NewEvent) -> Result<EventWithRelations, PersistenceError> {
        self.touch();
        let mut tables = self.tables.write().await;
        if !tables.has_venue(input.venue_id) {
            return Err(PersistenceError::Referential {
                entity: "Venue",
                id: input.venue_id,
            });
        }

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            description: Some(input.description.clone()),
            start_date: input.start_date,
            end_date: input.end_date,
            venue_id: input.venue_id,
            media_urls: Vec::new(),
            created_at: now,
        };
        let ticket_type = TicketType {
            id: Uuid::new_v4(),
            event_id: event.id,
            name: DEFAULT_TICKET_TYPE_NAME.to_string(),
            description: None,
            price: input.price_per_ticket,
            quantity_available: Some(input.number_of_tickets),
            start_sales_date: None,
            end_sales_date: None,
            created_at: now,
        };
        tables.events.push(event.clone());
        tables.ticket_types.push(ticket_type);

        tables
            .expand(vec![event.clone()])
            .pop()
            .ok_or(PersistenceError::NotFound {
                entity: "Event",
                id: event.id,
            })
    }

    async fn list_venues(&self) -> Result<Vec<Venue>, PersistenceError> {
        self.touch();
        let mut venues = self.tables.read().await.venues.clone();
        venues.sort_by_cached_key(|v| (v.name.to_lowercase(), v.name.clone(), v.id));
        Ok(venues)
    }

    async fn list_events(&self) -> Result<Vec<EventWithRelations>, PersistenceError> {
        self.touch();
        let tables = self.tables.read().await;
        let mut events = tables.events.clone();
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(tables.expand(events))
    }

    async fn find_venue(&self, id: EntityId) -> Result<Option<Venue>, PersistenceError> {
        self.touch();
        let tables = self.tables.read().await;
        Ok(tables.venues.iter().find(|v| v.id == id).cloned())
    }

    async fn find_event(
        &self,
        id: EntityId,
    ) -> Result<Option<EventWithRelations>, PersistenceError> {
        self.touch();
        let tables = self.tables.read().await;
        let found: Vec<Event> = tables.events.iter().filter(|e| e.id == id).cloned().collect();
        Ok(tables.expand(found).pop())
    }

    async fn set_venue_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Venue, PersistenceError> {
        self.touch();
        let mut tables = self.tables.write().await;
        let venue = tables
            .venues
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(PersistenceError::NotFound { entity: "Venue", id })?;
        venue.media_urls = urls.to_vec();
        Ok(venue.clone())
    }

    async fn set_event_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Event, PersistenceError> {
        self.touch();
        let mut tables = self.tables.write().await;
        let event = tables
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(PersistenceError::NotFound { entity: "Event", id })?;
        event.media_urls = urls.to_vec();
        Ok(event.clone())
    }

    async fn create_ticket_type(
        &self,
        input: &NewTicketType,
    ) -> Result<TicketType, PersistenceError> {
        self.touch();
        let mut tables = self.tables.write().await;
        if !tables.has_event(input.event_id) {
            return Err(PersistenceError::Referential {
                entity: "Event",
                id: input.event_id,
            });
        }
        let ticket_type = TicketType {
            id: Uuid::new_v4(),
            event_id: input.event_id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            quantity_available: input.quantity_available,
            start_sales_date: input.start_sales_date,
            end_sales_date: input.end_sales_date,
            created_at: Utc::now(),
        };
        tables.ticket_types.push(ticket_type.clone());
        Ok(ticket_type)
    }

    async fn create_add_on(&self, input: &NewAddOn) -> Result<AddOn, PersistenceError> {
        self.touch();
        let add_on = AddOn {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            created_at: Utc::now(),
        };
        self.tables.write().await.add_ons.push(add_on.clone());
        Ok(add_on)
    }

    async fn attach_add_on(
        &self,
        event_id: EntityId,
        input: &AttachAddOn,
    ) -> Result<EventAddOn, PersistenceError> {
        self.touch();
        let mut tables = self.tables.write().await;
        if !tables.has_event(event_id) {
            return Err(PersistenceError::Referential {
                entity: "Event",
                id: event_id,
            });
        }
        if !tables.add_ons.iter().any(|a| a.id == input.add_on_id) {
            return Err(PersistenceError::Referential {
                entity: "AddOn",
                id: input.add_on_id,
            });
        }
        if tables
            .event_add_ons
            .iter()
            .any(|l| l.event_id == event_id && l.add_on_id == input.add_on_id)
        {
            return Err(PersistenceError::Conflict(
                "Duplicate value violates uq_event_add_ons_event_add_on".into(),
            ));
        }

        let link = EventAddOn {
            id: Uuid::new_v4(),
            event_id,
            add_on_id: input.add_on_id,
            price: input.price,
            created_at: Utc::now(),
        };
        tables.event_add_ons.push(link.clone());
        Ok(link)
    }

    async fn create_ticket(&self, input: &CreateTicket) -> Result<Ticket, PersistenceError> {
        self.touch();
        let mut tables = self.tables.write().await;
        if !tables.ticket_types.iter().any(|tt| tt.id == input.ticket_type_id) {
            return Err(PersistenceError::Referential {
                entity: "TicketType",
                id: input.ticket_type_id,
            });
        }
        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            ticket_type_id: input.ticket_type_id,
            purchaser_id: input.purchaser_id,
            purchase_date: now,
            status: TicketStatus::Active.as_str().to_string(),
            created_at: now,
        };
        tables.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn transition_ticket(
        &self,
        id: EntityId,
        to: TicketStatus,
    ) -> Result<Ticket, PersistenceError> {
        self.touch();
        let mut tables = self.tables.write().await;
        let ticket = tables
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PersistenceError::NotFound { entity: "Ticket", id })?;
        let next = ticket.status()?.transition(to)?;
        ticket.status = next.as_str().to_string();
        Ok(ticket.clone())
    }

    async fn user_role(&self, user_id: EntityId) -> Result<Option<String>, PersistenceError> {
        self.touch();
        Ok(self.tables.read().await.user_roles.get(&user_id).cloned())
    }

    async fn health(&self) -> Result<(), PersistenceError> {
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    use super::*;

    fn venue_input(name: &str) -> NewVenue {
        NewVenue {
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
        }
    }

    fn event_input(venue_id: EntityId, day: u32) -> NewEvent {
        let start = Utc.with_ymd_and_hms(2026, 9, day, 19, 0, 0).unwrap();
        NewEvent {
            name: format!("Gig {day}"),
            description: "Live music all night".into(),
            venue_id,
            start_date: start,
            end_date: start + Duration::hours(3),
            number_of_tickets: 80,
            price_per_ticket: 15.0,
        }
    }

    #[tokio::test]
    async fn event_creation_adds_default_ticket_type() {
        let store = MemoryEntityStore::new();
        let venue = store.create_venue(&venue_input("Main Hall")).await.unwrap();
        let event = store.create_event(&event_input(venue.id, 1)).await.unwrap();

        assert_eq!(event.venue.id, venue.id);
        assert_eq!(event.ticket_types.len(), 1);
        assert_eq!(event.ticket_types[0].name, DEFAULT_TICKET_TYPE_NAME);
        assert_eq!(event.ticket_types[0].price, 15.0);
        assert_eq!(event.ticket_types[0].quantity_available, Some(80));
    }

    #[tokio::test]
    async fn missing_venue_is_referential() {
        let store = MemoryEntityStore::new();
        let ghost = EntityId::new_v4();
        let err = store.create_event(&event_input(ghost, 1)).await.unwrap_err();
        assert_matches!(err, PersistenceError::Referential { entity: "Venue", id } if id == ghost);
        assert!(store.list_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn venues_are_listed_by_name_ignoring_case() {
        let store = MemoryEntityStore::new();
        for name in ["Warehouse", "attic", "Main Hall", "Attic"] {
            store.create_venue(&venue_input(name)).await.unwrap();
        }

        let names: Vec<_> = store
            .list_venues()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Attic", "attic", "Main Hall", "Warehouse"]);
    }

    #[tokio::test]
    async fn events_are_listed_by_start_date() {
        let store = MemoryEntityStore::new();
        let venue = store.create_venue(&venue_input("Main Hall")).await.unwrap();
        store.create_event(&event_input(venue.id, 20)).await.unwrap();
        store.create_event(&event_input(venue.id, 2)).await.unwrap();

        let names: Vec<_> = store
            .list_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.event.name)
            .collect();
        assert_eq!(names, vec!["Gig 2", "Gig 20"]);
    }

    #[tokio::test]
    async fn add_on_attach_rules() {
        let store = MemoryEntityStore::new();
        let venue = store.create_venue(&venue_input("Main Hall")).await.unwrap();
        let event = store.create_event(&event_input(venue.id, 1)).await.unwrap();
        let add_on = store
            .create_add_on(&NewAddOn {
                name: "Parking".into(),
                description: None,
                price: 10.0,
            })
            .await
            .unwrap();
        let attach = AttachAddOn {
            add_on_id: add_on.id,
            price: Some(6.0),
        };

        store.attach_add_on(event.event.id, &attach).await.unwrap();
        assert_matches!(
            store.attach_add_on(event.event.id, &attach).await,
            Err(PersistenceError::Conflict(_))
        );
        assert_matches!(
            store
                .attach_add_on(
                    event.event.id,
                    &AttachAddOn {
                        add_on_id: EntityId::new_v4(),
                        price: None
                    }
                )
                .await,
            Err(PersistenceError::Referential { entity: "AddOn", .. })
        );

        let expanded = store.find_event(event.event.id).await.unwrap().unwrap();
        assert_eq!(expanded.event_add_ons.len(), 1);
        assert_eq!(expanded.event_add_ons[0].effective_price(), 6.0);
    }

    #[tokio::test]
    async fn ticket_transitions_follow_lifecycle() {
        let store = MemoryEntityStore::new();
        let venue = store.create_venue(&venue_input("Main Hall")).await.unwrap();
        let event = store.create_event(&event_input(venue.id, 1)).await.unwrap();
        let ticket = store
            .create_ticket(&CreateTicket {
                ticket_type_id: event.ticket_types[0].id,
                purchaser_id: EntityId::new_v4(),
            })
            .await
            .unwrap();

        let used = store
            .transition_ticket(ticket.id, TicketStatus::Used)
            .await
            .unwrap();
        assert_eq!(used.status().unwrap(), TicketStatus::Used);

        assert_matches!(
            store.transition_ticket(ticket.id, TicketStatus::Cancelled).await,
            Err(PersistenceError::Conflict(_))
        );
        assert_matches!(
            store
                .transition_ticket(EntityId::new_v4(), TicketStatus::Used)
                .await,
            Err(PersistenceError::NotFound { entity: "Ticket", .. })
        );
    }

    #[tokio::test]
    async fn calls_are_counted() {
        let store = MemoryEntityStore::new();
        assert_eq!(store.calls(), 0);
        store.list_venues().await.unwrap();
        store.user_role(EntityId::new_v4()).await.unwrap();
        assert_eq!(store.calls(), 2);
    }
}
