//! Repository layer: one unit struct per table, all queries take `&PgPool`.

pub mod add_on_repo;
pub mod event_repo;
pub mod ticket_repo;
pub mod ticket_type_repo;
pub mod user_role_repo;
pub mod venue_repo;

pub use add_on_repo::AddOnRepo;
pub use event_repo::EventRepo;
pub use ticket_repo::TicketRepo;
pub use ticket_type_repo::TicketTypeRepo;
pub use user_role_repo::UserRoleRepo;
pub use venue_repo::VenueRepo;
