pub mod add_on;
pub mod event;
pub mod ticket;
pub mod ticket_type;
pub mod user_role;
pub mod venue;
