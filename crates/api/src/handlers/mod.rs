pub mod add_on;
pub mod event;
pub mod submission;
pub mod ticket;
pub mod venue;
