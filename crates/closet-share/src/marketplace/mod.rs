pub mod disputes;
pub mod listings;
pub mod messaging;
pub mod notifications;
