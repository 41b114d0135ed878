pub mod availability;
pub mod intent;
pub mod message;
pub mod user;

pub use availability::{AvailabilityContext, DeletionCriteria, TimeSlot, Weekday};
pub use intent::{Confidence, IntentLabel, IntentResult};
pub use message::InboundMessage;
pub use user::User;
