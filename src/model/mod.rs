pub mod card;
pub mod event;
pub mod user;

pub use card::{Card, CardQuery};
pub use event::{Event, EventMetadata, EventPayload};
pub use user::{CustomField, CustomFieldType, User, UserPreferences, UserProfile};
