//! Contact form plumbing: the message model, validation, a message store,
//! the local contact API and a client for an external form relay.

mod api;
mod message;
mod relay;
mod store;

pub use api::{ApiResponse, ContactApi};
pub use message::{ContactMessage, Field, StoredMessage, ValidationError};
pub use relay::{RelayClient, RelayError};
pub use store::{MemoryStore, MessageStore, StoreError};
