//! External service integrations.

pub mod telegram_client {
    pub use crate::telegram_client::*;
}
