// Thin namespace wrapper for API-layer components
pub mod handlers {
    pub use crate::handlers::*;
}

pub mod valuation_handler {
    pub use crate::valuation_handler::*;
}
