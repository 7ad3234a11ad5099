// Domain-layer modules: form schema, message rendering and models
pub mod lead_form {
    pub use crate::lead_form::*;
}

pub mod message_format {
    pub use crate::message_format::*;
}

pub mod models {
    pub use crate::models::*;
}
