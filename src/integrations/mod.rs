//! Lead source integrations.

pub mod hubspot {
    pub use crate::hubspot_client::*;
    pub use crate::hubspot_models::*;
}

pub mod google_sheets {
    pub use crate::sheets_client::*;
    pub use crate::sheets_models::*;
}

pub mod sample_data {
    pub use crate::sample_data::*;
}
