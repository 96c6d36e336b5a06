// Lead pipeline: normalize, filter, aggregate, bin, assemble
pub mod models {
    pub use crate::models::*;
}

pub mod normalizer {
    pub use crate::normalizer::*;
}

pub mod date_filter {
    pub use crate::date_filter::*;
}

pub mod stats {
    pub use crate::stats::*;
}

pub mod trend {
    pub use crate::trend::*;
}

pub mod dashboard {
    pub use crate::dashboard::*;
}
