//! Output engines and the GPIO driver they feed.

pub mod indicator;
pub mod outputs;
pub mod siren;
