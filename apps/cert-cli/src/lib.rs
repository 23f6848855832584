//! Reserve-service certificate filler
//!
//! Library side of the `reserve-cert` binary: layout configuration, personal
//! profiles, and assembly of the values printed on the certificate.

pub mod config;
pub mod profile;
pub mod values;

pub use config::{Config, DocumentConfig};
pub use profile::load_profile;
pub use values::certificate_values;
