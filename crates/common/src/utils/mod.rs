pub mod logging;
pub mod serde_helpers;
