pub mod config_resolver;

pub use config_resolver::{resolve, EffectiveItemSettings};
