//! Configuration domain module

mod app_config;
mod share_target;

pub use app_config::AppConfig;
pub use share_target::ShareTarget;
