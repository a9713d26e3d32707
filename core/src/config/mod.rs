pub mod load;
pub mod types;

pub use load::{load_default, load_from};
pub use types::{ApiConfig, AppConfig, LoggingConfig};
