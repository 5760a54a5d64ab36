pub mod command;
pub mod config;
pub mod driver;
pub mod event;
pub mod hostmask;
pub mod params;

pub use command::Command;
pub use config::{BotConfig, ConfigError};
pub use driver::Driver;
pub use event::{Event, RequestCommand, RequestEvent, ResponseCode, ResponseEvent};
pub use hostmask::Hostmask;
pub use params::ConnectionParams;
