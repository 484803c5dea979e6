//! CLI command implementations.

mod config;
mod create;
mod doctor;
mod generate;
mod init;
mod render;
mod serve;

pub use config::run_config;
pub use create::run_create;
pub use doctor::run_doctor;
pub use generate::run_generate;
pub use init::run_init;
pub use render::run_render;
pub use serve::run_serve;
