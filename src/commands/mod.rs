// ABOUTME: Command module aggregator for the dockhand CLI.
// ABOUTME: Re-exports the per-subcommand handlers.

mod down;
mod init;
mod pull;
mod setup;
mod status;
mod up;

pub use down::down;
pub use init::init;
pub use pull::pull;
pub use setup::setup;
pub use status::status;
pub use up::up;
