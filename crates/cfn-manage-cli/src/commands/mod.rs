//! CLI command implementations

pub mod create;
pub mod delete;
pub mod show;
pub mod update;

// Export command functions with clear names
pub use create::execute as execute_create;
pub use delete::execute as execute_delete;
pub use show::execute as execute_show;
pub use update::execute as execute_update;
