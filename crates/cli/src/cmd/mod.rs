mod apps;
mod build;
mod clean;
mod list;
mod ubench;
mod workflows;

pub use apps::cmd_apps;
pub use build::BuildArgs;
pub use clean::{ProjectArg, cmd_clean};
pub use list::cmd_list;
pub use ubench::cmd_ubench;
pub use workflows::cmd_workflows;
