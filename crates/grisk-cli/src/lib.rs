pub mod cli;

pub use cli::{
    build_cli_command, Cli, Commands, DatasetCommands, ListFormat, UrlMode, DEFAULT_RESULTS_PATH,
};
