// Every subcommand implements `Command` and registers itself in
// `get_commands`; `main` builds the clap tree from that registry.
mod check;
mod export;
mod helpers;

pub use check::{CheckCommand, DocumentSource};
pub use export::ExportCommand;
pub use helpers::{get_path_from_str, load_document_from_file};

use async_trait::async_trait;
use clap::ArgMatches;
use std::collections::HashMap;

#[async_trait]
pub trait Command {
    async fn execute(&self, args: &ArgMatches) -> anyhow::Result<()>;

    fn create(&self) -> clap::Command;

    fn name(&self) -> String;
}

pub fn get_commands() -> HashMap<String, Box<dyn Command>> {
    let mut result = HashMap::new();

    let commands: Vec<Box<dyn Command>> = vec![Box::new(ExportCommand), Box::new(CheckCommand)];

    for command in commands {
        result.insert(command.name(), command);
    }

    result
}
