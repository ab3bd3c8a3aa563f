use crate::commands::{Command, helpers::get_path_from_str};
use anyhow::Context;
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches};
use std::path::PathBuf;
use tracing::info;

struct ExportCommandArgs {
    output: Option<PathBuf>,
}

impl TryFrom<&ArgMatches> for ExportCommandArgs {
    type Error = anyhow::Error;

    fn try_from(args: &ArgMatches) -> anyhow::Result<Self> {
        let output = args
            .get_one::<String>("output")
            .map(|o| get_path_from_str(o))
            .transpose()?;

        Ok(Self { output })
    }
}

pub struct ExportCommand;

impl ExportCommand {
    pub fn render() -> anyhow::Result<String> {
        let document = refy_contract::document_json()?;
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

#[async_trait]
impl Command for ExportCommand {
    fn create(&self) -> clap::Command {
        clap::Command::new("export")
            .about("Write the built-in OpenAPI document as JSON")
            .long_flag("export")
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .help("File to write the document to (stdout when omitted)"),
            )
    }

    fn name(&self) -> String {
        "export".to_owned()
    }

    async fn execute(&self, args: &ArgMatches) -> anyhow::Result<()> {
        let args = ExportCommandArgs::try_from(args)?;
        let rendered = Self::render()?;

        match args.output {
            Some(path) => {
                std::fs::write(&path, rendered)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "document exported");
            }
            None => println!("{rendered}"),
        }

        Ok(())
    }
}
