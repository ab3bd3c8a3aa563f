use crate::{
    DocsClient, DocsClientArgs,
    commands::{
        Command,
        helpers::{get_path_from_str, load_document_from_file},
    },
};
use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches};
use refy_contract::ContractViolation;
use reqwest::Url;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    BuiltIn,
    File(PathBuf),
    Server(Url),
}

impl TryFrom<&ArgMatches> for DocumentSource {
    type Error = anyhow::Error;

    fn try_from(args: &ArgMatches) -> anyhow::Result<Self> {
        if let Some(file) = args.get_one::<String>("file") {
            return Ok(DocumentSource::File(get_path_from_str(file)?));
        }

        if let Some(base_url) = args.get_one::<String>("base-url") {
            let mut url = Url::parse(base_url)?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            return Ok(DocumentSource::Server(url));
        }

        Ok(DocumentSource::BuiltIn)
    }
}

pub struct CheckCommand;

impl CheckCommand {
    pub async fn load(source: &DocumentSource) -> anyhow::Result<Value> {
        let document = match source {
            DocumentSource::BuiltIn => refy_contract::document_json()?,
            DocumentSource::File(path) => load_document_from_file(path)?,
            DocumentSource::Server(base_url) => {
                let client = DocsClient::new(DocsClientArgs {
                    base_url: base_url.clone(),
                    correlation_id: Uuid::new_v4(),
                })?;
                client.fetch_document().await?
            }
        };

        Ok(document)
    }

    pub async fn check(source: &DocumentSource) -> anyhow::Result<Vec<ContractViolation>> {
        let document = Self::load(source).await?;
        Ok(refy_contract::validate(&document))
    }
}

#[async_trait]
impl Command for CheckCommand {
    fn create(&self) -> clap::Command {
        clap::Command::new("check")
            .about("Check an OpenAPI document against the contract rules")
            .long_flag("check")
            .arg(
                Arg::new("file")
                    .long("file")
                    .short('f')
                    .action(ArgAction::Set)
                    .conflicts_with("base-url")
                    .help("JSON document on disk"),
            )
            .arg(
                Arg::new("base-url")
                    .long("base-url")
                    .short('u')
                    .action(ArgAction::Set)
                    .help("Running docs server, e.g. http://localhost:3000"),
            )
    }

    fn name(&self) -> String {
        "check".to_owned()
    }

    async fn execute(&self, args: &ArgMatches) -> anyhow::Result<()> {
        let source = DocumentSource::try_from(args)?;
        let violations = Self::check(&source).await?;

        if violations.is_empty() {
            info!(?source, "document is consistent");
            println!("No contract violations found.");
            return Ok(());
        }

        println!("Contract violations:");
        for violation in &violations {
            warn!(%violation, "contract violation");
            println!("- {violation}");
        }

        anyhow::bail!("{} contract violation(s) found", violations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(args: &[&str]) -> ArgMatches {
        CheckCommand
            .create()
            .try_get_matches_from(std::iter::once("check").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn source_defaults_to_built_in_document() {
        let source = DocumentSource::try_from(&matches(&[])).unwrap();

        assert_eq!(source, DocumentSource::BuiltIn);
    }

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let source =
            DocumentSource::try_from(&matches(&["--base-url", "http://localhost:3000/refy"]))
                .unwrap();

        assert_eq!(
            source,
            DocumentSource::Server(Url::parse("http://localhost:3000/refy/").unwrap())
        );
    }

    #[test]
    fn file_and_base_url_are_exclusive() {
        let result = CheckCommand.create().try_get_matches_from([
            "check",
            "--file",
            "openapi.json",
            "--base-url",
            "http://localhost:3000",
        ]);

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn built_in_document_has_no_violations() {
        let violations = CheckCommand::check(&DocumentSource::BuiltIn).await.unwrap();

        assert!(violations.is_empty(), "{violations:?}");
    }

    #[tokio::test]
    async fn broken_file_reports_violations_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi.json");
        std::fs::write(
            &path,
            r##"{
                "openapi": "3.0.0",
                "info": { "title": "Broken", "version": "0.0.1" },
                "paths": {
                    "/x": {
                        "get": {
                            "tags": ["Ghost"],
                            "responses": { "200": { "description": "ok" } }
                        }
                    }
                },
                "components": { "schemas": {} }
            }"##,
        )
        .unwrap();

        let violations = CheckCommand::check(&DocumentSource::File(path.clone()))
            .await
            .unwrap();
        assert_eq!(violations.len(), 1);

        let result = CheckCommand
            .execute(&matches(&["--file", path.to_str().unwrap()]))
            .await;
        assert!(result.is_err());
    }
}
