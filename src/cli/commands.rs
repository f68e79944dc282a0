//! Command handlers for CLI
//!
//! This module implements the `greenland-schema` subcommands.

use crate::config::Settings;
use crate::error::{Result, SchemaError};
use crate::llm::Provider;
use crate::schema::Schema;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Where a JSON-Schema document is read from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Standard input, written as `-`
    Stdin,
    /// A file on disk
    File(PathBuf),
}

impl Source {
    fn parse(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::File(PathBuf::from(arg))
        }
    }

    /// Read the whole document as text
    pub fn read(&self) -> Result<String> {
        match self {
            Source::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
            Source::File(path) => Ok(fs::read_to_string(path)?),
        }
    }

    /// Read and decompile the document
    pub fn load_schema(&self) -> Result<Schema> {
        Schema::from_json_str(&self.read()?)
    }
}

/// Command types
#[derive(Debug, Clone, PartialEq)]
pub enum CommandType {
    /// Compile a JSON-Schema document for a provider
    Compile {
        provider: Option<Provider>,
        source: Source,
    },
    /// Print the request fragment for the provider serving a model
    Request { model: String, source: Source },
    /// Print the IR reconstructed from a JSON-Schema document
    Decompile { source: Source },
    /// Show which provider serves a model
    Route { model: String },
    /// Show help message
    Help,
}

/// Parsed command
#[derive(Debug, Clone)]
pub struct Command {
    /// The type of command
    pub command_type: CommandType,
}

impl Command {
    /// Parse a command from command-line arguments (program name excluded)
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();

        let command_type = match args.as_slice() {
            [] | ["help" | "-h" | "--help", ..] => CommandType::Help,
            ["compile", source] => CommandType::Compile {
                provider: None,
                source: Source::parse(source),
            },
            ["compile", provider, source] => CommandType::Compile {
                provider: Some(provider.parse()?),
                source: Source::parse(source),
            },
            ["compile", ..] => return Err(syntax("compile", "compile [provider] <file|->")),
            ["request", model, source] => CommandType::Request {
                model: model.to_string(),
                source: Source::parse(source),
            },
            ["request", ..] => return Err(syntax("request", "request <model> <file|->")),
            ["decompile", source] => CommandType::Decompile {
                source: Source::parse(source),
            },
            ["decompile", ..] => return Err(syntax("decompile", "decompile <file|->")),
            ["route", model] => CommandType::Route {
                model: model.to_string(),
            },
            ["route", ..] => return Err(syntax("route", "route <model>")),
            [other, ..] => return Err(SchemaError::UnknownCommand(other.to_string())),
        };

        Ok(Command { command_type })
    }
}

fn syntax(command: &str, expected: &str) -> SchemaError {
    SchemaError::InvalidCommandSyntax {
        command: command.to_string(),
        expected: expected.to_string(),
    }
}

/// Handle a command and return the text to print
pub fn handle_command(command: &Command, settings: &Settings) -> Result<String> {
    match &command.command_type {
        CommandType::Compile { provider, source } => {
            let provider = provider.unwrap_or_else(|| settings.default_provider());
            let schema = source.load_schema()?;
            info!(schema = %schema.name, %provider, "compiling schema");
            let document = settings.dialect(provider).compile(&schema);
            Ok(serde_json::to_string_pretty(&document)?)
        }
        CommandType::Request { model, source } => {
            let provider = settings.route(model);
            let schema = source.load_schema()?;
            info!(schema = %schema.name, model = %model, %provider, "building request fragment");
            let fragment = settings.dialect(provider).request_fragment(&schema);
            Ok(serde_json::to_string_pretty(&fragment)?)
        }
        CommandType::Decompile { source } => {
            let schema = source.load_schema()?;
            Ok(serde_json::to_string_pretty(&schema)?)
        }
        CommandType::Route { model } => Ok(settings.route(model).to_string()),
        CommandType::Help => Ok(HELP.trim_start().to_string()),
    }
}

const HELP: &str = r#"
greenland-schema: compile JSON-Schema documents into LLM structured-output dialects

Usage:
  greenland-schema compile [provider] <file|->   Compile for a provider (default from config)
  greenland-schema request <model> <file|->      Request fragment for the provider serving <model>
  greenland-schema decompile <file|->            Print the reconstructed schema
  greenland-schema route <model>                 Show which provider serves <model>
  greenland-schema help                          Show this help message

Providers:
  openai, anthropic, gemini, ollama

Examples:
  greenland-schema compile gemini word_definitions.json
  cat translation.json | greenland-schema request gpt-4o-mini -
  RUST_LOG=debug greenland-schema compile openai sentences.json
"#;

/// Format an error for display
pub fn format_error(error: &SchemaError) -> String {
    format!("Error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::io::Write;

    fn schema_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let document = json!({
            "title": "Word",
            "type": "object",
            "properties": {
                "lemma": {"type": "string", "description": "Base form"},
                "frequency": {"type": "integer", "minimum": 0},
                "notes": {"type": "string"}
            },
            "required": ["lemma", "frequency"]
        });
        write!(file, "{document}").unwrap();
        file
    }

    fn run(args: &[&str]) -> Result<Value> {
        let output = handle_command(&Command::parse(args)?, &Settings::default())?;
        Ok(serde_json::from_str(&output)?)
    }

    #[test]
    fn test_parse_compile_command() {
        let cmd = Command::parse(&["compile", "gemini", "schema.json"]).unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Compile {
                provider: Some(Provider::Gemini),
                source: Source::File(PathBuf::from("schema.json")),
            }
        );

        let cmd = Command::parse(&["compile", "-"]).unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Compile {
                provider: None,
                source: Source::Stdin,
            }
        );
    }

    #[test]
    fn test_parse_other_commands() {
        let cmd = Command::parse(&["route", "gpt-4o"]).unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Route {
                model: "gpt-4o".to_string()
            }
        );

        assert_eq!(Command::parse::<&str>(&[]).unwrap().command_type, CommandType::Help);
        assert_eq!(Command::parse(&["--help"]).unwrap().command_type, CommandType::Help);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse(&["frobnicate"]),
            Err(SchemaError::UnknownCommand(_))
        ));
        assert!(matches!(
            Command::parse(&["compile", "mistral", "schema.json"]),
            Err(SchemaError::UnknownProvider(_))
        ));
        assert!(matches!(
            Command::parse(&["request", "gpt-4o"]),
            Err(SchemaError::InvalidCommandSyntax { .. })
        ));
        assert!(matches!(
            Command::parse(&["route"]),
            Err(SchemaError::InvalidCommandSyntax { .. })
        ));

        let err = Command::parse(&["route"]).unwrap_err();
        assert_eq!(
            format_error(&err),
            "Error: Invalid syntax for 'route', expected: route <model>"
        );
    }

    #[test]
    fn test_compile_command() {
        let file = schema_file();
        let path = file.path().to_str().unwrap();

        let openai = run(&["compile", "openai", path]).unwrap();
        assert_eq!(openai["required"], json!(["lemma", "frequency", "notes"]));
        assert!(openai["properties"]["frequency"].get("minimum").is_none());

        let gemini = run(&["compile", "gemini", path]).unwrap();
        assert_eq!(gemini["required"], json!(["lemma", "frequency"]));
        assert_eq!(gemini["propertyOrdering"], json!(["lemma", "frequency", "notes"]));
    }

    #[test]
    fn test_request_command_routes_model() {
        let file = schema_file();
        let path = file.path().to_str().unwrap();

        let fragment = run(&["request", "claude-3-5-haiku", path]).unwrap();
        assert_eq!(fragment["tool_choice"]["name"], "Word");

        let fragment = run(&["request", "llama3.1:8b", path]).unwrap();
        assert_eq!(fragment["format"]["additionalProperties"], json!(false));
    }

    #[test]
    fn test_decompile_command() {
        let file = schema_file();
        let ir = run(&["decompile", file.path().to_str().unwrap()]).unwrap();
        assert_eq!(ir["name"], "Word");
        assert_eq!(ir["properties"]["notes"]["required"], json!(false));
        assert_eq!(ir["properties"]["frequency"]["minimum"], json!(0));
    }

    #[test]
    fn test_route_and_help() {
        let settings = Settings::default();
        let route = Command::parse(&["route", "gemini-1.5-pro"]).unwrap();
        assert_eq!(handle_command(&route, &settings).unwrap(), "gemini");

        let help = handle_command(&Command::parse(&["help"]).unwrap(), &settings).unwrap();
        assert!(help.starts_with("greenland-schema:"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cmd = Command::parse(&["decompile", "/nonexistent/schema.json"]).unwrap();
        let err = handle_command(&cmd, &Settings::default()).unwrap_err();
        assert!(matches!(err, SchemaError::Io(_)));
        assert!(format_error(&err).starts_with("Error: IO error"));
    }
}
