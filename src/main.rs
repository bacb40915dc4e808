//! Main binary for the runpage CLI

use clap::{Arg, Command};
use runpage::{create_tool_registry, RunpageConfig, ToolArgs};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the page JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Tool names and descriptions do not depend on config
    let catalog = create_tool_registry(&RunpageConfig::default());
    let tool_info: Vec<(&'static str, &'static str)> = catalog
        .list_tools()
        .into_iter()
        .filter_map(|name| {
            catalog.get_tool(&name).map(|tool| {
                let name_static: &'static str = Box::leak(name.into_boxed_str());
                let desc_static: &'static str =
                    Box::leak(tool.description().to_string().into_boxed_str());
                (name_static, desc_static)
            })
        })
        .collect();

    let mut app = Command::new("runpage")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Character-budget pages of trace runs and thread messages for LLM clients")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Config file (default: config/runpage.toml when present)"),
        );

    for (tool_name, description) in &tool_info {
        app = app.subcommand(
            Command::new(*tool_name).about(*description).arg(
                Arg::new("args")
                    .help("Tool arguments: <path> [--key=value ...]")
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true)
                    .value_name("ARGS"),
            ),
        );
    }

    let matches = app.get_matches();

    let config = match RunpageConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let registry = create_tool_registry(&config);

    match matches.subcommand() {
        Some((tool_name, sub_matches)) => {
            let args: Vec<String> = sub_matches
                .get_many::<String>("args")
                .unwrap_or_default()
                .cloned()
                .collect();

            let tool_args = ToolArgs::from_args(args.as_slice());

            match registry.execute_tool(tool_name, &tool_args) {
                Ok(result) => {
                    println!("{}", result.message);
                    if !result.success {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            eprintln!("No tool specified");
            std::process::exit(1);
        }
    }

    Ok(())
}
