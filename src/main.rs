// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use pybridge::config::{load_and_validate_config, BridgeConfig};
use pybridge::{observability, Bridge, JsonFileStore};
use serde_json::Value;
use std::env;

fn print_usage(program: &str) {
    eprintln!("Usage: {} [--config <file>] call <script.py> <function> [json-arg ...]", program);
    eprintln!("       {} [--config <file>] var get <name>", program);
    eprintln!("       {} [--config <file>] var set <name> <json-value>", program);
    eprintln!("       {} [--config <file>] var delete <name>", program);
    eprintln!("       {} [--config <file>] var list", program);
    eprintln!("Example: {} call scripts/math.py add 2 3", program);
    eprintln!("Example: {} var set threshold 0.75", program);
}

#[tokio::main]
async fn main() {
    if let Err(e) = observability::init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("pybridge");

    let (config_file, rest) = match args.get(1).map(String::as_str) {
        Some("--config") => match args.get(2) {
            Some(file) => (Some(file.as_str()), &args[3..]),
            None => {
                print_usage(program);
                std::process::exit(1);
            }
        },
        _ => (None, args.get(1..).unwrap_or(&[])),
    };

    if rest.is_empty() {
        print_usage(program);
        std::process::exit(1);
    }

    if let Err(e) = run(config_file, rest).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config_file: Option<&str>, args: &[String]) -> anyhow::Result<()> {
    let config = match config_file {
        Some(file) => load_and_validate_config(file)
            .with_context(|| format!("Failed to load config {}", file))?,
        None => BridgeConfig::default(),
    };

    match args[0].as_str() {
        "call" => run_call(&config, &args[1..]).await,
        "var" => run_var(&config, &args[1..]),
        other => bail!("unknown command '{}'", other),
    }
}

async fn run_call(config: &BridgeConfig, args: &[String]) -> anyhow::Result<()> {
    let (script, function, raw_args) = match args {
        [script, function, rest @ ..] => (script, function, rest),
        _ => bail!("call needs <script.py> <function>"),
    };

    let call_args: Vec<Value> = raw_args.iter().map(|raw| parse_json_arg(raw)).collect();

    let bridge = Bridge::new(config);
    let result = bridge
        .invoke(script, function, call_args)
        .await
        .with_context(|| format!("{} in {} failed", function, script))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_var(config: &BridgeConfig, args: &[String]) -> anyhow::Result<()> {
    let store = JsonFileStore::from(&config.store);
    let path = store.path().display().to_string();

    match args {
        [cmd, name] if cmd == "get" => match store.get(name)? {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => bail!("variable '{}' is not set in {}", name, path),
        },
        [cmd, name, raw] if cmd == "set" => store.set(name.as_str(), parse_json_arg(raw))?,
        [cmd, name] if cmd == "delete" => {
            if !store.delete(name)? {
                bail!("variable '{}' is not set in {}", name, path);
            }
        }
        [cmd] if cmd == "list" => {
            let variables = store.load()?;
            println!("{}", serde_json::to_string_pretty(&variables)?);
        }
        _ => bail!("var needs one of: get <name> | set <name> <json-value> | delete <name> | list"),
    }

    Ok(())
}

/// Arguments are JSON; anything that doesn't parse is taken as a bare string.
fn parse_json_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
