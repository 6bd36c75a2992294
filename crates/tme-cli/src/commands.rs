use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tme_history::{Fingerprint, LedgerValidator};
use tme_map::InstanceCatalog;
use tme_session::EditorConfig;
use tme_types::TypePath;

use crate::cli::*;
use crate::scenario::{self, Scenario};

pub fn run_command(cli: Cli, config: EditorConfig) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Run(args) => cmd_run(args, &config, format),
        Command::Log(args) => cmd_log(args, &config, format),
        Command::Vars(args) => cmd_vars(args, format),
        Command::Catalog(args) => cmd_catalog(args, &config, format),
        Command::Config(args) => cmd_config(args, config, format),
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_type(path: &str) -> anyhow::Result<TypePath> {
    TypePath::parse(path).with_context(|| format!("invalid type path {path:?}"))
}

fn cmd_run(args: ScenarioArgs, config: &EditorConfig, format: OutputFormat) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let run = scenario::run(&scenario, config)?;
    let session = &run.session;
    let state = session.map().capture();

    if format == OutputFormat::Json {
        return print_json(&json!({
            "map": session.map().name(),
            "steps": run.reports,
            "state": session.state_id(),
            "entries": session.ledger().len(),
            "instances": state.instance_count(),
            "digest": state.fingerprint().to_hex(),
            "can_undo": session.can_undo(),
            "can_redo": session.can_redo(),
        }));
    }

    for report in &run.reports {
        let mark = if report.applied { "✓".green() } else { "·".dimmed() };
        println!(
            "{} {:>3} {:<7} {}  {}",
            mark,
            report.index,
            report.op.bold(),
            report.state.to_string().yellow(),
            report.detail
        );
    }
    println!();
    println!("Map {} at {}", session.map().name().bold(), session.state_id().to_string().yellow().bold());
    println!("  Ledger: {} entries", session.ledger().len());
    println!("  Instances: {}", state.instance_count());
    println!("  Digest: {}", state.fingerprint().short_hex().dimmed());
    if let Some(label) = session.undo_label() {
        println!("  Undo: {}", label.cyan());
    }
    if let Some(label) = session.redo_label() {
        println!("  Redo: {}", label.cyan());
    }
    Ok(())
}

fn cmd_log(args: LogArgs, config: &EditorConfig, format: OutputFormat) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let run = scenario::run(&scenario, config)?;
    let ledger = run.session.ledger();
    let report = LedgerValidator::validate(ledger);

    if format == OutputFormat::Json {
        let entries: Vec<_> = ledger
            .entries()
            .iter()
            .map(|entry| {
                json!({
                    "id": entry.id,
                    "parent": entry.parent,
                    "label": entry.label,
                    "digest": entry.digest.to_hex(),
                    "instances": entry.state.instance_count(),
                })
            })
            .collect();
        return print_json(&json!({
            "current": ledger.current(),
            "entries": entries,
            "valid": report.is_valid(),
        }));
    }

    for entry in ledger.entries().iter().rev() {
        let marker = if entry.id == ledger.current() { "*".green().bold() } else { " ".normal() };
        let parent = entry
            .parent
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into());
        if args.oneline {
            println!("{} {} {} {}", marker, entry.id.to_string().yellow(), entry.digest.short_hex().dimmed(), entry.label);
        } else {
            println!("{} {}  {}", marker, entry.id.to_string().yellow().bold(), entry.digest.short_hex().dimmed());
            println!("    Parent: {}", parent);
            println!("    Label: {}", entry.label);
            println!("    Instances: {}", entry.state.instance_count());
        }
    }
    if report.is_valid() {
        println!("{} History integrity verified", "✓".green().bold());
    } else {
        for violation in &report.violations {
            println!("{} {} {:?}: {}", "✗".red().bold(), violation.id, violation.kind, violation.description);
        }
    }
    Ok(())
}

fn cmd_vars(args: TypeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let environment = scenario.build_environment()?;
    let path = parse_type(&args.path)?;
    let prototype = environment.prototype(&path)?;

    // Types the defaults chain through, nearest first.
    let chain: Vec<TypePath> = std::iter::once(path.clone())
        .chain(path.ancestors().filter(|a| environment.get(a).is_some()))
        .collect();

    let mut names: Vec<&str> = Vec::new();
    let mut level = Some(prototype.vars());
    while let Some(vars) = level {
        for name in vars.names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        level = vars.parent();
    }

    let resolved: Vec<_> = names
        .iter()
        .filter_map(|name| {
            let found = prototype.vars().resolve(name)?;
            let from = chain.get(found.depth).map(TypePath::as_str).unwrap_or("?");
            Some((*name, found.value, from))
        })
        .collect();

    if format == OutputFormat::Json {
        let vars: Vec<_> = resolved
            .iter()
            .map(|(name, value, from)| json!({ "name": name, "value": value, "from": from }))
            .collect();
        return print_json(&json!({ "type": path, "vars": vars }));
    }

    println!("{}", path.as_str().bold());
    for (name, value, from) in resolved {
        let origin = if from == path.as_str() { "".normal() } else { format!("(from {from})").dimmed() };
        println!("  {} = {} {}", name.cyan(), value, origin);
    }
    Ok(())
}

fn cmd_catalog(args: TypeArgs, config: &EditorConfig, format: OutputFormat) -> anyhow::Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let run = scenario::run(&scenario, config)?;
    let path = parse_type(&args.path)?;
    let catalog = InstanceCatalog::collect(&run.environment, &path, [run.session.map()])?;

    if format == OutputFormat::Json {
        let entries: Vec<_> = catalog
            .entries()
            .iter()
            .map(|instance| {
                json!({
                    "name": instance.name(),
                    "icon_state": instance.icon_state(),
                    "overrides": instance.vars().iter().collect::<Vec<_>>(),
                })
            })
            .collect();
        return print_json(&json!({ "type": path, "instances": entries }));
    }

    println!("{} ({} instances)", path.as_str().bold(), catalog.len());
    for (index, instance) in catalog.entries().iter().enumerate() {
        println!("{:>3}. {}", index + 1, instance.name().yellow());
        for line in InstanceCatalog::describe(instance) {
            println!("       {}", line.dimmed());
        }
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, config: EditorConfig, format: OutputFormat) -> anyhow::Result<()> {
    let config = if args.defaults { EditorConfig::default() } else { config };
    if format == OutputFormat::Json {
        return print_json(&serde_json::to_value(&config)?);
    }
    print!("{}", config.to_toml_string()?);
    Ok(())
}
