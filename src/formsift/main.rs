use clap::Parser;
use directories::ProjectDirs;
use formsift::config::FilterConfig;
use formsift::engine::{EvalContext, StyleRule, StyleSlot};
use formsift::error::Result;
use formsift::field::FieldEntry;
use formsift::filter::Filter;
use formsift::model::Form;
use formsift::query;
use formsift::source::{CandidateSource, FormSource};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
mod cli;

use args::{Cli, Commands};
use cli::input::{load_document, load_forms, parse_fields};
use cli::print::{print_items, print_messages};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Filter {
            items,
            form,
            form_name,
            fields,
            target,
            rows,
            hideblank,
            json,
        } => {
            let config = FilterConfig {
                form: form_name.or(config.form),
                target: target.or(config.target),
                rows: rows.or(config.rows),
                hideblank: hideblank || config.hideblank,
                ..config
            };
            handle_filter(config, items, form, &fields, json)
        }
        Commands::Query {
            fields,
            rows,
            scope,
        } => handle_query(&config, &fields, rows.or(config.rows.clone()), scope),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(dir: Option<&PathBuf>) -> Result<FilterConfig> {
    match dir {
        Some(dir) => FilterConfig::load(dir),
        None => Ok(ProjectDirs::from("com", "formsift", "formsift")
            .and_then(|dirs| FilterConfig::load(dirs.config_dir()).ok())
            .unwrap_or_default()),
    }
}

fn handle_filter(
    config: FilterConfig,
    items: PathBuf,
    form: Option<PathBuf>,
    fields: &[String],
    json: bool,
) -> Result<()> {
    let document = load_document(&items)?;
    let mut forms = match form {
        Some(path) => load_forms(&path)?,
        None => vec![Form::default()],
    };

    let fields = parse_fields(fields)?;
    if !fields.is_empty() {
        if forms.is_empty() {
            forms.push(Form::default());
        }
        let name = forms
            .resolve(config.form.as_deref())
            .and_then(|f| f.name.clone());
        if let Some(target) = forms.iter_mut().find(|f| f.name == name) {
            for (field, value) in fields {
                target.set(&field, value);
            }
        }
    }

    let target = config.target.clone();
    let mut filter = Filter::new(config, forms, document, StyleSlot::new());
    let outcome = filter.filter()?;
    print_messages(filter.messages());

    let container = filter.candidates().container(target.as_deref())?;

    let mut marked = HashSet::new();
    if let Some(outcome) = &outcome {
        for mark in &outcome.evaluation.result.marks {
            marked.insert((outcome.evaluation.candidates[mark.item], mark.path.clone()));
        }
    }

    if json {
        let found = outcome
            .as_ref()
            .map(|o| o.evaluation.found_items())
            .unwrap_or_else(|| (0..container.items.len()).collect());
        let mut marks: Vec<_> = marked.into_iter().collect();
        marks.sort();
        let report = serde_json::json!({
            "found": found,
            "hidden": container.hidden_states(),
            "marks": marks
                .into_iter()
                .map(|(item, path)| serde_json::json!({ "item": item, "path": path }))
                .collect::<Vec<_>>(),
            "style": filter.style().css(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_items(container, &marked);
    }

    Ok(())
}

fn handle_query(
    config: &FilterConfig,
    fields: &[String],
    rows: Option<String>,
    scope: Option<String>,
) -> Result<()> {
    let entries = FieldEntry::active(parse_fields(fields)?);
    let (match_query, highlight) = query::build(&entries, &config.component);

    println!("match:     {}", match_query.selector(rows.as_deref()));
    if highlight.is_empty() {
        println!("highlight: (none)");
        return Ok(());
    }
    println!("highlight: {}", highlight.selector());

    if let Some(scope) = scope {
        let ctx = EvalContext {
            component: &config.component,
            scope_key: Some(scope.as_str()),
            rows: rows.as_deref(),
            hide_blank: config.hideblank,
            mark_fallback: &config.mark_fallback,
            mark_text_fallback: &config.mark_text_fallback,
        };
        println!("rule:      {}", StyleRule::new(&ctx, &scope, &highlight).css());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_filter_fields() {
        let cli = Cli::try_parse_from([
            "formsift",
            "filter",
            "--items",
            "items.json",
            "-f",
            "color=red",
            "-f",
            "name:hi=ada",
            "--hideblank",
        ])
        .unwrap();
        match cli.command {
            Commands::Filter {
                fields, hideblank, ..
            } => {
                assert_eq!(fields, vec!["color=red", "name:hi=ada"]);
                assert!(hideblank);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
