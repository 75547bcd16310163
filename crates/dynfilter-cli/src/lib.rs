//! # dynfilter-cli - Filter customer files from the command line
//!
//! A thin driver over [`dynfilter`]: the user names a field, an operator and a
//! value, and the matching rows of a customer file are printed.
//!
//! ```text
//! dynfilter filter -i data/customers.yaml -f age -o LessThan --value 19
//! dynfilter filter -i data/customers.yaml -f name -o Contains --value ahmed --output json
//! dynfilter explain -f spendAverage -o GreaterThanOrEqual --value 2000
//! dynfilter fields
//! ```
//!
//! The predicate is compiled before the input is read, so a bad field,
//! operator or value is reported without touching the file.

pub mod cli;
pub mod customer;
pub mod input;
pub mod logging;
pub mod output;

use std::fmt::Write;

use anyhow::Context;
use dynfilter::{filter, Compiler, FilterConfig, PredicateRequest, Record};
use tracing::{debug, info};

pub use cli::{Cli, Command, FilterArgs, PredicateArgs};
pub use customer::Customer;
pub use output::OutputMode;

/// Runs a parsed command and returns what should be printed on stdout.
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = match &cli.config {
        Some(path) => FilterConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FilterConfig::default(),
    };
    debug!(?config, "configuration loaded");
    let compiler = Compiler::new(&config);

    match &cli.command {
        Command::Fields => Ok(fields()),
        Command::Explain(args) => explain(&compiler, args),
        Command::Filter(args) => run_filter(&compiler, args),
    }
}

fn request(args: &PredicateArgs) -> dynfilter::Result<PredicateRequest> {
    PredicateRequest::from_text::<Customer>(&args.field, &args.op, &args.value)
}

fn fields() -> String {
    Customer::schema()
        .fields()
        .iter()
        .map(|field| format!("{:<14}{}", field.name(), field.field_type()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn explain(compiler: &Compiler, args: &PredicateArgs) -> anyhow::Result<String> {
    let request = request(args)?;
    let expr = compiler.expression::<Customer>(&request)?;
    let field = expr.field();

    let mut out = String::new();
    writeln!(out, "predicate: {}", expr)?;
    writeln!(out, "node:      {}", expr.kind())?;
    writeln!(out, "field:     {} ({})", field.name(), field.field_type())?;
    writeln!(out, "operator:  {}", expr.op())?;
    write!(out, "operand:   {}", expr.operand())?;
    Ok(out)
}

fn run_filter(compiler: &Compiler, args: &FilterArgs) -> anyhow::Result<String> {
    let request = request(&args.predicate)?;
    let predicate = compiler.compile::<Customer>(&request)?;

    let customers: Vec<Customer> = input::load_records(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let total = customers.len();

    let matched: Vec<Customer> = filter(customers, predicate).collect();
    info!(%request, total, matched = matched.len(), "filtered customers");

    let title = format!("{} {} {}", args.predicate.field, args.predicate.op, args.predicate.value);
    Ok(output::render(&matched, &title, args.output)?)
}
