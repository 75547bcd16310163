//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputMode;

/// Filter customer files with predicates chosen at run time.
#[derive(Debug, Parser)]
#[command(name = "dynfilter", version, about)]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the customers that satisfy a predicate
    Filter(FilterArgs),
    /// List the queryable fields and their types
    Fields,
    /// Show how a predicate is resolved, without reading any data
    Explain(PredicateArgs),
}

/// The (field, operator, value) triple.
#[derive(Debug, Clone, Args)]
pub struct PredicateArgs {
    /// Field name, e.g. `age` or `spendAverage`
    #[arg(short, long)]
    pub field: String,

    /// Operator, e.g. `LessThan`, `Contains`
    #[arg(short, long)]
    pub op: String,

    /// Value, read according to the field's type
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Customer file (.json, .yaml, .yml or .csv)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    #[command(flatten)]
    pub predicate: PredicateArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputMode::Auto)]
    pub output: OutputMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_filter() {
        let cli = Cli::try_parse_from([
            "dynfilter", "-vv", "filter", "-i", "c.yaml", "-f", "age", "-o", "LessThan",
            "--value", "-3", "--output", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Filter(args) => {
                assert_eq!(args.predicate.field, "age");
                assert_eq!(args.predicate.value, "-3");
                assert_eq!(args.output, OutputMode::Json);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn output_defaults_to_auto() {
        let cli = Cli::try_parse_from([
            "dynfilter", "filter", "-i", "c.csv", "-f", "name", "-o", "Contains", "--value", "a",
        ])
        .unwrap();
        match cli.command {
            Command::Filter(args) => assert_eq!(args.output, OutputMode::Auto),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn explain_requires_value() {
        assert!(Cli::try_parse_from(["dynfilter", "explain", "-f", "age", "-o", "Equal"]).is_err());
    }
}
