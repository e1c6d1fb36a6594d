use clap::{Args, Parser, Subcommand};
use json2capella_model::ConflictPolicy;
use json2capella_types::Layer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "json2capella", version)]
#[command(about = "Import JSON data definitions into the data package of a Capella model")]
pub struct Cli {
    /// TOML file with defaults for layer, policy, root and types
    /// [default: json2capella.toml, if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty model with a data package in every layer
    Init(InitArgs),
    /// Import JSON definitions into a model, or write the planned changes to a file
    Import(ImportArgs),
    /// Apply a change file to a model
    Apply(ApplyArgs),
    /// Export a data package as JSON definitions
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path of the model file to create
    #[arg(short, long)]
    pub model: PathBuf,

    /// Model name
    #[arg(short, long, default_value = "model")]
    pub name: String,

    /// Overwrite an existing model file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON definition file, or a directory of them
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to the model file
    #[arg(short, long)]
    pub model: PathBuf,

    /// Layer whose data package is the target (oa, sa, la, pa)
    #[arg(short, long)]
    pub layer: Option<Layer>,

    /// Id or name of the package to import into [default: the layer's data package]
    #[arg(short, long)]
    pub root: Option<String>,

    /// Id or name of the package holding primitive types [default: "Data Types"]
    #[arg(short, long)]
    pub types: Option<String>,

    /// What to do when an element already exists (skip, replace, abort, ask)
    #[arg(short, long, visible_alias = "action")]
    pub policy: Option<ConflictPolicy>,

    /// Write a change file (YAML, or JSON for *.json) instead of modifying the model
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Change file written by `import --output`
    #[arg(short = 'f', long = "changes")]
    pub changes: PathBuf,

    /// Path to the model file
    #[arg(short, long)]
    pub model: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the model file
    #[arg(short, long)]
    pub model: PathBuf,

    /// Id or name of the data package to export
    #[arg(short, long, required_unless_present = "list")]
    pub package: Option<String>,

    /// List all data packages found in the model
    #[arg(short, long)]
    pub list: bool,

    /// Output file [default: stdout]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Indent JSON output by this many spaces per level; -1 for compact output
    #[arg(
        long,
        default_value_t = 2,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-1..)
    )]
    pub indent: i32,
}
