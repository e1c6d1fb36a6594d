use crate::cli::{ApplyArgs, Cli, Command, ExportArgs, ImportArgs, InitArgs};
use crate::config::FileConfig;
use crate::prompt::PromptResolver;
use anyhow::{Context, Result};
use json2capella_import::{
    ChangeApplicator, ImportError, ImportSet, Importer, export_package, list_packages, load_model,
    read_change_set, save_model, write_change_set,
};
use json2capella_model::{ConflictResolver, Model};
use serde::Serialize;
use std::fs;
use std::io::Write;
use tracing::info;

/// Runs one command, prompting on the terminal for `ask` conflicts.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init(args) => init(&args),
        Command::Import(args) => {
            let config = FileConfig::load(cli.config.as_deref())?;
            let mut prompt = PromptResolver::stdio();
            import(&args, &config, &mut prompt)
        }
        Command::Apply(args) => apply(&args),
        Command::Export(args) => export(&args, &mut std::io::stdout().lock()),
    }
}

/// Process exit code for a failed run.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let import_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ImportError>());
    match import_error {
        Some(ImportError::Parse { .. }) => 2,
        Some(ImportError::Conflict { .. }) => 3,
        Some(ImportError::Configuration(_) | ImportError::InvalidChange(_)) => 4,
        _ => 1,
    }
}

pub fn init(args: &InitArgs) -> Result<()> {
    if args.model.exists() && !args.force {
        return Err(ImportError::Configuration(format!(
            "{} already exists; pass --force to overwrite it",
            args.model.display()
        ))
        .into());
    }
    let model = Model::new(&args.name);
    save_model(&args.model, &model)?;
    info!("Created model '{}' at {}", model.name, args.model.display());
    Ok(())
}

pub fn import(
    args: &ImportArgs,
    config: &FileConfig,
    resolver: &mut dyn ConflictResolver,
) -> Result<()> {
    let options = config.import_options(args)?;
    let mut model = load_model(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    let input = ImportSet::load(&args.input)?;
    info!(
        "Read {} elements from {} file(s)",
        input.element_count(),
        input.files.len()
    );

    let importer = Importer::new(options);
    match &args.output {
        Some(output) => {
            let set = importer.plan(&model, &input, Some(resolver))?;
            write_change_set(output, &set)
                .with_context(|| format!("Failed to write change file {}", output.display()))?;
            info!("Wrote {} ({}) to {}", set.len(), set.summary(), output.display());
        }
        None => {
            let summary = importer.import(&mut model, &input, Some(resolver))?;
            save_model(&args.model, &model)
                .with_context(|| format!("Failed to save model {}", args.model.display()))?;
            info!("Updated {}: {}", args.model.display(), summary);
        }
    }
    Ok(())
}

pub fn apply(args: &ApplyArgs) -> Result<()> {
    let mut model = load_model(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    let set = read_change_set(&args.changes)
        .with_context(|| format!("Failed to read change file {}", args.changes.display()))?;
    let summary = ChangeApplicator::new().apply(&mut model, &set)?;
    save_model(&args.model, &model)
        .with_context(|| format!("Failed to save model {}", args.model.display()))?;
    info!("Updated {}: {}", args.model.display(), summary);
    Ok(())
}

/// Exports a package as JSON, or lists the model's data packages, to
/// `--output` or `out`.
pub fn export(args: &ExportArgs, out: &mut dyn Write) -> Result<()> {
    let model = load_model(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;

    let text = if args.list {
        let mut text = String::from("The following data packages were found in the model:\n");
        for package in list_packages(&model) {
            text.push_str(&format!(
                "  {} {} {} ({})\n",
                package.layer, package.id, package.path, package.name
            ));
        }
        text
    } else {
        let reference = args.package.as_deref().ok_or_else(|| {
            ImportError::Configuration("--package is required (use --list to find a package)".into())
        })?;
        let package = export_package(&model, reference)?;
        let mut text = to_json(&package, args.indent)?;
        text.push('\n');
        text
    };

    match &args.output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, indent: i32) -> Result<String> {
    let Ok(width) = usize::try_from(indent) else {
        return Ok(serde_json::to_string(value)?);
    };
    let indent = " ".repeat(width);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}
