use clap::Parser;
use json2capella::cli::{Command, ExportArgs, ImportArgs};
use json2capella::{Cli, FileConfig, PromptResolver, commands, exit_code};
use json2capella_import::{load_model, read_change_set};
use json2capella_model::{
    Conflict, ConflictPolicy, ConflictResolver, DataElement, ElementData, ModelElement, Origin,
    Resolution, ScriptedResolver,
};
use json2capella_types::{ElementId, Layer, ScopePath};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

const VEHICLES: &str = r#"{
    "name": "Vehicles",
    "structs": [{
        "name": "Vehicle",
        "attrs": [{ "name": "id", "dataType": "uint32", "multiplicity": "0..*" }]
    }]
}"#;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("json2capella").chain(args.iter().copied())).unwrap()
}

fn import_args(cli: Cli) -> ImportArgs {
    match cli.command {
        Command::Import(args) => args,
        other => panic!("expected import, got {other:?}"),
    }
}

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fs::write(ws.path("vehicles.json"), VEHICLES).unwrap();
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    fn init(&self) {
        let cli = parse(&["init", "-m", &self.arg("model.json")]);
        let Command::Init(args) = cli.command else {
            panic!("expected init");
        };
        commands::init(&args).unwrap();
    }

    fn import(&self, extra: &[&str]) -> anyhow::Result<()> {
        let mut args = vec![
            "import".to_string(),
            "-i".to_string(),
            self.arg("vehicles.json"),
            "-m".to_string(),
            self.arg("model.json"),
            "-l".to_string(),
            "la".to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let mut resolver = ScriptedResolver::always(Resolution::Abort);
        commands::import(&import_args(parse(&refs)), &FileConfig::default(), &mut resolver)
    }
}

fn conflict_answer(input: &str) -> (Resolution, String) {
    let existing = ModelElement::new(ElementId::new(), "Vehicle", ElementData::Class);
    let incoming = DataElement::new("Vehicle", ElementData::Class, Origin::new("v.json", ""));
    let path: ScopePath = ["Fleet", "Vehicle"].into_iter().collect();
    let conflict = Conflict {
        path: &path,
        existing: &existing,
        incoming: &incoming,
    };

    let mut prompt = PromptResolver::new(Cursor::new(input.to_string()), Vec::new());
    let answer = prompt.resolve(&conflict);
    let (_, output) = prompt.into_inner();
    (answer, String::from_utf8(output).unwrap())
}

#[test]
fn import_flags_parse() {
    let args = import_args(parse(&[
        "import", "-i", "defs", "-m", "model.json", "-l", "LA", "-p", "replace", "-o", "out.yaml",
    ]));
    assert_eq!(args.input, Path::new("defs"));
    assert_eq!(args.layer, Some(Layer::La));
    assert_eq!(args.policy, Some(ConflictPolicy::Replace));
    assert_eq!(args.output.as_deref(), Some(Path::new("out.yaml")));

    let args = import_args(parse(&["import", "-i", "d", "-m", "m", "--action", "abort"]));
    assert_eq!(args.policy, Some(ConflictPolicy::Abort));
    assert_eq!(args.layer, None);
}

#[test]
fn bad_flag_values_are_rejected() {
    let bad_layer = ["json2capella", "import", "-i", "d", "-m", "m", "-l", "xx"];
    assert!(Cli::try_parse_from(bad_layer).is_err());
    let bad_policy = ["json2capella", "import", "-i", "d", "-m", "m", "-p", "merge"];
    assert!(Cli::try_parse_from(bad_policy).is_err());
    let bad_indent = ["json2capella", "export", "-m", "m", "-p", "x", "--indent", "-2"];
    assert!(Cli::try_parse_from(bad_indent).is_err());
    let no_package = ["json2capella", "export", "-m", "m"];
    assert!(Cli::try_parse_from(no_package).is_err());
}

#[test]
fn export_flags_parse() {
    let cli = parse(&["-v", "export", "-m", "model.json", "--list", "--indent", "-1"]);
    assert!(cli.verbose);
    let Command::Export(ExportArgs { list, indent, .. }) = cli.command else {
        panic!("expected export");
    };
    assert!(list);
    assert_eq!(indent, -1);
}

#[test]
fn config_file_supplies_defaults() {
    let config = FileConfig::from_toml(
        r#"
        layer = "sa"
        policy = "ask"
        root = "Interfaces"
        "#,
    )
    .unwrap();
    assert_eq!(config.layer, Some(Layer::Sa));

    let args = import_args(parse(&["import", "-i", "d", "-m", "m", "-t", "Types"]));
    let options = config.import_options(&args).unwrap();
    assert_eq!(options.layer, Layer::Sa);
    assert_eq!(options.policy, ConflictPolicy::Ask);
    assert_eq!(options.root.as_deref(), Some("Interfaces"));
    assert_eq!(options.types.as_deref(), Some("Types"));

    let args = import_args(parse(&["import", "-i", "d", "-m", "m", "-l", "pa", "-p", "skip"]));
    let options = config.import_options(&args).unwrap();
    assert_eq!(options.layer, Layer::Pa);
    assert_eq!(options.policy, ConflictPolicy::Skip);
}

#[test]
fn config_errors_are_configuration_errors() {
    let err = FileConfig::from_toml("colour = \"blue\"").unwrap_err();
    assert_eq!(exit_code(&err), 4);

    let args = import_args(parse(&["import", "-i", "d", "-m", "m"]));
    let err = FileConfig::default().import_options(&args).unwrap_err();
    assert_eq!(exit_code(&err), 4);

    let dir = tempfile::tempdir().unwrap();
    let err = FileConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
    assert_eq!(exit_code(&err), 4);
}

#[test]
fn config_file_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("json2capella.toml");
    fs::write(&path, "layer = \"oa\"\ntypes = \"Primitives\"\n").unwrap();
    let config = FileConfig::load(Some(&path)).unwrap();
    assert_eq!(
        config,
        FileConfig {
            layer: Some(Layer::Oa),
            types: Some("Primitives".into()),
            ..FileConfig::default()
        }
    );
}

#[test]
fn prompt_answers() {
    assert_eq!(conflict_answer("y\n").0, Resolution::Replace);
    assert_eq!(conflict_answer("Y\n").0, Resolution::ReplaceAll);
    assert_eq!(conflict_answer("n\n").0, Resolution::Skip);
    assert_eq!(conflict_answer("N\n").0, Resolution::SkipAll);
    assert_eq!(conflict_answer("a\n").0, Resolution::Abort);
    assert_eq!(conflict_answer("").0, Resolution::Abort);
}

#[test]
fn prompt_repeats_on_unknown_answers() {
    let (answer, output) = conflict_answer("maybe\n\nn\n");
    assert_eq!(answer, Resolution::Skip);
    assert!(output.starts_with("class /Fleet/Vehicle already exists (incoming class)."));
    assert_eq!(output.matches("Overwrite?").count(), 3);
    assert!(output.contains("Unrecognized answer 'maybe'."));
}

#[test]
fn init_refuses_to_overwrite() {
    let ws = Workspace::new();
    ws.init();
    let cli = parse(&["init", "-m", &ws.arg("model.json")]);
    let Command::Init(args) = cli.command else {
        panic!("expected init");
    };
    let err = commands::init(&args).unwrap_err();
    assert_eq!(exit_code(&err), 4);

    let cli = parse(&["init", "-m", &ws.arg("model.json"), "--force", "-n", "fresh"]);
    let Command::Init(args) = cli.command else {
        panic!("expected init");
    };
    commands::init(&args).unwrap();
    assert_eq!(load_model(&ws.path("model.json")).unwrap().name, "fresh");
}

#[test]
fn direct_import_updates_the_model() {
    let ws = Workspace::new();
    ws.init();
    ws.import(&[]).unwrap();

    let model = load_model(&ws.path("model.json")).unwrap();
    let data = model.data_package(Layer::La).unwrap();
    assert!(data.child_by_name("Vehicle").is_some());

    // Re-import under abort collides on Vehicle.
    let err = ws.import(&["-p", "abort"]).unwrap_err();
    assert_eq!(exit_code(&err), 3);
    assert_eq!(load_model(&ws.path("model.json")).unwrap(), model);
}

#[test]
fn diff_import_then_apply() {
    let ws = Workspace::new();
    ws.init();
    let before = load_model(&ws.path("model.json")).unwrap();

    ws.import(&["-o", &ws.arg("changes.yaml")]).unwrap();
    assert_eq!(load_model(&ws.path("model.json")).unwrap(), before);
    let set = read_change_set(&ws.path("changes.yaml")).unwrap();
    assert_eq!(set.summary().added, 4);

    let cli = parse(&[
        "apply",
        "-f",
        &ws.arg("changes.yaml"),
        "-m",
        &ws.arg("model.json"),
    ]);
    let Command::Apply(args) = cli.command else {
        panic!("expected apply");
    };
    commands::apply(&args).unwrap();

    let after = load_model(&ws.path("model.json")).unwrap();
    assert!(after.data_package(Layer::La).unwrap().child_by_name("Vehicle").is_some());

    // The same change set cannot be applied twice.
    let err = commands::apply(&args).unwrap_err();
    assert_eq!(exit_code(&err), 4);
}

#[test]
fn parse_errors_exit_with_two() {
    let ws = Workspace::new();
    ws.init();
    fs::write(ws.path("vehicles.json"), r#"{ "name": "Vehicles", "structs": [{}] }"#).unwrap();
    let err = ws.import(&[]).unwrap_err();
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn unknown_root_exits_with_four() {
    let ws = Workspace::new();
    ws.init();
    let err = ws.import(&["-r", "Nowhere"]).unwrap_err();
    assert_eq!(exit_code(&err), 4);
}

#[test]
fn export_writes_json() {
    let ws = Workspace::new();
    ws.init();
    ws.import(&[]).unwrap();
    let model = load_model(&ws.path("model.json")).unwrap();
    let id = model.data_package(Layer::La).unwrap().id.to_string();

    let cli = parse(&["export", "-m", &ws.arg("model.json"), "-p", &id, "--indent", "-1"]);
    let Command::Export(args) = cli.command else {
        panic!("expected export");
    };
    let mut out = Vec::new();
    commands::export(&args, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 1);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["name"], "Data");
    assert_eq!(value["prefix"], id.as_str());
    assert_eq!(value["structs"][0]["attrs"][0]["dataType"], "uint32");
    assert_eq!(value["structs"][0]["attrs"][0]["multiplicity"], "*");
}

#[test]
fn export_lists_packages() {
    let ws = Workspace::new();
    ws.init();
    ws.import(&[]).unwrap();

    let cli = parse(&[
        "export",
        "-m",
        &ws.arg("model.json"),
        "--list",
        "-o",
        &ws.arg("list.txt"),
    ]);
    let Command::Export(args) = cli.command else {
        panic!("expected export");
    };
    let mut out = Vec::new();
    commands::export(&args, &mut out).unwrap();
    assert!(out.is_empty());

    let listing = fs::read_to_string(ws.path("list.txt")).unwrap();
    assert!(listing.starts_with("The following data packages were found in the model:"));
    // One data package per layer plus "Data Types" in la.
    assert_eq!(listing.lines().count(), 6);
    assert!(listing.contains("/Data Types (Data Types)"));
}

#[test]
fn other_failures_exit_with_one() {
    let err = anyhow::anyhow!("disk on fire");
    assert_eq!(exit_code(&err), 1);

    let ws = Workspace::new();
    let err = ws.import(&[]).unwrap_err();
    // No model file yet.
    assert_eq!(exit_code(&err), 1);
}
