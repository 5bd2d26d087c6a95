#![forbid(unsafe_code)]

mod config;
mod logging;

pub use config::{load_config, AnnotationPaths, LoadedConfig, OutputPaths, PolicyConfig, SemlinkConfig};

use clap::{error::ErrorKind, ArgAction, Args, Parser, Subcommand, ValueEnum};
use semlink_core::canonical::{stable_json_bytes, stable_json_pretty};
use semlink_core::{resolve_semlink_config_candidates, ExitCode, MachineError};
use semlink_ingest::{counts, load_release, DiagnosticLog, IngestError};
use semlink_model::{OntoNotesOrphanPolicy, VerbNetIngestPolicy};
use semlink_reconcile::{
    audit, audit_vn_fn, combine_vn_fn_maps, derive_roleset_class_roles, run_build,
    write_summary, BuildPlan, EnginePolicy, ReconcileError,
};
use semlink_resources::{ResourceContext, ResourceError, ResourcePaths, VnFnFrameMap};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;

const SEMLINK_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "semlink", version)]
#[command(about = "Reconcile VerbNet, PropBank, FrameNet and OntoNotes annotations")]
#[command(help_template = SEMLINK_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  SEMLINK_CONFIG      Config file path\n  SEMLINK_LOG_LEVEL   Log filter override\n  SEMLINK_LOG_JSON    Emit logs as JSON"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a prior release with new annotations and write a new release.
    Build(BuildArgs),
    /// Populated-field totals of a release file.
    Counts {
        #[arg(long)]
        release: PathBuf,
    },
    /// Validate every field of a release against the resources.
    Audit {
        #[arg(long)]
        release: PathBuf,
        #[command(flatten)]
        resources: ResourceArgs,
    },
    /// Roleset to VerbNet class role table derived from the resources.
    PbVnMap {
        #[command(flatten)]
        resources: ResourceArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fold a corrected VerbNet to FrameNet table over an older one.
    VnFnMerge {
        #[arg(long)]
        old: PathBuf,
        #[arg(long)]
        fixed: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        resources: ResourceArgs,
    },
    /// Show config lookup candidates and the effective configuration.
    Config,
}

#[derive(Args)]
struct ResourceArgs {
    #[arg(long)]
    verbnet: Option<PathBuf>,
    #[arg(long)]
    propbank: Option<PathBuf>,
    #[arg(long)]
    framenet: Option<PathBuf>,
    #[arg(long)]
    ontonotes: Option<PathBuf>,
    #[arg(long)]
    external_vn2pb: Option<PathBuf>,
    #[arg(long)]
    vn_fn: Option<PathBuf>,
    #[arg(long)]
    vn_fn_roles: Option<PathBuf>,
}

impl ResourceArgs {
    fn over(self, base: &ResourcePaths) -> ResourcePaths {
        ResourcePaths {
            verbnet: self.verbnet.or_else(|| base.verbnet.clone()),
            propbank: self.propbank.or_else(|| base.propbank.clone()),
            framenet: self.framenet.or_else(|| base.framenet.clone()),
            ontonotes: self.ontonotes.or_else(|| base.ontonotes.clone()),
            external_vn2pb: self.external_vn2pb.or_else(|| base.external_vn2pb.clone()),
            vn_fn: self.vn_fn.or_else(|| base.vn_fn.clone()),
            vn_fn_roles: self.vn_fn_roles.or_else(|| base.vn_fn_roles.clone()),
        }
    }
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    resources: ResourceArgs,
    #[arg(long)]
    previous: Option<PathBuf>,
    #[arg(long)]
    vn_annotations: Option<PathBuf>,
    #[arg(long)]
    pb_release: Option<PathBuf>,
    #[arg(long)]
    on_release: Option<PathBuf>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    summary: Option<PathBuf>,
    #[arg(long, value_enum)]
    ontonotes_orphans: Option<OrphanPolicyCli>,
    #[arg(long, default_value_t = false)]
    no_vn_repair: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrphanPolicyCli {
    Insert,
    Skip,
}

impl From<OrphanPolicyCli> for OntoNotesOrphanPolicy {
    fn from(value: OrphanPolicyCli) -> Self {
        match value {
            OrphanPolicyCli::Insert => Self::Insert,
            OrphanPolicyCli::Skip => Self::Skip,
        }
    }
}

#[derive(Clone, Copy)]
struct OutputMode {
    json: bool,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    let command = cli.command.ok_or_else(|| CliError {
        exit_code: ExitCode::Usage,
        machine: MachineError::new("usage_error", "missing command; see --help"),
    })?;
    logging::init_tracing(cli.verbose);

    let loaded = load_config(cli.config.as_deref()).map_err(CliError::config)?;
    match command {
        Commands::Build(args) => run_build_command(args, &loaded.config, output_mode),
        Commands::Counts { release } => run_counts(&release, output_mode),
        Commands::Audit { release, resources } => {
            run_audit(&release, resources.over(&loaded.config.resources), output_mode)
        }
        Commands::PbVnMap { resources, out } => run_pb_vn_map(
            resources.over(&loaded.config.resources),
            out.as_deref(),
            output_mode,
        ),
        Commands::VnFnMerge {
            old,
            fixed,
            out,
            resources,
        } => run_vn_fn_merge(
            &old,
            &fixed,
            &out,
            resources.over(&loaded.config.resources),
            output_mode,
        ),
        Commands::Config => emit_config(cli.config.as_deref(), &loaded, output_mode),
    }
}

fn load_resources(paths: &ResourcePaths) -> Result<ResourceContext, CliError> {
    ResourceContext::load(paths).map_err(CliError::resource)
}

fn run_build_command(
    args: BuildArgs,
    config: &SemlinkConfig,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let annotations = &config.annotations;
    let output = args
        .output
        .or_else(|| config.output.path.clone())
        .ok_or_else(|| {
            CliError::usage("missing output path; pass --output or set [output].path".to_string())
        })?;
    let verbnet_ingest = if args.no_vn_repair || !config.policy.verbnet_ingest_repair {
        VerbNetIngestPolicy::ExactOnly
    } else {
        VerbNetIngestPolicy::Repair
    };
    let plan = BuildPlan {
        previous_release: args.previous.or_else(|| annotations.previous_release.clone()),
        vn_annotations: args.vn_annotations.or_else(|| annotations.vn_annotations.clone()),
        pb_release: args.pb_release.or_else(|| annotations.pb_release.clone()),
        on_release: args.on_release.or_else(|| annotations.on_release.clone()),
        output,
        policy: EnginePolicy {
            verbnet_ingest,
            ontonotes_orphans: args
                .ontonotes_orphans
                .map_or(config.policy.ontonotes_orphans, Into::into),
        },
    };
    let summary_path = args.summary.or_else(|| config.output.summary.clone());

    let ctx = load_resources(&args.resources.over(&config.resources))?;
    let mut log = DiagnosticLog::default();
    let (_, summary) = run_build(&ctx, &plan, &mut log).map_err(CliError::reconcile)?;
    if let Some(path) = &summary_path {
        write_summary(&summary, path).map_err(CliError::reconcile)?;
    }
    emit_ok(
        output_mode,
        json!({
            "command": "build",
            "release": summary.release,
            "counts": summary.counts,
            "events": summary.events.len(),
            "summary": summary_path,
        }),
    )
    .map_err(CliError::internal)
}

fn run_counts(release: &Path, output_mode: OutputMode) -> Result<(), CliError> {
    let mut log = DiagnosticLog::default();
    let registry = load_release(release, &mut log).map_err(CliError::ingest)?;
    emit_ok(
        output_mode,
        json!({
            "command": "counts",
            "release": release,
            "counts": counts(&registry),
        }),
    )
    .map_err(CliError::internal)
}

fn run_audit(release: &Path, paths: ResourcePaths, output_mode: OutputMode) -> Result<(), CliError> {
    let ctx = load_resources(&paths)?;
    let mut log = DiagnosticLog::default();
    let registry = load_release(release, &mut log).map_err(CliError::ingest)?;
    let report = audit(&registry, &ctx);
    let vn_fn = audit_vn_fn(&ctx.vn_fn_frames, &ctx);
    emit_ok(
        output_mode,
        json!({
            "command": "audit",
            "release": release,
            "report": report,
            "vn_fn": vn_fn,
        }),
    )
    .map_err(CliError::internal)
}

fn run_pb_vn_map(
    paths: ResourcePaths,
    out: Option<&Path>,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let ctx = load_resources(&paths)?;
    let table = derive_roleset_class_roles(&ctx);
    let Some(out) = out else {
        let payload = serde_json::to_value(&table).map_err(|e| CliError::internal(e.to_string()))?;
        return emit_ok(output_mode, payload).map_err(CliError::internal);
    };
    write_json_file(&table, out)?;
    emit_ok(
        output_mode,
        json!({
            "command": "pb-vn-map",
            "path": out,
            "rolesets": table.len(),
        }),
    )
    .map_err(CliError::internal)
}

fn write_json_file<T: serde::Serialize>(value: &T, out: &Path) -> Result<(), CliError> {
    let text = stable_json_pretty(value).map_err(|e| CliError::internal(e.to_string()))?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::validation("io_error", format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    fs::write(out, text).map_err(|e| {
        CliError::validation("io_error", format!("cannot write {}: {e}", out.display()))
    })
}

fn run_vn_fn_merge(
    old: &Path,
    fixed: &Path,
    out: &Path,
    paths: ResourcePaths,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let ctx = load_resources(&paths)?;
    let old_map = VnFnFrameMap::load(old).map_err(CliError::resource)?;
    let fixed_map = VnFnFrameMap::load(fixed).map_err(CliError::resource)?;
    let combined = combine_vn_fn_maps(&old_map, &fixed_map, &ctx);
    write_json_file(&combined.map.to_keyed(), out)?;
    emit_ok(
        output_mode,
        json!({
            "command": "vn-fn-merge",
            "path": out,
            "kept_old": combined.kept_old,
            "dropped_old": combined.dropped_old,
            "fixed": combined.fixed,
            "entries": combined.map.len(),
        }),
    )
    .map_err(CliError::internal)
}

fn emit_config(
    explicit: Option<&Path>,
    loaded: &LoadedConfig,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let payload = json!({
        "candidates": resolve_semlink_config_candidates(explicit),
        "source": loaded.source,
        "config": loaded.config,
    });
    emit_ok(output_mode, payload).map_err(CliError::internal)
}

fn emit_ok(output_mode: OutputMode, payload: Value) -> Result<(), String> {
    if output_mode.json {
        let bytes = stable_json_bytes(&payload).map_err(|e| e.to_string())?;
        let text = String::from_utf8(bytes).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())?
        );
    }
    Ok(())
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: String) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", &message),
        }
    }

    fn config(err: semlink_core::Error) -> Self {
        let mut machine = MachineError::new("config_error", &err.to_string());
        if let Some(path) = err.path() {
            machine = machine.with_detail("path", &path.display().to_string());
        }
        Self {
            exit_code: ExitCode::Usage,
            machine,
        }
    }

    fn validation(code: &str, message: String) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new(code, &message),
        }
    }

    fn resource(err: ResourceError) -> Self {
        Self::validation("resource_error", err.0)
    }

    fn ingest(err: IngestError) -> Self {
        Self::validation("ingest_error", err.0)
    }

    fn reconcile(err: ReconcileError) -> Self {
        Self::validation("reconcile_error", err.0)
    }

    fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
