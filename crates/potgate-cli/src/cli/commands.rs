use super::CliError;
use potgate_core::common;
use potgate_core::domain::PotentialFormat;
use potgate_core::gate::WorkflowGate;
use potgate_core::resolve::{
    kim_archive_url, Fetch, FileFetcher, HttpFetcher, Resolver, ResolverConfig, SourceTable,
};
use potgate_core::sw::{self, SwCreateError};
use potgate_core::validate::{self, ValidationLimits};
use std::fs;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct FetchArgs {
    /// Element symbol, e.g. Au
    #[arg(long)]
    element: String,

    /// Potential type hint: eam, eam/alloy, eam/fs, sw, meam, tersoff
    #[arg(long, default_value = "eam")]
    potential_type: String,

    /// Try this URL first, before the known sources
    #[arg(long, conflicts_with = "kim_model")]
    url: Option<String>,

    /// OpenKIM model id; resolved to its archive download URL
    #[arg(long)]
    kim_model: Option<String>,

    /// Working directory the accepted potential is promoted into
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// JSON manifest of extra sources, consulted after the built-in ones
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Serve URLs from this local directory instead of the network
    #[arg(long)]
    mirror: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct CreateSwArgs {
    /// Element symbol with a built-in SW parameter set (Si, Ge, C)
    #[arg(long)]
    element: String,

    #[arg(long, default_value = ".")]
    workdir: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct StatusArgs {
    #[arg(long, default_value = ".")]
    workdir: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct ValidateArgs {
    /// Potential file to check
    file: PathBuf,

    /// Potential type hint; inferred from the filename when omitted
    #[arg(long)]
    potential_type: Option<String>,

    /// Element symbol; detected from the filename when omitted
    #[arg(long)]
    element: Option<String>,
}

pub(super) fn run_fetch(args: FetchArgs) -> Result<i32, CliError> {
    let mut sources = SourceTable::built_in();
    if let Some(manifest) = &args.sources {
        let body = fs::read_to_string(manifest)
            .map_err(|error| CliError::Io(format!("cannot read '{}': {error}", manifest.display())))?;
        let extra: SourceTable = serde_json::from_str(&body)
            .map_err(|error| CliError::Usage(format!("bad sources manifest: {error}")))?;
        sources.merge(extra);
    }

    let fetcher: Box<dyn Fetch> = match &args.mirror {
        Some(root) => Box::new(FileFetcher::new(root)),
        None => Box::new(
            HttpFetcher::new().map_err(|error| CliError::Io(error.to_string()))?,
        ),
    };
    let config = ResolverConfig {
        sources,
        ..ResolverConfig::default()
    };
    let resolver = Resolver::with_config(&args.workdir, fetcher, config);

    let kim_url = args.kim_model.as_deref().map(kim_archive_url);
    let custom_url = args.url.as_deref().or(kim_url.as_deref());
    let outcome = resolver.resolve(&args.element, &args.potential_type, custom_url);

    println!("{}", outcome.message);
    match outcome.file_path {
        Some(path) => {
            println!("potential: {}", path.display());
            Ok(0)
        }
        None => Err(CliError::Unresolved(format!(
            "no potential acquired for {}",
            args.element
        ))),
    }
}

pub(super) fn run_create_sw(args: CreateSwArgs) -> Result<i32, CliError> {
    let path = sw::create_sw_file(&args.workdir, &args.element).map_err(|error| match error {
        SwCreateError::Io { .. } => CliError::Io(error.to_string()),
        SwCreateError::NoParameters { .. } => CliError::Unresolved(error.to_string()),
    })?;
    let params = sw::parameters_for(&args.element)
        .ok_or_else(|| CliError::Unresolved(format!("no SW parameters for '{}'", args.element)))?;
    println!("created SW potential: {}", path.display());
    println!("epsilon = {} eV, sigma = {} Angstrom", params.epsilon, params.sigma);
    println!("reference: {}", params.reference);
    Ok(0)
}

pub(super) fn run_status(args: StatusArgs) -> Result<i32, CliError> {
    let mut gate = WorkflowGate::new(&args.workdir);
    let status = gate.check_status();
    println!("{}", status.message);
    if status.can_continue {
        println!("gate: open");
        Ok(0)
    } else {
        println!("gate: blocked");
        Ok(1)
    }
}

pub(super) fn run_validate(args: ValidateArgs) -> Result<i32, CliError> {
    let format = match &args.potential_type {
        Some(hint) => PotentialFormat::from_hint(hint),
        None => PotentialFormat::from_path(&args.file),
    };
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let element = match &args.element {
        Some(symbol) => symbol.as_str(),
        None => common::detect_in_filename(file_name).unwrap_or("unknown"),
    };

    let result = validate::validate(&args.file, format, element, &ValidationLimits::default())
        .map_err(|error| CliError::Io(error.to_string()))?;
    println!("{}", result.message);
    if result.is_valid { Ok(0) } else { Ok(1) }
}
