//! Command implementations and argument parsing for the lifeline CLI.

use std::fmt::Display;
use std::io::{self, Write};
use std::iter;

use clap::{Args, Parser, Subcommand};
use lifeline_core::{
    FailureReport, FrequencyPlan, HierarchyStats, HierarchyTree, MinimumSpanningForest,
    MonitoredRoute, Network, NetworkBuilder, NetworkError, NetworkErrorCode, NodeId, PathSet,
    scenario,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_PATH_COUNT: usize = 2;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "lifeline",
    about = "Analyse the resilience of an emergency road network."
)]
pub struct Cli {
    /// Network to analyse.
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options describing the network under analysis.
///
/// When neither `--edge` nor `--node` is given the built-in reference
/// scenario is loaded instead.
#[derive(Debug, Args, Clone, Default)]
pub struct NetworkArgs {
    /// Road between two cities, written `U-V=WEIGHT`. Cities are implied.
    #[arg(long = "edge", value_name = "U-V=WEIGHT", value_parser = parse_edge)]
    pub edges: Vec<EdgeSpec>,

    /// City with an optional display label, written `ID[=LABEL]`.
    #[arg(long = "node", value_name = "ID[=LABEL]", value_parser = parse_node)]
    pub nodes: Vec<NodeSpec>,

    /// Road to flag as hazardous, written `U-V`.
    #[arg(long = "hazard", value_name = "U-V", value_parser = parse_pair)]
    pub hazards: Vec<(String, String)>,

    /// City to disable before running the command.
    #[arg(long = "disable", value_name = "ID")]
    pub disabled: Vec<String>,

    /// Control node used to judge reachability after a failure.
    #[arg(long)]
    pub control: Option<String>,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute the minimum-cost backbone.
    Mst,
    /// Find up to `k` edge-disjoint routes between two cities.
    Paths(PathsArgs),
    /// Disable a city and report the consequences.
    Fail(FailArgs),
    /// Balance a command hierarchy built from the given keys.
    Balance(BalanceArgs),
    /// Assign radio frequencies so neighbouring cities never share one.
    Frequencies,
}

/// Options accepted by the `paths` command.
#[derive(Debug, Args, Clone)]
pub struct PathsArgs {
    /// Origin city.
    #[arg(long)]
    pub from: String,

    /// Destination city.
    #[arg(long)]
    pub to: String,

    /// Number of disjoint routes to look for.
    #[arg(short, long, default_value_t = DEFAULT_PATH_COUNT)]
    pub k: usize,
}

/// Options accepted by the `fail` command.
#[derive(Debug, Args, Clone)]
pub struct FailArgs {
    /// City to disable.
    #[arg(long)]
    pub node: String,

    /// Origin of a monitored route.
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Destination of a monitored route.
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Number of disjoint routes to monitor.
    #[arg(short, long, default_value_t = DEFAULT_PATH_COUNT)]
    pub k: usize,
}

/// Options accepted by the `balance` command.
#[derive(Debug, Args, Clone)]
pub struct BalanceArgs {
    /// Hierarchy keys in insertion order. Defaults to the network's city ids.
    pub keys: Vec<String>,
}

/// A road given on the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSpec {
    /// First endpoint.
    pub left: String,
    /// Second endpoint.
    pub right: String,
    /// Road length.
    pub weight: f64,
}

/// A city given on the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeSpec {
    /// City identifier.
    pub id: String,
    /// Display label; defaults to the identifier.
    pub label: Option<String>,
}

/// Errors raised while parsing network options.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    /// The value did not have the `U-V` shape.
    #[error("expected `U-V`, got `{raw}`")]
    MalformedPair {
        /// Raw argument value.
        raw: String,
    },
    /// The value had no `=WEIGHT` suffix.
    #[error("expected `U-V=WEIGHT`, got `{raw}`")]
    MissingWeight {
        /// Raw argument value.
        raw: String,
    },
    /// The weight was not a number.
    #[error("weight `{raw}` is not a number")]
    InvalidWeight {
        /// Raw weight text.
        raw: String,
    },
    /// The city identifier was empty.
    #[error("city identifiers must not be empty")]
    EmptyId,
}

/// Parses `U-V` into its two endpoints.
///
/// # Errors
/// Returns [`SpecError::MalformedPair`] when either side is missing.
pub fn parse_pair(raw: &str) -> Result<(String, String), SpecError> {
    let malformed = || SpecError::MalformedPair {
        raw: raw.to_owned(),
    };
    let (left, right) = raw.split_once('-').ok_or_else(malformed)?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return Err(malformed());
    }
    Ok((left.to_owned(), right.to_owned()))
}

/// Parses `U-V=WEIGHT`.
///
/// # Errors
/// Returns [`SpecError`] when the pair or weight is malformed. Weight range
/// is validated later by the core model.
pub fn parse_edge(raw: &str) -> Result<EdgeSpec, SpecError> {
    let (pair, weight) = raw.rsplit_once('=').ok_or_else(|| SpecError::MissingWeight {
        raw: raw.to_owned(),
    })?;
    let (left, right) = parse_pair(pair)?;
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|_| SpecError::InvalidWeight {
            raw: weight.to_owned(),
        })?;
    Ok(EdgeSpec {
        left,
        right,
        weight,
    })
}

/// Parses `ID[=LABEL]`.
///
/// # Errors
/// Returns [`SpecError::EmptyId`] when the identifier is blank.
pub fn parse_node(raw: &str) -> Result<NodeSpec, SpecError> {
    let (id, label) = match raw.split_once('=') {
        Some((id, label)) => (id.trim(), Some(label.trim().to_owned())),
        None => (raw.trim(), None),
    };
    if id.is_empty() {
        return Err(SpecError::EmptyId);
    }
    Ok(NodeSpec {
        id: id.to_owned(),
        label,
    })
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A `--hazard` option named two cities with no road between them.
    #[error("no road joins `{left}` and `{right}`")]
    UnknownRoad {
        /// First endpoint as supplied.
        left: String,
        /// Second endpoint as supplied.
        right: String,
    },
    /// The core engine rejected the request.
    #[error(transparent)]
    Core(#[from] NetworkError),
}

impl CliError {
    /// Returns the stable core error code, when the failure came from the
    /// engine.
    #[must_use]
    pub fn code(&self) -> Option<NetworkErrorCode> {
        match self {
            Self::Core(err) => Some(err.code()),
            Self::UnknownRoad { .. } => None,
        }
    }

    /// Finds the first [`CliError`] or [`NetworkError`] in `err`'s source
    /// chain and returns its core error code.
    #[must_use]
    pub fn code_in_chain(err: &(dyn std::error::Error + 'static)) -> Option<NetworkErrorCode> {
        iter::successors(Some(err), |current| current.source()).find_map(|current| {
            if let Some(cli) = current.downcast_ref::<Self>() {
                return cli.code();
            }
            current.downcast_ref::<NetworkError>().map(NetworkError::code)
        })
    }
}

/// Shape of a command hierarchy before and after balancing, with the
/// balanced tree's keys by level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Shape before balancing.
    pub before: HierarchyStats,
    /// Shape after balancing.
    pub after: HierarchyStats,
    /// Rotations performed.
    pub rotations: usize,
    /// Balanced keys, root level first.
    pub levels: Vec<Vec<String>>,
}

/// Result of executing one CLI command.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// Backbone computed by `mst`.
    Mst(MinimumSpanningForest),
    /// Routes found by `paths`.
    Paths(PathSet),
    /// Consequences reported by `fail`.
    Failure(FailureReport),
    /// Hierarchy reshaped by `balance`.
    Balance(BalanceSummary),
    /// Plan produced by `frequencies`.
    Frequencies(FrequencyPlan),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the network cannot be built or the command
/// fails.
///
/// # Examples
/// ```
/// # use lifeline_cli::cli::{Cli, Command, NetworkArgs, Outcome, run_cli};
/// let cli = Cli {
///     network: NetworkArgs::default(),
///     command: Command::Mst,
/// };
/// let Outcome::Mst(forest) = run_cli(cli)? else {
///     unreachable!("mst always yields a forest");
/// };
/// assert_eq!(forest.total_weight(), 18.0);
/// # Ok::<(), lifeline_cli::cli::CliError>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<Outcome, CliError> {
    let mut network = build_network(&cli.network)?;
    let span = Span::current();
    let outcome = match cli.command {
        Command::Mst => {
            span.record("command", field::display("mst"));
            run_mst(&network)?
        }
        Command::Paths(args) => {
            span.record("command", field::display("paths"));
            run_paths(&network, &args)?
        }
        Command::Fail(args) => {
            span.record("command", field::display("fail"));
            run_fail(&mut network, &args)?
        }
        Command::Balance(args) => {
            span.record("command", field::display("balance"));
            run_balance(&network, args)
        }
        Command::Frequencies => {
            span.record("command", field::display("frequencies"));
            run_frequencies(&network)
        }
    };
    Ok(outcome)
}

#[instrument(
    name = "cli.build_network",
    err,
    skip(args),
    fields(source = field::Empty, hazards = args.hazards.len(), disabled = args.disabled.len()),
)]
pub(super) fn build_network(args: &NetworkArgs) -> Result<Network, CliError> {
    let span = Span::current();
    let mut builder = if args.edges.is_empty() && args.nodes.is_empty() {
        span.record("source", field::display("reference"));
        scenario::reference_builder()
    } else {
        span.record("source", field::display("arguments"));
        custom_builder(args)
    };
    if let Some(control) = &args.control {
        builder = builder.with_control_node(control.as_str());
    }
    let mut network = builder.build()?;

    for (left, right) in &args.hazards {
        let edge = network
            .edge_between(&NodeId::from(left.as_str()), &NodeId::from(right.as_str()))
            .ok_or_else(|| CliError::UnknownRoad {
                left: left.clone(),
                right: right.clone(),
            })?;
        network.mark_hazard(edge, true)?;
    }
    for city in &args.disabled {
        network.set_node_active(&NodeId::from(city.as_str()), false)?;
    }
    Ok(network)
}

fn custom_builder(args: &NetworkArgs) -> NetworkBuilder {
    let mut builder = args.nodes.iter().fold(NetworkBuilder::new(), |builder, node| {
        builder.with_node(node.id.as_str(), node.label.as_deref().unwrap_or(node.id.as_str()))
    });
    for edge in &args.edges {
        for city in [&edge.left, &edge.right] {
            if !builder.declares(&NodeId::from(city.as_str())) {
                builder = builder.with_node(city.as_str(), city.as_str());
            }
        }
        builder = builder.with_edge(edge.left.as_str(), edge.right.as_str(), edge.weight);
    }
    builder
}

#[instrument(name = "cli.mst", err, skip(network))]
pub(super) fn run_mst(network: &Network) -> Result<Outcome, CliError> {
    let forest = network.compute_mst()?;
    info!(
        roads = forest.edges().len(),
        total_weight = forest.total_weight(),
        "backbone computed"
    );
    Ok(Outcome::Mst(forest))
}

#[instrument(
    name = "cli.paths",
    err,
    skip(network, args),
    fields(from = %args.from, to = %args.to, k = args.k),
)]
pub(super) fn run_paths(network: &Network, args: &PathsArgs) -> Result<Outcome, CliError> {
    let paths = network.find_k_disjoint_paths(
        &NodeId::from(args.from.as_str()),
        &NodeId::from(args.to.as_str()),
        args.k,
    )?;
    info!(found = paths.len(), requested = args.k, "routes computed");
    Ok(Outcome::Paths(paths))
}

#[instrument(
    name = "cli.fail",
    err,
    skip(network, args),
    fields(node = %args.node, monitored = field::Empty),
)]
pub(super) fn run_fail(network: &mut Network, args: &FailArgs) -> Result<Outcome, CliError> {
    let monitored = match (&args.from, &args.to) {
        (Some(from), Some(to)) => {
            Span::current().record("monitored", field::display(format!("{from}-{to}")));
            Some(MonitoredRoute::new(from.as_str(), to.as_str(), args.k))
        }
        _ => None,
    };
    let report = network.simulate_failure(&NodeId::from(args.node.as_str()), monitored.as_ref())?;
    Ok(Outcome::Failure(report))
}

#[instrument(name = "cli.balance", skip(network, args), fields(keys = field::Empty))]
pub(super) fn run_balance(network: &Network, args: BalanceArgs) -> Outcome {
    let keys = if args.keys.is_empty() {
        network
            .graph()
            .nodes()
            .iter()
            .map(|node| node.id().as_str().to_owned())
            .collect()
    } else {
        args.keys
    };
    Span::current().record("keys", keys.len());

    let numeric: Option<Vec<i64>> = keys.iter().map(|key| key.parse().ok()).collect();
    let summary = match numeric {
        Some(numbers) => summarise(numbers),
        None => summarise(keys),
    };
    Outcome::Balance(summary)
}

fn summarise<K: Ord + Display>(keys: Vec<K>) -> BalanceSummary {
    let mut tree = HierarchyTree::from_keys(keys);
    let report = tree.balance();
    let levels = tree
        .levels()
        .into_iter()
        .map(|level| level.into_iter().map(ToString::to_string).collect())
        .collect();
    BalanceSummary {
        before: report.before,
        after: report.after,
        rotations: report.rotations,
        levels,
    }
}

#[instrument(name = "cli.frequencies", skip(network))]
pub(super) fn run_frequencies(network: &Network) -> Outcome {
    let plan = network.assign_frequencies();
    info!(frequencies = plan.frequency_count(), "frequencies assigned");
    Outcome::Frequencies(plan)
}

/// Renders `outcome` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use lifeline_cli::cli::{Cli, Command, NetworkArgs, render_outcome, run_cli};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_cli(Cli {
///     network: NetworkArgs::default(),
///     command: Command::Frequencies,
/// })?;
/// let mut buffer = Vec::new();
/// render_outcome(&outcome, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.starts_with("frequencies: "));
/// # Ok(())
/// # }
/// ```
pub fn render_outcome(outcome: &Outcome, mut writer: impl Write) -> io::Result<()> {
    match outcome {
        Outcome::Mst(forest) => {
            writeln!(
                writer,
                "backbone: {} roads, total weight {}, {} component(s)",
                forest.edges().len(),
                forest.total_weight(),
                forest.component_count()
            )?;
            for edge in forest.edges() {
                writeln!(
                    writer,
                    "{}\t{}-{}\t{}",
                    edge.edge(),
                    edge.source(),
                    edge.target(),
                    edge.weight()
                )?;
            }
        }
        Outcome::Paths(paths) => render_paths(paths, &mut writer)?,
        Outcome::Failure(report) => render_failure(report, &mut writer)?,
        Outcome::Balance(summary) => {
            writeln!(
                writer,
                "height: {} -> {} ({} keys, {} rotations)",
                summary.before.height, summary.after.height, summary.after.len, summary.rotations
            )?;
            for (depth, level) in summary.levels.iter().enumerate() {
                writeln!(writer, "level {depth}: {}", level.join(" "))?;
            }
        }
        Outcome::Frequencies(plan) => {
            writeln!(writer, "frequencies: {}", plan.frequency_count())?;
            for (node, frequency) in plan.iter() {
                writeln!(writer, "{node}\t{frequency}")?;
            }
        }
    }
    Ok(())
}

fn render_paths(paths: &PathSet, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "routes: {}/{}", paths.len(), paths.requested())?;
    if paths.is_unreachable() {
        writeln!(writer, "no route")?;
    }
    for (index, path) in paths.paths().iter().enumerate() {
        writeln!(writer, "{index}\t{path}")?;
    }
    Ok(())
}

fn render_failure(report: &FailureReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "failed: {}", report.failed())?;
    if report.already_inactive() {
        writeln!(writer, "note: city was already inactive")?;
    }
    writeln!(writer, "components: {}", report.components().len())?;
    for component in report.components() {
        writeln!(writer, "\t{}", join(component))?;
    }
    if report.newly_unreachable().is_empty() {
        writeln!(writer, "unreachable from {}: none", report.control())?;
    } else {
        writeln!(
            writer,
            "unreachable from {}: {}",
            report.control(),
            join(report.newly_unreachable())
        )?;
    }
    if let Some(impact) = report.impact() {
        writeln!(
            writer,
            "monitored {} -> {}: routes {} -> {}",
            impact.route().source,
            impact.route().destination,
            impact.before().len(),
            impact.after().len()
        )?;
        match impact.primary_cost_delta() {
            Some(delta) => writeln!(writer, "primary cost delta: {delta}")?,
            None if impact.no_route() => writeln!(writer, "no route")?,
            None => {}
        }
    }
    Ok(())
}

fn join(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
