//! Command-line interface for the lifeline network-resilience engine.
//!
//! Global options describe the road network (or fall back to the built-in
//! reference scenario); each subcommand runs one analysis over it and yields
//! an [`Outcome`] that [`render_outcome`] prints as text.

mod commands;

pub use commands::{
    BalanceArgs, BalanceSummary, Cli, CliError, Command, EdgeSpec, FailArgs, NetworkArgs,
    NodeSpec, Outcome, PathsArgs, SpecError, parse_edge, parse_node, parse_pair, render_outcome,
    run_cli,
};
