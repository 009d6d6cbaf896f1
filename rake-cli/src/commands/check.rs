#[cfg(test)]
#[path = "../../tests/unit/commands/check_test.rs"]
mod check_test;

use super::*;
use clap::{Arg, Command};
use rake_cli::extensions::check::check_pragmatic_plan;
use std::sync::Arc;

const SNAPSHOT_ARG_NAME: &str = "snapshot";
const PLAN_ARG_NAME: &str = "plan";
const CONFIG_ARG_NAME: &str = "config";

pub fn get_check_app() -> Command {
    Command::new("check")
        .about("Provides the way to check dispatch plan feasibility")
        .arg(
            Arg::new(SNAPSHOT_ARG_NAME)
                .help("Sets snapshot file the plan was formed for")
                .short('s')
                .long(SNAPSHOT_ARG_NAME)
                .required(true),
        )
        .arg(Arg::new(PLAN_ARG_NAME).help("Sets plan file").short('p').long(PLAN_ARG_NAME).required(true))
        .arg(
            Arg::new(CONFIG_ARG_NAME)
                .help("Specifies path to planning configuration file used to form the plan")
                .short('c')
                .long(CONFIG_ARG_NAME)
                .required(false),
        )
}

/// Runs check command.
pub fn run_check(matches: &ArgMatches) -> Result<(), String> {
    let snapshot_path = matches.get_one::<String>(SNAPSHOT_ARG_NAME).ok_or("snapshot file is not specified")?;
    let plan_path = matches.get_one::<String>(PLAN_ARG_NAME).ok_or("plan file is not specified")?;

    let policy = Arc::new(get_policy(&get_config(matches, CONFIG_ARG_NAME)?)?);
    let snapshot_reader = BufReader::new(open_file(snapshot_path, "snapshot")?);
    let plan_reader = BufReader::new(open_file(plan_path, "plan")?);

    check_pragmatic_plan(snapshot_reader, plan_reader, policy)
        .map_err(|errors| format!("checker found {} errors:\n{}", errors.len(), errors.join("\n")))
}
