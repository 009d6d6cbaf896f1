#[cfg(test)]
#[path = "../../tests/unit/commands/plan_test.rs"]
mod plan_test;

use super::*;
use clap::{Arg, ArgAction, Command};
use rake_cli::extensions::solve::config::{create_environment_from_config, parse_method};
use rake_cli::get_errors_serialized;
use rake_cli::extensions::solve::interruption::create_interruption_quota;
use rake_core::prelude::*;
use rake_core::utils::TimeQuota;
use rake_pragmatic::checker::CheckerContext;
use rake_pragmatic::format::plan::{PragmaticPlan, create_plan};
use rake_pragmatic::format::snapshot::PragmaticSnapshot;
use std::sync::Arc;

const SNAPSHOT_ARG_NAME: &str = "SNAPSHOT";
const CONFIG_ARG_NAME: &str = "config";
const OUT_RESULT_ARG_NAME: &str = "out-result";
const TIME_ARG_NAME: &str = "max-time";
const GENERATIONS_ARG_NAME: &str = "max-generations";
const SEED_ARG_NAME: &str = "seed";
const METHOD_ARG_NAME: &str = "method";
const LOG_ARG_NAME: &str = "log";
const CHECK_ARG_NAME: &str = "check";

pub fn get_plan_app() -> Command {
    Command::new("plan")
        .about("Forms rakes for a planning snapshot and writes a dispatch plan")
        .arg(Arg::new(SNAPSHOT_ARG_NAME).help("Sets the snapshot file to use").required(true).index(1))
        .arg(
            Arg::new(CONFIG_ARG_NAME)
                .help("Specifies path to planning configuration file")
                .short('c')
                .long(CONFIG_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(OUT_RESULT_ARG_NAME)
                .help("Specifies path to file for plan output")
                .short('o')
                .long(OUT_RESULT_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(TIME_ARG_NAME)
                .help("Specifies max time algorithm run in seconds")
                .short('t')
                .long(TIME_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(GENERATIONS_ARG_NAME)
                .help("Specifies maximum number of generations")
                .short('n')
                .long(GENERATIONS_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(SEED_ARG_NAME)
                .help("Specifies randomization seed to avoid stochastic behavior")
                .long(SEED_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(METHOD_ARG_NAME)
                .help("Specifies solve method")
                .short('m')
                .long(METHOD_ARG_NAME)
                .value_parser(["auto", "exact", "heuristic", "greedy"])
                .required(false),
        )
        .arg(
            Arg::new(LOG_ARG_NAME)
                .help("Specifies whether default logging is enabled")
                .long(LOG_ARG_NAME)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(CHECK_ARG_NAME)
                .help("Specifies whether final plan should be checked for feasibility")
                .long(CHECK_ARG_NAME)
                .action(ArgAction::SetTrue),
        )
}

/// Runs plan command.
pub fn run_plan(matches: &ArgMatches) -> Result<(), String> {
    let snapshot_path = matches.get_one::<String>(SNAPSHOT_ARG_NAME).ok_or("snapshot file is not specified")?;
    let mut config = get_config(matches, CONFIG_ARG_NAME)?;
    apply_overrides(matches, &mut config)?;

    let policy = Arc::new(get_policy(&config)?);
    let quota = create_quota(config.search.as_ref().and_then(|search| search.max_time));
    let environment = Arc::new(create_environment_from_config(&config, quota));

    let world = BufReader::new(open_file(snapshot_path, "snapshot")?)
        .read_pragmatic()
        .map_err(|errors| format!("cannot read snapshot from '{snapshot_path}':\n{}", get_errors_serialized(&errors)))?;
    let world = Arc::new(world);

    let plan = Solver::new(world.clone(), policy.clone(), environment)
        .solve()
        .map_err(|err| format!("cannot form rakes: '{err}'"))?;

    let out_result =
        matches.get_one::<String>(OUT_RESULT_ARG_NAME).map(|path| create_file(path, "out plan")).transpose()?;
    plan.write_pragmatic_json(world.as_ref(), create_write_buffer(out_result))
        .map_err(|err| format!("cannot write plan: '{err}'"))?;

    if matches.get_flag(CHECK_ARG_NAME) {
        let api_plan = create_plan(world.as_ref(), &plan);
        CheckerContext::new(world, policy, api_plan)
            .check()
            .map_err(|errors| format!("checker found {} errors:\n{errors}", errors.errors.len()))?;

        eprintln!("plan feasibility check is completed successfully");
    }

    Ok(())
}

fn apply_overrides(matches: &ArgMatches, config: &mut Config) -> Result<(), String> {
    let max_time = parse_float_value::<f64>(matches, TIME_ARG_NAME, "max time")?;
    let max_generations = parse_int_value::<usize>(matches, GENERATIONS_ARG_NAME, "max generations")?;
    let seed = parse_int_value::<u64>(matches, SEED_ARG_NAME, "seed")?;
    let method = matches.get_one::<String>(METHOD_ARG_NAME).map(|name| parse_method(name)).transpose();
    let method = method.map_err(|err| err.to_string())?;

    let search = config.search_mut();
    search.max_time = max_time.or(search.max_time);
    search.max_generations = max_generations.or(search.max_generations);
    search.seed = seed.or(search.seed);
    search.method = method.or(search.method);

    if matches.get_flag(LOG_ARG_NAME) {
        config.environment_mut().logging = Some(true);
    }

    Ok(())
}

fn create_quota(max_time: Option<Float>) -> Option<Arc<dyn Quota + Send + Sync>> {
    create_interruption_quota(max_time).map(Some).unwrap_or_else(|err| {
        eprintln!("{err}, search can be limited only by time");
        max_time.map::<Arc<dyn Quota + Send + Sync>, _>(|time| Arc::new(TimeQuota::new(time)))
    })
}
