use clap::ArgMatches;

pub mod check;
pub mod import;
pub mod plan;

use rake_cli::extensions::solve::config::{Config, create_policy_from_config, read_config};
use rake_core::prelude::PlanningPolicy;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write, stdout};
use std::str::FromStr;

pub(crate) fn create_write_buffer(out_file: Option<File>) -> BufWriter<Box<dyn Write>> {
    if let Some(out_file) = out_file {
        BufWriter::new(Box::new(out_file))
    } else {
        BufWriter::new(Box::new(stdout()))
    }
}

fn open_file(path: &str, description: &str) -> Result<File, String> {
    File::open(path).map_err(|err| format!("cannot open {description} file '{path}': '{err}'"))
}

fn create_file(path: &str, description: &str) -> Result<File, String> {
    File::create(path).map_err(|err| format!("cannot create {description} file '{path}': '{err}'"))
}

fn parse_float_value<T: FromStr<Err = std::num::ParseFloatError>>(
    matches: &ArgMatches,
    arg_name: &str,
    arg_desc: &str,
) -> Result<Option<T>, String> {
    matches
        .get_one::<String>(arg_name)
        .map(|arg| {
            arg.parse::<T>().map_err(|err| format!("cannot get float value, error: '{err}': '{arg_desc}'")).map(Some)
        })
        .unwrap_or(Ok(None))
}

fn parse_int_value<T: FromStr<Err = std::num::ParseIntError>>(
    matches: &ArgMatches,
    arg_name: &str,
    arg_desc: &str,
) -> Result<Option<T>, String> {
    matches
        .get_one::<String>(arg_name)
        .map(|arg| {
            arg.parse::<T>().map_err(|err| format!("cannot get integer value, error: '{err}': '{arg_desc}'")).map(Some)
        })
        .unwrap_or(Ok(None))
}

fn get_config(matches: &ArgMatches, config_arg_name: &str) -> Result<Config, String> {
    matches.get_one::<String>(config_arg_name).map_or_else(
        || Ok(Config::default()),
        |path| read_config(BufReader::new(open_file(path, "config")?)).map_err(|err| err.to_string()),
    )
}

fn get_policy(config: &Config) -> Result<PlanningPolicy, String> {
    create_policy_from_config(config).map_err(|err| format!("cannot create planning policy: '{err}'"))
}
