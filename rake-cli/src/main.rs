//! A command line interface to the rake formation engine.

#[cfg(test)]
#[path = "../tests/unit/main_test.rs"]
mod main_test;

mod commands;

fn main() {
    let matches = cli::get_app().get_matches();
    cli::run_subcommand(matches);
}

mod cli {
    use super::commands::check::{get_check_app, run_check};
    use super::commands::import::{get_import_app, run_import};
    use super::commands::plan::{get_plan_app, run_plan};
    use clap::{ArgMatches, Command};
    use std::process;

    pub fn get_app() -> Command {
        Command::new("Rake Formation Engine")
            .version(env!("CARGO_PKG_VERSION"))
            .about("A command line interface to form, optimize and explain freight rake compositions")
            .subcommand(get_plan_app())
            .subcommand(get_check_app())
            .subcommand(get_import_app())
    }

    pub fn run_subcommand(arg_matches: ArgMatches) {
        let result = match arg_matches.subcommand() {
            Some(("plan", plan_matches)) => run_plan(plan_matches),
            Some(("check", check_matches)) => run_check(check_matches),
            Some(("import", import_matches)) => run_import(import_matches),
            _ => Err("no subcommand was used. Use -h to print help information.".to_string()),
        };

        if let Err(err) = result {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
