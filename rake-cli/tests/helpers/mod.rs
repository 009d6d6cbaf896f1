#[path = "../../../rake-core/tests/helpers/macros.rs"]
#[macro_use]
pub mod macros;

use rake_core::prelude::*;
use rake_pragmatic::format::plan::{create_plan, serialize_plan};
use rake_pragmatic::format::snapshot::PragmaticSnapshot;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::Arc;

pub const BASIC_SNAPSHOT_PATH: &str = "tests/data/snapshot.basic.json";
pub const FULL_CONFIG_PATH: &str = "tests/data/config.full.json";
pub const ORDERS_CSV_PATH: &str = "tests/data/orders.csv";
pub const WAGONS_CSV_PATH: &str = "tests/data/wagons.csv";

/// Reads snapshot from the file into the core model.
pub fn read_world(path: &str) -> Arc<WorldState> {
    let file = File::open(path).unwrap_or_else(|err| panic!("cannot open '{path}': {err}"));
    Arc::new(BufReader::new(file).read_pragmatic().unwrap_or_else(|err| panic!("cannot read snapshot: {err}")))
}

/// Solves snapshot from the file using exact search and returns the plan serialized into json.
pub fn solve_to_json(path: &str) -> String {
    let world = read_world(path);
    let policy = Arc::new(PlanningPolicy::default().with_method(SolveMethod::Exact));
    let plan = Solver::new(world.clone(), policy, Arc::new(Environment::new_repeatable(0)))
        .solve()
        .unwrap_or_else(|err| panic!("cannot solve snapshot: {err}"));

    let mut buffer = Vec::new();
    serialize_plan(BufWriter::new(&mut buffer), &create_plan(world.as_ref(), &plan)).expect("cannot serialize plan");

    String::from_utf8(buffer).expect("plan is not utf8")
}
