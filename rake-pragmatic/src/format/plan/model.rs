use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter, Error, Read, Write};

/// Objective values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Objectives {
    /// Freight and handling cost.
    pub cost: f64,
    /// Delay penalty.
    pub delay_penalty: f64,
    /// Average wagon utilization.
    pub utilization: f64,
    /// Demurrage charges.
    pub demurrage: f64,
}

/// Robustness under sampled perturbations.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Robustness {
    /// Expected objectives.
    pub expected: Objectives,
    /// Worst-case percentile objectives.
    pub worst_case: Objectives,
    /// Probability that dispatched orders arrive on time.
    pub on_time_probability: f64,
    /// Expected total delay in hours.
    pub expected_delay_hours: f64,
}

/// Time interval.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Interval {
    /// Start time specified in RFC3339 format.
    pub start: String,
    /// End time specified in RFC3339 format.
    pub end: String,
}

/// A part of order put on a wagon.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WagonLoad {
    /// Order id.
    pub order_id: String,
    /// Load in tonnes.
    pub load: f64,
}

/// A wagon of the rake.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RakeWagon {
    /// Wagon id.
    pub wagon_id: String,
    /// Loads of orders.
    pub loads: Vec<WagonLoad>,
}

/// A rake composition.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rake {
    /// Rake id within the plan.
    pub id: String,
    /// Loading point id.
    pub loading_point: String,
    /// Siding index.
    pub siding: usize,
    /// Stations of the route chain from the plant to the destination.
    pub route: Vec<String>,
    /// Order ids in loading sequence.
    pub orders: Vec<String>,
    /// Wagons with loads.
    pub wagons: Vec<RakeWagon>,
    /// Loading interval.
    pub loading: Interval,
    /// Dispatch time.
    pub dispatch: String,
    /// Arrival time.
    pub arrival: String,
    /// Total load in tonnes.
    pub load: f64,
    /// Average wagon utilization.
    pub utilization: f64,
}

/// A deferred order.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeferredOrder {
    /// Order id.
    pub order_id: String,
    /// Reason code.
    pub reason: String,
    /// Violated constraint codes.
    pub violations: Vec<String>,
}

/// A normalized slack of a constraint.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSlack {
    /// Constraint code.
    pub kind: String,
    /// Normalized slack.
    pub slack: f64,
    /// Whether the constraint is binding.
    pub binding: bool,
}

/// The nearest alternative placement.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    /// Either a rake id or a new rake at loading point and route.
    pub target: String,
    /// Objective change.
    pub delta: Objectives,
}

/// An explanation of one order placement.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderExplanation {
    /// Order id.
    pub order_id: String,
    /// Rake id when dispatched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rake: Option<String>,
    /// Constraint slacks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintSlack>,
    /// Marginal objective contribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marginal: Option<Objectives>,
    /// The nearest alternative placement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<Alternative>,
    /// The main objective driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// A human readable summary.
    pub summary: String,
}

/// Key performance indicators.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    /// Cost per tonne-km.
    pub cost_per_tonne_km: f64,
    /// On-time ratio in the nominal schedule.
    pub on_time_ratio: f64,
    /// Expected on-time ratio under scenarios.
    pub expected_on_time_ratio: f64,
    /// Average wagon utilization.
    pub average_utilization: f64,
    /// Demurrage share of freight cost.
    pub demurrage_share: f64,
    /// Dispatched tonnage.
    pub dispatched_tonnage: f64,
    /// Deferred tonnage.
    pub deferred_tonnage: f64,
    /// Amount of rakes.
    pub rakes: usize,
    /// Amount of wagons.
    pub wagons: usize,
}

/// A member of the Pareto front.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontMember {
    /// Nominal objectives.
    pub objectives: Objectives,
    /// Robustness.
    pub robustness: Robustness,
    /// Amount of deferred orders.
    pub deferred: usize,
}

/// Search statistic.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    /// Search duration in milliseconds.
    pub duration: usize,
    /// Amount of generations or levels.
    pub generations: usize,
    /// Amount of evaluated solutions.
    pub evaluated: usize,
    /// Amount of discarded candidates.
    pub discarded: usize,
}

/// A dispatch plan.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Planning cycle number.
    pub cycle: usize,
    /// Snapshot version.
    pub snapshot_version: usize,
    /// Solve method used.
    pub method: String,
    /// Whether search was stopped early.
    pub budget_exceeded: bool,
    /// Nominal objectives.
    pub objectives: Objectives,
    /// Robustness.
    pub robustness: Robustness,
    /// Key performance indicators.
    pub kpis: Kpis,
    /// Rakes.
    pub rakes: Vec<Rake>,
    /// Deferred orders.
    pub deferred: Vec<DeferredOrder>,
    /// Explanations in snapshot order.
    pub explanations: Vec<OrderExplanation>,
    /// Index of the chosen front member.
    pub chosen: usize,
    /// Pareto front summary.
    pub front: Vec<FrontMember>,
    /// Search statistic.
    pub statistic: Statistic,
}

/// Serializes plan in json format into `BufWriter`.
pub fn serialize_plan<W: Write>(writer: BufWriter<W>, plan: &Plan) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, plan).map_err(Error::from)
}

/// Deserializes plan from json format.
pub fn deserialize_plan<R: Read>(reader: BufReader<R>) -> Result<Plan, Error> {
    serde_json::from_reader(reader).map_err(Error::from)
}
