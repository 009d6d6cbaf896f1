use crate::format::{FormatError, MultiFormatError};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, BufWriter, Error, Read, Write};

/// A customer order.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// An unique order id.
    pub id: String,
    /// A plant where material is loaded.
    pub plant: String,
    /// Material type.
    pub material: String,
    /// Quantity in tonnes.
    pub quantity: f64,
    /// A delivery destination.
    pub destination: String,
    /// Delivery window: earliest and latest arrival in RFC3339 format.
    pub window: Vec<String>,
    /// Customer priority tier, bigger is more important.
    #[serde(default)]
    pub priority: u8,
    /// Explicit wagon type requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wagon_types: Vec<String>,
    /// When set, a late arrival is never tolerated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hard_deadline: bool,
}

/// Wagon maintenance status.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WagonStatus {
    /// Wagon can be assigned.
    #[default]
    Available,
    /// Wagon is under maintenance.
    InMaintenance,
    /// Wagon is reserved by a committed plan.
    Reserved,
}

/// A physical profile of a wagon.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WagonProfile {
    /// Tare weight in tonnes.
    pub tare: f64,
    /// Height over rail in metres.
    pub height: f64,
    /// Track gauge.
    pub gauge: String,
}

/// A wagon of the pool.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wagon {
    /// An unique wagon id.
    pub id: String,
    /// Wagon type, e.g. BOXN.
    #[serde(rename = "type")]
    pub wagon_type: String,
    /// Rated capacity in tonnes.
    pub capacity: f64,
    /// A plant where wagon is located.
    pub location: String,
    /// Availability window in RFC3339 format, omitted means always available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Vec<String>>,
    /// Maintenance status.
    #[serde(default)]
    pub status: WagonStatus,
    /// Physical profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<WagonProfile>,
}

/// A loading handling mode.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HandlingMode {
    /// Mechanical handling.
    Mechanical,
    /// Manual loading.
    Manual,
    /// Coil handling cranes.
    Crane,
}

/// An existing booking of a siding.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Siding index.
    pub siding: usize,
    /// Booked interval in RFC3339 format.
    pub window: Vec<String>,
    /// Booking owner reference.
    pub reference: String,
}

/// A loading point.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadingPoint {
    /// An unique loading point id.
    pub id: String,
    /// A plant where loading point is located.
    pub plant: String,
    /// Handling mode.
    pub mode: HandlingMode,
    /// Throughput in tonnes per hour.
    pub throughput: f64,
    /// Amount of sidings.
    pub sidings: usize,
    /// Maximum loading hours within one time slice.
    pub slice_capacity: f64,
    /// Free loading hours before demurrage is charged.
    pub free_time: f64,
    /// Existing bookings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bookings: Vec<Booking>,
}

/// Physical restrictions of a route segment.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteRestriction {
    /// Maximum gross weight of a rake in tonnes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_gross_weight: Option<f64>,
    /// Maximum wagon height in metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    /// Required track gauge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<String>,
}

/// A directed route segment.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    /// Origin station or plant.
    pub origin: String,
    /// Destination station.
    pub destination: String,
    /// Distance in kilometres.
    pub distance: f64,
    /// Nominal transit time in hours.
    pub transit_time: f64,
    /// Congestion risk in [0, 1].
    #[serde(default)]
    pub congestion_risk: f64,
    /// Segment restrictions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<RouteRestriction>,
}

/// Material compatibility rules.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Material type.
    pub id: String,
    /// Allowed wagon types.
    pub wagon_types: Vec<String>,
    /// Whether an order can be split across wagons.
    #[serde(default = "default_splittable")]
    pub splittable: bool,
    /// Allowed handling modes, empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handling_modes: Vec<HandlingMode>,
}

fn default_splittable() -> bool {
    true
}

/// A planning snapshot.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Planning start time in RFC3339 format.
    pub start_time: String,
    /// Snapshot version.
    #[serde(default)]
    pub version: usize,
    /// Order backlog.
    pub orders: Vec<Order>,
    /// Wagon pool.
    pub wagons: Vec<Wagon>,
    /// Loading points.
    pub loading_points: Vec<LoadingPoint>,
    /// Route segments.
    pub routes: Vec<RouteSegment>,
    /// Material catalog.
    pub materials: Vec<Material>,
}

/// Deserializes snapshot in json format from `BufReader`.
pub fn deserialize_snapshot<R: Read>(reader: BufReader<R>) -> Result<Snapshot, MultiFormatError> {
    serde_json::from_reader(reader).map_err(|err| {
        FormatError::new(
            "E0000".to_string(),
            "cannot deserialize snapshot".to_string(),
            format!("check input json: '{err}'"),
        )
        .into()
    })
}

/// Serializes snapshot in json format into `BufWriter`.
pub fn serialize_snapshot<W: Write>(snapshot: &Snapshot, writer: &mut BufWriter<W>) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, snapshot).map_err(Error::from)
}
