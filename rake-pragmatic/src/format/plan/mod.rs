//! Specifies logic to create a dispatch plan in pragmatic format and write it into json.

mod model;
pub use self::model::*;

mod writer;
pub use self::writer::{PragmaticPlan, create_plan, get_route_stations};
