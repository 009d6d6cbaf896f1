//! Problem domain models: orders, wagons, loading points, routes and the world snapshot.

mod fleet;
pub use self::fleet::*;

mod loading;
pub use self::loading::*;

mod materials;
pub use self::materials::*;

mod orders;
pub use self::orders::*;

mod routes;
pub use self::routes::*;

mod snapshot;
pub use self::snapshot::*;
