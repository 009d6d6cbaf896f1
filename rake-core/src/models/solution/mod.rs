//! Solution domain models.

mod composition;
pub use self::composition::*;

mod partition;
pub use self::partition::*;

mod plan;
pub use self::plan::*;
