//! Client-side catalog state: the product store and the list/detail controllers.

pub mod detail;
pub mod gate;
pub mod list;
pub mod query;
pub mod store;

pub use detail::DetailController;
pub use gate::{NoopGate, StartupGate, TerminalGate};
pub use list::{ListController, PendingQuery, QueryOutcome, Step};
pub use query::{QueryMode, SortOption};
pub use store::{PageLoad, ProductStore};
