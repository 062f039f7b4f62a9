pub mod host;
pub mod preference_store;
pub mod reconciler;
pub mod tracker;

pub use host::{create_host, Host, LayoutAccessor, WindowResolver};
pub use preference_store::{PreferenceStore, WindowPreference};
pub use reconciler::{EngineState, Reconciler, Reconciliation};
pub use tracker::Tracker;
