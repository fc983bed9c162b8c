//! Product catalog: remote source, query cache, and the list view-state machine.

pub mod debounce;
pub mod model;
pub mod paginator;
pub mod preferences;
pub mod query_cache;
pub mod selection;
pub mod sort;
pub mod source;
pub mod view;

pub use debounce::Debouncer;
pub use model::{FetchKey, Product, ProductPage};
pub use paginator::PageWindow;
pub use preferences::{PREFERENCES_KEY, SortPreferences};
pub use query_cache::{Lookup, QueryCache};
pub use selection::{HeaderCheck, Selection};
pub use sort::{SortField, SortOrder, SortSpec};
pub use source::ProductSource;
pub use view::{ListStatus, ListView, ListViewOptions};
