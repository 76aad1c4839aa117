//! Production dashboard: filter a state × year production table and derive
//! the views and headline metrics shown by the dashboard.
//!
//! ```text
//!   production CSV
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + validate → Dataset (immutable)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSpec → subset
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │ reports   │   │ metrics   │
//!   └──────────┘   └──────────┘
//!        │              │
//!        └──────┬───────┘
//!               ▼
//!         dashboard::build → output (tables, CSV, JSON)
//! ```

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use dashboard::{build, Dashboard};
pub use dataset::Dataset;
pub use error::{DatasetError, LoadError};
pub use filter::{filter, FilterSpec, Selection};
pub use metrics::compute_metrics;
pub use types::{Metrics, Record, SortKey};
pub use util::format_number;
