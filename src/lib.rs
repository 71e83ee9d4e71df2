//! RinkClock
//!
//! Time-domain engine for annotated hockey footage. Operator labels placed on
//! the raw video timeline are turned into periods, clean playing time, score
//! and numeric-strength windows, a mapping onto the official game clock, and
//! per-player shifts in both time domains.
//!
//! ```
//! use rinkclock::domain::model::Label;
//! use rinkclock::intervals::derive;
//! use rinkclock::official::OfficialTimeMap;
//!
//! let labels = vec![
//!     Label::segment(0.0),
//!     Label::segment(1200.0),
//!     Label::stoppage(300.0),
//!     Label::stoppage(360.0),
//! ];
//! let intervals = derive(&labels, 1500.0);
//! let map = OfficialTimeMap::build(&intervals);
//! assert_eq!(map.to_official(300.0), Some(315.8));
//! assert_eq!(map.to_official(330.0), None);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod intervals;
pub mod official;
pub mod project;
pub mod report;
pub mod shifts;
pub mod utils;

// Re-export commonly used types
pub use config::{AppConfig, TimelineConfig};
pub use domain::model::{Interval, IntervalKind, Label, LabelKind, PlayerShiftInfo, ShiftMap};
pub use error::{RinkError, RinkResult};
pub use official::OfficialTimeMap;
pub use project::{Match, Project};
