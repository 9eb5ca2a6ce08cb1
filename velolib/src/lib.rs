//! velolib - статистика и месячные отчёты по снимку данных велотуроператора.
//!
//! ```no_run
//! use velolib::{export_monthly_report, load};
//!
//! let file = std::fs::File::open("cycling.xml")?;
//! let snapshot = load(std::io::BufReader::new(file))?;
//! let xml = export_monthly_report(&snapshot, 2024, 3)?;
//! println!("{xml}");
//! # Ok::<(), velolib::error::VeloError>(())
//! ```

pub mod error;
pub mod model;
pub mod pricing;
pub mod report;
pub mod stats;
pub mod traits;
pub mod window;

pub mod formats {
    pub mod report_xml;
    pub mod snapshot_xml;
}

pub use error::{Result, VeloError};
pub use model::Snapshot;
pub use pricing::PricingMode;
pub use report::{export_monthly_report, MonthlyReport};
pub use stats::{
    guide_performance, monthly_bike_stats, monthly_summary, occupancy_rates, path_analytics,
};

use std::io::BufRead;
use traits::ReadSnapshot;

/// Загрузить XML-снимок (см. [`formats::snapshot_xml`]).
pub fn load<R: BufRead>(source: R) -> Result<Snapshot> {
    formats::snapshot_xml::SnapshotXml::read(source)
}
