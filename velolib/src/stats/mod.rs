//! Агрегация бронирований в статистику по велосипедам, гидам и маршрутам.
//!
//! Все функции - чистые чтения неизменяемого [`Snapshot`](crate::model::Snapshot):
//! результат - `BTreeMap` по возрастанию id, в нём есть каждая сущность
//! (с нулями, если бронирований в окне нет).

pub mod bike;
pub mod guide;
pub mod path;
pub mod summary;

pub use bike::{bike_stats_in, monthly_bike_stats, BikeStats};
pub use guide::{guide_performance, guide_stats_in, GuideStats};
pub use path::{path_analytics, path_stats_in, PathStats};
pub use summary::{monthly_summary, occupancy_rates, Summary};
