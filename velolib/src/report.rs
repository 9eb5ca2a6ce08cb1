//! Месячный отчёт: один набор агрегатов, из которого рендерятся
//! и текущая, и устаревшая (legacy) схемы.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Result, VeloError},
    formats::report_xml::ReportXml,
    model::Snapshot,
    stats::{bike_stats_in, guide_stats_in, path_stats_in, BikeStats, GuideStats, PathStats, Summary},
    traits::WriteReport,
    window::Window,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    /// Дата снимка, а не время формирования.
    pub generated: NaiveDateTime,
    pub summary: Summary,
    pub bikes: BTreeMap<String, BikeStats>,
    pub guides: BTreeMap<String, GuideStats>,
    pub paths: BTreeMap<String, PathStats>,
    /// Считается из `bikes` и длины месяца.
    pub occupancy: BTreeMap<String, f64>,
}

impl MonthlyReport {
    pub fn build(snapshot: &Snapshot, year: i32, month: u32) -> Result<Self> {
        let window = Window::month(year, month)?;
        let bikes = bike_stats_in(snapshot, &window);
        let guides = guide_stats_in(snapshot, &window);
        let paths = path_stats_in(snapshot, &window);
        let summary = Summary::from_stats(&bikes, &paths);
        let hours = window.hours();
        let occupancy = bikes
            .iter()
            .map(|(id, s)| (id.clone(), s.occupancy_rate(hours)))
            .collect();
        debug!(
            year,
            month,
            bikes = bikes.len(),
            guides = guides.len(),
            paths = paths.len(),
            "monthly report aggregated"
        );
        Ok(Self {
            year,
            month,
            generated: snapshot.current_date(),
            summary,
            bikes,
            guides,
            paths,
            occupancy,
        })
    }
}

pub fn export_monthly_report(snapshot: &Snapshot, year: i32, month: u32) -> Result<String> {
    let report = MonthlyReport::build(snapshot, year, month)?;
    let mut out = Vec::new();
    ReportXml::write(&mut out, &report)?;
    String::from_utf8(out).map_err(|e| VeloError::Xml(e.to_string()))
}
