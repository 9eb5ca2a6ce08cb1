//! XML месячного отчёта: текущая схема (`BikeStatistics`, `GuideStatistics`, `PathStatistics`)
//! и legacy-секции (`Bikes`, `Guides`, `Paths`) из одного и того же [`MonthlyReport`].
//! Имена элементов и атрибутов менять нельзя - на них завязаны потребители.

use crate::{
    error::{Result, VeloError},
    report::MonthlyReport,
    traits::WriteReport,
};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::collections::BTreeSet;
use std::io::Write;

pub struct ReportXml;

impl WriteReport for ReportXml {
    fn write<W: Write>(mut w: W, report: &MonthlyReport) -> Result<()> {
        let mut wr = Writer::new_with_indent(&mut w, b' ', 2);

        wr.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml)?;

        let mut root = BytesStart::new("MonthlyReport");
        root.push_attribute(("year", report.year.to_string().as_str()));
        root.push_attribute(("month", report.month.to_string().as_str()));
        root.push_attribute((
            "generated",
            report.generated.format("%Y-%m-%dT%H:%M:%S").to_string().as_str(),
        ));
        wr.write_event(Event::Start(root)).map_err(xml)?;

        // <Summary>
        start(&mut wr, "Summary")?;
        text_el(&mut wr, "TotalRevenue", &report.summary.total_revenue.to_string())?;
        text_el(&mut wr, "TotalBookings", &report.summary.total_bookings.to_string())?;
        text_el(
            &mut wr,
            "TotalMaintenanceCost",
            &report.summary.total_maintenance_cost.to_string(),
        )?;
        end(&mut wr, "Summary")?;

        write_current(&mut wr, report)?;
        write_legacy(&mut wr, report)?;

        end(&mut wr, "MonthlyReport")?;
        w.write_all(b"\n")?;
        Ok(())
    }
}

fn write_current<W: Write>(wr: &mut Writer<W>, report: &MonthlyReport) -> Result<()> {
    start(wr, "BikeStatistics")?;
    for (id, b) in &report.bikes {
        start_with(wr, "Bike", &[("id", id.as_str())])?;
        empty_with(
            wr,
            "Utilization",
            &[
                ("totalHours", &hours(b.total_hours)),
                ("rentalHours", &hours(b.rental_hours)),
                ("maintenanceHours", &hours(b.maintenance_hours)),
            ],
        )?;
        text_el(wr, "Revenue", &b.total_revenue.to_string())?;
        text_el(wr, "MaintenanceCost", &b.maintenance_cost.to_string())?;
        end(wr, "Bike")?;
    }
    end(wr, "BikeStatistics")?;

    start(wr, "GuideStatistics")?;
    for (id, g) in &report.guides {
        start_with(wr, "Guide", &[("id", id.as_str())])?;
        empty_with(
            wr,
            "Tours",
            &[
                ("count", &g.total_tours.to_string()),
                ("total-participants", &g.total_participants.to_string()),
            ],
        )?;
        text_el(wr, "Revenue", &g.revenue_generated.to_string())?;
        list(wr, "Regions", "Region", &g.regions)?;
        list(wr, "Languages", "Language", &g.languages)?;
        end(wr, "Guide")?;
    }
    end(wr, "GuideStatistics")?;

    start(wr, "PathStatistics")?;
    for (id, p) in &report.paths {
        start_with(wr, "Path", &[("id", id.as_str())])?;
        empty_with(
            wr,
            "Usage",
            &[
                ("total-uses", &p.total_trips.to_string()),
                ("total-participants", &p.total_participants.to_string()),
                ("completion-rate", &format!("{:.1}", p.completion_rate)),
                ("avg-satisfaction", &format!("{:.2}", p.avg_satisfaction)),
            ],
        )?;
        end(wr, "Path")?;
    }
    end(wr, "PathStatistics")
}

fn write_legacy<W: Write>(wr: &mut Writer<W>, report: &MonthlyReport) -> Result<()> {
    start(wr, "Bikes")?;
    for (id, b) in &report.bikes {
        start_with(wr, "Bike", &[("id", id.as_str())])?;
        text_el(wr, "TotalHours", &hours(b.total_hours))?;
        text_el(wr, "RentalHours", &hours(b.rental_hours))?;
        text_el(wr, "MaintenanceHours", &hours(b.maintenance_hours))?;
        text_el(wr, "Revenue", &b.total_revenue.to_string())?;
        text_el(wr, "BookingCount", &b.booking_count.to_string())?;
        let occupancy = report.occupancy.get(id).copied().unwrap_or(0.0);
        text_el(wr, "OccupancyRate", &format!("{occupancy:.2}"))?;
        end(wr, "Bike")?;
    }
    end(wr, "Bikes")?;

    start(wr, "Guides")?;
    for (id, g) in &report.guides {
        start_with(wr, "Guide", &[("id", id.as_str())])?;
        text_el(wr, "TotalTours", &g.total_tours.to_string())?;
        text_el(wr, "TotalParticipants", &g.total_participants.to_string())?;
        list(wr, "Languages", "Language", &g.languages)?;
        list(wr, "Regions", "Region", &g.regions)?;
        end(wr, "Guide")?;
    }
    end(wr, "Guides")?;

    start(wr, "Paths")?;
    for (id, p) in &report.paths {
        start_with(wr, "Path", &[("id", id.as_str())])?;
        empty_with(
            wr,
            "Statistics",
            &[
                ("totalTrips", &p.total_trips.to_string()),
                ("avgSatisfaction", &format!("{:.2}", p.avg_satisfaction)),
            ],
        )?;
        text_el(wr, "RevenueGenerated", &p.revenue_generated.to_string())?;
        end(wr, "Path")?;
    }
    end(wr, "Paths")
}

/// Целые часы (дробная часть отбрасывается), одинаково для обеих схем.
fn hours(h: f64) -> String {
    format!("{}", h.trunc() as i64)
}

fn start<W: Write>(wr: &mut Writer<W>, name: &str) -> Result<()> {
    wr.write_event(Event::Start(BytesStart::new(name))).map_err(xml)?;
    Ok(())
}

fn start_with<W: Write>(wr: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let el = BytesStart::new(name).with_attributes(attrs.iter().copied());
    wr.write_event(Event::Start(el)).map_err(xml)?;
    Ok(())
}

fn empty_with<W: Write>(wr: &mut Writer<W>, name: &str, attrs: &[(&str, &String)]) -> Result<()> {
    let el = BytesStart::new(name).with_attributes(attrs.iter().map(|(k, v)| (*k, v.as_str())));
    wr.write_event(Event::Empty(el)).map_err(xml)?;
    Ok(())
}

fn end<W: Write>(wr: &mut Writer<W>, name: &str) -> Result<()> {
    wr.write_event(Event::End(BytesEnd::new(name))).map_err(xml)?;
    Ok(())
}

fn text_el<W: Write>(wr: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    start(wr, name)?;
    wr.write_event(Event::Text(BytesText::new(text))).map_err(xml)?;
    end(wr, name)
}

fn list<W: Write>(
    wr: &mut Writer<W>,
    outer: &str,
    inner: &str,
    items: &BTreeSet<String>,
) -> Result<()> {
    if items.is_empty() {
        wr.write_event(Event::Empty(BytesStart::new(outer))).map_err(xml)?;
        return Ok(());
    }
    start(wr, outer)?;
    for item in items {
        text_el(wr, inner, item)?;
    }
    end(wr, outer)
}

fn xml<E: std::fmt::Display>(e: E) -> VeloError {
    VeloError::Xml(e.to_string())
}
