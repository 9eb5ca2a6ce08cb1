//! Унифицированные трэйты чтения снимка и записи отчёта на основе std::io::{BufRead, Write}.

use crate::{error::Result, model::Snapshot, report::MonthlyReport};
use std::io::{BufRead, Write};

pub trait ReadSnapshot {
    fn read<R: BufRead>(r: R) -> Result<Snapshot>;
}

pub trait WriteReport {
    fn write<W: Write>(w: W, report: &MonthlyReport) -> Result<()>;
}
