use velolib::{export_monthly_report, load};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: снимок из stdin -> отчёт за месяц в stdout
    let mut args = std::env::args().skip(1);
    let year: i32 = args.next().ok_or("usage: monthly_report YEAR MONTH")?.parse()?;
    let month: u32 = args.next().ok_or("usage: monthly_report YEAR MONTH")?.parse()?;

    let snapshot = load(std::io::BufReader::new(std::io::stdin()))?;
    print!("{}", export_monthly_report(&snapshot, year, month)?);
    Ok(())
}
