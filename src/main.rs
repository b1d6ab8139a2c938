use amortization::{
    compute_schedules, data, AmortizationInput, AnnualRow, ScheduleComparison, ScheduleError,
    ScheduleSummary,
};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
};

/// Amortization schedule for a loan with extra principal payments
#[derive(Parser, Debug)]
#[command(name = "amortization", version, about)]
struct Cli {
    /// Calculator state as JSON (`-` reads stdin)
    input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Include the month-by-month rows under each year
    #[arg(long)]
    monthly: bool,

    /// Compare against the schedule without extra principal
    #[arg(long)]
    compare: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    let content = if path.as_os_str() == "-" {
        io::read_to_string(io::stdin())
    } else {
        fs::read_to_string(path)
    };
    content.map_err(|e| format!("cannot read {}: {}", path.display(), e))
}

fn print_table(input: &AmortizationInput, schedule: &[AnnualRow], monthly: bool) {
    for year in schedule {
        println!("{}, total paid ${:.2}", year, year.total_paid());
        if !monthly {
            continue;
        }
        for month in &year.details {
            let recorded = input
                .overrides
                .iter()
                .filter(|r| r.period == month.period)
                .map(|r| r.total_payment())
                .reduce(|a, b| a + b);
            match recorded {
                Some(total) => println!(
                    "    {}, total paid ${:.2} [recorded payment ${:.2}]",
                    month,
                    month.total_paid(),
                    total
                ),
                None => println!("    {}, total paid ${:.2}", month, month.total_paid()),
            }
        }
    }
    println!();
    println!("{}", ScheduleSummary::from_schedule(schedule));
}

fn run(cli: &Cli, json: &str) -> Result<(), ScheduleError> {
    let input = data::from_json(json)?;

    let terms = input.loan.resolve()?;
    info!("{}", terms);
    info!(
        "{} lump sums, {} payment records",
        input.lump_sums.len(),
        input.overrides.len()
    );

    let schedules = compute_schedules(&input)?;
    let schedule = &schedules.with_additional;

    match cli.format {
        OutputFormat::Json => println!("{}", data::report_to_json(schedule)?),
        OutputFormat::Table => {
            println!(
                "Monthly principal & interest ${:.2}",
                terms.principal_and_interest_payment()
            );
            print_table(&input, schedule, cli.monthly);
        }
    }

    if cli.compare {
        let comparison = ScheduleComparison::new(&schedules.standard, schedule);
        println!("Standard schedule: {}", comparison.standard);
        println!("{}", comparison);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = SimpleLogger::new()
        .with_level(log_level(cli.verbose))
        .env()
        .init()
    {
        eprintln!("Logger error: {e}");
    }

    let json = match read_input(&cli.input) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    match run(&cli, &json) {
        Ok(()) => {}
        // not ready to compute yet: nothing to show
        Err(e) if e.is_incomplete() => info!("{}", e),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
