use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use loancalc::{
    CalcSpecs, DataSet, GraphingCalculator, IdrForm, PlotDomain, TableRow,
    assistant::{CallbackLauncher, HelpPage},
    evaluate,
};

#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Graphing, statistics and student loan repayment calculators"
)]
struct Cli {
    /// Settings file (<calc_specs> XML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Xml,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a function of x at one point
    Eval {
        /// Function of x, e.g. "sin(x) + x^2"
        function: String,

        /// Value of x
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        x: f64,
    },

    /// Sample a function over the plot domain
    Plot {
        function: String,

        /// Domain as x_min,x_max,y_min,y_max
        #[arg(short, long, allow_hyphen_values = true)]
        domain: Option<String>,

        /// Number of sampling steps
        #[arg(short, long)]
        resolution: Option<usize>,

        /// Zoom steps to apply; negative values zoom out
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        zoom: i32,

        /// Print every point of every line
        #[arg(long)]
        points: bool,
    },

    /// Print the value table of a function
    Table {
        function: String,

        /// Domain as x_min,x_max,y_min,y_max
        #[arg(short, long, allow_hyphen_values = true)]
        domain: Option<String>,
    },

    /// Descriptive statistics of a list of numbers
    Stats {
        /// Numbers separated by commas and/or spaces
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Estimate an income-driven repayment plan payment
    Idr {
        #[arg(short, long)]
        balance: Option<String>,

        /// Annual income
        #[arg(short, long)]
        income: Option<String>,

        /// Household size (default 1)
        #[arg(short, long)]
        family_size: Option<String>,

        /// State of residence
        #[arg(short, long)]
        state: Option<String>,

        /// SAVE, PAYE, REPAYE, IBR or ICR (default SAVE)
        #[arg(short, long)]
        plan: Option<String>,

        /// Show every plan side by side
        #[arg(long)]
        compare: bool,
    },

    /// Ask the Help page to open the AI assistant
    Assistant,

    /// Print the effective settings, or write them to a file
    Settings {
        #[arg(short, long)]
        write: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct Table {
    row: Vec<TableRow>,
}

fn load_settings(path: Option<PathBuf>) -> Result<CalcSpecs> {
    match path {
        Some(path) => CalcSpecs::from_file(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(CalcSpecs::default()),
    }
}

fn parse_domain(text: &str) -> Result<PlotDomain> {
    let bounds = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<f64>>>()?;
    let [x_min, x_max, y_min, y_max] = bounds[..] else {
        bail!("Expected four bounds x_min,x_max,y_min,y_max, got {}", bounds.len());
    };
    Ok(PlotDomain::new(x_min, x_max, y_min, y_max)?)
}

fn calculator(specs: &CalcSpecs, function: &str, domain: Option<&str>) -> Result<GraphingCalculator> {
    let mut calc = GraphingCalculator::new(specs.plot.clone());
    if let Some(domain) = domain {
        calc.set_domain(parse_domain(domain)?);
    }
    calc.set_function(function)?;
    for warning in calc.warnings() {
        eprintln!("warning: {}", warning);
    }
    Ok(calc)
}

fn print_xml<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", quick_xml::se::to_string(value)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let specs = load_settings(cli.config)?;

    match cli.command {
        Commands::Eval { function, x } => match evaluate(x, &function) {
            Some(y) => println!("{}", y),
            None => println!("undefined"),
        },
        Commands::Plot {
            function,
            domain,
            resolution,
            zoom,
            points,
        } => {
            let mut calc = calculator(&specs, &function, domain.as_deref())?;
            if let Some(resolution) = resolution {
                calc.set_resolution(resolution);
            }
            for _ in 0..zoom.unsigned_abs() {
                let applied = if zoom > 0 { calc.zoom_in() } else { calc.zoom_out() };
                if !applied {
                    eprintln!("warning: zoom limit reached");
                    break;
                }
            }

            let domain = calc.domain();
            let lines = calc.plot();
            println!(
                "{} over x [{}, {}], y [{}, {}]: {} line(s)",
                calc.function_text(),
                domain.x_min(),
                domain.x_max(),
                domain.y_min(),
                domain.y_max(),
                lines.len()
            );
            for (index, line) in lines.iter().enumerate() {
                println!("line {}: {} points", index + 1, line.len());
                if points {
                    for (x, y) in line {
                        println!("  {} {}", x, y);
                    }
                }
            }
        }
        Commands::Table { function, domain } => {
            let calc = calculator(&specs, &function, domain.as_deref())?;
            let rows = calc.table();
            match cli.format {
                OutputFormat::Text => {
                    println!("{:>10} {:>12}", "x", "y");
                    for row in &rows {
                        println!("{:>10.2} {:>12.2}", row.x, row.y);
                    }
                }
                OutputFormat::Xml => print_xml(&Table { row: rows })?,
            }
        }
        Commands::Stats { values } => {
            let mut data = DataSet::new();
            data.add_many(&values.join(" "))?;
            let result = data.calculate()?;
            match cli.format {
                OutputFormat::Text => println!("{}", result.report()),
                OutputFormat::Xml => print_xml(result)?,
            }
        }
        Commands::Idr {
            balance,
            income,
            family_size,
            state,
            plan,
            compare,
        } => {
            let form = IdrForm {
                balance,
                income,
                family_size,
                state,
                plan,
            };
            let estimates = if compare {
                form.compare_with(&specs.repayment)?
            } else {
                vec![form.submit_with(&specs.repayment)?]
            };
            for estimate in &estimates {
                match cli.format {
                    OutputFormat::Text => println!("{}", estimate),
                    OutputFormat::Xml => print_xml(estimate)?,
                }
            }
        }
        Commands::Assistant => {
            let page = HelpPage::new(CallbackLauncher::new(|_| {
                println!("Opening the AI assistant...");
                Ok(())
            }));
            page.open_assistant()?;
        }
        Commands::Settings { write } => match write {
            Some(path) => {
                specs
                    .save(&path)
                    .with_context(|| format!("Failed to write settings to {}", path.display()))?;
                println!("Settings written to {}", path.display());
            }
            None => match cli.format {
                OutputFormat::Text => println!("{}", specs),
                OutputFormat::Xml => println!("{}", specs.to_xml()?),
            },
        },
    }

    Ok(())
}
