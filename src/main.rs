use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;

use goal_report_pdf::{
    Error, FooterMode, PageSize, ReportConfig, ReportRequest, render_report, report_file_name,
    write_report,
};

/// Render a goal progress report as a PDF.
#[derive(Parser, Debug)]
#[command(name = "goal-report", version, about)]
struct Args {
    /// Report request JSON, or `-` for stdin
    input: PathBuf,

    /// Output file, or `-` for stdout. Defaults to goal-report-<id>.pdf
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Goal id used for the output file name when the input has none
    #[arg(long)]
    goal_id: Option<String>,

    /// Generation date printed in the header (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = PageSize::A4)]
    page_size: PageSize,

    /// Draw footers after layout instead of during it
    #[arg(long)]
    deferred_footers: bool,

    #[arg(long, value_name = "PATH")]
    font_regular: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    font_bold: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    font_italic: Option<PathBuf>,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("{s:?}: {e}"))
}

fn is_stdio(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}

fn run(args: Args) -> Result<(), Error> {
    let json = if is_stdio(&args.input) {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.input)?
    };

    let mut request = ReportRequest::from_json(&json)?;
    if request.goal.id.is_none() {
        request.goal.id = args.goal_id;
    }
    let data = request.into_report_data()?;

    let mut config = ReportConfig::from_env().with_page_size(args.page_size);
    if args.deferred_footers {
        config.footer_mode = FooterMode::Deferred;
    }
    if args.date.is_some() {
        config.generated_on = args.date;
    }
    if args.no_compress {
        config.compress = false;
    }
    config.fonts.regular = args.font_regular.or(config.fonts.regular);
    config.fonts.bold = args.font_bold.or(config.fonts.bold);
    config.fonts.italic = args.font_italic.or(config.fonts.italic);

    let path = match args.output {
        Some(path) if is_stdio(&path) => {
            let doc = render_report(&data, &config)?;
            doc.write_to(&mut io::stdout().lock())?;
            return Ok(());
        }
        Some(path) => path,
        None => PathBuf::from(report_file_name(&data.goal)),
    };
    let pages = write_report(&data, &config, &path)?;
    eprintln!("{} ({pages} pages)", path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
