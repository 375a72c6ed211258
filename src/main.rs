use clap::{Parser, Subcommand};
use paysheet::cli;
use paysheet::error::PaysheetResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paysheet")]
#[command(about = "Attendance workbook in, payable salaries out.")]
#[command(long_about = "Paysheet - attendance-to-salary engine

Reads a monthly attendance workbook (an 'In Time' row and an optional
'Out Time' row per employee, one column per day of the month), measures
late arrivals and early departures against office hours (10:00-18:30),
applies up to 3 grace-buffer days and prints the payable salary.

COMMANDS:
  calculate   - Salary table for every employee
  detail      - Day-by-day breakdown for one employee
  export      - Write the salary report to .xlsx or .json

EXAMPLES:
  paysheet calculate Attendance_Jan_2025.xlsx
  paysheet calculate Attendance_Jan_2025.xlsx --buffer 3:4,11 --buffer 7:2
  paysheet detail Attendance_Jan_2025.xlsx --employee 3
  paysheet export Attendance_Jan_2025.xlsx salary_jan.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Calculate salaries for every employee in the workbook.

Each day is classified (Present, Absent, WFH, Week Off, CL, Holiday).
Present days accrue a deficit for minutes arrived after 10:00 plus minutes
left before 18:30. Absent days cost a full 510-minute workday.

BUFFER DAYS:
  Up to 3 Present days with a deficit can be nominated per employee.
  Each nominated day forgives min(deficit, 15) minutes.

  --buffer EMPLOYEE_ID:DAY[,DAY...]   (repeatable)

EXAMPLE:
  paysheet calculate Attendance_Jan_2025.xlsx --buffer 1:4 --buffer 2:3,9")]
    /// Calculate salaries for every employee
    Calculate {
        /// Path to the attendance workbook (.xlsx)
        file: PathBuf,

        /// Policy/layout overrides (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Buffer days: EMPLOYEE_ID:DAY[,DAY...]
        #[arg(short, long = "buffer")]
        buffers: Vec<String>,

        /// Show verbose loading steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the day-by-day breakdown for one employee
    Detail {
        /// Path to the attendance workbook (.xlsx)
        file: PathBuf,

        /// Employee ID (S.No column)
        #[arg(short, long)]
        employee: u32,

        /// Policy/layout overrides (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Buffer days: EMPLOYEE_ID:DAY[,DAY...]
        #[arg(short, long = "buffer")]
        buffers: Vec<String>,
    },

    #[command(long_about = "Export the salary report.

Output format follows the extension:
  .json  - array of employee reports (calculation + per-day rows)
  other  - Excel workbook with 'Summary' and 'Details' worksheets

EXAMPLE:
  paysheet export Attendance_Jan_2025.xlsx salary_jan.xlsx --buffer 1:4")]
    /// Export the salary report to .xlsx or .json
    Export {
        /// Path to the attendance workbook (.xlsx)
        input: PathBuf,

        /// Output file (.xlsx or .json)
        output: PathBuf,

        /// Policy/layout overrides (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Buffer days: EMPLOYEE_ID:DAY[,DAY...]
        #[arg(short, long = "buffer")]
        buffers: Vec<String>,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> PaysheetResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            file,
            config,
            buffers,
            verbose,
        } => cli::calculate(file, config, buffers, verbose),

        Commands::Detail {
            file,
            employee,
            config,
            buffers,
        } => cli::detail(file, employee, config, buffers),

        Commands::Export {
            input,
            output,
            config,
            buffers,
            verbose,
        } => cli::export(input, output, config, buffers, verbose),
    }
}
