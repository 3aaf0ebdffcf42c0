//! fix-db-utf8 CLI - convert a MySQL/MariaDB database to UTF-8.

use clap::{CommandFactory, Parser};
use fix_db_utf8::{
    catalog, ConnectionParams, EncodingMigrator, FixError, MigrationReport, MySqlSession,
};
use std::process::ExitCode;
use tracing::{warn, Level};

const LONG_ABOUT: &str = "\
Fix Database Encoding (to UTF-8)

Sometimes the encoding of the stored data differs from the encoding declared
in the database definition. This tool converts all data and encoding
definitions in the database to utf8. To be able to do so you need to know the
current setup.

Variants:
1. the data stored in the database is encoded with an encoding different from
   utf8 (e.g. latin1):
       fix-db-utf8 -e latin1 -u db_username -p db_password -d database
2. the data stored in the database is already utf8 but the encoding definition
   for tables and columns is set to something else (e.g. latin1_swedish_ci):
       fix-db-utf8 -u db_username -p db_password -d database

WARNING: make a backup of your database before using this tool. Messed up
encodings can be tricky and this tool might make it even worse.";

#[derive(Parser)]
#[command(name = "fix-db-utf8")]
#[command(about = "Convert a MySQL/MariaDB database, its tables and text columns to UTF-8")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Print usage and exit
    #[arg(short = 'h', long)]
    help: bool,

    /// Database username
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Database password
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// Database to fix
    #[arg(short = 'd', long)]
    database: Option<String>,

    /// Encoding the stored bytes are actually in (e.g. latin1).
    /// Omit when the data is already utf8 and only mislabeled.
    #[arg(short = 'e', long)]
    source_encoding: Option<String>,

    /// List supported encodings and exit
    #[arg(short = 'l', long)]
    list_encodings: bool,

    /// Database host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Database port
    #[arg(long, default_value = "3306")]
    port: u16,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    /// Output JSON report to stdout
    #[arg(long)]
    output_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Usage is informational output here, never a successful run.
    if cli.help {
        let _ = Cli::command().print_long_help();
        return ExitCode::from(1);
    }

    if cli.list_encodings {
        println!("Encodings:");
        for encoding in fix_db_utf8::ENCODINGS {
            println!("{}\t{}", encoding.name, encoding.description);
        }
        return ExitCode::from(1);
    }

    // Required inputs are validated by hand so -l and -h work on their own.
    let (Some(user), Some(password), Some(database)) =
        (cli.user.clone(), cli.password.clone(), cli.database.clone())
    else {
        eprintln!("Please provide database username, password and database name!\n");
        let _ = Cli::command().print_help();
        return ExitCode::from(1);
    };

    if let Err(e) = setup_logging(&cli.verbosity, &cli.log_format) {
        eprintln!("{}", e);
        return ExitCode::from(1);
    }

    let params = ConnectionParams {
        host: cli.host.clone(),
        port: cli.port,
        username: user,
        password,
        database,
    };

    match run(&cli, &params).await {
        Ok(report) => {
            if cli.output_json {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("{}", e.format_detailed());
                        return ExitCode::from(e.exit_code());
                    }
                }
            } else {
                render_report(&report);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli, params: &ConnectionParams) -> Result<MigrationReport, FixError> {
    if let Some(ref encoding) = cli.source_encoding {
        if catalog::lookup(encoding).is_none() {
            // Not fatal: the engine rejects an unknown charset per statement.
            warn!(
                "'{}' is not a known MySQL character set (see --list-encodings)",
                encoding
            );
        }
    }

    let mut session = MySqlSession::connect(params).await?;
    let migrator = EncodingMigrator::new(session.database(), cli.source_encoding.clone());
    Ok(migrator.migrate(&mut session).await)
}

fn render_report(report: &MigrationReport) {
    for table in &report.tables {
        if table.columns_converted.is_empty() {
            continue;
        }
        match &report.source_encoding {
            Some(encoding) => println!(
                "Data in columns of table '{}' converted from '{}' to utf8.",
                table.name, encoding
            ),
            None => println!("Columns of table '{}' are set up to use utf8.", table.name),
        }
    }

    println!("\nDatabase '{}' is set up to use utf8 now.", report.database);
    println!("  Tables processed: {}", report.tables_processed);
    println!("  Tables altered: {}", report.tables_altered);
    println!("  Columns converted: {}", report.columns_converted);
    println!("  Duration: {:.2}s", report.duration_seconds);

    if !report.errors.is_empty() {
        println!("\n{} statement(s) failed:", report.errors.len());
        for error in &report.errors {
            println!("  [{}] {} -- {}", error.code, error.message, error.statement);
        }
    }
    println!("Setup finished.");
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
