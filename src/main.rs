use access_audit::commands;
use access_audit::config::AuditConfig;
use access_audit::report::OutputFormat;
use anyhow::Result;
use clap::{ArgAction, ArgGroup, CommandFactory, Parser};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "access-audit")]
#[command(about = "System access auditing and logging", long_about = None)]
#[command(version)]
#[command(group(
    ArgGroup::new("mode")
        .args(["could", "did", "log", "completions"])
        .multiple(false)
))]
struct Cli {
    /// List users that *could* access the system during the last DAYS days
    /// (default: 31; `--path` overrides the snapshot log location)
    #[arg(
        short,
        long,
        value_name = "DAYS",
        num_args = 0..=1,
        default_missing_value = "31",
        value_parser = number_of_days,
        allow_negative_numbers = true
    )]
    could: Option<i64>,

    /// List users that *did* access the system during the last DAYS days
    /// (default: 31; `--path` overrides the wtmp location)
    #[arg(
        short,
        long,
        value_name = "DAYS",
        num_args = 0..=1,
        default_missing_value = "31",
        value_parser = number_of_days,
        allow_negative_numbers = true
    )]
    did: Option<i64>,

    /// Create or append to the log of users who could access the system
    #[arg(short, long)]
    log: bool,

    /// Alternative log path: the wtmp prefix for `--did`, the snapshot log for
    /// `--could` and `--log`
    #[arg(short, long)]
    path: Option<String>,

    /// SSH key holder file (default: $ACCESS_AUDIT_KEYS_FILE or /var/lib/misc/ssh-rsa-shadow)
    #[arg(long)]
    keys_file: Option<String>,

    /// Read accounts from a passwd-format file instead of `getent passwd`
    /// (default: $ACCESS_AUDIT_PASSWD_FILE)
    #[arg(long)]
    passwd_file: Option<String>,

    /// Output a users x dates CSV presence matrix
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output merged intervals as JSON
    #[arg(long)]
    json: bool,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion scripts
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,
}

/// Check validity of a days argument
fn number_of_days(value: &str) -> Result<i64, String> {
    let days: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid days value: {} (positive integer required)", value))?;
    if days < 1 {
        return Err(format!(
            "invalid days value: {} (positive integer required)",
            days
        ));
    }
    Ok(days)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = if cli.csv {
        OutputFormat::Csv
    } else if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let path = cli.path.as_deref();
    let (wtmp_prefix, snapshot_log) = if cli.did.is_some() {
        (path, None)
    } else {
        (None, path)
    };
    let config = AuditConfig::from_options(
        wtmp_prefix,
        snapshot_log,
        cli.keys_file.as_deref(),
        cli.passwd_file.as_deref(),
    );

    if let Some(days) = cli.could {
        commands::could_access::run(&config, days, format)
    } else if let Some(days) = cli.did {
        commands::did_access::run(&config, days, format)
    } else if cli.log {
        commands::log_access::run(&config)
    } else if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "access-audit", &mut std::io::stdout());
        Ok(())
    } else {
        let mut cmd = Cli::command();
        println!("{}", cmd.render_usage());
        Ok(())
    }
}
