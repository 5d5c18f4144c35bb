//! # certichain CLI entry point
//!
//! Parses command-line arguments, resolves settings, and dispatches to the
//! subcommand handlers in `certichain_cli::commands`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use certichain_cli::commands::{
    run_address, run_admin, run_certificate, run_issuer, run_keygen, AddressArgs, AdminArgs,
    CertificateArgs, IssuerArgs, KeygenArgs, Session,
};
use certichain_cli::config::Settings;
use certichain_core::RegistryError;

/// CertiChain credential registry CLI.
///
/// Every caller is an Ed25519 keypair. The admin verifies issuers; verified
/// issuers mint certificates; anyone can look records up and verify them.
#[derive(Parser, Debug)]
#[command(name = "certichain", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the registry store file.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Path to the caller's secret key file.
    #[arg(long, global = true)]
    keypair: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 keypair.
    Keygen(KeygenArgs),

    /// Admin bootstrap and lookup.
    Admin(AdminArgs),

    /// Issuer registration and lifecycle.
    Issuer(IssuerArgs),

    /// Certificate issuance, revocation and verification.
    #[command(alias = "cert")]
    Certificate(CertificateArgs),

    /// Derive record addresses.
    Address(AddressArgs),
}

/// Exit code for an operation the registry rejected.
const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, takes precedence over -v.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::debug!("certichain CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let open_session = || {
        Settings::resolve(cli.config.as_deref(), cli.store, cli.keypair)
            .and_then(|settings| Session::open(&settings))
    };

    let result = match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::Address(args) => run_address(&args),
        Commands::Admin(args) => open_session().and_then(|s| run_admin(&args, &s)),
        Commands::Issuer(args) => open_session().and_then(|s| run_issuer(&args, &s)),
        Commands::Certificate(args) => open_session().and_then(|s| run_certificate(&args, &s)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => match e.downcast_ref::<RegistryError>() {
            Some(rejection) => {
                tracing::error!(
                    code = rejection.code(),
                    category = %rejection.category(),
                    "{rejection}"
                );
                ExitCode::from(EXIT_REJECTED)
            }
            None => {
                tracing::error!("{e:#}");
                ExitCode::from(1)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certichain_cli::commands::{AdminCommand, CertificateCommand, IssuerCommand};

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "certichain",
            "admin",
            "init",
            "--store",
            "reg.json",
            "--keypair",
            "admin.key",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("reg.json")));
        assert_eq!(cli.keypair, Some(PathBuf::from("admin.key")));
        assert!(matches!(
            cli.command,
            Commands::Admin(AdminArgs {
                command: AdminCommand::Init
            })
        ));
    }

    #[test]
    fn cli_parse_issuer_register() {
        let cli =
            Cli::try_parse_from(["certichain", "issuer", "register", "Test University"]).unwrap();
        if let Commands::Issuer(IssuerArgs {
            command: IssuerCommand::Register { institution_name },
        }) = cli.command
        {
            assert_eq!(institution_name, "Test University");
        } else {
            panic!("expected issuer register");
        }
    }

    #[test]
    fn cli_parse_certificate_issue_optional_fields() {
        let cli = Cli::try_parse_from([
            "certichain",
            "cert",
            "issue",
            "--student",
            "Alice",
            "--course",
            "Blockchain 101",
        ])
        .unwrap();
        if let Commands::Certificate(CertificateArgs {
            command: CertificateCommand::Issue { hash, id, .. },
        }) = cli.command
        {
            assert!(hash.is_none());
            assert!(id.is_none());
        } else {
            panic!("expected certificate issue");
        }
    }

    #[test]
    fn cli_parse_log_format() {
        let cli = Cli::try_parse_from(["certichain", "--log-format", "json", "address", "admin"])
            .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["certichain", "--log-format", "xml", "address", "admin"]).is_err());
    }

    #[test]
    fn cli_parse_keygen_defaults() {
        let cli = Cli::try_parse_from(["certichain", "keygen"]).unwrap();
        if let Commands::Keygen(args) = cli.command {
            assert_eq!(args.output, PathBuf::from("."));
            assert_eq!(args.prefix, "certichain");
        } else {
            panic!("expected keygen");
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["certichain"]).is_err());
    }
}
