//! # Registry Subcommands
//!
//! Each invocation opens the file store, performs one registry operation as
//! the caller named by the keypair, and prints the result. Lookups print
//! JSON to stdout; mutations print a one-line `OK:` summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use certichain_core::{
    admin_address, certificate_address, certificate_content_hash, issuer_address, Address,
    CertificateContent, CertificateId, PublicKey, Timestamp,
};
use certichain_registry::{guard, CertificateFields, FixedClock, Registry};
use certichain_store::FileStore;

use crate::config::Settings;
use crate::keys;

/// One CLI session over the configured store.
pub struct Session {
    registry: Registry<FileStore, FixedClock>,
    keypair_path: PathBuf,
    now: Timestamp,
}

impl Session {
    /// Open the store named in `settings`. The session clock is frozen at
    /// the moment of opening.
    pub fn open(settings: &Settings) -> Result<Self> {
        let store = FileStore::open(&settings.store_path).with_context(|| {
            format!("failed to open store: {}", settings.store_path.display())
        })?;
        let now = Timestamp::now();
        Ok(Self {
            registry: Registry::with_clock(store, FixedClock(now), settings.registry),
            keypair_path: settings.keypair_path.clone(),
            now,
        })
    }

    /// The registry behind this session.
    pub fn registry(&self) -> &Registry<FileStore, FixedClock> {
        &self.registry
    }

    fn caller(&self) -> Result<PublicKey> {
        keys::load_identity(&self.keypair_path)
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_address(arg: &str) -> Result<Address> {
    arg.parse::<Address>()
        .map_err(|e| anyhow::anyhow!("invalid address {arg:?}: {e}"))
}

// ---------------------------------------------------------------------------
// admin
// ---------------------------------------------------------------------------

/// Arguments for `certichain admin`.
#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Claim the admin role with the current keypair. Succeeds once per store.
    Init,
    /// Print the admin record.
    Show,
}

pub fn run_admin(args: &AdminArgs, session: &Session) -> Result<u8> {
    let registry = session.registry();
    match args.command {
        AdminCommand::Init => {
            let caller = session.caller()?;
            let address = registry.initialize_admin(&caller)?;
            println!("OK: admin initialized");
            println!("  Authority: {caller}");
            println!("  Address:   {address}");
        }
        AdminCommand::Show => print_json(&registry.get_admin()?)?,
    }
    Ok(0)
}

// ---------------------------------------------------------------------------
// issuer
// ---------------------------------------------------------------------------

/// Arguments for `certichain issuer`.
#[derive(Args, Debug)]
pub struct IssuerArgs {
    #[command(subcommand)]
    pub command: IssuerCommand,
}

#[derive(Subcommand, Debug)]
pub enum IssuerCommand {
    /// Register the current keypair as an issuer (unverified).
    Register {
        /// Institution display name.
        institution_name: String,
    },
    /// Verify an issuer (admin only).
    Verify {
        /// Issuer public key: hex, or path to a `.pub` file.
        issuer: String,
    },
    /// Permanently revoke an issuer (admin only).
    Revoke {
        /// Issuer public key: hex, or path to a `.pub` file.
        issuer: String,
    },
    /// Print an issuer record. Defaults to the current keypair's issuer.
    Show {
        /// Issuer public key: hex, or path to a `.pub` file.
        issuer: Option<String>,
    },
    /// List every registered issuer.
    List,
}

pub fn run_issuer(args: &IssuerArgs, session: &Session) -> Result<u8> {
    let registry = session.registry();
    match &args.command {
        IssuerCommand::Register { institution_name } => {
            let caller = session.caller()?;
            let address = registry.register_issuer(&caller, institution_name)?;
            println!("OK: issuer registered (pending verification)");
            println!("  Institution: {institution_name}");
            println!("  Address:     {address}");
        }
        IssuerCommand::Verify { issuer } => {
            let target = keys::parse_public_key(issuer)?;
            let address = registry.verify_issuer(&session.caller()?, &target)?;
            println!("OK: issuer verified: {address}");
        }
        IssuerCommand::Revoke { issuer } => {
            let target = keys::parse_public_key(issuer)?;
            let address = registry.revoke_issuer(&session.caller()?, &target)?;
            println!("OK: issuer revoked: {address}");
        }
        IssuerCommand::Show { issuer } => {
            let target = match issuer {
                Some(arg) => keys::parse_public_key(arg)?,
                None => session.caller()?,
            };
            print_json(&registry.get_issuer(&target)?)?;
        }
        IssuerCommand::List => {
            let issuers: Vec<_> = registry
                .list_issuers()?
                .into_iter()
                .map(|(address, issuer)| Listed { address, record: issuer })
                .collect();
            print_json(&issuers)?;
        }
    }
    Ok(0)
}

#[derive(Serialize)]
struct Listed<T> {
    address: Address,
    #[serde(flatten)]
    record: T,
}

// ---------------------------------------------------------------------------
// certificate
// ---------------------------------------------------------------------------

/// Arguments for `certichain certificate`.
#[derive(Args, Debug)]
pub struct CertificateArgs {
    #[command(subcommand)]
    pub command: CertificateCommand,
}

#[derive(Subcommand, Debug)]
pub enum CertificateCommand {
    /// Issue a certificate as the current keypair's issuer.
    Issue {
        /// Recipient name.
        #[arg(long)]
        student: String,
        /// Course or credential name.
        #[arg(long)]
        course: String,
        /// Content hash to record. Computed from the certificate content
        /// when omitted.
        #[arg(long)]
        hash: Option<String>,
        /// Certificate id. Generated when omitted.
        #[arg(long)]
        id: Option<String>,
    },
    /// Revoke a certificate minted by the current keypair's issuer.
    Revoke {
        /// Certificate address (64 hex chars).
        address: String,
    },
    /// Print a certificate record.
    Show {
        /// Certificate address (64 hex chars).
        address: String,
    },
    /// Check a certificate against its issuer's current standing.
    ///
    /// Exits 0 when the certificate is valid and 3 otherwise.
    Verify {
        /// Certificate address (64 hex chars).
        address: String,
    },
    /// List certificates minted by an issuer. Defaults to the current
    /// keypair's issuer.
    List {
        /// Issuer public key: hex, or path to a `.pub` file.
        #[arg(long)]
        issuer: Option<String>,
    },
}

/// Exit code for a certificate that exists but should not be trusted.
pub const EXIT_NOT_VALID: u8 = 3;

const DERIVED_HASH_LEN: usize = 64;

pub fn run_certificate(args: &CertificateArgs, session: &Session) -> Result<u8> {
    let registry = session.registry();
    match &args.command {
        CertificateCommand::Issue {
            student,
            course,
            hash,
            id,
        } => {
            let caller = session.caller()?;
            let certificate_id = id
                .clone()
                .unwrap_or_else(|| CertificateId::generate().to_string());
            // A derived hash is hex SHA-256; stand in for it until the issuer is read.
            let derived = "0".repeat(DERIVED_HASH_LEN);
            guard::validate_certificate_fields(
                &CertificateFields {
                    student_name: student,
                    course_name: course,
                    certificate_hash: hash.as_deref().unwrap_or(&derived),
                    certificate_id: &certificate_id,
                },
                &registry.config().limits,
            )?;
            let certificate_hash = match hash {
                Some(hash) => hash.clone(),
                None => {
                    let issuer = registry.get_issuer(&caller)?;
                    certificate_content_hash(&CertificateContent {
                        student_name: student.clone(),
                        course_name: course.clone(),
                        institution_name: issuer.institution_name,
                        issuer: caller,
                        certificate_id: certificate_id.clone(),
                        issued_at: session.now,
                    })
                    .context("failed to hash certificate content")?
                }
            };
            let address = registry.issue_certificate(
                &caller,
                student,
                course,
                &certificate_hash,
                &certificate_id,
            )?;
            println!("OK: certificate issued");
            println!("  Id:      {certificate_id}");
            println!("  Hash:    {certificate_hash}");
            println!("  Address: {address}");
        }
        CertificateCommand::Revoke { address } => {
            let address = parse_address(address)?;
            registry.revoke_certificate(&session.caller()?, &address)?;
            println!("OK: certificate revoked: {address}");
        }
        CertificateCommand::Show { address } => {
            print_json(&registry.get_certificate_at(&parse_address(address)?)?)?;
        }
        CertificateCommand::Verify { address } => {
            let report = registry.verify_certificate(&parse_address(address)?)?;
            print_json(&report)?;
            if !report.is_valid() {
                return Ok(EXIT_NOT_VALID);
            }
        }
        CertificateCommand::List { issuer } => {
            let target = match issuer {
                Some(arg) => keys::parse_public_key(arg)?,
                None => session.caller()?,
            };
            let certificates: Vec<_> = registry
                .list_certificates_by_issuer(&target)?
                .into_iter()
                .map(|(address, certificate)| Listed {
                    address,
                    record: certificate,
                })
                .collect();
            print_json(&certificates)?;
        }
    }
    Ok(0)
}

// ---------------------------------------------------------------------------
// address
// ---------------------------------------------------------------------------

/// Arguments for `certichain address`.
#[derive(Args, Debug)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

/// Derive record addresses offline, without opening a store.
#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// The admin singleton address.
    Admin,
    /// The address of an issuer record.
    Issuer {
        /// Issuer public key: hex, or path to a `.pub` file.
        issuer: String,
    },
    /// The address of a certificate record.
    Certificate {
        /// Issuer public key: hex, or path to a `.pub` file.
        issuer: String,
        /// Certificate id.
        certificate_id: String,
    },
}

pub fn run_address(args: &AddressArgs) -> Result<u8> {
    let address = match &args.command {
        AddressCommand::Admin => admin_address(),
        AddressCommand::Issuer { issuer } => issuer_address(&keys::parse_public_key(issuer)?),
        AddressCommand::Certificate {
            issuer,
            certificate_id,
        } => certificate_address(&keys::parse_public_key(issuer)?, certificate_id),
    };
    println!("{address}");
    Ok(0)
}

// ---------------------------------------------------------------------------
// keygen
// ---------------------------------------------------------------------------

/// Arguments for `certichain keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the keypair files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Prefix for the key filenames.
    #[arg(long, default_value = "certichain")]
    pub prefix: String,
}

pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let generated = keys::generate(&args.output, &args.prefix)?;
    println!("OK: generated Ed25519 keypair");
    println!("  Private key: {}", generated.secret_path.display());
    println!("  Public key:  {}", generated.public_path.display());
    println!("  Public key (hex): {}", generated.public_key);
    Ok(0)
}
