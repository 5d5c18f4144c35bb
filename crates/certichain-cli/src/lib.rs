//! # certichain-cli: Command-Line Front End
//!
//! Provides the `certichain` binary over a file-backed registry.
//!
//! ## Subcommands
//!
//! - `certichain keygen`: Ed25519 keypair generation. The public key is the
//!   caller identity for every other subcommand.
//! - `certichain admin`: Admin bootstrap and lookup.
//! - `certichain issuer`: Issuer registration, verification, revocation.
//! - `certichain certificate`: Issuance, revocation, lookup, verification.
//! - `certichain address`: Offline address derivation.
//!
//! ```bash
//! certichain keygen --prefix admin
//! certichain --keypair admin.key admin init
//! certichain --keypair uni.key issuer register "Test University"
//! certichain --keypair admin.key issuer verify uni.pub
//! certichain --keypair uni.key certificate issue --student Alice --course "Blockchain 101"
//! ```

pub mod commands;
pub mod config;
pub mod keys;
