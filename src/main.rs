//! Command-line access to the OWASP Application Security Verification
//! Standard.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
