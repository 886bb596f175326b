//! `credvault detect`: guess which provider issued a key.

use crate::cli::{read_secret, Cli};
use crate::errors::Result;
use crate::providers;

/// Execute the `detect` command.  Prints the provider id only, so the
/// output can be captured by scripts.
pub fn execute(_cli: &Cli, value: Option<&str>) -> Result<()> {
    let secret = read_secret(value, "Enter key")?;
    println!("{}", providers::detect_provider(&secret));
    Ok(())
}
