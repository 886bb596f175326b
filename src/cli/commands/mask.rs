//! `credvault mask`: print the display form of a key.

use crate::cli::{read_secret, Cli};
use crate::errors::Result;
use crate::providers;

/// Execute the `mask` command.
pub fn execute(_cli: &Cli, value: Option<&str>) -> Result<()> {
    let secret = read_secret(value, "Enter key")?;
    println!("{}", providers::mask_key(&secret));
    Ok(())
}
