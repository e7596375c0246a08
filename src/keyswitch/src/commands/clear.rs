use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use anyhow::bail;
use clap::Parser;
use slog::{info, warn};

/// Removes every profile except the active one.
#[derive(Parser)]
pub struct ClearOpts {
    /// Confirms that the key pairs of all inactive profiles should be deleted.
    #[arg(long)]
    yes: bool,
}

pub fn exec(env: &dyn Environment, opts: ClearOpts) -> KeyswitchResult {
    let log = env.get_logger();
    if !opts.yes {
        bail!("Refusing to delete profiles without --yes.");
    }

    let summary = env.get_identity_service().clear_profiles()?;

    for name in &summary.removed {
        info!(log, r#"Removed profile "{}"."#, name);
    }
    if let Some(retained) = summary.retained {
        warn!(log, r#"Kept profile "{}" because it is active."#, retained);
    }
    Ok(())
}
