use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Parser;
use slog::info;

/// Removes an existing profile. The active profile cannot be removed.
#[derive(Parser)]
pub struct RemoveOpts {
    /// The profile to remove.
    removed_profile: String,
}

pub fn exec(env: &dyn Environment, opts: RemoveOpts) -> KeyswitchResult {
    let name = opts.removed_profile.as_str();

    env.get_identity_service().remove_profile(name)?;

    info!(env.get_logger(), r#"Removed profile "{}"."#, name);
    Ok(())
}
