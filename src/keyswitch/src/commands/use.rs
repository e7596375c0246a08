use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Parser;
use slog::info;

/// Makes a profile the active SSH and git identity.
#[derive(Parser)]
pub struct UseOpts {
    /// The profile to use.
    profile: String,
}

pub fn exec(env: &dyn Environment, opts: UseOpts) -> KeyswitchResult {
    let name = opts.profile.as_str();

    env.get_identity_service().switch_profile(name)?;

    info!(env.get_logger(), r#"Using profile "{}"."#, name);
    Ok(())
}
