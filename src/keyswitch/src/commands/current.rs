use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Parser;
use slog::info;

/// Shows the name of the active profile.
#[derive(Parser)]
pub struct CurrentOpts {}

pub fn exec(env: &dyn Environment, _opts: CurrentOpts) -> KeyswitchResult {
    match env.get_identity_service().get_current_profile()? {
        Some(name) => println!("{}", name),
        None => info!(env.get_logger(), "No profile is active."),
    }
    Ok(())
}
