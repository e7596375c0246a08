use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Parser;
use std::io::Write;

/// Lists existing profiles, oldest first. The active profile is marked with '*'.
#[derive(Parser)]
pub struct ListOpts {}

pub fn exec(env: &dyn Environment, _opts: ListOpts) -> KeyswitchResult {
    let service = env.get_identity_service();
    let profiles = service.list_profiles()?;
    let current = service.get_current_profile()?;
    for profile in profiles {
        if current.as_deref() == Some(profile.as_str()) {
            // same profile, suffix with '*'.
            print!("{}", profile);
            std::io::stdout().flush()?;
            eprint!(" *");
            std::io::stderr().flush()?;
            println!();
        } else {
            println!("{}", profile);
        }
    }
    Ok(())
}
