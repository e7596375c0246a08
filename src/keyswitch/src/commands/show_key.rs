use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Parser;

/// Prints the public key of a profile, for pasting into a git hosting provider.
#[derive(Parser)]
pub struct ShowKeyOpts {
    /// The profile whose key to print.
    profile: String,
}

pub fn exec(env: &dyn Environment, opts: ShowKeyOpts) -> KeyswitchResult {
    let key = env.get_identity_service().show_public_key(&opts.profile)?;
    print!("{}", key);
    if !key.ends_with('\n') {
        println!();
    }
    Ok(())
}
