use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Parser;
use keyswitch_core::identity::IdentityFields;
use slog::info;

/// Creates a new profile with a freshly generated SSH key pair.
#[derive(Parser)]
pub struct NewProfileOpts {
    /// The profile to create.
    new_profile: String,

    /// The git user.name to use while this profile is active.
    #[arg(long)]
    display_name: String,

    /// Your handle on the git hosting provider.
    #[arg(long, default_value = "")]
    username: String,

    /// The git user.email to use while this profile is active. Also used as the key comment.
    #[arg(long)]
    email: String,

    /// An access token to keep with the profile. It is never written to git configuration.
    #[arg(long, env = "KEYSWITCH_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

pub fn exec(env: &dyn Environment, opts: NewProfileOpts) -> KeyswitchResult {
    let name = opts.new_profile.as_str();
    let fields = IdentityFields {
        display_name: opts.display_name,
        username: opts.username,
        email: opts.email,
        token: opts.token,
    };

    env.get_identity_service().create_profile(name, &fields)?;

    info!(env.get_logger(), r#"Created profile "{}"."#, name);
    Ok(())
}
