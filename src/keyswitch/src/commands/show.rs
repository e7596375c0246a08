use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Parser;
use time::format_description::well_known::Rfc3339;

/// Shows the git identity stored with a profile.
#[derive(Parser)]
pub struct ShowOpts {
    /// The profile to show.
    profile: String,
}

pub fn exec(env: &dyn Environment, opts: ShowOpts) -> KeyswitchResult {
    let service = env.get_identity_service();
    let profile = service.get_profile(&opts.profile)?;
    let active = service.get_current_profile()?.as_deref() == Some(profile.name.as_str());

    println!("name:         {}", profile.name);
    println!("display name: {}", profile.fields.display_name);
    println!("username:     {}", profile.fields.username);
    println!("email:        {}", profile.fields.email);
    println!(
        "token:        {}",
        if profile.fields.token.is_some() {
            "present"
        } else {
            "absent"
        }
    );
    if let Some(created_at) = profile.created_at {
        println!("created:      {}", created_at.format(&Rfc3339)?);
    }
    println!("active:       {}", if active { "yes" } else { "no" });
    Ok(())
}
