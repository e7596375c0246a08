use crate::lib::environment::Environment;
use crate::lib::error::KeyswitchResult;
use clap::Subcommand;

mod clear;
mod current;
mod list;
mod new;
mod remove;
mod show;
mod show_key;
mod r#use;

#[derive(Subcommand)]
pub enum KeyswitchCommand {
    #[command(hide = true)]
    Clear(clear::ClearOpts),
    Current(current::CurrentOpts),
    List(list::ListOpts),
    New(new::NewProfileOpts),
    Remove(remove::RemoveOpts),
    Show(show::ShowOpts),
    ShowKey(show_key::ShowKeyOpts),
    Use(r#use::UseOpts),
}

pub fn exec(env: &dyn Environment, cmd: KeyswitchCommand) -> KeyswitchResult {
    match cmd {
        KeyswitchCommand::Clear(v) => clear::exec(env, v),
        KeyswitchCommand::Current(v) => current::exec(env, v),
        KeyswitchCommand::List(v) => list::exec(env, v),
        KeyswitchCommand::New(v) => new::exec(env, v),
        KeyswitchCommand::Remove(v) => remove::exec(env, v),
        KeyswitchCommand::Show(v) => show::exec(env, v),
        KeyswitchCommand::ShowKey(v) => show_key::exec(env, v),
        KeyswitchCommand::Use(v) => r#use::exec(env, v),
    }
}
