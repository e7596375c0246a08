/// The type to represent keyswitch results.
pub type KeyswitchResult<T = ()> = anyhow::Result<T>;

/// The type to represent keyswitch errors.
pub type KeyswitchError = anyhow::Error;
