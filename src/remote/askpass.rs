//! Non-interactive password authentication for the OpenSSH client.
//!
//! `ssh` and `scp` only read passwords from a TTY or from an `SSH_ASKPASS`
//! helper. The helper here is this binary itself: the password travels to it
//! through [`SECRET_ENV`], and `main` answers the prompt before any argument
//! parsing when that variable is set.

use crate::utils::error::RemoteError;
use std::ffi::OsString;

/// Variable carrying the password from the parent to the askpass child
pub const SECRET_ENV: &str = "STEREO_SNAP_ASKPASS_SECRET";

/// Environment for an ssh/scp child that must authenticate with `password`
///
/// `SSH_ASKPASS_REQUIRE=force` makes OpenSSH (8.4+) use the helper even with
/// a terminal attached. `DISPLAY` is filled in for older clients, which only
/// consult `SSH_ASKPASS` when it is set.
pub fn helper_env(password: &str) -> Result<Vec<(&'static str, OsString)>, RemoteError> {
    let helper = std::env::current_exe()?;
    let display = std::env::var_os("DISPLAY").unwrap_or_else(|| OsString::from(":0"));

    Ok(vec![
        ("SSH_ASKPASS", helper.into_os_string()),
        ("SSH_ASKPASS_REQUIRE", OsString::from("force")),
        ("DISPLAY", display),
        (SECRET_ENV, OsString::from(password)),
    ])
}

/// The password to answer with, when this process was started as the helper
pub fn pending_reply() -> Option<String> {
    std::env::var(SECRET_ENV).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(env: &'a [(&'static str, OsString)], key: &str) -> Option<&'a OsString> {
        env.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[test]
    fn test_helper_env_points_ssh_at_this_binary() {
        let env = helper_env("hunter2").unwrap();

        assert_eq!(
            value(&env, "SSH_ASKPASS"),
            Some(&std::env::current_exe().unwrap().into_os_string())
        );
        assert_eq!(value(&env, "SSH_ASKPASS_REQUIRE"), Some(&OsString::from("force")));
        assert_eq!(value(&env, SECRET_ENV), Some(&OsString::from("hunter2")));
        assert!(value(&env, "DISPLAY").is_some());
    }
}
