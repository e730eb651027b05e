//! Location of the per-user `.o3de` directory
//!
//! `O3DE_HOME` is checked before the home directory so container and CI
//! setups can redirect all manifest access.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::json::MANIFEST_FILE;

pub const O3DE_HOME_ENV: &str = "O3DE_HOME";

/// The per-user `.o3de` directory: `$O3DE_HOME` if set, else `~/.o3de`
pub fn o3de_home() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(O3DE_HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|home| home.join(".o3de"))
        .ok_or_else(|| Error::argument("could not determine home directory"))
}

/// Path of the per-user manifest, `o3de_manifest.json`
pub fn manifest_path() -> Result<PathBuf> {
    Ok(o3de_home()?.join(MANIFEST_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_override_wins() {
        std::env::set_var(O3DE_HOME_ENV, "/tmp/o3de-test-home");
        assert_eq!(o3de_home().unwrap(), PathBuf::from("/tmp/o3de-test-home"));
        assert_eq!(
            manifest_path().unwrap(),
            PathBuf::from("/tmp/o3de-test-home/o3de_manifest.json")
        );
        std::env::remove_var(O3DE_HOME_ENV);
    }

    #[test]
    #[serial]
    fn test_default_is_dot_o3de_under_home() {
        std::env::remove_var(O3DE_HOME_ENV);
        let home = o3de_home().unwrap();
        assert!(home.ends_with(".o3de"));
    }
}
