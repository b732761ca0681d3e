//! `.env` loading for the CLI.
//!
//! Values from the file never replace variables that are already set.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{bail, Context, Result};

/// Load `explicit` if given (it must exist), otherwise `./.env` when present.
/// Returns the path that was loaded.
pub fn load_env_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!(".env file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let default = PathBuf::from(".env");
            if !default.exists() {
                return Ok(None);
            }
            default
        }
    };

    dotenvy::from_path(&path)
        .wrap_err_with(|| format!("failed to load env file {}", path.display()))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_vars_including_export_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let env_file = tmp.path().join(".env");
        std::fs::write(
            &env_file,
            "# comment\nexport CSN_TEST_TOKEN_A=test-token\nCSN_TEST_USER_A=U1\n",
        )
        .unwrap();

        let loaded = load_env_file(Some(&env_file)).unwrap();

        assert_eq!(loaded.as_deref(), Some(env_file.as_path()));
        assert_eq!(std::env::var("CSN_TEST_TOKEN_A").unwrap(), "test-token");
        assert_eq!(std::env::var("CSN_TEST_USER_A").unwrap(), "U1");
    }

    #[test]
    fn does_not_overwrite_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let env_file = tmp.path().join(".env");
        std::fs::write(&env_file, "CSN_TEST_TOKEN_B=token-from-file\n").unwrap();
        std::env::set_var("CSN_TEST_TOKEN_B", "token-from-env");

        load_env_file(Some(&env_file)).unwrap();

        assert_eq!(std::env::var("CSN_TEST_TOKEN_B").unwrap(), "token-from-env");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_env_file(Some(&tmp.path().join("missing.env"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
