use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};

use super::types::{CURRENT_VERSION, UserProfile};
use crate::error::ProfileError;

pub const DEFAULT_PROFILE_PATH: &str = "~/.tsuzuri/profile.json";

/// A loaded profile and the reason it had to be reset, if any.
///
/// Load never fails outright: an unreadable or corrupt file degrades to an
/// empty profile so the interview can still run.
#[derive(Debug)]
pub struct LoadedProfile {
    pub profile: UserProfile,
    pub warning: Option<ProfileError>,
}

/// Atomic JSON persistence for a single [`UserProfile`].
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build a store from a configured path, expanding a leading `~`.
    pub fn from_setting(raw: &str) -> Self {
        let raw = if raw.trim().is_empty() {
            DEFAULT_PROFILE_PATH
        } else {
            raw.trim()
        };
        Self::new(shellexpand::tilde(raw).into_owned())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadedProfile {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return LoadedProfile {
                    profile: UserProfile::new(),
                    warning: None,
                };
            }
            Err(source) => {
                return LoadedProfile {
                    profile: UserProfile::new(),
                    warning: Some(ProfileError::Read {
                        path: self.path.clone(),
                        source,
                    }),
                };
            }
        };

        match serde_json::from_slice::<UserProfile>(&data) {
            Ok(mut profile) => {
                if profile.version == 0 {
                    profile.version = CURRENT_VERSION;
                }
                LoadedProfile {
                    profile,
                    warning: None,
                }
            }
            Err(source) => {
                let backup = self.backup_path();
                if let Err(err) = write_private(&backup, &data) {
                    tracing::warn!(
                        backup = %backup.display(),
                        error = %err,
                        "failed to back up corrupt profile"
                    );
                }
                LoadedProfile {
                    profile: UserProfile::new(),
                    warning: Some(ProfileError::Corrupt {
                        path: self.path.clone(),
                        backup,
                        source,
                    }),
                }
            }
        }
    }

    pub fn save(&self, profile: &mut UserProfile) -> Result<(), ProfileError> {
        let write_err = |source: io::Error| ProfileError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        profile.version = CURRENT_VERSION;
        profile.updated_at = Some(Utc::now());
        let json = serde_json::to_vec_pretty(profile)?;

        let mut temp_name = self.path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        write_private(&temp_path, &json).map_err(write_err)?;

        if let Err(rename_error) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(rename_error));
        }

        tracing::debug!(path = %self.path.display(), "saved profile");
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".bak.{}", Local::now().format("%Y%m%d-%H%M%S")));
        PathBuf::from(name)
    }
}

fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
