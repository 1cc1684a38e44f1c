use std::path::PathBuf;

/// Credentials for a remote repository, matched against it by `id`.
///
/// There is no `settings.xml` parser here — loading real Maven settings
/// files is an external collaborator's job. This struct exists so the rest
/// of the crate has something concrete to construct and pass in.
#[derive(Debug, Clone)]
pub struct ServerCredential {
    pub id: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The subset of Maven user settings this resolver needs: where the local
/// repository lives, and what credentials are available for which servers.
#[derive(Debug, Clone)]
pub struct UserSettings {
    pub local_repository: PathBuf,
    pub servers: Vec<ServerCredential>,
}

impl UserSettings {
    pub fn new(local_repository: PathBuf, servers: Vec<ServerCredential>) -> Self {
        Self {
            local_repository,
            servers,
        }
    }

    /// Looks up credentials for a repository by its declared server id.
    pub fn credentials_for(&self, server_id: &str) -> Option<&ServerCredential> {
        self.servers.iter().find(|s| s.id == server_id)
    }
}

impl Default for UserSettings {
    /// Falls back to the conventional `${HOME}/.m2/repository`, matching
    /// Maven's own default when no settings file overrides it.
    fn default() -> Self {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            local_repository: home.join(".m2").join("repository"),
            servers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_local_repository_ends_with_m2_repository() {
        let settings = UserSettings::default();
        assert!(settings.local_repository.ends_with("repository"));
        assert!(settings.local_repository.parent().unwrap().ends_with(".m2"));
    }

    #[test]
    fn credentials_lookup_by_server_id() {
        let settings = UserSettings::new(
            PathBuf::from("/tmp/repo"),
            vec![ServerCredential {
                id: "central-mirror".to_string(),
                username: Some("user".to_string()),
                password: Some("pass".to_string()),
            }],
        );
        assert!(settings.credentials_for("central-mirror").is_some());
        assert!(settings.credentials_for("unknown").is_none());
    }
}
