//! Repository authentication, matched from [`graft_core::UserSettings`]'s
//! server list by repository id.

use graft_core::UserSettings;
use reqwest::RequestBuilder;

/// Applies basic/bearer auth to a request if the settings' server list has
/// a matching entry for `repository_id`.
///
/// A username and password both present → HTTP basic auth. A username with
/// no password → basic auth with an empty password. A password with no
/// username → treated as a bearer token.
pub fn apply_auth(request: RequestBuilder, settings: &UserSettings, repository_id: &str) -> RequestBuilder {
    match settings.credentials_for(repository_id) {
        Some(credential) => match (&credential.username, &credential.password) {
            (Some(user), Some(pass)) => request.basic_auth(user, Some(pass)),
            (Some(user), None) => request.basic_auth(user, Option::<&str>::None),
            (None, Some(token)) => request.bearer_auth(token),
            (None, None) => request,
        },
        None => request,
    }
}
