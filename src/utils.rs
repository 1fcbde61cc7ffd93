use url::Url;

use crate::config::LOGIN_SCOPES;

/// Query parameters the authorize redirect appends to the redirect URI.
const REDIRECT_PARAMS: &[&str] = &["code", "state", "error"];

/// Extracts the playlist id from a URL such as
/// `https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc`.
///
/// The id is the path segment right after the first `playlist` segment. Strings
/// that do not parse as absolute URLs, and URLs without a non-empty segment after
/// `playlist`, yield `None`.
pub fn playlist_id_from_url(playlist_url: &str) -> Option<String> {
    let url = Url::parse(playlist_url.trim()).ok()?;
    let mut segments = url.path_segments()?;

    segments.find(|s| *s == "playlist")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Returns the authorization code carried by a redirect URL, if any.
pub fn code_from_url(current_url: &str) -> Option<String> {
    let url = Url::parse(current_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}

/// Removes the authorize redirect parameters (`code`, `state`, `error`) from a URL
/// and keeps every other query parameter in order.
///
/// Strings that are not absolute URLs are returned unchanged.
pub fn strip_auth_params(current_url: &str) -> String {
    let Ok(mut url) = Url::parse(current_url) else {
        return current_url.to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !REDIRECT_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    url.to_string()
}

/// Builds the Spotify authorize URL the login action navigates to.
pub fn build_authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(auth_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &LOGIN_SCOPES.join(" "));

    Ok(url.to_string())
}
