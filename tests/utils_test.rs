use playlist_viewer::utils::*;

#[test]
fn test_playlist_id_from_url() {
    assert_eq!(
        playlist_id_from_url("https://open.music.example/playlist/37i9dQZF1"),
        Some("37i9dQZF1".to_string())
    );

    // Trailing segments and query strings are ignored
    assert_eq!(
        playlist_id_from_url("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M/extra?si=abc"),
        Some("37i9dQZF1DXcBWIGoYBM5M".to_string())
    );

    // Locale prefixes before the playlist segment are fine
    assert_eq!(
        playlist_id_from_url("https://open.spotify.com/intl-de/playlist/abc123"),
        Some("abc123".to_string())
    );

    // Surrounding whitespace from copy/paste
    assert_eq!(
        playlist_id_from_url("  https://open.spotify.com/playlist/abc123  "),
        Some("abc123".to_string())
    );
}

#[test]
fn test_playlist_id_from_url_rejects_urls_without_playlist_segment() {
    assert_eq!(playlist_id_from_url("not-a-url"), None);
    assert_eq!(playlist_id_from_url(""), None);
    assert_eq!(playlist_id_from_url("https://open.spotify.com/album/abc"), None);
    assert_eq!(playlist_id_from_url("https://open.spotify.com/playlist"), None);
    assert_eq!(playlist_id_from_url("https://open.spotify.com/playlist/"), None);
    assert_eq!(playlist_id_from_url("/playlist/abc"), None);
    assert_eq!(playlist_id_from_url("mailto:playlist@example.com"), None);
}

#[test]
fn test_playlist_id_for_every_id_shape() {
    for id in ["a", "37i9dQZF1", "0123456789abcdefABCDEF", "with-dash_and_underscore"] {
        let url = format!("https://open.spotify.com/playlist/{id}/tracks");
        assert_eq!(playlist_id_from_url(&url).as_deref(), Some(id));
    }
}

#[test]
fn test_code_from_url() {
    assert_eq!(
        code_from_url("http://localhost:3000/?code=AQB123&state=xyz"),
        Some("AQB123".to_string())
    );
    assert_eq!(code_from_url("http://localhost:3000/"), None);
    assert_eq!(code_from_url("http://localhost:3000/?code="), None);
    assert_eq!(code_from_url("http://localhost:3000/?error=access_denied"), None);
    assert_eq!(code_from_url("not a url"), None);
}

#[test]
fn test_strip_auth_params() {
    assert_eq!(
        strip_auth_params("http://localhost:3000/?code=AQB123"),
        "http://localhost:3000/"
    );
    assert_eq!(
        strip_auth_params("http://localhost:3000/view?tab=lists&code=AQB123&state=xyz"),
        "http://localhost:3000/view?tab=lists"
    );

    // Nothing to strip
    assert_eq!(
        strip_auth_params("http://localhost:3000/view?tab=lists"),
        "http://localhost:3000/view?tab=lists"
    );

    // Stripping is idempotent
    let once = strip_auth_params("http://localhost:3000/?code=AQB123&x=1");
    assert_eq!(strip_auth_params(&once), once);
    assert_eq!(code_from_url(&once), None);
}

#[test]
fn test_build_authorize_url() {
    let url = build_authorize_url(
        "https://accounts.spotify.com/authorize",
        "client",
        "http://localhost:3000/",
    )
    .unwrap();

    assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(url.contains("client_id=client"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2F"));
    assert!(url.contains("scope=playlist-read-private+playlist-read-collaborative"));

    assert!(build_authorize_url("not a url", "client", "http://localhost/").is_err());
}
