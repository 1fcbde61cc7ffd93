use tokio::sync::Mutex;

use crate::{
    config,
    session::{ClientError, SessionBackend, SessionStore, StoreError},
    types::{PlaylistSummary, TokenPair, TrackView},
    utils,
};

/// Where the session stands with respect to authentication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    AwaitingCodeExchange,
    LoggedIn(TokenPair),
}

impl SessionState {
    pub fn tokens(&self) -> Option<&TokenPair> {
        match self {
            SessionState::LoggedIn(tokens) => Some(tokens),
            _ => None,
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub state: SessionState,
    pub playlists: Option<Vec<PlaylistSummary>>,
    pub tracks: Option<Vec<TrackView>>,
    pub error: Option<String>,
    pub loading: bool,
}

/// Public client id / redirect pair used to build the login redirect.
#[derive(Debug, Clone, Default)]
pub struct LoginSettings {
    pub auth_url: String,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
}

impl LoginSettings {
    pub fn from_env() -> Self {
        Self {
            auth_url: config::spotify_apiauth_url(),
            client_id: config::public_client_id(),
            redirect_uri: config::public_redirect_uri(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    view: SessionView,
    // Bumped by every fetch and by logout. A fetch whose ticket is no longer
    // current has been superseded and its result is dropped.
    generation: u64,
    // Bumped by logout only. Restores and code exchanges started under an older
    // epoch must not log the session back in.
    epoch: u64,
    current_url: Option<String>,
}

impl Inner {
    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.view.loading = true;
        self.view.error = None;
        self.generation
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation == ticket
    }
}

/// Drives login, code exchange, playlist fetches and logout.
///
/// The view lives behind a mutex that is only held between awaits, never across
/// a call to the backend or the store, so overlapping actions are possible; the
/// generation ticket decides which result gets written.
pub struct SessionController<S, B> {
    store: S,
    backend: B,
    login: LoginSettings,
    inner: Mutex<Inner>,
}

impl<S: SessionStore, B: SessionBackend> SessionController<S, B> {
    pub fn new(store: S, backend: B, login: LoginSettings) -> Self {
        Self {
            store,
            backend,
            login,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Page load.
    ///
    /// With a persisted token pair the session is logged in right away and the
    /// user's playlists are fetched. Otherwise, if `current_url` carries an
    /// authorization code, the code is exchanged once: success persists the pair
    /// and fetches playlists, failure leaves the session logged out with the error
    /// in the view. The redirect parameters are stripped from the current URL in
    /// every case, so loading the resulting URL again never re-uses a code.
    ///
    /// A `logout` that lands while the pair is being restored, exchanged or saved
    /// wins: the session stays logged out and nothing is left persisted.
    pub async fn load(&self, current_url: Option<&str>) -> Result<(), StoreError> {
        let epoch = {
            let mut inner = self.inner.lock().await;
            if let Some(url) = current_url {
                inner.current_url = Some(utils::strip_auth_params(url));
            }
            inner.epoch
        };

        if let Some(tokens) = self.store.load().await? {
            {
                let mut inner = self.inner.lock().await;
                if inner.epoch != epoch {
                    tracing::debug!("discarding session restored across a logout");
                    return Ok(());
                }
                tracing::debug!("restored persisted session");
                inner.view.state = SessionState::LoggedIn(tokens);
            }
            self.refresh_playlists().await;
            return Ok(());
        }

        let Some(code) = current_url.and_then(utils::code_from_url) else {
            return Ok(());
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.epoch != epoch {
                return Ok(());
            }
            inner.view.state = SessionState::AwaitingCodeExchange;
            inner.view.loading = true;
            inner.view.error = None;
        }

        let tokens = match self.backend.exchange_code(&code).await {
            Ok(tokens) => tokens,
            Err(e) => {
                let mut inner = self.inner.lock().await;
                if inner.epoch == epoch {
                    inner.view.state = SessionState::LoggedOut;
                    inner.view.error = Some(e.to_string());
                    inner.view.loading = false;
                }
                return Ok(());
            }
        };

        if self.inner.lock().await.epoch != epoch {
            tracing::debug!("discarding code exchange finished after logout");
            return Ok(());
        }

        if let Err(e) = self.store.save(&tokens).await {
            let mut inner = self.inner.lock().await;
            if inner.epoch == epoch {
                inner.view.state = SessionState::LoggedOut;
                inner.view.error = Some(e.to_string());
                inner.view.loading = false;
            }
            return Err(e);
        }

        let logged_out = {
            let mut inner = self.inner.lock().await;
            if inner.epoch == epoch {
                inner.view.state = SessionState::LoggedIn(tokens);
                inner.view.loading = false;
                false
            } else {
                true
            }
        };

        if logged_out {
            // The logout may have cleared the store before the save landed.
            tracing::debug!("clearing tokens saved across a logout");
            return self.store.clear().await;
        }

        self.refresh_playlists().await;
        Ok(())
    }

    /// Authorize URL to navigate to for login.
    pub fn login_url(&self) -> Result<String, ClientError> {
        let (Some(client_id), Some(redirect_uri)) =
            (&self.login.client_id, &self.login.redirect_uri)
        else {
            return Err(ClientError::Configuration(
                "Spotify client id or redirect URI not set".to_string(),
            ));
        };

        utils::build_authorize_url(&self.login.auth_url, client_id, redirect_uri)
            .map_err(|e| ClientError::Configuration(format!("Invalid authorize URL: {e}")))
    }

    /// Clears the persisted pair and resets the view.
    ///
    /// The view is reset before the store is touched, and any fetch still in
    /// flight is invalidated.
    pub async fn logout(&self) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.epoch += 1;
            inner.view = SessionView::default();
        }

        self.store.clear().await
    }

    /// Fetches the logged-in user's playlists. Does nothing when logged out.
    pub async fn refresh_playlists(&self) {
        let (ticket, access_token) = {
            let mut inner = self.inner.lock().await;
            let Some(tokens) = inner.view.state.tokens() else {
                return;
            };
            let access_token = tokens.access_token.clone();
            (inner.begin(), access_token)
        };

        let result = self.backend.user_playlists(&access_token).await;

        let mut inner = self.inner.lock().await;
        if !inner.is_current(ticket) {
            tracing::debug!("discarding superseded playlists fetch");
            return;
        }
        inner.view.loading = false;
        match result {
            Ok(playlists) => inner.view.playlists = Some(playlists),
            Err(e) => inner.view.error = Some(e.to_string()),
        }
    }

    /// Imports the tracks of a public playlist by URL.
    pub async fn import_playlist(&self, playlist_url: &str) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.view.tracks = None;
            inner.begin()
        };

        let result = self.backend.playlist_tracks(playlist_url).await;

        let mut inner = self.inner.lock().await;
        if !inner.is_current(ticket) {
            tracing::debug!("discarding superseded track import");
            return;
        }
        inner.view.loading = false;
        match result {
            Ok(tracks) => inner.view.tracks = Some(tracks),
            Err(e) => inner.view.error = Some(e.to_string()),
        }
    }

    pub async fn view(&self) -> SessionView {
        self.inner.lock().await.view.clone()
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.view.state.clone()
    }

    /// The current URL with any consumed redirect parameters removed.
    pub async fn current_url(&self) -> Option<String> {
        self.inner.lock().await.current_url.clone()
    }
}
