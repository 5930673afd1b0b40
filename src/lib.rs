pub mod auth;
pub mod booking;
pub mod config;
pub mod directory;
pub mod logging;

pub use auth::{AuthState, Navigation, Role, Session, SessionManager};

use std::sync::Arc;
use tokio::sync::mpsc;

use auth::store::TokenStore;
use booking::BookingWizard;
use config::Config;
use directory::{DirectoryProvider, MockDirectory};

/// Size of the navigation signal buffer; auth operations never block on it.
const NAVIGATION_BUFFER: usize = 16;

/// Shared application state handed to the view tree.
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub directory: Arc<dyn DirectoryProvider>,
}

impl AppState {
    /// Build the application state with the built-in mock directory.
    /// Returns the receiver draining navigation side effects for the
    /// client-side router.
    pub fn new(
        config: Config,
        token_store: Arc<dyn TokenStore>,
    ) -> (Self, mpsc::Receiver<Navigation>) {
        let directory: Arc<dyn DirectoryProvider> =
            Arc::new(MockDirectory::new(config.directory.clone()));
        Self::with_directory(config, token_store, directory)
    }

    /// Build the application state with an explicit directory provider.
    pub fn with_directory(
        config: Config,
        token_store: Arc<dyn TokenStore>,
        directory: Arc<dyn DirectoryProvider>,
    ) -> (Self, mpsc::Receiver<Navigation>) {
        let (nav_tx, nav_rx) = mpsc::channel(NAVIGATION_BUFFER);
        let session = Arc::new(SessionManager::new(
            config.auth.clone(),
            token_store,
            nav_tx,
        ));
        (
            Self {
                config,
                session,
                directory,
            },
            nav_rx,
        )
    }

    /// A fresh booking wizard backed by this state's directory.
    pub fn booking_wizard(&self) -> BookingWizard {
        BookingWizard::new(self.directory.clone())
    }
}
