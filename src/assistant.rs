//! Opening the external AI assistant from the Help page.
//!
//! The page does not broadcast anything; the host hands it an
//! [`AssistantLauncher`] and the page calls it once per click.
//!
//! ```rust
//! use std::sync::mpsc;
//! use loancalc::assistant::{AssistantRequest, HelpPage};
//!
//! let (tx, rx) = mpsc::channel();
//! let page = HelpPage::new(tx);
//! page.open_assistant().unwrap();
//! assert_eq!(rx.try_recv(), Ok(AssistantRequest));
//! ```

use std::{fmt, sync::mpsc};

use log::debug;
use thiserror::Error;

/// A request to show the assistant. Carries no data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct AssistantRequest;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("The assistant is not available")]
    Disconnected,
    #[error("The assistant could not be opened: {0}")]
    Failed(String),
}

pub trait AssistantLauncher {
    fn launch(&self) -> Result<(), AssistantError>;
}

impl AssistantLauncher for mpsc::Sender<AssistantRequest> {
    fn launch(&self) -> Result<(), AssistantError> {
        self.send(AssistantRequest)
            .map_err(|_| AssistantError::Disconnected)
    }
}

impl AssistantLauncher for mpsc::SyncSender<AssistantRequest> {
    fn launch(&self) -> Result<(), AssistantError> {
        self.try_send(AssistantRequest).map_err(|err| match err {
            mpsc::TrySendError::Full(_) => {
                AssistantError::Failed("a request is already pending".to_string())
            }
            mpsc::TrySendError::Disconnected(_) => AssistantError::Disconnected,
        })
    }
}

impl<L: AssistantLauncher + ?Sized> AssistantLauncher for &L {
    fn launch(&self) -> Result<(), AssistantError> {
        (**self).launch()
    }
}

/// Adapts a closure into a launcher.
pub struct CallbackLauncher<F> {
    callback: F,
}

impl<F> CallbackLauncher<F>
where
    F: Fn(AssistantRequest) -> Result<(), AssistantError>,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> AssistantLauncher for CallbackLauncher<F>
where
    F: Fn(AssistantRequest) -> Result<(), AssistantError>,
{
    fn launch(&self) -> Result<(), AssistantError> {
        (self.callback)(AssistantRequest)
    }
}

impl<F> fmt::Debug for CallbackLauncher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackLauncher").finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct HelpPage<L> {
    launcher: L,
}

impl<L: AssistantLauncher> HelpPage<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    /// Sends exactly one request to the assistant.
    pub fn open_assistant(&self) -> Result<(), AssistantError> {
        debug!("Requesting the AI assistant");
        self.launcher.launch()
    }
}
