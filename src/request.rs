use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "Notification";
pub const DEFAULT_MESSAGE: &str = "Here comes the message";
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Invoked at most once, from the thread running the lifecycle, when the user
/// clicks the balloon.
pub type ClickCallback = Box<dyn FnOnce() + Send + 'static>;

/// Everything one toast needs. Moved into the lifecycle that displays it.
pub struct ToastRequest {
    pub title: String,
    pub message: String,
    pub icon_path: Option<PathBuf>,
    /// `None` keeps the toast until the user or the shell dismisses it.
    pub duration: Option<Duration>,
    pub on_click: Option<ClickCallback>,
}

impl ToastRequest {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn icon(mut self, path: impl Into<PathBuf>) -> Self {
        self.icon_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn persist(self) -> Self {
        self.duration(None)
    }

    #[must_use]
    pub fn on_click(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }
}

impl Default for ToastRequest {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            icon_path: None,
            duration: Some(DEFAULT_DURATION),
            on_click: None,
        }
    }
}

impl fmt::Debug for ToastRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastRequest")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("icon_path", &self.icon_path)
            .field("duration", &self.duration)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}
