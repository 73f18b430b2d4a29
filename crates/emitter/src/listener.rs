use crate::args::Arguments;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Result returned by a listener callback.
pub type ListenerResult = anyhow::Result<()>;

type Callback = dyn Fn(&Arguments) -> ListenerResult + Send + Sync;

/// Shared handle to a listener callback.
///
/// Identity is the handle's allocation: clones of one handle are the same
/// listener, while wrapping the same function twice gives two listeners.
#[derive(Clone)]
pub struct Listener {
    callback: Arc<Callback>,
}

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Arguments) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Wrap a callback that cannot fail.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&Arguments) + Send + Sync + 'static,
    {
        Self::new(move |args| {
            callback(args);
            Ok(())
        })
    }

    pub fn call(&self, args: &Arguments) -> ListenerResult {
        (self.callback)(args)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.callback) as *const ()
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Listener {}

impl Hash for Listener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", self.addr())
    }
}
