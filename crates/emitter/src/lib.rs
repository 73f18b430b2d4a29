//! Minimalist synchronous event emitter.
//!
//! ```
//! use emitter::{Arguments, Emitter, Listener};
//!
//! let emitter = Emitter::new();
//! let greet = Listener::infallible(|args| {
//!     println!("hello {}", args.get(0).unwrap());
//! });
//!
//! emitter.on("greet", &greet, false).unwrap();
//! assert!(emitter.emit("greet", Arguments::new().arg("world")).unwrap());
//! ```

mod args;
mod emitter;
mod error;
mod event;
mod listener;
mod registry;

pub use args::Arguments;
pub use emitter::Emitter;
pub use error::{EmitterError, Failure, FailureKind};
pub use event::{EventKey, IntoEvent, ERROR};
pub use listener::{Listener, ListenerResult};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
