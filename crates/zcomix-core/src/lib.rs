//! Page runtime and widgets for the zcomix reader
//!
//! A [`PageRuntime`] owns a document behind the [`Dom`] adapter, a handler
//! table keyed by (node, event kind) and a virtual-clock scheduler for the
//! widgets' delayed start-up work.

pub mod dom;
pub mod error;
pub mod events;
pub mod runtime;
pub mod scheduler;
pub mod widgets;

pub use dom::{Display, Dom, Element, ImageSize, NodeId, Page};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use events::{DispatchOutcome, Effect, Event, EventKind, KEY_ENTER};
pub use runtime::{PageRuntime, Widget};
pub use scheduler::{Scheduler, TaskHandle};
pub use widgets::install_page_widgets;
