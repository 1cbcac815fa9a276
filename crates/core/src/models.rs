pub mod event;
pub mod log;
pub mod order;

pub use event::{Attachment, Author, MessageEvent};
pub use log::{Environment, Launcher, LauncherName, LoaderKind, Log, Mod, Version};
pub use order::{Order, Ordered, sort_by_order};
