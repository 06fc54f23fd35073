pub mod config;
pub mod controller;
pub mod error;
pub mod notify;
pub mod table;

pub use config::{load_settings, ClientSettings};
pub use controller::{Completed, KinematicController};
pub use error::{FormError, SettingsError, TableError};
pub use notify::{notice_for, Notice, Notifier, Operation, Severity, TracingNotifier};
pub use table::{MissingRemoteTable, PostgrestTable, RemoteTable};
