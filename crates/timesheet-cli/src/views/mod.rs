//! Screen-level view models. Each view owns its own state and talks to the
//! API and the notification center directly; the shell only routes input.

pub mod attachments;
pub mod busy;
pub mod dashboard;
pub mod form;
pub mod invoice;
pub mod login;

pub use attachments::AttachmentsView;
pub use busy::{BusyFlag, BusyGuard};
pub use dashboard::DashboardView;
pub use form::FormView;
pub use invoice::InvoiceView;
pub use login::LoginView;
