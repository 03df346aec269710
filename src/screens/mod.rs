//! Per-collection screens.
//!
//! Each screen composes the generic pieces the same way: one
//! [`crate::list::RemoteListController`] per collection, an
//! [`crate::action::ActionDispatcher`] behind the row buttons, an
//! [`crate::overlay::OverlayState`] gating its dialogs, and — where the
//! screen has a picker — a [`crate::search::DebouncedSearchResolver`].
//! Screens own their state exclusively; nothing is shared across them
//! except the HTTP client.

pub mod admins;
pub mod campaigns;
pub mod reports;
pub mod withdrawals;

pub use admins::{AdminRole, AdminStatus, AdminUser, AdminsScreen};
pub use campaigns::{Campaign, CampaignDraft, CampaignStatus, CampaignsScreen};
pub use reports::{PlayerPerformanceRow, ProviderPerformanceRow, ReportsScreen};
pub use withdrawals::{Withdrawal, WithdrawalStatus, WithdrawalsScreen};
