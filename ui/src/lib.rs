//! Shared UI crate for Pulseboard: data table, chart controller, views.

pub mod charts;
pub mod core;
pub mod data;
pub mod export;
pub mod i18n;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;

    pub mod notifications;
    pub use notifications::{NotificationTray, Notifications, Toast, ToastKind};

    // Context providers and page-wide shortcuts (components/shell.rs)
    pub mod shell;
    pub use shell::{DashboardContext, DashboardShell};
}
