pub mod app;
pub mod error_modal;
pub mod form_screen;
pub mod message_overlay;
pub mod modal;
pub mod notice_modal;
pub mod prompts;
pub mod settings_modal;

pub use app::MsnapApp;
