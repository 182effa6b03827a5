// Components module - reusable UI building blocks
//
// Shell components are rendered on every frame:
// - Title bar: app name and detection status indicator
// - Status bar: uptime, backend, retries, key hints
// - Logs panel: system log entries (toggled with 'l')
//
// Dashboard components render the controller's view model:
// - Stream panel, stat cards, control buttons, toasts

pub mod control_button;
pub mod formatters;
pub mod logs_panel;
pub mod stat_card;
pub mod status_bar;
pub mod stream_panel;
pub mod title_bar;
pub mod toast;
