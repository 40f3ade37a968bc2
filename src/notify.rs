//! Desktop notifications via `notify-send`.
use crate::exec::Executor;

const APP_NAME: &str = "deskutil";

/// Show a notification. Missing `notify-send` or a failed send is logged
/// at debug level and otherwise ignored.
pub fn send(executor: &dyn Executor, summary: &str, body: &str) {
    if !executor.which("notify-send") {
        tracing::debug!("notify-send not found, skipping notification");
        return;
    }
    let app = format!("--app-name={APP_NAME}");
    match executor.run_unchecked("notify-send", &[&app, summary, body]) {
        Ok(result) if !result.success => {
            tracing::debug!("notify-send failed: {}", result.stderr.trim());
        }
        Err(e) => tracing::debug!("notify-send failed: {e:#}"),
        Ok(_) => {}
    }
}

/// Like [`send`] but replaces the previous notification with the same
/// `tag`, so repeated volume changes show a single bubble.
pub fn send_replacing(executor: &dyn Executor, tag: &str, summary: &str, body: &str) {
    if !executor.which("notify-send") {
        return;
    }
    let app = format!("--app-name={APP_NAME}");
    let hint = format!("--hint=string:x-canonical-private-synchronous:{tag}");
    if let Err(e) = executor.run_unchecked("notify-send", &[&app, &hint, summary, body]) {
        tracing::debug!("notify-send failed: {e:#}");
    }
}
