//! Terminal output. Results go to stdout, toasts to stderr.

use std::io::{self, Write};

use serde::Serialize;

use crate::application::services::ToastStore;
use crate::domain::entities::{Page, Toast, ToastKind};

/// Prints a value as pretty JSON.
///
/// # Errors
/// Returns error if stdout cannot be written.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)
}

/// Prints a page of records followed by a position summary on stderr.
///
/// # Errors
/// Returns error if stdout cannot be written.
pub fn print_page<T: Serialize>(page: &Page<T>) -> io::Result<()> {
    print_json(&page.data)?;
    eprintln!("{}", page_summary(page));
    Ok(())
}

fn page_summary<T>(page: &Page<T>) -> String {
    if page.is_empty() {
        return "no results".to_string();
    }
    format!(
        "page {}/{} ({} total)",
        page.page, page.total_pages, page.total
    )
}

fn format_toast(toast: &Toast) -> String {
    let marker = match toast.kind {
        ToastKind::Success => "ok",
        ToastKind::Error => "error",
        ToastKind::Warning => "warning",
        ToastKind::Info => "info",
    };
    match &toast.message {
        Some(message) => format!("[{marker}] {}: {message}", toast.title),
        None => format!("[{marker}] {}", toast.title),
    }
}

/// Writes pending toasts to stderr and dismisses them.
pub fn flush_toasts(toasts: &ToastStore) {
    for toast in toasts.toasts() {
        eprintln!("{}", format_toast(&toast));
        toasts.remove(toast.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DEFAULT_TOAST_DURATION_MS, Pagination, ToastRequest};

    #[test]
    fn test_toast_lines() {
        let with_message = Toast::from_request(
            ToastRequest::new(ToastKind::Error, "Login failed").with_message("Invalid password"),
            DEFAULT_TOAST_DURATION_MS,
        );
        let bare = Toast::from_request(
            ToastRequest::new(ToastKind::Success, "Signed out"),
            DEFAULT_TOAST_DURATION_MS,
        );

        assert_eq!(format_toast(&with_message), "[error] Login failed: Invalid password");
        assert_eq!(format_toast(&bare), "[ok] Signed out");
    }

    #[test]
    fn test_page_summary() {
        let page = Page::from_parts(
            vec![1, 2],
            Some(Pagination {
                total: 12,
                page: 2,
                limit: 2,
                total_pages: 6,
            }),
        );
        assert_eq!(page_summary(&page), "page 2/6 (12 total)");
        assert_eq!(page_summary(&Page::<u8>::empty()), "no results");
    }

    #[test]
    fn test_flush_dismisses() {
        let toasts = ToastStore::default();
        toasts.info("Saved", None);

        flush_toasts(&toasts);

        assert!(toasts.is_empty());
    }
}
