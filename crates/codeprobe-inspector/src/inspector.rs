//! Inspector lifecycle and page observation.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::cdp::js_protocol::runtime::{
    ConsoleApiCalledType, EnableParams, EventConsoleApiCalled, EventExceptionThrown,
    ExceptionDetails, RemoteObject,
};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use codeprobe_core::config::InspectorConfig;
use codeprobe_core::{CodeprobeError, Result};

use crate::record::JsError;

/// Re-emits unhandled promise rejections as console errors so they flow
/// through the console-error listener instead of a separate channel.
const REJECTION_HOOK_JS: &str = r#"
window.addEventListener('unhandledrejection', event => {
    console.error('Unhandled promise rejection:', event.reason);
});
"#;

enum State {
    Uninitialized,
    Started {
        browser: Browser,
        handler_task: JoinHandle<()>,
    },
    Closed,
}

/// Drives a headless Chromium to collect JavaScript errors from local HTML
/// files.
///
/// One browser process is shared across sequential `inspect_file` calls;
/// each call opens a fresh page and tears it down on every exit path. After
/// `close` the inspector is terminal and rejects further inspections.
pub struct Inspector {
    config: InspectorConfig,
    state: State,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            config,
            state: State::Uninitialized,
        }
    }

    /// Launch the browser process. No-op when already started.
    pub async fn start(&mut self) -> Result<()> {
        match self.state {
            State::Started { .. } => return Ok(()),
            State::Closed => return Err(CodeprobeError::InspectorClosed),
            State::Uninitialized => {}
        }

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if !self.config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.config.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(CodeprobeError::Browser)?;

        info!("launching headless browser");
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CodeprobeError::Browser(e.to_string()))?;

        // The handler task pumps CDP messages until the connection closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    debug!("CDP handler loop ended");
                    break;
                }
            }
        });

        self.state = State::Started {
            browser,
            handler_task,
        };
        Ok(())
    }

    /// Load `path` in a fresh page and return every JavaScript error
    /// observed before the quiet window elapses.
    ///
    /// The returned list is a fresh value per call; nothing is accumulated
    /// on the inspector between runs. Page-level failures (console errors,
    /// uncaught exceptions, navigation timeouts) are collected as records,
    /// never surfaced as call failures.
    pub async fn inspect_file(&mut self, path: &Path) -> Result<Vec<JsError>> {
        if !path.exists() {
            return Err(CodeprobeError::FileNotFound(path.to_path_buf()));
        }

        if matches!(self.state, State::Uninitialized) {
            self.start().await?;
        }
        let browser = match &self.state {
            State::Started { browser, .. } => browser,
            _ => return Err(CodeprobeError::InspectorClosed),
        };

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CodeprobeError::Browser(e.to_string()))?;

        let result = observe(&self.config, &page, path).await;

        if let Err(e) = page.close().await {
            warn!(error = %e, "page close failed");
        }

        result
    }

    /// Shut the browser down. Terminal: further inspections are rejected.
    pub async fn close(&mut self) -> Result<()> {
        if let State::Started {
            mut browser,
            handler_task,
        } = std::mem::replace(&mut self.state, State::Closed)
        {
            if let Err(e) = browser.close().await {
                warn!(error = %e, "browser close failed");
            }
            handler_task.abort();
        }
        Ok(())
    }
}

/// Attach listeners, navigate, wait out the quiet window, and collect.
async fn observe(config: &InspectorConfig, page: &Page, path: &Path) -> Result<Vec<JsError>> {
    let source_url = path.display().to_string();
    let errors: Arc<Mutex<Vec<JsError>>> = Arc::new(Mutex::new(Vec::new()));

    // Console and exception events only flow once the Runtime domain is on.
    page.execute(EnableParams::default())
        .await
        .map_err(|e| CodeprobeError::Browser(e.to_string()))?;

    // Installed before navigation so the hook exists in the inspected
    // document, not just the initial blank one.
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
        REJECTION_HOOK_JS,
    ))
    .await
    .map_err(|e| CodeprobeError::Browser(e.to_string()))?;

    let mut console_events = page
        .event_listener::<EventConsoleApiCalled>()
        .await
        .map_err(|e| CodeprobeError::Browser(e.to_string()))?;
    let mut exception_events = page
        .event_listener::<EventExceptionThrown>()
        .await
        .map_err(|e| CodeprobeError::Browser(e.to_string()))?;

    let console_task = tokio::spawn({
        let errors = errors.clone();
        let source_url = source_url.clone();
        async move {
            while let Some(event) = console_events.next().await {
                if matches!(event.r#type, ConsoleApiCalledType::Error) {
                    let message = console_message(&event.args);
                    debug!(%message, "console error");
                    errors
                        .lock()
                        .await
                        .push(JsError::console_error(message, source_url.clone()));
                }
            }
        }
    });

    let exception_task = tokio::spawn({
        let errors = errors.clone();
        let source_url = source_url.clone();
        async move {
            while let Some(event) = exception_events.next().await {
                let (message, stack) = exception_parts(&event.exception_details);
                debug!(%message, "uncaught exception");
                errors
                    .lock()
                    .await
                    .push(JsError::page_error(message, stack, source_url.clone()));
            }
        }
    });

    let file_url = file_url(path)?;
    info!(url = %file_url, "inspecting");

    let navigation = tokio::time::timeout(
        Duration::from_millis(config.timeout_ms),
        page.goto(file_url.as_str()),
    )
    .await;
    match navigation {
        Ok(Ok(_)) => {
            // Quiet window: let deferred and async script errors surface.
            tokio::time::sleep(Duration::from_millis(config.quiet_wait_ms)).await;
        }
        Ok(Err(e)) => {
            warn!(error = %e, "navigation failed");
            errors
                .lock()
                .await
                .push(JsError::load_failure(e.to_string(), source_url.clone()));
        }
        Err(_) => {
            warn!(timeout_ms = config.timeout_ms, "navigation timed out");
            errors.lock().await.push(JsError::load_failure(
                format!("navigation timed out after {}ms", config.timeout_ms),
                source_url.clone(),
            ));
        }
    }

    console_task.abort();
    exception_task.abort();

    let collected = std::mem::take(&mut *errors.lock().await);
    Ok(collected)
}

/// File-scheme URL for a local path. Canonicalizes first so relative paths
/// and `..` components never end up in the URL authority.
fn file_url(path: &Path) -> Result<String> {
    let canonical = path.canonicalize()?;
    Ok(format!("file://{}", canonical.display()))
}

/// Message and stack text for an uncaught exception. Chromium puts the full
/// `Error: msg\n    at ...` text in the exception description; the first
/// line doubles as the exception's string form.
fn exception_parts(details: &ExceptionDetails) -> (String, String) {
    if let Some(description) = details
        .exception
        .as_ref()
        .and_then(|e| e.description.as_deref())
    {
        let message = description.lines().next().unwrap_or(description);
        return (message.to_string(), description.to_string());
    }
    (details.text.clone(), String::new())
}

/// Flatten console arguments into one message string.
fn console_message(args: &[RemoteObject]) -> String {
    args.iter()
        .map(|arg| remote_object_text(arg.value.as_ref(), arg.description.as_deref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human-readable text for a remote object: plain strings verbatim, other
/// primitives via JSON, objects via their description.
fn remote_object_text(value: Option<&serde_json::Value>, description: Option<&str>) -> String {
    if let Some(value) = value {
        return match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }
    description.unwrap_or_default().to_string()
}
