//! Toasts
//!
//! Transient messages stacked in a corner of the page, plus the browser
//! implementation of the controllers' `Feedback` port.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use crate::controllers::{Feedback, ToastLevel};

/// How long a toast stays on screen
const TOAST_MILLIS: u32 = 4_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

/// Toast list provided via context
#[derive(Clone, Copy)]
pub struct Toasts {
    pub items: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    /// Show a message; it is dismissed automatically
    pub fn push(&self, level: ToastLevel, message: &str) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.items.update(|items| {
            items.push(Toast { id, level, message: message.to_string() });
        });

        let toasts = *self;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(TOAST_MILLIS).await;
            toasts.dismiss(id);
        });
    }

    pub fn dismiss(&self, id: u64) {
        // The owner may be gone by the time a timer fires
        let _ = self.items.try_update(|items| items.retain(|t| t.id != id));
    }
}

pub fn use_toasts() -> Toasts {
    expect_context::<Toasts>()
}

/// `Feedback` backed by the toast stack and `window.confirm`
#[derive(Clone, Copy)]
pub struct BrowserFeedback(pub Toasts);

impl Feedback for BrowserFeedback {
    fn toast(&self, level: ToastLevel, message: &str) {
        match level {
            ToastLevel::Error | ToastLevel::Warning => warn!("toast: {}", message),
            _ => info!("toast: {}", message),
        }
        self.0.push(level, message);
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|win| win.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
