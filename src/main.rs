#![allow(warnings)]
//! Planning Calendar Frontend Entry Point

mod app;
mod calendar;
mod commands;
mod components;
mod config;
mod context;
mod controllers;
mod datetime;
mod detail;
mod models;
mod store;
mod toast;

use app::{App, ConfigErrorBanner};
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = rolling_logger::init(log::LevelFilter::Debug, rolling_logger::DEFAULT_CAPACITY) {
        web_sys::console::warn_1(&format!("logger already installed: {}", err).into());
    }

    match config::load_page_config() {
        Ok(config) => mount_to_body(move || view! { <App config=config /> }),
        Err(err) => {
            log::error!("page configuration unusable: {}", err);
            let message = err.to_string();
            mount_to_body(move || view! { <ConfigErrorBanner message=message /> })
        }
    }
}
