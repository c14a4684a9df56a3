//! Smart Ledger Desktop - Main Entry Point
//!
//! Desktop shell for the Smart Ledger personal-finance client.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tauri::{Emitter, Manager};
use tracing::info;

use smart_ledger_lib::{commands, config::AppConfig, logging, router::Router, AppState};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let _log_guard = logging::init(&config)?;
    info!("Smart Ledger Desktop starting, backend at {}", config.base_url);

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .invoke_handler(tauri::generate_handler![
            commands::get_session,
            commands::visit,
            commands::get_nav_links,
            commands::login,
            commands::register,
            commands::logout,
            commands::get_theme,
            commands::toggle_theme,
            commands::load_dashboard,
            commands::list_transactions,
            commands::save_transaction,
            commands::delete_transaction,
            commands::list_categories,
            commands::create_category,
            commands::list_goals,
            commands::create_goal,
            commands::add_contribution,
            commands::load_budget_page,
            commands::save_budget,
            commands::download_report,
            commands::minimize_window,
            commands::close_window,
        ])
        .setup(move |app| {
            let handle = app.handle().clone();
            let router = Router::with_listener(move |route| {
                let _ = handle.emit("navigate", route.path());
            });

            let state = AppState::bootstrap(config, router)?;
            let outcome = state.router.visit("/", &state.session.snapshot());
            info!("Initial route: {}", outcome.route().path());

            app.manage(state);
            Ok(())
        })
        .run(tauri::generate_context!())?;

    Ok(())
}
