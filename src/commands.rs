//! Tauri Commands Module
//!
//! IPC commands exposed to the webview. Errors are returned as the message
//! the frontend shows in its notification toast.

use serde::Serialize;
use tauri::{command, AppHandle, State, WebviewWindow};
use tracing::{error, info};

use crate::auth::RegisterForm;
use crate::pages::budget::{self, BudgetForm, BudgetPageData};
use crate::pages::dashboard::{self, DashboardView};
use crate::pages::layout::{self, Theme};
use crate::pages::reports::{self, ExportFormat};
use crate::pages::savings::{self, ContributionForm, GoalProgress, SavingGoalForm};
use crate::pages::transactions::{self, TransactionFilters, TransactionForm, TransactionType};
use crate::pages::Record;
use crate::router::{nav_links, GuardOutcome, NavLink, Navigator, Route};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub route: Route,
}

// Session and navigation

#[command]
pub fn get_session(state: State<'_, AppState>) -> SessionStatus {
    SessionStatus {
        authenticated: state.session.is_authenticated(),
        route: state.router.current(),
    }
}

#[command]
pub fn visit(path: String, state: State<'_, AppState>) -> GuardOutcome {
    state.router.visit(&path, &state.session.snapshot())
}

#[command]
pub fn get_nav_links() -> Vec<NavLink> {
    nav_links()
}

#[command]
pub async fn login(
    email: String,
    password: String,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state.auth.login(&email, &password).await.map_err(|e| {
        error!("Login failed: {}", e);
        e.user_message("Login failed")
    })
}

#[command]
pub async fn register(form: RegisterForm, state: State<'_, AppState>) -> Result<(), String> {
    match state.auth.register(&form).await {
        Ok(()) => {
            state.router.navigate(Route::Login);
            Ok(())
        }
        Err(e) => {
            error!("Registration failed: {}", e);
            Err(e.user_message("Registration failed"))
        }
    }
}

#[command]
pub async fn logout(state: State<'_, AppState>) -> Result<(), String> {
    state.auth.logout().await.map_err(|e| e.to_string())
}

// Layout

#[command]
pub fn get_theme(state: State<'_, AppState>) -> Theme {
    layout::load_theme(&state.storage)
}

#[command]
pub fn toggle_theme(state: State<'_, AppState>) -> Result<Theme, String> {
    layout::toggle_theme(&state.storage).map_err(|e| e.to_string())
}

// Dashboard

#[command]
pub async fn load_dashboard(state: State<'_, AppState>) -> Result<DashboardView, String> {
    dashboard::load_dashboard(&state.api)
        .await
        .map_err(|e| e.user_message("Could not load dashboard"))
}

// Transactions

#[command]
pub async fn list_transactions(
    filters: TransactionFilters,
    state: State<'_, AppState>,
) -> Result<Vec<Record>, String> {
    transactions::list_transactions(&state.api, &filters)
        .await
        .map_err(|e| e.user_message("Could not load transactions"))
}

#[command]
pub async fn save_transaction(
    editing_id: Option<String>,
    form: TransactionForm,
    state: State<'_, AppState>,
) -> Result<Record, String> {
    transactions::save_transaction(&state.api, editing_id.as_deref(), &form)
        .await
        .map_err(|e| e.user_message("Unable to save transaction"))
}

#[command]
pub async fn delete_transaction(id: String, state: State<'_, AppState>) -> Result<(), String> {
    transactions::delete_transaction(&state.api, &id)
        .await
        .map_err(|e| e.user_message("Unable to delete transaction"))
}

#[command]
pub async fn list_categories(state: State<'_, AppState>) -> Result<Vec<Record>, String> {
    transactions::list_categories(&state.api)
        .await
        .map_err(|e| e.user_message("Could not load categories"))
}

#[command]
pub async fn create_category(
    name: String,
    category_type: TransactionType,
    state: State<'_, AppState>,
) -> Result<Option<Record>, String> {
    transactions::create_category(&state.api, &name, category_type)
        .await
        .map_err(|e| e.user_message("Could not create category"))
}

// Savings

#[command]
pub async fn list_goals(state: State<'_, AppState>) -> Result<Vec<GoalProgress>, String> {
    savings::load_goal_progress(&state.api)
        .await
        .map_err(|e| e.user_message("Could not load goals"))
}

#[command]
pub async fn create_goal(form: SavingGoalForm, state: State<'_, AppState>) -> Result<Record, String> {
    savings::create_goal(&state.api, &form)
        .await
        .map_err(|e| e.user_message("Could not create goal"))
}

#[command]
pub async fn add_contribution(
    form: ContributionForm,
    state: State<'_, AppState>,
) -> Result<Record, String> {
    savings::add_contribution(&state.api, &form)
        .await
        .map_err(|e| e.user_message("Could not add contribution"))
}

// Budget

#[command]
pub async fn load_budget_page(state: State<'_, AppState>) -> Result<BudgetPageData, String> {
    budget::load_budget_page(&state.api)
        .await
        .map_err(|e| e.user_message("Could not load budgets"))
}

#[command]
pub async fn save_budget(form: BudgetForm, state: State<'_, AppState>) -> Result<Record, String> {
    budget::save_budget(&state.api, &form)
        .await
        .map_err(|e| e.user_message("Could not save budget"))
}

// Reports

/// Save an export to the user's download directory and return its path
#[command]
pub async fn download_report(
    format: ExportFormat,
    state: State<'_, AppState>,
) -> Result<String, String> {
    let target_dir = dirs::download_dir().unwrap_or_else(|| state.config.data_dir.join("exports"));

    let path = reports::download_report(&state.api, format, &target_dir)
        .await
        .map_err(|e| {
            error!("Download failed: {}", e);
            e.user_message("Download failed")
        })?;

    info!("Report downloaded: {}", path.display());
    Ok(path.display().to_string())
}

// Window

#[command]
pub fn minimize_window(window: WebviewWindow) {
    let _ = window.minimize();
}

#[command]
pub fn close_window(app: AppHandle) {
    app.exit(0);
}
