use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tokio::sync::mpsc;

use nado_terminal::api::types::{CloseRequest, TradeRequest};
use nado_terminal::api::NadoRestClient;
use nado_terminal::config::Config;
use nado_terminal::event::{AppEvent, NoticeKind};
use nado_terminal::gateway;
use nado_terminal::input::{parse_main_command, parse_size_edit_command, SizeEditCommand, UiCommand};
use nado_terminal::model::account::Network;
use nado_terminal::model::position::PositionSide;
use nado_terminal::state::{AppState, Tab};
use nado_terminal::sync::{self, RefreshTask, Scheduler};
use nado_terminal::ui::{self, theme::Theme};

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure .env file exists with NADO_IDENTITY_TOKEN");
            std::process::exit(1);
        }
    };

    // Log to file so tracing output doesn't interfere with the TUI.
    let log_file = std::fs::File::create("nado-terminal.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(base_url = %config.service.base_url, "Starting nado-terminal");

    let api = Arc::new(NadoRestClient::new(
        &config.service.base_url,
        &config.service.identity_token,
        Duration::from_secs(config.service.request_timeout_secs),
    )?);

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);

    // Startup: instrument catalog first (with the hardcoded fallback),
    // then identity, then the dashboard data the first render needs.
    let catalog = sync::catalog_or_default(api.get_products().await);
    tracing::info!(products = catalog.len(), "Instrument catalog ready");

    let mut app_state = AppState::new(catalog, Duration::from_millis(config.ui.notice_ttl_ms));
    let theme = Theme::from_config(&config.theme);

    match api.get_identity().await {
        Ok(resp) => {
            let (identity, recovery_phrase) = resp.into_identity();
            tracing::info!(
                user = %identity.user_ref,
                network = %identity.network,
                is_new = identity.is_new,
                "Identity resolved"
            );
            app_state.set_identity(identity);
            app_state.recovery_phrase = recovery_phrase;
        }
        Err(e) => {
            tracing::error!(error = %e, "Identity fetch failed");
            app_state.push_notice("Failed to initialize account", NoticeKind::Error);
        }
    }

    sync::spawn_tab_refresh(&api, &app_tx, Tab::Dashboard);

    let mut scheduler = Scheduler::new(api.clone(), app_tx.clone());
    scheduler.start(
        RefreshTask::Prices,
        Duration::from_secs(config.sync.price_refresh_secs),
    );
    scheduler.start(
        RefreshTask::Positions,
        Duration::from_secs(config.sync.position_refresh_secs),
    );

    let mut terminal = ratatui::init();
    let cooldown = Duration::from_millis(config.sync.trade_cooldown_ms);

    loop {
        terminal.draw(|frame| ui::render(frame, &app_state, &theme))?;

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if app_state.recovery_phrase.is_some() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                        // Dismissal discards the phrase; it is never shown again.
                        app_state.recovery_phrase = None;
                    }
                    continue;
                }
                if app_state.selection.editing_size {
                    if let Some(cmd) = parse_size_edit_command(&key.code) {
                        handle_size_edit(cmd, &mut app_state);
                    }
                    continue;
                }
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                    tracing::info!("User quit");
                    break;
                }
                if let Some(cmd) = parse_main_command(&key.code, app_state.active_tab) {
                    handle_command(cmd, &mut app_state, &api, &app_tx);
                }
            }
        }

        // Drain events from channel
        while let Ok(event) = app_rx.try_recv() {
            handle_event(event, &mut app_state, &api, &app_tx, cooldown);
        }
    }

    scheduler.stop_all();
    ratatui::restore();
    tracing::info!("Shutdown complete");
    Ok(())
}

fn handle_command(
    cmd: UiCommand,
    state: &mut AppState,
    api: &Arc<NadoRestClient>,
    tx: &mpsc::Sender<AppEvent>,
) {
    match cmd {
        UiCommand::SwitchTab(tab) => activate_tab(tab, state, api, tx),
        UiCommand::NextTab => activate_tab(state.active_tab.next(), state, api, tx),
        UiCommand::ProductPrev => state.cycle_product(-1),
        UiCommand::ProductNext => state.cycle_product(1),
        UiCommand::DirectionLong => state.selection.direction = PositionSide::Long,
        UiCommand::DirectionShort => state.selection.direction = PositionSide::Short,
        UiCommand::LeverageUp => state.adjust_leverage(1),
        UiCommand::LeverageDown => state.adjust_leverage(-1),
        UiCommand::SizeStepUp => state.adjust_size(1),
        UiCommand::SizeStepDown => state.adjust_size(-1),
        UiCommand::EditSize => state.selection.editing_size = true,
        UiCommand::SubmitTrade => submit_trade(state, api, tx),
        UiCommand::PositionUp => state.select_position(-1),
        UiCommand::PositionDown => state.select_position(1),
        UiCommand::CloseSelected => {
            if state.close_busy {
                return;
            }
            if let Some(pos) = state.positions.get(state.selected_position) {
                state.close_busy = true;
                gateway::spawn_close(
                    api.clone(),
                    tx.clone(),
                    CloseRequest::one(pos.base_symbol()),
                );
            }
        }
        UiCommand::CloseAll => {
            if state.close_busy || state.positions.is_empty() {
                return;
            }
            state.close_busy = true;
            gateway::spawn_close(api.clone(), tx.clone(), CloseRequest::all());
        }
        UiCommand::ToggleNetwork => {
            if state.network_busy {
                return;
            }
            let current = state
                .identity
                .as_ref()
                .map(|id| id.network)
                .or_else(|| state.wallet.as_ref().map(|w| w.network));
            let Some(current) = current else {
                return;
            };
            let target = match current {
                Network::Testnet => Network::Mainnet,
                Network::Mainnet => Network::Testnet,
            };
            state.network_busy = true;
            gateway::spawn_network_switch(api.clone(), tx.clone(), target);
        }
    }
}

/// Tab activation refreshes the tab's required data immediately,
/// independent of the periodic timers.
fn activate_tab(tab: Tab, state: &mut AppState, api: &Arc<NadoRestClient>, tx: &mpsc::Sender<AppEvent>) {
    if state.active_tab == tab {
        return;
    }
    state.active_tab = tab;
    state.selection.editing_size = false;
    sync::spawn_tab_refresh(api, tx, tab);
}

fn submit_trade(state: &mut AppState, api: &Arc<NadoRestClient>, tx: &mpsc::Sender<AppEvent>) {
    // Rejected locally while a submission is in flight or cooling down;
    // no request leaves the client.
    if !state.trade_guard.is_idle() {
        state.push_notice("Order already in flight", NoticeKind::Error);
        return;
    }
    let size = match gateway::validate_size(&state.selection.size_input) {
        Ok(size) => size,
        Err(e) => {
            state.push_notice(e.user_reason(), NoticeKind::Error);
            return;
        }
    };
    if state.trade_guard.try_begin().is_err() {
        return;
    }
    let request = TradeRequest::market(
        &state.selection.product,
        size,
        state.selection.direction,
        state.selection.leverage,
    );
    gateway::spawn_trade(api.clone(), tx.clone(), request);
}

fn handle_size_edit(cmd: SizeEditCommand, state: &mut AppState) {
    let input = &mut state.selection.size_input;
    match cmd {
        SizeEditCommand::Digit(c) => {
            if input.len() < 12 {
                input.push(c);
            }
        }
        SizeEditCommand::Dot => {
            if !input.contains('.') && input.len() < 12 {
                input.push('.');
            }
        }
        SizeEditCommand::Backspace => {
            input.pop();
        }
        SizeEditCommand::Done => {
            state.selection.editing_size = false;
        }
    }
}

/// Apply a settled async operation to the store and trigger the targeted
/// re-synchronization it calls for. All store writes happen here, on the
/// event loop.
fn handle_event(
    event: AppEvent,
    state: &mut AppState,
    api: &Arc<NadoRestClient>,
    tx: &mpsc::Sender<AppEvent>,
    cooldown: Duration,
) {
    use nado_terminal::event::RefreshScope;
    use nado_terminal::sync::{spawn_fetch, FetchKind};

    match &event {
        AppEvent::TradeSettled { success, .. } => {
            // The guard stays taken for one cool-down after settlement,
            // success or failure.
            gateway::spawn_cooldown(tx.clone(), cooldown);
            if *success {
                // Three independent fetches, not sequential dependencies.
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Prices, RefreshScope::Background);
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Positions, RefreshScope::Background);
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Balance, RefreshScope::Background);
            }
        }
        AppEvent::CloseSettled { success, .. } => {
            if *success {
                // Closing does not move quotes, so prices are not refetched.
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Positions, RefreshScope::Foreground);
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Balance, RefreshScope::Background);
            }
        }
        AppEvent::NetworkSwitched { success, .. } => {
            if *success {
                // All three reads are scoped to the new network.
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Wallet, RefreshScope::Foreground);
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Balance, RefreshScope::Background);
                spawn_fetch(api.clone(), tx.clone(), FetchKind::Prices, RefreshScope::Background);
            }
        }
        _ => {}
    }

    state.apply(event);
}
