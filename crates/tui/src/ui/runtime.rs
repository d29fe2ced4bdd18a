//! Runtime: terminal lifecycle and the unified event loop.
//!
//! Responsibilities
//! - Own the terminal (enter/leave alternate screen, raw mode, mouse capture).
//! - Drive one `tokio::select!` loop over terminal input, the animation
//!   ticker, and the active run's event stream.
//! - Apply navigation and run-start effects inline; hand the rest to the
//!   command layer in `cmd`.
//!
//! Input comes from a dedicated producer task that blocks on
//! `crossterm::event::read()` and forwards events over a channel, which keeps
//! `poll()` and `read()` on one thread and makes resize delivery reliable
//! across terminals. The ticker runs fast only while something animates (an
//! executing run or a live notice) and drops to a long idle interval
//! otherwise.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::MouseEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flowtty_engine::{FlowRunHandle, spawn_flow_run};
use flowtty_types::flow::FlowRunRequest;
use flowtty_types::{Effect, Msg};
use flowtty_util::UserPreferences;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};

use crate::app::App;
use crate::cmd;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

/// Spawn a dedicated input task that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// Mouse-move events are throttled to one per 16 ms; everything else is
/// forwarded as is.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_move: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if matches!(event::poll(sixteen_ms), Ok(true)) {
                match event::read() {
                    Ok(event) => {
                        let is_mouse_move =
                            event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move
                            || last_mouse_move.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_move = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            tracing::warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
///
/// Returns a ratatui `Terminal` backed by Crossterm for later drawing.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    main_view: &mut MainView,
) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Translate raw crossterm input into component calls.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, &Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Applies navigation and run-start effects inline and returns whatever is
/// left for the command layer.
fn apply_inline_effects(
    app: &mut App,
    main_view: &mut MainView,
    active_run: &mut Option<FlowRunHandle>,
    effects: Vec<Effect>,
) -> Vec<Effect> {
    let mut deferred = Vec::new();
    for effect in effects {
        match effect {
            Effect::SwitchTo(route) => main_view.set_current_route(app, route),
            Effect::StartRun(request) => start_run(app, active_run, request),
            other => deferred.push(other),
        }
    }
    deferred
}

/// Aborts any in-flight run and spawns the driver for the new request. The
/// run id gate in `App::update` drops whatever the superseded task still
/// manages to emit.
fn start_run(app: &mut App, active_run: &mut Option<FlowRunHandle>, request: FlowRunRequest) {
    if let Some(previous) = active_run.take() {
        previous.abort();
    }
    // The deployment used last becomes the preselected default on the next
    // launch.
    if let Err(error) = app.ctx.preferences.set_default_deployment(Some(request.deployment)) {
        tracing::warn!(%error, "failed to persist deployment preference");
    }
    let handle = spawn_flow_run(request, Arc::clone(&app.ctx.details), app.ctx.timing);
    app.trigger.begin_run(handle.run_id);
    *active_run = Some(handle);
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the input
/// producer, runs the event loop, and restores the terminal on exit.
pub async fn run_app(preferences: UserPreferences) -> Result<()> {
    let mut input_receiver = spawn_input_thread().await;
    let mut main_view = MainView::new();
    let mut app = App::new(preferences);
    main_view.init(&mut app)?;
    let mut terminal = setup_terminal()?;

    let mut active_run: Option<FlowRunHandle> = None;
    let mut effects: Vec<Effect> = Vec::with_capacity(5);

    // Ticking strategy: fast while animating, very slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    // Track the last known terminal size to synthesize Resize messages when
    // a terminal fails to emit them reliably.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let needs_animation =
            app.trigger.is_executing || app.notices.active().is_some() || !effects.is_empty();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            // Periodic animation tick
            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, &Msg::Tick));
                needs_render = needs_animation || !effects.is_empty();
            }

            // Events from the active run's driver
            maybe_run_event = async {
                match active_run.as_mut() {
                    Some(handle) => handle.events.recv().await.map(|event| (handle.run_id, event)),
                    None => None,
                }
            }, if active_run.is_some() => {
                match maybe_run_event {
                    Some((run_id, event)) => {
                        effects.extend(main_view.handle_message(&mut app, &Msg::FlowRun(run_id, event)));
                        needs_render = true;
                    }
                    None => {
                        active_run = None;
                    }
                }
            }

            _ = signal::ctrl_c() => { break; }
        }

        if !effects.is_empty() {
            // Move effects out of their Vec so handlers can queue new ones
            // while the current batch is applied.
            let mut effects_to_process = Vec::with_capacity(effects.len());
            effects_to_process.append(&mut effects);

            let deferred = apply_inline_effects(&mut app, &mut main_view, &mut active_run, effects_to_process);
            let commands = cmd::from_effects(&deferred);
            cmd::run_cmds(commands, &mut app).await;
            needs_render = true;
        }

        if app.should_quit {
            break;
        }

        // Fallback: detect terminal size changes even when no explicit
        // resize event arrives.
        if let Ok((w, h)) = crossterm::terminal::size()
            && last_size != Some((w, h))
        {
            last_size = Some((w, h));
            let _ = app.update(&Msg::Resize(w, h));
            needs_render = true;
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    if let Some(handle) = active_run.take() {
        handle.abort();
    }
    cleanup_terminal(&mut terminal)?;
    Ok(())
}
