//! Interactive admin screens.
//!
//! [`state`] holds what is on screen, [`input`] turns key presses into state
//! changes or [`Command`]s, and the runner here executes commands against the
//! backend and redraws.

pub mod input;
pub mod state;
mod ui;

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, CategoryRequest, LessonRequest, VocabularyRequest};
use crate::auth::{AuthEvent, Authenticator, IdentityProvider};
use crate::catalog::sort_by_sequence;
use crate::error::{AdminError, Result};
use crate::terminal::TerminalGuard;

use input::handle_key;
use state::{
    AdminApp, Command, DeleteTarget, EntityForm, FormModal, FormRequest, ListView, Screen,
    SuspendedForm, View, VocabularyView,
};

/// Run the admin screens until the user quits.
///
/// Starts on the dashboard when a stored session could be restored, on the
/// login screen otherwise.
pub async fn run<P: IdentityProvider>(api: &ApiClient, auth: &Authenticator<P>) -> Result<()> {
    let user = auth.restore().await?;
    let mut app = AdminApp::new(user.clone());
    let mut auth_events = auth.state().subscribe();

    let mut terminal = TerminalGuard::enter()?;

    if user.is_some() {
        run_command(&mut terminal, &mut app, api, auth, Command::Open(View::Dashboard)).await?;
    }

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if auth_events.has_changed().unwrap_or(false) {
            let event = *auth_events.borrow_and_update();
            if event == AuthEvent::SignedOut && !matches!(app.screen, Screen::Login { .. }) {
                info!(target: "tui", "Session ended; returning to login");
                app.session_lost(Some("You have been signed out.".to_string()));
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = handle_key(&mut app, key) {
                    run_command(&mut terminal, &mut app, api, auth, command).await?;
                }
            }
        }
    }

    Ok(())
}

/// Show the busy label, run `command`, then clear the label.
async fn run_command<P: IdentityProvider>(
    terminal: &mut TerminalGuard,
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
    command: Command,
) -> Result<()> {
    app.busy = Some(command.busy_label());
    terminal.draw(|frame| ui::render(frame, app))?;
    execute(app, api, auth, command).await;
    app.busy = None;
    Ok(())
}

/// Carry out one command. Failures end up on screen, never as a return value.
pub async fn execute<P: IdentityProvider>(
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
    command: Command,
) {
    debug!(target: "tui", command = command_name(&command), "Executing");
    let result = match command {
        Command::Quit => {
            app.should_quit = true;
            Ok(())
        }
        Command::Login { email, password } => match auth.login(&email, &password).await {
            Ok(user) => {
                info!(target: "tui", user = %user.id, "Signed in");
                app.user = Some(user);
                resume(app, api, auth).await
            }
            Err(e) => {
                warn!(target: "tui", error = %e, "Sign-in failed");
                app.set_login_error(e.user_message());
                Ok(())
            }
        },
        Command::Logout => {
            let result = auth.logout().await;
            app.show_login(None);
            result
        }
        Command::Open(view) => open(app, api, auth, view).await,
        Command::Reload => reload(app, api, auth).await,
        Command::OpenForm(request) => open_form(app, api, auth, request).await,
        Command::SubmitForm => submit(app, api, auth).await,
        Command::Delete(target) => delete(app, api, auth, target).await,
    };

    match result {
        Ok(()) => {}
        Err(AdminError::NotAuthenticated) => {
            warn!(target: "tui", "Not signed in; returning to login");
            if let Err(e) = auth.logout().await {
                warn!(target: "tui", error = %e, "Could not clear stored session");
            }
            app.session_lost(Some(AdminError::NotAuthenticated.user_message()));
        }
        Err(e) => {
            error!(target: "tui", error = %e, "Command failed");
            app.status = Some(e.user_message());
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Quit => "quit",
        Command::Login { .. } => "login",
        Command::Logout => "logout",
        Command::Open(_) => "open",
        Command::Reload => "reload",
        Command::OpenForm(_) => "open_form",
        Command::SubmitForm => "submit_form",
        Command::Delete(_) => "delete",
    }
}

/// Load `view` and show it. Every data screen requires a session.
async fn open<P: IdentityProvider>(
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
    view: View,
) -> Result<()> {
    auth.ensure_fresh().await?;

    let mut screen = match view {
        View::Dashboard => {
            // A dashboard without totals is still usable for navigation.
            let stats = match api.dashboard_stats().await {
                Ok(stats) => Some(stats),
                Err(AdminError::NotAuthenticated) => return Err(AdminError::NotAuthenticated),
                Err(e) => {
                    warn!(target: "tui", error = %e, "Dashboard totals unavailable");
                    app.show(Screen::Dashboard {
                        stats: None,
                        selected: 0,
                    });
                    app.status = Some(e.user_message());
                    return Ok(());
                }
            };
            Screen::Dashboard { stats, selected: 0 }
        }
        View::Categories => Screen::Categories(ListView::new(api.categories().await?)),
        View::Vocabulary => {
            let (vocabulary, categories) = tokio::try_join!(api.vocabulary(), api.categories())?;
            Screen::Vocabulary(VocabularyView::new(vocabulary, categories))
        }
        View::Levels => {
            let mut levels = api.levels().await?;
            sort_by_sequence(&mut levels);
            Screen::Levels(ListView::new(levels))
        }
        View::Lessons(level) => {
            let mut lessons = api.lessons_by_level(&level.id).await?;
            sort_by_sequence(&mut lessons);
            Screen::Lessons {
                level,
                list: ListView::new(lessons),
            }
        }
    };

    screen.keep_position(&app.screen);
    app.show(screen);
    Ok(())
}

/// After signing in, go back to a form the lost session interrupted, or to
/// the dashboard.
async fn resume<P: IdentityProvider>(
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
) -> Result<()> {
    let Some(SuspendedForm { view, mut form }) = app.suspended.take() else {
        return open(app, api, auth, View::Dashboard).await;
    };
    let result = open(app, api, auth, view.unwrap_or(View::Dashboard)).await;
    form.form.clear_error();
    app.form = Some(form);
    info!(target: "tui", "Restored unsaved form");
    result
}

async fn reload<P: IdentityProvider>(
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
) -> Result<()> {
    match app.screen.view() {
        Some(view) => open(app, api, auth, view).await,
        None => Ok(()),
    }
}

async fn open_form<P: IdentityProvider>(
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
    request: FormRequest,
) -> Result<()> {
    let exercises = match &request {
        FormRequest::EditLevel(level) => {
            auth.ensure_fresh().await?;
            api.level_with_exercises(&level.id).await?.exercises
        }
        _ => Vec::new(),
    };
    app.form = Some(FormModal::from_request(request, &exercises));
    Ok(())
}

/// Submit the open form. A failed save stays in the form, so only a lost
/// session is reported back.
async fn submit<P: IdentityProvider>(
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
) -> Result<()> {
    let Some(modal) = app.form.as_mut() else {
        return Ok(());
    };
    auth.ensure_fresh().await?;

    let target = modal.target.clone();
    let outcome = match &mut modal.form {
        EntityForm::Category(form) => {
            form.submit(|fields, _, _| async move {
                let request = CategoryRequest::from(&fields);
                match &target {
                    Some(id) => api.update_category(id, &request).await,
                    None => api.create_category(&request).await,
                }
            })
            .await
        }
        EntityForm::Vocabulary { form, .. } => {
            form.submit(|fields, _, _| async move {
                let request = VocabularyRequest::from(&fields);
                match &target {
                    Some(id) => api.update_vocabulary(id, &request).await,
                    None => api.create_vocabulary(&request).await,
                }
            })
            .await
        }
        EntityForm::Level(form) => {
            form.submit(|fields, questions, deleted| async move {
                api.save_level(target.as_ref(), &fields, &questions, &deleted)
                    .await
                    .map(|_| ())
            })
            .await
        }
        EntityForm::Lesson(form) => {
            form.submit(|fields, _, _| async move {
                match &target {
                    Some(id) => api.update_lesson(id, &LessonRequest::update(&fields)).await,
                    None => api.create_lesson(&LessonRequest::create(&fields)).await,
                }
            })
            .await
        }
    };

    match outcome {
        Ok(()) => {
            app.form = None;
            reload(app, api, auth).await
        }
        Err(AdminError::NotAuthenticated) => Err(AdminError::NotAuthenticated),
        Err(AdminError::Sync { level_id, report }) => {
            warn!(target: "tui", level_id = %level_id, failed = report.failures.len(), "Level saved with exercise failures; form kept open");
            if let Some(modal) = app.form.as_mut() {
                modal.keep_partial_save(level_id, &report);
            }
            Ok(())
        }
        Err(e) => {
            debug!(target: "tui", error = %e, "Save failed; form kept open");
            Ok(())
        }
    }
}

async fn delete<P: IdentityProvider>(
    app: &mut AdminApp,
    api: &ApiClient,
    auth: &Authenticator<P>,
    target: DeleteTarget,
) -> Result<()> {
    auth.ensure_fresh().await?;
    match &target {
        DeleteTarget::Category(id) => api.delete_category(id).await?,
        DeleteTarget::Vocabulary(id) => api.delete_vocabulary(id).await?,
        DeleteTarget::Level(id) => api.delete_level(id).await?,
        DeleteTarget::Lesson(id) => api.delete_lesson(id).await?,
    }
    info!(target: "tui", deleted = ?target, "Record deleted");
    reload(app, api, auth).await
}
