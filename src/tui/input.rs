//! Keyboard handling.
//!
//! Keys mutate local state directly; anything that needs the backend comes
//! back as a [`Command`] for the runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{
    AdminApp, Command, DeleteTarget, FormModal, FormRequest, LoginFocus, Modal, Screen, View,
    DASHBOARD_MENU,
};

pub fn handle_key(app: &mut AdminApp, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    if app.busy.is_some() {
        return None;
    }
    if let Some(modal) = app.modal.take() {
        return handle_modal(app, modal, key);
    }
    if let Some(form) = app.form.as_mut() {
        if key.code == KeyCode::Esc {
            form.form.cancel();
            app.form = None;
            return None;
        }
        return handle_form(form, key);
    }
    handle_screen(app, key)
}

fn handle_modal(app: &mut AdminApp, modal: Modal, key: KeyEvent) -> Option<Command> {
    match modal {
        Modal::ConfirmDelete { target, label } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(Command::Delete(target))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => None,
            _ => {
                app.modal = Some(Modal::ConfirmDelete { target, label });
                None
            }
        },
    }
}

fn handle_form(form: &mut FormModal, key: KeyEvent) -> Option<Command> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => return Some(Command::SubmitForm),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Left if form.on_category_picker() => form.cycle_category(-1),
        KeyCode::Right | KeyCode::Char(' ') if form.on_category_picker() => {
            form.cycle_category(1)
        }
        KeyCode::Char('n') if ctrl => form.add_question(),
        KeyCode::Char('d') if ctrl => form.remove_focused_question(),
        KeyCode::Char('t') if ctrl => form.mark_focused_correct(),
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => form.type_char(c),
        KeyCode::Backspace => form.backspace(),
        _ => {}
    }
    None
}

fn handle_screen(app: &mut AdminApp, key: KeyEvent) -> Option<Command> {
    let next_lesson_sequence = app.next_lesson_sequence();
    match &mut app.screen {
        Screen::Login {
            email,
            password,
            focus,
            error,
        } => {
            match key.code {
                KeyCode::Esc => return Some(Command::Quit),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                    *focus = match *focus {
                        LoginFocus::Email => LoginFocus::Password,
                        LoginFocus::Password => LoginFocus::Email,
                    };
                }
                KeyCode::Enter => match *focus {
                    LoginFocus::Email => *focus = LoginFocus::Password,
                    LoginFocus::Password => {
                        return Some(Command::Login {
                            email: email.clone(),
                            password: password.clone(),
                        });
                    }
                },
                KeyCode::Char(c) => {
                    *error = None;
                    match *focus {
                        LoginFocus::Email => email.push(c),
                        LoginFocus::Password => password.push(c),
                    }
                }
                KeyCode::Backspace => {
                    *error = None;
                    match *focus {
                        LoginFocus::Email => email.pop(),
                        LoginFocus::Password => password.pop(),
                    };
                }
                _ => {}
            }
            None
        }
        Screen::Dashboard { selected, .. } => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('r') => Some(Command::Reload),
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(DASHBOARD_MENU.len() - 1);
                None
            }
            KeyCode::Enter => Some(match *selected {
                0 => Command::Open(View::Categories),
                1 => Command::Open(View::Vocabulary),
                2 => Command::Open(View::Levels),
                _ => Command::Logout,
            }),
            _ => None,
        },
        Screen::Categories(list) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                list.select_previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                list.select_next();
                None
            }
            KeyCode::Char('a') => Some(Command::OpenForm(FormRequest::AddCategory)),
            KeyCode::Char('e') | KeyCode::Enter => list
                .selected_item()
                .map(|c| Command::OpenForm(FormRequest::EditCategory(c.clone()))),
            KeyCode::Char('d') => {
                if let Some(c) = list.selected_item() {
                    app.modal = Some(Modal::ConfirmDelete {
                        target: DeleteTarget::Category(c.id.clone()),
                        label: format!("category \"{}\"", c.name),
                    });
                }
                None
            }
            other => common(other),
        },
        Screen::Vocabulary(view) if view.searching => {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => view.searching = false,
                KeyCode::Char(c) => {
                    view.search.push(c);
                    view.selected = 0;
                }
                KeyCode::Backspace => {
                    view.search.pop();
                    view.selected = 0;
                }
                _ => {}
            }
            None
        }
        Screen::Vocabulary(view) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                view.selected = view.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                view.selected += 1;
                view.clamp_selection();
                None
            }
            KeyCode::Char('/') => {
                view.searching = true;
                None
            }
            KeyCode::Char('c') => {
                view.cycle_category();
                None
            }
            KeyCode::Char('a') => Some(Command::OpenForm(FormRequest::AddVocabulary(
                view.categories.clone(),
            ))),
            KeyCode::Char('e') | KeyCode::Enter => view.selected_item().map(|v| {
                Command::OpenForm(FormRequest::EditVocabulary(
                    v.clone(),
                    view.categories.clone(),
                ))
            }),
            KeyCode::Char('d') => {
                if let Some(v) = view.selected_item() {
                    app.modal = Some(Modal::ConfirmDelete {
                        target: DeleteTarget::Vocabulary(v.id.clone()),
                        label: format!("vocabulary \"{}\"", v.arabic_text),
                    });
                }
                None
            }
            other => common(other),
        },
        Screen::Levels(list) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                list.select_previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                list.select_next();
                None
            }
            KeyCode::Char('a') => Some(Command::OpenForm(FormRequest::AddLevel)),
            KeyCode::Char('e') => list
                .selected_item()
                .map(|l| Command::OpenForm(FormRequest::EditLevel(l.clone()))),
            KeyCode::Char('l') | KeyCode::Enter => list
                .selected_item()
                .map(|l| Command::Open(View::Lessons(l.clone()))),
            KeyCode::Char('d') => {
                if let Some(l) = list.selected_item() {
                    app.modal = Some(Modal::ConfirmDelete {
                        target: DeleteTarget::Level(l.id.clone()),
                        label: format!("level \"{}\"", l.name),
                    });
                }
                None
            }
            other => common(other),
        },
        Screen::Lessons { level, list } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                list.select_previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                list.select_next();
                None
            }
            KeyCode::Char('a') => Some(Command::OpenForm(FormRequest::AddLesson {
                level_id: level.id.clone(),
                sequence: next_lesson_sequence,
            })),
            KeyCode::Char('e') | KeyCode::Enter => list
                .selected_item()
                .map(|l| Command::OpenForm(FormRequest::EditLesson(l.clone()))),
            KeyCode::Char('d') => {
                if let Some(l) = list.selected_item() {
                    app.modal = Some(Modal::ConfirmDelete {
                        target: DeleteTarget::Lesson(l.id.clone()),
                        label: format!("lesson \"{}\"", l.title),
                    });
                }
                None
            }
            KeyCode::Esc => Some(Command::Open(View::Levels)),
            other => common(other),
        },
    }
}

/// Keys shared by the list screens.
fn common(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('r') => Some(Command::Reload),
        KeyCode::Esc => Some(Command::Open(View::Dashboard)),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}
