//! Admin UI state.
//!
//! One [`Screen`] at a time, with at most one [`Modal`] on top. Transitions
//! that need the network are requested as [`Command`]s and carried out by
//! the runner; everything here is plain data.

use crate::api::SyncReport;
use crate::catalog::{filter_vocabulary, next_sequence};
use crate::editor::{ExerciseEditor, Mode};
use crate::forms::{
    CategoryFields, FormContainer, FormFields, LessonFields, LevelFields, VocabularyFields,
};
use crate::models::{
    Category, DashboardStats, Id, Lesson, Level, Question, User, Vocabulary,
    CHOICES_PER_QUESTION,
};

/// Dashboard menu entries, in display order.
pub const DASHBOARD_MENU: [&str; 4] = ["Categories", "Vocabulary", "Levels & Lessons", "Sign out"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
}

/// A selectable list of records.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub selected: usize,
}

impl<T> ListView<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1).min(self.items.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }
}

/// Vocabulary list with its search box and category filter.
#[derive(Debug, Clone)]
pub struct VocabularyView {
    pub all: Vec<Vocabulary>,
    pub categories: Vec<Category>,
    pub search: String,
    /// Index into `categories`; `None` shows every category.
    pub category: Option<usize>,
    pub searching: bool,
    pub selected: usize,
}

impl VocabularyView {
    pub fn new(all: Vec<Vocabulary>, categories: Vec<Category>) -> Self {
        Self {
            all,
            categories,
            search: String::new(),
            category: None,
            searching: false,
            selected: 0,
        }
    }

    pub fn visible(&self) -> Vec<&Vocabulary> {
        let category = self
            .category
            .and_then(|i| self.categories.get(i))
            .map(|c| &c.id);
        filter_vocabulary(&self.all, &self.search, category)
    }

    pub fn selected_item(&self) -> Option<&Vocabulary> {
        self.visible().get(self.selected).copied()
    }

    pub fn category_label(&self) -> &str {
        self.category
            .and_then(|i| self.categories.get(i))
            .map(|c| c.name.as_str())
            .unwrap_or("All")
    }

    /// All → first category → ... → last category → All.
    pub fn cycle_category(&mut self) {
        self.category = match self.category {
            None if !self.categories.is_empty() => Some(0),
            Some(i) if i + 1 < self.categories.len() => Some(i + 1),
            _ => None,
        };
        self.selected = 0;
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[derive(Debug, Clone)]
pub enum Screen {
    Login {
        email: String,
        password: String,
        focus: LoginFocus,
        error: Option<String>,
    },
    Dashboard {
        stats: Option<DashboardStats>,
        selected: usize,
    },
    Categories(ListView<Category>),
    Vocabulary(VocabularyView),
    Levels(ListView<Level>),
    Lessons {
        level: Level,
        list: ListView<Lesson>,
    },
}

impl Screen {
    pub fn login(error: Option<String>) -> Self {
        Self::Login {
            email: String::new(),
            password: String::new(),
            focus: LoginFocus::Email,
            error,
        }
    }

    /// The view to reload after a change, if this screen is backed by data.
    pub fn view(&self) -> Option<View> {
        match self {
            Screen::Login { .. } => None,
            Screen::Dashboard { .. } => Some(View::Dashboard),
            Screen::Categories(_) => Some(View::Categories),
            Screen::Vocabulary(_) => Some(View::Vocabulary),
            Screen::Levels(_) => Some(View::Levels),
            Screen::Lessons { level, .. } => Some(View::Lessons(level.clone())),
        }
    }

    /// Keep the cursor (and vocabulary filters) of `previous` when a screen
    /// of the same kind is reloaded.
    pub fn keep_position(&mut self, previous: &Screen) {
        match (self, previous) {
            (Screen::Dashboard { selected, .. }, Screen::Dashboard { selected: old, .. }) => {
                *selected = *old;
            }
            (Screen::Categories(list), Screen::Categories(old)) => {
                list.selected = old.selected.min(list.items.len().saturating_sub(1));
            }
            (Screen::Levels(list), Screen::Levels(old)) => {
                list.selected = old.selected.min(list.items.len().saturating_sub(1));
            }
            (
                Screen::Lessons { level, list },
                Screen::Lessons {
                    level: old_level,
                    list: old,
                },
            ) if level.id == old_level.id => {
                list.selected = old.selected.min(list.items.len().saturating_sub(1));
            }
            (Screen::Vocabulary(view), Screen::Vocabulary(old)) => {
                view.search = old.search.clone();
                view.category = old
                    .category
                    .and_then(|i| old.categories.get(i))
                    .and_then(|c| view.categories.iter().position(|n| n.id == c.id));
                view.selected = old.selected;
                view.clamp_selection();
            }
            _ => {}
        }
    }
}

/// A data-backed screen the runner can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Categories,
    Vocabulary,
    Levels,
    Lessons(Level),
}

/// Which record a form should open for.
#[derive(Debug, Clone)]
pub enum FormRequest {
    AddCategory,
    EditCategory(Category),
    AddVocabulary(Vec<Category>),
    EditVocabulary(Vocabulary, Vec<Category>),
    AddLevel,
    /// Needs the level's exercises fetched first.
    EditLevel(Level),
    AddLesson { level_id: Id, sequence: u32 },
    EditLesson(Lesson),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Category(Id),
    Vocabulary(Id),
    Level(Id),
    Lesson(Id),
}

/// Work the runner performs on behalf of a key press.
#[derive(Debug, Clone)]
pub enum Command {
    Quit,
    Login { email: String, password: String },
    Logout,
    Open(View),
    Reload,
    OpenForm(FormRequest),
    SubmitForm,
    Delete(DeleteTarget),
}

impl Command {
    /// Shown while the command runs.
    pub fn busy_label(&self) -> &'static str {
        match self {
            Command::Login { .. } => "Signing in...",
            Command::Logout => "Signing out...",
            Command::SubmitForm => "Saving...",
            Command::Delete(_) => "Deleting...",
            _ => "Loading...",
        }
    }
}

/// A focusable input inside a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Field(usize),
    Question(usize),
    Choice(usize, usize),
}

pub enum EntityForm {
    Category(FormContainer<CategoryFields>),
    Vocabulary {
        form: FormContainer<VocabularyFields>,
        categories: Vec<Category>,
    },
    Level(FormContainer<LevelFields>),
    Lesson(FormContainer<LessonFields>),
}

impl EntityForm {
    pub fn fields(&self) -> &dyn FormFields {
        match self {
            EntityForm::Category(f) => f.fields(),
            EntityForm::Vocabulary { form, .. } => form.fields(),
            EntityForm::Level(f) => f.fields(),
            EntityForm::Lesson(f) => f.fields(),
        }
    }

    pub fn fields_mut(&mut self) -> &mut dyn FormFields {
        match self {
            EntityForm::Category(f) => f.fields_mut(),
            EntityForm::Vocabulary { form, .. } => form.fields_mut(),
            EntityForm::Level(f) => f.fields_mut(),
            EntityForm::Lesson(f) => f.fields_mut(),
        }
    }

    pub fn exercises(&self) -> Option<&ExerciseEditor> {
        match self {
            EntityForm::Level(f) => f.exercises(),
            _ => None,
        }
    }

    pub fn exercises_mut(&mut self) -> Option<&mut ExerciseEditor> {
        match self {
            EntityForm::Level(f) => f.exercises_mut(),
            _ => None,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            EntityForm::Category(f) => f.mode(),
            EntityForm::Vocabulary { form, .. } => form.mode(),
            EntityForm::Level(f) => f.mode(),
            EntityForm::Lesson(f) => f.mode(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            EntityForm::Category(f) => f.error(),
            EntityForm::Vocabulary { form, .. } => form.error(),
            EntityForm::Level(f) => f.error(),
            EntityForm::Lesson(f) => f.error(),
        }
    }

    pub fn clear_error(&mut self) {
        match self {
            EntityForm::Category(f) => f.clear_error(),
            EntityForm::Vocabulary { form, .. } => form.clear_error(),
            EntityForm::Level(f) => f.clear_error(),
            EntityForm::Lesson(f) => f.clear_error(),
        }
    }

    pub fn cancel(&mut self) {
        match self {
            EntityForm::Category(f) => f.cancel(),
            EntityForm::Vocabulary { form, .. } => form.cancel(),
            EntityForm::Level(f) => f.cancel(),
            EntityForm::Lesson(f) => f.cancel(),
        }
    }

    pub fn entity(&self) -> &'static str {
        match self {
            EntityForm::Category(_) => "Category",
            EntityForm::Vocabulary { .. } => "Vocabulary",
            EntityForm::Level(_) => "Level",
            EntityForm::Lesson(_) => "Lesson",
        }
    }

    pub fn title(&self) -> String {
        match self.mode() {
            Mode::Add => format!("Add New {}", self.entity()),
            Mode::Edit => format!("Edit {}", self.entity()),
        }
    }
}

/// An open add/edit form and the cursor moving through it.
pub struct FormModal {
    /// Record being edited; `None` when adding.
    pub target: Option<Id>,
    pub form: EntityForm,
    pub focus: usize,
    /// Raw text of each top-level input, so partial numbers can be typed.
    pub inputs: Vec<String>,
}

impl FormModal {
    pub fn new(target: Option<Id>, form: EntityForm) -> Self {
        let fields = form.fields();
        let inputs = (0..fields.labels().len()).map(|i| fields.value(i)).collect();
        Self {
            target,
            form,
            focus: 0,
            inputs,
        }
    }

    /// Build the form for `request`. Level edits pass the fetched exercises.
    pub fn from_request(request: FormRequest, exercises: &[Question]) -> Self {
        match request {
            FormRequest::AddCategory => Self::new(
                None,
                EntityForm::Category(FormContainer::open(Mode::Add, CategoryFields::default())),
            ),
            FormRequest::EditCategory(c) => Self::new(
                Some(c.id.clone()),
                EntityForm::Category(FormContainer::open(
                    Mode::Edit,
                    CategoryFields::from_record(&c),
                )),
            ),
            FormRequest::AddVocabulary(categories) => Self::new(
                None,
                EntityForm::Vocabulary {
                    form: FormContainer::open(Mode::Add, VocabularyFields::default()),
                    categories,
                },
            ),
            FormRequest::EditVocabulary(v, categories) => Self::new(
                Some(v.id.clone()),
                EntityForm::Vocabulary {
                    form: FormContainer::open(Mode::Edit, VocabularyFields::from_record(&v)),
                    categories,
                },
            ),
            FormRequest::AddLevel => Self::new(
                None,
                EntityForm::Level(FormContainer::with_exercises(
                    Mode::Add,
                    LevelFields::default(),
                    &[],
                )),
            ),
            FormRequest::EditLevel(level) => Self::new(
                Some(level.id.clone()),
                EntityForm::Level(FormContainer::with_exercises(
                    Mode::Edit,
                    LevelFields::from_record(&level),
                    exercises,
                )),
            ),
            FormRequest::AddLesson { level_id, sequence } => Self::new(
                None,
                EntityForm::Lesson(FormContainer::open(
                    Mode::Add,
                    LessonFields::for_level(level_id, sequence),
                )),
            ),
            FormRequest::EditLesson(lesson) => Self::new(
                Some(lesson.id.clone()),
                EntityForm::Lesson(FormContainer::open(
                    Mode::Edit,
                    LessonFields::from_record(&lesson),
                )),
            ),
        }
    }

    pub fn slots(&self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = (0..self.inputs.len()).map(Slot::Field).collect();
        if let Some(editor) = self.form.exercises() {
            for q in 0..editor.len() {
                slots.push(Slot::Question(q));
                slots.extend((0..CHOICES_PER_QUESTION).map(|c| Slot::Choice(q, c)));
            }
        }
        slots
    }

    pub fn focused(&self) -> Option<Slot> {
        self.slots().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let len = self.slots().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_previous(&mut self) {
        let len = self.slots().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    /// Whether top-level input `index` is the vocabulary category picker.
    pub fn is_category_field(&self, index: usize) -> bool {
        matches!(self.form, EntityForm::Vocabulary { .. }) && index == 2
    }

    pub fn on_category_picker(&self) -> bool {
        self.focused() == Some(Slot::Field(2)) && self.is_category_field(2)
    }

    /// Text currently shown in the focused input.
    fn focused_text(&self) -> Option<String> {
        match self.focused()? {
            Slot::Field(i) => self.inputs.get(i).cloned(),
            Slot::Question(q) => Some(self.form.exercises()?.question(q)?.text.clone()),
            Slot::Choice(q, c) => Some(self.form.exercises()?.question(q)?.choices[c].text.clone()),
        }
    }

    fn write_focused(&mut self, text: String) {
        match self.focused() {
            Some(Slot::Field(i)) => {
                self.form.fields_mut().set_value(i, &text);
                self.inputs[i] = text;
            }
            Some(Slot::Question(q)) => {
                if let Some(editor) = self.form.exercises_mut() {
                    let _ = editor.set_question_text(q, text);
                }
            }
            Some(Slot::Choice(q, c)) => {
                if let Some(editor) = self.form.exercises_mut() {
                    let _ = editor.set_choice_text(q, c, text);
                }
            }
            None => {}
        }
    }

    pub fn type_char(&mut self, ch: char) {
        if self.on_category_picker() {
            return;
        }
        if let Some(mut text) = self.focused_text() {
            text.push(ch);
            self.write_focused(text);
        }
    }

    pub fn backspace(&mut self) {
        if self.on_category_picker() {
            return;
        }
        if let Some(mut text) = self.focused_text() {
            text.pop();
            self.write_focused(text);
        }
    }

    /// Step the vocabulary category by `delta` places, wrapping.
    pub fn cycle_category(&mut self, delta: isize) {
        let EntityForm::Vocabulary { form, categories } = &mut self.form else {
            return;
        };
        if categories.is_empty() {
            return;
        }
        let len = categories.len() as isize;
        let current = form
            .fields()
            .category_id
            .as_ref()
            .and_then(|id| categories.iter().position(|c| &c.id == id));
        let next = match current {
            Some(i) => (i as isize + delta).rem_euclid(len) as usize,
            None => 0,
        };
        let id = categories[next].id.clone();
        form.fields_mut().category_id = Some(id.clone());
        self.inputs[2] = id.to_string();
    }

    /// Name of the selected vocabulary category, for display.
    pub fn category_name(&self) -> Option<&str> {
        let EntityForm::Vocabulary { form, categories } = &self.form else {
            return None;
        };
        let id = form.fields().category_id.as_ref()?;
        categories
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.as_str())
    }

    /// Append a blank question and move the cursor to its text.
    pub fn add_question(&mut self) {
        let Some(editor) = self.form.exercises_mut() else {
            return;
        };
        editor.add_question();
        let new_index = editor.len() - 1;
        if let Some(pos) = self
            .slots()
            .iter()
            .position(|s| *s == Slot::Question(new_index))
        {
            self.focus = pos;
        }
    }

    /// Remove the question the cursor is in.
    pub fn remove_focused_question(&mut self) {
        let index = match self.focused() {
            Some(Slot::Question(q)) | Some(Slot::Choice(q, _)) => q,
            _ => return,
        };
        let removed = self
            .form
            .exercises_mut()
            .is_some_and(|editor| editor.remove_question(index).is_ok());
        if !removed {
            return;
        }
        // Land on the previous question, the one that moved up, or the last field.
        let slots = self.slots();
        let target = slots
            .iter()
            .position(|s| *s == Slot::Question(index.saturating_sub(1)))
            .unwrap_or(self.inputs.len().saturating_sub(1));
        self.focus = target.min(slots.len().saturating_sub(1));
    }

    /// Point the form at a level that was saved while some of its exercise
    /// changes failed, and drop the changes that went through, so submitting
    /// again only retries the rest.
    pub fn keep_partial_save(&mut self, level_id: Id, report: &SyncReport) {
        self.target = Some(level_id);
        if let Some(editor) = self.form.exercises_mut() {
            for (index, id) in &report.created {
                let _ = editor.mark_saved(*index, id.clone());
            }
            for id in &report.deleted {
                editor.forget_deletion(id);
            }
        }
    }

    /// Mark the focused choice as its question's answer.
    pub fn mark_focused_correct(&mut self) {
        if let Some(Slot::Choice(q, c)) = self.focused() {
            if let Some(editor) = self.form.exercises_mut() {
                let _ = editor.set_choice_correct(q, c);
            }
        }
    }
}

/// A form put aside when the session ran out, and the screen it was on.
pub struct SuspendedForm {
    pub view: Option<View>,
    pub form: FormModal,
}

#[derive(Debug, Clone)]
pub enum Modal {
    ConfirmDelete { target: DeleteTarget, label: String },
}

/// Everything the admin screens render from.
pub struct AdminApp {
    pub screen: Screen,
    pub form: Option<FormModal>,
    pub modal: Option<Modal>,
    /// Screen-level error, e.g. a failed fetch or delete.
    pub status: Option<String>,
    pub busy: Option<&'static str>,
    pub user: Option<User>,
    /// Unsaved form waiting for the user to sign in again.
    pub suspended: Option<SuspendedForm>,
    pub should_quit: bool,
}

impl AdminApp {
    pub fn new(user: Option<User>) -> Self {
        Self {
            screen: Screen::login(None),
            form: None,
            modal: None,
            status: None,
            busy: None,
            user,
            suspended: None,
            should_quit: false,
        }
    }

    /// Drop back to the login screen, closing anything open.
    pub fn show_login(&mut self, error: Option<String>) {
        self.screen = Screen::login(error);
        self.form = None;
        self.suspended = None;
        self.modal = None;
        self.status = None;
        self.user = None;
    }

    /// Like [`show_login`](Self::show_login), but an open form is kept aside
    /// with its edits until the next sign-in.
    pub fn session_lost(&mut self, error: Option<String>) {
        let suspended = match self.form.take() {
            Some(form) => Some(SuspendedForm {
                view: self.screen.view(),
                form,
            }),
            None => self.suspended.take(),
        };
        self.show_login(error);
        self.suspended = suspended;
    }

    pub fn show(&mut self, screen: Screen) {
        self.screen = screen;
        self.status = None;
    }

    pub fn set_login_error(&mut self, message: String) {
        if let Screen::Login { error, password, .. } = &mut self.screen {
            *error = Some(message);
            password.clear();
        }
    }

    /// Suggested sequence for a new lesson on the current lessons screen.
    pub fn next_lesson_sequence(&self) -> u32 {
        match &self.screen {
            Screen::Lessons { list, .. } => next_sequence(&list.items),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id: Id::Int(id),
            name: name.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn level() -> Level {
        Level {
            id: Id::Int(1),
            name: "Beginner".to_string(),
            description: "Start".to_string(),
            sequence: 1,
            created_at: String::new(),
            updated_at: String::new(),
            exercises: Vec::new(),
            lessons: Vec::new(),
        }
    }

    fn persisted(id: i64) -> Question {
        let mut q = Question::blank();
        q.id = Some(Id::Int(id));
        q.text = format!("q{}", id);
        q
    }

    #[test]
    fn level_form_slots_cover_fields_and_choices() {
        let modal = FormModal::from_request(FormRequest::AddLevel, &[]);
        let slots = modal.slots();
        assert_eq!(slots.len(), 3 + 1 + CHOICES_PER_QUESTION);
        assert_eq!(slots[3], Slot::Question(0));
        assert_eq!(slots[7], Slot::Choice(0, 3));
    }

    #[test]
    fn typing_updates_fields_and_questions() {
        let mut modal = FormModal::from_request(FormRequest::AddLevel, &[]);
        for ch in "Dasar".chars() {
            modal.type_char(ch);
        }
        // Sequence: clear the default then type 2.
        modal.focus = 2;
        modal.backspace();
        modal.type_char('2');
        modal.focus = 3;
        modal.type_char('?');
        modal.backspace();
        modal.type_char('Q');

        let EntityForm::Level(form) = &modal.form else {
            panic!("level form expected");
        };
        assert_eq!(form.fields().name, "Dasar");
        assert_eq!(form.fields().sequence, 2);
        assert_eq!(modal.inputs[2], "2");
        assert_eq!(form.exercises().unwrap().questions()[0].text, "Q");
    }

    #[test]
    fn mark_correct_only_on_choices() {
        let mut modal = FormModal::from_request(FormRequest::AddLevel, &[]);
        modal.focus = 3;
        modal.mark_focused_correct();
        assert_eq!(modal.form.exercises().unwrap().questions()[0].correct_index(), Some(0));

        modal.focus = 6; // Choice(0, 2)
        modal.mark_focused_correct();
        assert_eq!(modal.form.exercises().unwrap().questions()[0].correct_index(), Some(2));
    }

    #[test]
    fn add_and_remove_questions_track_deletions() {
        let mut modal = FormModal::from_request(FormRequest::EditLevel(level()), &[persisted(5), persisted(9)]);
        modal.add_question();
        assert_eq!(modal.focused(), Some(Slot::Question(2)));

        // Cursor inside the first question's choices.
        modal.focus = 3 + 2;
        assert_eq!(modal.focused(), Some(Slot::Choice(0, 1)));
        modal.remove_focused_question();

        let editor = modal.form.exercises().unwrap();
        assert_eq!(editor.len(), 2);
        assert_eq!(editor.pending_deletions(), &[Id::Int(5)]);
        assert!(modal.focus < modal.slots().len());
    }

    #[test]
    fn removing_the_last_question_keeps_focus_valid() {
        let mut modal = FormModal::from_request(FormRequest::AddLevel, &[]);
        modal.focus = 3;
        modal.remove_focused_question();
        assert_eq!(modal.slots().len(), 3);
        assert!(modal.focused().is_some());
    }

    #[test]
    fn category_picker_cycles() {
        let categories = vec![category(1, "Greetings"), category(2, "Food")];
        let mut modal = FormModal::from_request(FormRequest::AddVocabulary(categories), &[]);
        modal.focus = 2;
        modal.type_char('x');
        assert_eq!(modal.category_name(), None);

        modal.cycle_category(1);
        assert_eq!(modal.category_name(), Some("Greetings"));
        modal.cycle_category(1);
        assert_eq!(modal.category_name(), Some("Food"));
        modal.cycle_category(1);
        assert_eq!(modal.category_name(), Some("Greetings"));
        modal.cycle_category(-1);
        assert_eq!(modal.category_name(), Some("Food"));
        assert_eq!(modal.inputs[2], "2");
    }

    #[test]
    fn vocabulary_view_filters_by_category() {
        let mut view = VocabularyView::new(Vec::new(), vec![category(1, "Greetings")]);
        assert_eq!(view.category_label(), "All");
        view.cycle_category();
        assert_eq!(view.category_label(), "Greetings");
        view.cycle_category();
        assert_eq!(view.category_label(), "All");
    }

    #[test]
    fn reload_keeps_cursor_and_filters() {
        let old = Screen::Vocabulary(VocabularyView {
            search: "sal".to_string(),
            category: Some(1),
            ..VocabularyView::new(Vec::new(), vec![category(1, "A"), category(2, "B")])
        });
        // Categories came back in a different order.
        let mut fresh = Screen::Vocabulary(VocabularyView::new(
            Vec::new(),
            vec![category(2, "B"), category(1, "A")],
        ));
        fresh.keep_position(&old);
        let Screen::Vocabulary(view) = fresh else {
            panic!("vocabulary screen expected");
        };
        assert_eq!(view.search, "sal");
        assert_eq!(view.category_label(), "B");

        let mut old = ListView::new(vec![level(), level(), level()]);
        old.selected = 2;
        let old = Screen::Levels(old);
        let mut fresh = Screen::Levels(ListView::new(vec![level()]));
        fresh.keep_position(&old);
        assert!(matches!(fresh, Screen::Levels(ref l) if l.selected == 0));
    }

    #[test]
    fn list_selection_stays_in_bounds() {
        let mut list = ListView::new(vec![1, 2]);
        list.select_previous();
        assert_eq!(list.selected, 0);
        list.select_next();
        list.select_next();
        assert_eq!(list.selected_item(), Some(&2));

        let mut empty: ListView<u8> = ListView::new(Vec::new());
        empty.select_next();
        assert_eq!(empty.selected_item(), None);
    }

    #[test]
    fn lost_session_keeps_the_open_form() {
        let mut app = AdminApp::new(None);
        app.screen = Screen::Levels(ListView::new(vec![level()]));
        let mut modal = FormModal::from_request(FormRequest::EditLevel(level()), &[persisted(5)]);
        modal.focus = 3;
        modal.type_char('!');
        app.form = Some(modal);

        app.session_lost(Some("expired".to_string()));
        assert!(app.form.is_none());
        assert!(matches!(app.screen, Screen::Login { .. }));
        let suspended = app.suspended.as_ref().unwrap();
        assert_eq!(suspended.view, Some(View::Levels));
        assert_eq!(
            suspended.form.form.exercises().unwrap().questions()[0].text,
            "q5!"
        );

        app.show_login(None);
        assert!(app.suspended.is_none());
    }

    #[test]
    fn partial_save_turns_a_new_level_into_an_edit() {
        let mut modal = FormModal::from_request(FormRequest::AddLevel, &[]);
        modal.add_question();
        let report = SyncReport {
            succeeded: 1,
            created: vec![(1, Id::Int(100))],
            ..SyncReport::default()
        };

        modal.keep_partial_save(Id::Int(77), &report);

        assert_eq!(modal.target, Some(Id::Int(77)));
        let questions = modal.form.exercises().unwrap().questions();
        assert_eq!(questions[0].id, None);
        assert_eq!(questions[1].id, Some(Id::Int(100)));
    }
}
