use chrono::{NaiveDate, Utc};
use eframe::egui;
use egui::{Color32, RichText};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use console_core::catalog::permissions_by_category;
use console_core::{
    relative_time, Choice, Console, ConsoleConfig, EntityKind, ExportFormat, Filter, Project,
    ProjectFilter, ProjectForm, ProjectStatus, RecordId, Role, RoleCard, RoleForm, Screen,
    ScreenEntity, Sprint, SprintFilter, SprintForm, SprintStatus, Task, TaskFilter, TaskForm,
    TaskPriority, TaskStatus, User, UserFilter, UserForm, UserStatus, ASSIGNEES, ROLE_OPTIONS,
};

/// Window width below which the sidebar hides behind the menu button
const COMPACT_WIDTH: f32 = 760.0;

const GREEN: Color32 = Color32::from_rgb(46, 160, 67);
const BLUE: Color32 = Color32::from_rgb(56, 132, 244);
const AMBER: Color32 = Color32::from_rgb(210, 153, 34);
const RED: Color32 = Color32::from_rgb(218, 54, 51);

/// A delete waiting for the user's answer
struct PendingDelete {
    kind: EntityKind,
    id: RecordId,
    name: String,
    question: String,
}

/// Inputs a form needs besides the form itself
struct FormAids<'a> {
    projects: &'a [(RecordId, String)],
    new_attachment: &'a mut String,
    today: NaiveDate,
}

fn tone(text: &str, color: Color32) -> RichText {
    RichText::new(text).color(color)
}

fn user_status(status: UserStatus) -> RichText {
    match status {
        UserStatus::Active => tone(status.label(), GREEN),
        UserStatus::Inactive => tone(status.label(), RED),
    }
}

fn project_status(status: ProjectStatus) -> RichText {
    match status {
        ProjectStatus::Active => tone(status.label(), GREEN),
        ProjectStatus::Completed => tone(status.label(), BLUE),
        ProjectStatus::OnHold => tone(status.label(), AMBER),
    }
}

fn sprint_status(status: SprintStatus) -> RichText {
    match status {
        SprintStatus::Active => tone(status.label(), GREEN),
        SprintStatus::Invoiced => tone(status.label(), BLUE),
        SprintStatus::OnHold | SprintStatus::PendingDues => tone(status.label(), RED),
        SprintStatus::PendingApproval | SprintStatus::InQueue => tone(status.label(), AMBER),
    }
}

fn task_priority(priority: TaskPriority) -> RichText {
    match priority {
        TaskPriority::High => tone(priority.label(), RED),
        TaskPriority::Medium => tone(priority.label(), AMBER),
        TaskPriority::Low => tone(priority.label(), GREEN),
    }
}

fn task_status(status: TaskStatus) -> RichText {
    match status {
        TaskStatus::Todo => tone(status.label(), AMBER),
        TaskStatus::InProgress => tone(status.label(), BLUE),
        TaskStatus::Completed => tone(status.label(), GREEN),
    }
}

fn choice_combo<T: Choice>(ui: &mut egui::Ui, id: &str, value: &mut T) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(value.label())
        .show_ui(ui, |ui| {
            for option in T::ALL {
                ui.selectable_value(value, *option, option.label());
            }
        });
}

fn filter_combo<T: Choice>(ui: &mut egui::Ui, id: &str, label: &str, filter: &mut Filter<T>) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(filter.label())
        .show_ui(ui, |ui| {
            for option in Filter::<T>::options() {
                ui.selectable_value(filter, option, option.label());
            }
        });
}

fn option_combo(ui: &mut egui::Ui, id: &str, value: &mut String, options: &[&str]) {
    let selected = if value.is_empty() {
        "Select...".to_string()
    } else {
        value.clone()
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(value, option.to_string(), *option);
            }
        });
}

/// Rounds an hours value to the nearest half hour, never below 0.5
fn snap_efforts(hours: f64) -> f64 {
    ((hours * 2.0).round() / 2.0).max(0.5)
}

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(280.0));
    ui.end_row();
}

/// How an entity screen draws its rows, filters and form
trait ScreenView: ScreenEntity {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<RichText>;
    fn filter_ui(ui: &mut egui::Ui, filter: &mut Self::Filter);
    fn form_ui(ui: &mut egui::Ui, form: &mut Self::Form, aids: &mut FormAids<'_>);
}

impl ScreenView for User {
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Phone", "Role", "Status", "Last Login"];

    fn cells(&self) -> Vec<RichText> {
        vec![
            RichText::new(&self.name).strong(),
            RichText::new(&self.email),
            RichText::new(&self.phone),
            RichText::new(&self.role),
            user_status(self.status),
            RichText::new(&self.last_login).weak(),
        ]
    }

    fn filter_ui(ui: &mut egui::Ui, filter: &mut UserFilter) {
        filter_combo(ui, "user_status_filter", "Status:", &mut filter.status);
    }

    fn form_ui(ui: &mut egui::Ui, form: &mut UserForm, _aids: &mut FormAids<'_>) {
        egui::Grid::new("user_form_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                text_row(ui, "Full Name:", &mut form.name);
                text_row(ui, "Email:", &mut form.email);
                text_row(ui, "Phone:", &mut form.phone);
                ui.label("Role:");
                option_combo(ui, "user_role", &mut form.role, ROLE_OPTIONS);
                ui.end_row();
                ui.label("Status:");
                choice_combo(ui, "user_status", &mut form.status);
                ui.end_row();
            });
    }
}

impl ScreenView for Role {
    const COLUMNS: &'static [&'static str] = &["Role", "Description", "Permissions", "Users"];

    fn cells(&self) -> Vec<RichText> {
        let card = RoleCard::new(self);
        let mut badges = card.badges.join(" · ");
        if let Some(more) = &card.more {
            badges = format!("{}  {}", badges, more);
        }
        vec![
            RichText::new(&self.name).strong(),
            RichText::new(&self.description),
            RichText::new(format!("{}: {}", card.heading, badges)),
            RichText::new(card.users).weak(),
        ]
    }

    fn filter_ui(_ui: &mut egui::Ui, _filter: &mut ()) {}

    fn form_ui(ui: &mut egui::Ui, form: &mut RoleForm, _aids: &mut FormAids<'_>) {
        egui::Grid::new("role_form_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                text_row(ui, "Role Name:", &mut form.name);
                ui.label("Description:");
                ui.add(egui::TextEdit::multiline(&mut form.description).desired_rows(2));
                ui.end_row();
            });

        ui.separator();
        ui.strong(format!("Permissions ({})", form.permissions.len()));
        egui::ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
            for (category, permissions) in permissions_by_category() {
                ui.label(RichText::new(category).underline());
                ui.horizontal_wrapped(|ui| {
                    for permission in permissions {
                        let mut held = form.has_permission(permission.id);
                        if ui.checkbox(&mut held, permission.label).changed() {
                            form.toggle_permission(permission.id);
                        }
                    }
                });
            }
        });
    }
}

impl ScreenView for Project {
    const COLUMNS: &'static [&'static str] = &["Project", "Client", "Contact", "Status", "Created"];

    fn cells(&self) -> Vec<RichText> {
        vec![
            RichText::new(format!("{} {}", self.logo, self.name).trim()).strong(),
            RichText::new(&self.client_name),
            RichText::new(&self.contact_number),
            project_status(self.status),
            RichText::new(self.created_at.to_string()).weak(),
        ]
    }

    fn filter_ui(ui: &mut egui::Ui, filter: &mut ProjectFilter) {
        filter_combo(ui, "project_status_filter", "Status:", &mut filter.status);
    }

    fn form_ui(ui: &mut egui::Ui, form: &mut ProjectForm, _aids: &mut FormAids<'_>) {
        egui::Grid::new("project_form_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                text_row(ui, "Project Name:", &mut form.name);
                text_row(ui, "Client Name:", &mut form.client_name);
                text_row(ui, "Contact Number:", &mut form.contact_number);
                text_row(ui, "Logo:", &mut form.logo);
                ui.label("Status:");
                choice_combo(ui, "project_status", &mut form.status);
                ui.end_row();
            });
    }
}

impl ScreenView for Sprint {
    const COLUMNS: &'static [&'static str] = &["Sprint", "Project", "Dates", "Status", "Attachments"];

    fn cells(&self) -> Vec<RichText> {
        vec![
            RichText::new(&self.name).strong(),
            RichText::new(&self.project_name),
            RichText::new(format!("{} → {}", self.start_date, self.end_date)),
            sprint_status(self.status),
            RichText::new(format!("📎 {}", self.attachments.len())),
        ]
    }

    fn filter_ui(ui: &mut egui::Ui, filter: &mut SprintFilter) {
        filter_combo(ui, "sprint_status_filter", "Status:", &mut filter.status);
    }

    fn form_ui(ui: &mut egui::Ui, form: &mut SprintForm, aids: &mut FormAids<'_>) {
        egui::Grid::new("sprint_form_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                text_row(ui, "Sprint Name:", &mut form.name);

                ui.label("Project:");
                let selected = form
                    .project_id
                    .and_then(|id| aids.projects.iter().find(|(pid, _)| *pid == id))
                    .map(|(_, name)| name.clone())
                    .unwrap_or_else(|| "Select project".to_string());
                egui::ComboBox::from_id_salt("sprint_project")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for (id, name) in aids.projects {
                            ui.selectable_value(&mut form.project_id, Some(*id), name.as_str());
                        }
                    });
                ui.end_row();

                ui.label("Start Date:");
                let start = form.start_date.get_or_insert(aids.today);
                ui.add(DatePickerButton::new(start).id_salt("sprint_start"));
                ui.end_row();

                ui.label("End Date:");
                let end = form.end_date.get_or_insert(aids.today);
                ui.add(DatePickerButton::new(end).id_salt("sprint_end"));
                ui.end_row();

                ui.label("Status:");
                choice_combo(ui, "sprint_status", &mut form.status);
                ui.end_row();

                ui.label("Comments:");
                ui.add(egui::TextEdit::multiline(&mut form.comments).desired_rows(3));
                ui.end_row();
            });

        ui.separator();
        ui.strong("Attachments");
        let mut remove = None;
        for (index, name) in form.attachments.iter().enumerate() {
            ui.horizontal(|ui| {
                ui.label(format!("📎 {}", name));
                if ui.small_button("✖").clicked() {
                    remove = Some(index);
                }
            });
        }
        if let Some(index) = remove {
            form.remove_attachment(index);
        }
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut *aids.new_attachment)
                    .hint_text("file name")
                    .desired_width(220.0),
            );
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Add").clicked() || entered) && form.add_attachment(aids.new_attachment.as_str()) {
                aids.new_attachment.clear();
            }
        });
    }
}

impl ScreenView for Task {
    const COLUMNS: &'static [&'static str] = &["Task", "Efforts", "Priority", "Status", "Assignee", "Created"];

    fn cells(&self) -> Vec<RichText> {
        vec![
            RichText::new(&self.name).strong(),
            RichText::new(format!("{}h", self.efforts)),
            task_priority(self.priority),
            task_status(self.status),
            RichText::new(&self.assignee),
            RichText::new(self.created_at.to_string()).weak(),
        ]
    }

    fn filter_ui(ui: &mut egui::Ui, filter: &mut TaskFilter) {
        filter_combo(ui, "task_status_filter", "Status:", &mut filter.status);
        filter_combo(ui, "task_priority_filter", "Priority:", &mut filter.priority);
    }

    fn form_ui(ui: &mut egui::Ui, form: &mut TaskForm, _aids: &mut FormAids<'_>) {
        egui::Grid::new("task_form_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                text_row(ui, "Task Name:", &mut form.name);
                ui.label("Description:");
                ui.add(egui::TextEdit::multiline(&mut form.description).desired_rows(3));
                ui.end_row();
                ui.label("Efforts (Hours):");
                let efforts = ui.add(
                    egui::DragValue::new(&mut form.efforts)
                        .speed(0.5)
                        .range(0.5..=1000.0)
                        .fixed_decimals(1),
                );
                if efforts.changed() {
                    form.efforts = snap_efforts(form.efforts);
                }
                ui.end_row();
                ui.label("Priority:");
                choice_combo(ui, "task_priority", &mut form.priority);
                ui.end_row();
                ui.label("Status:");
                choice_combo(ui, "task_status", &mut form.status);
                ui.end_row();
                ui.label("Assignee:");
                option_combo(ui, "task_assignee", &mut form.assignee, ASSIGNEES);
                ui.end_row();
            });
    }
}

pub struct ConsoleApp {
    console: Console,

    // Sign-in page
    sign_in_email: String,
    sign_in_password: String,
    sign_in_error: Option<String>,

    // Editor state outside the form itself
    form_error: Option<String>,
    new_attachment: String,

    pending_delete: Option<PendingDelete>,

    // Error/success messages
    message: Option<(String, bool)>, // (message, is_error)
}

impl ConsoleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ConsoleConfig) -> Self {
        Self {
            console: Console::new(config),
            sign_in_email: String::new(),
            sign_in_password: String::new(),
            sign_in_error: None,
            form_error: None,
            new_attachment: String::new(),
            pending_delete: None,
            message: None,
        }
    }

    fn try_sign_in(&mut self) {
        match self.console.sign_in(&self.sign_in_email, &self.sign_in_password) {
            Ok(_) => {
                self.sign_in_password.clear();
                self.sign_in_error = None;
                self.message = None;
            }
            Err(e) => self.sign_in_error = Some(e.to_string()),
        }
    }

    fn sign_out(&mut self) {
        self.console.sign_out();
        self.pending_delete = None;
        self.form_error = None;
        self.sign_in_email.clear();
    }

    fn show_sign_in(&mut self, ctx: &egui::Context) {
        let mut submit = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading("Admin Panel");
                ui.label("Sign in to your account");
                ui.add_space(16.0);

                ui.add(
                    egui::TextEdit::singleline(&mut self.sign_in_email)
                        .hint_text("Email address")
                        .desired_width(260.0),
                );
                let password = ui.add(
                    egui::TextEdit::singleline(&mut self.sign_in_password)
                        .password(true)
                        .hint_text("Password")
                        .desired_width(260.0),
                );
                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }

                if let Some(err) = &self.sign_in_error {
                    ui.colored_label(RED, err.as_str());
                }
                ui.add_space(8.0);
                if ui.button("Sign In").clicked() {
                    submit = true;
                }
                ui.add_space(16.0);
                ui.weak("Demo credentials: admin@company.com / admin123");
            });
        });
        if submit {
            self.try_sign_in();
        }
    }

    fn show_top_panel(&mut self, ctx: &egui::Context, compact: bool) {
        let mut toggle_menu = false;
        let mut sign_out = false;
        let screen = self.console.session().active_screen();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if compact && ui.button("☰").clicked() {
                    toggle_menu = true;
                }
                ui.heading(screen.label());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Sign Out").clicked() {
                        sign_out = true;
                    }
                    if let Some(user) = self.console.current_user() {
                        ui.label(RichText::new(&user.role).weak());
                        ui.label(RichText::new(&user.name).strong());
                    }
                });
            });
        });

        if toggle_menu {
            self.console.toggle_mobile_menu();
        }
        if sign_out {
            self.sign_out();
        }
    }

    fn show_nav(&mut self, ctx: &egui::Context) {
        let active = self.console.session().active_screen();
        let mut selected = None;
        egui::SidePanel::left("nav_panel")
            .resizable(false)
            .default_width(190.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading("Admin Panel");
                ui.separator();
                for screen in Screen::ALL {
                    if ui.selectable_label(active == screen, screen.label()).clicked() {
                        selected = Some(screen);
                    }
                }
            });
        if let Some(screen) = selected {
            self.console.navigate(screen);
        }
    }

    fn show_message_bar(&mut self, ctx: &egui::Context) {
        let Some((message, is_error)) = &self.message else {
            return;
        };
        let mut dismiss = false;
        egui::TopBottomPanel::bottom("message_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let color = if *is_error { RED } else { GREEN };
                ui.colored_label(color, message.as_str());
                if ui.small_button("✖").clicked() {
                    dismiss = true;
                }
            });
        });
        if dismiss {
            self.message = None;
        }
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        let stats = self.console.dashboard();
        if let Some(user) = self.console.current_user() {
            ui.label(format!("Welcome back, {}!", user.name));
        }
        ui.add_space(8.0);

        ui.horizontal_wrapped(|ui| {
            for (label, value) in stats.cards() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_min_width(170.0);
                    ui.vertical(|ui| {
                        ui.label(label);
                        ui.heading(value.to_string());
                    });
                });
            }
        });
        ui.add_space(12.0);

        let now = Utc::now();
        ui.columns(2, |columns| {
            columns[0].strong("Recent Activity");
            if self.console.activity().is_empty() {
                columns[0].weak("No activity yet.");
            }
            for entry in self.console.activity().entries() {
                columns[0].horizontal_wrapped(|ui| {
                    ui.label(entry.message());
                    ui.weak(relative_time(entry.at, now));
                });
            }

            columns[1].strong("Performance Overview");
            for (label, rate) in stats.rates() {
                columns[1].label(label);
                columns[1].add(
                    egui::ProgressBar::new(rate as f32 / 100.0).text(format!("{}%", rate)),
                );
            }
        });
    }

    fn open_create<E: ScreenView>(&mut self) {
        match self.console.open_create::<E>() {
            Ok(_) => {
                self.form_error = None;
                self.new_attachment.clear();
            }
            Err(e) => self.message = Some((e.to_string(), true)),
        }
    }

    fn open_edit<E: ScreenView>(&mut self, id: RecordId) {
        match self.console.open_edit::<E>(id) {
            Ok(_) => {
                self.form_error = None;
                self.new_attachment.clear();
            }
            Err(e) => self.message = Some((e.to_string(), true)),
        }
    }

    fn request_delete<E: ScreenView>(&mut self, id: RecordId) {
        if !self.console.config().confirm_deletes {
            self.delete_now(E::KIND, id);
            return;
        }
        let Some(name) = self.console.record_name(E::KIND, id) else {
            self.message = Some((format!("{} not found: {}", E::KIND, id), true));
            return;
        };
        self.pending_delete = Some(PendingDelete {
            kind: E::KIND,
            id,
            name,
            question: self.console.list::<E>().delete_prompt(),
        });
    }

    fn delete_now(&mut self, kind: EntityKind, id: RecordId) {
        match self.console.delete_kind(kind, id, |_| true) {
            Ok(Some(name)) => {
                self.message = Some((format!("{} \"{}\" deleted", kind, name), false));
            }
            Ok(None) => {}
            Err(e) => self.message = Some((e.to_string(), true)),
        }
    }

    fn export_tasks(&mut self, format: ExportFormat) {
        let default = self.console.default_export_path(format);
        let mut dialog = rfd::FileDialog::new()
            .add_filter(format.extension().to_uppercase(), &[format.extension()]);
        if let Some(name) = default.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        if let Some(dir) = default.parent() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        match self.console.export_tasks(format, Some(&path)) {
            Ok(written) => {
                self.message = Some((format!("Exported tasks to {}", written.display()), false));
            }
            Err(e) => self.message = Some((e.to_string(), true)),
        }
    }

    fn show_entity_screen<E: ScreenView>(&mut self, ui: &mut egui::Ui) {
        let kind = E::KIND;
        let mut add = false;
        let mut export = None;

        ui.horizontal(|ui| {
            let list = self.console.list_mut::<E>();
            let query = list.query_mut();
            ui.label("🔍");
            ui.add(
                egui::TextEdit::singleline(&mut query.search)
                    .hint_text(format!("Search {}s...", kind.noun()))
                    .desired_width(240.0),
            );
            E::filter_ui(ui, &mut query.filter);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(format!("➕ Add {}", kind)).clicked() {
                    add = true;
                }
                if kind == EntityKind::Task {
                    if ui.button("Export JSON").clicked() {
                        export = Some(ExportFormat::Json);
                    }
                    if ui.button("Export CSV").clicked() {
                        export = Some(ExportFormat::Csv);
                    }
                }
            });
        });
        ui.separator();

        if kind == EntityKind::Task {
            show_task_summary(ui, &self.console);
        }

        let rows: Vec<(RecordId, Vec<RichText>)> = self
            .console
            .list::<E>()
            .visible()
            .into_iter()
            .map(|r| (r.id(), r.cells()))
            .collect();

        // (id, is_delete)
        let mut clicked: Option<(RecordId, bool)> = None;

        if rows.is_empty() {
            ui.weak(format!("No {}s found.", kind.noun()));
        } else {
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
            for _ in E::COLUMNS {
                table = table.column(Column::auto().at_least(70.0));
            }
            table
                .column(Column::remainder())
                .header(22.0, |mut header| {
                    for title in E::COLUMNS {
                        header.col(|ui| {
                            ui.strong(*title);
                        });
                    }
                    header.col(|ui| {
                        ui.strong("Actions");
                    });
                })
                .body(|mut body| {
                    for (id, cells) in &rows {
                        body.row(26.0, |mut row| {
                            for cell in cells {
                                row.col(|ui| {
                                    ui.label(cell.clone());
                                });
                            }
                            row.col(|ui| {
                                if ui.small_button("✏ Edit").clicked() {
                                    clicked = Some((*id, false));
                                }
                                if ui.small_button("🗑 Delete").clicked() {
                                    clicked = Some((*id, true));
                                }
                            });
                        });
                    }
                });
        }

        if add {
            self.open_create::<E>();
        }
        if let Some(format) = export {
            self.export_tasks(format);
        }
        match clicked {
            Some((id, true)) => self.request_delete::<E>(id),
            Some((id, false)) => self.open_edit::<E>(id),
            None => {}
        }
    }

    fn show_editor<E: ScreenView>(&mut self, ctx: &egui::Context) {
        let list = self.console.list::<E>();
        let (Some(editor), Some(title)) = (list.editor(), list.editor_title()) else {
            return;
        };
        let submit_label = editor.submit_label();
        let projects: Vec<(RecordId, String)> = self
            .console
            .projects()
            .iter()
            .map(|p| (p.id, p.name.clone()))
            .collect();
        let today = self.console.today();

        let mut open = true;
        let mut submit = false;
        let mut cancel = false;
        let console = &mut self.console;
        let new_attachment = &mut self.new_attachment;
        let form_error = &self.form_error;

        egui::Window::new(title)
            .id(egui::Id::new(("editor", kind_id(E::KIND))))
            .collapsible(false)
            .resizable(true)
            .default_width(460.0)
            .open(&mut open)
            .show(ctx, |ui| {
                if let Some(form) = console.list_mut::<E>().form_mut() {
                    let mut aids = FormAids {
                        projects: &projects,
                        new_attachment: &mut *new_attachment,
                        today,
                    };
                    E::form_ui(ui, form, &mut aids);
                }
                if let Some(err) = form_error {
                    ui.colored_label(RED, err.as_str());
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(submit_label).clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            match self.console.submit::<E>() {
                Ok(submitted) => {
                    let verb = if submitted.created { "created" } else { "updated" };
                    self.message = Some((format!("{} {} successfully", E::KIND, verb), false));
                    self.form_error = None;
                    self.new_attachment.clear();
                }
                Err(e) => self.form_error = Some(e.to_string()),
            }
        } else if cancel || !open {
            self.console.cancel::<E>();
            self.form_error = None;
        }
    }

    fn show_delete_dialog(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending_delete else {
            return;
        };
        let mut confirmed = false;
        let mut dismissed = false;

        egui::Window::new("Confirm Delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(pending.question.as_str());
                ui.label(RichText::new(pending.name.as_str()).strong());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(RichText::new("Delete").color(RED)).clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        dismissed = true;
                    }
                });
            });

        if confirmed || dismissed {
            if let Some(pending) = self.pending_delete.take() {
                if confirmed {
                    self.delete_now(pending.kind, pending.id);
                }
            }
        }
    }
}

/// The four task cards over the visible task rows
fn show_task_summary(ui: &mut egui::Ui, console: &Console) {
    ui.horizontal_wrapped(|ui| {
        for (label, value) in console.task_summary().cards() {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_min_width(140.0);
                ui.vertical(|ui| {
                    ui.label(label);
                    ui.heading(value);
                });
            });
        }
    });
    ui.add_space(6.0);
}

fn kind_id(kind: EntityKind) -> &'static str {
    kind.noun()
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.console.session().is_authenticated() {
            self.show_sign_in(ctx);
            return;
        }

        let compact = ctx.screen_rect().width() < COMPACT_WIDTH;
        self.show_top_panel(ctx, compact);
        // Sign-out happened in the top panel
        if !self.console.session().is_authenticated() {
            return;
        }
        self.show_message_bar(ctx);
        if !compact || self.console.session().mobile_menu_open() {
            self.show_nav(ctx);
        }

        let screen = self.console.session().active_screen();
        egui::CentralPanel::default().show(ctx, |ui| match screen {
            Screen::Dashboard => {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_dashboard(ui));
            }
            Screen::Users => self.show_entity_screen::<User>(ui),
            Screen::Roles => self.show_entity_screen::<Role>(ui),
            Screen::Projects => self.show_entity_screen::<Project>(ui),
            Screen::Sprints => self.show_entity_screen::<Sprint>(ui),
            Screen::Tasks => self.show_entity_screen::<Task>(ui),
        });

        match screen {
            Screen::Users => self.show_editor::<User>(ctx),
            Screen::Roles => self.show_editor::<Role>(ctx),
            Screen::Projects => self.show_editor::<Project>(ctx),
            Screen::Sprints => self.show_editor::<Sprint>(ctx),
            Screen::Tasks => self.show_editor::<Task>(ctx),
            Screen::Dashboard => {}
        }
        self.show_delete_dialog(ctx);
    }
}
