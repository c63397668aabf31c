//! egui rendering for the password dialog.
//!
//! Contains the main panel (profile selector, description, password field,
//! buttons), the delete confirmation and the time-sync alert.

use super::icons::IconCache;
use super::state::{DialogPhase, PasswordDialog};

const LOCKED_MARKER: &str = "🔒";

impl PasswordDialog {
    /// Render the dialog for one frame
    pub fn show(&mut self, ctx: &egui::Context, icons: &mut IconCache) {
        if self.is_closed() {
            return;
        }

        let modal_open =
            self.phase() == DialogPhase::Deleting || self.active_time_warning().is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| self.render_main(ui, icons));
        });

        if self.phase() == DialogPhase::Deleting {
            self.render_delete_confirmation(ctx);
        } else if self.active_time_warning().is_some() {
            self.render_time_warning(ctx);
        } else if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.reject();
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui, icons: &mut IconCache) {
        let tr = self.translator().clone();

        ui.add_space(4.0);
        ui.label(tr.tr("SELECT_PROFILE", "Profile:"));
        self.render_profile_selector(ui, icons);
        ui.add_space(8.0);

        if self.description_visible() {
            self.render_description(ui, &tr.tr(
                "PASSWORD_DESCRIPTION",
                "The password encrypts your API keys on this computer. \
                 It is never sent anywhere and cannot be recovered.",
            ));
            ui.add_space(8.0);
        }

        ui.label(tr.tr("ENTER_PASSWORD", "Password:"));
        let mut password = self.password().to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut password)
                .password(true)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.set_password(password);
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.confirm();
        }
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.can_confirm(), egui::Button::new(tr.tr("OK", "OK")))
                .clicked()
            {
                self.confirm();
            }
            if ui
                .button(tr.tr("ADD_NEW_PROFILE", "Add new profile"))
                .clicked()
            {
                self.add_new_profile();
            }
            if ui
                .add_enabled(
                    self.selected_index().is_some(),
                    egui::Button::new(tr.tr("DELETE_PROFILE", "Delete profile")),
                )
                .clicked()
            {
                self.request_delete();
            }
            if ui.button(tr.tr("CANCEL", "Cancel")).clicked() {
                self.reject();
            }
        });
    }

    fn render_profile_selector(&mut self, ui: &mut egui::Ui, icons: &mut IconCache) {
        let selected_text = self
            .selected_entry()
            .map(|e| e.label.clone())
            .unwrap_or_default();
        let mut clicked = None;

        ui.horizontal(|ui| {
            if let Some(entry) = self.selected_entry() {
                icons.show(ui, &entry.icon);
            }
            egui::ComboBox::from_id_salt("profile_selector")
                .width(ui.available_width())
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (index, entry) in self.entries().iter().enumerate() {
                        ui.horizontal(|ui| {
                            icons.show(ui, &entry.icon);
                            let label = if entry.locked {
                                format!("{} {}", entry.label, LOCKED_MARKER)
                            } else {
                                entry.label.clone()
                            };
                            let is_selected = self.selected_index() == Some(index);
                            ui.add_enabled_ui(!entry.locked, |ui| {
                                if ui.selectable_label(is_selected, label).clicked() {
                                    clicked = Some(index);
                                }
                            });
                        });
                    }
                });
        });

        if let Some(index) = clicked {
            self.select(index);
        }
    }

    fn render_description(&mut self, ui: &mut egui::Ui, text: &str) {
        egui::Frame::group(ui.style())
            .fill(egui::Color32::from_rgba_unmultiplied(40, 40, 40, 255))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(text).small());
                    if ui.small_button("✖").clicked() {
                        self.dismiss_description();
                    }
                });
            });
    }

    /// Render delete confirmation dialog; "Yes" is the default answer
    fn render_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.delete_prompt() else {
            self.cancel_delete();
            return;
        };
        let tr = self.translator().clone();
        let mut answer = None;

        egui::Window::new(tr.tr("DELETE_PROFILE", "Delete profile"))
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(prompt);
                    ui.add_space(16.0);
                    ui.horizontal(|ui| {
                        let yes = ui.button(tr.tr("YES", "Yes"));
                        yes.request_focus();
                        if yes.clicked() {
                            answer = Some(true);
                        }
                        if ui.button(tr.tr("NO", "No")).clicked() {
                            answer = Some(false);
                        }
                    });
                });
            });

        if answer.is_none() {
            if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
                answer = Some(true);
            } else if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                answer = Some(false);
            }
        }

        match answer {
            Some(true) => self.confirm_delete(),
            Some(false) => self.cancel_delete(),
            None => {}
        }
    }

    fn render_time_warning(&mut self, ctx: &egui::Context) {
        let Some(message) = self.active_time_warning().map(str::to_string) else {
            return;
        };
        let tr = self.translator().clone();
        let mut dismissed = false;

        egui::Window::new(tr.tr("TIME_ERROR", "Time error"))
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(format!("⚠ {}", message))
                            .color(egui::Color32::YELLOW),
                    );
                    ui.add_space(12.0);
                    if ui.button(tr.tr("OK", "OK")).clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed
            || ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape))
        {
            self.dismiss_time_warning();
        }
    }
}
