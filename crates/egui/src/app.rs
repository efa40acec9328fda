use board_core::{
    AudioBackend, Catalog, CpalBackend, FileStore, KeyValueStore, PressAnimation, RecordingStore,
    SoundBoard,
};
use eframe::egui;

use crate::config::Config;

const BUTTON_HEIGHT: f32 = 48.0;
const BUTTON_SPACING: f32 = 10.0;
const CORNER_RADIUS: f32 = 5.0;
const MAX_FRAME_DT: f32 = 0.1;

const SOUND_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0x7b, 0xff);
const RECORD_COLOR: egui::Color32 = egui::Color32::from_rgb(0x28, 0xa7, 0x45);
const STOP_COLOR: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x35, 0x45);

pub fn build_board(config: &Config) -> SoundBoard<CpalBackend, FileStore> {
    let backend = CpalBackend::new(config.backend_config());
    let store = RecordingStore::new(FileStore::new(&config.data_dir));
    let catalog = Catalog::with_default_sounds(&config.assets_dir);

    let mut board = SoundBoard::new(backend, store, catalog);
    board.load_initial();
    board
}

pub struct SoundBoardApp<A: AudioBackend, S: KeyValueStore> {
    board: SoundBoard<A, S>,
    animations: Vec<PressAnimation>,
}

impl<A: AudioBackend, S: KeyValueStore> SoundBoardApp<A, S> {
    pub fn new(board: SoundBoard<A, S>) -> Self {
        Self {
            board,
            animations: Vec::new(),
        }
    }

    fn clip_buttons(&mut self, ui: &mut egui::Ui, dt: f32) -> bool {
        let count = self.board.catalog().len();
        self.animations.resize_with(count, PressAnimation::new);

        let mut animating = false;
        let mut play_requests = Vec::new();

        for (index, clip) in self.board.catalog().clips().enumerate() {
            let label = if clip.synced {
                clip.name.clone()
            } else {
                format!("{} (unsaved)", clip.name)
            };

            let size = egui::vec2(ui.available_width(), BUTTON_HEIGHT);
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

            let anim = &mut self.animations[index];
            let held = response.is_pointer_button_down_on();
            if held && !anim.is_pressed() {
                anim.press();
            } else if !held && anim.is_pressed() {
                anim.release();
            }
            animating |= anim.step(dt);

            paint_button(ui, rect, anim.scale(), &label, SOUND_COLOR);

            if response.clicked() {
                play_requests.push(index);
            }
            ui.add_space(BUTTON_SPACING);
        }

        for index in play_requests {
            self.board.play(index);
        }

        animating
    }

    fn record_controls(&mut self, ui: &mut egui::Ui) {
        let size = egui::vec2(ui.available_width(), BUTTON_HEIGHT);

        let start = egui::Button::new(button_text("Start Recording"))
            .fill(RECORD_COLOR)
            .corner_radius(CORNER_RADIUS)
            .min_size(size);
        if ui.add_enabled(self.board.can_start(), start).clicked() {
            self.board.start_recording();
        }

        ui.add_space(BUTTON_SPACING);

        let stop = egui::Button::new(button_text("Stop Recording"))
            .fill(STOP_COLOR)
            .corner_radius(CORNER_RADIUS)
            .min_size(size);
        if ui.add_enabled(self.board.can_stop(), stop).clicked() {
            self.board.stop_recording();
        }

        if self.board.is_recording() {
            ui.add_space(BUTTON_SPACING);
            ui.colored_label(STOP_COLOR, "● Recording…");
        }

        if self.board.catalog().has_unsynced() {
            ui.add_space(BUTTON_SPACING);
            if ui.button("Retry save").clicked() {
                self.board.sync();
            }
        }
    }

    fn alert_window(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.board.pending_alert().cloned() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(alert.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(alert.message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.board.dismiss_alert();
        }
    }
}

impl<A: AudioBackend, S: KeyValueStore> eframe::App for SoundBoardApp<A, S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.board.maintain();

        let dt = ctx.input(|i| i.stable_dt).min(MAX_FRAME_DT);
        let frame = egui::Frame::central_panel(&ctx.style()).fill(egui::Color32::WHITE);
        let mut animating = false;

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.add_space(100.0);
            ui.vertical_centered(|ui| {
                ui.set_max_width(ui.available_width() * 0.75);
                egui::ScrollArea::vertical().show(ui, |ui| {
                    animating = self.clip_buttons(ui, dt);
                    self.record_controls(ui);
                });
            });
        });

        self.alert_window(ctx);

        if animating {
            ctx.request_repaint();
        }
    }
}

fn button_text(text: &str) -> egui::RichText {
    egui::RichText::new(text)
        .color(egui::Color32::WHITE)
        .size(16.0)
        .strong()
}

/// Draw a filled button scaled about its center.
fn paint_button(ui: &egui::Ui, rect: egui::Rect, scale: f32, label: &str, fill: egui::Color32) {
    let scaled = egui::Rect::from_center_size(rect.center(), rect.size() * scale);
    let painter = ui.painter();
    painter.rect_filled(scaled, CORNER_RADIUS * scale, fill);
    painter.text(
        scaled.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(16.0 * scale),
        egui::Color32::WHITE,
    );
}
