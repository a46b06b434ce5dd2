use eframe::egui;
use image::RgbImage;
use std::path::PathBuf;

use crate::core::{AppConfig, RenderedFrame, SessionState, ViewerCommand, ViewerError, ViewerSession};
use crate::gui::controls::ControlsPanel;
use crate::hotkeys::{KeyAction, KeyBindings};
use crate::video::MotionDetector;

pub struct FrameCruiserApp {
    pub config: AppConfig,
    pub session: ViewerSession,
    pub controls: ControlsPanel,
    /// Caption of the frame on screen, e.g. `[3/120] /events/00003-capture.jpg`.
    pub caption: String,
    pub status_message: String,
    pub region_count: usize,
    pub texture: Option<egui::TextureHandle>,
    /// Decoded frame waiting to be uploaded on the next repaint.
    pub pending_image: Option<RgbImage>,
    /// Config changed and should be written back on the next repaint.
    pub config_dirty: bool,
}

impl FrameCruiserApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        detector: Box<dyn MotionDetector>,
        startup_directory: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut app = Self::with_session(config, detector);
        if let Some(dir) = startup_directory {
            app.handle_command(ViewerCommand::OpenDirectory(dir));
        }
        Ok(app)
    }

    /// Builds the app state without a window.
    pub fn with_session(config: AppConfig, detector: Box<dyn MotionDetector>) -> Self {
        let session = ViewerSession::new(&config, detector);
        let controls = ControlsPanel::new(session.step_size());
        Self {
            config,
            session,
            controls,
            caption: String::new(),
            status_message: String::new(),
            region_count: 0,
            texture: None,
            pending_image: None,
            config_dirty: false,
        }
    }

    pub fn handle_command(&mut self, command: ViewerCommand) {
        let opened = match command {
            ViewerCommand::OpenDirectory(ref path) => Some(path.clone()),
            _ => None,
        };
        if let ViewerCommand::SetStepSize(step_size) = command {
            self.config.step_size = step_size.get();
            self.config_dirty = true;
        }

        match self.session.dispatch(command) {
            Ok(Some(frame)) => {
                if let Some(dir) = opened {
                    self.status_message = format!("Found {} jpg images", frame.total);
                    self.config.last_directory = Some(dir);
                    self.config_dirty = true;
                } else {
                    self.status_message.clear();
                }
                self.show_frame(frame);
            }
            Ok(None) => {}
            Err(e @ ViewerError::OutOfBounds { .. }) => {
                log::debug!("Navigation ignored: {}", e);
                self.status_message = e.to_string();
            }
            Err(e) => {
                log::error!("{}", e);
                self.status_message = e.to_string();
                // New directory loaded but its first frame failed to decode
                if self.session.state() == SessionState::Ready && self.session.current_index().is_none() {
                    self.texture = None;
                    self.caption.clear();
                    self.region_count = 0;
                }
            }
        }
    }

    fn show_frame(&mut self, frame: RenderedFrame) {
        self.caption = frame.caption;
        self.region_count = frame.regions.len();
        self.pending_image = Some(frame.image);
    }

    fn open_directory_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Open directory")
            .set_directory(self.config.dialog_start_directory())
            .pick_folder();

        match picked {
            Some(dir) => {
                log::info!("Selected working dir: {}", dir.display());
                self.handle_command(ViewerCommand::OpenDirectory(dir));
            }
            None => log::debug!("Directory selection cancelled"),
        }
    }

    fn upload_pending_image(&mut self, ctx: &egui::Context) {
        if let Some(image) = self.pending_image.take() {
            let size = [image.width() as usize, image.height() as usize];
            let color_image = egui::ColorImage::from_rgb(size, image.as_raw());
            match self.texture {
                Some(ref mut texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture = Some(ctx.load_texture("current_frame", color_image, egui::TextureOptions::LINEAR));
                }
            }
        }
    }

    fn flush_config(&mut self) {
        if self.config_dirty {
            self.config_dirty = false;
            if let Err(e) = self.config.save() {
                log::error!("Failed to save config: {}", e);
            } else {
                log::debug!("Config saved");
            }
        }
    }

    fn handle_key_actions(&mut self, ctx: &egui::Context) {
        for action in KeyBindings::collect(ctx) {
            match action.to_command() {
                Some(command) => self.handle_command(command),
                None if action == KeyAction::OpenDirectory => self.open_directory_dialog(),
                None => {}
            }
        }
    }

    fn motion_label(&self) -> &'static str {
        if self.session.motion_available() {
            "Motion highlight: on"
        } else {
            "Motion highlight: off"
        }
    }
}

impl eframe::App for FrameCruiserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_key_actions(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add(egui::Button::new("Open").shortcut_text("Ctrl+O")).clicked() {
                        ui.close_menu();
                        self.open_directory_dialog();
                    }

                    ui.separator();

                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.session.directory() {
                        Some(dir) => ui.label(format!("📁 {}", dir.display())),
                        None => ui.label("❌ No directory selected"),
                    };
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.caption.is_empty() {
                    ui.label("Ready");
                } else {
                    ui.label(&self.caption);
                }
                if !self.status_message.is_empty() {
                    ui.separator();
                    ui.label(&self.status_message);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.motion_label());
                    if self.region_count > 0 {
                        ui.label(format!("{} changed regions", self.region_count));
                    }
                });
            });
        });

        let ready = self.session.state() == SessionState::Ready;
        let total = self.session.frame_count();
        let mut requested = None;
        egui::SidePanel::right("controls")
            .resizable(false)
            .default_width(160.0)
            .show(ctx, |ui| {
                requested = self.controls.show(ui, ready, total);
            });
        if let Some(command) = requested {
            self.handle_command(command);
        }

        self.upload_pending_image(ctx);

        let frame_texture = self
            .texture
            .as_ref()
            .filter(|_| ready)
            .map(egui::load::SizedTexture::from_handle);

        egui::CentralPanel::default().show(ctx, |ui| {
            match frame_texture {
                Some(texture) => {
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Image::from_texture(texture).shrink_to_fit());
                    });
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.heading("ZM Frame Cruiser");
                            ui.label("Open a directory of .jpg frames from the File menu (Ctrl+O).");
                            ui.add_space(20.0);
                            if ui.button("📁 Open Directory").clicked() {
                                self.open_directory_dialog();
                            }
                        });
                    });
                }
            }
        });

        self.flush_config();
    }
}
