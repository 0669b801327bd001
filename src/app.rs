use std::time::Duration;

use egui::{Event, Rect, pos2};

use crate::command::Command;
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::FlipbookError;
use crate::input::command_for_key;
use crate::panels::{central_panel, tools_panel};
use crate::raster::PixelCanvas;
use crate::texture_manager::TextureManager;

pub struct FlipbookApp {
    editor: Editor<PixelCanvas>,
    config: EditorConfig,
    textures: TextureManager,
    /// The current primary press started on the canvas
    pressing_on_canvas: bool,
}

impl FlipbookApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, FlipbookError> {
        let stored = cc
            .storage
            .and_then(|storage| eframe::get_value::<EditorConfig>(storage, eframe::APP_KEY));
        let config = match stored {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(err) => {
                    log::warn!("Ignoring stored settings: {err}");
                    EditorConfig::default()
                }
            },
            None => EditorConfig::default(),
        };

        let mut app = Self::with_config(config)?;
        let now = Duration::from_secs_f64(cc.egui_ctx.input(|i| i.time));
        app.editor.start(now);
        Ok(app)
    }

    /// Builds the app without a window, with a stopped scheduler
    pub fn with_config(config: EditorConfig) -> Result<Self, FlipbookError> {
        let editor = Editor::new(&config)?;
        log::info!(
            "Flipbook ready: {}x{} canvas, {} undo steps",
            config.canvas_width,
            config.canvas_height,
            config.history_depth
        );
        Ok(Self {
            editor,
            config,
            textures: TextureManager::new(),
            pressing_on_canvas: false,
        })
    }

    pub fn editor(&self) -> &Editor<PixelCanvas> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor<PixelCanvas> {
        &mut self.editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub(crate) fn canvas_parts(&mut self) -> (&Editor<PixelCanvas>, &mut TextureManager) {
        (&self.editor, &mut self.textures)
    }

    /// Settings worth restoring on the next launch
    fn current_config(&self) -> EditorConfig {
        let flipbook = self.editor.flipbook();
        let settings = flipbook.current().settings();
        EditorConfig {
            onion_skin: flipbook.onion_skin(),
            stroke_color: settings.stroke_color,
            stroke_width: settings.stroke_width,
            ..self.config.clone()
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let typing = ctx.wants_keyboard_input();
        let (shift, commands) = ctx.input(|i| {
            let mut commands = Vec::new();
            if !typing {
                for event in &i.events {
                    match event {
                        Event::Key {
                            key,
                            pressed: true,
                            modifiers,
                            ..
                        } => {
                            // Clipboard shortcuts also arrive as their own events below.
                            if let Some(command) = command_for_key(*key, *modifiers) {
                                if !matches!(command, Command::Copy | Command::Cut | Command::Paste) {
                                    commands.push(command);
                                }
                            }
                        }
                        Event::Copy => commands.push(Command::Copy),
                        Event::Cut => commands.push(Command::Cut),
                        Event::Paste(_) => commands.push(Command::Paste),
                        _ => {}
                    }
                }
            }
            (i.modifiers.shift, commands)
        });

        self.editor.set_shift(shift);
        for command in commands {
            log::debug!("Key command: {:?}", command);
            self.editor.execute(command);
        }
    }

    pub(crate) fn handle_pointer(&mut self, ctx: &egui::Context, canvas_rect: Rect, now: Duration) {
        let (pos, down, pressed) = ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_down(),
                i.pointer.primary_pressed(),
            )
        });

        if pressed {
            self.pressing_on_canvas = pos.is_some_and(|pos| canvas_rect.contains(pos));
        }
        if !down {
            self.pressing_on_canvas = false;
        }

        let Some(pos) = pos else {
            return;
        };
        let local = pos2(pos.x - canvas_rect.min.x, pos.y - canvas_rect.min.y);
        self.editor.pointer(local, down && self.pressing_on_canvas, now);
    }
}

impl eframe::App for FlipbookApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.current_config());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(ctx.input(|i| i.time));

        self.handle_keys(ctx);
        tools_panel(self, ctx);
        central_panel(self, ctx, now);
        self.editor.update(now);

        // The scheduler is polled from here, so keep frames coming.
        ctx.request_repaint();
    }
}
