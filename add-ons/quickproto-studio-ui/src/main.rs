//! QuickProto Studio: prompt → generated prototype → preview, plus quote requests.
//! All state lives in quickproto_core::SessionController; this file only draws it.

use eframe::egui;
use quickproto_core::{
    ClientConfig, DisplayStrategy, FilePreview, GeneratedArtifact, Notifier, PrototypeKind,
    PrototypeShell, SessionController,
};
use quickproto_studio_ui::{build_session, build_studio_stack, shell::show_shell, StudioConfig};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[quickproto-studio] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client_config = match ClientConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid QuickProto configuration");
            std::process::exit(2);
        }
    };
    let stack = match build_studio_stack(client_config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to start request runtime");
            std::process::exit(2);
        }
    };

    let studio_config = StudioConfig::load();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([studio_config.window_width, studio_config.window_height])
            .with_title("QuickProto Studio"),
        ..Default::default()
    };

    eframe::run_native(
        "QuickProto Studio",
        options,
        Box::new(move |cc| {
            if studio_config.theme_dark {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            }
            let repaint = cc.egui_ctx.clone();
            let notifier: Notifier = Arc::new(move || repaint.request_repaint());
            let session = build_session(&stack, notifier);
            Ok(Box::new(StudioApp::new(session, stack, studio_config)))
        }),
    )
}

struct StudioApp {
    session: SessionController<FilePreview>,
    /// Request tasks run here; kept alive for the whole window lifetime.
    _stack: quickproto_studio_ui::StudioStack,
    config: StudioConfig,
    quote_floor_secs: u64,
    /// Last failure to launch the system browser (preview or quote).
    open_error: Option<String>,
}

impl StudioApp {
    fn new(
        session: SessionController<FilePreview>,
        stack: quickproto_studio_ui::StudioStack,
        config: StudioConfig,
    ) -> Self {
        Self {
            session,
            quote_floor_secs: stack.config.quote_loading_floor_secs,
            _stack: stack,
            config,
            open_error: None,
        }
    }

    fn open_external(&mut self, path: &Path) {
        let target = path.to_string_lossy();
        match webbrowser::open(&target) {
            Ok(()) => self.open_error = None,
            Err(e) => {
                tracing::warn!(path = %target, error = %e, "could not open system browser");
                self.open_error = Some(format!("Could not open {}: {}", target, e));
            }
        }
    }

    fn prompt_section(&mut self, ui: &mut egui::Ui) {
        ui.add_sized(
            [ui.available_width(), 90.0],
            egui::TextEdit::multiline(self.session.prompt_mut())
                .hint_text("Describe your prototype idea...")
                .desired_rows(4),
        );
        ui.add_space(4.0);
        let generating = self.session.is_generating();
        let label = if generating {
            "Generating..."
        } else {
            "Generate Prototype"
        };
        ui.horizontal(|ui| {
            if ui.add_enabled(!generating, egui::Button::new(label)).clicked() {
                self.session.submit_prompt();
            }
            if generating {
                ui.spinner();
            }
        });
    }

    fn editor_section(&self, ui: &mut egui::Ui, artifact: &GeneratedArtifact) {
        let mode = self
            .session
            .syntax_mode()
            .map(|m| m.label().to_string())
            .unwrap_or_else(|| "plain text".to_string());
        ui.label(egui::RichText::new(format!("Source ({mode}, read-only)")).small().weak());
        egui::ScrollArea::vertical()
            .id_salt("code_editor")
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut artifact.code.as_str())
                        .code_editor()
                        .desired_rows(self.config.editor_rows)
                        .desired_width(f32::INFINITY),
                );
            });
    }

    fn preview_section(&mut self, ui: &mut egui::Ui, artifact: &GeneratedArtifact) {
        if let Some(prelude) = artifact.prelude() {
            ui.heading("Prelude:");
            egui::ScrollArea::vertical()
                .id_salt("prelude")
                .max_height(140.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(prelude).monospace());
                });
            ui.add_space(8.0);
        }

        ui.heading("Prototype Preview:");
        let mut display = self.session.display();
        egui::ComboBox::from_id_salt(egui::Id::new("display_strategy"))
            .selected_text(display.label())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut display, DisplayStrategy::Generic, DisplayStrategy::Generic.label());
                for kind in PrototypeKind::ALL {
                    let option = DisplayStrategy::Variant(kind);
                    ui.selectable_value(&mut display, option, option.label());
                }
            });
        self.session.set_display(display);

        let location = self.session.preview_location().map(Path::to_path_buf);
        if let Some(path) = location {
            ui.horizontal(|ui| {
                if ui.button("Open preview").clicked() {
                    self.open_external(&path);
                }
                ui.label(egui::RichText::new(path.display().to_string()).small());
            });
        }

        if let DisplayStrategy::Variant(kind) = display {
            ui.add_space(6.0);
            show_shell(ui, &PrototypeShell::new(kind, &artifact.code));
        }
    }

    fn quote_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Get Quote");
        let loading = self.session.is_quote_loading();
        let label = if loading {
            format!("Loading... This usually takes {} seconds", self.quote_floor_secs)
        } else {
            "Get Quote".to_string()
        };
        ui.horizontal(|ui| {
            if ui.add_enabled(!loading, egui::Button::new(label)).clicked() {
                self.session.request_quote();
            }
            if loading {
                ui.spinner();
            }
        });

        let quote = self
            .session
            .quote()
            .map(|q| (q.path().to_path_buf(), q.size(), q.received_at()));
        if let Some((path, size, received_at)) = quote {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Quote PDF:").strong());
            ui.horizontal(|ui| {
                if ui.button("Open quote").clicked() {
                    self.open_external(&path);
                }
                ui.label(
                    egui::RichText::new(format!(
                        "{} ({} bytes, received {})",
                        path.display(),
                        size,
                        received_at.format("%H:%M:%S")
                    ))
                    .small(),
                );
            });
        }
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.pump();
        if self.session.is_quote_loading() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        egui::TopBottomPanel::top("studio_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("QuickProto Studio");
                ui.label(format!("v{}", quickproto_core::version()));
            });
        });

        egui::TopBottomPanel::bottom("quote_panel")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                self.quote_section(ui);
                ui.add_space(4.0);
            });

        let artifact = self.session.artifact().cloned();

        egui::SidePanel::left("prompt_panel")
            .resizable(true)
            .default_width(self.config.window_width * 0.5)
            .show(ctx, |ui| {
                self.prompt_section(ui);
                if let Some(ref artifact) = artifact {
                    ui.add_space(8.0);
                    ui.separator();
                    self.editor_section(ui, artifact);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = self.session.error() {
                ui.label(egui::RichText::new(err).color(egui::Color32::RED));
            }
            if let Some(err) = &self.open_error {
                ui.label(egui::RichText::new(err.as_str()).small().color(egui::Color32::LIGHT_RED));
            }
            if let Some(ref artifact) = artifact {
                self.preview_section(ui, artifact);
            }
        });
    }
}
