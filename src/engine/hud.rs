// Presentation layer: egui overlay driven by engine events.
//
// The engine pushes events into `HudModel`; the overlay draws from the model
// and hands back UI signals (confirm, close) and touch-button changes. The
// engine never knows which widgets exist.

use egui::epaint::Shadow;

use super::events::{EngineEvent, Telemetry, ZoneSummary};
use super::input::Action;
use super::level::ZoneContent;

pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub instance_count: usize,
    pub draw_calls: u32,
    pub resolution: (u32, u32),
}

/// Signals the UI feeds back into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiSignal {
    Confirm,
    Close,
}

/// Everything the overlay produced this frame.
#[derive(Debug, Default)]
pub struct HudOutput {
    pub signals: Vec<UiSignal>,
    /// Touch buttons whose held state changed: (action, pressed).
    pub touch: Vec<(Action, bool)>,
}

// ============================================================================
// MODEL
// ============================================================================

/// UI state rebuilt purely from engine events.
#[derive(Debug, Default)]
pub struct HudModel {
    pub zone: Option<ZoneSummary>,
    pub show_prompt: bool,
    pub modal_open: bool,
    /// Kept after close so the panel can fade out with its text intact.
    pub panel: Option<ZoneContent>,
    pub telemetry: Option<Telemetry>,
}

impl HudModel {
    pub fn apply(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::ZoneChanged { zone, show_prompt } => {
                self.zone = zone.clone();
                self.show_prompt = *show_prompt;
            }
            EngineEvent::ModalOpened { content, .. } => {
                self.modal_open = true;
                self.panel = Some(content.clone());
            }
            EngineEvent::ModalClosed { .. } => {
                self.modal_open = false;
            }
            EngineEvent::TelemetryUpdated(telemetry) => {
                self.telemetry = Some(telemetry.clone());
            }
        }
    }
}

const TOUCH_BUTTONS: [(Action, &str); 6] = [
    (Action::TurnLeft, "◀"),
    (Action::Forward, "▲"),
    (Action::Backward, "▼"),
    (Action::TurnRight, "▶"),
    (Action::Confirm, "E"),
    (Action::Cancel, "✕"),
];

// ============================================================================
// OVERLAY
// ============================================================================

pub struct Hud {
    pub show_stats: bool,
    pub show_touch: bool,
    pub model: HudModel,
    touch_held: [bool; 6],
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Hud {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, white text
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(10, 10, 16, 230);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            show_stats: false,
            show_touch: true,
            model: HudModel::default(),
            touch_held: [false; 6],
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Build and paint one egui frame on top of the scene.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        close_delay: f32,
        stats: Option<&DebugStats>,
    ) -> HudOutput {
        let raw_input = self.egui_state.take_egui_input(window);
        let mut output = HudOutput::default();
        let mut touch_now = [false; 6];

        let model = &self.model;
        let show_stats = self.show_stats;
        let show_touch = self.show_touch;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            // ── Telemetry ────────────────────────────────────────────────────
            if let Some(t) = &model.telemetry {
                egui::Area::new(egui::Id::new("telemetry"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        panel_frame().show(ui, |ui: &mut egui::Ui| {
                            ui.label(format!("X {:>7.2}   Z {:>7.2}", t.x, t.z));
                            ui.label(t.zone_label.as_deref().unwrap_or("—"));
                            if let Some(stats) = stats.filter(|_| show_stats) {
                                ui.separator();
                                ui.label(format!(
                                    "FPS: {}  ({:.2} ms)",
                                    stats.fps, stats.frame_time_avg_ms
                                ));
                                ui.label(format!(
                                    "Instances: {}  Draw calls: {}",
                                    stats.instance_count, stats.draw_calls
                                ));
                                ui.label(format!(
                                    "Resolution: {} x {}",
                                    stats.resolution.0, stats.resolution.1
                                ));
                                ui.label(format!("Heading: {:.2}  Speed: {:.3}", t.heading, t.speed));
                            }
                        });
                    });
            }

            // ── Zone label and interact prompt ───────────────────────────────
            if let Some(zone) = &model.zone {
                if !model.modal_open {
                    egui::Area::new(egui::Id::new("zone_prompt"))
                        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -96.0))
                        .show(ctx, |ui| {
                            panel_frame().show(ui, |ui: &mut egui::Ui| {
                                ui.vertical_centered(|ui| {
                                    ui.strong(zone.label.as_str());
                                    ui.small(zone.subtitle.as_str());
                                    if model.show_prompt && ui.button("Press E to enter").clicked() {
                                        output.signals.push(UiSignal::Confirm);
                                    }
                                });
                            });
                        });
                }
            }

            // ── Content panel with backdrop ──────────────────────────────────
            let opacity = ctx.animate_bool_with_time(
                egui::Id::new("panel_fade"),
                model.modal_open,
                close_delay,
            );
            if let (Some(content), true) = (&model.panel, opacity > 0.0) {
                egui::Area::new(egui::Id::new("backdrop"))
                    .order(egui::Order::Middle)
                    .fixed_pos(egui::Pos2::ZERO)
                    .show(ctx, |ui| {
                        let screen = ctx.screen_rect();
                        let response = ui.allocate_rect(screen, egui::Sense::click());
                        let alpha = (opacity * 150.0) as u8;
                        ui.painter().rect_filled(
                            screen,
                            0.0,
                            egui::Color32::from_rgba_unmultiplied(0, 0, 0, alpha),
                        );
                        if response.clicked() && model.modal_open {
                            output.signals.push(UiSignal::Close);
                        }
                    });

                egui::Area::new(egui::Id::new("content_panel"))
                    .order(egui::Order::Foreground)
                    .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                    .show(ctx, |ui| {
                        ui.set_opacity(opacity);
                        panel_frame()
                            .inner_margin(egui::Margin::same(20.0))
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.set_max_width(420.0);
                                ui.heading(content.title.as_str());
                                ui.label(egui::RichText::new(content.subtitle.as_str()).italics());
                                ui.add_space(8.0);
                                ui.label(content.body.as_str());
                                ui.add_space(12.0);
                                if ui.button("Close").clicked() && model.modal_open {
                                    output.signals.push(UiSignal::Close);
                                }
                            });
                    });
            }

            // ── Touch controls ───────────────────────────────────────────────
            if show_touch {
                egui::Area::new(egui::Id::new("touch_controls"))
                    .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
                    .order(egui::Order::Foreground)
                    .show(ctx, |ui| {
                        ui.horizontal(|ui| {
                            for (slot, (_, label)) in TOUCH_BUTTONS.iter().enumerate() {
                                let button = egui::Button::new(egui::RichText::new(*label).size(20.0));
                                let response = ui.add_sized([48.0, 48.0], button);
                                touch_now[slot] = response.is_pointer_button_down_on();
                            }
                        });
                    });
            }
        });

        for (slot, (action, _)) in TOUCH_BUTTONS.iter().enumerate() {
            if touch_now[slot] != self.touch_held[slot] {
                self.touch_held[slot] = touch_now[slot];
                output.touch.push((*action, touch_now[slot]));
            }
        }

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output
    }
}

fn panel_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
        .inner_margin(egui::Margin::same(8.0))
        .rounding(4.0)
}
