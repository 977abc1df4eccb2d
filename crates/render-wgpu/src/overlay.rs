/// Tessellated egui output waiting to be drawn over the next frame.
pub struct GuiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl GuiFrame {
    /// Tessellate the output of one `egui::Context::run`.
    pub fn from_output(ctx: &egui::Context, output: egui::FullOutput) -> Self {
        let primitives = ctx.tessellate(output.shapes, output.pixels_per_point);
        Self {
            primitives,
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        }
    }

    /// Fold an undrawn frame into this one. Its shapes are stale, but its
    /// texture uploads and frees are not: egui sends each of them once.
    pub(crate) fn absorb(mut self, pending: Option<GuiFrame>) -> Self {
        if let Some(mut pending) = pending {
            let mut delta = std::mem::take(&mut pending.textures_delta);
            delta.append(std::mem::take(&mut self.textures_delta));
            self.textures_delta = delta;
        }
        self
    }
}

/// egui pass drawn straight onto the surface after tone mapping.
pub(crate) struct GuiOverlay {
    renderer: egui_wgpu::Renderer,
}

impl GuiOverlay {
    pub(crate) fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: egui_wgpu::Renderer::new(device, format, None, 1, false),
        }
    }

    pub(crate) fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        frame: &GuiFrame,
    ) {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };
        for (id, delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let extra = self
            .renderer
            .update_buffers(device, queue, encoder, &frame.primitives, &screen);
        if !extra.is_empty() {
            queue.submit(extra);
        }
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("gui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer.render(&mut pass, &frame.primitives, &screen);
        }
    }

    /// Release textures egui no longer needs. Call after the frame was submitted.
    pub(crate) fn free(&mut self, frame: &GuiFrame) {
        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
