//! Glint Runtime
//!
//! Loads settings, opens a context on the recording device and replays a
//! short session, then reports how many calls reached the device.
//!
//! Usage: `glint [settings.json]`

use anyhow::{Context as _, Result};
use glint_render::{
    BlendEquation, BlendFunction, BufferTarget, BufferUsage, ColorAttachment, Context,
    DeviceCall, RecordingDevice, Renderable, RenderState, TextureDescriptor,
};
use glint_services::Settings;

fn main() -> Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    };

    let level: tracing::Level = settings
        .logging
        .level
        .parse()
        .with_context(|| format!("unknown log level {:?}", settings.logging.level))?;
    tracing_subscriber::fmt().with_max_level(level).init();

    tracing::info!("Glint v{}", glint_core::VERSION);

    let mut ctx = Context::new(RecordingDevice::new(), &settings.context)?;
    tracing::info!(
        context = %ctx.id(),
        texture_units = ctx.texture_units().len(),
        color_attachments = ctx.framebuffer_color_attachment_points().len(),
        max_texture_size = ctx.texture_maximum_size(),
        "context ready"
    );

    replay_blending(&mut ctx)?;
    replay_offscreen_pass(&mut ctx)?;

    let device = ctx.device();
    let state_changes = device.count(|call| {
        !matches!(
            call,
            DeviceCall::CreateObject(_)
                | DeviceCall::CreateShader(..)
                | DeviceCall::DeleteObject(_)
                | DeviceCall::BufferUpdate(..)
        )
    });
    tracing::info!(
        recorded = device.calls().len(),
        state_changes,
        issued = ctx.counters().get(glint_metrics::ISSUED),
        elided = ctx.counters().get(glint_metrics::ELIDED),
        live = ctx.live_resources(),
        "session finished"
    );

    Ok(())
}

fn replay_blending(ctx: &mut Context<RecordingDevice>) -> Result<()> {
    use BlendFunction::*;

    ctx.blending_enable(One, One)?;
    ctx.blending_disable();
    ctx.blending_enable(One, One)?;
    ctx.blending_enable(One, One)?;
    ctx.blending_disable();
    ctx.blending_disable();
    ctx.blending_enable(One, One)?;
    ctx.blending_enable(OneMinusSourceAlpha, One)?;
    ctx.blending_enable(OneMinusSourceAlpha, OneMinusDestinationColor)?;
    ctx.blending_enable_with_equation(
        OneMinusSourceAlpha,
        OneMinusDestinationColor,
        BlendEquation::Add,
    )?;
    ctx.blending_enable_with_equation(
        OneMinusSourceAlpha,
        OneMinusDestinationColor,
        BlendEquation::Maximum,
    )?;
    ctx.blending_disable();

    tracing::debug!(calls = ctx.device().calls().len(), "blending replayed");
    Ok(())
}

fn replay_offscreen_pass(ctx: &mut Context<RecordingDevice>) -> Result<()> {
    let unit = *ctx
        .texture_units()
        .first()
        .context("context has no texture units")?;
    let color = ctx.texture_2d_allocate(
        unit,
        TextureDescriptor::new(256, 256, Renderable::Color),
    )?;
    let depth = ctx.texture_2d_allocate(
        unit,
        TextureDescriptor::new(
            256,
            256,
            Renderable::DepthStencil {
                depth_bits: 24,
                stencil_bits: 8,
            },
        ),
    )?;
    ctx.texture_unit_unbind(unit)?;

    let point = *ctx
        .framebuffer_color_attachment_points()
        .first()
        .context("context has no color attachment points")?;
    let mut builder = ctx.framebuffer_new_builder();
    builder
        .attach_color(point, ColorAttachment::Texture2D(color))
        .attach_depth_stencil(depth);
    let target = ctx.framebuffer_allocate(&builder)?;
    tracing::debug!(
        framebuffer = %target.handle(),
        depth_bits = target.depth_bits(),
        stencil_bits = target.stencil_bits(),
        "offscreen target ready"
    );

    let vertices = ctx.buffer_allocate(BufferTarget::Array, 1024, BufferUsage::StaticDraw)?;
    ctx.buffer_update(vertices, 0, &[0u8; 64])?;

    let mut state = RenderState::default();
    state.depth.test = Some(glint_render::DepthFunction::Less);
    state.stencil.enabled = true;
    for _ in 0..3 {
        ctx.render_state_activate(&state)?;
    }

    ctx.framebuffer_draw_unbind();
    ctx.texture_bind(unit, color)?;

    ctx.delete(target.handle())?;
    ctx.delete(vertices)?;
    Ok(())
}
