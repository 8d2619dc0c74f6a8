//! Capability probing
//!
//! Limits are queried once when a context is created. A device reporting
//! less than the mandated minimum is refused outright; anything above the
//! configured ceiling is clamped so slot arrays stay bounded.

use crate::backend::{Device, Limit};
use crate::config::ContextConfig;
use crate::error::GlError;

/// One probed integer limit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CapabilityLimits {
    pub limit: Limit,
    /// Value the device reported.
    pub raw: i32,
    /// `min(raw, ceiling)`.
    pub clamped: u32,
    pub required: u32,
}

/// All limits the context relies on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub color_attachments: CapabilityLimits,
    pub draw_buffers: CapabilityLimits,
    pub texture_units: CapabilityLimits,
    pub texture_size: CapabilityLimits,
}

impl Capabilities {
    pub const MIN_COLOR_ATTACHMENTS: u32 = 8;
    pub const MIN_DRAW_BUFFERS: u32 = 8;
    pub const MIN_TEXTURE_UNITS: u32 = 16;
    pub const MIN_TEXTURE_SIZE: u32 = 1024;

    /// Number of attachment points and draw buffers a framebuffer may use.
    pub fn color_slots(&self) -> u32 {
        self.color_attachments.clamped.min(self.draw_buffers.clamped)
    }
}

/// Queries and validates device limits.
pub struct CapabilityProbe<'a, D: Device> {
    device: &'a mut D,
}

impl<'a, D: Device> CapabilityProbe<'a, D> {
    pub fn new(device: &'a mut D) -> Self {
        Self { device }
    }

    /// Query `limit`, failing if it is below `required` and clamping it to `ceiling`.
    ///
    /// A ceiling below `required` is refused before the device is queried.
    pub fn limit(
        &mut self,
        limit: Limit,
        required: u32,
        ceiling: u32,
    ) -> Result<CapabilityLimits, GlError> {
        if ceiling < required {
            tracing::error!(%limit, ceiling, required, "ceiling is below the required minimum");
            return Err(GlError::Misconfigured(format!(
                "{limit} ceiling {ceiling} is below the required minimum {required}"
            )));
        }

        let raw = self.device.integer_limit(limit);
        tracing::debug!(%limit, raw, "probed device limit");

        let reported = u32::try_from(raw).unwrap_or(0);
        if reported < required {
            tracing::error!(
                %limit,
                raw,
                required,
                "implementation does not meet the required minimum"
            );
            return Err(GlError::NonCompliant {
                limit,
                reported: raw,
                required: i32::try_from(required).unwrap_or(i32::MAX),
            });
        }

        let clamped = reported.min(ceiling);
        if clamped < reported {
            tracing::debug!(%limit, raw, clamped, "clamped device limit");
        }

        Ok(CapabilityLimits {
            limit,
            raw,
            clamped,
            required,
        })
    }

    /// Probe every limit a context needs.
    pub fn probe(mut self, config: &ContextConfig) -> Result<Capabilities, GlError> {
        Ok(Capabilities {
            color_attachments: self.limit(
                Limit::MaxColorAttachments,
                Capabilities::MIN_COLOR_ATTACHMENTS,
                config.color_attachment_ceiling,
            )?,
            draw_buffers: self.limit(
                Limit::MaxDrawBuffers,
                Capabilities::MIN_DRAW_BUFFERS,
                config.draw_buffer_ceiling,
            )?,
            texture_units: self.limit(
                Limit::MaxTextureImageUnits,
                Capabilities::MIN_TEXTURE_UNITS,
                config.texture_unit_ceiling,
            )?,
            texture_size: self.limit(
                Limit::MaxTextureSize,
                Capabilities::MIN_TEXTURE_SIZE,
                u32::MAX,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::RecordingDevice;

    #[test]
    fn large_reports_are_clamped() {
        let mut device = RecordingDevice::new().with_limit(Limit::MaxColorAttachments, 4096);
        let limits = CapabilityProbe::new(&mut device)
            .limit(Limit::MaxColorAttachments, 8, 1024)
            .unwrap();

        assert_eq!(limits.raw, 4096);
        assert_eq!(limits.clamped, 1024);
    }

    #[test]
    fn reports_below_minimum_are_refused() {
        let mut device = RecordingDevice::new().with_limit(Limit::MaxColorAttachments, 1);
        let err = CapabilityProbe::new(&mut device)
            .limit(Limit::MaxColorAttachments, 8, 1024)
            .unwrap_err();

        assert_eq!(
            err,
            GlError::NonCompliant {
                limit: Limit::MaxColorAttachments,
                reported: 1,
                required: 8,
            }
        );
    }

    #[test]
    fn negative_reports_are_refused() {
        let mut device = RecordingDevice::new().with_limit(Limit::MaxTextureImageUnits, -1);
        assert!(CapabilityProbe::new(&mut device)
            .limit(Limit::MaxTextureImageUnits, 16, 1024)
            .is_err());
    }

    #[test]
    fn ceilings_below_minimum_are_refused() {
        let mut device = RecordingDevice::new();
        let config = ContextConfig {
            color_attachment_ceiling: 2,
            draw_buffer_ceiling: 2,
            texture_unit_ceiling: 0,
        };

        let err = CapabilityProbe::new(&mut device).probe(&config).unwrap_err();
        assert!(matches!(err, GlError::Misconfigured(_)));
        assert!(device.calls().is_empty());
    }

    #[test]
    fn ceiling_at_minimum_is_accepted() {
        let mut device = RecordingDevice::new().with_limit(Limit::MaxTextureImageUnits, 32);
        let limits = CapabilityProbe::new(&mut device)
            .limit(Limit::MaxTextureImageUnits, 16, 16)
            .unwrap();
        assert_eq!(limits.clamped, limits.required);
    }

    #[test]
    fn texture_size_has_no_ceiling() {
        let mut device = RecordingDevice::new().with_limit(Limit::MaxTextureSize, 16384);
        let caps = CapabilityProbe::new(&mut device)
            .probe(&ContextConfig::default())
            .unwrap();

        assert_eq!(caps.texture_size.clamped, 16384);
    }

    #[test]
    fn color_slots_take_the_smaller_limit() {
        let mut device = RecordingDevice::new()
            .with_limit(Limit::MaxColorAttachments, 8)
            .with_limit(Limit::MaxDrawBuffers, 12);
        let caps = CapabilityProbe::new(&mut device)
            .probe(&ContextConfig::default())
            .unwrap();

        assert_eq!(caps.color_slots(), 8);
    }
}
