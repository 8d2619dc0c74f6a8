use serde::{Deserialize, Serialize};

/// Ceilings applied to probed device limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub color_attachment_ceiling: u32,
    pub draw_buffer_ceiling: u32,
    pub texture_unit_ceiling: u32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            color_attachment_ceiling: 1024,
            draw_buffer_ceiling: 1024,
            texture_unit_ceiling: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: ContextConfig =
            serde_json::from_str(r#"{ "texture_unit_ceiling": 32 }"#).unwrap();
        assert_eq!(config.texture_unit_ceiling, 32);
        assert_eq!(config.color_attachment_ceiling, 1024);
    }
}
