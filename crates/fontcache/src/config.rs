use crate::error::{FontCacheError, FontCacheResult};
use crate::sdf::SdfConfig;

/// Configuration for a [`Context`](crate::Context).
///
/// # Example
///
/// ```
/// use fontcache::ContextConfig;
///
/// // Defaults: 512x512 atlas, 32px SDF glyphs
/// let config = ContextConfig::default();
///
/// // Text-heavy applications
/// let config = ContextConfig::large().with_max_quads(4096);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ContextConfig {
    /// Atlas width in texels.
    pub atlas_width: u32,
    /// Atlas height in texels.
    pub atlas_height: u32,
    /// SDF edge value and distance scale.
    pub sdf: SdfConfig,
    /// Pixel size every glyph is rasterized at. Draw sizes scale from this.
    pub glyph_size: u32,
    /// Empty SDF border around each glyph, in pixels.
    pub glyph_padding: u32,
    /// Quads buffered before a forced flush.
    pub max_quads: usize,
    /// Maximum style stack depth.
    pub max_states: usize,
    /// Maximum fallback fonts per font.
    pub max_fallbacks: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            atlas_width: 512,
            atlas_height: 512,
            sdf: SdfConfig::default(),
            glyph_size: 32,
            glyph_padding: 4,
            max_quads: 1024,
            max_states: 20,
            max_fallbacks: 20,
        }
    }
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 512x512 atlas (~256 KB).
    pub fn small() -> Self {
        Self::default()
    }

    /// 1024x1024 atlas (~1 MB).
    pub fn medium() -> Self {
        Self {
            atlas_width: 1024,
            atlas_height: 1024,
            ..Default::default()
        }
    }

    /// 2048x2048 atlas (~4 MB), for lots of unique glyphs or fonts.
    pub fn large() -> Self {
        Self {
            atlas_width: 2048,
            atlas_height: 2048,
            ..Default::default()
        }
    }

    pub fn with_atlas_size(mut self, width: u32, height: u32) -> Self {
        self.atlas_width = width;
        self.atlas_height = height;
        self
    }

    pub fn with_sdf_config(mut self, config: SdfConfig) -> Self {
        self.sdf = config;
        self
    }

    pub fn with_glyph_size(mut self, size: u32) -> Self {
        self.glyph_size = size;
        self
    }

    pub fn with_glyph_padding(mut self, padding: u32) -> Self {
        self.glyph_padding = padding;
        self
    }

    pub fn with_max_quads(mut self, quads: usize) -> Self {
        self.max_quads = quads;
        self
    }

    pub fn with_max_states(mut self, states: usize) -> Self {
        self.max_states = states;
        self
    }

    pub fn with_max_fallbacks(mut self, fallbacks: usize) -> Self {
        self.max_fallbacks = fallbacks;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> FontCacheResult<()> {
        let invalid = |msg: &str| Err(FontCacheError::InvalidConfig(msg.to_string()));

        if self.atlas_width == 0 || self.atlas_height == 0 {
            return invalid("atlas dimensions must be non-zero");
        }
        if self.glyph_size == 0 {
            return invalid("glyph size must be non-zero");
        }
        if self.max_quads == 0 {
            return invalid("max_quads must be at least 1");
        }
        if self.max_states == 0 {
            return invalid("max_states must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.sdf.edge_value) {
            return invalid("sdf edge value must be within 0.0..=1.0");
        }
        if !self.sdf.pixel_dist_scale.is_finite() || self.sdf.pixel_dist_scale < 0.0 {
            return invalid("sdf distance scale must be finite and non-negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContextConfig::default();
        assert_eq!((config.atlas_width, config.atlas_height), (512, 512));
        assert_eq!(config.sdf.on_edge_byte(), 204);
        assert_eq!(config.sdf.pixel_dist_scale, 32.0);
        assert_eq!(config.glyph_size, 32);
        assert_eq!(config.glyph_padding, 4);
        assert_eq!(config.max_quads, 1024);
        assert_eq!(config.max_states, 20);
        assert_eq!(config.max_fallbacks, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(ContextConfig::small().atlas_width, 512);
        assert_eq!(ContextConfig::medium().atlas_width, 1024);
        assert_eq!(ContextConfig::large().atlas_height, 2048);
    }

    #[test]
    fn test_builders() {
        let config = ContextConfig::new()
            .with_atlas_size(256, 128)
            .with_glyph_size(48)
            .with_glyph_padding(6)
            .with_max_quads(16)
            .with_max_states(4)
            .with_max_fallbacks(2);
        assert_eq!(config.atlas_width, 256);
        assert_eq!(config.atlas_height, 128);
        assert_eq!(config.glyph_size, 48);
        assert_eq!(config.glyph_padding, 6);
        assert_eq!(config.max_quads, 16);
        assert_eq!(config.max_states, 4);
        assert_eq!(config.max_fallbacks, 2);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        assert!(matches!(
            ContextConfig::default().with_atlas_size(0, 512).validate(),
            Err(FontCacheError::InvalidConfig(_))
        ));
        assert!(ContextConfig::default().with_glyph_size(0).validate().is_err());
        assert!(ContextConfig::default().with_max_quads(0).validate().is_err());
        assert!(ContextConfig::default().with_max_states(0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_sdf() {
        let mut config = ContextConfig::default();
        config.sdf.edge_value = 1.5;
        assert!(config.validate().is_err());

        let mut config = ContextConfig::default();
        config.sdf.pixel_dist_scale = f32::NAN;
        assert!(config.validate().is_err());
    }
}
