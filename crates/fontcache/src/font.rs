//! Font storage and fallback chains.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::backend::FontBackend;
use crate::error::{FontCacheError, FontCacheResult};
use crate::glyph::GlyphTable;

/// Stable handle to a registered font.
///
/// Handles are indices into the context's font table and stay valid for the
/// context's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(u32);

impl FontId {
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font#{}", self.0)
    }
}

/// Raw font file bytes.
///
/// `Owned` bytes are released together with the context; `Static` bytes are
/// borrowed for the program's lifetime and never freed by the cache.
#[derive(Clone)]
pub enum FontData {
    Owned(Arc<[u8]>),
    Static(&'static [u8]),
}

impl FontData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FontData::Owned(bytes) => bytes,
            FontData::Static(bytes) => bytes,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, FontData::Owned(_))
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl AsRef<[u8]> for FontData {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for FontData {
    fn from(bytes: Vec<u8>) -> Self {
        FontData::Owned(bytes.into())
    }
}

impl From<Arc<[u8]>> for FontData {
    fn from(bytes: Arc<[u8]>) -> Self {
        FontData::Owned(bytes)
    }
}

impl From<&'static [u8]> for FontData {
    fn from(bytes: &'static [u8]) -> Self {
        FontData::Static(bytes)
    }
}

impl<const N: usize> From<&'static [u8; N]> for FontData {
    fn from(bytes: &'static [u8; N]) -> Self {
        FontData::Static(bytes)
    }
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("owned", &self.is_owned())
            .field("len", &self.len())
            .finish()
    }
}

/// One registered font face with its glyph cache.
pub struct Font<F> {
    data: FontData,
    face: F,
    face_index: u32,
    glyphs: GlyphTable,
    fallbacks: Vec<FontId>,
}

impl<F> Font<F> {
    pub fn data(&self) -> &FontData {
        &self.data
    }

    pub fn face(&self) -> &F {
        &self.face
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    pub fn glyphs_mut(&mut self) -> &mut GlyphTable {
        &mut self.glyphs
    }

    /// Fallback fonts in resolution order.
    pub fn fallbacks(&self) -> &[FontId] {
        &self.fallbacks
    }
}

impl<F> fmt::Debug for Font<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("data", &self.data)
            .field("face_index", &self.face_index)
            .field("glyphs", &self.glyphs.len())
            .field("fallbacks", &self.fallbacks)
            .finish()
    }
}

/// Table of registered fonts.
pub struct FontRegistry<F> {
    fonts: Vec<Font<F>>,
    max_fallbacks: usize,
}

impl<F> FontRegistry<F> {
    pub fn new(max_fallbacks: usize) -> Self {
        Self {
            fonts: Vec::new(),
            max_fallbacks,
        }
    }

    /// Parse `data` with `backend` and register the resulting face.
    ///
    /// Nothing is retained when parsing fails.
    pub fn add<B>(
        &mut self,
        backend: &B,
        data: FontData,
        face_index: u32,
    ) -> FontCacheResult<FontId>
    where
        B: FontBackend<Face = F>,
    {
        let index =
            u32::try_from(self.fonts.len()).map_err(|_| FontCacheError::OutOfMemory("font"))?;

        let face = backend
            .parse(data.clone(), face_index)
            .ok_or(FontCacheError::FontParse { face_index })?;

        self.fonts
            .try_reserve(1)
            .map_err(|_| FontCacheError::OutOfMemory("font"))?;

        debug!(
            font = index,
            face_index,
            bytes = data.len(),
            owned = data.is_owned(),
            "registered font"
        );

        self.fonts.push(Font {
            data,
            face,
            face_index,
            glyphs: GlyphTable::new(),
            fallbacks: Vec::new(),
        });
        Ok(FontId(index))
    }

    /// Append `fallback` to `base`'s fallback chain.
    ///
    /// Returns `false` when either handle is invalid or the chain is full.
    pub fn add_fallback(&mut self, base: FontId, fallback: FontId) -> bool {
        if !self.contains(fallback) {
            return false;
        }
        let max = self.max_fallbacks;
        let Some(font) = self.get_mut(base) else {
            return false;
        };
        if font.fallbacks.len() >= max {
            debug!(%base, %fallback, max, "fallback chain full");
            return false;
        }
        font.fallbacks.push(fallback);
        true
    }

    pub fn contains(&self, id: FontId) -> bool {
        (id.0 as usize) < self.fonts.len()
    }

    pub fn get(&self, id: FontId) -> Option<&Font<F>> {
        self.fonts.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: FontId) -> Option<&mut Font<F>> {
        self.fonts.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontId, &Font<F>)> {
        self.fonts
            .iter()
            .enumerate()
            .map(|(i, font)| (FontId(i as u32), font))
    }

    /// Total cached glyphs across all fonts.
    pub fn glyph_count(&self) -> usize {
        self.fonts.iter().map(|font| font.glyphs.len()).sum()
    }

    /// Drop every cached glyph. Fonts and fallback chains are kept.
    pub fn clear_glyphs(&mut self) {
        for font in &mut self.fonts {
            font.glyphs.clear();
        }
    }

    /// Release every font.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }
}

impl<F> fmt::Debug for FontRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("fonts", &self.fonts)
            .field("max_fallbacks", &self.max_fallbacks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_id_index() {
        let id = FontId::from_index(3);
        assert_eq!(id.index(), 3);
        assert_eq!(id.to_string(), "font#3");
    }

    #[test]
    fn test_font_data_ownership() {
        static BYTES: [u8; 4] = [0, 1, 0, 0];
        let borrowed = FontData::from(&BYTES);
        assert!(!borrowed.is_owned());
        assert_eq!(borrowed.len(), 4);

        let owned = FontData::from(vec![1u8, 2, 3]);
        assert!(owned.is_owned());
        assert_eq!(owned.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_font_data_debug_hides_bytes() {
        let data = FontData::from(vec![0u8; 16]);
        assert_eq!(format!("{data:?}"), "FontData { owned: true, len: 16 }");
    }

    #[test]
    fn test_empty_registry() {
        let registry: FontRegistry<()> = FontRegistry::new(4);
        assert!(registry.is_empty());
        assert!(!registry.contains(FontId::from_index(0)));
        assert!(registry.get(FontId::from_index(0)).is_none());
    }
}
