/// Side length of the square graphics surface, in pixels.
pub const CANVAS_SIZE: u32 = 500;

/// An RGBA image produced by the engine's graphics device.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl Bitmap {
    /// Wrap raw RGBA pixels. Returns `None` if the buffer length does not match.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    #[must_use]
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let rgba = pixel.iter().copied().cycle().take(count * 4).collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// The single graphics surface. Only listener messages draw into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    surface: Bitmap,
    dirty: bool,
    revision: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self {
            surface: Bitmap::filled(CANVAS_SIZE, CANVAS_SIZE, [0, 0, 0, 0]),
            dirty: false,
            revision: 0,
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.surface.rgba.fill(0);
        self.dirty = false;
        self.revision += 1;
    }

    /// Copy `image` onto the surface at the origin, cropping what does not fit.
    pub fn blit(&mut self, image: &Bitmap) {
        let width = image.width.min(self.surface.width) as usize;
        let height = image.height.min(self.surface.height) as usize;
        let src_stride = image.width as usize * 4;
        let dst_stride = self.surface.width as usize * 4;
        for row in 0..height {
            let src = &image.rgba[row * src_stride..row * src_stride + width * 4];
            let dst = &mut self.surface.rgba[row * dst_stride..row * dst_stride + width * 4];
            dst.copy_from_slice(src);
        }
        self.dirty = true;
        self.revision += 1;
    }

    #[must_use]
    pub fn surface(&self) -> &Bitmap {
        &self.surface
    }

    /// True once something has been drawn since the last clear.
    #[must_use]
    pub fn has_drawing(&self) -> bool {
        self.dirty
    }

    /// Bumped on every clear or blit; lets renderers skip re-encoding.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
