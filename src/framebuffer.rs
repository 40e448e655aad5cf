//! The frame being drawn, and the column views the workers draw through.

use std::marker::PhantomData;
use std::ops::Range;

use log::{debug, error};

use crate::error::{Error, Result};
use crate::texture::Colour;

/// Raw description of a presentation surface's pixel layout, as reported by
/// the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub bits_per_pixel: u32,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
}

impl SurfaceLayout {
    /// softbuffer surfaces are `0RGB` in a native-endian `u32`.
    pub const SOFTBUFFER: SurfaceLayout = SurfaceLayout {
        bits_per_pixel: 32,
        red_mask: 0x00FF_0000,
        green_mask: 0x0000_FF00,
        blue_mask: 0x0000_00FF,
        alpha_mask: 0,
    };
}

/// The packed 32-bit layouts the rasterizer can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Xrgb8888,
    Argb8888,
}

impl PixelFormat {
    /// Match a surface layout against the supported list. Anything else is a
    /// configuration error to report before the first frame.
    pub fn detect(layout: &SurfaceLayout) -> Result<Self> {
        let rgb = layout.bits_per_pixel == 32
            && layout.red_mask == 0x00FF_0000
            && layout.green_mask == 0x0000_FF00
            && layout.blue_mask == 0x0000_00FF;
        let format = match (rgb, layout.alpha_mask) {
            (true, 0) => PixelFormat::Xrgb8888,
            (true, 0xFF00_0000) => PixelFormat::Argb8888,
            _ => {
                error!("Unsupported pixel layout {layout:?}");
                return Err(Error::UnsupportedPixelFormat(*layout));
            }
        };
        debug!("Detected pixel format {format:?}");
        Ok(format)
    }

    #[inline]
    pub fn pack(self, c: Colour) -> u32 {
        let rgb = ((c.r as u32) << 16) | ((c.g as u32) << 8) | (c.b as u32);
        match self {
            PixelFormat::Xrgb8888 => rgb,
            PixelFormat::Argb8888 => 0xFF00_0000 | rgb,
        }
    }

    #[inline]
    pub fn unpack(self, pixel: u32) -> Colour {
        Colour::new((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
    }
}

pub struct Framebuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            pixels: vec![0; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn read_pixel(&self, x: usize, y: usize) -> Colour {
        self.format.unpack(self.pixels[y * self.width + x])
    }

    pub fn clear(&mut self, colour: Colour) {
        self.pixels.fill(self.format.pack(colour));
    }

    /// Split the frame into column views, one per range. Ranges must be in
    /// order, non-overlapping and inside the frame.
    pub fn split_columns(&mut self, ranges: &[Range<usize>]) -> Vec<ColumnSpan<'_>> {
        let mut last_end = 0;
        for range in ranges {
            assert!(
                range.start >= last_end && range.start <= range.end && range.end <= self.width,
                "column ranges must be ordered, disjoint and inside the frame"
            );
            last_end = range.end;
        }

        let ptr = self.pixels.as_mut_ptr();
        ranges
            .iter()
            .map(|range| ColumnSpan {
                ptr,
                width: self.width,
                height: self.height,
                format: self.format,
                columns: range.clone(),
                _marker: PhantomData,
            })
            .collect()
    }
}

/// Write access to a contiguous range of columns of a [`Framebuffer`].
///
/// Rows are contiguous in memory, so a column range is not a sub-slice.
/// Spans handed out by one `split_columns` call cover disjoint columns and
/// each only writes inside its own range, so no two spans touch the same
/// pixel.
pub struct ColumnSpan<'a> {
    ptr: *mut u32,
    width: usize,
    height: usize,
    format: PixelFormat,
    columns: Range<usize>,
    _marker: PhantomData<&'a mut [u32]>,
}

// SAFETY: spans from the same split never alias (see above) and the borrow
// of the framebuffer outlives every span.
unsafe impl Send for ColumnSpan<'_> {}

impl ColumnSpan<'_> {
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        self.columns.clone()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Full frame width, for mapping columns to rays.
    #[inline]
    pub fn frame_width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, colour: Colour) {
        assert!(
            self.columns.contains(&x) && y < self.height,
            "pixel ({x}, {y}) outside span {:?}",
            self.columns
        );
        // SAFETY: bounds checked above, and `x` is owned by this span only.
        unsafe {
            *self.ptr.add(y * self.width + x) = self.format.pack(colour);
        }
    }
}
