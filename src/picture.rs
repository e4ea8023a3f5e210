use std::fmt;

use bytemuck_derive::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// One pixel packed as `0x00RRGGBB`.
///
/// In memory (little endian) the bytes read `B, G, R, 0`, which lets the
/// buffer go to a BGRA texture without conversion.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
#[repr(transparent)]
pub struct Rgb(u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb::new_hex(0x000000);
    pub const GREEN: Rgb = Rgb::new_hex(0x00FF00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb((r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn new_hex(rgb: u32) -> Self {
        Rgb(rgb & 0x00FF_FFFF)
    }

    pub const fn gray(level: u8) -> Self {
        Rgb::new(level, level, level)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

impl From<u32> for Rgb {
    fn from(rgb: u32) -> Self {
        Rgb::new_hex(rgb)
    }
}

impl From<Rgb> for u32 {
    fn from(color: Rgb) -> Self {
        color.packed()
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb(#{:02X}{:02X}{:02X})", self.r(), self.g(), self.b())
    }
}

/// Row-major view over a pixel buffer.
pub struct Picture<P> {
    pixels: P,
    size: (u32, u32),
}

impl<P> Picture<P> {
    pub fn new(pixels: P, size: (u32, u32)) -> Self {
        Picture { pixels, size }
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    fn to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width() as usize + x as usize
    }
}

impl<'a, T> Picture<&'a [T]> {
    pub fn pixel(&self, x: u32, y: u32) -> &T {
        &self.pixels[self.to_index(x, y)]
    }
}

impl<'a, T> Picture<&'a mut [T]> {
    pub fn buffer_mut(&mut self) -> &mut [T] {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels_as_0x00rrggbb() {
        let color = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(color.packed(), 0x0012_3456);
        assert_eq!((color.r(), color.g(), color.b()), (0x12, 0x34, 0x56));
        assert_eq!(Rgb::gray(47).packed(), 0x002F_2F2F);
    }

    #[test]
    fn hex_drops_the_top_byte() {
        assert_eq!(Rgb::new_hex(0xFF00_FF00), Rgb::GREEN);
    }

    #[test]
    fn conversion_from_u32_keeps_24_bits() {
        assert_eq!(Rgb::from(0xFF00_FF00), Rgb::GREEN);
        assert_eq!(u32::from(Rgb::from(0xAB12_3456)), 0x0012_3456);
    }

    #[test]
    fn debug_shows_hex_channels() {
        assert_eq!(format!("{:?}", Rgb::new(0x0A, 0xB0, 0x01)), "Rgb(#0AB001)");
    }

    #[test]
    fn memory_layout_is_bgra() {
        let pixels = [Rgb::new(1, 2, 3)];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &u32::to_ne_bytes(0x0001_0203));
        if cfg!(target_endian = "little") {
            assert_eq!(bytes, &[3, 2, 1, 0]);
        }
    }

    #[test]
    fn picture_indexes_row_major() {
        let mut buffer = vec![Rgb::BLACK; 6];
        buffer[5] = Rgb::GREEN;
        let picture = Picture::new(buffer.as_slice(), (3, 2));
        assert_eq!(*picture.pixel(2, 1), Rgb::GREEN);
        assert_eq!(*picture.pixel(0, 1), Rgb::BLACK);
    }
}
