use embedded_hal::spi::SpiBus;

use cheerlights_composer::{LedDriver, Rgb};

/// SPI byte sent for a `0` data bit at 6.4 MHz (~310 ns high)
const ZERO_PATTERN: u8 = 0b1100_0000;
/// SPI byte sent for a `1` data bit at 6.4 MHz (~940 ns high)
const ONE_PATTERN: u8 = 0b1111_1100;
/// Low tail that latches the frame (80 us at 6.4 MHz)
const LATCH_BYTES: usize = 64;
const BYTES_PER_PIXEL: usize = 3 * 8;

/// Order in which the strip expects the color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrder {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl PixelOrder {
    pub(crate) const fn arrange(self, color: Rgb) -> [u8; 3] {
        let Rgb { r, g, b } = color;
        match self {
            PixelOrder::Rgb => [r, g, b],
            PixelOrder::Rbg => [r, b, g],
            PixelOrder::Grb => [g, r, b],
            PixelOrder::Gbr => [g, b, r],
            PixelOrder::Brg => [b, r, g],
            PixelOrder::Bgr => [b, g, r],
        }
    }
}

/// WS2812 driver on top of any SPI bus
///
/// Every data bit becomes one SPI byte whose high part encodes the pulse
/// width, so the bus must be clocked at 6.4 MHz. The whole frame goes out in
/// a single write so no gap can latch a partial frame.
pub struct Ws2812Spi<SPI> {
    spi: SPI,
    order: PixelOrder,
    buffer: Vec<u8>,
}

impl<SPI: SpiBus> Ws2812Spi<SPI> {
    pub fn new(spi: SPI, order: PixelOrder) -> Self {
        Self {
            spi,
            order,
            buffer: Vec::new(),
        }
    }

    fn encode(&mut self, colors: &[Rgb]) {
        self.buffer.clear();
        self.buffer
            .reserve(colors.len() * BYTES_PER_PIXEL + LATCH_BYTES);

        for color in colors {
            for channel in self.order.arrange(*color) {
                for bit in (0..8).rev() {
                    let pattern = if channel & (1 << bit) != 0 {
                        ONE_PATTERN
                    } else {
                        ZERO_PATTERN
                    };
                    self.buffer.push(pattern);
                }
            }
        }
        self.buffer.resize(self.buffer.len() + LATCH_BYTES, 0);
    }
}

impl<SPI: SpiBus, const N: usize> LedDriver<N> for Ws2812Spi<SPI> {
    type Error = SPI::Error;

    fn write(&mut self, colors: &[Rgb; N]) -> Result<(), Self::Error> {
        self.encode(colors);
        self.spi.write(&self.buffer)?;
        self.spi.flush()
    }
}
