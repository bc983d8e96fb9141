//! # Image Processing Module
//!
//! Questo modulo converte qualsiasi immagine supportata in un PNG ottimizzato.
//!
//! ## Pipeline di Ottimizzazione
//!
//! 1. **Decodifica**: `image` riconosce il formato dal contenuto (non dall'estensione)
//! 2. **Palette**: se l'immagine ha al massimo 256 colori RGBA viene usata una palette
//!    esatta; altrimenti, con qualità < 100, quantizzazione NeuQuant (`color_quant`)
//! 3. **Truecolor**: senza palette si scrive RGB (se completamente opaca) o RGBA
//! 4. **Encoding**: `png` con compressione massima e filtro adattivo
//!
//! ## Configurazione (fissa)
//!
//! | Parametro           | Valore | Effetto                                  |
//! |---------------------|--------|------------------------------------------|
//! | `quality`           | 80     | < 100 abilita la quantizzazione lossy    |
//! | `compression_level` | 9      | `png::Compression::Best`                 |
//! | `effort`            | 10     | fattore di campionamento NeuQuant = 1    |
//! | `palette`           | true   | output indicizzato quando possibile      |
//! | `adaptive_filtering`| true   | filtro scelto riga per riga              |
//!
//! ## Error Handling
//!
//! - Decodifica fallita: `OptimizeError::Image`, nessun file scritto
//! - Scrittura fallita: `OptimizeError::Io` / `Encoding`, il file parziale viene rimosso

use crate::error::OptimizeError;
use image::RgbaImage;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, warn};

/// Maximum number of entries in a PNG palette
const MAX_PALETTE_SIZE: usize = 256;

/// PNG encoding policy applied to every conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngOptions {
    /// Quantisation quality (0-100)
    pub quality: u8,
    /// zlib compression level (0-9)
    pub compression_level: u8,
    /// CPU effort (1-10)
    pub effort: u8,
    /// Prefer palette-based output
    pub palette: bool,
    /// Choose the filter per scanline
    pub adaptive_filtering: bool,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            compression_level: 9,
            effort: 10,
            palette: true,
            adaptive_filtering: true,
        }
    }
}

impl PngOptions {
    fn compression(&self) -> png::Compression {
        match self.compression_level {
            0..=2 => png::Compression::Fast,
            3..=6 => png::Compression::Default,
            _ => png::Compression::Best,
        }
    }

    /// NeuQuant sampling factor: 1 is the slowest and most accurate, 30 the fastest
    fn sample_factor(&self) -> i32 {
        let effort = i32::from(self.effort.clamp(1, 10));
        (31 - effort * 3).clamp(1, 30)
    }
}

/// Capability used by workers to produce an optimized PNG from any supported input
pub trait ImageCodec: Send + Sync + 'static {
    fn encode_as_optimized_png(
        &self,
        input_path: &Path,
        output_path: &Path,
        options: &PngOptions,
    ) -> Result<(), OptimizeError>;
}

/// Default codec backed by `image` (decoding) and `png` (encoding)
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for ImageProcessor {
    fn encode_as_optimized_png(
        &self,
        input_path: &Path,
        output_path: &Path,
        options: &PngOptions,
    ) -> Result<(), OptimizeError> {
        let decoded = image::io::Reader::open(input_path)?
            .with_guessed_format()?
            .decode()?;
        let rgba = decoded.to_rgba8();
        debug!(
            "Decoded {} ({}x{})",
            input_path.display(),
            rgba.width(),
            rgba.height()
        );

        let result = write_png(&rgba, output_path, options);
        if result.is_err() {
            if let Err(e) = std::fs::remove_file(output_path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove partial output {}: {}", output_path.display(), e);
                }
            }
        }
        result
    }
}

/// Pixel data ready to be handed to the PNG encoder
struct EncodedPixels {
    color_type: png::ColorType,
    data: Vec<u8>,
    palette: Option<(Vec<u8>, Vec<u8>)>,
}

fn write_png(rgba: &RgbaImage, output_path: &Path, options: &PngOptions) -> Result<(), OptimizeError> {
    let pixels = prepare_pixels(rgba, options);

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, rgba.width(), rgba.height());
    encoder.set_color(pixels.color_type);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(options.compression());
    if options.adaptive_filtering {
        encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
    }
    if let Some((palette, trns)) = pixels.palette {
        encoder.set_palette(palette);
        if !trns.is_empty() {
            encoder.set_trns(trns);
        }
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&pixels.data)?;
    png_writer.finish()?;
    Ok(())
}

fn prepare_pixels(rgba: &RgbaImage, options: &PngOptions) -> EncodedPixels {
    if options.palette {
        if let Some(indexed) = exact_palette(rgba).or_else(|| quantized_palette(rgba, options)) {
            return indexed;
        }
    }

    let opaque = rgba.pixels().all(|p| p.0[3] == u8::MAX);
    if opaque {
        let data = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
        EncodedPixels {
            color_type: png::ColorType::Rgb,
            data,
            palette: None,
        }
    } else {
        EncodedPixels {
            color_type: png::ColorType::Rgba,
            data: rgba.as_raw().clone(),
            palette: None,
        }
    }
}

/// Lossless palette when the image uses at most 256 distinct colours
fn exact_palette(rgba: &RgbaImage) -> Option<EncodedPixels> {
    let mut lookup: HashMap<[u8; 4], u8> = HashMap::new();
    let mut colors: Vec<[u8; 4]> = Vec::new();
    let mut indices = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize);

    for pixel in rgba.pixels() {
        let index = match lookup.get(&pixel.0) {
            Some(&index) => index,
            None => {
                if colors.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                let index = colors.len() as u8;
                lookup.insert(pixel.0, index);
                colors.push(pixel.0);
                index
            }
        };
        indices.push(index);
    }

    Some(indexed_pixels(&colors, indices))
}

/// Lossy palette through NeuQuant, only when quality allows it
fn quantized_palette(rgba: &RgbaImage, options: &PngOptions) -> Option<EncodedPixels> {
    if options.quality >= 100 {
        return None;
    }

    let quantizer = color_quant::NeuQuant::new(options.sample_factor(), MAX_PALETTE_SIZE, rgba.as_raw());
    let indices = rgba
        .as_raw()
        .chunks_exact(4)
        .map(|px| quantizer.index_of(px) as u8)
        .collect();
    let colors: Vec<[u8; 4]> = quantizer
        .color_map_rgba()
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect();

    Some(indexed_pixels(&colors, indices))
}

fn indexed_pixels(colors: &[[u8; 4]], indices: Vec<u8>) -> EncodedPixels {
    let palette = colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();

    // tRNS può omettere le voci finali completamente opache
    let mut trns: Vec<u8> = colors.iter().map(|c| c[3]).collect();
    while trns.last() == Some(&u8::MAX) {
        trns.pop();
    }

    EncodedPixels {
        color_type: png::ColorType::Indexed,
        data: indices,
        palette: Some((palette, trns)),
    }
}
