use std::io::Cursor;
use std::sync::Arc;

use image::ImageReader;
use rayon::prelude::*;

use crate::domain::{next_id, Orientation, Photo};
use crate::error::{Error, Result};
use crate::source::ImageSource;

/// Classify pixel dimensions. Squares count as landscape.
pub fn classify(width: u32, height: u32) -> Orientation {
    if width >= height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

/// Read the intrinsic (display) size of an image from its header.
///
/// Only the header is decoded. EXIF orientations 5–8 rotate the picture by a
/// quarter turn, so width and height are swapped for them, matching the size a
/// browser reports for the displayed image.
pub fn measure(source: &ImageSource) -> Result<(u32, u32)> {
    if source.bytes.is_empty() {
        return Err(Error::EmptySource(source.label()));
    }

    let (width, height) = ImageReader::new(Cursor::new(source.bytes.as_slice()))
        .with_guessed_format()?
        .into_dimensions()?;

    if (5..=8).contains(&read_exif_orientation(&source.bytes)) {
        Ok((height, width))
    } else {
        Ok((width, height))
    }
}

/// Read EXIF orientation tag (1-8). Returns 1 (normal) if missing or unreadable.
fn read_exif_orientation(bytes: &[u8]) -> u8 {
    let read = || -> Option<u8> {
        let mut cursor = Cursor::new(bytes);
        let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
        let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
        field.value.get_uint(0).map(orientation_tag)
    };
    read().unwrap_or(1)
}

/// Values outside 1-8 are treated as normal.
fn orientation_tag(raw: u32) -> u8 {
    u8::try_from(raw)
        .ok()
        .filter(|v| (1..=8).contains(v))
        .unwrap_or(1)
}

/// Pick a title: the caller's (trimmed, non-empty), then the filename without
/// extension, then `Photo {position}`.
pub fn resolve_title(suggested: Option<&str>, source: &ImageSource, position: usize) -> String {
    suggested
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| source.stem())
        .unwrap_or_else(|| format!("Photo {position}"))
}

/// Something that can tell the pixel size of an image source.
pub trait Probe: Send + Sync + 'static {
    fn dimensions(&self, source: &ImageSource) -> Result<(u32, u32)>;
}

/// Default probe: decodes the image header with [`measure`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderProbe;

impl Probe for HeaderProbe {
    fn dimensions(&self, source: &ImageSource) -> Result<(u32, u32)> {
        measure(source)
    }
}

/// Turns image sources into [`Photo`] records.
///
/// Batch builds measure every source concurrently but always return results
/// in input order, and number positional titles in that order too.
pub struct PhotoBuilder<P = HeaderProbe> {
    probe: Arc<P>,
}

impl PhotoBuilder<HeaderProbe> {
    pub fn new() -> Self {
        Self::with_probe(HeaderProbe)
    }
}

impl Default for PhotoBuilder<HeaderProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Probe> PhotoBuilder<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe: Arc::new(probe),
        }
    }

    /// Build one photo. `position` is the 1-based slot it will occupy.
    pub fn build(
        &self,
        source: &ImageSource,
        suggested_title: Option<&str>,
        position: usize,
    ) -> Result<Photo> {
        let dims = self.probe.dimensions(source)?;
        Ok(finish(source, dims, suggested_title, position))
    }

    /// Build many photos in parallel. `existing` is the number of photos the
    /// album already holds; accepted photos are numbered after it.
    pub fn build_batch(&self, sources: &[ImageSource], existing: usize) -> Vec<Result<Photo>> {
        let probe = self.probe.as_ref();
        let measured: Vec<Result<(u32, u32)>> =
            sources.par_iter().map(|s| probe.dimensions(s)).collect();

        let mut position = existing;
        sources
            .iter()
            .zip(measured)
            .map(|(source, dims)| {
                let dims = dims?;
                position += 1;
                Ok(finish(source, dims, None, position))
            })
            .collect()
    }

    /// Measure on tokio's blocking pool.
    pub async fn measure_async(&self, source: ImageSource) -> Result<(u32, u32)> {
        let probe = Arc::clone(&self.probe);
        tokio::task::spawn_blocking(move || probe.dimensions(&source)).await?
    }

    pub async fn build_async(
        &self,
        source: ImageSource,
        suggested_title: Option<String>,
        position: usize,
    ) -> Result<Photo> {
        let probe = Arc::clone(&self.probe);
        let (source, dims) = tokio::task::spawn_blocking(move || {
            let dims = probe.dimensions(&source);
            (source, dims)
        })
        .await?;
        Ok(finish(&source, dims?, suggested_title.as_deref(), position))
    }

    /// Async batch build. Every measurement is spawned up front; handles are
    /// then awaited in submission order, so completion order never leaks into
    /// the result.
    pub async fn build_batch_async(
        &self,
        sources: Vec<ImageSource>,
        existing: usize,
    ) -> Vec<Result<Photo>> {
        let handles: Vec<_> = sources
            .into_iter()
            .map(|source| {
                let probe = Arc::clone(&self.probe);
                tokio::task::spawn_blocking(move || {
                    let dims = probe.dimensions(&source);
                    (source, dims)
                })
            })
            .collect();

        let mut position = existing;
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let built = match handle.await {
                Ok((source, Ok(dims))) => {
                    position += 1;
                    Ok(finish(&source, dims, None, position))
                }
                Ok((_, Err(err))) => Err(err),
                Err(join) => Err(join.into()),
            };
            results.push(built);
        }
        results
    }
}

fn finish(
    source: &ImageSource,
    (width, height): (u32, u32),
    suggested_title: Option<&str>,
    position: usize,
) -> Photo {
    Photo {
        id: next_id("photo"),
        title: resolve_title(suggested_title, source, position),
        url: source.resolve_url(),
        orientation: classify(width, height),
    }
}
