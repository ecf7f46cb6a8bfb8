//! The edit session: one uploaded photo, its caption and the current frame.
//!
//! ```text
//!            upload                 edit (title/detail/style)
//!   Empty ──────────▶ Loaded ─────────────────────▶ Edited ─┐
//!                       ▲  ▲                          │  ▲    │ edit
//!                       │  └──────── upload ──────────┘  └────┘
//!                       └─ upload
//! ```
//!
//! The decoded source is kept for the whole session. Every render starts
//! from it, so editing the caption ten times never frames an already framed
//! image. Metadata is extracted once per upload; caption edits don't touch it.
//!
//! ## Superseded uploads
//!
//! A front end that decodes in the background can start a second upload
//! before the first one finishes. [`EditSession::begin_upload`] hands out an
//! [`UploadTicket`]; only the most recent ticket may complete. Older ones
//! come back as [`LoadOutcome::Stale`] and leave the session alone.

use crate::caption::{Caption, build_caption};
use crate::imaging::{
    BackendError, FrameStyle, ImageBackend, ImageHandle, MetadataExtractor, RenderSettings,
    RenderedOutput, render_frame,
};
use crate::metadata::MetadataMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Could not decode the uploaded image: {0}")]
    Decode(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing uploaded yet.
    Empty,
    /// A photo is loaded with its derived caption.
    Loaded,
    /// The caption or frame style was changed after loading.
    Edited,
}

/// Proof that an upload was started; see the [module docs](self).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// A newer upload was started; this one was discarded.
    Stale,
}

#[derive(Debug)]
struct Photo {
    image: ImageHandle,
    metadata: MetadataMap,
    caption: Caption,
    style: FrameStyle,
    output: Option<RenderedOutput>,
    edited: bool,
}

pub struct EditSession<B: ImageBackend, E: MetadataExtractor> {
    backend: B,
    extractor: E,
    settings: RenderSettings,
    default_style: FrameStyle,
    generation: u64,
    photo: Option<Photo>,
}

impl<B: ImageBackend, E: MetadataExtractor> EditSession<B, E> {
    pub fn new(backend: B, extractor: E, settings: RenderSettings) -> Self {
        Self {
            backend,
            extractor,
            settings,
            default_style: FrameStyle::default(),
            generation: 0,
            photo: None,
        }
    }

    /// Style every new upload starts with.
    pub fn with_default_style(mut self, style: FrameStyle) -> Self {
        self.default_style = style;
        self
    }

    pub fn begin_upload(&mut self) -> UploadTicket {
        self.generation += 1;
        UploadTicket {
            generation: self.generation,
        }
    }

    /// Decode, extract, derive the caption and render the first frame.
    ///
    /// A decode failure leaves the session exactly as it was. Extraction
    /// problems are not failures: the caption is simply blank.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        bytes: &[u8],
    ) -> Result<LoadOutcome, SessionError> {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding upload #{} (current is #{})",
                ticket.generation,
                self.generation
            );
            return Ok(LoadOutcome::Stale);
        }

        let image = self.backend.decode(bytes)?;
        let metadata = match self.extractor.extract(bytes) {
            Ok(map) => map,
            Err(e) => {
                log::debug!("Metadata extraction failed, using an empty caption: {e}");
                MetadataMap::new()
            }
        };
        let caption = build_caption(&metadata);
        log::info!(
            "Loaded {}x{} photo with {} metadata fields",
            image.width(),
            image.height(),
            metadata.len()
        );

        self.photo = Some(Photo {
            image,
            metadata,
            caption,
            style: self.default_style,
            output: None,
            edited: false,
        });
        self.render();
        Ok(LoadOutcome::Loaded)
    }

    /// Begin and complete an upload in one step.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let ticket = self.begin_upload();
        self.complete_upload(ticket, bytes).map(|_| ())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Option<&RenderedOutput> {
        self.edit(|photo| photo.caption.title = title.into())
    }

    pub fn set_detail(&mut self, detail: impl Into<String>) -> Option<&RenderedOutput> {
        self.edit(|photo| photo.caption.detail = detail.into())
    }

    pub fn set_caption(&mut self, caption: Caption) -> Option<&RenderedOutput> {
        self.edit(|photo| photo.caption = caption)
    }

    pub fn set_frame_style(&mut self, style: FrameStyle) -> Option<&RenderedOutput> {
        self.edit(|photo| photo.style = style)
    }

    /// Re-render from the current state. `None` without a photo or when the
    /// render fails.
    pub fn refresh(&mut self) -> Option<&RenderedOutput> {
        self.render()
    }

    /// The most recent successful render.
    pub fn download(&self) -> Option<&RenderedOutput> {
        self.photo.as_ref()?.output.as_ref()
    }

    pub fn caption(&self) -> Option<&Caption> {
        self.photo.as_ref().map(|p| &p.caption)
    }

    /// Current style, or the default when nothing is loaded.
    pub fn frame_style(&self) -> FrameStyle {
        self.photo
            .as_ref()
            .map_or(self.default_style, |p| p.style)
    }

    pub fn metadata(&self) -> Option<&MetadataMap> {
        self.photo.as_ref().map(|p| &p.metadata)
    }

    /// Metadata for display, with a placeholder entry when it is empty.
    pub fn display_metadata(&self) -> Option<MetadataMap> {
        self.metadata().map(MetadataMap::or_placeholder)
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.photo.as_ref().map(|p| &p.image)
    }

    pub fn state(&self) -> SessionState {
        match &self.photo {
            None => SessionState::Empty,
            Some(photo) if photo.edited => SessionState::Edited,
            Some(_) => SessionState::Loaded,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    fn edit(&mut self, apply: impl FnOnce(&mut Photo)) -> Option<&RenderedOutput> {
        let photo = self.photo.as_mut()?;
        apply(photo);
        photo.edited = true;
        self.render()
    }

    /// Render into `photo.output`.
    ///
    /// `None` when nothing is loaded or the render failed. A failed render
    /// leaves the previous output in place for [`download`](Self::download).
    fn render(&mut self) -> Option<&RenderedOutput> {
        let photo = self.photo.as_mut()?;
        match render_frame(
            &self.backend,
            &photo.image,
            &photo.caption,
            photo.style,
            &self.settings,
        ) {
            Ok(output) => {
                log::info!(
                    "Rendered {} frame ({} bytes)",
                    photo.style,
                    output.bytes.len()
                );
                photo.output = Some(output);
                photo.output.as_ref()
            }
            Err(e) => {
                log::warn!("Render failed, keeping the previous frame: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::exif_reader::tests::MockExtractor;
    use crate::metadata::NO_METADATA;
    use crate::test_helpers::acme_metadata;
    use image::Rgb;

    type MockSession = EditSession<MockBackend, MockExtractor>;

    fn session(dims: Vec<(u32, u32)>, metadata: MetadataMap) -> MockSession {
        EditSession::new(
            MockBackend::with_dimensions(dims),
            MockExtractor::returning(metadata),
            RenderSettings::default(),
        )
    }

    fn loaded(metadata: MetadataMap) -> MockSession {
        let mut s = session(vec![(400, 300)], metadata);
        s.upload(b"photo").unwrap();
        s
    }

    fn compose_titles(s: &MockSession) -> Vec<String> {
        s.backend()
            .composes()
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Compose { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Upload
    // =========================================================================

    #[test]
    fn new_session_is_empty() {
        let s = session(vec![], MetadataMap::new());
        assert_eq!(s.state(), SessionState::Empty);
        assert!(s.download().is_none());
        assert!(s.caption().is_none());
        assert!(s.display_metadata().is_none());
        assert_eq!(s.frame_style(), FrameStyle::White);
    }

    #[test]
    fn upload_derives_caption_and_renders() {
        let s = loaded(acme_metadata());
        assert_eq!(s.state(), SessionState::Loaded);
        assert_eq!(
            s.caption(),
            Some(&Caption::new("Acme  X1", "50mm  f/1.8  1/200s  ISO400"))
        );
        let output = s.download().unwrap();
        assert_eq!(output.file_name, "processed-frame.jpeg");
        assert_eq!(s.backend().composes().len(), 1);
    }

    #[test]
    fn full_size_upload_renders_expected_canvas() {
        let mut s = session(vec![(4000, 3000)], acme_metadata());
        s.upload(b"photo").unwrap();
        assert!(matches!(
            &s.backend().composes()[0],
            RecordedOp::Compose {
                canvas: (4200, 3950),
                ..
            }
        ));
    }

    #[test]
    fn upload_without_metadata_gives_blank_caption() {
        let s = loaded(MetadataMap::new());
        assert!(s.caption().unwrap().is_blank());
        assert!(s.download().is_some());
        assert!(s.metadata().unwrap().is_empty());
        let shown = s.display_metadata().unwrap();
        assert_eq!(shown.text("Make").as_deref(), Some(NO_METADATA));
    }

    #[test]
    fn extraction_failure_is_not_an_upload_failure() {
        let mut s = session(vec![(400, 300)], acme_metadata());
        s.extractor().set_fail(true);
        s.upload(b"photo").unwrap();
        assert_eq!(s.state(), SessionState::Loaded);
        assert!(s.caption().unwrap().is_blank());
    }

    #[test]
    fn decode_failure_leaves_state_unchanged() {
        // One queued dimension: the second upload fails to decode
        let mut s = session(vec![(400, 300)], acme_metadata());
        s.upload(b"photo").unwrap();
        s.set_title("Mine");
        let before = s.image().unwrap().clone();

        let result = s.upload(b"broken");
        assert!(matches!(result, Err(SessionError::Decode(_))));
        assert_eq!(s.state(), SessionState::Edited);
        assert_eq!(s.caption().unwrap().title, "Mine");
        assert!(s.image().unwrap().same_image(&before));
    }

    #[test]
    fn new_upload_resets_everything() {
        let mut s = session(vec![(200, 100), (400, 300)], acme_metadata());
        s.upload(b"first").unwrap();
        s.set_frame_style(FrameStyle::Black);
        s.set_title("Edited");
        assert_eq!(s.state(), SessionState::Edited);

        s.upload(b"second").unwrap();
        assert_eq!(s.state(), SessionState::Loaded);
        assert_eq!(s.frame_style(), FrameStyle::White);
        assert_eq!(s.caption().unwrap().title, "Acme  X1");
        assert_eq!(s.image().unwrap().dimensions(), (200, 100));
    }

    #[test]
    fn upload_uses_configured_default_style() {
        let mut s =
            session(vec![(400, 300)], MetadataMap::new()).with_default_style(FrameStyle::Blur);
        assert_eq!(s.frame_style(), FrameStyle::Blur);
        s.upload(b"photo").unwrap();
        assert_eq!(s.frame_style(), FrameStyle::Blur);
    }

    // =========================================================================
    // Stale uploads
    // =========================================================================

    #[test]
    fn stale_ticket_is_discarded() {
        let mut s = session(vec![(400, 300)], acme_metadata());
        let first = s.begin_upload();
        let second = s.begin_upload();

        assert_eq!(s.complete_upload(second, b"new").unwrap(), LoadOutcome::Loaded);
        assert_eq!(s.complete_upload(first, b"old").unwrap(), LoadOutcome::Stale);

        assert_eq!(s.image().unwrap().dimensions(), (400, 300));
        // The stale upload was neither decoded nor extracted
        assert_eq!(s.extractor().call_count(), 1);
        let decodes = s
            .backend()
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Decode(_)))
            .count();
        assert_eq!(decodes, 1);
    }

    #[test]
    fn stale_ticket_does_not_overwrite_newer_state() {
        let mut s = session(vec![(200, 100), (400, 300)], acme_metadata());
        let first = s.begin_upload();
        s.upload(b"newer").unwrap();
        s.set_title("Kept");

        assert_eq!(s.complete_upload(first, b"older").unwrap(), LoadOutcome::Stale);
        assert_eq!(s.caption().unwrap().title, "Kept");
        assert_eq!(s.image().unwrap().dimensions(), (400, 300));
    }

    // =========================================================================
    // Edits
    // =========================================================================

    #[test]
    fn caption_edits_rerender_without_reextracting() {
        let mut s = loaded(acme_metadata());
        s.set_title("Holiday");
        s.set_detail("Somewhere warm");
        s.set_caption(Caption::new("A", "B"));

        assert_eq!(s.state(), SessionState::Edited);
        assert_eq!(s.extractor().call_count(), 1);
        assert_eq!(
            compose_titles(&s),
            vec!["Acme  X1", "Holiday", "Holiday", "A"]
        );
    }

    #[test]
    fn edits_always_start_from_original_image() {
        let mut s = loaded(acme_metadata());
        let original = s.image().unwrap().clone();
        for i in 0..5 {
            s.set_title(format!("Take {i}"));
        }
        assert!(s.image().unwrap().same_image(&original));
        for op in s.backend().composes() {
            let RecordedOp::Compose { source, .. } = op else {
                unreachable!()
            };
            assert_eq!(source, (400, 300));
        }
    }

    #[test]
    fn style_change_switches_palette_only() {
        let mut s = loaded(acme_metadata());
        let white = s.download().unwrap().clone();
        s.set_frame_style(FrameStyle::Black);
        let black = s.download().unwrap().clone();
        assert_ne!(white.bytes, black.bytes);

        let composes = s.backend().composes();
        let (
            RecordedOp::Compose {
                palette: p1,
                title: t1,
                detail: d1,
                source: s1,
                ..
            },
            RecordedOp::Compose {
                palette: p2,
                title: t2,
                detail: d2,
                source: s2,
                ..
            },
        ) = (&composes[0], &composes[1])
        else {
            panic!("expected two composes");
        };
        assert_eq!(p1.title, Rgb([0, 0, 0]));
        assert_eq!(p2.title, Rgb([255, 255, 255]));
        assert_eq!((t1, d1, s1), (t2, d2, s2));
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut s = loaded(acme_metadata());
        s.set_frame_style(FrameStyle::Blur);
        let first = s.refresh().cloned().unwrap();
        let second = s.refresh().cloned().unwrap();
        assert_eq!(first, second);
        // Refreshing is not an edit
        assert_eq!(s.state(), SessionState::Edited);
    }

    #[test]
    fn render_failure_keeps_previous_output() {
        let mut s = loaded(acme_metadata());
        let before = s.download().unwrap().clone();

        s.backend().set_fail_compose(true);
        assert!(s.set_frame_style(FrameStyle::Black).is_none());
        assert!(s.set_title("Holiday").is_none());
        assert!(s.refresh().is_none());
        assert_eq!(s.download(), Some(&before));
        // The edit itself still applies
        assert_eq!(s.frame_style(), FrameStyle::Black);

        s.backend().set_fail_compose(false);
        assert_ne!(s.refresh().unwrap(), &before);
    }

    #[test]
    fn failed_first_render_leaves_nothing_to_download() {
        let mut s = session(vec![(400, 300)], acme_metadata());
        s.backend().set_fail_compose(true);
        s.upload(b"photo").unwrap();

        assert_eq!(s.state(), SessionState::Loaded);
        assert!(s.download().is_none());

        s.backend().set_fail_compose(false);
        assert!(s.refresh().is_some());
        assert!(s.download().is_some());
    }

    #[test]
    fn edits_without_photo_are_noops() {
        let mut s = session(vec![], MetadataMap::new());
        assert!(s.set_title("x").is_none());
        assert!(s.set_detail("y").is_none());
        assert!(s.set_frame_style(FrameStyle::Black).is_none());
        assert!(s.refresh().is_none());
        assert!(s.download().is_none());
        assert_eq!(s.state(), SessionState::Empty);
        assert!(s.backend().get_operations().is_empty());
    }
}
