//! One open document: its sections, labels, anchors and line indices, plus
//! the event handling that keeps them current.

use crate::anchors::{apply_jump, plan_jump, GeometryProvider, JumpAction, SectionAnchorMap};
use crate::comments::{add_comment, NewComment};
use crate::config::ReviewConfig;
use crate::error::DocReviewError;
use crate::export::{export_rows, write_csv};
use crate::layout::{Line, LineIndexCache, PageLineIndex};
use crate::model::{Comment, FileMeta, PageItems, Section};
use crate::outline::{flatten_outline, DocumentSource, PageLabels};
use crate::schedule::RecomputeScheduler;
use crate::store::Repository;
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::Instant;

/// Opens a library file for viewing.
pub trait DocumentLoader {
    fn open(&self, file: &FileMeta) -> Result<Box<dyn DocumentSource>, DocReviewError>;
}

/// Hands out load tickets; starting a load supersedes every earlier ticket.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    current: Rc<Cell<u64>>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> LoadTicket {
        let generation = self.current.get() + 1;
        self.current.set(generation);
        LoadTicket {
            generation,
            current: Rc::clone(&self.current),
        }
    }
}

#[derive(Debug)]
pub struct LoadTicket {
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl LoadTicket {
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The document could not be opened; the viewer is left empty.
    Failed,
    /// A newer load started while this one was in flight; nothing was applied.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenDocument {
    pub file: FileMeta,
    pub page_count: u32,
}

/// What a frame tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameWork {
    pub anchors_refreshed: bool,
    pub active_updated: bool,
}

pub struct Workspace {
    config: ReviewConfig,
    tracker: LoadTracker,
    document: Option<OpenDocument>,
    sections: Vec<Section>,
    labels: PageLabels,
    anchors: SectionAnchorMap,
    line_cache: LineIndexCache,
    layout_scheduler: RecomputeScheduler,
    scroll_scheduler: RecomputeScheduler,
    active_section: Option<String>,
    current_page: u32,
    pages_ready: bool,
    pending_jump: Option<String>,
}

impl Workspace {
    pub fn new(config: ReviewConfig) -> Self {
        Self {
            tracker: LoadTracker::new(),
            document: None,
            sections: Vec::new(),
            labels: PageLabels::none(),
            anchors: SectionAnchorMap::new(),
            line_cache: LineIndexCache::new(config.index.clone()),
            layout_scheduler: RecomputeScheduler::with_follow_up(
                config.anchors.follow_up_delay(),
            ),
            scroll_scheduler: RecomputeScheduler::per_frame(),
            active_section: None,
            current_page: 1,
            pages_ready: false,
            pending_jump: None,
            config,
        }
    }

    /// Shared handle for starting competing loads.
    pub fn tracker(&self) -> LoadTracker {
        self.tracker.clone()
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&OpenDocument> {
        self.document.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn labels(&self) -> &PageLabels {
        &self.labels
    }

    pub fn anchors(&self) -> &SectionAnchorMap {
        &self.anchors
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn pending_jump(&self) -> Option<&str> {
        self.pending_jump.as_deref()
    }

    /// Open `file`, replacing whatever was open.
    ///
    /// Each collaborator call is followed by a supersession check. Label and
    /// outline failures degrade to raw page numbers and an empty section list.
    pub fn open_document(&mut self, file: &FileMeta, loader: &dyn DocumentLoader) -> LoadOutcome {
        let ticket = self.tracker.begin();
        self.close_document();

        let source = loader.open(file);
        if !ticket.is_current() {
            log::debug!("load of {} superseded", file.name);
            return LoadOutcome::Superseded;
        }
        let source = match source {
            Ok(source) => source,
            Err(e) => {
                log::error!("failed to open {}: {e}", file.name);
                return LoadOutcome::Failed;
            }
        };

        let labels = match source.page_labels() {
            Ok(labels) => PageLabels::new(labels),
            Err(e) => {
                log::warn!("{}: falling back to raw page numbers: {e}", file.name);
                PageLabels::none()
            }
        };
        if !ticket.is_current() {
            log::debug!("load of {} superseded", file.name);
            return LoadOutcome::Superseded;
        }

        let outline = match source.outline() {
            Ok(outline) => outline,
            Err(e) => {
                log::warn!("{}: outline unavailable: {e}", file.name);
                Vec::new()
            }
        };
        if !ticket.is_current() {
            log::debug!("load of {} superseded", file.name);
            return LoadOutcome::Superseded;
        }

        let sections = flatten_outline(source.as_ref(), &outline);
        if !ticket.is_current() {
            log::debug!("load of {} superseded", file.name);
            return LoadOutcome::Superseded;
        }

        log::info!(
            "opened {} ({} pages, {} sections)",
            file.name,
            source.page_count(),
            sections.len()
        );
        self.document = Some(OpenDocument {
            file: file.clone(),
            page_count: source.page_count(),
        });
        self.labels = labels;
        self.sections = sections;
        LoadOutcome::Loaded
    }

    pub fn close_document(&mut self) {
        self.document = None;
        self.sections.clear();
        self.labels = PageLabels::none();
        self.anchors = SectionAnchorMap::new();
        self.line_cache.invalidate();
        self.layout_scheduler.cancel();
        self.scroll_scheduler.cancel();
        self.active_section = None;
        self.current_page = 1;
        self.pages_ready = false;
        self.pending_jump = None;
    }

    /// The viewer finished its initial layout. Replays a jump requested
    /// before this point.
    pub fn on_pages_ready(
        &mut self,
        geometry: &mut dyn GeometryProvider,
    ) -> Result<Option<JumpAction>, DocReviewError> {
        self.pages_ready = true;
        self.anchors.refresh(&self.sections, &*geometry);
        match self.pending_jump.take() {
            Some(section_id) => self.jump_to_section(&section_id, geometry),
            None => Ok(None),
        }
    }

    /// Zoom, fit, resize or a page render: line indices are stale and anchors
    /// must be recomputed. Returns true when a frame should be requested.
    pub fn on_layout_change(&mut self) -> bool {
        self.line_cache.invalidate();
        self.layout_scheduler.request()
    }

    pub fn on_scroll(&mut self) -> bool {
        self.scroll_scheduler.request()
    }

    pub fn on_frame(&mut self, now: Instant, geometry: &dyn GeometryProvider) -> FrameWork {
        let mut work = FrameWork::default();
        if self.layout_scheduler.on_frame(now) {
            self.anchors.refresh(&self.sections, geometry);
            work.anchors_refreshed = true;
        }
        if self.scroll_scheduler.on_frame(now) {
            self.update_active_section(geometry);
            work.active_updated = true;
        }
        work
    }

    /// Runs the delayed follow-up refresh once it is due.
    pub fn poll(&mut self, now: Instant, geometry: &dyn GeometryProvider) -> bool {
        if self.layout_scheduler.poll_follow_up(now) {
            self.anchors.refresh(&self.sections, geometry);
            return true;
        }
        false
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.layout_scheduler.next_deadline()
    }

    pub fn update_active_section(&mut self, geometry: &dyn GeometryProvider) {
        self.active_section = self
            .anchors
            .active_in(geometry)
            .map(|a| a.section_id.clone());
    }

    /// Navigate to a section. Before the pages are ready the request is held
    /// and `Ok(None)` is returned.
    pub fn jump_to_section(
        &mut self,
        section_id: &str,
        geometry: &mut dyn GeometryProvider,
    ) -> Result<Option<JumpAction>, DocReviewError> {
        let section = self
            .sections
            .iter()
            .find(|s| s.id == section_id)
            .cloned()
            .ok_or_else(|| DocReviewError::UnknownSection(section_id.to_string()))?;

        if !self.pages_ready {
            log::debug!("pages not ready, holding jump to {section_id}");
            self.pending_jump = Some(section.id);
            return Ok(None);
        }

        self.anchors.refresh(&self.sections, &*geometry);
        let action = plan_jump(
            &section,
            &self.anchors,
            geometry.viewport_height(),
            self.config.anchors.jump_offset_fraction,
        );
        apply_jump(&action, geometry);

        self.active_section = Some(section.id);
        self.current_page = section.page;
        Ok(Some(action))
    }

    pub fn line_index(&mut self, page: &PageItems) -> &PageLineIndex {
        self.line_cache.get_or_build(page)
    }

    /// The indexed line nearest to `y` on `page`, within the configured radius.
    pub fn line_at(&mut self, page: &PageItems, y: f64) -> Option<Line> {
        let radius = self.config.locate_radius;
        self.line_cache.get_or_build(page).nearest(y, radius).cloned()
    }

    /// Click-to-annotate: bind a comment to the clicked page, the nearest
    /// line and the active section.
    pub fn comment_at(
        &mut self,
        repo: &mut dyn Repository,
        page: &PageItems,
        y: f64,
        body: &str,
    ) -> Result<Comment, DocReviewError> {
        let file_id = self.open_file_id()?;
        let mut draft = NewComment::new(file_id, page.page, body);
        draft.line_no = self.line_at(page, y).map(|line| line.line_no);
        draft.section_id = self.active_section.clone();
        self.current_page = page.page;
        add_comment(repo, draft, &self.sections)
    }

    /// Export every comment of the open document. Returns the row count.
    pub fn export_comments<W: Write>(
        &self,
        repo: &dyn Repository,
        writer: W,
    ) -> Result<usize, DocReviewError> {
        let file_id = self.open_file_id()?;
        let comments = repo.list_comments(&file_id)?;
        let rows = export_rows(&comments, &self.labels);
        write_csv(&rows, writer)
    }

    fn open_file_id(&self) -> Result<String, DocReviewError> {
        self.document
            .as_ref()
            .map(|d| d.file.id.clone())
            .ok_or_else(|| DocReviewError::InvalidInput("no document is open".into()))
    }
}
