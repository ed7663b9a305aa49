//! Interactive boundary editing.
//!
//! [`ScissorsEditor`] turns pointer presses, drags and releases into a
//! [`Boundary`] of traced curves, then into a selection once the boundary is
//! closed.
//!
//! ## States
//! - **NoAction**: nothing placed yet.
//! - **SeedPlacement**: a press is adding a vertex; drags move it.
//! - **SeedAdjustment**: a press grabbed a shared vertex or split a curve;
//!   drags move that vertex.
//! - **Waiting**: between gestures.
//!
//! Every release goes back to `Waiting`. [`ScissorsEditor::cancel`] goes back
//! to `NoAction` from anywhere.
//!
//! ## Example
//! ```ignore
//! let mut editor = ScissorsEditor::new(image, ScissorsOptions::default())?;
//! for (x, y) in seeds {
//!     editor.place_seed(x, y, Modifiers::default());
//!     editor.release();
//! }
//! if editor.is_connected() {
//!     editor.commit(&mut selection, CombineOp::Replace, None)?;
//! }
//! ```

use serde::Serialize;

use crate::config::{ScissorsOptions, MAX_FEATHER_RADIUS};
use crate::error::{Result, ScissorsError};
use crate::selection::boundary::{Boundary, Curve, Point};
use crate::selection::gradient::GradientField;
use crate::selection::mask::{combine_region, CombineOp, SelectionMask};
use crate::selection::scan_convert::scan_convert;
use crate::selection::snap::{find_max_gradient, DistanceWeights};
use crate::selection::source::{check_channels, PixelSource};
use crate::selection::tracer::calculate_curve;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    NoAction,
    SeedPlacement,
    SeedAdjustment,
    Waiting,
}

/// Keyboard modifiers held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    /// Suppress edge snapping; with a commit, add to the selection.
    pub shift: bool,
    /// With a commit, subtract from the selection.
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };

    /// Combine operator selected by the modifiers, `default` when none is held.
    pub fn combine_op(self, default: CombineOp) -> CombineOp {
        match (self.shift, self.ctrl) {
            (true, true) => CombineOp::Intersect,
            (true, false) => CombineOp::Add,
            (false, true) => CombineOp::Subtract,
            (false, false) => default,
        }
    }
}

/// What a press did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// A new vertex is being placed.
    SeedStarted,
    /// A vertex shared by two curves was grabbed.
    VertexGrabbed,
    /// A curve was split and its new vertex grabbed.
    CurveSplit,
    /// The press landed inside the closed boundary; call
    /// [`ScissorsEditor::commit`] with this operator.
    Commit(CombineOp),
    /// Nothing to do (outside a closed boundary).
    Ignored,
}

impl PressOutcome {
    pub fn name(self) -> &'static str {
        match self {
            PressOutcome::SeedStarted => "seed",
            PressOutcome::VertexGrabbed => "vertex",
            PressOutcome::CurveSplit => "split",
            PressOutcome::Commit(_) => "commit",
            PressOutcome::Ignored => "ignored",
        }
    }
}

/// What a press at a position would do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTarget {
    Vertex,
    Curve,
    Inside(CombineOp),
    Outside,
    Nothing,
}

impl HoverTarget {
    /// Short label for cursor feedback, e.g. `"inside:add"`.
    pub fn label(self) -> String {
        match self {
            HoverTarget::Vertex => "vertex".into(),
            HoverTarget::Curve => "curve".into(),
            HoverTarget::Inside(op) => format!("inside:{}", op.name()),
            HoverTarget::Outside => "outside".into(),
            HoverTarget::Nothing => "nothing".into(),
        }
    }
}

/// Everything a drawing layer needs to render the editor.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Overlay {
    /// Traced curves short enough to draw.
    pub curves: Vec<Vec<Point>>,
    /// Vertex handles.
    pub vertices: Vec<Point>,
    /// Crosshair for the seed being placed.
    pub seed: Option<Point>,
    /// Provisional curve from the last vertex to the cursor.
    pub livewire: Option<Vec<Point>>,
    /// Straight guide lines, for seeds without a livewire and vertices being moved.
    pub guides: Vec<[Point; 2]>,
    /// Vertex being moved.
    pub active_vertex: Option<Point>,
}

pub struct ScissorsEditor<S> {
    field: GradientField<S>,
    options: ScissorsOptions,
    weights: DistanceWeights,
    state: EditorState,
    boundary: Boundary,
    /// Current pointer position, after snapping.
    cursor: Point,
    /// Last placed vertex; new curves start here.
    anchor: Point,
    /// Position of the vertex being adjusted.
    moving: Point,
    first_point: bool,
    /// Curve starting at the adjusted vertex.
    outgoing: Option<usize>,
    /// Curve ending at the adjusted vertex.
    incoming: Option<usize>,
    region: Option<SelectionMask>,
    livewire: Option<Curve>,
}

impl<S: PixelSource> ScissorsEditor<S> {
    /// Editor over an image; gradients are computed on demand.
    pub fn new(source: S, options: ScissorsOptions) -> Result<Self> {
        check_channels(source.channels())?;
        Self::with_field(GradientField::new(source), options)
    }

    /// Editor over an existing gradient field.
    pub fn with_field(field: GradientField<S>, options: ScissorsOptions) -> Result<Self> {
        options.validate()?;
        let weights = DistanceWeights::new(options.gradient_search);
        Ok(Self {
            field,
            options,
            weights,
            state: EditorState::NoAction,
            boundary: Boundary::new(),
            cursor: Point::default(),
            anchor: Point::default(),
            moving: Point::default(),
            first_point: true,
            outgoing: None,
            incoming: None,
            region: None,
            livewire: None,
        })
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn options(&self) -> &ScissorsOptions {
        &self.options
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn current_curves(&self) -> &Boundary {
        &self.boundary
    }

    pub fn is_connected(&self) -> bool {
        self.boundary.is_connected()
    }

    /// Filled region of the closed boundary, rebuilt on every release.
    pub fn region(&self) -> Option<&SelectionMask> {
        self.region.as_ref()
    }

    pub fn livewire(&self) -> Option<&Curve> {
        self.livewire.as_ref()
    }

    pub fn field(&self) -> &GradientField<S> {
        &self.field
    }

    /// Pointer press.
    pub fn place_seed(&mut self, x: i32, y: i32, modifiers: Modifiers) -> PressOutcome {
        let raw = Point::new(x, y);

        if self.state == EditorState::NoAction {
            self.cursor = self.snap(raw, modifiers);
            self.anchor = self.cursor;
            self.state = EditorState::SeedPlacement;
            log::debug!("first seed at ({}, {})", self.cursor.x, self.cursor.y);
            return PressOutcome::SeedStarted;
        }

        let halfwidth = self.options.point_halfwidth;
        let clicked = raw.clamped(self.width(), self.height());
        let hit = self.boundary.vertex_at(raw, halfwidth);

        if hit.is_shared() {
            self.outgoing = hit.outgoing;
            self.incoming = hit.incoming;
            self.cursor = clicked;
            self.moving = clicked;
            self.state = EditorState::SeedAdjustment;
            log::debug!("grabbed vertex near ({}, {})", clicked.x, clicked.y);
            return PressOutcome::VertexGrabbed;
        }

        // An endpoint of an open chain is not draggable and hides the curve
        // under it, as does anything close enough to close the loop
        if hit.count == 0 && !self.closes_loop_at(clicked) {
            if let Some((index, _)) = self.boundary.curve_at(raw, halfwidth) {
                if let Some((outgoing, incoming)) = self.boundary.split(index, clicked) {
                    self.outgoing = Some(outgoing);
                    self.incoming = Some(incoming);
                    self.cursor = clicked;
                    self.moving = clicked;
                    self.state = EditorState::SeedAdjustment;
                    log::debug!("split curve {index} at ({}, {})", clicked.x, clicked.y);
                    return PressOutcome::CurveSplit;
                }
            }
        }

        if self.is_connected() {
            return match &self.region {
                Some(region) if region.contains(x, y) => {
                    PressOutcome::Commit(modifiers.combine_op(self.options.operation))
                }
                _ => PressOutcome::Ignored,
            };
        }

        self.cursor = self.snap(raw, modifiers);
        self.state = EditorState::SeedPlacement;
        PressOutcome::SeedStarted
    }

    /// Pointer press that also performs the commit a press inside the closed
    /// boundary asks for.
    ///
    /// On [`PressOutcome::Commit`] the region is merged into `selection` with
    /// the configured feathering and the editor is back in `NoAction`.
    pub fn press(
        &mut self,
        x: i32,
        y: i32,
        modifiers: Modifiers,
        selection: &mut SelectionMask,
    ) -> Result<PressOutcome> {
        let outcome = self.place_seed(x, y, modifiers);
        if let PressOutcome::Commit(op) = outcome {
            self.commit(selection, op, None)?;
        }
        Ok(outcome)
    }

    /// Pointer motion with the button held.
    pub fn drag_active_vertex(&mut self, x: i32, y: i32, modifiers: Modifiers) {
        let raw = Point::new(x, y);
        match self.state {
            EditorState::SeedPlacement => {
                self.cursor = self.snap(raw, modifiers);
                if self.first_point {
                    self.anchor = self.cursor;
                } else if self.options.interactive {
                    self.update_livewire();
                }
            }
            EditorState::SeedAdjustment => {
                self.cursor = self.snap(raw, modifiers);
                self.moving = self.cursor;
            }
            EditorState::NoAction | EditorState::Waiting => {}
        }
    }

    /// Pointer release: finish the current gesture.
    pub fn release(&mut self) {
        match self.state {
            EditorState::SeedPlacement if self.first_point => {
                self.first_point = false;
            }
            EditorState::SeedPlacement => self.finish_placement(),
            EditorState::SeedAdjustment => self.finish_adjustment(),
            EditorState::NoAction | EditorState::Waiting => return,
        }

        self.state = EditorState::Waiting;
        self.livewire = None;

        if self.is_connected() {
            self.region = Some(self.scan_boundary());
        }
    }

    /// Drop the boundary and start over. The gradient cache is kept.
    pub fn cancel(&mut self) {
        self.boundary.clear();
        self.state = EditorState::NoAction;
        self.first_point = true;
        self.outgoing = None;
        self.incoming = None;
        self.region = None;
        self.livewire = None;
        log::debug!("editor reset");
    }

    /// Merge the closed boundary into `selection` and reset.
    ///
    /// `feather_radius` overrides the configured feathering; `None` uses
    /// [`ScissorsOptions::effective_feather`]. The boundary is left untouched
    /// when it is not closed, when the radius is out of range or when
    /// `selection` does not match the image size.
    pub fn commit(
        &mut self,
        selection: &mut SelectionMask,
        op: CombineOp,
        feather_radius: Option<f32>,
    ) -> Result<()> {
        if !self.is_connected() {
            return Err(ScissorsError::NotConnected);
        }
        let feather = match feather_radius {
            Some(r) if !(0.0..=MAX_FEATHER_RADIUS).contains(&r) => {
                return Err(ScissorsError::InvalidOptions(format!(
                    "feather_radius {r} outside 0..={MAX_FEATHER_RADIUS}"
                )));
            }
            Some(r) => r,
            None => self.options.effective_feather(),
        };

        let region = match self.region.take() {
            Some(region) => region,
            None => self.scan_boundary(),
        };
        if let Err(e) = combine_region(selection, &region, op, feather) {
            self.region = Some(region);
            return Err(e);
        }

        log::debug!(
            "committed {} pixels with {}",
            region.pixel_count(),
            op.name()
        );
        self.cancel();
        Ok(())
    }

    /// What a press at (x, y) would do, for cursor feedback.
    pub fn hover(&self, x: i32, y: i32, modifiers: Modifiers) -> HoverTarget {
        let p = Point::new(x, y);
        let halfwidth = self.options.point_halfwidth;

        let hit = self.boundary.vertex_at(p, halfwidth);
        if hit.is_shared() {
            return HoverTarget::Vertex;
        }
        if hit.count == 0
            && !self.closes_loop_at(p.clamped(self.width(), self.height()))
            && self.boundary.curve_at(p, halfwidth).is_some()
        {
            return HoverTarget::Curve;
        }
        match &self.region {
            Some(region) if self.is_connected() && region.contains(x, y) => {
                HoverTarget::Inside(modifiers.combine_op(self.options.operation))
            }
            Some(_) if self.is_connected() => HoverTarget::Outside,
            _ => HoverTarget::Nothing,
        }
    }

    /// Shapes to draw for the current state.
    pub fn overlay(&self) -> Overlay {
        let mut overlay = Overlay {
            curves: self
                .boundary
                .drawable(self.options.max_points)
                .into_iter()
                .map(|c| c.points.clone())
                .collect(),
            vertices: self.boundary.curves().iter().map(|c| c.start).collect(),
            ..Overlay::default()
        };

        if self.state != EditorState::NoAction && !self.first_point && !self.is_connected() {
            overlay.vertices.push(self.anchor);
        }

        match self.state {
            EditorState::SeedPlacement => {
                overlay.seed = Some(self.cursor);
                match &self.livewire {
                    Some(live) if live.len() <= self.options.max_points => {
                        overlay.livewire = Some(live.points.clone());
                    }
                    _ if !self.first_point => overlay.guides.push([self.anchor, self.cursor]),
                    _ => {}
                }
            }
            EditorState::SeedAdjustment => {
                if let Some(c) = self.outgoing.and_then(|i| self.boundary.curve(i)) {
                    overlay.guides.push([c.end, self.moving]);
                }
                if let Some(c) = self.incoming.and_then(|i| self.boundary.curve(i)) {
                    overlay.guides.push([c.start, self.moving]);
                }
                overlay.active_vertex = Some(self.moving);
            }
            EditorState::NoAction | EditorState::Waiting => {}
        }

        overlay
    }

    /// Whether a seed released at `p` would close the open boundary.
    fn closes_loop_at(&self, p: Point) -> bool {
        let halfwidth = self.options.point_halfwidth;
        match self.boundary.first_vertex() {
            Some(first) if !self.is_connected() => {
                (p.x - first.x).abs() <= halfwidth && (p.y - first.y).abs() <= halfwidth
            }
            _ => false,
        }
    }

    fn finish_placement(&mut self) {
        if self.closes_loop_at(self.cursor) {
            if let Some(first) = self.boundary.first_vertex() {
                self.cursor = first;
                self.boundary.set_connected(true);
                log::debug!("boundary closed at ({}, {})", first.x, first.y);
            }
        }

        if self.cursor != self.anchor {
            let index = self.boundary.push(Curve::new(self.anchor, self.cursor));
            self.anchor = self.cursor;
            self.trace(index);
        }
    }

    fn finish_adjustment(&mut self) {
        if let Some(index) = self.outgoing.take() {
            if let Some(curve) = self.boundary.curve_mut(index) {
                curve.start = self.moving;
            }
            self.trace(index);
        }
        if let Some(index) = self.incoming.take() {
            if let Some(curve) = self.boundary.curve_mut(index) {
                curve.end = self.moving;
            }
            self.trace(index);
        }
    }

    /// Recompute the points of curve `index` from its endpoints.
    fn trace(&mut self, index: usize) {
        let Some(curve) = self.boundary.curve(index) else {
            return;
        };
        let (start, end) = (curve.start, curve.end);
        let points = calculate_curve(&mut self.field, start, end, &self.options);
        if let Some(curve) = self.boundary.curve_mut(index) {
            curve.points = points;
        }
    }

    /// Retrace the livewire if either endpoint moved.
    fn update_livewire(&mut self) {
        if let Some(live) = &self.livewire {
            if live.start == self.anchor && live.end == self.cursor {
                return;
            }
        }
        let mut live = Curve::new(self.anchor, self.cursor);
        live.points = calculate_curve(&mut self.field, self.anchor, self.cursor, &self.options);
        self.livewire = Some(live);
    }

    fn snap(&mut self, p: Point, modifiers: Modifiers) -> Point {
        let p = if modifiers.shift {
            p
        } else {
            find_max_gradient(&mut self.field, p, &self.weights)
        };
        p.clamped(self.width(), self.height())
    }

    fn scan_boundary(&self) -> SelectionMask {
        scan_convert(self.boundary.polylines(), self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn flat_editor(size: usize, options: ScissorsOptions) -> ScissorsEditor<Array3<u8>> {
        let img = Array3::<u8>::from_elem((size, size, 3), 128);
        ScissorsEditor::new(img, options).unwrap()
    }

    fn click(editor: &mut ScissorsEditor<Array3<u8>>, x: i32, y: i32) -> PressOutcome {
        let outcome = editor.place_seed(x, y, Modifiers::SHIFT);
        editor.release();
        outcome
    }

    /// Rectangle (10,10)-(30,25), closed by clicking the first vertex again.
    fn closed_rectangle() -> ScissorsEditor<Array3<u8>> {
        let mut editor = flat_editor(40, ScissorsOptions::default());
        for (x, y) in [(10, 10), (30, 10), (30, 25), (10, 25), (10, 10)] {
            click(&mut editor, x, y);
        }
        editor
    }

    #[test]
    fn test_first_click_places_anchor_only() {
        let mut editor = flat_editor(20, ScissorsOptions::default());
        assert_eq!(editor.state(), EditorState::NoAction);
        assert_eq!(click(&mut editor, 5, 5), PressOutcome::SeedStarted);
        assert_eq!(editor.state(), EditorState::Waiting);
        assert!(editor.current_curves().is_empty());
    }

    #[test]
    fn test_clicks_append_curves() {
        let mut editor = flat_editor(20, ScissorsOptions::default());
        click(&mut editor, 2, 2);
        click(&mut editor, 2, 12);
        click(&mut editor, 12, 12);

        let curves = editor.current_curves().curves();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].start, Point::new(2, 2));
        assert_eq!(curves[0].end, Point::new(2, 12));
        assert_eq!(curves[0].points.len(), 11);
        assert_eq!(curves[1].points.first(), Some(&Point::new(12, 12)));
        assert_eq!(curves[1].points.last(), Some(&Point::new(2, 12)));
        assert!(!editor.is_connected());
    }

    #[test]
    fn test_click_on_last_vertex_adds_nothing() {
        let mut editor = flat_editor(20, ScissorsOptions::default());
        click(&mut editor, 2, 2);
        click(&mut editor, 2, 12);
        click(&mut editor, 2, 12);
        assert_eq!(editor.current_curves().len(), 1);
    }

    #[test]
    fn test_snap_tolerance_closes_loop() {
        let halfwidth = ScissorsOptions::default().point_halfwidth;

        let mut editor = flat_editor(60, ScissorsOptions::default());
        click(&mut editor, 10, 10);
        click(&mut editor, 40, 10);
        click(&mut editor, 40, 40);
        click(&mut editor, 10 + halfwidth, 10 + halfwidth);
        assert!(editor.is_connected());
        assert_eq!(editor.current_curves().curves()[2].end, Point::new(10, 10));

        let mut editor = flat_editor(60, ScissorsOptions::default());
        click(&mut editor, 10, 10);
        click(&mut editor, 40, 10);
        click(&mut editor, 40, 40);
        click(&mut editor, 10 + halfwidth + 1, 10 + halfwidth + 1);
        assert!(!editor.is_connected());
        assert_eq!(editor.current_curves().len(), 3);
    }

    #[test]
    fn test_click_beside_first_vertex_closes_instead_of_splitting() {
        let halfwidth = ScissorsOptions::default().point_halfwidth;

        let mut editor = flat_editor(60, ScissorsOptions::default());
        click(&mut editor, 10, 10);
        click(&mut editor, 40, 10);
        click(&mut editor, 40, 40);

        // On the traced first curve, outside the vertex hit circle
        let outcome = click(&mut editor, 10 + halfwidth, 10);
        assert_eq!(outcome, PressOutcome::SeedStarted);
        assert!(editor.is_connected());

        let curves = editor.current_curves().curves();
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[0].start, Point::new(10, 10));
        assert_eq!(curves[0].end, Point::new(40, 10));
        assert_eq!(curves[2].end, Point::new(10, 10));
    }

    #[test]
    fn test_closed_rectangle_region() {
        let editor = closed_rectangle();
        assert!(editor.is_connected());
        assert_eq!(editor.current_curves().len(), 4);
        let region = editor.region().unwrap();
        assert_eq!(region.pixel_count(), 20 * 15);
    }

    #[test]
    fn test_hover_targets() {
        let editor = closed_rectangle();
        assert_eq!(editor.hover(30, 10, Modifiers::NONE), HoverTarget::Vertex);
        assert_eq!(editor.hover(20, 10, Modifiers::NONE), HoverTarget::Curve);
        assert_eq!(
            editor.hover(20, 18, Modifiers::NONE),
            HoverTarget::Inside(CombineOp::Replace)
        );
        assert_eq!(
            editor.hover(20, 18, Modifiers { shift: true, ctrl: true }),
            HoverTarget::Inside(CombineOp::Intersect)
        );
        assert_eq!(editor.hover(2, 35, Modifiers::NONE), HoverTarget::Outside);
        assert_eq!(editor.hover(20, 18, Modifiers::SHIFT).label(), "inside:add");

        let open = flat_editor(20, ScissorsOptions::default());
        assert_eq!(open.hover(5, 5, Modifiers::NONE), HoverTarget::Nothing);
    }

    #[test]
    fn test_hover_matches_press_on_open_chain() {
        let mut editor = flat_editor(60, ScissorsOptions::default());
        click(&mut editor, 10, 10);
        click(&mut editor, 40, 10);
        click(&mut editor, 40, 40);

        // Chain ends place seeds rather than grab
        assert_eq!(editor.hover(10, 10, Modifiers::NONE), HoverTarget::Nothing);
        assert_eq!(editor.hover(40, 40, Modifiers::NONE), HoverTarget::Nothing);
        // Inside the closing tolerance the curve is hidden
        assert_eq!(editor.hover(14, 10, Modifiers::NONE), HoverTarget::Nothing);
        assert_eq!(editor.hover(25, 10, Modifiers::NONE), HoverTarget::Curve);
        assert_eq!(editor.hover(40, 10, Modifiers::NONE), HoverTarget::Vertex);
    }

    #[test]
    fn test_click_inside_requests_commit() {
        let mut editor = closed_rectangle();
        let outcome = editor.place_seed(20, 18, Modifiers { shift: false, ctrl: true });
        assert_eq!(outcome, PressOutcome::Commit(CombineOp::Subtract));
        assert_eq!(outcome.name(), "commit");

        let mut selection = SelectionMask::new(40, 40);
        selection.set(0, 0, 255);
        editor.commit(&mut selection, CombineOp::Add, None).unwrap();
        assert_eq!(selection.pixel_count(), 20 * 15 + 1);
        assert_eq!(editor.state(), EditorState::NoAction);
        assert!(editor.current_curves().is_empty());
    }

    #[test]
    fn test_press_inside_commits_and_resets() {
        let mut editor = closed_rectangle();
        let mut selection = SelectionMask::new(40, 40);
        let outcome = editor
            .press(20, 18, Modifiers::NONE, &mut selection)
            .unwrap();
        assert_eq!(outcome, PressOutcome::Commit(CombineOp::Replace));
        assert_eq!(selection.pixel_count(), 20 * 15);
        assert_eq!(editor.state(), EditorState::NoAction);
        assert!(!editor.is_connected());
        assert!(editor.region().is_none());

        // Outside any boundary a press is an ordinary seed
        let outcome = editor.press(5, 5, Modifiers::SHIFT, &mut selection).unwrap();
        assert_eq!(outcome, PressOutcome::SeedStarted);
        assert_eq!(selection.pixel_count(), 20 * 15);
    }

    #[test]
    fn test_commit_feather_override() {
        let mut editor = closed_rectangle();
        let mut selection = SelectionMask::new(40, 40);
        assert!(matches!(
            editor.commit(&mut selection, CombineOp::Replace, Some(-1.0)),
            Err(ScissorsError::InvalidOptions(_))
        ));
        assert!(editor.is_connected());
        assert_eq!(selection.pixel_count(), 0);

        editor
            .commit(&mut selection, CombineOp::Replace, Some(3.0))
            .unwrap();
        let soft = selection
            .as_array()
            .iter()
            .filter(|&&v| v > 0 && v < 255)
            .count();
        assert!(soft > 0);
        assert!(!editor.is_connected());
    }

    #[test]
    fn test_click_outside_closed_boundary_is_ignored() {
        let mut editor = closed_rectangle();
        assert_eq!(editor.place_seed(2, 35, Modifiers::SHIFT), PressOutcome::Ignored);
        assert_eq!(editor.current_curves().len(), 4);
    }

    #[test]
    fn test_commit_requires_closed_boundary() {
        let mut editor = flat_editor(20, ScissorsOptions::default());
        click(&mut editor, 2, 2);
        click(&mut editor, 2, 12);
        let mut selection = SelectionMask::new(20, 20);
        assert_eq!(
            editor.commit(&mut selection, CombineOp::Replace, None),
            Err(ScissorsError::NotConnected)
        );
        assert_eq!(editor.current_curves().len(), 1);
        assert_eq!(selection.pixel_count(), 0);
    }

    #[test]
    fn test_commit_size_mismatch_keeps_boundary() {
        let mut editor = closed_rectangle();
        let mut selection = SelectionMask::new(10, 10);
        assert!(editor.commit(&mut selection, CombineOp::Replace, None).is_err());
        assert!(editor.is_connected());
        assert!(editor.region().is_some());
    }

    #[test]
    fn test_split_covers_original_span() {
        let mut editor = flat_editor(40, ScissorsOptions::default());
        click(&mut editor, 5, 20);
        click(&mut editor, 35, 20);
        let original: Vec<Point> = editor.current_curves().curves()[0].points.clone();

        // Press on the curve, release without moving
        assert_eq!(editor.place_seed(18, 21, Modifiers::SHIFT), PressOutcome::CurveSplit);
        editor.release();

        let curves = editor.current_curves().curves();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].end, Point::new(18, 21));
        assert_eq!(curves[1].start, Point::new(18, 21));

        // Second half then first half, minus the shared vertex
        let mut joined = curves[1].points.clone();
        joined.extend(curves[0].points.iter().skip(1));
        let span = |pts: &[Point]| {
            (
                pts.iter().map(|p| p.x).min(),
                pts.iter().map(|p| p.x).max(),
            )
        };
        assert_eq!(span(&joined), span(&original));
        assert_eq!(joined.first(), original.first());
        assert_eq!(joined.last(), original.last());
    }

    #[test]
    fn test_drag_shared_vertex_retraces_neighbors() {
        let mut editor = flat_editor(40, ScissorsOptions::default());
        for (x, y) in [(5, 5), (20, 5), (20, 30)] {
            click(&mut editor, x, y);
        }

        assert_eq!(editor.place_seed(21, 6, Modifiers::SHIFT), PressOutcome::VertexGrabbed);
        editor.drag_active_vertex(25, 5, Modifiers::SHIFT);
        assert_eq!(editor.overlay().active_vertex, Some(Point::new(25, 5)));
        editor.release();

        let curves = editor.current_curves().curves();
        assert_eq!(curves[0].end, Point::new(25, 5));
        assert_eq!(curves[1].start, Point::new(25, 5));
        assert_eq!(curves[0].points.first(), Some(&Point::new(25, 5)));
        assert_eq!(curves[1].points.last(), Some(&Point::new(25, 5)));
        assert_eq!(editor.state(), EditorState::Waiting);
    }

    #[test]
    fn test_chain_end_is_not_grabbed() {
        let mut editor = flat_editor(40, ScissorsOptions::default());
        click(&mut editor, 5, 5);
        click(&mut editor, 20, 5);
        // Last vertex of an open chain: falls through to placing a seed
        assert_eq!(editor.place_seed(20, 5, Modifiers::SHIFT), PressOutcome::SeedStarted);
    }

    #[test]
    fn test_livewire_follows_cursor() {
        let options = ScissorsOptions {
            interactive: true,
            ..ScissorsOptions::default()
        };
        let mut editor = flat_editor(30, options);
        click(&mut editor, 3, 3);

        editor.place_seed(10, 3, Modifiers::SHIFT);
        editor.drag_active_vertex(12, 9, Modifiers::SHIFT);
        let live = editor.livewire().unwrap();
        assert_eq!(live.start, Point::new(3, 3));
        assert_eq!(live.points.first(), Some(&Point::new(12, 9)));
        assert_eq!(live.points.last(), Some(&Point::new(3, 3)));
        assert!(editor.overlay().livewire.is_some());

        editor.release();
        assert!(editor.livewire().is_none());
        assert_eq!(editor.current_curves().curves()[0].end, Point::new(12, 9));
    }

    #[test]
    fn test_cancel_resets_everything() {
        let mut editor = closed_rectangle();
        editor.cancel();
        assert_eq!(editor.state(), EditorState::NoAction);
        assert!(!editor.is_connected());
        assert!(editor.current_curves().is_empty());
        assert!(editor.region().is_none());
        assert_eq!(click(&mut editor, 4, 4), PressOutcome::SeedStarted);
        assert!(editor.current_curves().is_empty());
    }

    #[test]
    fn test_seed_snaps_to_edge() {
        let mut img = Array3::<u8>::zeros((40, 40, 1));
        for y in 0..40 {
            for x in 20..40 {
                img[[y, x, 0]] = 255;
            }
        }
        let mut editor = ScissorsEditor::new(img, ScissorsOptions::default()).unwrap();
        editor.place_seed(15, 20, Modifiers::NONE);
        let snapped = editor.cursor();
        assert!(snapped.x == 19 || snapped.x == 20);
        assert_eq!(snapped.y, 20);

        editor.cancel();
        editor.place_seed(15, 20, Modifiers::SHIFT);
        assert_eq!(editor.cursor(), Point::new(15, 20));
    }

    #[test]
    fn test_overlay_skips_long_curves() {
        let options = ScissorsOptions {
            max_points: 5,
            ..ScissorsOptions::default()
        };
        let mut editor = flat_editor(30, options);
        click(&mut editor, 2, 2);
        click(&mut editor, 4, 2);
        click(&mut editor, 4, 20);
        let overlay = editor.overlay();
        assert_eq!(overlay.curves.len(), 1);
        assert_eq!(overlay.vertices.len(), 3);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let img = Array3::<u8>::zeros((4, 4, 5));
        assert!(matches!(
            ScissorsEditor::new(img, ScissorsOptions::default()),
            Err(ScissorsError::UnsupportedChannels(5))
        ));
        let options = ScissorsOptions {
            feather_radius: -1.0,
            ..ScissorsOptions::default()
        };
        let img = Array3::<u8>::zeros((4, 4, 1));
        assert!(ScissorsEditor::new(img, options).is_err());
    }
}
