//! GeofenceEditorController - one editor core for every boundary and waypoint screen
//!
//! The controller owns the map surface, the overlay store and the live drawing
//! session for as long as one editor screen is mounted. Dropping it releases
//! the surface's overlays and cancels any gesture in flight, on every exit path.

use crate::config::EditorConfig;
use crate::domain::{
    BaseLayer, GeoPoint, Geometry, OverlayEntry, OverlayId, ProjectedGeometry, Role,
};
use crate::error::{DegenerateGeometryError, MalformedGeometryError, SearchError};
use crate::overlays::GeometryOverlayStore;
use crate::projection::{clamp_to_world, to_geographic, to_projected};
use crate::session::{DrawingSession, GestureEvent, SessionState, Transition};
use crate::wkt;

use super::search::Geocoder;
use super::surface::MapSurface;

/// Store id of the geometry being drawn
pub const DRAFT_ID: &str = "draft";

/// A persisted record handed in by the screen
#[derive(Debug, Clone, PartialEq)]
pub struct SavedGeometry {
    pub id: OverlayId,
    pub wkt: String,
}

impl SavedGeometry {
    pub fn new(id: impl Into<OverlayId>, wkt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            wkt: wkt.into(),
        }
    }
}

/// A saved record that could not be shown
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedGeometry {
    pub id: OverlayId,
    pub error: MalformedGeometryError,
}

/// Outcome of [`GeofenceEditorController::load_existing`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Records left out because "show others" is off
    pub hidden: usize,
    pub skipped: Vec<SkippedGeometry>,
}

/// A finished drawing, ready for the save handler
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedDrawing {
    /// Geographic geometry, rounded exactly as written to `wkt`
    pub geometry: Geometry,
    pub wkt: String,
}

pub struct GeofenceEditorController<S: MapSurface, G: Geocoder> {
    config: EditorConfig,
    surface: S,
    geocoder: G,
    store: GeometryOverlayStore,
    session: Option<DrawingSession>,
    base_layer: BaseLayer,
    rendered_revision: Option<u64>,
}

impl<S: MapSurface, G: Geocoder> GeofenceEditorController<S, G> {
    /// Take ownership of the surface and set up the initial view
    pub fn mount(surface: S, geocoder: G, config: EditorConfig) -> Self {
        let base_layer = config.base_layer;
        let mut editor = Self {
            config,
            surface,
            geocoder,
            store: GeometryOverlayStore::new(),
            session: None,
            base_layer,
            rendered_revision: None,
        };
        editor.apply_base_layer();
        let center = to_projected(editor.config.view.center());
        let zoom = editor.config.view.zoom;
        editor.surface.center_on(clamp_to_world(center), Some(zoom));
        log::debug!("Editor mounted with {:?} gesture", editor.config.gesture);
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn store(&self) -> &GeometryOverlayStore {
        &self.store
    }

    pub fn base_layer(&self) -> BaseLayer {
        self.base_layer
    }

    /// State of the live drawing session; `None` when the editor is idle
    pub fn drawing_state(&self) -> Option<&SessionState> {
        self.session.as_ref().map(DrawingSession::state)
    }

    /// Show saved records, the one matching `active` highlighted
    ///
    /// Records that fail to decode are skipped and reported; the rest of the
    /// batch still loads. Any draft in the store survives.
    pub fn load_existing(
        &mut self,
        saved: &[SavedGeometry],
        active: Option<&OverlayId>,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        let mut entries: Vec<OverlayEntry> = Vec::with_capacity(saved.len());

        for record in saved {
            let role = if active == Some(&record.id) {
                Role::Active
            } else {
                Role::Context
            };
            if role == Role::Context && !self.config.show_others {
                report.hidden += 1;
                continue;
            }
            match wkt::decode(&record.wkt) {
                Ok(geometry) => {
                    entries.push(OverlayEntry::new(record.id.clone(), project(&geometry), role));
                    report.loaded += 1;
                }
                Err(error) => {
                    log::warn!("Skipping saved geometry {}: {error}", record.id);
                    report.skipped.push(SkippedGeometry {
                        id: record.id.clone(),
                        error,
                    });
                }
            }
        }

        let drafts: Vec<OverlayEntry> = self
            .store
            .snapshot()
            .iter()
            .filter(|e| e.role == Role::Draft)
            .cloned()
            .collect();

        let focus = entries
            .iter()
            .find(|e| e.role == Role::Active)
            .map(|e| e.geometry.extent());

        self.store.replace_all(entries.into_iter().chain(drafts));
        self.redraw();

        if let Some(extent) = focus {
            if extent.is_degenerate() {
                self.surface.center_on(extent.center(), None);
            } else {
                self.surface.fit_view_to_extent(extent);
            }
        }

        report
    }

    /// Enter draw mode with the configured gesture
    ///
    /// A gesture already in progress is cancelled first, and any earlier
    /// draft is removed from the map.
    pub fn start_drawing(&mut self) {
        if let Some(mut previous) = self.session.take() {
            if previous.cancel() == Transition::Cancelled {
                log::debug!("Cancelled previous drawing session");
            }
        }
        self.store.remove_role(Role::Draft);

        let mut session = DrawingSession::new(self.config.gesture);
        session.arm();
        self.session = Some(session);
        self.redraw();
    }

    pub fn cancel_drawing(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
        }
        self.store.remove_role(Role::Draft);
        self.redraw();
    }

    /// Forward one pointer event into the live session
    ///
    /// Returns the finished drawing once the gesture completes; it is also
    /// left on the map as a draft so a failed save can be retried without
    /// redrawing.
    pub fn on_gesture_event(&mut self, event: GestureEvent) -> Option<CompletedDrawing> {
        let session = self.session.as_mut()?;
        let clamped = match event {
            GestureEvent::PointerDown(p) => GestureEvent::PointerDown(clamp_to_world(p)),
            GestureEvent::PointerMove(p) => GestureEvent::PointerMove(clamp_to_world(p)),
            GestureEvent::PointerUp(p) => GestureEvent::PointerUp(clamp_to_world(p)),
            GestureEvent::Click(p) => GestureEvent::Click(clamp_to_world(p)),
            other => other,
        };

        match session.handle(clamped) {
            Transition::Ignored => None,
            Transition::Started | Transition::Updated => {
                match session.preview() {
                    Some(preview) => {
                        self.store.upsert(OverlayEntry::new(DRAFT_ID, preview, Role::Draft));
                    }
                    None => {
                        self.store.remove(&OverlayId::from(DRAFT_ID));
                    }
                }
                self.redraw();
                None
            }
            Transition::Armed | Transition::Rejected(_) | Transition::Cancelled => {
                self.store.remove(&OverlayId::from(DRAFT_ID));
                self.redraw();
                None
            }
            Transition::Completed => {
                let finished = session.completed().cloned();
                // Completed is terminal; the editor goes back to idle
                self.session = None;
                let projected = finished?;
                self.finish_drawing(&projected)
            }
        }
    }

    /// Round the finished gesture to the written precision and publish it
    ///
    /// A ring that collapses once rounded is rejected like any other
    /// degenerate gesture and drawing is re-armed.
    fn finish_drawing(&mut self, projected: &ProjectedGeometry) -> Option<CompletedDrawing> {
        let geometry = wkt::snap(&projected.map(to_geographic));

        if let Geometry::Polygon(ring) = &geometry {
            let distinct_vertices = ring.distinct_vertices();
            let area = ring.area();
            if distinct_vertices < 3 || area <= 0.0 {
                let err = DegenerateGeometryError {
                    distinct_vertices,
                    area,
                };
                log::debug!("Discarding gesture after rounding: {err}");
                let mut session = DrawingSession::new(self.config.gesture);
                session.arm();
                self.session = Some(session);
                self.store.remove(&OverlayId::from(DRAFT_ID));
                self.redraw();
                return None;
            }
        }

        let wkt = wkt::encode(&geometry);
        self.store.upsert(OverlayEntry::new(DRAFT_ID, project(&geometry), Role::Draft));
        self.redraw();
        log::debug!("Drawing completed: {wkt}");

        Some(CompletedDrawing { geometry, wkt })
    }

    /// Resolve a place name and re-center the view on it
    ///
    /// Failures are returned to the caller; the drawing session and the
    /// overlays are not touched either way.
    pub async fn search(&mut self, query: &str) -> Result<GeoPoint, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::LocationNotFound {
                query: String::new(),
            });
        }

        let results = self.geocoder.geocode(query).await?;
        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::LocationNotFound {
                query: query.to_string(),
            })?;
        let point = GeoPoint::new(first.longitude, first.latitude).map_err(|_| {
            SearchError::InvalidCoordinate {
                longitude: first.longitude,
                latitude: first.latitude,
            }
        })?;

        log::info!(
            "Search `{query}` resolved to ({}, {})",
            point.longitude(),
            point.latitude()
        );
        let zoom = self.config.view.search_zoom;
        self.surface
            .center_on(clamp_to_world(to_projected(point)), Some(zoom));
        Ok(point)
    }

    /// Switch the base tiles; overlays are redrawn on top
    pub fn set_base_layer(&mut self, layer: BaseLayer) {
        if layer == self.base_layer {
            return;
        }
        self.base_layer = layer;
        self.apply_base_layer();
        self.rendered_revision = None;
        self.redraw();
        log::info!("Base layer switched to {}", layer.label());
    }

    fn apply_base_layer(&mut self) {
        let url = self.config.tiles.url_for(self.base_layer).to_string();
        self.surface.set_base_tile_source(self.base_layer, &url);
    }

    /// Push the store to the surface if it changed since the last push
    fn redraw(&mut self) {
        let revision = self.store.revision();
        if self.rendered_revision == Some(revision) {
            return;
        }
        self.surface.clear_overlay_features();
        for entry in self.store.snapshot().iter() {
            let style = self.config.styles.for_role(entry.role);
            self.surface.add_overlay_feature(&entry.geometry, style);
        }
        self.rendered_revision = Some(revision);
    }
}

impl<S: MapSurface, G: Geocoder> Drop for GeofenceEditorController<S, G> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.cancel();
        }
        self.store.remove_all();
        self.surface.clear_overlay_features();
        log::debug!("Editor unmounted");
    }
}

/// Geographic geometry onto the drawable part of the map
fn project(geometry: &Geometry) -> ProjectedGeometry {
    geometry.map(|p| clamp_to_world(to_projected(p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GestureKind, ProjectedPoint};
    use crate::editor::search::GeocodeResult;
    use crate::editor::surface::HeadlessSurface;
    use crate::error::MalformedReason;
    use futures::FutureExt;
    use futures::future::BoxFuture;

    /// Geocoder answering from a fixed list
    struct FakeGeocoder {
        results: Result<Vec<GeocodeResult>, SearchError>,
    }

    impl FakeGeocoder {
        fn none() -> Self {
            Self { results: Ok(vec![]) }
        }

        fn at(latitude: f64, longitude: f64) -> Self {
            Self {
                results: Ok(vec![GeocodeResult {
                    latitude,
                    longitude,
                    label: None,
                }]),
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        fn geocode<'a>(
            &'a self,
            _query: &'a str,
        ) -> BoxFuture<'a, Result<Vec<GeocodeResult>, SearchError>> {
            futures::future::ready(self.results.clone()).boxed()
        }
    }

    fn editor(config: EditorConfig) -> GeofenceEditorController<HeadlessSurface, FakeGeocoder> {
        GeofenceEditorController::mount(HeadlessSurface::new(), FakeGeocoder::none(), config)
    }

    fn pt(x: f64, y: f64) -> ProjectedPoint {
        ProjectedPoint::new(x, y)
    }

    #[test]
    fn test_mount_sets_base_layer_and_view() {
        let editor = editor(EditorConfig::default());
        let (layer, url) = editor.surface().base_layer.clone().unwrap();
        assert_eq!(layer, BaseLayer::Standard);
        assert!(url.contains("openstreetmap"));
        assert_eq!(editor.surface().zoom, Some(12));
        assert!(editor.surface().center.is_some());
        assert!(editor.drawing_state().is_none());
    }

    #[test]
    fn test_load_existing_isolates_bad_records() {
        let mut editor = editor(EditorConfig::default());
        let report = editor.load_existing(
            &[
                SavedGeometry::new(1_i64, "POLYGON ((10 20,30 20,30 40,10 40,10 20))"),
                SavedGeometry::new(2_i64, "not a geometry"),
            ],
            None,
        );
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, OverlayId::Number(2));
        assert_eq!(
            report.skipped[0].error.reason,
            MalformedReason::UnrecognizedShape
        );
        assert_eq!(editor.store().len(), 1);
        assert_eq!(editor.surface().features.len(), 1);
    }

    #[test]
    fn test_load_existing_marks_active_and_fits_view() {
        let mut editor = editor(EditorConfig::default());
        let active = OverlayId::from("stop-2");
        editor.load_existing(
            &[
                SavedGeometry::new("stop-1", "POINT(76.9 8.5)"),
                SavedGeometry::new("stop-2", "POLYGON((76.9 8.5,77.0 8.5,77.0 8.6))"),
            ],
            Some(&active),
        );
        assert_eq!(editor.store().get(&active).unwrap().role, Role::Active);
        assert_eq!(
            editor.store().get(&OverlayId::from("stop-1")).unwrap().role,
            Role::Context
        );
        let extent = editor.surface().fitted_extent.unwrap();
        let expected = to_projected(GeoPoint::new(77.0, 8.6).unwrap());
        assert!((extent.max_x - expected.x).abs() < 1e-6);
        assert!((extent.max_y - expected.y).abs() < 1e-6);
    }

    #[test]
    fn test_load_existing_hides_others_when_disabled() {
        let mut editor = editor(EditorConfig::default().with_show_others(false));
        let report = editor.load_existing(
            &[
                SavedGeometry::new(1_i64, "POINT(1 1)"),
                SavedGeometry::new(2_i64, "POINT(2 2)"),
            ],
            Some(&OverlayId::Number(2)),
        );
        assert_eq!(report.loaded, 1);
        assert_eq!(report.hidden, 1);
        assert_eq!(editor.store().snapshot()[0].id, OverlayId::Number(2));
    }

    #[test]
    fn test_box_drawing_yields_wkt_and_draft() {
        let mut editor = editor(EditorConfig::default());
        editor.start_drawing();
        assert_eq!(editor.drawing_state(), Some(&SessionState::Armed));

        let a = to_projected(GeoPoint::new(76.9, 8.5).unwrap());
        let b = to_projected(GeoPoint::new(77.0, 8.6).unwrap());
        assert!(editor.on_gesture_event(GestureEvent::PointerDown(a)).is_none());
        assert!(editor.on_gesture_event(GestureEvent::PointerMove(b)).is_none());
        assert_eq!(
            editor.store().get(&OverlayId::from(DRAFT_ID)).unwrap().role,
            Role::Draft
        );

        let done = editor.on_gesture_event(GestureEvent::PointerUp(b)).unwrap();
        assert_eq!(
            done.wkt,
            "POLYGON((76.9000000 8.5000000,77.0000000 8.5000000,77.0000000 8.6000000,\
             76.9000000 8.6000000,76.9000000 8.5000000))"
        );
        assert_eq!(wkt::decode(&done.wkt).unwrap(), done.geometry);
        assert!(editor.drawing_state().is_none());
        // Draft stays until the next drawing starts
        assert!(editor.store().get(&OverlayId::from(DRAFT_ID)).is_some());

        editor.start_drawing();
        assert!(editor.store().get(&OverlayId::from(DRAFT_ID)).is_none());
    }

    #[test]
    fn test_degenerate_box_clears_draft_and_rearms() {
        let mut editor = editor(EditorConfig::default());
        editor.start_drawing();
        editor.on_gesture_event(GestureEvent::PointerDown(pt(0.0, 0.0)));
        assert!(editor.store().get(&OverlayId::from(DRAFT_ID)).is_some());
        assert!(editor.on_gesture_event(GestureEvent::PointerUp(pt(0.0, 0.0))).is_none());
        assert_eq!(editor.drawing_state(), Some(&SessionState::Armed));
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_box_collapsing_when_rounded_is_rejected() {
        let mut editor = editor(EditorConfig::default());
        editor.start_drawing();
        editor.on_gesture_event(GestureEvent::PointerDown(pt(0.0, 0.0)));
        editor.on_gesture_event(GestureEvent::PointerMove(pt(0.001, 0.001)));
        assert!(editor.store().get(&OverlayId::from(DRAFT_ID)).is_some());

        // A millimetre box rounds to a single coordinate at 7 decimals
        let done = editor.on_gesture_event(GestureEvent::PointerUp(pt(0.001, 0.001)));
        assert!(done.is_none());
        assert_eq!(editor.drawing_state(), Some(&SessionState::Armed));
        assert!(editor.store().is_empty());

        // Drawing again still works
        editor.on_gesture_event(GestureEvent::PointerDown(pt(0.0, 0.0)));
        let done = editor.on_gesture_event(GestureEvent::PointerUp(pt(500.0, 500.0)));
        assert!(done.is_some());
    }

    #[test]
    fn test_draft_matches_saved_geometry() {
        let mut editor = editor(EditorConfig::default());
        editor.start_drawing();
        editor.on_gesture_event(GestureEvent::PointerDown(pt(1234.56789, -987.654321)));
        let done = editor
            .on_gesture_event(GestureEvent::PointerUp(pt(8765.4321, 4321.98765)))
            .unwrap();

        let draft = editor.store().get(&OverlayId::from(DRAFT_ID)).unwrap();
        assert_eq!(draft.geometry, project(&wkt::decode(&done.wkt).unwrap()));
        assert_eq!(draft.geometry, project(&done.geometry));
    }

    #[test]
    fn test_point_drawing() {
        let mut editor = editor(EditorConfig::waypoint());
        editor.start_drawing();
        let p = to_projected(GeoPoint::new(76.9366, 8.5241).unwrap());
        let done = editor.on_gesture_event(GestureEvent::Click(p)).unwrap();
        assert_eq!(done.wkt, "POINT(76.9366000 8.5241000)");
        assert_eq!(done.geometry, Geometry::Point(GeoPoint::new(76.9366, 8.5241).unwrap()));
    }

    #[test]
    fn test_pointer_outside_world_is_clamped() {
        let mut editor = editor(EditorConfig::waypoint());
        editor.start_drawing();
        let done = editor
            .on_gesture_event(GestureEvent::Click(pt(1.0e9, 0.0)))
            .unwrap();
        assert_eq!(done.wkt, "POINT(180.0000000 0.0000000)");
    }

    #[test]
    fn test_events_without_session_are_ignored() {
        let mut editor = editor(EditorConfig::default());
        assert!(editor.on_gesture_event(GestureEvent::Click(pt(1.0, 1.0))).is_none());
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_restart_cancels_gesture_in_progress() {
        let mut editor = editor(EditorConfig::default().with_gesture(GestureKind::Freeform));
        editor.start_drawing();
        editor.on_gesture_event(GestureEvent::Click(pt(0.0, 0.0)));
        editor.on_gesture_event(GestureEvent::Click(pt(10.0, 0.0)));
        editor.on_gesture_event(GestureEvent::Click(pt(10.0, 10.0)));
        assert!(editor.store().get(&OverlayId::from(DRAFT_ID)).is_some());

        editor.start_drawing();
        assert_eq!(editor.drawing_state(), Some(&SessionState::Armed));
        assert!(editor.store().is_empty());

        editor.cancel_drawing();
        assert!(editor.drawing_state().is_none());
    }

    #[test]
    fn test_reload_after_drawing_keeps_draft() {
        let mut editor = editor(EditorConfig::default());
        editor.start_drawing();
        editor.on_gesture_event(GestureEvent::PointerDown(pt(0.0, 0.0)));
        let done = editor
            .on_gesture_event(GestureEvent::PointerUp(pt(1000.0, 1000.0)))
            .unwrap();

        // Save handler failed; screen reloads the saved records
        let report = editor.load_existing(&[SavedGeometry::new(5_i64, done.wkt.clone())], None);
        assert_eq!(report.loaded, 1);
        assert_eq!(editor.store().len(), 2);
        let roles: Vec<Role> = editor.store().snapshot().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::Context, Role::Draft]);
    }

    #[test]
    fn test_set_base_layer_redraws_overlays() {
        let mut editor = editor(EditorConfig::default());
        editor.load_existing(&[SavedGeometry::new(1_i64, "POINT(1 1)")], None);
        let redraws = editor.surface().redraws;
        editor.set_base_layer(BaseLayer::Satellite);
        assert_eq!(editor.base_layer(), BaseLayer::Satellite);
        assert_eq!(editor.surface().base_layer.as_ref().unwrap().0, BaseLayer::Satellite);
        assert_eq!(editor.surface().redraws, redraws + 1);
        assert_eq!(editor.surface().features.len(), 1);

        editor.set_base_layer(BaseLayer::Satellite);
        assert_eq!(editor.surface().redraws, redraws + 1);
    }

    #[tokio::test]
    async fn test_search_recenters_view() {
        let mut editor = GeofenceEditorController::mount(
            HeadlessSurface::new(),
            FakeGeocoder::at(8.5241, 76.9366),
            EditorConfig::default(),
        );
        let point = editor.search("  Thiruvananthapuram ").await.unwrap();
        assert_eq!(point, GeoPoint::new(76.9366, 8.5241).unwrap());
        assert_eq!(editor.surface().center, Some(to_projected(point)));
        assert_eq!(editor.surface().zoom, Some(15));
    }

    #[tokio::test]
    async fn test_search_not_found() {
        let mut editor = editor(EditorConfig::default());
        editor.start_drawing();
        let err = editor.search("Atlantis").await.unwrap_err();
        assert_eq!(
            err,
            SearchError::LocationNotFound {
                query: "Atlantis".to_string()
            }
        );
        // Session unaffected
        assert_eq!(editor.drawing_state(), Some(&SessionState::Armed));
    }

    #[tokio::test]
    async fn test_search_transport_error_and_bad_coordinates() {
        let mut editor = GeofenceEditorController::mount(
            HeadlessSurface::new(),
            FakeGeocoder {
                results: Err(SearchError::Transport("timeout".to_string())),
            },
            EditorConfig::default(),
        );
        assert_eq!(
            editor.search("depot").await,
            Err(SearchError::Transport("timeout".to_string()))
        );

        let mut editor = GeofenceEditorController::mount(
            HeadlessSurface::new(),
            FakeGeocoder::at(95.0, 10.0),
            EditorConfig::default(),
        );
        assert!(matches!(
            editor.search("depot").await,
            Err(SearchError::InvalidCoordinate { .. })
        ));
    }
}
