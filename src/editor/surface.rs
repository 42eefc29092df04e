//! Rendering engine seam
//!
//! The tile renderer itself lives outside this crate. The editor only needs
//! to push base layer changes, overlay features and view changes into it.
//! Pointer input flows the other way: the host's event loop forwards each
//! pointer event to [`GeofenceEditorController::on_gesture_event`].
//!
//! [`GeofenceEditorController::on_gesture_event`]: super::GeofenceEditorController::on_gesture_event

use crate::domain::{BaseLayer, Extent, ProjectedGeometry, ProjectedPoint};
use crate::overlays::OverlayStyle;

/// Map surface capable of showing raster tiles and vector overlays
pub trait MapSurface {
    fn set_base_tile_source(&mut self, layer: BaseLayer, url_template: &str);

    fn add_overlay_feature(&mut self, geometry: &ProjectedGeometry, style: &OverlayStyle);

    fn clear_overlay_features(&mut self);

    /// Zoom and pan so the extent (projected coordinates) fills the view
    fn fit_view_to_extent(&mut self, extent: Extent);

    /// Pan to a point, optionally changing zoom
    fn center_on(&mut self, point: ProjectedPoint, zoom: Option<u8>);
}

/// Surface without a screen; records what it was asked to show
///
/// Used by the command line tool and in tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HeadlessSurface {
    pub base_layer: Option<(BaseLayer, String)>,
    pub features: Vec<(ProjectedGeometry, OverlayStyle)>,
    pub fitted_extent: Option<Extent>,
    pub center: Option<ProjectedPoint>,
    pub zoom: Option<u8>,
    /// Number of full overlay redraws
    pub redraws: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapSurface for HeadlessSurface {
    fn set_base_tile_source(&mut self, layer: BaseLayer, url_template: &str) {
        log::debug!("Base layer {} from {url_template}", layer.label());
        self.base_layer = Some((layer, url_template.to_string()));
    }

    fn add_overlay_feature(&mut self, geometry: &ProjectedGeometry, style: &OverlayStyle) {
        self.features.push((geometry.clone(), *style));
    }

    fn clear_overlay_features(&mut self) {
        self.features.clear();
        self.redraws += 1;
    }

    fn fit_view_to_extent(&mut self, extent: Extent) {
        log::debug!("Fitting view to {extent:?}");
        self.fitted_extent = Some(extent);
        self.center = Some(extent.center());
    }

    fn center_on(&mut self, point: ProjectedPoint, zoom: Option<u8>) {
        self.center = Some(point);
        if zoom.is_some() {
            self.zoom = zoom;
        }
    }
}
