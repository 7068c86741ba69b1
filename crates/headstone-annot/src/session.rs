//! Per-image annotation session: polygons, metadata and the optional
//! world transform.

use std::path::Path;

use headstone_core::{AnnotationRecord, Polygon, WorldFile, WorldFileError};

/// Errors from session editing operations.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("polygon index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    WorldFile(#[from] WorldFileError),
}

/// Everything owned by one loaded image: its pixel size, the optional
/// georeferencing transform, and the current set of polygons.
///
/// The session is an explicitly passed context object; nothing here is
/// process-global. Polygons are values -- editing replaces the polygon at
/// an index rather than mutating shared graph state, which keeps undo and
/// concurrent rendering simple for the editor collaborator.
#[derive(Clone, Debug)]
pub struct AnnotationSession {
    image_width: u32,
    image_height: u32,
    transform: Option<WorldFile>,
    polygons: Vec<Polygon>,
    next_id: i64,
}

impl AnnotationSession {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            transform: None,
            polygons: Vec::new(),
            next_id: 0,
        }
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// The session's world transform, if one loaded successfully.
    pub fn transform(&self) -> Option<&WorldFile> {
        self.transform.as_ref()
    }

    /// Attempt to load the sidecar world file for this image.
    ///
    /// A malformed or missing file downgrades the session to pixel-only
    /// coordinates with a warning; annotation continues to work.
    pub fn load_transform(&mut self, path: impl AsRef<Path>) {
        match WorldFile::load(path.as_ref()) {
            Ok(wf) => self.transform = Some(wf),
            Err(err) => {
                log::warn!(
                    "world file {:?} unavailable ({err}), using pixel coordinates",
                    path.as_ref()
                );
                self.transform = None;
            }
        }
    }

    pub fn set_transform(&mut self, transform: Option<WorldFile>) {
        self.transform = transform;
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Add a polygon, assigning the next free id if it has none.
    /// Returns its index.
    pub fn add_polygon(&mut self, mut polygon: Polygon) -> usize {
        if polygon.id.is_none() {
            polygon.id = Some(self.next_id);
        }
        self.bump_next_id(polygon.id);
        self.polygons.push(polygon);
        self.polygons.len() - 1
    }

    /// Adopt a batch of freshly detected polygons, assigning sequential
    /// ids to each.
    pub fn adopt_detections(&mut self, polygons: &[Polygon]) {
        self.polygons.reserve(polygons.len());
        for p in polygons {
            self.add_polygon(*p);
        }
    }

    /// Replace the polygon at `index` with an edited copy.
    pub fn replace_polygon(&mut self, index: usize, polygon: Polygon) -> Result<(), SessionError> {
        let len = self.polygons.len();
        let slot = self
            .polygons
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;
        *slot = polygon;
        self.bump_next_id(polygon.id);
        Ok(())
    }

    pub fn remove_polygon(&mut self, index: usize) -> Result<Polygon, SessionError> {
        if index >= self.polygons.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.polygons.len(),
            });
        }
        Ok(self.polygons.remove(index))
    }

    /// Update operator metadata without touching geometry.
    pub fn set_metadata(
        &mut self,
        index: usize,
        id: Option<i64>,
        row: Option<i64>,
        col: Option<i64>,
    ) -> Result<(), SessionError> {
        let len = self.polygons.len();
        let polygon = self
            .polygons
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })?;
        if id.is_some() {
            polygon.id = id;
        }
        if row.is_some() {
            polygon.row = row;
        }
        if col.is_some() {
            polygon.col = col;
        }
        let new_id = polygon.id;
        self.bump_next_id(new_id);
        Ok(())
    }

    /// Flatten every polygon into the persisted record format, in world
    /// coordinates when a transform is present.
    pub fn export_records(&self) -> Result<Vec<AnnotationRecord>, SessionError> {
        Ok(self
            .polygons
            .iter()
            .map(|p| p.to_record(self.transform.as_ref()))
            .collect())
    }

    /// Rebuild the polygon set from persisted records (the storage
    /// collaborator's load path), replacing any current polygons.
    ///
    /// # Errors
    ///
    /// Fails with [`WorldFileError::DegenerateTransform`] if records are
    /// in world coordinates but the transform cannot be inverted; the
    /// session is left unchanged in that case.
    pub fn import_records(&mut self, records: &[AnnotationRecord]) -> Result<(), SessionError> {
        let mut polygons = Vec::with_capacity(records.len());
        for record in records {
            polygons.push(Polygon::from_record(record, self.transform.as_ref())?);
        }
        self.polygons = polygons;
        self.next_id = self
            .polygons
            .iter()
            .filter_map(|p| p.id)
            .max()
            .map_or(0, |m| m + 1);
        Ok(())
    }

    fn bump_next_id(&mut self, id: Option<i64>) {
        if let Some(id) = id {
            self.next_id = self.next_id.max(id + 1);
        }
    }
}
