//! End-to-end run over a synthetic cemetery photo: detect, suppress seam
//! duplicates, adopt into a session and round-trip the records through a
//! world transform and JSON.

use std::io::Write;

use headstone_annot::{
    detect_headstones, AnnotationRecord, AnnotationSession, CancelToken, NoProgress, NormBox,
    PipelineParams, RawDetections, RgbTile,
};
use image::{DynamicImage, Rgb, RgbImage};
use nalgebra::Point2;

const OBJECT_SIZE: u32 = 40;

/// Paint a dark photo with bright `OBJECT_SIZE` squares at the given
/// top-left pixel positions.
fn synthetic_photo(width: u32, height: u32, objects: &[(u32, u32)]) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([40, 48, 40]));
    for &(x0, y0) in objects {
        for y in y0..(y0 + OBJECT_SIZE).min(height) {
            for x in x0..(x0 + OBJECT_SIZE).min(width) {
                img.put_pixel(x, y, Rgb([230, 230, 230]));
            }
        }
    }
    DynamicImage::ImageRgb8(img)
}

/// Stand-in for the detection model: finds the bounding box of bright
/// pixels in the tile and scores it by how much of a full square is
/// visible, so clipped seam copies score lower than the whole object.
fn bright_blob_detector(tile: &RgbTile) -> RawDetections {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    let mut count = 0usize;
    for y in 0..tile.height {
        for x in 0..tile.width {
            if tile.pixel(x, y)[0] > 200 {
                count += 1;
                bounds = Some(match bounds {
                    None => (x, x, y, y),
                    Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
                });
            }
        }
    }

    let mut raw = RawDetections::default();
    if let Some((x0, x1, y0, y1)) = bounds {
        let full = (OBJECT_SIZE * OBJECT_SIZE) as f32;
        let (w, h) = (tile.width as f32, tile.height as f32);
        raw.boxes.push(NormBox::new(
            y0 as f32 / h,
            x0 as f32 / w,
            (y1 + 1) as f32 / h,
            (x1 + 1) as f32 / w,
        ));
        raw.scores.push(0.5 + 0.4 * (count as f32 / full).min(1.0));
        raw.classes.push(0);
    }
    raw
}

#[test]
fn detect_adopt_and_round_trip_records() {
    // per-tile debug lines from the run land on stderr for failed-test
    // diagnosis; repeated init across tests is a no-op
    headstone_core::init_with_level(log::LevelFilter::Debug).expect("logger");

    // 4x3 tile grid at the default 320/300 geometry. One object sits
    // inside tile (0, 0); the other straddles the column seam at x = 300
    // and is seen by two tiles, whose duplicates NMS must collapse.
    let objects = [(100u32, 100u32), (290u32, 400u32)];
    let photo = synthetic_photo(1000, 700, &objects);

    let outcome = detect_headstones(
        &photo,
        &bright_blob_detector,
        &PipelineParams::default(),
        &mut NoProgress,
        &CancelToken::new(),
    )
    .expect("detection run");

    assert!(!outcome.cancelled);
    assert_eq!(
        outcome.detections.len(),
        objects.len(),
        "expected one surviving box per painted object"
    );
    assert_eq!(outcome.polygons.len(), objects.len());

    // each survivor's centroid sits on its painted square
    for &(x0, y0) in &objects {
        let hit = outcome.polygons.iter().any(|p| {
            let c = p.centroid();
            c.x >= f64::from(x0)
                && c.x < f64::from(x0 + OBJECT_SIZE)
                && c.y >= f64::from(y0)
                && c.y < f64::from(y0 + OBJECT_SIZE)
        });
        assert!(hit, "no polygon centered on object at ({x0}, {y0})");
    }

    // the fully visible object comes back at its exact pixel bounds
    let interior = outcome
        .polygons
        .iter()
        .find(|p| p.centroid().x < 200.0)
        .expect("interior object polygon");
    assert!((interior.points[0].x - 100.0).abs() < 0.5);
    assert!((interior.points[0].y - 100.0).abs() < 0.5);
    assert!((interior.points[2].x - 140.0).abs() < 0.5);
    assert!((interior.points[2].y - 140.0).abs() < 0.5);

    // adopt into a georeferenced session and export
    let mut tfw = tempfile::NamedTempFile::new().expect("tfw file");
    write!(tfw, "0.03\n0.0\n0.0\n-0.03\n458000.0\n4633000.0\n").expect("write tfw");

    let mut session = AnnotationSession::new(photo.width(), photo.height());
    session.load_transform(tfw.path());
    assert!(session.transform().is_some());
    session.adopt_detections(&outcome.polygons);

    let records = session.export_records().expect("export");
    assert_eq!(records.len(), objects.len());
    assert!(records.iter().all(|r| r.id.is_some()));
    // coordinates left the pixel domain
    assert!(records.iter().all(|r| r.toplx > 400_000.0));

    // storage round-trip: JSON, then reimport into a fresh session
    let json = serde_json::to_string(&records).expect("serialize records");
    let restored: Vec<AnnotationRecord> = serde_json::from_str(&json).expect("parse records");

    let mut reloaded = AnnotationSession::new(photo.width(), photo.height());
    reloaded.load_transform(tfw.path());
    reloaded.import_records(&restored).expect("import");

    assert_eq!(reloaded.len(), session.len());
    for (a, b) in reloaded.polygons().iter().zip(session.polygons()) {
        assert_eq!(a.id, b.id);
        for (pa, pb) in a.points.iter().zip(b.points.iter()) {
            assert!((pa.x - pb.x).abs() < 1e-6);
            assert!((pa.y - pb.y).abs() < 1e-6);
        }
    }
}

#[test]
fn operator_edits_survive_export() {
    let photo = synthetic_photo(1000, 700, &[(100, 100)]);
    let outcome = detect_headstones(
        &photo,
        &bright_blob_detector,
        &PipelineParams::default(),
        &mut NoProgress,
        &CancelToken::new(),
    )
    .expect("detection run");

    let mut session = AnnotationSession::new(photo.width(), photo.height());
    session.adopt_detections(&outcome.polygons);
    assert_eq!(session.len(), 1);

    // nudge, rotate and tag the detection the way the editor would
    let edited = session.polygons()[0].translated(3.0, -2.0).rotated(15.0);
    session.replace_polygon(0, edited).expect("replace");
    session.set_metadata(0, None, Some(4), Some(9)).expect("tag");

    let records = session.export_records().expect("export");
    assert_eq!(records[0].row, Some(4));
    assert_eq!(records[0].col, Some(9));

    let expected = edited.centroid();
    assert!((records[0].centroidx - expected.x).abs() < 1e-9);
    assert!((records[0].centroidy - expected.y).abs() < 1e-9);
    assert!((Point2::new(records[0].toplx, records[0].toply) - edited.points[0]).norm() < 1e-9);
}
