use std::io;

use crate::gtfs::table::{self, Point, Row, Rows, TableLoadError, ToPoints};
use crate::gtfs::util;
use crate::gtfs::Gtfs;

// shape_point reads a shapes.txt row as a point. Anything unparsable becomes (NaN, NaN),
// so a shape keeps one point per row no matter how malformed the feed is.
pub fn shape_point(row: &Row) -> Point {
    let coordinate = |field: &str| row.get(field).and_then(|s| s.trim().parse::<f64>().ok());
    match (coordinate("shape_pt_lat"), coordinate("shape_pt_lon")) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => (f64::NAN, f64::NAN),
    }
}

// load reads shapes.txt, ordering each shape's points by shape_pt_sequence.
pub(crate) fn load<R: io::Read>(rows: Rows<R>) -> Result<ToPoints, TableLoadError> {
    let sequenced = rows.into_iter().try_fold(
        table::Table::<Vec<(i64, Point)>>::new(),
        |mut shapes, row_result| {
            let (line, row) = row_result?;
            let sequence = util::sequence_to_int(row.get_or_empty("shape_pt_sequence"));
            shapes
                .entry(table::key_of(&row, "shape_id", line)?)
                .push((sequence, shape_point(&row)));
            Ok::<_, TableLoadError>(shapes)
        },
    )?;

    let mut shapes = ToPoints::new();
    for (shape_id, mut points) in sequenced.into_entries() {
        points.sort_by_key(|&(sequence, _)| sequence);
        shapes.insert(shape_id, points.into_iter().map(|(_, point)| point).collect());
    }
    Ok(shapes)
}

impl Gtfs {
    // shape returns the points of shape_id, or nothing for an unknown shape.
    pub fn shape(&self, shape_id: &str) -> &[Point] {
        self.shapes.get(shape_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::TableKind;

    #[test]
    fn points_sorted_by_sequence() {
        let mut gtfs = Gtfs::default();
        gtfs.load_table(
            TableKind::Shapes,
            "shape_id,shape_pt_sequence,shape_pt_lat,shape_pt_lon\n\
             5,2,52.2,20.2\n\
             6,0,50.0,19.0\n\
             5,0,52.0,20.0\n\
             5,1,52.1,20.1\n"
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(gtfs.shape("5"), &[(52.0, 20.0), (52.1, 20.1), (52.2, 20.2)]);
        assert_eq!(gtfs.shape("6"), &[(50.0, 19.0)]);
        assert!(gtfs.shape("7").is_empty());
    }

    #[test]
    fn malformed_point_is_kept_as_nan() {
        let mut gtfs = Gtfs::default();
        gtfs.load_table(
            TableKind::Shapes,
            "shape_id,shape_pt_sequence,shape_pt_lat,shape_pt_lon\n\
             5,0,52.0,20.0\n\
             5,1,north,20.1\n\
             5,2,52.2\n"
                .as_bytes(),
        )
        .unwrap();

        let shape = gtfs.shape("5");
        assert_eq!(shape.len(), 3);
        assert_eq!(shape[0], (52.0, 20.0));
        assert!(shape[1].0.is_nan() && shape[1].1.is_nan());
        assert!(shape[2].0.is_nan() && shape[2].1.is_nan());
    }

    #[test]
    fn shape_point_trims_whitespace() {
        let row: Row = [("shape_pt_lat", " 52.5"), ("shape_pt_lon", "21.0 ")].into_iter().collect();
        assert_eq!(shape_point(&row), (52.5, 21.0));
    }
}
