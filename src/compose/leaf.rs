use kurbo::{Affine, BezPath, Point, Rect};

/// Leaf outline in the unit square, stem at the bottom-left.
fn unit_leaf() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((0.08, 0.92));
    p.curve_to((0.02, 0.40), (0.40, 0.04), (0.96, 0.04));
    p.curve_to((0.98, 0.58), (0.62, 0.98), (0.14, 0.90));
    p.line_to((0.04, 1.0));
    p.line_to((0.0, 0.96));
    p.close_path();
    p
}

/// The footer leaf mark stretched into `rect`.
pub fn leaf_path(rect: Rect) -> BezPath {
    let xf = Affine::scale_non_uniform(rect.width(), rect.height())
        .then_translate(Point::new(rect.x0, rect.y0).to_vec2());
    let mut p = unit_leaf();
    p.apply_affine(xf);
    p
}
