//! End-to-end interaction scenarios driven through the public event API.

use annotink_core::geometry::{boundary_intersection, centroid, iou, resample_polygon};
use annotink_core::{
    AiMode, Buttons, Canvas, CanvasConfig, CanvasError, CanvasEvent, Key, KeyEvent, Modifiers,
    MouseButton, PointerEvent, Shape, ShapeKind,
};
use kurbo::{Point, Rect, Size};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas() -> Canvas {
    init_logging();
    let mut canvas = Canvas::new(CanvasConfig::default()).unwrap();
    canvas.set_widget_size(Size::new(1200.0, 800.0));
    canvas.load_image(1200, 800, true);
    canvas
}

fn press(canvas: &mut Canvas, x: f64, y: f64) -> Vec<CanvasEvent> {
    canvas.handle_pointer(PointerEvent::Down {
        position: Point::new(x, y),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    })
}

fn release(canvas: &mut Canvas, x: f64, y: f64) -> Vec<CanvasEvent> {
    canvas.handle_pointer(PointerEvent::Up {
        position: Point::new(x, y),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    })
}

fn move_to(canvas: &mut Canvas, x: f64, y: f64, buttons: Buttons) -> Vec<CanvasEvent> {
    canvas.handle_pointer(PointerEvent::Move {
        position: Point::new(x, y),
        buttons,
        modifiers: Modifiers::NONE,
    })
}

#[test]
fn rectangle_drawn_with_two_clicks() {
    let mut canvas = canvas();
    canvas.set_create_kind(ShapeKind::Rectangle);
    canvas.set_editing(false);

    let events = press(&mut canvas, 26.0, 70.0);
    assert!(events.contains(&CanvasEvent::DrawingPolygon(true)));
    move_to(&mut canvas, 1184.0, 742.0, Buttons::NONE);
    assert_eq!(
        canvas.preview_line().points(),
        &[Point::new(26.0, 70.0), Point::new(1184.0, 742.0)]
    );
    let events = press(&mut canvas, 1184.0, 742.0);
    assert!(events.contains(&CanvasEvent::NewShape));
    assert!(events.contains(&CanvasEvent::DrawingPolygon(false)));

    let shape = &canvas.shapes()[0];
    assert_eq!(shape.kind(), ShapeKind::Rectangle);
    assert!(shape.is_closed());
    assert_eq!(
        shape.points(),
        &[Point::new(26.0, 70.0), Point::new(1184.0, 742.0)]
    );
    assert_eq!(canvas.document().history_len(), 1);
}

#[test]
fn dragged_point_stops_at_image_corner() {
    let mut canvas = canvas();
    let shape = Shape::with_points(ShapeKind::Point, vec![Point::new(5.0, 5.0)]).closed();
    let id = shape.id();
    canvas.load_shapes(vec![shape], true);

    let events = move_to(&mut canvas, 5.0, 5.0, Buttons::NONE);
    assert!(events.contains(&CanvasEvent::VertexSelected(true)));
    press(&mut canvas, 5.0, 5.0);
    move_to(&mut canvas, -50.0, -50.0, Buttons::only(MouseButton::Left));
    let events = release(&mut canvas, -50.0, -50.0);
    assert!(events.contains(&CanvasEvent::ShapeMoved));

    let p = canvas.shape(id).unwrap().points()[0];
    assert!(p.x.abs() < 1e-9);
    assert!(p.y.abs() < 1e-9);
}

#[test]
fn prompt_session_finishes_only_on_enter() {
    let mut canvas = canvas();
    canvas.set_ai_mode(AiMode::AddPoint);
    let events = press(&mut canvas, 100.0, 100.0);
    assert!(events.contains(&CanvasEvent::AiPointAdded));

    canvas.set_ai_mode(AiMode::RemovePoint);
    let events = press(&mut canvas, 200.0, 200.0);
    assert!(events.contains(&CanvasEvent::AiPointAdded));
    assert!(!events.contains(&CanvasEvent::AiSessionFinished));

    // Clicks outside the image are not prompts.
    let events = press(&mut canvas, 1500.0, 200.0);
    assert!(!events.contains(&CanvasEvent::AiPointAdded));

    let request = canvas.ai_prompt().request();
    assert_eq!(request.points, vec![[100, 100], [200, 200]]);
    assert_eq!(request.labels, vec![1, 0]);

    let events = canvas.handle_key(KeyEvent::Pressed(Key::Enter));
    assert_eq!(
        events,
        vec![CanvasEvent::AiSessionFinished, CanvasEvent::Repaint]
    );
}

#[test]
fn undo_ping_pongs_through_history() {
    let mut canvas = canvas();
    canvas.set_editing(false);
    canvas.set_create_kind(ShapeKind::Point);
    press(&mut canvas, 10.0, 10.0);
    assert_eq!(canvas.undo_shape_edit(), Err(CanvasError::NoHistory));
    assert_eq!(canvas.shapes().len(), 1);

    press(&mut canvas, 20.0, 20.0);
    press(&mut canvas, 30.0, 30.0);
    assert_eq!(canvas.shapes().len(), 3);

    canvas.undo_shape_edit().unwrap();
    assert_eq!(canvas.shapes().len(), 2);
    canvas.undo_shape_edit().unwrap();
    assert_eq!(canvas.shapes().len(), 1);
    assert!(canvas.undo_shape_edit().is_err());
}

#[test]
fn undo_history_is_independent_of_live_shapes() {
    let mut canvas = canvas();
    let square = Shape::with_points(
        ShapeKind::Polygon,
        vec![
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
            Point::new(200.0, 200.0),
            Point::new(100.0, 200.0),
        ],
    )
    .closed();
    let id = square.id();
    canvas.load_shapes(vec![square], true);

    press(&mut canvas, 150.0, 150.0);
    move_to(&mut canvas, 170.0, 150.0, Buttons::only(MouseButton::Left));
    release(&mut canvas, 170.0, 150.0);
    assert_eq!(canvas.shape(id).unwrap().points()[0], Point::new(120.0, 100.0));

    canvas.undo_shape_edit().unwrap();
    assert_eq!(canvas.shape(id).unwrap().points()[0], Point::new(100.0, 100.0));
}

#[test]
fn selected_shape_stays_inside_image_while_dragged() {
    let mut canvas = canvas();
    let rect = Shape::with_points(
        ShapeKind::Rectangle,
        vec![Point::new(1000.0, 600.0), Point::new(1100.0, 700.0)],
    )
    .closed();
    let id = rect.id();
    canvas.load_shapes(vec![rect], true);

    press(&mut canvas, 1050.0, 650.0);
    move_to(&mut canvas, 1190.0, 790.0, Buttons::only(MouseButton::Left));
    release(&mut canvas, 1190.0, 790.0);

    let bounds = canvas.shape(id).unwrap().bounding_rect();
    assert_eq!(bounds, Rect::new(1099.0, 699.0, 1199.0, 799.0));
}

#[test]
fn geometry_helpers_agree() {
    let square = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(0.0, 100.0),
    ];
    assert_eq!(resample_polygon(&square, 8).len(), 8);
    assert_eq!(resample_polygon(&square, 3).len(), 3);

    let c = centroid(&square).unwrap();
    let shape = Shape::with_points(ShapeKind::Polygon, square.to_vec()).closed();
    assert!(shape.contains_point(c));

    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(iou(a, a), 1.0);
    assert_eq!(iou(a, Rect::new(20.0, 20.0, 30.0, 30.0)), 0.0);

    let image = Rect::new(0.0, 0.0, 1199.0, 799.0);
    let hit = boundary_intersection(Point::new(100.0, 100.0), Point::new(1300.0, 100.0), image);
    assert!((hit - Point::new(1199.0, 100.0)).hypot() < 1e-6);
}

#[test]
fn persisted_records_round_trip_through_canvas() {
    let mut canvas = canvas();
    let json = r#"[
        {"label": "car", "points": [[10.0, 20.0], [30.0, 40.0]], "shape_type": "rectangle", "group_id": 4},
        {"label": null, "points": [[5.0, 5.0]], "shape_type": "point"}
    ]"#;
    canvas.load_shapes_json(json, true).unwrap();
    assert_eq!(canvas.shapes().len(), 2);
    assert_eq!(canvas.shapes()[0].group_id, Some(4));

    let bad = r#"[{"label": "x", "points": [[1.0, 1.0]], "shape_type": "hexagon"}]"#;
    assert_eq!(
        canvas.load_shapes_json(bad, true),
        Err(CanvasError::UnsupportedShapeKind("hexagon".to_string()))
    );
    assert_eq!(canvas.shapes().len(), 2);
}
