//! Paints shapes onto a [`Surface`].

use crate::surface::{Composite, Surface, round_stroke};
use brainsketch_core::shapes::{SerializableColor, Shape};

/// Color of the page behind the drawing.
pub const DEFAULT_BACKGROUND: SerializableColor = SerializableColor::new(0x0f, 0x17, 0x2a, 255);

/// Repaint the whole surface: clear, background, then `shapes` back to front.
pub fn render<'a, S, I>(surface: &mut S, shapes: I, background: SerializableColor)
where
    S: Surface + ?Sized,
    I: IntoIterator<Item = &'a Shape>,
{
    surface.clear();
    surface.fill_background(background);
    for shape in shapes {
        paint_shape(surface, shape);
    }
}

/// Paint a single shape with its own style.
pub fn paint_shape<S: Surface + ?Sized>(surface: &mut S, shape: &Shape) {
    let path = shape.to_path();
    if path.elements().is_empty() {
        return;
    }
    let stroke = round_stroke(shape.stroke_width());

    match shape {
        // Only coverage matters for destination-out.
        Shape::Eraser(_) => {
            surface.stroke_path(&path, &stroke, SerializableColor::black(), Composite::Erase)
        }
        Shape::Pen(_)
        | Shape::Line(_)
        | Shape::Rect(_)
        | Shape::Circle(_)
        | Shape::Triangle(_)
        | Shape::Arrow(_) => {
            let color = shape
                .style()
                .map_or_else(SerializableColor::white, |style| style.stroke);
            surface.stroke_path(&path, &stroke, color, Composite::SourceOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, DrawCommand};
    use brainsketch_core::canvas::Canvas;
    use brainsketch_core::tools::ToolKind;
    use kurbo::{PathEl, Point, Size};

    fn draw(canvas: &mut Canvas, tool: ToolKind, points: &[(f64, f64)]) {
        canvas.set_tool(tool);
        canvas.begin_stroke(Point::new(points[0].0, points[0].1));
        for &(x, y) in &points[1..] {
            canvas.extend_stroke(Point::new(x, y));
        }
        canvas.commit_stroke();
    }

    fn surface() -> DisplayList {
        DisplayList::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn test_clear_then_render_is_background_only() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, ToolKind::Pen, &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        draw(&mut canvas, ToolKind::Rect, &[(0.0, 0.0), (50.0, 50.0)]);
        canvas.clear();

        let mut list = surface();
        render(&mut list, canvas.shapes_for_render(), DEFAULT_BACKGROUND);

        assert!(list.is_background_only());
        assert_eq!(
            list.current_frame(),
            &[DrawCommand::FillBackground {
                color: DEFAULT_BACKGROUND
            }]
        );
    }

    #[test]
    fn test_render_starts_with_clear_and_background() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, ToolKind::Line, &[(0.0, 0.0), (50.0, 50.0)]);

        let mut list = surface();
        render(&mut list, canvas.shapes_for_render(), DEFAULT_BACKGROUND);

        assert_eq!(list.commands()[0], DrawCommand::Clear);
        assert!(matches!(list.commands()[1], DrawCommand::FillBackground { .. }));
        assert_eq!(list.strokes().count(), 1);
    }

    #[test]
    fn test_paint_order_and_pending_last() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, ToolKind::Pen, &[(0.0, 0.0), (5.0, 5.0)]);
        draw(&mut canvas, ToolKind::Eraser, &[(0.0, 0.0), (5.0, 5.0)]);
        canvas.set_tool(ToolKind::Circle);
        canvas.begin_stroke(Point::new(100.0, 100.0));
        canvas.extend_stroke(Point::new(110.0, 100.0));

        let mut list = surface();
        render(&mut list, canvas.shapes_for_render(), DEFAULT_BACKGROUND);

        let composites: Vec<Composite> = list
            .strokes()
            .filter_map(|c| match c {
                DrawCommand::StrokePath { composite, .. } => Some(*composite),
                _ => None,
            })
            .collect();
        assert_eq!(
            composites,
            vec![Composite::SourceOver, Composite::Erase, Composite::SourceOver]
        );
    }

    #[test]
    fn test_eraser_uses_its_own_width() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, ToolKind::Eraser, &[(0.0, 0.0), (5.0, 5.0)]);

        let mut list = surface();
        render(&mut list, canvas.shapes_for_render(), DEFAULT_BACKGROUND);

        let Some(DrawCommand::StrokePath { width, .. }) = list.strokes().next() else {
            panic!("expected an eraser stroke");
        };
        assert_eq!(*width, 20.0);
    }

    #[test]
    fn test_arrow_paints_shaft_and_head() {
        let mut canvas = Canvas::new();
        draw(&mut canvas, ToolKind::Arrow, &[(0.0, 0.0), (100.0, 0.0)]);

        let mut list = surface();
        render(&mut list, canvas.shapes_for_render(), DEFAULT_BACKGROUND);

        let Some(DrawCommand::StrokePath { path, color, .. }) = list.strokes().next() else {
            panic!("expected an arrow stroke");
        };
        let moves = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 3);
        assert_eq!(*color, SerializableColor::white());
    }

    #[test]
    fn test_shape_color_is_used() {
        let mut canvas = Canvas::new();
        canvas.tool_manager.current_style.stroke = SerializableColor::new(255, 0, 0, 255);
        draw(&mut canvas, ToolKind::Triangle, &[(10.0, 10.0), (30.0, 20.0)]);

        let mut list = surface();
        render(&mut list, canvas.shapes_for_render(), DEFAULT_BACKGROUND);

        let Some(DrawCommand::StrokePath { color, composite, .. }) = list.strokes().next() else {
            panic!("expected a triangle stroke");
        };
        assert_eq!(*color, SerializableColor::new(255, 0, 0, 255));
        assert_eq!(*composite, Composite::SourceOver);
    }
}
