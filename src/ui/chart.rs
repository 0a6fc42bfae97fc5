/// Monthly classifications bar chart
use iced::widget::canvas::{self, Frame, Text};
use iced::{alignment, Color, Pixels, Point, Rectangle, Size};

use crate::state::stats::{monthly_peak, MonthlyStat};
use crate::Message;

/// Height reserved below the bars for month labels
const LABEL_HEIGHT: f32 = 18.0;

#[derive(Debug, Clone, Copy)]
pub struct MonthlyChart {
    pub data: &'static [MonthlyStat],
}

impl canvas::Program<Message> for MonthlyChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        if self.data.is_empty() {
            return vec![frame.into_geometry()];
        }

        let peak = monthly_peak() as f32;
        let slot_width = bounds.width / self.data.len() as f32;
        let bar_width = slot_width * 0.6;
        let chart_height = (bounds.height - LABEL_HEIGHT).max(0.0);
        let bar_color = Color::from_rgb8(0x25, 0x63, 0xEB);

        for (i, month) in self.data.iter().enumerate() {
            let bar_height = month.classifications as f32 / peak * chart_height;
            let x = i as f32 * slot_width + (slot_width - bar_width) / 2.0;
            let y = chart_height - bar_height;

            frame.fill_rectangle(Point::new(x, y), Size::new(bar_width, bar_height), bar_color);

            frame.fill_text(Text {
                content: month.month.to_string(),
                position: Point::new(x + bar_width / 2.0, chart_height + 2.0),
                color: Color::from_rgb8(0x4B, 0x55, 0x63),
                size: Pixels(12.0),
                horizontal_alignment: alignment::Horizontal::Center,
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
