/// Dashboard views
///
/// One module per tab plus a few shared helpers. Views only read state
/// and emit `Message`s; all mutation happens in `PoultryScan::update`.
use iced::widget::{button, container, row, text, Container};
use iced::{Color, Element, Length};

use crate::state::data::{ConfidenceBand, Severity};
use crate::Message;

pub mod about;
pub mod analytics;
pub mod catalog;
pub mod chart;
pub mod classify;
pub mod dashboard;

/// Longest file name shown on a result card
const MAX_NAME_CHARS: usize = 20;

/// Top-level navigation destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Classify,
    Diseases,
    Analytics,
    About,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Classify,
        Tab::Diseases,
        Tab::Analytics,
        Tab::About,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Classify => "Classify",
            Tab::Diseases => "Disease Database",
            Tab::Analytics => "Analytics",
            Tab::About => "About",
        }
    }
}

/// Title bar with one button per tab
pub fn header(active: Tab) -> Element<'static, Message> {
    let tabs = Tab::ALL.into_iter().fold(row![].spacing(8), |tabs, tab| {
        let style = if tab == active {
            button::primary
        } else {
            button::secondary
        };
        tabs.push(
            button(text(tab.label()))
                .on_press(Message::TabSelected(tab))
                .style(style)
                .padding([8, 16]),
        )
    });

    container(
        row![
            text("PoultryScan AI").size(24),
            container(tabs).width(Length::Fill).align_right(Length::Fill),
        ]
        .align_y(iced::Alignment::Center),
    )
    .padding([16, 32])
    .width(Length::Fill)
    .style(container::bordered_box)
    .into()
}

/// Panel used for every card on the dashboard
pub fn card<'a>(content: impl Into<Element<'a, Message>>) -> Container<'a, Message> {
    container(content)
        .padding(20)
        .width(Length::Fill)
        .style(container::rounded_box)
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => Color::from_rgb8(0xDC, 0x26, 0x26),
        Severity::Medium => Color::from_rgb8(0xD9, 0x77, 0x06),
        Severity::Low => Color::from_rgb8(0x16, 0xA3, 0x4A),
    }
}

pub fn band_color(band: ConfidenceBand) -> Color {
    match band {
        ConfidenceBand::Strong => Color::from_rgb8(0x22, 0xC5, 0x5E),
        ConfidenceBand::Fair => Color::from_rgb8(0xEA, 0xB3, 0x08),
        ConfidenceBand::Weak => Color::from_rgb8(0xEF, 0x44, 0x44),
    }
}

pub fn muted() -> Color {
    Color::from_rgb8(0x4B, 0x55, 0x63)
}

/// Shorten long file names to fit on a card
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
