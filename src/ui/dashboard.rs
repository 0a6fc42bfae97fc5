use iced::widget::{column, row, text, Column};
use iced::{Element, Length};

use super::{card, muted, severity_color};
use crate::state::data::Severity;
use crate::state::stats::{SessionSummary, OVERVIEW, RECENT_ACTIVITY};
use crate::Message;

pub fn view(summary: SessionSummary) -> Element<'static, Message> {
    let hero = card(column![
        text("Transfer Learning AI Platform").size(30),
        text("Advanced poultry disease classification using deep learning")
            .size(16)
            .color(muted()),
    ]
    .spacing(6));

    let stats = OVERVIEW.iter().fold(row![].spacing(16), |cards, stat| {
        cards.push(card(
            column![
                text(stat.title).size(14).color(muted()),
                text(stat.value).size(28),
                text(format!("{} from last month", stat.change))
                    .size(12)
                    .color(severity_color(Severity::Low)),
            ]
            .spacing(4),
        ))
    });

    let activity = RECENT_ACTIVITY.iter().fold(
        Column::new().spacing(10).push(text("Recent Activity").size(20)),
        |list, entry| {
            list.push(
                row![
                    text("●").color(severity_color(entry.severity)),
                    column![
                        text(entry.action).size(15),
                        text(entry.when).size(12).color(muted()),
                    ]
                    .width(Length::Fill),
                    text(entry.confidence).size(14),
                ]
                .spacing(10),
            )
        },
    );

    column![hero, stats, row![card(activity), card(session(summary))].spacing(16)]
        .spacing(24)
        .into()
}

/// Live counts for the uploads of this session
fn session(summary: SessionSummary) -> Column<'static, Message> {
    let mean = summary
        .mean_confidence
        .map(|c| format!("{:.1}%", c * 100.0))
        .unwrap_or_else(|| "-".to_string());

    let breakdown = Severity::ALL.into_iter().rev().fold(Column::new().spacing(4), |list, severity| {
        list.push(
            row![
                text(format!("{severity} risk")).width(Length::Fill),
                text(summary.count(severity).to_string()).color(severity_color(severity)),
            ],
        )
    });

    column![
        text("This Session").size(20),
        text(format!("{} uploaded, {} processing, {} classified", summary.total, summary.pending, summary.complete))
            .size(14)
            .color(muted()),
        text(format!("Mean confidence: {mean}")).size(14),
        breakdown,
    ]
    .spacing(10)
}
