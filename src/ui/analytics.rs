/// Model performance and classification trends
use iced::widget::{canvas, column, progress_bar, row, text, Column};
use iced::{Element, Length};

use super::chart::MonthlyChart;
use super::{card, muted, severity_color};
use crate::state::data::Severity;
use crate::state::stats::{ACCURACY_BY_DISEASE, DISTRIBUTION, MODEL_METRICS, MONTHLY};
use crate::Message;

const CHART_HEIGHT: f32 = 220.0;

pub fn view() -> Element<'static, Message> {
    let metrics = MODEL_METRICS.iter().fold(row![].spacing(16), |cards, metric| {
        cards.push(card(
            column![
                text(metric.metric).size(14).color(muted()),
                text(metric.value).size(28),
                text(metric.change).size(12).color(severity_color(Severity::Low)),
            ]
            .spacing(4),
        ))
    });

    let monthly = MONTHLY.iter().fold(Column::new().spacing(4), |list, month| {
        list.push(row![
            text(month.month).width(Length::Fixed(48.0)),
            text(format!("{} classifications", month.classifications)).width(Length::Fill),
            text(format!("{:.1}% accuracy", month.accuracy)).color(muted()),
        ])
    });

    let trend = card(
        column![
            text("Monthly Classifications").size(20),
            canvas(MonthlyChart { data: &MONTHLY })
                .width(Length::Fill)
                .height(Length::Fixed(CHART_HEIGHT)),
            monthly,
        ]
        .spacing(12),
    );

    let distribution = DISTRIBUTION.iter().fold(
        Column::new().spacing(10).push(text("Disease Distribution").size(20)),
        |list, entry| {
            list.push(
                column![
                    row![
                        text(entry.name).width(Length::Fill),
                        text(format!("{} ({:.1}%)", entry.count, entry.percentage)).color(muted()),
                    ],
                    progress_bar(0.0..=100.0, entry.percentage).height(Length::Fixed(8.0)),
                ]
                .spacing(4),
            )
        },
    );

    let header = row![
        text("Disease").width(Length::FillPortion(3)),
        text("Cases").width(Length::FillPortion(1)),
        text("Accuracy").width(Length::FillPortion(1)),
        text("Precision").width(Length::FillPortion(1)),
        text("Recall").width(Length::FillPortion(1)),
    ];

    let accuracy = ACCURACY_BY_DISEASE.iter().fold(
        Column::new()
            .spacing(8)
            .push(text("Accuracy by Disease").size(20))
            .push(header),
        |table, row_data| {
            table.push(row![
                text(row_data.name).width(Length::FillPortion(3)),
                text(row_data.cases.to_string()).width(Length::FillPortion(1)),
                text(format!("{:.1}%", row_data.accuracy)).width(Length::FillPortion(1)),
                text(format!("{:.1}%", row_data.precision)).width(Length::FillPortion(1)),
                text(format!("{:.1}%", row_data.recall)).width(Length::FillPortion(1)),
            ])
        },
    );

    column![
        card(
            column![
                text("Analytics").size(24),
                text("Model performance and classification trends").color(muted()),
            ]
            .spacing(6)
        ),
        metrics,
        row![trend, card(distribution)].spacing(16),
        card(accuracy),
    ]
    .spacing(24)
    .into()
}
